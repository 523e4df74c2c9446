//! Portico Core - Session, access and site descriptor types
//!
//! This crate holds everything the Portico gateway knows without an HTTP
//! server: the session data model, the access guard, the page metadata and
//! crawler descriptors, configuration, errors and logging.

pub mod access;
pub mod config;
pub mod error;
pub mod logging;
pub mod seo;
pub mod types;

pub use access::*;
pub use config::*;
pub use error::*;
pub use logging::*;
pub use seo::*;
pub use types::*;

// Re-export commonly used external types
pub use tracing;
