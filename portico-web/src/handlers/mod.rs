//! HTTP request handlers for the Portico web server
//!
//! Authentication handlers live in [`crate::auth::handlers`].

pub mod health;
pub mod pages;
pub mod seo;
pub mod types;

pub use health::*;
pub use pages::*;
pub use seo::*;

// Re-export all types for convenience
pub use types::*;
