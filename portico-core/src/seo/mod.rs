//! Page metadata, crawler policy and sitemap
//!
//! All of these are pure functions of the site configuration, built once at
//! startup.

pub mod metadata;
pub mod robots;
pub mod sitemap;

pub use metadata::*;
pub use robots::*;
pub use sitemap::*;
