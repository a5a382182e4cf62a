//! # Siteforge Common
//!
//! Document storage shared by the editor and the workspace server.
//!
//! Site documents are stored as JSON objects addressed by
//! `(userId, siteId)`, mirroring the `users/{uid}/sites/{siteId}` layout of
//! a document database.

pub mod error;
pub mod ids;
pub mod result;
pub mod store;

pub use error::*;
pub use ids::*;
pub use result::*;
pub use store::*;
