//! External music catalog integration
//!
//! The catalog is consumed as a black box: free-text search, artist top
//! tracks, and batch track lookup, all shaped into the uniform `Track` and
//! `Artist` types before anything else sees them.

pub mod cache;
pub mod client;
pub mod mood;
pub mod types;

pub use client::{CatalogClient, CatalogError};
pub use types::{Artist, Track};
