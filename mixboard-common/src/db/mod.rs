//! Database access layer
//!
//! Schema initialization and row models for the SQLite store. Queries live
//! next to the HTTP handlers that issue them.

pub mod init;
pub mod models;

pub use init::init_database;
