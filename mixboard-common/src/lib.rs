//! # Mixboard Common Library
//!
//! Shared code for the Mixboard web service:
//! - Database initialization and row models
//! - Configuration loading and root folder resolution
//! - Password hashing for account credentials
//! - Common error types

pub mod config;
pub mod db;
pub mod error;
pub mod password;

pub use error::{Error, Result};
