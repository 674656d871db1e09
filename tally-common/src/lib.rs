//! # Tally Common Library
//!
//! Shared code for the service desk tally service:
//! - Store initialization (schema, schema sync, default menu seed)
//! - Data models and tally/menu queries
//! - Typed report filters
//! - Timestamp encoding and display helpers
//! - Configuration loading

pub mod config;
pub mod db;
pub mod error;
pub mod time;

pub use error::{Error, Result};
