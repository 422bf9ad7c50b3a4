//! # shelfmark-core
//!
//! Core types, traits, and abstractions for shelfmark.
//!
//! This crate defines:
//! - Data models (Owner, Category, Site) and request/response records
//! - Repository traits implemented by `shelfmark-db`
//! - External-collaborator traits implemented by `shelfmark-enrich`
//! - The shared [`Error`] type and [`Result`] alias
//! - Structured-logging field constants and UUIDv7 helpers

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod traits;
pub mod uuid_utils;

pub use error::{Error, Result};
pub use models::*;
pub use traits::*;
pub use uuid_utils::new_v7;
