//! Bulk Builder Core
//!
//! Core domain types, traits, and error handling for Bulk Builder.
//! This crate has minimal dependencies and defines the shared vocabulary
//! used by the selection engine and its adapters.

pub mod error;
pub mod history;
pub mod ids;
pub mod job;
pub mod parameters;
pub mod ports;
pub mod selection;

pub use error::{Error, Result};
pub use ids::*;
