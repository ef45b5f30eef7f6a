//! Job selection and bulk dispatch for Bulk Builder.
//!
//! A pass turns a [`builder::BulkRequest`] into scheduling calls: candidate
//! jobs are scoped and filtered by [`selection`], each selected job is
//! dispatched by [`dispatcher`] with parameters from [`resolver`].

pub mod builder;
pub mod config;
pub mod dispatcher;
pub mod filter;
pub mod history;
pub mod params;
pub mod pattern;
pub mod resolver;
pub mod selection;
pub mod views;

pub use builder::{BulkBuilder, BulkReport, BulkRequest, RawBulkRequest};
pub use config::BuilderConfig;
pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use history::History;
