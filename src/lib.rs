//! Small demo apps showing how relational data is navigated from Rust:
//! one-to-many and many-to-many relationships, inner vs. outer joins, and
//! the N+1 query pattern, each served over HTTP.

pub mod config;
pub mod db;
pub mod error;
pub mod model;
pub mod seed;
pub mod templates;
pub mod web;

pub use error::{AppError, AppResult};
pub use model::Demo;
