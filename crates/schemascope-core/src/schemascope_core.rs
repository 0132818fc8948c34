//! schemascope core - shared abstractions for the schema analyzer
//!
//! This crate provides the fundamental traits and types that the other
//! schemascope crates depend on. It defines:
//!
//! - `Connection` - Trait for read-only database connections
//! - `SchemaSource` - Trait for schema introspection
//! - `StatisticsSource` - Trait for slow-query and data-distribution lookups
//! - The normalized `Schema` model and the `SchemaAnalysis` /
//!   `SchemaOptimization` result shapes

mod analysis;
mod connection;
mod error;
mod schema;
mod types;

pub use analysis::*;
pub use connection::*;
pub use error::*;
pub use schema::*;
pub use types::*;
