//! Avro container files as line-oriented text.
//!
//! Each record of an object container file becomes one line of compact,
//! ASCII-only JSON or one CSV row. Optional decoding of logical types,
//! `System.Guid` fixeds, empty-field pruning and top-level column projection
//! are controlled by an [`OutputPolicy`].

pub mod avro;
pub mod binary;
pub mod cache;
pub mod csv;
pub mod decimal;
pub mod error;
pub mod json;
pub mod model;
pub mod policy;
pub mod stream;
pub mod temporal;
pub mod walker;

pub use avro::SchemaIndex;
pub use cache::ScratchCache;
pub use decimal::Decimal;
pub use error::Error;
pub use model::{LogicalType, SchemaName, Value};
pub use policy::OutputPolicy;
pub use stream::{RunStats, convert_file, convert_stream, read_schema};
pub use walker::{Converter, OutputMode};
