//! # Shapefuzz Core
//!
//! Deterministic generation of typed values from a fuzz input. The same bytes,
//! target type and configuration always produce the same value and consume
//! the same number of bytes.
//!
//! ## Modules
//!
//! - `constants`: Defaults and caps
//! - `cursor`: Primitive draws over the input (`ByteCursor`)
//! - `config`: Generator configuration and handling strategies
//! - `types`: Shape categories and the `Generate` trait
//! - `generator`: Type-directed traversal (`Generator`, `Traversal`)
//! - `overrides`: Caller-supplied overrides keyed by type
//! - `impls`: `Generate` for standard library types
//! - `macros`: `aggregate!` for structs
//!
//! ## Example
//!
//! ```
//! use shapefuzz_core::{aggregate, Generator};
//!
//! #[derive(Debug, Default)]
//! struct Record {
//!     field1: String,
//!     field2: String,
//!     field3: Vec<u8>,
//! }
//!
//! aggregate!(Record { field1, field2, field3 });
//!
//! let data = b"\x03ABC\x03ABC\x01A".to_vec();
//! let record: Record = Generator::new(data).generate().unwrap();
//! assert_eq!(record.field1, "ABC");
//! assert_eq!(record.field2, "ABC");
//! assert_eq!(record.field3, b"A");
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod constants;
pub mod cursor;
pub mod error;
pub mod generator;
mod impls;
mod macros;
pub mod overrides;
pub mod types;

// Re-export commonly used types
pub use config::{Config, FieldStrategy, UnknownStrategy};
pub use cursor::{ByteCursor, CallPlan};
pub use error::{BoxError, Error};
pub use generator::{Generator, GeneratorBuilder, Traversal};
pub use overrides::{Continue, OverrideRegistry};
pub use types::{FieldAccess, Generate, ScalarKind, Shape};

/// Result type alias for Shapefuzz operations
pub type Result<T> = core::result::Result<T, Error>;
