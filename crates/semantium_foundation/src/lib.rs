//! Core errors, parameter values, and persistent collections for Semantium.
//!
//! This crate provides:
//! - [`Value`] - Parameters passed to parametric and hybrid words
//! - [`Type`] - Type descriptors used when a word rejects its arguments
//! - [`Error`] - Rich error types with traversal context
//! - Persistent parameter lists ([`LtVec`])

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod args;
pub mod collections;
pub mod error;
pub mod types;
pub mod value;

pub use args::{expect_arity, expect_arity_range, expect_param};
pub use collections::LtVec;
pub use error::{Error, ErrorContext, ErrorKind, SemanticLimit};
pub use types::Type;
pub use value::Value;

/// Result type alias using the Semantium error type.
pub type Result<T> = std::result::Result<T, Error>;
