//! Grammar compilation for Semantium.
//!
//! This crate provides:
//! - [`BlockDefinition`] - Declarative word tables
//! - [`BlockRegistry`] - One definition per block, with initial blocks
//! - [`Catalog`] - Word descriptors compiled from the registry
//! - [`ContinuationSet`] - The words reachable from one position
//! - [`Grammar`] - The compiled, shared grammar

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod block;
pub mod catalog;
pub mod config;
pub mod continuation;
pub mod grammar;
pub mod registry;
pub mod target;

pub use block::{Accessed, BlockDefinition, Getter, Handler, WordDefinition, WordUseHook};
pub use catalog::{Catalog, WordDescriptor, WordKind, WordUse};
pub use config::GrammarConfig;
pub use continuation::{ContinuationResolver, ContinuationSet, Resolution, ResolverStats};
pub use grammar::{ChainBuilder, Grammar, GrammarDefinition};
pub use registry::{BlockId, BlockRegistry};
pub use target::{BlockName, Continuation, Target};
