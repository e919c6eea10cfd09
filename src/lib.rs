//! Semantium - Grammar compiler and fluent traversal engine
//!
//! This crate re-exports all layers of the Semantium system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: semantium_debug       - Traversal tracing (trace buffer, formatters)
//! Layer 2: semantium_recording   - Instruction chains, dispatcher, entry dictionary
//! Layer 1: semantium_grammar     - Blocks, catalog compiler, continuation sets
//! Layer 0: semantium_foundation  — Core types (Value, Error, collections)
//! ```

pub use semantium_debug as debug;
pub use semantium_foundation as foundation;
pub use semantium_grammar as grammar;
pub use semantium_recording as recording;
