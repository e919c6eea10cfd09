//! Fluent traversal for Semantium grammars.
//!
//! This crate provides:
//! - [`InstructionChain`] - The caller-defined recording of word uses
//! - [`Dispatcher`] - One position in a traversal, with fork on reuse
//! - [`EntryDictionary`] - The root handed to grammar consumers
//! - [`Semantic`] - A compiled grammar and its entry points
//! - [`TraversalObserver`] - Hooks for tracing traversals
//!
//! # Example
//!
//! ```
//! use semantium_grammar::{BlockDefinition, Continuation, GrammarDefinition};
//! use semantium_recording::{History, InstructionChain, Semantic};
//!
//! #[derive(Clone, Default)]
//! struct Words(History);
//!
//! impl InstructionChain for Words {
//!     type Output = String;
//!     fn history(&self) -> &History { &self.0 }
//!     fn history_mut(&mut self) -> &mut History { &mut self.0 }
//!     fn finalize_recording(&mut self) -> String { self.0.path() }
//!     fn fresh(&self) -> Self { Self::default() }
//! }
//!
//! let semantic = Semantic::define(
//!     GrammarDefinition::<Words>::default()
//!         .block(BlockDefinition::initial("Start").static_word("hello", Continuation::to(["End"])))
//!         .block(BlockDefinition::new("End").static_word("world", Continuation::result())),
//! )?;
//!
//! let root = semantic.root()?;
//! let result = root.get("hello")?.get("world")?.result()?;
//! assert_eq!(*result, "hello.world");
//! # Ok::<(), semantium_foundation::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod chain;
pub mod dispatcher;
pub mod entry;
pub mod observer;
pub mod semantic;

pub use chain::{ChainElement, History, InstructionChain, path_through, replay_into};
pub use dispatcher::{DispatchState, Dispatcher, HybridWord, ParametricWord, Step};
pub use entry::EntryDictionary;
pub use observer::{ChainId, NullObserver, TraversalObserver};
pub use semantic::Semantic;
