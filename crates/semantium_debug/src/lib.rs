//! Traversal tracing for Semantium.
//!
//! This crate provides:
//! - [`Tracer`] - Records chain events into a ring buffer
//! - [`SharedTracer`] - A tracer attachable as a traversal observer
//! - [`HumanFormatter`] / [`JsonFormatter`] - Trace output formats

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod trace;

pub use trace::{
    DEFAULT_CAPACITY, HumanFormatter, JsonFormatter, SharedTracer, TraceBuffer, TraceBufferStats,
    TraceEvent, TraceFormat, TraceFormatter, TraceOutput, TraceRecord, Tracer, TracerConfig,
};
