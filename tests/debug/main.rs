//! Integration tests for Layer 3: Debug
//!
//! Tests for tracing traversals through an attached observer.

mod common;
