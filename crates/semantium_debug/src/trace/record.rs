//! Trace event and record types.
//!
//! This module defines the events observed while a grammar is traversed.

use serde::Serialize;

use semantium_foundation::{Error, Value};
use semantium_grammar::WordKind;
use semantium_recording::{ChainElement, ChainId};

// =============================================================================
// Trace Event
// =============================================================================

/// Events that can be traced during a traversal.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum TraceEvent {
    /// A chain was created.
    ChainCreated,

    /// The record's chain was forked from `parent`.
    ChainForked {
        /// The chain forked from.
        parent: ChainId,
        /// Number of elements replayed into the fork.
        depth: usize,
    },

    /// A word use was appended.
    WordUsed {
        /// The block declaring the word.
        block: String,
        /// The word name.
        word: String,
        /// Calling convention of the word.
        kind: WordKind,
        /// Call parameters, or `None` for a use by access.
        #[serde(skip_serializing_if = "Option::is_none")]
        parameters: Option<Vec<Value>>,
        /// Position of the new element in its chain.
        depth: usize,
    },

    /// The chain was finalized.
    Finalized {
        /// Number of recorded elements.
        depth: usize,
    },

    /// A step on the chain failed.
    ResolutionFailed {
        /// The rendered error.
        message: String,
    },
}

impl TraceEvent {
    /// Builds a `WordUsed` event from an appended element.
    #[must_use]
    pub fn word_used(element: &ChainElement) -> Self {
        let word = element.word();
        Self::WordUsed {
            block: word.block_name().to_string(),
            word: word.name().to_string(),
            kind: element.descriptor().kind,
            parameters: word.parameters().map(|p| p.iter().cloned().collect()),
            depth: element.depth(),
        }
    }

    /// Builds a `ResolutionFailed` event from an error.
    #[must_use]
    pub fn resolution_failed(error: &Error) -> Self {
        Self::ResolutionFailed {
            message: error.to_string(),
        }
    }

    /// Returns a short name for the event type.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ChainCreated => "chain-created",
            Self::ChainForked { .. } => "chain-forked",
            Self::WordUsed { .. } => "word-used",
            Self::Finalized { .. } => "finalized",
            Self::ResolutionFailed { .. } => "resolution-failed",
        }
    }

    /// Returns true if this event starts a chain.
    #[must_use]
    pub fn is_chain_start(&self) -> bool {
        matches!(self, Self::ChainCreated | Self::ChainForked { .. })
    }
}

// =============================================================================
// Trace Record
// =============================================================================

/// A timestamped trace record.
#[derive(Clone, Debug, Serialize)]
pub struct TraceRecord {
    /// Unique record ID within the tracer.
    pub id: u64,
    /// The chain the event happened on.
    pub chain: ChainId,
    /// Nanoseconds since the tracer was created.
    pub timestamp_ns: u64,
    /// The trace event.
    #[serde(flatten)]
    pub event: TraceEvent,
}

impl TraceRecord {
    /// Creates a new trace record.
    #[must_use]
    pub fn new(id: u64, chain: ChainId, timestamp_ns: u64, event: TraceEvent) -> Self {
        Self {
            id,
            chain,
            timestamp_ns,
            event,
        }
    }

    /// Returns the event type name.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        self.event.event_type()
    }
}

// =============================================================================
// Tests
// =============================================================================
