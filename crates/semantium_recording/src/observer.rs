//! Traversal observation.
//!
//! A [`TraversalObserver`] attached to a [`Semantic`](crate::Semantic) sees
//! every chain created, forked, appended to, and finalized. All methods
//! default to no-ops.

use std::fmt;

use semantium_foundation::Error;

use crate::chain::ChainElement;

/// Identifier of one chain within a semantic, minted in creation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ChainId(u64);

impl ChainId {
    /// Creates a chain ID from a raw value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chain-{}", self.0)
    }
}

/// Receives traversal events.
pub trait TraversalObserver {
    /// A chain was created for a new traversal, a primed entry, or a
    /// substitution.
    fn chain_created(&self, _chain: ChainId) {}

    /// `child` was forked from `parent`, replaying `depth` elements.
    fn chain_forked(&self, _parent: ChainId, _child: ChainId, _depth: usize) {}

    /// A word use was appended to `chain`.
    fn word_used(&self, _chain: ChainId, _element: &ChainElement) {}

    /// `chain` was finalized after `depth` recorded uses.
    fn finalized(&self, _chain: ChainId, _depth: usize) {}

    /// A step on `chain` failed.
    fn resolution_failed(&self, _chain: ChainId, _error: &Error) {}
}

/// Observer that ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullObserver;

impl TraversalObserver for NullObserver {}
