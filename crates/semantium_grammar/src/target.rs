//! Continuation targets.
//!
//! A word names what may follow it: one or more blocks, the grammar's
//! result, or both.

use std::fmt;
use std::sync::Arc;

/// Name of a block as written in a grammar definition.
pub type BlockName = Arc<str>;

/// A single thing a word may continue with.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Target {
    /// Continue with the words of the named block.
    Block(BlockName),
    /// The grammar's result becomes accessible.
    Result,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Block(name) => write!(f, "{name}"),
            Self::Result => write!(f, "<result>"),
        }
    }
}

/// The ordered list of targets returned by a word.
///
/// Used as the cache key for resolved continuation sets, so two words that
/// continue with the same list share one resolution.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Continuation {
    targets: Vec<Target>,
}

impl Continuation {
    /// Creates a continuation to the given blocks.
    pub fn to<I, S>(blocks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<BlockName>,
    {
        Self {
            targets: blocks
                .into_iter()
                .map(|b| Target::Block(b.into()))
                .collect(),
        }
    }

    /// Creates a continuation that only reaches the result.
    #[must_use]
    pub fn result() -> Self {
        Self {
            targets: vec![Target::Result],
        }
    }

    /// Adds a block to this continuation.
    #[must_use]
    pub fn and(mut self, block: impl Into<BlockName>) -> Self {
        self.targets.push(Target::Block(block.into()));
        self
    }

    /// Makes the result reachable from this continuation.
    #[must_use]
    pub fn with_result(mut self) -> Self {
        if !self.has_result() {
            self.targets.push(Target::Result);
        }
        self
    }

    /// Returns the raw targets in declaration order.
    #[must_use]
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Returns the block names, skipping the result.
    pub fn block_names(&self) -> impl Iterator<Item = &BlockName> {
        self.targets.iter().filter_map(|t| match t {
            Target::Block(name) => Some(name),
            Target::Result => None,
        })
    }

    /// Returns true if the result is one of the targets.
    #[must_use]
    pub fn has_result(&self) -> bool {
        self.targets.contains(&Target::Result)
    }

    /// Returns true if no target was named.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl FromIterator<Target> for Continuation {
    fn from_iter<I: IntoIterator<Item = Target>>(iter: I) -> Self {
        Self {
            targets: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Continuation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, target) in self.targets.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{target}")?;
        }
        write!(f, "]")
    }
}
