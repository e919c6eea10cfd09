//! Error types for the Semantium system.
//!
//! A single [`Error`] carries an [`ErrorKind`] plus an optional
//! [`ErrorContext`] naming where in the traversal it happened. Every failure
//! is fatal to the resolution step that raised it.

use std::fmt;

use thiserror::Error;

use crate::types::Type;

/// Any failure raised while compiling or traversing a grammar.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// What went wrong.
    pub kind: ErrorKind,
    /// Where it went wrong, once a dispatcher has attached it.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// An error without context.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Attaches `context` unless an inner step already did.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        if self.context.is_none() {
            self.context = Some(context);
        }
        self
    }

    /// Creates an unsupported word definition error.
    #[must_use]
    pub fn unsupported_word(
        block: impl Into<String>,
        word: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::UnsupportedWordDefinition {
            block: block.into(),
            word: word.into(),
            reason: reason.into(),
        })
    }

    /// Creates an unknown continuation block error.
    #[must_use]
    pub fn unknown_continuation_block(block: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownContinuationBlock {
            block: block.into(),
            referenced_from: None,
        })
    }

    /// Creates an ambiguous grammar error.
    #[must_use]
    pub fn ambiguous_grammar(word: impl Into<String>, blocks: Vec<String>) -> Self {
        Self::new(ErrorKind::AmbiguousGrammar {
            word: word.into(),
            blocks,
        })
    }

    /// Creates an unknown word error.
    #[must_use]
    pub fn unknown_word(word: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownWord(word.into()))
    }

    /// Creates a not callable error.
    #[must_use]
    pub fn not_callable(word: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotCallable(word.into()))
    }

    /// Creates a parameters expected error.
    #[must_use]
    pub fn parameters_expected(word: impl Into<String>) -> Self {
        Self::new(ErrorKind::ParametersExpected(word.into()))
    }

    /// A parameter had the wrong type.
    #[must_use]
    pub fn type_mismatch(expected: Type, actual: Type) -> Self {
        Self::new(ErrorKind::TypeMismatch { expected, actual })
    }

    /// A word got the wrong number of parameters.
    #[must_use]
    pub fn arity_mismatch(expected: String, actual: usize) -> Self {
        Self::new(ErrorKind::ArityMismatch { expected, actual })
    }

    /// A configured limit was hit.
    #[must_use]
    pub fn limit_exceeded(limit: SemanticLimit) -> Self {
        Self::new(ErrorKind::LimitExceeded(limit))
    }

    /// Returns true if this error is an ambiguity between reachable blocks.
    #[must_use]
    pub fn is_ambiguity(&self) -> bool {
        matches!(self.kind, ErrorKind::AmbiguousGrammar { .. })
    }
}

/// Every way compilation or traversal can fail.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A block member has a shape the catalog compiler cannot accept.
    #[error("unsupported definition of word '{word}' on block {block}: {reason}")]
    UnsupportedWordDefinition {
        /// The block declaring the word.
        block: String,
        /// The offending word name.
        word: String,
        /// Why the definition was rejected.
        reason: String,
    },

    /// A continuation names a block that is not part of the grammar.
    #[error("unknown continuation block: {block}")]
    UnknownContinuationBlock {
        /// The block name that could not be found.
        block: String,
        /// The `Block.word` that declared the continuation, when known.
        referenced_from: Option<String>,
    },

    /// Two simultaneously reachable blocks define the same word.
    #[error("ambiguous grammar: word '{word}' is defined by {}", blocks.join(" and "))]
    AmbiguousGrammar {
        /// The colliding word name.
        word: String,
        /// The blocks that all define the word.
        blocks: Vec<String>,
    },

    /// The requested word cannot be resolved at this position.
    #[error("unknown word: {0}")]
    UnknownWord(String),

    /// A word was called but does not accept parameters.
    #[error("word '{0}' is not callable")]
    NotCallable(String),

    /// A parametric word was accessed without being called.
    #[error("word '{0}' expects parameters")]
    ParametersExpected(String),

    /// The result was requested at a position that does not reach it.
    #[error("the result is not reachable from this position")]
    ResultNotReachable,

    /// Two blocks were registered under the same name.
    #[error("duplicate block: {0}")]
    DuplicateBlock(String),

    /// A root dictionary was requested from a grammar without initial blocks.
    #[error("grammar declares no initial blocks")]
    NoInitialBlocks,

    /// A word's handler found a parameter of the wrong type.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// What the handler wanted.
        expected: Type,
        /// What it got.
        actual: Type,
    },

    /// A word's handler rejected the parameter count.
    #[error("arity mismatch: expected {expected}, got {actual}")]
    ArityMismatch {
        /// The accepted count, e.g. `exactly 2`.
        expected: String,
        /// The count passed.
        actual: usize,
    },

    /// A chain or call outgrew a configured limit.
    #[error("limit exceeded: {0}")]
    LimitExceeded(SemanticLimit),

    /// A broken invariant inside the engine itself.
    #[error("engine fault: {0}")]
    Internal(String),
}

/// The configurable limits a traversal can hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SemanticLimit {
    /// Maximum number of recorded word-uses per chain exceeded.
    MaxChainLength {
        /// The configured limit.
        limit: usize,
    },
    /// Maximum number of parameters per call exceeded.
    MaxParameters {
        /// The configured limit.
        limit: usize,
        /// Number of parameters that were passed.
        actual: usize,
    },
}

impl fmt::Display for SemanticLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaxChainLength { limit } => {
                write!(f, "max chain length ({limit}) exceeded")
            }
            Self::MaxParameters { limit, actual } => {
                write!(f, "max parameters ({limit}) exceeded: got {actual}")
            }
        }
    }
}

/// Context about where in a traversal an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The block owning the word being resolved.
    pub block: Option<String>,
    /// The word being resolved.
    pub word: Option<String>,
    /// The word path recorded before the failing step, e.g. `A.then.X(10)`.
    pub path: Option<String>,
}

impl ErrorContext {
    /// An empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the block.
    #[must_use]
    pub fn with_block(mut self, block: impl Into<String>) -> Self {
        self.block = Some(block.into());
        self
    }

    /// Sets the word.
    #[must_use]
    pub fn with_word(mut self, word: impl Into<String>) -> Self {
        self.word = Some(word.into());
        self
    }

    /// Sets the recorded path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.block, &self.word) {
            (Some(block), Some(word)) => write!(f, "at {block}.{word}")?,
            (None, Some(word)) => write!(f, "at {word}")?,
            (Some(block), None) => write!(f, "in {block}")?,
            (None, None) => {}
        }
        if let Some(path) = &self.path {
            if path.is_empty() {
                write!(f, " (after <start>)")?;
            } else {
                write!(f, " (after {path})")?;
            }
        }
        Ok(())
    }
}
