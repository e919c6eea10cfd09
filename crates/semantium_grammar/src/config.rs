//! Configuration for grammar compilation and traversal.

/// Configuration for a compiled grammar.
///
/// Controls eager validation, continuation caching, and the kill switches
/// applied while traversing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrammarConfig {
    /// Validate fixed continuations when the grammar is compiled.
    pub validate_continuations: bool,

    /// Memoize resolved continuation sets per target list.
    pub cache_continuations: bool,

    /// Maximum recorded word-uses per chain (None = unbounded).
    pub max_chain_length: Option<usize>,

    /// Maximum parameters per call (None = unbounded).
    pub max_parameters: Option<usize>,
}

impl Default for GrammarConfig {
    fn default() -> Self {
        Self {
            validate_continuations: true,
            cache_continuations: true,
            max_chain_length: None,
            max_parameters: None,
        }
    }
}

impl GrammarConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Eager validation with conservative limits, for untrusted grammars.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            validate_continuations: true,
            cache_continuations: true,
            max_chain_length: Some(10_000),
            max_parameters: Some(64),
        }
    }

    /// No eager validation, no caching, no limits.
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            validate_continuations: false,
            cache_continuations: false,
            max_chain_length: None,
            max_parameters: None,
        }
    }

    /// Builder method to toggle eager continuation validation.
    #[must_use]
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate_continuations = validate;
        self
    }

    /// Builder method to toggle continuation caching.
    #[must_use]
    pub fn with_cache(mut self, cache: bool) -> Self {
        self.cache_continuations = cache;
        self
    }

    /// Builder method to set the chain length limit.
    #[must_use]
    pub fn with_max_chain_length(mut self, limit: usize) -> Self {
        self.max_chain_length = Some(limit);
        self
    }

    /// Builder method to set the parameter count limit.
    #[must_use]
    pub fn with_max_parameters(mut self, limit: usize) -> Self {
        self.max_parameters = Some(limit);
        self
    }
}
