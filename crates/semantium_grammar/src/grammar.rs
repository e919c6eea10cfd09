//! Compiled grammars.
//!
//! A [`Grammar`] owns the block registry, the compiled catalog, and the
//! continuation resolver. It is immutable after [`Grammar::compile`] and is
//! shared by every traversal; all per-traversal state lives on the chain.

use std::fmt;
use std::rc::Rc;

use semantium_foundation::{Error, ErrorKind, Result, SemanticLimit, Value};

use crate::block::BlockDefinition;
use crate::catalog::{Catalog, WordDescriptor, WordUse};
use crate::config::GrammarConfig;
use crate::continuation::{ContinuationResolver, ContinuationSet, ResolverStats};
use crate::registry::BlockRegistry;
use crate::target::{Continuation, Target};

/// Produces a fresh chain for each new traversal.
pub type ChainBuilder<C> = Rc<dyn Fn() -> C>;

/// Declarative input to the catalog compiler.
pub struct GrammarDefinition<C> {
    blocks: Vec<BlockDefinition<C>>,
    chain_builder: ChainBuilder<C>,
    config: GrammarConfig,
}

impl<C> GrammarDefinition<C> {
    /// Starts a definition whose traversals record into chains built by
    /// `chain_builder`.
    pub fn new<F>(chain_builder: F) -> Self
    where
        F: Fn() -> C + 'static,
    {
        Self {
            blocks: Vec::new(),
            chain_builder: Rc::new(chain_builder),
            config: GrammarConfig::default(),
        }
    }

    /// Adds a block.
    #[must_use]
    pub fn block(mut self, block: BlockDefinition<C>) -> Self {
        self.blocks.push(block);
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn with_config(mut self, config: GrammarConfig) -> Self {
        self.config = config;
        self
    }
}

impl<C: Default + 'static> Default for GrammarDefinition<C> {
    fn default() -> Self {
        Self::new(C::default)
    }
}

/// A compiled grammar.
pub struct Grammar<C> {
    registry: BlockRegistry<C>,
    catalog: Catalog,
    resolver: ContinuationResolver,
    chain_builder: ChainBuilder<C>,
    config: GrammarConfig,
}

impl<C> Grammar<C> {
    /// Compiles a grammar definition.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateBlock`, `UnsupportedWordDefinition`, or (with
    /// eager validation) `UnknownContinuationBlock`.
    pub fn compile(definition: GrammarDefinition<C>) -> Result<Self> {
        let GrammarDefinition {
            blocks,
            chain_builder,
            config,
        } = definition;

        let mut registry = BlockRegistry::new();
        for block in blocks {
            registry.register(block)?;
        }
        let catalog = Catalog::compile(&registry, config.validate_continuations)?;

        Ok(Self {
            registry,
            catalog,
            resolver: ContinuationResolver::new(config.cache_continuations),
            chain_builder,
            config,
        })
    }

    /// Returns the continuation over every initial block.
    ///
    /// # Errors
    ///
    /// Returns `NoInitialBlocks` if no block is marked initial.
    pub fn entry_continuation(&self) -> Result<Continuation> {
        let initial = self.registry.initial_blocks();
        if initial.is_empty() {
            return Err(Error::new(ErrorKind::NoInitialBlocks));
        }
        Ok(initial
            .iter()
            .filter_map(|id| self.registry.name_of(*id))
            .map(|name| Target::Block(name.clone()))
            .collect())
    }

    /// Resolves a continuation to its shared continuation set.
    ///
    /// # Errors
    ///
    /// Returns `UnknownContinuationBlock` or `AmbiguousGrammar`.
    pub fn resolve(
        &self,
        continuation: &Continuation,
        referenced_from: Option<&WordDescriptor>,
    ) -> Result<Rc<ContinuationSet>> {
        self.resolver
            .resolve(&self.catalog, continuation, referenced_from)
    }

    /// Evaluates the accessed side of a static or hybrid word.
    ///
    /// # Errors
    ///
    /// Returns `ParametersExpected` for a parametric word,
    /// `UnsupportedWordDefinition` if a getter names no target, or whatever
    /// the getter returns.
    pub fn evaluate_access(&self, word: &WordDescriptor, chain: &mut C) -> Result<Continuation> {
        let definition = self.definition(word)?;
        match definition.accessed() {
            Some(accessed) => accessed.evaluate(chain).and_then(|c| non_empty(word, c)),
            None => Err(Error::parameters_expected(&*word.name)),
        }
    }

    /// Evaluates the called side of a parametric or hybrid word.
    ///
    /// # Errors
    ///
    /// Returns `NotCallable` for a static word, `UnsupportedWordDefinition`
    /// if the handler names no target, or whatever the handler returns.
    pub fn evaluate_call(
        &self,
        word: &WordDescriptor,
        chain: &mut C,
        args: &[Value],
    ) -> Result<Continuation> {
        let definition = self.definition(word)?;
        match definition.called() {
            Some(handler) => handler(chain, args).and_then(|c| non_empty(word, c)),
            None => Err(Error::not_callable(&*word.name)),
        }
    }

    /// Fires the owning block's use hook, if it has one.
    pub fn notify_word_use(&self, word_use: &WordUse, chain: &mut C) {
        let hook = self
            .registry
            .get(word_use.descriptor().block)
            .and_then(|block| block.word_use_hook());
        if let Some(hook) = hook {
            hook(chain, word_use);
        }
    }

    /// Checks the chain length kill switch before an append.
    ///
    /// # Errors
    ///
    /// Returns `LimitExceeded` if one more element would exceed the limit.
    pub fn check_chain_length(&self, current: usize) -> Result<()> {
        match self.config.max_chain_length {
            Some(limit) if current >= limit => Err(Error::limit_exceeded(
                SemanticLimit::MaxChainLength { limit },
            )),
            _ => Ok(()),
        }
    }

    /// Checks the parameter count kill switch.
    ///
    /// # Errors
    ///
    /// Returns `LimitExceeded` if `count` exceeds the limit.
    pub fn check_parameters(&self, count: usize) -> Result<()> {
        match self.config.max_parameters {
            Some(limit) if count > limit => Err(Error::limit_exceeded(
                SemanticLimit::MaxParameters {
                    limit,
                    actual: count,
                },
            )),
            _ => Ok(()),
        }
    }

    /// Builds a fresh chain.
    #[must_use]
    pub fn new_chain(&self) -> C {
        (self.chain_builder)()
    }

    /// Returns the words that may start a traversal, in block order.
    #[must_use]
    pub fn initial_words(&self) -> Vec<Rc<WordDescriptor>> {
        self.registry
            .initial_blocks()
            .iter()
            .flat_map(|id| self.catalog.block_words(*id).iter().cloned())
            .collect()
    }

    /// Returns the compiled catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Returns the block registry.
    #[must_use]
    pub fn registry(&self) -> &BlockRegistry<C> {
        &self.registry
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &GrammarConfig {
        &self.config
    }

    /// Returns continuation resolution statistics.
    #[must_use]
    pub fn resolver_stats(&self) -> ResolverStats {
        self.resolver.stats()
    }

    fn definition(&self, word: &WordDescriptor) -> Result<&crate::block::WordDefinition<C>> {
        self.registry
            .get(word.block)
            .and_then(|block| block.word_at(word.index))
            .ok_or_else(|| {
                Error::new(ErrorKind::Internal(format!(
                    "descriptor {} does not belong to this grammar",
                    word.qualified_name()
                )))
            })
    }
}

/// A runtime continuation must name a target, like a fixed one.
fn non_empty(word: &WordDescriptor, continuation: Continuation) -> Result<Continuation> {
    if continuation.is_empty() {
        Err(Error::unsupported_word(
            &*word.block_name,
            &*word.name,
            "continuation names no target",
        ))
    } else {
        Ok(continuation)
    }
}

impl<C> fmt::Debug for Grammar<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grammar")
            .field("registry", &self.registry)
            .field("words", &self.catalog.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
