//! The semantic: a compiled grammar ready to be traversed.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use semantium_foundation::Result;
use semantium_grammar::{Continuation, Grammar, GrammarDefinition};

use crate::chain::{ChainElement, InstructionChain};
use crate::dispatcher::Dispatcher;
use crate::entry::EntryDictionary;
use crate::observer::{ChainId, TraversalObserver};

/// A chain together with the ID it is traced under.
pub(crate) struct ChainHandle<C> {
    pub(crate) id: ChainId,
    pub(crate) chain: Rc<RefCell<C>>,
}

impl<C> Clone for ChainHandle<C> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            chain: Rc::clone(&self.chain),
        }
    }
}

/// State shared by every dispatcher of one semantic.
pub(crate) struct SemanticCore<C> {
    pub(crate) grammar: Grammar<C>,
    observer: RefCell<Option<Rc<dyn TraversalObserver>>>,
    next_chain: Cell<u64>,
}

impl<C: InstructionChain> SemanticCore<C> {
    /// Registers a caller-supplied or freshly built chain.
    pub(crate) fn adopt(&self, chain: C) -> ChainHandle<C> {
        let id = self.mint();
        self.observe(|o| o.chain_created(id));
        ChainHandle {
            id,
            chain: Rc::new(RefCell::new(chain)),
        }
    }

    /// Forks `source` through `through`.
    pub(crate) fn fork(
        &self,
        source: &ChainHandle<C>,
        through: Option<&Rc<ChainElement>>,
    ) -> ChainHandle<C> {
        let forked = source.chain.borrow().fork(through);
        let id = self.mint();
        let depth = through.map_or(0, |e| e.depth());
        self.observe(|o| o.chain_forked(source.id, id, depth));
        ChainHandle {
            id,
            chain: Rc::new(RefCell::new(forked)),
        }
    }

    pub(crate) fn observe(&self, f: impl FnOnce(&dyn TraversalObserver)) {
        let observer = self.observer.borrow().clone();
        if let Some(observer) = observer {
            f(observer.as_ref());
        }
    }

    fn mint(&self) -> ChainId {
        let raw = self.next_chain.get() + 1;
        self.next_chain.set(raw);
        ChainId::new(raw)
    }
}

/// A compiled grammar and the entry points into it.
///
/// Cloning is cheap; clones share the grammar, the observer, and the chain
/// ID sequence.
pub struct Semantic<C: InstructionChain> {
    core: Rc<SemanticCore<C>>,
}

impl<C: InstructionChain> Semantic<C> {
    /// Compiles a grammar definition.
    ///
    /// # Errors
    ///
    /// Returns any error from [`Grammar::compile`].
    pub fn define(definition: GrammarDefinition<C>) -> Result<Self> {
        Ok(Self {
            core: Rc::new(SemanticCore {
                grammar: Grammar::compile(definition)?,
                observer: RefCell::new(None),
                next_chain: Cell::new(0),
            }),
        })
    }

    /// Attaches an observer.
    #[must_use]
    pub fn with_observer(self, observer: Rc<dyn TraversalObserver>) -> Self {
        self.set_observer(Some(observer));
        self
    }

    /// Replaces or removes the observer.
    pub fn set_observer(&self, observer: Option<Rc<dyn TraversalObserver>>) {
        *self.core.observer.borrow_mut() = observer;
    }

    /// Returns the entry dictionary over the initial blocks.
    ///
    /// # Errors
    ///
    /// Returns `NoInitialBlocks`, or `AmbiguousGrammar` if two initial blocks
    /// share a word name.
    pub fn root(&self) -> Result<EntryDictionary<C>> {
        let continuation = self.core.grammar.entry_continuation()?;
        self.entry(self.generate_chain(), &continuation)
    }

    /// Returns an entry dictionary over the initial blocks whose traversals
    /// each start from a fork of `chain`.
    ///
    /// # Errors
    ///
    /// As [`root`](Self::root).
    pub fn primed_with(&self, chain: C) -> Result<EntryDictionary<C>> {
        let continuation = self.core.grammar.entry_continuation()?;
        self.entry(chain, &continuation)
    }

    /// Returns an entry dictionary rooted at arbitrary targets.
    ///
    /// # Errors
    ///
    /// Returns `UnknownContinuationBlock` or `AmbiguousGrammar`.
    pub fn continuation_with(&self, continuation: &Continuation) -> Result<EntryDictionary<C>> {
        self.entry(self.generate_chain(), continuation)
    }

    /// Builds a fresh chain with the grammar's chain builder.
    #[must_use]
    pub fn generate_chain(&self) -> C {
        self.core.grammar.new_chain()
    }

    /// Returns the compiled grammar.
    #[must_use]
    pub fn grammar(&self) -> &Grammar<C> {
        &self.core.grammar
    }

    fn entry(&self, chain: C, continuation: &Continuation) -> Result<EntryDictionary<C>> {
        let set = self.core.grammar.resolve(continuation, None)?;
        let handle = self.core.adopt(chain);
        Ok(EntryDictionary::new(Dispatcher::root(
            Rc::clone(&self.core),
            handle,
            set,
        )))
    }
}

impl<C: InstructionChain> Clone for Semantic<C> {
    fn clone(&self) -> Self {
        Self {
            core: Rc::clone(&self.core),
        }
    }
}

impl<C: InstructionChain> fmt::Debug for Semantic<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Semantic")
            .field("grammar", &self.core.grammar)
            .field("chains", &self.core.next_chain.get())
            .finish_non_exhaustive()
    }
}
