//! The traversal dispatcher.
//!
//! A [`Dispatcher`] is one position in a traversal: a chain, the element it
//! had when the position was created, and the continuation set reachable
//! from there. Every step returns a new value; dispatchers are never
//! mutated into the next position.
//!
//! # Fork on reuse
//!
//! The first access or call through a position operates on the chain it
//! holds. Every later one first forks that chain through the position's
//! origin element, so reusing a position never disturbs a traversal that
//! already continued from it.
//!
//! # Failure
//!
//! Name resolution, calling convention, and parameter limits are checked
//! before the chain is touched; such failures leave the position unused.
//! When a handler or the continuation lookup fails after the append, the
//! acquired chain is rebuilt through the position's origin, so the failed
//! element and its hook effects are never visible through any dispatcher.
//! The position still counts as consulted and the next step through it
//! forks.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use semantium_foundation::{Error, ErrorContext, ErrorKind, Result, Value};
use semantium_grammar::{
    Continuation, ContinuationSet, Grammar, Resolution, WordDescriptor, WordKind, WordUse,
};

use crate::chain::{ChainElement, InstructionChain, path_through};
use crate::observer::ChainId;
use crate::semantic::{ChainHandle, SemanticCore};

/// Lifecycle of one traversal position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchState {
    /// Nothing has been done through this position yet.
    Unconsulted,
    /// A step has used the held chain; later steps fork.
    Consulted,
    /// The result has been produced and memoized.
    Finalized,
}

// =============================================================================
// Position
// =============================================================================

/// The chain bookkeeping shared by dispatchers and pending words.
struct Position<C: InstructionChain> {
    core: Rc<SemanticCore<C>>,
    chain: ChainHandle<C>,
    origin: Option<Rc<ChainElement>>,
    state: Cell<DispatchState>,
}

impl<C: InstructionChain> Position<C> {
    fn new(core: Rc<SemanticCore<C>>, chain: ChainHandle<C>, state: DispatchState) -> Self {
        let origin = chain.chain.borrow().history().last().cloned();
        Self {
            core,
            chain,
            origin,
            state: Cell::new(state),
        }
    }

    fn grammar(&self) -> &Grammar<C> {
        &self.core.grammar
    }

    /// Returns the chain to operate on, forking if this position was used.
    fn acquire(&self) -> ChainHandle<C> {
        match self.state.get() {
            DispatchState::Unconsulted => {
                self.state.set(DispatchState::Consulted);
                self.chain.clone()
            }
            DispatchState::Consulted | DispatchState::Finalized => {
                self.core.fork(&self.chain, self.origin.as_ref())
            }
        }
    }

    /// Consumes this position without appending, for a pending word.
    fn descend(&self) -> Self {
        let chain = self.acquire();
        Self::new(Rc::clone(&self.core), chain, DispatchState::Unconsulted)
    }

    fn access(&self, word: &Rc<WordDescriptor>) -> Result<Dispatcher<C>> {
        let use_ = WordUse::accessed(Rc::clone(word));
        self.record(word, use_, |grammar, chain| {
            grammar.evaluate_access(word, chain)
        })
    }

    fn call(&self, word: &Rc<WordDescriptor>, args: &[Value]) -> Result<Dispatcher<C>> {
        if !word.kind.is_callable() {
            return Err(self.fail(word_context(word), Error::not_callable(&*word.name)));
        }
        if let Err(err) = self.grammar().check_parameters(args.len()) {
            return Err(self.fail(word_context(word), err));
        }
        let use_ = WordUse::called(Rc::clone(word), args.iter().cloned());
        self.record(word, use_, |grammar, chain| {
            grammar.evaluate_call(word, chain, args)
        })
    }

    /// Appends `use_` to the acquired chain, fires the hooks, evaluates the
    /// word, and resolves the next position.
    fn record<F>(
        &self,
        word: &Rc<WordDescriptor>,
        use_: WordUse,
        evaluate: F,
    ) -> Result<Dispatcher<C>>
    where
        F: FnOnce(&Grammar<C>, &mut C) -> Result<Continuation>,
    {
        let handle = self.acquire();
        match self.step(&handle, word, &use_, evaluate) {
            Ok(set) => Ok(Dispatcher::new(
                Position::new(Rc::clone(&self.core), handle, DispatchState::Unconsulted),
                set,
            )),
            Err(err) => Err(self.fail_on(handle.id, word_context(word), err)),
        }
    }

    fn step<F>(
        &self,
        handle: &ChainHandle<C>,
        word: &WordDescriptor,
        use_: &WordUse,
        evaluate: F,
    ) -> Result<Rc<ContinuationSet>>
    where
        F: FnOnce(&Grammar<C>, &mut C) -> Result<Continuation>,
    {
        let grammar = self.grammar();
        let mut chain = handle.chain.borrow_mut();
        grammar.check_chain_length(chain.history().len())?;

        let element = chain.append(use_.clone());
        self.core.observe(|o| o.word_used(handle.id, &element));
        grammar.notify_word_use(use_, &mut *chain);

        let resolved = evaluate(grammar, &mut *chain)
            .and_then(|continuation| grammar.resolve(&continuation, Some(word)));
        if resolved.is_err() {
            // Back to the state at this position's origin; replays are not observed.
            let restored = chain.fork(self.origin.as_ref());
            *chain = restored;
        }
        resolved
    }

    fn fail(&self, context: ErrorContext, err: Error) -> Error {
        self.fail_on(self.chain.id, context, err)
    }

    fn fail_on(&self, chain: ChainId, context: ErrorContext, err: Error) -> Error {
        let err = err.with_context(context.with_path(path_through(self.origin.as_ref())));
        self.core.observe(|o| o.resolution_failed(chain, &err));
        err
    }
}

fn word_context(word: &WordDescriptor) -> ErrorContext {
    ErrorContext::new()
        .with_block(&*word.block_name)
        .with_word(&*word.name)
}

// =============================================================================
// Dispatcher
// =============================================================================

/// What a word resolves to at a position.
pub enum Step<C: InstructionChain> {
    /// A static word was used; the traversal continues here.
    Next(Dispatcher<C>),
    /// A parametric word awaiting its parameters.
    Parametric(ParametricWord<C>),
    /// A hybrid word, usable by access or call.
    Hybrid(HybridWord<C>),
    /// The name was not a word and the result is reachable.
    Result(Rc<C::Output>),
}

impl<C: InstructionChain> Step<C> {
    /// Returns the next dispatcher, if a static word was used.
    #[must_use]
    pub fn into_dispatcher(self) -> Option<Dispatcher<C>> {
        match self {
            Self::Next(d) => Some(d),
            _ => None,
        }
    }

    /// Returns the finalized result, if the name reached it.
    #[must_use]
    pub fn into_result(self) -> Option<Rc<C::Output>> {
        match self {
            Self::Result(r) => Some(r),
            _ => None,
        }
    }

    /// Returns true if this step is the finalized result.
    #[must_use]
    pub fn is_result(&self) -> bool {
        matches!(self, Self::Result(_))
    }
}

impl<C: InstructionChain> fmt::Debug for Step<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Next(d) => write!(f, "Next({d:?})"),
            Self::Parametric(w) => write!(f, "Parametric({})", w.descriptor),
            Self::Hybrid(w) => write!(f, "Hybrid({})", w.descriptor),
            Self::Result(_) => write!(f, "Result"),
        }
    }
}

/// One position in a traversal.
pub struct Dispatcher<C: InstructionChain> {
    position: Position<C>,
    continuation: Rc<ContinuationSet>,
    finalized: RefCell<Option<Rc<C::Output>>>,
}

impl<C: InstructionChain> Dispatcher<C> {
    fn new(position: Position<C>, continuation: Rc<ContinuationSet>) -> Self {
        Self {
            position,
            continuation,
            finalized: RefCell::new(None),
        }
    }

    /// The root of an entry dictionary: every step forks.
    pub(crate) fn root(
        core: Rc<SemanticCore<C>>,
        chain: ChainHandle<C>,
        continuation: Rc<ContinuationSet>,
    ) -> Self {
        Self::new(
            Position::new(core, chain, DispatchState::Consulted),
            continuation,
        )
    }

    /// Resolves a name at this position.
    ///
    /// A static word is used immediately. Parametric and hybrid words
    /// consume this position and wait for [`ParametricWord::call`] or a
    /// [`HybridWord`] step. Any other name reaches the result if it is
    /// reachable.
    ///
    /// # Errors
    ///
    /// Returns `UnknownWord` if the name is neither a reachable word nor a
    /// reachable result, or any error raised while using the word.
    pub fn word(&self, name: &str) -> Result<Step<C>> {
        match self.continuation.resolve(name) {
            Resolution::Instruction(word) => match word.kind {
                WordKind::Static => self.position.access(word).map(Step::Next),
                WordKind::Parametric => Ok(Step::Parametric(ParametricWord {
                    position: self.position.descend(),
                    descriptor: Rc::clone(word),
                })),
                WordKind::Hybrid => Ok(Step::Hybrid(HybridWord {
                    position: self.position.descend(),
                    descriptor: Rc::clone(word),
                })),
            },
            Resolution::Result => self.result().map(Step::Result),
            Resolution::Invalid => Err(self.unknown(name)),
        }
    }

    /// Uses a static or hybrid word by access.
    ///
    /// # Errors
    ///
    /// Returns `UnknownWord` for a name that is not a reachable word,
    /// `ParametersExpected` for a parametric word, or any error raised while
    /// using the word.
    pub fn get(&self, name: &str) -> Result<Dispatcher<C>> {
        let word = self.lookup(name)?;
        if !word.kind.is_accessible() {
            return Err(self
                .position
                .fail(word_context(word), Error::parameters_expected(name)));
        }
        self.position.access(word)
    }

    /// Uses a parametric or hybrid word by call.
    ///
    /// # Errors
    ///
    /// Returns `UnknownWord` for a name that is not a reachable word,
    /// `NotCallable` for a static word, or any error raised while using the
    /// word.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Dispatcher<C>> {
        let word = self.lookup(name)?;
        self.position.call(word, args)
    }

    /// Finalizes the chain and returns the result, once per dispatcher.
    ///
    /// # Errors
    ///
    /// Returns `ResultNotReachable` if the last word did not grant access to
    /// the result.
    pub fn result(&self) -> Result<Rc<C::Output>> {
        if let Some(output) = self.finalized.borrow().as_ref() {
            return Ok(Rc::clone(output));
        }
        if !self.continuation.allows_result_access() {
            return Err(self.position.fail(
                ErrorContext::new(),
                Error::new(ErrorKind::ResultNotReachable),
            ));
        }

        let handle = self.position.acquire();
        let (output, depth) = {
            let mut chain = handle.chain.borrow_mut();
            (chain.finalize_recording(), chain.history().len())
        };
        self.position.state.set(DispatchState::Finalized);
        self.position
            .core
            .observe(|o| o.finalized(handle.id, depth));

        let output = Rc::new(output);
        *self.finalized.borrow_mut() = Some(Rc::clone(&output));
        Ok(output)
    }

    /// Returns a dispatcher with the same continuation over another chain.
    ///
    /// Only words used from the returned dispatcher onward are appended to
    /// `chain`.
    #[must_use]
    pub fn substitute_chain(&self, chain: C) -> Dispatcher<C> {
        let core = Rc::clone(&self.position.core);
        let handle = core.adopt(chain);
        Dispatcher::new(
            Position::new(core, handle, DispatchState::Unconsulted),
            Rc::clone(&self.continuation),
        )
    }

    /// Returns the names of the words reachable from here.
    #[must_use]
    pub fn available_words(&self) -> Vec<&str> {
        self.continuation
            .words()
            .iter()
            .map(|w| &*w.name)
            .collect()
    }

    /// Returns true if the result is reachable from here.
    #[must_use]
    pub fn allows_result(&self) -> bool {
        self.continuation.allows_result_access()
    }

    /// Returns the continuation set at this position.
    #[must_use]
    pub fn continuation(&self) -> &ContinuationSet {
        &self.continuation
    }

    /// Returns the lifecycle state of this position.
    #[must_use]
    pub fn state(&self) -> DispatchState {
        self.position.state.get()
    }

    /// Returns the ID of the chain held by this position.
    #[must_use]
    pub fn chain_id(&self) -> ChainId {
        self.position.chain.id
    }

    /// Returns the last element recorded when this position was created.
    #[must_use]
    pub fn origin(&self) -> Option<&Rc<ChainElement>> {
        self.position.origin.as_ref()
    }

    /// Renders the word path leading to this position.
    #[must_use]
    pub fn path(&self) -> String {
        path_through(self.position.origin.as_ref())
    }

    /// Runs `f` against the held chain.
    ///
    /// # Panics
    ///
    /// Panics if called from inside a word handler running on the same
    /// chain.
    pub fn inspect<R>(&self, f: impl FnOnce(&C) -> R) -> R {
        f(&self.position.chain.chain.borrow())
    }

    fn lookup(&self, name: &str) -> Result<&Rc<WordDescriptor>> {
        match self.continuation.resolve(name) {
            Resolution::Instruction(word) => Ok(word),
            Resolution::Result | Resolution::Invalid => Err(self.unknown(name)),
        }
    }

    fn unknown(&self, name: &str) -> Error {
        self.position
            .fail(ErrorContext::new().with_word(name), Error::unknown_word(name))
    }
}

impl<C: InstructionChain> fmt::Debug for Dispatcher<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("chain", &self.position.chain.id)
            .field("path", &self.path())
            .field("continuation", &self.continuation.to_string())
            .field("state", &self.state())
            .finish()
    }
}

// =============================================================================
// Pending Words
// =============================================================================

/// A parametric word waiting for its parameters.
pub struct ParametricWord<C: InstructionChain> {
    position: Position<C>,
    descriptor: Rc<WordDescriptor>,
}

impl<C: InstructionChain> ParametricWord<C> {
    /// Calls the word. Calling again forks.
    ///
    /// # Errors
    ///
    /// Returns any error raised while using the word.
    pub fn call(&self, args: &[Value]) -> Result<Dispatcher<C>> {
        self.position.call(&self.descriptor, args)
    }

    /// Always fails: parameters must be supplied before continuing.
    ///
    /// # Errors
    ///
    /// Returns `ParametersExpected`.
    pub fn word(&self, _name: &str) -> Result<Step<C>> {
        Err(self.position.fail(
            word_context(&self.descriptor),
            Error::parameters_expected(&*self.descriptor.name),
        ))
    }

    /// Returns the descriptor of the pending word.
    #[must_use]
    pub fn descriptor(&self) -> &Rc<WordDescriptor> {
        &self.descriptor
    }
}

/// A hybrid word: use it by access or by call.
pub struct HybridWord<C: InstructionChain> {
    position: Position<C>,
    descriptor: Rc<WordDescriptor>,
}

impl<C: InstructionChain> HybridWord<C> {
    /// Uses the word by access.
    ///
    /// # Errors
    ///
    /// Returns any error raised while using the word.
    pub fn accessed(&self) -> Result<Dispatcher<C>> {
        self.position.access(&self.descriptor)
    }

    /// Uses the word by call.
    ///
    /// # Errors
    ///
    /// Returns any error raised while using the word.
    pub fn call(&self, args: &[Value]) -> Result<Dispatcher<C>> {
        self.position.call(&self.descriptor, args)
    }

    /// Uses the word by access, then resolves `name` after it.
    ///
    /// # Errors
    ///
    /// As [`accessed`](Self::accessed) and [`Dispatcher::word`].
    pub fn word(&self, name: &str) -> Result<Step<C>> {
        self.accessed()?.word(name)
    }

    /// Uses the word by access, then uses the static or hybrid word `name`
    /// by access.
    ///
    /// # Errors
    ///
    /// As [`accessed`](Self::accessed) and [`Dispatcher::get`].
    pub fn get(&self, name: &str) -> Result<Dispatcher<C>> {
        self.accessed()?.get(name)
    }

    /// Uses the word by access and finalizes.
    ///
    /// # Errors
    ///
    /// As [`accessed`](Self::accessed) and [`Dispatcher::result`].
    pub fn result(&self) -> Result<Rc<C::Output>> {
        self.accessed()?.result()
    }

    /// Returns the descriptor of the pending word.
    #[must_use]
    pub fn descriptor(&self) -> &Rc<WordDescriptor> {
        &self.descriptor
    }
}
