//! Instruction chains.
//!
//! An instruction chain is the append-only log of word uses recorded along
//! one traversal. Elements are immutable and linked backward only, so every
//! element identifies a prefix of the chain it was appended to. The only way
//! to "undo" part of a chain is to fork from an earlier element and replay
//! forward.

use std::fmt;
use std::rc::Rc;

use semantium_foundation::{LtVec, Value};
use semantium_grammar::{WordDescriptor, WordUse};

// =============================================================================
// Chain Elements
// =============================================================================

/// One recorded word use, linked to the use before it.
#[derive(Debug)]
pub struct ChainElement {
    word: WordUse,
    previous: Option<Rc<ChainElement>>,
    depth: usize,
}

impl ChainElement {
    /// Returns the recorded use.
    #[must_use]
    pub fn word(&self) -> &WordUse {
        &self.word
    }

    /// Returns the descriptor of the used word.
    #[must_use]
    pub fn descriptor(&self) -> &Rc<WordDescriptor> {
        self.word.descriptor()
    }

    /// Returns the call parameters, or `None` for a use by access.
    #[must_use]
    pub fn parameters(&self) -> Option<&LtVec<Value>> {
        self.word.parameters()
    }

    /// Returns the element recorded before this one.
    #[must_use]
    pub fn previous(&self) -> Option<&Rc<ChainElement>> {
        self.previous.as_ref()
    }

    /// Returns the 1-based position of this element in its chain.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns this element and every element before it, oldest first.
    #[must_use]
    pub fn lineage(self: &Rc<Self>) -> Vec<Rc<ChainElement>> {
        let mut elements = Vec::with_capacity(self.depth);
        let mut current = Some(self);
        while let Some(element) = current {
            elements.push(Rc::clone(element));
            current = element.previous.as_ref();
        }
        elements.reverse();
        elements
    }
}

impl fmt::Display for ChainElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.word)
    }
}

// =============================================================================
// History
// =============================================================================

/// The recorded elements of one chain.
#[derive(Clone, Debug, Default)]
pub struct History {
    first: Option<Rc<ChainElement>>,
    last: Option<Rc<ChainElement>>,
    len: usize,
}

impl History {
    /// Creates an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a use, linking it to the current last element.
    pub fn append(&mut self, word: WordUse) -> Rc<ChainElement> {
        let element = Rc::new(ChainElement {
            word,
            previous: self.last.take(),
            depth: self.len + 1,
        });
        if self.first.is_none() {
            self.first = Some(Rc::clone(&element));
        }
        self.last = Some(Rc::clone(&element));
        self.len += 1;
        element
    }

    /// Returns the first recorded element.
    #[must_use]
    pub fn first(&self) -> Option<&Rc<ChainElement>> {
        self.first.as_ref()
    }

    /// Returns the most recently recorded element.
    #[must_use]
    pub fn last(&self) -> Option<&Rc<ChainElement>> {
        self.last.as_ref()
    }

    /// Returns the number of recorded elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns every element, oldest first.
    #[must_use]
    pub fn elements(&self) -> Vec<Rc<ChainElement>> {
        self.last.as_ref().map(ChainElement::lineage).unwrap_or_default()
    }

    /// Returns every recorded use, oldest first.
    #[must_use]
    pub fn uses(&self) -> Vec<WordUse> {
        self.elements().iter().map(|e| e.word.clone()).collect()
    }

    /// Renders the recorded word path, e.g. `A.then.X(10)`.
    #[must_use]
    pub fn path(&self) -> String {
        path_through(self.last.as_ref())
    }
}

/// Renders the word path from the first element through `element`.
#[must_use]
pub fn path_through(element: Option<&Rc<ChainElement>>) -> String {
    let elements = element.map(ChainElement::lineage).unwrap_or_default();
    let mut path = String::new();
    for (i, element) in elements.iter().enumerate() {
        if i > 0 {
            path.push('.');
        }
        path.push_str(&element.to_string());
    }
    path
}

// =============================================================================
// Instruction Chain
// =============================================================================

/// A caller-defined recording of word uses.
///
/// Implementors own a [`History`] and may observe every append through
/// [`on_instruction`](Self::on_instruction). The chain decides what the
/// traversal finally yields through [`finalize_recording`](Self::finalize_recording).
///
/// # Example
///
/// ```
/// use std::rc::Rc;
/// use semantium_recording::{ChainElement, History, InstructionChain};
///
/// #[derive(Clone, Default)]
/// struct Sequence {
///     history: History,
///     text: String,
/// }
///
/// impl InstructionChain for Sequence {
///     type Output = String;
///
///     fn history(&self) -> &History { &self.history }
///     fn history_mut(&mut self) -> &mut History { &mut self.history }
///
///     fn on_instruction(&mut self, element: &Rc<ChainElement>) {
///         if !self.text.is_empty() {
///             self.text.push('.');
///         }
///         self.text.push_str(&element.to_string());
///     }
///
///     fn finalize_recording(&mut self) -> String { self.text.clone() }
///     fn fresh(&self) -> Self { Self::default() }
/// }
/// ```
pub trait InstructionChain: Sized + 'static {
    /// What a finished traversal yields.
    type Output;

    /// Returns the recorded elements.
    fn history(&self) -> &History;

    /// Returns the recorded elements for appending.
    fn history_mut(&mut self) -> &mut History;

    /// Called synchronously after every append, including replays.
    fn on_instruction(&mut self, _element: &Rc<ChainElement>) {}

    /// Produces the traversal's result. Called at most once per terminal
    /// position.
    fn finalize_recording(&mut self) -> Self::Output;

    /// Creates an empty chain of the same kind, carrying over any state a
    /// fork should start from.
    fn fresh(&self) -> Self;

    /// Creates an independent chain holding every element from the first
    /// through `through`. `None` forks before the first element.
    ///
    /// Never mutates `self`.
    fn fork(&self, through: Option<&Rc<ChainElement>>) -> Self {
        let mut chain = self.fresh();
        replay_into(&mut chain, through);
        chain
    }

    /// Forks through the current last element.
    fn fork_at_tip(&self) -> Self {
        self.fork(self.history().last())
    }

    /// Appends a use and fires [`on_instruction`](Self::on_instruction).
    fn append(&mut self, word: WordUse) -> Rc<ChainElement> {
        let element = self.history_mut().append(word);
        self.on_instruction(&element);
        element
    }
}

/// Re-appends every element from the start of `through`'s chain up to and
/// including `through` onto `target`, firing its hook for each.
pub fn replay_into<C: InstructionChain>(target: &mut C, through: Option<&Rc<ChainElement>>) {
    if let Some(through) = through {
        for element in through.lineage() {
            target.append(element.word.clone());
        }
    }
}
