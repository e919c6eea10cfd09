//! Block authoring.
//!
//! A block is a named table of words. Each word declares its calling
//! convention explicitly; nothing is discovered by introspection.
//!
//! Word handlers receive the active chain as `&mut C` for the duration of
//! one evaluation, so a handler can record domain state on the chain
//! without any shared "current chain" slot on the block.

use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use semantium_foundation::{Result, Value};

use crate::catalog::{WordKind, WordUse};
use crate::target::{BlockName, Continuation};

/// Lazily evaluated continuation of an accessed word.
pub type Getter<C> = Rc<dyn Fn(&mut C) -> Result<Continuation>>;

/// Continuation computed from call parameters.
pub type Handler<C> = Rc<dyn Fn(&mut C, &[Value]) -> Result<Continuation>>;

/// Hook fired whenever any word of a block is used.
pub type WordUseHook<C> = Rc<dyn Fn(&mut C, &WordUse)>;

/// What an accessed (non-called) word continues with.
pub enum Accessed<C> {
    /// A fixed continuation, validated when the grammar is compiled.
    Fixed(Continuation),
    /// A zero-argument function evaluated only when the word is accessed.
    Getter(Getter<C>),
}

impl<C> Accessed<C> {
    /// Creates a fixed continuation.
    #[must_use]
    pub fn fixed(continuation: Continuation) -> Self {
        Self::Fixed(continuation)
    }

    /// Creates a lazily evaluated continuation.
    pub fn getter<F>(f: F) -> Self
    where
        F: Fn(&mut C) -> Result<Continuation> + 'static,
    {
        Self::Getter(Rc::new(f))
    }

    /// Returns the fixed continuation, if this is not a getter.
    #[must_use]
    pub fn as_fixed(&self) -> Option<&Continuation> {
        match self {
            Self::Fixed(c) => Some(c),
            Self::Getter(_) => None,
        }
    }

    pub(crate) fn evaluate(&self, chain: &mut C) -> Result<Continuation> {
        match self {
            Self::Fixed(c) => Ok(c.clone()),
            Self::Getter(getter) => getter(chain),
        }
    }
}

impl<C> Clone for Accessed<C> {
    fn clone(&self) -> Self {
        match self {
            Self::Fixed(c) => Self::Fixed(c.clone()),
            Self::Getter(g) => Self::Getter(Rc::clone(g)),
        }
    }
}

impl<C> From<Continuation> for Accessed<C> {
    fn from(continuation: Continuation) -> Self {
        Self::Fixed(continuation)
    }
}

impl<C> fmt::Debug for Accessed<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(c) => write!(f, "Fixed({c})"),
            Self::Getter(_) => write!(f, "Getter"),
        }
    }
}

/// The definition of one word on a block.
pub enum WordDefinition<C> {
    /// Used by plain access.
    Static(Accessed<C>),
    /// Used by calling with parameters.
    Parametric(Handler<C>),
    /// Usable both ways.
    Hybrid {
        /// Continuation when accessed.
        accessed: Accessed<C>,
        /// Continuation when called.
        called: Handler<C>,
    },
}

impl<C> WordDefinition<C> {
    /// A static word with a fixed continuation.
    #[must_use]
    pub fn to(continuation: Continuation) -> Self {
        Self::Static(Accessed::Fixed(continuation))
    }

    /// A static word whose continuation is computed on access.
    pub fn getter<F>(f: F) -> Self
    where
        F: Fn(&mut C) -> Result<Continuation> + 'static,
    {
        Self::Static(Accessed::getter(f))
    }

    /// A parametric word.
    pub fn parametric<F>(f: F) -> Self
    where
        F: Fn(&mut C, &[Value]) -> Result<Continuation> + 'static,
    {
        Self::Parametric(Rc::new(f))
    }

    /// A hybrid word.
    pub fn hybrid<F>(accessed: impl Into<Accessed<C>>, called: F) -> Self
    where
        F: Fn(&mut C, &[Value]) -> Result<Continuation> + 'static,
    {
        Self::Hybrid {
            accessed: accessed.into(),
            called: Rc::new(called),
        }
    }

    /// Returns the calling convention of this word.
    #[must_use]
    pub fn kind(&self) -> WordKind {
        match self {
            Self::Static(_) => WordKind::Static,
            Self::Parametric(_) => WordKind::Parametric,
            Self::Hybrid { .. } => WordKind::Hybrid,
        }
    }

    /// Returns the accessed side of a static or hybrid word.
    #[must_use]
    pub fn accessed(&self) -> Option<&Accessed<C>> {
        match self {
            Self::Static(accessed) | Self::Hybrid { accessed, .. } => Some(accessed),
            Self::Parametric(_) => None,
        }
    }

    /// Returns the called side of a parametric or hybrid word.
    #[must_use]
    pub fn called(&self) -> Option<&Handler<C>> {
        match self {
            Self::Parametric(called) | Self::Hybrid { called, .. } => Some(called),
            Self::Static(_) => None,
        }
    }
}

impl<C> Clone for WordDefinition<C> {
    fn clone(&self) -> Self {
        match self {
            Self::Static(a) => Self::Static(a.clone()),
            Self::Parametric(h) => Self::Parametric(Rc::clone(h)),
            Self::Hybrid { accessed, called } => Self::Hybrid {
                accessed: accessed.clone(),
                called: Rc::clone(called),
            },
        }
    }
}

impl<C> fmt::Debug for WordDefinition<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(a) => write!(f, "Static({a:?})"),
            Self::Parametric(_) => write!(f, "Parametric"),
            Self::Hybrid { accessed, .. } => write!(f, "Hybrid({accessed:?})"),
        }
    }
}

/// A block declaration: a name, its words, and an optional use hook.
pub struct BlockDefinition<C> {
    name: BlockName,
    initial: bool,
    words: Vec<(Arc<str>, WordDefinition<C>)>,
    on_word_use: Option<WordUseHook<C>>,
}

impl<C> BlockDefinition<C> {
    /// Declares a block that can only be reached through a continuation.
    pub fn new(name: impl Into<BlockName>) -> Self {
        Self {
            name: name.into(),
            initial: false,
            words: Vec::new(),
            on_word_use: None,
        }
    }

    /// Declares a block whose words may start a traversal.
    pub fn initial(name: impl Into<BlockName>) -> Self {
        Self {
            initial: true,
            ..Self::new(name)
        }
    }

    /// Adds a word.
    #[must_use]
    pub fn word(mut self, name: impl Into<Arc<str>>, definition: WordDefinition<C>) -> Self {
        self.words.push((name.into(), definition));
        self
    }

    /// Adds a static word with a fixed continuation.
    #[must_use]
    pub fn static_word(self, name: impl Into<Arc<str>>, continuation: Continuation) -> Self {
        self.word(name, WordDefinition::to(continuation))
    }

    /// Adds a static word whose continuation is computed on access.
    #[must_use]
    pub fn getter_word<F>(self, name: impl Into<Arc<str>>, f: F) -> Self
    where
        F: Fn(&mut C) -> Result<Continuation> + 'static,
    {
        self.word(name, WordDefinition::getter(f))
    }

    /// Adds a parametric word.
    #[must_use]
    pub fn parametric_word<F>(self, name: impl Into<Arc<str>>, f: F) -> Self
    where
        F: Fn(&mut C, &[Value]) -> Result<Continuation> + 'static,
    {
        self.word(name, WordDefinition::parametric(f))
    }

    /// Adds a hybrid word.
    #[must_use]
    pub fn hybrid_word<F>(
        self,
        name: impl Into<Arc<str>>,
        accessed: impl Into<Accessed<C>>,
        called: F,
    ) -> Self
    where
        F: Fn(&mut C, &[Value]) -> Result<Continuation> + 'static,
    {
        self.word(name, WordDefinition::hybrid(accessed, called))
    }

    /// Installs a hook fired after any word of this block is recorded.
    #[must_use]
    pub fn on_word_use<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut C, &WordUse) + 'static,
    {
        self.on_word_use = Some(Rc::new(hook));
        self
    }

    /// Returns the block name.
    #[must_use]
    pub fn name(&self) -> &BlockName {
        &self.name
    }

    /// Returns true if this block may start a traversal.
    #[must_use]
    pub fn is_initial(&self) -> bool {
        self.initial
    }

    /// Returns the declared words in declaration order.
    #[must_use]
    pub fn words(&self) -> &[(Arc<str>, WordDefinition<C>)] {
        &self.words
    }

    /// Returns the word at a declaration index.
    #[must_use]
    pub fn word_at(&self, index: usize) -> Option<&WordDefinition<C>> {
        self.words.get(index).map(|(_, def)| def)
    }

    /// Returns the use hook, if any.
    #[must_use]
    pub fn word_use_hook(&self) -> Option<&WordUseHook<C>> {
        self.on_word_use.as_ref()
    }
}

impl<C> fmt::Debug for BlockDefinition<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockDefinition")
            .field("name", &self.name)
            .field("initial", &self.initial)
            .field("words", &self.words)
            .field("on_word_use", &self.on_word_use.is_some())
            .finish()
    }
}
