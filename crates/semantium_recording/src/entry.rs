//! The entry dictionary handed to grammar consumers.

use std::fmt;
use std::rc::Rc;

use semantium_foundation::{Result, Value};

use crate::chain::InstructionChain;
use crate::dispatcher::{Dispatcher, Step};

/// The root of every traversal of a grammar.
///
/// Every step taken here forks the root chain first, so two words picked off
/// the dictionary never share a chain, and using the same word twice yields
/// two unrelated traversals.
pub struct EntryDictionary<C: InstructionChain> {
    root: Dispatcher<C>,
}

impl<C: InstructionChain> EntryDictionary<C> {
    pub(crate) fn new(root: Dispatcher<C>) -> Self {
        Self { root }
    }

    /// Resolves a starting word. See [`Dispatcher::word`].
    ///
    /// # Errors
    ///
    /// Returns `UnknownWord` if `name` does not start a traversal.
    pub fn word(&self, name: &str) -> Result<Step<C>> {
        self.root.word(name)
    }

    /// Starts a traversal with a static or hybrid word.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::get`].
    pub fn get(&self, name: &str) -> Result<Dispatcher<C>> {
        self.root.get(name)
    }

    /// Starts a traversal with a parametric or hybrid word.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::call`].
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Dispatcher<C>> {
        self.root.call(name, args)
    }

    /// Finalizes a fork of the root chain, if the entry continuation
    /// reaches the result.
    ///
    /// # Errors
    ///
    /// Returns `ResultNotReachable` otherwise.
    pub fn result(&self) -> Result<Rc<C::Output>> {
        self.root.result()
    }

    /// Returns the words that may start a traversal.
    #[must_use]
    pub fn available_words(&self) -> Vec<&str> {
        self.root.available_words()
    }

    /// Returns the root dispatcher.
    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher<C> {
        &self.root
    }
}

impl<C: InstructionChain> fmt::Debug for EntryDictionary<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EntryDictionary").field(&self.root).finish()
    }
}
