//! Continuation sets and their resolution.
//!
//! A [`ContinuationSet`] is the merged word index of every block reachable
//! from one traversal position. Resolution is where name collisions between
//! simultaneously reachable blocks are detected.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use semantium_foundation::{Error, ErrorKind, Result};

use crate::catalog::{Catalog, WordDescriptor};
use crate::registry::BlockId;
use crate::target::{BlockName, Continuation, Target};

/// Outcome of resolving a word name against a continuation set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// The name is a word of one of the reachable blocks.
    Instruction(&'a Rc<WordDescriptor>),
    /// The name is not a word, but the result is reachable.
    Result,
    /// Neither.
    Invalid,
}

/// The words reachable from one traversal position.
#[derive(Clone, Debug, Default)]
pub struct ContinuationSet {
    blocks: Vec<BlockId>,
    block_names: Vec<BlockName>,
    words: Vec<Rc<WordDescriptor>>,
    word_index: HashMap<Arc<str>, usize>,
    allows_result_access: bool,
}

impl ContinuationSet {
    /// Resolves a continuation against the catalog.
    ///
    /// Result targets are filtered out and recorded as the result flag;
    /// repeated blocks are merged once.
    ///
    /// # Errors
    ///
    /// Returns `UnknownContinuationBlock` if a target is not a block of the
    /// grammar, or `AmbiguousGrammar` if two reachable blocks define the same
    /// word name.
    pub fn build(catalog: &Catalog, continuation: &Continuation) -> Result<Self> {
        let mut set = Self::default();

        for target in continuation.targets() {
            let name = match target {
                Target::Result => {
                    set.allows_result_access = true;
                    continue;
                }
                Target::Block(name) => name,
            };
            let id = catalog
                .block_id(name)
                .ok_or_else(|| Error::unknown_continuation_block(&**name))?;
            if set.blocks.contains(&id) {
                continue;
            }
            set.blocks.push(id);
            set.block_names.push(name.clone());

            for descriptor in catalog.block_words(id) {
                if set.word_index.contains_key(&descriptor.name) {
                    return Err(set.ambiguity(catalog, &descriptor.name));
                }
                set.word_index
                    .insert(descriptor.name.clone(), set.words.len());
                set.words.push(Rc::clone(descriptor));
            }
        }

        Ok(set)
    }

    fn ambiguity(&self, catalog: &Catalog, word: &str) -> Error {
        let blocks = self
            .blocks
            .iter()
            .filter(|b| catalog.block_words(**b).iter().any(|d| &*d.name == word))
            .filter_map(|b| catalog.block_name(*b))
            .map(ToString::to_string)
            .collect();
        Error::ambiguous_grammar(word, blocks)
    }

    /// Resolves a word name at this position.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Resolution<'_> {
        match self.word_index.get(name) {
            Some(&i) => Resolution::Instruction(&self.words[i]),
            None if self.allows_result_access => Resolution::Result,
            None => Resolution::Invalid,
        }
    }

    /// Returns the descriptor for a word name, if reachable.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Rc<WordDescriptor>> {
        self.word_index.get(name).map(|&i| &self.words[i])
    }

    /// Returns the reachable blocks in continuation order.
    #[must_use]
    pub fn blocks(&self) -> &[BlockId] {
        &self.blocks
    }

    /// Returns the reachable block names in continuation order.
    #[must_use]
    pub fn block_names(&self) -> &[BlockName] {
        &self.block_names
    }

    /// Returns every reachable word, block by block in declaration order.
    #[must_use]
    pub fn words(&self) -> &[Rc<WordDescriptor>] {
        &self.words
    }

    /// Returns true if the result may be accessed from this position.
    #[must_use]
    pub fn allows_result_access(&self) -> bool {
        self.allows_result_access
    }

    /// Returns true if nothing at all is reachable.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.words.is_empty() && !self.allows_result_access
    }
}

impl fmt::Display for ContinuationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, name) in self.block_names.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}")?;
        }
        if self.allows_result_access {
            if !self.block_names.is_empty() {
                write!(f, ", ")?;
            }
            write!(f, "<result>")?;
        }
        write!(f, "}}")
    }
}

// =============================================================================
// Resolver
// =============================================================================

/// Statistics for continuation resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResolverStats {
    /// Resolutions served from the cache.
    pub hits: u64,
    /// Resolutions computed.
    pub misses: u64,
    /// Distinct continuations cached.
    pub cached: usize,
}

/// Resolves continuations to shared [`ContinuationSet`]s.
///
/// Successful resolutions are cached per distinct target list. Failures are
/// never cached, so an ambiguous continuation fails every time it is reached.
#[derive(Debug)]
pub struct ContinuationResolver {
    cache: RefCell<HashMap<Continuation, Rc<ContinuationSet>>>,
    enabled: bool,
    hits: Cell<u64>,
    misses: Cell<u64>,
}

impl ContinuationResolver {
    /// Creates a resolver, caching if `enabled`.
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self {
            cache: RefCell::new(HashMap::new()),
            enabled,
            hits: Cell::new(0),
            misses: Cell::new(0),
        }
    }

    /// Resolves `continuation`, tagging unknown-block failures with the
    /// word that produced it.
    ///
    /// # Errors
    ///
    /// See [`ContinuationSet::build`].
    pub fn resolve(
        &self,
        catalog: &Catalog,
        continuation: &Continuation,
        referenced_from: Option<&WordDescriptor>,
    ) -> Result<Rc<ContinuationSet>> {
        if self.enabled {
            if let Some(set) = self.cache.borrow().get(continuation) {
                self.hits.set(self.hits.get() + 1);
                return Ok(Rc::clone(set));
            }
        }
        self.misses.set(self.misses.get() + 1);

        let set = ContinuationSet::build(catalog, continuation).map_err(|mut err| {
            if let ErrorKind::UnknownContinuationBlock { referenced_from: from, .. } = &mut err.kind {
                if from.is_none() {
                    *from = referenced_from.map(WordDescriptor::qualified_name);
                }
            }
            err
        })?;
        let set = Rc::new(set);

        if self.enabled {
            self.cache
                .borrow_mut()
                .insert(continuation.clone(), Rc::clone(&set));
        }
        Ok(set)
    }

    /// Returns resolution statistics.
    #[must_use]
    pub fn stats(&self) -> ResolverStats {
        ResolverStats {
            hits: self.hits.get(),
            misses: self.misses.get(),
            cached: self.cache.borrow().len(),
        }
    }

    /// Drops every cached resolution.
    pub fn clear(&self) {
        self.cache.borrow_mut().clear();
    }
}

impl Default for ContinuationResolver {
    fn default() -> Self {
        Self::new(true)
    }
}
