//! Word catalog and the catalog compiler.
//!
//! The compiler walks every registered block once, classifies each declared
//! word, and produces one immutable [`WordDescriptor`] per (block, word).
//! The resulting [`Catalog`] is shared by every traversal of the grammar.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use semantium_foundation::{Error, ErrorKind, LtVec, Result, Value};

use crate::registry::{BlockId, BlockRegistry};
use crate::target::{BlockName, Continuation};

// =============================================================================
// Descriptors
// =============================================================================

/// Calling convention of a word.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum WordKind {
    /// Used by access only.
    Static,
    /// Used by call only.
    Parametric,
    /// Usable by access or call.
    Hybrid,
}

impl WordKind {
    /// Returns true if the word requires parameters.
    #[must_use]
    pub const fn is_parametric(self) -> bool {
        matches!(self, Self::Parametric)
    }

    /// Returns true if the word may be called with parameters.
    #[must_use]
    pub const fn is_callable(self) -> bool {
        matches!(self, Self::Parametric | Self::Hybrid)
    }

    /// Returns true if the word may be used by plain access.
    #[must_use]
    pub const fn is_accessible(self) -> bool {
        matches!(self, Self::Static | Self::Hybrid)
    }
}

impl fmt::Display for WordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static => write!(f, "static"),
            Self::Parametric => write!(f, "parametric"),
            Self::Hybrid => write!(f, "hybrid"),
        }
    }
}

/// Immutable catalog entry for one word of one block.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WordDescriptor {
    /// The owning block.
    pub block: BlockId,
    /// Name of the owning block.
    pub block_name: BlockName,
    /// The word name.
    pub name: Arc<str>,
    /// Calling convention.
    pub kind: WordKind,
    /// Declaration index within the owning block.
    pub index: usize,
}

impl WordDescriptor {
    /// Returns true if the word requires parameters.
    #[must_use]
    pub fn is_parametric(&self) -> bool {
        self.kind.is_parametric()
    }

    /// Returns the qualified name, e.g. `Transition.then`.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.block_name, self.name)
    }
}

impl fmt::Display for WordDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{} ({})", self.block_name, self.name, self.kind)
    }
}

/// One recorded use of a word.
///
/// A static use carries no parameters; a parametric use carries the
/// parameters it was called with (possibly none).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WordUse {
    descriptor: Rc<WordDescriptor>,
    parameters: Option<LtVec<Value>>,
}

impl WordUse {
    /// Records a use by access.
    #[must_use]
    pub fn accessed(descriptor: Rc<WordDescriptor>) -> Self {
        Self {
            descriptor,
            parameters: None,
        }
    }

    /// Records a use by call.
    pub fn called(descriptor: Rc<WordDescriptor>, parameters: impl IntoIterator<Item = Value>) -> Self {
        Self {
            descriptor,
            parameters: Some(parameters.into_iter().collect()),
        }
    }

    /// Returns the descriptor of the used word.
    #[must_use]
    pub fn descriptor(&self) -> &Rc<WordDescriptor> {
        &self.descriptor
    }

    /// Returns the word name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// Returns the owning block name.
    #[must_use]
    pub fn block_name(&self) -> &str {
        &self.descriptor.block_name
    }

    /// Returns the call parameters, or `None` for a use by access.
    #[must_use]
    pub fn parameters(&self) -> Option<&LtVec<Value>> {
        self.parameters.as_ref()
    }

    /// Returns true if this use was a call.
    #[must_use]
    pub fn is_call(&self) -> bool {
        self.parameters.is_some()
    }
}

/// Renders as written in a traversal: `A`, `X(10)`, `either(A, B)`.
impl fmt::Display for WordUse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.descriptor.name)?;
        if let Some(params) = &self.parameters {
            write!(f, "(")?;
            for (i, p) in params.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{p}")?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// Name-indexed catalog of every word in a grammar.
#[derive(Debug, Default)]
pub struct Catalog {
    by_name: HashMap<Arc<str>, Vec<Rc<WordDescriptor>>>,
    by_block: Vec<Vec<Rc<WordDescriptor>>>,
    block_names: Vec<BlockName>,
    block_ids: HashMap<BlockName, BlockId>,
}

impl Catalog {
    /// Compiles the catalog for every block in `registry`.
    ///
    /// When `validate_continuations` is set, every fixed continuation is
    /// checked against the registry so unknown blocks surface here rather
    /// than on first use.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedWordDefinition` for a word the compiler cannot
    /// accept, or `UnknownContinuationBlock` for a fixed continuation that
    /// names a block outside the grammar.
    pub fn compile<C>(registry: &BlockRegistry<C>, validate_continuations: bool) -> Result<Self> {
        let mut catalog = Self::default();

        for (id, block) in registry.iter() {
            catalog.block_names.push(block.name().clone());
            catalog.block_ids.insert(block.name().clone(), id);

            let mut words: Vec<Rc<WordDescriptor>> = Vec::with_capacity(block.words().len());
            for (index, (name, definition)) in block.words().iter().enumerate() {
                check_word_name(block.name(), name)?;
                if words.iter().any(|w| w.name == *name) {
                    return Err(Error::unsupported_word(
                        &**block.name(),
                        &**name,
                        "word declared twice",
                    ));
                }
                if let Some(fixed) = definition.accessed().and_then(|a| a.as_fixed()) {
                    check_fixed(registry, block.name(), name, fixed, validate_continuations)?;
                }

                let descriptor = Rc::new(WordDescriptor {
                    block: id,
                    block_name: block.name().clone(),
                    name: name.clone(),
                    kind: definition.kind(),
                    index,
                });
                catalog
                    .by_name
                    .entry(name.clone())
                    .or_default()
                    .push(Rc::clone(&descriptor));
                words.push(descriptor);
            }
            catalog.by_block.push(words);
        }

        Ok(catalog)
    }

    /// Returns every descriptor sharing a word name, across all blocks.
    #[must_use]
    pub fn descriptors(&self, name: &str) -> &[Rc<WordDescriptor>] {
        self.by_name.get(name).map_or(&[], Vec::as_slice)
    }

    /// Returns the words of one block in declaration order.
    #[must_use]
    pub fn block_words(&self, block: BlockId) -> &[Rc<WordDescriptor>] {
        self.by_block
            .get(block.index() as usize)
            .map_or(&[], Vec::as_slice)
    }

    /// Looks up a block by name.
    #[must_use]
    pub fn block_id(&self, name: &str) -> Option<BlockId> {
        self.block_ids.get(name).copied()
    }

    /// Returns the name of a block.
    #[must_use]
    pub fn block_name(&self, block: BlockId) -> Option<&BlockName> {
        self.block_names.get(block.index() as usize)
    }

    /// Returns the number of distinct word names.
    #[must_use]
    pub fn name_count(&self) -> usize {
        self.by_name.len()
    }

    /// Returns the total number of descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_block.iter().map(Vec::len).sum()
    }

    /// Returns true if the grammar declares no words.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn check_word_name(block: &str, name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$');
    if !valid_start || !chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$') {
        return Err(Error::unsupported_word(
            block,
            name,
            "word name is not an identifier",
        ));
    }
    Ok(())
}

fn check_fixed<C>(
    registry: &BlockRegistry<C>,
    block: &str,
    word: &str,
    continuation: &Continuation,
    validate: bool,
) -> Result<()> {
    if continuation.is_empty() {
        return Err(Error::unsupported_word(
            block,
            word,
            "continuation names no target",
        ));
    }
    if validate {
        for target in continuation.block_names() {
            if registry.lookup(target).is_none() {
                return Err(Error::new(ErrorKind::UnknownContinuationBlock {
                    block: target.to_string(),
                    referenced_from: Some(format!("{block}.{word}")),
                }));
            }
        }
    }
    Ok(())
}
