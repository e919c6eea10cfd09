//! Block registry.
//!
//! Holds the one definition of every block in a grammar, indexed by
//! [`BlockId`], and remembers which blocks may start a traversal.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use semantium_foundation::{Error, ErrorKind, Result};

use crate::block::BlockDefinition;
use crate::target::BlockName;

/// Index of a block within its grammar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(u32);

impl BlockId {
    /// Returns the raw index of this block.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "block-{}", self.0)
    }
}

/// Registry of block definitions for one grammar.
pub struct BlockRegistry<C> {
    blocks: Vec<Rc<BlockDefinition<C>>>,
    by_name: HashMap<BlockName, BlockId>,
    initial: Vec<BlockId>,
}

impl<C> BlockRegistry<C> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            blocks: Vec::new(),
            by_name: HashMap::new(),
            initial: Vec::new(),
        }
    }

    /// Registers a block definition.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateBlock` if a block of the same name already exists.
    pub fn register(&mut self, block: BlockDefinition<C>) -> Result<BlockId> {
        if self.by_name.contains_key(block.name()) {
            return Err(Error::new(ErrorKind::DuplicateBlock(
                block.name().to_string(),
            )));
        }

        let index = u32::try_from(self.blocks.len())
            .map_err(|_| Error::new(ErrorKind::Internal("too many blocks".to_string())))?;
        let id = BlockId(index);

        if block.is_initial() {
            self.initial.push(id);
        }
        self.by_name.insert(block.name().clone(), id);
        self.blocks.push(Rc::new(block));

        Ok(id)
    }

    /// Looks up a block by ID.
    #[must_use]
    pub fn get(&self, id: BlockId) -> Option<&Rc<BlockDefinition<C>>> {
        self.blocks.get(id.0 as usize)
    }

    /// Looks up a block ID by name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<BlockId> {
        self.by_name.get(name).copied()
    }

    /// Returns the name of a block.
    #[must_use]
    pub fn name_of(&self, id: BlockId) -> Option<&BlockName> {
        self.get(id).map(|b| b.name())
    }

    /// Returns the blocks that may start a traversal, in registration order.
    #[must_use]
    pub fn initial_blocks(&self) -> &[BlockId] {
        &self.initial
    }

    /// Returns the number of registered blocks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns true if no block is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Iterates over all blocks with their IDs.
    pub fn iter(&self) -> impl Iterator<Item = (BlockId, &Rc<BlockDefinition<C>>)> {
        self.blocks
            .iter()
            .enumerate()
            .map(|(i, b)| (BlockId(i as u32), b))
    }
}

impl<C> Default for BlockRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for BlockRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockRegistry")
            .field("blocks", &self.blocks.len())
            .field("initial", &self.initial)
            .finish()
    }
}
