//! Repeatable block list backing the ticker form.
//!
//! The visual list of ticker blocks, modeled as an ordered arena of blocks
//! with an explicit transition phase. The list itself owns no animation
//! machinery: `add`/`begin_exit` start a transition, and the host calls
//! [`BlockList::finish_enter`]/[`BlockList::finalize_exit`] when the matching
//! completion signal fires. Until that final signal a block stays live and
//! its fields stay part of the form.

use crate::form::FormEntry;
use tracing::{debug, warn};

/// Identity of a block, assigned from a monotonic counter.
///
/// Ids are never reused, so a completion signal that outlives its block
/// resolves to nothing instead of a neighbor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockId(u64);

/// Transition phase of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Visually at rest.
    #[default]
    Stable,
    /// Entry transition running since the block was added.
    Entering,
    /// Exit transition running; the block detaches when it completes.
    Exiting,
}

/// One repeatable unit of the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    id: BlockId,
    phase: Phase,
    fields: Vec<FormEntry>,
}

impl Block {
    /// The block's arena id.
    #[must_use]
    pub const fn id(&self) -> BlockId {
        self.id
    }

    /// Current transition phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Form fields carried by this block, in field order.
    #[must_use]
    pub fn fields(&self) -> &[FormEntry] {
        &self.fields
    }

    /// Set one field's value, appending the field if it is not present yet.
    pub fn set_field(&mut self, name: &str, value: &str) {
        match self.fields.iter_mut().find(|field| field.name == name) {
            Some(field) => value.clone_into(&mut field.value),
            None => self.fields.push(FormEntry::new(name, value)),
        }
    }
}

/// Ordered list of live ticker blocks.
///
/// Never empty: construction seeds one block and the last block that is not
/// already exiting cannot be removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockList {
    blocks: Vec<Block>,
    next_id: u64,
}

impl BlockList {
    /// List with a single stable block carrying `fields`.
    #[must_use]
    pub fn new(fields: Vec<FormEntry>) -> Self {
        let mut list = Self {
            blocks: Vec::new(),
            next_id: 0,
        };
        let id = list.alloc_id();
        list.blocks.push(Block {
            id,
            phase: Phase::Stable,
            fields,
        });
        list
    }

    /// Number of live blocks, exiting blocks included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false: the list never goes empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Live blocks in visual order.
    #[must_use]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Look up a live block.
    #[must_use]
    pub fn get(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|block| block.id == id)
    }

    /// Mutable access to a live block, e.g. to edit its field values.
    pub fn get_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        self.blocks.iter_mut().find(|block| block.id == id)
    }

    /// Clone the last block and insert the clone directly after it.
    ///
    /// The clone carries the source block's field values as they are at clone
    /// time and starts in [`Phase::Entering`]; the host reports the end of
    /// the entry transition via [`Self::finish_enter`]. The last block is
    /// cloned whatever its phase, matching the visual list. There is no bound
    /// on list length.
    pub fn add(&mut self) -> BlockId {
        let fields = self
            .blocks
            .last()
            .map_or_else(Vec::new, |block| block.fields.clone());
        let id = self.alloc_id();
        debug!(id = id.0, blocks = self.blocks.len() + 1, "block added");
        self.blocks.push(Block {
            id,
            phase: Phase::Entering,
            fields,
        });
        id
    }

    /// Mark a block's entry transition as complete.
    ///
    /// Returns whether the block moved to [`Phase::Stable`]. A completion
    /// that arrives for a block that is no longer entering is stale (the
    /// block may already be exiting) and is ignored.
    pub fn finish_enter(&mut self, id: BlockId) -> bool {
        match self.get_mut(id) {
            Some(block) if block.phase == Phase::Entering => {
                block.phase = Phase::Stable;
                true
            }
            Some(block) => {
                debug!(id = id.0, phase = ?block.phase, "stale enter completion ignored");
                false
            }
            None => {
                warn!(id = id.0, "enter completion for unknown block");
                false
            }
        }
    }

    /// Start removing a block.
    ///
    /// The block moves to [`Phase::Exiting`], superseding a pending entry
    /// transition, and stays live until [`Self::finalize_exit`] is called for
    /// it. A no-op returning false when the block is the last one not already
    /// exiting (the list must never go empty) or the id is unknown. Calling
    /// this again for an already-exiting block reports true without changing
    /// anything.
    pub fn begin_exit(&mut self, id: BlockId) -> bool {
        let Some(block) = self.get(id) else {
            warn!(id = id.0, "exit requested for unknown block");
            return false;
        };
        if block.phase == Phase::Exiting {
            return true;
        }
        let surviving = self
            .blocks
            .iter()
            .filter(|block| block.phase != Phase::Exiting)
            .count();
        if surviving <= 1 {
            debug!(id = id.0, "refusing to remove the last block");
            return false;
        }
        if let Some(block) = self.get_mut(id) {
            block.phase = Phase::Exiting;
        }
        debug!(id = id.0, "block exiting");
        true
    }

    /// Detach a block whose exit transition has completed.
    ///
    /// One-shot: detaches the block and returns true exactly once per id.
    /// Signals for unknown ids or for blocks that are not exiting are
    /// ignored, so a completion that fires more than once stays harmless.
    pub fn finalize_exit(&mut self, id: BlockId) -> bool {
        let Some(index) = self.blocks.iter().position(|block| block.id == id) else {
            return false;
        };
        if self.blocks[index].phase != Phase::Exiting {
            debug!(id = id.0, "exit completion for a block that is not exiting");
            return false;
        }
        self.blocks.remove(index);
        debug!(id = id.0, blocks = self.blocks.len(), "block detached");
        true
    }

    /// Every live block's fields in visual order, exiting blocks included.
    ///
    /// This is the stream handed to the form serializer: a block's fields
    /// remain part of the form until its exit completion fires.
    #[must_use]
    pub fn entries(&self) -> Vec<FormEntry> {
        self.blocks
            .iter()
            .flat_map(|block| block.fields.iter().cloned())
            .collect()
    }

    fn alloc_id(&mut self) -> BlockId {
        let id = BlockId(self.next_id);
        self.next_id += 1;
        id
    }
}
