//! Arena-backed nodes.
//!
//! The classic formulation of this structure is a graph of heap nodes wired
//! together with four raw pointers each, which makes teardown order and
//! aliasing the caller's problem. Here every node lives in a single arena
//! owned by the list, and the four links are index-valued relations into that
//! arena with `None` standing in for null. Unlinking a node returns its slot
//! to a free list for reuse; dropping the list drops the arena, and with it
//! every node, in one step.

use std::ops::{Index, IndexMut};

use crate::key::Key;

// ////////////////////////////////////////////////////////////////////////////
// NodeId
// ////////////////////////////////////////////////////////////////////////////

/// A stable handle to a node in the arena.
///
/// Handles are only meaningful for the arena that produced them, and only
/// until the node is freed. The list never lets a handle to a freed node
/// escape; indexing the arena with one is a programming error and panics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct NodeId(usize);

// ////////////////////////////////////////////////////////////////////////////
// Node
// ////////////////////////////////////////////////////////////////////////////

/// One node of the list: a key and four relations.
///
/// `next`/`prev` chain the node into its level's ordered sequence; `up`/`down`
/// tie together the tower of nodes holding the same key on adjacent levels.
/// A node belongs to exactly one level, so a tower of height `$h$` is `$h$`
/// distinct nodes, each carrying its own copy of the key.
#[derive(Clone, Debug)]
pub(crate) struct Node {
    /// The key, which only sentinel nodes hold as a non-`Value` variant.
    pub key: Key,
    /// The node to the right on the same level.
    pub next: Option<NodeId>,
    /// The node to the left on the same level.
    pub prev: Option<NodeId>,
    /// The same key's node one level above, if the tower reaches that far.
    pub up: Option<NodeId>,
    /// The same key's node one level below.
    pub down: Option<NodeId>,
}

impl Node {
    /// Create an unlinked node holding `key`.
    pub(crate) const fn new(key: Key) -> Self {
        Node {
            key,
            next: None,
            prev: None,
            up: None,
            down: None,
        }
    }
}

// ////////////////////////////////////////////////////////////////////////////
// Arena
// ////////////////////////////////////////////////////////////////////////////

#[derive(Clone, Debug)]
enum Slot {
    Occupied(Node),
    Vacant,
}

/// Owns every node of the list, sentinels included.
#[derive(Clone, Debug, Default)]
pub(crate) struct Arena {
    slots: Vec<Slot>,
    free: Vec<NodeId>,
}

impl Arena {
    pub(crate) const fn new() -> Self {
        Arena {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Allocate a fresh, unlinked node, reusing a vacated slot if one exists.
    pub(crate) fn alloc(&mut self, key: Key) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.slots[id.0] = Slot::Occupied(Node::new(key));
                id
            }
            None => {
                let id = NodeId(self.slots.len());
                self.slots.push(Slot::Occupied(Node::new(key)));
                id
            }
        }
    }

    /// Release a node's slot. The caller must have unlinked it first.
    ///
    /// # Panics
    ///
    /// Panics if the slot is already vacant, as freeing twice means a handle
    /// outlived its node.
    pub(crate) fn free(&mut self, id: NodeId) {
        match self.slots[id.0] {
            Slot::Occupied(_) => {
                self.slots[id.0] = Slot::Vacant;
                self.free.push(id);
            }
            Slot::Vacant => panic!("double free of arena node"),
        }
    }
}

impl Index<NodeId> for Arena {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        match self.slots[id.0] {
            Slot::Occupied(ref node) => node,
            Slot::Vacant => panic!("stale arena handle"),
        }
    }
}

impl IndexMut<NodeId> for Arena {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        match self.slots[id.0] {
            Slot::Occupied(ref mut node) => node,
            Slot::Vacant => panic!("stale arena handle"),
        }
    }
}
