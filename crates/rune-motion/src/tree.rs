//! Arena tree of motion nodes.
//!
//! Nodes live in a slot vector and are addressed by generational [`NodeId`]s:
//! removing a node bumps its slot's generation, so old ids go stale instead
//! of aliasing whatever is inserted into the slot next. Parent links make the
//! tree acyclic by construction; a node can only be attached under a node
//! that already exists.

use std::fmt;

use super::error::{MotionError, Result};
use super::types::NodeId;

struct Slot<T> {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: T,
}

/// Generational arena tree.
pub struct MotionTree<T> {
    slots: Vec<Option<Slot<T>>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
}

impl<T> fmt::Debug for MotionTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MotionTree")
            .field("alive", &self.len())
            .field("free_list", &self.free_list.len())
            .finish()
    }
}

impl<T> Default for MotionTree<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
        }
    }
}

impl<T> MotionTree<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node as the last child of `parent`, or as a root.
    pub fn insert(&mut self, parent: Option<NodeId>, data: T) -> Result<NodeId> {
        if let Some(p) = parent
            && !self.is_alive(p)
        {
            return Err(MotionError::StaleNode(p));
        }

        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            (idx, generation)
        } else {
            self.generations.push(1);
            self.slots.push(None);
            (self.slots.len() - 1, 1)
        };
        self.slots[idx] = Some(Slot {
            generation,
            parent,
            children: Vec::new(),
            data,
        });

        #[allow(clippy::cast_possible_truncation, reason = "NodeId uses 32-bit indices.")]
        let id = NodeId::new(idx as u32, generation);
        if let Some(p) = parent
            && let Some(slot) = self.slot_mut(p)
        {
            slot.children.push(id);
        }
        Ok(id)
    }

    /// Remove a node and its subtree. Returns the removed payloads, parents first.
    pub fn remove(&mut self, id: NodeId) -> Result<Vec<(NodeId, T)>> {
        if !self.is_alive(id) {
            return Err(MotionError::StaleNode(id));
        }
        if let Some(parent) = self.parent_of(id)
            && let Some(slot) = self.slot_mut(parent)
        {
            slot.children.retain(|c| *c != id);
        }

        let mut removed = Vec::new();
        for node in self.subtree(id) {
            if let Some(slot) = self.slots[node.idx()].take() {
                removed.push((node, slot.data));
                self.free_list.push(node.idx());
            }
        }
        Ok(removed)
    }

    /// Returns true if `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.slot(id).is_some()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the parent of a node if live, or `None` for roots or stale ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.slot(id).and_then(|s| s.parent)
    }

    /// Get the children of a node, or empty slice if node is stale.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.slot(id).map_or(&[], |s| &s.children)
    }

    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.slot(id).map(|s| &s.data)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.slot_mut(id).map(|s| &mut s.data)
    }

    /// `id` and all its descendants in pre-order (parents before children).
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.is_alive(id) {
            return out;
        }
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children_of(node).iter().rev().copied());
        }
        out
    }

    /// All live ids in slot order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.as_ref().map(|s| NodeId::new(idx as u32, s.generation)))
    }

    fn slot(&self, id: NodeId) -> Option<&Slot<T>> {
        self.slots
            .get(id.idx())
            .and_then(|s| s.as_ref())
            .filter(|s| s.generation == id.1)
    }

    fn slot_mut(&mut self, id: NodeId) -> Option<&mut Slot<T>> {
        self.slots
            .get_mut(id.idx())
            .and_then(|s| s.as_mut())
            .filter(|s| s.generation == id.1)
    }
}
