// Copyright 2024 nodearc Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::str::from_utf8_unchecked;

use crate::arena::BufferArena;
use crate::error::Error;
use crate::error::Result;
use crate::node::NodePool;
use crate::node::NodeSlot;
use crate::node::NodeValue;
use crate::node::StrRef;
use crate::value::ValueType;

/// Addresses one node inside a [`NodeTree`]: either the top-level node or
/// a slot in the node pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeId {
    Top,
    Slot(u32),
}

/// An in-memory document: one top-level node plus the two pools every
/// string and child node reachable from it was allocated from.
///
/// The pools are scoped to the whole document. Nothing is freed per node;
/// [`reset`](NodeTree::reset) releases both pools at once and returns the
/// tree to a freshly constructed state. Interned strings ([`StrRef`]) and
/// node ids stay valid until then.
pub struct NodeTree {
    top: NodeValue,
    strings: BufferArena,
    nodes: NodePool,
}

impl Default for NodeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeTree {
    pub fn new() -> NodeTree {
        NodeTree {
            top: NodeValue::Null,
            strings: BufferArena::new(),
            nodes: NodePool::new(),
        }
    }

    /// Interns `s` into the string pool and returns its handle.
    pub fn intern(&mut self, s: &str) -> Result<StrRef> {
        let handle = self
            .strings
            .alloc_bytes(s.as_bytes())
            .ok_or(Error::AllocationFailure)?;
        Ok(StrRef(handle))
    }

    /// Resolves an interned string handle.
    pub fn str_of(&self, r: StrRef) -> &str {
        // Handles are only produced by intern(), which copies from &str,
        // so the bytes are always valid UTF-8.
        unsafe { from_utf8_unchecked(self.strings.get(r.0)) }
    }

    pub fn node(&self, id: NodeId) -> &NodeValue {
        match id {
            NodeId::Top => &self.top,
            NodeId::Slot(i) => &self.nodes.slot_at(i).value,
        }
    }

    /// Overwrites the node's entire content, discarding the previous
    /// payload. Pool space held by a replaced container is not reclaimed
    /// until reset().
    pub fn set(&mut self, id: NodeId, value: NodeValue) {
        match id {
            NodeId::Top => self.top = value,
            NodeId::Slot(i) => self.nodes.slot_at_mut(i).value = value,
        }
    }

    /// Switches the node to a String holding a copy of `s`.
    pub fn set_str(&mut self, id: NodeId, s: &str) -> Result<()> {
        let r = self.intern(s)?;
        self.set(id, NodeValue::Str(r));
        Ok(())
    }

    /// Switches the node to an empty Array with room for `cap` children.
    pub fn make_array(&mut self, id: NodeId, cap: usize) -> Result<()> {
        let run = self.nodes.alloc_run(cap).ok_or(Error::AllocationFailure)?;
        self.set(id, NodeValue::Array(run));
        Ok(())
    }

    /// Switches the node to an empty Table with room for `cap` entries.
    pub fn make_table(&mut self, id: NodeId, cap: usize) -> Result<()> {
        let run = self.nodes.alloc_run(cap).ok_or(Error::AllocationFailure)?;
        self.set(id, NodeValue::Table(run));
        Ok(())
    }

    /// Ensures the container node at `id` can hold at least `cap`
    /// children, growing its slot run if needed. Existing children and
    /// their ids are preserved; the run may relocate inside the pool.
    pub fn reserve_container(&mut self, id: NodeId, cap: usize) -> Result<()> {
        let node = *self.node(id);
        let run = node
            .run()
            .ok_or_else(|| Error::mismatch(ValueType::Container, node.value_type()))?;
        let (new_run, _moved) = self
            .nodes
            .grow_run(run, cap)
            .ok_or(Error::AllocationFailure)?;
        let rebuilt = match node {
            NodeValue::Array(_) => NodeValue::Array(new_run),
            _ => NodeValue::Table(new_run),
        };
        self.set(id, rebuilt);
        Ok(())
    }

    /// Appends a child to the container node at `id`.
    ///
    /// Table nodes require a key; if the key already exists its value is
    /// replaced in place. Returns `Ok(false)` when the container is full —
    /// growth is the caller's job via [`reserve_container`]. Errors when
    /// the node is not a container or the key presence does not match the
    /// container kind.
    ///
    /// [`reserve_container`]: NodeTree::reserve_container
    pub fn insert(&mut self, id: NodeId, key: Option<&str>, value: NodeValue) -> Result<bool> {
        let node = *self.node(id);
        let mut run = node
            .run()
            .ok_or_else(|| Error::mismatch(ValueType::Container, node.value_type()))?;
        let slot = match (&node, key) {
            (NodeValue::Array(_), None) => NodeSlot { key: None, value },
            (NodeValue::Array(_), Some(_)) => {
                return Err(Error::Message("array children take no key".to_string()));
            }
            (_, Some(k)) => {
                if let Some(existing) = self.find(id, k) {
                    self.set(existing, value);
                    return Ok(true);
                }
                let key_ref = self.intern(k)?;
                NodeSlot {
                    key: Some(key_ref),
                    value,
                }
            }
            (_, None) => {
                return Err(Error::Message("table children require a key".to_string()));
            }
        };
        if !self.nodes.insert(&mut run, slot) {
            return Ok(false);
        }
        let rebuilt = match node {
            NodeValue::Array(_) => NodeValue::Array(run),
            _ => NodeValue::Table(run),
        };
        self.set(id, rebuilt);
        Ok(true)
    }

    /// Number of children of a container node; 0 for scalars.
    pub fn child_count(&self, id: NodeId) -> usize {
        self.node(id).run().map(|run| run.len()).unwrap_or(0)
    }

    /// The id of the `index`-th child of a container node, in insertion
    /// order.
    pub fn child(&self, id: NodeId, index: usize) -> Option<NodeId> {
        let run = self.node(id).run()?;
        if index >= run.len() {
            return None;
        }
        Some(NodeId::Slot(run.start + index as u32))
    }

    /// The table key of the child at `id`, if it has one.
    pub fn key_of(&self, id: NodeId) -> Option<&str> {
        match id {
            NodeId::Top => None,
            NodeId::Slot(i) => {
                let key = self.nodes.slot_at(i).key?;
                Some(self.str_of(key))
            }
        }
    }

    /// Finds the child of a table node with the given key.
    pub fn find(&self, id: NodeId, key: &str) -> Option<NodeId> {
        let run = self.node(id).run()?;
        for index in 0..run.len() {
            let slot_index = run.start + index as u32;
            if let Some(k) = self.nodes.slot_at(slot_index).key {
                if self.str_of(k) == key {
                    return Some(NodeId::Slot(slot_index));
                }
            }
        }
        None
    }

    /// Drops the whole document: releases both pools and resets the
    /// top-level node to Null. All handles and ids are invalidated.
    pub fn reset(&mut self) {
        self.top = NodeValue::Null;
        self.strings.release();
        self.nodes.clear();
    }

    /// Exchanges the entire contents of two trees, pools included.
    pub fn swap(&mut self, other: &mut NodeTree) {
        std::mem::swap(self, other);
    }

    /// Bytes currently held by the string pool.
    pub fn string_pool_bytes(&self) -> usize {
        self.strings.used_bytes()
    }

    /// Slots currently held by the node pool, dead runs included.
    pub fn node_pool_slots(&self) -> usize {
        self.nodes.slot_count()
    }
}
