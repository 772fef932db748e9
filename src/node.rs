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

use crate::arena::ArenaRef;
use crate::value::ValueType;

/// A key or string payload interned into a [`NodeTree`]'s string pool.
///
/// The handle is only meaningful against the tree that produced it and
/// stays valid until that tree is reset or dropped.
///
/// [`NodeTree`]: crate::tree::NodeTree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrRef(pub(crate) ArenaRef);

/// A contiguous range of child slots inside a [`NodePool`].
///
/// `len` children are live out of `cap` reserved slots. Inserting into a
/// full run fails; callers grow the run first through the owning tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub(crate) start: u32,
    pub(crate) len: u32,
    pub(crate) cap: u32,
}

impl Run {
    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.cap as usize
    }

    pub(crate) fn is_full(&self) -> bool {
        self.len == self.cap
    }
}

/// The payload of one node in a pooled document tree.
///
/// Exactly one variant is live at a time; switching variants through the
/// tree's accessors fully replaces the previous payload. String payloads
/// live in the tree's string pool, container payloads are slot runs in the
/// node pool, so a node itself stays small and `Copy`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeValue {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(StrRef),
    Array(Run),
    Table(Run),
}

impl Default for NodeValue {
    fn default() -> Self {
        NodeValue::Null
    }
}

impl NodeValue {
    pub fn value_type(&self) -> ValueType {
        match self {
            NodeValue::Null => ValueType::Null,
            NodeValue::Bool(_) => ValueType::Bool,
            NodeValue::Int(_) => ValueType::Int,
            NodeValue::UInt(_) => ValueType::UInt,
            NodeValue::Float(_) => ValueType::Float,
            NodeValue::Str(_) => ValueType::String,
            NodeValue::Array(_) => ValueType::Array,
            NodeValue::Table(_) => ValueType::Table,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, NodeValue::Array(_) | NodeValue::Table(_))
    }

    pub(crate) fn run(&self) -> Option<Run> {
        match self {
            NodeValue::Array(run) | NodeValue::Table(run) => Some(*run),
            _ => None,
        }
    }
}

/// One slot in the node pool: a child value plus its table key, if any.
/// Array children have no key.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeSlot {
    pub key: Option<StrRef>,
    pub value: NodeValue,
}

/// A slab of node slots scoped to one document.
///
/// Container children are handed out as contiguous runs, bump-style: runs
/// are never returned individually, and a run that is still the newest
/// allocation can be extended in place. Everything is dropped at once on
/// [`clear`](NodePool::clear).
#[derive(Default)]
pub struct NodePool {
    slots: Vec<NodeSlot>,
}

impl NodePool {
    pub fn new() -> NodePool {
        NodePool { slots: Vec::new() }
    }

    /// Reserves a fresh run of `cap` slots. Returns `None` if the upstream
    /// allocator fails.
    pub(crate) fn alloc_run(&mut self, cap: usize) -> Option<Run> {
        if self.slots.try_reserve(cap).is_err() {
            return None;
        }
        let start = self.slots.len();
        self.slots.resize_with(start + cap, NodeSlot::default);
        Some(Run {
            start: start as u32,
            len: 0,
            cap: cap as u32,
        })
    }

    /// Grows `run` to hold at least `new_cap` slots, in place when `run`
    /// is still the newest allocation, otherwise by relocating its live
    /// slots to a fresh run. Returns the resulting run and whether the
    /// slots moved.
    pub(crate) fn grow_run(&mut self, run: Run, new_cap: usize) -> Option<(Run, bool)> {
        if new_cap <= run.capacity() {
            return Some((run, false));
        }
        if run.start as usize + run.capacity() == self.slots.len() {
            let extra = new_cap - run.capacity();
            if self.slots.try_reserve(extra).is_err() {
                return None;
            }
            self.slots.resize_with(self.slots.len() + extra, NodeSlot::default);
            return Some((
                Run {
                    cap: new_cap as u32,
                    ..run
                },
                false,
            ));
        }
        let new_run = self.alloc_run(new_cap)?;
        // The old slots stay behind as dead pool space, same as any bump
        // allocator; they are reclaimed on clear().
        for i in 0..run.len() {
            self.slots[new_run.start as usize + i] = self.slots[run.start as usize + i];
        }
        Some((
            Run {
                len: run.len,
                ..new_run
            },
            true,
        ))
    }

    /// Appends `slot` to `run`. Fails when the run is full; growth is the
    /// caller's responsibility.
    pub(crate) fn insert(&mut self, run: &mut Run, slot: NodeSlot) -> bool {
        if run.is_full() {
            return false;
        }
        self.slots[run.start as usize + run.len()] = slot;
        run.len += 1;
        true
    }

    pub(crate) fn slot_at(&self, index: u32) -> &NodeSlot {
        &self.slots[index as usize]
    }

    pub(crate) fn slot_at_mut(&mut self, index: u32) -> &mut NodeSlot {
        &mut self.slots[index as usize]
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.slots.shrink_to_fit();
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }
}
