//! Identity tracker and slot table under construction
//!
//! The encoder assigns a slot to a composite *before* walking its children,
//! so a child can refer back to a parent whose payload is not written yet.
//! Reserved slots stay empty until their payload is filled exactly once.

use crate::error::{Error, Result};
use rustc_hash::FxHashMap;
use slotgraph_core::ObjRef;
use slotgraph_wire::{Entry, SlotTable};

/// Dedup key for a visited value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identity {
    /// A heap object; identity is its arena index
    Object(ObjRef),
    /// Interned foreign text, keyed by contents
    Text(String),
    /// Interned foreign bytes, keyed by contents
    Bytes(Vec<u8>),
}

/// Append-only slot list plus the identity -> slot map
#[derive(Debug, Default)]
pub struct IdentityTracker {
    slots: Vec<Option<Entry>>,
    ids: FxHashMap<Identity, usize>,
    /// Tagged slots whose init data is still being walked, with their type
    init_open: FxHashMap<usize, String>,
}

impl IdentityTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of slots assigned so far
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if no slot has been assigned
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slot already assigned to `id`
    pub fn lookup(&self, id: &Identity) -> Option<usize> {
        self.ids.get(id).copied()
    }

    /// Append a slot whose payload is already known. Never tracked.
    pub fn push_done(&mut self, entry: Entry) -> usize {
        let slot = self.slots.len();
        self.slots.push(Some(entry));
        slot
    }

    /// Reserve an empty slot, recording `id` so later visits find it
    pub fn reserve(&mut self, id: Option<Identity>) -> usize {
        let slot = self.slots.len();
        self.slots.push(None);
        if let Some(id) = id {
            self.ids.insert(id, slot);
        }
        slot
    }

    /// Mark `slot` as walking its init data
    pub fn open_init(&mut self, slot: usize, type_name: &str) {
        self.init_open.insert(slot, type_name.to_string());
    }

    /// The init data of `slot` has been fully walked
    pub fn close_init(&mut self, slot: usize) {
        self.init_open.remove(&slot);
    }

    /// Resolve an identity hit on `slot`.
    ///
    /// A hit on a slot whose init data is still open is a cycle through
    /// that init data, and decoding could never rebuild it.
    pub fn revisit(&self, slot: usize) -> Result<usize> {
        match self.init_open.get(&slot) {
            Some(type_name) => Err(Error::InitCycle {
                slot,
                type_name: type_name.clone(),
            }),
            None => Ok(slot),
        }
    }

    /// Write the payload of a reserved slot
    pub fn fill(&mut self, slot: usize, entry: Entry) {
        debug_assert!(
            self.slots[slot].is_none(),
            "slot {} written twice",
            slot
        );
        self.slots[slot] = Some(entry);
    }

    /// Produce the finished table.
    ///
    /// Fails if a reserved slot never received its payload.
    pub fn finish(self) -> Result<SlotTable> {
        let mut entries = Vec::with_capacity(self.slots.len());
        for (slot, entry) in self.slots.into_iter().enumerate() {
            match entry {
                Some(entry) => entries.push(entry),
                None => return Err(Error::malformed(slot, "slot reserved but never written")),
            }
        }
        Ok(SlotTable::from_entries(entries))
    }
}
