//! Insertion-ordered `Value -> Value` mapping
//!
//! Keys compare with [`Value::same_identity`]: strings and numbers by value,
//! `Ref` keys by handle. Entries iterate in insertion order, which is the
//! order the encoder emits pair slots in.

use crate::value::Value;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Ordered mapping of values to values
#[derive(Debug, Clone, Default)]
pub struct Mapping {
    entries: Vec<(Value, Value)>,
    /// identity hash -> positions in `entries`
    index: FxHashMap<u64, SmallVec<[usize; 1]>>,
}

impl Mapping {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mapping with pre-allocated capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if mapping is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &Value) -> Option<usize> {
        self.index
            .get(&key.identity_hash())?
            .iter()
            .copied()
            .find(|&pos| self.entries[pos].0.same_identity(key))
    }

    /// Insert a key/value pair.
    ///
    /// An existing equal key keeps its position; its old value is returned.
    pub fn insert(&mut self, key: Value, value: Value) -> Option<Value> {
        if let Some(pos) = self.position(&key) {
            return Some(std::mem::replace(&mut self.entries[pos].1, value));
        }
        let pos = self.entries.len();
        self.index
            .entry(key.identity_hash())
            .or_default()
            .push(pos);
        self.entries.push((key, value));
        None
    }

    /// Look up a value by key
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.position(key).map(|pos| &self.entries[pos].1)
    }

    /// Mutable lookup by key
    pub fn get_mut(&mut self, key: &Value) -> Option<&mut Value> {
        self.position(key).map(move |pos| &mut self.entries[pos].1)
    }

    /// Check whether a key is present
    pub fn contains_key(&self, key: &Value) -> bool {
        self.position(key).is_some()
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Values in insertion order
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }
}

impl FromIterator<(Value, Value)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
        let mut map = Mapping::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}
