//! Slot entries
//!
//! An [`Entry`] is one JSON-primitive-compatible value. A slot's payload is an
//! entry, and a [`SlotTable`] is the ordered list of every slot's payload.
//!
//! ## Payload Shapes
//!
//! | Payload | Meaning |
//! |---------|---------|
//! | `null`, bool, number | scalar |
//! | `"..."` | pass-through string |
//! | `[x, [j], ...]` | plain sequence; `[j]` references slot `j` |
//! | `["sg/", i, ...]` | mapping; each `i` is a `[key, value]` pair slot |
//! | `["sg/tag", i]`, `["sg/tag", i, f]` | extension with init (and final) slot |

use serde::de::{self, Deserialize, Deserializer, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeSeq, Serializer};
use std::fmt;

/// One JSON-primitive-compatible wire value
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    /// `null`
    Null,
    /// `true` / `false`
    Bool(bool),
    /// Integer number
    Int(i64),
    /// Floating point number
    Float(f64),
    /// String
    Str(String),
    /// Ordered sequence
    Seq(Vec<Entry>),
}

impl Entry {
    /// Reference to slot `index`: the single-element sequence `[index]`
    pub fn reference(index: usize) -> Entry {
        Entry::Seq(vec![Entry::Int(index as i64)])
    }

    /// Bare slot index, as used after a mapping marker or tag
    pub fn index(index: usize) -> Entry {
        Entry::Int(index as i64)
    }

    /// If this is a reference `[j]`, return `j`.
    ///
    /// Negative indices are not references.
    pub fn as_reference(&self) -> Option<usize> {
        match self {
            Entry::Seq(items) if items.len() == 1 => items[0].as_index(),
            _ => None,
        }
    }

    /// If this is a bare non-negative integer, return it as an index
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Entry::Int(i) => usize::try_from(*i).ok(),
            _ => None,
        }
    }

    /// True for `null`, bool and numbers
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Entry::Null | Entry::Bool(_) | Entry::Int(_) | Entry::Float(_)
        )
    }

    /// Try to get as string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Entry::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as sequence slice
    pub fn as_seq(&self) -> Option<&[Entry]> {
        match self {
            Entry::Seq(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the type name as a string (for error messages)
    pub fn type_name(&self) -> &'static str {
        match self {
            Entry::Null => "null",
            Entry::Bool(_) => "bool",
            Entry::Int(_) => "int",
            Entry::Float(_) => "float",
            Entry::Str(_) => "string",
            Entry::Seq(_) => "sequence",
        }
    }

    /// First non-finite float anywhere inside this entry
    pub(crate) fn find_non_finite(&self) -> Option<f64> {
        match self {
            Entry::Float(f) if !f.is_finite() => Some(*f),
            Entry::Seq(items) => items.iter().find_map(Entry::find_non_finite),
            _ => None,
        }
    }
}

impl From<&str> for Entry {
    fn from(s: &str) -> Self {
        Entry::Str(s.to_string())
    }
}

impl From<i64> for Entry {
    fn from(i: i64) -> Self {
        Entry::Int(i)
    }
}

// ============================================================================
// Serde
// ============================================================================

impl Serialize for Entry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Entry::Null => serializer.serialize_unit(),
            Entry::Bool(b) => serializer.serialize_bool(*b),
            Entry::Int(i) => serializer.serialize_i64(*i),
            Entry::Float(f) => serializer.serialize_f64(*f),
            Entry::Str(s) => serializer.serialize_str(s),
            Entry::Seq(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

struct EntryVisitor;

impl<'de> Visitor<'de> for EntryVisitor {
    type Value = Entry;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("null, bool, number, string or sequence")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Entry, E> {
        Ok(Entry::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Entry, E> {
        Ok(Entry::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Entry, D::Error> {
        Entry::deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, b: bool) -> Result<Entry, E> {
        Ok(Entry::Bool(b))
    }

    fn visit_i64<E: de::Error>(self, i: i64) -> Result<Entry, E> {
        Ok(Entry::Int(i))
    }

    fn visit_u64<E: de::Error>(self, u: u64) -> Result<Entry, E> {
        // Values above i64::MAX fall back to float, as JSON numbers do
        Ok(i64::try_from(u)
            .map(Entry::Int)
            .unwrap_or(Entry::Float(u as f64)))
    }

    fn visit_f64<E: de::Error>(self, f: f64) -> Result<Entry, E> {
        Ok(Entry::Float(f))
    }

    fn visit_str<E: de::Error>(self, s: &str) -> Result<Entry, E> {
        Ok(Entry::Str(s.to_string()))
    }

    fn visit_string<E: de::Error>(self, s: String) -> Result<Entry, E> {
        Ok(Entry::Str(s))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<Entry, A::Error> {
        let mut items = Vec::with_capacity(access.size_hint().unwrap_or(0).min(4096));
        while let Some(item) = access.next_element::<Entry>()? {
            items.push(item);
        }
        Ok(Entry::Seq(items))
    }
}

impl<'de> Deserialize<'de> for Entry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Entry, D::Error> {
        deserializer.deserialize_any(EntryVisitor)
    }
}

// ============================================================================
// SlotTable
// ============================================================================

/// The flat encoded form: slot `k` holds `entries[k]`, slot 0 is the root.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SlotTable {
    entries: Vec<Entry>,
}

impl SlotTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap already-built entries
    pub fn from_entries(entries: Vec<Entry>) -> Self {
        Self { entries }
    }

    /// Number of slots
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if table has no slots
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Payload of slot `index`
    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    /// All payloads in slot order
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Unwrap into the payload list
    pub fn into_entries(self) -> Vec<Entry> {
        self.entries
    }

    /// Iterate payloads in slot order
    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }
}

impl From<Vec<Entry>> for SlotTable {
    fn from(entries: Vec<Entry>) -> Self {
        Self::from_entries(entries)
    }
}

impl Serialize for SlotTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SlotTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<SlotTable, D::Error> {
        Vec::<Entry>::deserialize(deserializer).map(SlotTable::from_entries)
    }
}
