//! Wire model for slotgraph
//!
//! This crate defines the flat representation the engine produces and
//! consumes:
//!
//! - [`Entry`]: one JSON-primitive-compatible value
//! - [`SlotTable`]: the ordered list of slot payloads, root at index 0
//! - [`markers`]: the reserved mapping marker and extension tag prefix
//! - [`WireAlphabet`]: which host string kind passes straight through
//!
//! ## Wire Encoding Rules
//!
//! | Slot payload | Meaning |
//! |--------------|---------|
//! | `null` / bool / number | scalar |
//! | `"..."` | pass-through string |
//! | `[1, null, [4]]` | sequence; `[4]` references slot 4 |
//! | `["sg/", 1, 2]` | mapping; slots 1 and 2 are `[key, value]` pairs |
//! | `["sg/tuple", 1]` | extension, init data in slot 1 |
//! | `["sg/ndarray", 1, 5]` | extension, init data in slot 1, final data in slot 5 |
//!
//! ## Examples
//!
//! ```
//! use slotgraph_wire::{from_json, to_json, Entry, SlotTable};
//!
//! let table = SlotTable::from_entries(vec![Entry::Seq(vec![
//!     Entry::Int(1),
//!     Entry::Int(2),
//!     Entry::Int(3),
//! ])]);
//! let json = to_json(&table).unwrap();
//! assert_eq!(json, "[[1,2,3]]");
//! assert_eq!(from_json(&json).unwrap(), table);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod alphabet;
pub mod entry;
mod error;
pub mod json;
pub mod markers;
pub mod msgpack;

// Re-export main types
pub use alphabet::{latin1_decode, latin1_encode, WireAlphabet};
pub use entry::{Entry, SlotTable};
pub use error::WireError;
pub use json::{from_json, json_len, to_json, to_json_pretty};
pub use markers::{Leader, MAPPING_MARKER, TAG_PREFIX};
pub use msgpack::{from_msgpack, to_msgpack};
