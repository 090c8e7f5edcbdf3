//! JSON decoding for slot tables

use crate::entry::SlotTable;
use crate::error::WireError;

/// Decode a slot table from JSON text.
///
/// Only the shape is checked here (an array of JSON primitives); slot
/// references and tags are validated by the decoder that consumes the table.
pub fn from_json(json: &str) -> Result<SlotTable, WireError> {
    Ok(serde_json::from_str(json)?)
}
