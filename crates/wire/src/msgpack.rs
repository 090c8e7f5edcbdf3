//! MessagePack form of a slot table
//!
//! Unlike JSON, MessagePack carries NaN and infinities, so no finiteness
//! check is needed.

use crate::entry::SlotTable;
use crate::error::WireError;

/// Encode a slot table as MessagePack
pub fn to_msgpack(table: &SlotTable) -> Result<Vec<u8>, WireError> {
    Ok(rmp_serde::to_vec(table)?)
}

/// Decode a slot table from MessagePack
pub fn from_msgpack(bytes: &[u8]) -> Result<SlotTable, WireError> {
    Ok(rmp_serde::from_slice(bytes)?)
}
