//! JSON encoding for slot tables

use crate::entry::SlotTable;
use crate::error::WireError;

fn check_finite(table: &SlotTable) -> Result<(), WireError> {
    for (slot, entry) in table.iter().enumerate() {
        if let Some(value) = entry.find_non_finite() {
            return Err(WireError::NonFiniteFloat { slot, value });
        }
    }
    Ok(())
}

/// Encode a slot table as compact JSON
pub fn to_json(table: &SlotTable) -> Result<String, WireError> {
    check_finite(table)?;
    Ok(serde_json::to_string(table)?)
}

/// Encode a slot table as indented JSON
pub fn to_json_pretty(table: &SlotTable) -> Result<String, WireError> {
    check_finite(table)?;
    Ok(serde_json::to_string_pretty(table)?)
}

/// Length in bytes of `s` once written as a JSON string literal
pub fn json_len(s: &str) -> usize {
    // Serializing a str into a Vec cannot fail
    serde_json::to_vec(s).map(|v| v.len()).unwrap_or(usize::MAX)
}
