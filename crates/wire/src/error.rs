//! Wire errors

use thiserror::Error;

/// Errors turning a slot table into text or bytes and back
#[derive(Debug, Error)]
pub enum WireError {
    /// JSON cannot carry NaN or infinities; serde_json would write `null`
    #[error("slot {slot} holds non-finite float {value}, which JSON cannot represent")]
    NonFiniteFloat {
        /// Slot holding the float
        slot: usize,
        /// The offending value
        value: f64,
    },

    /// Invalid JSON text or shape
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// MessagePack encoding failed
    #[error("MessagePack encode error: {0}")]
    MsgPackEncode(#[from] rmp_serde::encode::Error),

    /// MessagePack decoding failed
    #[error("MessagePack decode error: {0}")]
    MsgPackDecode(#[from] rmp_serde::decode::Error),
}
