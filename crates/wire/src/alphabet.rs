//! Wire alphabet
//!
//! The host has two string kinds, UTF-8 text and raw bytes, but a wire string
//! is always text. Exactly one kind is the pass-through scalar written
//! straight into a slot; the other goes through a registered codec.
//!
//! With [`WireAlphabet::Bytes`] a pass-through byte string is carried as its
//! latin-1 reinterpretation: byte `b` becomes `char::from(b)`.

use serde::{Deserialize, Serialize};

/// Which host string kind is the pass-through scalar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireAlphabet {
    /// UTF-8 text passes through; byte strings need a codec
    #[default]
    Text,
    /// Byte strings pass through; text needs a codec
    Bytes,
}

/// Reinterpret bytes as latin-1 text (one char per byte)
pub fn latin1_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Inverse of [`latin1_encode`].
///
/// Returns the first offending char if the text holds a code point above
/// U+00FF.
pub fn latin1_decode(text: &str) -> Result<Vec<u8>, char> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).map_err(|_| c))
        .collect()
}
