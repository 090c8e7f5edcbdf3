//! Engine configuration
//!
//! ## Example
//!
//! ```
//! use slotgraph_engine::{Config, ForeignStrings};
//! use slotgraph_wire::WireAlphabet;
//!
//! let config = Config::bytes().with_foreign_strings(ForeignStrings::Interned);
//! assert_eq!(config.alphabet, WireAlphabet::Bytes);
//!
//! let loaded: Config = serde_json::from_str(r#"{"alphabet": "text"}"#).unwrap();
//! assert_eq!(loaded, Config::text());
//! ```

use crate::registry::TypeKey;
use serde::{Deserialize, Serialize};
use slotgraph_wire::WireAlphabet;

/// How the non-pass-through string kind is deduplicated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForeignStrings {
    /// Every occurrence gets its own slot, like any value type
    #[default]
    Scalar,
    /// Occurrences with equal contents share one slot
    Interned,
}

/// Settings shared by an encoder and the decoder that reads its output.
///
/// Both sides must agree on `alphabet`. `foreign_strings` only affects the
/// encoder; tables written either way decode the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which host string kind passes straight through
    pub alphabet: WireAlphabet,
    /// Dedup policy for the other string kind
    pub foreign_strings: ForeignStrings,
}

impl Config {
    /// Text passes through, byte strings use the `bytes` codec
    pub fn text() -> Self {
        Config {
            alphabet: WireAlphabet::Text,
            ..Config::default()
        }
    }

    /// Byte strings pass through, text uses the `text` codec
    pub fn bytes() -> Self {
        Config {
            alphabet: WireAlphabet::Bytes,
            ..Config::default()
        }
    }

    /// Set the wire alphabet
    pub fn with_alphabet(mut self, alphabet: WireAlphabet) -> Self {
        self.alphabet = alphabet;
        self
    }

    /// Set the foreign string dedup policy
    pub fn with_foreign_strings(mut self, policy: ForeignStrings) -> Self {
        self.foreign_strings = policy;
        self
    }

    /// Registry key of the string kind that needs a codec
    pub fn foreign_string_key(&self) -> TypeKey {
        match self.alphabet {
            WireAlphabet::Text => TypeKey::Bytes,
            WireAlphabet::Bytes => TypeKey::Text,
        }
    }
}
