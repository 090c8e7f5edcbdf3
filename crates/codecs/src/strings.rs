//! Codecs for the string kind the wire does not pass through
//!
//! With the text alphabet, byte strings go through [`BytesCodec`]:
//!
//! | init data | meaning |
//! |-----------|---------|
//! | `[0, s]` | `s` is the bytes reinterpreted as latin-1 text |
//! | `[1, s]` | `s` is the standard base64 encoding of the bytes |
//!
//! The encoder writes whichever form is shorter once serialized as a JSON
//! string by this crate's own writer; on a tie the direct form wins.
//!
//! With the bytes alphabet, text goes through [`TextCodec`] as its UTF-8
//! bytes.

use crate::fields::list_of;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use slotgraph_core::{Heap, Value};
use slotgraph_engine::{Codec, CodecError, Parts, TypeKey};
use slotgraph_wire::{json_len, latin1_decode, latin1_encode};

/// Discriminator for the direct latin-1 form
pub const DIRECT: i64 = 0;
/// Discriminator for the base64 form
pub const BASE64: i64 = 1;

/// Pick the smaller representation of `bytes`.
///
/// Size is the UTF-8 length of the string literal as [`to_json`] writes it:
/// control characters are escaped but bytes above 0x7f go out raw, two UTF-8
/// bytes each. A writer that escaped every non-ASCII character would count
/// those as six and could pick base64 where this picks the direct form.
///
/// [`to_json`]: slotgraph_wire::to_json
pub fn choose_representation(bytes: &[u8]) -> (i64, String) {
    let direct = latin1_encode(bytes);
    let encoded = STANDARD.encode(bytes);
    if json_len(&direct) <= json_len(&encoded) {
        (DIRECT, direct)
    } else {
        (BASE64, encoded)
    }
}

/// Dual-representation codec for byte strings, tag `"bytes"`
#[derive(Debug, Clone, Copy, Default)]
pub struct BytesCodec;

impl Codec for BytesCodec {
    fn tag(&self) -> &'static str {
        "bytes"
    }

    fn type_key(&self) -> TypeKey {
        TypeKey::Bytes
    }

    fn type_name(&self) -> &'static str {
        "Bytes"
    }

    fn encode(&self, heap: &mut Heap, value: &Value) -> Result<Parts, CodecError> {
        let bytes = value.as_bytes().ok_or(CodecError::WrongType {
            expected: "Bytes",
            actual: value.type_name(),
        })?;
        let (discriminator, text) = choose_representation(bytes);
        Ok(Parts::single(heap.new_list(vec![
            Value::Int(discriminator),
            Value::Text(text),
        ])))
    }

    fn init(&self, heap: &mut Heap, data: Value) -> Result<Value, CodecError> {
        let (discriminator, text) = match list_of(heap, &data, "bytes init data")? {
            [d, Value::Text(text)] => (d.clone(), text.as_str()),
            _ => {
                return Err(CodecError::invalid(
                    "bytes init data must be [discriminator, text]",
                ))
            }
        };

        let bytes = match discriminator {
            Value::Int(DIRECT) => latin1_decode(text).map_err(|c| {
                CodecError::invalid(format!("character {:?} is outside latin-1", c))
            })?,
            Value::Int(BASE64) => STANDARD
                .decode(text)
                .map_err(|e| CodecError::invalid(format!("invalid base64: {}", e)))?,
            Value::Int(other) => return Err(CodecError::BadStringDiscriminator(other.to_string())),
            other => {
                return Err(CodecError::BadStringDiscriminator(
                    other.type_name().to_string(),
                ))
            }
        };
        Ok(Value::Bytes(bytes))
    }
}

/// UTF-8 codec for text, tag `"text"`
#[derive(Debug, Clone, Copy, Default)]
pub struct TextCodec;

impl Codec for TextCodec {
    fn tag(&self) -> &'static str {
        "text"
    }

    fn type_key(&self) -> TypeKey {
        TypeKey::Text
    }

    fn type_name(&self) -> &'static str {
        "Text"
    }

    fn encode(&self, _heap: &mut Heap, value: &Value) -> Result<Parts, CodecError> {
        let text = value.as_text().ok_or(CodecError::WrongType {
            expected: "Text",
            actual: value.type_name(),
        })?;
        Ok(Parts::single(Value::Bytes(text.as_bytes().to_vec())))
    }

    fn init(&self, _heap: &mut Heap, data: Value) -> Result<Value, CodecError> {
        match data {
            Value::Bytes(bytes) => String::from_utf8(bytes)
                .map(Value::Text)
                .map_err(|e| CodecError::invalid(format!("invalid UTF-8: {}", e))),
            Value::Text(text) => Ok(Value::Text(text)),
            other => Err(CodecError::invalid(format!(
                "text init data must be bytes, got {}",
                other.type_name()
            ))),
        }
    }
}
