//! Helpers for codec payloads shaped as `[[name, value], ...]`
//!
//! Names are written in whichever string kind the wire passes through, so a
//! payload never needs the foreign string codec for its own field names.
//! When reading, either kind is accepted.

use slotgraph_core::{Heap, Value};
use slotgraph_engine::CodecError;
use slotgraph_wire::WireAlphabet;

/// A name as the pass-through string kind for `alphabet`
pub(crate) fn wire_text(alphabet: WireAlphabet, s: &str) -> Value {
    match alphabet {
        WireAlphabet::Text => Value::Text(s.to_string()),
        WireAlphabet::Bytes => Value::Bytes(s.as_bytes().to_vec()),
    }
}

/// Text content of either string kind
pub(crate) fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::Text(s) => Some(s.clone()),
        Value::Bytes(b) => String::from_utf8(b.clone()).ok(),
        _ => None,
    }
}

/// Items of a list object
pub(crate) fn list_of<'h>(heap: &'h Heap, value: &Value, what: &str) -> Result<&'h [Value], CodecError> {
    value
        .as_obj()
        .and_then(|r| heap.list(r))
        .ok_or_else(|| CodecError::invalid(format!("{} must be a list, got {}", what, value.type_name())))
}

/// Allocate `[[name, value], ...]`
pub(crate) fn write_fields(heap: &mut Heap, alphabet: WireAlphabet, fields: Vec<(&str, Value)>) -> Value {
    let pairs = fields
        .into_iter()
        .map(|(name, value)| heap.new_list(vec![wire_text(alphabet, name), value]))
        .collect();
    heap.new_list(pairs)
}

/// Named fields read back from a payload
#[derive(Debug)]
pub(crate) struct Fields(Vec<(String, Value)>);

impl Fields {
    pub(crate) fn read(heap: &Heap, data: &Value) -> Result<Self, CodecError> {
        let mut fields = Vec::new();
        for pair in list_of(heap, data, "payload")? {
            match list_of(heap, pair, "field")? {
                [name, value] => {
                    let name = text_of(name)
                        .ok_or_else(|| CodecError::invalid("field name must be a string"))?;
                    fields.push((name, value.clone()));
                }
                other => {
                    return Err(CodecError::invalid(format!(
                        "field must be a [name, value] pair, got {} items",
                        other.len()
                    )))
                }
            }
        }
        Ok(Fields(fields))
    }

    pub(crate) fn get(&self, name: &str) -> Result<&Value, CodecError> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
            .ok_or_else(|| CodecError::invalid(format!("missing field {:?}", name)))
    }

    pub(crate) fn text(&self, name: &str) -> Result<String, CodecError> {
        text_of(self.get(name)?)
            .ok_or_else(|| CodecError::invalid(format!("field {:?} must be a string", name)))
    }
}
