//! Immutable tuple, the single-phase reference codec
//!
//! Wire form: `["sg/tuple", i]` where slot `i` is a plain list of the items.

use crate::fields::list_of;
use slotgraph_core::{Extension, Heap, Value};
use slotgraph_engine::{Codec, CodecError, Parts, TypeKey};
use std::any::Any;

/// Fixed-size ordered tuple, distinct from a list
#[derive(Debug, Clone, PartialEq)]
pub struct Tuple(pub Vec<Value>);

impl Tuple {
    /// Create a tuple from its items
    pub fn new(items: Vec<Value>) -> Self {
        Tuple(items)
    }

    /// Items in order
    pub fn items(&self) -> &[Value] {
        &self.0
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the tuple is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Extension for Tuple {
    fn type_name(&self) -> &'static str {
        "Tuple"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn children(&self) -> Vec<Value> {
        self.0.clone()
    }

    fn shallow_eq(&self, other: &dyn Extension) -> bool {
        other
            .downcast_ref::<Tuple>()
            .map_or(false, |o| o.len() == self.len())
    }
}

/// Codec for [`Tuple`], tag `"tuple"`
#[derive(Debug, Clone, Copy, Default)]
pub struct TupleCodec;

impl Codec for TupleCodec {
    fn tag(&self) -> &'static str {
        "tuple"
    }

    fn type_key(&self) -> TypeKey {
        TypeKey::of::<Tuple>()
    }

    fn type_name(&self) -> &'static str {
        "Tuple"
    }

    fn encode(&self, heap: &mut Heap, value: &Value) -> Result<Parts, CodecError> {
        let items = value
            .as_obj()
            .and_then(|r| heap.ext::<Tuple>(r))
            .map(|t| t.0.clone())
            .ok_or(CodecError::WrongType {
                expected: "Tuple",
                actual: value.type_name(),
            })?;
        Ok(Parts::single(heap.new_list(items)))
    }

    fn init(&self, heap: &mut Heap, data: Value) -> Result<Value, CodecError> {
        let items = list_of(heap, &data, "tuple init data")?.to_vec();
        Ok(heap.new_ext(Tuple(items)))
    }
}
