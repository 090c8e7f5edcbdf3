//! Reference Scenarios
//!
//! The fixed tables every implementation of the format must produce.

use crate::*;
use slotgraph::{EngineError, Entry};
use std::sync::atomic::{AtomicUsize, Ordering};

// =============================================================================
// EXACT TABLES
// =============================================================================

#[test]
fn test_flat_list_single_slot() {
    let serializer = serializer();
    let mut heap = Heap::new();
    let root = heap.new_list(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);

    let json = serializer.to_json(&mut heap, &root).unwrap();
    assert_eq!(json, "[[1,2,3]]");

    let mut out = Heap::new();
    let back = serializer.from_json(&mut out, &json).unwrap();
    assert_eq!(items(&out, &back), vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
}

#[test]
fn test_tuple_uses_codec() {
    let serializer = serializer();
    let mut heap = Heap::new();
    let root = heap.new_ext(Tuple::new(vec![Value::Int(1), Value::Int(2), Value::Int(3)]));

    let json = serializer.to_json(&mut heap, &root).unwrap();
    assert_eq!(json, r#"[["sg/tuple",1],[1,2,3]]"#);

    let mut out = Heap::new();
    let back = serializer.from_json(&mut out, &json).unwrap();
    let tuple = out.ext::<Tuple>(back.as_obj().unwrap()).unwrap();
    assert_eq!(tuple.items(), &[Value::Int(1), Value::Int(2), Value::Int(3)]);
}

#[test]
fn test_mapping_pairs() {
    let serializer = serializer();
    let mut heap = Heap::new();
    let map: Mapping = vec![(Value::Int(1), Value::Int(2)), (Value::Int(3), Value::Int(4))]
        .into_iter()
        .collect();
    let root = heap.new_map(map);

    let json = serializer.to_json(&mut heap, &root).unwrap();
    assert_eq!(json, r#"[["sg/",1,2],[1,2],[3,4]]"#);

    let mut out = Heap::new();
    let back = serializer.from_json(&mut out, &json).unwrap();
    let decoded = out.map(back.as_obj().unwrap()).unwrap();
    assert_eq!(decoded.len(), 2);
    assert_eq!(decoded.get(&Value::Int(1)), Some(&Value::Int(2)));
    assert_eq!(decoded.get(&Value::Int(3)), Some(&Value::Int(4)));
}

#[test]
fn test_self_boxing_array_keeps_identity() {
    let serializer = serializer();
    let mut heap = Heap::new();
    let root = heap.new_ext(NdArray::boxed(Value::Null));
    let r = root.as_obj().unwrap();
    heap.ext_mut::<NdArray>(r).unwrap().set_boxed(root.clone()).unwrap();

    let (out, back) = json_roundtrip(&serializer, &mut heap, &root);
    let array = out.ext::<NdArray>(back.as_obj().unwrap()).unwrap();
    assert!(array.boxed_value().unwrap().same_identity(&back));
}

#[test]
fn test_boxed_mapping_cycle() {
    // box -> {123: box}
    let serializer = serializer();
    let mut heap = Heap::new();
    let root = heap.new_ext(NdArray::boxed(Value::Null));
    let map: Mapping = vec![(Value::Int(123), root.clone())].into_iter().collect();
    let inner = heap.new_map(map);
    let r = root.as_obj().unwrap();
    heap.ext_mut::<NdArray>(r).unwrap().set_boxed(inner).unwrap();

    let (out, back) = json_roundtrip(&serializer, &mut heap, &root);
    let array = out.ext::<NdArray>(back.as_obj().unwrap()).unwrap();
    let decoded = out.map(array.boxed_value().unwrap().as_obj().unwrap()).unwrap();
    assert!(decoded.get(&Value::Int(123)).unwrap().same_identity(&back));
}

// =============================================================================
// FAILURES
// =============================================================================

#[test]
fn test_unregistered_type_fails_whole_encode() {
    let serializer = serializer();
    let mut heap = Heap::new();
    let widget = heap.new_ext(Widget);
    let root = heap.new_list(vec![Value::Int(1), widget]);

    let err = serializer.encode(&mut heap, &root).unwrap_err();
    assert!(err.is_encode_error());
    assert!(err.to_string().contains("Widget"));
    assert_eq!(
        err.engine(),
        Some(&EngineError::UnencodableType {
            type_name: "Widget".to_string()
        })
    );
}

static FINISH_CALLS: AtomicUsize = AtomicUsize::new(0);

/// Codec whose init always yields null
struct NullInit;

impl Codec for NullInit {
    fn tag(&self) -> &'static str {
        "null-init"
    }
    fn type_key(&self) -> TypeKey {
        TypeKey::of::<Widget>()
    }
    fn type_name(&self) -> &'static str {
        "Widget"
    }
    fn encode(
        &self,
        _heap: &mut Heap,
        _value: &Value,
    ) -> std::result::Result<Parts, CodecError> {
        Ok(Parts::two_phase(Value::Int(1), Value::Int(2)))
    }
    fn init(&self, _heap: &mut Heap, _data: Value) -> std::result::Result<Value, CodecError> {
        Ok(Value::Null)
    }
    fn is_two_phase(&self) -> bool {
        true
    }
    fn finish(
        &self,
        _heap: &mut Heap,
        object: Value,
        _data: Value,
    ) -> std::result::Result<Value, CodecError> {
        FINISH_CALLS.fetch_add(1, Ordering::SeqCst);
        Ok(object)
    }
}

#[test]
fn test_null_init_fails_before_finish() {
    let serializer = Serializer::builder().codec(NullInit).build().unwrap();
    let mut heap = Heap::new();
    let root = heap.new_ext(Widget);

    let json = serializer.to_json(&mut heap, &root).unwrap();
    assert_eq!(json, r#"[["sg/null-init",1,2],1,2]"#);

    let mut out = Heap::new();
    let err = serializer.from_json(&mut out, &json).unwrap_err();
    assert!(err.is_decode_error());
    assert!(matches!(err.engine(), Some(EngineError::NullInitResult { .. })));
    assert_eq!(err.slot(), Some(0));
    assert_eq!(FINISH_CALLS.load(Ordering::SeqCst), 0);
    assert!(out.is_empty());
}

// =============================================================================
// IDEMPOTENT TAGGING
// =============================================================================

#[test]
fn test_plain_data_needs_no_codecs() {
    let serializer = serializer();
    let bare = Serializer::builder().without_standard_codecs().build().unwrap();

    let mut heap = Heap::new();
    let inner: Mapping = vec![
        (Value::from("name"), Value::from("slot")),
        (Value::Int(7), Value::Float(0.5)),
    ]
    .into_iter()
    .collect();
    let inner = heap.new_map(inner);
    let root = heap.new_list(vec![inner, Value::Null, Value::Bool(false)]);

    let table = serializer.encode(&mut heap, &root).unwrap();
    for entry in table.iter() {
        if let Some(Entry::Str(leader)) = entry.as_seq().and_then(|items| items.first()) {
            assert_eq!(leader, "sg/", "only the mapping marker may appear");
        }
    }

    let mut out = Heap::new();
    let back = bare.decode(&mut out, &table).unwrap();
    assert!(heap.graph_eq(&root, &out, &back));
}
