//! Wire Alphabets
//!
//! One string kind passes straight through; the other rides its codec.

use crate::*;
use slotgraph::Entry;

fn slot_json(serializer: &Serializer, heap: &mut Heap, root: &Value) -> String {
    serializer.to_json(heap, root).unwrap()
}

// =============================================================================
// TEXT ALPHABET
// =============================================================================

#[test]
fn test_bytes_use_direct_form_when_shorter() {
    let serializer = serializer();
    let mut heap = Heap::new();
    let root = Value::Bytes(b"hello".to_vec());

    let json = slot_json(&serializer, &mut heap, &root);
    assert_eq!(json, r#"[["sg/bytes",1],[0,[2]],"hello"]"#);

    let mut out = Heap::new();
    let back = serializer.from_json(&mut out, &json).unwrap();
    assert_eq!(back, root);
}

#[test]
fn test_bytes_fall_back_to_base64() {
    let serializer = serializer();
    let mut heap = Heap::new();
    let root = Value::Bytes(vec![0u8; 40]);

    let table = serializer.encode(&mut heap, &root).unwrap();
    let payload = table.get(1).and_then(|e| e.as_seq()).unwrap();
    assert_eq!(payload[0], Entry::Int(1));

    let mut out = Heap::new();
    assert_eq!(serializer.decode(&mut out, &table).unwrap(), root);
}

#[test]
fn test_text_keys_pass_through() {
    let serializer = serializer();
    let mut heap = Heap::new();
    let map: Mapping = vec![(Value::from("k"), Value::from("v"))]
        .into_iter()
        .collect();
    let root = heap.new_map(map);

    let json = slot_json(&serializer, &mut heap, &root);
    assert_eq!(json, r#"[["sg/",1],[[2],[3]],"k","v"]"#);
    assert_roundtrip(&serializer, &mut heap, &root);
}

// =============================================================================
// BYTES ALPHABET
// =============================================================================

#[test]
fn test_bytes_pass_through_as_latin1() {
    let serializer = bytes_serializer();
    let mut heap = Heap::new();
    let root = heap.new_list(vec![Value::Bytes(vec![b'h', 0xE9])]);

    let json = slot_json(&serializer, &mut heap, &root);
    assert_eq!(json, "[[[1]],\"h\u{e9}\"]");

    let mut out = Heap::new();
    let back = serializer.from_json(&mut out, &json).unwrap();
    assert_eq!(items(&out, &back), vec![Value::Bytes(vec![b'h', 0xE9])]);
}

#[test]
fn test_text_uses_codec() {
    let serializer = bytes_serializer();
    let mut heap = Heap::new();

    let json = slot_json(&serializer, &mut heap, &Value::from("hi"));
    assert_eq!(json, r#"[["sg/text",1],"hi"]"#);

    let root = heap.new_list(vec![Value::from("caf\u{e9}"), Value::from("\u{1F980}")]);
    assert_roundtrip(&serializer, &mut heap, &root);
}

#[test]
fn test_non_latin1_rejected_in_bytes_alphabet() {
    let serializer = bytes_serializer();
    let mut out = Heap::new();
    let err = serializer
        .from_json(&mut out, "[[[1]],\"\u{1F980}\"]")
        .unwrap_err();
    assert!(matches!(
        err.engine(),
        Some(slotgraph::EngineError::MalformedSlot { slot: 1, .. })
    ));
}

#[test]
fn test_arrays_in_both_alphabets() {
    for serializer in [serializer(), bytes_serializer()] {
        let mut heap = Heap::new();
        let array = NdArray::from_f64(vec![2, 2], &[1.0, -2.5, 0.0, 8.0]).unwrap();
        let array = heap.new_ext(array);
        let root = heap.new_list(vec![array.clone(), array]);

        let (out, back) = json_roundtrip(&serializer, &mut heap, &root);
        assert!(heap.graph_eq(&root, &out, &back));

        let decoded = items(&out, &back);
        assert!(decoded[0].same_identity(&decoded[1]));
        let array = out.ext::<NdArray>(decoded[0].as_obj().unwrap()).unwrap();
        assert_eq!(array.shape(), &[2, 2]);
        assert_eq!(array.to_f64_vec().unwrap(), vec![1.0, -2.5, 0.0, 8.0]);
    }
}

// =============================================================================
// FOREIGN STRING POLICY
// =============================================================================

#[test]
fn test_scalar_policy_repeats_foreign_strings() {
    let serializer = serializer();
    let mut heap = Heap::new();
    let root = heap.new_list(vec![Value::Bytes(b"ab".to_vec()), Value::Bytes(b"ab".to_vec())]);

    let table = serializer.encode(&mut heap, &root).unwrap();
    assert_eq!(table.len(), 7);
}

#[test]
fn test_interned_policy_shares_foreign_strings() {
    let serializer = Serializer::builder()
        .foreign_strings(ForeignStrings::Interned)
        .build()
        .unwrap();
    let mut heap = Heap::new();
    let root = heap.new_list(vec![Value::Bytes(b"ab".to_vec()), Value::Bytes(b"ab".to_vec())]);

    let json = slot_json(&serializer, &mut heap, &root);
    assert_eq!(json, r#"[[[1],[1]],["sg/bytes",2],[0,[3]],"ab"]"#);

    // Either policy reads back the same
    let mut out = Heap::new();
    let back = crate::serializer().from_json(&mut out, &json).unwrap();
    assert_eq!(
        items(&out, &back),
        vec![Value::Bytes(b"ab".to_vec()), Value::Bytes(b"ab".to_vec())]
    );
}
