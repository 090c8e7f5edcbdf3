//! Shared References and Cycles
//!
//! Identity must survive the trip: one slot per object on the way out, one
//! object per slot on the way back.

use crate::*;

// =============================================================================
// DEDUPLICATION
// =============================================================================

#[test]
fn test_shared_list_written_once() {
    let serializer = serializer();
    let mut heap = Heap::new();
    let shared = heap.new_list(vec![Value::from("payload")]);
    let root = heap.new_list(vec![shared.clone(), shared.clone(), shared]);

    let table = serializer.encode(&mut heap, &root).unwrap();
    // root, shared list, its string
    assert_eq!(table.len(), 3);

    let mut out = Heap::new();
    let back = serializer.decode(&mut out, &table).unwrap();
    let decoded = items(&out, &back);
    assert!(decoded[0].same_identity(&decoded[1]));
    assert!(decoded[1].same_identity(&decoded[2]));
}

#[test]
fn test_diamond() {
    let serializer = serializer();
    let mut heap = Heap::new();
    let bottom = heap.new_ext(Tuple::new(vec![Value::Int(9)]));
    let left = heap.new_list(vec![bottom.clone()]);
    let right: Mapping = vec![(Value::Int(0), bottom)].into_iter().collect();
    let right = heap.new_map(right);
    let root = heap.new_list(vec![left, right]);

    let (out, back) = json_roundtrip(&serializer, &mut heap, &root);
    assert!(heap.graph_eq(&root, &out, &back));

    let top = items(&out, &back);
    let via_left = items(&out, &top[0])[0].clone();
    let via_right = out
        .map(top[1].as_obj().unwrap())
        .unwrap()
        .get(&Value::Int(0))
        .cloned()
        .unwrap();
    assert!(via_left.same_identity(&via_right));
}

#[test]
fn test_shared_object_as_key_and_value() {
    let serializer = serializer();
    let mut heap = Heap::new();
    let key = heap.new_ext(Tuple::new(vec![Value::Int(1), Value::Int(2)]));
    let map: Mapping = vec![(key.clone(), key)].into_iter().collect();
    let root = heap.new_map(map);

    let (out, back) = json_roundtrip(&serializer, &mut heap, &root);
    let decoded = out.map(back.as_obj().unwrap()).unwrap();
    let (k, v) = decoded.iter().next().unwrap();
    assert!(k.same_identity(v));
}

#[test]
fn test_equal_but_distinct_lists_stay_distinct() {
    let serializer = serializer();
    let mut heap = Heap::new();
    let a = heap.new_list(vec![Value::Int(1)]);
    let b = heap.new_list(vec![Value::Int(1)]);
    let root = heap.new_list(vec![a, b]);

    let table = serializer.encode(&mut heap, &root).unwrap();
    assert_eq!(table.len(), 3);

    let mut out = Heap::new();
    let back = serializer.decode(&mut out, &table).unwrap();
    let decoded = items(&out, &back);
    assert!(!decoded[0].same_identity(&decoded[1]));
}

// =============================================================================
// CYCLES
// =============================================================================

#[test]
fn test_list_containing_itself() {
    let serializer = serializer();
    let mut heap = Heap::new();
    let root = heap.new_list(vec![]);
    let r = root.as_obj().unwrap();
    heap.list_mut(r).unwrap().push(root.clone());

    let json = serializer.to_json(&mut heap, &root).unwrap();
    assert_eq!(json, "[[[0]]]");

    let mut out = Heap::new();
    let back = serializer.from_json(&mut out, &json).unwrap();
    assert!(items(&out, &back)[0].same_identity(&back));
}

#[test]
fn test_mapping_containing_itself() {
    let serializer = serializer();
    let mut heap = Heap::new();
    let root = heap.new_map(Mapping::new());
    let r = root.as_obj().unwrap();
    heap.map_mut(r)
        .unwrap()
        .insert(Value::from("self"), root.clone());

    let (out, back) = json_roundtrip(&serializer, &mut heap, &root);
    let decoded = out.map(back.as_obj().unwrap()).unwrap();
    assert!(decoded
        .get(&Value::from("self"))
        .unwrap()
        .same_identity(&back));
}

#[test]
fn test_mutual_cycle_between_list_and_mapping() {
    let serializer = serializer();
    let mut heap = Heap::new();
    let list = heap.new_list(vec![]);
    let map: Mapping = vec![(Value::Int(1), list.clone())].into_iter().collect();
    let map = heap.new_map(map);
    let r = list.as_obj().unwrap();
    heap.list_mut(r).unwrap().push(map);

    let (out, back) = json_roundtrip(&serializer, &mut heap, &list);
    assert!(heap.graph_eq(&list, &out, &back));

    let inner = items(&out, &back)[0].clone();
    let again = out
        .map(inner.as_obj().unwrap())
        .unwrap()
        .get(&Value::Int(1))
        .cloned()
        .unwrap();
    assert!(again.same_identity(&back));
}

#[test]
fn test_cycle_through_boxed_array_inside_list() {
    let serializer = serializer();
    let mut heap = Heap::new();
    let array = heap.new_ext(NdArray::boxed(Value::Null));
    let root = heap.new_list(vec![array.clone(), array.clone()]);
    let r = array.as_obj().unwrap();
    heap.ext_mut::<NdArray>(r)
        .unwrap()
        .set_boxed(root.clone())
        .unwrap();

    let (out, back) = json_roundtrip(&serializer, &mut heap, &root);
    assert!(heap.graph_eq(&root, &out, &back));

    let decoded = items(&out, &back);
    assert!(decoded[0].same_identity(&decoded[1]));
    let boxed = out
        .ext::<NdArray>(decoded[0].as_obj().unwrap())
        .unwrap()
        .boxed_value()
        .unwrap();
    assert!(boxed.same_identity(&back));
}

/// `list = [tuple]` with `tuple = (list,)`
fn tuple_list_cycle(heap: &mut Heap) -> (Value, Value) {
    let list = heap.new_list(vec![]);
    let tuple = heap.new_ext(Tuple::new(vec![list.clone()]));
    let r = list.as_obj().unwrap();
    heap.list_mut(r).unwrap().push(tuple.clone());
    (list, tuple)
}

#[test]
fn test_tuple_rooted_cycle_through_its_items_fails() {
    let serializer = serializer();
    let mut heap = Heap::new();
    let (_, tuple) = tuple_list_cycle(&mut heap);
    let before = heap.len();

    let err = serializer.to_json(&mut heap, &tuple).unwrap_err();
    assert!(err.is_encode_error());
    assert_eq!(
        err.engine(),
        Some(&slotgraph::EngineError::InitCycle {
            slot: 0,
            type_name: "Tuple".into()
        })
    );
    assert_eq!(heap.len(), before);
}

#[test]
fn test_list_rooted_cycle_through_tuple_roundtrips() {
    let serializer = serializer();
    let mut heap = Heap::new();
    let (list, _) = tuple_list_cycle(&mut heap);

    let json = serializer.to_json(&mut heap, &list).unwrap();
    assert_eq!(json, r#"[[[1]],["sg/tuple",2],[[0]]]"#);

    let mut out = Heap::new();
    let back = serializer.from_json(&mut out, &json).unwrap();
    assert!(heap.graph_eq(&list, &out, &back));

    let tuple = items(&out, &back)[0].clone();
    let inner = out
        .ext::<Tuple>(tuple.as_obj().unwrap())
        .unwrap()
        .items()[0]
        .clone();
    assert!(inner.same_identity(&back));
}

// =============================================================================
// DEPTH
// =============================================================================

#[test]
fn test_deep_chain_does_not_overflow() {
    let serializer = serializer();
    let mut heap = Heap::new();
    let mut root = heap.new_list(vec![Value::Int(0)]);
    for _ in 0..50_000 {
        root = heap.new_list(vec![root]);
    }

    let table = serializer.encode(&mut heap, &root).unwrap();
    assert_eq!(table.len(), 50_001);

    let json = slotgraph::to_json(&table).unwrap();
    let mut out = Heap::new();
    let back = serializer.from_json(&mut out, &json).unwrap();
    assert_eq!(out.len(), 50_001);
    assert!(back.as_obj().is_some());
}
