//! Property Tests
//!
//! Random acyclic graphs through both alphabets and both wire formats.

use crate::*;
use proptest::prelude::*;

/// Shape of a generated graph, built into a heap by [`build`]
#[derive(Debug, Clone)]
enum Shape {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    List(Vec<Shape>),
    Map(Vec<(i64, Shape)>),
    Tuple(Vec<Shape>),
    Array(Vec<i64>),
}

fn shape() -> impl Strategy<Value = Shape> {
    let leaf = prop_oneof![
        Just(Shape::Null),
        any::<bool>().prop_map(Shape::Bool),
        any::<i64>().prop_map(Shape::Int),
        (-1.0e12f64..1.0e12).prop_map(Shape::Float),
        ".{0,8}".prop_map(Shape::Text),
        prop::collection::vec(any::<u8>(), 0..24).prop_map(Shape::Bytes),
        prop::collection::vec(any::<i64>(), 0..6).prop_map(Shape::Array),
    ];
    leaf.prop_recursive(4, 48, 5, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..5).prop_map(Shape::List),
            prop::collection::vec((any::<i64>(), inner.clone()), 0..5).prop_map(Shape::Map),
            prop::collection::vec(inner, 0..4).prop_map(Shape::Tuple),
        ]
    })
}

fn build(heap: &mut Heap, shape: &Shape) -> Value {
    match shape {
        Shape::Null => Value::Null,
        Shape::Bool(b) => Value::Bool(*b),
        Shape::Int(i) => Value::Int(*i),
        Shape::Float(f) => Value::Float(*f),
        Shape::Text(s) => Value::Text(s.clone()),
        Shape::Bytes(b) => Value::Bytes(b.clone()),
        Shape::List(items) => {
            let items = items.iter().map(|s| build(heap, s)).collect();
            heap.new_list(items)
        }
        Shape::Map(pairs) => {
            let map: Mapping = pairs
                .iter()
                .map(|(k, s)| (Value::Int(*k), build(heap, s)))
                .collect();
            heap.new_map(map)
        }
        Shape::Tuple(items) => {
            let items = items.iter().map(|s| build(heap, s)).collect();
            heap.new_ext(Tuple::new(items))
        }
        Shape::Array(values) => {
            let array = NdArray::from_i64(vec![values.len()], values).unwrap();
            heap.new_ext(array)
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        failure_persistence: None,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_json_roundtrip_preserves_structure(shape in shape(), bytes_mode in any::<bool>()) {
        let serializer = if bytes_mode { bytes_serializer() } else { serializer() };
        let mut heap = Heap::new();
        let root = build(&mut heap, &shape);

        let (out, back) = json_roundtrip(&serializer, &mut heap, &root);
        prop_assert!(heap.graph_eq(&root, &out, &back));
    }

    #[test]
    fn prop_msgpack_roundtrip_preserves_structure(shape in shape()) {
        let serializer = serializer();
        let mut heap = Heap::new();
        let root = build(&mut heap, &shape);

        let bytes = serializer.to_msgpack(&mut heap, &root).unwrap();
        let mut out = Heap::new();
        let back = serializer.from_msgpack(&mut out, &bytes).unwrap();
        prop_assert!(heap.graph_eq(&root, &out, &back));
    }

    #[test]
    fn prop_shared_subgraph_written_once(shape in shape()) {
        let serializer = serializer();
        let mut heap = Heap::new();
        let inner = build(&mut heap, &shape);
        let shared = heap.new_list(vec![inner]);

        let alone = serializer.encode(&mut heap, &shared).unwrap();
        let root = heap.new_list(vec![shared.clone(), shared]);
        let twice = serializer.encode(&mut heap, &root).unwrap();
        prop_assert_eq!(twice.len(), alone.len() + 1);

        let mut out = Heap::new();
        let back = serializer.decode(&mut out, &twice).unwrap();
        let decoded = items(&out, &back);
        prop_assert!(decoded[0].same_identity(&decoded[1]));
    }

    #[test]
    fn prop_reencoding_is_stable(shape in shape()) {
        let serializer = serializer();
        let mut heap = Heap::new();
        let root = build(&mut heap, &shape);

        let table = serializer.encode(&mut heap, &root).unwrap();
        let mut out = Heap::new();
        let back = serializer.decode(&mut out, &table).unwrap();
        prop_assert_eq!(serializer.encode(&mut out, &back).unwrap(), table);
    }

    #[test]
    fn prop_encode_leaves_heap_size_unchanged(shape in shape()) {
        let serializer = serializer();
        let mut heap = Heap::new();
        let root = build(&mut heap, &shape);
        let before = heap.len();

        serializer.encode(&mut heap, &root).unwrap();
        prop_assert_eq!(heap.len(), before);
    }
}
