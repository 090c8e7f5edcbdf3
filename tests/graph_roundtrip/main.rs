//! Graph Round-Trip Test Suite
//!
//! End-to-end tests through the `Serializer` facade: value graph -> slot
//! table -> JSON / MessagePack -> slot table -> value graph.
//!
//! ## Key Verification Points
//!
//! 1. Round trips are structurally equal (`Heap::graph_eq`)
//! 2. Shared objects get exactly one slot and decode to one object
//! 3. Cycles terminate in both directions and keep identity
//! 4. Every failure surfaces its specific error with slot / type / tag
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test graph_roundtrip
//! cargo test --test graph_roundtrip sharing::
//! ```

use slotgraph::prelude::*;
use std::any::Any;
use std::sync::Once;

// Test modules
pub mod alphabets;
pub mod properties;
pub mod scenarios;
pub mod sharing;

// =============================================================================
// SHARED TEST UTILITIES
// =============================================================================

/// Route engine logs to the test harness once per process
pub fn init_tracing() {
    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// Standard serializer, text alphabet
pub fn serializer() -> Serializer {
    init_tracing();
    Serializer::standard().expect("standard codecs register cleanly")
}

/// Standard serializer, bytes alphabet
pub fn bytes_serializer() -> Serializer {
    init_tracing();
    Serializer::builder()
        .bytes()
        .build()
        .expect("standard codecs register cleanly")
}

/// Encode to JSON and decode into a fresh heap
pub fn json_roundtrip(serializer: &Serializer, heap: &mut Heap, root: &Value) -> (Heap, Value) {
    let json = serializer.to_json(heap, root).expect("encode");
    let mut out = Heap::new();
    let back = serializer.from_json(&mut out, &json).expect("decode");
    (out, back)
}

/// Round trip through JSON and require structural equality
pub fn assert_roundtrip(serializer: &Serializer, heap: &mut Heap, root: &Value) {
    let (out, back) = json_roundtrip(serializer, heap, root);
    assert!(
        heap.graph_eq(root, &out, &back),
        "round trip changed the graph: {:?} -> {:?}",
        root,
        back
    );
}

/// Items of a decoded list
pub fn items(heap: &Heap, value: &Value) -> Vec<Value> {
    heap.list(value.as_obj().expect("a list")).expect("a list").to_vec()
}

/// Extension type no codec is registered for
#[derive(Debug)]
pub struct Widget;

impl Extension for Widget {
    fn type_name(&self) -> &'static str {
        "Widget"
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
    fn shallow_eq(&self, other: &dyn Extension) -> bool {
        other.downcast_ref::<Widget>().is_some()
    }
}
