//! Standard codecs for slotgraph
//!
//! Three reference codecs that between them exercise the whole codec
//! protocol:
//! - [`TupleCodec`]: single-phase value wrapper
//! - [`NdArrayCodec`]: typed arrays; two-phase for boxed `object` arrays
//! - [`BytesCodec`] / [`TextCodec`]: the string kind the wire alphabet does
//!   not pass through
//!
//! [`standard`] builds a registry holding the right set for an alphabet, and
//! [`shared`] hands out a process-wide instance built on first use. Default
//! serializers all run on the shared instance.
//!
//! ## Example
//!
//! ```
//! use slotgraph_codecs::{shared, Tuple};
//! use slotgraph_core::{Heap, Value};
//! use slotgraph_engine::{Config, Encoder};
//! use slotgraph_wire::{to_json, WireAlphabet};
//!
//! let registry = shared(WireAlphabet::Text).unwrap();
//! let mut heap = Heap::new();
//! let root = heap.new_ext(Tuple::new(vec![Value::Int(1), Value::Int(2), Value::Int(3)]));
//!
//! let table = Encoder::new(&registry.encoders, Config::text())
//!     .encode(&mut heap, &root)
//!     .unwrap();
//! assert_eq!(to_json(&table).unwrap(), r#"[["sg/tuple",1],[1,2,3]]"#);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod fields;
pub mod ndarray;
pub mod strings;
pub mod tuple;

pub use ndarray::{ArrayData, DType, NdArray, NdArrayCodec};
pub use strings::{choose_representation, BytesCodec, TextCodec};
pub use tuple::{Tuple, TupleCodec};

use once_cell::sync::OnceCell;
use slotgraph_engine::{CodecRegistry, RegistryError};
use slotgraph_wire::WireAlphabet;
use std::sync::Arc;
use tracing::debug;

/// Add the standard codecs for `alphabet` to an existing registry
pub fn install_standard(
    registry: &mut CodecRegistry,
    alphabet: WireAlphabet,
) -> Result<(), RegistryError> {
    registry.install(TupleCodec)?;
    registry.install(NdArrayCodec::new(alphabet))?;
    match alphabet {
        WireAlphabet::Text => registry.install(BytesCodec),
        WireAlphabet::Bytes => registry.install(TextCodec),
    }
}

/// Fresh registry with the standard codecs for `alphabet`
pub fn standard(alphabet: WireAlphabet) -> Result<CodecRegistry, RegistryError> {
    let mut registry = CodecRegistry::new();
    install_standard(&mut registry, alphabet)?;
    debug!(
        "Built standard codec registry for {:?} alphabet ({} codecs)",
        alphabet,
        registry.encoders.len()
    );
    Ok(registry)
}

static TEXT_REGISTRY: OnceCell<Arc<CodecRegistry>> = OnceCell::new();
static BYTES_REGISTRY: OnceCell<Arc<CodecRegistry>> = OnceCell::new();

/// Process-wide standard registry for `alphabet`, built on first use
pub fn shared(alphabet: WireAlphabet) -> Result<Arc<CodecRegistry>, RegistryError> {
    let cell = match alphabet {
        WireAlphabet::Text => &TEXT_REGISTRY,
        WireAlphabet::Bytes => &BYTES_REGISTRY,
    };
    cell.get_or_try_init(|| standard(alphabet).map(Arc::new))
        .map(Arc::clone)
}
