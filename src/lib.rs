//! # slotgraph
//!
//! Object-graph serialization that keeps shared references and cycles.
//!
//! A value graph living in a [`Heap`] is flattened into a [`SlotTable`]: an
//! ordered list of JSON-compatible payloads where `[j]` points at slot `j`.
//! Shared objects are written once, cycles become back-references, and
//! types outside lists and mappings go through registered codecs.
//!
//! ## Quick Start
//!
//! ```
//! use slotgraph::prelude::*;
//!
//! let serializer = Serializer::standard()?;
//!
//! let mut heap = Heap::new();
//! let shared = heap.new_ext(Tuple::new(vec![Value::Int(1), Value::Int(2)]));
//! let root = heap.new_list(vec![shared.clone(), shared]);
//!
//! let table = serializer.encode(&mut heap, &root)?;
//! assert_eq!(table.len(), 3);
//!
//! let mut out = Heap::new();
//! let back = serializer.decode(&mut out, &table)?;
//! let items = out.list(back.as_obj().unwrap()).unwrap();
//! assert!(items[0].same_identity(&items[1]));
//! # Ok::<(), slotgraph::Error>(())
//! ```
//!
//! ## Crates
//!
//! - `slotgraph-core`: [`Value`], [`Heap`], [`Mapping`], [`Extension`]
//! - `slotgraph-wire`: [`SlotTable`], [`Entry`], JSON and MessagePack
//! - `slotgraph-engine`: [`Encoder`], [`Decoder`], [`CodecRegistry`]
//! - `slotgraph-codecs`: [`Tuple`], [`NdArray`], string codecs

#![warn(missing_docs)]

mod error;
mod serializer;

pub mod prelude;

// Re-export main entry points
pub use error::{Error, Result};
pub use serializer::{Serializer, SerializerBuilder};

// Re-export building blocks
pub use slotgraph_codecs::{
    install_standard, shared, standard, ArrayData, BytesCodec, DType, NdArray, NdArrayCodec,
    TextCodec, Tuple, TupleCodec,
};
pub use slotgraph_core::{Extension, Heap, Mapping, ObjRef, Object, Value};
pub use slotgraph_engine::{
    Codec, CodecError, CodecRegistry, Config, Decoder, DecoderRegistry, Encoder,
    EncoderRegistry, Error as EngineError, ForeignStrings, Parts, RegistryError, TypeKey,
};
pub use slotgraph_wire::{
    from_json, from_msgpack, to_json, to_json_pretty, to_msgpack, Entry, SlotTable, WireAlphabet,
    WireError,
};
