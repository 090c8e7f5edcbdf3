//! Slot-table encode/decode engine
//!
//! This crate turns a value graph living in a [`Heap`](slotgraph_core::Heap)
//! into a flat [`SlotTable`](slotgraph_wire::SlotTable) and back:
//! - [`Encoder`]: depth-first walk with identity dedup and cycle breaking
//! - [`Decoder`]: rebuild with two-phase construction for cycles through
//!   freshly built objects
//! - [`CodecRegistry`]: type -> tag and tag -> (init, finish) tables
//! - [`Config`]: wire alphabet and foreign string policy
//!
//! ## Example
//!
//! ```
//! use slotgraph_core::{Heap, Value};
//! use slotgraph_engine::{CodecRegistry, Config, Decoder, Encoder};
//!
//! let registry = CodecRegistry::new();
//! let mut heap = Heap::new();
//! let shared = heap.new_list(vec![Value::Int(1)]);
//! let root = heap.new_list(vec![shared.clone(), shared]);
//!
//! let table = Encoder::new(&registry.encoders, Config::default())
//!     .encode(&mut heap, &root)
//!     .unwrap();
//! assert_eq!(table.len(), 2);
//!
//! let mut out = Heap::new();
//! let back = Decoder::new(&registry.decoders, Config::default())
//!     .decode(&mut out, &table)
//!     .unwrap();
//! assert!(heap.graph_eq(&root, &out, &back));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod registry;
pub mod tracker;


pub use config::{Config, ForeignStrings};
pub use decoder::Decoder;
pub use encoder::Encoder;
pub use error::{CodecError, Error, Result};
pub use registry::{
    Codec, CodecRegistry, DecoderEntry, DecoderRegistry, EncodeFn, EncoderEntry,
    EncoderRegistry, FinishFn, InitFn, Parts, RegistryError, TypeKey,
};
pub use tracker::{Identity, IdentityTracker};
