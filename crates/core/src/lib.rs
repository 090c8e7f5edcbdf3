//! Host object model for slotgraph
//!
//! This crate defines the in-memory graph the engine serializes:
//!
//! - [`Value`]: scalars, the two string kinds, and [`ObjRef`] handles
//! - [`Heap`]: append-only arena holding every composite
//! - [`Object`]: list, [`Mapping`], or boxed [`Extension`]
//!
//! Identity is arena-index equality. Two `Value::Ref`s naming the same
//! `ObjRef` are the same object; everything else is a value type.
//!
//! ## Example
//!
//! ```
//! use slotgraph_core::{Heap, Value};
//!
//! let mut heap = Heap::new();
//! let shared = heap.new_list(vec![Value::Int(1)]);
//! let root = heap.new_list(vec![shared.clone(), shared]);
//!
//! let items = heap.list(root.as_obj().unwrap()).unwrap();
//! assert!(items[0].same_identity(&items[1]));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod extension;
pub mod heap;
pub mod mapping;
pub mod value;

pub use extension::Extension;
pub use heap::{Checkpoint, Heap, ObjRef, Object};
pub use mapping::Mapping;
pub use value::Value;
