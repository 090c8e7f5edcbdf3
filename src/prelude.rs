//! Convenient imports for slotgraph.
//!
//! ```
//! use slotgraph::prelude::*;
//!
//! let serializer = Serializer::standard()?;
//! let mut heap = Heap::new();
//! assert_eq!(serializer.to_json(&mut heap, &Value::Null)?, "[null]");
//! # Ok::<(), slotgraph::Error>(())
//! ```

// Main entry point
pub use crate::serializer::{Serializer, SerializerBuilder};

// Error handling
pub use crate::error::{Error, Result};

// Graph model
pub use slotgraph_core::{Extension, Heap, Mapping, ObjRef, Value};

// Configuration
pub use slotgraph_engine::{Codec, CodecError, Config, ForeignStrings, Parts, TypeKey};
pub use slotgraph_wire::{SlotTable, WireAlphabet};

// Standard extension types
pub use slotgraph_codecs::{NdArray, Tuple};
