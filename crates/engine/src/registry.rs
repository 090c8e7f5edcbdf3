//! Codec registry
//!
//! Two symmetric tables decouple the walkers from concrete types:
//!
//! - [`EncoderRegistry`]: [`TypeKey`] -> (tag, encode function)
//! - [`DecoderRegistry`]: tag -> (init function, optional finish function)
//!
//! [`CodecRegistry`] bundles both, and [`Codec`] lets one type fill both
//! sides at once. Registries are read-only while an encode or decode runs and
//! are `Send + Sync`, so one instance can serve many threads.
//!
//! # The Two-Phase Contract
//!
//! `init(data)` builds the object from the minimum needed for a stable
//! identity and must never return `Null`. `finish(object, data)` completes it
//! and must hand back the very same object. Splitting construction this way
//! lets the final data refer back to the object itself.

use crate::error::CodecError;
use rustc_hash::FxHashMap;
use slotgraph_core::{Extension, Heap, Object, Value};
use std::any::TypeId;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Output of an encode function: the data for each construction phase
#[derive(Debug, Clone)]
pub struct Parts {
    /// Data for `init`, enough to create the object with its final identity
    pub init: Value,
    /// Data for `finish`, absent for single-phase codecs
    pub finish: Option<Value>,
}

impl Parts {
    /// Single-phase encoding
    pub fn single(init: Value) -> Self {
        Parts { init, finish: None }
    }

    /// Two-phase encoding
    pub fn two_phase(init: Value, finish: Value) -> Self {
        Parts {
            init,
            finish: Some(finish),
        }
    }
}

/// Encode function: `(heap, value) -> (init data, final data)`
pub type EncodeFn = Arc<dyn Fn(&mut Heap, &Value) -> Result<Parts, CodecError> + Send + Sync>;

/// Init function: `(heap, init data) -> object`
pub type InitFn = Arc<dyn Fn(&mut Heap, Value) -> Result<Value, CodecError> + Send + Sync>;

/// Finish function: `(heap, object, final data) -> same object`
pub type FinishFn =
    Arc<dyn Fn(&mut Heap, Value, Value) -> Result<Value, CodecError> + Send + Sync>;

/// Runtime type discriminator used to pick an encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKey {
    /// `Value::Text` when it is the foreign string kind
    Text,
    /// `Value::Bytes` when it is the foreign string kind
    Bytes,
    /// An extension type
    Ext(TypeId),
}

impl TypeKey {
    /// Key for extension type `T`
    pub fn of<T: Extension>() -> Self {
        TypeKey::Ext(TypeId::of::<T>())
    }

    /// Key of an object stored in the heap, `None` for lists and mappings
    pub fn of_object(object: &Object) -> Option<Self> {
        match object {
            Object::Ext(ext) => Some(TypeKey::Ext(ext.concrete_type_id())),
            Object::List(_) | Object::Map(_) => None,
        }
    }
}

/// Errors raised while building a registry
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// Tags must be non-empty; the empty tag is the mapping marker
    #[error("codec tag must not be empty")]
    EmptyTag,

    /// Tag already taken by another codec
    #[error("codec tag {0:?} is already registered")]
    DuplicateTag(String),

    /// Type already has an encoder
    #[error("type {0} already has an encoder")]
    DuplicateType(String),
}

fn check_tag(tag: &str) -> Result<(), RegistryError> {
    if tag.is_empty() {
        return Err(RegistryError::EmptyTag);
    }
    Ok(())
}

/// One row of the encoder table
#[derive(Clone)]
pub struct EncoderEntry {
    /// Tag written to the wire (without the reserved prefix)
    pub tag: String,
    /// Name of the registered type, for diagnostics
    pub type_name: String,
    /// The encode function
    pub encode: EncodeFn,
}

impl fmt::Debug for EncoderEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncoderEntry")
            .field("tag", &self.tag)
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// One row of the decoder table
#[derive(Clone)]
pub struct DecoderEntry {
    /// Builds the object from init data
    pub init: InitFn,
    /// Completes the object from final data
    pub finish: Option<FinishFn>,
}

impl fmt::Debug for DecoderEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecoderEntry")
            .field("two_phase", &self.finish.is_some())
            .finish_non_exhaustive()
    }
}

/// Type -> (tag, encoder) table
#[derive(Debug, Clone, Default)]
pub struct EncoderRegistry {
    by_type: FxHashMap<TypeKey, EncoderEntry>,
}

impl EncoderRegistry {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an encoder under `key`.
    ///
    /// `type_name` is only used in diagnostics.
    pub fn register(
        &mut self,
        key: TypeKey,
        type_name: impl Into<String>,
        tag: impl Into<String>,
        encode: EncodeFn,
    ) -> Result<(), RegistryError> {
        let tag = tag.into();
        let type_name = type_name.into();
        check_tag(&tag)?;
        if self.by_type.contains_key(&key) {
            return Err(RegistryError::DuplicateType(type_name));
        }
        if self.by_type.values().any(|e| e.tag == tag) {
            return Err(RegistryError::DuplicateTag(tag));
        }
        self.by_type.insert(
            key,
            EncoderEntry {
                tag,
                type_name,
                encode,
            },
        );
        Ok(())
    }

    /// Register an encoder for extension type `T`
    pub fn register_ext<T, F>(&mut self, tag: impl Into<String>, encode: F) -> Result<(), RegistryError>
    where
        T: Extension,
        F: Fn(&mut Heap, &Value) -> Result<Parts, CodecError> + Send + Sync + 'static,
    {
        self.register(
            TypeKey::of::<T>(),
            std::any::type_name::<T>(),
            tag,
            Arc::new(encode),
        )
    }

    /// Encoder for `key`
    pub fn lookup(&self, key: &TypeKey) -> Option<&EncoderEntry> {
        self.by_type.get(key)
    }

    /// Number of registered encoders
    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    /// Check if no encoder is registered
    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}

/// Tag -> (init, finish) table
#[derive(Debug, Clone, Default)]
pub struct DecoderRegistry {
    by_tag: FxHashMap<String, DecoderEntry>,
}

impl DecoderRegistry {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a decoder pair for `tag`
    pub fn register(
        &mut self,
        tag: impl Into<String>,
        init: InitFn,
        finish: Option<FinishFn>,
    ) -> Result<(), RegistryError> {
        let tag = tag.into();
        check_tag(&tag)?;
        if self.by_tag.contains_key(&tag) {
            return Err(RegistryError::DuplicateTag(tag));
        }
        self.by_tag.insert(tag, DecoderEntry { init, finish });
        Ok(())
    }

    /// Register a single-phase decoder
    pub fn register_single<F>(&mut self, tag: impl Into<String>, init: F) -> Result<(), RegistryError>
    where
        F: Fn(&mut Heap, Value) -> Result<Value, CodecError> + Send + Sync + 'static,
    {
        self.register(tag, Arc::new(init), None)
    }

    /// Register a two-phase decoder
    pub fn register_two_phase<I, F>(
        &mut self,
        tag: impl Into<String>,
        init: I,
        finish: F,
    ) -> Result<(), RegistryError>
    where
        I: Fn(&mut Heap, Value) -> Result<Value, CodecError> + Send + Sync + 'static,
        F: Fn(&mut Heap, Value, Value) -> Result<Value, CodecError> + Send + Sync + 'static,
    {
        self.register(tag, Arc::new(init), Some(Arc::new(finish)))
    }

    /// Decoder pair for `tag`
    pub fn lookup(&self, tag: &str) -> Option<&DecoderEntry> {
        self.by_tag.get(tag)
    }

    /// Number of registered decoders
    pub fn len(&self) -> usize {
        self.by_tag.len()
    }

    /// Check if no decoder is registered
    pub fn is_empty(&self) -> bool {
        self.by_tag.is_empty()
    }
}

/// A codec implementing both directions for one type
pub trait Codec: Send + Sync + 'static {
    /// Wire tag (without the reserved prefix)
    fn tag(&self) -> &'static str;

    /// Type this codec encodes
    fn type_key(&self) -> TypeKey;

    /// Name used in diagnostics
    fn type_name(&self) -> &'static str;

    /// Split a value into init and final data
    fn encode(&self, heap: &mut Heap, value: &Value) -> Result<Parts, CodecError>;

    /// Build the object (or placeholder) from init data
    fn init(&self, heap: &mut Heap, data: Value) -> Result<Value, CodecError>;

    /// Whether `finish` should be registered
    fn is_two_phase(&self) -> bool {
        false
    }

    /// Complete the placeholder built by `init`
    fn finish(&self, _heap: &mut Heap, object: Value, _data: Value) -> Result<Value, CodecError> {
        Ok(object)
    }
}

/// Both codec tables
#[derive(Debug, Clone, Default)]
pub struct CodecRegistry {
    /// Encoder side
    pub encoders: EncoderRegistry,
    /// Decoder side
    pub decoders: DecoderRegistry,
}

impl CodecRegistry {
    /// Create empty tables
    pub fn new() -> Self {
        Self::default()
    }

    /// Register both directions of `codec`
    pub fn install<C: Codec>(&mut self, codec: C) -> Result<(), RegistryError> {
        let codec = Arc::new(codec);
        let tag = codec.tag();

        let enc = Arc::clone(&codec);
        self.encoders.register(
            codec.type_key(),
            codec.type_name(),
            tag,
            Arc::new(move |heap: &mut Heap, value: &Value| enc.encode(heap, value)),
        )?;

        let init = Arc::clone(&codec);
        let finish: Option<FinishFn> = if codec.is_two_phase() {
            let fin = Arc::clone(&codec);
            Some(Arc::new(move |heap: &mut Heap, object: Value, data: Value| {
                fin.finish(heap, object, data)
            }))
        } else {
            None
        };
        self.decoders.register(
            tag,
            Arc::new(move |heap: &mut Heap, data: Value| init.init(heap, data)),
            finish,
        )
    }
}
