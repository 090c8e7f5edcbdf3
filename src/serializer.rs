//! Main entry point for slotgraph.
//!
//! A [`Serializer`] pairs a codec registry with a [`Config`] so the encoder
//! and the decoder always agree on both.

use crate::error::Result;
use slotgraph_core::{Heap, Value};
use slotgraph_engine::{Codec, CodecRegistry, Config, Decoder, Encoder, ForeignStrings, RegistryError};
use slotgraph_wire::{SlotTable, WireAlphabet};
use std::sync::Arc;
use tracing::debug;

type Install = Box<dyn FnOnce(&mut CodecRegistry) -> std::result::Result<(), RegistryError> + Send>;

/// Encodes value graphs to slot tables and back.
///
/// Cheap to clone; the registry is shared.
///
/// # Example
///
/// ```
/// use slotgraph::prelude::*;
///
/// let serializer = Serializer::standard()?;
/// let mut heap = Heap::new();
/// let root = heap.new_list(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
///
/// let json = serializer.to_json(&mut heap, &root)?;
/// assert_eq!(json, "[[1,2,3]]");
///
/// let mut out = Heap::new();
/// let back = serializer.from_json(&mut out, &json)?;
/// assert!(heap.graph_eq(&root, &out, &back));
/// # Ok::<(), slotgraph::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Serializer {
    registry: Arc<CodecRegistry>,
    config: Config,
}

impl Serializer {
    /// Standard codecs, text alphabet
    pub fn standard() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a builder for serializer configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use slotgraph::prelude::*;
    ///
    /// let serializer = Serializer::builder()
    ///     .bytes()
    ///     .foreign_strings(ForeignStrings::Interned)
    ///     .build()?;
    /// assert_eq!(serializer.config().alphabet, WireAlphabet::Bytes);
    /// # Ok::<(), slotgraph::Error>(())
    /// ```
    pub fn builder() -> SerializerBuilder {
        SerializerBuilder::new()
    }

    /// Active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Codec registry in use
    pub fn registry(&self) -> &CodecRegistry {
        &self.registry
    }

    /// Encode the graph rooted at `value`
    pub fn encode(&self, heap: &mut Heap, value: &Value) -> Result<SlotTable> {
        Ok(Encoder::new(&self.registry.encoders, self.config).encode(heap, value)?)
    }

    /// Decode `table` into `heap`
    pub fn decode(&self, heap: &mut Heap, table: &SlotTable) -> Result<Value> {
        Ok(Decoder::new(&self.registry.decoders, self.config).decode(heap, table)?)
    }

    /// Encode straight to compact JSON
    pub fn to_json(&self, heap: &mut Heap, value: &Value) -> Result<String> {
        let table = self.encode(heap, value)?;
        Ok(slotgraph_wire::to_json(&table)?)
    }

    /// Decode from JSON text
    pub fn from_json(&self, heap: &mut Heap, json: &str) -> Result<Value> {
        let table = slotgraph_wire::from_json(json)?;
        self.decode(heap, &table)
    }

    /// Encode straight to MessagePack
    pub fn to_msgpack(&self, heap: &mut Heap, value: &Value) -> Result<Vec<u8>> {
        let table = self.encode(heap, value)?;
        Ok(slotgraph_wire::to_msgpack(&table)?)
    }

    /// Decode from MessagePack bytes
    pub fn from_msgpack(&self, heap: &mut Heap, bytes: &[u8]) -> Result<Value> {
        let table = slotgraph_wire::from_msgpack(bytes)?;
        self.decode(heap, &table)
    }
}

/// Builder for serializer configuration.
///
/// The standard codecs for the chosen alphabet are installed unless
/// [`without_standard_codecs`](Self::without_standard_codecs) is called;
/// codecs added with [`codec`](Self::codec) are installed after them.
pub struct SerializerBuilder {
    config: Config,
    registry: Option<CodecRegistry>,
    standard_codecs: bool,
    extra: Vec<Install>,
}

impl SerializerBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            registry: None,
            standard_codecs: true,
            extra: Vec::new(),
        }
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Set the wire alphabet
    pub fn alphabet(mut self, alphabet: WireAlphabet) -> Self {
        self.config = self.config.with_alphabet(alphabet);
        self
    }

    /// Text passes through (default)
    pub fn text(self) -> Self {
        self.alphabet(WireAlphabet::Text)
    }

    /// Byte strings pass through
    pub fn bytes(self) -> Self {
        self.alphabet(WireAlphabet::Bytes)
    }

    /// Dedup policy for the string kind that does not pass through
    pub fn foreign_strings(mut self, policy: ForeignStrings) -> Self {
        self.config = self.config.with_foreign_strings(policy);
        self
    }

    /// Start from `registry` instead of an empty one
    pub fn registry(mut self, registry: CodecRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Do not install the standard codecs
    pub fn without_standard_codecs(mut self) -> Self {
        self.standard_codecs = false;
        self
    }

    /// Install an additional codec
    pub fn codec<C: Codec>(mut self, codec: C) -> Self {
        self.extra
            .push(Box::new(move |registry: &mut CodecRegistry| registry.install(codec)));
        self
    }

    /// Build the serializer.
    ///
    /// With nothing beyond the standard codecs requested, the process-wide
    /// registry from [`slotgraph_codecs::shared`] is reused. Fails if two
    /// codecs claim the same tag or type.
    pub fn build(self) -> Result<Serializer> {
        if self.standard_codecs && self.registry.is_none() && self.extra.is_empty() {
            let registry = slotgraph_codecs::shared(self.config.alphabet)?;
            debug!(
                "Serializer ready: {:?} alphabet, shared standard registry",
                self.config.alphabet
            );
            return Ok(Serializer {
                registry,
                config: self.config,
            });
        }

        let mut registry = self.registry.unwrap_or_default();
        if self.standard_codecs {
            slotgraph_codecs::install_standard(&mut registry, self.config.alphabet)?;
        }
        for install in self.extra {
            install(&mut registry)?;
        }
        debug!(
            "Serializer ready: {:?} alphabet, {} encoders, {} decoders",
            self.config.alphabet,
            registry.encoders.len(),
            registry.decoders.len()
        );
        Ok(Serializer {
            registry: Arc::new(registry),
            config: self.config,
        })
    }
}

impl Default for SerializerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
