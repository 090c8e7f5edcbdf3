//! Unified error type for slotgraph.
//!
//! Wraps the engine, registry and wire errors behind one enum so callers of
//! [`Serializer`](crate::Serializer) deal with a single type.

use thiserror::Error;

/// All slotgraph errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Encode or decode failed
    #[error(transparent)]
    Engine(#[from] slotgraph_engine::Error),

    /// A codec could not be registered
    #[error("registry error: {0}")]
    Registry(#[from] slotgraph_engine::RegistryError),

    /// JSON or MessagePack conversion failed
    #[error("wire error: {0}")]
    Wire(#[from] slotgraph_wire::WireError),
}

/// Result type for slotgraph operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if the error was raised while encoding a value.
    ///
    /// `InvalidPayload` is reported by codecs in both directions and counts
    /// as neither.
    pub fn is_encode_error(&self) -> bool {
        use slotgraph_engine::Error as E;
        use slotgraph_wire::WireError as W;
        match self {
            Error::Engine(e) => matches!(
                e,
                E::UnencodableType { .. } | E::InitCycle { .. } | E::DanglingRef(_)
            ),
            Error::Wire(w) => matches!(w, W::NonFiniteFloat { .. } | W::MsgPackEncode(_)),
            Error::Registry(_) => false,
        }
    }

    /// Check if the error was raised while decoding a table.
    pub fn is_decode_error(&self) -> bool {
        use slotgraph_engine::Error as E;
        use slotgraph_wire::WireError as W;
        match self {
            Error::Engine(e) => matches!(
                e,
                E::EmptyTable
                    | E::UnknownTag { .. }
                    | E::MalformedSlot { .. }
                    | E::NullInitResult { .. }
                    | E::FinalizerIdentityViolation { .. }
                    | E::BadStringDiscriminator { .. }
            ),
            Error::Wire(w) => matches!(w, W::Json(_) | W::MsgPackDecode(_)),
            Error::Registry(_) => false,
        }
    }

    /// The engine error, if this is one
    pub fn engine(&self) -> Option<&slotgraph_engine::Error> {
        match self {
            Error::Engine(e) => Some(e),
            _ => None,
        }
    }

    /// Slot the error refers to, if any
    pub fn slot(&self) -> Option<usize> {
        match self {
            Error::Engine(e) => e.slot(),
            Error::Wire(slotgraph_wire::WireError::NonFiniteFloat { slot, .. }) => Some(*slot),
            _ => None,
        }
    }
}
