//! Encode and decode errors
//!
//! Every variant is fatal for the call that raised it: there is no partial
//! table and no partially decoded graph. Each carries the slot, type name or
//! tag needed to find the problem.

use slotgraph_core::ObjRef;
use thiserror::Error;

/// Errors raised by the encoder and decoder
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// No scalar, sequence, mapping or registered codec applies
    #[error("cannot encode value of type {type_name}: no codec registered")]
    UnencodableType {
        /// Runtime type of the offending value
        type_name: String,
    },

    /// A value is reachable from its own init data, which no decode can
    /// rebuild: the init decoder would need the object it is about to create
    #[error("slot {slot}: value of type {type_name} is reachable from its own init data")]
    InitCycle {
        /// Slot of the value
        slot: usize,
        /// Runtime type of the value
        type_name: String,
    },

    /// A `Ref` points outside the heap
    #[error("dangling object reference {0}")]
    DanglingRef(ObjRef),

    /// The slot table has no root slot
    #[error("slot table is empty")]
    EmptyTable,

    /// Decode met a tag with no registered decoder
    #[error("slot {slot}: no decoder registered for tag {tag:?}")]
    UnknownTag {
        /// Slot holding the tag
        slot: usize,
        /// Tag name without the reserved prefix
        tag: String,
    },

    /// Payload shape is invalid or a reference is out of bounds
    #[error("slot {slot}: malformed slot: {reason}")]
    MalformedSlot {
        /// Offending slot
        slot: usize,
        /// What is wrong with it
        reason: String,
    },

    /// An init decoder returned null
    #[error("slot {slot}: init decoder for tag {tag:?} returned null")]
    NullInitResult {
        /// Slot being decoded
        slot: usize,
        /// Codec tag
        tag: String,
    },

    /// A finalizer returned a different object than it was given
    #[error("slot {slot}: finalizer for tag {tag:?} must return the same object")]
    FinalizerIdentityViolation {
        /// Slot being decoded
        slot: usize,
        /// Codec tag
        tag: String,
    },

    /// Dual-representation string payload with an unknown discriminator
    #[error("slot {slot}: bad string discriminator {discriminator}")]
    BadStringDiscriminator {
        /// Slot being decoded
        slot: usize,
        /// The discriminator found, rendered for display
        discriminator: String,
    },

    /// A codec rejected the data it was handed
    #[error("slot {slot}: invalid payload for tag {tag:?}: {reason}")]
    InvalidPayload {
        /// Slot being encoded or decoded
        slot: usize,
        /// Codec tag
        tag: String,
        /// Codec's explanation
        reason: String,
    },
}

impl Error {
    /// Slot the error refers to, if any
    pub fn slot(&self) -> Option<usize> {
        match self {
            Error::UnknownTag { slot, .. }
            | Error::InitCycle { slot, .. }
            | Error::MalformedSlot { slot, .. }
            | Error::NullInitResult { slot, .. }
            | Error::FinalizerIdentityViolation { slot, .. }
            | Error::BadStringDiscriminator { slot, .. }
            | Error::InvalidPayload { slot, .. } => Some(*slot),
            Error::UnencodableType { .. } | Error::DanglingRef(_) | Error::EmptyTable => None,
        }
    }

    pub(crate) fn malformed(slot: usize, reason: impl Into<String>) -> Self {
        Error::MalformedSlot {
            slot,
            reason: reason.into(),
        }
    }
}

/// Failure reported by a codec function.
///
/// The engine attaches the slot and tag when converting it into [`Error`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CodecError {
    /// Unknown leading discriminator on a dual-representation string
    #[error("bad string discriminator {0}")]
    BadStringDiscriminator(String),

    /// Payload does not have the shape the codec expects
    #[error("{0}")]
    InvalidPayload(String),

    /// The value handed to an encoder is not of the codec's type
    #[error("expected {expected}, got {actual}")]
    WrongType {
        /// Type the codec handles
        expected: &'static str,
        /// Type it was given
        actual: &'static str,
    },
}

impl CodecError {
    /// Shorthand for [`CodecError::InvalidPayload`]
    pub fn invalid(reason: impl Into<String>) -> Self {
        CodecError::InvalidPayload(reason.into())
    }

    pub(crate) fn at(self, slot: usize, tag: &str) -> Error {
        match self {
            CodecError::BadStringDiscriminator(discriminator) => {
                Error::BadStringDiscriminator { slot, discriminator }
            }
            other => Error::InvalidPayload {
                slot,
                tag: tag.to_string(),
                reason: other.to_string(),
            },
        }
    }
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, Error>;
