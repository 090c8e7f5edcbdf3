//! JSON text form of a slot table
//!
//! A slot table is already made of JSON primitives, so this is a direct
//! serde_json round trip with one guard: non-finite floats are rejected
//! rather than silently written as `null`.

mod decode;
mod encode;

pub use decode::from_json;
pub use encode::{json_len, to_json, to_json_pretty};
