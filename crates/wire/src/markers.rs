//! Reserved markers
//!
//! A sequence payload whose leading element is a string is never user data:
//! the encoder gives every string its own slot, so plain sequences only ever
//! start with a scalar or a `[j]` reference. A leading string is therefore
//! one of:
//!
//! - `"sg/"`: the mapping marker
//! - `"sg/<tag>"`: an extension encoded by the codec registered as `<tag>`
//!
//! Anything else in that position is malformed.

/// Prefix shared by the mapping marker and every extension tag
pub const TAG_PREFIX: &str = "sg/";

/// Leading element of a mapping payload
pub const MAPPING_MARKER: &str = TAG_PREFIX;

/// What a sequence's leading string means
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leader<'a> {
    /// `"sg/"`
    Mapping,
    /// `"sg/<tag>"`, carrying `<tag>`
    Tag(&'a str),
    /// Not a reserved marker
    Unreserved,
}

/// Classify a sequence's leading string
pub fn classify(leader: &str) -> Leader<'_> {
    match leader.strip_prefix(TAG_PREFIX) {
        Some("") => Leader::Mapping,
        Some(tag) => Leader::Tag(tag),
        None => Leader::Unreserved,
    }
}

/// Wire form of a registered tag name
pub fn wire_tag(tag: &str) -> String {
    format!("{}{}", TAG_PREFIX, tag)
}
