//! Per-type storage metadata.
//!
//! Field annotations are parsed once per record type into a
//! [`StructDescriptor`] and memoized for the life of the process.

mod descriptor;
mod field;

#[cfg(test)]
mod tests;

// re-exports
pub use descriptor::{StructDescriptor, describe};
pub use field::{Field, FieldMode, IndexRole, TagError, parse_tag};
