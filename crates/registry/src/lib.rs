//! Generic indexed definition registries.
//!
//! # Mental Model
//!
//! 1. A [`DefinitionSource`] supplies named JSON documents in declaration
//!    order.
//! 2. A [`DataRegistry`] decodes them into one definition kind and owns the
//!    authoritative id → definition table as an atomically swapped,
//!    generation-stamped snapshot.
//! 3. An [`IndirectIndex`] derives a key → candidates cache from the current
//!    snapshot and rebuilds itself wholesale whenever the generation moves.
//! 4. Consumers resolve a subject to its cheap key, scan that key's bucket in
//!    declaration order, and take the first [`Matcher::test`] hit.
//!
//! Reload and full-state wire sync both replace the table in one swap;
//! readers always observe exactly one generation.

/// Typed field access over JSON config documents.
pub mod config;
/// The definition capability: id plus config/wire codecs.
pub mod definition;
/// Reload and sync error types.
pub mod error;
/// Derived key → candidates cache.
pub mod index;
/// The matcher capability: predicate plus key enumeration.
pub mod matcher;
/// Configuration corpus suppliers.
pub mod source;
/// Authoritative definition storage.
pub mod store;
/// Length-prefixed binary wire format.
pub mod wire;

pub use definition::Definition;
pub use error::{ConfigError, ProtocolError};
pub use index::IndirectIndex;
pub use matcher::Matcher;
pub use source::{DefinitionSource, DirectorySource, MemorySource};
pub use store::{DataRegistry, SnapshotGuard};
pub use wire::{WireReader, WireWriter};

#[cfg(test)]
pub(crate) mod test_fixtures;
