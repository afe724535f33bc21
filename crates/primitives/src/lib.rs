//! Leaf types shared across the strata crates: identifiers and match subjects.

/// Namespaced resource identifiers.
pub mod ident;
/// Block state snapshots used as match subjects.
pub mod state;

pub use ident::{DEFAULT_NAMESPACE, ResourceId, ResourceIdError};
pub use state::BlockState;
