use serde_json::Value;
use strata_primitives::ResourceId;

use crate::error::{ConfigError, ProtocolError};
use crate::wire::{WireReader, WireWriter};

/// One named, predicate-bearing record managed by a
/// [`DataRegistry`](crate::DataRegistry).
///
/// A definition decodes from two sources, a JSON config document and the
/// wire sync format, and the two must agree: equivalent content through
/// either path yields behaviorally identical definitions, and
/// `decode(encode(d))` reproduces `d`'s observable fields.
pub trait Definition: Send + Sync + Sized + 'static {
	/// The unique id within one registry generation.
	fn id(&self) -> &ResourceId;

	/// Decodes a configuration document.
	fn from_config(id: ResourceId, doc: &Value) -> Result<Self, ConfigError>;

	/// Writes the wire form: matcher sub-encoding, then payload fields.
	/// The id is written by the registry codec, not here.
	fn encode(&self, out: &mut WireWriter);

	/// Decodes the wire form produced by [`Definition::encode`].
	fn decode(id: ResourceId, input: &mut WireReader<'_>) -> Result<Self, ProtocolError>;
}
