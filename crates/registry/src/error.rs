use std::path::PathBuf;

use strata_primitives::{ResourceId, ResourceIdError};

/// Errors raised while loading definitions from a configuration corpus.
///
/// Any `ConfigError` aborts the whole reload; the registry keeps its
/// previously published table and generation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	/// A corpus file or directory could not be read.
	#[error("failed to read {path}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	/// A corpus file was not valid JSON.
	#[error("invalid JSON in {path}")]
	Json {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},
	/// A document name or id field did not parse as an identifier.
	#[error("invalid identifier")]
	Id(#[from] ResourceIdError),
	/// A required field was absent.
	#[error("missing required field `{0}`")]
	MissingField(&'static str),
	/// A field was present but unusable.
	#[error("field `{field}`: {reason}")]
	Invalid { field: &'static str, reason: String },
	/// Context wrapper naming the definition that failed to decode.
	#[error("definition {id}")]
	Document {
		id: ResourceId,
		#[source]
		source: Box<ConfigError>,
	},
}

impl ConfigError {
	/// Attaches the id of the definition the error came from.
	#[must_use]
	pub fn for_definition(self, id: ResourceId) -> Self {
		Self::Document {
			id,
			source: Box::new(self),
		}
	}
}

/// Errors raised while decoding a full-state sync buffer.
///
/// Any `ProtocolError` leaves the registry's previous table in place; the
/// connection layer decides whether to drop the peer or retry the sync.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
	/// The buffer ended before the announced content did.
	#[error("unexpected end of sync buffer")]
	UnexpectedEof,
	/// A varint ran past its maximum encoded width.
	#[error("varint too long")]
	VarIntTooLong,
	/// A length-prefixed string held invalid UTF-8.
	#[error("invalid utf-8 in string field")]
	InvalidUtf8,
	/// A tagged sub-encoding used an unknown tag byte.
	#[error("unknown tag byte {0:#04x}")]
	UnknownTag(u8),
	/// The buffer continued past the announced content.
	#[error("{0} trailing bytes after last definition")]
	TrailingBytes(usize),
	/// An id field did not parse as an identifier.
	#[error("invalid identifier in sync buffer")]
	Id(#[from] ResourceIdError),
}
