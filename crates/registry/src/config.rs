//! Typed field access over JSON config documents.
//!
//! Definition decoders walk [`serde_json::Value`] documents through these
//! helpers so every failure names the offending field.

use serde_json::Value;

use crate::error::ConfigError;

/// Returns a required field.
pub fn require<'a>(doc: &'a Value, field: &'static str) -> Result<&'a Value, ConfigError> {
	doc.get(field).ok_or(ConfigError::MissingField(field))
}

/// Returns a required string field.
pub fn require_str<'a>(doc: &'a Value, field: &'static str) -> Result<&'a str, ConfigError> {
	as_str(require(doc, field)?, field)
}

/// Returns a required array field.
pub fn require_array<'a>(doc: &'a Value, field: &'static str) -> Result<&'a [Value], ConfigError> {
	require(doc, field)?
		.as_array()
		.map(Vec::as_slice)
		.ok_or_else(|| invalid(field, "expected an array"))
}

/// Interprets a value as a string, blaming `field` otherwise.
pub fn as_str<'a>(value: &'a Value, field: &'static str) -> Result<&'a str, ConfigError> {
	value
		.as_str()
		.ok_or_else(|| invalid(field, "expected a string"))
}

/// Builds a [`ConfigError::Invalid`] for `field`.
pub fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
	ConfigError::Invalid {
		field,
		reason: reason.into(),
	}
}
