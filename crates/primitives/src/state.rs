use std::collections::BTreeMap;

use crate::ident::ResourceId;

/// A snapshot of one placed block: its block id plus state properties.
///
/// Properties are stored sorted by name so two states with the same content
/// compare equal regardless of construction order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockState {
	block: ResourceId,
	properties: BTreeMap<String, String>,
}

impl BlockState {
	/// Creates a state with no properties.
	pub fn new(block: ResourceId) -> Self {
		Self {
			block,
			properties: BTreeMap::new(),
		}
	}

	/// Adds a state property, replacing any previous value for `name`.
	#[must_use]
	pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.properties.insert(name.into(), value.into());
		self
	}

	/// Returns the block id — the cheap lookup key for this subject.
	#[must_use]
	pub fn block(&self) -> &ResourceId {
		&self.block
	}

	/// Returns the value of one state property, if set.
	#[must_use]
	pub fn property(&self, name: &str) -> Option<&str> {
		self.properties.get(name).map(String::as_str)
	}

	/// Iterates `(name, value)` pairs in name order.
	pub fn properties(&self) -> impl Iterator<Item = (&str, &str)> {
		self.properties
			.iter()
			.map(|(k, v)| (k.as_str(), v.as_str()))
	}
}
