//! Shared probe definition for store and index tests.

use serde_json::{Value, json};
use strata_primitives::{BlockState, ResourceId};

use crate::config;
use crate::definition::Definition;
use crate::error::{ConfigError, ProtocolError};
use crate::matcher::Matcher;
use crate::source::MemorySource;
use crate::wire::{WireReader, WireWriter};

/// Parses an id, panicking on bad test input.
pub(crate) fn rid(s: &str) -> ResourceId {
	ResourceId::parse(s).unwrap()
}

/// Minimal matcher: a block list plus an optional required property.
pub(crate) struct ProbeMatcher {
	blocks: Vec<ResourceId>,
	property: Option<(String, String)>,
}

impl Matcher<BlockState> for ProbeMatcher {
	type Key = ResourceId;

	fn test(&self, subject: &BlockState) -> bool {
		self.blocks.contains(subject.block())
			&& self
				.property
				.as_ref()
				.is_none_or(|(name, value)| subject.property(name) == Some(value))
	}

	fn possible_keys(&self) -> Vec<ResourceId> {
		self.blocks.clone()
	}
}

/// Probe definition: one matcher plus a marker payload field.
pub(crate) struct Probe {
	id: ResourceId,
	matcher: ProbeMatcher,
	pub(crate) marker: String,
}

impl Probe {
	pub(crate) fn matches(&self, subject: &BlockState) -> bool {
		self.matcher.test(subject)
	}

	pub(crate) fn keys(&self) -> Vec<ResourceId> {
		self.matcher.possible_keys()
	}
}

impl Definition for Probe {
	fn id(&self) -> &ResourceId {
		&self.id
	}

	fn from_config(id: ResourceId, doc: &Value) -> Result<Self, ConfigError> {
		let mut blocks = Vec::new();
		for value in config::require_array(doc, "blocks")? {
			blocks.push(ResourceId::parse(config::as_str(value, "blocks")?)?);
		}
		let property = match doc.get("property") {
			Some(spec) => Some((
				config::require_str(spec, "name")?.to_owned(),
				config::require_str(spec, "value")?.to_owned(),
			)),
			None => None,
		};
		let marker = config::require_str(doc, "marker")?.to_owned();
		Ok(Self {
			id,
			matcher: ProbeMatcher { blocks, property },
			marker,
		})
	}

	fn encode(&self, out: &mut WireWriter) {
		out.put_varint(self.matcher.blocks.len() as u64);
		for block in &self.matcher.blocks {
			out.put_str(block.as_str());
		}
		match &self.matcher.property {
			None => out.put_tag(0),
			Some((name, value)) => {
				out.put_tag(1);
				out.put_str(name);
				out.put_str(value);
			}
		}
		out.put_str(&self.marker);
	}

	fn decode(id: ResourceId, input: &mut WireReader<'_>) -> Result<Self, ProtocolError> {
		let count = input.get_varint()?;
		let mut blocks = Vec::new();
		for _ in 0..count {
			blocks.push(ResourceId::parse(&input.get_str()?)?);
		}
		let property = match input.get_tag()? {
			0 => None,
			1 => Some((input.get_str()?, input.get_str()?)),
			tag => return Err(ProtocolError::UnknownTag(tag)),
		};
		let marker = input.get_str()?;
		Ok(Self {
			id,
			matcher: ProbeMatcher { blocks, property },
			marker,
		})
	}
}

/// Builds a probe config document over `blocks`.
pub(crate) fn probe_doc(blocks: &[&str], marker: &str) -> Value {
	json!({ "blocks": blocks, "marker": marker })
}

/// Builds a probe config document restricted to one state property value.
pub(crate) fn probe_doc_with_property(
	blocks: &[&str],
	name: &str,
	value: &str,
	marker: &str,
) -> Value {
	json!({
		"blocks": blocks,
		"property": { "name": name, "value": value },
		"marker": marker,
	})
}

/// Builds a memory corpus from `(id, document)` pairs.
pub(crate) fn source_of(docs: &[(&str, Value)]) -> MemorySource {
	let mut source = MemorySource::new();
	for (id, doc) in docs {
		source.push(rid(id), doc.clone());
	}
	source
}
