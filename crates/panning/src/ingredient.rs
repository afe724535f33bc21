use serde_json::Value;
use strata_primitives::{BlockState, ResourceId};
use strata_registry::{ConfigError, Matcher, ProtocolError, WireReader, WireWriter, config};

const TAG_BLOCKS: u8 = 0;
const TAG_WITH_PROPERTY: u8 = 1;

/// Composite predicate over a [`BlockState`].
///
/// A closed set of variants behind the [`Matcher`] capability; a new form
/// needs a new tag byte in the wire format and a new config shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockIngredient {
	/// Matches any state of the listed blocks.
	Blocks(Vec<ResourceId>),
	/// Matches the listed blocks only while one state property holds the
	/// given value.
	WithProperty {
		blocks: Vec<ResourceId>,
		name: String,
		value: String,
	},
}

impl BlockIngredient {
	/// Blocks this ingredient could possibly match, irrespective of state.
	#[must_use]
	pub fn possible_blocks(&self) -> &[ResourceId] {
		match self {
			Self::Blocks(blocks) | Self::WithProperty { blocks, .. } => blocks,
		}
	}

	/// Decodes the config form: a block id string, an array of block id
	/// strings, or an object with `blocks` and an optional `property`.
	pub fn from_config(value: &Value) -> Result<Self, ConfigError> {
		match value {
			Value::String(_) | Value::Array(_) => Ok(Self::Blocks(block_list(value)?)),
			Value::Object(_) => {
				let blocks = block_list(config::require(value, "blocks")?)?;
				match value.get("property") {
					None => Ok(Self::Blocks(blocks)),
					Some(spec) => Ok(Self::WithProperty {
						blocks,
						name: config::require_str(spec, "name")?.to_owned(),
						value: config::require_str(spec, "value")?.to_owned(),
					}),
				}
			}
			_ => Err(config::invalid(
				"ingredient",
				"expected a string, array, or object",
			)),
		}
	}

	/// Writes the self-describing wire form: tag byte, then variant fields.
	pub fn encode(&self, out: &mut WireWriter) {
		match self {
			Self::Blocks(blocks) => {
				out.put_tag(TAG_BLOCKS);
				put_blocks(out, blocks);
			}
			Self::WithProperty { blocks, name, value } => {
				out.put_tag(TAG_WITH_PROPERTY);
				put_blocks(out, blocks);
				out.put_str(name);
				out.put_str(value);
			}
		}
	}

	/// Decodes the wire form produced by [`BlockIngredient::encode`].
	pub fn decode(input: &mut WireReader<'_>) -> Result<Self, ProtocolError> {
		match input.get_tag()? {
			TAG_BLOCKS => Ok(Self::Blocks(get_blocks(input)?)),
			TAG_WITH_PROPERTY => Ok(Self::WithProperty {
				blocks: get_blocks(input)?,
				name: input.get_str()?,
				value: input.get_str()?,
			}),
			tag => Err(ProtocolError::UnknownTag(tag)),
		}
	}
}

impl Matcher<BlockState> for BlockIngredient {
	type Key = ResourceId;

	fn test(&self, subject: &BlockState) -> bool {
		match self {
			Self::Blocks(blocks) => blocks.contains(subject.block()),
			Self::WithProperty { blocks, name, value } => {
				blocks.contains(subject.block()) && subject.property(name) == Some(value)
			}
		}
	}

	fn possible_keys(&self) -> Vec<ResourceId> {
		self.possible_blocks().to_vec()
	}
}

fn block_list(value: &Value) -> Result<Vec<ResourceId>, ConfigError> {
	match value {
		Value::String(s) => Ok(vec![ResourceId::parse(s)?]),
		Value::Array(items) => {
			if items.is_empty() {
				return Err(config::invalid("blocks", "must not be empty"));
			}
			items
				.iter()
				.map(|item| Ok(ResourceId::parse(config::as_str(item, "blocks")?)?))
				.collect()
		}
		_ => Err(config::invalid("blocks", "expected a string or array")),
	}
}

fn put_blocks(out: &mut WireWriter, blocks: &[ResourceId]) {
	out.put_varint(blocks.len() as u64);
	for block in blocks {
		out.put_str(block.as_str());
	}
}

fn get_blocks(input: &mut WireReader<'_>) -> Result<Vec<ResourceId>, ProtocolError> {
	let count = input.get_varint()?;
	let mut blocks = Vec::new();
	for _ in 0..count {
		blocks.push(ResourceId::parse(&input.get_str()?)?);
	}
	Ok(blocks)
}
