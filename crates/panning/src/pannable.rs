use std::sync::Arc;

use bytes::Bytes;
use serde_json::Value;
use strata_primitives::{BlockState, ResourceId};
use strata_registry::{
	ConfigError, DataRegistry, Definition, DefinitionSource, IndirectIndex, Matcher,
	ProtocolError, WireReader, WireWriter, config,
};

use crate::ingredient::BlockIngredient;

/// One panning rule: which block states can be scooped, how the pan looks
/// while washing, and which loot table settles out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pannable {
	id: ResourceId,
	ingredient: BlockIngredient,
	model_stages: Vec<ResourceId>,
	loot_table: ResourceId,
}

impl Pannable {
	/// The matcher deciding which block states this rule covers.
	#[must_use]
	pub fn ingredient(&self) -> &BlockIngredient {
		&self.ingredient
	}

	/// Render stage identifiers in wash order. Opaque to the registry.
	#[must_use]
	pub fn model_stages(&self) -> &[ResourceId] {
		&self.model_stages
	}

	/// Loot table identifier resolved by the loot system on completion.
	#[must_use]
	pub fn loot_table(&self) -> &ResourceId {
		&self.loot_table
	}
}

impl Definition for Pannable {
	fn id(&self) -> &ResourceId {
		&self.id
	}

	fn from_config(id: ResourceId, doc: &Value) -> Result<Self, ConfigError> {
		let ingredient = BlockIngredient::from_config(config::require(doc, "ingredient")?)?;
		let mut model_stages = Vec::new();
		for stage in config::require_array(doc, "model_stages")? {
			model_stages.push(ResourceId::parse(config::as_str(stage, "model_stages")?)?);
		}
		let loot_table = ResourceId::parse(config::require_str(doc, "loot_table")?)?;
		Ok(Self {
			id,
			ingredient,
			model_stages,
			loot_table,
		})
	}

	fn encode(&self, out: &mut WireWriter) {
		self.ingredient.encode(out);
		out.put_varint(self.model_stages.len() as u64);
		for stage in &self.model_stages {
			out.put_str(stage.as_str());
		}
		out.put_str(self.loot_table.as_str());
	}

	fn decode(id: ResourceId, input: &mut WireReader<'_>) -> Result<Self, ProtocolError> {
		let ingredient = BlockIngredient::decode(input)?;
		let count = input.get_varint()?;
		let mut model_stages = Vec::new();
		for _ in 0..count {
			model_stages.push(ResourceId::parse(&input.get_str()?)?);
		}
		let loot_table = ResourceId::parse(&input.get_str()?)?;
		Ok(Self {
			id,
			ingredient,
			model_stages,
			loot_table,
		})
	}
}

/// The pannable store: an owned registry plus its block-keyed index.
///
/// Callers hold and pass this explicitly; there is no ambient singleton.
pub struct Pannables {
	registry: Arc<DataRegistry<Pannable>>,
	by_block: IndirectIndex<ResourceId, Pannable>,
}

impl Pannables {
	/// Creates an empty store.
	#[must_use]
	pub fn new() -> Self {
		let registry = Arc::new(DataRegistry::new("pannables"));
		let by_block = IndirectIndex::new(Arc::clone(&registry), |p: &Pannable| {
			p.ingredient.possible_keys()
		});
		Self { registry, by_block }
	}

	/// Reloads every pannable from `source`; see [`DataRegistry::reload`]
	/// for atomicity and duplicate-id semantics.
	pub fn reload(&self, source: &dyn DefinitionSource) -> Result<usize, ConfigError> {
		self.registry.reload(source)
	}

	/// Returns the earliest-declared pannable whose ingredient accepts
	/// `state`, or `None` when the state cannot be panned.
	#[must_use]
	pub fn get(&self, state: &BlockState) -> Option<Arc<Pannable>> {
		self.by_block.find(state.block(), |p| p.ingredient.test(state))
	}

	/// Encodes the full definition set for a newly connected peer.
	#[must_use]
	pub fn encode_sync(&self) -> Bytes {
		self.registry.serialize_all()
	}

	/// Replaces the full definition set from a peer's sync buffer.
	pub fn apply_sync(&self, bytes: &[u8]) -> Result<usize, ProtocolError> {
		self.registry.deserialize_all(bytes)
	}

	/// Read-only access to the underlying registry.
	#[must_use]
	pub fn registry(&self) -> &DataRegistry<Pannable> {
		&self.registry
	}
}

impl Default for Pannables {
	fn default() -> Self {
		Self::new()
	}
}
