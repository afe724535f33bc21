use rustc_hash::FxHashMap;
use strata_primitives::ResourceId;

/// Quality grade of a mined ore piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OreGrade {
	Poor,
	Normal,
	Rich,
}

impl OreGrade {
	/// All grades, poorest first.
	pub const ALL: [OreGrade; 3] = [OreGrade::Poor, OreGrade::Normal, OreGrade::Rich];

	/// Metal units produced by smelting one piece of this grade.
	#[must_use]
	pub fn smelt_amount(self) -> u32 {
		match self {
			OreGrade::Poor => 15,
			OreGrade::Normal => 25,
			OreGrade::Rich => 35,
		}
	}
}

/// The item registered for one ore kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OreItem {
	ore: ResourceId,
	metal: Option<ResourceId>,
	graded: bool,
}

impl OreItem {
	/// An ore that smelts into `metal`, with grade variants.
	#[must_use]
	pub fn graded(ore: ResourceId, metal: ResourceId) -> Self {
		Self {
			ore,
			metal: Some(metal),
			graded: true,
		}
	}

	/// A mineral: no smelting product, no grade variants.
	#[must_use]
	pub fn mineral(ore: ResourceId) -> Self {
		Self {
			ore,
			metal: None,
			graded: false,
		}
	}

	/// The ore kind this item represents.
	#[must_use]
	pub fn ore(&self) -> &ResourceId {
		&self.ore
	}

	/// Smelting product, or `None` for minerals.
	#[must_use]
	pub fn metal(&self) -> Option<&ResourceId> {
		self.metal.as_ref()
	}

	/// Whether grade variants of this item exist.
	#[must_use]
	pub fn is_graded(&self) -> bool {
		self.graded
	}
}

/// Duplicate registration; the first registration stays in place.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("ore item already registered for {0}")]
pub struct DuplicateOreItem(pub ResourceId);

/// Startup-time map from ore kind to its registered item.
///
/// Unlike the data-driven registries, registration here rejects duplicates
/// outright: each ore kind gets exactly one item for the process lifetime,
/// so a second registration is a wiring bug rather than a data override.
#[derive(Debug, Default)]
pub struct OreItemRegistry {
	items: FxHashMap<ResourceId, OreItem>,
}

impl OreItemRegistry {
	/// Creates an empty registry.
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers the item under its ore kind; fails if one already exists.
	pub fn register(&mut self, item: OreItem) -> Result<(), DuplicateOreItem> {
		let ore = item.ore.clone();
		if self.items.contains_key(&ore) {
			return Err(DuplicateOreItem(ore));
		}
		self.items.insert(ore, item);
		Ok(())
	}

	/// Looks up the item registered for `ore`.
	#[must_use]
	pub fn get(&self, ore: &ResourceId) -> Option<&OreItem> {
		self.items.get(ore)
	}

	/// Smelt yield for one piece of `ore` at `grade`.
	///
	/// `None` for unregistered ores and for minerals; ungraded metal ores
	/// always yield the normal amount.
	#[must_use]
	pub fn smelt_amount(&self, ore: &ResourceId, grade: OreGrade) -> Option<u32> {
		let item = self.get(ore)?;
		item.metal.as_ref()?;
		Some(if item.graded {
			grade.smelt_amount()
		} else {
			OreGrade::Normal.smelt_amount()
		})
	}
}
