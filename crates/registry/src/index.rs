//! Derived key → candidates cache, rebuilt on generation change.
//!
//! # Role
//!
//! [`IndirectIndex`] fans a registry's definitions out into per-key buckets
//! using each definition's conservative key set. It is an index, not a
//! filter: the matcher predicate is never evaluated during a build, so a
//! bucket may hold candidates whose `test` still fails. Callers filter at
//! lookup time.
//!
//! # Invariants
//!
//! - A bucket is never served while the built generation differs from the
//!   registry's current generation; staleness is one integer compare per
//!   read (see `test_index_rebuilds_after_reload`).
//! - A build is a pure function of one captured snapshot: redundant
//!   concurrent rebuilds converge to equal contents, so last-write-wins
//!   publication is harmless.

use std::hash::Hash;
use std::sync::Arc;

use arc_swap::ArcSwap;
use rustc_hash::FxHashMap;

use crate::definition::Definition;
use crate::store::DataRegistry;

struct BuiltIndex<K, D> {
	generation: u64,
	buckets: FxHashMap<K, Vec<Arc<D>>>,
}

/// Cache mapping a cheap key to the definitions that could match it.
///
/// Holds no definitions of its own: buckets share the registry snapshot's
/// `Arc`s, and the whole structure is discarded and rebuilt when the
/// registry publishes a new generation.
pub struct IndirectIndex<K, D> {
	registry: Arc<DataRegistry<D>>,
	extract: Box<dyn Fn(&D) -> Vec<K> + Send + Sync>,
	built: ArcSwap<BuiltIndex<K, D>>,
}

impl<K, D> IndirectIndex<K, D>
where
	K: Eq + Hash + Clone + Send + Sync + 'static,
	D: Definition,
{
	/// Creates an index over `registry`, keyed by `extract` (typically the
	/// definition matcher's `possible_keys`).
	pub fn new(
		registry: Arc<DataRegistry<D>>,
		extract: impl Fn(&D) -> Vec<K> + Send + Sync + 'static,
	) -> Self {
		let built = ArcSwap::from_pointee(build(&registry, &extract));
		Self {
			registry,
			extract: Box::new(extract),
			built,
		}
	}

	/// Returns the candidates for `key` in declaration order.
	///
	/// Empty for keys no definition announces, never an error.
	#[must_use]
	pub fn get_all(&self, key: &K) -> Vec<Arc<D>> {
		self.current()
			.buckets
			.get(key)
			.cloned()
			.unwrap_or_default()
	}

	/// Returns the first candidate for `key` accepted by `pred`,
	/// scanning in declaration order.
	#[must_use]
	pub fn find(&self, key: &K, pred: impl Fn(&D) -> bool) -> Option<Arc<D>> {
		let built = self.current();
		let bucket = built.buckets.get(key)?;
		bucket.iter().find(|def| pred(def.as_ref())).cloned()
	}

	/// Loads the built state, rebuilding it first if the registry moved on.
	fn current(&self) -> Arc<BuiltIndex<K, D>> {
		let built = self.built.load_full();
		if built.generation == self.registry.generation() {
			return built;
		}
		let rebuilt = Arc::new(build(&self.registry, &self.extract));
		self.built.store(rebuilt.clone());
		rebuilt
	}
}

/// Builds per-key buckets from the registry's current snapshot.
fn build<K, D>(registry: &DataRegistry<D>, extract: impl Fn(&D) -> Vec<K>) -> BuiltIndex<K, D>
where
	K: Eq + Hash + Clone,
	D: Definition,
{
	let values = registry.values();
	let generation = values.generation();
	let mut buckets: FxHashMap<K, Vec<Arc<D>>> = FxHashMap::default();
	for def in values.iter() {
		for key in extract(def.as_ref()) {
			buckets.entry(key).or_default().push(Arc::clone(def));
		}
	}
	tracing::debug!(
		registry = registry.label(),
		generation,
		keys = buckets.len(),
		"rebuilt indirect index"
	);
	BuiltIndex { generation, buckets }
}

#[cfg(test)]
mod tests {
	use strata_primitives::{BlockState, ResourceId};

	use super::*;
	use crate::test_fixtures::{
		Probe, probe_doc, probe_doc_with_property, rid, source_of,
	};

	fn index_of(registry: &Arc<DataRegistry<Probe>>) -> IndirectIndex<ResourceId, Probe> {
		IndirectIndex::new(Arc::clone(registry), |p: &Probe| p.keys())
	}

	#[test]
	fn test_buckets_preserve_declaration_order() {
		let registry = Arc::new(DataRegistry::<Probe>::new("probes"));
		let source = source_of(&[
			("tfg:first", probe_doc(&["tfg:gravel", "tfg:sand"], "a")),
			("tfg:second", probe_doc(&["tfg:gravel"], "b")),
		]);
		registry.reload(&source).unwrap();

		let index = index_of(&registry);
		let gravel: Vec<String> = index
			.get_all(&rid("tfg:gravel"))
			.iter()
			.map(|p| p.marker.clone())
			.collect();
		assert_eq!(gravel, ["a", "b"]);
		assert_eq!(index.get_all(&rid("tfg:sand")).len(), 1);
		// Unseen key: empty, never an error.
		assert!(index.get_all(&rid("tfg:granite")).is_empty());
	}

	#[test]
	fn test_index_rebuilds_after_reload() {
		let registry = Arc::new(DataRegistry::<Probe>::new("probes"));
		let source = source_of(&[("tfg:a", probe_doc(&["tfg:gravel"], "old"))]);
		registry.reload(&source).unwrap();

		let index = index_of(&registry);
		assert_eq!(index.get_all(&rid("tfg:gravel")).len(), 1);

		let swapped = source_of(&[("tfg:b", probe_doc(&["tfg:sand"], "new"))]);
		registry.reload(&swapped).unwrap();

		// Stale bucket is discarded, not patched.
		assert!(index.get_all(&rid("tfg:gravel")).is_empty());
		assert_eq!(index.get_all(&rid("tfg:sand"))[0].marker, "new");
	}

	#[test]
	fn test_index_rebuilds_after_sync() {
		let server = Arc::new(DataRegistry::<Probe>::new("probes"));
		let source = source_of(&[("tfg:a", probe_doc(&["tfg:gravel"], "synced"))]);
		server.reload(&source).unwrap();

		let client = Arc::new(DataRegistry::<Probe>::new("probes"));
		let index = index_of(&client);
		assert!(index.get_all(&rid("tfg:gravel")).is_empty());

		client.deserialize_all(&server.serialize_all()).unwrap();
		assert_eq!(index.get_all(&rid("tfg:gravel"))[0].marker, "synced");
	}

	#[test]
	fn test_conservative_keys_never_lose_matches() {
		let registry = Arc::new(DataRegistry::<Probe>::new("probes"));
		let source = source_of(&[(
			"tfg:natural_only",
			probe_doc_with_property(&["tfg:gravel"], "natural", "true", "n"),
		)]);
		registry.reload(&source).unwrap();
		let index = index_of(&registry);

		let natural = BlockState::new(rid("tfg:gravel")).with_property("natural", "true");
		let placed = BlockState::new(rid("tfg:gravel")).with_property("natural", "false");

		// Every definition whose test accepts a subject must appear in the
		// subject's bucket; over-approximation is allowed, omission is not.
		let bucket = index.get_all(natural.block());
		let def = &bucket[0];
		assert!(def.matches(&natural));
		assert!(!def.matches(&placed));
		// The property-restricted candidate still sits in the bucket for a
		// non-matching state of the same block.
		assert_eq!(index.get_all(placed.block()).len(), 1);
	}

	#[test]
	fn test_find_returns_first_declared_match() {
		let registry = Arc::new(DataRegistry::<Probe>::new("probes"));
		let source = source_of(&[
			("tfg:a", probe_doc(&["tfg:gravel"], "a")),
			("tfg:b", probe_doc(&["tfg:gravel"], "b")),
		]);
		registry.reload(&source).unwrap();
		let index = index_of(&registry);

		let state = BlockState::new(rid("tfg:gravel"));
		let hit = index.find(state.block(), |p| p.matches(&state)).unwrap();
		assert_eq!(hit.marker, "a");

		// Repeated calls under one generation are deterministic.
		for _ in 0..3 {
			let again = index.find(state.block(), |p| p.matches(&state)).unwrap();
			assert_eq!(again.marker, "a");
		}

		// Swapping declaration order across a reload flips the winner.
		let swapped = source_of(&[
			("tfg:b", probe_doc(&["tfg:gravel"], "b")),
			("tfg:a", probe_doc(&["tfg:gravel"], "a")),
		]);
		registry.reload(&swapped).unwrap();
		let hit = index.find(state.block(), |p| p.matches(&state)).unwrap();
		assert_eq!(hit.marker, "b");
	}

	#[test]
	fn test_find_skips_candidates_that_fail_the_predicate() {
		let registry = Arc::new(DataRegistry::<Probe>::new("probes"));
		let source = source_of(&[
			(
				"tfg:natural_only",
				probe_doc_with_property(&["tfg:gravel"], "natural", "true", "restricted"),
			),
			("tfg:any", probe_doc(&["tfg:gravel"], "fallback")),
		]);
		registry.reload(&source).unwrap();
		let index = index_of(&registry);

		let placed = BlockState::new(rid("tfg:gravel")).with_property("natural", "false");
		let hit = index.find(placed.block(), |p| p.matches(&placed)).unwrap();
		assert_eq!(hit.marker, "fallback");

		// Nothing matches: None, not an error.
		let granite = BlockState::new(rid("tfg:granite"));
		assert!(index.find(granite.block(), |p| p.matches(&granite)).is_none());
	}
}
