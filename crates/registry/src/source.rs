//! Configuration corpus suppliers.

use std::path::{Path, PathBuf};

use serde_json::Value;
use strata_primitives::ResourceId;

use crate::error::ConfigError;

/// Supplies the configuration corpus for one reload.
///
/// Document order is the declaration order: it decides bucket order in
/// derived indexes and therefore first-match-wins in lookups.
pub trait DefinitionSource {
	/// Produces every `(id, document)` pair in declaration order.
	fn documents(&self) -> Result<Vec<(ResourceId, Value)>, ConfigError>;
}

/// In-memory corpus, mainly for tests and embedded defaults.
#[derive(Debug, Default)]
pub struct MemorySource {
	docs: Vec<(ResourceId, Value)>,
}

impl MemorySource {
	/// Creates an empty corpus.
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a document; push order is declaration order.
	pub fn push(&mut self, id: ResourceId, doc: Value) -> &mut Self {
		self.docs.push((id, doc));
		self
	}
}

impl DefinitionSource for MemorySource {
	fn documents(&self) -> Result<Vec<(ResourceId, Value)>, ConfigError> {
		Ok(self.docs.clone())
	}
}

/// Corpus backed by a directory tree of `*.json` files.
///
/// Ids derive from the path relative to the root, without the extension:
/// `<root>/deposits/gold.json` under namespace `tfg` becomes
/// `tfg:deposits/gold`. Entries are visited in sorted order so declaration
/// order does not depend on filesystem iteration order. Files without a
/// `.json` extension are ignored.
#[derive(Debug)]
pub struct DirectorySource {
	namespace: String,
	root: PathBuf,
}

impl DirectorySource {
	/// Creates a source rooted at `root`, assigning ids under `namespace`.
	pub fn new(namespace: impl Into<String>, root: impl Into<PathBuf>) -> Self {
		Self {
			namespace: namespace.into(),
			root: root.into(),
		}
	}
}

impl DefinitionSource for DirectorySource {
	fn documents(&self) -> Result<Vec<(ResourceId, Value)>, ConfigError> {
		let mut docs = Vec::new();
		collect(&self.namespace, &self.root, &self.root, &mut docs)?;
		Ok(docs)
	}
}

fn collect(
	namespace: &str,
	root: &Path,
	dir: &Path,
	docs: &mut Vec<(ResourceId, Value)>,
) -> Result<(), ConfigError> {
	let io = |source| ConfigError::Io {
		path: dir.to_path_buf(),
		source,
	};
	let mut entries: Vec<PathBuf> = Vec::new();
	for entry in std::fs::read_dir(dir).map_err(io)? {
		entries.push(entry.map_err(io)?.path());
	}
	entries.sort();

	for path in entries {
		if path.is_dir() {
			collect(namespace, root, &path, docs)?;
		} else if path.extension().is_some_and(|ext| ext == "json") {
			let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
				path: path.clone(),
				source,
			})?;
			let doc = serde_json::from_str(&text).map_err(|source| ConfigError::Json {
				path: path.clone(),
				source,
			})?;
			docs.push((document_id(namespace, root, &path)?, doc));
		}
	}
	Ok(())
}

fn document_id(namespace: &str, root: &Path, path: &Path) -> Result<ResourceId, ConfigError> {
	let rel = path.strip_prefix(root).unwrap_or(path).with_extension("");
	let id_path = rel
		.components()
		.map(|c| c.as_os_str().to_string_lossy())
		.collect::<Vec<_>>()
		.join("/");
	Ok(ResourceId::new(namespace, &id_path)?)
}
