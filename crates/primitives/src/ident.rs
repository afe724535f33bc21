use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Namespace assumed when an identifier is written without one.
pub const DEFAULT_NAMESPACE: &str = "strata";

/// A namespaced identifier of the form `namespace:path`.
///
/// Namespaces are lowercase `[a-z0-9_.-]`; paths additionally allow `/`.
/// The string form is canonical: two ids are equal iff their string forms
/// are equal, and the `Hash`/`Ord` impls follow the string form.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(Box<str>);

/// Errors from parsing or constructing a [`ResourceId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResourceIdError {
	/// The namespace segment was empty.
	#[error("resource id {0:?} has an empty namespace")]
	EmptyNamespace(String),
	/// The path segment was empty.
	#[error("resource id {0:?} has an empty path")]
	EmptyPath(String),
	/// A segment contained a character outside its allowed set.
	#[error("invalid character {ch:?} in resource id {id:?}")]
	InvalidChar { id: String, ch: char },
}

fn valid_namespace_char(c: char) -> bool {
	matches!(c, 'a'..='z' | '0'..='9' | '_' | '.' | '-')
}

fn valid_path_char(c: char) -> bool {
	valid_namespace_char(c) || c == '/'
}

impl ResourceId {
	/// Creates an id from explicit namespace and path segments.
	pub fn new(namespace: &str, path: &str) -> Result<Self, ResourceIdError> {
		let id = || format!("{namespace}:{path}");
		if namespace.is_empty() {
			return Err(ResourceIdError::EmptyNamespace(id()));
		}
		if path.is_empty() {
			return Err(ResourceIdError::EmptyPath(id()));
		}
		if let Some(ch) = namespace.chars().find(|&c| !valid_namespace_char(c)) {
			return Err(ResourceIdError::InvalidChar { id: id(), ch });
		}
		if let Some(ch) = path.chars().find(|&c| !valid_path_char(c)) {
			return Err(ResourceIdError::InvalidChar { id: id(), ch });
		}
		Ok(Self(id().into_boxed_str()))
	}

	/// Parses `namespace:path`, or a bare path under [`DEFAULT_NAMESPACE`].
	pub fn parse(s: &str) -> Result<Self, ResourceIdError> {
		match s.split_once(':') {
			Some((namespace, path)) => Self::new(namespace, path),
			None => Self::new(DEFAULT_NAMESPACE, s),
		}
	}

	/// Returns the canonical `namespace:path` form.
	#[must_use]
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Returns the namespace segment.
	#[must_use]
	pub fn namespace(&self) -> &str {
		let colon = self.0.find(':').unwrap_or(0);
		&self.0[..colon]
	}

	/// Returns the path segment.
	#[must_use]
	pub fn path(&self) -> &str {
		let colon = self.0.find(':').unwrap_or(0);
		&self.0[colon + 1..]
	}
}

impl fmt::Display for ResourceId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl fmt::Debug for ResourceId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "ResourceId({})", self.0)
	}
}

impl FromStr for ResourceId {
	type Err = ResourceIdError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

impl Serialize for ResourceId {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(self.as_str())
	}
}

impl<'de> Deserialize<'de> for ResourceId {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let s = String::deserialize(deserializer)?;
		Self::parse(&s).map_err(D::Error::custom)
	}
}
