use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core_api::error::{AggdocError, Result};

/// A compile-time dependency of a module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dependency {
	/// Origin of the artifact (registry name, `path`, an organisation...).
	pub group: String,
	/// Artifact name.
	pub artifact: String,
	/// Version or version requirement as declared.
	pub version: String,
}

/// Version-independent identity of a dependency.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DependencyKey {
	/// See [`Dependency::group`].
	pub group: String,
	/// See [`Dependency::artifact`].
	pub artifact: String,
}

impl Dependency {
	/// Create a dependency from its coordinates.
	pub fn new(group: impl Into<String>, artifact: impl Into<String>, version: impl Into<String>) -> Self {
		Self {
			group: group.into(),
			artifact: artifact.into(),
			version: version.into(),
		}
	}

	/// Parse a `group:artifact:version` coordinate.
	pub fn parse(coordinate: &str) -> Result<Self> {
		let mut parts = coordinate.trim().splitn(3, ':');
		match (parts.next(), parts.next(), parts.next()) {
			(Some(group), Some(artifact), Some(version))
				if !group.is_empty() && !artifact.is_empty() && !version.is_empty() =>
			{
				Ok(Self::new(group, artifact, version))
			}
			_ => Err(AggdocError::InvalidCoordinate(coordinate.to_string())),
		}
	}

	/// Key used to deduplicate the merged classpath.
	pub fn key(&self) -> DependencyKey {
		DependencyKey {
			group: self.group.clone(),
			artifact: self.artifact.clone(),
		}
	}
}

impl fmt::Display for Dependency {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}:{}", self.group, self.artifact, self.version)
	}
}

impl FromStr for Dependency {
	type Err = AggdocError;

	fn from_str(s: &str) -> Result<Self> {
		Self::parse(s)
	}
}

/// Merged dependency entries of all selected modules.
///
/// Entries keep the position of their first appearance. When two modules declare
/// different versions of the same key the later one replaces the earlier value;
/// no version arbitration happens here.
#[derive(Debug, Clone, Default)]
pub struct Classpath {
	entries: Vec<Dependency>,
	positions: HashMap<DependencyKey, usize>,
}

impl Classpath {
	/// Empty classpath.
	pub fn new() -> Self {
		Self::default()
	}

	/// Merge one dependency. Returns the replaced entry if the key was already present
	/// with a different version.
	pub fn insert(&mut self, dependency: Dependency) -> Option<Dependency> {
		match self.positions.get(&dependency.key()) {
			Some(&position) => {
				let existing = &mut self.entries[position];
				if existing.version == dependency.version {
					None
				} else {
					Some(std::mem::replace(existing, dependency))
				}
			}
			None => {
				self.positions.insert(dependency.key(), self.entries.len());
				self.entries.push(dependency);
				None
			}
		}
	}

	/// Number of distinct keys.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// True if nothing has been merged.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Consume the classpath, returning entries in first-appearance order.
	pub fn into_entries(self) -> Vec<Dependency> {
		self.entries
	}
}
