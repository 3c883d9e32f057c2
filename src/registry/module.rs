use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core_api::error::{AggdocError, Result};
use crate::plan::classpath::Dependency;

/// Hierarchical identity of a module, e.g. `module1` or `group/module3`.
///
/// Identities are validated on construction: no empty segments, no `.` or `..`,
/// no backslashes. Distinct identities therefore always name distinct relative
/// directories.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModuleId(String);

impl ModuleId {
	/// Parse and validate a module identity.
	///
	/// Host-style colon paths (`:group:module3`) are normalised to `group/module3`.
	pub fn parse(raw: &str) -> Result<Self> {
		let normalized = normalize_separators(raw);

		let invalid = |reason| AggdocError::InvalidModuleId {
			identity: raw.to_string(),
			reason,
		};

		if normalized.is_empty() {
			return Err(invalid("identity is empty"));
		}
		if normalized.contains('\\') {
			return Err(invalid("use `/` to separate segments"));
		}
		for segment in normalized.split('/') {
			match segment {
				"" => return Err(invalid("empty path segment")),
				"." | ".." => return Err(invalid("relative path segments are not allowed")),
				_ => {}
			}
		}

		Ok(Self(normalized))
	}

	/// The identity as written, with `/` separators.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Iterate over the hierarchical segments.
	pub fn segments(&self) -> impl Iterator<Item = &str> {
		self.0.split('/')
	}

	/// Last segment of the identity.
	pub fn name(&self) -> &str {
		self.0.rsplit('/').next().unwrap_or(&self.0)
	}

	/// True when `self` lies strictly below `ancestor` in the hierarchy.
	pub fn is_descendant_of(&self, ancestor: &ModuleId) -> bool {
		self.0
			.strip_prefix(ancestor.as_str())
			.is_some_and(|rest| rest.starts_with('/'))
	}
}

/// Trim `raw` and rewrite a host-style colon path (`:group:module3`) with `/` separators.
pub(crate) fn normalize_separators(raw: &str) -> String {
	let trimmed = raw.trim();
	if trimmed.starts_with(':') {
		trimmed.trim_start_matches(':').replace(':', "/")
	} else {
		trimmed.to_string()
	}
}

impl fmt::Display for ModuleId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl FromStr for ModuleId {
	type Err = AggdocError;

	fn from_str(s: &str) -> Result<Self> {
		Self::parse(s)
	}
}

impl TryFrom<String> for ModuleId {
	type Error = AggdocError;

	fn try_from(value: String) -> Result<Self> {
		Self::parse(&value)
	}
}

impl From<ModuleId> for String {
	fn from(id: ModuleId) -> Self {
		id.0
	}
}

/// A node of the project graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
	id: ModuleId,
	dir: PathBuf,
	source_roots: Vec<PathBuf>,
	dependencies: Vec<Dependency>,
	references: Vec<ModuleId>,
	documentable: bool,
}

impl Module {
	/// Create a module with no sources, dependencies or references.
	///
	/// A module without source roots is never documentable; see [`Module::with_source_root`].
	pub fn new(id: ModuleId, dir: impl Into<PathBuf>) -> Self {
		Self {
			id,
			dir: dir.into(),
			source_roots: Vec::new(),
			dependencies: Vec::new(),
			references: Vec::new(),
			documentable: false,
		}
	}

	/// Add a source root directory.
	pub fn with_source_root(mut self, root: impl Into<PathBuf>) -> Self {
		let root = root.into();
		if !self.source_roots.contains(&root) {
			self.source_roots.push(root);
		}
		self
	}

	/// Add a compile-time dependency entry.
	pub fn with_dependency(mut self, dependency: Dependency) -> Self {
		self.dependencies.push(dependency);
		self
	}

	/// Record a reference to a sibling module.
	pub fn with_reference(mut self, reference: ModuleId) -> Self {
		if !self.references.contains(&reference) {
			self.references.push(reference);
		}
		self
	}

	/// Set whether the module has documentable sources.
	pub fn with_documentable(mut self, documentable: bool) -> Self {
		self.documentable = documentable;
		self
	}

	/// Module identity.
	pub fn id(&self) -> &ModuleId {
		&self.id
	}

	/// Directory containing the module.
	pub fn dir(&self) -> &Path {
		&self.dir
	}

	/// Declared source roots, in declaration order.
	pub fn source_roots(&self) -> &[PathBuf] {
		&self.source_roots
	}

	/// External dependency entries, in declaration order.
	pub fn dependencies(&self) -> &[Dependency] {
		&self.dependencies
	}

	/// Sibling modules this module depends on.
	pub fn references(&self) -> &[ModuleId] {
		&self.references
	}

	/// Whether the module contributes documentation.
	pub fn is_documentable(&self) -> bool {
		self.documentable && !self.source_roots.is_empty()
	}
}
