//! Output layout: where each module's generated pages live.

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use crate::core_api::error::{AggdocError, Result};
use crate::registry::ModuleId;

/// Default combined output root, relative to the aggregator directory.
pub const DEFAULT_OUTPUT_ROOT: &str = "target/doc-aggregate";

/// Environment variable overriding the output root.
pub const OUTPUT_DIR_ENV: &str = "AGGDOC_OUTPUT_DIR";

/// Relative output directory for a module: its identity segments as path components.
///
/// Depends only on the identity, so it is stable across runs and never derived
/// from the names of documented items.
pub fn map_path(id: &ModuleId) -> PathBuf {
	id.segments().collect()
}

/// The combined output root plus the per-module mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
	root: PathBuf,
}

impl OutputLayout {
	/// Layout rooted at `root`.
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	/// Default layout for an aggregator located at `project_dir`.
	///
	/// Used when no output directory is configured. `AGGDOC_OUTPUT_DIR` replaces
	/// [`DEFAULT_OUTPUT_ROOT`]; relative values are resolved against `project_dir`.
	pub fn for_project(project_dir: &Path) -> Self {
		Self::with_default_root(project_dir, env::var_os(OUTPUT_DIR_ENV).map(PathBuf::from))
	}

	fn with_default_root(project_dir: &Path, env_root: Option<PathBuf>) -> Self {
		let root = env_root.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_ROOT));
		Self::new(project_dir.join(root))
	}

	/// Combined output root.
	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Absolute output directory for a module.
	pub fn module_dir(&self, id: &ModuleId) -> PathBuf {
		self.root.join(map_path(id))
	}
}

/// Verify that no two identities share an output directory.
///
/// Compares the exact [`map_path`] results; identities differing only by case get
/// distinct directories.
pub fn check_distinct<'a>(ids: impl IntoIterator<Item = &'a ModuleId>) -> Result<()> {
	let mut seen: HashMap<PathBuf, &ModuleId> = HashMap::new();
	for id in ids {
		let path = map_path(id);
		if let Some(first) = seen.get(&path) {
			return Err(AggdocError::LayoutCollision {
				first: first.to_string(),
				second: id.to_string(),
				path,
			});
		}
		seen.insert(path, id);
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn id(raw: &str) -> ModuleId {
		ModuleId::parse(raw).unwrap()
	}

	#[test]
	fn test_map_path_preserves_hierarchy() {
		assert_eq!(map_path(&id("module1")), PathBuf::from("module1"));
		assert_eq!(map_path(&id("group/module3")), Path::new("group").join("module3"));
	}

	#[test]
	fn test_map_path_is_stable() {
		let module = id("group/module3");
		assert_eq!(map_path(&module), map_path(&module.clone()));
	}

	#[test]
	fn test_module_dir_is_below_root() {
		let layout = OutputLayout::new("/ws/target/doc-aggregate");
		assert_eq!(
			layout.module_dir(&id("group/module3")),
			Path::new("/ws/target/doc-aggregate/group/module3")
		);
	}

	#[test]
	fn test_env_root_replaces_default() {
		let project = Path::new("/ws");
		assert_eq!(
			OutputLayout::with_default_root(project, None).root(),
			Path::new("/ws/target/doc-aggregate")
		);
		assert_eq!(
			OutputLayout::with_default_root(project, Some(PathBuf::from("docs/api"))).root(),
			Path::new("/ws/docs/api")
		);
		assert_eq!(
			OutputLayout::with_default_root(project, Some(PathBuf::from("/srv/api"))).root(),
			Path::new("/srv/api")
		);
	}

	#[test]
	fn test_distinct_identities_pass() -> Result<()> {
		let ids = [id("module1"), id("module2"), id("group/module1")];
		check_distinct(&ids)
	}

	#[test]
	fn test_case_only_difference_is_distinct() -> Result<()> {
		let ids = [id("Widgets"), id("widgets")];
		check_distinct(&ids)?;
		assert_ne!(map_path(&ids[0]), map_path(&ids[1]));
		Ok(())
	}

	#[test]
	fn test_repeated_identity_is_a_collision() {
		let ids = [id("module1"), id("group/module3"), id("module1")];
		assert!(matches!(
			check_distinct(&ids),
			Err(AggdocError::LayoutCollision { first, second, path })
				if first == "module1" && second == "module1" && path == Path::new("module1")
		));
	}
}
