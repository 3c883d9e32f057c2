use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::ModuleRegistry;
use super::module::{Module, ModuleId};
use crate::core_api::error::{AggdocError, Result};

/// Read-only snapshot of a project's module tree.
///
/// Modules are stored in a node table in declaration order and indexed by identity;
/// sibling dependencies are plain identity lists rather than pointers.
#[derive(Debug, Clone, Default)]
pub struct ProjectGraph {
	root_name: String,
	root_dir: PathBuf,
	modules: Vec<Module>,
	index: HashMap<ModuleId, usize>,
}

impl ProjectGraph {
	/// Start building a graph for the project rooted at `root_dir`.
	pub fn builder(root_name: impl Into<String>, root_dir: impl Into<PathBuf>) -> ProjectGraphBuilder {
		ProjectGraphBuilder {
			root_name: root_name.into(),
			root_dir: root_dir.into(),
			modules: Vec::new(),
		}
	}

	/// Name of the root (aggregator) project.
	pub fn root_name(&self) -> &str {
		&self.root_name
	}

	/// Directory of the root (aggregator) project.
	pub fn root_dir(&self) -> &Path {
		&self.root_dir
	}

	/// Number of modules below the root.
	pub fn len(&self) -> usize {
		self.modules.len()
	}

	/// True when the project has no modules below the root.
	pub fn is_empty(&self) -> bool {
		self.modules.is_empty()
	}
}

impl ModuleRegistry for ProjectGraph {
	fn modules(&self) -> &[Module] {
		&self.modules
	}

	fn get(&self, id: &ModuleId) -> Option<&Module> {
		self.index.get(id).map(|&position| &self.modules[position])
	}
}

/// Collects modules and validates the graph once complete.
#[derive(Debug)]
pub struct ProjectGraphBuilder {
	root_name: String,
	root_dir: PathBuf,
	modules: Vec<Module>,
}

impl ProjectGraphBuilder {
	/// Declare a module. Declaration order is the registry order.
	pub fn module(mut self, module: Module) -> Self {
		self.modules.push(module);
		self
	}

	/// Validate identities and references and produce the graph.
	pub fn build(self) -> Result<ProjectGraph> {
		let mut index = HashMap::with_capacity(self.modules.len());
		for (position, module) in self.modules.iter().enumerate() {
			if index.insert(module.id().clone(), position).is_some() {
				return Err(AggdocError::DuplicateModule(module.id().to_string()));
			}
		}

		for module in &self.modules {
			if let Some(reference) = module.references().iter().find(|r| !index.contains_key(*r)) {
				return Err(AggdocError::UnknownReference {
					module: module.id().to_string(),
					reference: reference.to_string(),
				});
			}
		}

		Ok(ProjectGraph {
			root_name: self.root_name,
			root_dir: self.root_dir,
			modules: self.modules,
			index,
		})
	}
}
