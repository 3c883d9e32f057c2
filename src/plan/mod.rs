//! Aggregation planner: merges the selected modules into one generation request.

/// Dependency entries and classpath merging.
pub mod classpath;
/// Shared documentation options.
pub mod options;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub use self::classpath::{Classpath, Dependency, DependencyKey};
pub use self::options::{DocFlags, DocOptions, MemberLevel, OutputLevel};
use crate::core_api::error::Result;
use crate::layout::{OutputLayout, check_distinct, map_path};
use crate::registry::{Module, ModuleId};

/// A source directory attributed to the module that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRoot {
	/// Owning module.
	pub module: ModuleId,
	/// Source directory.
	pub path: PathBuf,
}

/// One selected module and where its pages go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedModule {
	/// Module identity.
	pub id: ModuleId,
	/// Module directory.
	pub dir: PathBuf,
	/// Source roots of this module.
	pub source_roots: Vec<PathBuf>,
	/// Output directory relative to the plan's output root.
	pub output_subpath: PathBuf,
}

/// The merged inputs of one combined documentation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationPlan {
	output_root: PathBuf,
	modules: Vec<PlannedModule>,
	classpath: Vec<Dependency>,
	module_references: Vec<ModuleId>,
	options: DocOptions,
}

impl AggregationPlan {
	/// Combined output root.
	pub fn output_root(&self) -> &Path {
		&self.output_root
	}

	/// Selected modules in selection order.
	pub fn modules(&self) -> &[PlannedModule] {
		&self.modules
	}

	/// Deduplicated external dependencies.
	pub fn classpath(&self) -> &[Dependency] {
		&self.classpath
	}

	/// Sibling modules referenced by the selection but not selected themselves.
	///
	/// They belong on the classpath; they get no output directory.
	pub fn module_references(&self) -> &[ModuleId] {
		&self.module_references
	}

	/// Options shared by the whole run.
	pub fn options(&self) -> &DocOptions {
		&self.options
	}

	/// Every source root, tagged with its owning module.
	pub fn source_roots(&self) -> Vec<SourceRoot> {
		self.modules
			.iter()
			.flat_map(|module| {
				module.source_roots.iter().map(|path| SourceRoot {
					module: module.id.clone(),
					path: path.clone(),
				})
			})
			.collect()
	}

	/// Absolute output directory of a planned module.
	pub fn module_output_dir(&self, module: &PlannedModule) -> PathBuf {
		self.output_root.join(&module.output_subpath)
	}

	/// True when nothing was selected.
	pub fn is_empty(&self) -> bool {
		self.modules.is_empty()
	}
}

/// Build the plan for `selected`, which must be in selection order.
///
/// Never fails for an empty selection. The only failure is two modules mapping to
/// the same output directory.
pub fn plan(selected: &[&Module], layout: &OutputLayout, options: DocOptions) -> Result<AggregationPlan> {
	check_distinct(selected.iter().map(|module| module.id()))?;

	let mut classpath = Classpath::new();
	let mut module_references: Vec<ModuleId> = Vec::new();
	let mut modules = Vec::with_capacity(selected.len());

	for module in selected {
		for dependency in module.dependencies() {
			if let Some(replaced) = classpath.insert(dependency.clone()) {
				debug!(
					module = %module.id(),
					dependency = %dependency,
					replaced = %replaced.version,
					"later module overrides dependency version"
				);
			}
		}

		for reference in module.references() {
			let is_selected = selected.iter().any(|other| other.id() == reference);
			if !is_selected && !module_references.contains(reference) {
				module_references.push(reference.clone());
			}
		}

		modules.push(PlannedModule {
			id: module.id().clone(),
			dir: module.dir().to_path_buf(),
			source_roots: module.source_roots().to_vec(),
			output_subpath: map_path(module.id()),
		});
	}

	info!(
		modules = modules.len(),
		dependencies = classpath.len(),
		output = %layout.root().display(),
		"aggregation planned"
	);

	Ok(AggregationPlan {
		output_root: layout.root().to_path_buf(),
		modules,
		classpath: classpath.into_entries(),
		module_references,
		options,
	})
}
