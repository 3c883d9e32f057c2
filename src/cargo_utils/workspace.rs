use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path};

use cargo_metadata::{DependencyKind, Metadata, MetadataCommand, Package};
use tracing::debug;

use super::path::WorkspacePath;
use super::settings::AggregateSettings;
use crate::core_api::error::{AggdocError, Result};
use crate::plan::Dependency;
use crate::registry::{Module, ModuleId, ProjectGraph};

/// Group recorded for path dependencies that are not workspace members.
const PATH_GROUP: &str = "path";
/// Group recorded for dependencies from the default registry.
const DEFAULT_REGISTRY: &str = "crates-io";

/// A loaded Cargo workspace: the module graph plus aggregation settings.
#[derive(Debug, Clone)]
pub struct Workspace {
	/// Workspace members as a project graph; the root package is the aggregator.
	pub graph: ProjectGraph,
	/// Settings from `[workspace.metadata.aggdoc]`.
	pub settings: AggregateSettings,
}

/// Locate the workspace containing `start` and load it with `cargo metadata --no-deps`.
pub fn load_workspace(start: &Path) -> Result<Workspace> {
	let start = std::path::absolute(start)?;
	let manifest_dir = WorkspacePath::nearest_manifest(&start).ok_or_else(|| {
		AggdocError::Workspace(format!("no Cargo.toml found in '{}' or any parent", start.display()))
	})?;

	let metadata = MetadataCommand::new()
		.manifest_path(manifest_dir.manifest_path()?)
		.no_deps()
		.exec()?;

	let root = WorkspacePath::new(metadata.workspace_root.as_std_path());
	let root_name = root.project_name()?;
	let graph = graph_from_metadata(&metadata, &root_name)?;
	let settings = AggregateSettings::from_workspace_metadata(&metadata.workspace_metadata)?;

	Ok(Workspace { graph, settings })
}

/// Map workspace members to modules.
///
/// Identity is the member directory relative to the workspace root; the package at
/// the root itself is the aggregator and is left out. Modules are ordered by identity.
pub fn graph_from_metadata(metadata: &Metadata, root_name: &str) -> Result<ProjectGraph> {
	let root = metadata.workspace_root.as_std_path();

	let mut members: Vec<(ModuleId, &Package)> = Vec::new();
	for package in metadata.workspace_packages() {
		let dir = package_dir(package)?;
		match module_id_for(root, dir)? {
			Some(id) => members.push((id, package)),
			None => debug!(package = %package.name, "skipping root package"),
		}
	}
	members.sort_by(|(a, _), (b, _)| a.cmp(b));

	let by_name: HashMap<String, ModuleId> = members
		.iter()
		.map(|(id, package)| (package.name.to_string(), id.clone()))
		.collect();

	let mut builder = ProjectGraph::builder(root_name, root);
	for (id, package) in &members {
		builder = builder.module(module_for(id.clone(), package, &by_name)?);
	}
	builder.build()
}

fn package_dir(package: &Package) -> Result<&Path> {
	package
		.manifest_path
		.parent()
		.map(|dir| dir.as_std_path())
		.ok_or_else(|| AggdocError::Workspace(format!("manifest of `{}` has no parent directory", package.name)))
}

/// Identity of a member directory, or `None` for the workspace root itself.
fn module_id_for(root: &Path, dir: &Path) -> Result<Option<ModuleId>> {
	let relative = dir.strip_prefix(root).map_err(|_| {
		AggdocError::Workspace(format!(
			"member '{}' lies outside the workspace root '{}'",
			dir.display(),
			root.display()
		))
	})?;

	let segments: Vec<String> = relative
		.components()
		.filter_map(|component| match component {
			Component::Normal(segment) => Some(segment.to_string_lossy().into_owned()),
			_ => None,
		})
		.collect();
	if segments.is_empty() {
		return Ok(None);
	}
	ModuleId::parse(&segments.join("/")).map(Some)
}

fn module_for(id: ModuleId, package: &Package, members: &HashMap<String, ModuleId>) -> Result<Module> {
	let dir = package_dir(package)?;
	let mut module = Module::new(id, dir);

	let library_targets = package
		.targets
		.iter()
		.filter(|target| target.is_lib() || target.is_proc_macro());
	for target in library_targets {
		if let Some(src_dir) = target.src_path.parent() {
			module = module.with_source_root(src_dir.as_std_path());
		}
	}
	let documentable = module.source_roots().iter().any(|root| contains_sources(root));
	module = module.with_documentable(documentable);

	for dependency in &package.dependencies {
		if dependency.kind != DependencyKind::Normal {
			continue;
		}
		let sibling = dependency
			.path
			.as_ref()
			.and_then(|_| members.get(&dependency.name));
		if let Some(sibling) = sibling {
			module = module.with_reference(sibling.clone());
			continue;
		}

		let group = if dependency.path.is_some() {
			PATH_GROUP.to_string()
		} else {
			dependency
				.registry
				.clone()
				.unwrap_or_else(|| DEFAULT_REGISTRY.to_string())
		};
		module = module.with_dependency(Dependency::new(group, dependency.name.clone(), dependency.req.to_string()));
	}

	Ok(module)
}

/// Whether `dir` contains at least one `.rs` file, at any depth.
///
/// Symlinked directories are not followed.
fn contains_sources(dir: &Path) -> bool {
	let Ok(entries) = fs::read_dir(dir) else {
		return false;
	};
	entries.flatten().any(|entry| match entry.file_type() {
		Ok(kind) if kind.is_dir() => contains_sources(&entry.path()),
		Ok(_) => entry.path().extension().is_some_and(|ext| ext == "rs"),
		Err(_) => false,
	})
}
