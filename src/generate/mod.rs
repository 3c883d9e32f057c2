//! Handoff to the documentation generator.
//!
//! The engine only builds an [`AggregationPlan`]; a [`DocGenerator`] turns it into files.

mod rustdoc;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

pub use self::rustdoc::RustdocJsonGenerator;
use crate::core_api::error::Result;
use crate::plan::AggregationPlan;

/// File name of the serialised plan written into the output root.
pub const PLAN_FILE_NAME: &str = "aggregate-plan.json";

/// What a generator produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
	/// Output directory created for each planned module, in plan order.
	pub module_dirs: Vec<PathBuf>,
	/// Other files written (plan manifest, per-module artifacts).
	pub files: Vec<PathBuf>,
	/// Stale module directories removed before writing.
	pub removed: Vec<PathBuf>,
}

/// Something that can carry out an aggregation plan.
pub trait DocGenerator {
	/// Produce output for every planned module under its assigned directory.
	fn generate(&self, plan: &AggregationPlan) -> Result<GenerationReport>;
}

/// Materialises the output layout: the output root, one directory per planned
/// module, and the plan manifest for downstream tooling.
///
/// Unselected modules never get a directory. With `clean` enabled, directories left
/// by modules that are no longer selected are removed first.
#[derive(Debug, Clone, Default)]
pub struct LayoutWriter {
	clean: bool,
}

impl LayoutWriter {
	/// Writer that leaves existing output alone.
	pub fn new() -> Self {
		Self::default()
	}

	/// Enables or disables removal of stale module directories.
	pub fn with_clean(mut self, clean: bool) -> Self {
		self.clean = clean;
		self
	}

	fn remove_stale(&self, plan: &AggregationPlan) -> Result<Vec<PathBuf>> {
		let root = plan.output_root();
		if !root.is_dir() {
			return Ok(Vec::new());
		}

		let planned: HashSet<PathBuf> = plan
			.modules()
			.iter()
			.map(|module| module.output_subpath.clone())
			.collect();
		let ancestors: HashSet<PathBuf> = planned
			.iter()
			.flat_map(|subpath| subpath.ancestors().skip(1))
			.filter(|ancestor| !ancestor.as_os_str().is_empty())
			.map(Path::to_path_buf)
			.collect();

		let mut removed = Vec::new();
		remove_unplanned(root, Path::new(""), &planned, &ancestors, &mut removed)?;
		Ok(removed)
	}
}

/// Depth-first walk removing directories that are neither a planned module nor
/// an ancestor of one. Planned module directories are never descended into.
fn remove_unplanned(
	root: &Path,
	relative: &Path,
	planned: &HashSet<PathBuf>,
	ancestors: &HashSet<PathBuf>,
	removed: &mut Vec<PathBuf>,
) -> Result<()> {
	for entry in fs::read_dir(root.join(relative))? {
		let entry = entry?;
		if !entry.file_type()?.is_dir() {
			continue;
		}
		let child = relative.join(entry.file_name());
		if planned.contains(&child) {
			continue;
		}
		if ancestors.contains(&child) {
			remove_unplanned(root, &child, planned, ancestors, removed)?;
		} else {
			debug!(dir = %entry.path().display(), "removing stale module output");
			fs::remove_dir_all(entry.path())?;
			removed.push(entry.path());
		}
	}
	Ok(())
}

impl DocGenerator for LayoutWriter {
	fn generate(&self, plan: &AggregationPlan) -> Result<GenerationReport> {
		let mut report = GenerationReport::default();
		if self.clean {
			report.removed = self.remove_stale(plan)?;
		}

		fs::create_dir_all(plan.output_root())?;
		for module in plan.modules() {
			let dir = plan.module_output_dir(module);
			fs::create_dir_all(&dir)?;
			report.module_dirs.push(dir);
		}

		let manifest = plan.output_root().join(PLAN_FILE_NAME);
		fs::write(&manifest, serde_json::to_string_pretty(plan)?)?;
		report.files.push(manifest);

		info!(
			modules = report.module_dirs.len(),
			removed = report.removed.len(),
			root = %plan.output_root().display(),
			"output layout written"
		);
		Ok(report)
	}
}
