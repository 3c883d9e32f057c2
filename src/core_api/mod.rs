//! High-level aggregation API.
//!
//! [`Aggregator`] wires the pipeline together: registry, selection policy, aggregation
//! planner and output layout, then hands the finished plan to a [`DocGenerator`].
//! It is UI-agnostic and can be driven by the CLI or any other frontend.

/// Error helpers for the core API.
pub mod error;
/// Wildcard patterns for exclusion rules.
pub mod pattern;

use std::path::PathBuf;

use tracing::debug;

pub use self::error::{AggdocError, Result};
use crate::cargo_utils::AggregateSettings;
use crate::generate::{DocGenerator, GenerationReport};
use crate::layout::OutputLayout;
use crate::plan::options::sync_stylesheet;
use crate::plan::{AggregationPlan, DocOptions, MemberLevel, OutputLevel, plan};
use crate::registry::ProjectGraph;
use crate::selection::{SelectionConfig, select};

/// Aggregator combines the documentation of selected modules into one output tree,
/// with each module's pages under a directory named after its identity.
///
/// Planning is all-or-nothing: configuration errors surface before anything is
/// handed to the generator.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
	/// Inclusions and exclusions.
	selection: SelectionConfig,

	/// Output root override; relative paths are resolved against the project root.
	output_root: Option<PathBuf>,

	/// Title override; defaults to the title derived from the project name.
	title: Option<String>,

	/// Member level override.
	member_level: Option<MemberLevel>,

	/// Whether the generator should report progress.
	verbose: bool,
}

impl Aggregator {
	/// Creates an aggregator selecting every documentable module with conventional options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates an aggregator configured from workspace settings.
	pub fn from_settings(settings: &AggregateSettings) -> Result<Self> {
		let mut aggregator = Self::new().with_selection(settings.selection_config()?);
		aggregator.output_root = settings.output_dir.clone();
		aggregator.title = settings.title.clone();
		Ok(aggregator)
	}

	/// Replaces the selection configuration.
	pub fn with_selection(mut self, selection: SelectionConfig) -> Self {
		self.selection = selection;
		self
	}

	/// Sets the combined output root.
	pub fn with_output_root(mut self, root: impl Into<PathBuf>) -> Self {
		self.output_root = Some(root.into());
		self
	}

	/// Overrides the documentation title.
	pub fn with_title(mut self, title: impl Into<String>) -> Self {
		self.title = Some(title.into());
		self
	}

	/// Overrides the lowest documented member visibility.
	pub fn with_member_level(mut self, level: MemberLevel) -> Self {
		self.member_level = Some(level);
		self
	}

	/// Enables or disables verbose generator output.
	pub fn with_verbose(mut self, verbose: bool) -> Self {
		self.verbose = verbose;
		self
	}

	/// Returns the selection configuration.
	pub fn selection(&self) -> &SelectionConfig {
		&self.selection
	}

	/// Output layout for `graph`.
	pub fn layout_for(&self, graph: &ProjectGraph) -> OutputLayout {
		match &self.output_root {
			Some(root) => OutputLayout::new(graph.root_dir().join(root)),
			None => OutputLayout::for_project(graph.root_dir()),
		}
	}

	/// Shared documentation options for `graph`.
	pub fn options_for(&self, graph: &ProjectGraph) -> DocOptions {
		let mut options = DocOptions::conventions(graph.root_name());
		if let Some(title) = &self.title {
			options = options.with_title(title.clone());
		}
		if let Some(level) = self.member_level {
			options = options.with_member_level(level);
		}
		if self.verbose {
			options = options.with_output_level(OutputLevel::Verbose);
		}
		options
	}

	/// Select modules and build the aggregation plan.
	pub fn plan(&self, graph: &ProjectGraph) -> Result<AggregationPlan> {
		let selected = select(graph, &self.selection)?;
		debug!(
			selected = selected.len(),
			available = graph.len(),
			"modules selected"
		);
		plan(&selected, &self.layout_for(graph), self.options_for(graph))
	}

	/// Plan and hand the result to `generator`.
	pub fn run(&self, graph: &ProjectGraph, generator: &dyn DocGenerator) -> Result<GenerationReport> {
		let plan = self.plan(graph)?;
		self.generate(graph, &plan, generator)
	}

	/// Sync the shared stylesheet into the project, then hand `plan` to `generator`.
	pub fn generate(
		&self,
		graph: &ProjectGraph,
		plan: &AggregationPlan,
		generator: &dyn DocGenerator,
	) -> Result<GenerationReport> {
		let stylesheet = sync_stylesheet(graph.root_dir())?;
		debug!(path = %stylesheet.display(), "stylesheet synced");
		generator.generate(plan)
	}
}
