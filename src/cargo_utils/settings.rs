use std::path::PathBuf;

use serde::Deserialize;

use crate::core_api::error::Result;
use crate::selection::SelectionConfig;

/// Key of the settings table below `[workspace.metadata]`.
pub const METADATA_KEY: &str = "aggdoc";

/// Aggregation settings read from `[workspace.metadata.aggdoc]`.
///
/// ```toml
/// [workspace.metadata.aggdoc]
/// include = ["module1", "group/module3"]
/// exclude = ["module2", "internal/**"]
/// title = "My Project API"
/// output-dir = "target/api"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct AggregateSettings {
	/// Explicit inclusion list; absent means every documentable member.
	pub include: Option<Vec<String>>,
	/// Exclusion rules.
	pub exclude: Vec<String>,
	/// Documentation title override.
	pub title: Option<String>,
	/// Output root override, relative to the workspace root.
	pub output_dir: Option<PathBuf>,
}

impl AggregateSettings {
	/// Extract settings from the workspace metadata value; missing table means defaults.
	pub fn from_workspace_metadata(metadata: &serde_json::Value) -> Result<Self> {
		match metadata.get(METADATA_KEY) {
			Some(value) => Ok(serde_json::from_value(value.clone())?),
			None => Ok(Self::default()),
		}
	}

	/// Apply command-line overrides: a present inclusion list replaces the configured
	/// one; exclusions are added to the configured ones.
	pub fn merge_overrides(mut self, include: Option<Vec<String>>, exclude: Vec<String>) -> Self {
		if include.is_some() {
			self.include = include;
		}
		self.exclude.extend(exclude);
		self
	}

	/// Parse the inclusion and exclusion lists.
	pub fn selection_config(&self) -> Result<SelectionConfig> {
		SelectionConfig::parse(self.include.as_ref(), &self.exclude)
	}
}
