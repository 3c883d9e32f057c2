//! Selection policy: which modules contribute documentation.
//!
//! Inclusions are resolved first, exclusions are applied afterwards, and the result
//! keeps registry order. A module named in both lists is excluded.

use std::fmt;

use regex::Regex;
use tracing::debug;

use crate::core_api::error::{AggdocError, Result};
use crate::core_api::pattern::{compile_wildcard, is_pattern};
use crate::registry::{Module, ModuleId, ModuleRegistry, normalize_separators};

/// A rule removing modules from the selection.
#[derive(Debug, Clone)]
pub enum ExclusionRule {
	/// Remove exactly this module.
	Exact(ModuleId),
	/// Remove this module and every module nested below it (written `group/**`).
	Subtree(ModuleId),
	/// Remove every module whose identity matches the wildcard pattern.
	Pattern {
		/// The pattern as written.
		source: String,
		/// Compiled, anchored matcher.
		regex: Regex,
	},
}

impl ExclusionRule {
	/// Parse an exclusion as written in configuration or on the command line.
	///
	/// Host-style colon paths are accepted in every form, so `:group:**` is `group/**`.
	pub fn parse(raw: &str) -> Result<Self> {
		let normalized = raw
			.split('|')
			.map(normalize_separators)
			.collect::<Vec<_>>()
			.join("|");
		if let Some(base) = normalized.strip_suffix("/**") {
			if !is_pattern(base) {
				return Ok(Self::Subtree(ModuleId::parse(base)?));
			}
		}
		if is_pattern(&normalized) {
			let regex = compile_wildcard(&normalized)?;
			return Ok(Self::Pattern {
				source: normalized,
				regex,
			});
		}
		Ok(Self::Exact(ModuleId::parse(&normalized)?))
	}

	/// Whether this rule removes `id`.
	pub fn matches(&self, id: &ModuleId) -> bool {
		match self {
			Self::Exact(excluded) => excluded == id,
			Self::Subtree(root) => root == id || id.is_descendant_of(root),
			Self::Pattern { regex, .. } => regex.is_match(id.as_str()),
		}
	}
}

impl fmt::Display for ExclusionRule {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Exact(id) => write!(f, "{id}"),
			Self::Subtree(id) => write!(f, "{id}/**"),
			Self::Pattern { source, .. } => f.write_str(source),
		}
	}
}

/// User-supplied refinement of the default selection.
///
/// `inclusions: None` selects every documentable module; `Some(vec![])` is an
/// explicit empty list and selects nothing.
#[derive(Debug, Clone, Default)]
pub struct SelectionConfig {
	/// Explicit inclusion list, if any.
	pub inclusions: Option<Vec<ModuleId>>,
	/// Rules subtracted after inclusions are resolved.
	pub exclusions: Vec<ExclusionRule>,
}

impl SelectionConfig {
	/// Create an empty configuration (all documentable modules).
	pub fn new() -> Self {
		Self::default()
	}

	/// Build a configuration from raw identity strings.
	pub fn parse<I, E, S, T>(inclusions: Option<I>, exclusions: E) -> Result<Self>
	where
		I: IntoIterator<Item = S>,
		E: IntoIterator<Item = T>,
		S: AsRef<str>,
		T: AsRef<str>,
	{
		let inclusions = inclusions
			.map(|names| {
				names
					.into_iter()
					.map(|name| ModuleId::parse(name.as_ref()))
					.collect::<Result<Vec<_>>>()
			})
			.transpose()?;
		let exclusions = exclusions
			.into_iter()
			.map(|rule| ExclusionRule::parse(rule.as_ref()))
			.collect::<Result<Vec<_>>>()?;
		Ok(Self {
			inclusions,
			exclusions,
		})
	}

	/// Restrict the selection to exactly these modules.
	pub fn with_inclusions(mut self, inclusions: Vec<ModuleId>) -> Self {
		self.inclusions = Some(inclusions);
		self
	}

	/// Add an exclusion rule.
	pub fn with_exclusion(mut self, rule: ExclusionRule) -> Self {
		self.exclusions.push(rule);
		self
	}

	fn is_excluded(&self, id: &ModuleId) -> bool {
		self.exclusions.iter().any(|rule| rule.matches(id))
	}
}

/// Resolve the participating modules, in registry order.
///
/// Fails with [`AggdocError::UnknownModule`] if an inclusion names a module the
/// registry does not know; an empty result is not an error.
pub fn select<'r, R>(registry: &'r R, config: &SelectionConfig) -> Result<Vec<&'r Module>>
where
	R: ModuleRegistry + ?Sized,
{
	if let Some(inclusions) = &config.inclusions {
		let unknown: Vec<String> = inclusions
			.iter()
			.filter(|id| registry.get(id).is_none())
			.map(ToString::to_string)
			.collect();
		if !unknown.is_empty() {
			return Err(AggdocError::UnknownModule(unknown));
		}
		for id in inclusions {
			if let Some(module) = registry.get(id) {
				if !registry.is_documentable(module) {
					debug!(module = %id, "included module has no documentable sources; skipping");
				}
			}
		}
	}

	for rule in &config.exclusions {
		if !registry.modules().iter().any(|module| rule.matches(module.id())) {
			debug!(rule = %rule, "exclusion matches no module");
		}
	}

	let selected: Vec<&Module> = registry
		.modules()
		.iter()
		.filter(|module| registry.is_documentable(module))
		.filter(|module| match &config.inclusions {
			Some(inclusions) => inclusions.contains(module.id()),
			None => true,
		})
		.filter(|module| {
			let excluded = config.is_excluded(module.id());
			if excluded {
				debug!(module = %module.id(), "module excluded");
			}
			!excluded
		})
		.collect();

	Ok(selected)
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::registry::ProjectGraph;

	fn id(raw: &str) -> ModuleId {
		ModuleId::parse(raw).unwrap()
	}

	fn documentable(name: &str) -> Module {
		Module::new(id(name), format!("/ws/{name}"))
			.with_source_root(format!("/ws/{name}/src"))
			.with_documentable(true)
	}

	fn graph() -> ProjectGraph {
		ProjectGraph::builder("root", "/ws")
			.module(documentable("module1"))
			.module(documentable("module2"))
			.module(Module::new(id("test"), "/ws/test"))
			.module(documentable("group/module3"))
			.module(documentable("group/nested/module4"))
			.build()
			.unwrap()
	}

	fn names(modules: &[&Module]) -> Vec<String> {
		modules.iter().map(|m| m.id().to_string()).collect()
	}

	#[test]
	fn test_default_selects_documentable_in_order() -> Result<()> {
		let graph = graph();
		let selected = select(&graph, &SelectionConfig::new())?;
		assert_eq!(
			names(&selected),
			["module1", "module2", "group/module3", "group/nested/module4"]
		);
		Ok(())
	}

	#[test]
	fn test_inclusions_keep_registry_order() -> Result<()> {
		let graph = graph();
		let config = SelectionConfig::parse(Some(["group/module3", "module1"]), Vec::<&str>::new())?;
		assert_eq!(names(&select(&graph, &config)?), ["module1", "group/module3"]);
		Ok(())
	}

	#[test]
	fn test_inclusion_of_undocumentable_module_is_dropped() -> Result<()> {
		let graph = graph();
		let config = SelectionConfig::new().with_inclusions(vec![id("test"), id("module2")]);
		assert_eq!(names(&select(&graph, &config)?), ["module2"]);
		Ok(())
	}

	#[test]
	fn test_unknown_inclusion_is_a_configuration_error() {
		let graph = graph();
		let config = SelectionConfig::new().with_inclusions(vec![id("module1"), id("nope"), id("gone")]);
		match select(&graph, &config) {
			Err(AggdocError::UnknownModule(unknown)) => assert_eq!(unknown, ["nope", "gone"]),
			other => panic!("expected configuration error, got {other:?}"),
		}
	}

	#[test]
	fn test_exclusion_wins_over_inclusion() -> Result<()> {
		let graph = graph();
		let config = SelectionConfig::parse(Some(["module1", "module2"]), ["module2"])?;
		assert_eq!(names(&select(&graph, &config)?), ["module1"]);
		Ok(())
	}

	#[test]
	fn test_subtree_exclusion_removes_descendants() -> Result<()> {
		let graph = graph();
		let config = SelectionConfig::parse(None::<Vec<&str>>, ["group/**"])?;
		assert_eq!(names(&select(&graph, &config)?), ["module1", "module2"]);
		Ok(())
	}

	#[test]
	fn test_pattern_exclusion() -> Result<()> {
		let graph = graph();
		let config = SelectionConfig::parse(None::<Vec<&str>>, ["module*|group/*/module4"])?;
		assert_eq!(names(&select(&graph, &config)?), ["group/module3"]);
		Ok(())
	}

	#[test]
	fn test_unknown_exclusion_is_ignored() -> Result<()> {
		let graph = graph();
		let config = SelectionConfig::parse(None::<Vec<&str>>, ["ghost"])?;
		assert_eq!(select(&graph, &config)?.len(), 4);
		Ok(())
	}

	#[test]
	fn test_explicit_empty_inclusions_select_nothing() -> Result<()> {
		let graph = graph();
		let config = SelectionConfig::new().with_inclusions(Vec::new());
		assert!(select(&graph, &config)?.is_empty());
		Ok(())
	}

	#[test]
	fn test_colon_paths_work_in_every_exclusion_form() -> Result<()> {
		let graph = graph();
		for rule in [":group:module3", ":group:**", ":group:*:module4|:group:module3"] {
			let config = SelectionConfig::parse(None::<Vec<&str>>, [rule, ":group:nested:module4"])?;
			assert_eq!(names(&select(&graph, &config)?), ["module1", "module2"], "rule `{rule}`");
		}
		assert!(matches!(ExclusionRule::parse(":group:**")?, ExclusionRule::Subtree(root) if root == id("group")));
		assert_eq!(ExclusionRule::parse(":group:*")?.to_string(), "group/*");
		Ok(())
	}

	#[test]
	fn test_rule_parsing() -> Result<()> {
		assert!(matches!(ExclusionRule::parse("module2")?, ExclusionRule::Exact(_)));
		assert!(matches!(ExclusionRule::parse("group/**")?, ExclusionRule::Subtree(_)));
		assert!(matches!(ExclusionRule::parse("*/**")?, ExclusionRule::Pattern { .. }));
		assert_eq!(ExclusionRule::parse("group/**")?.to_string(), "group/**");
		Ok(())
	}
}
