//! Read-only view of the project graph.
//!
//! The registry answers two questions for the rest of the pipeline: which modules
//! exist (in a stable declaration order) and which of them have documentable sources.

mod graph;
mod module;

pub use self::graph::{ProjectGraph, ProjectGraphBuilder};
pub use self::module::{Module, ModuleId};
pub(crate) use self::module::normalize_separators;

/// Access to the modules of a project, in declaration order.
///
/// Implementations must return the same order on every call within one invocation.
pub trait ModuleRegistry {
	/// Every module below the project root, in declaration order.
	fn modules(&self) -> &[Module];

	/// Look up a module by identity.
	fn get(&self, id: &ModuleId) -> Option<&Module>;

	/// Whether the module participates in documentation generation.
	fn is_documentable(&self, module: &Module) -> bool {
		module.is_documentable()
	}

	/// Documentable modules, in declaration order.
	fn documentable(&self) -> Vec<&Module> {
		self.modules()
			.iter()
			.filter(|module| self.is_documentable(module))
			.collect()
	}
}
