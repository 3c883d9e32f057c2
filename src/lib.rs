//! Core library for aggdoc, combining the API documentation of selected workspace
//! modules into one coordinated build.
//!
//! The pipeline is a chain of pure stages over an in-memory project graph:
//! [`registry`] → [`selection`] → [`plan`] → [`layout`]. The resulting
//! [`AggregationPlan`] is handed to a [`generate::DocGenerator`], which does the
//! actual file I/O. Each module's output lives in a directory named after its
//! identity, so identically named items in different modules never collide.

/// Cargo workspace adapter.
pub mod cargo_utils;

/// Core API for aggdoc operations.
pub mod core_api;

/// Handoff to documentation generators.
pub mod generate;

/// Output directory layout.
pub mod layout;

/// Aggregation planning.
pub mod plan;

/// Module registry and project graph.
pub mod registry;

/// Module selection policy.
pub mod selection;

pub use crate::core_api::{AggdocError, Aggregator, Result};
pub use crate::layout::{OutputLayout, map_path};
pub use crate::plan::{AggregationPlan, DocOptions, PlannedModule};
pub use crate::registry::{Module, ModuleId, ModuleRegistry, ProjectGraph};
pub use crate::selection::{ExclusionRule, SelectionConfig, select};
