//! Cargo workspace adapter: builds the project graph from `cargo metadata`.

/// Manifest discovery helpers.
pub mod path;
mod settings;
mod workspace;

pub use self::path::WorkspacePath;
pub use self::settings::{AggregateSettings, METADATA_KEY};
pub use self::workspace::{Workspace, graph_from_metadata, load_workspace};
