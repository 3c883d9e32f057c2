use std::path::PathBuf;

use thiserror::Error;

/// Aggregate errors produced by the aggdoc API.
#[derive(Debug, Error)]
pub enum AggdocError {
	/// A module identity could not be parsed.
	#[error("invalid module identity `{identity}`: {reason}")]
	InvalidModuleId {
		/// The rejected identity text.
		identity: String,
		/// Why the identity was rejected.
		reason: &'static str,
	},
	/// The project graph declares the same module identity twice.
	#[error("module `{0}` is declared more than once in the project graph")]
	DuplicateModule(String),
	/// A module references a sibling that is not part of the project graph.
	#[error("module `{module}` references unknown module `{reference}`")]
	UnknownReference {
		/// The module declaring the reference.
		module: String,
		/// The unresolved reference.
		reference: String,
	},
	/// Explicit inclusions name modules absent from the registry.
	#[error("unknown module(s) in inclusion list: {}", .0.join(", "))]
	UnknownModule(Vec<String>),
	/// An exclusion pattern could not be compiled.
	#[error("invalid exclusion pattern `{pattern}`: {source}")]
	InvalidPattern {
		/// The pattern as written by the user.
		pattern: String,
		/// The regex compilation failure.
		#[source]
		source: regex::Error,
	},
	/// A dependency coordinate is not of the form `group:artifact:version`.
	#[error("invalid dependency coordinate `{0}` (expected `group:artifact:version`)")]
	InvalidCoordinate(String),
	/// Two planned modules would share an output directory.
	#[error("modules `{first}` and `{second}` map to the same output directory `{}`", .path.display())]
	LayoutCollision {
		/// First module mapped to the path.
		first: String,
		/// Second module mapped to the path.
		second: String,
		/// The contested relative path.
		path: PathBuf,
	},
	/// Failed to locate or read the workspace.
	#[error("{0}")]
	Workspace(String),
	/// Failed to parse a Cargo manifest.
	#[error("failed to parse manifest: {0}")]
	ManifestParse(String),
	/// `cargo metadata` failed.
	#[error("failed to get cargo metadata: {0}")]
	Metadata(#[from] cargo_metadata::Error),
	/// The external documentation generator failed.
	#[error("documentation generation failed for `{module}`: {message}")]
	Generate {
		/// The module being documented.
		module: String,
		/// Generator failure description.
		message: String,
	},
	/// Failed to encode or decode JSON.
	#[error(transparent)]
	Serialization(#[from] serde_json::Error),
	/// Failed to perform IO operations.
	#[error(transparent)]
	Io(#[from] std::io::Error),
}

/// Result type returned by the aggdoc library.
pub type Result<T> = std::result::Result<T, AggdocError>;
