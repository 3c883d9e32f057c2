use std::path::{Path, PathBuf};

use crate::core_api::error::{AggdocError, Result};

/// A directory expected to hold a `Cargo.toml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspacePath(PathBuf);

impl WorkspacePath {
	/// Wrap a directory.
	pub fn new(dir: impl Into<PathBuf>) -> Self {
		Self(dir.into())
	}

	/// Return the directory.
	pub fn as_path(&self) -> &Path {
		&self.0
	}

	/// Compute the absolute `Cargo.toml` path for this directory.
	pub fn manifest_path(&self) -> Result<PathBuf> {
		let manifest_path = self.0.join("Cargo.toml");
		std::path::absolute(&manifest_path).map_err(|err| {
			AggdocError::Workspace(format!(
				"failed to resolve manifest path for '{}': {err}",
				manifest_path.display()
			))
		})
	}

	/// Return whether this directory includes a `Cargo.toml`.
	pub fn has_manifest(&self) -> bool {
		self.0.join("Cargo.toml").exists()
	}

	fn read_manifest(&self) -> Result<cargo_toml::Manifest> {
		cargo_toml::Manifest::from_path(self.manifest_path()?)
			.map_err(|err| AggdocError::ManifestParse(err.to_string()))
	}

	/// Identify if the path is a workspace manifest without a package section.
	pub fn is_virtual_workspace(&self) -> Result<bool> {
		if !self.has_manifest() {
			return Ok(false);
		}
		let manifest = self.read_manifest()?;
		Ok(manifest.workspace.is_some() && manifest.package.is_none())
	}

	/// Name of the project rooted here: the root package name, or the directory
	/// name for a virtual workspace.
	pub fn project_name(&self) -> Result<String> {
		let package_name = if self.has_manifest() {
			self.read_manifest()?.package.map(|package| package.name)
		} else {
			None
		};
		if let Some(name) = package_name {
			return Ok(name);
		}
		let absolute = std::path::absolute(&self.0)?;
		absolute
			.file_name()
			.map(|name| name.to_string_lossy().into_owned())
			.ok_or_else(|| AggdocError::Workspace(format!("'{}' has no directory name", absolute.display())))
	}

	/// Walk upwards from `start_dir` to locate the closest `Cargo.toml`.
	pub fn nearest_manifest(start_dir: &Path) -> Option<Self> {
		let mut current_dir = start_dir.to_path_buf();

		loop {
			if current_dir.join("Cargo.toml").exists() {
				return Some(Self(current_dir));
			}
			if !current_dir.pop() {
				break;
			}
		}
		None
	}
}

#[cfg(test)]
mod tests {
	use std::fs;

	use tempfile::tempdir;

	use super::*;

	#[test]
	fn test_is_virtual_workspace() -> Result<()> {
		let temp_dir = tempdir()?;
		let workspace = WorkspacePath::new(temp_dir.path());
		let manifest_path = workspace.manifest_path()?;

		fs::write(
			&manifest_path,
			r#"
            [workspace]
            members = ["member1", "member2"]
        "#,
		)?;
		assert!(workspace.is_virtual_workspace()?);

		fs::write(
			&manifest_path,
			r#"
[package]
name = "test-crate"
version = "0.1.0"
"#,
		)?;
		assert!(!workspace.is_virtual_workspace()?);
		Ok(())
	}

	#[test]
	fn test_project_name_prefers_root_package() -> Result<()> {
		let temp_dir = tempdir()?;
		let root = temp_dir.path().join("spring-security-build");
		fs::create_dir_all(&root)?;
		let workspace = WorkspacePath::new(&root);

		fs::write(root.join("Cargo.toml"), "[workspace]\nmembers = []\n")?;
		assert_eq!(workspace.project_name()?, "spring-security-build");

		fs::write(
			root.join("Cargo.toml"),
			"[package]\nname = \"aggregator\"\nversion = \"0.1.0\"\n",
		)?;
		assert_eq!(workspace.project_name()?, "aggregator");
		Ok(())
	}

	#[test]
	fn test_nearest_manifest_walks_up() -> Result<()> {
		let temp_dir = tempdir()?;
		let nested = temp_dir.path().join("module1/src/deep");
		fs::create_dir_all(&nested)?;
		fs::write(temp_dir.path().join("Cargo.toml"), "[workspace]\n")?;

		let found = WorkspacePath::nearest_manifest(&nested).map(|path| path.as_path().to_path_buf());
		assert_eq!(found, Some(temp_dir.path().to_path_buf()));
		Ok(())
	}
}
