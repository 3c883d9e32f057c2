use std::fs;
use std::io::{self, Write};
use std::process::{Command, Stdio};

use rustdoc_json::PackageTarget;
use tracing::{info, warn};

use super::{DocGenerator, GenerationReport, PLAN_FILE_NAME};
use crate::core_api::error::{AggdocError, Result};
use crate::plan::{AggregationPlan, MemberLevel, OutputLevel};

/// Generates rustdoc JSON for each planned module with the nightly toolchain and
/// places it in the module's output directory.
#[derive(Debug, Clone, Default)]
pub struct RustdocJsonGenerator {
	/// Build with `--no-default-features`.
	no_default_features: bool,
	/// Build with `--all-features`.
	all_features: bool,
}

impl RustdocJsonGenerator {
	/// Generator using each member's default features.
	pub fn new() -> Self {
		Self::default()
	}

	/// Disables default features.
	pub fn with_no_default_features(mut self, no_default_features: bool) -> Self {
		self.no_default_features = no_default_features;
		self
	}

	/// Enables all features.
	pub fn with_all_features(mut self, all_features: bool) -> Self {
		self.all_features = all_features;
		self
	}

	/// Whether default features are disabled.
	pub fn no_default_features(&self) -> bool {
		self.no_default_features
	}

	/// Whether all features are enabled.
	pub fn all_features(&self) -> bool {
		self.all_features
	}
}

/// Whether `rustup` is on the PATH; decides if the nightly toolchain is requested explicitly.
fn is_rustup_available() -> bool {
	Command::new("rustup")
		.arg("--version")
		.stderr(Stdio::null())
		.stdout(Stdio::null())
		.status()
		.map(|status| status.success())
		.unwrap_or(false)
}

impl DocGenerator for RustdocJsonGenerator {
	fn generate(&self, plan: &AggregationPlan) -> Result<GenerationReport> {
		let mut report = GenerationReport::default();
		fs::create_dir_all(plan.output_root())?;

		let options = plan.options();
		let private_items = options.member_level == MemberLevel::Private;
		let silent = options.output_level == OutputLevel::Quiet;
		let use_rustup = is_rustup_available();

		for module in plan.modules() {
			let out_dir = plan.module_output_dir(module);
			fs::create_dir_all(&out_dir)?;

			let mut captured_stdout = Vec::new();
			let mut captured_stderr = Vec::new();

			let mut builder = rustdoc_json::Builder::default();
			if use_rustup {
				builder = builder.toolchain("nightly");
			}

			let build_result = builder
				.manifest_path(module.dir.join("Cargo.toml"))
				.package_target(PackageTarget::Lib)
				.document_private_items(private_items)
				.no_default_features(self.no_default_features)
				.all_features(self.all_features)
				.quiet(silent)
				.silent(false)
				.build_with_captured_output(&mut captured_stdout, &mut captured_stderr);

			if !silent {
				// Best-effort output mirroring; ignore write failures.
				let _ = io::stdout().write_all(&captured_stdout);
				let _ = io::stderr().write_all(&captured_stderr);
			}

			let json_path = build_result.map_err(|err| {
				let stderr = String::from_utf8_lossy(&captured_stderr);
				warn!(module = %module.id, "rustdoc failed");
				AggdocError::Generate {
					module: module.id.to_string(),
					message: format!("{err}\n{}", stderr.trim()),
				}
			})?;

			let file_name = json_path
				.file_name()
				.map(|name| name.to_os_string())
				.unwrap_or_else(|| "api.json".into());
			let target = out_dir.join(file_name);
			fs::copy(&json_path, &target)?;
			info!(module = %module.id, file = %target.display(), "rustdoc JSON written");

			report.module_dirs.push(out_dir);
			report.files.push(target);
		}

		let manifest = plan.output_root().join(PLAN_FILE_NAME);
		fs::write(&manifest, serde_json::to_string_pretty(plan)?)?;
		report.files.push(manifest);

		Ok(report)
	}
}
