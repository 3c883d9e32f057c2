//! Shared documentation options and the conventions used to default them.

use std::fs;
use std::path::{Path, PathBuf};

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::core_api::error::Result;

/// Stylesheet location, relative to the aggregator directory.
pub const STYLESHEET_FILE_NAME: &str = "target/aggdoc-conventions/stylesheet.css";

const STYLESHEET: &str = include_str!("../../assets/stylesheet.css");

bitflags! {
	/// On/off switches passed to the documentation generator.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
	pub struct DocFlags: u32 {
		/// Emit author information.
		const AUTHOR = 1 << 0;
		/// Split the index into one page per letter.
		const SPLIT_INDEX = 1 << 1;
		/// Generate "uses of" pages.
		const USE = 1 << 2;
	}
}

impl Default for DocFlags {
	fn default() -> Self {
		Self::AUTHOR | Self::SPLIT_INDEX | Self::USE
	}
}

/// Lowest visibility of members that are documented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberLevel {
	/// Public members only.
	Public,
	/// Public and protected members.
	#[default]
	Protected,
	/// Everything except private members.
	Package,
	/// All members.
	Private,
}

/// How chatty the generator should be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputLevel {
	/// Only warnings and errors.
	#[default]
	Quiet,
	/// Full progress output.
	Verbose,
}

/// One set of options shared by every module in the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocOptions {
	/// Title of the combined documentation.
	pub doc_title: String,
	/// Browser window title.
	pub window_title: String,
	/// Source encoding.
	pub encoding: String,
	/// Member visibility threshold.
	pub member_level: MemberLevel,
	/// Generator verbosity.
	pub output_level: OutputLevel,
	/// Boolean switches.
	pub flags: DocFlags,
	/// Stylesheet path relative to the aggregator directory.
	pub stylesheet: PathBuf,
}

impl DocOptions {
	/// Conventional options for a project named `root_name`.
	pub fn conventions(root_name: &str) -> Self {
		let title = title_for(root_name);
		Self {
			doc_title: title.clone(),
			window_title: title,
			encoding: "UTF-8".to_string(),
			member_level: MemberLevel::default(),
			output_level: OutputLevel::default(),
			flags: DocFlags::default(),
			stylesheet: PathBuf::from(STYLESHEET_FILE_NAME),
		}
	}

	/// Override both titles.
	pub fn with_title(mut self, title: impl Into<String>) -> Self {
		self.doc_title = title.into();
		self.window_title = self.doc_title.clone();
		self
	}

	/// Override the member level.
	pub fn with_member_level(mut self, level: MemberLevel) -> Self {
		self.member_level = level;
		self
	}

	/// Override the output level.
	pub fn with_output_level(mut self, level: OutputLevel) -> Self {
		self.output_level = level;
		self
	}
}

/// Derive the documentation title from the root project name.
///
/// A trailing `-build` is dropped, dashes become spaces, each word is capitalised
/// and ` API` is appended: `spring-security-build` becomes `Spring Security API`.
pub fn title_for(root_name: &str) -> String {
	let base = root_name.strip_suffix("-build").unwrap_or(root_name);
	let mut title = String::with_capacity(base.len() + 4);
	let mut capitalize_next = true;
	for ch in base.chars() {
		let ch = if ch == '-' { ' ' } else { ch };
		if capitalize_next {
			title.extend(ch.to_uppercase());
		} else {
			title.push(ch);
		}
		capitalize_next = ch == ' ';
	}
	title.push_str(" API");
	title
}

/// Write the bundled stylesheet below `project_dir`, returning its path.
pub fn sync_stylesheet(project_dir: &Path) -> Result<PathBuf> {
	let path = project_dir.join(STYLESHEET_FILE_NAME);
	if let Some(parent) = path.parent() {
		fs::create_dir_all(parent)?;
	}
	fs::write(&path, STYLESHEET)?;
	Ok(path)
}
