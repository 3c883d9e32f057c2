//! Integration tests loading a real Cargo workspace through `cargo metadata`.

use std::fs;
use std::path::Path;

use aggdoc::cargo_utils::load_workspace;
use aggdoc::generate::{DocGenerator, LayoutWriter};
use aggdoc::{Aggregator, ModuleId, ModuleRegistry};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn write(path: &Path, content: &str) {
	if let Some(parent) = path.parent() {
		fs::create_dir_all(parent).expect("create parent dir");
	}
	fs::write(path, content).expect("write fixture file");
}

fn lib_member(root: &Path, dir: &str, name: &str, extra: &str) {
	write(
		&root.join(dir).join("Cargo.toml"),
		&format!(
			r#"
[package]
name = "{name}"
version = "0.1.0"
edition = "2021"

[dependencies]
{extra}
"#
		),
	);
	// Every library declares the same type name.
	write(&root.join(dir).join("src/lib.rs"), "pub struct Widget;\n");
}

/// Workspace `demo-build` with three libraries, one nested, and a binary-only member.
fn write_workspace_fixture(metadata: &str) -> TempDir {
	let temp_dir = TempDir::new().expect("tempdir");
	let root = temp_dir.path().join("demo-build");

	write(
		&root.join("Cargo.toml"),
		&format!(
			r#"
[workspace]
resolver = "2"
members = ["module1", "module2", "group/module3", "test"]
{metadata}
"#
		),
	);

	lib_member(&root, "module1", "module1", "");
	lib_member(&root, "module2", "module2", "");
	lib_member(
		&root,
		"group/module3",
		"module3",
		r#"module1 = { path = "../../module1" }
module2 = { path = "../../module2" }"#,
	);

	write(
		&root.join("test/Cargo.toml"),
		r#"
[package]
name = "fixture-test"
version = "0.1.0"
edition = "2021"
"#,
	);
	write(&root.join("test/src/main.rs"), "fn main() {}\n");

	temp_dir
}

fn ids<'a>(ids: impl IntoIterator<Item = &'a ModuleId>) -> Vec<String> {
	ids.into_iter().map(ToString::to_string).collect()
}

#[test]
fn members_become_modules_keyed_by_directory() -> aggdoc::Result<()> {
	let temp_dir = write_workspace_fixture("");
	let root = temp_dir.path().join("demo-build");

	let workspace = load_workspace(&root.join("module1/src"))?;
	let graph = &workspace.graph;

	assert_eq!(graph.root_name(), "demo-build");
	assert_eq!(
		ids(graph.modules().iter().map(|m| m.id())),
		["group/module3", "module1", "module2", "test"]
	);

	let documentable: Vec<String> = ids(graph.documentable().into_iter().map(|m| m.id()));
	assert_eq!(documentable, ["group/module3", "module1", "module2"]);

	let module3 = graph
		.get(&ModuleId::parse("group/module3")?)
		.expect("module3 is loaded");
	assert_eq!(ids(module3.references()), ["module1", "module2"]);
	assert!(module3.dependencies().is_empty());
	Ok(())
}

#[test]
fn workspace_metadata_configures_selection_and_title() -> aggdoc::Result<()> {
	let temp_dir = write_workspace_fixture(
		r#"
[workspace.metadata.aggdoc]
exclude = ["module2"]
title = "Demo Reference"
output-dir = "target/api"
"#,
	);
	let root = temp_dir.path().join("demo-build");

	let workspace = load_workspace(&root)?;
	let plan = Aggregator::from_settings(&workspace.settings)?.plan(&workspace.graph)?;

	assert_eq!(ids(plan.modules().iter().map(|m| &m.id)), ["group/module3", "module1"]);
	assert_eq!(ids(plan.module_references()), ["module2"]);
	assert_eq!(plan.options().doc_title, "Demo Reference");

	LayoutWriter::new().generate(&plan)?;
	let out = workspace.graph.root_dir().join("target/api");
	assert!(out.join("group/module3").is_dir());
	assert!(out.join("module1").is_dir());
	assert!(!out.join("module2").exists());
	assert!(!out.join("test").exists());
	Ok(())
}

#[test]
fn default_title_comes_from_the_workspace_directory() -> aggdoc::Result<()> {
	let temp_dir = write_workspace_fixture("");
	let workspace = load_workspace(&temp_dir.path().join("demo-build"))?;

	let plan = Aggregator::new().with_output_root("out").plan(&workspace.graph)?;
	assert_eq!(plan.options().doc_title, "Demo API");
	Ok(())
}
