//! CLI entrypoint.

use std::error::Error;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use aggdoc::cargo_utils::{Workspace, load_workspace};
use aggdoc::generate::{DocGenerator, LayoutWriter, RustdocJsonGenerator};
use aggdoc::plan::MemberLevel;
use aggdoc::{AggregationPlan, Aggregator, ModuleRegistry, map_path};
use clap::{Args, Parser, Subcommand, ValueEnum};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "AGGDOC_LOG";

#[derive(Args, Clone)]
struct CommonArgs {
	/// Workspace directory (any directory inside the workspace works)
	#[arg(default_value = "./")]
	target: PathBuf,

	/// Only document these modules (comma-separated identities)
	#[arg(short = 'i', long, value_delimiter = ',')]
	include: Option<Vec<String>>,

	/// Exclude modules: identities, `group/**` subtrees or `*` patterns
	#[arg(short = 'e', long, value_delimiter = ',')]
	exclude: Vec<String>,

	/// Output root, relative to the workspace root. Takes precedence over `output-dir`
	/// in `[workspace.metadata.aggdoc]`, which takes precedence over AGGDOC_OUTPUT_DIR
	#[arg(short = 'o', long)]
	output_dir: Option<PathBuf>,

	/// Documentation title
	#[arg(long)]
	title: Option<String>,

	/// Lowest visibility of documented members
	#[arg(long, value_enum)]
	member_level: Option<MemberLevelArg>,

	/// Enable verbose mode, showing debug logs and generator output
	#[arg(short = 'v', long, default_value_t = false)]
	verbose: bool,

	/// Disable ANSI colors in CLI output
	#[arg(long, default_value_t = false)]
	no_color: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MemberLevelArg {
	Public,
	Protected,
	Package,
	Private,
}

impl From<MemberLevelArg> for MemberLevel {
	fn from(level: MemberLevelArg) -> Self {
		match level {
			MemberLevelArg::Public => Self::Public,
			MemberLevelArg::Protected => Self::Protected,
			MemberLevelArg::Package => Self::Package,
			MemberLevelArg::Private => Self::Private,
		}
	}
}

#[derive(Args, Clone)]
struct PlanArgs {
	#[command(flatten)]
	common: CommonArgs,

	/// Print the plan as JSON
	#[arg(long, default_value_t = false)]
	json: bool,
}

#[derive(Args, Clone)]
struct BuildArgs {
	#[command(flatten)]
	common: CommonArgs,

	/// Remove output directories of modules that are no longer selected
	#[arg(long, default_value_t = false)]
	clean: bool,

	/// Generate rustdoc JSON per module (requires a nightly toolchain)
	#[arg(long, default_value_t = false)]
	rustdoc: bool,

	/// Disable default features when generating rustdoc JSON
	#[arg(long, default_value_t = false, requires = "rustdoc")]
	no_default_features: bool,

	/// Enable all features when generating rustdoc JSON
	#[arg(long, default_value_t = false, requires = "rustdoc")]
	all_features: bool,
}

#[derive(Subcommand, Clone)]
enum Command {
	/// List workspace modules and whether they are documentable.
	List(CommonArgs),
	/// Print the aggregation plan without writing anything.
	Plan(PlanArgs),
	/// Plan and write the aggregated output layout.
	Build(BuildArgs),
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Parsed command-line options for the aggdoc CLI.
struct Cli {
	#[command(subcommand)]
	command: Command,
}

fn init_logging(verbose: bool) {
	let filter = EnvFilter::try_from_env(LOG_ENV)
		.unwrap_or_else(|_| EnvFilter::new(if verbose { "aggdoc=debug" } else { "warn" }));
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(false)
		.init();
}

fn should_color_output(common: &CommonArgs) -> bool {
	if common.no_color {
		return false;
	}
	if std::env::var_os("NO_COLOR").is_some() {
		return false;
	}
	if std::env::var("TERM").ok().as_deref() == Some("dumb") {
		return false;
	}
	std::io::stdout().is_terminal()
}

/// Load the workspace and build an aggregator from its settings plus CLI overrides.
fn prepare(common: &CommonArgs) -> Result<(Workspace, Aggregator), Box<dyn Error>> {
	let workspace = load_workspace(&common.target)?;
	let settings = workspace
		.settings
		.clone()
		.merge_overrides(common.include.clone(), common.exclude.clone());

	let mut aggregator = Aggregator::from_settings(&settings)?.with_verbose(common.verbose);
	if let Some(dir) = &common.output_dir {
		aggregator = aggregator.with_output_root(dir);
	}
	if let Some(title) = &common.title {
		aggregator = aggregator.with_title(title);
	}
	if let Some(level) = common.member_level {
		aggregator = aggregator.with_member_level(level.into());
	}
	Ok((workspace, aggregator))
}

/// Print every module with its documentable flag and output directory.
fn run_list(common: &CommonArgs) -> Result<(), Box<dyn Error>> {
	let (workspace, _) = prepare(common)?;
	let graph = &workspace.graph;
	if graph.is_empty() {
		println!("No modules found.");
		return Ok(());
	}

	let color = should_color_output(common);
	let id_width = graph
		.modules()
		.iter()
		.map(|module| module.id().as_str().len())
		.max()
		.unwrap_or(0);

	let mut buffer = String::new();
	for module in graph.modules() {
		let documentable = graph.is_documentable(module);
		let status = match (documentable, color) {
			(true, true) => "documentable".green().to_string(),
			(true, false) => "documentable".to_string(),
			(false, true) => "skipped     ".dimmed().to_string(),
			(false, false) => "skipped     ".to_string(),
		};
		let output = if documentable {
			map_path(module.id()).display().to_string()
		} else {
			"-".to_string()
		};
		buffer.push_str(&format!(
			"{id:<id_width$} {status} {output}\n",
			id = module.id().as_str()
		));
	}
	print!("{buffer}");
	Ok(())
}

fn print_plan(plan: &AggregationPlan, color: bool) {
	let title = &plan.options().doc_title;
	if color {
		println!("{}", title.bold());
	} else {
		println!("{title}");
	}
	println!("output: {}", plan.output_root().display());

	if plan.is_empty() {
		println!("No modules selected.");
		return;
	}

	println!("modules:");
	for module in plan.modules() {
		let id = if color {
			module.id.as_str().bright_green().to_string()
		} else {
			module.id.as_str().to_string()
		};
		println!("  {id} -> {}", module.output_subpath.display());
	}
	if !plan.classpath().is_empty() {
		println!("classpath:");
		for dependency in plan.classpath() {
			println!("  {dependency}");
		}
	}
	if !plan.module_references().is_empty() {
		println!("referenced modules (not documented):");
		for reference in plan.module_references() {
			println!("  {reference}");
		}
	}
}

fn run_plan(args: &PlanArgs) -> Result<(), Box<dyn Error>> {
	let (workspace, aggregator) = prepare(&args.common)?;
	let plan = aggregator.plan(&workspace.graph)?;
	if args.json {
		println!("{}", serde_json::to_string_pretty(&plan)?);
	} else {
		print_plan(&plan, should_color_output(&args.common));
	}
	Ok(())
}

fn rustdoc_generator(args: &BuildArgs) -> RustdocJsonGenerator {
	RustdocJsonGenerator::new()
		.with_no_default_features(args.no_default_features)
		.with_all_features(args.all_features)
}

fn run_build(args: &BuildArgs) -> Result<(), Box<dyn Error>> {
	let (workspace, aggregator) = prepare(&args.common)?;
	let plan = aggregator.plan(&workspace.graph)?;

	let graph = &workspace.graph;
	let report = if args.rustdoc {
		if args.clean {
			LayoutWriter::new().with_clean(true).generate(&plan)?;
		}
		aggregator.generate(graph, &plan, &rustdoc_generator(args))?
	} else {
		aggregator.generate(graph, &plan, &LayoutWriter::new().with_clean(args.clean))?
	};

	for dir in &report.module_dirs {
		println!("{}", dir.display());
	}
	if report.module_dirs.is_empty() {
		eprintln!("Warning: no modules selected; only the plan manifest was written.");
	}
	Ok(())
}

fn main() {
	let cli = Cli::parse();
	let verbose = match &cli.command {
		Command::List(common) => common.verbose,
		Command::Plan(args) => args.common.verbose,
		Command::Build(args) => args.common.verbose,
	};
	init_logging(verbose);

	let result = match &cli.command {
		Command::List(common) => run_list(common),
		Command::Plan(args) => run_plan(args),
		Command::Build(args) => run_build(args),
	};

	if let Err(e) = result {
		eprintln!("{e}");
		process::exit(1);
	}
}
