//! Code graph CLI
//!
//! Builds a code graph either by parsing a JavaScript/TypeScript source tree
//! or from a batch of parse results produced by an external parser, and
//! prints it as a JSON document or Graphviz DOT.
//!
//! ## Usage
//!
//! ```text
//! codegraph scan ./my-project --format dot -o graph.dot
//! codegraph build parsed.json --config codegraph.toml
//! codegraph stats graph.json
//! ```

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use codegraph::{
    BuildReport, CodeGraph, DotOptions, GraphBuilder, GraphBuilderConfig, ResolutionMode,
};
use codegraph_syntax::{Language, ParsedFile, SourceParser};
use std::collections::HashMap;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

mod scanner;

use scanner::FileScanner;

#[derive(Parser)]
#[command(name = "codegraph")]
#[command(about = "Build code graphs from parsed sources", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a source tree with tree-sitter and build its graph
    Scan(ScanArgs),

    /// Build a graph from a JSON array of parse results ("-" for stdin)
    Build(BuildArgs),

    /// Summarize a saved graph document
    Stats(StatsArgs),
}

#[derive(Args)]
struct ScanArgs {
    /// Project root
    #[arg(default_value = ".")]
    path: PathBuf,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args)]
struct BuildArgs {
    /// Parser batch file
    batch: PathBuf,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args)]
struct StatsArgs {
    /// Graph document written by `scan` or `build`
    document: PathBuf,
}

#[derive(Args)]
struct OutputArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Builder configuration (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Bind calls and imports only to what precedes them
    #[arg(long)]
    sequential: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
    Dot,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Scan(args) => run_scan(&args),
        Commands::Build(args) => run_build(&args),
        Commands::Stats(args) => run_stats(&args),
    }
}

fn run_scan(args: &ScanArgs) -> Result<()> {
    let scanner = FileScanner::new(&args.path);
    let mut parsers: HashMap<Language, SourceParser> = HashMap::new();
    let mut batch = Vec::new();

    for path in scanner.scan() {
        let graph_path = scanner.graph_path(&path);
        let language = Language::from_path(&path);

        let source = match fs::read_to_string(&path) {
            Ok(source) => source,
            Err(err) => {
                batch.push(ParsedFile::failed(graph_path, language.as_str(), err.to_string()));
                continue;
            }
        };

        let parser = match parsers.entry(language) {
            std::collections::hash_map::Entry::Occupied(slot) => slot.into_mut(),
            std::collections::hash_map::Entry::Vacant(slot) => slot.insert(
                SourceParser::new(language)
                    .with_context(|| format!("Failed to load {} grammar", language.as_str()))?,
            ),
        };
        batch.push(parser.parse(&graph_path, &source));
    }

    let graph = build(batch, &args.output)?;
    emit(&graph, &args.output)
}

fn run_build(args: &BuildArgs) -> Result<()> {
    let json = if args.batch.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read batch from stdin")?;
        buf
    } else {
        fs::read_to_string(&args.batch)
            .with_context(|| format!("Failed to read {}", args.batch.display()))?
    };

    let batch = ParsedFile::batch_from_json(&json).context("Invalid parser batch")?;
    let graph = build(batch, &args.output)?;
    emit(&graph, &args.output)
}

fn run_stats(args: &StatsArgs) -> Result<()> {
    let json = fs::read_to_string(&args.document)
        .with_context(|| format!("Failed to read {}", args.document.display()))?;
    let graph = CodeGraph::from_json(&json).context("Invalid graph document")?;

    let summary = serde_json::json!({
        "stats": graph.stats(),
        "importCycles": graph.import_cycles(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn load_config(args: &OutputArgs) -> Result<GraphBuilderConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            GraphBuilderConfig::from_toml_str(&raw)
                .with_context(|| format!("Invalid config {}", path.display()))?
        }
        None => GraphBuilderConfig::default(),
    };
    if args.sequential {
        config = config.with_resolution(ResolutionMode::Sequential);
    }
    Ok(config)
}

fn build(batch: Vec<ParsedFile>, args: &OutputArgs) -> Result<CodeGraph> {
    let builder = GraphBuilder::new(load_config(args)?);
    let (graph, report) = builder.build_with_report(batch)?;
    log_report(&report);
    Ok(graph)
}

fn log_report(report: &BuildReport) {
    for skipped in &report.skipped {
        log::warn!("Skipped {}: {}", skipped.path, skipped.reason);
    }
    log::info!(
        "{} files in graph, {} skipped",
        report.files_built,
        report.skipped.len()
    );
}

fn emit(graph: &CodeGraph, args: &OutputArgs) -> Result<()> {
    let rendered = match args.format {
        OutputFormat::Json => graph.to_json()?,
        OutputFormat::Pretty => graph.to_json_pretty()?,
        OutputFormat::Dot => graph.to_dot_with(&DotOptions::default()),
    };

    match &args.output {
        Some(path) => write_file(path, &rendered),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            if !rendered.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
            Ok(())
        }
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("Wrote {}", path.display());
    Ok(())
}
