//! Grounding-set CLI.
//!
//! Provides the `groundset` binary. Every subcommand loads a finished word
//! graph and prints a JSON report to stdout (or to `--output`); logs go to
//! stderr so stdout stays machine-readable.
//!
//! Exit codes: 0 = success, 1 = graph or run error (including a grounding
//! set that fails verification), 3 = I/O, serialization or input error.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use groundset_core::{
    ground, run_trials, verify_grounding_set, ClosureRule, GraphOptions, GraphSummary,
    GroundingConfig, InitialGrounding, MandatorySet, Strategy, WorklistOrder,
};
use groundset_io::{
    load_graph, read_grounding_file, write_grounding_file, write_json, GroundingFile,
    GroundingReport, InputFormat, IoError, LoadedGraph, MandatoryReport, StatsReport,
    TrialsReport, VerificationOutput,
};

/// Grounding sets of dictionary graphs.
#[derive(Parser)]
#[command(name = "groundset", about = "Grounding sets of dictionary graphs")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Where the graph comes from.
#[derive(Args, Debug, Clone)]
struct GraphArgs {
    /// Path to the graph JSON file.
    #[arg(short, long)]
    input: PathBuf,

    /// Input format: incoming (word -> defining words) or edges.
    #[arg(short, long, default_value = "incoming")]
    format: InputFormat,

    /// Collapse parallel edges before computing degrees.
    #[arg(long)]
    dedup_edges: bool,
}

impl GraphArgs {
    fn load(&self) -> Result<LoadedGraph, IoError> {
        load_graph(
            &self.input,
            self.format,
            GraphOptions {
                dedup_edges: self.dedup_edges,
            },
        )
    }
}

/// Per-field overrides for a `GroundingConfig`.
#[derive(Args, Debug, Clone, Default)]
struct ConfigArgs {
    /// JSON configuration file; flags below override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Initial grounding: mandatory or empty.
    #[arg(long, visible_alias = "init")]
    initial_grounding: Option<InitialGrounding>,

    /// Strategy: random, static-out-degree or dynamic-unknown-successor.
    #[arg(short, long)]
    strategy: Option<Strategy>,

    /// Number of independent trials (random strategy only).
    #[arg(short = 'n', long)]
    trials: Option<usize>,

    /// Seed for the random strategy.
    #[arg(long)]
    seed: Option<u64>,

    /// Worklist order: fifo or lifo.
    #[arg(long)]
    worklist: Option<WorklistOrder>,

    /// Closure rule: any-predecessor or all-predecessors.
    #[arg(long)]
    closure: Option<ClosureRule>,
}

impl ConfigArgs {
    fn resolve(&self) -> Result<GroundingConfig, IoError> {
        let mut config = match &self.config {
            Some(path) => GroundingConfig::from_json(&fs::read_to_string(path)?)?,
            None => GroundingConfig::default(),
        };
        if let Some(initial_grounding) = self.initial_grounding {
            config.initial_grounding = initial_grounding;
        }
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
        if let Some(trials) = self.trials {
            config.trials = trials;
        }
        if let Some(seed) = self.seed {
            config.random_seed = seed;
        }
        if let Some(worklist) = self.worklist {
            config.worklist = worklist;
        }
        if let Some(closure) = self.closure {
            config.closure = closure;
        }
        Ok(config)
    }
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Compute a grounding set.
    Ground {
        #[command(flatten)]
        graph: GraphArgs,

        #[command(flatten)]
        config: ConfigArgs,

        /// Write the report here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write the grounding set as a grounding file.
        #[arg(long)]
        grounding_file: Option<PathBuf>,
    },

    /// List the mandatory vertices and why each is mandatory.
    Mandatory {
        #[command(flatten)]
        graph: GraphArgs,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check that a grounding file covers the whole graph.
    Verify {
        #[command(flatten)]
        graph: GraphArgs,

        /// Grounding file: {"grounding_set": [...]} of words or indices.
        #[arg(short, long)]
        grounding_file: PathBuf,

        /// Closure rule used for the check.
        #[arg(long, default_value = "any-predecessor")]
        closure: ClosureRule,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print structural statistics of the graph.
    Stats {
        #[command(flatten)]
        graph: GraphArgs,

        /// How many vertices to list by in- and out-degree.
        #[arg(long, default_value_t = 10)]
        top: usize,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let exit_code = match cli.command {
        Commands::Ground {
            graph,
            config,
            output,
            grounding_file,
        } => run_ground(&graph, &config, output.as_deref(), grounding_file.as_deref()),
        Commands::Mandatory { graph, output } => run_mandatory(&graph, output.as_deref()),
        Commands::Verify {
            graph,
            grounding_file,
            closure,
            output,
        } => run_verify(&graph, &grounding_file, closure, output.as_deref()),
        Commands::Stats { graph, top, output } => run_stats(&graph, top, output.as_deref()),
    };
    process::exit(exit_code);
}

/// Installs a stderr subscriber. `-v` flags win over `GROUNDSET_LOG`; with
/// neither, only warnings and errors are shown.
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_env("GROUNDSET_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Maps a failure to an exit code, reporting it on stderr.
fn fail(context: &str, err: &IoError) -> i32 {
    eprintln!("Error: {}: {}", context, err);
    match err {
        IoError::Graph(_) => 1,
        _ => 3,
    }
}

/// Pretty JSON to `output` or stdout.
fn emit<T: Serialize>(value: &T, output: Option<&Path>) -> Result<(), IoError> {
    match output {
        Some(path) => {
            write_json(path, value)?;
            info!(path = %path.display(), "wrote report");
        }
        None => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}

/// Execute the ground subcommand.
fn run_ground(
    graph_args: &GraphArgs,
    config_args: &ConfigArgs,
    output: Option<&Path>,
    grounding_file: Option<&Path>,
) -> i32 {
    let config = match config_args.resolve() {
        Ok(c) => c,
        Err(e) => return fail("failed to read configuration", &e),
    };
    let loaded = match graph_args.load() {
        Ok(l) => l,
        Err(e) => return fail(&format!("failed to load '{}'", graph_args.input.display()), &e),
    };

    // One run reports an outcome; several report a summary.
    let (grounding_set, written) = if config.trials > 1 {
        let summary = match run_trials(&loaded.graph, &config) {
            Ok(s) => s,
            Err(e) => return fail("grounding failed", &IoError::from(e)),
        };
        let best = summary
            .best()
            .map(|t| t.outcome.grounding_set.clone())
            .unwrap_or_default();
        let report = TrialsReport::new(summary, loaded.lexicon.as_ref());
        (best, emit(&report, output))
    } else {
        let outcome = match ground(&loaded.graph, &config) {
            Ok(o) => o,
            Err(e) => return fail("grounding failed", &IoError::from(e)),
        };
        let set = outcome.grounding_set.clone();
        let report = GroundingReport::new(outcome, loaded.lexicon.as_ref());
        (set, emit(&report, output))
    };
    if let Err(e) = written {
        return fail("failed to write report", &e);
    }

    if let Some(path) = grounding_file {
        let file = GroundingFile::from_vertices(&grounding_set, loaded.lexicon.as_ref());
        if let Err(e) = write_grounding_file(path, &file) {
            return fail(&format!("failed to write '{}'", path.display()), &e);
        }
    }
    0
}

/// Execute the mandatory subcommand.
fn run_mandatory(graph_args: &GraphArgs, output: Option<&Path>) -> i32 {
    let loaded = match graph_args.load() {
        Ok(l) => l,
        Err(e) => return fail(&format!("failed to load '{}'", graph_args.input.display()), &e),
    };
    let mandatory = MandatorySet::compute(&loaded.graph);
    let report = MandatoryReport::new(
        loaded.graph.vertex_count(),
        &mandatory,
        loaded.lexicon.as_ref(),
    );
    match emit(&report, output) {
        Ok(()) => 0,
        Err(e) => fail("failed to write report", &e),
    }
}

/// Execute the verify subcommand.
///
/// Returns 1 when the grounding set does not cover the graph.
fn run_verify(
    graph_args: &GraphArgs,
    grounding_path: &Path,
    closure: ClosureRule,
    output: Option<&Path>,
) -> i32 {
    let loaded = match graph_args.load() {
        Ok(l) => l,
        Err(e) => return fail(&format!("failed to load '{}'", graph_args.input.display()), &e),
    };
    let candidate = match read_grounding_file(grounding_path)
        .and_then(|file| file.resolve(loaded.lexicon.as_ref()))
    {
        Ok(c) => c,
        Err(e) => {
            return fail(
                &format!("failed to read '{}'", grounding_path.display()),
                &e,
            )
        }
    };

    let report = match verify_grounding_set(&loaded.graph, &candidate, closure) {
        Ok(r) => r,
        Err(e) => return fail("verification failed", &IoError::from(e)),
    };
    let valid = report.valid;
    if !valid {
        warn!(
            missing = report.missing.len(),
            known = report.known_count,
            "grounding set is incomplete"
        );
    }

    let output_report = VerificationOutput::new(report, loaded.lexicon.as_ref());
    if let Err(e) = emit(&output_report, output) {
        return fail("failed to write report", &e);
    }
    if valid {
        0
    } else {
        1
    }
}

/// Execute the stats subcommand.
fn run_stats(graph_args: &GraphArgs, top: usize, output: Option<&Path>) -> i32 {
    let loaded = match graph_args.load() {
        Ok(l) => l,
        Err(e) => return fail(&format!("failed to load '{}'", graph_args.input.display()), &e),
    };
    let summary = GraphSummary::compute(&loaded.graph, top);
    let report = StatsReport::new(summary, loaded.lexicon.as_ref());
    match emit(&report, output) {
        Ok(()) => 0,
        Err(e) => fail("failed to write report", &e),
    }
}
