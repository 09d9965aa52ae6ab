use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use drip::config::DripConfig;
use drip::prelude::*;
use drip::store::{JsonDirStore, LogDispatcher};
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Plan, validate and run drip campaign flowcharts
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Optional path to a drip.toml configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plan a flowchart JSON file and print the schedule tree
    Plan {
        /// Path to the flowchart JSON file
        path: PathBuf,
        /// Planning instant (RFC 3339); defaults to now
        #[arg(long)]
        start: Option<DateTime<Utc>>,
        /// Recipient for message steps that do not name their own
        #[arg(short, long)]
        recipient: Option<String>,
        /// Also save the schedule as a binary artifact
        #[arg(long)]
        artifact: Option<PathBuf>,
    },
    /// Check a flowchart JSON file for structural errors
    Validate {
        /// Path to the flowchart JSON file
        path: PathBuf,
    },
    /// List the flowcharts in the store directory
    List {
        /// Store directory; overrides the configured one
        #[arg(long)]
        store: Option<PathBuf>,
    },
    /// Plan a stored flowchart and hand it to the log dispatcher
    Run {
        /// Id of the stored flowchart
        id: String,
        /// Store directory; overrides the configured one
        #[arg(long)]
        store: Option<PathBuf>,
        /// Recipient for message steps that do not name their own
        #[arg(short, long)]
        recipient: Option<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("drip=info,warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => DripConfig::load(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load config: {}", e))),
        None => DripConfig::default(),
    };

    match cli.command {
        Command::Plan {
            path,
            start,
            recipient,
            artifact,
        } => run_plan(path, start, recipient, artifact),
        Command::Validate { path } => run_validate(path),
        Command::List { store } => run_list(store.unwrap_or(config.store.dir)),
        Command::Run {
            id,
            store,
            recipient,
        } => run_stored(&id, store.unwrap_or(config.store.dir), recipient),
    }
}

fn load_graph(path: &PathBuf) -> Graph {
    let json = fs::read_to_string(path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read flowchart file '{}': {}",
            path.display(),
            e
        ))
    });
    FlowchartDocument::from_json(&json)
        .and_then(IntoGraph::into_graph)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load flowchart: {}", e)))
}

fn routing_for(graph: &Graph, recipient: Option<String>) -> RoutingContext {
    let mut routing = RoutingContext::new().with_lead_sources(graph.lead_sources().to_vec());
    match recipient {
        Some(r) => routing = routing.with_recipient(r),
        None => routing.route_to_first_lead(),
    }
    routing
}

fn run_plan(
    path: PathBuf,
    start: Option<DateTime<Utc>>,
    recipient: Option<String>,
    artifact: Option<PathBuf>,
) {
    let total_start = Instant::now();
    let graph = load_graph(&path);
    println!(
        "Loaded '{}': {} steps, {} connections",
        graph.name(),
        graph.step_count(),
        graph.connection_count()
    );

    let planner = Planner::builder()
        .with_routing(routing_for(&graph, recipient))
        .build();
    let schedule = match start {
        Some(instant) => planner.plan(&graph, &FixedClock(instant)),
        None => planner.plan(&graph, &SystemClock),
    }
    .unwrap_or_else(|e| exit_with_error(&format!("Planning failed: {}", e)));

    println!("\n{}", schedule);
    println!("Actions:      {}", schedule.actions().len());
    println!("Paths:        {}", schedule.paths().len());
    println!(
        "Total span:   {}",
        drip::planner::format_offset(schedule.total_span())
    );

    if let Some(artifact_path) = artifact {
        ScheduleArtifact::new(None, schedule)
            .save(&artifact_path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to save artifact: {}", e)));
        println!("Saved schedule artifact to '{}'", artifact_path.display());
    }
    info!(elapsed = ?total_start.elapsed(), "done");
}

fn run_validate(path: PathBuf) {
    let graph = load_graph(&path);
    match plan(&graph, &SystemClock) {
        Ok(schedule) => println!(
            "'{}' is valid: {} steps, {} planned actions",
            graph.name(),
            graph.step_count(),
            schedule.actions().len()
        ),
        Err(e) => exit_with_error(&format!("'{}' cannot be planned: {}", graph.name(), e)),
    }
}

fn open_store(dir: PathBuf) -> JsonDirStore {
    JsonDirStore::open(&dir).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to open store '{}': {}", dir.display(), e))
    })
}

fn run_list(dir: PathBuf) {
    let store = open_store(dir);
    let summaries = store
        .list()
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to list flowcharts: {}", e)));
    if summaries.is_empty() {
        println!("No flowcharts in '{}'", store.dir().display());
        return;
    }
    for summary in summaries {
        println!(
            "{}  {}  {}",
            summary.id,
            summary.created_at.format("%Y-%m-%d %H:%M"),
            summary.name
        );
    }
}

fn run_stored(id: &str, dir: PathBuf, recipient: Option<String>) {
    let mut routing = RoutingContext::new();
    if let Some(r) = recipient {
        routing = routing.with_recipient(r);
    }
    let mut runner =
        CampaignRunner::new(open_store(dir), LogDispatcher, SystemClock).with_routing(routing);
    let schedule = runner
        .run(id)
        .unwrap_or_else(|e| exit_with_error(&format!("Run failed: {}", e)));
    println!("{}", schedule);
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
