use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use stagehand_config::{LoggingConfig, ScheduleDef};
use stagehand_graph::{Graph, Mermaid, builder_from_def};

/// Stagehand - order startup and shutdown steps contributed by independent components
#[derive(Parser)]
#[command(name = "stagehand")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Log filter, e.g. "debug" or "stagehand_graph=debug" (RUST_LOG takes precedence)
  #[arg(long, global = true)]
  log_level: Option<String>,

  /// Disable logging entirely
  #[arg(long, global = true)]
  quiet: bool,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Print the execution order of a schedule as JSON
  Order {
    /// Path to the schedule file (JSON)
    schedule_file: PathBuf,
  },

  /// Print the schedule graph in Graphviz DOT format
  Dot {
    /// Path to the schedule file (JSON)
    schedule_file: PathBuf,
  },

  /// Print the schedule graph as a Mermaid flowchart
  Mermaid {
    /// Path to the schedule file (JSON)
    schedule_file: PathBuf,

    /// Only show nodes on paths starting here
    #[arg(long, requires = "to")]
    from: Option<String>,

    /// Only show nodes on paths ending here
    #[arg(long, requires = "from")]
    to: Option<String>,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let mut logging = LoggingConfig::default();
  if let Some(level) = cli.log_level {
    logging.level = level;
  }
  logging.enabled = !cli.quiet;
  init_tracing(&logging)?;

  match cli.command {
    Some(Commands::Order { schedule_file }) => print_order(&schedule_file)?,
    Some(Commands::Dot { schedule_file }) => {
      let (def, graph) = load_graph(&schedule_file)?;
      println!("{}", graph.to_dot(&def.name));
    }
    Some(Commands::Mermaid {
      schedule_file,
      from,
      to,
    }) => {
      let (def, graph) = load_graph(&schedule_file)?;
      let graph = match (from, to) {
        (Some(from), Some(to)) => graph
          .subgraph_between(&from, &to)
          .with_context(|| format!("cannot show paths from '{}' to '{}'", from, to))?,
        _ => graph,
      };
      println!("{}", graph.render::<Mermaid>(&def.name));
    }
    None => {
      println!("stagehand - use --help to see available commands");
    }
  }

  Ok(())
}

fn init_tracing(logging: &LoggingConfig) -> Result<()> {
  if !logging.enabled {
    return Ok(());
  }

  let filter = match std::env::var("RUST_LOG") {
    Ok(v) if !v.trim().is_empty() => EnvFilter::from_default_env(),
    _ => EnvFilter::try_new(&logging.level)
      .with_context(|| format!("invalid log level: {}", logging.level))?,
  };

  tracing_subscriber::registry()
    .with(filter)
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
    .try_init()
    .map_err(|e| anyhow!("failed to install logger: {}", e))
}

fn load_graph(schedule_file: &Path) -> Result<(ScheduleDef, Graph<()>)> {
  let def = ScheduleDef::from_file(schedule_file)
    .with_context(|| format!("failed to load schedule file: {}", schedule_file.display()))?;
  info!(schedule = %def.name, components = def.components.len(), "loaded schedule");

  let graph = builder_from_def(&def)
    .build()
    .with_context(|| format!("failed to assemble schedule '{}'", def.name))?;
  Ok((def, graph))
}

fn print_order(schedule_file: &Path) -> Result<()> {
  let (def, graph) = load_graph(schedule_file)?;
  let steps = graph
    .topo_sort()
    .with_context(|| format!("failed to order schedule '{}'", def.name))?;

  let output = serde_json::json!({
    "name": def.name,
    "order": steps.names().iter().map(|n| n.as_str()).collect::<Vec<_>>(),
  });
  println!("{}", serde_json::to_string_pretty(&output)?);
  Ok(())
}
