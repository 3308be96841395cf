#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use clap::Parser;
use kahn_core::graph::Graph;
use kahn_core::id::VertexId;
use kahn_core::matrix;
use kahn_core::topo::{self, Detection};
use serde::Serialize;
use std::env;
use std::fmt::Write;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "kahn: topological order and cycle detection for adjacency-matrix graphs",
    long_about = None
)]
struct Cli {
    /// Matrix file: the vertex count, then one row of 0/1 per source vertex.
    file: PathBuf,

    /// Print every vertex's out- and in-neighbours before the result.
    #[arg(long)]
    print_graph: bool,

    /// Print vertices grouped by depth instead of one flat order.
    #[arg(long)]
    levels: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long)]
    json: bool,

    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,
}

/// JSON report shape.
#[derive(Serialize)]
struct Report<'a> {
    vertices: usize,
    edges: usize,
    #[serde(flatten)]
    detection: &'a Detection,
    #[serde(skip_serializing_if = "Option::is_none")]
    levels: Option<Vec<Vec<VertexId>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    adjacency: Option<Vec<(VertexId, VertexId)>>,
}

/// Filter used when `KAHN_LOG` is unset.
fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "kahn_core=debug,kahn_cli=debug,info"
    } else {
        "kahn_core=info,kahn_cli=info,warn"
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("KAHN_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let format = env::var("KAHN_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn join(ids: &[VertexId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Everything the binary prints to stdout for `graph`.
fn render(graph: &Graph, cli: &Cli) -> Result<String> {
    let detection = topo::detect(graph);
    let levels = if cli.levels && detection.is_acyclic() {
        Some(topo::topological_levels(graph)?)
    } else {
        None
    };

    if cli.json {
        let report = Report {
            vertices: graph.vertex_count(),
            edges: graph.edge_count(),
            detection: &detection,
            levels,
            adjacency: cli.print_graph.then(|| graph.edges().collect()),
        };
        let mut out = serde_json::to_string_pretty(&report)?;
        out.push('\n');
        return Ok(out);
    }

    let mut out = String::new();
    if cli.print_graph {
        write!(out, "{}", graph.display())?;
    }
    match levels {
        Some(levels) => {
            for (depth, level) in levels.iter().enumerate() {
                writeln!(out, "{depth}: {}", join(level))?;
            }
        }
        None => writeln!(out, "{detection}")?,
    }
    Ok(out)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let graph = matrix::read_graph(&cli.file).context("failed to load graph")?;
    debug!(
        file = %cli.file.display(),
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "graph loaded"
    );

    print!("{}", render(&graph, &cli)?);
    Ok(())
}
