//! Headless catalog-graph viewer: reads a KDL catalog description, runs the
//! layered layout, and writes the rendered scene as SVG. Stands in for the
//! host application around the graph core.

mod kdl;
mod svg;

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use catviz_graphview::{GraphPanel, HostCallbacks, ViewportSize};
use catviz_model::NodeId;
use tracing::info;

struct Options {
    input: PathBuf,
    output: PathBuf,
    dump_layout: Option<PathBuf>,
    /// Accept cyclic graphs via the BFS-ranked fallback layout.
    fallback_unordered: bool,
    width: f64,
    height: f64,
}

fn parse_args() -> Result<Options> {
    let mut input = None;
    let mut output = None;
    let mut dump_layout = None;
    let mut fallback_unordered = false;
    let mut width = 1280.0;
    let mut height = 800.0;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-o" | "--output" => {
                output = Some(PathBuf::from(
                    args.next().context("--output needs a path")?,
                ));
            }
            "--dump-layout" => {
                dump_layout = Some(PathBuf::from(
                    args.next().context("--dump-layout needs a path")?,
                ));
            }
            "--fallback-unordered" => fallback_unordered = true,
            "--width" => {
                width = args
                    .next()
                    .context("--width needs a value")?
                    .parse()
                    .context("--width must be a number")?;
            }
            "--height" => {
                height = args
                    .next()
                    .context("--height needs a value")?
                    .parse()
                    .context("--height must be a number")?;
            }
            "-h" | "--help" => {
                println!(
                    "usage: catviz <catalog.kdl> [-o out.svg] [--dump-layout out.json] \
                     [--fallback-unordered] [--width N] [--height N]"
                );
                std::process::exit(0);
            }
            _ if input.is_none() => input = Some(PathBuf::from(arg)),
            _ => bail!("unexpected argument: {arg}"),
        }
    }

    let input = input.context("missing input file; see --help")?;
    let output = output.unwrap_or_else(|| input.with_extension("svg"));
    Ok(Options {
        input,
        output,
        dump_layout,
        fallback_unordered,
        width,
        height,
    })
}

/// Stand-in host: the real application would open its asset-detail modal
/// here.
#[derive(Default)]
struct LoggingHost;

impl HostCallbacks for LoggingHost {
    fn on_node_selected(&mut self, id: &NodeId) {
        info!(node = %id, "node selected");
    }
}

fn run(options: &Options) -> Result<()> {
    let content = fs::read_to_string(&options.input)
        .with_context(|| format!("reading {}", options.input.display()))?;
    let (nodes, edges) = kdl::parse_catalog(&content)?;
    info!(
        nodes = nodes.len(),
        edges = edges.len(),
        "catalog parsed"
    );

    let mut panel = GraphPanel::open(
        nodes,
        edges,
        ViewportSize::new(options.width, options.height),
    )
    .context("ingesting catalog graph")?;

    if let Some(err) = panel.layout_error() {
        if options.fallback_unordered {
            info!(%err, "falling back to unordered layout");
            panel.fallback_to_unordered();
        } else {
            // The error scene is still written below, so the output shows a
            // clear failure state rather than a blank canvas.
            eprintln!("warning: {err} (pass --fallback-unordered to lay it out anyway)");
        }
    }

    if let Some(path) = &options.dump_layout {
        let json = serde_json::to_string_pretty(panel.layout())?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    }

    let markup = svg::scene_to_svg(&panel.scene());
    fs::write(&options.output, markup)
        .with_context(|| format!("writing {}", options.output.display()))?;
    info!(output = %options.output.display(), "scene written");

    Ok(())
}


fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let options = match parse_args() {
        Ok(options) => options,
        Err(err) => {
            eprintln!("error: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    match run(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
