use std::io::Read;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use flowtree::{FlowView, LayoutConfig, Rendered, StatusUpdate, TreeView};

#[derive(Parser, Debug)]
#[command(
    name = "flowtree",
    about = "Render a flow snapshot or a nested tree to positioned markup",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Output file path (writes to file instead of stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE", global = true)]
    output: Option<String>,

    /// Print width, height and markup as JSON
    #[arg(long, default_value_t = false, global = true)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Layered flow view of a `{nodes, connection}` snapshot
    Flow {
        /// Snapshot file, `-` for stdin
        #[arg(value_name = "FILE")]
        input: String,

        /// JSON array of `{id, status}` applied before rendering
        #[arg(long, value_name = "FILE")]
        status: Option<String>,

        #[command(flatten)]
        layout: LayoutArgs,
    },
    /// Collapsible tree view of a nested `{id, name, children}` document
    Tree {
        /// Tree file, `-` for stdin
        #[arg(value_name = "FILE")]
        input: String,

        /// Expand branches down to this depth, collapse the rest (-1 collapses the root)
        #[arg(long = "expand-level", allow_negative_numbers = true)]
        expand_level: Option<i32>,

        #[command(flatten)]
        layout: LayoutArgs,
    },
}

#[derive(Args, Debug)]
struct LayoutArgs {
    /// Layout options as a JSON file; flags below take precedence
    #[arg(long, value_name = "FILE")]
    config: Option<String>,

    #[arg(long)]
    node_width: Option<f64>,

    #[arg(long)]
    node_height: Option<f64>,

    #[arg(long)]
    span_x: Option<f64>,

    #[arg(long)]
    span_y: Option<f64>,

    #[arg(long)]
    offset_x: Option<f64>,

    #[arg(long)]
    offset_y: Option<f64>,
}

impl LayoutArgs {
    fn resolve(&self) -> Result<LayoutConfig> {
        let mut config: LayoutConfig = match &self.config {
            Some(path) => serde_json::from_str(&read_input(path)?)
                .with_context(|| format!("invalid layout config in {}", path))?,
            None => LayoutConfig::default(),
        };
        let overrides = [
            (&mut config.node_width, self.node_width),
            (&mut config.node_height, self.node_height),
            (&mut config.span_x, self.span_x),
            (&mut config.span_y, self.span_y),
            (&mut config.offset_x, self.offset_x),
            (&mut config.offset_y, self.offset_y),
        ];
        for (slot, value) in overrides {
            if value.is_some() {
                *slot = value;
            }
        }
        Ok(config)
    }
}

fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path))
}

fn render(command: &Command) -> Result<Rendered> {
    let (html, bounds) = match command {
        Command::Flow {
            input,
            status,
            layout,
        } => {
            let config = layout.resolve()?;
            let mut view = FlowView::from_json(&read_input(input)?, &config)
                .with_context(|| format!("invalid flow snapshot in {}", input))?;
            if let Some(path) = status {
                let updates: Vec<StatusUpdate> = serde_json::from_str(&read_input(path)?)
                    .with_context(|| format!("invalid status list in {}", path))?;
                let changed = view.refresh_status(&updates);
                tracing::info!(changed = changed.len(), "applied status updates");
            }
            (view.render().to_string(), view.bounds())
        }
        Command::Tree {
            input,
            expand_level,
            layout,
        } => {
            let config = layout.resolve()?;
            let mut view = TreeView::from_json(&read_input(input)?, &config)
                .with_context(|| format!("invalid tree in {}", input))?;
            if let Some(level) = *expand_level {
                view = view.with_expand_level(level);
            }
            (view.render().to_string(), view.bounds())
        }
    };
    Ok(Rendered {
        html,
        width: bounds.width,
        height: bounds.height,
    })
}

pub fn run(args: Cli) -> Result<()> {
    let total_start = Instant::now();

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }

    let rendered = render(&args.command)?;
    let text = if args.json {
        serde_json::to_string_pretty(&rendered)?
    } else {
        rendered.html
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, text).with_context(|| format!("failed to write {}", path))?
        }
        None => println!("{}", text),
    }

    tracing::info!(elapsed = ?total_start.elapsed(), "done");
    Ok(())
}

fn main() -> Result<()> {
    run(Cli::parse())
}
