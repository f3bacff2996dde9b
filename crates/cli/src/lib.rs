use anyhow::{bail, Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use flowmap_index::{EdgePredicate, FlowmapAttentionRecord, InputRecord, OutputRecord};
use flowmap_protocol::{dataset_schema, serialize_json, DataSourceRecord};
use flowmap_render::Size;
use flowmap_selection::{SelectionSink, SelectionState};
use flowmap_source::{DataSourceRegistry, JsonFileStore, SourceLoader};
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

mod flags;
mod settings;
mod visualizer;

use flags::{IndexSpan, PresetFlag, TokenMatchFlag};
pub use settings::AppConfig;
pub use visualizer::{LoadState, Visualizer};

#[derive(Parser)]
#[command(name = "flowmap")]
#[command(about = "Render and inspect attention flow maps", long_about = None)]
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

    /// Config file (TOML); defaults to the user config dir if present
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data source list file (overrides the config)
    #[arg(long, global = true)]
    registry: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a data source and write the flow map as SVG
    Render(RenderArgs),

    /// Load a data source and print the derived records as JSON
    Inspect(InspectArgs),

    /// Manage the list of data sources
    #[command(subcommand)]
    Sources(SourcesCommand),

    /// Print the JSON schema of attention payloads
    Schema,
}

#[derive(Args)]
struct ViewArgs {
    /// Registered source name, URL or file path (default: current source)
    #[arg(short, long)]
    source: Option<String>,

    /// Minimum attention weight for an edge
    #[arg(short, long)]
    threshold: Option<f64>,

    /// Input index range to zoom to, e.g. `10:40`
    #[arg(long)]
    zoom: Option<IndexSpan>,

    /// Select output tokens, e.g. `3` or `3:7`
    #[arg(long, conflicts_with_all = ["input", "token_match"])]
    output: Option<IndexSpan>,

    /// Select input tokens, e.g. `3` or `3:7`
    #[arg(long, conflicts_with = "token_match")]
    input: Option<IndexSpan>,

    /// Select every edge between equal (or different) tokens
    #[arg(long, value_enum)]
    token_match: Option<TokenMatchFlag>,

    /// Lock the selection
    #[arg(long)]
    lock: bool,
}

#[derive(Args)]
struct RenderArgs {
    #[command(flatten)]
    view: ViewArgs,

    /// Output file (default: stdout)
    #[arg(short, long)]
    out: Option<PathBuf>,

    #[arg(long)]
    width: Option<f64>,

    #[arg(long)]
    height: Option<f64>,

    /// Geometry preset; replaces the `[flowmap]` table of the config
    #[arg(long, value_enum)]
    preset: Option<PresetFlag>,

    /// Draw token labels
    #[arg(long)]
    show_text: bool,
}

#[derive(Args)]
struct InspectArgs {
    #[command(flatten)]
    view: ViewArgs,
}

#[derive(Subcommand)]
enum SourcesCommand {
    /// List registered sources; `*` marks the current one
    List {
        #[arg(long)]
        json: bool,
    },
    /// Register a source and make it current
    Add { name: String, url: String },
    /// Remove the source at a position
    Remove { position: usize },
    /// Make the source at a position current
    Select { position: usize },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InspectReport<'a> {
    source: DataSourceRecord,
    state: SelectionState,
    predicate: EdgePredicate,
    input_records: &'a [InputRecord],
    output_records: &'a [OutputRecord],
    attention_records: &'a [FlowmapAttentionRecord],
}

#[derive(Serialize)]
struct SourceListing<'a> {
    position: usize,
    name: &'a str,
    url: &'a str,
    current: bool,
}

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

fn init_logging(verbose: bool, quiet: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();
}

pub async fn main_entry() -> Result<()> {
    let mut cli = Cli::parse();

    // keep stdout clean for JSON consumers
    let json_output = match &cli.command {
        Commands::Inspect(_) | Commands::Schema => true,
        Commands::Sources(SourcesCommand::List { json }) => *json,
        _ => false,
    };
    if json_output {
        cli.quiet = true;
    }
    init_logging(cli.verbose, cli.quiet);

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(path) = cli.registry {
        config.registry_path = Some(path);
    }

    match cli.command {
        Commands::Render(args) => run_render(args, config).await?,
        Commands::Inspect(args) => run_inspect(args, config).await?,
        Commands::Sources(command) => run_sources(command, &config)?,
        Commands::Schema => {
            let schema = serde_json::to_string_pretty(&dataset_schema())?;
            print_stdout(&schema)?;
        }
    }

    Ok(())
}

fn open_registry(config: &AppConfig) -> Result<DataSourceRegistry<JsonFileStore>> {
    let path = config
        .registry_path()
        .context("No config directory available; pass --registry")?;
    log::debug!("data sources: {}", path.display());
    DataSourceRegistry::load(JsonFileStore::new(path)).context("Failed to open data sources")
}

/// A registered name wins; anything else is taken as a URL or path.
fn resolve_source(
    wanted: Option<&str>,
    registry: &DataSourceRegistry<JsonFileStore>,
) -> Result<DataSourceRecord> {
    match wanted {
        Some(wanted) => Ok(registry
            .sources()
            .iter()
            .find(|record| record.name == wanted)
            .cloned()
            .unwrap_or_else(|| DataSourceRecord::new(wanted, wanted))),
        None => registry
            .current()
            .or_else(|| registry.initial_source())
            .cloned()
            .context("No data source registered"),
    }
}

async fn prepare(
    view: &ViewArgs,
    config: &AppConfig,
    flowmap: flowmap_render::FlowmapConfig,
    size: Size,
) -> Result<Visualizer> {
    let registry = open_registry(config)?;
    let source = resolve_source(view.source.as_deref(), &registry)?;
    let loader = SourceLoader::with_timeout(Duration::from_secs(config.http_timeout_secs))?;

    let threshold = view.threshold.unwrap_or(config.weight_threshold);
    let mut vis = Visualizer::new(flowmap, size, threshold);
    vis.load_with(&loader, source).await;
    if let LoadState::Failed { source, message } = vis.load_state() {
        bail!("Failed to load '{}': {message}", source.name);
    }

    if let Some(controller) = vis.controller_mut() {
        if let Some(span) = view.zoom {
            controller.zoom_by_input_index(span.start, span.end);
        }
        if let Some(span) = view.output {
            controller.filter_by_output_index(Some(span.filter()));
        } else if let Some(span) = view.input {
            controller.filter_by_input_index(Some(span.filter()));
        } else if let Some(flag) = view.token_match {
            controller.filter_by_edge_token_match(flag.as_domain());
        }
        if view.lock {
            controller.lock(true);
        }
    }
    Ok(vis)
}

async fn run_render(args: RenderArgs, config: AppConfig) -> Result<()> {
    let mut flowmap = args
        .preset
        .map(PresetFlag::as_domain)
        .unwrap_or_else(|| config.flowmap.clone());
    if args.show_text {
        flowmap.show_text = true;
    }
    let size = Size::new(
        args.width.unwrap_or(config.size.width),
        args.height.unwrap_or(config.size.height),
    );
    if !(size.width > 0.0 && size.height > 0.0) {
        bail!("Size must be positive (got {}x{})", size.width, size.height);
    }

    let mut vis = prepare(&args.view, &config, flowmap, size).await?;
    let svg = vis.render_svg();
    match args.out {
        Some(path) => {
            std::fs::write(&path, svg)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("wrote {}", path.display());
        }
        None => print_stdout(&svg)?,
    }
    Ok(())
}

async fn run_inspect(args: InspectArgs, config: AppConfig) -> Result<()> {
    let vis = prepare(&args.view, &config, config.flowmap.clone(), config.size).await?;
    let (LoadState::Ready { source }, Some(controller)) = (vis.load_state(), vis.controller())
    else {
        bail!("No dataset loaded");
    };
    let data = controller.data();
    let report = InspectReport {
        source: source.clone(),
        state: controller.state(),
        predicate: controller.predicate(),
        input_records: &data.input_records,
        output_records: &data.output_records,
        attention_records: &data.attention_records,
    };
    print_stdout(&serialize_json(&report)?)
}

fn run_sources(command: SourcesCommand, config: &AppConfig) -> Result<()> {
    let mut registry = open_registry(config)?;
    match command {
        SourcesCommand::List { json } => {
            let current = registry.current_index();
            let listing: Vec<SourceListing<'_>> = registry
                .sources()
                .iter()
                .enumerate()
                .map(|(position, record)| SourceListing {
                    position,
                    name: &record.name,
                    url: &record.url,
                    current: current == Some(position),
                })
                .collect();
            if json {
                print_stdout(&serialize_json(&listing)?)?;
            } else {
                for entry in listing {
                    let marker = if entry.current { "*" } else { " " };
                    print_stdout(&format!(
                        "{marker} {} {}\t{}",
                        entry.position, entry.name, entry.url
                    ))?;
                }
            }
        }
        SourcesCommand::Add { name, url } => {
            let position = registry.add(DataSourceRecord::new(name.as_str(), url))?;
            print_stdout(&format!("added '{name}' at position {position}"))?;
        }
        SourcesCommand::Remove { position } => {
            let removed = registry.remove(position)?;
            print_stdout(&format!("removed '{}'", removed.name))?;
        }
        SourcesCommand::Select { position } => {
            let selected = registry.select(position)?;
            print_stdout(&format!("selected '{}'", selected.name))?;
        }
    }
    Ok(())
}
