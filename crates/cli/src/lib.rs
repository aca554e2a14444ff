mod config;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use typescan_graph::{DiagramConfig, ScanConfig, TypeGraph};

pub use config::{FileConfig, CONFIG_ENV};

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

#[derive(Parser)]
#[command(name = "typescan")]
#[command(about = "Query and draw the relationship graph of scanned types", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// TOML file with [scan] and [diagram] tables (default: $TYPESCAN_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Also expose types that were referenced but not scanned
    #[arg(long, global = true)]
    include_external: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List known type names
    List(ListArgs),

    /// Run a closure query for one type
    Query(QueryArgs),

    /// Show where a type was loaded from
    Origins(OriginsArgs),

    /// Render the visible graph as Graphviz DOT
    Dot(DotArgs),
}

#[derive(Args)]
struct ListArgs {
    /// JSON file with the scanned type records
    records: PathBuf,

    /// Restrict the listing to one kind of type
    #[arg(long, value_enum, default_value = "all")]
    kind: KindFilter,

    /// Output JSON format
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct QueryArgs {
    /// JSON file with the scanned type records
    records: PathBuf,

    /// Relation to follow
    #[arg(value_enum)]
    relation: Relation,

    /// Fully qualified type name
    name: String,

    /// Output JSON format
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct OriginsArgs {
    /// JSON file with the scanned type records
    records: PathBuf,

    /// Fully qualified type name
    name: String,

    /// Output JSON format
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct DotArgs {
    /// JSON file with the scanned type records
    records: PathBuf,

    /// Canvas width in inches
    #[arg(long)]
    width: Option<f32>,

    /// Canvas height in inches
    #[arg(long)]
    height: Option<f32>,

    /// Leave attributes out of node labels
    #[arg(long)]
    no_attributes: bool,

    /// Leave routines out of node labels
    #[arg(long)]
    no_routines: bool,

    /// Write the document here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum KindFilter {
    All,
    Standard,
    Interface,
    Tag,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Relation {
    Subclasses,
    Superclasses,
    Subinterfaces,
    Superinterfaces,
    Implementing,
    WithTag,
    TagsOn,
    MetaTagsOn,
    WithMetaTag,
    WithRoutineTag,
    WithAttributeTag,
}

impl Relation {
    fn run(self, graph: &TypeGraph, name: &str) -> Vec<String> {
        match self {
            Self::Subclasses => graph.names_of_subclasses_of(name),
            Self::Superclasses => graph.names_of_superclasses_of(name),
            Self::Subinterfaces => graph.names_of_subinterfaces_of(name),
            Self::Superinterfaces => graph.names_of_superinterfaces_of(name),
            Self::Implementing => graph.names_of_classes_implementing(name),
            Self::WithTag => graph.names_of_types_with_tag(name),
            Self::TagsOn => graph.names_of_tags_on_type(name),
            Self::MetaTagsOn => graph.names_of_meta_tags_on_tag(name),
            Self::WithMetaTag => graph.names_of_tags_with_meta_tag(name),
            Self::WithRoutineTag => graph.names_of_types_with_routine_tag(name),
            Self::WithAttributeTag => graph.names_of_types_with_attribute_tag(name),
        }
    }
}

pub fn main_entry() -> Result<()> {
    let mut cli = Cli::parse();

    // Keep stdout clean for JSON consumers
    let json_output = match &cli.command {
        Commands::List(args) => args.json,
        Commands::Query(args) => args.json,
        Commands::Origins(args) => args.json,
        Commands::Dot(_) => false,
    };
    if json_output {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let mut file_config = FileConfig::load(cli.config.as_deref())?;
    if cli.include_external {
        file_config.scan.enable_external_types = true;
    }

    match cli.command {
        Commands::List(args) => run_list(args, &file_config.scan)?,
        Commands::Query(args) => run_query(args, &file_config.scan)?,
        Commands::Origins(args) => run_origins(args, &file_config.scan)?,
        Commands::Dot(args) => run_dot(args, file_config)?,
    }

    Ok(())
}

fn load_graph(path: &Path, scan: &ScanConfig) -> Result<TypeGraph> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read records {}", path.display()))?;
    TypeGraph::from_json(&json, scan.clone())
        .with_context(|| format!("Failed to build type graph from {}", path.display()))
}

fn print_names(names: &[String], json: bool) -> Result<()> {
    if json {
        return print_stdout(&serde_json::to_string_pretty(names)?);
    }
    if names.is_empty() {
        return Ok(());
    }
    print_stdout(&names.join("\n"))
}

fn run_list(args: ListArgs, scan: &ScanConfig) -> Result<()> {
    let graph = load_graph(&args.records, scan)?;
    let names = match args.kind {
        KindFilter::All => graph.names_of_all_types(),
        KindFilter::Standard => graph.names_of_all_standard_types(),
        KindFilter::Interface => graph.names_of_all_interface_types(),
        KindFilter::Tag => graph.names_of_all_tag_types(),
    };
    print_names(&names, args.json)
}

fn run_query(args: QueryArgs, scan: &ScanConfig) -> Result<()> {
    let graph = load_graph(&args.records, scan)?;
    if !graph.contains(&args.name) {
        log::warn!("Unknown type: {}", args.name);
    }
    let names = args.relation.run(&graph, &args.name);
    log::debug!("{:?} {} -> {} types", args.relation, args.name, names.len());
    print_names(&names, args.json)
}

fn run_origins(args: OriginsArgs, scan: &ScanConfig) -> Result<()> {
    let graph = load_graph(&args.records, scan)?;
    let origins: Vec<String> = graph
        .origins_of(&args.name)
        .map(<[String]>::to_vec)
        .unwrap_or_default();
    print_names(&origins, args.json)
}

fn run_dot(args: DotArgs, file_config: FileConfig) -> Result<()> {
    let graph = load_graph(&args.records, &file_config.scan)?;

    let mut diagram: DiagramConfig = file_config.diagram;
    if let Some(width) = args.width {
        diagram.width = width;
    }
    if let Some(height) = args.height {
        diagram.height = height;
    }
    if args.no_attributes {
        diagram.show_attributes = false;
    }
    if args.no_routines {
        diagram.show_routines = false;
    }
    diagram
        .validate()
        .map_err(anyhow::Error::msg)
        .context("Invalid diagram options")?;

    let dot = graph.generate_dot(&diagram);
    match args.output {
        Some(path) => {
            fs::write(&path, &dot)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Wrote diagram to {}", path.display());
        }
        None => print_stdout(&dot)?,
    }
    Ok(())
}
