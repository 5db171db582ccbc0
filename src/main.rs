use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::Level;

use pathopt::{
    load_document, render_model, render_solution, sample_document, GraphDocument, ModelBuilder,
    ShortestPathService, SolverBackend, SolverConfig, SolverFactory,
};

#[derive(Parser)]
#[command(name = "pathopt")]
#[command(about = "Minimum-weight path search as a binary integer program", long_about = None)]
struct Cli {
    /// Log solver progress and enable backend console output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a graph file (.json, .yaml or .yml)
    Solve {
        /// Path to the graph document
        graph_path: PathBuf,
        #[command(flatten)]
        options: SolveOptions,
    },
    /// Solve the built-in ten-vertex sample graph
    Sample {
        #[command(flatten)]
        options: SolveOptions,
    },
    /// Validate a graph file without solving it
    Validate {
        /// Path to the graph document
        graph_path: PathBuf,
    },
    /// Write the built model (variables, constraints, objective) for debugging
    Dump {
        /// Path to the graph document
        graph_path: PathBuf,
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct SolveOptions {
    /// Solver backend; overrides the document's solver section
    #[arg(long, value_enum)]
    backend: Option<SolverBackend>,
    /// Time limit in seconds; overrides the document's solver section
    #[arg(long)]
    time_limit: Option<f64>,
    /// Cycle-elimination rounds before a degenerate solution is reported (0 = strict)
    #[arg(long)]
    max_cycle_cuts: Option<usize>,
    /// Also write the built model to this file
    #[arg(long)]
    dump: Option<PathBuf>,
    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    let outcome = match cli.command {
        Commands::Solve {
            graph_path,
            options,
        } => cmd_solve_file(&graph_path, &options, cli.verbose),
        Commands::Sample { options } => cmd_solve(sample_document(), &options, cli.verbose),
        Commands::Validate { graph_path } => cmd_validate(&graph_path),
        Commands::Dump { graph_path, output } => cmd_dump(&graph_path, output.as_deref()),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn cmd_solve_file(graph_path: &Path, options: &SolveOptions, verbose: bool) -> CliResult<()> {
    let doc = load_document(graph_path)?;
    cmd_solve(doc, options, verbose)
}

fn cmd_solve(doc: GraphDocument, options: &SolveOptions, verbose: bool) -> CliResult<()> {
    let config = solver_config(&doc, options, verbose)?;
    let graph = doc.into_graph()?;

    if let Some(path) = &options.dump {
        let model = ModelBuilder::new(&graph).build();
        fs::write(path, render_model(&model))?;
    }

    let solver = SolverFactory::create(&config)?;
    let service = ShortestPathService::new(solver, config);
    let solution = service.solve(&graph)?;

    match options.format {
        OutputFormat::Text => {
            println!("Solver: {}", service.solver_name());
            print!("{}", render_solution(&graph, &solution));
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&solution)?),
    }
    Ok(())
}

/// Defaults, then the document's solver section, then command-line flags.
fn solver_config(
    doc: &GraphDocument,
    options: &SolveOptions,
    verbose: bool,
) -> CliResult<SolverConfig> {
    let mut config = doc.solver_config(SolverConfig::default())?;
    config.verbose = verbose;
    if let Some(backend) = options.backend {
        config.backend = backend;
    }
    if let Some(secs) = options.time_limit {
        config.time_limit = Duration::try_from_secs_f64(secs)
            .map_err(|e| format!("invalid --time-limit {}: {}", secs, e))?;
    }
    if let Some(cuts) = options.max_cycle_cuts {
        config.max_cycle_cuts = cuts;
    }
    Ok(config)
}

fn cmd_validate(graph_path: &Path) -> CliResult<()> {
    println!("Validating graph: {}", graph_path.display());
    let doc = load_document(graph_path)?;
    doc.solver_config(SolverConfig::default())?;
    let graph = doc.into_graph()?;
    println!(
        "✓ Graph is valid: {} vertices, {} edges, {} -> {}",
        graph.num_vertices(),
        graph.num_edges(),
        graph.start(),
        graph.end()
    );
    let backends: Vec<String> = SolverFactory::available_backends()
        .iter()
        .map(ToString::to_string)
        .collect();
    println!("Solver backends: {}", backends.join(", "));
    Ok(())
}

fn cmd_dump(graph_path: &Path, output: Option<&Path>) -> CliResult<()> {
    let graph = load_document(graph_path)?.into_graph()?;
    let model = ModelBuilder::new(&graph).build();
    let dump = render_model(&model);

    match output {
        Some(path) => {
            fs::write(path, dump)?;
            println!("Model written to {}", path.display());
        }
        None => print!("{}", dump),
    }
    Ok(())
}
