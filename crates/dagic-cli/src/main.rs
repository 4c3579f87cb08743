mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use dagic_core::Config;

#[derive(Parser)]
#[command(name = "dagic")]
#[command(about = "Information content and MICA similarity over ontology DAGs", long_about = None)]
struct Cli {
    /// Config file (default: ./dagic.toml, then ~/.config/dagic/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Graph format (json or graphml) for files without a .json, .graphml or .xml extension
    #[arg(long, global = true)]
    format: Option<String>,

    /// Root term id, overriding automatic root detection
    #[arg(long, global = true)]
    root: Option<String>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute descendant counts and information content
    Compute {
        /// Input graph file
        #[arg(short, long = "input", visible_alias = "i")]
        input: PathBuf,
        /// Write the annotated graph here
        #[arg(short, long = "output", visible_alias = "o")]
        output: Option<PathBuf>,
    },
    /// Print id, name, descendant count and information content per term
    Show {
        /// Input graph file
        #[arg(short, long = "input", visible_alias = "i")]
        input: PathBuf,
        /// Only these term ids (comma-separated)
        #[arg(long, value_delimiter = ',')]
        ids: Vec<String>,
    },
    /// Find the most informative common ancestor of two terms
    Mica {
        /// Input graph file
        #[arg(short, long = "input", visible_alias = "i")]
        input: PathBuf,
        /// First term id
        a: String,
        /// Second term id
        b: String,
        /// Start the search from this common ancestor instead of the root
        #[arg(long)]
        from: Option<String>,
    },
    /// Stream the pairwise similarity table as TSV
    Matrix {
        /// Input graph file
        #[arg(short, long = "input", visible_alias = "i")]
        input: PathBuf,
        /// Output file (default: stdout)
        #[arg(short, long = "output", visible_alias = "o")]
        output: Option<PathBuf>,
        /// Only pairs with this term as node A
        #[arg(long)]
        node: Option<String>,
        /// Skip this many terms before starting
        #[arg(long, default_value_t = 0)]
        skip: usize,
        /// Process at most this many terms
        #[arg(long)]
        nmax: Option<usize>,
        /// Also emit pairs with zero similarity
        #[arg(long)]
        include_zero: bool,
        /// Decimal places for the similarity column
        #[arg(long)]
        precision: Option<usize>,
    },
    /// Download a graph file over HTTP
    Fetch {
        /// URL to download
        url: String,
        /// Destination file
        #[arg(short, long = "output", visible_alias = "o")]
        output: PathBuf,
    },
    /// Print the effective configuration as TOML
    Config,
}

fn init_logging(config: &Config, verbose: u8, quiet: bool) {
    let default_filter = if quiet {
        "warn".to_string()
    } else {
        match verbose {
            0 => config.log.level.clone(),
            1 => "debug".to_string(),
            _ => "trace".to_string(),
        }
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };
    if let Some(format) = cli.format {
        config.graph.format = format;
    }
    if let Some(root) = cli.root {
        config.graph.root = Some(root);
    }

    init_logging(&config, cli.verbose, cli.quiet);

    match cli.command {
        Commands::Compute { input, output } => commands::compute(&config, &input, output.as_deref()),
        Commands::Show { input, ids } => commands::show(&config, &input, &ids),
        Commands::Mica { input, a, b, from } => commands::mica(&config, &input, &a, &b, from.as_deref()),
        Commands::Matrix {
            input,
            output,
            node,
            skip,
            nmax,
            include_zero,
            precision,
        } => {
            let mut options = config.matrix.to_options();
            options.node = node;
            options.skip = skip;
            options.nmax = nmax;
            options.include_zero |= include_zero;
            if precision.is_some() {
                options.precision = precision;
            }
            commands::matrix(&config, &input, output.as_deref(), options, cli.quiet)
        }
        Commands::Fetch { url, output } => commands::fetch(&config, &url, &output).await,
        Commands::Config => {
            print!("{}", commands::config_string(&config)?);
            Ok(())
        }
    }
}
