mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "adflow",
    about = "Publication action items: what needs doing across a publication's ad orders",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .adflow/)
    #[arg(long, global = true, env = "ADFLOW_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive the action items for a publication, most urgent first
    Items {
        /// Publication to load from the data directory (filters --snapshot when both are given)
        #[arg(long)]
        publication: Option<String>,

        /// Read a serialized snapshot (JSON or YAML) instead of the data directory
        #[arg(long)]
        snapshot: Option<PathBuf>,

        /// Evaluate as of this date or RFC 3339 timestamp (default: now)
        #[arg(long)]
        now: Option<String>,

        /// Show at most this many items
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show how one placement of an order was classified
    Explain {
        order: String,
        placement: String,

        #[arg(long)]
        publication: Option<String>,

        #[arg(long)]
        snapshot: Option<PathBuf>,

        #[arg(long)]
        now: Option<String>,
    },

    /// Print the order and placement rule tables in evaluation order
    Rules,

    /// Show or validate .adflow/config.yaml
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Items {
            publication,
            snapshot,
            now,
            limit,
        } => cmd::items::run(
            &root,
            cmd::Input {
                publication: publication.as_deref(),
                snapshot: snapshot.as_deref(),
                now: now.as_deref(),
            },
            limit,
            cli.json,
        ),
        Commands::Explain {
            order,
            placement,
            publication,
            snapshot,
            now,
        } => cmd::explain::run(
            &root,
            cmd::Input {
                publication: publication.as_deref(),
                snapshot: snapshot.as_deref(),
                now: now.as_deref(),
            },
            &order,
            &placement,
            cli.json,
        ),
        Commands::Rules => cmd::rules::run(cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
