mod commands;
mod config;
mod logging;
mod render;
mod reveal;
mod session;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Lucky Select: draw a random hero for your preferred lanes.
#[derive(Parser)]
#[command(
    name = "lucky",
    version,
    about = "Lucky Select hero lottery: pick lanes, ban heroes, spin the reels"
)]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Log debug details to stderr
    #[arg(long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Path to a lucky.toml config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding persisted history (overrides storage.data_dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw a hero and spin the reels
    Spin {
        /// Preferred lane (top, jungle, mid, adc, support); repeatable. Default: any lane
        #[arg(long = "role", short = 'r')]
        roles: Vec<String>,
        /// Hero to exclude from this draw; repeatable
        #[arg(long = "ban", short = 'b')]
        bans: Vec<String>,
        /// Seed the random source for a reproducible draw
        #[arg(long)]
        seed: Option<u64>,
        /// Skip the reel animation timings
        #[arg(long)]
        instant: bool,
    },

    /// Show past draws, newest first
    History {
        /// Show at most this many entries
        #[arg(long)]
        limit: Option<usize>,
    },

    /// List catalog heroes
    Heroes {
        /// Only heroes playing this lane
        #[arg(long, short = 'r')]
        role: Option<String>,
        /// Only heroes whose name contains this text
        #[arg(long, short = 's', default_value = "")]
        search: String,
    },

    /// List the lanes and how many heroes play each
    Roles,

    /// Start an interactive lottery session
    Play {
        /// Seed the random source for reproducible draws
        #[arg(long)]
        seed: Option<u64>,
        /// Skip the reel animation timings
        #[arg(long)]
        instant: bool,
    },
}

/// Options every command shares.
#[derive(Debug, Clone)]
pub(crate) struct GlobalOptions {
    pub(crate) output: OutputFormat,
    pub(crate) quiet: bool,
    pub(crate) config: Option<PathBuf>,
    pub(crate) data_dir: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.quiet, cli.verbose);

    let opts = GlobalOptions {
        output: cli.output,
        quiet: cli.quiet,
        config: cli.config,
        data_dir: cli.data_dir,
    };

    match cli.command {
        Commands::Spin {
            roles,
            bans,
            seed,
            instant,
        } => {
            commands::spin::cmd_spin(&roles, &bans, seed, instant, &opts);
        }
        Commands::History { limit } => {
            commands::history::cmd_history(limit, &opts);
        }
        Commands::Heroes { role, search } => {
            commands::heroes::cmd_heroes(role.as_deref(), &search, &opts);
        }
        Commands::Roles => {
            commands::heroes::cmd_roles(&opts);
        }
        Commands::Play { seed, instant } => {
            commands::play::cmd_play(seed, instant, &opts);
        }
    }
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}

/// Report `msg` and exit with status 1.
pub(crate) fn fail(msg: &str, opts: &GlobalOptions) -> ! {
    report_error(msg, opts.output, opts.quiet);
    process::exit(1);
}
