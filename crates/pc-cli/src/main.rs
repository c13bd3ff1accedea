//! CLI frontend for POV Count: word statistics per character across a
//! narrative work.

mod commands;
mod config;
mod tui;

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use pc_core::{ChapterSpec, ChartKind};

use config::{Overrides, Settings};

#[derive(Parser)]
#[command(
    name = "povcount",
    about = "POV Count — charts of words per character across scenes",
    version,
    propagate_version = true
)]
struct Cli {
    /// Character lookup table (`alias;canonical name` per line)
    #[arg(long, global = true)]
    lookup: Option<PathBuf>,

    /// Scene log (`chapter;pov;featured,...;words` per line)
    #[arg(long, global = true)]
    scenes: Option<PathBuf>,

    /// Config file (default: ./povcount.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Disable coloured output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by chart-producing commands.
#[derive(Args)]
struct ChartArgs {
    /// Chart kind: pie, bar or stacked-bar
    #[arg(short, long)]
    kind: ChartKind,

    /// Chapters: "5", "1-4", "1,3,7" or "all"
    #[arg(short, long, default_value = "all")]
    chapters: ChapterSpec,

    /// Chart title (omit for no title)
    #[arg(short, long)]
    title: Option<String>,

    /// Count alternate identities separately from their character
    #[arg(short, long)]
    alternate: bool,

    /// Count only point-of-view characters
    #[arg(short, long)]
    pov_only: bool,

    /// Number of characters to display (default: 10 or the config value)
    #[arg(short = 'n', long)]
    count: Option<usize>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Terminal,
    Svg,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw one chart and exit
    Chart {
        #[command(flatten)]
        chart: ChartArgs,

        /// Output format (default: from the --output extension, else terminal)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Answer prompts to draw charts until you type "quit"
    Interactive {
        /// Also write each chart as SVG into this directory
        #[arg(long)]
        svg_dir: Option<PathBuf>,
    },

    /// Validate both input files and print a summary
    Check,

    /// List characters with their aliases and word totals
    Characters,

    /// Show a chart in a full-screen terminal view
    View {
        #[command(flatten)]
        chart: ChartArgs,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();
}

fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);
    if cli.no_color {
        colored::control::set_override(false);
    }

    let result = Settings::resolve(&Overrides {
        config: cli.config.as_deref(),
        lookup: cli.lookup.as_deref(),
        scenes: cli.scenes.as_deref(),
    })
    .and_then(|settings| match cli.command {
        Commands::Chart {
            chart,
            format,
            output,
        } => commands::chart::run(&settings, &chart, format, output.as_deref()),
        Commands::Interactive { svg_dir } => {
            commands::interactive::run(&settings, svg_dir.as_deref())
        }
        Commands::Check => commands::check::run(&settings),
        Commands::Characters => commands::characters::run(&settings),
        Commands::View { chart } => commands::load_corpus(&settings).and_then(|corpus| {
            let chart = corpus
                .chart(&commands::request(&settings, &chart))
                .map_err(|e| e.to_string())?;
            tui::run(&chart, &settings.style)
        }),
    });

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
