//! Bench Viz CLI
//!
//! Turns benchmark JSON output into PNG charts and walker graph drawings.

use anyhow::Result;
use bench_viz::commands::{
    execute_append, execute_hit_rate, execute_timer, execute_ttg, validate_hit_rate_args,
    validate_timer_args, validate_ttg_args, AppendArgs, ChartStyle, HitRateArgs, TimerArgs,
    TtgArgs,
};
use bench_viz::utils::config::{
    DEFAULT_CACHE_STATS_PATH, DEFAULT_LAYOUT, DEFAULT_TIMER_AFTER_PATH,
    DEFAULT_TIMER_BEFORE_PATH, DEFAULT_TIMER_OUTPUT, DEFAULT_TTG_PREFIX, DEFAULT_VISITED_OUTPUT,
};
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

/// Bench Viz - charts for cache, timing and walker benchmarks
#[derive(Parser, Debug)]
#[command(name = "bench-viz")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Line chart of cache hit rate vs edge count
    HitRate {
        /// Cache statistics JSON list
        #[arg(default_value = DEFAULT_CACHE_STATS_PATH)]
        input: PathBuf,

        /// Output PNG path [default: cache_hit_rate.png]
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the aggregated table to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Grouped bar chart of cache hit rate vs edge count
    HitRateBar {
        /// Cache statistics JSON list
        #[arg(default_value = DEFAULT_CACHE_STATS_PATH)]
        input: PathBuf,

        /// Output PNG path [default: cache_hit_rate_bar.png]
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the aggregated table to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Compare TTG generation time before/after against traversal time
    Timer {
        /// Timer records of the baseline build
        #[arg(long, default_value = DEFAULT_TIMER_BEFORE_PATH)]
        before: PathBuf,

        /// Timer records of the build under test
        #[arg(long, default_value = DEFAULT_TIMER_AFTER_PATH)]
        after: PathBuf,

        /// Output PNG for the time comparison
        #[arg(long, default_value = DEFAULT_TIMER_OUTPUT)]
        time_output: PathBuf,

        /// Output PNG for the visited node counts
        #[arg(long, default_value = DEFAULT_VISITED_OUTPUT)]
        visited_output: PathBuf,

        /// Print the timing tables to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Draw every walker tree of a file as a graph
    Ttg {
        /// JSON list of walker trees
        input: PathBuf,

        /// Layout: dot, spring, neato, kamada_kawai, circular, shell, twopi
        #[arg(short, long, default_value = DEFAULT_LAYOUT)]
        layout: String,

        /// Directory receiving the images
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// File name prefix, files are <PREFIX>_<idx>.png
        #[arg(long, default_value = DEFAULT_TTG_PREFIX)]
        prefix: String,
    },

    /// Append a JSON item to a JSON list file
    Append {
        /// JSON list file, created when missing
        file: PathBuf,

        /// Item to append, as JSON text
        item: String,
    },
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::HitRate {
            input,
            output,
            summary,
        } => run_hit_rate(input, output, summary, ChartStyle::Line)?,

        Commands::HitRateBar {
            input,
            output,
            summary,
        } => run_hit_rate(input, output, summary, ChartStyle::Bar)?,

        Commands::Timer {
            before,
            after,
            time_output,
            visited_output,
            summary,
        } => {
            let args = TimerArgs {
                before,
                after,
                time_output,
                visited_output,
                print_summary: summary,
            };

            validate_timer_args(&args)?;
            execute_timer(args)?;
        }

        Commands::Ttg {
            input,
            layout,
            output_dir,
            prefix,
        } => {
            let args = TtgArgs {
                input,
                layout,
                output_dir,
                prefix,
            };

            validate_ttg_args(&args)?;
            execute_ttg(args)?;
        }

        Commands::Append { file, item } => {
            execute_append(AppendArgs { file, item })?;
        }
    }

    Ok(())
}

/// Shared body of the two hit rate commands
///
/// **Private** - internal command dispatch
fn run_hit_rate(
    input: PathBuf,
    output: Option<PathBuf>,
    summary: bool,
    style: ChartStyle,
) -> Result<()> {
    let args = HitRateArgs {
        input,
        output: output.unwrap_or_else(|| style.default_output()),
        style,
        print_summary: summary,
    };

    validate_hit_rate_args(&args)?;
    execute_hit_rate(args)
}
