use crate::utils::config::{
    DEFAULT_CACHE_STATS_PATH, DEFAULT_HIT_RATE_BAR_OUTPUT, DEFAULT_HIT_RATE_OUTPUT,
    DEFAULT_LAYOUT, DEFAULT_TIMER_AFTER_PATH, DEFAULT_TIMER_BEFORE_PATH, DEFAULT_TIMER_OUTPUT,
    DEFAULT_TTG_PREFIX, DEFAULT_VISITED_OUTPUT,
};
use std::fmt;
use std::path::PathBuf;

/// How the hit rate table is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartStyle {
    /// One curve per (cache size, prefetch) setting
    #[default]
    Line,
    /// Grouped bars per edge count
    Bar,
}

impl ChartStyle {
    /// Output file used when none is given
    pub fn default_output(&self) -> PathBuf {
        match self {
            ChartStyle::Line => PathBuf::from(DEFAULT_HIT_RATE_OUTPUT),
            ChartStyle::Bar => PathBuf::from(DEFAULT_HIT_RATE_BAR_OUTPUT),
        }
    }
}

impl fmt::Display for ChartStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartStyle::Line => f.write_str("line"),
            ChartStyle::Bar => f.write_str("bar"),
        }
    }
}

/// Arguments for the hit-rate and hit-rate-bar commands
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct HitRateArgs {
    /// Cache statistics JSON list
    pub input: PathBuf,

    /// Output PNG path
    pub output: PathBuf,

    /// Line curves or grouped bars
    pub style: ChartStyle,

    /// Print the aggregated table to stdout
    pub print_summary: bool,
}

impl Default for HitRateArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_CACHE_STATS_PATH),
            output: PathBuf::from(DEFAULT_HIT_RATE_OUTPUT),
            style: ChartStyle::Line,
            print_summary: false,
        }
    }
}

/// Arguments for the timer command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct TimerArgs {
    /// Timer records of the baseline build
    pub before: PathBuf,

    /// Timer records of the build under test
    pub after: PathBuf,

    /// Output PNG for the time comparison
    pub time_output: PathBuf,

    /// Output PNG for the visited node counts
    pub visited_output: PathBuf,

    /// Print both timing tables to stdout
    pub print_summary: bool,
}

impl Default for TimerArgs {
    fn default() -> Self {
        Self {
            before: PathBuf::from(DEFAULT_TIMER_BEFORE_PATH),
            after: PathBuf::from(DEFAULT_TIMER_AFTER_PATH),
            time_output: PathBuf::from(DEFAULT_TIMER_OUTPUT),
            visited_output: PathBuf::from(DEFAULT_VISITED_OUTPUT),
            print_summary: false,
        }
    }
}

/// Arguments for the ttg command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct TtgArgs {
    /// JSON list of walker trees
    pub input: PathBuf,

    /// Layout name (`dot`, `spring`, `circular`, `shell`, ...)
    pub layout: String,

    /// Directory receiving one PNG per tree
    pub output_dir: PathBuf,

    /// File name prefix, files are `<prefix>_<idx>.png`
    pub prefix: String,
}

impl Default for TtgArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            layout: DEFAULT_LAYOUT.to_string(),
            output_dir: PathBuf::from("."),
            prefix: DEFAULT_TTG_PREFIX.to_string(),
        }
    }
}

impl TtgArgs {
    /// Output path of the tree at `index`
    pub fn output_path(&self, index: usize) -> PathBuf {
        self.output_dir.join(format!("{}_{}.png", self.prefix, index))
    }
}

/// Arguments for the append command
#[derive(Debug, Clone, Default)]
pub struct AppendArgs {
    /// JSON list file to extend
    pub file: PathBuf,

    /// Item to append, as JSON text
    pub item: String,
}
