//! Configuration and constants for the CLI.

/// Default cache statistics input
pub const DEFAULT_CACHE_STATS_PATH: &str = "cache_stats.json";

/// Default output of the hit rate line chart
pub const DEFAULT_HIT_RATE_OUTPUT: &str = "cache_hit_rate.png";

/// Default output of the grouped hit rate bar chart
pub const DEFAULT_HIT_RATE_BAR_OUTPUT: &str = "cache_hit_rate_bar.png";

// Timer inputs: "before" and "after" runs of the same benchmark
pub const DEFAULT_TIMER_BEFORE_PATH: &str = "old/timer.json";
pub const DEFAULT_TIMER_AFTER_PATH: &str = "new/timer.json";
pub const DEFAULT_TIMER_OUTPUT: &str = "timer_plot.png";
pub const DEFAULT_VISITED_OUTPUT: &str = "visited_plot.png";

/// Layout used when none is requested
pub const DEFAULT_LAYOUT: &str = "dot";

/// File name prefix of rendered walker graphs (`TTG_0.png`, `TTG_1.png`, ...)
pub const DEFAULT_TTG_PREFIX: &str = "TTG";

// Field names in benchmark records
pub const NODE_NUM_FIELD: &str = "JAC_NODE_NUM";
pub const EDGE_NUM_FIELD: &str = "JAC_EDGE_NUM";
pub const TWEET_NUM_FIELD: &str = "JAC_TWEET_NUM";
pub const PREFETCH_FIELD: &str = "jac_prefetch";
pub const CACHE_SIZE_FIELD: &str = "cache_size";
pub const HIT_FIELD: &str = "hit";
pub const TOTAL_ACCESS_FIELD: &str = "total_acc";
pub const HIT_RATE_FIELD: &str = "hit_rate";

pub const TTG_START_FIELD: &str = "ttg_start_time";
pub const TTG_END_FIELD: &str = "ttg_end_time";
pub const TRAVERSAL_START_FIELD: &str = "traversal_start_time";
pub const TRAVERSAL_END_FIELD: &str = "traversal_end_time";
pub const TTG_VISITED_FIELD: &str = "ttg_visited_num";
pub const TRAVERSAL_VISITED_FIELD: &str = "traversal_visited_num";
pub const TTG_TIME_FIELD: &str = "ttg_time";
pub const TRAVERSAL_TIME_FIELD: &str = "traversal_time";
pub const TOTAL_TIME_FIELD: &str = "total_time";

/// Full configuration key of one cache benchmark run
pub const CACHE_DEDUP_FIELDS: &[&str] = &[
    NODE_NUM_FIELD,
    EDGE_NUM_FIELD,
    TWEET_NUM_FIELD,
    PREFETCH_FIELD,
    CACHE_SIZE_FIELD,
];

/// Grouping key of the hit rate table
pub const HIT_RATE_GROUP_FIELDS: &[&str] = &[CACHE_SIZE_FIELD, PREFETCH_FIELD, EDGE_NUM_FIELD];

/// Grouping key of the timing table
pub const TIMING_GROUP_FIELDS: &[&str] = &[EDGE_NUM_FIELD];

/// Group keys are tuples of at most this many fields
pub const MAX_GROUP_KEY_FIELDS: usize = 5;

// Chart sizes in pixels
pub const LINE_CHART_SIZE: (u32, u32) = (1000, 600);
pub const BAR_CHART_SIZE: (u32, u32) = (1200, 600);
pub const GRAPH_CHART_SIZE: (u32, u32) = (1200, 800);

/// Fruchterman-Reingold iterations for the force-directed layout
pub const FORCE_LAYOUT_ITERATIONS: usize = 50;
