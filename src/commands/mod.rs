//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod append;
pub mod hit_rate;
pub mod models;
pub mod timer;
pub mod ttg;

// Re-export main command functions
pub use append::execute_append;
pub use hit_rate::{execute_hit_rate, validate_hit_rate_args};
pub use models::{AppendArgs, ChartStyle, HitRateArgs, TimerArgs, TtgArgs};
pub use timer::{execute_timer, validate_timer_args};
pub use ttg::{execute_ttg, validate_ttg_args};
