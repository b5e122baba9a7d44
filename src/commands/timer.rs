//! Timer command implementation.
//!
//! The timer command:
//! 1. Loads the before and after timer records
//! 2. Derives durations and averages them per edge count
//! 3. Draws the time comparison chart
//! 4. Draws the visited node chart for the after build

use super::models::TimerArgs;
use crate::aggregator::{compute_avg_times, load_timer_records, TimingRow};
use crate::chart::{plot_avg_times, plot_avg_visited};
use crate::output::format_timing_table;
use anyhow::{Context, Result};
use log::{debug, info};
use std::path::Path;
use std::time::Instant;

/// Execute the timer command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Either timer file missing or malformed
/// * Records lacking timestamp or visited count fields
/// * Chart drawing or file write errors
pub fn execute_timer(args: TimerArgs) -> Result<()> {
    let start_time = Instant::now();

    info!("Step 1/4: Loading timer records...");
    let after = averaged(&args.after)?;
    let before = averaged(&args.before)?;

    info!("Step 2/4: Averaged {} after / {} before edge counts", after.len(), before.len());

    info!("Step 3/4: Drawing time comparison...");
    plot_avg_times(&after, &before, &args.time_output, None)
        .context("Failed to draw time comparison chart")?;
    info!("✓ Time chart written to: {}", args.time_output.display());

    info!("Step 4/4: Drawing visited node counts...");
    plot_avg_visited(&after, &args.visited_output, None)
        .context("Failed to draw visited node chart")?;
    info!("✓ Visited chart written to: {}", args.visited_output.display());

    if args.print_summary {
        print_summary(&args, &after, &before);
    }

    info!("Timer charts completed in {:.2}s", start_time.elapsed().as_secs_f64());

    Ok(())
}

/// Load one timer file and average it per edge count
///
/// **Private** - internal helper for execute_timer
fn averaged(path: &Path) -> Result<Vec<TimingRow>> {
    let records = load_timer_records(path)
        .with_context(|| format!("Failed to load timer records from {}", path.display()))?;

    let rows = compute_avg_times(&records)
        .with_context(|| format!("Failed to average timer records from {}", path.display()))?;

    debug!("{}: {} records -> {} rows", path.display(), records.len(), rows.len());
    Ok(rows)
}

fn print_summary(args: &TimerArgs, after: &[TimingRow], before: &[TimingRow]) {
    println!("\n{}", "=".repeat(75));
    println!("TIMER SUMMARY");
    println!("{}", "=".repeat(75));
    println!("After:  {}", args.after.display());
    println!("\n{}", format_timing_table(after));
    println!("Before: {}", args.before.display());
    println!("\n{}", format_timing_table(before));
}

/// Validate timer arguments
///
/// **Public** - can be called before execute_timer for early validation
pub fn validate_timer_args(args: &TimerArgs) -> Result<()> {
    for path in [&args.before, &args.after] {
        if !path.exists() {
            anyhow::bail!("Could not find {}", path.display());
        }
    }

    if args.time_output == args.visited_output {
        anyhow::bail!(
            "Time and visited charts cannot share one output path ({})",
            args.time_output.display()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    #[test]
    fn test_validate_missing_before() {
        let after = NamedTempFile::new().unwrap();
        let args = TimerArgs {
            before: PathBuf::from("/nonexistent/old/timer.json"),
            after: after.path().to_path_buf(),
            ..Default::default()
        };

        let err = validate_timer_args(&args).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/old/timer.json"));
    }

    #[test]
    fn test_validate_same_outputs() {
        let before = NamedTempFile::new().unwrap();
        let after = NamedTempFile::new().unwrap();
        let args = TimerArgs {
            before: before.path().to_path_buf(),
            after: after.path().to_path_buf(),
            time_output: PathBuf::from("plot.png"),
            visited_output: PathBuf::from("plot.png"),
            ..Default::default()
        };

        assert!(validate_timer_args(&args).is_err());
    }

    #[test]
    fn test_validate_ok() {
        let before = NamedTempFile::new().unwrap();
        let after = NamedTempFile::new().unwrap();
        let args = TimerArgs {
            before: before.path().to_path_buf(),
            after: after.path().to_path_buf(),
            ..Default::default()
        };

        assert!(validate_timer_args(&args).is_ok());
    }
}
