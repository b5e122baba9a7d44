//! Hit rate command implementation.
//!
//! The hit-rate command:
//! 1. Loads and de-duplicates cache statistics
//! 2. Aggregates hit rates per (cache size, prefetch, edge count)
//! 3. Draws the line or bar chart

use super::models::{ChartStyle, HitRateArgs};
use crate::aggregator::{aggregate_hit_rates, load_cache_stats};
use crate::chart::{plot_hit_rate_bars, plot_hit_rate_curves};
use crate::output::format_hit_rate_table;
use anyhow::{Context, Result};
use log::{debug, info};
use std::time::Instant;

/// Execute the hit-rate command
///
/// **Public** - main entry point called from main.rs
///
/// # Arguments
/// * `args` - Hit rate command arguments
///
/// # Errors
/// * Input file missing or not a JSON list of records
/// * Records lacking configuration or counter fields
/// * Chart drawing or file write errors
///
/// # Example
/// ```ignore
/// let args = HitRateArgs {
///     input: PathBuf::from("cache_stats.json"),
///     style: ChartStyle::Bar,
///     output: ChartStyle::Bar.default_output(),
///     ..Default::default()
/// };
///
/// execute_hit_rate(args)?;
/// ```
pub fn execute_hit_rate(args: HitRateArgs) -> Result<()> {
    let start_time = Instant::now();

    info!("Step 1/3: Loading cache statistics...");
    let records = load_cache_stats(&args.input).with_context(|| {
        format!("Failed to load cache statistics from {}", args.input.display())
    })?;

    info!("Step 2/3: Aggregating hit rates...");
    let rows = aggregate_hit_rates(&records).context("Failed to aggregate hit rates")?;
    debug!("Aggregated {} records into {} rows", records.len(), rows.len());

    info!("Step 3/3: Drawing {} chart...", args.style);
    match args.style {
        ChartStyle::Line => plot_hit_rate_curves(&rows, &args.output, None),
        ChartStyle::Bar => plot_hit_rate_bars(&rows, &args.output, None),
    }
    .context("Failed to draw hit rate chart")?;

    info!("✓ Chart written to: {}", args.output.display());

    if args.print_summary {
        println!("\n{}", "=".repeat(72));
        println!("CACHE HIT RATE SUMMARY");
        println!("{}", "=".repeat(72));
        println!("Input:   {}", args.input.display());
        println!("Records: {}", records.len());
        println!("\n{}", format_hit_rate_table(&rows));
    }

    info!("Hit rate chart completed in {:.2}s", start_time.elapsed().as_secs_f64());

    Ok(())
}

/// Validate hit rate arguments
///
/// **Public** - can be called before execute_hit_rate for early validation
pub fn validate_hit_rate_args(args: &HitRateArgs) -> Result<()> {
    if !args.input.exists() {
        anyhow::bail!("Could not find {}", args.input.display());
    }

    if args.output.as_os_str().is_empty() {
        anyhow::bail!("Output path cannot be empty");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    #[test]
    fn test_validate_missing_input() {
        let args = HitRateArgs {
            input: PathBuf::from("/nonexistent/cache_stats.json"),
            ..Default::default()
        };

        let err = validate_hit_rate_args(&args).unwrap_err();
        assert!(err.to_string().contains("Could not find /nonexistent/cache_stats.json"));
    }

    #[test]
    fn test_validate_existing_input() {
        let file = NamedTempFile::new().unwrap();
        let args = HitRateArgs {
            input: file.path().to_path_buf(),
            ..Default::default()
        };

        assert!(validate_hit_rate_args(&args).is_ok());
    }

    #[test]
    fn test_execute_reports_missing_fields() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"[{{"cache_size": 10}}]"#).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let args = HitRateArgs {
            input: file.path().to_path_buf(),
            output: dir.path().join("out.png"),
            ..Default::default()
        };

        let err = execute_hit_rate(args).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to load cache statistics"));
    }
}
