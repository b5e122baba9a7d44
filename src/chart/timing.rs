//! TTG generation time vs walker traversal time charts.

use super::{drawing_error, padded_range, y_upper, ChartConfig};
use crate::aggregator::TimingRow;
use crate::output::{check_extension, prepare_output_path};
use crate::utils::config::LINE_CHART_SIZE;
use crate::utils::error::RenderError;
use log::info;
use plotters::prelude::*;
use std::path::Path;

/// A labelled line of (edge count, value) points
struct Line {
    label: &'static str,
    points: Vec<(f64, f64)>,
}

/// Extract (edge count, value) points from timing rows
///
/// # Errors
/// * `RenderError::NonNumeric` - an edge count is not a number
pub fn timing_points(
    rows: &[TimingRow],
    value: impl Fn(&TimingRow) -> f64,
) -> Result<Vec<(f64, f64)>, RenderError> {
    rows.iter()
        .map(|row| {
            row.edge_count
                .as_f64()
                .map(|x| (x, value(row)))
                .ok_or_else(|| RenderError::NonNumeric(row.edge_count.to_string()))
        })
        .collect()
}

/// Plot average TTG time (after and before) and traversal time vs edge count
///
/// **Public** - first chart of the `timer` command
pub fn plot_avg_times(
    after: &[TimingRow],
    before: &[TimingRow],
    output_path: impl AsRef<Path>,
    config: Option<&ChartConfig>,
) -> Result<(), RenderError> {
    let config = config.cloned().unwrap_or_else(|| {
        ChartConfig::new(
            "TTG Generation Time vs Traversal Time by Graph Density",
            LINE_CHART_SIZE,
        )
    });

    let lines = vec![
        Line {
            label: "Average TTG Time (After)",
            points: timing_points(after, |r| r.avg_ttg_time)?,
        },
        Line {
            label: "Average TTG Time (Before)",
            points: timing_points(before, |r| r.avg_ttg_time)?,
        },
        Line {
            label: "Average Walker Traversal Time",
            points: timing_points(after, |r| r.avg_traversal_time)?,
        },
    ];

    draw_lines(&lines, output_path.as_ref(), &config, "Time (seconds)")
}

/// Plot average visited node counts of TTG and traversal vs edge count
///
/// **Public** - second chart of the `timer` command
pub fn plot_avg_visited(
    rows: &[TimingRow],
    output_path: impl AsRef<Path>,
    config: Option<&ChartConfig>,
) -> Result<(), RenderError> {
    let config = config.cloned().unwrap_or_else(|| {
        ChartConfig::new(
            "TTG vs Traversal: Average Nodes Visited by Graph Density",
            LINE_CHART_SIZE,
        )
    });

    let lines = vec![
        Line {
            label: "Average TTG Visited Nodes",
            points: timing_points(rows, |r| r.avg_ttg_visited)?,
        },
        Line {
            label: "Average Traversal Visited Nodes",
            points: timing_points(rows, |r| r.avg_traversal_visited)?,
        },
    ];

    draw_lines(&lines, output_path.as_ref(), &config, "Visited Node Count")
}

fn draw_lines(
    lines: &[Line],
    output_path: &Path,
    config: &ChartConfig,
    y_desc: &str,
) -> Result<(), RenderError> {
    let x_range = padded_range(lines.iter().flat_map(|l| l.points.iter().map(|p| p.0)))
        .ok_or_else(|| RenderError::EmptyData("timing table has no rows".to_string()))?;
    let y_max = y_upper(lines.iter().flat_map(|l| l.points.iter().map(|p| p.1)));

    prepare_output_path(output_path)?;
    check_extension(output_path, "png");
    info!("Drawing {} to: {}", config.title, output_path.display());

    let root = BitMapBackend::new(output_path, config.size).into_drawing_area();
    root.fill(&WHITE).map_err(drawing_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&config.title, ("sans-serif", 26).into_font())
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range, 0f64..y_max)
        .map_err(drawing_error)?;

    chart
        .configure_mesh()
        .x_desc("Number of Edges")
        .y_desc(y_desc)
        .draw()
        .map_err(drawing_error)?;

    for (i, line) in lines.iter().enumerate() {
        let color = Palette99::pick(i).to_rgba();
        chart
            .draw_series(LineSeries::new(line.points.iter().copied(), color.stroke_width(2)))
            .map_err(drawing_error)?
            .label(line.label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        chart
            .draw_series(line.points.iter().map(|&p| Circle::new(p, 4, color.filled())))
            .map_err(drawing_error)?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(drawing_error)?;

    root.present().map_err(drawing_error)?;

    info!("Saved plot to {}", output_path.display());
    Ok(())
}
