//! Hit rate charts: line curves and grouped bars.
//!
//! One series per (cache size, prefetch) setting. Colour follows the cache
//! size; prefetch-enabled series use triangle markers (line chart) or a
//! lighter fill (bar chart).

use super::{drawing_error, padded_range, y_upper, ChartConfig};
use crate::aggregator::HitRateRow;
use crate::output::{check_extension, prepare_output_path};
use crate::parser::KeyValue;
use crate::utils::config::{BAR_CHART_SIZE, LINE_CHART_SIZE};
use crate::utils::error::RenderError;
use log::{debug, info};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::collections::BTreeMap;
use std::path::Path;

/// One point of a hit rate series
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub edge_count: KeyValue,
    pub hit_rate: f64,
}

/// Hit rate curve of one (cache size, prefetch) setting
#[derive(Debug, Clone, PartialEq)]
pub struct HitRateSeries {
    pub cache_size: KeyValue,
    pub prefetch: KeyValue,

    /// Rank of the cache size among all cache sizes, used to pick a colour
    pub color_index: usize,

    /// Points ordered by edge count
    pub points: Vec<SeriesPoint>,
}

impl HitRateSeries {
    pub fn prefetch_enabled(&self) -> bool {
        self.prefetch.is_truthy()
    }

    pub fn label(&self) -> String {
        let status = if self.prefetch_enabled() { "enabled" } else { "disabled" };
        format!("cache={}, prefetch {}", self.cache_size, status)
    }

    fn color(&self) -> RGBAColor {
        Palette99::pick(self.color_index).to_rgba()
    }
}

/// Split aggregated rows into one series per (cache size, prefetch)
///
/// Series come out ordered by cache size, then prefetch flag.
pub fn hit_rate_series(rows: &[HitRateRow]) -> Vec<HitRateSeries> {
    let mut grouped: BTreeMap<(KeyValue, KeyValue), Vec<SeriesPoint>> = BTreeMap::new();
    for row in rows {
        grouped
            .entry((row.cache_size.clone(), row.prefetch.clone()))
            .or_default()
            .push(SeriesPoint {
                edge_count: row.edge_count.clone(),
                hit_rate: row.hit_rate,
            });
    }

    let mut cache_sizes: Vec<&KeyValue> = rows.iter().map(|r| &r.cache_size).collect();
    cache_sizes.sort();
    cache_sizes.dedup();

    grouped
        .into_iter()
        .map(|((cache_size, prefetch), mut points)| {
            points.sort_by(|a, b| a.edge_count.cmp(&b.edge_count));
            let color_index = cache_sizes
                .iter()
                .position(|size| **size == cache_size)
                .unwrap_or(0);
            HitRateSeries {
                cache_size,
                prefetch,
                color_index,
                points,
            }
        })
        .collect()
}

/// One bar of the grouped bar chart, in category-axis units
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    /// Index into the series list
    pub series: usize,
    pub x0: f64,
    pub x1: f64,
    pub value: f64,
}

/// Bar positions for a grouped bar chart
#[derive(Debug, Clone, PartialEq)]
pub struct BarLayout {
    /// Distinct edge counts, one slot each, ascending
    pub categories: Vec<KeyValue>,
    pub bar_width: f64,
    pub bars: Vec<Bar>,
}

/// Lay out grouped bars: slot `i` spans `i - 0.4 .. i + 0.4`, shared
/// evenly by all series
pub fn bar_layout(series: &[HitRateSeries]) -> BarLayout {
    let mut categories: Vec<KeyValue> = series
        .iter()
        .flat_map(|s| s.points.iter().map(|p| p.edge_count.clone()))
        .collect();
    categories.sort();
    categories.dedup();

    let bar_width = if series.is_empty() { 0.8 } else { 0.8 / series.len() as f64 };

    let mut bars = Vec::new();
    for (index, s) in series.iter().enumerate() {
        for point in &s.points {
            let slot = categories
                .binary_search(&point.edge_count)
                .unwrap_or_default() as f64;
            let x0 = slot - 0.4 + index as f64 * bar_width;
            bars.push(Bar {
                series: index,
                x0,
                x1: x0 + bar_width,
                value: point.hit_rate,
            });
        }
    }

    BarLayout {
        categories,
        bar_width,
        bars,
    }
}

fn default_line_config() -> ChartConfig {
    ChartConfig::new("Cache Hit Rate vs Edge Count", LINE_CHART_SIZE)
}

fn default_bar_config() -> ChartConfig {
    ChartConfig::new("Cache Hit Rate vs Edge Count", BAR_CHART_SIZE)
}

/// Plot hit rate vs edge count, one line per (cache_size, jac_prefetch)
///
/// **Public** - renderer behind `hit-rate`
///
/// # Errors
/// * `RenderError::EmptyData` - no rows
/// * `RenderError::NonNumeric` - an edge count is not a number
/// * `RenderError::Output` - output path invalid
/// * `RenderError::Drawing` - backend failure
pub fn plot_hit_rate_curves(
    rows: &[HitRateRow],
    output_path: impl AsRef<Path>,
    config: Option<&ChartConfig>,
) -> Result<(), RenderError> {
    let output_path = output_path.as_ref();
    let config = config.cloned().unwrap_or_else(default_line_config);

    let series = hit_rate_series(rows);
    if series.is_empty() {
        return Err(RenderError::EmptyData("hit rate table has no rows".to_string()));
    }

    // Resolve numeric x values up front so a bad edge count fails before drawing
    let mut lines: Vec<(&HitRateSeries, Vec<(f64, f64)>)> = Vec::with_capacity(series.len());
    for s in &series {
        let points = s
            .points
            .iter()
            .map(|p| {
                p.edge_count
                    .as_f64()
                    .map(|x| (x, p.hit_rate))
                    .ok_or_else(|| RenderError::NonNumeric(p.edge_count.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        lines.push((s, points));
    }

    let x_range = padded_range(lines.iter().flat_map(|(_, pts)| pts.iter().map(|p| p.0)))
        .ok_or_else(|| RenderError::EmptyData("hit rate table has no points".to_string()))?;
    let y_max = y_upper(lines.iter().flat_map(|(_, pts)| pts.iter().map(|p| p.1)));

    prepare_output_path(output_path)?;
    check_extension(output_path, "png");
    info!("Drawing hit rate curves ({} series) to: {}", series.len(), output_path.display());

    let root = BitMapBackend::new(output_path, config.size).into_drawing_area();
    root.fill(&WHITE).map_err(drawing_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&config.title, ("sans-serif", 28).into_font())
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range, 0f64..y_max)
        .map_err(drawing_error)?;

    chart
        .configure_mesh()
        .x_desc("Edge Count (JAC_EDGE_NUM)")
        .y_desc("Hit Rate")
        .y_label_formatter(&|y| format!("{:.0}%", y * 100.0))
        .draw()
        .map_err(drawing_error)?;

    for (s, points) in &lines {
        let color = s.color();
        debug!("Series {}: {} points", s.label(), points.len());

        chart
            .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))
            .map_err(drawing_error)?
            .label(s.label())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));

        if s.prefetch_enabled() {
            chart
                .draw_series(points.iter().map(|&p| TriangleMarker::new(p, 6, color.filled())))
                .map_err(drawing_error)?;
        } else {
            chart
                .draw_series(points.iter().map(|&p| Circle::new(p, 4, color.filled())))
                .map_err(drawing_error)?;
        }
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(drawing_error)?;

    root.present().map_err(drawing_error)?;

    info!("Saved plot to {}", output_path.display());
    Ok(())
}

/// Plot hit rate vs edge count as grouped bars
///
/// **Public** - renderer behind `hit-rate-bar`
pub fn plot_hit_rate_bars(
    rows: &[HitRateRow],
    output_path: impl AsRef<Path>,
    config: Option<&ChartConfig>,
) -> Result<(), RenderError> {
    let output_path = output_path.as_ref();
    let config = config.cloned().unwrap_or_else(default_bar_config);

    let series = hit_rate_series(rows);
    if series.is_empty() {
        return Err(RenderError::EmptyData("hit rate table has no rows".to_string()));
    }
    let layout = bar_layout(&series);
    let slots = layout.categories.len() as f64;
    let y_max = y_upper(layout.bars.iter().map(|b| b.value));

    prepare_output_path(output_path)?;
    check_extension(output_path, "png");
    info!(
        "Drawing hit rate bars ({} series x {} edge counts) to: {}",
        series.len(),
        layout.categories.len(),
        output_path.display()
    );

    let root = BitMapBackend::new(output_path, config.size).into_drawing_area();
    root.fill(&WHITE).map_err(drawing_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&config.title, ("sans-serif", 28).into_font())
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(70)
        .build_cartesian_2d(-0.5f64..(slots - 0.5), 0f64..y_max)
        .map_err(drawing_error)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(0)
        .x_desc("Edge Count (JAC_EDGE_NUM)")
        .y_desc("Hit Rate")
        .y_label_formatter(&|y| format!("{:.0}%", y * 100.0))
        .light_line_style(WHITE)
        .draw()
        .map_err(drawing_error)?;

    for (index, s) in series.iter().enumerate() {
        let color = s.color();
        let fill = if s.prefetch_enabled() { color.mix(0.45) } else { color };

        chart
            .draw_series(
                layout
                    .bars
                    .iter()
                    .filter(|bar| bar.series == index)
                    .map(|bar| Rectangle::new([(bar.x0, 0.0), (bar.x1, bar.value)], fill.filled())),
            )
            .map_err(drawing_error)?
            .label(s.label())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], fill.filled()));

        chart
            .draw_series(
                layout
                    .bars
                    .iter()
                    .filter(|bar| bar.series == index)
                    .map(|bar| Rectangle::new([(bar.x0, 0.0), (bar.x1, bar.value)], BLACK.stroke_width(1))),
            )
            .map_err(drawing_error)?;
    }

    // Category labels under each slot
    let label_style = ("sans-serif", 15)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Top));
    for (slot, category) in layout.categories.iter().enumerate() {
        let (x, y) = chart.backend_coord(&(slot as f64, 0.0));
        root.draw(&Text::new(category.to_string(), (x, y + 6), label_style.clone()))
            .map_err(drawing_error)?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(drawing_error)?;

    root.present().map_err(drawing_error)?;

    info!("Saved plot to {}", output_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cache_size: i64, prefetch: i64, edges: i64, hit_rate: f64) -> HitRateRow {
        HitRateRow {
            cache_size: KeyValue::Int(cache_size),
            prefetch: KeyValue::Int(prefetch),
            edge_count: KeyValue::Int(edges),
            hit: hit_rate * 100.0,
            total_acc: 100.0,
            hit_rate,
        }
    }

    #[test]
    fn test_series_split_and_colors() {
        let rows = vec![
            row(20, 0, 100, 0.5),
            row(10, 1, 100, 0.4),
            row(10, 0, 200, 0.3),
            row(10, 0, 100, 0.2),
        ];

        let series = hit_rate_series(&rows);

        assert_eq!(series.len(), 3);
        assert_eq!(series[0].label(), "cache=10, prefetch disabled");
        assert_eq!(series[0].color_index, 0);
        assert_eq!(series[0].points.len(), 2);
        assert_eq!(series[0].points[0].edge_count, KeyValue::Int(100));
        assert_eq!(series[1].label(), "cache=10, prefetch enabled");
        assert_eq!(series[1].color_index, 0);
        assert_eq!(series[2].color_index, 1);
    }

    #[test]
    fn test_bar_layout_slots() {
        let rows = vec![row(10, 0, 100, 0.2), row(10, 0, 200, 0.3), row(10, 1, 200, 0.6)];
        let series = hit_rate_series(&rows);

        let layout = bar_layout(&series);

        assert_eq!(layout.categories, vec![KeyValue::Int(100), KeyValue::Int(200)]);
        assert_eq!(layout.bar_width, 0.4);
        assert_eq!(layout.bars.len(), 3);

        // second series only has the 200-edge slot
        let last = &layout.bars[2];
        assert_eq!(last.series, 1);
        assert!((last.x0 - (1.0 - 0.4 + 0.4)).abs() < 1e-12);
        assert!((last.x1 - 1.4).abs() < 1e-12);
        assert_eq!(last.value, 0.6);
    }

    fn rendered_len(path: &Path) -> u64 {
        std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
    }

    #[test]
    fn test_plot_hit_rate_curves_renders() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("charts").join("hit_rate.png");
        let rows = vec![
            row(10, 0, 100, 0.2),
            row(10, 0, 200, 0.3),
            row(10, 1, 100, 0.5),
            row(20, 0, 100, 0.0),
        ];

        plot_hit_rate_curves(&rows, &path, None).unwrap();

        assert!(rendered_len(&path) > 0);
    }

    #[test]
    fn test_plot_hit_rate_bars_with_missing_slot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bars.png");
        // prefetch-enabled series has no 100-edge bar
        let rows = vec![row(10, 0, 100, 0.2), row(10, 0, 200, 0.3), row(10, 1, 200, 0.6)];
        let config = ChartConfig::new("bars", (600, 400));

        plot_hit_rate_bars(&rows, &path, Some(&config)).unwrap();

        assert!(rendered_len(&path) > 0);
    }

    #[test]
    fn test_plot_single_point_renders() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("single.png");

        plot_hit_rate_curves(&[row(10, 0, 100, 0.0)], &path, None).unwrap();

        assert!(rendered_len(&path) > 0);
    }

    #[test]
    fn test_plot_empty_rows_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = plot_hit_rate_curves(&[], dir.path().join("x.png"), None);
        assert!(matches!(result, Err(RenderError::EmptyData(_))));
    }

    #[test]
    fn test_plot_text_edge_count_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut bad = row(10, 0, 100, 0.2);
        bad.edge_count = KeyValue::Text("many".to_string());

        let result = plot_hit_rate_curves(&[bad], dir.path().join("x.png"), None);
        assert!(matches!(result, Err(RenderError::NonNumeric(v)) if v == "many"));
    }
}
