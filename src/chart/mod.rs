//! Chart rendering to PNG.
//!
//! Every renderer is split in two: a pure preparation step (series, bar
//! slots, layouts) that can be tested on its own, and a drawing step that
//! pushes the prepared data through `plotters` onto a bitmap.

pub mod hit_rate;
pub mod layout;
pub mod timing;
pub mod walker;

use crate::utils::error::RenderError;
use std::fmt::Display;
use std::ops::Range;

// Re-export main types and functions
pub use hit_rate::{
    bar_layout, hit_rate_series, plot_hit_rate_bars, plot_hit_rate_curves, BarLayout,
    HitRateSeries,
};
pub use layout::{compute_layout, ComputedLayout, Layout, Positions};
pub use timing::{plot_avg_times, plot_avg_visited, timing_points};
pub use walker::{graph_title, plot_walker_graph, GraphPlotConfig};

/// Title and pixel size of a chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    pub title: String,
    pub size: (u32, u32),
}

impl ChartConfig {
    pub fn new(title: impl Into<String>, size: (u32, u32)) -> Self {
        Self {
            title: title.into(),
            size,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }
}

/// Map any plotters drawing failure into our error type
pub(crate) fn drawing_error<E: Display>(err: E) -> RenderError {
    RenderError::Drawing(err.to_string())
}

/// Axis range covering `values`, padded so points do not sit on the frame
pub(crate) fn padded_range(values: impl IntoIterator<Item = f64>) -> Option<Range<f64>> {
    let (min, max) = values
        .into_iter()
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })?;

    if min == max {
        return Some((min - 1.0)..(max + 1.0));
    }

    let pad = (max - min) * 0.05;
    Some((min - pad)..(max + pad))
}

/// Upper bound of a y axis that starts at zero
pub(crate) fn y_upper(values: impl IntoIterator<Item = f64>) -> f64 {
    let max = values.into_iter().fold(0.0_f64, f64::max);
    if max > 0.0 {
        max * 1.1
    } else {
        1.0
    }
}
