//! Bar charts for execution metrics
//!
//! Charts are drawn by an external surface that only knows how to render a
//! labeled bar series into a slot and hand back a handle that can later be
//! disposed. The model types here are what gets handed to that surface.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod presenter;
pub mod text;

pub use self::presenter::ChartPresenter;
pub use self::text::{TextCanvas, TextSurface};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// RGBA color with components in `0.0..=1.0`
pub type Color = [f32; 4];

pub const BLUE: Color = [0.212, 0.635, 0.922, 0.6];
pub const RED: Color = [1.0, 0.388, 0.518, 0.6];
pub const YELLOW: Color = [1.0, 0.808, 0.337, 0.6];
pub const TEAL: Color = [0.294, 0.753, 0.753, 0.6];

/// Fixed placement points for charts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChartSlot {
    /// Metrics of a single run
    SingleMetrics,
    /// Execution time per algorithm in a comparison
    ComparisonTime,
    /// Memory use per algorithm in a comparison
    ComparisonMemory,
}

impl ChartSlot {
    pub const ALL: [ChartSlot; 3] = [
        ChartSlot::SingleMetrics,
        ChartSlot::ComparisonTime,
        ChartSlot::ComparisonMemory,
    ];

    pub const COMPARISON: [ChartSlot; 2] = [ChartSlot::ComparisonTime, ChartSlot::ComparisonMemory];
}

/// A single labeled bar series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChart {
    /// Dataset label
    pub title: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    /// One color per bar, or a single color for all bars
    pub colors: Vec<Color>,
    /// Description of the value axis
    pub value_axis: String,
}

impl BarChart {
    pub fn new(
        title: impl Into<String>,
        labels: Vec<String>,
        values: Vec<f64>,
        colors: Vec<Color>,
        value_axis: impl Into<String>,
    ) -> Result<Self, ChartError> {
        if labels.len() != values.len() {
            return Err(ChartError::MismatchedSeries {
                labels: labels.len(),
                values: values.len(),
            });
        }
        Ok(Self {
            title: title.into(),
            labels,
            values,
            colors,
            value_axis: value_axis.into(),
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Color of bar `index`
    pub fn color(&self, index: usize) -> Color {
        match self.colors.len() {
            0 => BLUE,
            1 => self.colors[0],
            n => self.colors[index % n],
        }
    }
}

/// Chart rendering failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChartError {
    #[error("series has {labels} labels but {values} values")]
    MismatchedSeries { labels: usize, values: usize },

    #[error("no drawing surface available for {0:?}")]
    SurfaceUnavailable(ChartSlot),
}

/// A chart currently drawn on a surface
pub trait ChartHandle: Send {
    /// Remove the chart from its surface. Disposing twice is harmless.
    fn dispose(&mut self);
}

/// Something that can draw bar charts
pub trait ChartSurface: Send {
    fn render_bars(
        &mut self,
        slot: ChartSlot,
        chart: &BarChart,
    ) -> Result<Box<dyn ChartHandle>, ChartError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_series() {
        let err = BarChart::new("t", vec!["a".into()], vec![], vec![], "").unwrap_err();
        assert_eq!(err, ChartError::MismatchedSeries { labels: 1, values: 0 });
    }

    #[test]
    fn single_color_applies_to_every_bar() {
        let chart = BarChart::new("t", vec!["a".into(), "b".into()], vec![1.0, 2.0], vec![RED], "").unwrap();
        assert_eq!(chart.color(1), RED);
        let palette = BarChart::new("t", vec!["a".into(), "b".into()], vec![1.0, 2.0], vec![RED, TEAL], "").unwrap();
        assert_eq!(palette.color(1), TEAL);
    }
}
