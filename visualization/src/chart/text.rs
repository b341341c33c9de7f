//! Terminal bar chart surface
//!
//! Draws charts as fixed-width text into a shared canvas keyed by slot, so a
//! console front end can print whatever is currently live.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::BTreeMap;
use std::fmt::Write;
use std::sync::{Arc, Mutex, PoisonError};

use log::trace;

use super::{BarChart, ChartError, ChartHandle, ChartSlot, ChartSurface};
use algoscope_core::execution::format_metric;

const BAR_WIDTH: usize = 40;
const BAR_GLYPH: char = '#';

#[derive(Debug, Default)]
struct CanvasState {
    next_id: u64,
    drawn: BTreeMap<ChartSlot, (u64, String)>,
}

/// Shared view of what the text surface currently shows
#[derive(Debug, Clone, Default)]
pub struct TextCanvas {
    state: Arc<Mutex<CanvasState>>,
}

impl TextCanvas {
    /// Rendered text of the chart live in `slot`
    pub fn get(&self, slot: ChartSlot) -> Option<String> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.drawn.get(&slot).map(|(_, text)| text.clone())
    }

    pub fn live_slots(&self) -> Vec<ChartSlot> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.drawn.keys().copied().collect()
    }
}

/// [`ChartSurface`] drawing into a [`TextCanvas`]
#[derive(Debug, Clone, Default)]
pub struct TextSurface {
    canvas: TextCanvas,
}

impl TextSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn canvas(&self) -> TextCanvas {
        self.canvas.clone()
    }
}

impl ChartSurface for TextSurface {
    fn render_bars(
        &mut self,
        slot: ChartSlot,
        chart: &BarChart,
    ) -> Result<Box<dyn ChartHandle>, ChartError> {
        let text = draw(chart);
        let mut state = self.canvas.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.next_id += 1;
        let id = state.next_id;
        state.drawn.insert(slot, (id, text));
        trace!("Drew {:?} chart #{}", slot, id);
        Ok(Box::new(TextChartHandle {
            canvas: self.canvas.clone(),
            slot,
            id,
        }))
    }
}

struct TextChartHandle {
    canvas: TextCanvas,
    slot: ChartSlot,
    id: u64,
}

impl ChartHandle for TextChartHandle {
    fn dispose(&mut self) {
        let mut state = self.canvas.state.lock().unwrap_or_else(PoisonError::into_inner);
        // a newer chart in the same slot is not ours to remove
        if matches!(state.drawn.get(&self.slot), Some((id, _)) if *id == self.id) {
            state.drawn.remove(&self.slot);
        }
    }
}

/// Horizontal bars scaled to the largest value
fn draw(chart: &BarChart) -> String {
    let label_width = chart.labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let max = chart
        .values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);

    let mut out = String::new();
    let _ = writeln!(out, "{}", chart.title);
    if chart.is_empty() {
        let _ = writeln!(out, "  (no data)");
    }
    for (label, value) in chart.labels.iter().zip(&chart.values) {
        let length = if max > 0.0 && value.is_finite() && *value > 0.0 {
            ((value / max) * BAR_WIDTH as f64).round().max(1.0) as usize
        } else {
            0
        };
        let bar: String = std::iter::repeat(BAR_GLYPH).take(length).collect();
        let _ = writeln!(
            out,
            "  {:<width$} | {:<bar_width$} {}",
            label,
            bar,
            format_metric(*value),
            width = label_width,
            bar_width = BAR_WIDTH
        );
    }
    if !chart.value_axis.is_empty() {
        let _ = writeln!(out, "  [{}]", chart.value_axis);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart(values: Vec<f64>) -> BarChart {
        let labels = (0..values.len()).map(|i| format!("bar{}", i)).collect();
        BarChart::new("Demo", labels, values, vec![], "units").unwrap()
    }

    #[test]
    fn bars_scale_to_largest_value() {
        let text = draw(&chart(vec![10.0, 5.0, 0.0]));
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Demo");
        assert_eq!(lines[1].matches(BAR_GLYPH).count(), BAR_WIDTH);
        assert_eq!(lines[2].matches(BAR_GLYPH).count(), BAR_WIDTH / 2);
        assert_eq!(lines[3].matches(BAR_GLYPH).count(), 0);
        assert!(lines[1].ends_with(" 10"));
        assert_eq!(lines[4], "  [units]");
    }

    #[test]
    fn empty_chart_says_so() {
        assert!(draw(&chart(vec![])).contains("(no data)"));
    }

    #[test]
    fn dispose_clears_only_its_own_drawing() {
        let mut surface = TextSurface::new();
        let canvas = surface.canvas();

        let mut first = surface.render_bars(ChartSlot::ComparisonTime, &chart(vec![1.0])).unwrap();
        let mut second = surface.render_bars(ChartSlot::ComparisonTime, &chart(vec![2.0])).unwrap();
        first.dispose();
        assert_eq!(canvas.live_slots(), vec![ChartSlot::ComparisonTime]);

        second.dispose();
        second.dispose();
        assert!(canvas.live_slots().is_empty());
        assert!(canvas.get(ChartSlot::ComparisonTime).is_none());
    }
}
