//! Chart lifecycle for single runs and comparisons
//!
//! The presenter owns at most one live chart per [`ChartSlot`]. Every update
//! disposes the slot's previous chart before drawing the new one, and
//! dropping the presenter disposes whatever is still live.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::HashMap;

use log::debug;

use super::{BarChart, ChartError, ChartHandle, ChartSlot, ChartSurface, BLUE, RED, TEAL, YELLOW};
use algoscope_core::algorithm::AlgorithmCatalog;
use algoscope_core::execution::{ComparisonView, ExecutionOutcome, Metrics};

/// Display-only reduction applied to comparison counts in the single-run chart
pub const COMPARISON_SCALE: f64 = 10.0;

/// Build the four-bar chart of a single run
pub fn single_metrics_chart(metrics: &Metrics) -> Result<BarChart, ChartError> {
    BarChart::new(
        "Metrics",
        vec![
            "Time (ms)".to_string(),
            "Memory (KB)".to_string(),
            "Peak Memory (KB)".to_string(),
            format!("Comparisons (/{})", COMPARISON_SCALE),
        ],
        vec![
            metrics.execution_time_ms,
            metrics.memory_used_kb,
            metrics.memory_peak_kb.unwrap_or(0.0),
            metrics.comparisons / COMPARISON_SCALE,
        ],
        vec![BLUE, RED, YELLOW, TEAL],
        format!("value; comparisons divided by {} for display", COMPARISON_SCALE),
    )
}

/// Build the time and memory charts of a comparison from its successful entries
pub fn comparison_charts(
    view: &ComparisonView,
    catalog: &AlgorithmCatalog,
) -> Result<(BarChart, BarChart), ChartError> {
    let mut labels = Vec::new();
    let mut times = Vec::new();
    let mut memories = Vec::new();
    for (key, metrics) in view.successes() {
        labels.push(catalog.display_name(key).to_string());
        times.push(metrics.execution_time_ms);
        memories.push(metrics.memory_used_kb);
    }

    let time = BarChart::new("Execution Time (ms)", labels.clone(), times, vec![BLUE], "milliseconds")?;
    let memory = BarChart::new("Memory Used (KB)", labels, memories, vec![RED], "kilobytes")?;
    Ok((time, memory))
}

/// Owner of the live chart in each slot
pub struct ChartPresenter {
    surface: Box<dyn ChartSurface>,
    live: HashMap<ChartSlot, Box<dyn ChartHandle>>,
}

impl ChartPresenter {
    pub fn new(surface: Box<dyn ChartSurface>) -> Self {
        Self {
            surface,
            live: HashMap::new(),
        }
    }

    /// Redraw the single-run chart. A failed run leaves the slot empty.
    pub fn update_single(&mut self, outcome: &ExecutionOutcome) -> Result<(), ChartError> {
        match outcome.metrics() {
            Some(metrics) => {
                self.clear(ChartSlot::SingleMetrics);
                let chart = single_metrics_chart(metrics)?;
                self.replace(ChartSlot::SingleMetrics, &chart)
            }
            None => {
                self.clear(ChartSlot::SingleMetrics);
                Ok(())
            }
        }
    }

    /// Redraw both comparison charts. Failed algorithms are left out.
    ///
    /// Both previous charts are disposed before either new one is drawn, and
    /// both draws are attempted; the first failure is returned.
    pub fn update_comparison(
        &mut self,
        view: &ComparisonView,
        catalog: &AlgorithmCatalog,
    ) -> Result<(), ChartError> {
        for slot in ChartSlot::COMPARISON {
            self.clear(slot);
        }
        let (time, memory) = comparison_charts(view, catalog)?;
        let drawn_time = self.replace(ChartSlot::ComparisonTime, &time);
        let drawn_memory = self.replace(ChartSlot::ComparisonMemory, &memory);
        drawn_time.and(drawn_memory)
    }

    /// Dispose the chart in `slot`, if any
    pub fn clear(&mut self, slot: ChartSlot) {
        if let Some(mut handle) = self.live.remove(&slot) {
            debug!("Disposing {:?} chart", slot);
            handle.dispose();
        }
    }

    pub fn clear_all(&mut self) {
        for slot in ChartSlot::ALL {
            self.clear(slot);
        }
    }

    pub fn is_live(&self, slot: ChartSlot) -> bool {
        self.live.contains_key(&slot)
    }

    pub fn live_slots(&self) -> Vec<ChartSlot> {
        let mut slots: Vec<_> = self.live.keys().copied().collect();
        slots.sort();
        slots
    }

    fn replace(&mut self, slot: ChartSlot, chart: &BarChart) -> Result<(), ChartError> {
        self.clear(slot);
        let handle = self.surface.render_bars(slot, chart)?;
        self.live.insert(slot, handle);
        Ok(())
    }
}

impl Drop for ChartPresenter {
    fn drop(&mut self) {
        self.clear_all();
    }
}

impl std::fmt::Debug for ChartPresenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartPresenter")
            .field("live", &self.live_slots())
            .finish()
    }
}
