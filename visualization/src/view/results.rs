//! Textual presentation of results and metrics
//!
//! The renderer maps the reconciled view model into a [`Presentation`], a
//! renderer-agnostic structure of titled blocks, metric entries and tables.
//! Display layers either walk that structure or print it through its
//! `Display` implementation.
//!
//! Single runs list the full metric set. Comparisons list a reduced set per
//! algorithm (time, memory, comparisons) so blocks stay comparable, and show
//! failed algorithms inline with their error instead of failing the run.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use super::table::Table;
use algoscope_core::algorithm::{AlgorithmCatalog, AlgorithmKey};
use algoscope_core::error::ClientError;
use algoscope_core::execution::{
    format_metric, ComparisonView, ExecutionOutcome, HistoryEntry, Metrics, Reconciled,
};

/// Visual treatment of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BlockStyle {
    Normal,
    Error,
}

/// One labeled metric value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricEntry {
    pub label: &'static str,
    pub value: f64,
    pub unit: Option<&'static str>,
}

impl MetricEntry {
    fn new(label: &'static str, value: f64, unit: Option<&'static str>) -> Self {
        Self { label, value, unit }
    }
}

impl fmt::Display for MetricEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, format_metric(self.value))?;
        if let Some(unit) = self.unit {
            write!(f, " {}", unit)?;
        }
        Ok(())
    }
}

/// Result (or error) of one algorithm
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultBlock {
    /// Algorithm display name; single runs have none
    pub title: Option<String>,
    pub style: BlockStyle,
    /// Pretty-printed result, or the error text
    pub body: String,
    pub metrics: Vec<MetricEntry>,
}

impl ResultBlock {
    pub fn metric(&self, label: &str) -> Option<&MetricEntry> {
        self.metrics.iter().find(|entry| entry.label == label)
    }
}

/// What the results area shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Presentation {
    /// A request is in flight
    Loading(String),
    /// A top-level failure
    Error(String),
    Single(ResultBlock),
    Comparison {
        blocks: Vec<ResultBlock>,
        summary: Table,
        notice: Option<String>,
    },
    History(Table),
}

impl Presentation {
    pub fn is_error(&self) -> bool {
        matches!(self, Presentation::Error(_))
    }
}

pub const TIME: &str = "Time";
pub const MEMORY: &str = "Memory";
pub const PEAK_MEMORY: &str = "Peak Memory";
pub const COMPARISONS: &str = "Comparisons";
pub const SWAPS: &str = "Swaps";
pub const INPUT_SIZE: &str = "Input Size";

/// Full metric set of a single run; optional metrics only when reported
fn single_metrics(metrics: &Metrics) -> Vec<MetricEntry> {
    let mut entries = vec![
        MetricEntry::new(TIME, metrics.execution_time_ms, Some("ms")),
        MetricEntry::new(MEMORY, metrics.memory_used_kb, Some("KB")),
    ];
    if let Some(peak) = metrics.memory_peak_kb {
        entries.push(MetricEntry::new(PEAK_MEMORY, peak, Some("KB")));
    }
    entries.push(MetricEntry::new(COMPARISONS, metrics.comparisons, None));
    if let Some(swaps) = metrics.swaps {
        entries.push(MetricEntry::new(SWAPS, swaps, None));
    }
    entries.push(MetricEntry::new(INPUT_SIZE, metrics.input_size, None));
    entries
}

fn comparison_metrics(metrics: &Metrics) -> Vec<MetricEntry> {
    vec![
        MetricEntry::new(TIME, metrics.execution_time_ms, Some("ms")),
        MetricEntry::new(MEMORY, metrics.memory_used_kb, Some("KB")),
        MetricEntry::new(COMPARISONS, metrics.comparisons, None),
    ]
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Maps view models to presentations, resolving display names from the catalog
#[derive(Debug, Clone, Copy)]
pub struct ResultsRenderer<'a> {
    catalog: &'a AlgorithmCatalog,
}

impl<'a> ResultsRenderer<'a> {
    pub fn new(catalog: &'a AlgorithmCatalog) -> Self {
        Self { catalog }
    }

    pub fn render(&self, reconciled: &Reconciled) -> Presentation {
        match reconciled {
            Reconciled::Single(outcome) => self.render_single(outcome),
            Reconciled::Comparison(view) => self.render_comparison(view),
        }
    }

    pub fn render_single(&self, outcome: &ExecutionOutcome) -> Presentation {
        let block = match outcome {
            ExecutionOutcome::Success { result, metadata } => ResultBlock {
                title: None,
                style: BlockStyle::Normal,
                body: pretty(result),
                metrics: single_metrics(metadata),
            },
            ExecutionOutcome::Failure { error } => ResultBlock {
                title: None,
                style: BlockStyle::Error,
                body: error.clone(),
                metrics: Vec::new(),
            },
        };
        Presentation::Single(block)
    }

    pub fn render_comparison(&self, view: &ComparisonView) -> Presentation {
        let mut blocks = Vec::with_capacity(view.len());
        let mut summary = Table::new(["Algorithm", "Time (ms)", "Memory (KB)", "Comparisons", "Status"]);

        for entry in view {
            let name = self.display_name(&entry.key);
            match &entry.outcome {
                ExecutionOutcome::Success { result, metadata } => {
                    summary.push_row(vec![
                        name.clone(),
                        format_metric(metadata.execution_time_ms),
                        format_metric(metadata.memory_used_kb),
                        format_metric(metadata.comparisons),
                        "ok".to_string(),
                    ]);
                    blocks.push(ResultBlock {
                        title: Some(name),
                        style: BlockStyle::Normal,
                        body: pretty(result),
                        metrics: comparison_metrics(metadata),
                    });
                }
                ExecutionOutcome::Failure { error } => {
                    summary.push_row(vec![
                        name.clone(),
                        "-".to_string(),
                        "-".to_string(),
                        "-".to_string(),
                        format!("failed: {}", error),
                    ]);
                    blocks.push(ResultBlock {
                        title: Some(name),
                        style: BlockStyle::Error,
                        body: error.clone(),
                        metrics: Vec::new(),
                    });
                }
            }
        }

        let notice = if view.all_failed() {
            Some("All selected algorithms failed".to_string())
        } else {
            view.partial_failure().map(|partial| {
                let names: Vec<String> = partial.failed.iter().map(|key| self.display_name(key)).collect();
                format!(
                    "{} of {} algorithms failed: {}",
                    partial.failed.len(),
                    partial.total,
                    names.join(", ")
                )
            })
        };

        Presentation::Comparison { blocks, summary, notice }
    }

    pub fn render_error(&self, error: &ClientError) -> Presentation {
        Presentation::Error(error.to_string())
    }

    pub fn render_history(&self, history: &[HistoryEntry]) -> Presentation {
        let mut table = Table::new(["#", "Algorithm", "Input Size", "Time (ms)"]);
        for (index, entry) in history.iter().enumerate() {
            table.push_row(vec![
                (index + 1).to_string(),
                self.display_name(&entry.algorithm),
                entry.input_size.to_string(),
                entry
                    .execution_time_ms()
                    .map(format_metric)
                    .unwrap_or_else(|| "-".to_string()),
            ]);
        }
        Presentation::History(table)
    }

    fn display_name(&self, key: &AlgorithmKey) -> String {
        self.catalog.display_name(key).to_string()
    }
}

fn write_block(f: &mut fmt::Formatter<'_>, block: &ResultBlock) -> fmt::Result {
    if let Some(title) = &block.title {
        writeln!(f, "== {} ==", title)?;
    }
    match block.style {
        BlockStyle::Error => writeln!(f, "error: {}", block.body)?,
        BlockStyle::Normal => {
            if block.title.is_none() {
                writeln!(f, "Result:")?;
            }
            writeln!(f, "{}", block.body)?;
        }
    }
    if !block.metrics.is_empty() {
        let entries: Vec<String> = block.metrics.iter().map(ToString::to_string).collect();
        writeln!(f, "Metrics: {}", entries.join(" | "))?;
    }
    Ok(())
}

impl fmt::Display for Presentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Presentation::Loading(message) => writeln!(f, "{}", message),
            Presentation::Error(message) => writeln!(f, "error: {}", message),
            Presentation::Single(block) => write_block(f, block),
            Presentation::Comparison { blocks, summary, notice } => {
                for block in blocks {
                    write_block(f, block)?;
                    writeln!(f)?;
                }
                write!(f, "{}", summary)?;
                if let Some(notice) = notice {
                    writeln!(f, "{}", notice)?;
                }
                Ok(())
            }
            Presentation::History(table) => write!(f, "{}", table),
        }
    }
}
