//! Renderer-agnostic presentation of results
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod results;
pub mod table;

pub use self::results::{
    BlockStyle, MetricEntry, Presentation, ResultBlock, ResultsRenderer, COMPARISONS, INPUT_SIZE,
    MEMORY, PEAK_MEMORY, SWAPS, TIME,
};
pub use self::table::Table;
