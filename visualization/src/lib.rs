//! algoscope visualization
//!
//! Presentation side of algoscope: turns reconciled execution results into
//! result blocks, summary tables and bar charts, and drives the whole
//! run/compare pipeline through the [`Workbench`] session object.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod chart;
pub mod view;
pub mod workbench;

pub use chart::{BarChart, ChartError, ChartHandle, ChartPresenter, ChartSlot, ChartSurface, TextSurface};
pub use view::{Presentation, ResultsRenderer, Table};
pub use workbench::{Delivery, DisplayState, Workbench};
