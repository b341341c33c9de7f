//! The interactive workbench
//!
//! A [`Workbench`] is the one long-lived object of a session. It owns the
//! algorithm catalog, the chart presenter, the request sequencer and what
//! each results area currently shows, and it runs the whole pipeline for
//! every user action:
//!
//! 1. issue a request token, superseding anything still in flight for the mode,
//! 2. resolve and validate the input fields (nothing is sent on failure),
//! 3. send the request and drop the response if a newer action happened meanwhile,
//! 4. reconcile, render, and redraw the charts from the same view model.
//!
//! Every failure ends up as a visible message in the results area of the
//! mode that triggered it.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use log::{debug, error, info, warn};

use crate::chart::{ChartPresenter, ChartSlot, ChartSurface};
use crate::view::{Presentation, ResultsRenderer};
use algoscope_core::algorithm::{AlgorithmCatalog, AlgorithmKey, SelectionList, SelectionMode};
use algoscope_core::backend::{Backend, HttpBackend};
use algoscope_core::config::ClientConfig;
use algoscope_core::error::ClientError;
use algoscope_core::execution::{
    GenerationKind, InputResolver, Reconciled, RequestSequencer, RequestToken, ResultReconciler,
    RunMode, TriggerPoint,
};

/// What happened to a response once it arrived
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The response updated the display
    Applied,
    /// A newer request had been issued; the response was dropped
    Superseded,
}

/// Everything the display layer shows, per mode
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayState {
    pub single_results: Option<Presentation>,
    pub comparison_results: Option<Presentation>,
    pub history: Option<Presentation>,
    /// Contents of the single-run data field
    pub single_data: String,
    /// Contents of the comparison data field
    pub comparison_data: String,
    /// Last chart drawing failure, if the most recent redraw failed
    pub chart_error: Option<String>,
}

impl DisplayState {
    pub fn results(&self, mode: RunMode) -> Option<&Presentation> {
        match mode {
            RunMode::Single => self.single_results.as_ref(),
            RunMode::Comparison => self.comparison_results.as_ref(),
        }
    }

    pub fn data(&self, mode: RunMode) -> &str {
        match mode {
            RunMode::Single => &self.single_data,
            RunMode::Comparison => &self.comparison_data,
        }
    }

    fn results_mut(&mut self, mode: RunMode) -> &mut Option<Presentation> {
        match mode {
            RunMode::Single => &mut self.single_results,
            RunMode::Comparison => &mut self.comparison_results,
        }
    }

    fn data_mut(&mut self, mode: RunMode) -> &mut String {
        match mode {
            RunMode::Single => &mut self.single_data,
            RunMode::Comparison => &mut self.comparison_data,
        }
    }
}

fn trigger_for(mode: RunMode) -> TriggerPoint {
    match mode {
        RunMode::Single => TriggerPoint::Run,
        RunMode::Comparison => TriggerPoint::Compare,
    }
}

fn generate_trigger_for(mode: RunMode) -> TriggerPoint {
    match mode {
        RunMode::Single => TriggerPoint::GenerateSingle,
        RunMode::Comparison => TriggerPoint::GenerateComparison,
    }
}

/// Prefix of the message shown in both results areas when the catalog fails to load
const CATALOG_LOAD_FAILED: &str = "failed to load available algorithms";

fn loading_message(mode: RunMode) -> &'static str {
    match mode {
        RunMode::Single => "Running algorithm...",
        RunMode::Comparison => "Comparing algorithms...",
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Session object driving the run and compare pipeline
pub struct Workbench {
    backend: Arc<dyn Backend>,
    config: ClientConfig,
    catalog: RwLock<Arc<AlgorithmCatalog>>,
    charts: Mutex<ChartPresenter>,
    sequencer: RequestSequencer,
    display: Mutex<DisplayState>,
}

impl Workbench {
    pub fn new(backend: Arc<dyn Backend>, surface: Box<dyn ChartSurface>, config: ClientConfig) -> Self {
        Self {
            backend,
            config,
            catalog: RwLock::new(Arc::new(AlgorithmCatalog::new())),
            charts: Mutex::new(ChartPresenter::new(surface)),
            sequencer: RequestSequencer::new(),
            display: Mutex::new(DisplayState::default()),
        }
    }

    /// Workbench talking to the service over HTTP
    pub fn connect(config: ClientConfig, surface: Box<dyn ChartSurface>) -> Result<Self, ClientError> {
        let backend = HttpBackend::new(config.clone())?;
        Ok(Self::new(Arc::new(backend), surface, config))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The current catalog; empty until [`Workbench::load_catalog`] succeeds
    pub fn catalog(&self) -> Arc<AlgorithmCatalog> {
        self.catalog
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Options for the selection widget of `mode`
    pub fn selection(&self, mode: RunMode) -> SelectionList {
        let widget = match mode {
            RunMode::Single => SelectionMode::SingleChoice,
            RunMode::Comparison => SelectionMode::Checkboxes,
        };
        self.catalog().selection(widget)
    }

    /// Whether the target field should be offered for this selection
    pub fn target_visible(&self, selected: &[AlgorithmKey]) -> bool {
        self.catalog().any_requires_target(selected)
    }

    /// Snapshot of everything currently displayed
    pub fn display(&self) -> DisplayState {
        lock(&self.display).clone()
    }

    /// Overwrite the data field of `mode`, as the user typing into it would
    pub fn set_data(&self, mode: RunMode, text: impl Into<String>) {
        *lock(&self.display).data_mut(mode) = text.into();
    }

    pub fn live_charts(&self) -> Vec<ChartSlot> {
        lock(&self.charts).live_slots()
    }

    /// Fetch the catalog. On failure the catalog stays as it was and both
    /// results areas show the error; a later successful load removes it.
    pub async fn load_catalog(&self) -> Result<Delivery, ClientError> {
        let token = self.sequencer.issue(TriggerPoint::Catalog);
        let loaded = AlgorithmCatalog::load(self.backend.as_ref()).await;
        if !self.sequencer.is_current(token) {
            debug!("Dropping superseded catalog response");
            return Ok(Delivery::Superseded);
        }
        match loaded {
            Ok(catalog) => {
                *self.catalog.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(catalog);
                let mut display = lock(&self.display);
                for mode in [RunMode::Single, RunMode::Comparison] {
                    let results = display.results_mut(mode);
                    if matches!(results, Some(Presentation::Error(message)) if message.starts_with(CATALOG_LOAD_FAILED)) {
                        *results = None;
                    }
                }
                Ok(Delivery::Applied)
            }
            Err(err) => {
                error!("Failed to load algorithms: {}", err);
                let message = Presentation::Error(format!("{}: {}", CATALOG_LOAD_FAILED, err));
                let mut display = lock(&self.display);
                display.single_results = Some(message.clone());
                display.comparison_results = Some(message);
                Err(err)
            }
        }
    }

    /// Ask the service for generated data and write it into the data field of `mode`
    pub async fn generate(
        &self,
        mode: RunMode,
        kind: GenerationKind,
        raw_size: &str,
    ) -> Result<Delivery, ClientError> {
        let resolver = self.resolver(mode);
        let token = self.sequencer.issue(generate_trigger_for(mode));
        let generated = resolver.generate(self.backend.as_ref(), kind, raw_size).await;
        if !self.sequencer.is_current(token) {
            debug!("Dropping superseded generated data");
            return Ok(Delivery::Superseded);
        }
        let mut display = lock(&self.display);
        match generated {
            Ok(text) => {
                *display.data_mut(mode) = text;
                Ok(Delivery::Applied)
            }
            Err(err) => {
                warn!("Data generation failed: {}", err);
                *display.results_mut(mode) = Some(Presentation::Error(err.to_string()));
                Err(err)
            }
        }
    }

    /// Run one algorithm on the single-run data field
    pub async fn run(&self, algorithm: &AlgorithmKey, raw_target: &str) -> Result<Delivery, ClientError> {
        let raw_data = self.display().single_data;
        self.execute(RunMode::Single, std::slice::from_ref(algorithm), &raw_data, raw_target)
            .await
    }

    /// Compare the selected algorithms on the comparison data field
    pub async fn compare(&self, selected: &[AlgorithmKey], raw_target: &str) -> Result<Delivery, ClientError> {
        let raw_data = self.display().comparison_data;
        self.execute(RunMode::Comparison, selected, &raw_data, raw_target).await
    }

    /// The full pipeline for one user-triggered execution
    pub async fn execute(
        &self,
        mode: RunMode,
        selected: &[AlgorithmKey],
        raw_data: &str,
        raw_target: &str,
    ) -> Result<Delivery, ClientError> {
        // any earlier request of this mode is superseded, even by rejected input
        let token = self.sequencer.issue(trigger_for(mode));
        let catalog = self.catalog();
        let request = match self.validate(mode, selected, raw_data, raw_target, &catalog) {
            Ok(request) => request,
            Err(err) => {
                debug!("Rejected {:?} input: {}", mode, err);
                *lock(&self.display).results_mut(mode) = Some(Presentation::Error(err.to_string()));
                return Err(err);
            }
        };

        *lock(&self.display).results_mut(mode) =
            Some(Presentation::Loading(loading_message(mode).to_string()));

        let response = self.backend.execute(&request).await;
        if !self.sequencer.is_current(token) {
            debug!("Dropping superseded {:?} response #{}", mode, token.sequence());
            return Ok(Delivery::Superseded);
        }

        match response.and_then(|raw| ResultReconciler::reconcile(raw, mode)) {
            Ok(reconciled) => {
                self.apply(mode, token, &reconciled, &catalog);
                Ok(Delivery::Applied)
            }
            Err(err) => {
                warn!("{:?} request failed: {}", mode, err);
                self.clear_charts(mode);
                let presentation = ResultsRenderer::new(&catalog).render_error(&err);
                *lock(&self.display).results_mut(mode) = Some(presentation);
                Err(err)
            }
        }
    }

    /// Fetch the service's execution history into the history area
    pub async fn load_history(&self) -> Result<Delivery, ClientError> {
        let token = self.sequencer.issue(TriggerPoint::History);
        let history = self.backend.history(self.config.history_limit).await;
        if !self.sequencer.is_current(token) {
            return Ok(Delivery::Superseded);
        }
        let catalog = self.catalog();
        let renderer = ResultsRenderer::new(&catalog);
        let mut display = lock(&self.display);
        match history {
            Ok(entries) => {
                display.history = Some(renderer.render_history(&entries));
                Ok(Delivery::Applied)
            }
            Err(err) => {
                display.history = Some(renderer.render_error(&err));
                Err(err)
            }
        }
    }

    fn resolver(&self, mode: RunMode) -> InputResolver {
        InputResolver::new(mode, self.config.default_generate_size)
    }

    fn validate(
        &self,
        mode: RunMode,
        selected: &[AlgorithmKey],
        raw_data: &str,
        raw_target: &str,
        catalog: &AlgorithmCatalog,
    ) -> Result<algoscope_core::ExecutionRequest, ClientError> {
        if !selected.is_empty() {
            catalog.ensure_known(selected)?;
        }
        Ok(self.resolver(mode).resolve(raw_data, raw_target, selected, catalog)?)
    }

    fn apply(&self, mode: RunMode, token: RequestToken, reconciled: &Reconciled, catalog: &AlgorithmCatalog) {
        let presentation = ResultsRenderer::new(catalog).render(reconciled);
        let drawn = {
            let mut charts = lock(&self.charts);
            match reconciled {
                Reconciled::Single(outcome) => charts.update_single(outcome),
                Reconciled::Comparison(view) => charts.update_comparison(view, catalog),
            }
        };

        let mut display = lock(&self.display);
        *display.results_mut(mode) = Some(presentation);
        display.chart_error = match drawn {
            Ok(()) => None,
            Err(err) => {
                error!("Failed to draw {:?} charts: {}", mode, err);
                Some(err.to_string())
            }
        };
        info!("Applied {:?} response #{}", mode, token.sequence());
    }

    fn clear_charts(&self, mode: RunMode) {
        let mut charts = lock(&self.charts);
        match mode {
            RunMode::Single => charts.clear(ChartSlot::SingleMetrics),
            RunMode::Comparison => {
                for slot in ChartSlot::COMPARISON {
                    charts.clear(slot);
                }
            }
        }
    }
}

impl std::fmt::Debug for Workbench {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workbench")
            .field("config", &self.config)
            .field("algorithms", &self.catalog().len())
            .field("charts", &self.live_charts())
            .finish()
    }
}
