//! Algorithm catalog
//!
//! The catalog is fetched once per session and never mutated afterwards.
//! It keeps descriptors in the order the service listed them, which is also
//! the order selection widgets present them in.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::HashMap;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::{AlgorithmDescriptor, AlgorithmKey};
use crate::backend::Backend;
use crate::error::{FetchError, ValidationError};

/// Prompt shown as the first entry of a single-choice list
pub const SINGLE_CHOICE_PROMPT: &str = "Select an algorithm...";

/// How the selection widget lets the user pick algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectionMode {
    /// Exactly one algorithm (single-run mode)
    SingleChoice,
    /// Any number of algorithms (comparison mode)
    Checkboxes,
}

/// A single entry of a selection widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionOption {
    /// `None` for the placeholder prompt
    pub value: Option<AlgorithmKey>,
    pub label: String,
}

/// Selection widget contents derived from the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionList {
    pub mode: SelectionMode,
    pub options: Vec<SelectionOption>,
}

impl SelectionList {
    /// Keys in presentation order, placeholder excluded
    pub fn keys(&self) -> impl Iterator<Item = &AlgorithmKey> {
        self.options.iter().filter_map(|option| option.value.as_ref())
    }
}

/// Immutable set of algorithms offered by the service
#[derive(Debug, Clone, Default)]
pub struct AlgorithmCatalog {
    entries: Vec<AlgorithmDescriptor>,
    index: HashMap<AlgorithmKey, usize>,
}

impl AlgorithmCatalog {
    /// An empty catalog; every lookup falls back to the raw key
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog preserving the given order. A repeated key replaces the
    /// earlier descriptor in place.
    pub fn from_descriptors<I>(descriptors: I) -> Self
    where
        I: IntoIterator<Item = AlgorithmDescriptor>,
    {
        let mut catalog = Self::new();
        for descriptor in descriptors {
            match catalog.index.get(&descriptor.key) {
                Some(&position) => catalog.entries[position] = descriptor,
                None => {
                    catalog.index.insert(descriptor.key.clone(), catalog.entries.len());
                    catalog.entries.push(descriptor);
                }
            }
        }
        catalog
    }

    /// Fetch the catalog from the service.
    ///
    /// Either the whole catalog is returned or an error is; callers keep
    /// whatever catalog they had on failure.
    pub async fn load(backend: &dyn Backend) -> Result<Self, FetchError> {
        debug!("Loading algorithm catalog");
        let descriptors = backend.list_algorithms().await?;
        let catalog = Self::from_descriptors(descriptors);
        info!("Loaded {} algorithms", catalog.len());
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &AlgorithmKey) -> Option<&AlgorithmDescriptor> {
        self.index.get(key).map(|&position| &self.entries[position])
    }

    pub fn contains(&self, key: &AlgorithmKey) -> bool {
        self.index.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AlgorithmDescriptor> {
        self.entries.iter()
    }

    /// Human-readable name, or the raw key for algorithms the catalog does not know
    pub fn display_name<'a>(&'a self, key: &'a AlgorithmKey) -> &'a str {
        self.get(key)
            .map(|descriptor| descriptor.name.as_str())
            .unwrap_or_else(|| key.as_str())
    }

    /// Whether running `key` takes a target value
    pub fn requires_target(&self, key: &AlgorithmKey) -> bool {
        match self.get(key) {
            Some(descriptor) => descriptor.requires_target,
            None => key.looks_like_search(),
        }
    }

    /// Whether any of the selected algorithms takes a target value
    pub fn any_requires_target(&self, keys: &[AlgorithmKey]) -> bool {
        keys.iter().any(|key| self.requires_target(key))
    }

    /// Reject selections naming algorithms the service never offered
    pub fn ensure_known(&self, keys: &[AlgorithmKey]) -> Result<(), ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::CatalogNotLoaded);
        }
        match keys.iter().find(|key| !self.contains(key)) {
            Some(unknown) => Err(ValidationError::UnknownAlgorithm(unknown.clone())),
            None => Ok(()),
        }
    }

    /// Options for the selection widget of the given mode
    pub fn selection(&self, mode: SelectionMode) -> SelectionList {
        let mut options = Vec::with_capacity(self.entries.len() + 1);
        if mode == SelectionMode::SingleChoice {
            options.push(SelectionOption {
                value: None,
                label: SINGLE_CHOICE_PROMPT.to_string(),
            });
        }
        options.extend(self.entries.iter().map(|descriptor| SelectionOption {
            value: Some(descriptor.key.clone()),
            label: descriptor.label(),
        }));
        SelectionList { mode, options }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testing::MockBackend;
    use crate::error::ClientError;

    fn sample() -> AlgorithmCatalog {
        AlgorithmCatalog::from_descriptors(vec![
            AlgorithmDescriptor::new("quick_sort".into(), "Quick Sort", "divide and conquer", None),
            AlgorithmDescriptor::new("binary_search".into(), "Binary Search", "sorted input", None),
            AlgorithmDescriptor::new("bubble_sort".into(), "Bubble Sort", "adjacent swaps", None),
        ])
    }

    #[test]
    fn preserves_received_order() {
        let catalog = sample();
        let keys: Vec<_> = catalog.iter().map(|d| d.key.as_str()).collect();
        assert_eq!(keys, ["quick_sort", "binary_search", "bubble_sort"]);
    }

    #[test]
    fn display_name_falls_back_to_key() {
        let catalog = sample();
        assert_eq!(catalog.display_name(&"quick_sort".into()), "Quick Sort");
        let unknown = AlgorithmKey::new("shell_sort");
        assert_eq!(catalog.display_name(&unknown), "shell_sort");
        assert_eq!(AlgorithmCatalog::new().display_name(&unknown), "shell_sort");
    }

    #[test]
    fn selection_lists_follow_mode() {
        let catalog = sample();

        let single = catalog.selection(SelectionMode::SingleChoice);
        assert_eq!(single.options.len(), 4);
        assert_eq!(single.options[0].value, None);
        assert_eq!(single.options[1].label, "Quick Sort - divide and conquer");

        let boxes = catalog.selection(SelectionMode::Checkboxes);
        assert_eq!(boxes.options.len(), 3);
        let keys: Vec<_> = boxes.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, ["quick_sort", "binary_search", "bubble_sort"]);
    }

    #[test]
    fn target_requirement_uses_catalog_then_convention() {
        let catalog = sample();
        assert!(catalog.requires_target(&"binary_search".into()));
        assert!(!catalog.requires_target(&"bubble_sort".into()));
        assert!(catalog.requires_target(&"linear_search".into()));
        assert!(catalog.any_requires_target(&["bubble_sort".into(), "binary_search".into()]));
        assert!(!catalog.any_requires_target(&["bubble_sort".into()]));
    }

    #[test]
    fn ensure_known_rejects_unknown_and_unloaded() {
        let catalog = sample();
        assert!(catalog.ensure_known(&["quick_sort".into()]).is_ok());
        assert_eq!(
            catalog.ensure_known(&["quick_sort".into(), "bogo_sort".into()]),
            Err(ValidationError::UnknownAlgorithm("bogo_sort".into()))
        );
        assert_eq!(
            AlgorithmCatalog::new().ensure_known(&["quick_sort".into()]),
            Err(ValidationError::CatalogNotLoaded)
        );
    }

    #[tokio::test]
    async fn load_returns_whole_catalog_or_error() {
        let backend = MockBackend::new().with_catalog(vec![
            AlgorithmDescriptor::new("merge_sort".into(), "Merge Sort", "stable", None),
        ]);
        let catalog = AlgorithmCatalog::load(&backend).await.unwrap();
        assert_eq!(catalog.len(), 1);

        let failing = MockBackend::new().failing_catalog("service unavailable");
        let err = AlgorithmCatalog::load(&failing).await.unwrap_err();
        assert!(matches!(err, ClientError::Backend(ref msg) if msg == "service unavailable"));
    }
}
