//! Algorithm identity and the session catalog
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod catalog;

pub use self::catalog::*;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Substring marking an algorithm as a search that takes a target value
const SEARCH_MARKER: &str = "search";

/// Stable identifier of a selectable algorithm, as issued by the service
#[derive(Debug, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlgorithmKey(String);

impl AlgorithmKey {
    pub fn new(key: &str) -> Self {
        Self(key.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Naming-convention classification, used only when the service does
    /// not declare the capability explicitly
    pub fn looks_like_search(&self) -> bool {
        self.0.contains(SEARCH_MARKER)
    }
}

impl fmt::Display for AlgorithmKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AlgorithmKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for AlgorithmKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

/// One entry of the algorithm catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlgorithmDescriptor {
    pub key: AlgorithmKey,
    pub name: String,
    pub description: String,
    /// Whether runs of this algorithm take a numeric target
    pub requires_target: bool,
}

impl AlgorithmDescriptor {
    /// Build a descriptor, falling back to the key naming convention when the
    /// service did not state whether a target is required
    pub fn new(
        key: AlgorithmKey,
        name: impl Into<String>,
        description: impl Into<String>,
        requires_target: Option<bool>,
    ) -> Self {
        let requires_target = requires_target.unwrap_or_else(|| key.looks_like_search());
        Self {
            key,
            name: name.into(),
            description: description.into(),
            requires_target,
        }
    }

    /// Label used by selection widgets
    pub fn label(&self) -> String {
        format!("{} - {}", self.name, self.description)
    }
}
