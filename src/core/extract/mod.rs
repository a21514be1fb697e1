//! Extraction: documentation comments to entity records, one file at a time.
//!
//! Each documented node contributes evidence from three sources, merged in
//! increasing order of precedence:
//! - `line_hints`: text patterns over the first line of code
//! - `shape`: the syntax of the defining node
//! - the tags of the comment itself (see `crate::core::tags`)
//!
//! Cross-entity corrections happen afterwards, in `crate::core::resolve`.

pub mod correlator;
pub mod line_hints;
pub mod scope;
pub mod shape;


use std::collections::HashSet;

pub use correlator::{Correlator, correlate};
pub use scope::ScopeContext;
pub use shape::Shape;

use crate::core::resolve::ResolutionMode;

/// Object names whose `extend` calls mix objects instead of defining classes.
pub const DEFAULT_UTILITY_NAMESPACES: &[&str] = &["_"];

/// Options for extracting one source unit.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// URL recorded in every entity's source reference.
    pub source_url: Option<String>,
    /// File name recorded in every entity's source reference.
    pub source_name: Option<String>,
    pub utility_namespaces: HashSet<String>,
    pub resolution: ResolutionMode,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            source_url: None,
            source_name: None,
            utility_namespaces: DEFAULT_UTILITY_NAMESPACES
                .iter()
                .map(|ns| ns.to_string())
                .collect(),
            resolution: ResolutionMode::default(),
        }
    }
}

impl ExtractOptions {
    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }

    pub fn with_utility_namespaces<I, S>(mut self, namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.utility_namespaces = namespaces.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_resolution(mut self, resolution: ResolutionMode) -> Self {
        self.resolution = resolution;
        self
    }
}
