//! Reference corpus: the protocol page, split into titled sections and
//! categorized once, then served read-only for the life of the process.

pub mod categorize;
pub mod handlers;
pub mod loader;
pub mod scrape;
pub mod source;

use std::sync::Arc;

use thiserror::Error;

use crate::models::section::ReferenceSection;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Protocol page returned status {0}")]
    Status(u16),

    #[error("Gave up after {attempts} fetch attempts")]
    Exhausted { attempts: u32 },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Immutable handle over the cached sections, cheap to clone into each
/// request. Built once at startup and passed explicitly through `AppState`.
#[derive(Debug, Clone)]
pub struct ReferenceCorpus {
    sections: Arc<[ReferenceSection]>,
}

impl ReferenceCorpus {
    pub fn new(sections: Vec<ReferenceSection>) -> Self {
        Self {
            sections: Arc::from(sections),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Sections in their original page order.
    pub fn sections(&self) -> &[ReferenceSection] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
