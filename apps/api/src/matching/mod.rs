//! Relevance matching: relates a user's answers and the reference corpus to
//! the five routine components.
//!
//! Two layers:
//! - `categories`: static tag → category tables (which protocol areas the
//!   user cares about).
//! - `scoring`: picks the single best corpus section per component.
//!
//! `AppState` holds an `Arc<dyn SectionMatcher>`, `KeywordSectionMatcher` by default.

pub mod categories;
pub mod scoring;

use std::collections::BTreeMap;

use crate::corpus::ReferenceCorpus;
use crate::models::routine::Component;
use crate::models::section::ReferenceSection;

#[derive(Debug, Clone, PartialEq)]
pub struct SectionMatch {
    pub section: ReferenceSection,
    pub score: u32,
}

/// Best section per component; components without a candidate are absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoutineMatch {
    by_component: BTreeMap<Component, SectionMatch>,
}

impl RoutineMatch {
    pub fn insert(&mut self, component: Component, matched: SectionMatch) {
        self.by_component.insert(component, matched);
    }

    pub fn get(&self, component: Component) -> Option<&SectionMatch> {
        self.by_component.get(&component)
    }
}

/// Picks reference sections for a routine. Must be deterministic for a given corpus.
pub trait SectionMatcher: Send + Sync {
    fn match_components(&self, corpus: &ReferenceCorpus) -> RoutineMatch;
}
