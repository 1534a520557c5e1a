use std::sync::Arc;

use crate::config::Config;
use crate::corpus::ReferenceCorpus;
use crate::matching::SectionMatcher;
use crate::routine::template::RoutineTemplate;
use crate::store::RoutineStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RoutineStore>,
    /// Read-only protocol sections, loaded once at startup.
    pub corpus: ReferenceCorpus,
    /// Pluggable section matcher. Default: KeywordSectionMatcher.
    pub matcher: Arc<dyn SectionMatcher>,
    pub template: Arc<RoutineTemplate>,
    pub config: Config,
}
