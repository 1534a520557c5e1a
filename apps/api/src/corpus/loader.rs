use tracing::{error, info, warn};

use crate::corpus::scrape::parse_sections;
use crate::corpus::source::ProtocolSource;
use crate::corpus::{CorpusError, ReferenceCorpus};
use crate::store::CorpusStore;

/// Builds the startup corpus. Never fails: any error is logged and an empty
/// corpus is returned, so every routine falls back to default anchors.
pub async fn load_corpus(
    store: &dyn CorpusStore,
    source: &dyn ProtocolSource,
    protocol_url: &str,
) -> ReferenceCorpus {
    match try_load_corpus(store, source, protocol_url).await {
        Ok(corpus) => corpus,
        Err(e) => {
            error!("Protocol corpus unavailable, using default links: {e}");
            ReferenceCorpus::empty()
        }
    }
}

/// Reads persisted sections; on a cold store, fetches and scrapes the page,
/// persists it with insert-if-absent semantics and reads it back.
pub async fn try_load_corpus(
    store: &dyn CorpusStore,
    source: &dyn ProtocolSource,
    protocol_url: &str,
) -> Result<ReferenceCorpus, CorpusError> {
    let cached = store.list_sections().await?;
    if !cached.is_empty() {
        info!("Loaded {} protocol sections from store", cached.len());
        return Ok(ReferenceCorpus::new(cached));
    }

    info!("Protocol corpus empty, fetching {protocol_url}");
    let html = source.fetch_page().await?;
    let scraped = parse_sections(&html, protocol_url)?;
    if scraped.is_empty() {
        warn!("Protocol page contained no sections");
        return Ok(ReferenceCorpus::empty());
    }

    store.insert_sections_if_absent(&scraped).await?;

    // Re-read so a concurrent populator's rows win consistently.
    let stored = store.list_sections().await?;
    info!("Protocol corpus initialized with {} sections", stored.len());
    Ok(ReferenceCorpus::new(stored))
}
