//! Query state machine.
//!
//! Every event carries the [`QueryTag`] of the query that produced it. Events
//! whose tag is not the current query's are discarded, so a superseded query
//! can never write into the state of its successor.

use serde::Serialize;
use tracing::debug;

use crate::error::ScanError;
use crate::models::{EnrichmentMap, NftMetadata, TokenReport};

/// Identity of one top-level query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryTag {
    pub generation: u64,
    pub mint: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Ready,
    Error,
}

#[derive(Debug, Clone)]
pub enum ScanEvent {
    QueryRequested(QueryTag),
    PrimarySucceeded { tag: QueryTag, report: TokenReport },
    PrimaryFailed { tag: QueryTag, error: ScanError },
    MetadataResolved { tag: QueryTag, metadata: Option<NftMetadata> },
    CreatorTokensResolved { tag: QueryTag, metadata: EnrichmentMap },
}

impl ScanEvent {
    fn tag(&self) -> &QueryTag {
        match self {
            ScanEvent::QueryRequested(tag) => tag,
            ScanEvent::PrimarySucceeded { tag, .. }
            | ScanEvent::PrimaryFailed { tag, .. }
            | ScanEvent::MetadataResolved { tag, .. }
            | ScanEvent::CreatorTokensResolved { tag, .. } => tag,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScanState {
    current: Option<QueryTag>,
    last_generation: u64,

    pub phase: Phase,
    pub error: Option<String>,
    pub report: Option<TokenReport>,
    /// Enrichment for the queried mint itself
    pub metadata: Option<NftMetadata>,
    /// Enrichment for the creator's other tokens
    pub creator_metadata: EnrichmentMap,
    pub metadata_pending: bool,
    pub creator_tokens_pending: bool,
}

impl ScanState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&QueryTag> {
        self.current.as_ref()
    }

    /// Allocates the tag for a new query. The query becomes current once its
    /// `QueryRequested` event is applied.
    pub fn next_tag(&mut self, mint: &str) -> QueryTag {
        self.last_generation += 1;
        QueryTag {
            generation: self.last_generation,
            mint: mint.to_string(),
        }
    }

    fn is_current(&self, tag: &QueryTag) -> bool {
        self.current.as_ref() == Some(tag)
    }

    /// Applies `event`. Returns `false` when it was discarded as stale.
    pub fn apply(&mut self, event: ScanEvent) -> bool {
        let opens_query = matches!(event, ScanEvent::QueryRequested(_));
        if !opens_query && !self.is_current(event.tag()) {
            debug!(
                "Discarding stale event for {} (generation {})",
                event.tag().mint,
                event.tag().generation
            );
            return false;
        }

        match event {
            ScanEvent::QueryRequested(tag) => {
                *self = ScanState {
                    current: Some(tag),
                    last_generation: self.last_generation,
                    phase: Phase::Loading,
                    ..ScanState::default()
                };
                true
            }
            ScanEvent::PrimarySucceeded { report, .. } => {
                self.phase = Phase::Ready;
                self.metadata_pending = true;
                self.creator_tokens_pending = !report.creator_tokens.is_empty();
                self.report = Some(report);
                true
            }
            ScanEvent::PrimaryFailed { error, .. } => {
                self.phase = Phase::Error;
                self.error = Some(error.user_message());
                self.report = None;
                self.metadata = None;
                self.creator_metadata.clear();
                self.metadata_pending = false;
                self.creator_tokens_pending = false;
                true
            }
            ScanEvent::MetadataResolved { metadata, .. } => {
                if self.phase != Phase::Ready {
                    return false;
                }
                self.metadata = metadata;
                self.metadata_pending = false;
                true
            }
            ScanEvent::CreatorTokensResolved { metadata, .. } => {
                if self.phase != Phase::Ready {
                    return false;
                }
                self.creator_metadata = metadata;
                self.creator_tokens_pending = false;
                true
            }
        }
    }
}
