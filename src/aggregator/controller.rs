//! Aggregation controller.
//!
//! Runs the primary report lookup, then launches the best-effort enrichment
//! branches in the background and returns as soon as the report is in. Each
//! branch reports back through [`ScanEvent`]s tagged with its query, and the
//! state drops any event whose query has since been superseded. Opening a new
//! query also cancels the branches still running for the previous one.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::batch::enrich_in_windows;
use super::state::{QueryTag, ScanEvent, ScanState};
use super::view::{build_view, ViewModel, ViewOptions};
use crate::api::{NftClient, RugcheckClient};
use crate::config::Config;
use crate::error::ScanError;

#[derive(Clone)]
pub struct ScanController {
    reports: Arc<RugcheckClient>,
    nfts: Arc<NftClient>,
    state: Arc<RwLock<ScanState>>,
    window: usize,
    options: ViewOptions,
    /// Bumped after every applied event
    revision: Arc<watch::Sender<u64>>,
    tasks: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl ScanController {
    pub fn new(config: &Config) -> Result<Self> {
        let timeout = Duration::from_secs(config.request_timeout_secs);
        let reports = RugcheckClient::new(&config.report_base_url, timeout)?;
        let nfts = NftClient::new(&config.nft_base_url, timeout)?;

        Ok(Self::with_clients(
            Arc::new(reports),
            Arc::new(nfts),
            config.enrichment_window,
            ViewOptions {
                creator_tokens_preview: config.creator_tokens_preview,
            },
        ))
    }

    pub fn with_clients(
        reports: Arc<RugcheckClient>,
        nfts: Arc<NftClient>,
        window: usize,
        options: ViewOptions,
    ) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            reports,
            nfts,
            state: Arc::new(RwLock::new(ScanState::new())),
            window,
            options,
            revision: Arc::new(revision),
            tasks: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Starts a top-level query for `input`.
    ///
    /// Returns once the primary report has resolved; enrichment continues in
    /// the background. Blank input is rejected without touching the state.
    pub async fn query(&self, input: &str) -> Result<QueryTag, ScanError> {
        let mint = input.trim();
        if mint.is_empty() {
            debug!("Ignoring empty token query");
            return Err(ScanError::EmptyInput);
        }

        let tag = {
            let mut state = self.state.write().await;
            let tag = state.next_tag(mint);
            state.apply(ScanEvent::QueryRequested(tag.clone()));
            tag
        };
        self.bump();
        self.cancel_enrichment().await;
        info!("Scanning token {} (query {})", mint, tag.generation);

        match self.reports.fetch_report(mint).await {
            Ok(report) => {
                let creator_mints = report.creator_mints();
                let applied = self
                    .apply(ScanEvent::PrimarySucceeded {
                        tag: tag.clone(),
                        report,
                    })
                    .await;
                if !applied {
                    debug!("Query {} for {} was superseded", tag.generation, mint);
                    return Ok(tag);
                }

                self.spawn_enrichment(&tag, creator_mints).await;
                Ok(tag)
            }
            Err(error) => {
                warn!("Report lookup for {} failed: {}", mint, error);
                self.apply(ScanEvent::PrimaryFailed {
                    tag,
                    error: error.clone(),
                })
                .await;
                Err(error)
            }
        }
    }

    /// Re-runs the whole pipeline for a token picked from the current view.
    pub async fn navigate(&self, mint: &str) -> Result<QueryTag, ScanError> {
        let known = {
            let state = self.state.read().await;
            state
                .report
                .as_ref()
                .map(|r| r.creator_tokens.iter().any(|t| t.mint == mint.trim()))
                .unwrap_or(false)
        };
        if known {
            info!("Navigating to creator token {}", mint.trim());
        } else {
            debug!("Navigating to {} which is not in the current view", mint.trim());
        }
        self.query(mint).await
    }

    async fn spawn_enrichment(&self, tag: &QueryTag, creator_mints: Vec<String>) {
        let mut handles = Vec::with_capacity(2);

        let this = self.clone();
        let single_tag = tag.clone();
        handles.push(tokio::spawn(async move {
            let metadata = this.nfts.fetch_metadata(&single_tag.mint).await;
            this.apply(ScanEvent::MetadataResolved {
                tag: single_tag,
                metadata,
            })
            .await;
        }));

        if !creator_mints.is_empty() {
            let this = self.clone();
            let batch_tag = tag.clone();
            handles.push(tokio::spawn(async move {
                let nfts = this.nfts.clone();
                let outcome = enrich_in_windows(&creator_mints, this.window, |mint| {
                    let nfts = nfts.clone();
                    async move { nfts.fetch_metadata(&mint).await }
                })
                .await;
                info!(
                    "Enriched {} of {} creator tokens for {}",
                    outcome.resolved.len(),
                    creator_mints.len(),
                    batch_tag.mint
                );
                this.apply(ScanEvent::CreatorTokensResolved {
                    tag: batch_tag,
                    metadata: outcome.resolved,
                })
                .await;
            }));
        }

        let mut tasks = self.tasks.lock().await;
        tasks.retain(|handle| !handle.is_finished());
        tasks.extend(handles);
    }

    /// Aborts enrichment branches of earlier queries. Their results would be
    /// discarded anyway; this only stops the outstanding lookups.
    async fn cancel_enrichment(&self) {
        let mut tasks = self.tasks.lock().await;
        let running = tasks.iter().filter(|handle| !handle.is_finished()).count();
        for handle in tasks.drain(..) {
            handle.abort();
        }
        if running > 0 {
            debug!("Cancelled {} enrichment tasks of a superseded query", running);
        }
    }

    async fn apply(&self, event: ScanEvent) -> bool {
        let applied = self.state.write().await.apply(event);
        if applied {
            self.bump();
        }
        applied
    }

    fn bump(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }

    /// Current view, rebuilt from state.
    pub async fn view(&self) -> ViewModel {
        let state = self.state.read().await;
        build_view(&state, &self.options)
    }

    /// Receiver that changes whenever the view may have changed.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Waits until every enrichment branch launched so far has settled.
    pub async fn wait_for_enrichment(&self) {
        loop {
            let pending: Vec<JoinHandle<()>> = std::mem::take(&mut *self.tasks.lock().await);
            if pending.is_empty() {
                return;
            }
            for handle in pending {
                match handle.await {
                    Ok(()) => {}
                    Err(e) if e.is_cancelled() => debug!("Enrichment task was cancelled"),
                    Err(e) => warn!("Enrichment task ended abnormally: {}", e),
                }
            }
        }
    }
}
