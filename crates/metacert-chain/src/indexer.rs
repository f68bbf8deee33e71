//! # Historical Indexer
//!
//! Reconstructs the set of credentials an authority has issued by
//! scanning a bounded window of ledger event logs. Public RPC providers
//! cap the block span of a single log query and rate-limit bursts, so
//! the scan is chunked, strictly sequential, and paced:
//!
//! - the requested range is partitioned into `chunk_size` windows,
//!   scanned in increasing block order with a short pause in between;
//! - a window the provider rejects for its range size gets one degraded
//!   retry over the window's leading blocks
//!   ([`WindowRetryPolicy::fallback_window_size`], default a single
//!   block) before the window is logged and skipped — one bad window
//!   never aborts the scan;
//! - progress is reported after every window through the caller's
//!   callback.
//!
//! Events are attributed to issuers by economic origin: the event
//! schema carries no issuer identity, so each event's originating
//! transaction sender is compared (case-insensitively) against the
//! issuer's registered account.
//!
//! A scan is not restartable midway — a fresh call rescans. None of the
//! futures take a cancel token; a caller that drops the future leaves
//! in-flight requests to finish or time out on their own.

use std::time::Duration;

use metacert_core::{Address, BlockRange, ContentRef, CredentialMetadata, IssuerUid, TokenUid};

use crate::contract::{CertLedger, MintEvent};
use crate::error::ChainError;
use crate::verifier::{fetch_metadata, VerifierConfig};

/// Degraded-retry policy for windows rejected on range size.
#[derive(Debug, Clone)]
pub struct WindowRetryPolicy {
    /// Size of the fallback query issued after a range-size rejection,
    /// covering the window's leading blocks (default: 1).
    pub fallback_window_size: u64,
}

impl Default for WindowRetryPolicy {
    fn default() -> Self {
        Self {
            fallback_window_size: 1,
        }
    }
}

/// Configuration for the historical indexer.
#[derive(Debug, Clone)]
pub struct IndexerConfig {
    /// Blocks per log query — the provider's per-request limit
    /// (default: 10, the free-tier limit of common providers).
    pub chunk_size: u64,
    /// Pause between window queries (default: 100ms).
    pub window_delay: Duration,
    /// Lookback from the head when no range is supplied
    /// (default: 1,000 blocks).
    pub default_lookback: u64,
    /// Degraded-retry policy for range-size rejections.
    pub retry: WindowRetryPolicy,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            chunk_size: 10,
            window_delay: Duration::from_millis(100),
            default_lookback: 1_000,
            retry: WindowRetryPolicy::default(),
        }
    }
}

impl IndexerConfig {
    /// Override the provider's per-request block limit.
    pub fn with_chunk_size(mut self, chunk_size: u64) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Override the inter-window pause.
    pub fn with_window_delay(mut self, delay: Duration) -> Self {
        self.window_delay = delay;
        self
    }

    /// Override the default lookback.
    pub fn with_default_lookback(mut self, blocks: u64) -> Self {
        self.default_lookback = blocks;
        self
    }
}

/// Scan progress, reported after each window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanProgress {
    /// Windows fully handled so far (including skipped ones).
    pub windows_completed: u64,
    /// Total windows the range partitions into.
    pub windows_total: u64,
}

/// One issued credential, enriched with its ledger reads and resolved
/// metadata document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedCredential {
    /// The minted token identifier.
    pub token_uid: TokenUid,
    /// The metadata URL recorded on-chain.
    pub token_uri: String,
    /// Current holder.
    pub owner: Address,
    /// Block the mint landed in.
    pub block_number: u64,
    /// Hash of the mint transaction.
    pub transaction_hash: String,
    /// The resolved metadata document.
    pub metadata: CredentialMetadata,
    /// Gateway-resolvable artwork URL.
    pub image_url: String,
}

/// Chunked, rate-limit-aware scanner over the ledger's mint events.
#[derive(Debug, Clone)]
pub struct HistoricalIndexer {
    ledger: CertLedger,
    http: reqwest::Client,
    gateway_host: String,
    config: IndexerConfig,
}

impl HistoricalIndexer {
    /// Build an indexer sharing `ledger`'s RPC connection. `resolution`
    /// carries the gateway rules metadata documents are fetched under —
    /// the same rules the verifier applies.
    pub fn new(
        ledger: CertLedger,
        resolution: VerifierConfig,
        config: IndexerConfig,
    ) -> Result<Self, ChainError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(resolution.timeout_secs))
            .build()
            .map_err(|e| ChainError::MetadataUnavailable {
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            ledger,
            http,
            gateway_host: resolution.gateway_host,
            config,
        })
    }

    /// List the credentials `issuer_uid` has issued inside `range`
    /// (bounds inclusive; defaults to the most recent
    /// [`IndexerConfig::default_lookback`] blocks ending at the head),
    /// most recently issued first.
    ///
    /// `on_progress` is invoked after each window with the running
    /// window counts.
    ///
    /// An empty result is the normal "no credentials found" terminal
    /// state, not an error.
    pub async fn list_issued_credentials<F>(
        &self,
        issuer_uid: IssuerUid,
        range: Option<(u64, u64)>,
        mut on_progress: F,
    ) -> Result<Vec<IssuedCredential>, ChainError>
    where
        F: FnMut(ScanProgress),
    {
        // Caller-supplied bounds are validated before any network call.
        if let Some((from_block, to_block)) = range {
            if from_block > to_block {
                return Err(ChainError::InvalidRange {
                    from_block,
                    to_block,
                });
            }
        }

        let issuer = self.ledger.issuer_mapping(issuer_uid).await?;
        if !issuer.is_registered() {
            return Err(ChainError::IssuerNotFound { issuer_uid });
        }

        let range = match range {
            Some((from_block, to_block)) => {
                BlockRange::new(from_block, to_block).map_err(|_| ChainError::InvalidRange {
                    from_block,
                    to_block,
                })?
            }
            None => {
                let head = self.ledger.head_block().await?;
                BlockRange::new(head.saturating_sub(self.config.default_lookback), head)
                    .map_err(|_| ChainError::InvalidRange {
                        from_block: head.saturating_sub(self.config.default_lookback),
                        to_block: head,
                    })?
            }
        };

        tracing::info!(
            issuer = %issuer_uid,
            range = %range,
            chunk_size = self.config.chunk_size,
            "scanning ledger for issued credentials"
        );

        let events = self.scan_windows(range, &mut on_progress).await;
        let mut credentials = self.enrich_events(events, &issuer.account_address).await;

        // Stable: ties keep their discovery order.
        credentials.sort_by(|a, b| b.block_number.cmp(&a.block_number));
        Ok(credentials)
    }

    /// Scan every window of `range` sequentially, accumulating raw mint
    /// events in ledger log order.
    async fn scan_windows<F>(&self, range: BlockRange, on_progress: &mut F) -> Vec<MintEvent>
    where
        F: FnMut(ScanProgress),
    {
        let windows_total = range.window_count(self.config.chunk_size);
        let mut events = Vec::new();

        for (i, window) in range.windows(self.config.chunk_size).enumerate() {
            match self.ledger.cert_minted_logs(window).await {
                Ok(mut batch) => events.append(&mut batch),
                Err(e) if e.is_range_limit() => {
                    let fallback_to = window
                        .from_block()
                        .saturating_add(self.config.retry.fallback_window_size.max(1) - 1)
                        .min(window.to_block());
                    let fallback = BlockRange::new(window.from_block(), fallback_to)
                        .unwrap_or_else(|_| BlockRange::single(window.from_block()));
                    tracing::warn!(
                        window = %window,
                        fallback = %fallback,
                        error = %e,
                        "provider rejected window for range size; degrading"
                    );
                    match self.ledger.cert_minted_logs(fallback).await {
                        Ok(mut batch) => events.append(&mut batch),
                        Err(e2) => tracing::warn!(
                            window = %window,
                            error = %e2,
                            "degraded query failed; skipping window"
                        ),
                    }
                }
                Err(e) => {
                    tracing::warn!(window = %window, error = %e, "window scan failed; skipping")
                }
            }

            on_progress(ScanProgress {
                windows_completed: i as u64 + 1,
                windows_total,
            });

            if (i as u64) + 1 < windows_total {
                tokio::time::sleep(self.config.window_delay).await;
            }
        }
        events
    }

    /// Fan out per-event enrichment and await the batch together.
    /// Events not sent by `issuer_address` are excluded; per-item
    /// failures are logged and drop only that item.
    async fn enrich_events(
        &self,
        events: Vec<MintEvent>,
        issuer_address: &Address,
    ) -> Vec<IssuedCredential> {
        let tasks: Vec<_> = events
            .into_iter()
            .map(|event| {
                let ledger = self.ledger.clone();
                let http = self.http.clone();
                let gateway = self.gateway_host.clone();
                let issuer_address = issuer_address.clone();
                tokio::spawn(async move {
                    enrich_one(ledger, http, gateway, issuer_address, event).await
                })
            })
            .collect();

        let mut credentials = Vec::with_capacity(tasks.len());
        for task in tasks {
            match task.await {
                Ok(Some(credential)) => credentials.push(credential),
                Ok(None) => {}
                Err(e) => tracing::warn!(error = %e, "enrichment task panicked"),
            }
        }
        credentials
    }
}

/// Enrich a single raw event into an [`IssuedCredential`], or `None`
/// when the event fails the issuer filter or a per-item read fails.
async fn enrich_one(
    ledger: CertLedger,
    http: reqwest::Client,
    gateway_host: String,
    issuer_address: Address,
    event: MintEvent,
) -> Option<IssuedCredential> {
    let sender = match ledger.transaction_sender(&event.transaction_hash).await {
        Ok(sender) => sender,
        Err(e) => {
            tracing::warn!(
                tx_hash = %event.transaction_hash,
                error = %e,
                "could not attribute event; dropping"
            );
            return None;
        }
    };

    // Address equality is case-insensitive; events from any other
    // sender matched the mint filter but not this issuer.
    if sender != issuer_address {
        tracing::debug!(
            tx_hash = %event.transaction_hash,
            sender = %sender,
            "event sender is not the issuer; excluding"
        );
        return None;
    }

    let (uri, owner) = tokio::join!(
        ledger.token_uri(event.token_uid),
        ledger.owner_of(event.token_uid),
    );
    let (token_uri, owner) = match (uri, owner) {
        (Ok(uri), Ok(owner)) => (uri, owner),
        (Err(e), _) | (_, Err(e)) => {
            tracing::warn!(
                token_uid = %event.token_uid,
                error = %e,
                "ledger read failed for credential; dropping"
            );
            return None;
        }
    };

    let reference = match ContentRef::new(token_uri.as_str()) {
        Ok(reference) => reference,
        Err(e) => {
            tracing::warn!(
                token_uid = %event.token_uid,
                error = %e,
                "stored tokenURI is not a content reference; dropping"
            );
            return None;
        }
    };

    let metadata_url = reference.gateway_url(&gateway_host);
    let metadata = match fetch_metadata(&http, &metadata_url).await {
        Ok(metadata) => metadata,
        Err(e) => {
            tracing::warn!(
                token_uid = %event.token_uid,
                error = %e,
                "metadata unavailable for credential; dropping"
            );
            return None;
        }
    };
    let image_url = metadata.image.gateway_url(&gateway_host);

    Some(IssuedCredential {
        token_uid: event.token_uid,
        token_uri,
        owner,
        block_number: event.block_number,
        transaction_hash: event.transaction_hash,
        metadata,
        image_url,
    })
}
