use crate::backend::FetchBackend;
use crate::error::ProxyError;
use crate::options::FetchOptions;
use crate::stats::ProxyStats;
use archivist_types::{HostCapabilityCache, ProxyMode};
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use url::Url;

pub struct ProxyResponse {
    pub status: u16,
    pub body: Vec<u8>,
    pub headers: HashMap<String, String>,
    pub mode_used: ProxyMode,
}

/// Fetches URLs through an escalating-cost proxy backend, caching the
/// cheapest working mode per host (spec §4.1).
pub struct ProxyGateway {
    backend: Arc<dyn FetchBackend>,
    host_cache: DashMap<String, HostCapabilityCache>,
    stats: ProxyStats,
    backoff: Duration,
}

impl ProxyGateway {
    pub fn new(backend: Arc<dyn FetchBackend>) -> Self {
        Self {
            backend,
            host_cache: DashMap::new(),
            stats: ProxyStats::new(),
            backoff: Duration::from_secs(1),
        }
    }

    pub fn stats(&self) -> &ProxyStats {
        &self.stats
    }

    pub fn cached_mode(&self, host: &str) -> Option<ProxyMode> {
        self.host_cache.get(host).and_then(|c| c.mode)
    }

    fn host_of(url: &str) -> String {
        Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_string()))
            .unwrap_or_default()
    }

    /// Run the escalation algorithm for `url` (spec §4.1 steps 1-4).
    #[instrument(skip(self, opts, cancel), fields(url = %url))]
    pub async fn fetch(
        &self,
        url: &str,
        opts: FetchOptions,
        cancel: CancellationToken,
    ) -> Result<ProxyResponse, ProxyError> {
        let host = Self::host_of(url);

        // Step 1: cached mode, unless force_mode overrides it.
        if opts.force_mode.is_none() {
            if let Some(mode) = self.cached_mode(&host) {
                if let Ok(resp) = self.try_mode(url, mode, &opts, &cancel).await {
                    return Ok(resp);
                }
                // Cached mode regressed (site changed); fall through to
                // full escalation below.
            }
        }

        let start_mode = opts.force_mode.unwrap_or(ProxyMode::NoJs);
        let mut mode = Some(start_mode);

        while let Some(current) = mode {
            if cancel.is_cancelled() {
                return Err(ProxyError::Cancelled);
            }
            match self.try_mode(url, current, &opts, &cancel).await {
                Ok(resp) => {
                    let mut entry = self.host_cache.entry(host.clone()).or_default();
                    entry.record_success(current);
                    return Ok(resp);
                }
                Err(ProxyError::Permanent { status, url }) => {
                    return Err(ProxyError::Permanent { status, url });
                }
                Err(_) => {
                    let mut entry = self.host_cache.entry(host.clone()).or_default();
                    entry.record_failure();
                    if opts.force_mode.is_some() {
                        break;
                    }
                    mode = current.escalate();
                    if mode.is_some() {
                        debug!(host = %host, from = ?current, to = ?mode, "escalating proxy mode");
                    }
                }
            }
        }

        warn!(host = %host, "all proxy modes exhausted");
        Err(ProxyError::AllModesExhausted { host })
    }

    /// Try one mode, with its bounded retries and inter-attempt backoff
    /// (spec §4.1 "Retries per mode").
    async fn try_mode(
        &self,
        url: &str,
        mode: ProxyMode,
        opts: &FetchOptions,
        cancel: &CancellationToken,
    ) -> Result<ProxyResponse, ProxyError> {
        let attempts = mode.retry_attempts();
        let mut last_err = None;

        for attempt in 0..attempts {
            if cancel.is_cancelled() {
                return Err(ProxyError::Cancelled);
            }
            self.stats.record_attempt(mode);

            let fetch = self.backend.fetch(url, mode, opts);
            let result = tokio::select! {
                r = fetch => r,
                _ = cancel.cancelled() => return Err(ProxyError::Cancelled),
            };

            match result {
                Ok(raw) => {
                    if raw.status == 429 || raw.status >= 500 {
                        // 429 / 5xx: transient, escalate (spec §4.1 Failure
                        // semantics).
                        self.stats.record_failure(mode);
                        last_err = Some(ProxyError::Transient {
                            status: raw.status,
                            url: url.to_string(),
                        });
                    } else if raw.status >= 400 {
                        // 4xx except 429: permanent, do not escalate.
                        self.stats.record_failure(mode);
                        return Err(ProxyError::Permanent {
                            status: raw.status,
                            url: url.to_string(),
                        });
                    } else if !opts.passes(&raw.body, url) {
                        self.stats.record_failure(mode);
                        last_err = Some(ProxyError::ValidatorRejected {
                            url: url.to_string(),
                        });
                    } else {
                        self.stats.record_success(mode);
                        return Ok(ProxyResponse {
                            status: raw.status,
                            body: raw.body,
                            headers: raw.headers,
                            mode_used: mode,
                        });
                    }
                }
                Err(e) => {
                    self.stats.record_failure(mode);
                    last_err = Some(e);
                }
            }

            if attempt + 1 < attempts {
                tokio::time::sleep(self.backoff).await;
            }
        }

        info!(url = %url, ?mode, "mode exhausted its retries");
        Err(last_err.unwrap_or(ProxyError::AllModesExhausted {
            host: Self::host_of(url),
        }))
    }
}
