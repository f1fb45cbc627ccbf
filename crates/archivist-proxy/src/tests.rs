use crate::backend::{FetchBackend, RawFetchResponse};
use crate::error::ProxyError;
use crate::gateway::ProxyGateway;
use crate::options::FetchOptions;
use archivist_types::ProxyMode;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Backend that fails under every mode below `succeeds_at`, mirroring
/// spec §8 scenario 2 ("Proxy escalation").
struct ScriptedBackend {
    succeeds_at: ProxyMode,
    calls: AtomicU32,
}

#[async_trait]
impl FetchBackend for ScriptedBackend {
    async fn fetch(
        &self,
        _url: &str,
        mode: ProxyMode,
        _opts: &FetchOptions,
    ) -> Result<RawFetchResponse, ProxyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if mode >= self.succeeds_at {
            Ok(RawFetchResponse {
                status: 200,
                body: b"<html><body>ok</body></html>".to_vec(),
                headers: HashMap::new(),
            })
        } else {
            Ok(RawFetchResponse {
                status: 403,
                body: Vec::new(),
                headers: HashMap::new(),
            })
        }
    }
}

#[tokio::test]
async fn escalates_until_success_and_caches_winning_mode() {
    let backend = Arc::new(ScriptedBackend {
        succeeds_at: ProxyMode::Premium,
        calls: AtomicU32::new(0),
    });
    let gateway = ProxyGateway::new(backend);

    let resp = gateway
        .fetch(
            "https://example.test/page",
            FetchOptions::default(),
            CancellationToken::new(),
        )
        .await
        .expect("eventually succeeds");
    assert_eq!(resp.mode_used, ProxyMode::Premium);
    assert_eq!(gateway.cached_mode("example.test"), Some(ProxyMode::Premium));

    // A second URL under the same host should go straight to Premium.
    let resp2 = gateway
        .fetch(
            "https://example.test/other",
            FetchOptions::default(),
            CancellationToken::new(),
        )
        .await
        .expect("cached mode succeeds immediately");
    assert_eq!(resp2.mode_used, ProxyMode::Premium);
}

struct AlwaysForbidden;

#[async_trait]
impl FetchBackend for AlwaysForbidden {
    async fn fetch(
        &self,
        url: &str,
        _mode: ProxyMode,
        _opts: &FetchOptions,
    ) -> Result<RawFetchResponse, ProxyError> {
        Ok(RawFetchResponse {
            status: 404,
            body: Vec::new(),
            headers: HashMap::new(),
        })
    }
}

#[tokio::test]
async fn permanent_failure_does_not_escalate() {
    let gateway = ProxyGateway::new(Arc::new(AlwaysForbidden));
    let err = gateway
        .fetch(
            "https://example.test/missing",
            FetchOptions::default(),
            CancellationToken::new(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ProxyError::Permanent { status: 404, .. }));
    // No winning mode should have been cached.
    assert_eq!(gateway.cached_mode("example.test"), None);
}

struct AlwaysServerError;

#[async_trait]
impl FetchBackend for AlwaysServerError {
    async fn fetch(
        &self,
        _url: &str,
        _mode: ProxyMode,
        _opts: &FetchOptions,
    ) -> Result<RawFetchResponse, ProxyError> {
        Ok(RawFetchResponse {
            status: 503,
            body: Vec::new(),
            headers: HashMap::new(),
        })
    }
}

#[tokio::test]
async fn all_modes_exhausted_surfaces_error() {
    let gateway = ProxyGateway::new(Arc::new(AlwaysServerError));
    let err = gateway
        .fetch(
            "https://example.test/flaky",
            FetchOptions::default(),
            CancellationToken::new(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ProxyError::AllModesExhausted { .. }));
}
