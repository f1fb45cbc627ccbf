use crate::error::ProxyError;
use crate::options::FetchOptions;
use archivist_types::ProxyMode;
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;

pub struct RawFetchResponse {
    pub status: u16,
    pub body: Vec<u8>,
    pub headers: HashMap<String, String>,
}

/// Abstracts the third-party fetch-proxy HTTP API so the escalation
/// algorithm in `ProxyGateway` doesn't know the provider's wire format.
/// Grounded on the original Python `SmartScrapingBeeManager`
/// (`_make_no_js_request` / `_make_js_request`): one HTTP call per mode,
/// query parameters select JS rendering and proxy tier.
#[async_trait]
pub trait FetchBackend: Send + Sync {
    async fn fetch(
        &self,
        url: &str,
        mode: ProxyMode,
        opts: &FetchOptions,
    ) -> Result<RawFetchResponse, ProxyError>;
}

/// A ScrapingBee-shaped fetch proxy: one endpoint, mode selected via
/// `render_js` / `premium_proxy` / `stealth_proxy` query parameters.
pub struct ScrapingProxyBackend {
    client: Client,
    api_key: String,
    endpoint: String,
    default_country: Option<String>,
}

impl ScrapingProxyBackend {
    pub fn new(api_key: String, default_country: Option<String>) -> Self {
        Self {
            client: Client::builder()
                .user_agent("Archivist/0.1")
                .gzip(true)
                .brotli(true)
                .build()
                .expect("reqwest client build"),
            api_key,
            endpoint: "https://proxy.archivist.invalid/v1".to_string(),
            default_country,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn apply_mode(&self, mode: ProxyMode, query: &mut Vec<(&'static str, String)>) {
        match mode {
            ProxyMode::NoJs => {
                query.push(("render_js", "false".into()));
            }
            ProxyMode::Standard => {
                query.push(("render_js", "true".into()));
            }
            ProxyMode::Premium => {
                query.push(("render_js", "true".into()));
                query.push(("premium_proxy", "true".into()));
            }
            ProxyMode::Stealth => {
                query.push(("render_js", "true".into()));
                query.push(("stealth_proxy", "true".into()));
            }
        }
    }
}

#[async_trait]
impl FetchBackend for ScrapingProxyBackend {
    async fn fetch(
        &self,
        url: &str,
        mode: ProxyMode,
        opts: &FetchOptions,
    ) -> Result<RawFetchResponse, ProxyError> {
        let mut query: Vec<(&'static str, String)> = vec![
            ("api_key", self.api_key.clone()),
            ("url", url.to_string()),
        ];

        if !opts.binary {
            self.apply_mode(mode, &mut query);
        } else {
            query.push(("render_js", "false".into()));
        }

        if opts.block_ads {
            query.push(("block_ads", "true".into()));
        }
        if opts.block_resources {
            query.push(("block_resources", "true".into()));
        }
        if opts.wait_after_load_ms > 0 {
            query.push(("wait", opts.wait_after_load_ms.to_string()));
        }
        let country = opts.country_code.clone().or_else(|| self.default_country.clone());
        if let Some(cc) = country {
            query.push(("country_code", cc));
        }
        if !opts.js_scenario.is_empty() {
            query.push(("js_scenario", encode_js_scenario(&opts.js_scenario)));
        }

        let request = self
            .client
            .get(&self.endpoint)
            .query(&query)
            .timeout(opts.timeout.max(Duration::from_secs(1)));

        let response = request.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.to_string(), v.to_string())))
            .collect();
        let body = response.bytes().await?.to_vec();

        Ok(RawFetchResponse {
            status,
            body,
            headers,
        })
    }
}

fn encode_js_scenario(actions: &[crate::options::JsAction]) -> String {
    use crate::options::JsAction::*;
    let steps: Vec<serde_json::Value> = actions
        .iter()
        .map(|a| match a {
            Click { selector } => serde_json::json!({"click": selector}),
            Scroll { pixels } => serde_json::json!({"scroll": pixels}),
            WaitForSelector { selector, timeout } => {
                serde_json::json!({"wait_for": selector, "timeout_ms": timeout.as_millis()})
            }
            Wait { ms } => serde_json::json!({"wait_ms": ms}),
        })
        .collect();
    serde_json::json!({ "instructions": steps }).to_string()
}
