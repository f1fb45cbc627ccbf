use archivist_types::ProxyMode;
use std::sync::Arc;
use std::time::Duration;

/// Opaque scripted-interaction instruction (spec §4.1 `js_scenario`).
#[derive(Debug, Clone)]
pub enum JsAction {
    Click { selector: String },
    Scroll { pixels: i64 },
    WaitForSelector { selector: String, timeout: Duration },
    Wait { ms: u64 },
}

/// `(body_bytes, url) -> bool` acceptance callback (spec §4.1
/// `content_validator`).
pub type ContentValidator = Arc<dyn Fn(&[u8], &str) -> bool + Send + Sync>;

#[derive(Clone)]
pub struct FetchOptions {
    pub content_validator: Option<ContentValidator>,
    pub force_mode: Option<ProxyMode>,
    pub timeout: Duration,
    pub wait_after_load_ms: u64,
    pub block_ads: bool,
    pub block_resources: bool,
    pub country_code: Option<String>,
    pub js_scenario: Vec<JsAction>,
    /// Skip JS rendering, accept any content-type (spec §4.1 `binary`).
    pub binary: bool,
}

impl std::fmt::Debug for FetchOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchOptions")
            .field("has_validator", &self.content_validator.is_some())
            .field("force_mode", &self.force_mode)
            .field("timeout", &self.timeout)
            .field("wait_after_load_ms", &self.wait_after_load_ms)
            .field("block_ads", &self.block_ads)
            .field("block_resources", &self.block_resources)
            .field("country_code", &self.country_code)
            .field("js_scenario_len", &self.js_scenario.len())
            .field("binary", &self.binary)
            .finish()
    }
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            content_validator: None,
            force_mode: None,
            timeout: Duration::from_secs(20),
            wait_after_load_ms: 0,
            block_ads: true,
            block_resources: false,
            country_code: None,
            js_scenario: Vec::new(),
            binary: false,
        }
    }
}

impl FetchOptions {
    pub fn binary() -> Self {
        Self {
            binary: true,
            ..Default::default()
        }
    }

    pub fn with_validator(mut self, validator: ContentValidator) -> Self {
        self.content_validator = Some(validator);
        self
    }

    pub fn with_force_mode(mut self, mode: ProxyMode) -> Self {
        self.force_mode = Some(mode);
        self
    }

    pub fn passes(&self, body: &[u8], url: &str) -> bool {
        match &self.content_validator {
            Some(f) => f(body, url),
            None => true,
        }
    }
}
