//! Proxy Gateway (spec §4.1): fetches a URL through a third-party
//! fetch-proxy provider, escalating from the cheapest mode (`NoJs`) up
//! through `Standard`, `Premium`, `Stealth` only as needed, and
//! remembering per-host which mode worked so future requests to the same
//! host skip straight to it.
//!
//! Grounded on `riptide-fetch::fetch::ReliableHttpClient` (retry +
//! backoff wrapper around `reqwest`) and `riptide-core::circuit` (per-host
//! circuit state), generalized here to escalate across proxy *modes*
//! rather than open/close a single circuit.

mod backend;
mod error;
mod gateway;
mod options;
mod stats;

pub use backend::{FetchBackend, RawFetchResponse, ScrapingProxyBackend};
pub use error::ProxyError;
pub use gateway::{ProxyGateway, ProxyResponse};
pub use options::{ContentValidator, FetchOptions, JsAction};
pub use stats::{ModeStats, ProxyStats};

pub use archivist_types::{HostCapabilityCache, ProxyMode};

#[cfg(test)]
mod tests;
