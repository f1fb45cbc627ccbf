use archivist_types::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("all modes exhausted for host {host}")]
    AllModesExhausted { host: String },

    #[error("request cancelled")]
    Cancelled,

    #[error("permanent failure ({status}): {url}")]
    Permanent { status: u16, url: String },

    #[error("transient failure ({status}): {url}")]
    Transient { status: u16, url: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("content validator rejected response for {url}")]
    ValidatorRejected { url: String },
}

impl ProxyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProxyError::Permanent { .. } => ErrorKind::PermanentFetch,
            ProxyError::AllModesExhausted { .. }
            | ProxyError::Transient { .. }
            | ProxyError::Transport(_)
            | ProxyError::ValidatorRejected { .. } => ErrorKind::TransientFetch,
            ProxyError::Cancelled => ErrorKind::TransientFetch,
        }
    }
}
