//! Errors raised by the external-service clients.
//!
//! These never reach the user directly: the search and chat clients catch
//! them at the call site and degrade to a stale result list or a synthetic
//! chat message. They exist so the backends can be tested and logged.

/// Failure talking to the planner backend or the geocoding service.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("unexpected response from {url}: {reason}")]
    Decode { url: String, reason: String },
}

impl ClientError {
    pub fn transport(url: &str, source: reqwest::Error) -> Self {
        Self::Transport {
            url: url.to_owned(),
            source,
        }
    }

    pub fn decode(url: &str, reason: impl std::fmt::Display) -> Self {
        Self::Decode {
            url: url.to_owned(),
            reason: reason.to_string(),
        }
    }
}

/// Failure loading static content.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("failed to parse content: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("duplicate place id: {0}")]
    DuplicatePlace(String),

    #[error("route {0:?} needs at least two points")]
    ShortRoute(String),
}
