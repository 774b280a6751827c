use thiserror::Error;

use crate::resources::ResourceKind;

/// Failures talking to the Postman API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx status with a Postman error body.
    #[error("{message} ({name}, HTTP {status})")]
    Response {
        status: u16,
        name: String,
        message: String,
    },

    #[error("unexpected HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed {resource} payload: {source}")]
    MalformedPayload {
        resource: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            ApiError::Response { status, .. } | ApiError::Status { status, .. } => Some(*status),
            ApiError::MalformedPayload { .. } => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("script body in event {event} of {owner:?} is {found}, not a string or string array")]
    UnsupportedScriptBody {
        owner: String,
        event: usize,
        found: &'static str,
    },

    #[error("failed to format output")]
    Format(#[from] std::fmt::Error),
}

#[derive(Debug, Error)]
pub enum DescribeError {
    #[error("failed to fetch {kind} {id:?}: {source}")]
    Fetch {
        kind: ResourceKind,
        id: String,
        #[source]
        source: ApiError,
    },

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("{0}")]
    Usage(String),
}

// ============================================================================
// Tests
// ============================================================================
