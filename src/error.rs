use http::{Method, StatusCode};
use std::{error::Error as StdError, fmt};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy)]
pub struct BodySnippetConfig {
    pub enabled: bool,
    pub max_bytes: usize,
}

impl Default for BodySnippetConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_bytes: 4096,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    Api,
    Transport,
    InvalidConfig,
    UnexpectedPayload,
    Attribute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransportErrorKind {
    Timeout,
    Connect,
    Other,
}

/// Why the API call was rejected while interpreting the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ApiErrorKind {
    /// Empty body on anything other than `204 No Content`.
    EmptyBody,
    /// The body was not valid JSON.
    Decode,
    /// HTTP status >= 400.
    Status,
}

/// Error raised by the API layer.
///
/// `Display` renders only [`ApiError::message`], so callers matching on text
/// see exactly what the API produced.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: Box<str>,
    /// `None` when the failure is not tied to an error status.
    pub status: Option<StatusCode>,
    pub request_id: Option<Box<str>>,
    pub body_snippet: Option<Box<str>>,
}

impl ApiError {
    pub(crate) fn new(kind: ApiErrorKind, message: impl Into<Box<str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            request_id: None,
            body_snippet: None,
        }
    }

    #[must_use]
    pub(crate) fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    /// Status code as an integer; `0` when no status applies.
    #[must_use]
    pub fn http_status(&self) -> u16 {
        self.status.map_or(0, |status| status.as_u16())
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for ApiError {}

/// All errors returned by the SDK.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("{0}")]
    Api(ApiError),

    #[error("Transport error during {method} {path}: {source}")]
    Transport {
        method: Method,
        path: Box<str>,
        kind: TransportErrorKind,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        message: Box<str>,
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },

    #[error("Unexpected payload: expected {expected}")]
    UnexpectedPayload {
        expected: &'static str,
        #[source]
        source: Option<serde_json::Error>,
    },

    #[error("Invalid value for attribute `{key}`: {source}")]
    Attribute {
        key: Box<str>,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Api(_) => ErrorKind::Api,
            Self::Transport { .. } => ErrorKind::Transport,
            Self::InvalidConfig { .. } => ErrorKind::InvalidConfig,
            Self::UnexpectedPayload { .. } => ErrorKind::UnexpectedPayload,
            Self::Attribute { .. } => ErrorKind::Attribute,
        }
    }

    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api(e) => e.status,
            _ => None,
        }
    }

    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Self::Api(e) => e.request_id.as_deref(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(e) => Some(e),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self.status(),
            Some(StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        )
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    pub(crate) fn unexpected(expected: &'static str) -> Self {
        Self::UnexpectedPayload {
            expected,
            source: None,
        }
    }
}

impl From<ApiError> for Error {
    fn from(error: ApiError) -> Self {
        Self::Api(error)
    }
}
