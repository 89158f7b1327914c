//! Transport layer: the blocking HTTP collaborator behind [`crate::Client`].
//!
//! Anything implementing [`BlockingTransport`] can be injected via
//! [`crate::ClientBuilder::transport`]; [`UreqBlocking`] is the default.

use http::{HeaderMap, Method, StatusCode, header::CONTENT_TYPE};
use std::time::Duration;
use url::Url;

pub mod blocking_transport;
#[cfg(feature = "metrics")]
pub(crate) mod metrics;

pub use blocking_transport::{BlockingTransport, DynBlockingTransport, UreqBlocking};

#[derive(Clone, Debug)]
pub struct TransportBody {
    pub bytes: Vec<u8>,
}

/// A fully resolved request handed to the transport.
#[derive(Clone, Debug)]
pub struct TransportRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<TransportBody>,
    pub timeout: Duration,
}

/// Raw response as received from the wire.
#[derive(Clone, Debug)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TransportResponse {
    #[must_use]
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// First `Content-Type` value, if it is valid visible ASCII.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get_all(CONTENT_TYPE)
            .iter()
            .next()
            .and_then(|value| value.to_str().ok())
    }
}
