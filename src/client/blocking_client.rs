//! High-level blocking MyParcel client.

use crate::{
    Auth, BodySnippetConfig, Error, Payload, api,
    response::{self, Diagnostics},
    transport::{
        TransportBody, TransportRequest, TransportResponse,
        blocking_transport::{BlockingTransport, DynBlockingTransport, UreqBlocking},
    },
    util::url::{endpoint_url, normalize_base_url},
};
use http::{
    HeaderMap, HeaderValue, Method,
    header::{ACCEPT, CONTENT_TYPE, USER_AGENT},
};
use std::{sync::Arc, time::Duration};
use url::Url;

#[cfg(feature = "tracing")]
use tracing::field;

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://api.myparcel.nl/";

const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
const JSON_MEDIA_TYPE: &str = "application/json; charset=utf-8";

/// Configures and constructs [`Client`].
pub struct ClientBuilder {
    base_url: Url,
    auth: Option<Auth>,
    insecure: bool,
    user_agent: String,
    timeout: Duration,
    connect_timeout: Duration,
    read_timeout: Duration,
    no_proxy: bool,
    default_headers: HeaderMap,
    body_snippet: BodySnippetConfig,
    transport: Option<DynBlockingTransport>,
}

impl ClientBuilder {
    fn try_new() -> Result<Self, Error> {
        Ok(Self {
            base_url: normalize_base_url(DEFAULT_BASE_URL)?,
            auth: None,
            insecure: false,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(30),
            no_proxy: false,
            default_headers: HeaderMap::new(),
            body_snippet: BodySnippetConfig::default(),
            transport: None,
        })
    }

    /// Point the client at another API root (sandbox, mock server).
    pub fn base_url(mut self, base: impl AsRef<str>) -> Result<Self, Error> {
        self.base_url = normalize_base_url(base.as_ref())?;
        Ok(self)
    }

    pub fn auth(mut self, auth: Auth) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.auth = Some(Auth::api_key(key));
        self
    }

    pub fn no_system_proxy(mut self) -> Self {
        self.no_proxy = true;
        self
    }

    pub fn danger_accept_invalid_certs(mut self, yes: bool) -> Self {
        self.insecure = yes;
        self
    }

    /// Override the default `User-Agent` header.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = ua.into();
        self
    }

    pub fn timeout(mut self, value: Duration) -> Self {
        self.timeout = value;
        self
    }

    pub fn connect_timeout(mut self, value: Duration) -> Self {
        self.connect_timeout = value;
        self
    }

    pub fn read_timeout(mut self, value: Duration) -> Self {
        self.read_timeout = value;
        self
    }

    pub fn default_header(
        mut self,
        name: http::header::HeaderName,
        value: http::HeaderValue,
    ) -> Self {
        self.default_headers.insert(name, value);
        self
    }

    pub fn default_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers.extend(headers);
        self
    }

    pub fn capture_body_snippet(mut self, enabled: bool) -> Self {
        self.body_snippet.enabled = enabled;
        self
    }

    pub fn max_body_snippet_bytes(mut self, max_bytes: usize) -> Self {
        self.body_snippet.max_bytes = max_bytes;
        self
    }

    /// Replace the default `ureq` transport.
    ///
    /// Timeout, proxy and TLS settings only apply to the default transport.
    pub fn transport(mut self, transport: impl BlockingTransport) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    pub fn build(self) -> Result<Client, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_MEDIA_TYPE));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_MEDIA_TYPE));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&self.user_agent).map_err(|err| Error::InvalidConfig {
                message: "invalid User-Agent header value".into(),
                source: Some(Box::new(err)),
            })?,
        );
        headers.extend(self.default_headers);

        let transport: DynBlockingTransport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(UreqBlocking::try_new(
                self.insecure,
                &self.user_agent,
                self.timeout,
                self.connect_timeout,
                self.read_timeout,
                self.no_proxy,
            )?),
        };

        Ok(Client {
            inner: Arc::new(Inner {
                base: self.base_url,
                auth: self.auth,
                timeout: self.timeout,
                default_headers: headers,
                body_snippet: self.body_snippet,
                transport,
            }),
        })
    }
}

/// Blocking MyParcel client. Cheap to clone; clones share configuration.
#[derive(Clone)]
pub struct Client {
    inner: Arc<Inner>,
}

struct Inner {
    base: Url,
    auth: Option<Auth>,
    timeout: Duration,
    default_headers: HeaderMap,
    body_snippet: BodySnippetConfig,
    transport: DynBlockingTransport,
}

impl Client {
    pub fn builder() -> Result<ClientBuilder, Error> {
        ClientBuilder::try_new()
    }

    /// Client for the production API with default settings.
    pub fn new(api_key: impl Into<String>) -> Result<Self, Error> {
        Self::builder()?.api_key(api_key).build()
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base
    }

    #[must_use]
    pub fn shipments(&self) -> api::ShipmentsService {
        api::ShipmentsService::new(self.clone())
    }

    #[must_use]
    pub fn labels(&self) -> api::LabelsService {
        api::LabelsService::new(self.clone())
    }

    #[must_use]
    pub fn track_trace(&self) -> api::TrackTraceService {
        api::TrackTraceService::new(self.clone())
    }

    /// Send one request and return the raw response, whatever its status.
    ///
    /// `path` is resolved against the base URL and may carry a query string.
    /// `headers` replace same-named defaults (including `Authorization`).
    pub fn perform_http_call(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
        headers: HeaderMap,
    ) -> Result<TransportResponse, Error> {
        let url = endpoint_url(&self.inner.base, path)?;

        let mut all_headers = self.inner.default_headers.clone();
        if let Some(auth) = &self.inner.auth {
            auth.apply(&mut all_headers)?;
        }
        all_headers.extend(headers);

        self.inner.transport.send(TransportRequest {
            method,
            url,
            headers: all_headers,
            body: body.map(|body| TransportBody {
                bytes: body.into_bytes(),
            }),
            timeout: self.inner.timeout,
        })
    }

    /// Perform an API call and interpret the response.
    ///
    /// * `application/pdf` responses yield [`Payload::Binary`], untouched.
    /// * An empty body yields [`Payload::Empty`] on `204`, an error otherwise.
    /// * Any other body must be JSON; status >= 400 becomes [`Error::Api`]
    ///   with a message built from the first entry of `errors`.
    pub fn perform_api_call(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
        headers: HeaderMap,
    ) -> Result<Payload, Error> {
        #[cfg(feature = "metrics")]
        let _inflight = crate::transport::metrics::InFlightGuard::new();

        #[cfg(any(feature = "tracing", feature = "metrics"))]
        let start = std::time::Instant::now();
        #[cfg(feature = "tracing")]
        let span = tracing::info_span!(
            "myparcel.request",
            http.method = %method,
            http.host = %self.inner.base.host_str().unwrap_or_default(),
            http.path = %path.split('?').next().unwrap_or_default(),
            http.status = field::Empty,
            request_id = field::Empty,
            latency_ms = field::Empty,
            error_kind = field::Empty,
        );
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        #[cfg(feature = "metrics")]
        let metrics_method = method.clone();

        let result = self
            .perform_http_call(method, path, body, headers)
            .and_then(|resp| {
                #[cfg(feature = "tracing")]
                span.record("http.status", resp.status.as_u16() as i64);

                response::interpret(
                    resp,
                    &Diagnostics {
                        body_snippet: self.inner.body_snippet,
                        auth: self.inner.auth.as_ref(),
                    },
                )
            });

        #[cfg(feature = "metrics")]
        crate::transport::metrics::record_call(
            &metrics_method,
            path,
            start.elapsed(),
            result.as_ref(),
        );

        #[cfg(feature = "tracing")]
        {
            span.record("latency_ms", start.elapsed().as_millis() as i64);
            if let Err(err) = &result {
                span.record("error_kind", field::debug(err.kind()));
                if let Some(rid) = err.request_id() {
                    span.record("request_id", field::display(rid));
                }
            }
        }

        result
    }
}
