//! Response interpretation for [`crate::Client::perform_api_call`].
//!
//! A [`TransportResponse`] is classified in a fixed order: binary documents
//! first (by content type, before any parsing), then empty bodies, then JSON,
//! and finally the status code.

use crate::{
    ApiError, ApiErrorKind, Auth, BodySnippetConfig, Error,
    transport::TransportResponse,
    util::{
        diagnostics,
        json::{display_scalar, first_entry},
    },
};
use http::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Content type returned for label documents.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Decoded result of an API call.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    /// Raw document bytes (`Content-Type: application/pdf`).
    Binary(Vec<u8>),
    /// Parsed JSON document.
    Json(Value),
    /// `204 No Content`.
    Empty,
}

impl Payload {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    #[must_use]
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_json(self) -> Option<Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            Self::Binary(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Deserialize a JSON payload into `T`.
    pub fn decode<T: DeserializeOwned>(self, expected: &'static str) -> Result<T, Error> {
        let value = self.into_json().ok_or_else(|| Error::unexpected(expected))?;
        serde_json::from_value(value).map_err(|source| Error::UnexpectedPayload {
            expected,
            source: Some(source),
        })
    }
}

pub(crate) struct Diagnostics<'a> {
    pub(crate) body_snippet: BodySnippetConfig,
    pub(crate) auth: Option<&'a Auth>,
}

pub(crate) fn interpret(resp: TransportResponse, diag: &Diagnostics<'_>) -> Result<Payload, Error> {
    if resp.content_type() == Some(PDF_CONTENT_TYPE) {
        return Ok(Payload::Binary(resp.body));
    }

    let status = resp.status;
    let request_id = diagnostics::request_id(&resp.headers);
    let body = String::from_utf8_lossy(&resp.body);

    let fail = |kind: ApiErrorKind, message: String, status: Option<StatusCode>| {
        let mut err = ApiError::new(kind, message);
        if let Some(status) = status {
            err = err.with_status(status);
        }
        err.request_id = request_id.clone();
        err.body_snippet = diagnostics::body_snippet(&body, diag.body_snippet, diag.auth);
        Error::from(err)
    };

    // A lone `0` is treated as no body.
    if body.is_empty() || body == "0" {
        if status == StatusCode::NO_CONTENT {
            return Ok(Payload::Empty);
        }
        return Err(fail(
            ApiErrorKind::EmptyBody,
            "No response body found.".to_owned(),
            None,
        ));
    }

    let value: Value = match serde_json::from_str(&body) {
        Ok(value) => value,
        Err(_) => {
            return Err(fail(
                ApiErrorKind::Decode,
                format!("Unable to decode MyParcel response: '{body}'."),
                None,
            ));
        }
    };

    if status.as_u16() >= 400 {
        return Err(fail(
            ApiErrorKind::Status,
            compose_error_message(&value),
            Some(status),
        ));
    }

    Ok(Payload::Json(value))
}

fn first_human(error: &Value) -> Option<String> {
    error
        .get("human")
        .and_then(first_entry)
        .or_else(|| error.get("human").filter(|human| human.is_string()))
        .map(display_scalar)
}

/// Build the message for an error response from the first entry of `errors`.
pub(crate) fn compose_error_message(body: &Value) -> String {
    let mut message = String::from("Error executing API call");

    let Some(error) = body.get("errors").and_then(first_entry) else {
        return message;
    };

    let has_fields = error
        .get("fields")
        .and_then(Value::as_array)
        .is_some_and(|fields| !fields.is_empty());
    if has_fields {
        if let Some(human) = first_human(error) {
            message.push_str(": ");
            message.push_str(&human);
        }
    }

    if let Some(code) = error.get("code").filter(|code| !code.is_null()) {
        message.push_str(&format!(" ({})", display_scalar(code)));
    }

    if let Some(text) = error.get("message").filter(|text| !text.is_null()) {
        message.push_str(": ");
        message.push_str(&display_scalar(text));
    }

    if let Some(human) = first_human(error) {
        message.push_str(": ");
        message.push_str(&human);
    }

    message
}
