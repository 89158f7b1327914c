use crate::Error;
use base64::{Engine, engine::general_purpose::STANDARD as B64};
use http::{HeaderMap, HeaderValue, header::AUTHORIZATION};
use std::fmt;

#[derive(Clone, Default, Eq, PartialEq)]
pub struct SecretString(String);

impl SecretString {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

/// Credentials attached to every request.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum Auth {
    /// MyParcel API key, sent as `Authorization: basic base64(key)`.
    ApiKey { key: SecretString },
}

impl Auth {
    #[must_use]
    pub fn api_key(key: impl Into<String>) -> Self {
        Self::ApiKey {
            key: SecretString::new(key),
        }
    }

    /// Replace the key, and its encoded header form, with `<redacted>`.
    pub(crate) fn scrub(&self, text: &str) -> String {
        match self {
            Self::ApiKey { key } => {
                let encoded = B64.encode(key.expose());
                [encoded.as_str(), key.expose()]
                    .into_iter()
                    .filter(|secret| !secret.is_empty())
                    .fold(text.to_owned(), |text, secret| {
                        text.replace(secret, "<redacted>")
                    })
            }
        }
    }

    pub(crate) fn apply(&self, headers: &mut HeaderMap) -> Result<(), Error> {
        let value = match self {
            Self::ApiKey { key } => {
                let raw = format!("basic {}", B64.encode(key.expose()));
                HeaderValue::from_str(&raw).map_err(|err| Error::InvalidConfig {
                    message: "invalid Authorization header value".into(),
                    source: Some(Box::new(err)),
                })?
            }
        };

        headers.insert(AUTHORIZATION, value);
        Ok(())
    }
}
