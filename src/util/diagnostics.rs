use crate::{Auth, BodySnippetConfig};
use http::HeaderMap;

pub(crate) fn request_id(headers: &HeaderMap) -> Option<Box<str>> {
    ["x-request-id", "x-correlation-id"]
        .into_iter()
        .filter_map(|name| headers.get(name)?.to_str().ok())
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(Into::into)
}

/// Longest prefix of `body` within `max_bytes` that ends on a char boundary.
fn clip(body: &str, max_bytes: usize) -> &str {
    let end = body
        .char_indices()
        .map(|(start, c)| start + c.len_utf8())
        .take_while(|&end| end <= max_bytes)
        .last()
        .unwrap_or(0);
    &body[..end]
}

/// Start of the response body kept on [`crate::ApiError`]. The API key is
/// scrubbed before clipping.
pub(crate) fn body_snippet(
    body: &str,
    config: BodySnippetConfig,
    auth: Option<&Auth>,
) -> Option<Box<str>> {
    if !config.enabled || body.is_empty() {
        return None;
    }

    let scrubbed = match auth {
        Some(auth) => auth.scrub(body),
        None => body.to_owned(),
    };
    Some(clip(&scrubbed, config.max_bytes).into())
}
