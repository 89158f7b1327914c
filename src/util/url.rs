use crate::Error;
use url::{Url, form_urlencoded};

pub(crate) fn normalize_base_url(raw: &str) -> Result<Url, Error> {
    let mut url = Url::parse(raw).map_err(|err| Error::InvalidConfig {
        message: "invalid base_url".into(),
        source: Some(Box::new(err)),
    })?;

    if url.cannot_be_a_base() {
        return Err(Error::InvalidConfig {
            message: "base_url must be a hierarchical URL".into(),
            source: None,
        });
    }

    if url.query().is_some() || url.fragment().is_some() {
        return Err(Error::InvalidConfig {
            message: "base_url must not include query or fragment".into(),
            source: None,
        });
    }

    let path = url.path();
    if path != "/" && !path.ends_with('/') {
        url.set_path(&format!("{path}/"));
    }
    Ok(url)
}

/// Resolve an API path such as `shipments/1?x=y` against the base URL.
pub(crate) fn endpoint_url(base_url: &Url, path: &str) -> Result<Url, Error> {
    base_url
        .join(path.trim_start_matches('/'))
        .map_err(|err| Error::InvalidConfig {
            message: format!("invalid API path `{path}`").into_boxed_str(),
            source: Some(Box::new(err)),
        })
}

/// Build a `?`-prefixed, form-urlencoded query string.
///
/// Returns an empty string when there are no filters, so the result can be
/// appended to a path unconditionally.
pub fn build_query_string<I, K, V>(filters: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    let mut empty = true;
    for (key, value) in filters {
        serializer.append_pair(key.as_ref(), value.as_ref());
        empty = false;
    }

    if empty {
        return String::new();
    }
    format!("?{}", serializer.finish())
}
