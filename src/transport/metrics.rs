use crate::{ApiErrorKind, Error, Payload, TransportErrorKind};
use http::Method;
use std::time::Duration;

pub(crate) struct InFlightGuard {
    gauge: metrics::Gauge,
}

impl InFlightGuard {
    pub(crate) fn new() -> Self {
        let gauge = metrics::gauge!("myparcel_sdk_calls_inflight");
        gauge.increment(1.0);
        Self { gauge }
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.gauge.decrement(1.0);
    }
}

/// API resource addressed by `path`: `shipments/1;2?x=y` is `shipments`.
fn resource_label(path: &str) -> String {
    path.trim_start_matches('/')
        .split(['/', '?'])
        .next()
        .unwrap_or_default()
        .to_owned()
}

/// How the response was interpreted, or why the call failed.
fn outcome_label(outcome: Result<&Payload, &Error>) -> &'static str {
    match outcome {
        Ok(Payload::Binary(_)) => "pdf",
        Ok(Payload::Json(_)) => "json",
        Ok(Payload::Empty) => "no_content",
        Err(Error::Api(err)) => match err.kind {
            ApiErrorKind::EmptyBody => "empty_body",
            ApiErrorKind::Decode => "decode",
            ApiErrorKind::Status => "status",
        },
        Err(Error::Transport { kind, .. }) => match kind {
            TransportErrorKind::Timeout => "timeout",
            TransportErrorKind::Connect => "connect",
            TransportErrorKind::Other => "transport",
        },
        Err(Error::InvalidConfig { .. }) => "invalid_config",
        Err(Error::UnexpectedPayload { .. }) => "unexpected_payload",
        Err(Error::Attribute { .. }) => "attribute",
    }
}

/// Record one `perform_api_call`.
///
/// Calls are labelled by method, resource and outcome; rejected calls also
/// carry the HTTP status, and label downloads add to a byte counter.
pub(crate) fn record_call(
    method: &Method,
    path: &str,
    latency: Duration,
    outcome: Result<&Payload, &Error>,
) {
    let method = method.as_str().to_owned();
    let resource = resource_label(path);
    let label = outcome_label(outcome);

    metrics::counter!(
        "myparcel_sdk_calls_total",
        "method" => method.clone(),
        "resource" => resource.clone(),
        "outcome" => label
    )
    .increment(1);
    metrics::histogram!(
        "myparcel_sdk_call_duration_seconds",
        "method" => method,
        "resource" => resource.clone()
    )
    .record(latency);

    match outcome {
        Ok(Payload::Binary(bytes)) => {
            metrics::counter!("myparcel_sdk_label_bytes_total").increment(bytes.len() as u64);
        }
        Err(Error::Api(err)) if err.kind == ApiErrorKind::Status => {
            metrics::counter!(
                "myparcel_sdk_rejected_calls_total",
                "resource" => resource,
                "status" => err.http_status().to_string()
            )
            .increment(1);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ApiError;

    #[test]
    fn resource_is_first_path_segment() {
        assert_eq!(resource_label("/shipment_labels/1;2?format=A4"), "shipment_labels");
        assert_eq!(resource_label("shipments?q=x"), "shipments");
        assert_eq!(resource_label("tracktraces/9"), "tracktraces");
    }

    #[test]
    fn outcome_follows_interpretation() {
        assert_eq!(outcome_label(Ok(&Payload::Binary(vec![1]))), "pdf");
        assert_eq!(outcome_label(Ok(&Payload::Empty)), "no_content");
        let err = Error::from(ApiError::new(ApiErrorKind::Decode, "x"));
        assert_eq!(outcome_label(Err(&err)), "decode");
    }
}
