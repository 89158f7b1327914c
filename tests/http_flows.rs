use std::time::Duration;

use anyhow::Result;
use http::{HeaderMap, Method, StatusCode};
use myparcel_sdk::{
    ApiErrorKind, Carrier, Client, Error, HasAttributes, LabelFormat, LabelOptions, PackageType,
    Payload, Recipient, Shipment, ShipmentId,
};
use serde_json::json;
use tokio::task;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_string_contains, header, method, path, query_param},
};

const API_KEY: &str = "key";
const AUTHORIZATION: &str = "basic a2V5";

fn client(base_url: String) -> Result<Client> {
    Ok(Client::builder()?
        .base_url(base_url)?
        .api_key(API_KEY)
        .build()?)
}

fn recipient() -> Result<Recipient> {
    let mut recipient = Recipient::new();
    recipient.fill([
        ("cc", json!("nl")),
        ("postal_code", json!("1234 ab")),
        ("city", json!("Amsterdam")),
        ("street", json!("Keizersgracht")),
        ("number", json!("1")),
        ("person", json!("Jane Doe")),
    ])?;
    Ok(recipient)
}

fn api_error(err: Error) -> myparcel_sdk::ApiError {
    match err {
        Error::Api(err) => err,
        other => panic!("expected API error, got {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn create_shipment_posts_envelope_and_returns_id() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/shipments"))
        .and(header("Authorization", AUTHORIZATION))
        .and(header(
            "Content-Type",
            "application/vnd.shipment+json;charset=utf-8;version=1.1",
        ))
        .and(body_string_contains(r#""postal_code":"1234AB""#))
        .and(body_string_contains(r#""cc":"NL""#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "ids": [{ "id": 12345, "reference_identifier": null }] }
        })))
        .expect(1)
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let base_url = server.uri();
    task::spawn_blocking(move || -> Result<()> {
        let client = client(base_url)?;
        let mut shipment = Shipment::new(recipient()?);
        shipment.set_attribute("reference_identifier", "order-7")?;

        let id = client.shipments().create(&shipment)?;
        assert_eq!(id, ShipmentId::new(12345));
        Ok(())
    })
    .await??;

    server.verify().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn get_shipment_decodes_first_entry() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/shipments/7"))
        .and(header("Accept", "application/json; charset=utf-8"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "shipments": [{
                "id": 7,
                "carrier": 1,
                "barcode": "3SMYPA000000001",
                "status": 2,
                "recipient": { "cc": "NL", "postal_code": "1234AB", "city": "Amsterdam" },
                "options": {
                    "package_type": 1,
                    "only_recipient": 0,
                    "signature": 1,
                    "return": 0,
                    "large_format": 0,
                    "label_description": "order-7"
                }
            }] }
        })))
        .expect(1)
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let base_url = server.uri();
    task::spawn_blocking(move || -> Result<()> {
        let shipment = client(base_url)?
            .shipments()
            .get(7)?
            .expect("shipment present");

        assert_eq!(shipment.id, Some(ShipmentId::new(7)));
        assert_eq!(shipment.options.signature, Some(true));
        assert_eq!(shipment.options.only_recipient, Some(false));
        assert_eq!(
            shipment.get_attribute("track_trace_url"),
            Some(json!(
                "https://myparcel.me/track-trace/3SMYPA000000001/1234AB/NL"
            ))
        );
        Ok(())
    })
    .await??;

    server.verify().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn list_shipments_sends_filters_as_query() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/shipments"))
        .and(query_param("q", "Jane Doe"))
        .and(query_param("size", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "shipments": [
                    { "id": 1, "carrier": 1, "options": { "package_type": 1, "signature": 0 } },
                    { "id": 2, "carrier": 11, "options": { "package_type": 6, "signature": 1 } }
                ],
                "results": 2
            }
        })))
        .expect(1)
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let base_url = server.uri();
    task::spawn_blocking(move || -> Result<()> {
        let shipments = client(base_url)?
            .shipments()
            .list([("q", "Jane Doe"), ("size", "2")])?;
        let ids: Vec<_> = shipments.iter().filter_map(|s| s.id).collect();
        assert_eq!(ids, vec![ShipmentId::new(1), ShipmentId::new(2)]);
        assert_eq!(shipments[1].carrier, Carrier::Other(11));
        assert_eq!(shipments[1].options.package_type, PackageType::Other(6));
        Ok(())
    })
    .await??;

    server.verify().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn delete_shipment_accepts_no_content() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/shipments/9"))
        .and(header("Authorization", AUTHORIZATION))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let base_url = server.uri();
    task::spawn_blocking(move || -> Result<()> {
        client(base_url)?.shipments().delete(9)?;
        Ok(())
    })
    .await??;

    server.verify().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn label_pdf_is_returned_as_bytes() -> Result<()> {
    let server = MockServer::start().await;
    let document = b"%PDF-1.4 label".to_vec();

    Mock::given(method("GET"))
        .and(path("/shipment_labels/1;2"))
        .and(query_param("format", "A4"))
        .and(query_param("positions", "2;4"))
        .and(header("Accept", "application/pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(document.clone(), "application/pdf"))
        .expect(1)
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let base_url = server.uri();
    task::spawn_blocking(move || -> Result<()> {
        let options = LabelOptions {
            format: LabelFormat::A4,
            positions: vec![2, 4],
        };
        let bytes = client(base_url)?
            .labels()
            .pdf(&[ShipmentId::new(1), ShipmentId::new(2)], &options)?;
        assert_eq!(bytes, document);
        Ok(())
    })
    .await??;

    server.verify().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn label_link_reads_pdf_url() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/shipment_labels/5"))
        .and(query_param("format", "A6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "pdfs": { "url": "/pdfs/label_hash" } }
        })))
        .expect(1)
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let base_url = server.uri();
    task::spawn_blocking(move || -> Result<()> {
        let options = LabelOptions {
            format: LabelFormat::A6,
            positions: vec![1],
        };
        let link = client(base_url)?.labels().link(&[ShipmentId::new(5)], &options)?;
        assert_eq!(link, "/pdfs/label_hash");
        Ok(())
    })
    .await??;

    server.verify().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn track_trace_exposes_link_mutator() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tracktraces/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "tracktraces": [{
                "shipment_id": 3,
                "code": "A01",
                "description": "Registered",
                "time": "2026-10-01 10:00:00",
                "link_tracktrace": "https://postnl.nl/tracktrace/?B=3S",
                "history": [
                    { "code": "A01", "description": "Registered", "time": "2026-10-01 10:00:00" }
                ]
            }] }
        })))
        .expect(1)
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let base_url = server.uri();
    task::spawn_blocking(move || -> Result<()> {
        let status = client(base_url)?
            .track_trace()
            .get(3)?
            .expect("track & trace present");
        assert_eq!(status.code.as_deref(), Some("A01"));
        assert_eq!(status.history.len(), 1);
        assert_eq!(
            status.get_attribute("link"),
            Some(json!("https://postnl.nl/tracktrace/?B=3S"))
        );
        Ok(())
    })
    .await??;

    server.verify().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn validation_error_message_is_composed() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/shipments"))
        .respond_with(
            ResponseTemplate::new(422)
                .append_header("X-Request-Id", "req-42")
                .set_body_json(json!({
                    "errors": [{
                        "code": 1001,
                        "message": "Invalid address",
                        "human": ["Please check the address"]
                    }],
                    "message": "Validation failed"
                })),
        )
        .expect(1)
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let base_url = server.uri();
    task::spawn_blocking(move || -> Result<()> {
        let err = client(base_url)?
            .shipments()
            .create(&Shipment::new(recipient()?))
            .unwrap_err();

        assert_eq!(err.status(), Some(StatusCode::UNPROCESSABLE_ENTITY));
        assert_eq!(err.request_id(), Some("req-42"));
        assert_eq!(
            err.to_string(),
            "Error executing API call (1001): Invalid address: Please check the address"
        );

        let err = api_error(err);
        assert_eq!(err.kind, ApiErrorKind::Status);
        assert_eq!(err.http_status(), 422);
        Ok(())
    })
    .await??;

    server.verify().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn unauthorized_is_reported_as_auth_error() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/shipments/1"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "errors": [{ "code": 3000, "message": "Access Denied" }]
        })))
        .expect(1)
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let base_url = server.uri();
    task::spawn_blocking(move || -> Result<()> {
        let err = client(base_url)?.shipments().get(1).unwrap_err();
        assert!(err.is_auth_error());
        assert_eq!(err.to_string(), "Error executing API call (3000): Access Denied");
        Ok(())
    })
    .await??;

    server.verify().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn invalid_json_body_is_a_decode_error() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/shipments/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .expect(1)
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let base_url = server.uri();
    task::spawn_blocking(move || -> Result<()> {
        let err = api_error(client(base_url)?.shipments().get(1).unwrap_err());
        assert_eq!(err.kind, ApiErrorKind::Decode);
        assert_eq!(
            err.message.as_ref(),
            "Unable to decode MyParcel response: 'not json'."
        );
        assert_eq!(err.http_status(), 0);
        Ok(())
    })
    .await??;

    server.verify().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn empty_body_without_no_content_fails() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/shipments"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let base_url = server.uri();
    task::spawn_blocking(move || -> Result<()> {
        let err = api_error(
            client(base_url)?
                .shipments()
                .list(Vec::<(String, String)>::new())
                .unwrap_err(),
        );
        assert_eq!(err.kind, ApiErrorKind::EmptyBody);
        assert_eq!(err.message.as_ref(), "No response body found.");
        Ok(())
    })
    .await??;

    server.verify().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn raw_api_call_merges_per_call_headers() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/delivery_options"))
        .and(query_param("cc", "NL"))
        .and(header("Authorization", AUTHORIZATION))
        .and(header("Accept", "application/json;version=2.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let base_url = server.uri();
    task::spawn_blocking(move || -> Result<()> {
        let mut headers = HeaderMap::new();
        headers.insert("Accept", "application/json;version=2.0".parse()?);

        let payload = client(base_url)?.perform_api_call(
            Method::GET,
            &format!("delivery_options{}", myparcel_sdk::build_query_string([("cc", "NL")])),
            None,
            headers,
        )?;
        assert_eq!(payload, Payload::Json(json!({ "data": [] })));
        Ok(())
    })
    .await??;

    server.verify().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn connection_failure_is_a_transport_error() -> Result<()> {
    task::spawn_blocking(move || -> Result<()> {
        let client = Client::builder()?
            .base_url("http://127.0.0.1:1")?
            .api_key(API_KEY)
            .connect_timeout(Duration::from_secs(2))
            .build()?;
        let err = client.shipments().get(1).unwrap_err();
        assert!(matches!(err, Error::Transport { .. }));
        assert!(err.status().is_none());
        Ok(())
    })
    .await??;

    Ok(())
}
