use crate::{
    Error, ShipmentId,
    types::{Envelope, Shipment},
    util::url::build_query_string,
};
use http::{HeaderMap, HeaderValue, Method, header::CONTENT_TYPE};
use serde::Deserialize;
use serde_json::json;

const SHIPMENT_CONTENT_TYPE: &str = "application/vnd.shipment+json;charset=utf-8;version=1.1";

#[derive(Deserialize)]
struct CreatedIds {
    ids: Vec<CreatedId>,
}

#[derive(Deserialize)]
struct CreatedId {
    id: ShipmentId,
}

#[derive(Deserialize)]
struct Shipments {
    shipments: Vec<Shipment>,
}

/// MyParcel shipment APIs.
#[derive(Clone)]
pub struct ShipmentsService {
    client: crate::Client,
}

impl ShipmentsService {
    pub(crate) fn new(client: crate::Client) -> Self {
        Self { client }
    }

    /// `POST /shipments`
    pub fn create(&self, shipment: &Shipment) -> Result<ShipmentId, Error> {
        let body = json!({ "data": { "shipments": [shipment.to_request_body()?] } });
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(SHIPMENT_CONTENT_TYPE));

        let created: Envelope<CreatedIds> = self
            .client
            .perform_api_call(Method::POST, "shipments", Some(body.to_string()), headers)?
            .decode("created shipment ids")?;

        created
            .data
            .ids
            .into_iter()
            .next()
            .map(|created| created.id)
            .ok_or_else(|| Error::unexpected("created shipment ids"))
    }

    /// `GET /shipments/<id>`
    pub fn get(&self, id: impl Into<ShipmentId>) -> Result<Option<Shipment>, Error> {
        let path = format!("shipments/{}", id.into());
        let found: Envelope<Shipments> = self
            .client
            .perform_api_call(Method::GET, &path, None, HeaderMap::new())?
            .decode("shipments")?;
        Ok(found.data.shipments.into_iter().next())
    }

    /// `GET /shipments?<filters>`
    pub fn list<I, K, V>(&self, filters: I) -> Result<Vec<Shipment>, Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let path = format!("shipments{}", build_query_string(filters));
        let found: Envelope<Shipments> = self
            .client
            .perform_api_call(Method::GET, &path, None, HeaderMap::new())?
            .decode("shipments")?;
        Ok(found.data.shipments)
    }

    /// `DELETE /shipments/<id>`
    pub fn delete(&self, id: impl Into<ShipmentId>) -> Result<(), Error> {
        let path = format!("shipments/{}", id.into());
        self.client
            .perform_api_call(Method::DELETE, &path, None, HeaderMap::new())?;
        Ok(())
    }
}
