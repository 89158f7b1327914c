use crate::{
    Error, ShipmentId,
    types::{Envelope, TrackTrace},
};
use http::{HeaderMap, Method};
use serde::Deserialize;

#[derive(Deserialize)]
struct TrackTraces {
    tracktraces: Vec<TrackTrace>,
}

/// MyParcel track & trace APIs.
#[derive(Clone)]
pub struct TrackTraceService {
    client: crate::Client,
}

impl TrackTraceService {
    pub(crate) fn new(client: crate::Client) -> Self {
        Self { client }
    }

    /// `GET /tracktraces/<id>`
    pub fn get(&self, id: impl Into<ShipmentId>) -> Result<Option<TrackTrace>, Error> {
        let path = format!("tracktraces/{}", id.into());
        let found: Envelope<TrackTraces> = self
            .client
            .perform_api_call(Method::GET, &path, None, HeaderMap::new())?
            .decode("tracktraces")?;
        Ok(found.data.tracktraces.into_iter().next())
    }
}
