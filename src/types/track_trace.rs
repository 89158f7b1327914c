use crate::{
    resource::{HasAttributes, Mutators},
    types::ShipmentId,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;

/// One status change in a shipment's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackTraceEvent {
    pub code: String,
    pub description: String,
    pub time: Option<String>,
}

/// Current track & trace status of a shipment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct TrackTrace {
    pub shipment_id: Option<ShipmentId>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub time: Option<String>,
    pub link_consumer_portal: Option<String>,
    pub link_tracktrace: Option<String>,
    #[serde(default)]
    pub history: Vec<TrackTraceEvent>,
}

impl HasAttributes for TrackTrace {
    fn mutators() -> &'static Mutators<Self> {
        static MUTATORS: OnceLock<Mutators<TrackTrace>> = OnceLock::new();
        MUTATORS.get_or_init(|| {
            Mutators::<TrackTrace>::new().getter("link", |t| {
                t.link_consumer_portal
                    .as_ref()
                    .or(t.link_tracktrace.as_ref())
                    .map_or(Value::Null, |link| Value::String(link.clone()))
            })
        })
    }
}
