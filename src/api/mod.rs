//! MyParcel API services.
//!
//! Services are exposed via accessors on [`crate::Client`]:
//! - `Client::shipments()`
//! - `Client::labels()`
//! - `Client::track_trace()`

pub mod labels;
pub mod shipments;
pub mod track_trace;

pub use labels::*;
pub use shipments::*;
pub use track_trace::*;
