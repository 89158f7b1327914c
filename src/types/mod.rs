//! Resource types and identifiers exchanged with the MyParcel API.

pub mod common;
pub mod recipient;
pub mod shipment;
pub mod track_trace;

pub use common::*;
pub use recipient::*;
pub use shipment::*;
pub use track_trace::*;
