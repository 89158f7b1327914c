//! Blocking client for the MyParcel shipping REST API.
//!
//! [`Client::perform_api_call`] executes a request and interprets the
//! response (PDF documents, `204 No Content`, JSON and API errors). Typed
//! services sit on top of it, and resources expose their fields through
//! [`HasAttributes`].
//!
//! ```no_run
//! use myparcel_sdk::{Client, HasAttributes, Recipient, Shipment};
//!
//! # fn main() -> Result<(), myparcel_sdk::Error> {
//! let client = Client::new("api-key")?;
//!
//! let mut recipient = Recipient::new();
//! recipient
//!     .set_attribute("cc", "nl")?
//!     .set_attribute("postal_code", "1234 ab")?
//!     .set_attribute("city", "Amsterdam")?;
//!
//! let id = client.shipments().create(&Shipment::new(recipient))?;
//! println!("created shipment {id}");
//! # Ok(())
//! # }
//! ```

mod auth;
mod error;

pub mod api;
pub mod client;
pub mod resource;
pub mod response;
pub mod transport;
pub mod types;
pub mod util;

pub use auth::{Auth, SecretString};
pub use client::{Client, ClientBuilder, DEFAULT_BASE_URL};
pub use error::*;
pub use resource::{HasAttributes, Mutators, assign_nested, studly};
pub use response::{PDF_CONTENT_TYPE, Payload};
pub use types::*;
pub use util::url::build_query_string;
