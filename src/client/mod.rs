//! Blocking client implementation.

pub mod blocking_client;

pub use blocking_client::{Client, ClientBuilder, DEFAULT_BASE_URL};
