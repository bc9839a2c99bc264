//! Services layer for the history API

pub mod history;

pub use history::{HistoryEndpoint, HistoryEndpointConfig};
