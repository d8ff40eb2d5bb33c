pub mod client;
pub mod error;
pub mod labels;
pub mod routes;
pub mod ssl;
pub mod transport;
pub mod upstreams;

#[cfg(test)]
pub(crate) mod mock;

pub use client::DashboardClient;
pub use error::ClientError;
pub use labels::{LabelSource, PlaceholderLabels, PlaceholderRowLabels, RowDecorator};
pub use transport::{AdminTransport, ApiRequest, HttpTransport};
