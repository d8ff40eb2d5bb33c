pub mod config;
pub mod error;
pub mod label;
pub mod list;
pub mod route;
pub mod transform;
pub mod upstream;

pub use config::ClientConfig;
pub use error::DashboardError;
pub use label::{Label, LabelList};
pub use list::{ListPage, WireList};
pub use route::{RouteForm, RouteRequest};
pub use upstream::{Upstream, UpstreamDetail, UpstreamHost};
