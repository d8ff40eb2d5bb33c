use crate::client::DashboardClient;
use crate::error::ClientError;
use crate::transport::ApiRequest;
use dashboard_core::list::ListPage;
use dashboard_core::upstream::{Upstream, UpstreamDetail};

impl DashboardClient {
    /// `GET /upstreams`.
    pub async fn fetch_upstream_list(&self) -> Result<ListPage<Upstream>, ClientError> {
        self.fetch_page(ApiRequest::get("upstreams"), None).await
    }

    /// `GET /upstreams/{id}`, reduced to what the route editor displays.
    pub async fn fetch_upstream_item(&self, id: &str) -> Result<UpstreamDetail, ClientError> {
        let upstream: Upstream = self.fetch(ApiRequest::get(format!("upstreams/{id}"))).await?;
        Ok(UpstreamDetail::from(upstream))
    }
}
