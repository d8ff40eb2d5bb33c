use crate::client::DashboardClient;
use crate::error::ClientError;
use crate::transport::ApiRequest;
use dashboard_core::list::{ListPage, ListQuery};
use dashboard_core::route::{Route, RouteForm};
use dashboard_core::transform::{transform_route_data, transform_step_data};
use serde_json::Value;
use tracing::debug;

impl DashboardClient {
    /// `POST /routes` with the flattened editor form.
    pub async fn create(&self, form: &RouteForm) -> Result<Value, ClientError> {
        let body = serde_json::to_value(transform_step_data(form)?)?;
        self.send(ApiRequest::post("routes", body)).await
    }

    /// `PUT /routes/{rid}` with the flattened editor form.
    pub async fn update(&self, rid: u64, form: &RouteForm) -> Result<Value, ClientError> {
        let body = serde_json::to_value(transform_step_data(form)?)?;
        self.send(ApiRequest::put(format!("routes/{rid}"), body)).await
    }

    /// `GET /routes/{rid}`, expanded back into the editor form.
    pub async fn fetch_item(&self, rid: u64) -> Result<RouteForm, ClientError> {
        let route: Route = self.fetch(ApiRequest::get(format!("routes/{rid}"))).await?;
        Ok(transform_route_data(&route))
    }

    /// `GET /routes` with paging and filters.
    pub async fn fetch_list(&self, query: &ListQuery) -> Result<ListPage<Route>, ClientError> {
        let request = ApiRequest::get("routes").with_query(query.to_params());
        let decorator = self.row_decorator();
        if decorator.is_some() {
            debug!("Stamping placeholder labels onto route rows");
        }
        self.fetch_page(request, decorator).await
    }

    /// `DELETE /routes/{rid}`.
    pub async fn remove(&self, rid: &str) -> Result<Value, ClientError> {
        self.send(ApiRequest::delete(format!("routes/{rid}"))).await
    }

    /// `GET /notexist/routes`. Empty `name` / `exclude` are left off the query.
    pub async fn check_unique_name(&self, name: &str, exclude: &str) -> Result<Value, ClientError> {
        let query = [("name", name), ("exclude", exclude)]
            .into_iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.send(ApiRequest::get("notexist/routes").with_query(query))
            .await
    }
}
