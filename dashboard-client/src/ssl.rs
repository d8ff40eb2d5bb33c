use crate::client::DashboardClient;
use crate::error::ClientError;
use crate::transport::ApiRequest;
use serde_json::Value;

impl DashboardClient {
    /// `POST /check_ssl_exists` with the host names; the per-host answer is
    /// returned as the server sends it.
    pub async fn check_host_with_ssl(&self, hosts: &[String]) -> Result<Value, ClientError> {
        let body = serde_json::to_value(hosts)?;
        self.send(ApiRequest::post("check_ssl_exists", body)).await
    }
}

#[cfg(test)]
mod tests {
    use crate::client::DashboardClient;
    use crate::mock::RecordingTransport;
    use http::Method;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_posts_host_array() {
        let transport = Arc::new(RecordingTransport::replying(vec![json!([true, false])]));
        let client = DashboardClient::with_transport(transport.clone(), true);
        let hosts = vec!["a.example.com".to_string(), "b.example.com".to_string()];
        let result = client.check_host_with_ssl(&hosts).await.unwrap();

        let req = transport.last();
        assert_eq!(req.method, Method::POST);
        assert_eq!(req.path, "check_ssl_exists");
        assert_eq!(req.body, Some(json!(["a.example.com", "b.example.com"])));
        assert_eq!(result, json!([true, false]));
    }
}
