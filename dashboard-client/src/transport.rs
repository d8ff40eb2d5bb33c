use crate::error::ClientError;
use async_trait::async_trait;
use dashboard_core::ClientConfig;
use http::Method;
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::Value;
use tracing::debug;

/// One admin API call: method, path relative to the base URL, query, body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::POST, path).with_body(body)
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::PUT, path).with_body(body)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Sends admin API requests and returns the `data` of the response envelope.
#[async_trait]
pub trait AdminTransport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<Value, ClientError>;
}

/// `reqwest`-backed transport. Connection pooling is left to `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpTransport {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        if let Some(ref key) = config.api_key {
            let value = HeaderValue::from_str(key)
                .map_err(|e| ClientError::Config(format!("api_key: {e}")))?;
            headers.insert("x-api-key", value);
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl AdminTransport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value, ClientError> {
        let url = self.config.endpoint(&request.path);
        debug!(
            method = %request.method,
            path = %request.path,
            params = request.query.len(),
            "Admin API request"
        );

        let mut builder = self.client.request(request.method.clone(), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;
        debug!(status = status.as_u16(), bytes = text.len(), "Admin API response");

        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        unwrap_envelope(&text)
    }
}

/// `{"data": ...}` → `...`. An empty body acknowledges with `null`.
pub(crate) fn unwrap_envelope(text: &str) -> Result<Value, ClientError> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    match serde_json::from_str::<Value>(text)? {
        Value::Object(mut obj) => obj.remove("data").ok_or(ClientError::Envelope),
        _ => Err(ClientError::Envelope),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_is_unwrapped() {
        assert_eq!(unwrap_envelope(r#"{"data":{"id":1}}"#).unwrap(), json!({"id": 1}));
        assert_eq!(unwrap_envelope(r#"{"data":null}"#).unwrap(), Value::Null);
    }

    #[test]
    fn test_empty_body_is_null_ack() {
        assert_eq!(unwrap_envelope("").unwrap(), Value::Null);
        assert_eq!(unwrap_envelope("  \n").unwrap(), Value::Null);
    }

    #[test]
    fn test_missing_envelope_is_an_error() {
        assert!(matches!(unwrap_envelope(r#"{"rows":[]}"#), Err(ClientError::Envelope)));
        assert!(matches!(unwrap_envelope("[1,2]"), Err(ClientError::Envelope)));
        assert!(matches!(unwrap_envelope("not json"), Err(ClientError::Decode(_))));
    }

    #[test]
    fn test_request_builders() {
        let req = ApiRequest::put("routes/1", json!({"name": "r"}))
            .with_query(vec![("a".into(), "1".into())]);
        assert_eq!(req.method, Method::PUT);
        assert_eq!(req.path, "routes/1");
        assert_eq!(req.query_param("a"), Some("1"));
        assert_eq!(req.query_param("b"), None);
        assert_eq!(req.body, Some(json!({"name": "r"})));
        assert!(ApiRequest::delete("routes/1").body.is_none());
    }

    #[test]
    fn test_transport_rejects_bad_config() {
        let config = ClientConfig { base_url: "gw".into(), ..Default::default() };
        assert!(matches!(HttpTransport::new(config), Err(ClientError::Request(_))));
        let config = ClientConfig { api_key: Some("bad\nkey".into()), ..Default::default() };
        assert!(matches!(HttpTransport::new(config), Err(ClientError::Config(_))));
    }
}
