use crate::error::DashboardError;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Yaml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Dashboard client configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    /// Admin API base, every endpoint path is appended to it.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Sent as `X-API-KEY` when present.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Stamp placeholder labels onto listed routes until the admin API
    /// returns real ones.
    #[serde(default = "default_true")]
    pub placeholder_labels: bool,
}

// ── Defaults ──────────────────────────────────────────────────

fn default_base_url() -> String { "http://127.0.0.1:9000/apisix/admin".into() }
fn default_timeout_ms() -> u64 { 5000 }
fn default_true() -> bool { true }

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_ms: default_timeout_ms(),
            placeholder_labels: true,
        }
    }
}

impl ClientConfig {
    /// Load configuration from an optional YAML file + `DASHBOARD_` env overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, DashboardError> {
        let mut figment = Figment::from(Serialized::defaults(ClientConfig::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        let config: ClientConfig = figment.merge(Env::prefixed("DASHBOARD_")).extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DashboardError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(DashboardError::Config(format!(
                "base_url must be an http(s) URL, got {:?}",
                self.base_url
            )));
        }
        if self.timeout_ms == 0 {
            return Err(DashboardError::Config("timeout_ms must be positive".into()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Join the base URL and an endpoint path with exactly one slash between them.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_has_expected_values() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.base_url, "http://127.0.0.1:9000/apisix/admin");
        assert!(cfg.api_key.is_none());
        assert_eq!(cfg.timeout_ms, 5000);
        assert!(cfg.placeholder_labels);
    }

    #[test]
    fn test_endpoint_joins_with_single_slash() {
        let mut cfg = ClientConfig::default();
        assert_eq!(cfg.endpoint("/routes/1"), "http://127.0.0.1:9000/apisix/admin/routes/1");
        cfg.base_url = "http://gw:9000/admin/".into();
        assert_eq!(cfg.endpoint("upstreams"), "http://gw:9000/admin/upstreams");
    }

    #[test]
    fn test_timeout_is_milliseconds() {
        let cfg = ClientConfig { timeout_ms: 1500, ..Default::default() };
        assert_eq!(cfg.timeout(), Duration::from_millis(1500));
    }

    #[test]
    fn test_validate_rejects_non_http_base_url() {
        let cfg = ClientConfig { base_url: "ftp://gw".into(), ..Default::default() };
        assert!(matches!(cfg.validate(), Err(DashboardError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let cfg = ClientConfig { timeout_ms: 0, ..Default::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let cfg = ClientConfig::load(None).unwrap();
        assert_eq!(cfg.timeout_ms, 5000);
    }

    #[test]
    fn test_load_from_valid_yaml_overrides_defaults() {
        let mut tmpfile = tempfile::NamedTempFile::new().unwrap();
        write!(
            tmpfile,
            "base_url: \"https://gw.example.com/apisix/admin\"\napi_key: \"secret\"\nplaceholder_labels: false\n"
        )
        .unwrap();
        let cfg = ClientConfig::load(Some(tmpfile.path())).unwrap();
        assert_eq!(cfg.base_url, "https://gw.example.com/apisix/admin");
        assert_eq!(cfg.api_key.as_deref(), Some("secret"));
        assert!(!cfg.placeholder_labels);
        // Defaults still apply for unspecified fields
        assert_eq!(cfg.timeout_ms, 5000);
    }

    #[test]
    fn test_load_yaml_with_invalid_url_fails() {
        let mut tmpfile = tempfile::NamedTempFile::new().unwrap();
        write!(tmpfile, "base_url: \"gw:9000\"\n").unwrap();
        assert!(ClientConfig::load(Some(tmpfile.path())).is_err());
    }
}
