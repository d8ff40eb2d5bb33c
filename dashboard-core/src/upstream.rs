use crate::route::ResourceId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Upstream as returned by `GET /upstreams/{id}` — APISIX-compatible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Upstream {
    #[serde(default)]
    pub id: Option<ResourceId>,

    #[serde(default)]
    pub name: Option<String>,

    /// Load balancer type: roundrobin, chash, ewma.
    #[serde(default = "default_lb_type", rename = "type")]
    pub lb_type: String,

    #[serde(default)]
    pub nodes: UpstreamNodes,

    #[serde(default)]
    pub timeout: Option<Timeout>,

    #[serde(default)]
    pub desc: Option<String>,

    #[serde(default)]
    pub labels: HashMap<String, String>,
}

/// Backend nodes in either of the two shapes the admin API accepts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum UpstreamNodes {
    /// `"host:port" → weight`
    Map(BTreeMap<String, u32>),
    List(Vec<UpstreamHost>),
}

impl Default for UpstreamNodes {
    fn default() -> Self {
        UpstreamNodes::Map(BTreeMap::new())
    }
}

impl UpstreamNodes {
    pub fn len(&self) -> usize {
        match self {
            UpstreamNodes::Map(m) => m.len(),
            UpstreamNodes::List(l) => l.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One backend node as the upstream editor displays it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpstreamHost {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_weight")]
    pub weight: u32,
}

impl UpstreamHost {
    /// `host:port` key of the node map.
    pub fn node_key(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Either a single timeout or per-phase timeouts, in seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Timeout {
    Seconds(serde_json::Number),
    Phases(TimeoutConfig),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeoutConfig {
    #[serde(default = "default_timeout")]
    pub connect: f64,
    #[serde(default = "default_timeout")]
    pub send: f64,
    #[serde(default = "default_timeout")]
    pub read: f64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect: default_timeout(),
            send: default_timeout(),
            read: default_timeout(),
        }
    }
}

/// Display-oriented view of an upstream, produced by `fetch_upstream_item`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpstreamDetail {
    #[serde(rename = "upstreamHostList")]
    pub upstream_host_list: Vec<UpstreamHost>,
    pub timeout: Option<Timeout>,
    pub upstream_id: Option<ResourceId>,
}

impl From<Upstream> for UpstreamDetail {
    fn from(upstream: Upstream) -> Self {
        let Upstream { nodes, timeout, id, .. } = upstream;
        Self {
            upstream_host_list: crate::transform::transform_upstream_nodes(&nodes),
            timeout,
            upstream_id: id,
        }
    }
}

pub(crate) fn default_lb_type() -> String { "roundrobin".into() }
pub(crate) fn default_port() -> u16 { 80 }
fn default_weight() -> u32 { 1 }
fn default_timeout() -> f64 { 6.0 }

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_from_serde() {
        let us: Upstream = serde_json::from_value(json!({"nodes": {"127.0.0.1:8080": 1}})).unwrap();
        assert_eq!(us.lb_type, "roundrobin");
        assert!(us.id.is_none());
        assert!(us.timeout.is_none());
        assert_eq!(us.nodes.len(), 1);
    }

    #[test]
    fn test_nodes_accept_list_shape() {
        let us: Upstream = serde_json::from_value(json!({
            "id": 5,
            "nodes": [{"host": "10.0.0.1", "port": 8080, "weight": 2}, {"host": "10.0.0.2"}]
        }))
        .unwrap();
        match us.nodes {
            UpstreamNodes::List(ref hosts) => {
                assert_eq!(hosts[0].node_key(), "10.0.0.1:8080");
                assert_eq!(hosts[1].port, 80);
                assert_eq!(hosts[1].weight, 1);
            }
            other => panic!("expected list nodes, got {other:?}"),
        }
    }

    #[test]
    fn test_timeout_shapes() {
        let t: Timeout = serde_json::from_value(json!(30)).unwrap();
        assert_eq!(serde_json::to_value(&t).unwrap(), json!(30));
        let t: Timeout = serde_json::from_value(json!({"connect": 1, "send": 2, "read": 3})).unwrap();
        assert_eq!(
            t,
            Timeout::Phases(TimeoutConfig { connect: 1.0, send: 2.0, read: 3.0 })
        );
    }

    #[test]
    fn test_detail_from_upstream() {
        let us: Upstream = serde_json::from_value(json!({
            "id": 5,
            "timeout": 30,
            "nodes": {"10.0.0.2:81": 3, "10.0.0.1:80": 1}
        }))
        .unwrap();
        let detail = UpstreamDetail::from(us);
        let value = serde_json::to_value(&detail).unwrap();
        assert_eq!(value["timeout"], json!(30));
        assert_eq!(value["upstream_id"], json!(5));
        assert_eq!(
            value["upstreamHostList"],
            json!([
                {"host": "10.0.0.1", "port": 80, "weight": 1},
                {"host": "10.0.0.2", "port": 81, "weight": 3}
            ])
        );
    }
}
