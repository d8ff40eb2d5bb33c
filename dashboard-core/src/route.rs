use crate::upstream::{Timeout, TimeoutConfig, UpstreamHost, UpstreamNodes};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifier of a route or upstream. The admin API hands out numeric ids
/// but accepts strings as well.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    Num(u64),
    Text(String),
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceId::Num(n) => write!(f, "{n}"),
            ResourceId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for ResourceId {
    fn from(n: u64) -> Self {
        ResourceId::Num(n)
    }
}

impl From<&str> for ResourceId {
    fn from(s: &str) -> Self {
        ResourceId::Text(s.to_string())
    }
}

/// Route body sent on `POST /routes` and `PUT /routes/{id}`.
/// Modeled after the APISIX Route object.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RouteRequest {
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub desc: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub protocols: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hosts: Vec<String>,

    #[serde(default)]
    pub uris: Vec<String>,

    /// Allowed HTTP methods (empty = all methods)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<HttpMethod>,

    /// Advanced matching expressions, usually `[variable, operator, value]`.
    /// Kept as raw JSON so negated (`["arg_x", "!", "==", "1"]`) and nested
    /// forms survive a read.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vars: Vec<serde_json::Value>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream: Option<InlineUpstream>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream_id: Option<ResourceId>,

    /// Plugin chain configuration: plugin_name -> config
    #[serde(default)]
    pub plugins: BTreeMap<String, serde_json::Value>,

    /// Route status (1 = enabled, 0 = disabled)
    #[serde(default = "default_status")]
    pub status: u8,
}

/// Route as returned by `GET /routes/{id}` and in list rows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Route {
    #[serde(default)]
    pub id: Option<ResourceId>,

    #[serde(flatten)]
    pub body: RouteRequest,

    /// Unix seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<i64>,
}

impl Route {
    pub fn updated_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.update_time
            .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
    }

    pub fn created_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.create_time
            .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
    }
}

/// Inline upstream definition within a route.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InlineUpstream {
    /// Upstream type: "roundrobin", "chash", "ewma", "least_conn"
    #[serde(default = "crate::upstream::default_lb_type")]
    pub r#type: String,

    #[serde(default)]
    pub nodes: UpstreamNodes,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Timeout>,
}

/// HTTP methods supported by routes. Methods outside the common set (e.g.
/// `PURGE`) are carried through as `Other`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
    Connect,
    Trace,
    Other(String),
}

impl HttpMethod {
    pub fn as_str(&self) -> &str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Connect => "CONNECT",
            HttpMethod::Trace => "TRACE",
            HttpMethod::Other(name) => name,
        }
    }
}

impl From<String> for HttpMethod {
    fn from(name: String) -> Self {
        match name.as_str() {
            "GET" => HttpMethod::Get,
            "POST" => HttpMethod::Post,
            "PUT" => HttpMethod::Put,
            "DELETE" => HttpMethod::Delete,
            "PATCH" => HttpMethod::Patch,
            "HEAD" => HttpMethod::Head,
            "OPTIONS" => HttpMethod::Options,
            "CONNECT" => HttpMethod::Connect,
            "TRACE" => HttpMethod::Trace,
            _ => HttpMethod::Other(name),
        }
    }
}

impl From<HttpMethod> for String {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Route editor form ─────────────────────────────────────────

/// The three-step route editor, plus the side tables edited next to it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RouteForm {
    #[serde(default)]
    pub step1: RouteStep1,
    #[serde(default)]
    pub step2: RouteStep2,
    #[serde(default)]
    pub step3: RouteStep3,
    #[serde(default)]
    pub advanced_matching_rules: Vec<MatchingRule>,
    #[serde(default)]
    pub upstream_header_list: Vec<UpstreamHeader>,
}

/// Step 1: route matching.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteStep1 {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default = "default_protocols")]
    pub protocols: Vec<String>,
    #[serde(default)]
    pub websocket: bool,
    #[serde(default)]
    pub hosts: Vec<String>,
    #[serde(default)]
    pub paths: Vec<String>,
    #[serde(default)]
    pub methods: Vec<HttpMethod>,
    #[serde(default)]
    pub redirect: RedirectOption,
    /// `key:value` strings
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default = "default_enabled")]
    pub status: bool,
}

impl Default for RouteStep1 {
    fn default() -> Self {
        Self {
            name: String::new(),
            desc: String::new(),
            protocols: default_protocols(),
            websocket: false,
            hosts: Vec::new(),
            paths: Vec::new(),
            methods: Vec::new(),
            redirect: RedirectOption::Disabled,
            labels: Vec::new(),
            status: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RedirectOption {
    #[default]
    Disabled,
    ForceHttps,
    Custom { uri: String, ret_code: u16 },
}

/// Step 2: where matched traffic goes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RouteStep2 {
    /// Bind an existing upstream instead of the inline host list.
    #[serde(default)]
    pub upstream_id: Option<ResourceId>,
    #[serde(default)]
    pub upstream_host_list: Vec<UpstreamHost>,
    /// Rewrites the request path before proxying.
    #[serde(default)]
    pub upstream_path: Option<String>,
    #[serde(default)]
    pub timeout: TimeoutConfig,
}

/// Step 3: plugin name → plugin configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RouteStep3 {
    #[serde(default)]
    pub plugins: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchingRule {
    pub position: RulePosition,
    pub name: String,
    pub operator: String,
    pub value: String,
}

/// Where a matching rule reads its variable from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RulePosition {
    Http,
    Arg,
    Cookie,
}

impl RulePosition {
    pub fn prefix(&self) -> &'static str {
        match self {
            RulePosition::Http => "http_",
            RulePosition::Arg => "arg_",
            RulePosition::Cookie => "cookie_",
        }
    }

    pub fn all() -> &'static [RulePosition] {
        &[RulePosition::Http, RulePosition::Arg, RulePosition::Cookie]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpstreamHeader {
    pub header_name: String,
    #[serde(default)]
    pub header_value: String,
    #[serde(default)]
    pub header_action: HeaderAction,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HeaderAction {
    #[default]
    Override,
    Remove,
}

// Defaults

fn default_status() -> u8 {
    1
}

fn default_enabled() -> bool {
    true
}

fn default_protocols() -> Vec<String> {
    vec!["http".to_string(), "https".to_string()]
}
