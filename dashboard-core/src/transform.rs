//! Data-shape transforms between the route editor and the admin API.
//!
//! Everything here is pure: no I/O, no shared state.

use crate::error::DashboardError;
use crate::label::{Label, LabelList};
use crate::route::{
    HeaderAction, InlineUpstream, MatchingRule, RedirectOption, Route, RouteForm, RouteRequest,
    RouteStep1, RouteStep2, RouteStep3, RulePosition, UpstreamHeader,
};
use crate::upstream::{Timeout, TimeoutConfig, UpstreamHost, UpstreamNodes, default_port};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

const REDIRECT: &str = "redirect";
const PROXY_REWRITE: &str = "proxy-rewrite";
const WEBSOCKET: &str = "websocket";
const DEFAULT_REDIRECT_CODE: u16 = 302;

/// Flatten the route editor into the body of `POST /routes` / `PUT /routes/{id}`.
pub fn transform_step_data(form: &RouteForm) -> Result<RouteRequest, DashboardError> {
    let RouteForm {
        step1,
        step2,
        step3,
        advanced_matching_rules,
        upstream_header_list,
    } = form;

    let mut protocols = step1.protocols.clone();
    if step1.websocket && !protocols.iter().any(|p| p == WEBSOCKET) {
        protocols.push(WEBSOCKET.to_string());
    }

    let hosts = step1
        .hosts
        .iter()
        .map(|h| h.trim())
        .filter(|h| !h.is_empty())
        .map(str::to_string)
        .collect();

    let labels = step1
        .labels
        .iter()
        .map(|raw| {
            Label::parse(raw)
                .map(|l| (l.key, l.value))
                .ok_or_else(|| DashboardError::InvalidForm(format!("label {raw:?} is not key:value")))
        })
        .collect::<Result<BTreeMap<_, _>, _>>()?;

    let vars = advanced_matching_rules
        .iter()
        .map(|rule| {
            json!([
                format!("{}{}", rule.position.prefix(), rule.name),
                rule.operator,
                rule.value,
            ])
        })
        .collect();

    let mut plugins = BTreeMap::new();

    match &step1.redirect {
        RedirectOption::Disabled => {}
        RedirectOption::ForceHttps => {
            plugins.insert(REDIRECT.to_string(), json!({ "http_to_https": true }));
        }
        RedirectOption::Custom { uri, ret_code } => {
            if uri.trim().is_empty() {
                return Err(DashboardError::InvalidForm(
                    "custom redirect requires a target uri".into(),
                ));
            }
            plugins.insert(REDIRECT.to_string(), json!({ "uri": uri, "ret_code": ret_code }));
        }
    }

    if let Some(rewrite) = proxy_rewrite(step2, upstream_header_list) {
        plugins.insert(PROXY_REWRITE.to_string(), rewrite);
    }

    // Step 3 is what the user configured explicitly; it wins over derived entries.
    for (name, conf) in &step3.plugins {
        plugins.insert(name.clone(), conf.clone());
    }

    let (upstream, upstream_id) = match &step2.upstream_id {
        Some(id) => (None, Some(id.clone())),
        None if step2.upstream_host_list.is_empty() => (None, None),
        None => {
            let nodes = step2
                .upstream_host_list
                .iter()
                .map(|h| (h.node_key(), h.weight))
                .collect();
            let upstream = InlineUpstream {
                r#type: "roundrobin".to_string(),
                nodes: UpstreamNodes::Map(nodes),
                timeout: Some(Timeout::Phases(step2.timeout.clone())),
            };
            (Some(upstream), None)
        }
    };

    Ok(RouteRequest {
        name: step1.name.clone(),
        desc: step1.desc.clone(),
        protocols,
        hosts,
        uris: step1.paths.clone(),
        methods: step1.methods.clone(),
        vars,
        labels,
        upstream,
        upstream_id,
        plugins,
        status: u8::from(step1.status),
    })
}

fn proxy_rewrite(step2: &RouteStep2, headers: &[UpstreamHeader]) -> Option<Value> {
    let mut rewrite = Map::new();
    if let Some(path) = step2.upstream_path.as_deref().filter(|p| !p.is_empty()) {
        rewrite.insert("uri".to_string(), json!(path));
    }
    if !headers.is_empty() {
        let headers: Map<String, Value> = headers
            .iter()
            .map(|h| {
                let value = match h.header_action {
                    HeaderAction::Override => h.header_value.clone(),
                    // an empty value tells proxy-rewrite to drop the header
                    HeaderAction::Remove => String::new(),
                };
                (h.header_name.clone(), Value::String(value))
            })
            .collect();
        rewrite.insert("headers".to_string(), Value::Object(headers));
    }
    (!rewrite.is_empty()).then_some(Value::Object(rewrite))
}

/// Expand a route from the admin API back into the route editor.
pub fn transform_route_data(route: &Route) -> RouteForm {
    let body = &route.body;
    let mut plugins = body.plugins.clone();

    let redirect = match plugins.remove(REDIRECT) {
        None => RedirectOption::Disabled,
        Some(conf) => match parse_redirect(&conf) {
            Some(option) => option,
            None => {
                plugins.insert(REDIRECT.to_string(), conf);
                RedirectOption::Disabled
            }
        },
    };

    let mut upstream_path = None;
    let mut upstream_header_list = Vec::new();
    if let Some(conf) = plugins.remove(PROXY_REWRITE) {
        match parse_proxy_rewrite(&conf) {
            Some((path, headers)) => {
                upstream_path = path;
                upstream_header_list = headers;
            }
            None => {
                plugins.insert(PROXY_REWRITE.to_string(), conf);
            }
        }
    }

    let advanced_matching_rules = body
        .vars
        .iter()
        .filter_map(parse_matching_rule)
        .collect();

    let mut protocols: Vec<String> = body
        .protocols
        .iter()
        .filter(|p| p.as_str() != WEBSOCKET)
        .cloned()
        .collect();
    let websocket = protocols.len() != body.protocols.len();
    if protocols.is_empty() {
        protocols = RouteStep1::default().protocols;
    }

    let step1 = RouteStep1 {
        name: body.name.clone(),
        desc: body.desc.clone(),
        protocols,
        websocket,
        hosts: body.hosts.clone(),
        paths: body.uris.clone(),
        methods: body.methods.clone(),
        redirect,
        labels: body
            .labels
            .iter()
            .map(|(k, v)| Label::new(k.as_str(), v.as_str()).to_pair_string())
            .collect(),
        status: body.status == 1,
    };

    let (upstream_host_list, timeout) = match &body.upstream {
        Some(upstream) => (
            transform_upstream_nodes(&upstream.nodes),
            match &upstream.timeout {
                Some(Timeout::Phases(t)) => t.clone(),
                Some(Timeout::Seconds(n)) => {
                    let secs = n.as_f64().unwrap_or_default();
                    TimeoutConfig { connect: secs, send: secs, read: secs }
                }
                None => TimeoutConfig::default(),
            },
        ),
        None => (Vec::new(), TimeoutConfig::default()),
    };

    RouteForm {
        step1,
        step2: RouteStep2 {
            upstream_id: body.upstream_id.clone(),
            upstream_host_list,
            upstream_path,
            timeout,
        },
        step3: RouteStep3 { plugins },
        advanced_matching_rules,
        upstream_header_list,
    }
}

/// Only plain `[variable, operator, value]` triples on a known position map
/// onto the editor.
fn parse_matching_rule(expr: &Value) -> Option<MatchingRule> {
    let Some([var, operator, value]) = expr.as_array().map(Vec::as_slice) else {
        tracing::warn!(expr = %expr, "Skipping matching rule the editor cannot express");
        return None;
    };
    let (Some(var), Some(operator)) = (var.as_str(), operator.as_str()) else {
        tracing::warn!(expr = %expr, "Skipping matching rule the editor cannot express");
        return None;
    };
    let Some((position, name)) = RulePosition::all()
        .iter()
        .find_map(|p| var.strip_prefix(p.prefix()).map(|n| (*p, n)))
    else {
        tracing::warn!(var = %var, "Skipping matching rule with unknown variable position");
        return None;
    };
    Some(MatchingRule {
        position,
        name: name.to_string(),
        operator: operator.to_string(),
        value: match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        },
    })
}

fn parse_redirect(conf: &Value) -> Option<RedirectOption> {
    if conf.get("http_to_https").and_then(Value::as_bool) == Some(true) {
        return Some(RedirectOption::ForceHttps);
    }
    let uri = conf.get("uri")?.as_str()?.to_string();
    let ret_code = conf
        .get("ret_code")
        .and_then(Value::as_u64)
        .and_then(|c| u16::try_from(c).ok())
        .unwrap_or(DEFAULT_REDIRECT_CODE);
    Some(RedirectOption::Custom { uri, ret_code })
}

/// Only a proxy-rewrite limited to `uri` and `headers` maps onto the editor;
/// anything richer stays a plain step-3 plugin.
fn parse_proxy_rewrite(conf: &Value) -> Option<(Option<String>, Vec<UpstreamHeader>)> {
    let obj = conf.as_object()?;
    if obj.keys().any(|k| k != "uri" && k != "headers") {
        return None;
    }
    let path = match obj.get("uri") {
        None => None,
        Some(v) => Some(v.as_str()?.to_string()),
    };
    let mut headers = Vec::new();
    if let Some(map) = obj.get("headers") {
        for (name, value) in map.as_object()? {
            let value = value.as_str()?;
            headers.push(UpstreamHeader {
                header_name: name.clone(),
                header_value: value.to_string(),
                header_action: if value.is_empty() {
                    HeaderAction::Remove
                } else {
                    HeaderAction::Override
                },
            });
        }
    }
    Some((path, headers))
}

/// Turn upstream nodes into the host list the editor displays.
///
/// Map keys split at the last colon; a missing or unparsable port becomes 80.
/// Map input comes out ordered by node key, list input keeps its order.
pub fn transform_upstream_nodes(nodes: &UpstreamNodes) -> Vec<UpstreamHost> {
    match nodes {
        UpstreamNodes::List(hosts) => hosts.clone(),
        UpstreamNodes::Map(map) => map
            .iter()
            .map(|(key, weight)| {
                let (host, port) = match key.rsplit_once(':') {
                    Some((host, port)) => (host, port.parse().unwrap_or_else(|_| default_port())),
                    None => (key.as_str(), default_port()),
                };
                UpstreamHost {
                    host: host.to_string(),
                    port,
                    weight: *weight,
                }
            })
            .collect(),
    }
}

/// Group labels by key. Duplicate values are dropped, first-seen order kept.
pub fn transform_label_list(labels: &[Label]) -> LabelList {
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for label in labels {
        let values = grouped.entry(label.key.clone()).or_default();
        if !values.contains(&label.value) {
            values.push(label.value.clone());
        }
    }
    LabelList(grouped)
}
