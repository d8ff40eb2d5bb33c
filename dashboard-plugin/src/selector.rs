use crate::field::{FieldError, FieldSpec};
use crate::form::FormHandle;
use crate::forms;
use dashboard_core::DashboardError;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Plugins that have a configuration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PluginUi {
    BasicAuth,
    LimitConn,
    RefererRestriction,
    ProxyMirror,
    ApiBreaker,
}

impl PluginUi {
    pub const ALL: [PluginUi; 5] = [
        PluginUi::BasicAuth,
        PluginUi::LimitConn,
        PluginUi::RefererRestriction,
        PluginUi::ProxyMirror,
        PluginUi::ApiBreaker,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            PluginUi::BasicAuth => "basic-auth",
            PluginUi::LimitConn => "limit-conn",
            PluginUi::RefererRestriction => "referer-restriction",
            PluginUi::ProxyMirror => "proxy-mirror",
            PluginUi::ApiBreaker => "api-breaker",
        }
    }

    pub fn fields(&self) -> Vec<FieldSpec> {
        match self {
            PluginUi::BasicAuth => forms::basic_auth::fields(),
            PluginUi::LimitConn => forms::limit_conn::fields(),
            PluginUi::RefererRestriction => forms::referer_restriction::fields(),
            PluginUi::ProxyMirror => forms::proxy_mirror::fields(),
            PluginUi::ApiBreaker => forms::api_breaker::fields(),
        }
    }
}

/// Plugin identifiers offered by plugin pickers.
pub const PLUGIN_UI_LIST: [&str; PluginUi::ALL.len()] = [
    PluginUi::ALL[0].as_str(),
    PluginUi::ALL[1].as_str(),
    PluginUi::ALL[2].as_str(),
    PluginUi::ALL[3].as_str(),
    PluginUi::ALL[4].as_str(),
];

impl fmt::Display for PluginUi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PluginUi {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PluginUi::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| DashboardError::UnknownPlugin(s.to_string()))
    }
}

/// Pick the form for `name`, bound to the caller's form handle.
///
/// Unknown names yield `None` so a page with an unsupported plugin renders
/// without that form instead of failing.
pub fn select_plugin_form(name: &str, form: &Arc<dyn FormHandle>) -> Option<PluginForm> {
    match name.parse::<PluginUi>() {
        Ok(plugin) => Some(PluginForm::new(plugin, Arc::clone(form))),
        Err(_) => {
            tracing::debug!(plugin = %name, "No form for plugin");
            None
        }
    }
}

/// A field paired with the value currently held by the form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedField {
    #[serde(flatten)]
    pub spec: FieldSpec,
    pub value: Option<Value>,
}

/// A plugin's configuration form bound to a shared [`FormHandle`].
#[derive(Clone)]
pub struct PluginForm {
    plugin: PluginUi,
    form: Arc<dyn FormHandle>,
}

impl fmt::Debug for PluginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginForm").field("plugin", &self.plugin).finish_non_exhaustive()
    }
}

impl PluginForm {
    pub fn new(plugin: PluginUi, form: Arc<dyn FormHandle>) -> Self {
        Self { plugin, form }
    }

    pub fn plugin(&self) -> PluginUi {
        self.plugin
    }

    pub fn name(&self) -> &'static str {
        self.plugin.as_str()
    }

    pub fn handle(&self) -> &Arc<dyn FormHandle> {
        &self.form
    }

    pub fn fields(&self) -> Vec<FieldSpec> {
        self.plugin.fields()
    }

    /// Every field with its current value, or its default when unset.
    pub fn render(&self) -> Vec<RenderedField> {
        self.fields()
            .into_iter()
            .map(|spec| {
                let value = self.form.get(spec.name).or_else(|| spec.default.clone());
                RenderedField { spec, value }
            })
            .collect()
    }

    /// Write defaults into the form for fields that are still unset.
    /// Returns the names that were filled.
    pub fn apply_defaults(&self) -> Vec<&'static str> {
        let mut filled = Vec::new();
        for spec in self.fields() {
            if let Some(default) = spec.default {
                if self.form.get(spec.name).is_none() {
                    self.form.set(spec.name, default);
                    filled.push(spec.name);
                }
            }
        }
        filled
    }

    /// Validate every field and assemble the plugin config. Dotted names
    /// become nested objects. All field errors are reported together.
    pub fn to_config(&self) -> Result<Value, Vec<FieldError>> {
        let mut config = Map::new();
        let mut errors = Vec::new();
        for spec in self.fields() {
            match spec.validate(self.form.get(spec.name).as_ref()) {
                Ok(Some(value)) => insert_dotted(&mut config, spec.name, value),
                Ok(None) => {}
                Err(e) => errors.push(e),
            }
        }
        if errors.is_empty() {
            Ok(Value::Object(config))
        } else {
            Err(errors)
        }
    }
}

fn insert_dotted(config: &mut Map<String, Value>, name: &str, value: Value) {
    match name.split_once('.') {
        None => {
            config.insert(name.to_string(), value);
        }
        Some((head, rest)) => {
            let entry = config
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(inner) = entry {
                insert_dotted(inner, rest, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FormState;
    use serde_json::json;

    #[test]
    fn test_list_matches_enum() {
        assert_eq!(
            PLUGIN_UI_LIST,
            ["basic-auth", "limit-conn", "referer-restriction", "proxy-mirror", "api-breaker"]
        );
        for (name, plugin) in PLUGIN_UI_LIST.iter().zip(PluginUi::ALL) {
            assert_eq!(name.parse::<PluginUi>().unwrap(), plugin);
            assert_eq!(plugin.to_string(), *name);
        }
    }

    #[test]
    fn test_every_listed_plugin_has_a_form_bound_to_the_handle() {
        let handle = FormState::shared();
        for name in PLUGIN_UI_LIST {
            let form = select_plugin_form(name, &handle).unwrap();
            assert_eq!(form.name(), name);
            assert!(Arc::ptr_eq(form.handle(), &handle));
            assert!(!form.fields().is_empty());
        }
    }

    #[test]
    fn test_unknown_names_select_nothing() {
        let handle = FormState::shared();
        for name in ["", "key-auth", "Basic-Auth", "basic-auth ", "limit_conn"] {
            assert!(select_plugin_form(name, &handle).is_none(), "{name:?}");
        }
        assert!(matches!(
            "cors".parse::<PluginUi>(),
            Err(DashboardError::UnknownPlugin(ref n)) if n == "cors"
        ));
    }

    #[test]
    fn test_insert_dotted_nests() {
        let mut config = Map::new();
        insert_dotted(&mut config, "healthy.successes", json!(3));
        insert_dotted(&mut config, "healthy.http_statuses", json!([200]));
        insert_dotted(&mut config, "top", json!(1));
        assert_eq!(
            Value::Object(config),
            json!({"healthy": {"successes": 3, "http_statuses": [200]}, "top": 1})
        );
    }
}
