use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::sync::LazyLock;
use thiserror::Error;

static MIRROR_HOST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://[a-zA-Z0-9][a-zA-Z0-9.-]*(:[0-9]{1,5})?$").expect("static regex")
});

static HOST_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\*\.)?[a-zA-Z0-9]([a-zA-Z0-9-]*[a-zA-Z0-9])?(\.[a-zA-Z0-9]([a-zA-Z0-9-]*[a-zA-Z0-9])?)*$")
        .expect("static regex")
});

/// Input widget and value constraints of a form field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Password,
    /// `http(s)://host[:port]` with nothing after it.
    Url,
    Integer { min: Option<i64>, max: Option<i64> },
    /// Strictly greater than `gt` when set.
    Number { gt: Option<f64> },
    Switch,
    Select { options: &'static [&'static str] },
    /// Host names, `*.` wildcard prefix allowed.
    HostList,
    IntegerList { min: Option<i64>, max: Option<i64> },
}

/// One field of a plugin form. Dotted names address nested config objects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldSpec {
    pub fn required(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self { name, label, kind, required: true, default: None }
    }

    pub fn optional(name: &'static str, label: &'static str, kind: FieldKind, default: Value) -> Self {
        Self { name, label, kind, required: false, default: Some(default) }
    }

    /// Check a raw value from the form. Missing values fall back to the
    /// default; `Ok(None)` means the field stays out of the config.
    pub fn validate(&self, value: Option<&Value>) -> Result<Option<Value>, FieldError> {
        let value = match value {
            None | Some(Value::Null) => {
                return match (&self.default, self.required) {
                    (Some(default), _) => Ok(Some(default.clone())),
                    (None, true) => Err(self.error("is required")),
                    (None, false) => Ok(None),
                };
            }
            Some(v) => v,
        };

        match &self.kind {
            FieldKind::Text | FieldKind::Password => {
                let s = value.as_str().ok_or_else(|| self.error("must be a string"))?;
                if self.required && s.trim().is_empty() {
                    return Err(self.error("is required"));
                }
            }
            FieldKind::Url => {
                let s = value.as_str().ok_or_else(|| self.error("must be a string"))?;
                if !MIRROR_HOST.is_match(s) {
                    return Err(self.error("must look like http(s)://host[:port] without a path"));
                }
            }
            FieldKind::Integer { min, max } => {
                let n = value.as_i64().ok_or_else(|| self.error("must be an integer"))?;
                self.check_range(n, *min, *max)?;
            }
            FieldKind::Number { gt } => {
                let n = value.as_f64().ok_or_else(|| self.error("must be a number"))?;
                if let Some(gt) = gt {
                    if n <= *gt {
                        return Err(self.error(&format!("must be greater than {gt}")));
                    }
                }
            }
            FieldKind::Switch => {
                value.as_bool().ok_or_else(|| self.error("must be true or false"))?;
            }
            FieldKind::Select { options } => {
                let s = value.as_str().ok_or_else(|| self.error("must be a string"))?;
                if !options.contains(&s) {
                    return Err(self.error(&format!("must be one of {}", options.join(", "))));
                }
            }
            FieldKind::HostList => {
                let items = value.as_array().ok_or_else(|| self.error("must be a list"))?;
                if self.required && items.is_empty() {
                    return Err(self.error("needs at least one host"));
                }
                for item in items {
                    let host = item.as_str().ok_or_else(|| self.error("hosts must be strings"))?;
                    if !HOST_PATTERN.is_match(host) {
                        return Err(self.error(&format!("{host:?} is not a valid host")));
                    }
                }
            }
            FieldKind::IntegerList { min, max } => {
                let items = value.as_array().ok_or_else(|| self.error("must be a list"))?;
                if items.is_empty() {
                    return Err(self.error("needs at least one value"));
                }
                for item in items {
                    let n = item.as_i64().ok_or_else(|| self.error("values must be integers"))?;
                    self.check_range(n, *min, *max)?;
                }
            }
        }
        Ok(Some(value.clone()))
    }

    fn check_range(&self, n: i64, min: Option<i64>, max: Option<i64>) -> Result<(), FieldError> {
        if min.is_some_and(|min| n < min) || max.is_some_and(|max| n > max) {
            let bounds = match (min, max) {
                (Some(lo), Some(hi)) => format!("between {lo} and {hi}"),
                (Some(lo), None) => format!("at least {lo}"),
                (None, Some(hi)) => format!("at most {hi}"),
                (None, None) => unreachable!(),
            };
            return Err(self.error(&format!("must be {bounds}")));
        }
        Ok(())
    }

    fn error(&self, message: &str) -> FieldError {
        FieldError {
            field: self.name.to_string(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_required_field_errors() {
        let spec = FieldSpec::required("conn", "Conn", FieldKind::Integer { min: Some(1), max: None });
        let err = spec.validate(None).unwrap_err();
        assert_eq!(err.to_string(), "conn: is required");
        assert!(spec.validate(Some(&Value::Null)).is_err());
    }

    #[test]
    fn test_missing_optional_field_takes_default() {
        let spec = FieldSpec::optional(
            "rejected_code",
            "Rejected code",
            FieldKind::Integer { min: Some(200), max: Some(599) },
            json!(503),
        );
        assert_eq!(spec.validate(None).unwrap(), Some(json!(503)));
    }

    #[test]
    fn test_integer_bounds() {
        let spec = FieldSpec::required("code", "Code", FieldKind::Integer { min: Some(200), max: Some(599) });
        assert!(spec.validate(Some(&json!(200))).is_ok());
        assert!(spec.validate(Some(&json!(599))).is_ok());
        let err = spec.validate(Some(&json!(600))).unwrap_err();
        assert_eq!(err.message, "must be between 200 and 599");
        assert!(spec.validate(Some(&json!("503"))).is_err());
        assert!(spec.validate(Some(&json!(1.5))).is_err());
    }

    #[test]
    fn test_number_strictly_greater() {
        let spec = FieldSpec::required("delay", "Delay", FieldKind::Number { gt: Some(0.0) });
        assert!(spec.validate(Some(&json!(0.1))).is_ok());
        assert!(spec.validate(Some(&json!(0))).is_err());
    }

    #[test]
    fn test_url_requires_scheme_and_no_path() {
        let spec = FieldSpec::required("host", "Host", FieldKind::Url);
        assert!(spec.validate(Some(&json!("http://127.0.0.1:9797"))).is_ok());
        assert!(spec.validate(Some(&json!("https://mirror.internal"))).is_ok());
        assert!(spec.validate(Some(&json!("127.0.0.1:9797"))).is_err());
        assert!(spec.validate(Some(&json!("http://mirror/path"))).is_err());
    }

    #[test]
    fn test_host_list_checks_each_entry() {
        let spec = FieldSpec::required("whitelist", "Whitelist", FieldKind::HostList);
        assert!(spec.validate(Some(&json!(["example.com", "*.example.com"]))).is_ok());
        assert!(spec.validate(Some(&json!([]))).is_err());
        assert!(spec.validate(Some(&json!(["bad host"]))).is_err());
    }

    #[test]
    fn test_select_limits_options() {
        let spec = FieldSpec::required("key", "Key", FieldKind::Select { options: &["a", "b"] });
        assert!(spec.validate(Some(&json!("a"))).is_ok());
        assert_eq!(spec.validate(Some(&json!("c"))).unwrap_err().message, "must be one of a, b");
    }

    #[test]
    fn test_required_text_must_not_be_blank() {
        let spec = FieldSpec::required("username", "Username", FieldKind::Text);
        assert!(spec.validate(Some(&json!("  "))).is_err());
        assert!(spec.validate(Some(&json!("alice"))).is_ok());
    }

    #[test]
    fn test_spec_serializes_kind_tag() {
        let spec = FieldSpec::required("conn", "Conn", FieldKind::Integer { min: Some(1), max: None });
        let value = serde_json::to_value(&spec).unwrap();
        assert_eq!(value["kind"], json!({"type": "integer", "min": 1, "max": null}));
        assert!(value.get("default").is_none());
    }
}
