use crate::field::{FieldKind, FieldSpec};
use serde_json::json;

const STATUS: FieldKind = FieldKind::IntegerList { min: Some(200), max: Some(599) };

/// Circuit breaker. The `unhealthy` / `healthy` groups nest in the config.
pub fn fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::required(
            "break_response_code",
            "Break response code",
            FieldKind::Integer { min: Some(200), max: Some(599) },
        ),
        FieldSpec::optional(
            "max_breaker_sec",
            "Max breaker time (s)",
            FieldKind::Integer { min: Some(3), max: None },
            json!(300),
        ),
        FieldSpec::optional("unhealthy.http_statuses", "Unhealthy statuses", STATUS, json!([500])),
        FieldSpec::optional(
            "unhealthy.failures",
            "Unhealthy failures",
            FieldKind::Integer { min: Some(1), max: None },
            json!(3),
        ),
        FieldSpec::optional("healthy.http_statuses", "Healthy statuses", STATUS, json!([200])),
        FieldSpec::optional(
            "healthy.successes",
            "Healthy successes",
            FieldKind::Integer { min: Some(1), max: None },
            json!(3),
        ),
    ]
}
