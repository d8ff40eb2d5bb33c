use crate::field::{FieldKind, FieldSpec};
use serde_json::json;

pub const KEYS: &[&str] = &[
    "remote_addr",
    "server_addr",
    "http_x_real_ip",
    "http_x_forwarded_for",
];

/// Concurrent request limiting.
pub fn fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::required("conn", "Max concurrent requests", FieldKind::Integer { min: Some(1), max: None }),
        FieldSpec::required("burst", "Burst", FieldKind::Integer { min: Some(0), max: None }),
        FieldSpec::required(
            "default_conn_delay",
            "Default delay (s)",
            FieldKind::Number { gt: Some(0.0) },
        ),
        FieldSpec::optional("key", "Key", FieldKind::Select { options: KEYS }, json!("remote_addr")),
        FieldSpec::optional(
            "rejected_code",
            "Rejected status code",
            FieldKind::Integer { min: Some(200), max: Some(599) },
            json!(503),
        ),
    ]
}
