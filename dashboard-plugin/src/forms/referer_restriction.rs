use crate::field::{FieldKind, FieldSpec};
use serde_json::json;

pub fn fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::required("whitelist", "Allowed referers", FieldKind::HostList),
        FieldSpec::optional("bypass_missing", "Allow missing Referer", FieldKind::Switch, json!(false)),
    ]
}
