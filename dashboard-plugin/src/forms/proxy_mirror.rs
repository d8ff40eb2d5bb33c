use crate::field::{FieldKind, FieldSpec};

/// Mirror target, scheme and authority only.
pub fn fields() -> Vec<FieldSpec> {
    vec![FieldSpec::required("host", "Mirror host", FieldKind::Url)]
}
