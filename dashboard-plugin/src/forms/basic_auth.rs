use crate::field::{FieldKind, FieldSpec};

/// Consumer credentials for HTTP Basic authentication.
pub fn fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::required("username", "Username", FieldKind::Text),
        FieldSpec::required("password", "Password", FieldKind::Password),
    ]
}
