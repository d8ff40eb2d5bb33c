pub mod field;
pub mod form;
pub mod forms;
pub mod selector;

pub use field::{FieldError, FieldKind, FieldSpec};
pub use form::{FormHandle, FormState};
pub use selector::{PLUGIN_UI_LIST, PluginForm, PluginUi, select_plugin_form};
