use dashmap::DashMap;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Callback fired with the field name and its new value.
pub type Listener = Arc<dyn Fn(&str, &Value) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Shared read/write binding between form fields and their values.
///
/// Plugin forms only ever hold an `Arc<dyn FormHandle>`; whoever created the
/// handle keeps owning the values.
pub trait FormHandle: Send + Sync {
    fn get(&self, field: &str) -> Option<Value>;

    fn set(&self, field: &str, value: Value);

    /// Returns `true` if the field held a value.
    fn clear(&self, field: &str) -> bool;

    fn subscribe(&self, field: &str, listener: Listener) -> SubscriptionId;

    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

/// In-memory [`FormHandle`].
#[derive(Default)]
pub struct FormState {
    values: DashMap<String, Value>,
    listeners: DashMap<String, Vec<(SubscriptionId, Listener)>>,
    next_id: AtomicU64,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<dyn FormHandle> {
        Arc::new(Self::new())
    }

    /// Seed from an existing plugin config. Nested objects become dotted
    /// field names (`{"healthy": {"successes": 3}}` → `healthy.successes`).
    pub fn from_config(config: &Value) -> Self {
        let state = Self::new();
        if let Value::Object(map) = config {
            flatten_into(&state.values, "", map);
        }
        state
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn notify(&self, field: &str, value: &Value) {
        // Clone out of the map so listeners can touch the form themselves.
        let listeners: Vec<Listener> = match self.listeners.get(field) {
            Some(entry) => entry.iter().map(|(_, l)| Arc::clone(l)).collect(),
            None => return,
        };
        for listener in listeners {
            listener(field, value);
        }
    }
}

fn flatten_into(values: &DashMap<String, Value>, prefix: &str, map: &Map<String, Value>) {
    for (key, value) in map {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Object(inner) if !inner.is_empty() => flatten_into(values, &name, inner),
            other => {
                values.insert(name, other.clone());
            }
        }
    }
}

impl FormHandle for FormState {
    fn get(&self, field: &str) -> Option<Value> {
        self.values.get(field).map(|v| v.value().clone())
    }

    fn set(&self, field: &str, value: Value) {
        self.values.insert(field.to_string(), value.clone());
        self.notify(field, &value);
    }

    fn clear(&self, field: &str) -> bool {
        let removed = self.values.remove(field).is_some();
        if removed {
            self.notify(field, &Value::Null);
        }
        removed
    }

    fn subscribe(&self, field: &str, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .entry(field.to_string())
            .or_default()
            .push((id, listener));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        for mut entry in self.listeners.iter_mut() {
            let before = entry.len();
            entry.retain(|(sid, _)| *sid != id);
            if entry.len() != before {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    #[test]
    fn test_set_and_get() {
        let form = FormState::new();
        assert!(form.get("conn").is_none());
        form.set("conn", json!(10));
        assert_eq!(form.get("conn"), Some(json!(10)));
        assert_eq!(form.len(), 1);
    }

    #[test]
    fn test_clear() {
        let form = FormState::new();
        form.set("conn", json!(10));
        assert!(form.clear("conn"));
        assert!(!form.clear("conn"));
        assert!(form.is_empty());
    }

    #[test]
    fn test_subscribers_see_updates_for_their_field_only() {
        let form = FormState::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        form.subscribe(
            "burst",
            Arc::new(move |field: &str, value: &Value| sink.lock().unwrap().push((field.to_string(), value.clone()))),
        );
        form.set("conn", json!(1));
        form.set("burst", json!(2));
        form.clear("burst");
        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![("burst".to_string(), json!(2)), ("burst".to_string(), Value::Null)]
        );
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let form = FormState::new();
        let hits = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&hits);
        let id = form.subscribe(
            "conn",
            Arc::new(move |_: &str, _: &Value| {
                counter.fetch_add(1, Ordering::Relaxed);
            }),
        );
        form.set("conn", json!(1));
        assert!(form.unsubscribe(id));
        assert!(!form.unsubscribe(id));
        form.set("conn", json!(2));
        assert_eq!(hits.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_listener_may_write_back() {
        let form = Arc::new(FormState::new());
        let weak = Arc::downgrade(&form);
        form.subscribe(
            "conn",
            Arc::new(move |_: &str, value: &Value| {
                if let Some(form) = weak.upgrade() {
                    form.set("burst", value.clone());
                }
            }),
        );
        form.set("conn", json!(4));
        assert_eq!(form.get("burst"), Some(json!(4)));
    }

    #[test]
    fn test_from_config_flattens_nested_objects() {
        let form = FormState::from_config(&json!({
            "break_response_code": 502,
            "healthy": {"successes": 3, "http_statuses": [200]},
            "empty": {}
        }));
        assert_eq!(form.get("break_response_code"), Some(json!(502)));
        assert_eq!(form.get("healthy.successes"), Some(json!(3)));
        assert_eq!(form.get("healthy.http_statuses"), Some(json!([200])));
        assert_eq!(form.get("empty"), Some(json!({})));
    }
}
