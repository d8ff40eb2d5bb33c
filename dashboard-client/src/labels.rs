//! Placeholder label data, isolated behind the same seams the real admin
//! API calls use so it can be dropped without touching callers.

use crate::client::DashboardClient;
use crate::error::ClientError;
use async_trait::async_trait;
use dashboard_core::label::{Label, LabelList};
use dashboard_core::transform::transform_label_list;
use serde_json::{Value, json};
use tracing::debug;

/// Where the known label keys and values come from.
#[async_trait]
pub trait LabelSource: Send + Sync {
    async fn labels(&self) -> Result<Vec<Label>, ClientError>;
}

/// Fixed label list served until the admin API exposes labels.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaceholderLabels;

impl PlaceholderLabels {
    pub fn entries() -> Vec<Label> {
        vec![
            Label::new("build", "16"),
            Label::new("env", "production"),
            Label::new("version", "v2"),
            Label::new("version", "v1"),
        ]
    }
}

#[async_trait]
impl LabelSource for PlaceholderLabels {
    async fn labels(&self) -> Result<Vec<Label>, ClientError> {
        debug!("Serving placeholder label list");
        Ok(Self::entries())
    }
}

/// Rewrites a raw list row before it is decoded.
pub trait RowDecorator: Send + Sync {
    fn decorate(&self, row: &mut Value);
}

/// Fills in constant placeholder `labels` on rows that carry none.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaceholderRowLabels;

impl RowDecorator for PlaceholderRowLabels {
    fn decorate(&self, row: &mut Value) {
        if let Value::Object(obj) = row {
            obj.entry("labels")
                .or_insert_with(|| json!({ "build": "16", "env": "production", "version": "v2" }));
        }
    }
}

impl DashboardClient {
    /// Known labels grouped by key.
    pub async fn fetch_label_list(&self) -> Result<LabelList, ClientError> {
        let labels = self.label_source().labels().await?;
        Ok(transform_label_list(&labels))
    }
}
