use crate::error::ClientError;
use crate::labels::{LabelSource, PlaceholderLabels, PlaceholderRowLabels, RowDecorator};
use crate::transport::{AdminTransport, ApiRequest, HttpTransport};
use dashboard_core::ClientConfig;
use dashboard_core::list::{ListPage, WireList};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// Route / upstream client for the gateway admin API.
///
/// Every call is independent: nothing is cached, coalesced or retried, and
/// failures come back as `Err` unchanged. Cheap to clone and share.
#[derive(Clone)]
pub struct DashboardClient {
    transport: Arc<dyn AdminTransport>,
    label_source: Arc<dyn LabelSource>,
    row_decorator: Option<Arc<dyn RowDecorator>>,
}

impl DashboardClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let placeholder_labels = config.placeholder_labels;
        let transport = HttpTransport::new(config)?;
        Ok(Self::with_transport(Arc::new(transport), placeholder_labels))
    }

    pub fn with_transport(transport: Arc<dyn AdminTransport>, placeholder_labels: bool) -> Self {
        let row_decorator: Option<Arc<dyn RowDecorator>> = if placeholder_labels {
            Some(Arc::new(PlaceholderRowLabels))
        } else {
            None
        };
        Self {
            transport,
            label_source: Arc::new(PlaceholderLabels),
            row_decorator,
        }
    }

    pub fn with_label_source(mut self, source: Arc<dyn LabelSource>) -> Self {
        self.label_source = source;
        self
    }

    pub fn with_row_decorator(mut self, decorator: Option<Arc<dyn RowDecorator>>) -> Self {
        self.row_decorator = decorator;
        self
    }

    pub(crate) fn label_source(&self) -> &Arc<dyn LabelSource> {
        &self.label_source
    }

    pub(crate) async fn send(&self, request: ApiRequest) -> Result<Value, ClientError> {
        self.transport.send(request).await
    }

    pub(crate) async fn fetch<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<T, ClientError> {
        let data = self.send(request).await?;
        Ok(serde_json::from_value(data)?)
    }

    /// Fetch a list endpoint and normalize `{rows, total_size}` into
    /// `{data, total}`, passing raw rows through `decorate` first.
    pub(crate) async fn fetch_page<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        decorate: Option<&dyn RowDecorator>,
    ) -> Result<ListPage<T>, ClientError> {
        let data = self.send(request).await?;
        let mut wire: WireList<Value> = serde_json::from_value(data)?;
        if let Some(decorator) = decorate {
            wire.rows.iter_mut().for_each(|row| decorator.decorate(row));
        }
        let page = ListPage::from(wire);
        let rows = page
            .data
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<T>, _>>()?;
        Ok(ListPage {
            data: rows,
            total: page.total,
        })
    }

    pub(crate) fn row_decorator(&self) -> Option<&dyn RowDecorator> {
        self.row_decorator.as_deref()
    }
}
