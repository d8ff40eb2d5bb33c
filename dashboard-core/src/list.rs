use serde::{Deserialize, Serialize};

/// List payload as the admin API sends it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WireList<T> {
    #[serde(default = "Vec::new")]
    pub rows: Vec<T>,
    #[serde(default)]
    pub total_size: u64,
}

/// List payload as callers see it. Callers never receive a [`WireList`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListPage<T> {
    pub data: Vec<T>,
    pub total: u64,
}

impl<T> From<WireList<T>> for ListPage<T> {
    fn from(wire: WireList<T>) -> Self {
        Self {
            data: wire.rows,
            total: wire.total_size,
        }
    }
}

impl<T> ListPage<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> ListPage<U> {
        ListPage {
            data: self.data.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}

/// Paging and filter parameters for the route list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ListQuery {
    /// 1-based page number, defaults to 1.
    pub current: Option<u32>,
    /// Defaults to 10.
    pub page_size: Option<u32>,
    pub name: Option<String>,
    pub uri: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
}

impl ListQuery {
    pub const DEFAULT_PAGE: u32 = 1;
    pub const DEFAULT_PAGE_SIZE: u32 = 10;

    /// Query pairs in wire form. `labels` collapse into one `label` parameter
    /// joined by `&`.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::with_capacity(5);
        if let Some(ref name) = self.name {
            params.push(("name".to_string(), name.clone()));
        }
        if let Some(ref uri) = self.uri {
            params.push(("uri".to_string(), uri.clone()));
        }
        if !self.labels.is_empty() {
            params.push(("label".to_string(), self.labels.join("&")));
        }
        params.push((
            "page".to_string(),
            self.current.unwrap_or(Self::DEFAULT_PAGE).to_string(),
        ));
        params.push((
            "page_size".to_string(),
            self.page_size.unwrap_or(Self::DEFAULT_PAGE_SIZE).to_string(),
        ));
        params
    }
}
