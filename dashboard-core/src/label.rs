use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single `{key: value}` label as the admin API lists it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct Label {
    pub key: String,
    pub value: String,
}

impl Label {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Parse the `key:value` form used by the route editor.
    /// Splits at the first colon, so values may contain colons.
    pub fn parse(s: &str) -> Option<Self> {
        let (key, value) = s.split_once(':')?;
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        Some(Self::new(key, value.trim()))
    }

    pub fn to_pair_string(&self) -> String {
        format!("{}:{}", self.key, self.value)
    }
}

impl TryFrom<BTreeMap<String, String>> for Label {
    type Error = String;

    fn try_from(map: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        let mut iter = map.into_iter();
        match (iter.next(), iter.next()) {
            (Some((key, value)), None) => Ok(Self { key, value }),
            _ => Err("a label must hold exactly one key".to_string()),
        }
    }
}

impl From<Label> for BTreeMap<String, String> {
    fn from(label: Label) -> Self {
        BTreeMap::from([(label.key, label.value)])
    }
}

/// Label values grouped by key, used to populate filter selectors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelList(pub BTreeMap<String, Vec<String>>);

impl LabelList {
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.0.get(key).map(|v| v.as_slice())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
