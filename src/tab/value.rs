//! Serializable snapshot of a tab, as handed to extension-facing callers

use serde::Serialize;
use serde_json::{Map, Value};

use crate::utils::Result;

/// Loading status reported in a tab snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TabStatus {
    Loading,
    Complete,
}

/// Keys owned by the snapshot; embedder values never override them
const RESERVED_KEYS: &[&str] = &[
    "id",
    "windowId",
    "incognito",
    "active",
    "url",
    "title",
    "status",
    "discarded",
    "autoDiscardable",
    "highlighted",
    "index",
    "pinned",
    "selected",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabValue {
    pub id: i32,
    pub window_id: i32,
    pub incognito: bool,
    pub active: bool,
    pub url: String,
    pub title: String,
    pub status: TabStatus,
    pub discarded: bool,
    pub auto_discardable: bool,
    pub highlighted: bool,
    /// Strip index, -1 when detached
    pub index: i32,
    pub pinned: bool,
    pub selected: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TabValue {
    /// Attach embedder-supplied values, dropping any that collide with
    /// snapshot keys
    pub fn with_extra(mut self, mut extra: Map<String, Value>) -> Self {
        extra.retain(|key, _| !RESERVED_KEYS.contains(&key.as_str()));
        self.extra = extra;
        self
    }

    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> TabValue {
        TabValue {
            id: 4,
            window_id: 1,
            incognito: false,
            active: true,
            url: "https://example.com/".to_string(),
            title: "Example".to_string(),
            status: TabStatus::Complete,
            discarded: false,
            auto_discardable: true,
            highlighted: true,
            index: 0,
            pinned: false,
            selected: true,
            extra: Map::new(),
        }
    }

    #[test]
    fn test_json_keys() {
        let value = sample().to_json().unwrap();
        assert_eq!(value["windowId"], json!(1));
        assert_eq!(value["autoDiscardable"], json!(true));
        assert_eq!(value["status"], json!("complete"));
    }

    #[test]
    fn test_extra_cannot_shadow_reserved_keys() {
        let mut extra = Map::new();
        extra.insert("id".into(), json!(99));
        extra.insert("openerTabId".into(), json!(2));
        let value = sample().with_extra(extra).to_json().unwrap();
        assert_eq!(value["id"], json!(4));
        assert_eq!(value["openerTabId"], json!(2));
    }
}
