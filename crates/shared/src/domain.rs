use std::fmt;

use serde::{Deserialize, Serialize};

/// One entry of a result set.
///
/// The server sends strings, but the client treats items opaquely: anything
/// that is valid JSON decodes and renders as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultItem(pub serde_json::Value);

impl ResultItem {
    /// Text shown in a table cell. JSON strings render as their contents,
    /// everything else as its JSON text.
    pub fn text(&self) -> String {
        match &self.0 {
            serde_json::Value::String(text) => text.clone(),
            other => other.to_string(),
        }
    }
}

impl From<String> for ResultItem {
    fn from(value: String) -> Self {
        Self(serde_json::Value::String(value))
    }
}

impl From<&str> for ResultItem {
    fn from(value: &str) -> Self {
        Self(serde_json::Value::String(value.to_string()))
    }
}

impl fmt::Display for ResultItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

pub type ResultSet = Vec<ResultItem>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_items_render_without_quotes() {
        let item: ResultItem = serde_json::from_str("\"to be\"").expect("json");
        assert_eq!(item.text(), "to be");
    }

    #[test]
    fn non_string_items_render_as_json_text() {
        let items: ResultSet = serde_json::from_str("[1, null, {\"a\":true}]").expect("json");
        let texts: Vec<String> = items.iter().map(ResultItem::text).collect();
        assert_eq!(texts, vec!["1", "null", "{\"a\":true}"]);
    }
}
