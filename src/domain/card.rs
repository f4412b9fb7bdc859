// Card domain model
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Coordinates embedded directly in a card by legacy dashboards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedLayout {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub w: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_w: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_w: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_h: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_h: Option<u32>,
}

/// CSS-Grid-style placement strings, e.g. `"1 / 7"` or `"span 2"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPosition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<String>,
}

impl GridPosition {
    pub fn new(column: String, row: String) -> Self {
        Self {
            column: Some(column),
            row: Some(row),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.column.is_none() && self.row.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    #[serde(rename = "type")]
    pub card_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<EmbeddedLayout>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_position: Option<GridPosition>,
    /// Type-specific content, carried through untouched.
    #[serde(flatten)]
    pub content: Map<String, Value>,
}

impl Card {
    pub fn new(card_type: impl Into<String>) -> Self {
        Self {
            card_type: card_type.into(),
            layout: None,
            grid_position: None,
            content: Map::new(),
        }
    }

    /// Builder-style helper for setting a content field.
    pub fn with_field(mut self, key: &str, value: Value) -> Self {
        self.content.insert(key.to_string(), value);
        self
    }

    pub fn with_layout(mut self, layout: EmbeddedLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn with_grid_position(mut self, position: GridPosition) -> Self {
        self.grid_position = Some(position);
        self
    }

    pub fn has_grid_position(&self) -> bool {
        self.grid_position.as_ref().is_some_and(|p| !p.is_empty())
    }

    pub fn has_embedded_layout(&self) -> bool {
        self.layout.is_some()
    }

    pub fn has_title(&self) -> bool {
        matches!(self.content.get("title"), Some(Value::String(s)) if !s.trim().is_empty())
    }

    /// Length of an array-valued content field, or 0 when absent.
    pub fn list_len(&self, key: &str) -> usize {
        match self.content.get(key) {
            Some(Value::Array(items)) => items.len(),
            _ => 0,
        }
    }

    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.content.get(key).and_then(Value::as_str)
    }

    pub fn bool_field(&self, key: &str) -> Option<bool> {
        self.content.get(key).and_then(Value::as_bool)
    }

    pub fn u64_field(&self, key: &str) -> Option<u64> {
        self.content.get(key).and_then(Value::as_u64)
    }

    /// Pixel height configured on the card, accepting `300` or `"300px"`.
    pub fn pixel_height(&self) -> Option<u32> {
        match self.content.get("height")? {
            Value::Number(n) => n.as_u64().map(|v| v.min(u64::from(u32::MAX)) as u32),
            Value::String(s) => s.trim().trim_end_matches("px").trim().parse().ok(),
            _ => None,
        }
    }

    /// The wrapped child of single-card wrappers such as `conditional`.
    pub fn child_card(&self) -> Option<Card> {
        self.content
            .get("card")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Nested child cards; entries that are not valid cards are skipped.
    pub fn child_cards(&self) -> Vec<Card> {
        match self.content.get("cards") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| serde_json::from_value(v.clone()).ok())
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_keeps_content_fields() {
        let card: Card = serde_json::from_value(json!({
            "type": "entities",
            "title": "Lights",
            "entities": ["light.a", "light.b"],
            "gridPosition": { "column": "1 / 7", "row": "1 / 3" }
        }))
        .unwrap();

        assert_eq!(card.card_type, "entities");
        assert!(card.has_title());
        assert_eq!(card.list_len("entities"), 2);
        assert!(card.has_grid_position());
        assert!(!card.content.contains_key("gridPosition"));

        let back = serde_json::to_value(&card).unwrap();
        assert_eq!(back["title"], "Lights");
        assert_eq!(back["gridPosition"]["column"], "1 / 7");
    }

    #[test]
    fn test_pixel_height_accepts_units() {
        let card = Card::new("iframe").with_field("height", json!("300px"));
        assert_eq!(card.pixel_height(), Some(300));

        let card = Card::new("iframe").with_field("height", json!(120));
        assert_eq!(card.pixel_height(), Some(120));

        let card = Card::new("iframe").with_field("height", json!("tall"));
        assert_eq!(card.pixel_height(), None);
    }

    #[test]
    fn test_child_cards_skip_invalid_entries() {
        let card = Card::new("vertical-stack").with_field(
            "cards",
            json!([{ "type": "button" }, { "title": "no type" }, { "type": "markdown" }]),
        );
        let children = card.child_cards();
        assert_eq!(children.len(), 2);
        assert_eq!(children[1].card_type, "markdown");
    }

    #[test]
    fn test_blank_title_is_not_a_header() {
        let card = Card::new("entities").with_field("title", json!("  "));
        assert!(!card.has_title());
    }
}
