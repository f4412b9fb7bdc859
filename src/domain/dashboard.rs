// Dashboard domain model
use super::card::Card;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// View-level layout metadata used by grid-template dashboards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewLayout {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_type: Option<String>,
    #[serde(
        rename = "grid-template-columns",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub grid_template_columns: Option<String>,
    #[serde(
        rename = "grid-template-rows",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub grid_template_rows: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct View {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub view_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<ViewLayout>,
    #[serde(default)]
    pub cards: Vec<Card>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl View {
    pub fn new(title: impl Into<String>, cards: Vec<Card>) -> Self {
        Self {
            title: Some(title.into()),
            cards,
            ..Self::default()
        }
    }

    pub fn column_template(&self) -> Option<&str> {
        self.layout
            .as_ref()
            .and_then(|l| l.grid_template_columns.as_deref())
    }

    pub fn row_template(&self) -> Option<&str> {
        self.layout
            .as_ref()
            .and_then(|l| l.grid_template_rows.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub views: Vec<View>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Dashboard {
    pub fn new(title: String, views: Vec<View>) -> Self {
        Self {
            title,
            views,
            extra: Map::new(),
        }
    }

    pub fn view(&self, index: usize) -> Option<&View> {
        self.views.get(index)
    }
}
