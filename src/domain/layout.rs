// Layout domain models shared by the sizing, placement and history services
use serde::{Deserialize, Serialize};

/// Number of grid columns in a view unless its template says otherwise.
pub const GRID_COLUMNS: u32 = 12;

/// Sizing hint for a card, in grid units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraint {
    pub width: u32,
    pub height: u32,
    pub min_width: u32,
    pub max_width: u32,
    pub min_height: u32,
    pub max_height: u32,
}

impl Constraint {
    /// Force the constraint into its invariants: `1 <= minW <= width <= maxW <= 12`,
    /// `height >= 2` and `minH <= height <= maxH`.
    pub fn normalized(self) -> Self {
        let width = self.width.clamp(1, GRID_COLUMNS);
        let height = self.height.max(2);
        let min_width = self.min_width.max(1).min(width);
        let max_width = self.max_width.min(GRID_COLUMNS).max(width);
        let min_height = self.min_height.max(1).min(height);
        let max_height = self.max_height.max(height);

        Self {
            width,
            height,
            min_width,
            max_width,
            min_height,
            max_height,
        }
    }

    pub fn is_full_width(&self) -> bool {
        self.width >= GRID_COLUMNS
    }
}

/// Zero-indexed cell coordinates handed to the drag/resize surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridPlacement {
    pub id: String,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_w: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_w: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_h: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_h: Option<u32>,
}

impl GridPlacement {
    pub fn new(index: usize, x: u32, y: u32, w: u32, h: u32) -> Self {
        Self {
            id: placement_id(index),
            x,
            y,
            w,
            h,
            min_w: None,
            max_w: None,
            min_h: None,
            max_h: None,
        }
    }

    pub fn with_bounds(mut self, constraint: &Constraint) -> Self {
        self.min_w = Some(constraint.min_width);
        self.max_w = Some(constraint.max_width);
        self.min_h = Some(constraint.min_height);
        self.max_h = Some(constraint.max_height);
        self
    }

    /// Index of the card this placement refers to, if the id is well-formed.
    pub fn card_index(&self) -> Option<usize> {
        self.id.strip_prefix("card-")?.parse().ok()
    }
}

pub fn placement_id(index: usize) -> String {
    format!("card-{}", index)
}

/// Where a view's placement comes from. Resolved once per view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    /// Column/row templates plus per-card position strings.
    GridTemplate,
    /// Per-card embedded `{x,y,w,h}`.
    LegacyEmbedded,
    /// Nothing persisted; computed by the masonry placer.
    AutoMasonry,
}

/// Parsed view grid template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridTemplate {
    pub columns: u32,
    pub row_height: String,
}

impl Default for GridTemplate {
    fn default() -> Self {
        Self {
            columns: GRID_COLUMNS,
            row_height: "30px".to_string(),
        }
    }
}
