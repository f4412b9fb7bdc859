// Size constraint resolution - estimates grid size hints from card type and content
use crate::domain::card::{Card, EmbeddedLayout};
use crate::domain::layout::Constraint;

/// Vertical size of one grid row, in pixels.
const ROW_HEIGHT_PX: u32 = 56;

const HEADER_PX: u32 = 56;
const CARD_PADDING_PX: u32 = 16;
const ENTITY_ROW_PX: u32 = 40;
const GLANCE_ROW_PX: u32 = 72;
const MARKDOWN_LINE_PX: u32 = 24;
const CHART_BODY_PX: u32 = 200;
const TILE_FEATURE_PX: u32 = 48;

const STACK_MIN_ROWS: u32 = 4;
const STACK_MAX_ROWS: u32 = 30;
const DEFAULT_MAX_ROWS: u32 = 20;

// Defaults for embedded layouts that omit their bounds
const EMBEDDED_MIN_W: u32 = 3;
const EMBEDDED_MAX_W: u32 = 12;
const EMBEDDED_MIN_H: u32 = 2;
const EMBEDDED_MAX_H: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WidthFamily {
    /// Buttons, tiles, gauges.
    Compact,
    /// Lists, charts, media.
    Standard,
    /// Multi-column stacks.
    Full,
}

impl WidthFamily {
    /// (default, min, max) in columns
    fn columns(self) -> (u32, u32, u32) {
        match self {
            WidthFamily::Compact => (3, 2, 6),
            WidthFamily::Standard => (6, 3, 12),
            WidthFamily::Full => (12, 6, 12),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct CardProfile {
    family: WidthFamily,
    height: u32,
    min_height: u32,
    max_height: u32,
}

impl CardProfile {
    fn rows(family: WidthFamily, height: u32) -> Self {
        Self {
            family,
            height,
            min_height: 2,
            max_height: DEFAULT_MAX_ROWS,
        }
    }

    fn pixels(family: WidthFamily, px: u32) -> Self {
        Self::rows(family, rows_for_pixels(px))
    }

    fn min_height(mut self, rows: u32) -> Self {
        self.min_height = rows;
        self
    }

    fn max_height(mut self, rows: u32) -> Self {
        self.max_height = rows;
        self
    }

    fn into_constraint(self) -> Constraint {
        let (width, min_width, max_width) = self.family.columns();
        Constraint {
            width,
            height: self.height,
            min_width,
            max_width,
            min_height: self.min_height,
            max_height: self.max_height,
        }
    }
}

/// Resolve the sizing hint for a card.
///
/// An embedded `w`/`h` wins over the type heuristics. The result always
/// satisfies the `Constraint` invariants, whatever the input looks like.
pub fn resolve_constraint(card: &Card) -> Constraint {
    let constraint = match &card.layout {
        Some(layout) if layout.w.is_some() || layout.h.is_some() => {
            from_embedded(layout, || heuristic_constraint(card))
        }
        _ => heuristic_constraint(card),
    };
    constraint.normalized()
}

fn from_embedded(layout: &EmbeddedLayout, fallback: impl Fn() -> Constraint) -> Constraint {
    let (width, height) = match (layout.w, layout.h) {
        (Some(w), Some(h)) => (w, h),
        (w, h) => {
            let estimated = fallback();
            (w.unwrap_or(estimated.width), h.unwrap_or(estimated.height))
        }
    };

    Constraint {
        width,
        height,
        min_width: layout.min_w.unwrap_or(EMBEDDED_MIN_W),
        max_width: layout.max_w.unwrap_or(EMBEDDED_MAX_W),
        min_height: layout.min_h.unwrap_or(EMBEDDED_MIN_H),
        max_height: layout.max_h.unwrap_or(EMBEDDED_MAX_H),
    }
}

fn heuristic_constraint(card: &Card) -> Constraint {
    match card.card_type.as_str() {
        "conditional" => match card.child_card() {
            Some(child) => resolve_constraint(&child),
            None => unknown_profile(card).into_constraint(),
        },
        "vertical-stack" => {
            let total = card
                .child_cards()
                .iter()
                .map(|c| resolve_constraint(c).height)
                .fold(0u32, u32::saturating_add);
            stack_profile(WidthFamily::Standard, total).into_constraint()
        }
        "horizontal-stack" => {
            let tallest = card
                .child_cards()
                .iter()
                .map(|c| resolve_constraint(c).height)
                .max()
                .unwrap_or(0);
            stack_profile(WidthFamily::Full, tallest).into_constraint()
        }
        "grid" => {
            let columns = card.u64_field("columns").unwrap_or(3).max(1) as usize;
            let heights: Vec<u32> = card
                .child_cards()
                .iter()
                .map(|c| resolve_constraint(c).height)
                .collect();
            let total = heights
                .chunks(columns)
                .map(|row| row.iter().copied().max().unwrap_or(0))
                .fold(0u32, u32::saturating_add);
            stack_profile(WidthFamily::Full, total).into_constraint()
        }
        _ => leaf_profile(card).into_constraint(),
    }
}

fn stack_profile(family: WidthFamily, rows: u32) -> CardProfile {
    CardProfile::rows(family, rows.clamp(STACK_MIN_ROWS, STACK_MAX_ROWS))
        .min_height(STACK_MIN_ROWS)
        .max_height(STACK_MAX_ROWS)
}

fn leaf_profile(card: &Card) -> CardProfile {
    use WidthFamily::{Compact, Standard};

    let header = if card.has_title() { HEADER_PX } else { 0 };

    match card.card_type.as_str() {
        "button" | "entity" => CardProfile::rows(Compact, 2).max_height(4),
        "tile" => {
            let features = count(card.list_len("features"));
            CardProfile::pixels(Compact, px_sum(&[ROW_HEIGHT_PX, features * TILE_FEATURE_PX]))
                .max_height(6)
        }
        "gauge" => CardProfile::pixels(Compact, 150),
        "sensor" => {
            let px = if card.str_field("graph").is_some() { 170 } else { 100 };
            CardProfile::pixels(Compact, px)
        }
        "light" => CardProfile::pixels(Compact, 250).min_height(4),
        "thermostat" | "humidifier" => CardProfile::pixels(Standard, 350).min_height(5),
        "alarm-panel" => CardProfile::pixels(Standard, 420).min_height(6),
        "media-control" => CardProfile::pixels(Standard, 130),
        "entities" => {
            let items = count(card.list_len("entities"));
            CardProfile::pixels(Standard, px_sum(&[header, items * ENTITY_ROW_PX, CARD_PADDING_PX]))
        }
        "todo-list" | "shopping-list" => {
            CardProfile::pixels(Standard, header + 5 * ENTITY_ROW_PX + CARD_PADDING_PX)
                .min_height(3)
        }
        "glance" => {
            let per_row = card.u64_field("columns").unwrap_or(5).clamp(1, 64) as u32;
            let items = count(card.list_len("entities"));
            let glance_rows = items.div_ceil(per_row).max(1);
            let px = px_sum(&[header, glance_rows * GLANCE_ROW_PX, CARD_PADDING_PX]);
            CardProfile::pixels(Standard, px)
        }
        "markdown" => {
            let lines = count(card.str_field("content").map_or(0, |c| c.lines().count()));
            let px = px_sum(&[header, lines * MARKDOWN_LINE_PX, 2 * CARD_PADDING_PX]);
            CardProfile::pixels(Standard, px)
        }
        "history-graph" | "statistics-graph" | "statistic" => {
            CardProfile::pixels(Standard, header + CHART_BODY_PX + CARD_PADDING_PX).min_height(3)
        }
        "logbook" => CardProfile::pixels(Standard, header + 300).min_height(4),
        "weather-forecast" => {
            let px = if card.bool_field("show_forecast") == Some(false) { 150 } else { 260 };
            CardProfile::pixels(Standard, px)
        }
        "picture" | "picture-entity" | "picture-glance" | "image" | "area" => {
            CardProfile::pixels(Standard, card.pixel_height().unwrap_or(220))
        }
        "map" => {
            let px = px_sum(&[header, card.pixel_height().unwrap_or(400)]);
            CardProfile::pixels(Standard, px).min_height(4)
        }
        "iframe" => {
            CardProfile::pixels(Standard, px_sum(&[header, card.pixel_height().unwrap_or(300)]))
                .min_height(3)
        }
        "calendar" => CardProfile::pixels(Standard, 450).min_height(6),
        "plant-status" => CardProfile::pixels(Standard, 170),
        _ => unknown_profile(card),
    }
}

fn unknown_profile(card: &Card) -> CardProfile {
    if card.card_type.starts_with("custom:") {
        let profile = match card.pixel_height() {
            Some(px) => CardProfile::pixels(WidthFamily::Standard, px),
            None => CardProfile::rows(WidthFamily::Standard, 7),
        };
        profile.min_height(4)
    } else {
        CardProfile::rows(WidthFamily::Standard, 4)
    }
}

fn rows_for_pixels(px: u32) -> u32 {
    px.div_ceil(ROW_HEIGHT_PX)
}

// Item counts are capped so per-item pixel products stay well inside u32.
fn count(n: usize) -> u32 {
    n.min(10_000) as u32
}

fn px_sum(parts: &[u32]) -> u32 {
    parts.iter().fold(0, |acc, p| acc.saturating_add(*p))
}
