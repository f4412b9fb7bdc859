// Grid format conversion - CSS-Grid-style position strings <-> zero-indexed cells
use crate::domain::card::{Card, GridPosition};
use crate::domain::dashboard::View;
use crate::domain::layout::{GridPlacement, GridTemplate, LayoutMode};

const FALLBACK_WIDTH: u32 = 6;
const FALLBACK_HEIGHT: u32 = 4;

/// One axis of a parsed position string. Lines are 1-indexed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PositionSpec {
    pub start: Option<u32>,
    pub end: Option<u32>,
    pub span: Option<u32>,
}

impl PositionSpec {
    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none() && self.span.is_none()
    }

    /// Extent in tracks, from `span` or `end - start`.
    pub fn extent(&self) -> Option<u32> {
        if let Some(span) = self.span {
            return Some(span);
        }
        match (self.start, self.end) {
            (Some(start), Some(end)) if end > start => Some(end - start),
            _ => None,
        }
    }
}

/// Parse `"a / b"`, `"a / span N"`, `"span N"` or `"N"`.
///
/// Anything else, including zero or negative lines, gives an empty record.
pub fn parse_position(input: &str) -> PositionSpec {
    parse_position_parts(input).unwrap_or_default()
}

fn parse_position_parts(input: &str) -> Option<PositionSpec> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let mut parsed = PositionSpec::default();
    match input.split_once('/') {
        Some((left, right)) => {
            match parse_side(left)? {
                Side::Line(n) => parsed.start = Some(n),
                Side::Span(n) => parsed.span = Some(n),
                Side::Auto => {}
            }
            match parse_side(right)? {
                Side::Line(n) => parsed.end = Some(n),
                Side::Span(n) => parsed.span = Some(n),
                Side::Auto => {}
            }
        }
        None => match parse_side(input)? {
            Side::Line(n) => parsed.start = Some(n),
            Side::Span(n) => parsed.span = Some(n),
            Side::Auto => {}
        },
    }
    Some(parsed)
}

enum Side {
    Line(u32),
    Span(u32),
    Auto,
}

fn parse_side(raw: &str) -> Option<Side> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("auto") {
        return Some(Side::Auto);
    }
    if let Some(rest) = raw.strip_prefix("span") {
        return positive(rest.trim()).map(Side::Span);
    }
    positive(raw).map(Side::Line)
}

fn positive(raw: &str) -> Option<u32> {
    raw.parse::<u32>().ok().filter(|n| *n > 0)
}

/// Zero-indexed placement for a card in a grid-template view.
///
/// Cards without a position fall back to two per row, 6x4 each.
pub fn to_grid_placement(card: &Card, index: usize, template: &GridTemplate) -> GridPlacement {
    let fallback_x = (index % 2) as u32 * FALLBACK_WIDTH;
    let fallback_y = u32::try_from(index / 2)
        .unwrap_or(u32::MAX)
        .saturating_mul(FALLBACK_HEIGHT);

    let position = match &card.grid_position {
        Some(position) if !position.is_empty() => position,
        _ => {
            let (w, h) = (FALLBACK_WIDTH, FALLBACK_HEIGHT);
            return GridPlacement::new(index, fallback_x, fallback_y, w, h);
        }
    };

    let column = position.column.as_deref().map(parse_position).unwrap_or_default();
    let row = position.row.as_deref().map(parse_position).unwrap_or_default();

    let x = column.start.map_or(fallback_x, |s| s - 1);
    let y = row.start.map_or(fallback_y, |s| s - 1);
    // A span given without a start still can't be wider than the grid.
    let w = match column.start {
        Some(_) => column.extent().unwrap_or(FALLBACK_WIDTH),
        None => column
            .extent()
            .unwrap_or(FALLBACK_WIDTH)
            .min(template.columns.max(1)),
    };
    let h = row.extent().unwrap_or(FALLBACK_HEIGHT).max(1);

    GridPlacement::new(index, x, y, w.max(1), h)
}

/// Inverse of `to_grid_placement`: 1-indexed `"start / end"` strings.
///
/// Coordinates are written as given, so a card stored past the grid edge
/// keeps its exact strings. Use `fit_to_columns` first for placements that
/// must land inside the grid.
pub fn from_grid_placement(placement: &GridPlacement) -> GridPosition {
    let column_start = placement.x.saturating_add(1);
    let column_end = column_start.saturating_add(placement.w.max(1));
    let row_start = placement.y.saturating_add(1);
    let row_end = row_start.saturating_add(placement.h.max(1));

    GridPosition::new(
        format!("{} / {}", column_start, column_end),
        format!("{} / {}", row_start, row_end),
    )
}

/// Pull a placement inside `total_columns`: the start column is kept on the
/// grid and the width trimmed so the card ends at the last line at most.
pub fn fit_to_columns(placement: &GridPlacement, total_columns: u32) -> GridPlacement {
    let total_columns = total_columns.max(1);
    let x = placement.x.min(total_columns - 1);
    let w = placement.w.clamp(1, total_columns - x);
    GridPlacement {
        x,
        w,
        ..placement.clone()
    }
}

/// Classify where a view's placement comes from.
pub fn detect_layout_mode(view: &View) -> LayoutMode {
    let grid_view_type = view
        .view_type
        .as_deref()
        .is_some_and(|t| t.ends_with("grid-layout"));
    let grid_layout_type = view
        .layout
        .as_ref()
        .and_then(|l| l.layout_type.as_deref())
        .is_some_and(|t| t == "grid");
    let has_template = view.column_template().is_some() || view.row_template().is_some();

    let positioned_card = view.cards.iter().any(Card::has_grid_position);

    if grid_view_type || grid_layout_type || has_template || positioned_card {
        LayoutMode::GridTemplate
    } else if view.cards.iter().any(Card::has_embedded_layout) {
        LayoutMode::LegacyEmbedded
    } else {
        LayoutMode::AutoMasonry
    }
}

/// Column count and row height token from the view's templates.
pub fn parse_grid_template(view: &View) -> GridTemplate {
    let mut template = GridTemplate::default();

    if let Some(columns) = view.column_template() {
        let count = match repeat_args(columns) {
            Some((count, _)) => count.trim().parse::<u32>().ok(),
            None => u32::try_from(top_level_tokens(columns).len()).ok(),
        };
        if let Some(count) = count.filter(|c| *c > 0) {
            template.columns = count;
        }
    }

    if let Some(rows) = view.row_template() {
        let height = match repeat_args(rows) {
            Some((_, track)) => Some(track.trim().to_string()),
            None => top_level_tokens(rows).first().map(|t| t.to_string()),
        };
        if let Some(height) = height.filter(|h| !h.is_empty()) {
            template.row_height = height;
        }
    }

    template
}

/// Split `repeat(N, track)` into `("N", "track")`.
fn repeat_args(template: &str) -> Option<(&str, &str)> {
    let start = template.find("repeat(")? + "repeat(".len();
    let body = &template[start..];

    let mut depth = 0usize;
    let mut end = None;
    for (i, ch) in body.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' if depth == 0 => {
                end = Some(i);
                break;
            }
            ')' => depth -= 1,
            _ => {}
        }
    }

    body[..end?].split_once(',')
}

/// Whitespace-separated tokens, keeping `minmax(0, 1fr)` and friends whole.
fn top_level_tokens(template: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut token_start: Option<usize> = None;

    for (i, ch) in template.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if c.is_whitespace() && depth == 0 => {
                if let Some(start) = token_start.take() {
                    tokens.push(&template[start..i]);
                }
                continue;
            }
            _ => {}
        }
        if token_start.is_none() {
            token_start = Some(i);
        }
    }
    if let Some(start) = token_start {
        tokens.push(&template[start..]);
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::card::EmbeddedLayout;
    use crate::domain::dashboard::ViewLayout;

    fn positioned(column: &str, row: &str) -> Card {
        let position = GridPosition::new(column.to_string(), row.to_string());
        Card::new("button").with_grid_position(position)
    }

    fn view_with_templates(columns: Option<&str>, rows: Option<&str>) -> View {
        View {
            layout: Some(ViewLayout {
                grid_template_columns: columns.map(str::to_string),
                grid_template_rows: rows.map(str::to_string),
                ..ViewLayout::default()
            }),
            ..View::default()
        }
    }

    #[test]
    fn test_parse_position_forms() {
        assert_eq!(
            parse_position("1 / 7"),
            PositionSpec { start: Some(1), end: Some(7), span: None }
        );
        assert_eq!(
            parse_position("3 / span 2"),
            PositionSpec { start: Some(3), end: None, span: Some(2) }
        );
        assert_eq!(
            parse_position("span 4"),
            PositionSpec { start: None, end: None, span: Some(4) }
        );
        assert_eq!(
            parse_position(" 5 "),
            PositionSpec { start: Some(5), end: None, span: None }
        );
        assert_eq!(
            parse_position("auto / span 3"),
            PositionSpec { start: None, end: None, span: Some(3) }
        );
    }

    #[test]
    fn test_parse_position_degrades_to_empty() {
        let malformed = [
            "", "   ", "abc", "0 / 3", "-1 / 2", "1 / x", "span", "span -2", "1 / 2 / 3",
        ];
        for input in malformed {
            assert!(parse_position(input).is_empty(), "{input:?}");
        }
    }

    #[test]
    fn test_span_forms_are_equivalent() {
        assert_eq!(parse_position("span 6").extent(), Some(6));
        assert_eq!(parse_position("1 / span 6").extent(), Some(6));
        assert_eq!(parse_position("1 / 7").extent(), Some(6));
    }

    #[test]
    fn test_round_trip_position_strings() {
        let template = GridTemplate::default();
        let card = positioned("1 / 7", "1 / 3");
        let placement = to_grid_placement(&card, 0, &template);

        assert_eq!((placement.x, placement.w, placement.y, placement.h), (0, 6, 0, 2));

        let back = from_grid_placement(&placement);
        assert_eq!(back.column.as_deref(), Some("1 / 7"));
        assert_eq!(back.row.as_deref(), Some("1 / 3"));
    }

    #[test]
    fn test_round_trip_across_the_grid() {
        let template = GridTemplate::default();
        for start in 1..=12u32 {
            for end in (start + 1)..=13 {
                let column = format!("{} / {}", start, end);
                let row = format!("{} / {}", end, end + start);
                let placement = to_grid_placement(&positioned(&column, &row), 3, &template);
                let back = from_grid_placement(&placement);
                assert_eq!(back.column.as_deref(), Some(column.as_str()));
                assert_eq!(back.row.as_deref(), Some(row.as_str()));
            }
        }
    }

    #[test]
    fn test_fallback_two_per_row() {
        let template = GridTemplate::default();
        let card = Card::new("markdown");

        let p = to_grid_placement(&card, 0, &template);
        assert_eq!((p.x, p.y, p.w, p.h), (0, 0, 6, 4));
        let p = to_grid_placement(&card, 3, &template);
        assert_eq!((p.x, p.y, p.w, p.h), (6, 4, 6, 4));
        assert_eq!(p.id, "card-3");
    }

    #[test]
    fn test_partial_position_uses_defaults() {
        let template = GridTemplate::default();
        let card = Card::new("button").with_grid_position(GridPosition {
            column: Some("span 3".to_string()),
            row: None,
        });
        let p = to_grid_placement(&card, 1, &template);
        assert_eq!((p.x, p.y, p.w, p.h), (6, 0, 3, 4));

        let garbage = positioned("wide", "tall");
        let p = to_grid_placement(&garbage, 0, &template);
        assert_eq!((p.x, p.y, p.w, p.h), (0, 0, 6, 4));
    }

    #[test]
    fn test_round_trip_past_the_grid_edge() {
        let template = GridTemplate::default();
        for (column, w) in [("10 / 14", 4), ("15 / 17", 2), ("1 / 20", 19)] {
            let placement = to_grid_placement(&positioned(column, "2 / 4"), 0, &template);
            assert_eq!(placement.w, w, "{column}");
            let back = from_grid_placement(&placement);
            assert_eq!(back.column.as_deref(), Some(column));
            assert_eq!(back.row.as_deref(), Some("2 / 4"));
        }
    }

    #[test]
    fn test_bare_span_limited_to_template_columns() {
        let template = GridTemplate { columns: 4, row_height: "30px".to_string() };
        let p = to_grid_placement(&positioned("span 8", "1 / 2"), 0, &template);
        assert_eq!(p.w, 4);
    }

    #[test]
    fn test_from_grid_placement_saturates() {
        let placement = GridPlacement::new(0, u32::MAX, u32::MAX, u32::MAX, u32::MAX);
        let position = from_grid_placement(&placement);
        let max = u32::MAX.to_string();
        assert_eq!(position.column, Some(format!("{max} / {max}")));
        assert_eq!(position.row, Some(format!("{max} / {max}")));

        let fitted = fit_to_columns(&GridPlacement::new(0, 0, 0, u32::MAX, 1), u32::MAX);
        let position = from_grid_placement(&fitted);
        assert_eq!(position.column, Some(format!("1 / {max}")));
    }

    #[test]
    fn test_fit_to_columns_keeps_card_inside_grid() {
        let fitted = fit_to_columns(&GridPlacement::new(0, 10, 2, 6, 3), 12);
        assert_eq!((fitted.x, fitted.y, fitted.w, fitted.h), (10, 2, 2, 3));
        let position = from_grid_placement(&fitted);
        assert_eq!(position.column.as_deref(), Some("11 / 13"));
        assert_eq!(position.row.as_deref(), Some("3 / 6"));

        let fitted = fit_to_columns(&GridPlacement::new(0, 20, 0, 4, 1), 12);
        assert_eq!((fitted.x, fitted.w), (11, 1));
    }

    #[test]
    fn test_detect_layout_mode_priority() {
        let mut view = View::new("v", vec![Card::new("button")]);
        assert_eq!(detect_layout_mode(&view), LayoutMode::AutoMasonry);

        view.cards.push(Card::new("button").with_layout(EmbeddedLayout {
            x: Some(0),
            y: Some(0),
            w: Some(3),
            h: Some(2),
            ..EmbeddedLayout::default()
        }));
        assert_eq!(detect_layout_mode(&view), LayoutMode::LegacyEmbedded);

        view.cards.push(positioned("1 / 4", "1 / 2"));
        assert_eq!(detect_layout_mode(&view), LayoutMode::GridTemplate);
    }

    #[test]
    fn test_detect_layout_mode_from_view_metadata() {
        let mut tagged = View::new("v", vec![]);
        tagged.view_type = Some("custom:grid-layout".to_string());
        assert_eq!(detect_layout_mode(&tagged), LayoutMode::GridTemplate);

        let typed = View {
            layout: Some(ViewLayout {
                layout_type: Some("grid".to_string()),
                ..ViewLayout::default()
            }),
            ..View::default()
        };
        assert_eq!(detect_layout_mode(&typed), LayoutMode::GridTemplate);

        let rows_only = view_with_templates(None, Some("56px"));
        assert_eq!(detect_layout_mode(&rows_only), LayoutMode::GridTemplate);
    }

    #[test]
    fn test_parse_grid_template() {
        let view = view_with_templates(Some("repeat(8, 1fr)"), Some("repeat(auto-fill, 56px)"));
        assert_eq!(
            parse_grid_template(&view),
            GridTemplate { columns: 8, row_height: "56px".to_string() }
        );

        let view = view_with_templates(Some("1fr minmax(0, 2fr) 1fr"), Some("40px 1fr"));
        assert_eq!(
            parse_grid_template(&view),
            GridTemplate { columns: 3, row_height: "40px".to_string() }
        );

        assert_eq!(parse_grid_template(&View::default()), GridTemplate::default());
        assert_eq!(
            parse_grid_template(&view_with_templates(Some("repeat(auto-fit, 100px)"), None)),
            GridTemplate::default()
        );
    }
}
