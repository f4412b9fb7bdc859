// Layout mode selection - derives placements for a view and re-encodes edits
use crate::application::grid_format::{
    detect_layout_mode, fit_to_columns, from_grid_placement, parse_grid_template,
    to_grid_placement,
};
use crate::application::masonry::place_masonry;
use crate::application::size_constraints::resolve_constraint;
use crate::domain::card::{Card, EmbeddedLayout};
use crate::domain::dashboard::View;
use crate::domain::layout::{GridPlacement, GridTemplate, LayoutMode};
use serde::Serialize;
use std::collections::HashMap;

/// Placements for one view together with the source they came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedLayout {
    pub mode: LayoutMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<GridTemplate>,
    pub placements: Vec<GridPlacement>,
}

pub fn resolve_view_layout(view: &View) -> ResolvedLayout {
    let mode = detect_layout_mode(view);
    tracing::debug!(
        "resolving layout for view {:?}: {:?} ({} cards)",
        view.title,
        mode,
        view.cards.len()
    );

    match mode {
        LayoutMode::GridTemplate => {
            let template = parse_grid_template(view);
            let placements = view
                .cards
                .iter()
                .enumerate()
                .map(|(index, card)| {
                    let constraint = resolve_constraint(card);
                    to_grid_placement(card, index, &template).with_bounds(&constraint)
                })
                .collect();
            ResolvedLayout {
                mode,
                template: Some(template),
                placements,
            }
        }
        LayoutMode::LegacyEmbedded => ResolvedLayout {
            mode,
            template: None,
            placements: legacy_placements(&view.cards),
        },
        LayoutMode::AutoMasonry => ResolvedLayout {
            mode,
            template: None,
            placements: place_masonry(&view.cards),
        },
    }
}

/// Embedded coordinates, with gaps filled from the card's constraint (size)
/// and its masonry slot (position).
fn legacy_placements(cards: &[Card]) -> Vec<GridPlacement> {
    let auto = place_masonry(cards);

    cards
        .iter()
        .zip(auto)
        .map(|(card, auto)| {
            let Some(layout) = &card.layout else {
                return auto;
            };
            let constraint = resolve_constraint(card);
            GridPlacement {
                x: layout.x.unwrap_or(auto.x),
                y: layout.y.unwrap_or(auto.y),
                w: constraint.width,
                h: constraint.height,
                ..auto
            }
            .with_bounds(&constraint)
        })
        .collect()
}

/// Write placements reported by the drag surface back into `view`, in the
/// given mode. The view's mode never changes as a side effect.
///
/// Placements whose id doesn't name a card are ignored; cards without a
/// reported placement, or reported where they already are, are left as they
/// are. In grid-template mode a moved card is kept inside the column count.
pub fn encode_placements(view: &View, mode: LayoutMode, placements: &[GridPlacement]) -> View {
    let mut updated = view.clone();
    let by_card = index_placements(view, placements);

    match mode {
        LayoutMode::GridTemplate => {
            let template = parse_grid_template(view);
            for (index, placement) in &by_card {
                let card = &view.cards[*index];
                let stored = to_grid_placement(card, *index, &template);
                if same_cell(&stored, placement) {
                    continue;
                }
                let fitted = fit_to_columns(placement, template.columns);
                updated.cards[*index].grid_position = Some(from_grid_placement(&fitted));
            }
        }
        LayoutMode::LegacyEmbedded => {
            for (index, placement) in &by_card {
                let layout = updated.cards[*index]
                    .layout
                    .get_or_insert_with(EmbeddedLayout::default);
                layout.x = Some(placement.x);
                layout.y = Some(placement.y);
                layout.w = Some(placement.w);
                layout.h = Some(placement.h);
            }
        }
        LayoutMode::AutoMasonry => {
            // Only card order is persisted in auto mode.
            let mut order: Vec<(usize, Option<(u32, u32)>)> = (0..view.cards.len())
                .map(|i| (i, by_card.get(&i).map(|p| (p.y, p.x))))
                .collect();
            order.sort_by_key(|&(index, pos)| {
                let (y, x) = pos.unwrap_or((u32::MAX, u32::MAX));
                (y, x, index)
            });
            updated.cards = order
                .into_iter()
                .map(|(index, _)| view.cards[index].clone())
                .collect();
        }
    }

    updated
}

fn same_cell(a: &GridPlacement, b: &GridPlacement) -> bool {
    (a.x, a.y, a.w, a.h) == (b.x, b.y, b.w, b.h)
}

fn index_placements<'a>(
    view: &View,
    placements: &'a [GridPlacement],
) -> HashMap<usize, &'a GridPlacement> {
    let mut by_card = HashMap::new();
    for placement in placements {
        match placement.card_index().filter(|i| *i < view.cards.len()) {
            Some(index) => {
                by_card.insert(index, placement);
            }
            None => {
                tracing::warn!("Ignoring placement for unknown card id: {}", placement.id);
            }
        }
    }
    by_card
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::card::GridPosition;
    use crate::domain::dashboard::ViewLayout;
    use serde_json::json;

    fn legacy_card(x: u32, y: u32, w: u32, h: u32) -> Card {
        Card::new("button").with_layout(EmbeddedLayout {
            x: Some(x),
            y: Some(y),
            w: Some(w),
            h: Some(h),
            ..EmbeddedLayout::default()
        })
    }

    fn grid_view() -> View {
        View {
            layout: Some(ViewLayout {
                grid_template_columns: Some("repeat(12, 1fr)".to_string()),
                ..ViewLayout::default()
            }),
            cards: vec![
                Card::new("entities").with_grid_position(GridPosition::new(
                    "1 / 7".to_string(),
                    "1 / 3".to_string(),
                )),
                Card::new("markdown"),
            ],
            ..View::default()
        }
    }

    #[test]
    fn test_grid_template_view() {
        let layout = resolve_view_layout(&grid_view());

        assert_eq!(layout.mode, LayoutMode::GridTemplate);
        assert_eq!(layout.template.as_ref().map(|t| t.columns), Some(12));
        let p = &layout.placements[0];
        assert_eq!((p.x, p.y, p.w, p.h), (0, 0, 6, 2));
        assert!(p.min_w.is_some());
        // unpositioned card uses the two-per-row fallback
        let p = &layout.placements[1];
        assert_eq!((p.x, p.y, p.w, p.h), (6, 0, 6, 4));
    }

    #[test]
    fn test_legacy_view_fills_gaps() {
        let partial = Card::new("entities")
            .with_field("entities", json!(["a", "b", "c", "d"]))
            .with_layout(EmbeddedLayout {
                x: Some(6),
                ..EmbeddedLayout::default()
            });
        let cards = vec![legacy_card(0, 0, 4, 3), partial, Card::new("button")];
        let view = View::new("legacy", cards);
        let layout = resolve_view_layout(&view);

        assert_eq!(layout.mode, LayoutMode::LegacyEmbedded);
        let p = &layout.placements[0];
        assert_eq!((p.x, p.y, p.w, p.h), (0, 0, 4, 3));
        let p = &layout.placements[1];
        assert_eq!((p.x, p.w, p.h), (6, 6, 4));
        assert_eq!(p.y, place_masonry(&view.cards)[1].y);
        assert_eq!(layout.placements[2], place_masonry(&view.cards)[2]);
    }

    #[test]
    fn test_auto_view_uses_masonry() {
        let view = View::new("auto", vec![Card::new("button"), Card::new("markdown")]);
        let layout = resolve_view_layout(&view);
        assert_eq!(layout.mode, LayoutMode::AutoMasonry);
        assert_eq!(layout.placements, place_masonry(&view.cards));
    }

    #[test]
    fn test_encode_grid_template_round_trips() {
        let view = grid_view();
        let mut placements = resolve_view_layout(&view).placements;
        placements[1].x = 0;
        placements[1].y = 2;
        placements[1].w = 12;
        placements[1].h = 3;

        let updated = encode_placements(&view, LayoutMode::GridTemplate, &placements);
        assert_eq!(
            updated.cards[0].grid_position,
            Some(GridPosition::new("1 / 7".to_string(), "1 / 3".to_string()))
        );
        assert_eq!(
            updated.cards[1].grid_position,
            Some(GridPosition::new("1 / 13".to_string(), "3 / 6".to_string()))
        );
        assert!(updated.cards.iter().all(|c| c.layout.is_none()));
        assert_eq!(detect_layout_mode(&updated), LayoutMode::GridTemplate);
    }

    #[test]
    fn test_encode_grid_template_leaves_untouched_cards_alone() {
        let mut view = grid_view();
        view.cards.push(Card::new("gauge").with_grid_position(GridPosition::new(
            "10 / 14".to_string(),
            "3 / span 2".to_string(),
        )));
        let mut placements = resolve_view_layout(&view).placements;
        placements[0].y = 5;

        let updated = encode_placements(&view, LayoutMode::GridTemplate, &placements);
        assert_eq!(updated.cards[2], view.cards[2]);
        assert_eq!(updated.cards[1], view.cards[1]);
        assert_eq!(
            updated.cards[0].grid_position,
            Some(GridPosition::new("1 / 7".to_string(), "6 / 8".to_string()))
        );
    }

    #[test]
    fn test_encode_grid_template_fits_moved_card() {
        let view = grid_view();
        let mut placements = resolve_view_layout(&view).placements;
        placements[0].x = 9;

        let updated = encode_placements(&view, LayoutMode::GridTemplate, &placements);
        assert_eq!(
            updated.cards[0].grid_position,
            Some(GridPosition::new("10 / 13".to_string(), "1 / 3".to_string()))
        );
    }

    #[test]
    fn test_encode_legacy_keeps_bounds() {
        let mut card = legacy_card(0, 0, 4, 3);
        card.layout.as_mut().unwrap().min_w = Some(2);
        let view = View::new("legacy", vec![card, Card::new("button")]);

        let mut placements = resolve_view_layout(&view).placements;
        placements[0].x = 4;
        placements[0].w = 8;

        let updated = encode_placements(&view, LayoutMode::LegacyEmbedded, &placements);
        let layout = updated.cards[0].layout.as_ref().unwrap();
        assert_eq!((layout.x, layout.w, layout.min_w), (Some(4), Some(8), Some(2)));
        assert!(updated.cards[1].layout.is_some());
        assert!(updated.cards.iter().all(|c| c.grid_position.is_none()));
    }

    #[test]
    fn test_encode_auto_reorders_without_switching_mode() {
        let view = View::new(
            "auto",
            vec![Card::new("button"), Card::new("markdown"), Card::new("gauge")],
        );
        let placements = vec![
            GridPlacement::new(0, 0, 10, 3, 2),
            GridPlacement::new(1, 6, 0, 6, 2),
            GridPlacement::new(2, 0, 0, 3, 3),
        ];

        let updated = encode_placements(&view, LayoutMode::AutoMasonry, &placements);
        let order: Vec<&str> = updated.cards.iter().map(|c| c.card_type.as_str()).collect();
        assert_eq!(order, ["gauge", "markdown", "button"]);
        assert_eq!(detect_layout_mode(&updated), LayoutMode::AutoMasonry);
    }

    #[test]
    fn test_encode_ignores_unknown_ids() {
        let view = grid_view();
        let mut stray = GridPlacement::new(9, 0, 0, 1, 1);
        stray.id = "card-9".to_string();
        let mut bogus = GridPlacement::new(0, 0, 0, 1, 1);
        bogus.id = "header".to_string();

        let updated = encode_placements(&view, LayoutMode::GridTemplate, &[stray, bogus]);
        assert_eq!(updated, view);
    }
}
