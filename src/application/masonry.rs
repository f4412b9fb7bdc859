// Masonry placement - two-column balanced layout for cards without positions
use crate::application::size_constraints::resolve_constraint;
use crate::domain::card::Card;
use crate::domain::layout::GridPlacement;

const COLUMN_WIDTH: u32 = 6;

/// Place cards in two balanced columns, in order.
///
/// Full-width cards start below both columns and level them; every other card
/// goes to the shorter column (column 0 on ties). The output depends only on
/// the ordered card list.
pub fn place_masonry(cards: &[Card]) -> Vec<GridPlacement> {
    let mut heights = [0u32; 2];

    cards
        .iter()
        .enumerate()
        .map(|(index, card)| {
            let constraint = resolve_constraint(card);

            let placement = if constraint.is_full_width() {
                let y = heights[0].max(heights[1]);
                let bottom = y.saturating_add(constraint.height);
                heights = [bottom, bottom];
                GridPlacement::new(index, 0, y, constraint.width, constraint.height)
            } else {
                let column = if heights[1] < heights[0] { 1 } else { 0 };
                let y = heights[column];
                heights[column] = y.saturating_add(constraint.height);
                GridPlacement::new(
                    index,
                    column as u32 * COLUMN_WIDTH,
                    y,
                    constraint.width,
                    constraint.height,
                )
            };

            tracing::trace!(
                "masonry placed {} ({}) at x={} y={} h={}",
                placement.id,
                card.card_type,
                placement.x,
                placement.y,
                placement.h
            );

            placement.with_bounds(&constraint)
        })
        .collect()
}
