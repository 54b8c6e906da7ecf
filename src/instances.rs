use super::constants::{CONTENT_TINTS, CULL_MARGIN_CELLS};
use grid_core::{Card, CellCoord, Clock, SpatialCardGrid};

/// Per-card instance data, laid out for the card vertex buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CardInstance {
    pub center: [f32; 4],
    pub color: [f32; 4],
    /// width, height, scale_y, opacity
    pub params: [f32; 4],
}

impl CardInstance {
    pub fn from_card(card: &Card) -> Self {
        let tint = content_tint(card.content_index);
        Self {
            center: [card.position.x, card.render_y, card.position.z, 0.0],
            color: [tint[0], tint[1], tint[2], 1.0],
            params: [card.size.x, card.size.y, card.scale_y, card.opacity],
        }
    }
}

#[inline]
pub fn content_tint(content_index: usize) -> [f32; 3] {
    CONTENT_TINTS[content_index % CONTENT_TINTS.len()]
}

#[inline]
fn within(cell: CellCoord, min: CellCoord, max: CellCoord) -> bool {
    (min.x..=max.x).contains(&cell.x) && (min.y..=max.y).contains(&cell.y)
}

/// Rebuild `out` with every drawable card near the current view.
/// Returns the number of instances written.
pub fn collect_instances<C: Clock>(grid: &SpatialCardGrid<C>, out: &mut Vec<CardInstance>) -> usize {
    out.clear();
    let (min, max) = grid.visible_cell_bounds();
    let min = CellCoord::new(min.x - CULL_MARGIN_CELLS, min.y - CULL_MARGIN_CELLS);
    let max = CellCoord::new(max.x + CULL_MARGIN_CELLS, max.y + CULL_MARGIN_CELLS);
    out.extend(
        grid.cards()
            .iter()
            .filter(|c| c.enabled && c.opacity > 0.0 && within(c.cell, min, max))
            .map(CardInstance::from_card),
    );
    out.len()
}
