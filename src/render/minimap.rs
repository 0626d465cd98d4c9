// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Caseboard-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Caseboard and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::{Canvas, CanvasError, CellRect, Paint};
use crate::model::{Board, CanvasBounds, NodeId, Size};
use crate::view::{CellMetrics, Viewport};

/// Grid size of a minimap that is `minimap` screen units large.
pub fn minimap_cells(minimap: Size, cells: CellMetrics) -> (usize, usize) {
    let cols = (minimap.width / cells.cell_width).round().max(4.0) as usize;
    let rows = (minimap.height / cells.cell_height).round().max(3.0) as usize;
    (cols, rows)
}

/// Draws the whole canvas scaled into `width` x `height` cells, with every node as a filled block
/// and the region currently on screen as an outline.
///
/// `visible` is the size of the board area in screen units.
pub fn render_minimap(
    board: &Board,
    bounds: CanvasBounds,
    viewport: &Viewport,
    visible: Size,
    selected: Option<&NodeId>,
    width: usize,
    height: usize,
) -> Result<Canvas, CanvasError> {
    let mut canvas = Canvas::new(width, height)?;
    let scale_x = width as f64 / bounds.width;
    let scale_y = height as f64 / bounds.height;
    let scaled = |x: f64, y: f64, w: f64, h: f64| {
        let x0 = (x * scale_x).floor() as i64;
        let y0 = (y * scale_y).floor() as i64;
        CellRect {
            x0,
            y0,
            x1: (((x + w) * scale_x).ceil() as i64).saturating_sub(1).max(x0),
            y1: (((y + h) * scale_y).ceil() as i64).saturating_sub(1).max(y0),
        }
    };

    for node in board.nodes() {
        let rect = scaled(node.x, node.y, node.width, node.height);
        let paint = if selected == Some(&node.id) {
            Paint::Selected
        } else {
            Paint::MinimapNode
        };
        canvas.fill_rect(rect, '█', paint);
    }

    let (origin, size) = viewport.visible_region(visible);
    let rect = scaled(origin.x, origin.y, size.width, size.height);
    if rect.x0 == rect.x1 || rect.y0 == rect.y1 {
        canvas.plot(rect.x0, rect.y0, '□', Paint::MinimapViewport);
    } else {
        canvas.draw_box(rect, Paint::MinimapViewport);
    }

    Ok(canvas)
}
