// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Caseboard-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Caseboard and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use super::text::{describe_image_url, single_line, truncate_with_ellipsis};
use super::{Canvas, CanvasError, Paint};
use crate::model::{Board, CanvasBounds, DataField, Node, NodeId, Point};
use crate::view::{CellMetrics, Viewport};

const MAX_LABEL_LEN: usize = 24;
/// Cell coordinates are clamped to this magnitude so rectangle arithmetic cannot overflow.
const CELL_LIMIT: i64 = 1 << 40;

/// Inclusive rectangle in cell coordinates. May extend past the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    pub x0: i64,
    pub y0: i64,
    pub x1: i64,
    pub y1: i64,
}

impl CellRect {
    pub fn center(&self) -> (i64, i64) {
        ((self.x0 + self.x1) / 2, (self.y0 + self.y1) / 2)
    }

    pub fn inner(&self) -> Self {
        Self {
            x0: self.x0 + 1,
            y0: self.y0 + 1,
            x1: self.x1 - 1,
            y1: self.y1 - 1,
        }
    }

    pub fn overlaps(&self, width: usize, height: usize) -> bool {
        self.x1 >= 0 && self.y1 >= 0 && self.x0 < width as i64 && self.y0 < height as i64
    }
}

/// Everything needed to draw one frame of the board.
#[derive(Debug, Clone, Copy)]
pub struct BoardScene<'a> {
    pub board: &'a Board,
    pub viewport: &'a Viewport,
    pub cells: CellMetrics,
    pub bounds: CanvasBounds,
    pub selected: Option<&'a NodeId>,
    pub pending: Option<&'a NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardFrame {
    pub canvas: Canvas,
    /// Cell rectangles of nodes that are at least partly visible, in render order.
    pub node_rects: Vec<(NodeId, CellRect)>,
}

impl BoardFrame {
    pub fn node_rect(&self, node_id: &NodeId) -> Option<CellRect> {
        self.node_rects
            .iter()
            .find(|(id, _)| id == node_id)
            .map(|(_, rect)| *rect)
    }
}

impl BoardScene<'_> {
    fn cell_rect(&self, origin: Point, width: f64, height: f64) -> CellRect {
        let top_left = self.viewport.canvas_to_screen(origin);
        let bottom_right =
            self.viewport.canvas_to_screen(Point::new(origin.x + width, origin.y + height));
        let limit = |value: i64| value.clamp(-CELL_LIMIT, CELL_LIMIT);
        let (x0, y0) = self.cells.cell_of(top_left);
        let (x0, y0) = (limit(x0), limit(y0));
        let last = |screen: f64, cell: f64| {
            limit(((screen / cell).ceil() as i64).saturating_sub(1))
        };
        let x1 = last(bottom_right.x, self.cells.cell_width).max(x0 + 2);
        let y1 = last(bottom_right.y, self.cells.cell_height).max(y0 + 2);
        CellRect { x0, y0, x1, y1 }
    }

    fn node_rect(&self, node: &Node) -> CellRect {
        self.cell_rect(node.position(), node.width, node.height)
    }

    fn border_paint(&self, node: &Node) -> Paint {
        if self.selected == Some(&node.id) {
            Paint::Selected
        } else if self.pending == Some(&node.id) {
            Paint::Pending
        } else {
            Paint::NodeBorder(node.kind)
        }
    }
}

/// Draws the board as seen through the viewport onto a `width` x `height` cell grid.
///
/// Layers, bottom to top: canvas boundary, connection lines, connection labels, nodes.
pub fn render_board(
    scene: &BoardScene<'_>,
    width: usize,
    height: usize,
) -> Result<BoardFrame, CanvasError> {
    let mut canvas = Canvas::new(width, height)?;

    let boundary = scene.cell_rect(Point::new(0.0, 0.0), scene.bounds.width, scene.bounds.height);
    canvas.draw_outline(boundary, '╌', '╎', '+', Paint::Boundary);

    let rects = scene
        .board
        .nodes()
        .iter()
        .map(|node| (&node.id, scene.node_rect(node)))
        .collect::<BTreeMap<_, _>>();

    for conn in scene.board.connections() {
        let (Some(from), Some(to)) = (rects.get(&conn.from), rects.get(&conn.to)) else {
            continue;
        };
        canvas.draw_line(from.center(), to.center(), Paint::Connection);
    }

    for conn in scene.board.connections() {
        let (Some(label), Some(from), Some(to)) =
            (conn.label(), rects.get(&conn.from), rects.get(&conn.to))
        else {
            continue;
        };
        let (ax, ay) = from.center();
        let (bx, by) = to.center();
        let text = format!(" {} ", truncate_with_ellipsis(&single_line(label), MAX_LABEL_LEN));
        let half = i64::try_from(text.chars().count() / 2).unwrap_or(0);
        canvas.write_str((ax + bx) / 2 - half, (ay + by) / 2, &text, Paint::ConnectionLabel);
    }

    let mut node_rects = Vec::new();
    for node in scene.board.nodes() {
        let Some(rect) = rects.get(&node.id).copied() else {
            continue;
        };
        if !rect.overlaps(width, height) {
            continue;
        }
        draw_node(&mut canvas, node, rect, scene.border_paint(node));
        node_rects.push((node.id.clone(), rect));
    }

    Ok(BoardFrame { canvas, node_rects })
}

fn draw_node(canvas: &mut Canvas, node: &Node, rect: CellRect, border: Paint) {
    canvas.clear_rect(rect.inner(), Paint::NodeText);
    canvas.draw_box(rect, border);

    let inner_width = usize::try_from(rect.x1 - rect.x0 - 1).unwrap_or(0);
    let badge = format!(" {} ", node.kind);
    if badge.chars().count() + 2 <= inner_width {
        canvas.write_str(rect.x0 + 2, rect.y0, &badge, border);
    }

    let mut row = rect.y0 + 1;
    let title = truncate_with_ellipsis(&single_line(&node.data.title), inner_width);
    canvas.write_str(rect.x0 + 1, row, &title, Paint::NodeText);
    row += 1;

    for &field in node.kind.fields() {
        if row >= rect.y1 {
            break;
        }
        let Some(value) = node.data.get(field).filter(|value| !value.trim().is_empty()) else {
            continue;
        };
        let line = match field {
            DataField::ImageUrl => describe_image_url(value),
            _ => single_line(value),
        };
        canvas.write_str(
            rect.x0 + 1,
            row,
            &truncate_with_ellipsis(&line, inner_width),
            Paint::NodeText,
        );
        row += 1;
    }
}
