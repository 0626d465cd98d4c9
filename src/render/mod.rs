// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Caseboard-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Caseboard and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Rendering of boards onto character grids.
//!
//! Renderers produce a [`Canvas`] whose cells carry both a character and a [`Paint`] tag. The TUI
//! maps paint tags to styles; tests compare the plain text.

use std::fmt;

use crate::model::NodeKind;

pub mod board;
pub mod minimap;
mod text;

pub use board::{render_board, BoardFrame, BoardScene, CellRect};
pub use minimap::{minimap_cells, render_minimap};

pub const BOX_HORIZONTAL: char = '─';
pub const BOX_VERTICAL: char = '│';
pub const BOX_TOP_LEFT: char = '┌';
pub const BOX_TOP_RIGHT: char = '┐';
pub const BOX_BOTTOM_LEFT: char = '└';
pub const BOX_BOTTOM_RIGHT: char = '┘';
pub const BOX_TEE_RIGHT: char = '├';
pub const BOX_TEE_LEFT: char = '┤';
pub const BOX_TEE_DOWN: char = '┬';
pub const BOX_TEE_UP: char = '┴';
pub const BOX_CROSS: char = '┼';

/// What a cell depicts. Later writers win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Paint {
    #[default]
    Blank,
    /// The dashed outline of the placeable canvas area.
    Boundary,
    Connection,
    ConnectionLabel,
    NodeBorder(NodeKind),
    NodeText,
    /// Border of the selected node.
    Selected,
    /// Border of the node a pending connection starts from.
    Pending,
    MinimapNode,
    MinimapViewport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BoxEdges(u8);

impl BoxEdges {
    const NONE: Self = Self(0);
    const LEFT: Self = Self(1 << 0);
    const RIGHT: Self = Self(1 << 1);
    const UP: Self = Self(1 << 2);
    const DOWN: Self = Self(1 << 3);

    fn is_empty(self) -> bool {
        self.0 == 0
    }

    fn contains(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    fn from_char(ch: char) -> Option<Self> {
        let (l, r, u, d) = (Self::LEFT, Self::RIGHT, Self::UP, Self::DOWN);
        let edges = match ch {
            BOX_HORIZONTAL => l.union(r),
            BOX_VERTICAL => u.union(d),
            BOX_TOP_LEFT => r.union(d),
            BOX_TOP_RIGHT => l.union(d),
            BOX_BOTTOM_LEFT => r.union(u),
            BOX_BOTTOM_RIGHT => l.union(u),
            BOX_TEE_RIGHT => u.union(d).union(r),
            BOX_TEE_LEFT => u.union(d).union(l),
            BOX_TEE_DOWN => l.union(r).union(d),
            BOX_TEE_UP => l.union(r).union(u),
            BOX_CROSS => l.union(r).union(u).union(d),
            _ => return None,
        };
        Some(edges)
    }

    fn to_char(self) -> char {
        match self.0 {
            0 => ' ',
            1..=3 => BOX_HORIZONTAL,
            4 | 8 | 12 => BOX_VERTICAL,
            10 => BOX_TOP_LEFT,
            9 => BOX_TOP_RIGHT,
            6 => BOX_BOTTOM_LEFT,
            5 => BOX_BOTTOM_RIGHT,
            14 => BOX_TEE_RIGHT,
            13 => BOX_TEE_LEFT,
            11 => BOX_TEE_DOWN,
            7 => BOX_TEE_UP,
            _ => BOX_CROSS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    edges: BoxEdges,
    paint: Paint,
}

const BLANK: Cell = Cell {
    ch: ' ',
    edges: BoxEdges::NONE,
    paint: Paint::Blank,
};

/// A fixed-size character grid.
///
/// Box-drawing characters merge into junctions instead of overwriting each other; everything else
/// overwrites. Methods taking `i64` coordinates clip silently so callers can draw shapes that are
/// partly off screen; `set`/`get` are bounds-checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Result<Self, CanvasError> {
        let len = width
            .checked_mul(height)
            .ok_or(CanvasError::AreaOverflow { width, height })?;
        Ok(Self {
            width,
            height,
            cells: vec![BLANK; len],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Result<char, CanvasError> {
        let idx = self.index_of(x, y)?;
        Ok(self.render_at(x, y, idx))
    }

    pub fn paint_at(&self, x: usize, y: usize) -> Result<Paint, CanvasError> {
        let idx = self.index_of(x, y)?;
        Ok(self.cells[idx].paint)
    }

    pub fn set(&mut self, x: usize, y: usize, ch: char, paint: Paint) -> Result<(), CanvasError> {
        let idx = self.index_of(x, y)?;
        let cell = &mut self.cells[idx];
        match BoxEdges::from_char(ch) {
            Some(edges) => cell.edges = cell.edges.union(edges),
            None => {
                cell.ch = ch;
                cell.edges = BoxEdges::NONE;
            }
        }
        cell.paint = paint;
        Ok(())
    }

    /// Sets a cell if it is on the canvas. Returns whether it was.
    pub fn plot(&mut self, x: i64, y: i64, ch: char, paint: Paint) -> bool {
        match self.clip(x, y) {
            Some((x, y)) => self.set(x, y, ch, paint).is_ok(),
            None => false,
        }
    }

    /// Writes `text` left to right from `(x, y)`, dropping characters that fall off the canvas.
    pub fn write_str(&mut self, x: i64, y: i64, text: &str, paint: Paint) {
        for (offset, ch) in text.chars().enumerate() {
            let Ok(offset) = i64::try_from(offset) else {
                break;
            };
            if x + offset >= self.width as i64 {
                break;
            }
            self.plot(x + offset, y, ch, paint);
        }
    }

    /// Blanks the inclusive rectangle, clearing any box edges in it.
    pub fn clear_rect(&mut self, rect: CellRect, paint: Paint) {
        let Some((xs, ys)) = self.visible_span(rect) else {
            return;
        };
        for y in ys {
            for x in xs.clone() {
                self.cells[y * self.width + x] = Cell { paint, ..BLANK };
            }
        }
    }

    /// Fills the inclusive rectangle with `ch`.
    pub fn fill_rect(&mut self, rect: CellRect, ch: char, paint: Paint) {
        let Some((xs, ys)) = self.visible_span(rect) else {
            return;
        };
        for y in ys {
            for x in xs.clone() {
                // In bounds by construction of the span.
                let _ = self.set(x, y, ch, paint);
            }
        }
    }

    /// The on-canvas column and row ranges covered by `rect`.
    fn visible_span(
        &self,
        rect: CellRect,
    ) -> Option<(std::ops::Range<usize>, std::ops::Range<usize>)> {
        let clamp = |lo: i64, hi: i64, len: usize| {
            let lo = usize::try_from(lo.max(0)).ok()?;
            let hi = usize::try_from(hi.saturating_add(1).max(0)).ok()?.min(len);
            (lo < hi).then_some(lo..hi)
        };
        Some((
            clamp(rect.x0, rect.x1, self.width)?,
            clamp(rect.y0, rect.y1, self.height)?,
        ))
    }

    /// Draws a single-line box on the border of `rect`.
    pub fn draw_box(&mut self, rect: CellRect, paint: Paint) {
        let CellRect { x0, y0, x1, y1 } = rect;
        if x0 == x1 || y0 == y1 {
            return;
        }
        // Only walk the visible span so huge boxes stay cheap.
        for x in (x0 + 1).max(0)..x1.min(self.width as i64) {
            self.plot(x, y0, BOX_HORIZONTAL, paint);
            self.plot(x, y1, BOX_HORIZONTAL, paint);
        }
        for y in (y0 + 1).max(0)..y1.min(self.height as i64) {
            self.plot(x0, y, BOX_VERTICAL, paint);
            self.plot(x1, y, BOX_VERTICAL, paint);
        }
        self.plot(x0, y0, BOX_TOP_LEFT, paint);
        self.plot(x1, y0, BOX_TOP_RIGHT, paint);
        self.plot(x0, y1, BOX_BOTTOM_LEFT, paint);
        self.plot(x1, y1, BOX_BOTTOM_RIGHT, paint);
    }

    /// Draws the outline of `rect` with explicit characters (no junction merging).
    pub fn draw_outline(
        &mut self,
        rect: CellRect,
        horizontal: char,
        vertical: char,
        corner: char,
        paint: Paint,
    ) {
        let CellRect { x0, y0, x1, y1 } = rect;
        // Only walk the visible span so huge off-screen outlines stay cheap.
        let (vx0, vx1) = (x0.max(-1), x1.min(self.width as i64));
        let (vy0, vy1) = (y0.max(-1), y1.min(self.height as i64));
        for x in vx0..=vx1 {
            self.plot(x, y0, horizontal, paint);
            self.plot(x, y1, horizontal, paint);
        }
        for y in vy0..=vy1 {
            self.plot(x0, y, vertical, paint);
            self.plot(x1, y, vertical, paint);
        }
        for (x, y) in [(x0, y0), (x1, y0), (x0, y1), (x1, y1)] {
            self.plot(x, y, corner, paint);
        }
    }

    /// Draws a straight line between two cells.
    ///
    /// Mostly-horizontal and mostly-vertical lines use box characters so they join node borders;
    /// steeper diagonals use `╲`/`╱`.
    pub fn draw_line(&mut self, from: (i64, i64), to: (i64, i64), paint: Paint) {
        let (dx, dy) = (to.0.saturating_sub(from.0), to.1.saturating_sub(from.1));
        let (span_x, span_y) = (dx.saturating_abs(), dy.saturating_abs());
        let ch = if span_x >= span_y.saturating_mul(2) {
            BOX_HORIZONTAL
        } else if span_y >= span_x.saturating_mul(2) {
            BOX_VERTICAL
        } else if (dx > 0) == (dy > 0) {
            '╲'
        } else {
            '╱'
        };

        let Some((from, to)) = self.clip_segment(from, to) else {
            return;
        };
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let (mut x, mut y) = from;
        let step_x = dx.signum();
        let step_y = dy.signum();
        let (adx, ady) = (dx.abs(), -dy.abs());
        let mut err = adx + ady;
        loop {
            self.plot(x, y, ch, paint);
            if (x, y) == to {
                break;
            }
            let e2 = err.saturating_mul(2);
            if e2 >= ady {
                err += ady;
                x += step_x;
            }
            if e2 <= adx {
                err += adx;
                y += step_y;
            }
        }
    }

    /// Clips a segment to the canvas grown by one cell on each side. `None` if it misses.
    fn clip_segment(
        &self,
        from: (i64, i64),
        to: (i64, i64),
    ) -> Option<((i64, i64), (i64, i64))> {
        let (max_x, max_y) = (self.width as i64, self.height as i64);
        let inside = |(x, y): (i64, i64)| (-1..=max_x).contains(&x) && (-1..=max_y).contains(&y);
        if inside(from) && inside(to) {
            return Some((from, to));
        }

        // Liang-Barsky on the grown rectangle.
        let (x0, y0) = (from.0 as f64, from.1 as f64);
        let (dx, dy) = (to.0 as f64 - x0, to.1 as f64 - y0);
        let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
        for (p, q) in [
            (-dx, x0 + 1.0),
            (dx, max_x as f64 - x0),
            (-dy, y0 + 1.0),
            (dy, max_y as f64 - y0),
        ] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
            if t0 > t1 {
                return None;
            }
        }
        let at = |t: f64| ((x0 + t * dx).round() as i64, (y0 + t * dy).round() as i64);
        Some((at(t0), at(t1)))
    }

    fn clip(&self, x: i64, y: i64) -> Option<(usize, usize)> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        (x < self.width && y < self.height).then_some((x, y))
    }

    fn index_of(&self, x: usize, y: usize) -> Result<usize, CanvasError> {
        if x >= self.width || y >= self.height {
            return Err(CanvasError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(y * self.width + x)
    }

    fn render_at(&self, x: usize, y: usize, idx: usize) -> char {
        let cell = self.cells[idx];
        if cell.edges.is_empty() {
            return cell.ch;
        }
        let connected = self.connected_edges(x, y, cell.edges);
        if connected.is_empty() {
            cell.edges.to_char()
        } else {
            connected.to_char()
        }
    }

    fn connected_edges(&self, x: usize, y: usize, edges: BoxEdges) -> BoxEdges {
        let neighbour = |nx: usize, ny: usize| self.cells[ny * self.width + nx].edges;
        let mut connected = BoxEdges::NONE;

        if edges.contains(BoxEdges::LEFT) && x > 0 && neighbour(x - 1, y).contains(BoxEdges::RIGHT)
        {
            connected = connected.union(BoxEdges::LEFT);
        }
        if edges.contains(BoxEdges::RIGHT)
            && x + 1 < self.width
            && neighbour(x + 1, y).contains(BoxEdges::LEFT)
        {
            connected = connected.union(BoxEdges::RIGHT);
        }
        if edges.contains(BoxEdges::UP) && y > 0 && neighbour(x, y - 1).contains(BoxEdges::DOWN) {
            connected = connected.union(BoxEdges::UP);
        }
        if edges.contains(BoxEdges::DOWN)
            && y + 1 < self.height
            && neighbour(x, y + 1).contains(BoxEdges::UP)
        {
            connected = connected.union(BoxEdges::DOWN);
        }
        connected
    }

    /// Visits every cell row by row with its rendered character and paint.
    pub fn for_each_cell(&self, mut visit: impl FnMut(usize, usize, char, Paint)) {
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                visit(x, y, self.render_at(x, y, idx), self.cells[idx].paint);
            }
        }
    }
}

impl fmt::Display for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use std::fmt::Write as _;

        for y in 0..self.height {
            for x in 0..self.width {
                f.write_char(self.render_at(x, y, y * self.width + x))?;
            }
            if y + 1 < self.height {
                f.write_char('\n')?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CanvasError {
    #[error("canvas area overflow: {width}*{height}")]
    AreaOverflow { width: usize, height: usize },
    #[error("out of bounds: ({x},{y}) for {width}x{height} canvas")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::{Canvas, CanvasError, CellRect, Paint};

    fn dotted(width: usize, height: usize) -> Canvas {
        let mut canvas = Canvas::new(width, height).expect("canvas");
        for y in 0..height {
            for x in 0..width {
                canvas.set(x, y, '.', Paint::Blank).expect("set");
            }
        }
        canvas
    }

    #[test]
    fn set_out_of_bounds_errors() {
        let mut canvas = Canvas::new(2, 2).expect("canvas");
        let err = canvas.set(2, 0, 'X', Paint::Blank).expect_err("out of bounds");
        assert_eq!(err, CanvasError::OutOfBounds { x: 2, y: 0, width: 2, height: 2 });
    }

    #[test]
    fn rejects_area_overflow() {
        let err = Canvas::new(usize::MAX, 2).expect_err("overflow");
        assert_eq!(err, CanvasError::AreaOverflow { width: usize::MAX, height: 2 });
    }

    #[test]
    fn plot_and_write_clip_instead_of_failing() {
        let mut canvas = dotted(4, 1);
        assert!(!canvas.plot(-1, 0, 'X', Paint::Blank));
        canvas.write_str(-2, 0, "abcdef", Paint::NodeText);
        assert_eq!(canvas.to_string(), "cdef");
        assert_eq!(canvas.paint_at(0, 0), Ok(Paint::NodeText));
    }

    #[test]
    fn partly_visible_box_draws_its_visible_edges() {
        let mut canvas = dotted(5, 4);
        canvas.draw_box(CellRect { x0: -2, y0: 1, x1: 2, y1: 6 }, Paint::Selected);
        assert_eq!(canvas.to_string(), ".....\n──┐..\n..│..\n..│..");
        assert_eq!(canvas.paint_at(2, 1), Ok(Paint::Selected));
    }

    #[test]
    fn line_ending_on_a_box_joins_as_a_tee() {
        let mut canvas = dotted(5, 5);
        canvas.draw_line((2, 0), (2, 2), Paint::Connection);
        canvas.clear_rect(
            CellRect {
                x0: 1,
                y0: 3,
                x1: 3,
                y1: 3,
            },
            Paint::Blank,
        );
        canvas.draw_box(
            CellRect {
                x0: 0,
                y0: 2,
                x1: 4,
                y1: 4,
            },
            Paint::NodeText,
        );
        assert_eq!(canvas.to_string(), "..│..\n..│..\n┌─┴─┐\n│   │\n└───┘");
    }

    #[test]
    fn diagonal_lines_pick_slanted_glyphs() {
        let mut canvas = dotted(3, 3);
        canvas.draw_line((0, 0), (2, 2), Paint::Connection);
        assert_eq!(canvas.to_string(), "╲..\n.╲.\n..╲");

        let mut canvas = dotted(3, 3);
        canvas.draw_line((2, 0), (0, 2), Paint::Connection);
        assert_eq!(canvas.to_string(), "..╱\n.╱.\n╱..");
    }

    #[test]
    fn long_lines_are_clipped_to_the_canvas() {
        let mut canvas = dotted(5, 3);
        canvas.draw_line((-4_000_000_000, 1), (4_000_000_000, 1), Paint::Connection);
        assert_eq!(canvas.to_string(), ".....\n─────\n.....");

        let mut canvas = dotted(3, 3);
        canvas.draw_line((10, -50), (10, 50), Paint::Connection);
        assert_eq!(canvas.to_string(), "...\n...\n...");
    }

    #[test]
    fn huge_rectangles_only_touch_visible_cells() {
        let huge = CellRect { x0: -1 << 40, y0: -1 << 40, x1: 1 << 40, y1: 1 << 40 };
        let mut canvas = dotted(3, 2);
        canvas.clear_rect(huge, Paint::NodeText);
        assert_eq!(canvas.to_string(), "   \n   ");
        canvas.fill_rect(huge, '#', Paint::MinimapNode);
        assert_eq!(canvas.to_string(), "###\n###");
        canvas.draw_box(huge, Paint::Selected);
        assert_eq!(canvas.to_string(), "###\n###");
    }

    #[test]
    fn crossing_lines_merge_into_a_cross() {
        let mut canvas = dotted(5, 5);
        canvas.draw_line((0, 2), (4, 2), Paint::Connection);
        canvas.draw_line((2, 0), (2, 4), Paint::Connection);
        assert_eq!(canvas.to_string(), "..│..\n..│..\n──┼──\n..│..\n..│..");
    }
}
