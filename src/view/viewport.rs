// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Caseboard-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Caseboard and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::config::{DisplayConfig, ZoomConfig};
use crate::model::{Point, Size};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomLimits {
    pub min: f64,
    pub max: f64,
    pub step_in: f64,
    pub step_out: f64,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self::from(&ZoomConfig::default())
    }
}

impl From<&ZoomConfig> for ZoomLimits {
    fn from(config: &ZoomConfig) -> Self {
        Self {
            min: config.min,
            max: config.max,
            step_in: config.step_in,
            step_out: config.step_out,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelDirection {
    /// Away from the user; zooms in.
    Up,
    Down,
}

/// Pan/zoom transform between canvas units and screen units:
/// `screen = canvas * zoom + pan`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    zoom: f64,
    pan_x: f64,
    pan_y: f64,
    limits: ZoomLimits,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(ZoomLimits::default())
    }
}

impl Viewport {
    pub fn new(limits: ZoomLimits) -> Self {
        Self {
            zoom: 1.0_f64.clamp(limits.min, limits.max),
            pan_x: 0.0,
            pan_y: 0.0,
            limits,
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn pan(&self) -> Point {
        Point::new(self.pan_x, self.pan_y)
    }

    pub fn limits(&self) -> ZoomLimits {
        self.limits
    }

    /// Multiplies zoom by the step for `direction`, clamped to the limits.
    pub fn wheel(&mut self, direction: WheelDirection) -> f64 {
        let factor = match direction {
            WheelDirection::Up => self.limits.step_in,
            WheelDirection::Down => self.limits.step_out,
        };
        self.set_zoom(self.zoom * factor)
    }

    pub fn set_zoom(&mut self, zoom: f64) -> f64 {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(self.limits.min, self.limits.max);
        }
        self.zoom
    }

    /// Translates the pan offset by a screen-space delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        if dx.is_finite() && dy.is_finite() {
            self.pan_x += dx;
            self.pan_y += dy;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.limits);
    }

    pub fn canvas_to_screen(&self, canvas: Point) -> Point {
        Point::new(
            canvas.x * self.zoom + self.pan_x,
            canvas.y * self.zoom + self.pan_y,
        )
    }

    pub fn screen_to_canvas(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.pan_x) / self.zoom,
            (screen.y - self.pan_y) / self.zoom,
        )
    }

    /// Canvas-space rectangle covered by a screen area of `screen` size anchored at the origin.
    pub fn visible_region(&self, screen: Size) -> (Point, Size) {
        let origin = self.screen_to_canvas(Point::new(0.0, 0.0));
        (
            origin,
            Size::new(screen.width / self.zoom, screen.height / self.zoom),
        )
    }

    /// Canvas point under the centre of a screen area of `screen` size.
    pub fn center_of(&self, screen: Size) -> Point {
        self.screen_to_canvas(Point::new(screen.width / 2.0, screen.height / 2.0))
    }
}

/// Size of one terminal cell in screen units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMetrics {
    pub cell_width: f64,
    pub cell_height: f64,
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self::from(&DisplayConfig::default())
    }
}

impl From<&DisplayConfig> for CellMetrics {
    fn from(config: &DisplayConfig) -> Self {
        Self {
            cell_width: config.cell_width,
            cell_height: config.cell_height,
        }
    }
}

impl CellMetrics {
    /// Screen point at the centre of the cell at (`col`, `row`) relative to the board area.
    pub fn cell_center(&self, col: u16, row: u16) -> Point {
        Point::new(
            (f64::from(col) + 0.5) * self.cell_width,
            (f64::from(row) + 0.5) * self.cell_height,
        )
    }

    /// Cell containing `screen`. May be negative or past the area for off-screen points.
    pub fn cell_of(&self, screen: Point) -> (i64, i64) {
        (
            (screen.x / self.cell_width).floor() as i64,
            (screen.y / self.cell_height).floor() as i64,
        )
    }

    pub fn screen_size(&self, cols: u16, rows: u16) -> Size {
        Size::new(
            f64::from(cols) * self.cell_width,
            f64::from(rows) * self.cell_height,
        )
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rstest::rstest;

    use super::{CellMetrics, Viewport, WheelDirection, ZoomLimits};
    use crate::model::{Point, Size};

    #[test]
    fn wheel_steps_by_ten_percent() {
        let mut viewport = Viewport::default();
        assert!((viewport.wheel(WheelDirection::Up) - 1.1).abs() < 1e-12);
        viewport.reset();
        assert!((viewport.wheel(WheelDirection::Down) - 0.9).abs() < 1e-12);
    }

    #[rstest]
    #[case(WheelDirection::Up, 2.0)]
    #[case(WheelDirection::Down, 0.25)]
    fn wheel_saturates_at_the_limits(#[case] direction: WheelDirection, #[case] limit: f64) {
        let mut viewport = Viewport::default();
        for _ in 0..100 {
            viewport.wheel(direction);
        }
        assert_eq!(viewport.zoom(), limit);
    }

    #[test]
    fn screen_and_canvas_conversions_invert_each_other() {
        let mut viewport = Viewport::default();
        viewport.set_zoom(1.5);
        viewport.pan_by(-120.0, 40.0);

        let canvas = Point::new(300.0, 200.0);
        let screen = viewport.canvas_to_screen(canvas);
        assert_eq!(screen, Point::new(330.0, 340.0));
        assert_eq!(viewport.screen_to_canvas(screen), canvas);
    }

    #[test]
    fn visible_region_and_center_follow_pan_and_zoom() {
        let mut viewport = Viewport::default();
        viewport.set_zoom(2.0);
        viewport.pan_by(-200.0, -100.0);

        let (origin, size) = viewport.visible_region(Size::new(800.0, 400.0));
        assert_eq!(origin, Point::new(100.0, 50.0));
        assert_eq!(size, Size::new(400.0, 200.0));
        assert_eq!(viewport.center_of(Size::new(800.0, 400.0)), Point::new(300.0, 150.0));
    }

    #[test]
    fn reset_restores_identity_transform() {
        let mut viewport = Viewport::default();
        viewport.wheel(WheelDirection::Up);
        viewport.pan_by(5.0, 5.0);
        viewport.reset();
        assert_eq!(viewport, Viewport::default());
    }

    #[test]
    fn cell_metrics_map_cells_to_screen_units() {
        let cells = CellMetrics::default();
        assert_eq!(cells.cell_center(0, 0), Point::new(5.0, 10.0));
        assert_eq!(cells.cell_of(Point::new(25.0, 45.0)), (2, 2));
        assert_eq!(cells.cell_of(Point::new(-1.0, -1.0)), (-1, -1));
        assert_eq!(cells.screen_size(80, 24), Size::new(800.0, 480.0));
    }

    proptest! {
        #[test]
        fn zoom_stays_clamped_for_any_wheel_sequence(
            steps in prop::collection::vec(any::<bool>(), 0..300),
        ) {
            let mut viewport = Viewport::new(ZoomLimits::default());
            for up in steps {
                let direction = if up {
                    WheelDirection::Up
                } else {
                    WheelDirection::Down
                };
                let zoom = viewport.wheel(direction);
                prop_assert!((0.25..=2.0).contains(&zoom));
            }
        }

        #[test]
        fn set_zoom_clamps_arbitrary_values(value in any::<f64>()) {
            let mut viewport = Viewport::default();
            let zoom = viewport.set_zoom(value);
            prop_assert!((0.25..=2.0).contains(&zoom));
        }
    }
}
