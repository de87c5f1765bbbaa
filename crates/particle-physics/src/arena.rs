//! Arena geometry: walls, bounce bounds and the spawn rectangle

use glam::Vec2;

use crate::constants::{WALL_BUFFER, WALL_THICKNESS};

/// Axis-aligned rectangle, `min` inclusive and `min + size` exclusive
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.max();
        point.x >= self.min.x && point.x < max.x && point.y >= self.min.y && point.y < max.y
    }
}

/// Rectangular arena of `width` x `height` with walls inset by
/// `WALL_BUFFER + WALL_THICKNESS` on every side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Innermost coordinate a particle may reach before the anchor offset
    pub fn min(&self) -> Vec2 {
        Vec2::splat(WALL_BUFFER + WALL_THICKNESS)
    }

    /// Outermost coordinate a particle may reach
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.width, self.height) - Vec2::splat(WALL_BUFFER + WALL_THICKNESS)
    }

    /// Middle two-thirds of the arena, where particles spawn and reset to
    pub fn spawn_rect(&self) -> Rect {
        let extent = Vec2::new(self.width, self.height);
        Rect {
            min: extent / 6.0,
            size: extent / 1.5,
        }
    }

    /// Top, bottom, left and right wall rectangles for a renderer to draw
    pub fn walls(&self) -> [Rect; 4] {
        let span_x = self.width - 2.0 * WALL_BUFFER;
        let span_y = self.height - 2.0 * WALL_BUFFER;
        [
            Rect {
                min: Vec2::splat(WALL_BUFFER),
                size: Vec2::new(span_x, WALL_THICKNESS),
            },
            Rect {
                min: Vec2::new(WALL_BUFFER, self.height - WALL_BUFFER - WALL_THICKNESS),
                size: Vec2::new(span_x, WALL_THICKNESS),
            },
            Rect {
                min: Vec2::splat(WALL_BUFFER),
                size: Vec2::new(WALL_THICKNESS, span_y),
            },
            Rect {
                min: Vec2::new(self.width - WALL_BUFFER - WALL_THICKNESS, WALL_BUFFER),
                size: Vec2::new(WALL_THICKNESS, span_y),
            },
        ]
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(1600.0, 900.0)
    }
}
