use super::Vec2;

/// Follow camera. Each tick it moves `ease_factor` of the way toward the
/// target plus `offset`; an ease of 1 locks it to the target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera2D {
    pub position: Vec2,
    offset: Vec2,
    zoom: f32,
    ease_factor: f32,
}

impl Default for Camera2D {
    fn default() -> Self {
        Self::new(Vec2::ZERO, 1.0, 1.0)
    }
}

impl Camera2D {
    pub fn new(offset: Vec2, zoom: f32, ease_factor: f32) -> Self {
        Self {
            position: Vec2::ZERO,
            offset,
            zoom: normalize_zoom(zoom),
            ease_factor: if ease_factor.is_finite() {
                ease_factor
            } else {
                1.0
            },
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn snap_to(&mut self, target: Vec2) {
        self.position = target + self.offset;
    }

    pub fn follow(&mut self, target: Vec2) {
        self.position = self.position.lerp(target + self.offset, self.ease_factor);
    }
}

fn normalize_zoom(zoom: f32) -> f32 {
    if zoom.is_finite() && zoom > 0.0 {
        zoom
    } else {
        1.0
    }
}
