use eframe::egui::{Pos2, Vec2};

pub const MIN_SCALE: f32 = 0.1;
pub const MAX_SCALE: f32 = 10.0;

/// Wheel "angle units" per notch, as reported by most platforms.
pub const WHEEL_NOTCH: f32 = 120.0;

/// Uniform scale plus offset between widget pixels and image pixels.
///
/// `image = (widget - offset) / scale`, `widget = image * scale + offset`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    scale: f32,
    offset: Vec2,
    min_scale: f32,
    max_scale: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::with_limits(MIN_SCALE, MAX_SCALE)
    }
}

impl Viewport {
    /// Narrows the zoom range. Limits never leave `[MIN_SCALE, MAX_SCALE]`.
    pub fn with_limits(min_scale: f32, max_scale: f32) -> Self {
        let min_scale = min_scale.clamp(MIN_SCALE, MAX_SCALE);
        let max_scale = max_scale.clamp(min_scale, MAX_SCALE);
        let mut viewport = Self {
            scale: 1.0,
            offset: Vec2::ZERO,
            min_scale,
            max_scale,
        };
        viewport.reset();
        viewport
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    #[cfg(test)]
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn reset(&mut self) {
        self.scale = 1.0_f32.clamp(self.min_scale, self.max_scale);
        self.offset = Vec2::ZERO;
    }

    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Zooms by `factor` keeping the image point under `pivot` in place.
    pub fn zoom(&mut self, pivot: Pos2, factor: f32) {
        let old_image_pos = self.to_image(pivot);
        self.scale = (self.scale * factor).clamp(self.min_scale, self.max_scale);
        let new_image_pos = self.to_image(pivot);
        self.offset += (new_image_pos - old_image_pos) * self.scale;
    }

    /// Zoom step for a wheel event, `delta` in angle units.
    pub fn wheel_factor(delta: f32) -> f32 {
        1.0 + delta / (WHEEL_NOTCH * 10.0)
    }

    /// Scales the image to fit inside `available` and centers it.
    pub fn fit(&mut self, image_size: Vec2, available: Vec2) {
        if image_size.x <= 0.0 || image_size.y <= 0.0 {
            self.reset();
            return;
        }
        let scale = (available.x / image_size.x).min(available.y / image_size.y);
        self.scale = scale.clamp(self.min_scale, self.max_scale);
        self.offset = (available - image_size * self.scale) / 2.0;
    }

    pub fn to_image(&self, widget: Pos2) -> Pos2 {
        ((widget.to_vec2() - self.offset) / self.scale).to_pos2()
    }

    pub fn to_widget(&self, image: Pos2) -> Pos2 {
        (image.to_vec2() * self.scale + self.offset).to_pos2()
    }

    /// Converts a widget-space length into image space.
    pub fn to_image_len(&self, len: f32) -> f32 {
        len / self.scale
    }
}
