use std::collections::BTreeMap;

use eframe::egui::{Pos2, Rect, pos2};

/// Axis-aligned box in image pixels.
///
/// While a box is being drawn or resized `x1 > x2` or `y1 > y2` is allowed;
/// readers that need a proper rectangle go through [`BoundingBox::normalized`].
#[derive(Clone, Debug, PartialEq)]
pub struct BoundingBox {
    pub class_id: u32,
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub confidence: Option<f32>,
}

impl BoundingBox {
    pub fn new(class_id: u32, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            class_id,
            x1,
            y1,
            x2,
            y2,
            confidence: None,
        }
    }

    pub fn from_corners(class_id: u32, a: Pos2, b: Pos2) -> Self {
        Self::new(class_id, a.x, a.y, b.x, b.y)
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    pub fn normalized(&self) -> Self {
        Self {
            class_id: self.class_id,
            x1: self.x1.min(self.x2),
            y1: self.y1.min(self.y2),
            x2: self.x1.max(self.x2),
            y2: self.y1.max(self.y2),
            confidence: self.confidence,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.width() == 0.0 || self.height() == 0.0
    }

    /// Inclusive containment against the normalized rectangle.
    pub fn contains(&self, point: Pos2) -> bool {
        let b = self.normalized();
        (b.x1..=b.x2).contains(&point.x) && (b.y1..=b.y2).contains(&point.y)
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.x1 += dx;
        self.x2 += dx;
        self.y1 += dy;
        self.y2 += dy;
    }

    pub fn center(&self) -> Pos2 {
        pos2((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    /// Normalized rectangle in image space.
    pub fn rect(&self) -> Rect {
        Rect::from_two_pos(pos2(self.x1, self.y1), pos2(self.x2, self.y2))
    }

    pub fn describe(&self) -> String {
        let b = self.normalized();
        format!(
            "class {}: [{:.1},{:.1},{:.1},{:.1}]",
            b.class_id, b.x1, b.y1, b.x2, b.y2
        )
    }
}

#[derive(Clone, Default)]
pub struct Statistics {
    pub total_images: usize,
    pub saved_images: usize,
    pub dirty_images: usize,
    pub current_class_counts: BTreeMap<u32, usize>,
}

impl Statistics {
    pub fn progress_percent(&self) -> f32 {
        if self.total_images == 0 {
            return 0.0;
        }
        self.saved_images as f32 / self.total_images as f32 * 100.0
    }
}
