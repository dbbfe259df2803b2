use eframe::egui::{CursorIcon, Pos2};

use crate::models::BoundingBox;

/// Resize zone on a box: four corners and four edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handle {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Left,
    Right,
    Top,
    Bottom,
}

impl Handle {
    pub const CORNERS: [Handle; 4] = [
        Handle::TopLeft,
        Handle::TopRight,
        Handle::BottomLeft,
        Handle::BottomRight,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Handle::TopLeft => "tl",
            Handle::TopRight => "tr",
            Handle::BottomLeft => "bl",
            Handle::BottomRight => "br",
            Handle::Left => "l",
            Handle::Right => "r",
            Handle::Top => "t",
            Handle::Bottom => "b",
        }
    }

    /// Image-space anchor of a corner handle; edges have none.
    pub fn corner_of(self, bbox: &BoundingBox) -> Option<Pos2> {
        let (x, y) = match self {
            Handle::TopLeft => (bbox.x1, bbox.y1),
            Handle::TopRight => (bbox.x2, bbox.y1),
            Handle::BottomLeft => (bbox.x1, bbox.y2),
            Handle::BottomRight => (bbox.x2, bbox.y2),
            _ => return None,
        };
        Some(Pos2::new(x, y))
    }

    pub fn cursor(self) -> CursorIcon {
        match self {
            Handle::TopLeft | Handle::BottomRight => CursorIcon::ResizeNwSe,
            Handle::TopRight | Handle::BottomLeft => CursorIcon::ResizeNeSw,
            Handle::Left | Handle::Right => CursorIcon::ResizeHorizontal,
            Handle::Top | Handle::Bottom => CursorIcon::ResizeVertical,
        }
    }

    /// Moves the edge(s) this handle controls to `pos`. No clamping and no
    /// normalization, so the box may end up inverted.
    pub fn apply(self, bbox: &mut BoundingBox, pos: Pos2) {
        match self {
            Handle::TopLeft => {
                bbox.x1 = pos.x;
                bbox.y1 = pos.y;
            }
            Handle::TopRight => {
                bbox.x2 = pos.x;
                bbox.y1 = pos.y;
            }
            Handle::BottomLeft => {
                bbox.x1 = pos.x;
                bbox.y2 = pos.y;
            }
            Handle::BottomRight => {
                bbox.x2 = pos.x;
                bbox.y2 = pos.y;
            }
            Handle::Left => bbox.x1 = pos.x,
            Handle::Right => bbox.x2 = pos.x,
            Handle::Top => bbox.y1 = pos.y,
            Handle::Bottom => bbox.y2 = pos.y,
        }
    }
}

/// First box in store order containing `point`.
pub fn find_box_at(point: Pos2, boxes: &[BoundingBox]) -> Option<usize> {
    boxes.iter().position(|b| b.contains(point))
}

/// Handle of `bbox` under `point`. Corners win over edges.
pub fn find_handle_at(point: Pos2, bbox: &BoundingBox, tolerance: f32) -> Option<Handle> {
    let near = |a: f32, b: f32| (a - b).abs() < tolerance;
    let (x, y) = (point.x, point.y);

    if let Some(corner) = Handle::CORNERS.into_iter().find(|h| {
        h.corner_of(bbox)
            .is_some_and(|c| near(x, c.x) && near(y, c.y))
    }) {
        return Some(corner);
    }

    let in_y_span = bbox.y1 <= y && y <= bbox.y2;
    let in_x_span = bbox.x1 <= x && x <= bbox.x2;
    if near(x, bbox.x1) && in_y_span {
        Some(Handle::Left)
    } else if near(x, bbox.x2) && in_y_span {
        Some(Handle::Right)
    } else if near(y, bbox.y1) && in_x_span {
        Some(Handle::Top)
    } else if near(y, bbox.y2) && in_x_span {
        Some(Handle::Bottom)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::pos2;

    fn sample() -> BoundingBox {
        BoundingBox::new(0, 10.0, 10.0, 50.0, 40.0)
    }

    #[test]
    fn overlapping_boxes_resolve_to_first_inserted() {
        let boxes = vec![
            BoundingBox::new(0, 0.0, 0.0, 100.0, 100.0),
            BoundingBox::new(1, 20.0, 20.0, 60.0, 60.0),
        ];
        assert_eq!(find_box_at(pos2(30.0, 30.0), &boxes), Some(0));
        assert_eq!(find_box_at(pos2(150.0, 30.0), &boxes), None);
    }

    #[test]
    fn corners_beat_edges() {
        let b = sample();
        assert_eq!(find_handle_at(pos2(11.0, 12.0), &b, 8.0), Some(Handle::TopLeft));
        assert_eq!(find_handle_at(pos2(49.0, 9.0), &b, 8.0), Some(Handle::TopRight));
        assert_eq!(find_handle_at(pos2(12.0, 39.0), &b, 8.0), Some(Handle::BottomLeft));
        assert_eq!(find_handle_at(pos2(52.0, 41.0), &b, 8.0), Some(Handle::BottomRight));
    }

    #[test]
    fn edges_need_perpendicular_span() {
        let b = sample();
        assert_eq!(find_handle_at(pos2(10.0, 25.0), &b, 8.0), Some(Handle::Left));
        assert_eq!(find_handle_at(pos2(53.0, 25.0), &b, 8.0), Some(Handle::Right));
        assert_eq!(find_handle_at(pos2(30.0, 8.0), &b, 8.0), Some(Handle::Top));
        assert_eq!(find_handle_at(pos2(30.0, 44.0), &b, 8.0), Some(Handle::Bottom));
        // beyond the corner zone and outside the span
        assert_eq!(find_handle_at(pos2(5.0, 60.0), &b, 8.0), None);
        assert_eq!(find_handle_at(pos2(30.0, 25.0), &b, 8.0), None);
    }

    #[test]
    fn tolerance_is_exclusive() {
        let b = sample();
        assert_eq!(find_handle_at(pos2(2.0, 25.0), &b, 8.0), None);
        assert_eq!(find_handle_at(pos2(2.5, 25.0), &b, 8.0), Some(Handle::Left));
    }

    #[test]
    fn handle_names() {
        let names: Vec<_> = [
            Handle::TopLeft,
            Handle::TopRight,
            Handle::BottomLeft,
            Handle::BottomRight,
            Handle::Left,
            Handle::Right,
            Handle::Top,
            Handle::Bottom,
        ]
        .iter()
        .map(|h| h.name())
        .collect();
        assert_eq!(names, ["tl", "tr", "bl", "br", "l", "r", "t", "b"]);
    }

    #[test]
    fn resize_can_invert_box() {
        let mut b = sample();
        Handle::Right.apply(&mut b, pos2(0.0, 999.0));
        assert_eq!(b, BoundingBox::new(0, 10.0, 10.0, 0.0, 40.0));
        assert!(b.x1 > b.x2);
        assert_eq!(b.normalized(), BoundingBox::new(0, 0.0, 10.0, 10.0, 40.0));
    }
}
