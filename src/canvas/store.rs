use crate::models::BoundingBox;

/// Boxes of the displayed image in insertion order, plus at most one
/// selected box. Later boxes are drawn on top.
#[derive(Clone, Debug, Default)]
pub struct BoxStore {
    boxes: Vec<BoundingBox>,
    selected: Option<usize>,
}

impl BoxStore {
    pub fn boxes(&self) -> &[BoundingBox] {
        &self.boxes
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn add(&mut self, bbox: BoundingBox) -> usize {
        self.boxes.push(bbox);
        self.boxes.len() - 1
    }

    /// Removes the box at `index`. A selection on that box is cleared, a
    /// selection on a later box follows it to its new index.
    pub fn remove(&mut self, index: usize) -> Option<BoundingBox> {
        if index >= self.boxes.len() {
            return None;
        }
        let removed = self.boxes.remove(index);
        self.selected = match self.selected {
            Some(s) if s == index => None,
            Some(s) if s > index => Some(s - 1),
            other => other,
        };
        Some(removed)
    }

    pub fn replace_all(&mut self, boxes: Vec<BoundingBox>) {
        self.boxes = boxes;
        self.selected = None;
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected(&self) -> Option<&BoundingBox> {
        self.selected.and_then(|i| self.boxes.get(i))
    }

    pub fn selected_mut(&mut self) -> Option<&mut BoundingBox> {
        self.selected.and_then(|i| self.boxes.get_mut(i))
    }

    /// Returns true if the selection changed.
    pub fn select(&mut self, index: Option<usize>) -> bool {
        let index = index.filter(|&i| i < self.boxes.len());
        let changed = self.selected != index;
        self.selected = index;
        changed
    }

    /// Removes the selected box, if any.
    pub fn remove_selected(&mut self) -> Option<BoundingBox> {
        self.selected.and_then(|i| self.remove(i))
    }

    /// Returns true if a selected box changed class.
    pub fn set_selected_class(&mut self, class_id: u32) -> bool {
        match self.selected_mut() {
            Some(bbox) if bbox.class_id != class_id => {
                bbox.class_id = class_id;
                true
            }
            _ => false,
        }
    }
}
