//! Editing session over a folder of images.
//!
//! Owns the image list, the current position and an in-memory annotation
//! per visited image. Edits stay in memory across navigation and only reach
//! disk through [`EditorSession::save_current`].

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::error::SessionError;
use crate::labels;
use crate::models::BoundingBox;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Annotation {
    pub boxes: Vec<BoundingBox>,
    /// Differs from what is on disk.
    pub dirty: bool,
}

/// Result of deleting the current image. Failed deletions are reported,
/// the session forgets the image either way.
#[derive(Debug, Default)]
pub struct DeleteOutcome {
    pub deleted: Option<PathBuf>,
    pub notices: Vec<String>,
}

#[derive(Debug, Default)]
pub struct EditorSession {
    images_dir: Option<PathBuf>,
    label_dir: Option<PathBuf>,
    images: Vec<PathBuf>,
    current: Option<usize>,
    annotations: HashMap<PathBuf, Annotation>,
    saved: Vec<PathBuf>,
    history: Vec<PathBuf>,
}

impl EditorSession {
    /// Lists the images in `dir` and positions on the first one.
    pub fn open(&mut self, dir: &Path) -> std::io::Result<usize> {
        let images = labels::list_images(dir)?;
        log::info!("Opened {:?}: {} images", dir, images.len());
        self.images_dir = Some(dir.to_path_buf());
        self.current = if images.is_empty() { None } else { Some(0) };
        self.images = images;
        self.annotations.clear();
        self.saved.clear();
        self.history.clear();
        Ok(self.images.len())
    }

    /// Clean cached annotations are dropped so they reload from the new
    /// location; unsaved edits are kept.
    pub fn set_label_dir(&mut self, dir: Option<PathBuf>) {
        self.label_dir = dir;
        self.annotations.retain(|_, a| a.dirty);
    }

    pub fn images_dir(&self) -> Option<&Path> {
        self.images_dir.as_deref()
    }

    pub fn label_dir(&self) -> Option<&Path> {
        self.label_dir.as_deref()
    }

    pub fn images(&self) -> &[PathBuf] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.current.and_then(|i| self.images.get(i)).map(PathBuf::as_path)
    }

    /// "3 / 10", or "0 / 0" without images.
    pub fn position_label(&self) -> String {
        match self.current {
            Some(i) => format!("{} / {}", i + 1, self.images.len()),
            None => "0 / 0".to_string(),
        }
    }

    pub fn label_path(&self, image: &Path) -> PathBuf {
        labels::label_path_for(image, self.label_dir.as_deref())
    }

    /// Boxes for the current image: cached edits if any, otherwise the
    /// label file (cached clean).
    pub fn load_current(&mut self, dims: (u32, u32)) -> Result<Vec<BoundingBox>, SessionError> {
        let path = self.current_path().ok_or(SessionError::NoImage)?.to_path_buf();
        if let Some(annotation) = self.annotations.get(&path) {
            return Ok(annotation.boxes.clone());
        }
        let boxes = labels::load_boxes(&self.label_path(&path), dims)?;
        self.annotations.insert(
            path,
            Annotation {
                boxes: boxes.clone(),
                dirty: false,
            },
        );
        Ok(boxes)
    }

    /// Keeps the current image's edits in memory and marks it dirty.
    pub fn store_current(&mut self, boxes: Vec<BoundingBox>) {
        let Some(path) = self.current_path().map(Path::to_path_buf) else {
            return;
        };
        self.annotations
            .insert(path, Annotation { boxes, dirty: true });
    }

    /// Writes `boxes` as the current image's label file.
    pub fn save_current(
        &mut self,
        boxes: &[BoundingBox],
        dims: (u32, u32),
    ) -> Result<PathBuf, SessionError> {
        let path = self.current_path().ok_or(SessionError::NoImage)?.to_path_buf();
        let label_path = self.label_path(&path);
        labels::save_boxes(&label_path, boxes, dims)?;
        log::info!("Saved {} boxes to {:?}", boxes.len(), label_path);

        self.annotations.insert(
            path.clone(),
            Annotation {
                boxes: boxes.to_vec(),
                dirty: false,
            },
        );
        if !self.saved.contains(&path) {
            self.saved.push(path);
        }
        Ok(label_path)
    }

    #[cfg(test)]
    pub fn annotation(&self, image: &Path) -> Option<&Annotation> {
        self.annotations.get(image)
    }

    pub fn is_dirty(&self, image: &Path) -> bool {
        self.annotations.get(image).is_some_and(|a| a.dirty)
    }

    pub fn dirty_images(&self) -> Vec<&Path> {
        self.images
            .iter()
            .filter(|p| self.is_dirty(p))
            .map(PathBuf::as_path)
            .collect()
    }

    /// Images saved during this session, in save order.
    pub fn saved_images(&self) -> &[PathBuf] {
        &self.saved
    }

    pub fn is_saved(&self, image: &Path) -> bool {
        self.saved.iter().any(|p| p == image)
    }

    fn move_to(&mut self, index: usize) -> bool {
        if index >= self.images.len() || self.current == Some(index) {
            return false;
        }
        if let Some(path) = self.current_path() {
            self.history.push(path.to_path_buf());
        }
        self.current = Some(index);
        true
    }

    pub fn next(&mut self) -> bool {
        match self.current {
            Some(i) => self.move_to(i + 1),
            None => false,
        }
    }

    pub fn prev(&mut self) -> bool {
        match self.current {
            Some(i) if i > 0 => self.move_to(i - 1),
            _ => false,
        }
    }

    /// Jumps to a zero-based index.
    pub fn go_to(&mut self, index: usize) -> bool {
        self.move_to(index)
    }

    pub fn go_to_path(&mut self, image: &Path) -> bool {
        match self.images.iter().position(|p| p == image) {
            Some(i) => self.move_to(i),
            None => false,
        }
    }

    /// Goes back to the previously shown image.
    pub fn back(&mut self) -> bool {
        while let Some(path) = self.history.pop() {
            if let Some(i) = self.images.iter().position(|p| *p == path) {
                if self.current != Some(i) {
                    self.current = Some(i);
                    return true;
                }
            }
        }
        false
    }

    /// Jumps to a random image not saved in this session.
    pub fn random_unsaved<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        let saved: HashSet<&PathBuf> = self.saved.iter().collect();
        let current = self.current;
        let candidates: Vec<usize> = (0..self.images.len())
            .filter(|&i| Some(i) != current && !saved.contains(&self.images[i]))
            .collect();
        match candidates.choose(rng) {
            Some(&i) => self.move_to(i),
            None => false,
        }
    }

    /// Deletes the current image and its label from disk.
    pub fn delete_current(&mut self) -> DeleteOutcome {
        let Some(index) = self.current else {
            return DeleteOutcome::default();
        };
        let path = self.images.remove(index);
        let mut notices = Vec::new();

        if path.exists() {
            if let Err(e) = fs::remove_file(&path) {
                log::warn!("Could not delete image {:?}: {e}", path);
                notices.push(format!("Could not delete image: {e}"));
            }
        }
        let label_path = self.label_path(&path);
        if label_path.exists() {
            if let Err(e) = fs::remove_file(&label_path) {
                log::warn!("Could not delete label {:?}: {e}", label_path);
                notices.push(format!("Could not delete label: {e}"));
            }
        }

        self.annotations.remove(&path);
        self.saved.retain(|p| *p != path);
        self.history.retain(|p| *p != path);
        self.current = match self.images.len() {
            0 => None,
            len => Some(index.min(len - 1)),
        };

        DeleteOutcome {
            deleted: Some(path),
            notices,
        }
    }
}
