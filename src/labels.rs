//! YOLO label files and image discovery.
//!
//! One text file per image, one line per box:
//! `class_id x_center y_center width height`, the last four normalized by
//! the image's pixel size.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::LabelError;
use crate::models::BoundingBox;

/// Listed in this order, each group sorted by path.
pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "png", "jpeg"];
pub const LABEL_EXTENSION: &str = "txt";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelEntry {
    pub class_id: u32,
    pub x_center: f64,
    pub y_center: f64,
    pub width: f64,
    pub height: f64,
}

impl LabelEntry {
    /// Normalizes a pixel-space box by the image size.
    pub fn from_box(bbox: &BoundingBox, (img_w, img_h): (u32, u32)) -> Self {
        let b = bbox.normalized();
        let (w, h) = (img_w as f64, img_h as f64);
        let (x1, y1, x2, y2) = (b.x1 as f64, b.y1 as f64, b.x2 as f64, b.y2 as f64);
        Self {
            class_id: b.class_id,
            x_center: (x1 + x2) / 2.0 / w,
            y_center: (y1 + y2) / 2.0 / h,
            width: (x2 - x1) / w,
            height: (y2 - y1) / h,
        }
    }

    pub fn to_box(&self, (img_w, img_h): (u32, u32)) -> BoundingBox {
        let (w, h) = (img_w as f64, img_h as f64);
        let box_w = self.width * w;
        let box_h = self.height * h;
        let x1 = self.x_center * w - box_w / 2.0;
        let y1 = self.y_center * h - box_h / 2.0;
        BoundingBox::new(
            self.class_id,
            x1 as f32,
            y1 as f32,
            (x1 + box_w) as f32,
            (y1 + box_h) as f32,
        )
    }

    fn parse(line: &str, path: &Path, line_num: usize) -> Result<Option<Self>, LabelError> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() {
            return Ok(None);
        }
        if parts.len() != 5 {
            return Err(LabelError::parse(
                path,
                line_num,
                format!("expected 5 fields, found {}", parts.len()),
            ));
        }

        let class_id = parts[0].parse::<u32>().map_err(|e| {
            LabelError::parse(path, line_num, format!("bad class id '{}': {e}", parts[0]))
        })?;
        let mut coords = [0.0f64; 4];
        for (slot, raw) in coords.iter_mut().zip(&parts[1..]) {
            *slot = raw.parse::<f64>().map_err(|e| {
                LabelError::parse(path, line_num, format!("bad coordinate '{raw}': {e}"))
            })?;
        }

        Ok(Some(Self {
            class_id,
            x_center: coords[0],
            y_center: coords[1],
            width: coords[2],
            height: coords[3],
        }))
    }
}

pub fn read_labels(path: &Path) -> Result<Vec<LabelEntry>, LabelError> {
    let content = fs::read_to_string(path).map_err(|e| LabelError::io(path, e))?;
    let mut entries = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        if let Some(entry) = LabelEntry::parse(line, path, idx + 1)? {
            entries.push(entry);
        }
    }
    Ok(entries)
}

/// Overwrites `path` with `entries`.
pub fn write_labels(path: &Path, entries: &[LabelEntry]) -> Result<(), LabelError> {
    let content: String = entries
        .iter()
        .map(|e| {
            format!(
                "{} {:.6} {:.6} {:.6} {:.6}\n",
                e.class_id, e.x_center, e.y_center, e.width, e.height
            )
        })
        .collect();
    fs::write(path, content).map_err(|e| LabelError::io(path, e))
}

/// Reads a label file into pixel-space boxes. A missing file is an empty list.
pub fn load_boxes(label_path: &Path, dims: (u32, u32)) -> Result<Vec<BoundingBox>, LabelError> {
    if !label_path.exists() {
        return Ok(Vec::new());
    }
    Ok(read_labels(label_path)?
        .iter()
        .map(|e| e.to_box(dims))
        .collect())
}

pub fn save_boxes(
    label_path: &Path,
    boxes: &[BoundingBox],
    dims: (u32, u32),
) -> Result<(), LabelError> {
    let entries: Vec<LabelEntry> = boxes.iter().map(|b| LabelEntry::from_box(b, dims)).collect();
    write_labels(label_path, &entries)
}

/// `<label_dir>/<stem>.txt`, or next to the image without a label dir.
pub fn label_path_for(image: &Path, label_dir: Option<&Path>) -> PathBuf {
    let with_ext = image.with_extension(LABEL_EXTENSION);
    match (label_dir, with_ext.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => with_ext,
    }
}

pub fn image_dimensions(path: &Path) -> Result<(u32, u32), LabelError> {
    let (w, h) = image::image_dimensions(path).map_err(|source| LabelError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    if w == 0 || h == 0 {
        return Err(LabelError::EmptyImage {
            path: path.to_path_buf(),
        });
    }
    Ok((w, h))
}

/// Images directly inside `dir`: all `.jpg`, then `.png`, then `.jpeg`.
pub fn list_images(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();

    let mut images = Vec::new();
    for ext in IMAGE_EXTENSIONS {
        let mut group: Vec<PathBuf> = files
            .iter()
            .filter(|p| p.extension().is_some_and(|e| e == ext))
            .cloned()
            .collect();
        group.sort();
        images.extend(group);
    }
    Ok(images)
}

/// Label files already present in `dir`.
pub fn existing_labels(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p.extension().is_some_and(|e| e == LABEL_EXTENSION))
        .collect()
}
