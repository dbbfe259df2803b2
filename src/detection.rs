//! Detection backend seam.
//!
//! The application does not run a network itself. A [`ModelLoader`] turns a
//! weights file into a [`Detector`], which reports absolute pixel boxes.

use std::path::{Path, PathBuf};

use crate::error::DetectionError;
use crate::labels::LabelEntry;
use crate::models::BoundingBox;

#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    pub class_id: u32,
    pub confidence: f32,
    /// `[x1, y1, x2, y2]` in image pixels.
    pub bbox: [f32; 4],
}

impl Detection {
    pub fn to_box(&self) -> BoundingBox {
        let [x1, y1, x2, y2] = self.bbox;
        BoundingBox::new(self.class_id, x1, y1, x2, y2).with_confidence(self.confidence)
    }

    pub fn to_label_entry(&self, dims: (u32, u32)) -> LabelEntry {
        LabelEntry::from_box(&self.to_box(), dims)
    }
}

pub trait Detector: Send {
    fn detect(&mut self, image: &Path) -> Result<Vec<Detection>, DetectionError>;
}

pub trait ModelLoader: Send + Sync {
    fn load(&self, weights: &Path, confidence: f32) -> Result<Box<dyn Detector>, DetectionError>;
}

/// Loader used when the build has no inference runtime.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnavailableBackend;

impl ModelLoader for UnavailableBackend {
    fn load(&self, weights: &Path, _confidence: f32) -> Result<Box<dyn Detector>, DetectionError> {
        log::error!("No detection backend to load {:?}", weights);
        Err(DetectionError::BackendUnavailable(
            "this build has no inference runtime; plug a ModelLoader into the app".into(),
        ))
    }
}

/// A model bound to its weights and threshold, loaded on demand.
pub struct DetectionEngine<'a> {
    loader: &'a dyn ModelLoader,
    weights: PathBuf,
    confidence: f32,
    detector: Option<Box<dyn Detector>>,
}

impl<'a> DetectionEngine<'a> {
    pub fn new(loader: &'a dyn ModelLoader, weights: impl Into<PathBuf>, confidence: f32) -> Self {
        Self {
            loader,
            weights: weights.into(),
            confidence,
            detector: None,
        }
    }

    pub fn load(&mut self) -> Result<(), DetectionError> {
        if !self.weights.is_file() {
            return Err(DetectionError::LoadFailed {
                path: self.weights.clone(),
                message: "weights file not found".into(),
            });
        }
        log::info!("Loading model from {:?}", self.weights);
        self.detector = Some(self.loader.load(&self.weights, self.confidence)?);
        log::info!("Model loaded");
        Ok(())
    }

    /// Runs the model on one image. Detections under the confidence
    /// threshold are dropped.
    pub fn infer(&mut self, image: &Path) -> Result<Vec<Detection>, DetectionError> {
        let detector = self.detector.as_mut().ok_or(DetectionError::ModelNotLoaded)?;
        let detections = detector.detect(image)?;
        if let Some(bad) = detections
            .iter()
            .find(|d| !d.bbox.iter().all(|v| v.is_finite()))
        {
            return Err(DetectionError::Inference {
                path: image.to_path_buf(),
                message: format!("non-finite box {:?}", bad.bbox),
            });
        }
        Ok(detections
            .into_iter()
            .filter(|d| d.confidence >= self.confidence)
            .collect())
    }
}
