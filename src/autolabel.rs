//! Batch auto labelling on a background thread.
//!
//! The pipeline itself is synchronous ([`run_batch`]); [`AutoLabelWorker`]
//! runs it on its own thread and hands events back over a channel that the
//! UI polls every frame.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

use thiserror::Error;

use crate::detection::{DetectionEngine, ModelLoader};
use crate::labels::{self, LabelEntry};

/// Progress reported once the model has loaded.
const MODEL_LOADED_PROGRESS: u8 = 5;

#[derive(Clone, Debug, PartialEq)]
pub enum AutoLabelEvent {
    /// Percentage in `0..=100`.
    Progress(u8),
    Finished(BatchSummary),
    Failed(String),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub labelled: usize,
    pub skipped: usize,
    pub cancelled: bool,
}

#[derive(Error, Debug)]
pub enum JobError {
    #[error("Images folder does not exist: {0:?}")]
    MissingImagesDir(PathBuf),

    #[error("Weights file does not exist: {0:?}")]
    MissingWeights(PathBuf),

    #[error("Cannot create output folder {path:?}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot start worker thread: {0}")]
    Spawn(#[source] std::io::Error),
}

#[derive(Clone, Debug, PartialEq)]
pub struct AutoLabelJob {
    pub images_dir: PathBuf,
    pub output_dir: PathBuf,
    pub weights: PathBuf,
    pub confidence: f32,
}

impl AutoLabelJob {
    /// Checks the inputs and creates the output folder if needed.
    pub fn prepare(&self) -> Result<(), JobError> {
        if !self.images_dir.is_dir() {
            return Err(JobError::MissingImagesDir(self.images_dir.clone()));
        }
        if !self.weights.is_file() {
            return Err(JobError::MissingWeights(self.weights.clone()));
        }
        std::fs::create_dir_all(&self.output_dir).map_err(|source| JobError::OutputDir {
            path: self.output_dir.clone(),
            source,
        })
    }

    /// Label files that a run would overwrite.
    pub fn existing_labels(&self) -> Vec<PathBuf> {
        labels::existing_labels(&self.output_dir)
    }
}

fn progress_after(done: usize, total: usize) -> u8 {
    let span = (100 - MODEL_LOADED_PROGRESS) as usize;
    MODEL_LOADED_PROGRESS + (done * span / total.max(1)) as u8
}

/// Runs the whole batch on the calling thread.
///
/// Exactly one terminal event (`Finished` or `Failed`) is sent. Failures on
/// a single image are logged and the image is skipped. `cancel` is only
/// checked between images.
pub fn run_batch(
    job: &AutoLabelJob,
    loader: &dyn ModelLoader,
    cancel: &AtomicBool,
    tx: &Sender<AutoLabelEvent>,
) {
    let send = |event: AutoLabelEvent| {
        // receiver gone means the UI went away, nothing left to report to
        let _ = tx.send(event);
    };

    let images = match labels::list_images(&job.images_dir) {
        Ok(images) => images,
        Err(e) => {
            send(AutoLabelEvent::Failed(format!(
                "Cannot read images folder {:?}: {e}",
                job.images_dir
            )));
            return;
        }
    };
    if images.is_empty() {
        send(AutoLabelEvent::Failed(
            "No images found in the selected folder.".into(),
        ));
        return;
    }

    send(AutoLabelEvent::Progress(0));
    let mut engine = DetectionEngine::new(loader, &job.weights, job.confidence);
    if let Err(e) = engine.load() {
        log::error!("Model load failed: {e}");
        send(AutoLabelEvent::Failed(format!("Auto labelling failed: {e}")));
        return;
    }
    send(AutoLabelEvent::Progress(MODEL_LOADED_PROGRESS));

    let total = images.len();
    let mut summary = BatchSummary {
        total,
        ..Default::default()
    };
    for (i, image) in images.iter().enumerate() {
        if cancel.load(Ordering::Relaxed) {
            log::info!("Auto labelling cancelled after {i} of {total} images");
            summary.cancelled = true;
            break;
        }

        match label_one(&mut engine, image, &job.output_dir) {
            Ok(count) => {
                log::debug!("{:?}: {count} detections", image);
                summary.labelled += 1;
            }
            Err(e) => {
                log::warn!("Failed to process {:?}: {e}", image);
                summary.skipped += 1;
            }
        }
        send(AutoLabelEvent::Progress(progress_after(i + 1, total)));
    }

    log::info!(
        "Auto labelling done: {} labelled, {} skipped of {}",
        summary.labelled,
        summary.skipped,
        summary.total
    );
    send(AutoLabelEvent::Finished(summary));
}

fn label_one(
    engine: &mut DetectionEngine<'_>,
    image: &Path,
    output_dir: &Path,
) -> Result<usize, Box<dyn std::error::Error + Send + Sync>> {
    let detections = engine.infer(image)?;
    let dims = labels::image_dimensions(image)?;
    let entries: Vec<LabelEntry> = detections.iter().map(|d| d.to_label_entry(dims)).collect();
    labels::write_labels(&labels::label_path_for(image, Some(output_dir)), &entries)?;
    Ok(entries.len())
}

/// A batch running on its own thread.
pub struct AutoLabelWorker {
    rx: Receiver<AutoLabelEvent>,
    cancel: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
    done: bool,
}

impl AutoLabelWorker {
    pub fn spawn(job: AutoLabelJob, loader: Arc<dyn ModelLoader>) -> Result<Self, JobError> {
        let (tx, rx) = mpsc::channel();
        let cancel = Arc::new(AtomicBool::new(false));
        let thread_cancel = cancel.clone();

        let handle = thread::Builder::new()
            .name("auto-label".into())
            .spawn(move || run_batch(&job, loader.as_ref(), &thread_cancel, &tx))
            .map_err(JobError::Spawn)?;

        Ok(Self {
            rx,
            cancel,
            handle: Some(handle),
            done: false,
        })
    }

    /// Drains pending events without blocking.
    pub fn poll(&mut self) -> Vec<AutoLabelEvent> {
        let mut events = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(event) => {
                    if matches!(
                        event,
                        AutoLabelEvent::Finished(_) | AutoLabelEvent::Failed(_)
                    ) {
                        self.done = true;
                    }
                    events.push(event);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.done {
                        self.done = true;
                        events.push(AutoLabelEvent::Failed(
                            "Auto labelling worker stopped unexpectedly".into(),
                        ));
                    }
                    break;
                }
            }
        }
        if self.done {
            if let Some(handle) = self.handle.take() {
                let _ = handle.join();
            }
        }
        events
    }

    /// Stops the batch before the next image.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn is_done(&self) -> bool {
        self.done
    }
}

impl Drop for AutoLabelWorker {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::{Detection, Detector};
    use crate::error::DetectionError;
    use std::fs;
    use std::sync::Mutex;
    use std::time::{Duration, Instant};
    use tempfile::TempDir;

    struct FixedDetector {
        seen: Arc<Mutex<Vec<PathBuf>>>,
    }

    impl Detector for FixedDetector {
        fn detect(&mut self, image: &Path) -> Result<Vec<Detection>, DetectionError> {
            self.seen.lock().unwrap().push(image.to_path_buf());
            if image.to_string_lossy().contains("bad") {
                return Err(DetectionError::Inference {
                    path: image.to_path_buf(),
                    message: "corrupt".into(),
                });
            }
            Ok(vec![Detection {
                class_id: 1,
                confidence: 0.8,
                bbox: [0.0, 0.0, 4.0, 3.0],
            }])
        }
    }

    #[derive(Default)]
    struct FixedLoader {
        seen: Arc<Mutex<Vec<PathBuf>>>,
        loads: Mutex<usize>,
        fail: bool,
    }

    impl ModelLoader for FixedLoader {
        fn load(&self, weights: &Path, _conf: f32) -> Result<Box<dyn Detector>, DetectionError> {
            *self.loads.lock().unwrap() += 1;
            if self.fail {
                return Err(DetectionError::LoadFailed {
                    path: weights.to_path_buf(),
                    message: "no device".into(),
                });
            }
            Ok(Box::new(FixedDetector {
                seen: self.seen.clone(),
            }))
        }
    }

    fn write_image(dir: &Path, name: &str) {
        image::RgbImage::new(8, 6).save(dir.join(name)).unwrap();
    }

    fn job(root: &TempDir) -> AutoLabelJob {
        let images_dir = root.path().join("images");
        fs::create_dir_all(&images_dir).unwrap();
        let weights = root.path().join("model.pt");
        fs::write(&weights, b"weights").unwrap();
        AutoLabelJob {
            images_dir,
            output_dir: root.path().join("labels"),
            weights,
            confidence: 0.25,
        }
    }

    fn run(job: &AutoLabelJob, loader: &FixedLoader) -> Vec<AutoLabelEvent> {
        let (tx, rx) = mpsc::channel();
        run_batch(job, loader, &AtomicBool::new(false), &tx);
        drop(tx);
        rx.iter().collect()
    }

    #[test]
    fn labels_every_image() {
        let root = TempDir::new().unwrap();
        let job = job(&root);
        write_image(&job.images_dir, "a.png");
        write_image(&job.images_dir, "b.png");
        job.prepare().unwrap();

        let events = run(&job, &FixedLoader::default());

        assert_eq!(
            events,
            [
                AutoLabelEvent::Progress(0),
                AutoLabelEvent::Progress(5),
                AutoLabelEvent::Progress(52),
                AutoLabelEvent::Progress(100),
                AutoLabelEvent::Finished(BatchSummary {
                    total: 2,
                    labelled: 2,
                    skipped: 0,
                    cancelled: false,
                }),
            ]
        );
        let text = fs::read_to_string(job.output_dir.join("a.txt")).unwrap();
        assert_eq!(text, "1 0.250000 0.250000 0.500000 0.500000\n");
    }

    #[test]
    fn empty_folder_fails_before_loading_model() {
        let root = TempDir::new().unwrap();
        let job = job(&root);
        let loader = FixedLoader::default();

        let events = run(&job, &loader);

        assert!(matches!(events.as_slice(), [AutoLabelEvent::Failed(_)]));
        assert_eq!(*loader.loads.lock().unwrap(), 0);
    }

    #[test]
    fn load_failure_is_a_single_error() {
        let root = TempDir::new().unwrap();
        let job = job(&root);
        write_image(&job.images_dir, "a.png");
        job.prepare().unwrap();
        let loader = FixedLoader {
            fail: true,
            ..Default::default()
        };

        let events = run(&job, &loader);

        assert_eq!(events.len(), 2);
        assert_eq!(events[0], AutoLabelEvent::Progress(0));
        match &events[1] {
            AutoLabelEvent::Failed(msg) => assert!(msg.contains("no device"), "{msg}"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(loader.seen.lock().unwrap().is_empty());
        assert!(!job.output_dir.join("a.txt").exists());
    }

    #[test]
    fn failing_image_is_skipped() {
        let root = TempDir::new().unwrap();
        let job = job(&root);
        write_image(&job.images_dir, "a.png");
        write_image(&job.images_dir, "bad.png");
        write_image(&job.images_dir, "c.png");
        job.prepare().unwrap();

        let events = run(&job, &FixedLoader::default());

        let progress: Vec<u8> = events
            .iter()
            .filter_map(|e| match e {
                AutoLabelEvent::Progress(p) => Some(*p),
                _ => None,
            })
            .collect();
        assert!(progress.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(progress.last(), Some(&100));
        assert_eq!(
            events.last(),
            Some(&AutoLabelEvent::Finished(BatchSummary {
                total: 3,
                labelled: 2,
                skipped: 1,
                cancelled: false,
            }))
        );
        assert!(job.output_dir.join("a.txt").exists());
        assert!(!job.output_dir.join("bad.txt").exists());
        assert!(job.output_dir.join("c.txt").exists());
    }

    #[test]
    fn cancel_stops_between_images() {
        let root = TempDir::new().unwrap();
        let job = job(&root);
        write_image(&job.images_dir, "a.png");
        job.prepare().unwrap();
        let loader = FixedLoader::default();

        let (tx, rx) = mpsc::channel();
        run_batch(&job, &loader, &AtomicBool::new(true), &tx);
        drop(tx);
        let events: Vec<_> = rx.iter().collect();

        assert!(loader.seen.lock().unwrap().is_empty());
        assert!(matches!(
            events.last(),
            Some(AutoLabelEvent::Finished(BatchSummary {
                cancelled: true,
                ..
            }))
        ));
    }

    #[test]
    fn prepare_checks_inputs() {
        let root = TempDir::new().unwrap();
        let mut job = job(&root);
        job.weights = root.path().join("missing.pt");
        assert!(matches!(job.prepare(), Err(JobError::MissingWeights(_))));

        job.images_dir = root.path().join("nowhere");
        assert!(matches!(job.prepare(), Err(JobError::MissingImagesDir(_))));
    }

    #[test]
    fn worker_reports_over_channel() {
        let root = TempDir::new().unwrap();
        let job = job(&root);
        write_image(&job.images_dir, "a.jpg");
        job.prepare().unwrap();

        let mut worker = AutoLabelWorker::spawn(job, Arc::new(FixedLoader::default())).unwrap();
        let deadline = Instant::now() + Duration::from_secs(10);
        let mut events = Vec::new();
        while !worker.is_done() && Instant::now() < deadline {
            events.extend(worker.poll());
            thread::sleep(Duration::from_millis(5));
        }

        assert!(matches!(
            events.last(),
            Some(AutoLabelEvent::Finished(BatchSummary { labelled: 1, .. }))
        ));
    }
}
