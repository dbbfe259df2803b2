use eframe::egui;
use image::DynamicImage;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::autolabel::{AutoLabelEvent, AutoLabelJob, AutoLabelWorker};
use crate::canvas::{Canvas, CanvasResponse, InteractionMode, Viewport};
use crate::config::AppConfig;
use crate::detection::ModelLoader;
use crate::models::Statistics;
use crate::session::EditorSession;
use crate::utils::resize_to_limit;

const STATUS_SECONDS: f32 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Workflow {
    AutoLabel,
    Edit,
}

/// Inputs and progress of the auto-label workflow.
pub struct AutoLabelState {
    pub images_dir: Option<PathBuf>,
    pub weights: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub confidence: f32,
    pub progress: u8,
    pub worker: Option<AutoLabelWorker>,
    /// Job waiting for the user to accept overwriting existing labels.
    pub pending_overwrite: Option<(AutoLabelJob, usize)>,
    pub result_dialog: Option<(String, bool)>,
}

impl AutoLabelState {
    fn new(confidence: f32) -> Self {
        Self {
            images_dir: None,
            weights: None,
            output_dir: None,
            confidence,
            progress: 0,
            worker: None,
            pending_overwrite: None,
            result_dialog: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }
}

/// The currently displayed image: a size-limited copy for the texture and
/// the original pixel size that box coordinates refer to.
pub struct LoadedImage {
    pub display: DynamicImage,
    pub dims: (u32, u32),
    pub texture: Option<egui::TextureHandle>,
}

impl LoadedImage {
    pub fn size(&self) -> egui::Vec2 {
        egui::vec2(self.dims.0 as f32, self.dims.1 as f32)
    }
}

pub struct AnnotationApp {
    pub config: AppConfig,
    pub workflow: Workflow,
    pub session: EditorSession,
    pub canvas: Canvas,
    pub image: Option<LoadedImage>,
    pub status_message: Option<(String, f32)>,
    pub statistics: Statistics,
    pub scroll_to_current: bool,
    pub show_delete_confirmation: bool,
    pub goto_number: usize,
    pub show_labels: bool,
    pub show_center_points: bool,
    /// Fit the image to the canvas on the next frame.
    pub fit_requested: bool,
    pub auto: AutoLabelState,
    loader: Arc<dyn ModelLoader>,
    unsaved: Arc<AtomicUsize>,
}

impl AnnotationApp {
    pub fn new(config: AppConfig, loader: Arc<dyn ModelLoader>, unsaved: Arc<AtomicUsize>) -> Self {
        let viewport = Viewport::with_limits(config.min_scale, config.max_scale);
        Self {
            canvas: Canvas::new(viewport, config.handle_size),
            auto: AutoLabelState::new(config.default_confidence),
            config,
            workflow: Workflow::AutoLabel,
            session: EditorSession::default(),
            image: None,
            status_message: None,
            statistics: Statistics::default(),
            scroll_to_current: false,
            show_delete_confirmation: false,
            goto_number: 1,
            show_labels: true,
            show_center_points: false,
            fit_requested: false,
            loader,
            unsaved,
        }
    }

    pub fn show_status(&mut self, message: &str) {
        self.status_message = Some((message.to_string(), STATUS_SECONDS));
    }

    pub fn tick_status(&mut self, dt: f32) {
        if let Some((_, remaining)) = &mut self.status_message {
            *remaining -= dt;
            if *remaining <= 0.0 {
                self.status_message = None;
            }
        }
    }

    pub fn select_image_dir(&mut self) {
        let Some(path) = rfd::FileDialog::new().pick_folder() else {
            return;
        };
        match self.session.open(&path) {
            Ok(0) => {
                self.image = None;
                self.canvas.load_boxes(Vec::new());
                self.show_status("No images in this folder");
            }
            Ok(_) => self.load_current(),
            Err(e) => {
                log::error!("Cannot list {:?}: {e}", path);
                self.show_status(&format!("Cannot open folder: {e}"));
            }
        }
        self.update_statistics();
    }

    pub fn select_label_dir(&mut self) {
        if let Some(path) = rfd::FileDialog::new().pick_folder() {
            self.session.set_label_dir(Some(path));
            if self.session.current_path().is_some() {
                self.load_current();
            }
            self.show_status("Label folder set");
        }
    }

    /// Shows the session's current image with its boxes.
    pub fn load_current(&mut self) {
        let Some(path) = self.session.current_path().map(Path::to_path_buf) else {
            self.image = None;
            self.canvas.load_boxes(Vec::new());
            self.update_statistics();
            return;
        };

        match image::open(&path) {
            Ok(img) => {
                let dims = (img.width(), img.height());
                let [max_w, max_h] = self.config.max_texture_size;
                self.image = Some(LoadedImage {
                    display: resize_to_limit(&img, max_w, max_h),
                    dims,
                    texture: None,
                });
                let boxes = match self.session.load_current(dims) {
                    Ok(boxes) => boxes,
                    Err(e) => {
                        log::warn!("Labels for {:?} unreadable: {e}", path);
                        self.show_status(&format!("Label file unreadable: {e}"));
                        Vec::new()
                    }
                };
                self.canvas.load_boxes(boxes);
            }
            Err(e) => {
                log::error!("Failed to load image {:?}: {e}", path);
                self.image = None;
                self.canvas.load_boxes(Vec::new());
                self.show_status("Failed to load image");
            }
        }

        self.canvas.set_mode(InteractionMode::Navigate);
        self.goto_number = self.session.current_index().map_or(1, |i| i + 1);
        self.scroll_to_current = true;
        self.update_statistics();
    }

    pub fn next_image(&mut self) {
        if self.session.next() {
            self.load_current();
        }
    }

    pub fn prev_image(&mut self) {
        if self.session.prev() {
            self.load_current();
        }
    }

    pub fn go_to_image(&mut self, number: usize) {
        if number >= 1 && self.session.go_to(number - 1) {
            self.load_current();
        }
    }

    pub fn open_image(&mut self, path: &Path) {
        if self.session.go_to_path(path) {
            self.load_current();
        }
    }

    pub fn go_back(&mut self) {
        if self.session.back() {
            self.load_current();
        }
    }

    pub fn random_unsaved(&mut self) {
        if self.session.random_unsaved(&mut rand::rng()) {
            self.load_current();
        } else {
            self.show_status("No unsaved images left");
        }
    }

    pub fn set_mode(&mut self, mode: InteractionMode) {
        if self.canvas.mode() != mode {
            let response = self.canvas.set_mode(mode);
            self.on_canvas_response(response);
            self.show_status(mode.label());
        }
    }

    pub fn set_class(&mut self, class_id: u32) {
        self.canvas.new_box_class = class_id;
        let response = self.canvas.set_selected_class(class_id);
        self.on_canvas_response(response);
    }

    pub fn select_box(&mut self, index: usize) {
        let response = self.canvas.select(Some(index));
        if let Some(bbox) = self.canvas.store().selected() {
            self.canvas.new_box_class = bbox.class_id;
        }
        self.on_canvas_response(response);
    }

    /// Pushes box edits into the session so they survive navigation.
    pub fn on_canvas_response(&mut self, response: CanvasResponse) {
        if response.boxes_changed {
            self.session.store_current(self.canvas.snapshot_boxes());
            self.update_statistics();
        }
    }

    pub fn save_annotations(&mut self) {
        let Some(dims) = self.image.as_ref().map(|img| img.dims) else {
            return;
        };
        let boxes = self.canvas.snapshot_boxes();
        match self.session.save_current(&boxes, dims) {
            Ok(_) => self.show_status("Saved"),
            Err(e) => {
                log::error!("Save failed: {e}");
                self.show_status(&format!("Save failed: {e}"));
            }
        }
        self.update_statistics();
    }

    pub fn delete_current_image(&mut self) {
        let outcome = self.session.delete_current();
        if outcome.deleted.is_none() {
            return;
        }
        self.load_current();
        if outcome.notices.is_empty() {
            self.show_status("Image deleted");
        } else {
            self.show_status(&outcome.notices.join("; "));
        }
    }

    pub fn fit_to_view(&mut self, available: egui::Vec2) {
        if let Some(img) = &self.image {
            self.canvas.viewport_mut().fit(img.size(), available);
        }
    }

    pub fn update_statistics(&mut self) {
        let mut stats = Statistics {
            total_images: self.session.len(),
            saved_images: self.session.saved_images().len(),
            dirty_images: self.session.dirty_images().len(),
            ..Default::default()
        };
        for bbox in self.canvas.boxes() {
            *stats.current_class_counts.entry(bbox.class_id).or_insert(0) += 1;
        }
        self.unsaved.store(stats.dirty_images, Ordering::Relaxed);
        self.statistics = stats;
    }

    pub fn auto_label_job(&self) -> Option<AutoLabelJob> {
        Some(AutoLabelJob {
            images_dir: self.auto.images_dir.clone()?,
            output_dir: self.auto.output_dir.clone()?,
            weights: self.auto.weights.clone()?,
            confidence: self.auto.confidence,
        })
    }

    /// Validates the inputs and asks before overwriting existing labels.
    pub fn request_auto_label(&mut self) {
        let Some(job) = self.auto_label_job() else {
            self.show_status("Choose the images folder, weights and output folder first");
            return;
        };
        if let Err(e) = job.prepare() {
            self.auto.result_dialog = Some((e.to_string(), false));
            return;
        }
        let existing = job.existing_labels().len();
        if existing > 0 {
            self.auto.pending_overwrite = Some((job, existing));
        } else {
            self.start_auto_label(job);
        }
    }

    pub fn start_auto_label(&mut self, job: AutoLabelJob) {
        log::info!("Starting auto labelling of {:?}", job.images_dir);
        self.auto.progress = 0;
        match AutoLabelWorker::spawn(job, self.loader.clone()) {
            Ok(worker) => self.auto.worker = Some(worker),
            Err(e) => self.auto.result_dialog = Some((e.to_string(), false)),
        }
    }

    pub fn poll_auto_label(&mut self, ctx: &egui::Context) {
        let Some(worker) = &mut self.auto.worker else {
            return;
        };
        for event in worker.poll() {
            match event {
                AutoLabelEvent::Progress(p) => self.auto.progress = p,
                AutoLabelEvent::Finished(summary) => {
                    let text = if summary.cancelled {
                        format!(
                            "Auto labelling cancelled: {} of {} images labelled.",
                            summary.labelled, summary.total
                        )
                    } else {
                        format!(
                            "Auto labelling finished: {} labelled, {} skipped.",
                            summary.labelled, summary.skipped
                        )
                    };
                    self.auto.result_dialog = Some((text, true));
                }
                AutoLabelEvent::Failed(message) => {
                    self.auto.result_dialog = Some((message, false));
                }
            }
        }
        if worker.is_done() {
            self.auto.worker = None;
        } else {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }

    pub fn cancel_auto_label(&mut self) {
        if let Some(worker) = &self.auto.worker {
            worker.cancel();
            self.show_status("Stopping after the current image");
        }
    }

    pub fn on_exit(&mut self) {
        let dirty = self.session.dirty_images();
        if !dirty.is_empty() {
            log::warn!("Exiting with {} unsaved images", dirty.len());
        }
        if let Some(worker) = &self.auto.worker {
            worker.cancel();
        }
    }
}

impl eframe::App for AnnotationApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let dt = ctx.input(|i| i.stable_dt);
        self.tick_status(dt);
        if self.status_message.is_some() {
            ctx.request_repaint_after(std::time::Duration::from_millis(250));
        }
        self.poll_auto_label(ctx);

        crate::ui::top::top_panel(self, ctx);
        match self.workflow {
            Workflow::AutoLabel => crate::ui::auto_label::auto_label_panel(self, ctx),
            Workflow::Edit => {
                crate::ui::side::side_panel(self, ctx);
                crate::ui::statistics::statistics_panel(self, ctx);
                crate::ui::central::central_panel(self, ctx);
            }
        }
    }
}

impl Drop for AnnotationApp {
    fn drop(&mut self) {
        self.on_exit();
    }
}
