use eframe::egui;

use crate::app::{AnnotationApp, Workflow};

pub fn top_panel(app: &mut AnnotationApp, ctx: &egui::Context) {
    egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.selectable_value(&mut app.workflow, Workflow::AutoLabel, "Auto Label");
            ui.selectable_value(&mut app.workflow, Workflow::Edit, "Edit");
            ui.separator();

            if app.workflow != Workflow::Edit {
                return;
            }

            if ui.button("Select image folder").clicked() {
                app.select_image_dir();
            }
            if ui.button("Select label folder").clicked() {
                app.select_label_dir();
            }
            ui.checkbox(&mut app.show_labels, "Labels");
            ui.checkbox(&mut app.show_center_points, "Centers");

            if let Some(dir) = app.session.images_dir() {
                ui.label(format!("Images: {}", dir.display()));
            }
            if let Some(dir) = app.session.label_dir() {
                ui.label(format!("Labels: {}", dir.display()));
            }
        });
    });
}
