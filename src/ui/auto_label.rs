use eframe::egui;
use std::path::PathBuf;

use crate::app::AnnotationApp;

pub fn auto_label_panel(app: &mut AnnotationApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.heading("Batch auto labelling");
        ui.add_space(8.0);

        let running = app.auto.is_running();
        ui.add_enabled_ui(!running, |ui| {
            egui::Grid::new("auto_label_inputs")
                .num_columns(3)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label("Images folder");
                    path_label(ui, &app.auto.images_dir);
                    if ui.button("Browse...").clicked() {
                        if let Some(dir) = rfd::FileDialog::new().pick_folder() {
                            app.auto.images_dir = Some(dir);
                        }
                    }
                    ui.end_row();

                    ui.label("Model weights");
                    path_label(ui, &app.auto.weights);
                    if ui.button("Browse...").clicked() {
                        if let Some(file) = rfd::FileDialog::new()
                            .add_filter("Model weights", &["pt"])
                            .add_filter("All files", &["*"])
                            .pick_file()
                        {
                            app.auto.weights = Some(file);
                        }
                    }
                    ui.end_row();

                    ui.label("Output folder");
                    path_label(ui, &app.auto.output_dir);
                    if ui.button("Browse...").clicked() {
                        if let Some(dir) = rfd::FileDialog::new().pick_folder() {
                            app.auto.output_dir = Some(dir);
                        }
                    }
                    ui.end_row();

                    ui.label("Confidence");
                    ui.add(egui::Slider::new(&mut app.auto.confidence, 0.0..=1.0).fixed_decimals(2));
                    ui.end_row();
                });
        });

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui
                .add_enabled(!running, egui::Button::new("Run"))
                .clicked()
            {
                app.request_auto_label();
            }
            if ui
                .add_enabled(running, egui::Button::new("Cancel"))
                .clicked()
            {
                app.cancel_auto_label();
            }
        });

        ui.add_space(8.0);
        ui.add(
            egui::ProgressBar::new(app.auto.progress as f32 / 100.0)
                .show_percentage()
                .animate(running),
        );

        if let Some((message, _)) = &app.status_message {
            ui.add_space(8.0);
            ui.label(message);
        }
    });

    overwrite_dialog(app, ctx);
    result_dialog(app, ctx);
}

fn path_label(ui: &mut egui::Ui, path: &Option<PathBuf>) {
    match path {
        Some(p) => ui.label(p.display().to_string()),
        None => ui.weak("not selected"),
    };
}

fn overwrite_dialog(app: &mut AnnotationApp, ctx: &egui::Context) {
    let Some((_, existing)) = &app.auto.pending_overwrite else {
        return;
    };
    let existing = *existing;

    let mut accepted = false;
    let mut declined = false;
    egui::Window::new("Overwrite labels?")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            ui.label(format!(
                "The output folder already holds {} label files. Overwrite them?",
                existing
            ));
            ui.horizontal(|ui| {
                accepted = ui.button("Yes").clicked();
                declined = ui.button("No").clicked();
            });
        });

    if accepted {
        if let Some((job, _)) = app.auto.pending_overwrite.take() {
            app.start_auto_label(job);
        }
    } else if declined {
        app.auto.pending_overwrite = None;
    }
}

fn result_dialog(app: &mut AnnotationApp, ctx: &egui::Context) {
    let Some((message, success)) = &app.auto.result_dialog else {
        return;
    };

    let mut close = false;
    let title = if *success { "Done" } else { "Error" };
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            ui.label(message.as_str());
            close = ui.button("OK").clicked();
        });

    if close {
        app.auto.result_dialog = None;
    }
}
