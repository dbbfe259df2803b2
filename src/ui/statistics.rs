use eframe::egui;
use std::path::PathBuf;

use crate::app::AnnotationApp;
use crate::canvas::InteractionMode;

pub fn statistics_panel(app: &mut AnnotationApp, ctx: &egui::Context) {
    egui::SidePanel::right("statistics_panel")
        .default_width(220.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                statistics_section(app, ui);
                ui.separator();
                mode_section(app, ui);
                ui.separator();
                navigation_section(app, ui);
                ui.separator();
                boxes_section(app, ui);
                ui.separator();
                saved_section(app, ui);
                ui.separator();
                delete_section(app, ui);

                if let Some((message, _)) = &app.status_message {
                    ui.separator();
                    ui.label(message);
                }
            });
        });
}

fn statistics_section(app: &AnnotationApp, ui: &mut egui::Ui) {
    let stats = &app.statistics;
    ui.heading("Statistics");
    ui.label(format!("Images: {}", stats.total_images));
    ui.label(format!("Saved: {}", stats.saved_images));
    ui.label(format!("Unsaved edits: {}", stats.dirty_images));
    ui.label(format!("Progress: {:.1}%", stats.progress_percent()));

    if !stats.current_class_counts.is_empty() {
        ui.label("Current image:");
        for (class, count) in &stats.current_class_counts {
            ui.label(format!("  Class {}: {}", class, count));
        }
    }
}

fn mode_section(app: &mut AnnotationApp, ui: &mut egui::Ui) {
    ui.heading("Mode");
    ui.horizontal(|ui| {
        for mode in InteractionMode::ALL {
            if ui
                .selectable_label(app.canvas.mode() == mode, mode.label())
                .clicked()
            {
                app.set_mode(mode);
            }
        }
    });

    let mut class_id = app.canvas.new_box_class;
    ui.horizontal(|ui| {
        ui.label("Class");
        if ui
            .add(egui::DragValue::new(&mut class_id).range(0..=999))
            .changed()
        {
            app.set_class(class_id);
        }
    });

    ui.label(format!("Zoom: {:.0}%", app.canvas.viewport().scale() * 100.0));

    if app.canvas.mode() == InteractionMode::Select {
        ui.label("Del removes the selected box");
    }
}

fn navigation_section(app: &mut AnnotationApp, ui: &mut egui::Ui) {
    ui.heading("Navigation");
    ui.label(app.session.position_label());
    ui.horizontal(|ui| {
        if ui.button("< Prev").clicked() {
            app.prev_image();
        }
        if ui.button("Next >").clicked() {
            app.next_image();
        }
        if ui.button("Back").clicked() {
            app.go_back();
        }
    });
    ui.horizontal(|ui| {
        let max = app.session.len().max(1);
        ui.add(egui::DragValue::new(&mut app.goto_number).range(1..=max));
        if ui.button("Go").clicked() {
            app.go_to_image(app.goto_number);
        }
        if ui.button("Random unsaved").clicked() {
            app.random_unsaved();
        }
    });
    ui.horizontal(|ui| {
        if ui.button("Save").clicked() {
            app.save_annotations();
        }
        if ui.button("Fit").clicked() {
            app.fit_requested = true;
        }
    });
}

fn boxes_section(app: &mut AnnotationApp, ui: &mut egui::Ui) {
    ui.heading(format!("Boxes ({})", app.canvas.store().len()));
    if app.canvas.store().is_empty() {
        ui.weak("No boxes on this image");
    }
    let selected = app.canvas.store().selected_index();
    let mut clicked = None;
    for (index, bbox) in app.canvas.boxes().iter().enumerate() {
        let text = format!("{}: {}", index + 1, bbox.describe());
        if ui.selectable_label(selected == Some(index), text).clicked() {
            clicked = Some(index);
        }
    }
    if let Some(index) = clicked {
        app.select_box(index);
    }
}

fn saved_section(app: &mut AnnotationApp, ui: &mut egui::Ui) {
    let saved = app.session.saved_images();
    let mut clicked: Option<PathBuf> = None;
    egui::CollapsingHeader::new(format!("Saved this session ({})", saved.len()))
        .default_open(false)
        .show(ui, |ui| {
            for path in saved {
                let name = path.file_name().unwrap_or_default().to_string_lossy();
                if ui.link(name).clicked() {
                    clicked = Some(path.clone());
                }
            }
        });
    if let Some(path) = clicked {
        app.open_image(&path);
    }
}

fn delete_section(app: &mut AnnotationApp, ui: &mut egui::Ui) {
    if ui
        .add_enabled(
            app.session.current_path().is_some(),
            egui::Button::new("Delete image and label"),
        )
        .clicked()
    {
        app.show_delete_confirmation = true;
    }

    if !app.show_delete_confirmation {
        return;
    }

    let mut confirmed = false;
    let mut cancelled = false;
    egui::Window::new("Confirm delete")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ui.ctx(), |ui| {
            ui.label("Delete the current image and its label file?");
            ui.horizontal(|ui| {
                confirmed = ui.button("Delete").clicked();
                cancelled = ui.button("Cancel").clicked();
            });
        });

    if confirmed {
        app.delete_current_image();
    }
    if confirmed || cancelled {
        app.show_delete_confirmation = false;
    }
}
