use eframe::egui;
use std::path::PathBuf;

use crate::app::AnnotationApp;

pub fn side_panel(app: &mut AnnotationApp, ctx: &egui::Context) {
    egui::SidePanel::left("side_panel").show(ctx, |ui| {
        if app.session.is_empty() {
            ui.label("No images loaded");
            return;
        }

        let current = app.session.current_index();
        let mut clicked: Option<PathBuf> = None;

        egui::ScrollArea::vertical()
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                for (index, path) in app.session.images().iter().enumerate() {
                    let mut file_name = path
                        .file_name()
                        .unwrap_or_default()
                        .to_string_lossy()
                        .to_string();
                    if app.session.is_dirty(path) {
                        file_name.push_str(" *");
                    }

                    let is_selected = current == Some(index);
                    let is_saved = app.session.is_saved(path);

                    let button = egui::Button::new(egui::RichText::new(&file_name).color(
                        if is_selected {
                            egui::Color32::YELLOW
                        } else if is_saved {
                            egui::Color32::from_rgb(0, 100, 0)
                        } else {
                            egui::Color32::BLACK
                        },
                    ))
                    .fill(if is_selected {
                        egui::Color32::DARK_BLUE
                    } else {
                        egui::Color32::from_gray(230)
                    });

                    let response = ui.add(button);
                    if response.clicked() {
                        clicked = Some(path.clone());
                    }

                    if is_selected && app.scroll_to_current {
                        response.scroll_to_me(Some(egui::Align::Center));
                        app.scroll_to_current = false;
                    }
                }
            });

        if let Some(path) = clicked {
            app.open_image(&path);
        }
    });
}
