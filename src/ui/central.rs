use eframe::egui;

use crate::app::AnnotationApp;
use crate::canvas::{CanvasEvent, CanvasResponse, Handle, InteractionMode, PointerButton};
use crate::utils::to_color_image;

const SELECTED_COLOR: egui::Color32 = egui::Color32::GREEN;
const BOX_COLOR: egui::Color32 = egui::Color32::RED;
const PENDING_COLOR: egui::Color32 = egui::Color32::YELLOW;

pub fn central_panel(app: &mut AnnotationApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        if app.image.is_none() {
            ui.centered_and_justified(|ui| {
                ui.label("Select an image folder to start labelling");
            });
            return;
        }

        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let rect = response.rect;

        if app.fit_requested {
            app.fit_to_view(rect.size());
            app.fit_requested = false;
        }

        // Edits land on the current image before a key can navigate away.
        let mut changes = CanvasResponse::default();
        for event in canvas_events(ui, &response, rect.min) {
            changes.merge(app.canvas.handle(event));
        }
        app.on_canvas_response(changes);
        if !ctx.wants_keyboard_input() {
            handle_keys(app, ui, rect.size());
        }

        paint(app, ui, &painter, rect);
        update_cursor(app, ui, &response, rect.min);
    });
}

/// Translates this frame's raw input into canvas events in widget space.
fn canvas_events(ui: &egui::Ui, response: &egui::Response, origin: egui::Pos2) -> Vec<CanvasEvent> {
    let local = |pos: egui::Pos2| (pos - origin).to_pos2();
    let hovered = response.hovered();

    ui.input(|i| {
        let mut events = Vec::new();
        for event in &i.events {
            match event {
                egui::Event::PointerButton {
                    pos,
                    button,
                    pressed,
                    ..
                } => {
                    let Some(button) = map_button(*button) else {
                        continue;
                    };
                    if *pressed {
                        if hovered {
                            events.push(CanvasEvent::PointerDown {
                                pos: local(*pos),
                                button,
                            });
                        }
                    } else {
                        events.push(CanvasEvent::PointerUp {
                            pos: local(*pos),
                            button,
                        });
                    }
                }
                egui::Event::PointerMoved(pos) => {
                    events.push(CanvasEvent::PointerMove { pos: local(*pos) });
                }
                egui::Event::MouseWheel { unit, delta, .. } if hovered => {
                    let Some(pos) = i.pointer.hover_pos() else {
                        continue;
                    };
                    let per_unit = match unit {
                        egui::MouseWheelUnit::Point => 120.0 / 50.0,
                        egui::MouseWheelUnit::Line => 120.0,
                        egui::MouseWheelUnit::Page => 120.0 * 3.0,
                    };
                    events.push(CanvasEvent::Wheel {
                        pos: local(pos),
                        delta: delta.y * per_unit,
                    });
                }
                _ => {}
            }
        }
        events
    })
}

fn map_button(button: egui::PointerButton) -> Option<PointerButton> {
    match button {
        egui::PointerButton::Primary => Some(PointerButton::Primary),
        egui::PointerButton::Middle => Some(PointerButton::Middle),
        egui::PointerButton::Secondary => Some(PointerButton::Secondary),
        _ => None,
    }
}

const DIGIT_KEYS: [egui::Key; 10] = [
    egui::Key::Num0,
    egui::Key::Num1,
    egui::Key::Num2,
    egui::Key::Num3,
    egui::Key::Num4,
    egui::Key::Num5,
    egui::Key::Num6,
    egui::Key::Num7,
    egui::Key::Num8,
    egui::Key::Num9,
];

fn handle_keys(app: &mut AnnotationApp, ui: &egui::Ui, available: egui::Vec2) {
    if ui.input_mut(|i| i.consume_key(egui::Modifiers::COMMAND, egui::Key::S)) {
        app.save_annotations();
        return;
    }

    let pressed = |key: egui::Key| ui.input(|i| i.key_pressed(key));

    if pressed(egui::Key::Delete) {
        let response = app.canvas.handle(CanvasEvent::DeleteSelected);
        app.on_canvas_response(response);
    }
    if pressed(egui::Key::A) || pressed(egui::Key::W) {
        app.prev_image();
    }
    if pressed(egui::Key::D) || pressed(egui::Key::S) {
        app.next_image();
    }
    if pressed(egui::Key::Space) {
        app.random_unsaved();
    }
    if pressed(egui::Key::B) {
        app.go_back();
    }
    if pressed(egui::Key::E) {
        let mode = if app.canvas.mode() == InteractionMode::Mark {
            InteractionMode::Navigate
        } else {
            InteractionMode::Mark
        };
        app.set_mode(mode);
    }
    if pressed(egui::Key::Escape) {
        app.set_mode(InteractionMode::Navigate);
    }
    if pressed(egui::Key::F) {
        app.fit_to_view(available);
    }
    for (class_id, key) in DIGIT_KEYS.iter().enumerate() {
        if pressed(*key) {
            app.set_class(class_id as u32);
            app.show_status(&format!("Class {}", class_id));
        }
    }
}

fn paint(app: &mut AnnotationApp, ui: &egui::Ui, painter: &egui::Painter, rect: egui::Rect) {
    let painter = painter.with_clip_rect(rect);
    let origin = rect.min.to_vec2();
    let viewport = *app.canvas.viewport();
    let to_screen = |p: egui::Pos2| viewport.to_widget(p) + origin;

    if let Some(image) = &mut app.image {
        let size = image.size();
        let texture = image.texture.get_or_insert_with(|| {
            ui.ctx().load_texture(
                "current_image",
                to_color_image(&image.display),
                Default::default(),
            )
        });
        painter.image(
            texture.id(),
            egui::Rect::from_min_max(to_screen(egui::Pos2::ZERO), to_screen(size.to_pos2())),
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );
    }

    let selected = app.canvas.store().selected_index();
    for (i, bbox) in app.canvas.boxes().iter().enumerate() {
        let is_selected = selected == Some(i);
        let color = if is_selected { SELECTED_COLOR } else { BOX_COLOR };
        let width = if is_selected { 3.0 } else { 2.0 };
        let box_rect = app.canvas.widget_rect(bbox).translate(origin);

        painter.rect_stroke(
            box_rect,
            0.0,
            egui::Stroke::new(width, color),
            egui::StrokeKind::Middle,
        );

        if app.show_labels {
            painter.text(
                box_rect.min,
                egui::Align2::LEFT_BOTTOM,
                format!("Class {}", bbox.class_id),
                egui::FontId::default(),
                color,
            );
        }

        if app.show_center_points {
            let center = to_screen(bbox.center());
            let arm = 10.0;
            painter.circle_filled(center, 2.5, color);
            painter.line_segment(
                [center - egui::vec2(arm, 0.0), center + egui::vec2(arm, 0.0)],
                egui::Stroke::new(1.0, color),
            );
            painter.line_segment(
                [center - egui::vec2(0.0, arm), center + egui::vec2(0.0, arm)],
                egui::Stroke::new(1.0, color),
            );
        }
    }

    if app.canvas.mode() == InteractionMode::Select {
        if let Some(bbox) = app.canvas.store().selected() {
            let half = app.canvas.handle_size() / 2.0;
            for handle in Handle::CORNERS {
                if let Some(corner) = handle.corner_of(bbox) {
                    painter.rect_filled(
                        egui::Rect::from_center_size(to_screen(corner), egui::vec2(half, half) * 2.0),
                        0.0,
                        SELECTED_COLOR,
                    );
                }
            }
        }
    }

    if let Some(pending) = app.canvas.pending_box() {
        let r = app.canvas.widget_rect(&pending).translate(origin);
        let outline = [
            r.left_top(),
            r.right_top(),
            r.right_bottom(),
            r.left_bottom(),
            r.left_top(),
        ];
        painter.extend(egui::Shape::dashed_line(
            &outline,
            egui::Stroke::new(2.0, PENDING_COLOR),
            6.0,
            4.0,
        ));
    }
}

fn update_cursor(app: &AnnotationApp, ui: &egui::Ui, response: &egui::Response, origin: egui::Pos2) {
    if app.canvas.is_panning() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);
        return;
    }
    if let Some(handle) = app.canvas.active_handle() {
        ui.ctx().set_cursor_icon(handle.cursor());
        return;
    }
    let Some(pos) = response.hover_pos() else {
        return;
    };
    let local = (pos - origin).to_pos2();
    if let Some(handle) = app.canvas.hover_handle(local) {
        ui.ctx().set_cursor_icon(handle.cursor());
    } else if app.canvas.mode() == InteractionMode::Mark {
        ui.ctx().set_cursor_icon(egui::CursorIcon::Crosshair);
    }
}
