#![windows_subsystem = "windows"]

mod app;
mod autolabel;
mod canvas;
mod config;
mod detection;
mod error;
mod labels;
mod models;
mod session;
mod ui;
mod utils;

use eframe::egui;
use std::panic;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::app::AnnotationApp;
use crate::config::AppConfig;
use crate::detection::UnavailableBackend;

const APP_TITLE: &str = "Object Detection Dataset Tool";

fn main() {
    let (config, config_error) = match AppConfig::from_env() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.to_level_filter().as_str()),
    )
    .init();

    if let Some(e) = config_error {
        log::error!("Using default configuration: {e}");
    }

    let unsaved = Arc::new(AtomicUsize::new(0));

    let panic_unsaved = unsaved.clone();
    let old_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let count = panic_unsaved.load(Ordering::Relaxed);
        if count > 0 {
            log::error!("Crashed with {count} images holding unsaved edits");
        }
        old_hook(panic_info);
    }));

    let ctrlc_unsaved = unsaved.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        let count = ctrlc_unsaved.load(Ordering::Relaxed);
        if count > 0 {
            log::warn!("Interrupted with {count} images holding unsaved edits");
        }
        std::process::exit(0);
    }) {
        log::warn!("Error setting Ctrl-C handler: {e}");
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_title(APP_TITLE),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        APP_TITLE,
        options,
        Box::new(move |_cc| {
            Ok(Box::new(AnnotationApp::new(
                config,
                Arc::new(UnavailableBackend),
                unsaved,
            )))
        }),
    ) {
        log::error!("Error running native application: {e}");
    }
}
