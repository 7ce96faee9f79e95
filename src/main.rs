#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use draw_over::{DrawOverApp, DrawOverConfig};

#[cfg(not(target_arch = "wasm32"))]
const CONFIG_PATH: &str = "draw_over.json";

// When compiling natively:
#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let config = match DrawOverConfig::load(CONFIG_PATH) {
        Ok(config) => {
            log::info!("Loaded configuration from {CONFIG_PATH}");
            config
        }
        Err(draw_over::ConfigError::Read(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            DrawOverConfig::default()
        }
        Err(e) => {
            log::warn!("Ignoring {CONFIG_PATH}: {e}");
            DrawOverConfig::default()
        }
    };

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 640.0])
            .with_min_inner_size([400.0, 300.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Draw Over",
        native_options,
        Box::new(|cc| Ok(Box::new(DrawOverApp::new(cc, config)))),
    )
}

// When compiling to web using trunk:
#[cfg(target_arch = "wasm32")]
fn main() {
    use eframe::wasm_bindgen::JsCast as _;

    // Redirect `log` message to `console.log` and friends:
    eframe::WebLogger::init(log::LevelFilter::Debug).ok();

    let web_options = eframe::WebOptions::default();

    wasm_bindgen_futures::spawn_local(async {
        let document = web_sys::window()
            .expect("No window")
            .document()
            .expect("No document");

        let canvas = document
            .get_element_by_id("the_canvas_id")
            .expect("Failed to find the_canvas_id")
            .dyn_into::<web_sys::HtmlCanvasElement>()
            .expect("the_canvas_id was not a HtmlCanvasElement");

        let start_result = eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(|cc| Ok(Box::new(DrawOverApp::new(cc, DrawOverConfig::default())))),
            )
            .await;

        if let Err(e) = start_result {
            log::error!("Failed to start eframe: {e:?}");
        }
    });
}
