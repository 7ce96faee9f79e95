use crate::config::DrawOverConfig;
use crate::input::HostElement;
use crate::panels::{CanvasOverlay, ControlPanel};
use crate::persistence::PersistedDrawing;
use crate::surface::DrawOver;

const HOST_TEXT: &str = "Draw Over lays a transparent drawing surface on top of this page. \
Press \"Draw\" to start marking it up, pick a color or the eraser from the controls, \
and press \"Stop drawing\" to get the page back. Selecting this text is disabled while \
the surface is mounted.";

/// We derive Deserialize/Serialize so we can persist app state on shutdown.
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct DrawOverApp {
    config: DrawOverConfig,
    /// Drawing from the last run, applied once the surface exists
    drawing: Option<PersistedDrawing>,
    #[serde(skip)]
    surface: Option<DrawOver>,
    #[serde(skip)]
    panel: Option<ControlPanel>,
    #[serde(skip)]
    overlay: CanvasOverlay,
}

impl Default for DrawOverApp {
    fn default() -> Self {
        Self {
            config: DrawOverConfig::default(),
            drawing: None,
            surface: None,
            panel: None,
            overlay: CanvasOverlay::default(),
        }
    }
}

impl DrawOverApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, config: DrawOverConfig) -> Self {
        let drawing = cc
            .storage
            .and_then(|storage| eframe::get_value::<DrawOverApp>(storage, eframe::APP_KEY))
            .and_then(|saved| saved.drawing);

        if let Some(drawing) = &drawing {
            log::info!("Found a drawing saved at {}", drawing.saved_at);
        }

        Self {
            config,
            drawing,
            ..Default::default()
        }
    }

    /// Creates the surface the first time the host has a usable size
    fn ensure_surface(&mut self, host: HostElement) {
        if self.surface.is_none() && host.is_usable() {
            match DrawOver::new(host, self.config.clone()) {
                Ok(mut surface) => {
                    if let Some(drawing) = self.drawing.take() {
                        if let Err(e) = drawing.restore(&mut surface) {
                            log::error!("Failed to restore saved drawing: {e}");
                        }
                    }
                    self.panel = Some(ControlPanel::bind(&surface));
                    self.surface = Some(surface);
                }
                Err(e) => log::error!("Failed to create drawing surface: {e}"),
            }
        }
    }

    fn host_page(&mut self, ui: &mut egui::Ui, toggle: bool) {
        ui.heading("Draw Over");
        ui.label(HOST_TEXT);

        let host = HostElement::new(ui.max_rect(), ui.ctx().pixels_per_point());
        self.ensure_surface(host);
        let Some(surface) = self.surface.as_mut() else {
            return;
        };

        if toggle {
            if let Err(e) = surface.toggle(host) {
                log::error!("Failed to toggle drawing: {e}");
            }
        }

        if surface.is_mounted() {
            if host.target_size() != surface.host().target_size() {
                if let Err(e) = surface.resize(host) {
                    log::error!("Failed to resize drawing surface: {e}");
                }
            }
            surface.mount(host);
        }

        if let Err(e) = self.overlay.show(ui, surface) {
            log::error!("Drawing failed: {e}");
        }
    }
}

impl eframe::App for DrawOverApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        if let Some(surface) = &self.surface {
            self.drawing = Some(PersistedDrawing::capture(surface));
        }
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mounted = self.surface.as_ref().is_some_and(|surface| surface.is_mounted());

        let mut toggle = false;
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let label = if mounted { "✋ Stop drawing" } else { "✏ Draw" };
                toggle = ui.button(label).clicked();
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            // While mounted the overlay takes every press, so nothing below
            // can start a text selection.
            self.host_page(ui, toggle);
        });

        if let (Some(surface), Some(panel)) = (self.surface.as_mut(), self.panel.as_mut()) {
            if surface.is_mounted() {
                egui::Window::new("Controls")
                    .resizable(false)
                    .show(ctx, |ui| {
                        if let Err(e) = panel.show(ui, surface) {
                            log::error!("Control panel action failed: {e}");
                        }
                    });
            }
        }
    }
}
