use egui::{Color32, Id, Rect, Sense, pos2};

use crate::error::DrawOverResult;
use crate::input::{InputEvent, InputHandler};
use crate::renderer::Canvas;
use crate::surface::DrawOver;
use crate::texture_manager::TextureManager;

/// Shows a mounted surface on top of its host and feeds it pointer input
#[derive(Debug)]
pub struct CanvasOverlay {
    id: Id,
    input: InputHandler,
    textures: TextureManager,
}

impl Default for CanvasOverlay {
    fn default() -> Self {
        Self::new("draw_over_canvas")
    }
}

impl CanvasOverlay {
    pub fn new(id_source: impl std::hash::Hash) -> Self {
        Self {
            id: Id::new(id_source),
            input: InputHandler::new(),
            textures: TextureManager::new(),
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui, surface: &mut DrawOver<Canvas>) -> DrawOverResult<()> {
        if !surface.is_mounted() {
            self.textures.forget(self.id);
            return Ok(());
        }

        let rect = surface.host().rect;
        // Claiming clicks and drags over the host keeps egui from scrolling
        // or selecting text underneath while drawing.
        ui.interact(rect, self.id, Sense::click_and_drag());

        for event in self.input.process_input(ui.ctx(), rect) {
            // Presses on windows floating above the host (like the control
            // panel) belong to those windows.
            if let InputEvent::PointerDown { position, .. } = event {
                if ui.ctx().layer_id_at(position) != Some(ui.layer_id()) {
                    continue;
                }
            }
            surface.handle_input(event)?;
        }

        if surface.run_pending_restores() {
            ui.ctx().request_repaint();
        }

        let target = surface.target();
        let texture = self.textures.texture_for(ui.ctx(), self.id, &target);
        ui.painter_at(rect).image(
            texture.id(),
            rect,
            Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
            Color32::WHITE,
        );

        Ok(())
    }
}
