use serde::{Deserialize, Serialize};

use crate::color::HexColor;
use crate::error::DrawOverResult;
use crate::renderer::RenderTarget;
use crate::surface::DrawOver;

/// Actions a control panel can ask a drawing surface to perform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Command {
    Undo,
    Redo,
    Clear,
    Reset,
    ToggleErase,
    /// Use a swatch color. Does not touch the custom colors.
    SelectColor(HexColor),
    /// Use a color from the picker and remember it among the custom colors
    PickColor(HexColor),
    /// Only adopt a picker color; it is remembered once the picker closes
    PreviewColor(HexColor),
    SetWidth(f32),
}

impl Command {
    pub fn execute<T: RenderTarget + 'static>(&self, surface: &mut DrawOver<T>) -> DrawOverResult<()> {
        match *self {
            Command::Undo => surface.undo(),
            Command::Redo => surface.redo(),
            Command::Clear => surface.clear()?,
            Command::Reset => surface.reset()?,
            Command::ToggleErase => surface.pen_mut().toggle_erasing(),
            Command::SelectColor(color) | Command::PreviewColor(color) => {
                surface.pen_mut().set_color(color)
            }
            Command::PickColor(color) => surface.pick_color(color),
            Command::SetWidth(width) => surface.pen_mut().set_width(width)?,
        }
        Ok(())
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Undo => "Undo",
            Command::Redo => "Redo",
            Command::Clear => "Clear",
            Command::Reset => "Reset",
            Command::ToggleErase => "Toggle eraser",
            Command::SelectColor(_) => "Select color",
            Command::PickColor(_) => "Pick color",
            Command::PreviewColor(_) => "Preview color",
            Command::SetWidth(_) => "Set width",
        }
    }
}
