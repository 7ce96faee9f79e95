use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::HexColor;
use crate::event::EventBus;

pub const DEFAULT_PEN_WIDTH: f32 = 5.0;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum PenError {
    #[error("Pen width must be a positive finite number, got {0}")]
    InvalidWidth(f32),
}

/// Whether strokes paint over the surface or clear it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PenMode {
    #[default]
    Draw,
    Erase,
}

/// Plain copy of the pen state, used for persistence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PenSettings {
    pub color: HexColor,
    pub width: f32,
    pub mode: PenMode,
}

/// The pen model: color, width and draw/erase mode.
///
/// Mutations are synchronous and only notify subscribers. Nothing here
/// touches the render target.
#[derive(Debug)]
pub struct Pen {
    color: HexColor,
    width: f32,
    mode: PenMode,
    color_changed: EventBus<HexColor>,
    width_changed: EventBus<f32>,
    mode_changed: EventBus<bool>,
}

pub(crate) fn validate_width(width: f32) -> Result<f32, PenError> {
    if width.is_finite() && width > 0.0 {
        Ok(width)
    } else {
        Err(PenError::InvalidWidth(width))
    }
}

impl Pen {
    pub fn new(color: HexColor, width: f32) -> Result<Self, PenError> {
        Ok(Self {
            color,
            width: validate_width(width)?,
            mode: PenMode::Draw,
            color_changed: EventBus::new(),
            width_changed: EventBus::new(),
            mode_changed: EventBus::new(),
        })
    }

    pub fn color(&self) -> HexColor {
        self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn mode(&self) -> PenMode {
        self.mode
    }

    pub fn is_erasing(&self) -> bool {
        self.mode == PenMode::Erase
    }

    pub fn settings(&self) -> PenSettings {
        PenSettings {
            color: self.color,
            width: self.width,
            mode: self.mode,
        }
    }

    /// Picking a color means the user wants to draw, so this also leaves
    /// erase mode.
    pub fn set_color(&mut self, color: HexColor) {
        if self.color == color {
            return;
        }

        self.color = color;
        self.color_changed.emit(&color);
        self.stop_erasing();
    }

    pub fn set_width(&mut self, width: f32) -> Result<(), PenError> {
        let width = validate_width(width)?;
        if self.width == width {
            return Ok(());
        }

        self.width = width;
        self.width_changed.emit(&width);
        Ok(())
    }

    pub fn start_erasing(&mut self) {
        self.set_mode(PenMode::Erase);
    }

    pub fn stop_erasing(&mut self) {
        self.set_mode(PenMode::Draw);
    }

    pub fn toggle_erasing(&mut self) {
        match self.mode {
            PenMode::Draw => self.start_erasing(),
            PenMode::Erase => self.stop_erasing(),
        }
    }

    /// Applies persisted settings through the regular setters, so
    /// subscribers see each change.
    pub fn apply_settings(&mut self, settings: PenSettings) -> Result<(), PenError> {
        self.set_width(settings.width)?;
        self.set_color(settings.color);
        self.set_mode(settings.mode);
        Ok(())
    }

    fn set_mode(&mut self, mode: PenMode) {
        if self.mode == mode {
            return;
        }

        self.mode = mode;
        self.mode_changed.emit(&(mode == PenMode::Erase));
    }

    pub fn color_changed(&self) -> &EventBus<HexColor> {
        &self.color_changed
    }

    pub fn width_changed(&self) -> &EventBus<f32> {
        &self.width_changed
    }

    /// Payload is `true` when the pen is now erasing
    pub fn mode_changed(&self) -> &EventBus<bool> {
        &self.mode_changed
    }
}
