use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::HexColor;
use crate::error::DrawOverResult;
use crate::pen::PenSettings;
use crate::renderer::RenderTarget;
use crate::snapshot::Snapshot;
use crate::surface::DrawOver;
use crate::util::time;

/// Errors that can occur while saving or loading a drawing
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to serialize drawing: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to write drawing: {0}")]
    WriteError(#[from] std::io::Error),

    #[error("Failed to read drawing file: {0}")]
    ReadError(String),
}

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Everything needed to bring a drawing back after a restart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedDrawing {
    pub pen: PenSettings,
    pub custom_colors: Vec<Option<HexColor>>,
    /// The step that was visible when saved
    pub snapshot: Snapshot,
    /// Seconds since the UNIX epoch
    pub saved_at: u64,
    /// Version of the crate that wrote this
    pub version: String,
}

impl PersistedDrawing {
    pub fn capture<T: RenderTarget + 'static>(surface: &DrawOver<T>) -> Self {
        Self {
            pen: surface.pen().settings(),
            custom_colors: surface.palette().custom().to_vec(),
            snapshot: surface.history().current_snapshot().clone(),
            saved_at: time::timestamp_secs(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Applies the saved pen and colors, and makes the saved snapshot the
    /// only history step. The snapshot is stretched to the surface size.
    pub fn restore<T: RenderTarget + 'static>(self, surface: &mut DrawOver<T>) -> DrawOverResult<()> {
        if self.version != env!("CARGO_PKG_VERSION") {
            log::warn!(
                "Drawing was saved by version {}, current version is {}",
                self.version,
                env!("CARGO_PKG_VERSION")
            );
        }

        surface.pen_mut().apply_settings(self.pen)?;
        surface.palette_mut().restore_custom(&self.custom_colors);
        surface.history_mut().reset(self.snapshot);
        Ok(())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> PersistenceResult<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> PersistenceResult<Self> {
        let json = fs::read_to_string(path).map_err(|e| PersistenceError::ReadError(e.to_string()))?;
        Ok(serde_json::from_str(&json)?)
    }
}
