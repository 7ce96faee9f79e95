use std::collections::HashMap;

use egui::{Context, Id, TextureHandle, TextureOptions};

use crate::renderer::Canvas;

/// Keeps one GPU texture per canvas and re-uploads it only when the canvas
/// revision changed since the last frame.
#[derive(Default)]
pub struct TextureManager {
    /// Texture and the canvas revision it was uploaded from
    textures: HashMap<Id, (TextureHandle, u64)>,
    uploads: u64,
}

impl std::fmt::Debug for TextureManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureManager")
            .field("textures", &self.textures.len())
            .field("uploads", &self.uploads)
            .finish()
    }
}

impl TextureManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the texture for `canvas`, uploading it if it changed
    pub fn texture_for(&mut self, ctx: &Context, id: Id, canvas: &Canvas) -> &TextureHandle {
        let revision = canvas.revision();
        let uploads = &mut self.uploads;

        let entry = self.textures.entry(id).or_insert_with(|| {
            *uploads += 1;
            let handle = ctx.load_texture(
                format!("draw_over_{id:?}"),
                canvas.to_color_image(),
                TextureOptions::LINEAR,
            );
            (handle, revision)
        });

        if entry.1 != revision {
            *uploads += 1;
            entry.0.set(canvas.to_color_image(), TextureOptions::LINEAR);
            entry.1 = revision;
        }

        &entry.0
    }

    /// Drops the texture of a canvas that is no longer shown
    pub fn forget(&mut self, id: Id) {
        self.textures.remove(&id);
    }

    /// Number of uploads performed so far
    pub fn upload_count(&self) -> u64 {
        self.uploads
    }
}
