use std::collections::HashMap;

use egui::{Context, TextureHandle, TextureId, TextureOptions};
use uuid::Uuid;

use crate::image::EncodedImage;

/// Uploads decoded images as textures and keeps the most recent few around.
///
/// Backgrounds are replaced wholesale on every successful generation, so the
/// cache stays tiny; old entries are evicted least-recently-used first.
pub struct TextureManager {
    /// Cache of textures by image id
    texture_cache: HashMap<Uuid, TextureHandle>,
    /// Tracks when each texture was last used
    last_used: HashMap<Uuid, u64>,
    /// Current frame counter for LRU tracking
    current_frame: u64,
    /// Maximum number of textures to cache
    max_cache_size: usize,
}

impl std::fmt::Debug for TextureManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureManager")
            .field("cached", &self.texture_cache.len())
            .field("current_frame", &self.current_frame)
            .field("max_cache_size", &self.max_cache_size)
            .finish()
    }
}

impl TextureManager {
    /// Creates a new texture manager with the specified cache size
    pub fn new(max_cache_size: usize) -> Self {
        Self {
            texture_cache: HashMap::new(),
            last_used: HashMap::new(),
            current_frame: 0,
            max_cache_size: max_cache_size.max(1),
        }
    }

    /// Increments the frame counter, should be called at the start of each frame
    pub fn begin_frame(&mut self) {
        self.current_frame += 1;
    }

    /// Gets or uploads the texture for an image. `None` if the image was never decoded.
    pub fn texture_for(&mut self, ctx: &Context, image: &EncodedImage) -> Option<TextureId> {
        let key = image.id();

        if let Some(handle) = self.texture_cache.get(&key) {
            self.last_used.insert(key, self.current_frame);
            return Some(handle.id());
        }

        let pixels = image.pixels()?;
        let name = format!("background_{}", key);
        log::debug!("Uploading texture {} ({}x{})", name, pixels.size[0], pixels.size[1]);
        let handle = ctx.load_texture(&name, pixels.as_ref().clone(), TextureOptions::LINEAR);
        let id = handle.id();

        self.texture_cache.insert(key, handle);
        self.last_used.insert(key, self.current_frame);
        self.prune_cache_if_needed();
        Some(id)
    }

    /// Prunes the cache if it exceeds the maximum size
    fn prune_cache_if_needed(&mut self) {
        if self.texture_cache.len() <= self.max_cache_size {
            return;
        }

        let mut entries: Vec<(Uuid, u64)> = self.last_used.iter().map(|(k, v)| (*k, *v)).collect();
        entries.sort_by_key(|(_, frame)| *frame);

        let to_remove = entries.len() - self.max_cache_size;
        for (id, _) in entries.iter().take(to_remove) {
            self.texture_cache.remove(id);
            self.last_used.remove(id);
        }
    }

    /// Returns the number of textures currently in the cache
    pub fn cache_size(&self) -> usize {
        self.texture_cache.len()
    }

    pub fn is_cached(&self, image_id: Uuid) -> bool {
        self.texture_cache.contains_key(&image_id)
    }
}
