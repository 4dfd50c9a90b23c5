use std::sync::Arc;

use egui::ColorImage;
use uuid::Uuid;

/// Encoded image bytes (PNG/JPEG/...) plus, when decoded, the pixels to upload
/// as a texture.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedImage {
    id: Uuid,             // Stable identity, used as the texture cache key
    mime: String,
    bytes: Vec<u8>,
    pixels: Option<Arc<ColorImage>>,
}

/// Shared, immutable image handle.
pub type ImageRef = Arc<EncodedImage>;

impl EncodedImage {
    /// Wraps already-encoded bytes without decoding them.
    pub fn new(mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            id: Uuid::new_v4(),
            mime: mime.into(),
            bytes,
            pixels: None,
        }
    }

    /// Wraps the bytes and decodes them so the image can be displayed.
    pub fn decoded(mime: impl Into<String>, bytes: Vec<u8>) -> Result<Self, image::ImageError> {
        let rgba = image::load_from_memory(&bytes)?.to_rgba8();
        let size = [rgba.width() as usize, rgba.height() as usize];
        let pixels = ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
        log::debug!("Decoded image: {}x{}", size[0], size[1]);

        let mut image = Self::new(mime, bytes);
        image.pixels = Some(Arc::new(pixels));
        Ok(image)
    }

    pub fn into_ref(self) -> ImageRef {
        Arc::new(self)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn pixels(&self) -> Option<&Arc<ColorImage>> {
        self.pixels.as_ref()
    }

    /// Pixel size `[width, height]`, when decoded.
    pub fn size(&self) -> Option<[usize; 2]> {
        self.pixels.as_ref().map(|p| p.size)
    }
}
