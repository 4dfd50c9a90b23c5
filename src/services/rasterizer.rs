//! Region capture for export.
//!
//! The frame itself comes from the GPU painter (a viewport screenshot); the
//! rasterizer crops it to the preview region, scales it and encodes a PNG.

use std::io::Cursor;

use egui::{ColorImage, Rect};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage, imageops};

use crate::error::CaptureError;
use crate::image::{EncodedImage, ImageRef};

/// Whether the capture capability exists in this process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    Available,
    Unavailable(String),
}

impl Availability {
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureOptions {
    /// Output pixels per logical point of the region.
    pub scale: f32,
    /// Keep captured alpha as-is instead of flattening onto white.
    pub transparent_background: bool,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            scale: 2.0,
            transparent_background: true,
        }
    }
}

/// A rendered frame plus the region of it to export.
#[derive(Debug, Clone, Copy)]
pub struct FrameCapture<'a> {
    pub frame: &'a ColorImage,
    /// Region in logical points.
    pub region: Rect,
    pub pixels_per_point: f32,
}

pub trait Rasterizer {
    fn availability(&self) -> Availability;

    fn rasterize(&self, capture: &FrameCapture<'_>, options: &CaptureOptions) -> Result<ImageRef, CaptureError>;
}

#[derive(Debug, Clone)]
pub struct PngRasterizer {
    availability: Availability,
}

impl PngRasterizer {
    pub fn new(availability: Availability) -> Self {
        Self { availability }
    }
}

impl Rasterizer for PngRasterizer {
    fn availability(&self) -> Availability {
        self.availability.clone()
    }

    fn rasterize(&self, capture: &FrameCapture<'_>, options: &CaptureOptions) -> Result<ImageRef, CaptureError> {
        if let Availability::Unavailable(reason) = &self.availability {
            return Err(CaptureError::Unavailable(reason.clone()));
        }

        let cropped = crop_region(capture)?;
        let target_w = (capture.region.width() * options.scale).round().max(1.0) as u32;
        let target_h = (capture.region.height() * options.scale).round().max(1.0) as u32;

        let mut output = if cropped.dimensions() == (target_w, target_h) {
            cropped
        } else {
            imageops::resize(&cropped, target_w, target_h, imageops::FilterType::Lanczos3)
        };

        if !options.transparent_background {
            flatten_onto_white(&mut output);
        }

        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(output).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        log::info!("Rasterized {}x{} export ({} bytes)", target_w, target_h, bytes.len());
        Ok(EncodedImage::new("image/png", bytes).into_ref())
    }
}

/// Cuts the region (points) out of the frame (physical pixels), clamped to the frame.
fn crop_region(capture: &FrameCapture<'_>) -> Result<RgbaImage, CaptureError> {
    let [frame_w, frame_h] = capture.frame.size;
    let expected = frame_w * frame_h;
    if capture.frame.pixels.len() != expected {
        return Err(CaptureError::FrameMismatch {
            expected,
            actual: capture.frame.pixels.len(),
        });
    }
    if capture.region.width() <= 0.0 || capture.region.height() <= 0.0 {
        return Err(CaptureError::EmptyRegion);
    }

    let ppp = capture.pixels_per_point;
    let clamp_x = |v: f32| (v * ppp).round().clamp(0.0, frame_w as f32) as usize;
    let clamp_y = |v: f32| (v * ppp).round().clamp(0.0, frame_h as f32) as usize;
    let (x0, x1) = (clamp_x(capture.region.min.x), clamp_x(capture.region.max.x));
    let (y0, y1) = (clamp_y(capture.region.min.y), clamp_y(capture.region.max.y));
    if x1 <= x0 || y1 <= y0 {
        return Err(CaptureError::OutOfFrame);
    }

    Ok(RgbaImage::from_fn((x1 - x0) as u32, (y1 - y0) as u32, |x, y| {
        let index = (y0 + y as usize) * frame_w + x0 + x as usize;
        Rgba(capture.frame.pixels[index].to_srgba_unmultiplied())
    }))
}

fn flatten_onto_white(image: &mut RgbaImage) {
    for pixel in image.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        let blend = |c: u8| ((c as u32 * a as u32 + 255 * (255 - a as u32)) / 255) as u8;
        *pixel = Rgba([blend(r), blend(g), blend(b), 255]);
    }
}
