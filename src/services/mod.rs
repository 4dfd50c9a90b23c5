//! External collaborators: the text-to-image provider and the export rasterizer.

pub mod generator;
pub mod prompt;
pub mod rasterizer;

pub use generator::{BackgroundGenerator, GeminiGenerator};
pub use rasterizer::{Availability, CaptureOptions, FrameCapture, PngRasterizer, Rasterizer};
