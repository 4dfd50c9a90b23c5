#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod color;
pub mod config;
pub mod error;
pub mod event;
pub mod export;
pub mod image;
pub mod offer;
pub mod panels;
pub mod preview;
pub mod renderer;
pub mod services;
pub mod state;
pub mod store;
pub mod texture_manager;

pub use app::{Notice, OfferThumbApp};
pub use config::AppConfig;
pub use error::{CaptureError, ExportError, GenerationError};
pub use event::{AppEvent, EventBus, EventHandler};
pub use export::{DirectorySink, DownloadSink, ExportJob, export_file_name, sanitize_niche};
pub use crate::image::{EncodedImage, ImageRef};
pub use offer::{OfferData, OfferField};
pub use preview::PreviewScene;
pub use renderer::Renderer;
pub use services::{
    Availability, BackgroundGenerator, CaptureOptions, FrameCapture, GeminiGenerator, PngRasterizer, Rasterizer,
};
pub use state::{Controller, GenerationStatus, RequestOutcome};
pub use store::OfferStore;
