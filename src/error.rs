use std::path::PathBuf;
use thiserror::Error;

/// Inline text shown under the form whenever a generation attempt fails.
pub const GENERATION_FAILED_MESSAGE: &str =
    "Failed to generate image. Please check API Key or try a different niche.";

/// Notice shown when an export could not produce a file.
pub const EXPORT_FAILED_MESSAGE: &str =
    "Could not generate download. Please try taking a screenshot.";

/// Errors that can occur while requesting a background image.
///
/// The variants exist for logging; the user only ever sees
/// [`GENERATION_FAILED_MESSAGE`].
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("no API key configured (set GEMINI_API_KEY)")]
    MissingApiKey,

    #[error("niche must not be empty")]
    EmptyNiche,

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed provider response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    #[error("provider response contained no image data")]
    NoImage,

    #[error("invalid base64 image payload: {0}")]
    InvalidPayload(#[from] base64::DecodeError),

    #[error("could not decode generated image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("generation worker stopped before returning a result")]
    WorkerLost,
}

impl GenerationError {
    pub fn user_message(&self) -> &'static str {
        GENERATION_FAILED_MESSAGE
    }
}

/// Errors that can occur while rasterizing the preview region.
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("capture is unavailable: {0}")]
    Unavailable(String),

    #[error("capture region is empty")]
    EmptyRegion,

    #[error("capture region lies outside the captured frame")]
    OutOfFrame,

    #[error("captured frame has {actual} pixels, expected {expected}")]
    FrameMismatch { expected: usize, actual: usize },

    #[error("failed to encode capture: {0}")]
    Encode(#[from] image::ImageError),
}

/// Errors that can occur during the export (capture + save) flow.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExportError {
    pub fn user_message(&self) -> &'static str {
        EXPORT_FAILED_MESSAGE
    }
}
