use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;

use egui::{ColorImage, Rect};

use crate::error::{CaptureError, ExportError};
use crate::image::EncodedImage;
use crate::offer::OfferData;
use crate::services::{Availability, CaptureOptions, FrameCapture, Rasterizer};

/// Used when the niche sanitizes to nothing.
pub const FALLBACK_FILE_NAME: &str = "offer-untitled.png";

/// Lowercases the niche and collapses whitespace runs into single hyphens.
///
/// Punctuation is kept, except characters that cannot appear in a file name
/// on common platforms, which are dropped.
pub fn sanitize_niche(niche: &str) -> String {
    niche
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| !c.is_control() && !matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
                .collect::<String>()
                .to_lowercase()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// `offer-<sanitized niche>.png`.
pub fn export_file_name(niche: &str) -> String {
    let stem = sanitize_niche(niche);
    if stem.is_empty() {
        FALLBACK_FILE_NAME.to_owned()
    } else {
        format!("offer-{}.png", stem)
    }
}

/// Where exported images go.
pub trait DownloadSink {
    fn save(&self, file_name: &str, image: &EncodedImage) -> Result<PathBuf, ExportError>;
}

/// Gives up finding a free name after this many numbered variants.
const MAX_NAME_SUFFIX: u32 = 9999;

/// Writes exports into a directory, creating it when missing.
///
/// Existing files are never replaced: a taken name gets a numeric suffix,
/// `offer-x.png` then `offer-x-1.png`, `offer-x-2.png` and so on.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn write_new(&self, file_name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;

        let (stem, extension) = match file_name.rsplit_once('.') {
            Some((stem, extension)) if !stem.is_empty() => (stem, Some(extension)),
            _ => (file_name, None),
        };
        for suffix in 0..=MAX_NAME_SUFFIX {
            let candidate = match (suffix, extension) {
                (0, _) => file_name.to_owned(),
                (n, Some(extension)) => format!("{}-{}.{}", stem, n, extension),
                (n, None) => format!("{}-{}", stem, n),
            };
            let path = self.dir.join(candidate);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(bytes)?;
                    return Ok(path);
                }
                Err(err) if err.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(err) => return Err(err),
            }
        }
        Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("no free file name for {}", file_name),
        ))
    }
}

impl DownloadSink for DirectorySink {
    fn save(&self, file_name: &str, image: &EncodedImage) -> Result<PathBuf, ExportError> {
        let path = self
            .write_new(file_name, image.bytes())
            .map_err(|source| ExportError::Write {
                path: self.dir.join(file_name),
                source,
            })?;
        log::info!("Saved export to {}", path.display());
        Ok(path)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
enum ExportPhase {
    #[default]
    Idle,
    /// A screenshot has been requested; waiting for the frame.
    AwaitingFrame { region: Rect, file_name: String },
}

/// Export in progress, the "is downloading" flag of the preview.
///
/// Independent of generation: it only disables its own trigger.
#[derive(Debug, Default)]
pub struct ExportJob {
    phase: ExportPhase,
    options: CaptureOptions,
}

impl ExportJob {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        !matches!(self.phase, ExportPhase::Idle)
    }

    /// Download button state.
    pub fn can_export(&self, offer: &OfferData, generating: bool) -> bool {
        offer.has_content() && !generating && !self.is_busy()
    }

    /// Arms an export of `region`. Returns `Ok(false)` when export is disabled,
    /// `Ok(true)` when the caller should now request a frame capture.
    pub fn begin(
        &mut self,
        offer: &OfferData,
        generating: bool,
        region: Rect,
        rasterizer: &dyn Rasterizer,
    ) -> Result<bool, ExportError> {
        if !self.can_export(offer, generating) {
            return Ok(false);
        }
        if let Availability::Unavailable(reason) = rasterizer.availability() {
            log::warn!("Export unavailable: {}", reason);
            return Err(CaptureError::Unavailable(reason).into());
        }

        let file_name = export_file_name(&offer.niche);
        log::info!("Exporting preview as {}", file_name);
        self.phase = ExportPhase::AwaitingFrame { region, file_name };
        Ok(true)
    }

    /// Finishes an armed export with the captured frame. Returns `None` when no
    /// export was waiting. The busy flag is cleared whatever the outcome.
    pub fn complete(
        &mut self,
        frame: &ColorImage,
        pixels_per_point: f32,
        rasterizer: &dyn Rasterizer,
        sink: &dyn DownloadSink,
    ) -> Option<Result<PathBuf, ExportError>> {
        let ExportPhase::AwaitingFrame { region, file_name } = std::mem::take(&mut self.phase) else {
            return None;
        };

        let capture = FrameCapture {
            frame,
            region,
            pixels_per_point,
        };
        let result = rasterizer
            .rasterize(&capture, &self.options)
            .map_err(ExportError::from)
            .and_then(|image| sink.save(&file_name, &image));

        if let Err(err) = &result {
            log::error!("Download failed: {}", err);
        }
        Some(result)
    }

    /// Drops an armed export without producing a file.
    pub fn abort(&mut self) {
        if self.is_busy() {
            log::warn!("Export aborted before a frame was captured");
        }
        self.phase = ExportPhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_niche() {
        assert_eq!(sanitize_niche("Cyber Monday Electronics"), "cyber-monday-electronics");
        assert_eq!(sanitize_niche("Yoga Studio!"), "yoga-studio!");
        assert_eq!(sanitize_niche("  Burger   Joint \t"), "burger-joint");
        assert_eq!(sanitize_niche("AC/DC: Live?"), "acdc-live");
        assert_eq!(sanitize_niche(""), "");
        assert_eq!(sanitize_niche(" / "), "");
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(export_file_name("Yoga Studio!"), "offer-yoga-studio!.png");
        assert_eq!(
            export_file_name("Cyber Monday Electronics"),
            "offer-cyber-monday-electronics.png"
        );
        assert_eq!(export_file_name(""), FALLBACK_FILE_NAME);
        assert_eq!(export_file_name("   "), FALLBACK_FILE_NAME);
    }

    #[test]
    fn test_can_export_gates() {
        let job = ExportJob::new();
        let mut offer = OfferData::default();
        assert!(!job.can_export(&offer, false));

        offer.title = "Flash Sale".to_owned();
        assert!(job.can_export(&offer, false));
        assert!(!job.can_export(&offer, true));
    }
}
