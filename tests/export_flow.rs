use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use egui::{Color32, ColorImage, Rect, pos2, vec2};
use offerthumb::error::EXPORT_FAILED_MESSAGE;
use offerthumb::{
    Availability, CaptureError, CaptureOptions, DirectorySink, DownloadSink, EncodedImage, ExportError, ExportJob,
    FrameCapture, ImageRef, OfferData, OfferField, OfferStore, PngRasterizer, Rasterizer,
};

/// Wraps the real rasterizer and counts how often it is asked for availability or pixels.
struct CountingRasterizer {
    inner: PngRasterizer,
    touched: AtomicUsize,
}

impl CountingRasterizer {
    fn new(availability: Availability) -> Self {
        Self {
            inner: PngRasterizer::new(availability),
            touched: AtomicUsize::new(0),
        }
    }

    fn touched(&self) -> usize {
        self.touched.load(Ordering::SeqCst)
    }
}

impl Rasterizer for CountingRasterizer {
    fn availability(&self) -> Availability {
        self.touched.fetch_add(1, Ordering::SeqCst);
        self.inner.availability()
    }

    fn rasterize(&self, capture: &FrameCapture<'_>, options: &CaptureOptions) -> Result<ImageRef, CaptureError> {
        self.touched.fetch_add(1, Ordering::SeqCst);
        self.inner.rasterize(capture, options)
    }
}

fn temp_export_dir() -> PathBuf {
    std::env::temp_dir().join(format!("offerthumb-test-{}", uuid::Uuid::new_v4()))
}

fn region() -> Rect {
    Rect::from_min_size(pos2(0.0, 0.0), vec2(32.0, 18.0))
}

fn frame() -> ColorImage {
    ColorImage::new([64, 36], Color32::from_rgb(79, 70, 229))
}

#[test]
fn test_export_disabled_without_content() {
    let rasterizer = CountingRasterizer::new(Availability::Available);
    let mut job = ExportJob::new();
    let offer = OfferData {
        cta_text: "Shop Now".to_owned(),
        ..OfferData::default()
    };

    assert!(!job.can_export(&offer, false));
    assert!(!job.begin(&offer, false, region(), &rasterizer).unwrap());
    assert!(!job.is_busy());
    assert_eq!(rasterizer.touched(), 0);
}

#[test]
fn test_export_disabled_while_generating() {
    let rasterizer = CountingRasterizer::new(Availability::Available);
    let mut job = ExportJob::new();
    assert!(!job.begin(&OfferData::seed(), true, region(), &rasterizer).unwrap());
    assert_eq!(rasterizer.touched(), 0);
}

#[test]
fn test_export_writes_png_named_after_niche() {
    let dir = temp_export_dir();
    let sink = DirectorySink::new(&dir);
    let rasterizer = CountingRasterizer::new(Availability::Available);
    let mut store = OfferStore::new(OfferData::seed(), Default::default());
    store.set_field(OfferField::Niche, "Cyber Monday Electronics");

    let mut job = ExportJob::new();
    assert!(job.begin(store.get(), false, region(), &rasterizer).unwrap());
    assert!(job.is_busy());
    assert!(!job.can_export(store.get(), false));

    let path = job.complete(&frame(), 2.0, &rasterizer, &sink).unwrap().unwrap();
    assert!(!job.is_busy());
    assert_eq!(path, dir.join("offer-cyber-monday-electronics.png"));

    let written = image::open(&path).unwrap();
    // 32x18 points captured at 2x.
    assert_eq!((written.width(), written.height()), (64, 36));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_unavailable_rasterizer_fails_without_file() {
    let dir = temp_export_dir();
    let rasterizer = CountingRasterizer::new(Availability::Unavailable("headless".to_owned()));
    let mut job = ExportJob::new();

    let err = job.begin(&OfferData::seed(), false, region(), &rasterizer).unwrap_err();
    assert!(matches!(err, ExportError::Capture(CaptureError::Unavailable(_))));
    assert_eq!(err.user_message(), EXPORT_FAILED_MESSAGE);
    assert!(!job.is_busy());
    assert!(!dir.exists());
}

struct FailingSink;

impl DownloadSink for FailingSink {
    fn save(&self, file_name: &str, _image: &EncodedImage) -> Result<PathBuf, ExportError> {
        Err(ExportError::Write {
            path: PathBuf::from(file_name),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        })
    }
}

#[test]
fn test_failed_save_clears_busy_flag() {
    let rasterizer = CountingRasterizer::new(Availability::Available);
    let mut job = ExportJob::new();
    assert!(job.begin(&OfferData::seed(), false, region(), &rasterizer).unwrap());

    let result = job.complete(&frame(), 2.0, &rasterizer, &FailingSink).unwrap();
    assert!(matches!(result, Err(ExportError::Write { .. })));
    assert!(!job.is_busy());
    assert!(job.can_export(&OfferData::seed(), false));
}

#[test]
fn test_frame_without_pending_export_is_ignored() {
    let rasterizer = CountingRasterizer::new(Availability::Available);
    let mut job = ExportJob::new();
    assert!(job.complete(&frame(), 1.0, &rasterizer, &FailingSink).is_none());
    assert_eq!(rasterizer.touched(), 0);
}

#[test]
fn test_abort_releases_export() {
    let rasterizer = CountingRasterizer::new(Availability::Available);
    let mut job = ExportJob::new();
    assert!(job.begin(&OfferData::seed(), false, region(), &rasterizer).unwrap());
    job.abort();
    assert!(!job.is_busy());
    assert!(job.complete(&frame(), 1.0, &rasterizer, &FailingSink).is_none());
}

#[test]
fn test_repeated_export_keeps_earlier_files() {
    let dir = temp_export_dir();
    let sink = DirectorySink::new(&dir);

    let first = EncodedImage::new("image/png", b"first".to_vec());
    let second = EncodedImage::new("image/png", b"second".to_vec());
    let third = EncodedImage::new("image/png", b"third".to_vec());

    let first_path = sink.save("offer-running-shoes.png", &first).unwrap();
    let second_path = sink.save("offer-running-shoes.png", &second).unwrap();
    let third_path = sink.save("offer-running-shoes.png", &third).unwrap();

    assert_eq!(first_path, dir.join("offer-running-shoes.png"));
    assert_eq!(second_path, dir.join("offer-running-shoes-1.png"));
    assert_eq!(third_path, dir.join("offer-running-shoes-2.png"));
    assert_eq!(fs::read(&first_path).unwrap(), b"first");
    assert_eq!(fs::read(&second_path).unwrap(), b"second");
    assert_eq!(fs::read(&third_path).unwrap(), b"third");

    fs::remove_dir_all(&dir).unwrap();
}
