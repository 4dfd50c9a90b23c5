use std::path::PathBuf;
use std::sync::Arc;

use egui::{ColorImage, Rect, UserData, ViewportCommand};

use crate::config::AppConfig;
use crate::error::{CaptureError, ExportError, GenerationError};
use crate::event::AppEvent;
use crate::export::{DirectorySink, DownloadSink, ExportJob};
use crate::offer::OfferData;
use crate::panels::{form_panel, header_panel, preview_panel};
use crate::preview::PreviewScene;
use crate::renderer::Renderer;
use crate::services::{Availability, BackgroundGenerator, GeminiGenerator, PngRasterizer, Rasterizer};
use crate::state::Controller;

/// Frames to wait for a requested screenshot before giving up on the export.
const SCREENSHOT_TIMEOUT_FRAMES: u32 = 30;

/// Modal message shown after an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Saved(PathBuf),
    Failed(String),
}

pub struct OfferThumbApp {
    controller: Controller,
    renderer: Renderer,
    export: ExportJob,
    rasterizer: Box<dyn Rasterizer>,
    sink: Box<dyn DownloadSink>,
    notice: Option<Notice>,
    /// Where the preview was painted last frame, in points.
    preview_rect: Option<Rect>,
    frames_waiting: u32,
}

impl std::fmt::Debug for OfferThumbApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OfferThumbApp")
            .field("controller", &self.controller)
            .field("export", &self.export)
            .field("notice", &self.notice)
            .finish()
    }
}

impl OfferThumbApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Result<Self, GenerationError> {
        let generator = GeminiGenerator::new(&config)?;

        // Exports are screenshots of the painted frame, which needs the GL painter.
        let availability = if cc.gl.is_some() {
            Availability::Available
        } else {
            Availability::Unavailable("no GPU painter to capture the preview from".to_owned())
        };
        if let Availability::Unavailable(reason) = &availability {
            log::warn!("Export disabled: {}", reason);
        }

        Ok(Self::with_services(
            &cc.egui_ctx,
            Arc::new(generator),
            Box::new(PngRasterizer::new(availability)),
            Box::new(DirectorySink::new(config.export_dir)),
        ))
    }

    pub fn with_services(
        ctx: &egui::Context,
        generator: Arc<dyn BackgroundGenerator>,
        rasterizer: Box<dyn Rasterizer>,
        sink: Box<dyn DownloadSink>,
    ) -> Self {
        let mut controller = Controller::new(OfferData::seed(), generator);
        let repaint = ctx.clone();
        controller.set_waker(move || repaint.request_repaint());

        // Generation settles between frames; redraw so the new status and
        // background show up without waiting for input.
        let repaint = ctx.clone();
        controller.subscribe(Box::new(move |event: &AppEvent| {
            if matches!(
                event,
                AppEvent::StatusChanged { .. } | AppEvent::BackgroundReplaced { .. }
            ) {
                repaint.request_repaint();
            }
        }));

        Self {
            controller,
            renderer: Renderer::new(),
            export: ExportJob::new(),
            rasterizer,
            sink,
            notice: None,
            preview_rect: None,
            frames_waiting: 0,
        }
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut Controller {
        &mut self.controller
    }

    pub fn export(&self) -> &ExportJob {
        &self.export
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Download button state. Closed while a notice is up so the notice never
    /// ends up in the captured frame.
    pub fn can_export(&self) -> bool {
        self.notice.is_none()
            && self
                .export
                .can_export(self.controller.offer(), self.controller.is_generating())
    }

    /// Paints the preview into `rect` and remembers it as the export region.
    pub fn paint_preview(&mut self, ctx: &egui::Context, painter: &egui::Painter, rect: Rect) {
        let background = self.controller.background().map(Arc::clone);
        let scene = PreviewScene::compose(
            self.controller.offer(),
            background.as_deref(),
            self.controller.is_generating(),
        );
        self.renderer.paint(ctx, painter, rect, &scene, background.as_deref());
        self.preview_rect = Some(rect);
    }

    /// Arms an export of the preview region and asks for a screenshot of the next frame.
    pub fn request_export(&mut self, ctx: &egui::Context) {
        let Some(region) = self.preview_rect else {
            log::warn!("Export requested before the preview was painted");
            return;
        };
        if self.notice.is_some() {
            log::debug!("Export ignored: a notice is still open");
            return;
        }
        let offer = self.controller.offer().clone();
        let generating = self.controller.is_generating();
        match self.export.begin(&offer, generating, region, self.rasterizer.as_ref()) {
            Ok(true) => {
                self.frames_waiting = 0;
                ctx.send_viewport_cmd(ViewportCommand::Screenshot(UserData::default()));
                ctx.request_repaint();
            }
            Ok(false) => {}
            Err(err) => self.export_failed(&err),
        }
    }

    /// Feeds a captured frame to the pending export, if there is one.
    pub fn finish_export(&mut self, frame: &ColorImage, pixels_per_point: f32) {
        let Some(result) = self
            .export
            .complete(frame, pixels_per_point, self.rasterizer.as_ref(), self.sink.as_ref())
        else {
            return;
        };
        match result {
            Ok(path) => self.notice = Some(Notice::Saved(path)),
            Err(err) => self.export_failed(&err),
        }
    }

    fn export_failed(&mut self, err: &ExportError) {
        self.notice = Some(Notice::Failed(err.user_message().to_owned()));
    }

    fn handle_screenshots(&mut self, ctx: &egui::Context) {
        let frames: Vec<Arc<ColorImage>> = ctx.input(|i| {
            i.raw
                .events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::Screenshot { image, .. } => Some(Arc::clone(image)),
                    _ => None,
                })
                .collect()
        });

        for frame in &frames {
            self.finish_export(frame, ctx.pixels_per_point());
        }

        if self.export.is_busy() {
            self.frames_waiting += 1;
            if self.frames_waiting > SCREENSHOT_TIMEOUT_FRAMES {
                self.export.abort();
                self.export_failed(&CaptureError::Unavailable("no frame was captured".to_owned()).into());
            } else {
                ctx.request_repaint();
            }
        }
    }

    fn show_notice(&mut self, ctx: &egui::Context) {
        let Some(notice) = &self.notice else {
            return;
        };
        let (title, message) = match notice {
            Notice::Saved(path) => ("Download ready", format!("Saved to {}", path.display())),
            Notice::Failed(message) => ("Download failed", message.clone()),
        };

        let mut close = false;
        let modal = egui::Modal::new(egui::Id::new("export_notice")).show(ctx, |ui| {
            ui.heading(title);
            ui.label(message);
            ui.add_space(8.0);
            if ui.button("OK").clicked() {
                close = true;
            }
        });
        if close || modal.should_close() {
            self.notice = None;
        }
    }
}

impl eframe::App for OfferThumbApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.controller.poll();
        self.handle_screenshots(ctx);

        header_panel(self, ctx);
        form_panel(self, ctx);
        preview_panel(self, ctx);

        self.show_notice(ctx);
    }
}
