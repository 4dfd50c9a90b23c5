use egui::{Button, Sense};

use crate::OfferThumbApp;
use crate::preview::fit_aspect;

pub const DOWNLOAD_LABEL: &str = "Download PNG";
pub const DOWNLOADING_LABEL: &str = "Exporting...";
pub const FOOTER_LABEL: &str = "Preview Mode (16:9)";

pub fn preview_panel(app: &mut OfferThumbApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.heading("Live Preview");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let busy = app.export().is_busy();
                let label = if busy { DOWNLOADING_LABEL } else { DOWNLOAD_LABEL };
                if ui.add_enabled(app.can_export(), Button::new(label)).clicked() {
                    app.request_export(ctx);
                }
                if busy {
                    ui.spinner();
                }
            });
        });
        ui.separator();

        // Leave room for the footer line under the preview.
        let footer_height = ui.text_style_height(&egui::TextStyle::Small) + ui.spacing().item_spacing.y * 2.0;
        let mut available = ui.available_rect_before_wrap();
        available.max.y -= footer_height;
        let region = fit_aspect(available);

        let (response, painter) = ui.allocate_painter(available.size(), Sense::hover());
        let region = region.translate(response.rect.min - available.min);
        app.paint_preview(ctx, &painter, region);

        ui.vertical_centered(|ui| {
            ui.small(FOOTER_LABEL);
        });
    });
}
