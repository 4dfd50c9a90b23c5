use crate::OfferThumbApp;

pub const APP_TITLE: &str = "OfferThumb AI";

pub fn header_panel(app: &OfferThumbApp, ctx: &egui::Context) {
    egui::TopBottomPanel::top("header_panel").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.heading(APP_TITLE);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.weak(format!("Powered by {}", app.controller().generator_label()));
            });
        });
    });
}
