use egui::color_picker::{Alpha, color_edit_button_srgba};
use egui::{Button, Color32, RichText, TextEdit};

use crate::OfferThumbApp;
use crate::color::{brand_color, to_hex};
use crate::offer::OfferField;

pub const GENERATE_LABEL: &str = "Generate Background";
pub const GENERATING_LABEL: &str = "Dreaming up visual...";

const ERROR_TEXT: Color32 = Color32::from_rgb(220, 38, 38);

pub fn form_panel(app: &mut OfferThumbApp, ctx: &egui::Context) {
    egui::SidePanel::left("form_panel")
        .resizable(true)
        .default_width(340.0)
        .min_width(280.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Offer Details");
                ui.add_space(8.0);

                for field in [OfferField::Title, OfferField::Description, OfferField::CtaText] {
                    text_field(app, ui, field);
                }

                ui.separator();
                ui.heading("Visual Style");
                ui.add_space(8.0);

                text_field(app, ui, OfferField::Niche);
                color_field(app, ui);

                ui.add_space(12.0);
                generate_button(app, ui);
            });
        });
}

fn text_field(app: &mut OfferThumbApp, ui: &mut egui::Ui, field: OfferField) {
    ui.label(field.label());
    let mut value = app.controller().offer().get(field).to_owned();

    let mut edit = if field == OfferField::Description {
        TextEdit::multiline(&mut value).desired_rows(3)
    } else {
        TextEdit::singleline(&mut value)
    }
    .hint_text(field.hint())
    .desired_width(f32::INFINITY);
    if let Some(limit) = field.max_chars() {
        edit = edit.char_limit(limit);
    }

    if ui.add(edit).changed() {
        app.controller_mut().set_field(field, value);
    }
    ui.add_space(6.0);
}

/// Picker and free hex text edit the same value.
fn color_field(app: &mut OfferThumbApp, ui: &mut egui::Ui) {
    let field = OfferField::PrimaryColor;
    ui.label(field.label());

    let current = app.controller().offer().primary_color.clone();
    let mut color = brand_color(&current);
    let mut text = current;

    ui.horizontal(|ui| {
        if color_edit_button_srgba(ui, &mut color, Alpha::Opaque).changed() {
            app.controller_mut().set_field(field, to_hex(color));
        }
        let edit = TextEdit::singleline(&mut text)
            .hint_text(field.hint())
            .desired_width(100.0);
        if ui.add(edit).changed() {
            app.controller_mut().set_field(field, text.clone());
        }
    });
}

fn generate_button(app: &mut OfferThumbApp, ui: &mut egui::Ui) {
    let generating = app.controller().is_generating();
    let enabled = app.controller().offer().can_generate() && !generating;

    ui.horizontal(|ui| {
        let label = if generating { GENERATING_LABEL } else { GENERATE_LABEL };
        let button = Button::new(label).min_size(egui::vec2(ui.available_width(), 32.0));
        if ui.add_enabled(enabled, button).clicked() {
            app.controller_mut().request_generation();
        }
    });
    if generating {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.weak("This can take a few seconds");
        });
    }

    if let Some(message) = app.controller().status().error_message() {
        ui.add_space(6.0);
        ui.label(RichText::new(message).color(ERROR_TEXT));
    }
}
