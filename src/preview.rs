//! What the preview shows, as plain data.
//!
//! [`PreviewScene::compose`] is a pure function of the offer, the background
//! and the busy flag; the renderer only paints what it is given. Composing the
//! same inputs twice yields equal scenes.

use egui::{Color32, Rect, Vec2, pos2, vec2};
use uuid::Uuid;

use crate::color::{BADGE_BORDER_ALPHA, BADGE_FILL_ALPHA, CTA_SHADOW_ALPHA, brand_color, tinted};
use crate::image::EncodedImage;
use crate::offer::OfferData;

pub const PREVIEW_ASPECT: f32 = 16.0 / 9.0;
pub const PLACEHOLDER_LABEL: &str = "AI Background Area";
pub const LOADING_LABEL: &str = "Generating bespoke visuals...";

/// Gradient strength over the placeholder / over a real image.
const GRADIENT_OPACITY_PLACEHOLDER: f32 = 0.5;
const GRADIENT_OPACITY_IMAGE: f32 = 0.9;

#[derive(Debug, Clone, PartialEq)]
pub enum BackgroundLayer {
    Image { image_id: Uuid, size: [usize; 2] },
    /// The label is hidden while the loading overlay covers the area.
    Placeholder { show_label: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Badge {
    pub text: String,
    pub fill: Color32,
    pub border: Color32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CtaButton {
    pub text: String,
    pub fill: Color32,
    pub shadow: Color32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreviewScene {
    pub background: BackgroundLayer,
    pub gradient_opacity: f32,
    pub badge: Option<Badge>,
    pub title: String,
    pub description: String,
    /// Description border color.
    pub accent: Color32,
    pub cta: CtaButton,
    pub loading_overlay: bool,
}

impl PreviewScene {
    pub fn compose(offer: &OfferData, background: Option<&EncodedImage>, generating: bool) -> Self {
        let background = match background.and_then(|image| image.size().map(|size| (image.id(), size))) {
            Some((image_id, size)) => BackgroundLayer::Image { image_id, size },
            None => BackgroundLayer::Placeholder {
                show_label: !generating,
            },
        };
        let gradient_opacity = match background {
            BackgroundLayer::Image { .. } => GRADIENT_OPACITY_IMAGE,
            BackgroundLayer::Placeholder { .. } => GRADIENT_OPACITY_PLACEHOLDER,
        };

        let color = offer.primary_color.as_str();
        let badge = (!offer.niche.is_empty()).then(|| Badge {
            text: offer.niche.to_uppercase(),
            fill: tinted(color, BADGE_FILL_ALPHA),
            border: tinted(color, BADGE_BORDER_ALPHA),
        });

        Self {
            background,
            gradient_opacity,
            badge,
            title: offer.display_title().to_owned(),
            description: offer.display_description().to_owned(),
            accent: brand_color(color),
            cta: CtaButton {
                text: offer.display_cta().to_owned(),
                fill: brand_color(color),
                shadow: tinted(color, CTA_SHADOW_ALPHA),
            },
            loading_overlay: generating,
        }
    }
}

/// Largest 16:9 rect that fits `available`, centered horizontally, top-aligned.
pub fn fit_aspect(available: Rect) -> Rect {
    let width = available.width().min(available.height() * PREVIEW_ASPECT).max(0.0);
    let size = vec2(width, width / PREVIEW_ASPECT);
    let left = available.center().x - size.x / 2.0;
    Rect::from_min_size(pos2(left, available.top()), size)
}

/// UV rect that covers `region` with the image without distortion, keeping
/// the right edge (where the subject sits) and cropping from the left.
pub fn cover_uv(image_size: [usize; 2], region: Vec2) -> Rect {
    let [w, h] = image_size;
    if w == 0 || h == 0 || region.x <= 0.0 || region.y <= 0.0 {
        return Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
    }
    let image_aspect = w as f32 / h as f32;
    let region_aspect = region.x / region.y;

    if image_aspect > region_aspect {
        // Too wide: show the right-most slice.
        let visible = region_aspect / image_aspect;
        Rect::from_min_max(pos2(1.0 - visible, 0.0), pos2(1.0, 1.0))
    } else {
        // Too tall: keep the vertical center.
        let visible = image_aspect / region_aspect;
        let top = (1.0 - visible) / 2.0;
        Rect::from_min_max(pos2(0.0, top), pos2(1.0, top + visible))
    }
}
