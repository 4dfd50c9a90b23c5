// src/renderer.rs
use std::sync::Arc;

use egui::epaint::{Galley, Mesh, Rounding};
use egui::{Align2, Color32, Context, FontId, Painter, Pos2, Rect, Shape, Stroke, pos2, vec2};

use crate::image::EncodedImage;
use crate::preview::{BackgroundLayer, LOADING_LABEL, PLACEHOLDER_LABEL, PreviewScene, cover_uv};
use crate::texture_manager::TextureManager;

const CANVAS_FILL: Color32 = Color32::from_rgb(15, 23, 42);
const PLACEHOLDER_TEXT: Color32 = Color32::from_rgb(100, 116, 139);
const DESCRIPTION_TEXT: Color32 = Color32::from_rgb(226, 232, 240);
const OVERLAY_FILL: Color32 = Color32::from_black_alpha(150);

/// Share of the preview width given to the text column.
const TEXT_COLUMN_SHARE: f32 = 0.6;
/// Sizes below are tuned for a preview this many points tall.
const REFERENCE_HEIGHT: f32 = 450.0;
/// The current background plus the one it just replaced.
const TEXTURE_CACHE_SIZE: usize = 2;

#[derive(Debug)]
pub struct Renderer {
    texture_manager: TextureManager,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            texture_manager: TextureManager::new(TEXTURE_CACHE_SIZE),
        }
    }

    pub fn texture_manager(&self) -> &TextureManager {
        &self.texture_manager
    }

    /// Paints the scene into `rect`, clipped to it.
    pub fn paint(
        &mut self,
        ctx: &Context,
        painter: &Painter,
        rect: Rect,
        scene: &PreviewScene,
        background: Option<&EncodedImage>,
    ) {
        self.texture_manager.begin_frame();
        let shapes = self.scene_shapes(ctx, rect, scene, background);
        painter.with_clip_rect(rect).extend(shapes);
    }

    /// Builds the shapes for one frame of the preview, back to front.
    ///
    /// Needs fonts, so call it inside a running frame.
    pub fn scene_shapes(
        &mut self,
        ctx: &Context,
        rect: Rect,
        scene: &PreviewScene,
        background: Option<&EncodedImage>,
    ) -> Vec<Shape> {
        let scale = (rect.height() / REFERENCE_HEIGHT).max(0.1);
        let mut shapes = vec![Shape::rect_filled(rect, Rounding::ZERO, CANVAS_FILL)];

        match &scene.background {
            BackgroundLayer::Image { image_id, size } => {
                let texture = background
                    .filter(|image| image.id() == *image_id)
                    .and_then(|image| self.texture_manager.texture_for(ctx, image));
                if let Some(texture) = texture {
                    let uv = cover_uv(*size, rect.size());
                    shapes.push(Shape::image(texture, rect, uv, Color32::WHITE));
                } else {
                    log::warn!("Background {} has no texture, painting placeholder", image_id);
                }
            }
            BackgroundLayer::Placeholder { show_label } => {
                if *show_label {
                    let galley = layout(ctx, PLACEHOLDER_LABEL, 18.0 * scale, PLACEHOLDER_TEXT, f32::INFINITY);
                    let center = pos2(rect.left() + rect.width() * 0.75, rect.center().y);
                    shapes.push(galley_at(galley, center, Align2::CENTER_CENTER));
                }
            }
        }

        shapes.push(gradient(rect, scene.gradient_opacity));
        text_column(ctx, rect, scale, scene, &mut shapes);

        if scene.loading_overlay {
            shapes.push(Shape::rect_filled(rect, Rounding::ZERO, OVERLAY_FILL));
            let galley = layout(ctx, LOADING_LABEL, 20.0 * scale, Color32::WHITE, f32::INFINITY);
            shapes.push(galley_at(galley, rect.center(), Align2::CENTER_CENTER));
        }

        shapes
    }
}

/// Dark on the left, fading to nothing on the right.
fn gradient(rect: Rect, opacity: f32) -> Shape {
    let dark = Color32::from_black_alpha((opacity.clamp(0.0, 1.0) * 255.0).round() as u8);
    let mut mesh = Mesh::default();
    mesh.colored_vertex(rect.left_top(), dark);
    mesh.colored_vertex(rect.right_top(), Color32::TRANSPARENT);
    mesh.colored_vertex(rect.right_bottom(), Color32::TRANSPARENT);
    mesh.colored_vertex(rect.left_bottom(), dark);
    mesh.add_triangle(0, 1, 2);
    mesh.add_triangle(0, 2, 3);
    Shape::mesh(mesh)
}

fn text_column(ctx: &Context, rect: Rect, scale: f32, scene: &PreviewScene, shapes: &mut Vec<Shape>) {
    let margin = 40.0 * scale;
    let gap = 16.0 * scale;
    let width = (rect.width() * TEXT_COLUMN_SHARE - margin).max(1.0);

    let badge = scene.badge.as_ref().map(|badge| {
        (
            badge,
            layout(ctx, &badge.text, 11.0 * scale, Color32::WHITE, width),
        )
    });
    let title = layout(ctx, &scene.title, 40.0 * scale, Color32::WHITE, width);
    let accent_width = 3.0 * scale.max(1.0);
    let description_indent = accent_width + 12.0 * scale;
    let description = layout(
        ctx,
        &scene.description,
        17.0 * scale,
        DESCRIPTION_TEXT,
        (width - description_indent).max(1.0),
    );
    let cta_label = layout(ctx, &format!("{} \u{2192}", scene.cta.text), 16.0 * scale, Color32::WHITE, width);

    let badge_padding = vec2(10.0, 4.0) * scale;
    let cta_padding = vec2(24.0, 12.0) * scale;
    let badge_height = badge
        .as_ref()
        .map_or(0.0, |(_, galley)| galley.size().y + badge_padding.y * 2.0 + gap);
    let cta_height = cta_label.size().y + cta_padding.y * 2.0;
    let total = badge_height + title.size().y + gap + description.size().y + gap * 1.5 + cta_height;

    let left = rect.left() + margin;
    let mut y = rect.center().y - total / 2.0;

    if let Some((badge, galley)) = badge {
        let pill = Rect::from_min_size(pos2(left, y), galley.size() + badge_padding * 2.0);
        let rounding = Rounding::same(pill.height() / 2.0);
        shapes.push(Shape::rect_filled(pill, rounding, badge.fill));
        shapes.push(Shape::rect_stroke(pill, rounding, Stroke::new(1.0, badge.border)));
        shapes.push(Shape::galley(pill.min + badge_padding, galley, Color32::WHITE));
        y = pill.bottom() + gap;
    }

    let title_height = title.size().y;
    shapes.push(Shape::galley(pos2(left, y), title, Color32::WHITE));
    y += title_height + gap;

    let description_height = description.size().y;
    let bar = Rect::from_min_size(pos2(left, y), vec2(accent_width, description_height));
    shapes.push(Shape::rect_filled(bar, Rounding::ZERO, scene.accent));
    shapes.push(Shape::galley(pos2(left + description_indent, y), description, DESCRIPTION_TEXT));
    y += description_height + gap * 1.5;

    let button = Rect::from_min_size(pos2(left, y), cta_label.size() + cta_padding * 2.0);
    let rounding = Rounding::same(8.0 * scale);
    let shadow = button.translate(vec2(0.0, 6.0 * scale)).expand(2.0 * scale);
    shapes.push(Shape::rect_filled(shadow, rounding, scene.cta.shadow));
    shapes.push(Shape::rect_filled(button, rounding, scene.cta.fill));
    shapes.push(Shape::galley(button.min + cta_padding, cta_label, Color32::WHITE));
}

fn layout(ctx: &Context, text: &str, size: f32, color: Color32, wrap_width: f32) -> Arc<Galley> {
    ctx.fonts(|fonts| fonts.layout(text.to_owned(), FontId::proportional(size.max(1.0)), color, wrap_width))
}

fn galley_at(galley: Arc<Galley>, anchor: Pos2, align: Align2) -> Shape {
    let rect = align.anchor_size(anchor, galley.size());
    Shape::galley(rect.min, galley, Color32::WHITE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offer::OfferData;
    use egui::RawInput;
    use std::io::Cursor;

    fn preview_rect() -> Rect {
        Rect::from_min_size(pos2(0.0, 0.0), vec2(800.0, 450.0))
    }

    fn decoded_image() -> EncodedImage {
        let img = image::RgbaImage::from_pixel(32, 18, image::Rgba([40, 80, 120, 255]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        EncodedImage::decoded("image/png", bytes).unwrap()
    }

    /// Builds the same scene twice with one renderer, as consecutive frames would.
    fn two_frames(scene: &PreviewScene, background: Option<&EncodedImage>) -> (Vec<Shape>, Vec<Shape>) {
        let ctx = Context::default();
        let mut renderer = Renderer::new();
        let mut frames = Vec::new();
        for _ in 0..2 {
            let _ = ctx.run(RawInput::default(), |ctx| {
                renderer.texture_manager.begin_frame();
                frames.push(renderer.scene_shapes(ctx, preview_rect(), scene, background));
            });
        }
        let second = frames.pop().unwrap();
        let first = frames.pop().unwrap();
        (first, second)
    }

    fn shapes_for(scene: &PreviewScene, background: Option<&EncodedImage>) -> (Vec<Shape>, Renderer) {
        let ctx = Context::default();
        let mut renderer = Renderer::new();
        let mut shapes = Vec::new();
        let _ = ctx.run(RawInput::default(), |ctx| {
            shapes = renderer.scene_shapes(ctx, preview_rect(), scene, background);
        });
        (shapes, renderer)
    }

    fn has_image(shapes: &[Shape]) -> bool {
        shapes
            .iter()
            .any(|shape| matches!(shape, Shape::Mesh(mesh) if mesh.texture_id != egui::TextureId::default()))
    }

    #[test]
    fn test_same_scene_same_shapes() {
        let scene = PreviewScene::compose(&OfferData::seed(), None, false);
        let (first, second) = two_frames(&scene, None);
        assert_eq!(first, second);

        let busy = PreviewScene::compose(&OfferData::seed(), None, true);
        let (first, second) = two_frames(&busy, None);
        assert_eq!(first, second);
    }

    #[test]
    fn test_same_background_same_shapes() {
        let image = decoded_image();
        let scene = PreviewScene::compose(&OfferData::seed(), Some(&image), false);
        let (first, second) = two_frames(&scene, Some(&image));
        assert!(has_image(&first));
        assert_eq!(first, second);
    }

    #[test]
    fn test_replaced_backgrounds_are_evicted() {
        let ctx = Context::default();
        let mut renderer = Renderer::new();
        let images: Vec<EncodedImage> = (0..4).map(|_| decoded_image()).collect();

        for image in &images {
            let scene = PreviewScene::compose(&OfferData::seed(), Some(image), false);
            let _ = ctx.run(RawInput::default(), |ctx| {
                renderer.texture_manager.begin_frame();
                renderer.scene_shapes(ctx, preview_rect(), &scene, Some(image));
            });
        }

        assert_eq!(renderer.texture_manager().cache_size(), TEXTURE_CACHE_SIZE);
        assert!(renderer.texture_manager().is_cached(images[3].id()));
        assert!(renderer.texture_manager().is_cached(images[2].id()));
        assert!(!renderer.texture_manager().is_cached(images[0].id()));
    }

    #[test]
    fn test_placeholder_label_and_overlay() {
        let offer = OfferData::seed();
        let idle = PreviewScene::compose(&offer, None, false);
        let busy = PreviewScene::compose(&offer, None, true);

        let (idle_shapes, _) = shapes_for(&idle, None);
        let (busy_shapes, _) = shapes_for(&busy, None);

        // Busy drops the placeholder label and adds the dimmer plus its label.
        assert_eq!(busy_shapes.len(), idle_shapes.len() + 1);
        assert!(!has_image(&idle_shapes));
    }

    #[test]
    fn test_badge_only_with_niche() {
        let mut offer = OfferData::seed();
        let (with_badge, _) = shapes_for(&PreviewScene::compose(&offer, None, false), None);
        offer.niche.clear();
        let (without_badge, _) = shapes_for(&PreviewScene::compose(&offer, None, false), None);
        assert_eq!(with_badge.len(), without_badge.len() + 3);
    }

    #[test]
    fn test_background_image_uploads_texture() {
        let image = decoded_image();
        let scene = PreviewScene::compose(&OfferData::seed(), Some(&image), false);
        let (shapes, renderer) = shapes_for(&scene, Some(&image));
        assert!(has_image(&shapes));
        assert!(renderer.texture_manager().is_cached(image.id()));
    }

    #[test]
    fn test_gradient_fades_left_to_right() {
        let Shape::Mesh(mesh) = gradient(preview_rect(), 0.9) else {
            panic!("gradient should be a mesh");
        };
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.vertices[0].color, Color32::from_black_alpha(230));
        assert_eq!(mesh.vertices[1].color, Color32::TRANSPARENT);
    }
}
