//! Brand color helpers.
//!
//! Colors travel through the app as CSS-style hex strings, exactly as the user
//! typed them. Nothing here ever fails: a value that does not parse renders as
//! [`DEFAULT_PRIMARY_COLOR`].

use egui::Color32;

/// Indigo-600.
pub const DEFAULT_PRIMARY_COLOR: &str = "#4f46e5";

/// Badge fill tint.
pub const BADGE_FILL_ALPHA: f64 = 0.9;
/// Badge border tint.
pub const BADGE_BORDER_ALPHA: f64 = 0.3;
/// Call-to-action drop shadow tint.
pub const CTA_SHADOW_ALPHA: f64 = 0.4;

/// Parses `#RGB`, `#RRGGBB` or `#RRGGBBAA` (case-insensitive).
pub fn parse_hex_color(value: &str) -> Option<Color32> {
    let hex = value.trim().strip_prefix('#')?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let expand = |i: usize| channel(&hex[i..=i].repeat(2));
            Some(Color32::from_rgb(expand(0)?, expand(1)?, expand(2)?))
        }
        6 => Some(Color32::from_rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        8 => Some(Color32::from_rgba_unmultiplied(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
            channel(&hex[6..8])?,
        )),
        _ => None,
    }
}

/// Canonical lowercase `#rrggbb` form of an opaque color.
pub fn to_hex(color: Color32) -> String {
    let [r, g, b, _] = color.to_srgba_unmultiplied();
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

/// The opaque brand color for a user-supplied value, or the default indigo.
pub fn brand_color(value: &str) -> Color32 {
    parse_hex_color(value)
        .map(|c| {
            let [r, g, b, _] = c.to_srgba_unmultiplied();
            Color32::from_rgb(r, g, b)
        })
        .unwrap_or_else(default_color)
}

/// Appends a two-digit hex alpha to the color: `with_alpha("#4f46e5", 0.9) == "#4f46e5e6"`.
///
/// `alpha` is clamped to `0.0..=1.0`.
pub fn with_alpha(hex_color: &str, alpha: f64) -> String {
    let alpha = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!("{}{:02x}", to_hex(brand_color(hex_color)), alpha)
}

/// [`with_alpha`] resolved straight to a paintable color.
pub fn tinted(hex_color: &str, alpha: f64) -> Color32 {
    parse_hex_color(&with_alpha(hex_color, alpha)).unwrap_or_else(default_color)
}

fn default_color() -> Color32 {
    Color32::from_rgb(0x4f, 0x46, 0xe5)
}
