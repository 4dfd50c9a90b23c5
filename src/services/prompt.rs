/// Requested output aspect ratio; the preview box uses the same ratio.
pub const ASPECT_RATIO: &str = "16:9";

/// The fixed prompt sent to the image model. Only the niche varies.
pub fn background_prompt(niche: &str) -> String {
    format!(
        "Professional, high-quality marketing background image for the niche: \"{niche}\". \
         The composition MUST have negative space or a dark gradient on the LEFT side for text overlay. \
         The main subject or visual interest should be on the RIGHT side. \
         Cinematic lighting, 4k resolution, photorealistic advertising style, widescreen {ASPECT_RATIO} framing. \
         No text in the image itself.",
        niche = niche.trim(),
    )
}
