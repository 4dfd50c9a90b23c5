//! Background image generation.
//!
//! [`GeminiGenerator`] performs one blocking `generateContent` call per
//! request and hands back the first inline image of the first candidate.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::error::GenerationError;
use crate::image::{EncodedImage, ImageRef};
use crate::services::prompt::{ASPECT_RATIO, background_prompt};

const DEFAULT_IMAGE_MIME: &str = "image/png";

/// Text-to-image collaborator.
///
/// `generate` blocks until the provider answers. Implementations never retry.
pub trait BackgroundGenerator: Send + Sync {
    fn generate(&self, niche: &str) -> Result<ImageRef, GenerationError>;

    /// Short label for the UI ("Powered by ...").
    fn label(&self) -> &str;
}

pub struct GeminiGenerator {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl std::fmt::Debug for GeminiGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiGenerator")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl GeminiGenerator {
    pub fn new(config: &AppConfig) -> Result<Self, GenerationError> {
        // `None` disables reqwest's 30s default: we wait for the provider.
        let client = Client::builder().timeout(config.request_timeout).build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        })
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

impl BackgroundGenerator for GeminiGenerator {
    fn generate(&self, niche: &str) -> Result<ImageRef, GenerationError> {
        let niche = niche.trim();
        if niche.is_empty() {
            return Err(GenerationError::EmptyNiche);
        }
        let api_key = self.api_key.as_deref().ok_or(GenerationError::MissingApiKey)?;

        log::info!("Requesting background for niche {:?} from {}", niche, self.model);
        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&GenerateRequest::for_niche(niche))
            .send()?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let image = extract_image(&body)?;
        log::info!(
            "Received {} background ({} bytes)",
            image.mime(),
            image.bytes().len()
        );
        Ok(image.into_ref())
    }

    fn label(&self) -> &str {
        &self.model
    }
}

/// Pulls the first inline image out of a `generateContent` response body and
/// decodes it.
pub fn extract_image(body: &str) -> Result<EncodedImage, GenerationError> {
    let response: GenerateResponse = serde_json::from_str(body)?;
    let inline = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|content| content.parts.into_iter().find_map(|p| p.inline_data))
        .ok_or(GenerationError::NoImage)?;

    let mime = inline
        .mime_type
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| DEFAULT_IMAGE_MIME.to_owned());
    let bytes = STANDARD.decode(inline.data.trim())?;
    Ok(EncodedImage::decoded(mime, bytes)?)
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<RequestContent>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Debug)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Serialize, Debug)]
struct RequestPart {
    text: String,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<&'static str>,
    candidate_count: u32,
    image_config: ImageConfig,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ImageConfig {
    aspect_ratio: &'static str,
}

impl GenerateRequest {
    fn for_niche(niche: &str) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: background_prompt(niche),
                }],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["IMAGE"],
                candidate_count: 1,
                image_config: ImageConfig {
                    aspect_ratio: ASPECT_RATIO,
                },
            },
        }
    }
}

#[derive(Deserialize, Debug)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize, Debug)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    inline_data: Option<InlineData>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: Option<String>,
    data: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Cursor;

    fn png_base64() -> String {
        let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([200, 100, 50, 255]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        STANDARD.encode(bytes)
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(GenerateRequest::for_niche("Burger Joint")).unwrap();
        assert_eq!(body["generationConfig"]["responseModalities"], json!(["IMAGE"]));
        assert_eq!(body["generationConfig"]["candidateCount"], json!(1));
        assert_eq!(body["generationConfig"]["imageConfig"]["aspectRatio"], json!("16:9"));
        let text = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(text.contains("Burger Joint"));
    }

    #[test]
    fn test_extract_skips_text_parts() {
        let body = json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "Here is your image" },
                        { "inlineData": { "mimeType": "image/png", "data": png_base64() } }
                    ]
                }
            }]
        })
        .to_string();

        let image = extract_image(&body).unwrap();
        assert_eq!(image.mime(), "image/png");
        assert_eq!(image.size(), Some([2, 2]));
    }

    #[test]
    fn test_extract_defaults_mime() {
        let body = json!({
            "candidates": [{ "content": { "parts": [{ "inlineData": { "data": png_base64() } }] } }]
        })
        .to_string();
        assert_eq!(extract_image(&body).unwrap().mime(), DEFAULT_IMAGE_MIME);
    }

    #[test]
    fn test_extract_failures() {
        assert!(matches!(extract_image("not json"), Err(GenerationError::MalformedResponse(_))));
        assert!(matches!(extract_image("{}"), Err(GenerationError::NoImage)));

        let text_only = json!({ "candidates": [{ "content": { "parts": [{ "text": "sorry" }] } }] });
        assert!(matches!(extract_image(&text_only.to_string()), Err(GenerationError::NoImage)));

        let bad_b64 = json!({
            "candidates": [{ "content": { "parts": [{ "inlineData": { "data": "%%%" } }] } }]
        });
        assert!(matches!(extract_image(&bad_b64.to_string()), Err(GenerationError::InvalidPayload(_))));

        let not_image = json!({
            "candidates": [{ "content": { "parts": [{ "inlineData": { "data": STANDARD.encode(b"hello") } }] } }]
        });
        assert!(matches!(extract_image(&not_image.to_string()), Err(GenerationError::Decode(_))));
    }

    #[test]
    fn test_missing_key_fails_before_network() {
        let config = AppConfig {
            endpoint: "http://127.0.0.1:1".to_owned(),
            ..AppConfig::default()
        };
        let generator = GeminiGenerator::new(&config).unwrap();
        assert!(matches!(generator.generate("Yoga"), Err(GenerationError::MissingApiKey)));
        assert!(matches!(generator.generate("  "), Err(GenerationError::EmptyNiche)));
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = AppConfig {
            api_key: Some("secret-key".to_owned()),
            ..AppConfig::default()
        };
        let generator = GeminiGenerator::new(&config).unwrap();
        let debug = format!("{:?}", generator);
        assert!(!debug.contains("secret-key"));
        assert!(generator.url().ends_with("/models/gemini-2.5-flash-image:generateContent"));
    }
}
