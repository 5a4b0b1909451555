use base64::Engine as _;

use crate::config::{GeminiConfig, DEFAULT_SQUARE_CROP_TOLERANCE};
use crate::error::{Result, StudioError};
use crate::gemini::{GeminiClient, GenerateContentResponse, Part, FINISH_REASON_STOP};
use crate::imaging;
use crate::models::{Fit, GeneratedImage, GenerationRequest, ImageMime, PartRole, ProductType};
use crate::prompts;

/// Orchestrates one generation end to end: normalize inputs, build the
/// prompt, assemble the ordered part list, call the external model and
/// post-process the answer into a data URI. Holds no per-request state.
#[derive(Clone)]
pub struct StudioClient {
    gemini: GeminiClient,
    square_crop_tolerance: u32,
}

/// An input buffer ready for the wire, either normalized or passed through
/// unchanged after a logged normalization failure.
struct PreparedImage {
    bytes: Vec<u8>,
    mime: ImageMime,
}

impl PreparedImage {
    fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }
}

impl StudioClient {
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        Ok(Self {
            gemini: GeminiClient::new(config)?,
            square_crop_tolerance: config
                .square_crop_tolerance
                .unwrap_or(DEFAULT_SQUARE_CROP_TOLERANCE),
        })
    }

    pub fn gemini(&self) -> &GeminiClient {
        &self.gemini
    }

    /// Image-conditioned try-on generation.
    ///
    /// The output is returned exactly as the provider produced it; with
    /// normalized vertical inputs the model reliably keeps their aspect, so
    /// no forced crop is applied on this path.
    pub async fn generate_try_on(&self, request: &GenerationRequest) -> Result<GeneratedImage> {
        validate_request(request)?;

        let _timer = crate::logger::timer("try-on generation");

        let identity = request
            .model_image
            .as_deref()
            .map(|bytes| normalize_or_original(bytes, PartRole::Identity));
        let product = normalize_or_original(&request.product_image, PartRole::Product);
        let background = request
            .location_image
            .as_deref()
            .map(|bytes| normalize_or_original(bytes, PartRole::Background));

        let prompt_text = build_try_on_prompt(request);
        let parts = assemble_parts(
            identity.as_ref(),
            &product,
            background.as_ref(),
            &prompt_text,
        );

        log::info!(
            "Generating try-on: {} parts, type={:?}, angle={}",
            parts.len(),
            request.product_type,
            request.angle_index
        );

        let response = self.gemini.generate(parts).await?;
        let (mime, data) = extract_image(response)?;

        Ok(GeneratedImage {
            data_uri: to_data_uri(&mime, &data),
            model: self.gemini.model().to_string(),
        })
    }

    /// Text-only asset generation.
    ///
    /// The provider does not reliably honor the aspect-ratio hint without
    /// image inputs, so near-square outputs get center-cropped to 9:16.
    pub async fn generate_asset(&self, prompt: &str) -> Result<GeneratedImage> {
        if prompt.trim().is_empty() {
            return Err(StudioError::EmptyInputError("prompt is required".into()));
        }

        let _timer = crate::logger::timer("asset generation");

        let response = self.gemini.generate(vec![Part::text(prompt)]).await?;
        let (mime, data) = extract_image(response)?;

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(&data)
            .map_err(|e| StudioError::ResponseError(format!("invalid base64 image payload: {}", e)))?;

        let result = match imaging::vertical_crop_if_square(&bytes, self.square_crop_tolerance) {
            Ok(Some(cropped)) => {
                log::info!(
                    "Near-square output detected, cropped to {}x{}",
                    cropped.width,
                    cropped.height
                );
                GeneratedImage {
                    data_uri: to_data_uri(cropped.mime.as_str(), &cropped.to_base64()),
                    model: self.gemini.model().to_string(),
                }
            }
            Ok(None) => GeneratedImage {
                data_uri: to_data_uri(&mime, &data),
                model: self.gemini.model().to_string(),
            },
            Err(err) => {
                // The provider sent something we cannot decode locally; hand
                // it through untouched rather than failing the request.
                log::warn!("Could not inspect generated image dimensions: {}", err);
                GeneratedImage {
                    data_uri: to_data_uri(&mime, &data),
                    model: self.gemini.model().to_string(),
                }
            }
        };

        Ok(result)
    }
}

fn validate_request(request: &GenerationRequest) -> Result<()> {
    if request.product_image.is_empty() {
        return Err(StudioError::EmptyInputError("product image is required".into()));
    }
    if matches!(&request.model_image, Some(bytes) if bytes.is_empty()) {
        return Err(StudioError::EmptyInputError("model image is present but empty".into()));
    }
    if matches!(&request.location_image, Some(bytes) if bytes.is_empty()) {
        return Err(StudioError::EmptyInputError("location image is present but empty".into()));
    }
    // The explicit flag drives the template branch; a drifted flag would
    // produce a prompt whose image numbering contradicts the part list.
    if request.has_location_image != request.location_image.is_some() {
        return Err(StudioError::RequestError(
            "hasLocationImage flag does not match the supplied images".into(),
        ));
    }
    Ok(())
}

fn normalize_or_original(bytes: &[u8], role: PartRole) -> PreparedImage {
    match imaging::normalize(bytes, Fit::Cover) {
        Ok(normalized) => PreparedImage {
            bytes: normalized.bytes,
            mime: normalized.mime,
        },
        Err(err) => {
            log::warn!(
                "Normalization of {} image failed, sending original bytes: {}",
                role.as_str(),
                err
            );
            PreparedImage {
                bytes: bytes.to_vec(),
                mime: imaging::sniff_mime(bytes),
            }
        }
    }
}

fn build_try_on_prompt(request: &GenerationRequest) -> String {
    let has_model_image = request.model_image.is_some();
    let angle = prompts::select_angle(
        request.product_type,
        request.angle_index,
        &request.product_title,
    );

    match request.product_type {
        ProductType::Item => prompts::item_prompt(
            &request.product_title,
            &request.product_category,
            &angle,
            &request.location_description,
            has_model_image,
            request.has_location_image,
            request.variety_seed,
        ),
        // Auto resolves to the clothing compositor, the default branch.
        ProductType::Clothing | ProductType::Auto => prompts::clothing_prompt(
            &request.product_title,
            &angle,
            &request.location_description,
            has_model_image,
            request.has_location_image,
            request.variety_seed,
        ),
    }
}

/// Fixed part order: identity, product, background, then the text prompt.
/// This must agree with `PartNumbering`, which the templates use for their
/// symbolic image references.
fn assemble_parts(
    identity: Option<&PreparedImage>,
    product: &PreparedImage,
    background: Option<&PreparedImage>,
    prompt_text: &str,
) -> Vec<Part> {
    let mut parts = Vec::with_capacity(4);
    if let Some(image) = identity {
        parts.push(Part::inline_image(image.mime.as_str(), image.to_base64()));
    }
    parts.push(Part::inline_image(product.mime.as_str(), product.to_base64()));
    if let Some(image) = background {
        parts.push(Part::inline_image(image.mime.as_str(), image.to_base64()));
    }
    parts.push(Part::text(prompt_text));
    parts
}

fn extract_image(response: GenerateContentResponse) -> Result<(String, String)> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| StudioError::NoImageReturnedError("no candidates returned".into()))?;

    if let Some(reason) = &candidate.finish_reason {
        if reason != FINISH_REASON_STOP {
            return Err(StudioError::GenerationBlockedError(reason.clone()));
        }
    }

    let parts = candidate.content.map(|content| content.parts).unwrap_or_default();
    for part in parts {
        if let Some(inline) = part.inline_data {
            let mime = if inline.mime_type.is_empty() {
                "image/png".to_string()
            } else {
                inline.mime_type
            };
            return Ok((mime, inline.data));
        }
    }

    Err(StudioError::NoImageReturnedError(
        "response carried no inline image data".into(),
    ))
}

fn to_data_uri(mime: &str, base64_data: &str) -> String {
    format!("data:{};base64,{}", mime, base64_data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::{Candidate, Content};

    fn prepared(mime: ImageMime) -> PreparedImage {
        PreparedImage {
            bytes: vec![1, 2, 3],
            mime,
        }
    }

    fn response_with(finish_reason: Option<&str>, parts: Vec<Part>) -> GenerateContentResponse {
        GenerateContentResponse {
            candidates: vec![Candidate {
                content: Some(Content { parts }),
                finish_reason: finish_reason.map(String::from),
            }],
        }
    }

    #[test]
    fn parts_follow_the_numbering_contract() {
        let identity = prepared(ImageMime::Jpeg);
        let product = prepared(ImageMime::Png);
        let background = prepared(ImageMime::Jpeg);

        let parts = assemble_parts(Some(&identity), &product, Some(&background), "do it");
        assert_eq!(parts.len(), 4);
        assert_eq!(parts[0].inline_data.as_ref().unwrap().mime_type, "image/jpeg");
        assert_eq!(parts[1].inline_data.as_ref().unwrap().mime_type, "image/png");
        assert!(parts[2].inline_data.is_some());
        assert_eq!(parts[3].text.as_deref(), Some("do it"));

        // Image part count always equals the numbering slot count.
        let request = GenerationRequest::new(vec![1], "x")
            .with_model_image(vec![2])
            .with_location_image(vec![3]);
        assert_eq!(parts.len() - 1, request.numbering().slots().len());
    }

    #[test]
    fn product_only_assembly_has_two_parts() {
        let product = prepared(ImageMime::Jpeg);
        let parts = assemble_parts(None, &product, None, "prompt");
        assert_eq!(parts.len(), 2);
        assert!(parts[0].inline_data.is_some());
        assert!(parts[1].text.is_some());
    }

    #[test]
    fn safety_block_is_not_a_generic_failure() {
        let err = extract_image(response_with(Some("SAFETY"), vec![])).unwrap_err();
        match err {
            StudioError::GenerationBlockedError(reason) => assert_eq!(reason, "SAFETY"),
            other => panic!("expected GenerationBlocked, got {:?}", other),
        }
    }

    #[test]
    fn stop_without_image_is_no_image_returned() {
        let err = extract_image(response_with(
            Some("STOP"),
            vec![Part::text("all done, no image though")],
        ))
        .unwrap_err();
        assert!(matches!(err, StudioError::NoImageReturnedError(_)));
    }

    #[test]
    fn missing_candidates_is_no_image_returned() {
        let err = extract_image(GenerateContentResponse::default()).unwrap_err();
        assert!(matches!(err, StudioError::NoImageReturnedError(_)));
    }

    #[test]
    fn first_inline_payload_wins() {
        let (mime, data) = extract_image(response_with(
            Some("STOP"),
            vec![
                Part::text("lead-in"),
                Part::inline_image("image/png", "Zmlyc3Q="),
                Part::inline_image("image/jpeg", "c2Vjb25k"),
            ],
        ))
        .unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(data, "Zmlyc3Q=");
    }

    #[test]
    fn empty_mime_defaults_to_png() {
        let (mime, _) = extract_image(response_with(
            None,
            vec![Part::inline_image("", "ZGF0YQ==")],
        ))
        .unwrap();
        assert_eq!(mime, "image/png");
    }

    #[test]
    fn data_uri_shape() {
        assert_eq!(
            to_data_uri("image/png", "aGVsbG8="),
            "data:image/png;base64,aGVsbG8="
        );
    }

    #[test]
    fn prompt_branch_follows_product_type() {
        let base = GenerationRequest::new(vec![1], "Gold Watch").with_category("Accessories");

        let clothing = build_try_on_prompt(&base.clone().with_product_type(ProductType::Clothing));
        assert!(clothing.contains("MASTER CLOTHING COMPOSITOR"));

        let item = build_try_on_prompt(&base.clone().with_product_type(ProductType::Item));
        assert!(item.contains("ADAPTIVE VERTICAL GENERATION"));

        let auto = build_try_on_prompt(&base.with_product_type(ProductType::Auto));
        assert!(auto.contains("MASTER CLOTHING COMPOSITOR"));
    }

    #[test]
    fn drifted_location_flag_is_rejected() {
        let mut request = GenerationRequest::new(vec![1], "Shirt");
        request.has_location_image = true; // no buffer supplied
        let err = validate_request(&request).unwrap_err();
        assert!(matches!(err, StudioError::RequestError(_)));
    }

    #[test]
    fn empty_product_image_is_rejected() {
        let request = GenerationRequest::new(Vec::new(), "Shirt");
        let err = validate_request(&request).unwrap_err();
        assert!(matches!(err, StudioError::EmptyInputError(_)));
    }

    mod end_to_end {
        use super::*;
        use crate::config::GeminiConfig;
        use actix_web::{web, App, HttpResponse, HttpServer};
        use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
        use std::io::Cursor;

        fn square_jpeg_base64() -> String {
            let img =
                DynamicImage::ImageRgb8(RgbImage::from_pixel(1024, 1024, Rgb([120, 50, 50])));
            let mut buf = Vec::new();
            img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Jpeg).unwrap();
            base64::engine::general_purpose::STANDARD.encode(buf)
        }

        fn spawn_stub_server(
            payload: serde_json::Value,
        ) -> (std::net::SocketAddr, actix_web::dev::ServerHandle) {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            let addr = listener.local_addr().unwrap();
            let server = HttpServer::new(move || {
                let payload = payload.clone();
                App::new().default_service(web::post().to(move || {
                    let payload = payload.clone();
                    async move { HttpResponse::Ok().json(payload) }
                }))
            })
            .listen(listener)
            .unwrap()
            .workers(1)
            .run();
            let handle = server.handle();
            actix_web::rt::spawn(server);
            (addr, handle)
        }

        fn client_for(addr: std::net::SocketAddr) -> StudioClient {
            StudioClient::new(
                &GeminiConfig::new()
                    .with_api_key("test-key")
                    .with_api_base(format!("http://{}", addr)),
            )
            .unwrap()
        }

        #[actix_web::test]
        async fn asset_generation_crops_square_output() {
            let payload = serde_json::json!({
                "candidates": [{
                    "finishReason": "STOP",
                    "content": {"parts": [
                        {"inlineData": {"mimeType": "image/jpeg", "data": square_jpeg_base64()}}
                    ]}
                }]
            });
            let (addr, handle) = spawn_stub_server(payload);
            let studio = client_for(addr);

            let generated = studio.generate_asset("an empty marble pedestal").await.unwrap();
            let encoded = generated
                .data_uri
                .strip_prefix("data:image/jpeg;base64,")
                .expect("jpeg data uri");
            let bytes = base64::engine::general_purpose::STANDARD.decode(encoded).unwrap();
            let decoded = image::load_from_memory(&bytes).unwrap();
            assert_eq!((decoded.width(), decoded.height()), (576, 1024));

            handle.stop(false).await;
        }

        #[actix_web::test]
        async fn try_on_returns_provider_output_untouched() {
            let payload = serde_json::json!({
                "candidates": [{
                    "finishReason": "STOP",
                    "content": {"parts": [
                        {"inlineData": {"mimeType": "image/png", "data": "aGVsbG8="}}
                    ]}
                }]
            });
            let (addr, handle) = spawn_stub_server(payload);
            let studio = client_for(addr);

            // Undecodable product bytes exercise the logged fallback path.
            let request = GenerationRequest::new(vec![9, 9, 9], "Linen Shirt");
            let generated = studio.generate_try_on(&request).await.unwrap();
            assert_eq!(generated.data_uri, "data:image/png;base64,aGVsbG8=");

            handle.stop(false).await;
        }

        #[actix_web::test]
        async fn blocked_generation_carries_reason() {
            let payload = serde_json::json!({
                "candidates": [{"finishReason": "SAFETY", "content": {"parts": []}}]
            });
            let (addr, handle) = spawn_stub_server(payload);
            let studio = client_for(addr);

            let request = GenerationRequest::new(vec![9, 9, 9], "Linen Shirt");
            let err = studio.generate_try_on(&request).await.unwrap_err();
            match err {
                StudioError::GenerationBlockedError(reason) => assert_eq!(reason, "SAFETY"),
                other => panic!("expected GenerationBlocked, got {:?}", other),
            }

            handle.stop(false).await;
        }
    }
}
