use std::collections::HashMap;
use std::path::Path;

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use base64::Engine as _;
use futures::{StreamExt, TryStreamExt};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::error::{Result, StudioError};
use crate::models::{
    AssetKind, GenerationRequest, LocationAssetParams, ModelAssetParams, PlacementAssetParams,
    ProductType,
};
use crate::presets;
use crate::prompts;
use crate::server::{error_response, AppState};

/// Collected multipart form: text fields by name, uploaded files by name.
pub struct FormData {
    pub fields: HashMap<String, String>,
    pub files: HashMap<String, Vec<u8>>,
}

async fn collect_form(mut payload: Multipart) -> Result<FormData> {
    let mut fields = HashMap::new();
    let mut files = HashMap::new();

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| StudioError::RequestError(format!("malformed multipart payload: {}", e)))?
    {
        let name = field.name().to_string();
        let is_file = field.content_disposition().get_filename().is_some();

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk =
                chunk.map_err(|e| StudioError::RequestError(format!("upload failed: {}", e)))?;
            data.extend_from_slice(&chunk);
        }

        if is_file {
            files.insert(name, data);
        } else {
            fields.insert(name, String::from_utf8_lossy(&data).into_owned());
        }
    }

    Ok(FormData { fields, files })
}

impl FormData {
    fn text(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str).filter(|s| !s.is_empty())
    }
}

/// POST /api/generate. The multipart `actionType` field selects the branch;
/// the default branch is the try-on generation.
pub async fn generate_handler(state: web::Data<AppState>, payload: Multipart) -> HttpResponse {
    let form = match collect_form(payload).await {
        Ok(form) => form,
        Err(err) => return error_response(&err),
    };

    match form.text("actionType").unwrap_or("") {
        "generate-asset" => generate_asset_action(&state, &form).await,
        "delete-asset" => acknowledge_delete(&form, "assetId"),
        "delete-image" => acknowledge_delete(&form, "imageId"),
        "delete-images-batch" => acknowledge_batch_delete(&form),
        _ => try_on_action(&state, form).await,
    }
}

async fn generate_asset_action(state: &AppState, form: &FormData) -> HttpResponse {
    let kind = AssetKind::parse(form.text("assetType").unwrap_or("location"));
    let asset_name = form
        .text("assetName")
        .map(str::to_string)
        .unwrap_or_else(|| format!("asset-{}", Uuid::new_v4()));

    let prompt = match resolve_asset_prompt(kind, form) {
        Ok(prompt) => prompt,
        Err(err) => return error_response(&err),
    };

    log::info!("Generating {} asset '{}'", kind.as_str(), asset_name);

    let generated = match state.studio.generate_asset(&prompt).await {
        Ok(generated) => generated,
        Err(err) => {
            log::error!("Asset generation failed: {}", err);
            return error_response(&err);
        }
    };

    let image_url = match persist_asset(&state.assets_dir, kind, &generated.data_uri).await {
        Ok(url) => url,
        Err(err) => {
            log::error!("Failed to persist generated asset: {}", err);
            return error_response(&err);
        }
    };

    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "asset": {
            "id": format!("local-{}", Uuid::new_v4()),
            "type": kind.as_str(),
            "name": asset_name,
            "imageUrl": image_url,
            "createdAt": chrono::Utc::now().to_rfc3339(),
        }
    }))
}

/// An explicit `prompt` field wins; otherwise the prompt is built from typed
/// params, or from the product description for auto placements.
fn resolve_asset_prompt(kind: AssetKind, form: &FormData) -> Result<String> {
    if let Some(prompt) = form.text("prompt") {
        return Ok(prompt.to_string());
    }

    let seed = form
        .text("seed")
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(boundary_seed);

    match kind {
        AssetKind::Model => {
            let params: ModelAssetParams = parse_params(form)?;
            Ok(prompts::model_prompt(&params))
        }
        AssetKind::Location => {
            let params: LocationAssetParams = parse_params(form)?;
            Ok(prompts::location_prompt(&params))
        }
        AssetKind::Placement => {
            if form.text("params").is_some() {
                let mut params: PlacementAssetParams = parse_params(form)?;
                if params.seed == 0 {
                    params.seed = seed;
                }
                Ok(prompts::placement_prompt(&params))
            } else if let Some(title) = form.text("productTitle") {
                let category = form.text("productCategory").unwrap_or("");
                Ok(prompts::auto_placement_prompt(title, category, seed))
            } else {
                Err(StudioError::RequestError(
                    "prompt, params or productTitle is required".into(),
                ))
            }
        }
    }
}

fn parse_params<T: DeserializeOwned>(form: &FormData) -> Result<T> {
    let raw = form
        .text("params")
        .ok_or_else(|| StudioError::RequestError("prompt or params is required".into()))?;
    serde_json::from_str(raw)
        .map_err(|e| StudioError::RequestError(format!("invalid params payload: {}", e)))
}

async fn try_on_action(state: &AppState, form: FormData) -> HttpResponse {
    let product_image = match form.files.get("productImage").filter(|f| !f.is_empty()) {
        Some(bytes) => bytes.clone(),
        None => {
            return error_response(&StudioError::EmptyInputError("no product image uploaded".into()))
        }
    };

    let model_image = match form.text("modelId").filter(|id| *id != "no-model") {
        Some(id) => load_preset_image(&state.assets_dir, &["presets/models", "custom-assets"], id).await,
        None => None,
    };

    let location_image = match form.text("locationId").filter(|id| *id != "auto") {
        Some(id) => {
            load_preset_image(
                &state.assets_dir,
                &["presets/locations", "presets/placements", "custom-assets"],
                id,
            )
            .await
        }
        None => None,
    };

    let product_title = form.text("productTitle").unwrap_or("Product").to_string();
    let has_location_image = location_image.is_some();

    let request = GenerationRequest {
        product_image,
        model_image,
        location_image,
        product_type: ProductType::parse(form.text("productType").unwrap_or("clothing")),
        product_title: product_title.clone(),
        product_category: form.text("productCategory").unwrap_or("").to_string(),
        angle_index: form.text("angleIndex").and_then(|s| s.parse().ok()).unwrap_or(0),
        location_description: form.text("locationDescription").unwrap_or("").to_string(),
        has_location_image,
        variety_seed: form
            .text("seed")
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(boundary_seed),
    };

    match state.studio.generate_try_on(&request).await {
        Ok(generated) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "image": generated.data_uri,
            "title": format!("Generated {}", product_title),
        })),
        Err(err) => {
            log::error!("Try-on generation failed: {}", err);
            error_response(&err)
        }
    }
}

fn acknowledge_delete(form: &FormData, key: &str) -> HttpResponse {
    let id = form.text(key).unwrap_or("").to_string();
    HttpResponse::Ok().json(serde_json::json!({ "success": true, "deletedId": id }))
}

fn acknowledge_batch_delete(form: &FormData) -> HttpResponse {
    let ids: Vec<String> = form
        .text("imageIds")
        .and_then(|raw| serde_json::from_str(raw).ok())
        .unwrap_or_default();
    HttpResponse::Ok().json(serde_json::json!({ "success": true, "deletedIds": ids }))
}

async fn load_preset_image(assets_dir: &Path, sub_dirs: &[&str], id: &str) -> Option<Vec<u8>> {
    for sub in sub_dirs {
        if let Some(path) = presets::find_preset_file(&assets_dir.join(sub), id) {
            match tokio::fs::read(&path).await {
                Ok(bytes) => return Some(bytes),
                Err(err) => log::warn!("Failed to read preset {}: {}", path.display(), err),
            }
        }
    }
    log::warn!("No preset image found for id '{}'", id);
    None
}

async fn persist_asset(assets_dir: &Path, kind: AssetKind, data_uri: &str) -> Result<String> {
    let (extension, bytes) = split_data_uri(data_uri)?;

    let file_name = format!("generated-{}-{}.{}", kind.as_str(), Uuid::new_v4(), extension);
    let dir = assets_dir.join("custom-assets");
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| StudioError::InternalError(format!("could not create asset dir: {}", e)))?;
    tokio::fs::write(dir.join(&file_name), &bytes)
        .await
        .map_err(|e| StudioError::InternalError(format!("could not write asset: {}", e)))?;

    Ok(format!("/custom-assets/{}", file_name))
}

fn split_data_uri(data_uri: &str) -> Result<(&'static str, Vec<u8>)> {
    let rest = data_uri
        .strip_prefix("data:")
        .ok_or_else(|| StudioError::ResponseError("malformed data URI".into()))?;
    let (mime, payload) = rest
        .split_once(";base64,")
        .ok_or_else(|| StudioError::ResponseError("malformed data URI".into()))?;

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| StudioError::ResponseError(format!("invalid base64 payload: {}", e)))?;

    let extension = if mime == "image/png" { "png" } else { "jpg" };
    Ok((extension, bytes))
}

fn boundary_seed() -> u64 {
    chrono::Utc::now().timestamp_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeminiConfig;
    use crate::studio::StudioClient;
    use actix_web::{test, App};

    #[::core::prelude::v1::test]
    fn data_uri_splits_into_extension_and_bytes() {
        let (ext, bytes) = split_data_uri("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(ext, "png");
        assert_eq!(bytes, b"hello");

        let (ext, _) = split_data_uri("data:image/jpeg;base64,aGVsbG8=").unwrap();
        assert_eq!(ext, "jpg");

        assert!(split_data_uri("not-a-data-uri").is_err());
        assert!(split_data_uri("data:image/png;base64,!!!").is_err());
    }

    fn test_state() -> web::Data<AppState> {
        let studio = StudioClient::new(
            &GeminiConfig::new()
                .with_api_key("test-key")
                .with_api_base("http://127.0.0.1:9"),
        )
        .unwrap();
        web::Data::new(AppState {
            studio,
            kling: None,
            assets_dir: std::env::temp_dir(),
        })
    }

    fn multipart_body(boundary: &str, fields: &[(&str, &str)]) -> String {
        let mut body = String::new();
        for (name, value) in fields {
            body.push_str(&format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            ));
        }
        body.push_str(&format!("--{boundary}--\r\n"));
        body
    }

    #[actix_web::test]
    async fn delete_image_branch_acknowledges() {
        let app = test::init_service(
            App::new()
                .app_data(test_state())
                .route("/api/generate", web::post().to(generate_handler)),
        )
        .await;

        let boundary = "test-boundary";
        let body = multipart_body(
            boundary,
            &[("actionType", "delete-image"), ("imageId", "abc123")],
        );

        let request = test::TestRequest::post()
            .uri("/api/generate")
            .insert_header((
                "content-type",
                format!("multipart/form-data; boundary={}", boundary),
            ))
            .set_payload(body)
            .to_request();

        let response: serde_json::Value = test::call_and_read_body_json(&app, request).await;
        assert_eq!(response["success"], true);
        assert_eq!(response["deletedId"], "abc123");
    }

    #[actix_web::test]
    async fn try_on_without_product_image_is_bad_request() {
        let app = test::init_service(
            App::new()
                .app_data(test_state())
                .route("/api/generate", web::post().to(generate_handler)),
        )
        .await;

        let boundary = "test-boundary";
        let body = multipart_body(boundary, &[("productType", "clothing")]);

        let request = test::TestRequest::post()
            .uri("/api/generate")
            .insert_header((
                "content-type",
                format!("multipart/form-data; boundary={}", boundary),
            ))
            .set_payload(body)
            .to_request();

        let response = test::call_service(&app, request).await;
        assert_eq!(response.status().as_u16(), 400);
    }

    #[::core::prelude::v1::test]
    fn asset_prompt_resolution_prefers_explicit_prompt() {
        let mut fields = HashMap::new();
        fields.insert("prompt".to_string(), "a handwritten prompt".to_string());
        let form = FormData {
            fields,
            files: HashMap::new(),
        };

        let prompt = resolve_asset_prompt(AssetKind::Model, &form).unwrap();
        assert_eq!(prompt, "a handwritten prompt");
    }

    #[::core::prelude::v1::test]
    fn asset_prompt_builds_from_typed_params() {
        let mut fields = HashMap::new();
        fields.insert(
            "params".to_string(),
            r#"{"gender":"female","age":"mid-20s","emotion":"smiling"}"#.to_string(),
        );
        let form = FormData {
            fields,
            files: HashMap::new(),
        };

        let prompt = resolve_asset_prompt(AssetKind::Model, &form).unwrap();
        assert!(prompt.contains("warm, genuine smile"));

        let empty = FormData {
            fields: HashMap::new(),
            files: HashMap::new(),
        };
        assert!(resolve_asset_prompt(AssetKind::Model, &empty).is_err());
    }

    #[::core::prelude::v1::test]
    fn auto_placement_needs_a_product_title() {
        let mut fields = HashMap::new();
        fields.insert("productTitle".to_string(), "Midnight Rose Perfume".to_string());
        fields.insert("seed".to_string(), "42".to_string());
        let form = FormData {
            fields,
            files: HashMap::new(),
        };

        let prompt = resolve_asset_prompt(AssetKind::Placement, &form).unwrap();
        assert!(prompt.contains("Midnight Rose Perfume"));
        assert!(prompt.contains("[SEED: 42]"));

        let empty = FormData {
            fields: HashMap::new(),
            files: HashMap::new(),
        };
        assert!(resolve_asset_prompt(AssetKind::Placement, &empty).is_err());
    }
}
