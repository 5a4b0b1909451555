pub mod generate;

use std::path::PathBuf;

use actix_web::{web, App, HttpResponse, HttpServer};
use serde::Serialize;

use crate::config::Config;
use crate::error::StudioError;
use crate::kling::KlingClient;
use crate::models::VideoTaskRequest;
use crate::presets;
use crate::studio::StudioClient;

pub struct AppState {
    pub studio: StudioClient,
    pub kling: Option<KlingClient>,
    pub assets_dir: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}

/// Map an error to its boundary status. Failed generations still produce a
/// well-formed JSON body so batch callers can render per-item failures.
pub fn error_response(err: &StudioError) -> HttpResponse {
    let body = ErrorBody {
        success: false,
        error: err.to_string(),
    };

    match err {
        StudioError::EmptyInputError(_)
        | StudioError::ImageDecodeError(_)
        | StudioError::RequestError(_) => HttpResponse::BadRequest().json(body),
        StudioError::GenerationBlockedError(_) => HttpResponse::UnprocessableEntity().json(body),
        StudioError::GenerationFailedError(_)
        | StudioError::NoImageReturnedError(_)
        | StudioError::VideoApiError(_) => HttpResponse::BadGateway().json(body),
        StudioError::ConfigError(_) => HttpResponse::ServiceUnavailable().json(body),
        StudioError::ResponseError(_) | StudioError::InternalError(_) => {
            HttpResponse::InternalServerError().json(body)
        }
    }
}

pub async fn run(config: Config) -> std::io::Result<()> {
    let studio = StudioClient::new(&config.gemini)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    let kling = if config.kling.is_configured() {
        match KlingClient::new(&config.kling) {
            Ok(client) => Some(client),
            Err(err) => {
                log::warn!("Video client unavailable: {}", err);
                None
            }
        }
    } else {
        log::warn!("Video generation disabled: Kling credentials not configured");
        None
    };

    let assets_dir = PathBuf::from(config.server.assets_dir_or_default());
    let port = config.server.port_or_default();
    let state = web::Data::new(AppState {
        studio,
        kling,
        assets_dir,
    });

    log::info!("Serving API on port {}", port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .route("/api/generate", web::post().to(generate::generate_handler))
            .route("/api/presets", web::get().to(presets_handler))
            .route("/api/videos", web::post().to(create_video_handler))
            .route("/api/videos/{task_id}", web::get().to(video_status_handler))
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}

async fn presets_handler(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(presets::load_presets(&state.assets_dir))
}

async fn create_video_handler(
    state: web::Data<AppState>,
    body: web::Json<VideoTaskRequest>,
) -> HttpResponse {
    let client = match &state.kling {
        Some(client) => client,
        None => {
            return error_response(&StudioError::ConfigError(
                "video generation is not configured".into(),
            ))
        }
    };

    match client.create_video_task(&body).await {
        Ok(task) => HttpResponse::Ok().json(serde_json::json!({ "success": true, "task": task })),
        Err(err) => {
            log::error!("Video task submission failed: {}", err);
            error_response(&err)
        }
    }
}

async fn video_status_handler(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> HttpResponse {
    let client = match &state.kling {
        Some(client) => client,
        None => {
            return error_response(&StudioError::ConfigError(
                "video generation is not configured".into(),
            ))
        }
    };

    match client.task_status(&path).await {
        Ok(status) => {
            HttpResponse::Ok().json(serde_json::json!({ "success": true, "task": status }))
        }
        Err(err) => {
            log::error!("Video status lookup failed: {}", err);
            error_response(&err)
        }
    }
}
