use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::config::{KlingConfig, DEFAULT_KLING_API_BASE, DEFAULT_KLING_MODEL};
use crate::error::{Result, StudioError};
use crate::models::{KlingEnvelope, VideoTask, VideoTaskRequest, VideoTaskStatus};

const TOKEN_TTL_SECS: i64 = 1800;
const TOKEN_NOT_BEFORE_SKEW_SECS: i64 = 5;
const DEFAULT_VIDEO_PROMPT: &str = "Cinematic video of the product";

/// Claims for the provider's short-lived HS256 token, regenerated per call.
#[derive(Debug, Serialize, Deserialize)]
struct TokenClaims {
    iss: String,
    exp: i64,
    nbf: i64,
}

#[derive(Clone, Debug)]
pub struct KlingClient {
    http: reqwest::Client,
    api_base: String,
    access_key: String,
    secret_key: String,
    model: String,
}

impl KlingClient {
    pub fn new(config: &KlingConfig) -> Result<Self> {
        let access_key = config
            .access_key
            .clone()
            .ok_or_else(|| StudioError::ConfigError("KLING_ACCESS_KEY is missing".into()))?;
        let secret_key = config
            .secret_key
            .clone()
            .ok_or_else(|| StudioError::ConfigError("KLING_SECRET_KEY is missing".into()))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| StudioError::ConfigError(e.to_string()))?;

        let api_base = config
            .api_base
            .clone()
            .unwrap_or_else(|| DEFAULT_KLING_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();
        let model = config
            .model
            .clone()
            .unwrap_or_else(|| DEFAULT_KLING_MODEL.to_string());

        Ok(Self {
            http,
            api_base,
            access_key,
            secret_key,
            model,
        })
    }

    fn create_token(&self) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            iss: self.access_key.clone(),
            exp: now + TOKEN_TTL_SECS,
            nbf: now - TOKEN_NOT_BEFORE_SKEW_SECS,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret_key.as_bytes()),
        )
        .map_err(|e| StudioError::VideoApiError(e.to_string()))
    }

    /// Submit an image-to-video task. The image field carries a URL or raw
    /// base64; the provider accepts both.
    pub async fn create_video_task(&self, request: &VideoTaskRequest) -> Result<VideoTask> {
        let token = self.create_token()?;
        let body = serde_json::json!({
            "model_name": request.model_name.as_deref().unwrap_or(&self.model),
            "mode": "std",
            "image": request.image,
            "prompt": request.prompt.as_deref().unwrap_or(DEFAULT_VIDEO_PROMPT),
            "negative_prompt": request.negative_prompt.as_deref().unwrap_or(""),
            "duration": "5",
            "aspect_ratio": "9:16",
        });

        let url = format!("{}/videos/image2video", self.api_base);
        log::info!("Submitting video task: model={}", request.model_name.as_deref().unwrap_or(&self.model));

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| StudioError::RequestError(e.to_string()))?;

        let envelope: KlingEnvelope<VideoTask> = response
            .json()
            .await
            .map_err(|e| StudioError::ResponseError(e.to_string()))?;

        unwrap_envelope(envelope)
    }

    /// Fetch the current status of a submitted task. Polling cadence is the
    /// caller's concern.
    pub async fn task_status(&self, task_id: &str) -> Result<VideoTaskStatus> {
        let token = self.create_token()?;
        let url = format!("{}/videos/image2video/{}", self.api_base, task_id);

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| StudioError::RequestError(e.to_string()))?;

        let envelope: KlingEnvelope<VideoTaskStatus> = response
            .json()
            .await
            .map_err(|e| StudioError::ResponseError(e.to_string()))?;

        unwrap_envelope(envelope)
    }
}

fn unwrap_envelope<T>(envelope: KlingEnvelope<T>) -> Result<T> {
    if envelope.code != 0 {
        let message = if envelope.message.is_empty() {
            "no message available".to_string()
        } else {
            envelope.message
        };
        return Err(StudioError::VideoApiError(format!(
            "code {}: {}",
            envelope.code, message
        )));
    }
    envelope
        .data
        .ok_or_else(|| StudioError::VideoApiError("response carried no data".into()))
}
