pub mod types;

use std::time::Duration;

use crate::config::{GeminiConfig, DEFAULT_GEMINI_API_BASE, DEFAULT_GEMINI_MODEL};
use crate::error::{Result, StudioError};

pub use types::{
    Candidate, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    InlineData, Part, SafetySetting, FINISH_REASON_STOP,
};

/// Request-level hint; the vertical mandate in the prompt text is the real
/// enforcement, this just nudges the provider.
const VERTICAL_ASPECT_RATIO: &str = "9:16";

#[derive(Clone, Debug)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| StudioError::ConfigError("GOOGLE_API_KEY is missing".into()))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| StudioError::ConfigError(e.to_string()))?;

        let api_base = config
            .api_base
            .clone()
            .unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();
        let model = config
            .model
            .clone()
            .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());

        log::info!("Gemini client configured: base={}, model={}", api_base, model);

        Ok(Self {
            http,
            api_base,
            api_key,
            model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send an ordered part list to the generation endpoint.
    ///
    /// A failed call is retried exactly once with the identical payload; a
    /// second failure surfaces as `GenerationFailedError`. Provider-side blocks
    /// come back inside a successful response and are not retried here.
    pub async fn generate(&self, parts: Vec<Part>) -> Result<GenerateContentResponse> {
        let request = GenerateContentRequest {
            contents: vec![Content { parts }],
            generation_config: Some(GenerationConfig {
                aspect_ratio: VERTICAL_ASPECT_RATIO.to_string(),
            }),
            safety_settings: default_safety_settings(),
        };

        match self.send(&request).await {
            Ok(response) => Ok(response),
            Err(first) => {
                log::warn!("Generation attempt failed, retrying once: {}", first);
                self.send(&request).await.map_err(|retry| {
                    StudioError::GenerationFailedError(format!("{} (retry: {})", first, retry))
                })
            }
        }
    }

    async fn send(&self, request: &GenerateContentRequest) -> Result<GenerateContentResponse> {
        let url = format!("{}/models/{}:generateContent", self.api_base, self.model);
        log::debug!("Generation POST {}", url);

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| StudioError::RequestError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StudioError::RequestError(format!(
                "generation API returned {}: {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| StudioError::ResponseError(e.to_string()))
    }
}

fn default_safety_settings() -> Vec<SafetySetting> {
    [
        "HARM_CATEGORY_HARASSMENT",
        "HARM_CATEGORY_HATE_SPEECH",
        "HARM_CATEGORY_SEXUALLY_EXPLICIT",
        "HARM_CATEGORY_DANGEROUS_CONTENT",
    ]
    .iter()
    .map(|category| SafetySetting {
        category: category.to_string(),
        threshold: "BLOCK_NONE".to_string(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{web, App, HttpResponse, HttpServer};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    async fn flaky_generate(hits: web::Data<Arc<AtomicUsize>>) -> HttpResponse {
        if hits.fetch_add(1, Ordering::SeqCst) == 0 {
            HttpResponse::InternalServerError().body("transient upstream error")
        } else {
            HttpResponse::Ok().json(serde_json::json!({
                "candidates": [{
                    "finishReason": "STOP",
                    "content": {"parts": [
                        {"inlineData": {"mimeType": "image/png", "data": "aGVsbG8="}}
                    ]}
                }]
            }))
        }
    }

    fn spawn_flaky_server() -> (std::net::SocketAddr, Arc<AtomicUsize>, actix_web::dev::ServerHandle)
    {
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_for_server = hits.clone();
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let server = HttpServer::new(move || {
            App::new()
                .app_data(web::Data::new(hits_for_server.clone()))
                .default_service(web::post().to(flaky_generate))
        })
        .listen(listener)
        .unwrap()
        .workers(1)
        .run();

        let handle = server.handle();
        actix_web::rt::spawn(server);
        (addr, hits, handle)
    }

    #[actix_web::test]
    async fn retries_exactly_once_then_succeeds() {
        let (addr, hits, handle) = spawn_flaky_server();

        let config = GeminiConfig::new()
            .with_api_key("test-key")
            .with_api_base(format!("http://{}", addr));
        let client = GeminiClient::new(&config).unwrap();

        let response = client.generate(vec![Part::text("a prompt")]).await.unwrap();

        // First attempt fails, the single retry succeeds, no third call.
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        let candidate = &response.candidates[0];
        assert_eq!(candidate.finish_reason.as_deref(), Some(FINISH_REASON_STOP));

        handle.stop(false).await;
    }

    #[actix_web::test]
    async fn exhausted_retry_is_generation_failed() {
        // Nothing listens here; both attempts fail at the transport.
        let config = GeminiConfig::new()
            .with_api_key("test-key")
            .with_api_base("http://127.0.0.1:9".to_string());
        let client = GeminiClient::new(&config).unwrap();

        let err = client.generate(vec![Part::text("a prompt")]).await.unwrap_err();
        assert!(matches!(err, StudioError::GenerationFailedError(_)));
    }

    #[test]
    fn missing_api_key_is_config_error() {
        let err = GeminiClient::new(&GeminiConfig::new()).unwrap_err();
        assert!(matches!(err, StudioError::ConfigError(_)));
    }
}
