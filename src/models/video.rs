use serde::{Deserialize, Serialize};

/// Input for an image-to-video task. The image is either a URL or a raw
/// base64 payload; the provider accepts both in the same field.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoTaskRequest {
    pub image: String,
    pub prompt: Option<String>,
    pub negative_prompt: Option<String>,
    pub model_name: Option<String>,
}

/// Provider envelope: `code` zero means success, anything else carries the
/// error in `message`.
#[derive(Debug, Deserialize)]
pub struct KlingEnvelope<T> {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoTask {
    pub task_id: String,
    pub task_status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoTaskStatus {
    pub task_id: String,
    pub task_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_status_msg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_result: Option<VideoTaskResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoTaskResult {
    #[serde(default)]
    pub videos: Vec<VideoUrl>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoUrl {
    pub url: String,
}

impl VideoTaskStatus {
    /// Terminal states for the provider's task lifecycle.
    pub fn is_terminal(&self) -> bool {
        matches!(self.task_status.as_str(), "succeed" | "failed")
    }

    pub fn video_url(&self) -> Option<&str> {
        self.task_result
            .as_ref()
            .and_then(|r| r.videos.first())
            .map(|v| v.url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_deserializes_success() {
        let json = r#"{"code":0,"message":"SUCCEED","data":{"task_id":"abc","task_status":"submitted"}}"#;
        let envelope: KlingEnvelope<VideoTask> = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.code, 0);
        assert_eq!(envelope.data.unwrap().task_id, "abc");
    }

    #[test]
    fn status_exposes_first_video_url() {
        let json = r#"{
            "task_id": "abc",
            "task_status": "succeed",
            "task_result": {"videos": [{"url": "https://cdn.example/video.mp4"}]}
        }"#;
        let status: VideoTaskStatus = serde_json::from_str(json).unwrap();
        assert!(status.is_terminal());
        assert_eq!(status.video_url(), Some("https://cdn.example/video.mp4"));
    }

    #[test]
    fn pending_status_is_not_terminal() {
        let status = VideoTaskStatus {
            task_id: "abc".into(),
            task_status: "processing".into(),
            task_status_msg: None,
            task_result: None,
        };
        assert!(!status.is_terminal());
        assert!(status.video_url().is_none());
    }
}
