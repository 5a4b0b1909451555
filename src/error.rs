use std::fmt;

#[derive(Debug)]
pub enum StudioError {
    ConfigError(String),
    EmptyInputError(String),
    ImageDecodeError(String),
    RequestError(String),
    ResponseError(String),
    GenerationFailedError(String),
    GenerationBlockedError(String),
    NoImageReturnedError(String),
    VideoApiError(String),
    InternalError(String),
}

impl fmt::Display for StudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StudioError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            StudioError::EmptyInputError(msg) => write!(f, "Empty input: {}", msg),
            StudioError::ImageDecodeError(msg) => write!(f, "Image decode error: {}", msg),
            StudioError::RequestError(msg) => write!(f, "Request error: {}", msg),
            StudioError::ResponseError(msg) => write!(f, "Response error: {}", msg),
            StudioError::GenerationFailedError(msg) => write!(f, "Generation failed: {}", msg),
            StudioError::GenerationBlockedError(reason) => write!(f, "Generation blocked: {}", reason),
            StudioError::NoImageReturnedError(msg) => write!(f, "No image returned: {}", msg),
            StudioError::VideoApiError(msg) => write!(f, "Video API error: {}", msg),
            StudioError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for StudioError {}

pub type Result<T> = std::result::Result<T, StudioError>;
