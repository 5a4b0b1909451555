pub mod config;
pub mod error;
pub mod gemini;
pub mod imaging;
pub mod kling;
pub mod logger;
pub mod models;
pub mod presets;
pub mod prompts;
pub mod server;
pub mod studio;

pub use config::{Config, GeminiConfig, KlingConfig, ServerConfig};
pub use error::{Result, StudioError};
pub use gemini::GeminiClient;
pub use kling::KlingClient;
pub use models::*;
pub use presets::{load_presets, PresetCatalog, PresetEntry};
pub use studio::StudioClient;
