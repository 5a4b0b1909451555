use std::env;

pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_KLING_API_BASE: &str = "https://api-singapore.klingai.com/v1";
pub const DEFAULT_KLING_MODEL: &str = "kling-v2-5-turbo";

// Returned text-to-image outputs within this many pixels of square get the
// forced vertical crop. Provider behavior, not a documented contract.
pub const DEFAULT_SQUARE_CROP_TOLERANCE: u32 = 50;

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub api_base: Option<String>,
    pub model: Option<String>,
    pub square_crop_tolerance: Option<u32>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            api_key: None,
            api_base: None,
            model: None,
            square_crop_tolerance: None,
        }
    }
}

impl GeminiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let api_key = env::var("GOOGLE_API_KEY").ok();
        let api_base = env::var("GEMINI_API_BASE").ok();
        let model = env::var("GEMINI_IMAGE_MODEL").ok();
        let square_crop_tolerance = env::var("SQUARE_CROP_TOLERANCE")
            .ok()
            .and_then(|s| s.parse().ok());

        GeminiConfig {
            api_key,
            api_base,
            model,
            square_crop_tolerance,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_square_crop_tolerance(mut self, tolerance: u32) -> Self {
        self.square_crop_tolerance = Some(tolerance);
        self
    }
}

#[derive(Debug, Clone)]
pub struct KlingConfig {
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub api_base: Option<String>,
    pub model: Option<String>,
}

impl Default for KlingConfig {
    fn default() -> Self {
        KlingConfig {
            access_key: None,
            secret_key: None,
            api_base: None,
            model: None,
        }
    }
}

impl KlingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let access_key = env::var("KLING_ACCESS_KEY").ok();
        let secret_key = env::var("KLING_SECRET_KEY").ok();
        let api_base = env::var("KLING_API_BASE").ok();
        let model = env::var("KLING_MODEL").ok();

        KlingConfig {
            access_key,
            secret_key,
            api_base,
            model,
        }
    }

    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn is_configured(&self) -> bool {
        self.access_key.is_some() && self.secret_key.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: Option<u16>,
    pub assets_dir: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            port: None,
            assets_dir: None,
        }
    }
}

impl ServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let port = env::var("PORT").ok().and_then(|port| port.parse().ok());
        let assets_dir = env::var("ASSETS_DIR").ok();

        ServerConfig { port, assets_dir }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_assets_dir(mut self, assets_dir: impl Into<String>) -> Self {
        self.assets_dir = Some(assets_dir.into());
        self
    }

    pub fn port_or_default(&self) -> u16 {
        self.port.unwrap_or(8080)
    }

    pub fn assets_dir_or_default(&self) -> String {
        self.assets_dir
            .clone()
            .unwrap_or_else(|| "public".to_string())
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub gemini: GeminiConfig,
    pub kling: KlingConfig,
    pub server: ServerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            gemini: GeminiConfig::default(),
            kling: KlingConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Config {
            gemini: GeminiConfig::from_env(),
            kling: KlingConfig::from_env(),
            server: ServerConfig::from_env(),
        }
    }

    pub fn with_gemini(mut self, config: GeminiConfig) -> Self {
        self.gemini = config;
        self
    }

    pub fn with_kling(mut self, config: KlingConfig) -> Self {
        self.kling = config;
        self
    }

    pub fn with_server(mut self, config: ServerConfig) -> Self {
        self.server = config;
        self
    }
}
