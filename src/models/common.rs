use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedImage {
    pub data_uri: String, // data:<mime>;base64,<payload>
    pub model: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Model,
    Location,
    Placement,
}

impl AssetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Model => "model",
            AssetKind::Location => "location",
            AssetKind::Placement => "placement",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "model" => AssetKind::Model,
            "placement" => AssetKind::Placement,
            _ => AssetKind::Location,
        }
    }
}
