use serde::Deserialize;

// Choice domains for asset generation are closed enums with exhaustive
// description tables. Unknown input strings fall back to the domain default
// instead of leaking raw user text into prompts.

macro_rules! deserialize_via_parse {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl<'de> serde::Deserialize<'de> for $ty {
                fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
                where
                    D: serde::Deserializer<'de>,
                {
                    let s = String::deserialize(deserializer)?;
                    Ok(<$ty>::parse(&s))
                }
            }
        )+
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Emotion {
    #[default]
    Neutral,
    Smiling,
    Laughing,
    Flirty,
    Expressive,
}

impl Emotion {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "smiling" => Emotion::Smiling,
            "laughing" => Emotion::Laughing,
            "flirty" => Emotion::Flirty,
            "expressive" => Emotion::Expressive,
            _ => Emotion::Neutral,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Emotion::Neutral => "neutral, calm expression",
            Emotion::Smiling => "warm, genuine smile",
            Emotion::Laughing => "joyful, natural laugh with visible happiness",
            Emotion::Flirty => {
                "playful, confident expression with slight smile and engaging eye contact"
            }
            Emotion::Expressive => {
                "dynamic, animated expression showing strong emotion and personality"
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Aesthetic {
    #[default]
    UgcAuthentic,
    HighFashion,
    BusinessCasual,
    Athleisure,
}

impl Aesthetic {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "high-fashion" => Aesthetic::HighFashion,
            "business-casual" => Aesthetic::BusinessCasual,
            "athleisure" => Aesthetic::Athleisure,
            _ => Aesthetic::UgcAuthentic,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Aesthetic::UgcAuthentic => {
                "Authentic UGC style, natural lighting, candid feel, minimal retouching"
            }
            Aesthetic::HighFashion => {
                "High-end editorial fashion, glossy finish, perfect lighting, professional retouching"
            }
            Aesthetic::BusinessCasual => "Professional business casual look, clean and polished",
            Aesthetic::Athleisure => "Active and sporty lifestyle aesthetic, dynamic and energetic",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Makeup {
    NoMakeup,
    #[default]
    Natural,
    Glam,
}

impl Makeup {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "no-makeup" => Makeup::NoMakeup,
            "glam" => Makeup::Glam,
            _ => Makeup::Natural,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Makeup::NoMakeup => "No makeup, completely natural bare skin look",
            Makeup::Natural => "Natural daily makeup, fresh face",
            Makeup::Glam => "Heavy glam makeup, bold features, evening look",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeightClass {
    Short,
    #[default]
    Average,
    Tall,
}

impl HeightClass {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "short" => HeightClass::Short,
            "tall" => HeightClass::Tall,
            _ => HeightClass::Average,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            HeightClass::Short => "Short / Petite height (approx 160cm)",
            HeightClass::Average => "Average height (approx 170cm)",
            HeightClass::Tall => "Tall model height (approx 180cm+)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Eyewear {
    #[default]
    None,
    Glasses,
    Sunglasses,
}

impl Eyewear {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "glasses" => Eyewear::Glasses,
            "sunglasses" => Eyewear::Sunglasses,
            _ => Eyewear::None,
        }
    }

    pub fn description(&self) -> Option<&'static str> {
        match self {
            Eyewear::None => None,
            Eyewear::Glasses => Some("wearing prescription glasses"),
            Eyewear::Sunglasses => Some("wearing stylish sunglasses"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Jewelry {
    #[default]
    None,
    Minimal,
    Statement,
}

impl Jewelry {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "minimal" => Jewelry::Minimal,
            "statement" => Jewelry::Statement,
            _ => Jewelry::None,
        }
    }

    pub fn description(&self) -> Option<&'static str> {
        match self {
            Jewelry::None => None,
            Jewelry::Minimal => Some("wearing minimal delicate jewelry"),
            Jewelry::Statement => Some("wearing bold statement jewelry"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlacementMaterial {
    #[default]
    Marble,
    Wood,
    Concrete,
    Velvet,
    Glass,
    Botanical,
    Sandstone,
}

impl PlacementMaterial {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "wood" => PlacementMaterial::Wood,
            "concrete" => PlacementMaterial::Concrete,
            "velvet" => PlacementMaterial::Velvet,
            "glass" => PlacementMaterial::Glass,
            "botanical" => PlacementMaterial::Botanical,
            "sandstone" => PlacementMaterial::Sandstone,
            _ => PlacementMaterial::Marble,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PlacementMaterial::Marble => {
                "a smooth, polished white marble pedestal with subtle grey veining"
            }
            PlacementMaterial::Wood => "a natural light oak wooden platform with visible grain",
            PlacementMaterial::Concrete => "a minimalist raw concrete slab with industrial texture",
            PlacementMaterial::Velvet => "a luxurious soft velvet-covered jewelry stand",
            PlacementMaterial::Glass => "a clean frosted glass block with soft internal light",
            PlacementMaterial::Botanical => "a platform made of stacked tropical leaves",
            PlacementMaterial::Sandstone => "a rough-hewn natural sandstone block",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlacementDecor {
    #[default]
    Organic,
    Minimalist,
    Luxury,
    Floral,
    Nature,
    Seasonal,
    Industrial,
}

impl PlacementDecor {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "minimalist" => PlacementDecor::Minimalist,
            "luxury" => PlacementDecor::Luxury,
            "floral" => PlacementDecor::Floral,
            "nature" => PlacementDecor::Nature,
            "seasonal" => PlacementDecor::Seasonal,
            "industrial" => PlacementDecor::Industrial,
            _ => PlacementDecor::Organic,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PlacementDecor::Organic => "pampas grass and smooth river stones",
            PlacementDecor::Minimalist => "stark clean lines with no props",
            PlacementDecor::Luxury => "gold accents and silk fabric",
            PlacementDecor::Floral => "delicate petals and leaves",
            PlacementDecor::Nature => "moss and weathered rocks",
            PlacementDecor::Seasonal => "pine cones and seasonal elements",
            PlacementDecor::Industrial => "wire mesh and metal accents",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraLevel {
    #[default]
    EyeLevel,
    TopDown,
    Macro,
}

impl CameraLevel {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "top-down" => CameraLevel::TopDown,
            "macro" => CameraLevel::Macro,
            _ => CameraLevel::EyeLevel,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CameraLevel::EyeLevel => "Eye-level professional product photography shot.",
            CameraLevel::TopDown => "Top-down flat lay perspective.",
            CameraLevel::Macro => "Macro close-up, focusing on the texture of the surface.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlacementCategory {
    Skincare,
    Drinks,
    Jewelry,
    Food,
    #[default]
    General,
}

impl PlacementCategory {
    /// Best-effort keyword normalization of a free-form product category.
    pub fn normalize(category: &str) -> Self {
        let c = category.to_lowercase();
        if c.contains("skincare") || c.contains("beauty") || c.contains("cosmet") {
            PlacementCategory::Skincare
        } else if c.contains("drink") || c.contains("beverag") || c.contains("bottle") {
            PlacementCategory::Drinks
        } else if c.contains("jewel") || c.contains("watch") || c.contains("access") {
            PlacementCategory::Jewelry
        } else if c.contains("food") || c.contains("snack") || c.contains("cook") {
            PlacementCategory::Food
        } else {
            PlacementCategory::General
        }
    }

    pub fn vibe(&self) -> &'static str {
        match self {
            PlacementCategory::Skincare => "minimalist and clean",
            PlacementCategory::Drinks => "vibrant and refreshing",
            PlacementCategory::Jewelry => "luxurious and high-contrast",
            PlacementCategory::Food => "warm and rustic",
            PlacementCategory::General => "modern and professional",
        }
    }

    pub fn backdrop(&self) -> &'static str {
        match self {
            PlacementCategory::Skincare => "soft pastel or bright white",
            PlacementCategory::Drinks => "natural outdoor or modern bar",
            PlacementCategory::Jewelry => "dark velvet or mirrors",
            PlacementCategory::Food => "wooden kitchen or linen textile",
            PlacementCategory::General => "soft-focus interior",
        }
    }

    pub fn accent(&self) -> &'static str {
        match self {
            PlacementCategory::Skincare => "glass reflections and water droplets",
            PlacementCategory::Drinks => "ice cubes and fresh citrus slices",
            PlacementCategory::Jewelry => "sharp highlights and bokeh flares",
            PlacementCategory::Food => "herbs and scattered ingredients",
            PlacementCategory::General => "subtle lifestyle props",
        }
    }
}

deserialize_via_parse!(
    Emotion,
    Aesthetic,
    Makeup,
    HeightClass,
    Eyewear,
    Jewelry,
    PlacementMaterial,
    PlacementDecor,
    CameraLevel,
);

/// Parameters for generating a reusable model asset. Descriptors the prompt
/// interpolates verbatim stay free-form strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelAssetParams {
    pub gender: String,
    pub age: String,
    pub ethnicity: String,
    pub hair_color: String,
    pub hair_length: String,
    pub body_type: String,
    pub emotion: Emotion,
    pub aesthetic: Aesthetic,
    pub makeup: Makeup,
    pub height: HeightClass,
    pub eyewear: Eyewear,
    pub jewelry: Jewelry,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocationAssetParams {
    pub setting: String,
    pub lighting: String,
    pub style: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlacementAssetParams {
    pub product_category: String,
    pub material: PlacementMaterial,
    pub decor: PlacementDecor,
    pub level: CameraLevel,
    pub seed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_values_fall_back_to_defaults() {
        assert_eq!(Emotion::parse("brooding"), Emotion::Neutral);
        assert_eq!(Aesthetic::parse("vaporwave"), Aesthetic::UgcAuthentic);
        assert_eq!(Makeup::parse(""), Makeup::Natural);
        assert_eq!(HeightClass::parse("gigantic"), HeightClass::Average);
        assert_eq!(PlacementMaterial::parse("obsidian"), PlacementMaterial::Marble);
        assert_eq!(CameraLevel::parse("dutch-angle"), CameraLevel::EyeLevel);
    }

    #[test]
    fn known_values_parse() {
        assert_eq!(Emotion::parse("flirty"), Emotion::Flirty);
        assert_eq!(Makeup::parse("no-makeup"), Makeup::NoMakeup);
        assert_eq!(Eyewear::parse("sunglasses"), Eyewear::Sunglasses);
        assert_eq!(Jewelry::parse("statement"), Jewelry::Statement);
        assert_eq!(PlacementDecor::parse("industrial"), PlacementDecor::Industrial);
    }

    #[test]
    fn accessory_domains_have_silent_none() {
        assert!(Eyewear::None.description().is_none());
        assert!(Jewelry::parse("nope").description().is_none());
    }

    #[test]
    fn category_normalization_keywords() {
        assert_eq!(
            PlacementCategory::normalize("Beauty & Cosmetics"),
            PlacementCategory::Skincare
        );
        assert_eq!(PlacementCategory::normalize("Energy Drinks"), PlacementCategory::Drinks);
        assert_eq!(PlacementCategory::normalize("Luxury Watches"), PlacementCategory::Jewelry);
        assert_eq!(PlacementCategory::normalize("Office Chairs"), PlacementCategory::General);
    }

    #[test]
    fn params_deserialize_with_unknown_choices() {
        let params: ModelAssetParams = serde_json::from_str(
            r#"{"gender":"female","emotion":"smirking","makeup":"glam","height":"tall"}"#,
        )
        .unwrap();
        assert_eq!(params.gender, "female");
        assert_eq!(params.emotion, Emotion::Neutral);
        assert_eq!(params.makeup, Makeup::Glam);
        assert_eq!(params.height, HeightClass::Tall);
        assert!(params.notes.is_none());
    }

    #[test]
    fn placement_params_defaults() {
        let params: PlacementAssetParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.material, PlacementMaterial::Marble);
        assert_eq!(params.decor, PlacementDecor::Organic);
        assert_eq!(params.level, CameraLevel::EyeLevel);
        assert_eq!(params.seed, 0);
    }
}
