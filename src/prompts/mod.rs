pub mod angles;
pub mod assets;
pub mod tryon;

pub use angles::{classify_size, distance_mandate, select_angle, SizeClass};
pub use assets::{auto_placement_prompt, location_prompt, model_prompt, placement_prompt};
pub use tryon::{clothing_prompt, item_prompt};

/// Shared composition mandate. Every template starts with this block
/// verbatim; it is the single source of truth for the 9:16 contract.
pub const ASPECT_RATIO_HEADER: &str = "[STRICT COMPOSITION]
- FORMAT: Cinematic 9:16 Vertical.
- MANDATE: Full-height portrait orientation.
- COMPOSITION: The scene must fill the entire canvas top-to-bottom.";

// Per-class negative prompts. Terms are uniformly parenthesized.

pub const CLOTHING_NEGATIVE_PROMPT: &str = "(landscape), (wide shot), (horizontal), (16:9), (4:3), (square), (gray wall), (plain background), (boring background), (flat lighting), (de-focused face), (blurry product), (messy edges), (studio equipment).";

pub const ITEM_NEGATIVE_PROMPT: &str = "(illustration), (3d render), (vector), (cartoon), (CGI), (perfect smoothness), (airbrushed skin), (yellow tint), (landscape), (horizontal), (black bars).";

pub const MODEL_NEGATIVE_PROMPT: &str = "(landscape), (horizontal), (black bars), (letterbox), (padding), (visible branding), (tattoos), (extra limbs).";

pub const LOCATION_NEGATIVE_PROMPT: &str = "(landscape), (horizontal), (black bars), (letterbox), (padding), (people), (hands), (skin), (products).";

pub const PLACEMENT_NEGATIVE_PROMPT: &str = "(people), (hands), (skin), (products), (landscape), (horizontal), (black bars), (letterbox).";

/// Fallback background text when a try-on request carries neither a location
/// image nor a description.
pub const CLOTHING_BACKGROUND_FALLBACK: &str = "Elegant e-commerce studio background";
pub const ITEM_BACKGROUND_FALLBACK: &str = "Elegant e-commerce studio context";
