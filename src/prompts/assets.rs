use crate::models::{
    LocationAssetParams, ModelAssetParams, PlacementAssetParams, PlacementCategory,
};
use crate::prompts::{
    ASPECT_RATIO_HEADER, LOCATION_NEGATIVE_PROMPT, MODEL_NEGATIVE_PROMPT,
    PLACEMENT_NEGATIVE_PROMPT,
};

const DEFAULT_MODEL_ATTIRE: &str = "The model is wearing a clean, crew-neck white t-shirt and simple, solid light-wash blue denim jeans. FOOTWEAR: Simple white sneakers.";

/// Text-only prompt for generating a reusable catalog model.
pub fn model_prompt(params: &ModelAssetParams) -> String {
    let mut accessories: Vec<&str> = Vec::new();
    if let Some(desc) = params.eyewear.description() {
        accessories.push(desc);
    }
    if let Some(desc) = params.jewelry.description() {
        accessories.push(desc);
    }
    let styling = if accessories.is_empty() {
        format!("STYLING: {}.", params.makeup.description())
    } else {
        format!(
            "STYLING: {}. ACCESSORIES: {}.",
            params.makeup.description(),
            accessories.join(", ")
        )
    };

    let clothing = params
        .notes
        .as_deref()
        .filter(|notes| !notes.is_empty())
        .unwrap_or(DEFAULT_MODEL_ATTIRE);

    format!(
        r#"{header}
ROLE: Commercial Fashion Photographer.
TASK: Generate a high-resolution, photorealistic image of a single model for a catalog.

--- MODEL IDENTITY ---
MODEL DESCRIPTION: {age} {ethnicity} {gender} model.
PHYSICAL FEATURES: {hair_color} {hair_length} hair, {body_type} body type, {height}.
{styling}
EMOTION / EXPRESSION: {emotion}.

--- AESTHETIC & VIBE ---
STYLE: {aesthetic}.

--- UNIFORM ATTIRE ---
CLOTHING: {clothing}

--- COMPOSITION & LIGHTING ---
BACKGROUND: Seamless, professional white studio background.
POSE: Standing naturally, full body shot.
FRAMING: Full body shot.
LIGHTING: Clean, bright, Soft, Diffused Lighting (4500K).

[NEGATIVE PROMPT]
{negative}"#,
        header = ASPECT_RATIO_HEADER,
        age = params.age,
        ethnicity = params.ethnicity,
        gender = params.gender,
        hair_color = params.hair_color,
        hair_length = params.hair_length,
        body_type = params.body_type,
        height = params.height.description(),
        styling = styling,
        emotion = params.emotion.description(),
        aesthetic = params.aesthetic.description(),
        clothing = clothing,
        negative = MODEL_NEGATIVE_PROMPT,
    )
}

/// Text-only prompt for generating a reusable location background.
pub fn location_prompt(params: &LocationAssetParams) -> String {
    let notes = params
        .notes
        .as_deref()
        .filter(|notes| !notes.is_empty())
        .unwrap_or("None");

    format!(
        r#"{header}
Professional product photography background setup.
Style: {setting} setting with {lighting} lighting, {style} aesthetic.
Notes: {notes}

IMPORTANT: This must be a PHOTOREALISTIC background, not an illustration or 3D render.
Requirements:
- Real photography of actual physical space
- Professional studio or location photography
- Natural lighting and shadows
- High-end commercial photography quality
- Shot on professional DSLR camera
- Empty background ready for product placement
- Sharp focus, high resolution 4K
- Clean, uncluttered composition

[NEGATIVE PROMPT]
{negative}"#,
        header = ASPECT_RATIO_HEADER,
        setting = params.setting,
        lighting = params.lighting,
        style = params.style,
        notes = notes,
        negative = LOCATION_NEGATIVE_PROMPT,
    )
}

/// Text-only prompt for generating an empty placement pedestal scene.
pub fn placement_prompt(params: &PlacementAssetParams) -> String {
    let category = PlacementCategory::normalize(&params.product_category);

    format!(
        r#"{header}
[TASK: Background Asset Generation]
- OBJECTIVE: Generate an EMPTY background scene for product placement.
- NO PRODUCTS: The central focus is an EMPTY {material}.
- NO HUMANS: Strictly no people, hands, or skin.
- CATEGORY VIBE: {vibe}.
- DECOR: Surrounded by {decor}.
- COMPOSITION: {view}
- ATMOSPHERE: {backdrop}, 8k quality, sharp focus on the pedestal. [SEED: {seed}]

[NEGATIVE PROMPT]
{negative}"#,
        header = ASPECT_RATIO_HEADER,
        material = params.material.description(),
        vibe = category.vibe(),
        decor = params.decor.description(),
        view = params.level.description(),
        backdrop = category.backdrop(),
        seed = params.seed,
        negative = PLACEMENT_NEGATIVE_PROMPT,
    )
}

/// Text-only prompt that lets the model choose material and environment from
/// the product description itself.
pub fn auto_placement_prompt(product_title: &str, product_category: &str, seed: u64) -> String {
    let product_info = if product_category.is_empty() {
        product_title.to_string()
    } else {
        format!("{} (Category: {})", product_title, product_category)
    };

    format!(
        r#"{header}
[TASK: Universal Smart Background Generation]
- OBJECTIVE: Generate a high-end, professionally styled background scene for product photography.
- CONTEXT: This background is being designed specifically for the product: "{product_info}".
- NO PRODUCTS: The scene must be EMPTY. No products, hands, or people.
- SMART STYLE SELECTION:
    1. Analyze the product "{product_info}".
    2. Select the most aesthetically appropriate MATERIAL for the central display platform (e.g., polished marble for skincare, dark velvet or glass for luxury watches, rustic oak for wine/spirits, minimalist concrete for tech).
    3. Select an ENVIRONMENT that matches the product's vibe (e.g., sun-drenched minimalist studio, moody luxury boutique, natural outdoor setting, or a high-end bar/cellar).
- COMPOSITION: A professional eye-level shot. The central platform should be the hero, ready to host the product.
- ATMOSPHERE: Sophisticated lighting, sharp focus, 8k quality. Cinematic shadows and reflections that enhance the sense of depth. [SEED: {seed}]
- RULES: No black bars, fill the 9:16 vertical frame completely.

[NEGATIVE PROMPT]
{negative}"#,
        header = ASPECT_RATIO_HEADER,
        product_info = product_info,
        seed = seed,
        negative = PLACEMENT_NEGATIVE_PROMPT,
    )
}
