use crate::models::{PartNumbering, PartRole};
use crate::prompts::angles::{classify_size, distance_mandate};
use crate::prompts::{
    ASPECT_RATIO_HEADER, CLOTHING_BACKGROUND_FALLBACK, CLOTHING_NEGATIVE_PROMPT,
    ITEM_BACKGROUND_FALLBACK, ITEM_NEGATIVE_PROMPT,
};

/// Compositing instructions for a clothing try-on.
///
/// Image numbering tracks which inputs are actually present; templates never
/// inspect buffers, only the explicit presence flags.
pub fn clothing_prompt(
    product_title: &str,
    angle_variation: &str,
    location_description: &str,
    has_model_image: bool,
    has_location_image: bool,
    seed: u64,
) -> String {
    let refs = PartNumbering::new(has_model_image, has_location_image);
    let product_label = format!("Image {}", refs.product());
    let background_label = refs.label(PartRole::Background);
    let ratio_labels = refs.all_labels().join(" or ");

    let identity_line = match refs.identity() {
        Some(n) => format!("Face and Hair from Image {}.", n),
        None => "No reference face is supplied. Generate a suitable photorealistic model."
            .to_string(),
    };

    let background_line = match &background_label {
        Some(bg) => format!("USE {} AS THE ABSOLUTE BACKGROUND.", bg),
        None => {
            let description = if location_description.is_empty() {
                CLOTHING_BACKGROUND_FALLBACK
            } else {
                location_description
            };
            format!(
                "GENERATE A NEW BACKGROUND: \"{}\". MUST BE VERTICAL 9:16.",
                description
            )
        }
    };

    let geometry = match &background_label {
        Some(bg) => format!(
            r#"1.  MANDATORY DEPTH: Seamlessly integrate the model INTO the 3D space of {bg}.
2.  CONTACT PHYSICS:
    - FEET: Both feet MUST be firmly planted on the floor plane of {bg}. ZERO GAP between shoes and floor.
    - OBJECT COLLISION: Identify all furniture and fixtures (Tables, Chairs, Sinks, Bathtubs, Counters).
    - NO CLIPPING: The model's body MUST NOT clip through, penetrate, or stand inside background objects. The model stands in front of or adjacent to them.
3.  PERSPECTIVE: The model's size must match the scale of the background objects (Sink/Table = Hip height, Chair/Tub = Knee height)."#,
        ),
        None => r#"1.  ENVIRONMENT DESIGN: Generate a high-fashion, high-quality VERTICAL environment around the subject.
2.  PORTRAIT PERSPECTIVE: The subject MUST be centered and grounded on a vertical floor plane.
3.  VERTICAL COMPOSITION: The background scene must be architecturally designed for the 9:16 frame. Avoid wide horizontals."#
            .to_string(),
    };

    let verticality = match &background_label {
        Some(bg) => format!(
            "If {} is horizontal, crop it to the center to fit the 9:16 mandate.",
            bg
        ),
        None => "Render the new background strictly in 9:16 portrait mode.".to_string(),
    };

    let lighting_source = background_label
        .clone()
        .unwrap_or_else(|| "the new background".to_string());

    format!(
        r#"{header}
/// MASTER CLOTHING COMPOSITOR v7: FURNITURE & PERSPECTIVE LOCK ///
[STRICT DIMENSIONS]
- ASPECT RATIO: 9:16 Vertical (Story Format).
- ORIENTATION: Portrait Only.
- MANDATE: The entire scene, including any generated background, MUST be vertical.
- RATIO LOCK: DO NOT match the aspect ratio of {ratio_labels}. Output MUST be 1080x1920 (9:16).
- [VARIETY SEED]: {seed}

[INPUTS]
- IDENTITY: {identity_line}
- PRODUCT: Clothing from {product_label} ("{product_title}").
- BACKGROUND: {background_line}

[STEP 1: OUTFIT RECONSTRUCTION & ANTI-LAZINESS]
1.  ZERO PIXEL REUSE: REDRAW the model's body, skin, and clothing from scratch in the new pose.
2.  OUTFIT COMPLETION:
    - IF upper garment: Generate matching high-fashion trousers/skirt.
    - IF lower garment: Generate matching high-fashion top.

[STEP 2: GEOMETRY & SPACE INTERACTION]
{geometry}

[STEP 3: FRAMING & ANATOMY]
1.  {angle_variation}
2.  PROXIMITY: Model must occupy 85-90% of the vertical frame.
3.  VERTICALITY: Mandatory vertical 9:16 framing. {verticality}
4.  NO HORIZONTAL LEAKAGE: There must be ZERO horizontal white space or landscape-style framing. The composition must be inherently vertical.

[STEP 4: RENDER & LIGHTING]
- LIGHTING SOURCE: Derived exclusively from {lighting_source}.
- SHADOWS: Cast accurate contact shadows on the floor and supporting furniture.
- TEXTURE: 8k photorealistic texture fidelity.

[NEGATIVE PROMPT]
{negative}"#,
        header = ASPECT_RATIO_HEADER,
        ratio_labels = ratio_labels,
        seed = seed,
        identity_line = identity_line,
        product_label = product_label,
        product_title = product_title,
        background_line = background_line,
        geometry = geometry,
        angle_variation = angle_variation,
        verticality = verticality,
        lighting_source = lighting_source,
        negative = CLOTHING_NEGATIVE_PROMPT,
    )
}

/// Compositing instructions for a held/worn item try-on.
pub fn item_prompt(
    product_title: &str,
    product_category: &str,
    angle_variation: &str,
    location_description: &str,
    has_model_image: bool,
    has_location_image: bool,
    seed: u64,
) -> String {
    let refs = PartNumbering::new(has_model_image, has_location_image);
    let product_label = format!("Image {}", refs.product());
    let background_label = refs.label(PartRole::Background);
    let category = product_category.to_lowercase();

    let identity_line = match refs.identity() {
        Some(n) => format!("Face/Hair from Image {}.", n),
        None => "No reference face is supplied. Generate a suitable photorealistic model."
            .to_string(),
    };

    let background_line = match &background_label {
        Some(bg) => format!("Use {}.", bg),
        None => {
            let description = if location_description.is_empty() {
                ITEM_BACKGROUND_FALLBACK
            } else {
                location_description
            };
            format!(
                "GENERATE RICH CONTEXTUAL BACKGROUND in 9:16 based on: \"{}\". NO GRAY WALLS. NO PLAIN BACKGROUNDS.",
                description
            )
        }
    };

    let lighting = match &background_label {
        Some(bg) => format!(
            "LIGHTING: MATCH the lighting of Background {} perfectly. Use its shadows and highlights as the master template.",
            bg
        ),
        None if !location_description.is_empty() => format!(
            "LIGHTING: Match the natural atmosphere of \"{}\".",
            location_description
        ),
        None => "LIGHTING: High-quality professional studio lighting. Neutral balance.".to_string(),
    };

    let outfit_line = match refs.identity() {
        Some(n) => format!("- DISCARD Image {} body. Generate NEW contextual outfit.", n),
        None => "- Generate a NEW model with a contextual outfit.".to_string(),
    };

    let framing = distance_mandate(classify_size(&category, product_title));

    format!(
        r#"/// ADAPTIVE VERTICAL GENERATION ///
{header}

**CRITICAL: VERTICAL CANVAS FILL**
Generate a rich, immersive 9:16 scene that extends to all four edges of the frame.
The background must bleed into the boundaries of the vertical frame.
If generating background automatically, ensure it occupies 100% of the vertical canvas.
[VARIETY SEED]: {seed}

[INPUTS]
- IDENTITY: {identity_line}
- PRODUCT: {product_label} ("{product_title}"). Category: {category}.
- BG: {background_line}

--- UNIVERSAL RULES ---

**RULE 1: SKIN TEXTURE (CRITICAL)**
High-fidelity photorealistic skin rendering.
Visible pores, natural skin texture, realistic grain.
NO airbrushing. NO plastic-looking skin. NO blur. NO smoothing filters.

**RULE 2: THE BARRIER LAW (STATE)**
If action is "Interaction" (Angle 1, 2) and product is a container:
- The cap/lid/top MUST be removed and placed out of frame or held.
- The nozzle/opening MUST be exposed.
- Never show liquid or cream passing through a closed solid lid.

**RULE 3: BRAND SAFETY & HANDS**
- LABEL PROTECTION: Fingers must ONLY touch the sides or base of "{product_title}".
- LOGOTYPE CLEARANCE: The main logo/text MUST be 100% visible and facing the camera.
- ANATOMY: Exactly 2 hands. Realistic grip tension.

**RULE 4: ADAPTIVE FRAMING**
{framing}
COMPOSITION: Vertical alignment. If the product is large, it must fit its entire height into the frame.

[STEP 1: OUTFIT & BODY]
{outfit_line}
- Examples: Wine -> Evening Wear. Shaker -> Fitness Wear. Watch -> Business Casual / Modern Lifestyle Wear.

[STEP 2: CAMERA LOGIC]
{angle_variation}

[STEP 3: PHOTOGRAPHIC RENDER]
{lighting}
**RULE 5: PHOTOGRAPHIC INTEGRITY (CRITICAL)**
- MANDATE: The entire scene (model, product, background) MUST be rendered as a single raw photographic shot.
- REQUIRED: Natural photographic grain (ISO noise), subtle lens imperfections, and authentic color depth.
- PROHIBIT: Digital illustrations, 3D renders, vector lines, and airbrushed "perfect" cleanliness.
- DETAIL: Render micro-pores on skin, dust particles on product glass, and brushed metal textures.

[NEGATIVE PROMPT]
{negative}"#,
        header = ASPECT_RATIO_HEADER,
        seed = seed,
        identity_line = identity_line,
        product_label = product_label,
        product_title = product_title,
        category = category,
        background_line = background_line,
        framing = framing,
        outfit_line = outfit_line,
        angle_variation = angle_variation,
        lighting = lighting,
        negative = ITEM_NEGATIVE_PROMPT,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProductType;
    use crate::prompts::angles::select_angle;

    #[test]
    fn clothing_prompt_is_deterministic() {
        let angle = select_angle(ProductType::Clothing, 0, "");
        let a = clothing_prompt("Linen Shirt", &angle, "rooftop bar", true, true, 42);
        let b = clothing_prompt("Linen Shirt", &angle, "rooftop bar", true, true, 42);
        assert_eq!(a, b);
    }

    #[test]
    fn item_prompt_is_deterministic() {
        let angle = select_angle(ProductType::Item, 1, "Gold Watch");
        let a = item_prompt("Gold Watch", "Accessories", &angle, "", false, false, 7);
        let b = item_prompt("Gold Watch", "Accessories", &angle, "", false, false, 7);
        assert_eq!(a, b);
    }

    #[test]
    fn clothing_prompt_full_request_numbers_all_inputs() {
        let angle = select_angle(ProductType::Clothing, 0, "");
        let prompt = clothing_prompt("Linen Shirt", &angle, "", true, true, 0);
        assert!(prompt.contains("Face and Hair from Image 1."));
        assert!(prompt.contains(r#"Clothing from Image 2 ("Linen Shirt")"#));
        assert!(prompt.contains("USE Image 3 AS THE ABSOLUTE BACKGROUND."));
        assert!(prompt.contains("Image 1 or Image 2 or Image 3"));
    }

    #[test]
    fn clothing_prompt_product_only_uses_single_slot() {
        let angle = select_angle(ProductType::Clothing, 0, "");
        let prompt = clothing_prompt("Linen Shirt", &angle, "", false, false, 0);
        assert!(prompt.contains(r#"Clothing from Image 1 ("Linen Shirt")"#));
        assert!(!prompt.contains("Image 2"));
        assert!(!prompt.contains("Image 3"));
        assert!(prompt.contains(r#"GENERATE A NEW BACKGROUND: "Elegant e-commerce studio background""#));
    }

    #[test]
    fn item_prompt_product_only_uses_fallback_background() {
        let angle = select_angle(ProductType::Item, 0, "Midnight Rose Perfume");
        let prompt = item_prompt("Midnight Rose Perfume", "", &angle, "", false, false, 0);
        assert!(prompt.contains(r#"Image 1 ("Midnight Rose Perfume")"#));
        assert!(!prompt.contains("Image 2"));
        assert!(!prompt.contains("Image 3"));
        assert!(prompt.contains(r#"based on: "Elegant e-commerce studio context""#));
    }

    #[test]
    fn item_prompt_location_description_drives_background_and_lighting() {
        let angle = select_angle(ProductType::Item, 0, "Shaker");
        let prompt = item_prompt("Shaker", "Fitness", &angle, "sunlit gym", false, false, 0);
        assert!(prompt.contains(r#"based on: "sunlit gym""#));
        assert!(prompt.contains(r#"Match the natural atmosphere of "sunlit gym""#));
    }

    #[test]
    fn item_prompt_small_product_gets_closeup_mandate() {
        let angle = select_angle(ProductType::Item, 0, "Gold Watch");
        let prompt = item_prompt("Gold Watch", "Accessories", &angle, "", true, false, 0);
        assert!(prompt.contains("Medium Close-up"));
        // Identity present, no background: product is the second slot.
        assert!(prompt.contains(r#"Image 2 ("Gold Watch")"#));
    }

    #[test]
    fn aspect_header_appears_exactly_once() {
        let angle = select_angle(ProductType::Clothing, 0, "");
        let prompt = clothing_prompt("Linen Shirt", &angle, "", true, true, 0);
        assert_eq!(prompt.matches(ASPECT_RATIO_HEADER).count(), 1);

        let angle = select_angle(ProductType::Item, 0, "Watch");
        let prompt = item_prompt("Watch", "", &angle, "", false, false, 0);
        assert_eq!(prompt.matches(ASPECT_RATIO_HEADER).count(), 1);
    }

    #[test]
    fn negative_prompts_close_the_templates() {
        let angle = select_angle(ProductType::Clothing, 0, "");
        let prompt = clothing_prompt("Linen Shirt", &angle, "", false, false, 0);
        assert!(prompt.ends_with(CLOTHING_NEGATIVE_PROMPT));

        let angle = select_angle(ProductType::Item, 0, "Watch");
        let prompt = item_prompt("Watch", "", &angle, "", false, false, 0);
        assert!(prompt.ends_with(ITEM_NEGATIVE_PROMPT));
    }
}
