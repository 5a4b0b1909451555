use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::ProductType;

/// Camera/pose variations for clothing try-ons. Indexed modulo the list
/// length, so batch loops can hand out running indices.
pub const CLOTHING_ANGLES: [&str; 3] = [
    r#"SCENE_TYPE: "The Frontal Interaction". ACTION: Dynamic frontal stance. The model is leaning slightly against a background element (wall or furniture if present). WEIGHT: Shifted to one hip. GAZE: Direct engaging eye contact."#,
    r#"SCENE_TYPE: "The Side Profile". ACTION: 45-degree body turn. Standing stable and grounded. One hand resting on a background table or chair if available, or on own hip. WEIGHT: Both feet firmly on the floor plane. GAZE: Profile or looking over shoulder."#,
    r#"SCENE_TYPE: "The Back View". ACTION: Model facing away from camera, looking back over the shoulder. Feet firmly planted on the floor plane. The model stands in an open area of the scene, not clipping through large objects. GAZE: Engaging gaze towards the lens."#,
];

/// Framing variations for non-clothing items. The size sub-branches inside
/// each description are advisory text resolved by the external model; the
/// hard framing constraint comes from [`distance_mandate`].
pub const ITEM_ANGLES: [&str; 3] = [
    r#"SCENE_TYPE: "The Hero Shot".
ADAPTIVE_DISPLAY:
  - IF [Small: Watch, Jewelry, Phone]: CHEST-UP SHOT. Worn on wrist or held at chest level. NO LEGS.
  - IF [Standard: Bottle, Shaker]: WAIST-UP SHOT. Held elegantly.
  - IF [Large: Bag, Umbrella]: FULL-BODY/KNEE-UP. Full scale visibility.
ACTION: Professional presentation. The model looks into the lens.
HANDS: Pedestal Grip or natural wear. STRICT: NO FINGERS OVER THE LABEL/LOGO."#,
    r#"SCENE_TYPE: "Interaction & Process".
SHOT_TYPE:
  - IF [Small/Medium]: CHEST-UP CLOSE-UP. Focus on interaction zone.
  - IF [Large]: KNEE-UP VERTICAL SHOT.
ACTION: Active usage (Pouring, applying, checking time, carrying).
STATE: If the action involves contents, the CAP IS REMOVED.
HANDS: Dynamic tension. Hand A supports, Hand B interacts with the target."#,
    r#"SCENE_TYPE: "The Detailed Macro".
ZOOM: Extreme close-up. The product and interaction point fill 90% of the frame.
OPTICAL_STYLE: DSLR Photography style. Natural depth of field with soft bokeh. Background elements are out of focus but maintain their basic lighting structure.
SHOT_TYPE: Tight crop. Focus on detail.
ACTION: Product is in active use or being handled.
  - Skincare: Focus on texture of product on skin.
  - Beverage: Focus on droplets or glass rim.
  - Watch: Tack-sharp focus on the dial or strap texture.
  - General: Hero detail is the absolute focus.
EMOTION: Sensory enjoyment.
FOCUS: Razor-sharp focus only on the primary point of contact."#,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeClass {
    Small,
    Standard,
}

static SMALL_ITEM_KEYWORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"watch|jewelry|ring|earring|phone|cosmetic|lipstick|cream|glass|bottle")
        .expect("small-item keyword pattern is valid")
});

/// Best-effort size classification over category and title keywords.
///
/// Approximate by design: a miss degrades the framing advice sent to the
/// external model, it does not produce an invalid request.
pub fn classify_size(category: &str, title: &str) -> SizeClass {
    let haystack = format!("{} {}", category, title).to_lowercase();
    if SMALL_ITEM_KEYWORDS.is_match(&haystack) {
        SizeClass::Small
    } else {
        SizeClass::Standard
    }
}

pub fn distance_mandate(size: SizeClass) -> &'static str {
    match size {
        SizeClass::Small => {
            "STRICT DISTANCE: Medium Close-up. The camera is prohibited from showing legs, feet, or shoes. Only head and torso."
        }
        SizeClass::Standard => {
            "STRICT DISTANCE: Full-body or Knee-up. Show the entire scale of the product."
        }
    }
}

/// Pick the camera/pose description for a product type and angle index.
/// Out-of-range indices wrap around instead of erroring.
pub fn select_angle(product_type: ProductType, angle_index: usize, title_or_category: &str) -> String {
    match product_type {
        ProductType::Clothing | ProductType::Auto => {
            CLOTHING_ANGLES[angle_index % CLOTHING_ANGLES.len()].to_string()
        }
        ProductType::Item => {
            let subject = if title_or_category.is_empty() {
                "item"
            } else {
                title_or_category
            };
            ITEM_ANGLES[angle_index % ITEM_ANGLES.len()].replace("{{PRODUCT_TITLE}}", subject)
        }
    }
}
