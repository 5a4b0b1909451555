use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    Auto,
    Clothing,
    Item,
}

impl ProductType {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "clothing" => ProductType::Clothing,
            "item" => ProductType::Item,
            _ => ProductType::Auto,
        }
    }
}

/// Role of an image part in the multi-part generation request. The part list
/// is always assembled in declaration order: identity, product, background,
/// with the text prompt trailing. The external model is order-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PartRole {
    Identity,
    Product,
    Background,
}

impl PartRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            PartRole::Identity => "identity",
            PartRole::Product => "product",
            PartRole::Background => "background",
        }
    }
}

/// Assigns the symbolic "Image N" labels the prompt templates use to the
/// parts actually present in a request. Both the part assembler and the
/// templates derive their numbering from this type, so the text references
/// and the assembled order cannot drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartNumbering {
    has_identity: bool,
    has_background: bool,
}

impl PartNumbering {
    pub fn new(has_identity: bool, has_background: bool) -> Self {
        Self {
            has_identity,
            has_background,
        }
    }

    pub fn identity(&self) -> Option<u32> {
        if self.has_identity {
            Some(1)
        } else {
            None
        }
    }

    pub fn product(&self) -> u32 {
        if self.has_identity {
            2
        } else {
            1
        }
    }

    pub fn background(&self) -> Option<u32> {
        if !self.has_background {
            return None;
        }
        Some(self.product() + 1)
    }

    pub fn label(&self, role: PartRole) -> Option<String> {
        let n = match role {
            PartRole::Identity => self.identity()?,
            PartRole::Product => self.product(),
            PartRole::Background => self.background()?,
        };
        Some(format!("Image {}", n))
    }

    /// Ordered roles present in the request, matching the assembled part list.
    pub fn slots(&self) -> Vec<PartRole> {
        let mut slots = Vec::with_capacity(3);
        if self.has_identity {
            slots.push(PartRole::Identity);
        }
        slots.push(PartRole::Product);
        if self.has_background {
            slots.push(PartRole::Background);
        }
        slots
    }

    /// Labels of all image inputs, in order ("Image 1", ...).
    pub fn all_labels(&self) -> Vec<String> {
        self.slots()
            .into_iter()
            .filter_map(|role| self.label(role))
            .collect()
    }
}

/// Request-scoped input for one try-on generation. Image presence is carried
/// by explicit options here and resolved into booleans before template
/// selection; templates themselves never inspect buffers.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub product_image: Vec<u8>,
    pub model_image: Option<Vec<u8>>,
    pub location_image: Option<Vec<u8>>,
    pub product_type: ProductType,
    pub product_title: String,
    pub product_category: String,
    pub angle_index: usize,
    pub location_description: String,
    pub has_location_image: bool,
    pub variety_seed: u64,
}

impl GenerationRequest {
    pub fn new(product_image: Vec<u8>, product_title: impl Into<String>) -> Self {
        Self {
            product_image,
            model_image: None,
            location_image: None,
            product_type: ProductType::Auto,
            product_title: product_title.into(),
            product_category: String::new(),
            angle_index: 0,
            location_description: String::new(),
            has_location_image: false,
            variety_seed: 0,
        }
    }

    pub fn with_model_image(mut self, bytes: Vec<u8>) -> Self {
        self.model_image = Some(bytes);
        self
    }

    pub fn with_location_image(mut self, bytes: Vec<u8>) -> Self {
        self.location_image = Some(bytes);
        self.has_location_image = true;
        self
    }

    pub fn with_product_type(mut self, product_type: ProductType) -> Self {
        self.product_type = product_type;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.product_category = category.into();
        self
    }

    pub fn with_angle_index(mut self, index: usize) -> Self {
        self.angle_index = index;
        self
    }

    pub fn with_location_description(mut self, description: impl Into<String>) -> Self {
        self.location_description = description.into();
        self
    }

    pub fn with_variety_seed(mut self, seed: u64) -> Self {
        self.variety_seed = seed;
        self
    }

    pub fn numbering(&self) -> PartNumbering {
        PartNumbering::new(self.model_image.is_some(), self.location_image.is_some())
    }
}
