pub mod asset_params;
pub mod common;
pub mod generation;
pub mod image;
pub mod video;

pub use asset_params::*;
pub use common::*;
pub use generation::*;
pub use image::*;
pub use video::*;
