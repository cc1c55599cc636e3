mod bvr_box;
mod bvr_image;
mod bvr_prediction;
mod errors;
mod model_variant;
mod resolution;

pub use bvr_box::*;
pub use bvr_image::*;
pub use bvr_prediction::*;
pub use errors::*;
pub use model_variant::*;
pub use resolution::*;
