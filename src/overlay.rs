mod overlay_element;
mod overlay_layer;
mod overlay_renderer;
mod snapshot;
mod tracker;

pub use overlay_element::*;
pub use overlay_layer::*;
pub use overlay_renderer::*;
pub use snapshot::*;
pub use tracker::*;
