pub mod capture_source;
pub mod detection_loop;
pub mod detection_model;
pub mod model_loader;
pub mod replay;

pub use capture_source::*;
pub use detection_loop::*;
pub use detection_model::*;
pub use model_loader::*;
pub use replay::*;
