mod utils;
pub mod common;
pub mod data;
pub mod detection_runners;
pub mod live_view;
pub mod overlay;

pub use crate::live_view::LiveView;
