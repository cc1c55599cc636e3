mod detection_config;
mod filesystem_access;
mod history_log;
mod time_calc;
pub mod send_channels;

pub use detection_config::*;
pub use filesystem_access::{create_directory, FsAccess};
pub use history_log::*;
pub use send_channels::{control_channels, ControlCommand, ControlState, LoadProgress, SendState};
pub use time_calc::TimeCalc;
