use std::path::PathBuf;
use crate::common::{ModelVariant, Resolution};

/// One-shot actions and setters coming from the user-facing controls.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlCommand {
    SetConfidence(f32),
    SetResolution(Resolution),
    ChangeModel(ModelVariant),
    ToggleTracking,
    ClearHistory,
    Capture(Option<PathBuf>),
    StopCamera,
}

/// Coarse model loading progress.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadProgress {
    Started(ModelVariant),
    Percent(u8),
    Completed(ModelVariant),
    Failed(String),
}

#[derive(Debug)]
pub struct ControlState {
    pub cmd_rx: crossbeam_channel::Receiver<ControlCommand>,
    pub progress_tx: Option<crossbeam_channel::Sender<LoadProgress>>,
}

#[derive(Debug)]
pub struct SendState {
    pub cmd_tx: crossbeam_channel::Sender<ControlCommand>,
    pub progress_rx: crossbeam_channel::Receiver<LoadProgress>,
}

/// Creates the control and progress channel halves for a live view.
pub fn control_channels() -> (SendState, ControlState) {
    let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded();
    let (progress_tx, progress_rx) = crossbeam_channel::unbounded();
    (
        SendState { cmd_tx, progress_rx },
        ControlState { cmd_rx, progress_tx: Some(progress_tx) },
    )
}
