use std::fmt::{Display, Formatter};
use crate::common::ModelVariant;

/// The provider could not produce a model. Fatal to that load attempt only.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelLoadError {
    Network(String),
    UnsupportedVariant(ModelVariant),
    Provider(String),
}

impl Display for ModelLoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelLoadError::Network(msg) => write!(f, "model download failed: {}", msg),
            ModelLoadError::UnsupportedVariant(variant) => write!(f, "unsupported model variant: {}", variant.str_lowercase()),
            ModelLoadError::Provider(msg) => write!(f, "model provider failed: {}", msg),
        }
    }
}

impl std::error::Error for ModelLoadError {}

/// The capture device could not be opened or reconfigured.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureAccessError {
    PermissionDenied(String),
    NoDevice(String),
    Constraints(String),
}

impl Display for CaptureAccessError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CaptureAccessError::PermissionDenied(msg) => write!(f, "camera permission denied: {}", msg),
            CaptureAccessError::NoDevice(msg) => write!(f, "no capture device: {}", msg),
            CaptureAccessError::Constraints(msg) => write!(f, "constraints rejected: {}", msg),
        }
    }
}

impl std::error::Error for CaptureAccessError {}

/// A single detection cycle failed. Logged, never fatal to the loop.
#[derive(Debug)]
pub enum DetectionCycleError {
    NoFrame,
    Detect(anyhow::Error),
}

impl Display for DetectionCycleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DetectionCycleError::NoFrame => write!(f, "capture source produced no frame"),
            DetectionCycleError::Detect(err) => write!(f, "detect failed: {:#}", err),
        }
    }
}

impl std::error::Error for DetectionCycleError {}
