use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use crate::common::{BvrImage, CaptureAccessError, Resolution};

const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "bmp", "webp"];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    #[default] Environment,
    User,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CaptureConstraints {
    pub resolution: Resolution,
    pub facing_mode: FacingMode,
}

impl CaptureConstraints {
    pub fn new(resolution: Resolution) -> Self {
        Self {
            resolution,
            facing_mode: FacingMode::Environment,
        }
    }
}

/// Camera capability: a continuous frame source with resolution control.
pub trait CaptureSource {
    /// Requests access to the device.
    fn open(&mut self, constraints: &CaptureConstraints) -> Result<(), CaptureAccessError>;

    /// The current frame, or `None` when nothing can be read right now.
    fn frame(&mut self) -> Option<BvrImage>;

    /// Changes the resolution of an open source.
    fn apply_constraints(&mut self, resolution: Resolution) -> Result<(), CaptureAccessError>;

    fn resolution(&self) -> Option<Resolution>;

    fn is_active(&self) -> bool;

    /// Bumped every time the source is opened or torn down.
    fn generation(&self) -> u64;

    fn stop(&mut self);
}

/// Shared open/stopped state of a source. Clones observe and control the same
/// source, so teardown can come from outside the detection loop.
#[derive(Debug, Clone, Default)]
pub struct CaptureHandle {
    active: Arc<AtomicBool>,
    generation: Arc<AtomicU64>,
}

impl CaptureHandle {
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    pub fn stop(&self) {
        if self.active.swap(false, Ordering::AcqRel) {
            self.generation.fetch_add(1, Ordering::AcqRel);
            log::info!("Capture source stopped");
        }
    }

    fn start(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.active.store(true, Ordering::Release);
    }
}

/// Serves one in-memory frame forever.
#[derive(Debug, Clone)]
pub struct StillFrameSource {
    frame: BvrImage,
    handle: CaptureHandle,
    resolution: Option<Resolution>,
    deny: Option<CaptureAccessError>,
    frame_count: u64,
}

impl StillFrameSource {
    pub fn new(frame: BvrImage) -> Self {
        Self {
            frame,
            handle: CaptureHandle::default(),
            resolution: None,
            deny: None,
            frame_count: 0,
        }
    }

    /// Makes every `open` fail with `err`, like a user refusing the permission prompt.
    pub fn with_denied(mut self, err: CaptureAccessError) -> Self {
        self.deny = Some(err);
        self
    }

    pub fn handle(&self) -> CaptureHandle {
        self.handle.clone()
    }
}

impl CaptureSource for StillFrameSource {
    fn open(&mut self, constraints: &CaptureConstraints) -> Result<(), CaptureAccessError> {
        if let Some(err) = &self.deny {
            return Err(err.clone());
        }
        self.resolution = Some(constraints.resolution);
        self.handle.start();
        Ok(())
    }

    fn frame(&mut self) -> Option<BvrImage> {
        if !self.handle.is_active() {
            return None;
        }
        self.frame_count += 1;
        let mut frame = self.frame.clone();
        frame.frame_index = self.frame_count;
        Some(frame)
    }

    fn apply_constraints(&mut self, resolution: Resolution) -> Result<(), CaptureAccessError> {
        if !self.handle.is_active() {
            return Err(CaptureAccessError::Constraints("source is not open".to_string()));
        }
        self.resolution = Some(resolution);
        Ok(())
    }

    fn resolution(&self) -> Option<Resolution> {
        self.resolution
    }

    fn is_active(&self) -> bool {
        self.handle.is_active()
    }

    fn generation(&self) -> u64 {
        self.handle.generation()
    }

    fn stop(&mut self) {
        self.handle.stop();
    }
}

/// Cycles through the image files of a directory, resized to the requested
/// resolution. Stands in for a camera when replaying recorded footage.
#[derive(Debug, Clone)]
pub struct ImageFolderSource {
    dir: PathBuf,
    files: Vec<PathBuf>,
    next: usize,
    handle: CaptureHandle,
    resolution: Option<Resolution>,
    frame_count: u64,
}

impl ImageFolderSource {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            files: Vec::new(),
            next: 0,
            handle: CaptureHandle::default(),
            resolution: None,
            frame_count: 0,
        }
    }

    pub fn handle(&self) -> CaptureHandle {
        self.handle.clone()
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    fn scan(&self) -> Result<Vec<PathBuf>, CaptureAccessError> {
        let entries = std::fs::read_dir(&self.dir).map_err(|err| match err.kind() {
            std::io::ErrorKind::PermissionDenied => {
                CaptureAccessError::PermissionDenied(format!("{}: {}", self.dir.display(), err))
            }
            _ => CaptureAccessError::NoDevice(format!("{}: {}", self.dir.display(), err)),
        })?;

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
                    .unwrap_or(false)
            })
            .collect();
        files.sort();

        if files.is_empty() {
            return Err(CaptureAccessError::NoDevice(format!("no image files in {}", self.dir.display())));
        }
        Ok(files)
    }
}

impl CaptureSource for ImageFolderSource {
    fn open(&mut self, constraints: &CaptureConstraints) -> Result<(), CaptureAccessError> {
        self.files = self.scan()?;
        self.next = 0;
        self.resolution = Some(constraints.resolution);
        self.handle.start();
        log::info!("Capture source opened: {} frame(s) from {} at {}",
                   self.files.len(), self.dir.display(), constraints.resolution);
        Ok(())
    }

    fn frame(&mut self) -> Option<BvrImage> {
        if !self.handle.is_active() || self.files.is_empty() {
            return None;
        }
        let path = &self.files[self.next % self.files.len()];
        self.next = (self.next + 1) % self.files.len();

        let image = match image::open(path) {
            Ok(image) => image,
            Err(err) => {
                log::warn!("Failed to decode frame {}: {}", path.display(), err);
                return None;
            }
        };
        let image = match self.resolution {
            Some(res) if image.width() != res.width || image.height() != res.height => {
                image.resize_exact(res.width, res.height, FilterType::Triangle)
            }
            _ => image,
        };

        self.frame_count += 1;
        Some(BvrImage::new(image.to_rgb8(), self.frame_count))
    }

    fn apply_constraints(&mut self, resolution: Resolution) -> Result<(), CaptureAccessError> {
        if !self.handle.is_active() {
            return Err(CaptureAccessError::Constraints("source is not open".to_string()));
        }
        self.resolution = Some(resolution);
        Ok(())
    }

    fn resolution(&self) -> Option<Resolution> {
        self.resolution
    }

    fn is_active(&self) -> bool {
        self.handle.is_active()
    }

    fn generation(&self) -> u64 {
        self.handle.generation()
    }

    fn stop(&mut self) {
        self.handle.stop();
    }
}
