//! Burns the displayed overlays into a copy of the frame and saves it as PNG.

use std::path::{Path, PathBuf};
use ab_glyph::{FontVec, PxScale};
use anyhow::Context;
use chrono::{DateTime, Utc};
use image::{ImageFormat, Rgb, RgbImage};
use imageproc::drawing::{draw_line_segment_mut, draw_text_mut, text_size};
use crate::common::BvrImage;
use crate::data::create_directory;
use crate::overlay::{OverlayElement, TrackLine};

const BOX_COLOUR: Rgb<u8> = Rgb([0, 255, 0]);
const LABEL_BACKGROUND: Rgb<u8> = Rgb([0, 100, 0]);
const LABEL_BACKGROUND_ALPHA: f32 = 0.8;
const LABEL_TEXT: Rgb<u8> = Rgb([255, 255, 255]);
const LABEL_STRIP_HEIGHT: i32 = 20;
const LABEL_FONT_PX: f32 = 12.;
const DASH: f32 = 5.;
const GAP: f32 = 5.;
// Width used when no font is loaded to measure the label.
const FALLBACK_CHAR_WIDTH: u32 = 7;

/// `detection-2026-10-18T09-41-07-123Z.png`
pub fn snapshot_file_name(at: DateTime<Utc>) -> String {
    let iso = at.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string();
    format!("detection-{}.png", iso.replace([':', '.'], "-"))
}

pub struct SnapshotExporter {
    out_dir: PathBuf,
    font: Option<FontVec>,
}

impl SnapshotExporter {
    pub fn new<P: AsRef<Path>>(out_dir: P) -> Self {
        Self {
            out_dir: out_dir.as_ref().to_path_buf(),
            font: None,
        }
    }

    pub fn with_font_file<P: AsRef<Path>>(mut self, path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read font {}", path.display()))?;
        let font = FontVec::try_from_vec(bytes)
            .map_err(|_| anyhow::anyhow!("Invalid font file {}", path.display()))?;
        self.font = Some(font);
        Ok(self)
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Draws `elements` over a copy of `frame`.
    pub fn compose(&self, frame: &BvrImage, elements: &[OverlayElement]) -> RgbImage {
        let mut img = frame.image.clone();
        for element in elements {
            match element {
                OverlayElement::Box { x, y, width, height } => {
                    draw_dashed_rect(&mut img, *x, *y, *width, *height);
                }
                OverlayElement::Label { x, y, text } => {
                    self.draw_label(&mut img, *x, *y, text);
                }
                OverlayElement::TrackLine(line) => draw_track_line(&mut img, line),
            }
        }
        img
    }

    /// Composes and writes the snapshot. Returns the written path.
    pub fn export(&self, frame: &BvrImage, elements: &[OverlayElement], at: DateTime<Utc>) -> anyhow::Result<PathBuf> {
        create_directory(&self.out_dir)?;
        let path = self.out_dir.join(snapshot_file_name(at));
        let img = self.compose(frame, elements);
        img.save_with_format(&path, ImageFormat::Png)
            .with_context(|| format!("Failed to write snapshot {}", path.display()))?;
        log::info!("Snapshot written to {}", path.display());
        Ok(path)
    }

    fn draw_label(&self, img: &mut RgbImage, x: f32, y: f32, text: &str) {
        let x = x.round() as i32;
        let y = y.round() as i32;
        let scale = PxScale::from(LABEL_FONT_PX);
        let text_width = match &self.font {
            Some(font) => text_size(scale, font, text).0,
            None => text.chars().count() as u32 * FALLBACK_CHAR_WIDTH,
        };

        let strip_width = i32::try_from(text_width).unwrap_or(i32::MAX).saturating_add(10);
        blend_rect(img, x, y.saturating_sub(LABEL_STRIP_HEIGHT), strip_width, LABEL_STRIP_HEIGHT,
                   LABEL_BACKGROUND, LABEL_BACKGROUND_ALPHA);

        if let Some(font) = &self.font {
            draw_text_mut(img, LABEL_TEXT, x.saturating_add(5), y.saturating_sub(5 + LABEL_FONT_PX as i32), scale, font, text);
        }
    }
}

fn draw_dashed_segment(img: &mut RgbImage, from: (f32, f32), to: (f32, f32)) {
    let dx = to.0 - from.0;
    let dy = to.1 - from.1;
    let len = (dx * dx + dy * dy).sqrt();
    if len == 0. {
        return;
    }
    let (ux, uy) = (dx / len, dy / len);
    let mut t = 0.;
    while t < len {
        let end = (t + DASH).min(len);
        draw_line_segment_mut(img,
                              (from.0 + ux * t, from.1 + uy * t),
                              (from.0 + ux * end, from.1 + uy * end),
                              BOX_COLOUR);
        t += DASH + GAP;
    }
}

// 2 px stroke: the outline plus one pixel inset.
fn draw_dashed_rect(img: &mut RgbImage, x: f32, y: f32, w: f32, h: f32) {
    for inset in [0., 1.] {
        let (x0, y0) = (x + inset, y + inset);
        let (x1, y1) = (x + w - inset, y + h - inset);
        draw_dashed_segment(img, (x0, y0), (x1, y0));
        draw_dashed_segment(img, (x1, y0), (x1, y1));
        draw_dashed_segment(img, (x1, y1), (x0, y1));
        draw_dashed_segment(img, (x0, y1), (x0, y0));
    }
}

fn draw_track_line(img: &mut RgbImage, line: &TrackLine) {
    let start = line.start();
    let end = line.end();
    draw_line_segment_mut(img, start, end, BOX_COLOUR);
    draw_line_segment_mut(img, (start.0, start.1 + 1.), (end.0, end.1 + 1.), BOX_COLOUR);
}

fn blend_rect(img: &mut RgbImage, x: i32, y: i32, w: i32, h: i32, colour: Rgb<u8>, alpha: f32) {
    let (img_w, img_h) = (img.width() as i32, img.height() as i32);
    let (x0, y0) = (x.max(0), y.max(0));
    let (x1, y1) = (x.saturating_add(w).min(img_w), y.saturating_add(h).min(img_h));
    for py in y0..y1 {
        for px in x0..x1 {
            let pixel = img.get_pixel_mut(px as u32, py as u32);
            for c in 0..3 {
                let blended = alpha * colour.0[c] as f32 + (1. - alpha) * pixel.0[c] as f32;
                pixel.0[c] = blended.round().clamp(0., 255.) as u8;
            }
        }
    }
}
