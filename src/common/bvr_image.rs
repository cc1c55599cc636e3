use image::{DynamicImage, RgbImage, RgbaImage};

/// A single captured video frame.
#[derive(Debug, Clone, Default)]
pub struct BvrImage {
    pub image: RgbImage,
    pub img_width: u32,
    pub img_height: u32,
    pub frame_index: u64,
}

impl BvrImage {
    pub fn new(image: RgbImage, frame_index: u64) -> Self {
        let (img_width, img_height) = image.dimensions();
        Self {
            image,
            img_width,
            img_height,
            frame_index,
        }
    }

    pub fn blank(width: u32, height: u32) -> Self {
        Self::new(RgbImage::new(width, height), 0)
    }
}

impl std::ops::Deref for BvrImage {
    type Target = RgbImage;

    fn deref(&self) -> &Self::Target {
        &self.image
    }
}

impl std::ops::DerefMut for BvrImage {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.image
    }
}

impl From<DynamicImage> for BvrImage {
    fn from(image: DynamicImage) -> Self {
        Self::new(image.to_rgb8(), 0)
    }
}

impl From<RgbImage> for BvrImage {
    fn from(image: RgbImage) -> Self {
        Self::new(image, 0)
    }
}

impl From<RgbaImage> for BvrImage {
    fn from(image: RgbaImage) -> Self {
        Self::new(DynamicImage::from(image).to_rgb8(), 0)
    }
}
