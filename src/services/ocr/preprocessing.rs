use crate::models::config::PreprocessingConfig;
use image::{imageops::FilterType, DynamicImage, GenericImageView, ImageBuffer, Luma};

/// Image preprocessing service for OCR optimization
pub struct PreprocessingService {
    config: PreprocessingConfig,
}

impl Default for PreprocessingService {
    fn default() -> Self {
        Self::new(PreprocessingConfig::default())
    }
}

impl PreprocessingService {
    pub fn new(config: PreprocessingConfig) -> Self {
        Self { config }
    }

    /// Configured pipeline: grayscale → scale → threshold
    pub fn preprocess(&self, image: &DynamicImage) -> DynamicImage {
        let mut result = if self.config.grayscale {
            self.to_grayscale(image)
        } else {
            image.clone()
        };

        if (self.config.scale_factor - 1.0).abs() > f64::EPSILON {
            result = self.scale(&result, self.config.scale_factor);
        }

        if let Some(level) = self.config.threshold {
            result = self.threshold(&result, level);
        }

        result
    }

    pub fn to_grayscale(&self, image: &DynamicImage) -> DynamicImage {
        DynamicImage::ImageLuma8(image.to_luma8())
    }

    /// Scale image by factor (never below 1x1)
    pub fn scale(&self, image: &DynamicImage, factor: f64) -> DynamicImage {
        let (width, height) = image.dimensions();
        let new_width = ((width as f64 * factor) as u32).max(1);
        let new_height = ((height as f64 * factor) as u32).max(1);

        image.resize_exact(new_width, new_height, FilterType::Lanczos3)
    }

    /// Binarize: pixels brighter than `level` become white, the rest black
    pub fn threshold(&self, image: &DynamicImage, level: u8) -> DynamicImage {
        let gray = image.to_luma8();
        let binary = ImageBuffer::from_fn(gray.width(), gray.height(), |x, y| {
            if gray.get_pixel(x, y)[0] > level {
                Luma([255u8])
            } else {
                Luma([0u8])
            }
        });

        DynamicImage::ImageLuma8(binary)
    }
}
