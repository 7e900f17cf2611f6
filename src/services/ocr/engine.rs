use crate::error::QuestError;
use image::DynamicImage;

/// OCR Engine trait - abstraction for different OCR implementations
pub trait OcrEngine: Send + Sync {
    /// Recognize text with the engine's configured language
    fn recognize(&self, image: &DynamicImage) -> Result<String, QuestError>;

    /// Recognize text with specific language
    fn recognize_with_lang(&self, image: &DynamicImage, lang: &str) -> Result<String, QuestError>;
}
