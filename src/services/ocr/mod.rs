pub mod engine;
pub mod preprocessing;
pub mod slot_reader;
pub mod tesseract;

// Re-export main types
pub use engine::OcrEngine;
pub use preprocessing::PreprocessingService;
pub use slot_reader::{SlotOutcome, SlotReader, SlotReading};
pub use tesseract::{locate_tesseract, TesseractEngine};
