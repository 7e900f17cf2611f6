use crate::error::QuestError;
use crate::models::config::CaptureConfig;
use crate::models::roi::Roi;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::DynamicImage;

/// What window selection needs to know about an on-screen window
#[derive(Debug, Clone, PartialEq)]
pub struct WindowInfo {
    pub title: String,
    pub minimized: bool,
    pub width: u32,
    pub height: u32,
}

impl WindowInfo {
    fn is_capturable(&self) -> bool {
        !self.minimized && self.width > 0 && self.height > 0
    }
}

/// Pick the game window: exact title first, then a title naming both the
/// game and a supported browser. Returns the index into `windows`.
pub fn select_window(windows: &[WindowInfo], config: &CaptureConfig) -> Option<usize> {
    let capturable = || windows.iter().enumerate().filter(|(_, w)| w.is_capturable());

    capturable()
        .find(|(_, w)| w.title == config.exact_title)
        .or_else(|| {
            capturable().find(|(_, w)| {
                config.title_hints.iter().any(|hint| w.title.contains(hint.as_str()))
                    && config.browser_hints.iter().any(|hint| w.title.contains(hint.as_str()))
            })
        })
        .map(|(index, _)| index)
}

/// Crop a slot region out of a capture, clamped to the image bounds
pub fn crop_slot(image: &DynamicImage, roi: &Roi) -> Result<DynamicImage, QuestError> {
    let (x, y, width, height) = roi.clamp_to(image.width(), image.height()).ok_or_else(|| {
        QuestError::Input(format!(
            "slot region {}x{} at ({}, {}) lies outside the {}x{} capture",
            roi.width,
            roi.height,
            roi.x,
            roi.y,
            image.width(),
            image.height()
        ))
    })?;

    Ok(image.crop_imm(x, y, width, height))
}

/// Convert image to PNG bytes for transmission
pub fn image_to_png_bytes(image: &DynamicImage) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Vec::new();
    image.write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)?;
    Ok(buf)
}

/// PNG data URL for showing a capture in the UI
pub fn image_to_data_url(image: &DynamicImage) -> Result<String, QuestError> {
    let png = image_to_png_bytes(image)
        .map_err(|e| QuestError::ParseAnomaly(format!("Failed to encode image: {}", e)))?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
}

#[cfg(feature = "desktop")]
mod window {
    use super::{select_window, WindowInfo};
    use crate::error::QuestError;
    use crate::models::config::CaptureConfig;
    use image::DynamicImage;
    use tracing::{debug, info};
    use xcap::Window;

    fn describe(window: &Window) -> WindowInfo {
        WindowInfo {
            title: window.title().unwrap_or_default(),
            minimized: window.is_minimized().unwrap_or(true),
            width: window.width().unwrap_or(0),
            height: window.height().unwrap_or(0),
        }
    }

    /// Find the game window and capture it as an RGB image
    pub fn capture_game_window(config: &CaptureConfig) -> Result<DynamicImage, QuestError> {
        let windows = Window::all()
            .map_err(|e| QuestError::Capture(format!("Failed to list windows: {}", e)))?;
        let infos: Vec<WindowInfo> = windows.iter().map(describe).collect();
        debug!(count = infos.len(), "Enumerated windows");

        let index = select_window(&infos, config).ok_or_else(|| {
            QuestError::NotFound(format!(
                "no visible window titled '{}' or matching {:?} in {:?}",
                config.exact_title, config.title_hints, config.browser_hints
            ))
        })?;
        let target = &infos[index];
        info!(title = %target.title, width = target.width, height = target.height, "Capturing window");

        let rgba = windows[index]
            .capture_image()
            .map_err(|e| QuestError::Capture(format!("Failed to capture window: {}", e)))?;

        Ok(DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(rgba).to_rgb8()))
    }

}

#[cfg(feature = "desktop")]
pub use window::capture_game_window;
