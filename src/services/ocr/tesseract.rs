use super::engine::OcrEngine;
use crate::error::QuestError;
use crate::models::config::OcrConfig;
use crate::services::screen_capture::image_to_png_bytes;
use image::DynamicImage;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use tracing::{debug, info};

#[cfg(windows)]
const BINARY_NAME: &str = "tesseract.exe";
#[cfg(not(windows))]
const BINARY_NAME: &str = "tesseract";

/// Folder shipped next to the executable with a private tesseract build
const BUNDLED_DIR: &str = "tesseract_engine";

const WINDOWS_DEFAULT_PATH: &str = r"C:\Program Files\Tesseract-OCR\tesseract.exe";

/// Tesseract OCR engine driving the `tesseract` command line tool
pub struct TesseractEngine {
    binary: PathBuf,
    language: String,
    page_seg_mode: u8,
}

impl TesseractEngine {
    /// Locate the tesseract binary and build an engine from config.
    ///
    /// A missing binary is a `Config` error; the app cannot run without it.
    pub fn new(config: &OcrConfig) -> Result<Self, QuestError> {
        let binary = locate_tesseract(config.tesseract_path.as_deref())?;
        info!(binary = %binary.display(), "Using tesseract");

        Ok(Self {
            binary,
            language: config.language.clone(),
            page_seg_mode: config.page_seg_mode,
        })
    }

    fn run(&self, png: &[u8], lang: &str) -> Result<String, QuestError> {
        let mut child = Command::new(&self.binary)
            .args(["stdin", "stdout", "-l", lang, "--psm"])
            .arg(self.page_seg_mode.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| QuestError::Ocr(format!("Failed to start tesseract: {}", e)))?;

        send_image(&mut child, png)?;

        let output = child
            .wait_with_output()
            .map_err(|e| QuestError::Ocr(format!("tesseract did not finish: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(QuestError::Ocr(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        debug!(chars = text.chars().count(), "OCR finished");
        Ok(text)
    }
}

/// Write the PNG to the child's stdin and close it.
///
/// On failure the child is killed and reaped before the error is returned.
fn send_image(child: &mut Child, png: &[u8]) -> Result<(), QuestError> {
    // Dropping stdin closes the pipe so tesseract starts reading
    let sent = match child.stdin.take() {
        Some(mut stdin) => stdin
            .write_all(png)
            .map_err(|e| QuestError::Ocr(format!("Failed to send image: {}", e))),
        None => Err(QuestError::Ocr("tesseract stdin unavailable".to_string())),
    };

    if sent.is_err() {
        child.kill().ok();
        child.wait().ok();
    }
    sent
}

impl OcrEngine for TesseractEngine {
    fn recognize(&self, image: &DynamicImage) -> Result<String, QuestError> {
        self.recognize_with_lang(image, &self.language)
    }

    fn recognize_with_lang(&self, image: &DynamicImage, lang: &str) -> Result<String, QuestError> {
        let png = image_to_png_bytes(image)
            .map_err(|e| QuestError::ParseAnomaly(format!("Failed to encode image: {}", e)))?;
        self.run(&png, lang)
    }
}

/// Places tesseract may live, in lookup order (PATH is searched separately)
fn candidate_paths(configured: Option<&str>, exe_dir: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(path) = configured.filter(|p| !p.trim().is_empty()) {
        candidates.push(PathBuf::from(path));
    }
    if let Some(dir) = exe_dir {
        candidates.push(dir.join(BUNDLED_DIR).join(BINARY_NAME));
    }
    candidates
}

/// Find the tesseract binary: configured path, bundled copy, `PATH`, then
/// the default Windows install location.
pub fn locate_tesseract(configured: Option<&str>) -> Result<PathBuf, QuestError> {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));

    if let Some(found) = candidate_paths(configured, exe_dir.as_deref())
        .into_iter()
        .find(|path| path.is_file())
    {
        return Ok(found);
    }

    if let Ok(found) = which::which(BINARY_NAME) {
        return Ok(found);
    }

    let default = PathBuf::from(WINDOWS_DEFAULT_PATH);
    if cfg!(windows) && default.is_file() {
        return Ok(default);
    }

    Err(QuestError::Config(format!(
        "tesseract not found (configured: {}, bundled {}/, PATH, {})",
        configured.unwrap_or("none"),
        BUNDLED_DIR,
        WINDOWS_DEFAULT_PATH
    )))
}
