use thiserror::Error;

/// Errors surfaced by the capture → OCR → resolve → fetch pipeline.
///
/// Extraction itself never fails; a page that doesn't have the expected
/// shape just leaves the record's fields empty.
#[derive(Debug, Error)]
pub enum QuestError {
    /// Window, content, or source absent.
    #[error("not found: {0}")]
    NotFound(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("network error: {0}")]
    Network(String),

    /// Unexpected document or image shape.
    #[error("unexpected structure: {0}")]
    ParseAnomaly(String),

    /// Malformed user input (slot selection, region bounds).
    #[error("invalid input: {0}")]
    Input(String),

    /// Missing external tool or unreadable config file.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("capture failed: {0}")]
    Capture(String),

    #[error("OCR failed: {0}")]
    Ocr(String),
}

impl QuestError {
    /// Short label used in status messages and event payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Timeout(_) => "timeout",
            Self::Network(_) => "network",
            Self::ParseAnomaly(_) => "parse_anomaly",
            Self::Input(_) => "input",
            Self::Config(_) => "config",
            Self::Capture(_) => "capture",
            Self::Ocr(_) => "ocr",
        }
    }
}

impl From<reqwest::Error> for QuestError {
    fn from(err: reqwest::Error) -> Self {
        let target = err
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "<unknown url>".to_string());

        if err.is_timeout() {
            QuestError::Timeout(target)
        } else if let Some(status) = err.status() {
            QuestError::Network(format!("{} returned {}", target, status))
        } else {
            QuestError::Network(format!("{}: {}", target, err))
        }
    }
}

/// Tauri commands report errors as plain strings
impl From<QuestError> for String {
    fn from(err: QuestError) -> Self {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_labels() {
        assert_eq!(QuestError::NotFound("x".into()).kind(), "not_found");
        assert_eq!(QuestError::Timeout("x".into()).kind(), "timeout");
        assert_eq!(QuestError::Input("x".into()).kind(), "input");
        assert_eq!(QuestError::Config("x".into()).kind(), "config");
    }

    #[test]
    fn test_error_display() {
        let err = QuestError::Input("7 is not a valid slot".to_string());
        assert_eq!(err.to_string(), "invalid input: 7 is not a valid slot");
    }

    #[test]
    fn test_error_into_command_string() {
        let message: String = QuestError::Capture("window closed".into()).into();
        assert_eq!(message, "capture failed: window closed");
    }
}
