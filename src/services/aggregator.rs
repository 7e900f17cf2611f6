use crate::models::mission::UNKNOWN_TITLE;
use crate::models::{CandidateSource, MissionRecord};
use crate::services::extract::{extract_sections, text::document_title};
use scraper::Html;

/// The page `<title>`, or a placeholder when it has none
pub fn page_title(document: &Html) -> String {
    document_title(document).unwrap_or_else(|| UNKNOWN_TITLE.to_string())
}

/// Parse a fetched guide page into the record handed to the display layer
pub fn build_record(ocr_name: &str, source: &CandidateSource, html: &str) -> MissionRecord {
    let document = Html::parse_document(html);
    let mut record = MissionRecord::new(
        ocr_name,
        page_title(&document),
        source.site_label.as_str(),
        source.url.as_str(),
    );
    extract_sections(&document, &mut record);
    record
}
