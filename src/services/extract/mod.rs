//! Guide-page heuristics: title lines, tables and mission sections.

pub mod sections;
pub mod table;
pub mod text;
pub mod title;

pub use sections::{extract_sections, is_fleet_example, main_region};
pub use table::parse_table;
pub use title::{is_plausible_title, pick_title};

use crate::models::MissionRecord;
use scraper::Html;

/// Parse `html` and fill the record's empty sections
pub fn extract_from_html(html: &str, record: &mut MissionRecord) {
    let document = Html::parse_document(html);
    extract_sections(&document, record);
}
