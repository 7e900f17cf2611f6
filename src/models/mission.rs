use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One parsed table row: column name → cell text, in column order
pub type TableRow = IndexMap<String, String>;

/// Placeholder title when a guide page has no `<title>`
pub const UNKNOWN_TITLE: &str = "タイトル不明";

/// Fleet composition info for one sea area
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SortieEntry {
    pub area_name: String,
    pub fleet_examples: Vec<String>,
    pub fleet_notes: Vec<String>,
}

impl SortieEntry {
    pub fn new(area_name: impl Into<String>) -> Self {
        Self {
            area_name: area_name.into(),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fleet_examples.is_empty() && self.fleet_notes.is_empty()
    }
}

/// Expedition heading plus its info table
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExpeditionEntry {
    pub expedition_name: String,
    pub info_table: Vec<TableRow>,
}

/// Everything extracted for one mission slot
///
/// Sequence fields are always present; "nothing found" is an empty vec.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MissionRecord {
    pub ocr_name: String,
    pub title: String,
    pub site_name: String,
    pub source_url: String,
    #[serde(default)]
    pub content: Vec<String>,
    #[serde(default)]
    pub rewards: Vec<String>,
    #[serde(default)]
    pub sortie_info: Vec<SortieEntry>,
    #[serde(default)]
    pub expedition_info: Vec<ExpeditionEntry>,
    #[serde(default)]
    pub crafting_table: Vec<TableRow>,
}

impl MissionRecord {
    /// Record header with every section empty, ready for extraction
    pub fn new(
        ocr_name: impl Into<String>,
        title: impl Into<String>,
        site_name: impl Into<String>,
        source_url: impl Into<String>,
    ) -> Self {
        Self {
            ocr_name: ocr_name.into(),
            title: title.into(),
            site_name: site_name.into(),
            source_url: source_url.into(),
            ..Self::default()
        }
    }

    /// True when extraction found no section at all
    pub fn has_no_sections(&self) -> bool {
        self.content.is_empty()
            && self.rewards.is_empty()
            && self.sortie_info.is_empty()
            && self.expedition_info.is_empty()
            && self.crafting_table.is_empty()
    }
}

/// Record tagged with the slot it came from (0-based)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SlotRecord {
    pub slot: usize,
    pub record: MissionRecord,
}
