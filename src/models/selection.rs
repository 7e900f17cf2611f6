use crate::error::QuestError;
use serde::{Deserialize, Serialize};

/// Validated set of slots to process, 0-based, sorted and unique
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SlotSelection(Vec<usize>);

impl SlotSelection {
    pub fn all(slot_count: usize) -> Self {
        Self((0..slot_count).collect())
    }

    /// Parse user input such as `"1,3"` or `"all"` (1-based slot numbers)
    pub fn parse(input: &str, slot_count: usize) -> Result<Self, QuestError> {
        let trimmed = input.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(Self::all(slot_count));
        }

        let mut slots = Vec::new();
        for part in trimmed.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let number: usize = part
                .parse()
                .map_err(|_| QuestError::Input(format!("'{}' is not a slot number", part)))?;

            if number == 0 || number > slot_count {
                return Err(QuestError::Input(format!(
                    "slot {} is out of range (1-{})",
                    number, slot_count
                )));
            }
            slots.push(number - 1);
        }

        if slots.is_empty() {
            return Err(QuestError::Input("no slots selected".to_string()));
        }

        slots.sort_unstable();
        slots.dedup();
        Ok(Self(slots))
    }

    pub fn slots(&self) -> &[usize] {
        &self.0
    }
}
