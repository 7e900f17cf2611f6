pub mod config;
pub mod mission;
pub mod roi;
pub mod selection;
pub mod source;

pub use config::AppConfig;
pub use mission::{ExpeditionEntry, MissionRecord, SlotRecord, SortieEntry, TableRow};
pub use roi::Roi;
pub use selection::SlotSelection;
pub use source::CandidateSource;
