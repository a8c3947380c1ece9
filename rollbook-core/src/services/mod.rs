//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area.

pub mod append;
pub mod formula;
mod import;
pub mod loader;
pub mod locate;
pub mod logging;
pub mod roll;
mod status;

pub use append::{append_records, clear_region, AppendSummary};
pub use formula::{copy_row_formatting, populate_formulas};
pub use import::{ImportPreview, ImportResult, ImportService, DEFAULT_PREVIEW_ROWS};
pub use loader::{load_and_normalize, LoadReport, LoadedCsv};
pub use locate::{find_anchor_bounds, AnchorBounds};
pub use logging::{LogEntry, LogEvent, LoggingService};
pub use roll::{
    extract_file_date, parse_business_date, previous_business_day, RollOutcome, RollResult,
    RollService,
};
pub use status::{SheetStatus, StatusService, StatusSummary};
