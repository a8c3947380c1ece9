//! Rollbook Core - brokerage CSV imports into a dated workbook
//!
//! This crate follows a hexagonal architecture:
//!
//! - **domain**: Cell values, cleaners, CSV schemas and sheet profiles
//! - **ports**: Trait definitions for the workbook grid, prompter and file store
//! - **services**: Loading, appending, roll-forward and status orchestration
//! - **adapters**: Concrete implementations (umya-spreadsheet, in-memory, filesystem)

pub mod domain;
pub mod ports;
pub mod services;
pub mod adapters;
pub mod config;
pub mod log_migrations;

use std::path::{Path, PathBuf};

use adapters::LocalFileStore;
use config::Config;
use services::*;

// Re-export commonly used types at crate root
pub use domain::{CellAddress, CellValue, ImportProfile, RecordSet, SchemaKind};
pub use domain::result::{Error, Result};

/// Main context for rollbook operations
///
/// Built once per process: holds the loaded configuration and the services
/// that act on it. Nothing is read from ambient state after construction.
pub struct RollbookContext {
    pub config: Config,
    pub app_dir: PathBuf,
    pub import_service: ImportService,
    pub roll_service: RollService,
    pub status_service: StatusService,
}

impl RollbookContext {
    pub fn new(app_dir: &Path) -> Result<Self> {
        let config = Config::load(app_dir)?;

        let import_service = ImportService::new();
        let status_service = StatusService::new(import_service.profiles());
        let roll_service = RollService::new(Box::new(LocalFileStore::new()), app_dir.to_path_buf());

        Ok(Self {
            config,
            app_dir: app_dir.to_path_buf(),
            import_service,
            roll_service,
            status_service,
        })
    }

    /// Persist the current configuration
    pub fn save_config(&self) -> Result<()> {
        self.config.save(&self.app_dir)
    }
}
