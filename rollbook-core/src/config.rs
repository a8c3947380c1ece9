//! Configuration management
//!
//! `config.json` in the application directory:
//! ```json
//! {
//!   "base_path": "/home/me/Documents/InteractiveInvestor",
//!   "excel_path": "/home/me/Documents/InteractiveInvestor/II_20250917.xlsx",
//!   "transactions_csv": "/home/me/Downloads/Transactions.csv",
//!   "investments_csv": "/home/me/Downloads/Investments.csv",
//!   "folder_layout": "flat"
//! }
//! ```
//! Keys this crate does not manage are kept as-is when saving.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::result::{Error, Result};
use crate::domain::SchemaKind;

pub const CONFIG_FILE: &str = "config.json";
pub const DEFAULT_WORKBOOK_NAME: &str = "II_20250917.xlsx";
const DEFAULT_BASE_FOLDER: &str = "InteractiveInvestor";

/// Where rolled workbooks are placed under `base_path`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FolderLayout {
    /// `<base_path>/<file>`
    #[default]
    Flat,
    /// `<base_path>/<YYYY>/<MM>/<file>`
    YearMonth,
}

/// How the in-memory config came to be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigSource {
    /// No file existed; defaults were written
    Created,
    /// File read as-is
    Loaded,
    /// File lacked required keys; defaults merged in and written back
    Merged,
    /// File unreadable or invalid; defaults used, nothing written
    Corrupt,
}

/// Raw config.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    base_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    excel_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    transactions_csv: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    investments_csv: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    folder_layout: Option<FolderLayout>,
    #[serde(flatten)]
    other: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Root folder for rolled workbooks
    pub base_path: PathBuf,
    /// Active workbook
    pub excel_path: PathBuf,
    pub transactions_csv: PathBuf,
    pub investments_csv: PathBuf,
    pub folder_layout: FolderLayout,
    pub source: ConfigSource,
    #[serde(skip)]
    other: Map<String, Value>,
}

impl Config {
    /// Defaults rooted at the user's documents and downloads folders
    pub fn defaults() -> Self {
        let base_path = default_base_path();
        Self::from_file(ConfigFile::default(), base_path, ConfigSource::Created)
    }

    /// Load config from the application directory.
    ///
    /// A missing file is created with defaults, a file missing `base_path` or
    /// `excel_path` is completed and written back, and an unreadable file falls
    /// back to in-memory defaults without touching disk.
    pub fn load(app_dir: &Path) -> Result<Self> {
        let path = app_dir.join(CONFIG_FILE);

        if !path.exists() {
            let config = Self::defaults();
            config.save(app_dir)?;
            return Ok(config);
        }

        let raw = match fs::read_to_string(&path)
            .ok()
            .and_then(|content| serde_json::from_str::<ConfigFile>(&content).ok())
        {
            Some(raw) => raw,
            None => {
                let mut config = Self::defaults();
                config.source = ConfigSource::Corrupt;
                return Ok(config);
            }
        };

        let partial = raw.base_path.is_none() || raw.excel_path.is_none();
        let base_path = raw.base_path.clone().unwrap_or_else(default_base_path);
        let source = if partial {
            ConfigSource::Merged
        } else {
            ConfigSource::Loaded
        };
        let config = Self::from_file(raw, base_path, source);
        if partial {
            config.save(app_dir)?;
        }
        Ok(config)
    }

    fn from_file(raw: ConfigFile, base_path: PathBuf, source: ConfigSource) -> Self {
        let downloads = default_downloads_dir();
        Self {
            excel_path: raw
                .excel_path
                .unwrap_or_else(|| base_path.join(DEFAULT_WORKBOOK_NAME)),
            transactions_csv: raw
                .transactions_csv
                .unwrap_or_else(|| downloads.join("Transactions.csv")),
            investments_csv: raw
                .investments_csv
                .unwrap_or_else(|| downloads.join("Investments.csv")),
            folder_layout: raw.folder_layout.unwrap_or_default(),
            base_path,
            source,
            other: raw.other,
        }
    }

    /// Save config to the application directory, keeping unmanaged keys
    pub fn save(&self, app_dir: &Path) -> Result<()> {
        fs::create_dir_all(app_dir).map_err(|e| {
            Error::Config(format!("Cannot create {}: {}", app_dir.display(), e))
        })?;

        let file = ConfigFile {
            base_path: Some(self.base_path.clone()),
            excel_path: Some(self.excel_path.clone()),
            transactions_csv: Some(self.transactions_csv.clone()),
            investments_csv: Some(self.investments_csv.clone()),
            folder_layout: Some(self.folder_layout),
            other: self.other.clone(),
        };
        let content = serde_json::to_string_pretty(&file)?;
        let path = app_dir.join(CONFIG_FILE);
        fs::write(&path, content)
            .map_err(|e| Error::Config(format!("Failed to write {}: {}", path.display(), e)))?;
        Ok(())
    }

    /// Point the active workbook at `path`
    pub fn set_excel_path(&mut self, path: impl Into<PathBuf>) {
        self.excel_path = path.into();
    }

    pub fn set_base_path(&mut self, path: impl Into<PathBuf>) {
        self.base_path = path.into();
    }

    /// Default CSV export for a feed
    pub fn csv_path(&self, kind: SchemaKind) -> &Path {
        match kind {
            SchemaKind::Transactions => &self.transactions_csv,
            SchemaKind::Investments => &self.investments_csv,
        }
    }

    /// Value of a key this crate does not manage
    pub fn extra(&self, key: &str) -> Option<&Value> {
        self.other.get(key)
    }
}

fn default_base_path() -> PathBuf {
    dirs::document_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_BASE_FOLDER)
}

fn default_downloads_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join("Downloads")))
        .unwrap_or_else(|| PathBuf::from("."))
}
