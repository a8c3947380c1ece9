//! Roll-forward service - advance the active workbook to a new dated file

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use regex::Regex;
use serde::Serialize;
use uuid::Uuid;

use crate::config::{Config, FolderLayout};
use crate::domain::result::{Error, Result};
use crate::ports::{FileStore, Prompter};

/// Accepted target date formats, tried in order
const BUSINESS_DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%Y-%m-%d"];

fn workbook_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?P<prefix>.+)_(?P<date>\d{8})\.(?P<ext>[^.]+)$").unwrap()
    })
}

/// A workbook file name split into `<prefix>_<YYYYMMDD>.<ext>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatedName {
    pub prefix: String,
    pub date: NaiveDate,
    pub extension: String,
}

impl DatedName {
    /// Same prefix and extension, new date
    pub fn with_date(&self, date: NaiveDate) -> String {
        format!("{}_{}.{}", self.prefix, date.format("%Y%m%d"), self.extension)
    }
}

/// Parse the date embedded in a workbook file name
pub fn extract_file_date(path: &Path) -> Result<DatedName> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let caps = workbook_name_pattern().captures(&name).ok_or_else(|| {
        Error::Naming(format!(
            "'{}' does not match <prefix>_<YYYYMMDD>.<ext>",
            name
        ))
    })?;

    let digits = &caps["date"];
    let date = NaiveDate::parse_from_str(digits, "%Y%m%d")
        .map_err(|_| Error::Naming(format!("Invalid date in filename: {}", digits)))?;

    Ok(DatedName {
        prefix: caps["prefix"].to_string(),
        date,
        extension: caps["ext"].to_string(),
    })
}

/// Parse a target business date given as `MM/DD/YYYY` or `YYYY-MM-DD`
pub fn parse_business_date(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();
    BUSINESS_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| {
            Error::validation(format!(
                "Business date must be MM/DD/YYYY or YYYY-MM-DD, got '{}'",
                trimmed
            ))
        })
}

/// The business day before `today`: Monday, Saturday and Sunday go back to Friday
pub fn previous_business_day(today: NaiveDate) -> NaiveDate {
    let days_back = match today.weekday() {
        Weekday::Mon => 3,
        Weekday::Sun => 2,
        _ => 1,
    };
    today - Duration::days(days_back)
}

/// Result of a completed roll
#[derive(Debug, Clone, Serialize)]
pub struct RollResult {
    pub run_id: String,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub source_date: NaiveDate,
    pub target_date: NaiveDate,
    /// An existing destination was replaced after confirmation
    pub overwritten: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RollOutcome {
    Rolled(RollResult),
    /// The user declined to overwrite `destination`; nothing changed
    Cancelled { destination: PathBuf },
}

/// Roll-forward service
pub struct RollService {
    files: Box<dyn FileStore>,
    app_dir: PathBuf,
}

impl RollService {
    pub fn new(files: Box<dyn FileStore>, app_dir: PathBuf) -> Self {
        Self { files, app_dir }
    }

    /// Where a roll of `source` to `target` would land
    pub fn destination_for(&self, config: &Config, source: &Path, target: NaiveDate) -> Result<PathBuf> {
        let name = extract_file_date(source)?;
        Ok(output_dir(config, target).join(name.with_date(target)))
    }

    /// Copy `source` to a file named for `target`, then point the config at it.
    ///
    /// Every check runs before anything is written; a declined overwrite
    /// returns [`RollOutcome::Cancelled`] with the config untouched.
    pub fn roll_forward(
        &self,
        config: &mut Config,
        source: &Path,
        target: NaiveDate,
        prompter: &dyn Prompter,
    ) -> Result<RollOutcome> {
        if !self.files.exists(source) {
            return Err(Error::input_missing(format!(
                "Source workbook not found: {}",
                source.display()
            )));
        }

        let name = extract_file_date(source)?;
        if target <= name.date {
            return Err(Error::Sequence(format!(
                "Target business date {} must be after the workbook date {}",
                target.format("%m/%d/%Y"),
                name.date.format("%m/%d/%Y")
            )));
        }

        let root = config.base_path.clone();
        let dir = output_dir(config, target);
        for path in [&root, &dir] {
            self.files.ensure_dir(path).map_err(|e| {
                Error::MissingPath(format!("Cannot create {}: {}", path.display(), e))
            })?;
        }

        let destination = dir.join(name.with_date(target));
        let overwritten = self.files.exists(&destination);
        if overwritten {
            let prompt = format!("{} already exists. Overwrite?", destination.display());
            if !prompter.confirm(&prompt)? {
                return Ok(RollOutcome::Cancelled { destination });
            }
        }

        self.files.copy(source, &destination)?;

        config.set_excel_path(destination.clone());
        config.save(&self.app_dir)?;

        Ok(RollOutcome::Rolled(RollResult {
            run_id: Uuid::new_v4().to_string(),
            source: source.to_path_buf(),
            destination,
            source_date: name.date,
            target_date: target,
            overwritten,
        }))
    }
}

fn output_dir(config: &Config, target: NaiveDate) -> PathBuf {
    match config.folder_layout {
        FolderLayout::Flat => config.base_path.clone(),
        FolderLayout::YearMonth => config
            .base_path
            .join(target.format("%Y").to_string())
            .join(target.format("%m").to_string()),
    }
}
