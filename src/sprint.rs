//! Local sprint dates.
//!
//! A sprint is a start/end date pair kept in `sprint.json` in the data
//! directory. It is local to this machine and never sent to the backend.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum SprintError {
    #[error("sprint end {end} is before start {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    BadDate(String),
    #[error("sprint file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("sprint file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprint {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Sprint {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, SprintError> {
        if end < start {
            return Err(SprintError::EndBeforeStart { start, end });
        }
        Ok(Sprint { start, end })
    }

    /// Build from CLI input. A missing start means today.
    pub fn from_input(start: Option<&str>, end: &str) -> Result<Self, SprintError> {
        let start = match start {
            Some(s) => parse_date(s)?,
            None => Local::now().date_naive(),
        };
        Self::new(start, parse_date(end)?)
    }

    /// Length in days, counting both ends.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Load the saved sprint, if any.
    pub fn load(path: &Path) -> Result<Option<Self>, SprintError> {
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    /// Save using atomic write (temp file + rename).
    pub fn save(&self, path: &Path) -> Result<(), SprintError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("json.tmp");
        let mut f = File::create(&tmp)?;
        let data = serde_json::to_string_pretty(self)?;
        f.write_all(data.as_bytes())?;
        f.flush()?;
        fs::rename(tmp, path)?;
        info!(start = %self.start, end = %self.end, "sprint saved");
        Ok(())
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, SprintError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| SprintError::BadDate(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn rejects_end_before_start() {
        let err = Sprint::from_input(Some("2024-11-10"), "2024-11-01").unwrap_err();
        assert!(matches!(err, SprintError::EndBeforeStart { .. }));
    }

    #[test]
    fn rejects_malformed_dates() {
        let err = Sprint::from_input(Some("10/11/2024"), "2024-11-20").unwrap_err();
        assert!(matches!(err, SprintError::BadDate(_)));
    }

    #[test]
    fn missing_start_defaults_to_today() {
        let today = Local::now().date_naive();
        let end = (today + chrono::Duration::days(13)).to_string();
        let sprint = Sprint::from_input(None, &end).unwrap();
        assert_eq!(sprint.start, today);
        assert_eq!(sprint.days(), 14);
    }

    #[test]
    fn save_then_load_returns_same_sprint() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("sprint.json");
        assert_eq!(Sprint::load(&path).unwrap(), None);

        let sprint = Sprint::new(date("2024-11-04"), date("2024-11-15")).unwrap();
        sprint.save(&path).unwrap();
        assert_eq!(Sprint::load(&path).unwrap(), Some(sprint));
        assert!(!path.with_extension("json.tmp").exists());
    }
}
