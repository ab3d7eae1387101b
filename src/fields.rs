//! Enumerations and field types for tasks.
//!
//! This module defines the structured values a task carries on the wire:
//! priority, progress (which decides the board column), the optional
//! in-progress stage, and the two ways the client can lay tasks out.

use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize};

/// Priority classification for task importance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    #[serde(alias = "High")]
    High,
    #[serde(alias = "Medium")]
    Medium,
    #[serde(alias = "Low")]
    Low,
}

/// Task progress. Each value owns one board column.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Progress {
    NotStarted,
    InProgress,
    Completed,
}

impl Progress {
    /// All progress values in column order.
    pub const ALL: [Progress; 3] = [Progress::NotStarted, Progress::InProgress, Progress::Completed];

    /// Column index on the board.
    pub fn column(self) -> usize {
        match self {
            Progress::NotStarted => 0,
            Progress::InProgress => 1,
            Progress::Completed => 2,
        }
    }

    /// Progress value owning the given column index.
    pub fn from_column(index: usize) -> Option<Progress> {
        Self::ALL.get(index).copied()
    }
}

/// Sub-stage of a task that is in progress.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum InProgressStage {
    Planning,
    Integration,
    Development,
    Testing,
}

/// Alternate renderings of the same task collection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ViewMode {
    #[default]
    Card,
    List,
}

/// Format a priority for display.
pub fn format_priority(p: Priority) -> &'static str {
    match p {
        Priority::High => "high",
        Priority::Medium => "medium",
        Priority::Low => "low",
    }
}

/// Format a progress value for display (matches the wire value).
pub fn format_progress(p: Progress) -> &'static str {
    match p {
        Progress::NotStarted => "not-started",
        Progress::InProgress => "in-progress",
        Progress::Completed => "completed",
    }
}

/// Column heading for a progress value.
pub fn progress_title(p: Progress) -> &'static str {
    match p {
        Progress::NotStarted => "Not Started",
        Progress::InProgress => "In Progress",
        Progress::Completed => "Completed",
    }
}

/// Format an in-progress stage for display.
pub fn format_stage(s: InProgressStage) -> &'static str {
    match s {
        InProgressStage::Planning => "planning",
        InProgressStage::Integration => "integration",
        InProgressStage::Development => "development",
        InProgressStage::Testing => "testing",
    }
}

/// Deserialize an optional stage, reading `null` and `""` as absent.
pub fn empty_stage_as_none<'de, D>(deserializer: D) -> Result<Option<InProgressStage>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => InProgressStage::from_str(s, true)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_round_trips_through_columns() {
        for p in Progress::ALL {
            assert_eq!(Progress::from_column(p.column()), Some(p));
        }
        assert_eq!(Progress::from_column(3), None);
    }

    #[test]
    fn progress_uses_kebab_case_on_the_wire() {
        let json = serde_json::to_string(&Progress::NotStarted).unwrap();
        assert_eq!(json, "\"not-started\"");
        let p: Progress = serde_json::from_str("\"in-progress\"").unwrap();
        assert_eq!(p, Progress::InProgress);
    }

    #[test]
    fn priority_accepts_capitalised_alias() {
        let p: Priority = serde_json::from_str("\"High\"").unwrap();
        assert_eq!(p, Priority::High);
    }
}
