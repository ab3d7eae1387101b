//! Client-side checks applied before a task is created.
//!
//! Edits are sent as entered; only creation goes through [`validate_new_task`].

use thiserror::Error;

use crate::fields::{Priority, Progress};
use crate::tags;
use crate::task::NewTask;

pub const SP_MINIMUM: i64 = 1;
pub const SP_MAXIMUM: i64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter all parameters")]
    MissingParameters,
    #[error("Story point estimate must be between {SP_MINIMUM} and {SP_MAXIMUM}.")]
    StoryPointOutOfRange(i64),
}

/// Raw create-form input, as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub story_point: String,
    pub development_tags: Vec<u32>,
    pub priority_tag: Option<Priority>,
    pub progress_tag: Option<Progress>,
}

/// Read the leading integer of `raw`, so `"5pts"` is 5 and `"3.5"` is 3.
///
/// Returns `None` when no digit follows the optional sign. Values too large
/// for `i64` saturate, which keeps them out of range rather than missing.
pub fn parse_story_point(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let value = rest[..digits]
        .parse::<i64>()
        .unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}

/// Check a draft and build the `/add_task` body.
///
/// Missing input is reported before an out-of-range story point.
pub fn validate_new_task(draft: &TaskDraft) -> Result<NewTask, ValidationError> {
    let title = draft.title.trim();
    let description = draft.description.trim();
    let story_point = parse_story_point(&draft.story_point);
    let tag_mask = draft.development_tags.iter().fold(0u32, |acc, v| acc | v);

    let (Some(story_point), Some(priority_tag), Some(progress_tag)) =
        (story_point, draft.priority_tag, draft.progress_tag)
    else {
        return Err(ValidationError::MissingParameters);
    };
    if title.is_empty() || description.is_empty() || tag_mask == 0 {
        return Err(ValidationError::MissingParameters);
    }
    if !(SP_MINIMUM..=SP_MAXIMUM).contains(&story_point) {
        return Err(ValidationError::StoryPointOutOfRange(story_point));
    }

    Ok(NewTask {
        title: title.to_string(),
        description: description.to_string(),
        story_point: story_point as u32,
        development_bit_vector: tags::encode(draft.development_tags.iter().copied()),
        priority_tag,
        progress_tag,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(story_point: &str) -> TaskDraft {
        TaskDraft {
            title: "  Write tests ".to_string(),
            description: "Cover the codec".to_string(),
            story_point: story_point.to_string(),
            development_tags: vec![1, 16],
            priority_tag: Some(Priority::Medium),
            progress_tag: Some(Progress::NotStarted),
        }
    }

    #[test]
    fn accepts_range_bounds() {
        let low = validate_new_task(&draft("1")).unwrap();
        assert_eq!(low.story_point, 1);
        assert_eq!(low.title, "Write tests");
        assert_eq!(low.development_bit_vector, "10001");
        assert_eq!(validate_new_task(&draft("10")).unwrap().story_point, 10);
    }

    #[test]
    fn rejects_out_of_range_story_points() {
        assert_eq!(
            validate_new_task(&draft("0")),
            Err(ValidationError::StoryPointOutOfRange(0))
        );
        assert_eq!(
            validate_new_task(&draft("11")),
            Err(ValidationError::StoryPointOutOfRange(11))
        );
        assert_eq!(
            ValidationError::StoryPointOutOfRange(0).to_string(),
            "Story point estimate must be between 1 and 10."
        );
    }

    #[test]
    fn rejects_missing_development_tags() {
        let mut d = draft("3");
        d.development_tags.clear();
        assert_eq!(validate_new_task(&d), Err(ValidationError::MissingParameters));
    }

    #[test]
    fn missing_input_wins_over_range() {
        let mut d = draft("42");
        d.description = "   ".to_string();
        assert_eq!(validate_new_task(&d), Err(ValidationError::MissingParameters));
    }

    #[test]
    fn non_numeric_story_point_is_missing() {
        assert_eq!(
            validate_new_task(&draft("three")),
            Err(ValidationError::MissingParameters)
        );
    }

    #[test]
    fn story_point_reads_leading_integer() {
        assert_eq!(parse_story_point("5pts"), Some(5));
        assert_eq!(parse_story_point(" 3.5"), Some(3));
        assert_eq!(parse_story_point("-2"), Some(-2));
        assert_eq!(parse_story_point("+7"), Some(7));
        assert_eq!(parse_story_point("pts5"), None);
        assert_eq!(parse_story_point("-"), None);
        assert_eq!(parse_story_point("99999999999999999999"), Some(i64::MAX));

        assert_eq!(validate_new_task(&draft("3.5")).unwrap().story_point, 3);
        assert_eq!(validate_new_task(&draft("5pts")).unwrap().story_point, 5);
        assert_eq!(
            validate_new_task(&draft("12.0")),
            Err(ValidationError::StoryPointOutOfRange(12))
        );
    }

    #[test]
    fn unselected_priority_or_progress_is_missing() {
        let mut d = draft("3");
        d.priority_tag = None;
        assert_eq!(validate_new_task(&d), Err(ValidationError::MissingParameters));
        let mut d = draft("3");
        d.progress_tag = None;
        assert_eq!(validate_new_task(&d), Err(ValidationError::MissingParameters));
    }
}
