//! Task data structures and request payloads.
//!
//! `Task` mirrors the JSON the backend returns. `NewTask` and `TaskUpdate`
//! are the bodies sent to `/add_task` and `/update_task/:id`.

use serde::{Deserialize, Serialize};

use crate::fields::*;

/// A work item as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub story_point: u32,
    pub priority_tag: Priority,
    pub progress_tag: Progress,
    #[serde(default, deserialize_with = "empty_stage_as_none", skip_serializing_if = "Option::is_none")]
    pub in_progress_stage: Option<InProgressStage>,
    pub development_bit_vector: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub created_at: String,
}

/// Response shape of `GET /get_tasks`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TaskList {
    pub tasks: Vec<Task>,
}

/// Body of `POST /add_task`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub story_point: u32,
    pub development_bit_vector: String,
    pub priority_tag: Priority,
    pub progress_tag: Progress,
}

/// Body of `POST /update_task/:id`.
///
/// The story point is omitted when the edit input did not parse, so the
/// server keeps its stored value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskUpdate {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub story_point: Option<u32>,
    pub priority_tag: Priority,
    pub progress_tag: Progress,
    pub in_progress_stage: Option<InProgressStage>,
    pub development_bit_vector: String,
}

impl TaskUpdate {
    /// Start an update carrying every current value of `task`.
    pub fn from_task(task: &Task) -> Self {
        TaskUpdate {
            title: task.title.clone(),
            description: task.description.clone(),
            story_point: Some(task.story_point),
            priority_tag: task.priority_tag,
            progress_tag: task.progress_tag,
            in_progress_stage: task.in_progress_stage,
            development_bit_vector: task.development_bit_vector.clone(),
        }
    }

    /// Change progress, dropping the stage unless the task is in progress.
    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.progress_tag = progress;
        if progress != Progress::InProgress {
            self.in_progress_stage = None;
        } else if self.in_progress_stage.is_none() {
            self.in_progress_stage = Some(InProgressStage::Planning);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{
            "id": 7,
            "title": "Login page",
            "description": "Build the form",
            "story_point": 3,
            "development_bit_vector": "00101",
            "priority_tag": "high",
            "progress_tag": "in-progress",
            "in_progress_stage": "",
            "user": null,
            "created_at": "Monday 04 November, 10:15 AM"
        }"#
    }

    #[test]
    fn task_parses_backend_schema() {
        let task: Task = serde_json::from_str(sample_json()).unwrap();
        assert_eq!(task.id, 7);
        assert_eq!(task.priority_tag, Priority::High);
        assert_eq!(task.progress_tag, Progress::InProgress);
        assert_eq!(task.in_progress_stage, None);
        assert_eq!(task.user, None);
    }

    #[test]
    fn task_list_parses_wrapper() {
        let body = format!("{{\"tasks\": [{}]}}", sample_json());
        let list: TaskList = serde_json::from_str(&body).unwrap();
        assert_eq!(list.tasks.len(), 1);
    }

    #[test]
    fn update_serializes_every_edit_field() {
        let task: Task = serde_json::from_str(sample_json()).unwrap();
        let update = TaskUpdate::from_task(&task).with_progress(Progress::InProgress);
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value["in_progress_stage"], "planning");
        assert_eq!(value["story_point"], 3);
        assert_eq!(value["development_bit_vector"], "00101");
    }

    #[test]
    fn leaving_in_progress_clears_stage() {
        let task: Task = serde_json::from_str(sample_json()).unwrap();
        let update = TaskUpdate::from_task(&task)
            .with_progress(Progress::InProgress)
            .with_progress(Progress::Completed);
        assert_eq!(update.in_progress_stage, None);
        let value = serde_json::to_value(&update).unwrap();
        assert!(value["in_progress_stage"].is_null());
    }

    #[test]
    fn update_omits_unparsed_story_point() {
        let task: Task = serde_json::from_str(sample_json()).unwrap();
        let mut update = TaskUpdate::from_task(&task);
        update.story_point = None;
        let value = serde_json::to_value(&update).unwrap();
        assert!(value.get("story_point").is_none());
    }
}
