//! Task form handling for the terminal user interface.
//!
//! One `TaskForm` backs both the create and the edit popup. Selectors hold
//! an index into their option list; the development tags are a row of
//! checkboxes walked with left/right and toggled with space.

use crate::{
    fields::{InProgressStage, Priority, Progress},
    tags::{self, BIT_VECTOR_WIDTH, DEVELOPMENT_TAGS},
    task::{Task, TaskUpdate},
    tui::input::InputField,
    validate::{parse_story_point, TaskDraft},
};

/// Field order for form navigation.
pub const TITLE_FIELD: usize = 0;
pub const DESCRIPTION_FIELD: usize = 1;
pub const STORY_POINT_FIELD: usize = 2;
pub const PRIORITY_FIELD: usize = 3;
pub const PROGRESS_FIELD: usize = 4;
pub const STAGE_FIELD: usize = 5;
pub const TAGS_FIELD: usize = 6;
pub const FIELD_COUNT: usize = 7;

pub const PRIORITIES: [Option<Priority>; 4] =
    [None, Some(Priority::High), Some(Priority::Medium), Some(Priority::Low)];
pub const PROGRESSES: [Option<Progress>; 4] = [
    None,
    Some(Progress::NotStarted),
    Some(Progress::InProgress),
    Some(Progress::Completed),
];
pub const STAGES: [InProgressStage; 4] = [
    InProgressStage::Planning,
    InProgressStage::Integration,
    InProgressStage::Development,
    InProgressStage::Testing,
];

pub struct TaskForm {
    pub title: InputField,
    pub description: InputField,
    pub story_point: InputField,
    pub priority: usize,
    pub progress: usize,
    pub stage: usize,
    pub tags: [bool; BIT_VECTOR_WIDTH],
    pub tag_cursor: usize,
    pub current_field: usize,
    /// Task id when editing.
    pub editing: Option<u64>,
}

impl TaskForm {
    /// Empty create form. Priority and progress start unchosen.
    pub fn new() -> Self {
        Self {
            title: InputField::new(),
            description: InputField::new(),
            story_point: InputField::new(),
            priority: 0,
            progress: 0,
            stage: 0,
            tags: [false; BIT_VECTOR_WIDTH],
            tag_cursor: 0,
            current_field: TITLE_FIELD,
            editing: None,
        }
    }

    /// Edit form pre-filled from `task`, with checkboxes set from its bit vector.
    pub fn from_task(task: &Task) -> Self {
        let mask = tags::mask(&task.development_bit_vector);
        let mut form = Self::new();
        form.title = InputField::with_value(&task.title);
        form.description = InputField::with_value(&task.description);
        form.story_point = InputField::with_value(&task.story_point.to_string());
        form.priority = PRIORITIES
            .iter()
            .position(|p| *p == Some(task.priority_tag))
            .unwrap_or(1);
        form.progress = PROGRESSES
            .iter()
            .position(|p| *p == Some(task.progress_tag))
            .unwrap_or(1);
        // An in-progress task without a stage opens on planning.
        form.stage = task
            .in_progress_stage
            .and_then(|s| STAGES.iter().position(|x| *x == s))
            .unwrap_or(0);
        for (i, checked) in form.tags.iter_mut().enumerate() {
            *checked = mask & (1 << i) != 0;
        }
        form.editing = Some(task.id);
        form
    }

    pub fn selected_priority(&self) -> Option<Priority> {
        PRIORITIES[self.priority]
    }

    pub fn selected_progress(&self) -> Option<Progress> {
        PROGRESSES[self.progress]
    }

    /// The stage selector only shows for in-progress tasks.
    pub fn stage_visible(&self) -> bool {
        self.selected_progress() == Some(Progress::InProgress)
    }

    pub fn selected_stage(&self) -> Option<InProgressStage> {
        self.stage_visible().then(|| STAGES[self.stage])
    }

    /// Bit values of the checked tags.
    pub fn tag_values(&self) -> Vec<u32> {
        self.tags
            .iter()
            .enumerate()
            .filter(|(_, checked)| **checked)
            .map(|(i, _)| 1 << i)
            .collect()
    }

    pub fn toggle_tag(&mut self) {
        self.tags[self.tag_cursor] = !self.tags[self.tag_cursor];
    }

    pub fn next_field(&mut self) {
        self.current_field = (self.current_field + 1) % FIELD_COUNT;
        if self.current_field == STAGE_FIELD && !self.stage_visible() {
            self.current_field += 1;
        }
    }

    pub fn prev_field(&mut self) {
        self.current_field = if self.current_field == 0 {
            FIELD_COUNT - 1
        } else {
            self.current_field - 1
        };
        if self.current_field == STAGE_FIELD && !self.stage_visible() {
            self.current_field -= 1;
        }
    }

    fn active_input(&mut self) -> Option<&mut InputField> {
        match self.current_field {
            TITLE_FIELD => Some(&mut self.title),
            DESCRIPTION_FIELD => Some(&mut self.description),
            STORY_POINT_FIELD => Some(&mut self.story_point),
            _ => None,
        }
    }

    /// Typed char: text goes to the active input, space toggles a tag.
    pub fn handle_char(&mut self, c: char) {
        if self.current_field == TAGS_FIELD {
            if c == ' ' {
                self.toggle_tag();
            }
            return;
        }
        if let Some(input) = self.active_input() {
            input.handle_char(c);
        }
    }

    pub fn handle_backspace(&mut self) {
        if let Some(input) = self.active_input() {
            input.handle_backspace();
        }
    }

    pub fn handle_delete(&mut self) {
        if let Some(input) = self.active_input() {
            input.handle_delete();
        }
    }

    /// Left/right: move the text cursor, cycle a selector, or walk the tags.
    ///
    /// The edit form never cycles back to "unchosen".
    pub fn handle_left_right(&mut self, right: bool) {
        let floor = usize::from(self.editing.is_some());
        match self.current_field {
            PRIORITY_FIELD => self.priority = cycle(self.priority, PRIORITIES.len(), floor, right),
            PROGRESS_FIELD => self.progress = cycle(self.progress, PROGRESSES.len(), floor, right),
            STAGE_FIELD => self.stage = cycle(self.stage, STAGES.len(), 0, right),
            TAGS_FIELD => self.tag_cursor = cycle(self.tag_cursor, DEVELOPMENT_TAGS.len(), 0, right),
            _ => {
                if let Some(input) = self.active_input() {
                    if right {
                        input.move_cursor_right();
                    } else {
                        input.move_cursor_left();
                    }
                }
            }
        }
    }

    /// Raw input for create validation.
    pub fn to_draft(&self) -> TaskDraft {
        TaskDraft {
            title: self.title.value.clone(),
            description: self.description.value.clone(),
            story_point: self.story_point.value.clone(),
            development_tags: self.tag_values(),
            priority_tag: self.selected_priority(),
            progress_tag: self.selected_progress(),
        }
    }

    /// Update body for the edit form, sent without validation.
    ///
    /// Falls back to `original` for a selector left unchosen.
    pub fn to_update(&self, original: &Task) -> TaskUpdate {
        TaskUpdate {
            title: self.title.value.clone(),
            description: self.description.value.clone(),
            story_point: parse_story_point(&self.story_point.value).and_then(|v| u32::try_from(v).ok()),
            priority_tag: self.selected_priority().unwrap_or(original.priority_tag),
            progress_tag: self.selected_progress().unwrap_or(original.progress_tag),
            in_progress_stage: self.selected_stage(),
            development_bit_vector: tags::encode(self.tag_values()),
        }
    }
}

impl Default for TaskForm {
    fn default() -> Self {
        Self::new()
    }
}

fn cycle(current: usize, len: usize, floor: usize, forward: bool) -> usize {
    if forward {
        if current + 1 >= len {
            floor
        } else {
            current + 1
        }
    } else if current <= floor {
        len - 1
    } else {
        current - 1
    }
}
