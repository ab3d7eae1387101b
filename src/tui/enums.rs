//! Enumerations for TUI state management.

/// Screen the board application is showing.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AppState {
    Board,
    TaskDetail,
    AddTask,
    EditTask,
    Confirm,
    Help,
}
