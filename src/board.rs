//! Kanban board model with drag-and-drop reassignment.
//!
//! The board places card ids into one column per [`Progress`] value and
//! tracks a single drag gesture. It performs no I/O: a drop only reports the
//! [`CardMove`], and the caller decides whether to persist it.

use tracing::debug;

use crate::fields::Progress;
use crate::task::Task;

/// Drag gesture state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging { card: u64, origin: Progress },
}

/// A card that landed in a different column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardMove {
    pub card: u64,
    pub from: Progress,
    pub to: Progress,
}

#[derive(Debug, Default)]
pub struct Board {
    columns: [Vec<u64>; 3],
    drag: DragState,
    highlight: Option<Progress>,
}

impl Board {
    /// Replace all cards and abandon any drag in flight.
    pub fn load(&mut self, tasks: &[Task]) {
        for column in self.columns.iter_mut() {
            column.clear();
        }
        for task in tasks {
            self.columns[task.progress_tag.column()].push(task.id);
        }
        self.drag = DragState::Idle;
        self.highlight = None;
    }

    pub fn column(&self, progress: Progress) -> &[u64] {
        &self.columns[progress.column()]
    }

    /// Column currently holding `card`.
    pub fn column_of(&self, card: u64) -> Option<Progress> {
        Progress::ALL
            .into_iter()
            .find(|p| self.columns[p.column()].contains(&card))
    }

    pub fn card_count(&self) -> usize {
        self.columns.iter().map(Vec::len).sum()
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    /// Column highlighted as the drop target.
    pub fn highlight(&self) -> Option<Progress> {
        self.highlight
    }

    pub fn is_dragging(&self, card: u64) -> bool {
        matches!(self.drag, DragState::Dragging { card: c, .. } if c == card)
    }

    /// Pick up a card. Returns false if a drag is already active or the card
    /// is not on the board.
    pub fn drag_start(&mut self, card: u64) -> bool {
        if self.drag != DragState::Idle {
            return false;
        }
        let Some(origin) = self.column_of(card) else {
            return false;
        };
        debug!(card, ?origin, "drag start");
        self.drag = DragState::Dragging { card, origin };
        true
    }

    pub fn drag_enter(&mut self, column: Progress) {
        if let DragState::Dragging { .. } = self.drag {
            self.highlight = Some(column);
        }
    }

    pub fn drag_leave(&mut self, column: Progress) {
        if self.highlight == Some(column) {
            self.highlight = None;
        }
    }

    /// Drop the dragged card at the end of `column`.
    ///
    /// Dropping on the origin column reorders the card to the end but
    /// reports no move.
    pub fn drop(&mut self, column: Progress) -> Option<CardMove> {
        let DragState::Dragging { card, origin } = self.drag else {
            return None;
        };
        for cards in self.columns.iter_mut() {
            cards.retain(|&c| c != card);
        }
        self.columns[column.column()].push(card);
        self.drag = DragState::Idle;
        self.highlight = None;
        debug!(card, from = ?origin, to = ?column, "drop");

        (origin != column).then_some(CardMove {
            card,
            from: origin,
            to: column,
        })
    }

    /// Cancel the drag without moving anything.
    pub fn drag_end(&mut self) {
        if let DragState::Dragging { card, .. } = self.drag {
            debug!(card, "drag cancelled");
        }
        self.drag = DragState::Idle;
        self.highlight = None;
    }
}
