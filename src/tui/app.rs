//! Kanban board application for the terminal user interface.
//!
//! `BoardApp` owns the fetched tasks, the board model and every popup. Key
//! and mouse events are dispatched to per-screen handlers; rendering reads
//! state only, except for remembering where columns and cards were drawn so
//! mouse drags can be hit-tested.

use std::io;
use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use tracing::{info, warn};

use crate::board::{Board, CardMove, DragState};
use crate::client::TaskApi;
use crate::config::Config;
use crate::fields::*;
use crate::tags::DEVELOPMENT_TAGS;
use crate::task::{Task, TaskUpdate};
use crate::tui::{
    colors::{column_color, priority_color, DARK_RED, DRAG_PURPLE, GOLD},
    enums::AppState,
    task_form::{
        TaskForm, DESCRIPTION_FIELD, PRIORITY_FIELD, PROGRESS_FIELD, STAGES, STAGE_FIELD,
        STORY_POINT_FIELD, TAGS_FIELD, TITLE_FIELD,
    },
    utils::{centered_rect, hit},
};
use crate::validate::validate_new_task;
use crate::view::{task_view, truncate};

const CARD_HEIGHT: u16 = 5;

pub struct BoardApp<A: TaskApi> {
    api: A,
    persist_moves: bool,
    state: AppState,
    view_mode: ViewMode,
    tasks: Vec<Task>,
    board: Board,
    selected_column: usize,
    selected_card: usize,
    list_state: TableState,
    task_form: TaskForm,
    /// Task being edited, as fetched when the edit form opened.
    editing_task: Option<Task>,
    confirm_delete: Option<(u64, String)>,
    /// Card under the last mouse press; becomes a drag on the first motion.
    pending_drag: Option<u64>,
    status_message: String,
    column_areas: [Rect; 3],
    card_areas: Vec<(Rect, u64)>,
}

impl<A: TaskApi> BoardApp<A> {
    /// Create the app and load tasks from the backend.
    pub fn new(api: A, config: &Config) -> Self {
        let mut app = BoardApp {
            api,
            persist_moves: config.persist_moves,
            state: AppState::Board,
            view_mode: config.default_view,
            tasks: Vec::new(),
            board: Board::default(),
            selected_column: 0,
            selected_card: 0,
            list_state: TableState::default(),
            task_form: TaskForm::new(),
            editing_task: None,
            confirm_delete: None,
            pending_drag: None,
            status_message: String::new(),
            column_areas: [Rect::default(); 3],
            card_areas: Vec::new(),
        };
        app.refresh();
        app
    }

    /// Re-fetch every task and rebuild the board.
    fn refresh(&mut self) {
        match self.api.list_tasks() {
            Ok(tasks) => {
                self.board.load(&tasks);
                self.tasks = tasks;
                self.clamp_selection();
            }
            Err(e) => {
                warn!(error = %e, "failed to load tasks");
                self.set_status_message(format!("Error: {e}"));
            }
        }
    }

    fn set_status_message(&mut self, msg: String) {
        self.status_message = msg;
    }

    fn task(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn selected_progress(&self) -> Progress {
        Progress::from_column(self.selected_column).unwrap_or(Progress::NotStarted)
    }

    fn selected_task_id(&self) -> Option<u64> {
        match self.view_mode {
            ViewMode::Card => self
                .board
                .column(self.selected_progress())
                .get(self.selected_card)
                .copied(),
            ViewMode::List => self
                .list_state
                .selected()
                .and_then(|i| self.tasks.get(i))
                .map(|t| t.id),
        }
    }

    fn clamp_selection(&mut self) {
        if self.selected_column >= Progress::ALL.len() {
            self.selected_column = 0;
        }
        let len = self.board.column(self.selected_progress()).len();
        if len == 0 {
            self.selected_card = 0;
        } else if self.selected_card >= len {
            self.selected_card = len - 1;
        }
        match (self.list_state.selected(), self.tasks.len()) {
            (_, 0) => self.list_state.select(None),
            (None, _) => self.list_state.select(Some(0)),
            (Some(i), n) if i >= n => self.list_state.select(Some(n - 1)),
            _ => {}
        }
    }

    /// Point the selection at `card`, wherever it now sits.
    fn select_card(&mut self, card: u64) {
        if let Some(progress) = self.board.column_of(card) {
            self.selected_column = progress.column();
            self.selected_card = self
                .board
                .column(progress)
                .iter()
                .position(|&c| c == card)
                .unwrap_or(0);
        }
    }

    /// Dispatch one key press. Returns true when the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }
        match self.state {
            AppState::Board => return self.handle_board_input(key),
            AppState::TaskDetail => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q')) {
                    self.state = AppState::Board;
                }
            }
            AppState::AddTask | AppState::EditTask => self.handle_form_input(key),
            AppState::Confirm => self.handle_confirm_input(key.code),
            AppState::Help => self.state = AppState::Board,
        }
        false
    }

    fn handle_board_input(&mut self, key: KeyEvent) -> bool {
        if matches!(self.board.drag_state(), DragState::Dragging { .. }) {
            match key.code {
                KeyCode::Left => self.shift_drop_target(false),
                KeyCode::Right => self.shift_drop_target(true),
                KeyCode::Char(' ') | KeyCode::Enter => {
                    let target = self.board.highlight().unwrap_or(self.selected_progress());
                    self.drop_on(target);
                }
                KeyCode::Esc => {
                    self.board.drag_end();
                    self.set_status_message("Move cancelled".to_string());
                }
                _ => {}
            }
            return false;
        }

        self.status_message.clear();
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Left if key.modifiers.contains(KeyModifiers::CONTROL) => self.quick_move(false),
            KeyCode::Right if key.modifiers.contains(KeyModifiers::CONTROL) => self.quick_move(true),
            KeyCode::Left if self.view_mode == ViewMode::Card => {
                if self.selected_column > 0 {
                    self.selected_column -= 1;
                    self.clamp_selection();
                }
            }
            KeyCode::Right if self.view_mode == ViewMode::Card => {
                if self.selected_column + 1 < Progress::ALL.len() {
                    self.selected_column += 1;
                    self.clamp_selection();
                }
            }
            KeyCode::Up => match self.view_mode {
                ViewMode::Card => self.selected_card = self.selected_card.saturating_sub(1),
                ViewMode::List => {
                    let i = self.list_state.selected().unwrap_or(0);
                    self.list_state.select(Some(i.saturating_sub(1)));
                }
            },
            KeyCode::Down => match self.view_mode {
                ViewMode::Card => {
                    let len = self.board.column(self.selected_progress()).len();
                    if self.selected_card + 1 < len {
                        self.selected_card += 1;
                    }
                }
                ViewMode::List => {
                    let i = self.list_state.selected().unwrap_or(0);
                    if i + 1 < self.tasks.len() {
                        self.list_state.select(Some(i + 1));
                    }
                }
            },
            KeyCode::Char(' ') if self.view_mode == ViewMode::Card => {
                if let Some(card) = self.selected_task_id() {
                    if self.board.drag_start(card) {
                        self.board.drag_enter(self.selected_progress());
                        self.set_status_message(
                            "Moving card: ←/→ choose column, Space/Enter drop, Esc cancel".to_string(),
                        );
                    }
                }
            }
            KeyCode::Enter => {
                if self.selected_task_id().is_some() {
                    self.state = AppState::TaskDetail;
                }
            }
            KeyCode::Char('a') => {
                self.task_form = TaskForm::new();
                self.editing_task = None;
                self.state = AppState::AddTask;
            }
            KeyCode::Char('e') => self.open_edit_form(),
            KeyCode::Char('x') | KeyCode::Delete => {
                let target = self
                    .selected_task_id()
                    .and_then(|id| self.task(id))
                    .map(|t| (t.id, t.title.clone()));
                if target.is_some() {
                    self.confirm_delete = target;
                    self.state = AppState::Confirm;
                }
            }
            KeyCode::Char('r') => {
                self.refresh();
                if self.status_message.is_empty() {
                    self.set_status_message(format!("Loaded {} tasks", self.tasks.len()));
                }
            }
            KeyCode::Char('v') => {
                self.view_mode = match self.view_mode {
                    ViewMode::Card => ViewMode::List,
                    ViewMode::List => ViewMode::Card,
                };
                self.clamp_selection();
            }
            KeyCode::Char('h') | KeyCode::Char('?') => self.state = AppState::Help,
            _ => {}
        }
        false
    }

    /// Move the drop highlight one column left or right.
    fn shift_drop_target(&mut self, right: bool) {
        let current = self.board.highlight().unwrap_or(self.selected_progress());
        let index = current.column();
        let next = if right {
            (index + 1).min(Progress::ALL.len() - 1)
        } else {
            index.saturating_sub(1)
        };
        let Some(target) = Progress::from_column(next) else {
            return;
        };
        self.board.drag_leave(current);
        self.board.drag_enter(target);
        self.selected_column = next;
    }

    /// Pick up, retarget and drop the selected card in one step.
    fn quick_move(&mut self, right: bool) {
        if self.view_mode != ViewMode::Card {
            return;
        }
        let Some(card) = self.selected_task_id() else {
            return;
        };
        if !self.board.drag_start(card) {
            return;
        }
        self.board.drag_enter(self.selected_progress());
        self.shift_drop_target(right);
        let target = self.board.highlight().unwrap_or(self.selected_progress());
        self.drop_on(target);
    }

    fn drop_on(&mut self, target: Progress) {
        let dragged = match self.board.drag_state() {
            DragState::Dragging { card, .. } => Some(card),
            DragState::Idle => None,
        };
        let moved = self.board.drop(target);
        if let Some(card) = dragged {
            self.select_card(card);
        }
        if let Some(mv) = moved {
            self.finish_move(mv);
        }
    }

    /// Persist a column move when configured to; otherwise it stays visual.
    fn finish_move(&mut self, mv: CardMove) {
        let column = progress_title(mv.to);
        if !self.persist_moves {
            info!(card = mv.card, to = ?mv.to, "card moved locally");
            self.set_status_message(format!("Moved #{} to {column} (not saved)", mv.card));
            return;
        }
        let Some(task) = self.task(mv.card) else {
            return;
        };
        let update = TaskUpdate::from_task(task).with_progress(mv.to);
        match self.api.update_task(mv.card, &update) {
            Ok(()) => {
                info!(card = mv.card, to = ?mv.to, "card move saved");
                self.refresh();
                self.select_card(mv.card);
                self.set_status_message(format!("Moved #{} to {column}", mv.card));
            }
            Err(e) => {
                self.refresh();
                self.set_status_message(format!("Error: {e}"));
            }
        }
    }

    /// Fetch the selected task and open it in the edit form.
    fn open_edit_form(&mut self) {
        let Some(id) = self.selected_task_id() else {
            return;
        };
        match self.api.get_task(id) {
            Ok(task) => {
                self.task_form = TaskForm::from_task(&task);
                self.editing_task = Some(task);
                self.state = AppState::EditTask;
            }
            Err(e) => self.set_status_message(format!("Error: {e}")),
        }
    }

    fn handle_form_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.state = AppState::Board;
                self.editing_task = None;
            }
            KeyCode::Tab | KeyCode::Down => self.task_form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.task_form.prev_field(),
            KeyCode::Left => self.task_form.handle_left_right(false),
            KeyCode::Right => self.task_form.handle_left_right(true),
            KeyCode::Backspace => self.task_form.handle_backspace(),
            KeyCode::Delete => self.task_form.handle_delete(),
            KeyCode::Enter => {
                if self.state == AppState::EditTask {
                    self.submit_edit();
                } else {
                    self.submit_create();
                }
            }
            KeyCode::Char(c) => self.task_form.handle_char(c),
            _ => {}
        }
    }

    fn submit_create(&mut self) {
        let new_task = match validate_new_task(&self.task_form.to_draft()) {
            Ok(t) => t,
            Err(e) => {
                self.set_status_message(e.to_string());
                return;
            }
        };
        match self.api.create_task(&new_task) {
            Ok(created) => {
                self.state = AppState::Board;
                self.task_form = TaskForm::new();
                self.refresh();
                self.select_card(created.id);
                self.set_status_message(format!("Task \"{}\" created", created.title));
            }
            Err(e) => self.set_status_message(format!("Error: {e}")),
        }
    }

    fn submit_edit(&mut self) {
        let Some(original) = self.editing_task.take() else {
            self.state = AppState::Board;
            return;
        };
        let update = self.task_form.to_update(&original);
        match self.api.update_task(original.id, &update) {
            Ok(()) => {
                self.state = AppState::Board;
                self.refresh();
                self.select_card(original.id);
                self.set_status_message("Task updated successfully!".to_string());
            }
            Err(e) => {
                self.editing_task = Some(original);
                self.set_status_message(format!("Error: {e}"));
            }
        }
    }

    fn handle_confirm_input(&mut self, key: KeyCode) {
        let Some((id, title)) = self.confirm_delete.clone() else {
            self.state = AppState::Board;
            return;
        };
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                self.state = AppState::Board;
                self.confirm_delete = None;
                match self.api.delete_task(id) {
                    Ok(()) => {
                        self.refresh();
                        self.set_status_message(format!("\"{title}\" has been deleted."));
                    }
                    Err(e) => {
                        warn!(id, error = %e, "delete failed");
                        self.set_status_message(format!(
                            "Failed to delete \"{title}\". Please try again. ({e})"
                        ));
                    }
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.state = AppState::Board;
                self.confirm_delete = None;
                self.set_status_message(format!("\"{title}\" was not deleted."));
            }
            _ => {}
        }
    }

    fn column_at(&self, x: u16, y: u16) -> Option<Progress> {
        self.column_areas
            .iter()
            .position(|r| hit(*r, x, y))
            .and_then(Progress::from_column)
    }

    /// Mouse drag-and-drop on the card view.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.state != AppState::Board || self.view_mode != ViewMode::Card {
            return;
        }
        let (x, y) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let card = self
                    .card_areas
                    .iter()
                    .find(|(r, _)| hit(*r, x, y))
                    .map(|(_, id)| *id);
                if let Some(card) = card {
                    self.select_card(card);
                }
                self.pending_drag = card;
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(card) = self.pending_drag.take() {
                    if self.board.drag_start(card) {
                        self.board.drag_enter(self.selected_progress());
                    }
                }
                let over = self.column_at(x, y);
                let current = self.board.highlight();
                if over != current {
                    if let Some(current) = current {
                        self.board.drag_leave(current);
                    }
                    if let Some(over) = over {
                        self.board.drag_enter(over);
                    }
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                // A press and release without motion is a plain click.
                self.pending_drag = None;
                if !matches!(self.board.drag_state(), DragState::Dragging { .. }) {
                    return;
                }
                match self.column_at(x, y) {
                    Some(target) => self.drop_on(target),
                    None => self.board.drag_end(),
                }
            }
            _ => {}
        }
    }

    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Board or list
                Constraint::Length(1), // Status bar
            ])
            .split(f.area());

        self.render_header(f, chunks[0]);
        match self.view_mode {
            ViewMode::Card => self.render_board(f, chunks[1]),
            ViewMode::List => self.render_list(f, chunks[1]),
        }
        self.render_status_bar(f, chunks[2]);

        match self.state {
            AppState::Board => {}
            AppState::TaskDetail => self.render_task_detail_popup(f),
            AppState::AddTask => self.render_task_form(f, "Create Task"),
            AppState::EditTask => self.render_task_form(f, "Edit Task"),
            AppState::Confirm => self.render_confirm(f),
            AppState::Help => self.render_help(f),
        }
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let view = match self.view_mode {
            ViewMode::Card => "Card View",
            ViewMode::List => "List View",
        };
        let header = Paragraph::new(Line::from(vec![
            Span::styled("KANBAN", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                format!("{view} | {} tasks", self.board.card_count()),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
            ),
        ]))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
        f.render_widget(header, area);
    }

    fn render_board(&mut self, f: &mut Frame, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .split(area);

        self.card_areas.clear();
        for (i, progress) in Progress::ALL.into_iter().enumerate() {
            self.column_areas[i] = columns[i];
            self.render_column(f, columns[i], progress);
        }
    }

    fn render_column(&mut self, f: &mut Frame, area: Rect, progress: Progress) {
        let is_selected = progress.column() == self.selected_column;
        let is_target = self.board.highlight() == Some(progress);
        let accent = column_color(progress);

        let border_style = if is_target {
            Style::default().fg(DRAG_PURPLE).add_modifier(Modifier::BOLD)
        } else if is_selected {
            Style::default().fg(accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let cards = self.board.column(progress).to_vec();
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("{} ({})", progress_title(progress), cards.len()))
            .border_style(border_style);
        let inner = block.inner(area);
        f.render_widget(block, area);

        let visible = (inner.height / CARD_HEIGHT).max(1) as usize;
        // Keep the selected card on screen.
        let offset = if is_selected && self.selected_card >= visible {
            self.selected_card + 1 - visible
        } else {
            0
        };

        for (slot, (index, &id)) in cards.iter().enumerate().skip(offset).enumerate() {
            let y = inner.y + slot as u16 * CARD_HEIGHT;
            if y + CARD_HEIGHT > inner.y + inner.height {
                break;
            }
            let Some(task) = self.task(id) else {
                continue;
            };
            let card_area = Rect::new(inner.x, y, inner.width, CARD_HEIGHT);
            let selected = is_selected && index == self.selected_card;
            let card = self.card_widget(task, selected, card_area.width);
            f.render_widget(card, card_area);
            self.card_areas.push((card_area, id));
        }

        if offset > 0 {
            let indicator = Paragraph::new(format!("▲ +{offset} above")).style(Style::default().fg(Color::Cyan));
            f.render_widget(indicator, Rect::new(inner.x, inner.y, inner.width, 1));
        }
    }

    fn card_widget(&self, task: &Task, selected: bool, width: u16) -> Paragraph<'static> {
        let view = task_view(task);
        let dragging = self.board.is_dragging(task.id);
        let style = if dragging {
            Style::default().bg(DRAG_PURPLE).fg(Color::White).add_modifier(Modifier::BOLD)
        } else if selected {
            Style::default().bg(column_color(task.progress_tag)).fg(Color::Black).add_modifier(Modifier::BOLD)
        } else {
            Style::default().bg(Color::DarkGray)
        };
        let text_width = width.saturating_sub(2) as usize;
        let lines = vec![
            Line::from(truncate(&format!("#{} {}", view.id, view.title), text_width)),
            Line::from(vec![
                Span::raw(format!("{} | ", view.author)),
                Span::raw(view.story_points.clone()),
            ]),
            Line::from(vec![
                Span::styled(view.priority_badge.clone(), Style::default().fg(priority_color(task.priority_tag))),
                Span::raw(" "),
                Span::raw(truncate(&view.badges_line(), text_width.saturating_sub(view.priority_badge.len() + 1))),
            ]),
        ];
        Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL))
            .style(style)
    }

    fn render_list(&mut self, f: &mut Frame, area: Rect) {
        let header = Row::new(vec!["ID", "Title", "SP", "Priority", "Status", "Dev"])
            .style(Style::default().add_modifier(Modifier::BOLD));
        let rows: Vec<Row> = self
            .tasks
            .iter()
            .map(|task| {
                let view = task_view(task);
                let status = match &view.stage {
                    Some(stage) => format!("{}:{stage}", view.progress_badge),
                    None => view.progress_badge.clone(),
                };
                Row::new(vec![
                    Cell::from(view.id.to_string()),
                    Cell::from(view.title.clone()),
                    Cell::from(task.story_point.to_string()),
                    Cell::from(view.priority_badge.clone())
                        .style(Style::default().fg(priority_color(task.priority_tag))),
                    Cell::from(status),
                    Cell::from(view.badges_line()),
                ])
            })
            .collect();
        let table = Table::new(
            rows,
            [
                Constraint::Length(5),
                Constraint::Percentage(35),
                Constraint::Length(4),
                Constraint::Length(9),
                Constraint::Length(22),
                Constraint::Min(10),
            ],
        )
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("Product Backlog"))
        .row_highlight_style(Style::default().bg(GOLD).fg(Color::Black));
        f.render_stateful_widget(table, area, &mut self.list_state);
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            "a: Add | e: Edit | x: Delete | Space: Move | Enter: Details | v: View | r: Refresh | h: Help | q: Quit"
                .to_string()
        };
        let status = Paragraph::new(text).style(Style::default().bg(column_color(self.selected_progress())).fg(Color::Black));
        f.render_widget(status, area);
    }

    fn render_task_detail_popup(&self, f: &mut Frame) {
        let Some(task) = self.selected_task_id().and_then(|id| self.task(id)) else {
            return;
        };
        let view = task_view(task);
        let area = centered_rect(70, 70, f.area());
        f.render_widget(Clear, area);

        let status = match &view.stage {
            Some(stage) => format!("{} ({stage})", view.progress_badge),
            None => view.progress_badge.clone(),
        };
        let lines = vec![
            Line::from(Span::styled(
                format!("Task #{}: {}", view.id, view.title),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(format!("Priority:     {}", view.priority_badge)),
            Line::from(format!("Status:       {status}")),
            Line::from(view.story_points.clone()),
            Line::from(format!("Development:  {}", view.badges_line())),
            Line::from(format!("Creator:      {}", view.author)),
            Line::from(format!("Created At:   {}", view.created_at)),
            Line::from(""),
            Line::from("Description:"),
            Line::from(view.description.clone()),
        ];
        let popup = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Task Details (Enter to close)")
                    .title_alignment(Alignment::Center)
                    .border_style(Style::default().fg(column_color(task.progress_tag))),
            )
            .wrap(Wrap { trim: true })
            .style(Style::default().bg(Color::Black));
        f.render_widget(popup, area);
    }

    fn render_task_form(&self, f: &mut Frame, title: &str) {
        let area = centered_rect(70, 80, f.area());
        f.render_widget(Clear, area);
        let outer = Block::default()
            .borders(Borders::ALL)
            .title(format!("{title} (Enter to submit, Esc to cancel)"))
            .style(Style::default().bg(Color::Black));
        let inner = outer.inner(area);
        f.render_widget(outer, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(4), // Description
                Constraint::Length(3), // Story point
                Constraint::Length(3), // Priority
                Constraint::Length(3), // Progress
                Constraint::Length(3), // Stage
                Constraint::Length(3), // Development tags
                Constraint::Min(0),
            ])
            .split(inner);

        let form = &self.task_form;
        let border = |field: usize| {
            if form.current_field == field {
                Style::default().fg(GOLD)
            } else {
                Style::default()
            }
        };
        let boxed = |text: String, label: &str, field: usize| {
            Paragraph::new(text)
                .wrap(Wrap { trim: false })
                .block(Block::default().borders(Borders::ALL).title(label.to_string()).border_style(border(field)))
        };

        f.render_widget(boxed(form.title.value.clone(), "Title *", TITLE_FIELD), rows[0]);
        f.render_widget(boxed(form.description.value.clone(), "Description *", DESCRIPTION_FIELD), rows[1]);
        f.render_widget(boxed(form.story_point.value.clone(), "Story Points (1-10) *", STORY_POINT_FIELD), rows[2]);

        let priority = form.selected_priority().map(format_priority).unwrap_or("choose");
        f.render_widget(boxed(format!("< {priority} >"), "Priority *", PRIORITY_FIELD), rows[3]);
        let progress = form.selected_progress().map(format_progress).unwrap_or("choose");
        f.render_widget(boxed(format!("< {progress} >"), "Progress *", PROGRESS_FIELD), rows[4]);
        if form.stage_visible() {
            let stage = format_stage(STAGES[form.stage]);
            f.render_widget(boxed(format!("< {stage} >"), "In-progress Stage", STAGE_FIELD), rows[5]);
        }

        let mut spans = Vec::new();
        for (i, label) in DEVELOPMENT_TAGS.iter().enumerate() {
            let mark = if form.tags[i] { "[x]" } else { "[ ]" };
            let mut style = Style::default();
            if form.current_field == TAGS_FIELD && form.tag_cursor == i {
                style = style.add_modifier(Modifier::REVERSED);
            }
            spans.push(Span::styled(format!("{mark} {label}"), style));
            spans.push(Span::raw("  "));
        }
        let tags = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Development Tags * (←/→ move, Space toggle)")
                .border_style(border(TAGS_FIELD)),
        );
        f.render_widget(tags, rows[6]);
    }

    fn render_confirm(&self, f: &mut Frame) {
        let title = self.confirm_delete.as_ref().map(|(_, t)| t.as_str()).unwrap_or("");
        let area = centered_rect(50, 20, f.area());
        f.render_widget(Clear, area);
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("Are you sure you want to delete \"{title}\"?"),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("Press 'y' to confirm, 'n' to cancel"),
        ];
        let paragraph = Paragraph::new(text)
            .block(Block::default().title("Confirm Delete").borders(Borders::ALL).style(Style::default().bg(DARK_RED)))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_help(&self, f: &mut Frame) {
        let area = centered_rect(60, 60, f.area());
        f.render_widget(Clear, area);
        let lines = vec![
            Line::from("←/→ ↑/↓      select column / card"),
            Line::from("Space        pick up card, then ←/→ and Space/Enter to drop"),
            Line::from("Ctrl+←/→     move card one column"),
            Line::from("Mouse drag   drag a card onto another column"),
            Line::from("Enter        task details"),
            Line::from("a / e / x    add / edit / delete task"),
            Line::from("v            toggle card and list view"),
            Line::from("r            reload tasks"),
            Line::from("q / Esc      quit"),
            Line::from(""),
            Line::from(if self.persist_moves {
                "Column moves are saved to the server."
            } else {
                "Column moves are local until persist_moves is enabled."
            }),
        ];
        let help = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Help (any key to close)"))
            .style(Style::default().bg(Color::Black));
        f.render_widget(help, area);
    }

    /// Main event loop.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if event::poll(Duration::from_millis(50))? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if self.handle_key(key) {
                            break;
                        }
                    }
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    _ => {}
                }
            }
        }
        Ok(())
    }
}
