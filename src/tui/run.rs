//! Board TUI entry point and terminal setup.

use std::io;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::CrosstermBackend, Terminal};

use crate::client::TaskApi;
use crate::config::Config;
use crate::tui::app::BoardApp;

/// Initialise the terminal, run the board until the user quits, and restore
/// the terminal even when the loop fails.
pub fn run_board<A: TaskApi>(api: A, config: &Config) -> io::Result<()> {
    // Load before touching the terminal so a slow backend shows nothing odd.
    let mut app = BoardApp::new(api, config);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result
}
