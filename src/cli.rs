use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Terminal client for a kanban task tracker.
/// Talks to the task backend at --server, KANBAN_SERVER, or the config file.
#[derive(Parser)]
#[command(name = "kb", version, about = "Kanban board client")]
pub struct Cli {
    /// Backend base URL, e.g. http://127.0.0.1:5000.
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Path to the TOML config file (default: ~/.kanban/config.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::SprintAction;
    use crate::fields::{Priority, Progress};
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_add_with_repeated_tags() {
        let cli = Cli::try_parse_from([
            "kb", "add", "Login", "--desc", "OAuth flow", "--sp", "5", "--priority", "high",
            "--progress", "not-started", "--tag", "api,back-end", "--tag", "testing",
        ])
        .unwrap();
        let Commands::Add { title, story_point, priority, progress, tags, .. } = cli.command else {
            panic!("expected add");
        };
        assert_eq!(title, "Login");
        assert_eq!(story_point.as_deref(), Some("5"));
        assert_eq!(priority, Some(Priority::High));
        assert_eq!(progress, Some(Progress::NotStarted));
        assert_eq!(tags, vec!["api,back-end", "testing"]);
    }

    #[test]
    fn global_server_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["kb", "list", "--server", "http://tasks:8080"]).unwrap();
        assert_eq!(cli.server.as_deref(), Some("http://tasks:8080"));
    }

    #[test]
    fn parses_sprint_create() {
        let cli = Cli::try_parse_from(["kb", "sprint", "create", "--end", "2024-11-15"]).unwrap();
        let Commands::Sprint { action: SprintAction::Create { start, end } } = cli.command else {
            panic!("expected sprint create");
        };
        assert_eq!(start, None);
        assert_eq!(end, "2024-11-15");
    }
}
