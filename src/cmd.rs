//! Command implementations for the CLI interface.
//!
//! Every handler talks to the backend through [`TaskApi`], prints its result
//! to stdout, and on failure prints `Error: ...` to stderr and exits with
//! status 1.

use std::fmt::Display;
use std::io::{self, BufRead, Write};

use clap::Subcommand;
use clap_complete::{generate, Shell};
use tracing::debug;

use crate::client::{HttpTaskApi, TaskApi};
use crate::config::{data_dir, Config};
use crate::fields::*;
use crate::sprint::Sprint;
use crate::tags::{self, TagError, DEVELOPMENT_TAGS};
use crate::task::{Task, TaskUpdate};
use crate::tui::run::run_board;
use crate::validate::{validate_new_task, TaskDraft};
use crate::view::{print_columns, print_detail, print_table};

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive kanban board.
    Board,

    /// Create a task. All fields and at least one tag are required.
    Add {
        /// Short title for the task.
        title: String,
        /// Task description.
        #[arg(long)]
        desc: Option<String>,
        /// Story point estimate, 1 to 10.
        #[arg(long = "sp")]
        story_point: Option<String>,
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        #[arg(long, value_enum)]
        progress: Option<Progress>,
        /// Development tags. May be repeated and comma-separated.
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// List all tasks.
    List {
        /// Layout: card (grouped by column) or list (table). Defaults to config.
        #[arg(long, value_enum)]
        view: Option<ViewMode>,
    },

    /// Show one task in full.
    View {
        /// Task ID.
        id: u64,
    },

    /// Update fields on a task. Unset flags keep their current value.
    Update {
        /// Task ID.
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        #[arg(long = "sp")]
        story_point: Option<u32>,
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        #[arg(long, value_enum)]
        progress: Option<Progress>,
        /// In-progress stage. Only valid for in-progress tasks.
        #[arg(long, value_enum)]
        stage: Option<InProgressStage>,
        /// Replace development tags. May be repeated and comma-separated.
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// Move a task to another board column.
    Move {
        /// Task ID.
        id: u64,
        /// Target column.
        #[arg(value_enum)]
        to: Progress,
        /// Stage to set when moving to in-progress (default: planning).
        #[arg(long, value_enum)]
        stage: Option<InProgressStage>,
    },

    /// Delete a task after confirmation.
    Delete {
        /// Task ID.
        id: u64,
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },

    /// List development tags with their bit values, or decode a bit vector.
    Tags {
        /// Bit vector to decode, e.g. 01010.
        #[arg(long)]
        decode: Option<String>,
        /// Labels to encode. May be repeated and comma-separated.
        #[arg(long = "encode")]
        encode: Vec<String>,
    },

    /// Manage the local sprint dates.
    Sprint {
        #[command(subcommand)]
        action: SprintAction,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum SprintAction {
    /// Set the sprint start and end dates.
    Create {
        /// Start date, YYYY-MM-DD (default: today).
        #[arg(long)]
        start: Option<String>,
        /// End date, YYYY-MM-DD.
        #[arg(long)]
        end: String,
    },
    /// Show the saved sprint.
    Show,
}

/// Print `Error: ...` and exit with status 1.
fn fail(err: impl Display) -> ! {
    eprintln!("Error: {err}");
    std::process::exit(1);
}

fn or_exit<T, E: Display>(result: Result<T, E>) -> T {
    result.unwrap_or_else(|e| fail(e))
}

/// Build the HTTP client for `config`, exiting on a bad cookie or TLS setup.
pub fn connect(config: &Config) -> HttpTaskApi {
    debug!(server = config.base_url(), "connecting");
    or_exit(HttpTaskApi::new(config))
}

/// Launch the board TUI.
pub fn cmd_board(config: &Config) {
    let api = connect(config);
    if let Err(e) = run_board(api, config) {
        fail(format!("TUI failed: {e}"));
    }
}

/// Collect the CLI flags of `add` into a draft for validation.
///
/// Unknown tag labels are rejected here; an empty tag list is left for the
/// validator to report as missing input.
pub fn add_draft(
    title: String,
    desc: Option<String>,
    story_point: Option<String>,
    priority: Option<Priority>,
    progress: Option<Progress>,
    tags: &[String],
) -> Result<TaskDraft, TagError> {
    let development_tags = tags::split_labels(tags)
        .into_iter()
        .map(|label| tags::tag_value(&label).ok_or(TagError::Unknown(label)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(TaskDraft {
        title,
        description: desc.unwrap_or_default(),
        story_point: story_point.unwrap_or_default(),
        development_tags,
        priority_tag: priority,
        progress_tag: progress,
    })
}

pub fn cmd_add<A: TaskApi>(
    api: &A,
    title: String,
    desc: Option<String>,
    story_point: Option<String>,
    priority: Option<Priority>,
    progress: Option<Progress>,
    tags: Vec<String>,
) {
    let draft = or_exit(add_draft(title, desc, story_point, priority, progress, &tags));
    let new_task = or_exit(validate_new_task(&draft));
    let created = or_exit(api.create_task(&new_task));
    println!("Added task {}: {}", created.id, created.title);
}

pub fn cmd_list<A: TaskApi>(api: &A, view: ViewMode) {
    let tasks = or_exit(api.list_tasks());
    if tasks.is_empty() {
        println!("No tasks.");
        return;
    }
    match view {
        ViewMode::Card => print_columns(&tasks),
        ViewMode::List => print_table(&tasks),
    }
}

pub fn cmd_view<A: TaskApi>(api: &A, id: u64) {
    match api.get_task(id) {
        Ok(task) => print_detail(&task),
        Err(e) if e.is_not_found() => fail(format!("Task {id} not found.")),
        Err(e) => fail(e),
    }
}

/// Field overrides for `update`. `None` keeps the current value.
#[derive(Debug, Default)]
pub struct UpdateFields {
    pub title: Option<String>,
    pub desc: Option<String>,
    pub story_point: Option<u32>,
    pub priority: Option<Priority>,
    pub progress: Option<Progress>,
    pub stage: Option<InProgressStage>,
    pub tags: Vec<String>,
}

/// Merge overrides into the full update body for `task`.
///
/// Edits are not validated, but a stage on a task that does not end up in
/// progress is refused since the backend would store a stray stage.
pub fn merge_update(task: &Task, fields: UpdateFields) -> Result<TaskUpdate, String> {
    let mut update = TaskUpdate::from_task(task);
    if let Some(progress) = fields.progress {
        update = update.with_progress(progress);
    }
    if let Some(stage) = fields.stage {
        if update.progress_tag != Progress::InProgress {
            return Err("--stage only applies to in-progress tasks".to_string());
        }
        update.in_progress_stage = Some(stage);
    }
    if let Some(title) = fields.title {
        update.title = title;
    }
    if let Some(desc) = fields.desc {
        update.description = desc;
    }
    if fields.story_point.is_some() {
        update.story_point = fields.story_point;
    }
    if let Some(priority) = fields.priority {
        update.priority_tag = priority;
    }
    if !fields.tags.is_empty() {
        let labels = tags::split_labels(&fields.tags);
        update.development_bit_vector = tags::encode_labels(&labels).map_err(|e| e.to_string())?;
    }
    Ok(update)
}

pub fn cmd_update<A: TaskApi>(api: &A, id: u64, fields: UpdateFields) {
    let task = fetch(api, id);
    let update = or_exit(merge_update(&task, fields));
    or_exit(api.update_task(id, &update));
    println!("Task updated successfully!");
}

/// Move a task to `to`. Always persisted, unlike board drops.
pub fn cmd_move<A: TaskApi>(api: &A, id: u64, to: Progress, stage: Option<InProgressStage>) {
    let task = fetch(api, id);
    let fields = UpdateFields {
        progress: Some(to),
        stage,
        ..UpdateFields::default()
    };
    let update = or_exit(merge_update(&task, fields));
    or_exit(api.update_task(id, &update));
    println!("Moved #{id} to {}", progress_title(to));
}

fn fetch<A: TaskApi>(api: &A, id: u64) -> Task {
    match api.get_task(id) {
        Ok(task) => task,
        Err(e) if e.is_not_found() => fail(format!("Task {id} not found.")),
        Err(e) => fail(e),
    }
}

/// Read a yes/no answer. Anything but `y`/`yes` is a no.
fn confirm<R: BufRead>(mut input: R, prompt: &str) -> bool {
    print!("{prompt} [y/N] ");
    let _ = io::stdout().flush();
    let mut line = String::new();
    if input.read_line(&mut line).is_err() {
        return false;
    }
    matches!(line.trim().to_lowercase().as_str(), "y" | "yes")
}

pub fn cmd_delete<A: TaskApi>(api: &A, id: u64, yes: bool) {
    let task = fetch(api, id);
    let prompt = format!("Are you sure you want to delete \"{}\"?", task.title);
    if !yes && !confirm(io::stdin().lock(), &prompt) {
        println!("\"{}\" was not deleted.", task.title);
        return;
    }
    if let Err(e) = api.delete_task(id) {
        fail(format!("Failed to delete \"{}\". Please try again. ({e})", task.title));
    }
    println!("\"{}\" has been deleted.", task.title);
}

pub fn cmd_tags(decode: Option<String>, encode: Vec<String>) {
    if let Some(bits) = decode {
        let labels: Vec<&str> = tags::decode(&bits).collect();
        if labels.is_empty() {
            println!("(no tags)");
        } else {
            println!("{}", labels.join(", "));
        }
        return;
    }
    if !encode.is_empty() {
        let labels = tags::split_labels(&encode);
        println!("{}", or_exit(tags::encode_labels(&labels)));
        return;
    }
    println!("{:<10} {:>5}  {}", "Tag", "Value", "Bit");
    for (i, label) in DEVELOPMENT_TAGS.iter().enumerate() {
        let value = 1u32 << i;
        println!("{:<10} {:>5}  {}", label, value, tags::encode([value]));
    }
}

pub fn cmd_sprint(action: SprintAction) {
    let path = data_dir().join("sprint.json");
    match action {
        SprintAction::Create { start, end } => {
            let sprint = or_exit(Sprint::from_input(start.as_deref(), &end));
            or_exit(sprint.save(&path));
            println!(
                "Sprint set: {} to {} ({} days)",
                sprint.start,
                sprint.end,
                sprint.days()
            );
        }
        SprintAction::Show => match or_exit(Sprint::load(&path)) {
            Some(sprint) => println!(
                "Sprint: {} to {} ({} days)",
                sprint.start,
                sprint.end,
                sprint.days()
            ),
            None => println!("No sprint set. Use `kb sprint create --end YYYY-MM-DD`."),
        },
    }
}

/// Generate shell completions for the CLI.
pub fn cmd_completions(shell: Shell) {
    use crate::cli::Cli;
    use clap::CommandFactory;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}
