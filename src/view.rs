//! Task view models.
//!
//! A `TaskView` is everything a list row, card or detail popup shows for a
//! task, already formatted. Both the CLI printer and the TUI render from it.

use crate::fields::*;
use crate::tags;
use crate::task::Task;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskView {
    pub id: u64,
    pub title: String,
    pub author: String,
    pub story_points: String,
    pub priority_badge: String,
    pub progress_badge: String,
    pub stage: Option<String>,
    pub development_badges: Vec<String>,
    pub description: String,
    pub created_at: String,
    pub column: usize,
}

impl TaskView {
    /// Development badges joined for single-line display.
    pub fn badges_line(&self) -> String {
        if self.development_badges.is_empty() {
            "-".to_string()
        } else {
            self.development_badges.join(" ")
        }
    }
}

/// Map a task to its view model.
pub fn task_view(task: &Task) -> TaskView {
    let stage = match task.progress_tag {
        Progress::InProgress => task.in_progress_stage.map(|s| format_stage(s).to_string()),
        _ => None,
    };
    TaskView {
        id: task.id,
        title: task.title.clone(),
        author: task.user.clone().unwrap_or_else(|| "-".to_string()),
        story_points: format!("Story Points: {}", task.story_point),
        priority_badge: format!("#{}", format_priority(task.priority_tag)),
        progress_badge: format!("#{}", format_progress(task.progress_tag)),
        stage,
        development_badges: tags::decode(&task.development_bit_vector)
            .map(|t| format!("#{t}"))
            .collect(),
        description: task.description.clone(),
        created_at: task.created_at.clone(),
        column: task.progress_tag.column(),
    }
}

/// Print tasks as a table (list view).
pub fn print_table(tasks: &[Task]) {
    println!(
        "{:<5} {:<28} {:<4} {:<9} {:<14} {}",
        "ID", "Title", "SP", "Priority", "Status", "Dev"
    );
    for view in tasks.iter().map(task_view) {
        let status = match &view.stage {
            Some(stage) => format!("{}:{}", view.progress_badge, stage),
            None => view.progress_badge.clone(),
        };
        println!(
            "{:<5} {:<28} {:<4} {:<9} {:<14} {}",
            view.id,
            truncate(&view.title, 28),
            view.story_points.trim_start_matches("Story Points: "),
            view.priority_badge,
            status,
            view.badges_line()
        );
    }
}

/// Print tasks grouped by column (card view).
pub fn print_columns(tasks: &[Task]) {
    let views: Vec<TaskView> = tasks.iter().map(task_view).collect();
    for progress in Progress::ALL {
        let column: Vec<&TaskView> = views.iter().filter(|v| v.column == progress.column()).collect();
        println!("== {} ({}) ==", progress_title(progress), column.len());
        for view in column {
            println!("  #{} {}  [{}]", view.id, view.title, view.author);
            println!(
                "     {} | {} | {}",
                view.story_points,
                view.priority_badge,
                view.badges_line()
            );
        }
        println!();
    }
}

/// Print the detail ("read more") view of a task.
pub fn print_detail(task: &Task) {
    let view = task_view(task);
    println!("Task #{}: {}", view.id, view.title);
    println!("Description:  {}", view.description);
    println!("{}", view.story_points);
    println!("Priority:     {}", view.priority_badge);
    match &view.stage {
        Some(stage) => println!("Status:       {} ({})", view.progress_badge, stage),
        None => println!("Status:       {}", view.progress_badge),
    }
    println!("Development:  {}", view.badges_line());
    println!("Creator:      {}", view.author);
    println!("Created At:   {}", view.created_at);
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(progress: Progress, stage: Option<InProgressStage>) -> Task {
        Task {
            id: 12,
            title: "Checkout flow".to_string(),
            description: "Cart to payment".to_string(),
            story_point: 5,
            priority_tag: Priority::High,
            progress_tag: progress,
            in_progress_stage: stage,
            development_bit_vector: "10101".to_string(),
            user: Some("alex".to_string()),
            created_at: "Tuesday 05 November, 02:30 PM".to_string(),
        }
    }

    #[test]
    fn view_formats_badges_and_column() {
        let view = task_view(&task(Progress::Completed, None));
        assert_eq!(view.priority_badge, "#high");
        assert_eq!(view.progress_badge, "#completed");
        assert_eq!(view.story_points, "Story Points: 5");
        assert_eq!(view.development_badges, vec!["#front-end", "#ui-ux", "#testing"]);
        assert_eq!(view.column, 2);
        assert_eq!(view.author, "alex");
    }

    #[test]
    fn stage_only_shows_when_in_progress() {
        let view = task_view(&task(Progress::InProgress, Some(InProgressStage::Testing)));
        assert_eq!(view.stage.as_deref(), Some("testing"));
        let view = task_view(&task(Progress::NotStarted, Some(InProgressStage::Testing)));
        assert_eq!(view.stage, None);
    }

    #[test]
    fn missing_author_and_tags_render_placeholders() {
        let mut t = task(Progress::NotStarted, None);
        t.user = None;
        t.development_bit_vector = "00000".to_string();
        let view = task_view(&t);
        assert_eq!(view.author, "-");
        assert_eq!(view.badges_line(), "-");
    }

    #[test]
    fn truncate_adds_ellipsis() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a long title", 6), "a lon…");
    }
}
