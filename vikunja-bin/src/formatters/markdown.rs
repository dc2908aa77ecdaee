//! Markdown rendering of projects and tasks, with links into the web
//! interface of the instance.

use std::fmt::Write;

use vikunja_lib::API_PATH;
use vikunja_lib::resource::{Label, Project, Task};

/// Characters with a meaning in inline markdown
const SPECIAL_CHARACTERS: [char; 9] = ['*', '_', '`', '[', ']', '(', ')', '#', '>'];

/// The service reports "no due date" as the zero timestamp
const ZERO_DATE_PREFIX: &str = "0001-01-01";

/// Backslash-escape markdown syntax in user supplied text
pub(crate) fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if SPECIAL_CHARACTERS.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn heading(text: &str, level: usize) -> String {
    format!("{} {text}", "#".repeat(level))
}

fn link(text: &str, url: &str) -> String {
    format!("[{text}]({url})")
}

const fn checkbox(done: bool) -> &'static str {
    if done { "[x]" } else { "[ ]" }
}

/// A label as a hashtag, e.g. `Needs Review!` becomes `#needs-review`.
///
/// Leading `#`s are dropped, whitespace runs turn into a single `-` and
/// everything but ASCII letters, digits and `-` is removed.
pub(crate) fn hashtag(label: &Label) -> String {
    let mut tag = String::from("#");
    let mut in_whitespace = false;
    for c in label.title.trim().trim_start_matches('#').chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                tag.push('-');
                in_whitespace = true;
            }
        } else if c.is_ascii_alphanumeric() || c == '-' {
            tag.push(c.to_ascii_lowercase());
            in_whitespace = false;
        }
    }
    tag
}

fn hashtags(task: &Task) -> Option<String> {
    let labels = task.labels.as_deref().filter(|labels| !labels.is_empty())?;
    Some(labels.iter().map(hashtag).collect::<Vec<_>>().join(" "))
}

fn due_date(task: &Task) -> Option<&str> {
    task.due_date
        .as_deref()
        .filter(|date| !date.is_empty() && !date.starts_with(ZERO_DATE_PREFIX))
}

/// Renders resources of one Vikunja instance
#[derive(Debug)]
pub(crate) struct Markdown {
    web_url: String,
}

impl Markdown {
    /// Links point below `api_url` with the API path removed
    pub(crate) fn new(api_url: &str) -> Self {
        Self {
            web_url: api_url.strip_suffix(API_PATH).unwrap_or(api_url).to_string(),
        }
    }

    fn url(&self, resource: &str, id: u64) -> String {
        format!("{}/{resource}/{id}", self.web_url)
    }

    /// `- (ARCHIVED) [Title](url)`
    pub(crate) fn project_item(&self, project: &Project) -> String {
        let archived = if project.is_archived { "(ARCHIVED) " } else { "" };
        let title = link(&escape(&project.title), &self.url("projects", project.id));
        format!("- {archived}{title}")
    }

    pub(crate) fn project_list(&self, projects: &[Project]) -> String {
        projects
            .iter()
            .map(|project| self.project_item(project))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// A project with its description and the given tasks
    pub(crate) fn project(&self, project: &Project, tasks: &[Task]) -> String {
        let mut parts = vec![heading(&escape(&project.title), 1)];

        if project.is_archived {
            parts.push("(ARCHIVED)".to_string());
        }
        if project.parent_project_id != 0 {
            parts.push(link(
                "Parent Project",
                &self.url("projects", project.parent_project_id),
            ));
        }

        let description = project.description.trim();
        if !description.is_empty() {
            parts.push(String::new());
            parts.push(description.to_string());
        }

        if !tasks.is_empty() {
            parts.push(String::new());
            parts.push(heading("Tasks", 2));
            parts.push(self.task_list(tasks));
        }

        parts.join("\n")
    }

    /// `- [x] [Title](url) #label`
    pub(crate) fn task_item(&self, task: &Task) -> String {
        let mut item = format!(
            "- {} {}",
            checkbox(task.done),
            link(&escape(&task.title), &self.url("tasks", task.id))
        );
        if let Some(tags) = hashtags(task) {
            let _ = write!(item, " {tags}");
        }
        item
    }

    pub(crate) fn task_list(&self, tasks: &[Task]) -> String {
        tasks
            .iter()
            .map(|task| self.task_item(task))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// A task with its state, description, progress, labels and assignees
    #[allow(clippy::unused_self)]
    pub(crate) fn task(&self, task: &Task) -> String {
        let due = due_date(task).map_or_else(|| "No due date".to_string(), |d| format!("Due: {d}"));
        let mut parts = vec![
            heading(&escape(&task.title), 1),
            format!("- {} {due}", checkbox(task.done)),
        ];

        let description = task.description.trim();
        if !description.is_empty() {
            parts.push(String::new());
            parts.push(description.to_string());
        }

        if task.percent_done > 0.0 {
            parts.push(String::new());
            parts.push(format!("Progress: {}%", task.percent_done));
        }

        if let Some(tags) = hashtags(task) {
            parts.push(String::new());
            parts.push(tags);
        }

        if let Some(assignees) = task.assignees.as_deref().filter(|a| !a.is_empty()) {
            let names: Vec<_> = assignees
                .iter()
                .map(|user| format!("@{}", user.username))
                .collect();
            parts.push(String::new());
            parts.push(format!("Assigned to: {}", names.join(", ")));
        }

        parts.join("\n")
    }
}
