//! The todos form schema: typed data model and validation rules.
//!
//! One set of rules runs on both sides of the HTTP boundary. The form
//! controller validates drafts field-by-field on blur via [`validate`],
//! and the server handler validates the full submission via
//! [`parse_submission`] before redirecting, so the two can never
//! disagree about what is valid.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::formdata::FormData;
use crate::path::FieldPath;
use crate::submission::{FieldErrors, Submission, SubmissionReply};

/// Maximum allowed task content length in characters.
pub const MAX_CONTENT_LENGTH: usize = 256;

/// Error message for a missing required field.
pub const MSG_REQUIRED: &str = "Required";

/// Error message for an empty task list.
pub const MSG_TASKS_EMPTY: &str = "At least one task is required";

/// Stable opaque identifier for one task entry, based on UUID v7.
///
/// The key travels with its entry across insert/remove/reorder/replace,
/// so per-entry state survives list mutations. It is rendered into a
/// hidden input and round-trips with every POST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntryKey(Uuid);

impl EntryKey {
    /// Creates a fresh, previously-unused entry key (UUID v7).
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates an `EntryKey` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID value.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Parses a key from its hidden-input string form.
    ///
    /// # Errors
    ///
    /// Returns the underlying uuid error if `input` is not a valid UUID.
    pub fn parse(input: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(input)?))
    }
}

impl Default for EntryKey {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single task row in the todos form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// What needs doing. Required, at most [`MAX_CONTENT_LENGTH`] characters.
    pub content: String,
    /// Whether the task is done. Unchecked boxes are absent from form
    /// data, so this defaults to `false`.
    #[serde(default)]
    pub completed: bool,
}

/// The complete todos form value: a title plus a non-empty task list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodosForm {
    /// List title. Required.
    pub title: String,
    /// Ordered tasks. Must contain at least one entry at submission time.
    pub tasks: Vec<TaskRecord>,
}

/// Checkbox inputs submit `on` when checked and are absent otherwise.
#[must_use]
pub fn checkbox_checked(value: &str) -> bool {
    value == "on" || value == "true"
}

/// Validates an already-typed form value.
///
/// Returns an empty map when the value is valid. Error paths mirror the
/// input names of the rendered form (`title`, `tasks`,
/// `tasks[i].content`), so a valid value round-trips unchanged through
/// [`parse_submission`].
#[must_use]
pub fn validate(form: &TodosForm) -> FieldErrors {
    let mut errors = FieldErrors::new();
    check_title(&form.title, &mut errors);
    if form.tasks.is_empty() {
        push_error(&mut errors, FieldPath::root("tasks"), MSG_TASKS_EMPTY);
    }
    for (index, task) in form.tasks.iter().enumerate() {
        check_content(index, &task.content, &mut errors);
    }
    errors
}

/// Parses raw submitted form data against the todos schema.
///
/// The task list is discovered by scanning indexed names from zero until
/// the first gap. On success the typed value is returned; on failure the
/// reply carries the submitted values plus one error list per offending
/// field path, so the form can re-render inline errors without losing
/// input.
#[must_use]
pub fn parse_submission(data: &FormData) -> Submission {
    let mut errors = FieldErrors::new();

    let title = data.first("title").unwrap_or_default().to_string();
    check_title(&title, &mut errors);

    let mut tasks = Vec::new();
    for index in 0.. {
        if !data.contains_prefix(&format!("tasks[{index}].")) {
            break;
        }
        let content = data
            .first(&format!("tasks[{index}].content"))
            .unwrap_or_default()
            .to_string();
        let completed = data
            .first(&format!("tasks[{index}].completed"))
            .is_some_and(checkbox_checked);
        check_content(index, &content, &mut errors);
        tasks.push(TaskRecord { content, completed });
    }

    if tasks.is_empty() {
        push_error(&mut errors, FieldPath::root("tasks"), MSG_TASKS_EMPTY);
    }

    if errors.is_empty() {
        Submission::Success {
            value: TodosForm { title, tasks },
        }
    } else {
        Submission::Failure {
            reply: SubmissionReply::new(data, errors),
        }
    }
}

fn check_title(title: &str, errors: &mut FieldErrors) {
    if title.trim().is_empty() {
        push_error(errors, FieldPath::root("title"), MSG_REQUIRED);
    }
}

fn check_content(index: usize, content: &str, errors: &mut FieldErrors) {
    let path = FieldPath::root("tasks").index(index).key("content");
    if content.trim().is_empty() {
        push_error(errors, path, MSG_REQUIRED);
    } else if content.chars().count() > MAX_CONTENT_LENGTH {
        push_error(
            errors,
            path,
            &format!("Content must be at most {MAX_CONTENT_LENGTH} characters"),
        );
    }
}

fn push_error(errors: &mut FieldErrors, path: FieldPath, message: &str) {
    errors.entry(path).or_default().push(message.to_string());
}
