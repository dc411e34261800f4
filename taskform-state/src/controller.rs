//! Live form state between submissions.
//!
//! [`FormState`] keeps the draft of the todos form as an explicit
//! ordered mapping: entry values live in a map keyed by stable
//! [`EntryKey`]s, and list order is a separate sequence of keys. The
//! four list actions mutate the sequence or the map, never both at once,
//! so unrelated entries keep their identity, values, and error state
//! across any mutation.

use std::collections::HashMap;

use taskform_schema::formdata::FormData;
use taskform_schema::intent::Intent;
use taskform_schema::path::{FieldPath, Segment};
use taskform_schema::schema::{self, EntryKey, TaskRecord, TodosForm};
use taskform_schema::submission::{FieldErrors, SubmissionReply};

/// Name of the list field in the todos form.
pub const TASKS_FIELD: &str = "tasks";

/// Errors from applying a control action to the form state.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ActionError {
    /// The action referenced a list position that does not exist.
    #[error("index {index} out of range for list of length {len}")]
    IndexOutOfRange {
        /// The offending position.
        index: usize,
        /// Current list length.
        len: usize,
    },
    /// The action referenced an entry key that is not in the list.
    #[error("unknown entry key {0}")]
    UnknownKey(EntryKey),
    /// The action named a field that is not a list field of this form.
    #[error("unknown list field {0:?}")]
    UnknownField(String),
}

/// Validity and error state for one rendered field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMeta {
    /// Whether the field has been blurred at least once.
    pub touched: bool,
    /// Current validation errors for the field.
    pub errors: Vec<String>,
}

impl FieldMeta {
    /// A field is valid while it has no recorded errors.
    #[must_use]
    pub fn valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// One task entry: its draft value plus per-field metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryState {
    /// Current draft value of the entry.
    pub draft: TaskRecord,
    /// Metadata for the entry's `content` field.
    pub content_meta: FieldMeta,
    /// Metadata for the entry's `completed` field.
    pub completed_meta: FieldMeta,
}

/// Live state of the todos form.
///
/// Created on page load (empty or hydrated from a prior failed
/// submission), mutated through the list actions and direct field
/// edits, validated on blur and on submit, and discarded once a
/// successful submission redirects away.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub(crate) title: String,
    pub(crate) title_meta: FieldMeta,
    pub(crate) tasks_meta: FieldMeta,
    pub(crate) order: Vec<EntryKey>,
    pub(crate) slots: HashMap<EntryKey, EntryState>,
}

impl FormState {
    /// Creates an empty form: blank title, no tasks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hydrates form state from a prior validation result, if present.
    ///
    /// After a failed submit the reply carries the submitted values and
    /// errors; both are restored so the user sees exactly what they
    /// entered plus the inline messages. Without a reply the form starts
    /// empty.
    #[must_use]
    pub fn initialize(last_result: Option<&SubmissionReply>) -> Self {
        last_result.map_or_else(Self::new, |reply| {
            let mut state = Self::from_form_data(&reply.form_data());
            state.apply_errors(&reply.errors);
            state
        })
    }

    /// Reconstitutes form state from posted form data.
    ///
    /// Entries keep the identity keys they posted in their hidden
    /// inputs; an entry with a missing, invalid, or duplicated key is
    /// assigned a fresh one.
    #[must_use]
    pub fn from_form_data(data: &FormData) -> Self {
        let mut state = Self::new();
        state.title = data.first("title").unwrap_or_default().to_string();
        for index in 0.. {
            if !data.contains_prefix(&format!("{TASKS_FIELD}[{index}].")) {
                break;
            }
            let key = data
                .first(&format!("{TASKS_FIELD}[{index}].key"))
                .and_then(|raw| EntryKey::parse(raw).ok())
                .unwrap_or_default();
            let draft = TaskRecord {
                content: data
                    .first(&format!("{TASKS_FIELD}[{index}].content"))
                    .unwrap_or_default()
                    .to_string(),
                completed: data
                    .first(&format!("{TASKS_FIELD}[{index}].completed"))
                    .is_some_and(schema::checkbox_checked),
            };
            state.push_entry(key, draft);
        }
        state
    }

    /// Serializes the current draft back to flat form data.
    ///
    /// Inverse of [`FormState::from_form_data`]: identity keys go into
    /// hidden-input names, and `completed` follows checkbox semantics
    /// (present as `on` when true, absent when false).
    #[must_use]
    pub fn to_form_data(&self) -> FormData {
        let mut data = FormData::new();
        data.append("title", self.title.clone());
        for (index, (key, entry)) in self.entries().enumerate() {
            data.append(format!("{TASKS_FIELD}[{index}].key"), key.to_string());
            data.append(
                format!("{TASKS_FIELD}[{index}].content"),
                entry.draft.content.clone(),
            );
            if entry.draft.completed {
                data.append(format!("{TASKS_FIELD}[{index}].completed"), "on");
            }
        }
        data
    }

    /// Current title draft.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Overwrites the title draft.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Number of task entries currently in the list.
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.order.len()
    }

    /// The identity key at a list position, if in range.
    #[must_use]
    pub fn key_at(&self, index: usize) -> Option<EntryKey> {
        self.order.get(index).copied()
    }

    /// Iterates entries in list order with their identity keys.
    pub fn entries(&self) -> impl Iterator<Item = (EntryKey, &EntryState)> {
        self.order
            .iter()
            .filter_map(|key| self.slots.get(key).map(|entry| (*key, entry)))
    }

    /// The entry stored under `key`, if any.
    #[must_use]
    pub fn entry(&self, key: EntryKey) -> Option<&EntryState> {
        self.slots.get(&key)
    }

    /// Appends a new, empty task entry and returns its fresh key.
    pub fn insert_task(&mut self) -> EntryKey {
        self.push_entry(EntryKey::new(), TaskRecord::default())
    }

    /// Removes the entry at `index`.
    ///
    /// Remaining entries keep their relative order and identity keys.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::IndexOutOfRange`] if `index` is past the
    /// end of the list; the state is left unchanged.
    pub fn remove_task(&mut self, index: usize) -> Result<(), ActionError> {
        if index >= self.order.len() {
            return Err(ActionError::IndexOutOfRange {
                index,
                len: self.order.len(),
            });
        }
        let key = self.order.remove(index);
        self.slots.remove(&key);
        Ok(())
    }

    /// Moves the entry at `from` to position `to`.
    ///
    /// Intervening entries shift by one position; no identity key
    /// changes.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::IndexOutOfRange`] if either position is
    /// past the end of the list; the state is left unchanged.
    pub fn reorder_task(&mut self, from: usize, to: usize) -> Result<(), ActionError> {
        let len = self.order.len();
        for position in [from, to] {
            if position >= len {
                return Err(ActionError::IndexOutOfRange {
                    index: position,
                    len,
                });
            }
        }
        let key = self.order.remove(from);
        self.order.insert(to, key);
        Ok(())
    }

    /// Overwrites the entry stored under `key` in place.
    ///
    /// The identity key is unchanged. The entry's field metadata resets:
    /// the replacement value has not been validated yet.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::UnknownKey`] if no entry holds `key`.
    pub fn replace_task(&mut self, key: EntryKey, value: TaskRecord) -> Result<(), ActionError> {
        let entry = self
            .slots
            .get_mut(&key)
            .ok_or(ActionError::UnknownKey(key))?;
        *entry = EntryState {
            draft: value,
            ..EntryState::default()
        };
        Ok(())
    }

    /// Overwrites the content draft of the entry under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::UnknownKey`] if no entry holds `key`.
    pub fn set_content(&mut self, key: EntryKey, content: impl Into<String>) -> Result<(), ActionError> {
        let entry = self
            .slots
            .get_mut(&key)
            .ok_or(ActionError::UnknownKey(key))?;
        entry.draft.content = content.into();
        Ok(())
    }

    /// Overwrites the completed draft of the entry under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::UnknownKey`] if no entry holds `key`.
    pub fn set_completed(&mut self, key: EntryKey, completed: bool) -> Result<(), ActionError> {
        let entry = self
            .slots
            .get_mut(&key)
            .ok_or(ActionError::UnknownKey(key))?;
        entry.draft.completed = completed;
        Ok(())
    }

    /// Applies a posted control intent to the form state.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::UnknownField`] for a list name this form
    /// does not have, or [`ActionError::IndexOutOfRange`] for a stale
    /// position; the state is never partially mutated.
    pub fn apply_intent(&mut self, intent: &Intent) -> Result<(), ActionError> {
        match intent {
            Intent::Insert { name } => {
                expect_tasks_field(name)?;
                self.insert_task();
                Ok(())
            }
            Intent::Remove { name, index } => {
                expect_tasks_field(name)?;
                self.remove_task(*index)
            }
            Intent::Reorder { name, from, to } => {
                expect_tasks_field(name)?;
                self.reorder_task(*from, *to)
            }
            Intent::Replace { name, index, value } => {
                expect_tasks_field(name)?;
                let key = self
                    .key_at(*index)
                    .ok_or(ActionError::IndexOutOfRange {
                        index: *index,
                        len: self.order.len(),
                    })?;
                self.replace_task(key, value.clone())
            }
        }
    }

    /// Validates the whole draft and distributes errors to field metadata.
    pub fn validate_all(&mut self) {
        let errors = schema::validate(&self.to_todos());
        self.apply_errors(&errors);
    }

    /// Re-validates the scope of one field after it loses focus.
    ///
    /// Marks the field touched and replaces its error list; metadata of
    /// every other field is left alone. A path that does not address a
    /// field of this form is ignored.
    pub fn handle_blur(&mut self, path: &FieldPath) {
        let errors = schema::validate(&self.to_todos());
        let messages = errors.get(path).cloned().unwrap_or_default();
        if let Some(meta) = self.meta_mut(path) {
            meta.touched = true;
            meta.errors = messages;
        } else {
            tracing::debug!(path = %path, "blur on unknown field ignored");
        }
    }

    /// Replaces all recorded field errors with the given error map.
    ///
    /// Paths that do not address a field of this form are ignored.
    pub fn apply_errors(&mut self, errors: &FieldErrors) {
        self.clear_errors();
        for (path, messages) in errors {
            if let Some(meta) = self.meta_mut(path) {
                meta.errors = messages.clone();
            } else {
                tracing::debug!(path = %path, "error for unknown field dropped");
            }
        }
    }

    /// Records a list-level error on the tasks field.
    ///
    /// Used for constraints the schema does not know about, such as the
    /// server's task-count cap.
    pub fn push_tasks_error(&mut self, message: impl Into<String>) {
        self.tasks_meta.errors.push(message.into());
    }

    /// The current draft as a typed form value.
    #[must_use]
    pub fn to_todos(&self) -> TodosForm {
        TodosForm {
            title: self.title.clone(),
            tasks: self.entries().map(|(_, entry)| entry.draft.clone()).collect(),
        }
    }

    fn clear_errors(&mut self) {
        self.title_meta.errors.clear();
        self.tasks_meta.errors.clear();
        for entry in self.slots.values_mut() {
            entry.content_meta.errors.clear();
            entry.completed_meta.errors.clear();
        }
    }

    fn meta_mut(&mut self, path: &FieldPath) -> Option<&mut FieldMeta> {
        match path.segments() {
            [Segment::Key(name)] if name == "title" => Some(&mut self.title_meta),
            [Segment::Key(name)] if name == TASKS_FIELD => Some(&mut self.tasks_meta),
            [Segment::Key(name), Segment::Index(index), Segment::Key(field)]
                if name == TASKS_FIELD =>
            {
                let key = self.order.get(*index)?;
                let entry = self.slots.get_mut(key)?;
                match field.as_str() {
                    "content" => Some(&mut entry.content_meta),
                    "completed" => Some(&mut entry.completed_meta),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// Keys already in use never repeat: a duplicate posted key gets a
    /// fresh replacement instead of corrupting the map.
    fn push_entry(&mut self, key: EntryKey, draft: TaskRecord) -> EntryKey {
        let key = if self.slots.contains_key(&key) {
            EntryKey::new()
        } else {
            key
        };
        self.order.push(key);
        self.slots.insert(
            key,
            EntryState {
                draft,
                ..EntryState::default()
            },
        );
        key
    }
}

fn expect_tasks_field(name: &str) -> Result<(), ActionError> {
    if name == TASKS_FIELD {
        Ok(())
    } else {
        Err(ActionError::UnknownField(name.to_string()))
    }
}
