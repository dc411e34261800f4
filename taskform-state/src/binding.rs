//! Typed field bindings: the explicit mapping from form state to
//! rendered inputs.
//!
//! Each accessor returns everything a view needs for one input: its
//! `name` attribute, the current value, the error messages, and the
//! validity flag. Views render from bindings only and never reach into
//! raw state, so the state-to-markup mapping stays in one place.

use crate::controller::{FormState, TASKS_FIELD};

/// Render-ready state for one text input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBinding<'a> {
    /// Input `name` attribute (also usable as the `id`).
    pub name: String,
    /// Current draft value.
    pub value: &'a str,
    /// Current validation errors.
    pub errors: &'a [String],
}

impl TextBinding<'_> {
    /// A field is valid while it has no errors.
    #[must_use]
    pub const fn valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Render-ready state for one checkbox input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckboxBinding<'a> {
    /// Input `name` attribute.
    pub name: String,
    /// Whether the box renders checked.
    pub checked: bool,
    /// Current validation errors.
    pub errors: &'a [String],
}

impl CheckboxBinding<'_> {
    /// A field is valid while it has no errors.
    #[must_use]
    pub const fn valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Render-ready state for the list field itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListBinding<'a> {
    /// List field name.
    pub name: String,
    /// List-level validation errors (e.g. empty list).
    pub errors: &'a [String],
}

impl FormState {
    /// Binding for the title input.
    #[must_use]
    pub fn title_binding(&self) -> TextBinding<'_> {
        TextBinding {
            name: "title".to_string(),
            value: &self.title,
            errors: &self.title_meta.errors,
        }
    }

    /// Binding for the task list as a whole.
    #[must_use]
    pub fn tasks_binding(&self) -> ListBinding<'_> {
        ListBinding {
            name: TASKS_FIELD.to_string(),
            errors: &self.tasks_meta.errors,
        }
    }

    /// Binding for the content input of the entry at `index`.
    #[must_use]
    pub fn content_binding(&self, index: usize) -> Option<TextBinding<'_>> {
        let entry = self.slots.get(self.order.get(index)?)?;
        Some(TextBinding {
            name: format!("{TASKS_FIELD}[{index}].content"),
            value: &entry.draft.content,
            errors: &entry.content_meta.errors,
        })
    }

    /// Binding for the completed checkbox of the entry at `index`.
    #[must_use]
    pub fn completed_binding(&self, index: usize) -> Option<CheckboxBinding<'_>> {
        let entry = self.slots.get(self.order.get(index)?)?;
        Some(CheckboxBinding {
            name: format!("{TASKS_FIELD}[{index}].completed"),
            checked: entry.draft.completed,
            errors: &entry.completed_meta.errors,
        })
    }

    /// Hidden-input name carrying the identity key of the entry at `index`.
    #[must_use]
    pub fn key_field_name(index: usize) -> String {
        format!("{TASKS_FIELD}[{index}].key")
    }
}
