//! Control-action intents: structure-mutating form submissions.
//!
//! Every list mutation (insert/remove/reorder/replace) is posted as a
//! regular form submission carrying a JSON-encoded intent in the hidden
//! `__intent` value of the pressed button. The handler applies the
//! intent to the reconstituted form state and re-renders, without
//! completing the overall submission.

use serde::{Deserialize, Serialize};

use crate::schema::TaskRecord;

/// Form field name carrying the encoded intent of a control button.
pub const INTENT_FIELD: &str = "__intent";

/// Errors from encoding or decoding a control intent.
#[derive(Debug, thiserror::Error)]
pub enum IntentError {
    /// The intent could not be serialized.
    #[error("intent encode error: {0}")]
    Encode(serde_json::Error),
    /// The submitted `__intent` value is not a valid intent.
    #[error("intent decode error: {0}")]
    Decode(serde_json::Error),
}

/// A named, intent-bearing form submission that mutates list structure.
///
/// Intents address list entries by field name and position, matching the
/// indexed input names the form renders. The controller resolves
/// positions to stable entry keys before mutating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Intent {
    /// Append a new, empty entry to the named list field.
    Insert {
        /// List field name, e.g. `tasks`.
        name: String,
    },
    /// Remove the entry at `index` from the named list field.
    Remove {
        /// List field name.
        name: String,
        /// Position of the entry to remove.
        index: usize,
    },
    /// Move the entry at `from` to position `to`; intervening entries
    /// shift by one.
    Reorder {
        /// List field name.
        name: String,
        /// Current position of the entry.
        from: usize,
        /// Destination position.
        to: usize,
    },
    /// Overwrite the entry at `index` in place, keeping its identity key.
    Replace {
        /// List field name.
        name: String,
        /// Position of the entry to overwrite.
        index: usize,
        /// The replacement value.
        value: TaskRecord,
    },
}

impl Intent {
    /// Insert intent for the named list field.
    #[must_use]
    pub fn insert(name: impl Into<String>) -> Self {
        Self::Insert { name: name.into() }
    }

    /// Remove intent for the entry at `index`.
    #[must_use]
    pub fn remove(name: impl Into<String>, index: usize) -> Self {
        Self::Remove {
            name: name.into(),
            index,
        }
    }

    /// Reorder intent moving `from` to `to`.
    #[must_use]
    pub fn reorder(name: impl Into<String>, from: usize, to: usize) -> Self {
        Self::Reorder {
            name: name.into(),
            from,
            to,
        }
    }

    /// Replace intent overwriting the entry at `index` with `value`.
    #[must_use]
    pub fn replace(name: impl Into<String>, index: usize, value: TaskRecord) -> Self {
        Self::Replace {
            name: name.into(),
            index,
            value,
        }
    }
}

/// Encodes an [`Intent`] as the JSON value of a control button.
///
/// # Errors
///
/// Returns [`IntentError::Encode`] if serialization fails.
pub fn encode(intent: &Intent) -> Result<String, IntentError> {
    serde_json::to_string(intent).map_err(IntentError::Encode)
}

/// Decodes an [`Intent`] from a submitted `__intent` value.
///
/// # Errors
///
/// Returns [`IntentError::Decode`] if the value is not a valid intent.
pub fn decode(input: &str) -> Result<Intent, IntentError> {
    serde_json::from_str(input).map_err(IntentError::Decode)
}
