//! Submission results flowing back from schema validation.
//!
//! A submission either succeeds with the typed form value or fails with
//! a [`SubmissionReply`]: the submitted raw values plus per-path error
//! lists. The reply is JSON-serializable so form state can hydrate from
//! the last failed submit.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::formdata::FormData;
use crate::path::FieldPath;
use crate::schema::TodosForm;

/// Validation errors keyed by field path, one message list per field.
pub type FieldErrors = BTreeMap<FieldPath, Vec<String>>;

/// Outcome of validating submitted form data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// The data validated; carries the typed value.
    Success {
        /// The validated form value.
        value: TodosForm,
    },
    /// Validation failed; carries the reply for re-rendering.
    Failure {
        /// Submitted values and per-field errors.
        reply: SubmissionReply,
    },
}

impl Submission {
    /// Returns true for a successful submission.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Structured feedback for a failed submission.
///
/// Carries everything the form needs to re-render: the values exactly
/// as submitted, so entered input is never lost, and the error messages
/// per field path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReply {
    /// The submitted `name=value` pairs, in submission order.
    pub values: Vec<(String, String)>,
    /// Error messages keyed by field path.
    pub errors: FieldErrors,
}

impl SubmissionReply {
    /// Builds a reply from the submitted data and collected errors.
    #[must_use]
    pub fn new(data: &FormData, errors: FieldErrors) -> Self {
        Self {
            values: data.pairs().to_vec(),
            errors,
        }
    }

    /// Returns the submitted values as [`FormData`].
    #[must_use]
    pub fn form_data(&self) -> FormData {
        FormData::from_pairs(self.values.clone())
    }

    /// Serializes the reply to JSON for hydration.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json` error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes a reply from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json` error if `input` is not a valid reply.
    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }
}
