//! Shared schema and wire-format definitions for `TaskForm`.
//!
//! Everything that crosses the HTTP boundary lives here: the flat form
//! data multimap, field paths, the todos schema with its validation
//! rules, submission results, and control-action intents. The same
//! rules run wherever the form is validated, so client-side and
//! server-side validation can never disagree.

pub mod formdata;
pub mod intent;
pub mod path;
pub mod schema;
pub mod submission;
