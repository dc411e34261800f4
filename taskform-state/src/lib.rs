//! Form-state controller for `TaskForm` dynamic list forms.
//!
//! Tracks the live draft of a todos form between submissions: values,
//! per-field validity and errors, and the stable identity keys that let
//! list entries survive insert/remove/reorder without losing state.

pub mod binding;
pub mod controller;
