//! `TaskForm` demo server library.
//!
//! Exposes the router and server startup for tests and embedding.
//! The server renders the todos form, applies posted control actions,
//! and validates final submissions against the shared schema.

pub mod config;
pub mod routes;
pub mod view;
