//! HTTP routes for the todos form: render, control actions, submission.
//!
//! The server holds no form state between requests. Every POST carries
//! the complete form; the handler either applies one control intent and
//! re-renders, or validates the final submission. A valid submission
//! answers with a redirect whose target carries the validated value as
//! JSON in a query parameter, so a refresh never resubmits the form.

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, RawForm, RawQuery, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use url::form_urlencoded;

use taskform_schema::formdata::FormData;
use taskform_schema::intent::{self, INTENT_FIELD, Intent};
use taskform_schema::schema::{self, TodosForm};
use taskform_schema::submission::Submission;
use taskform_state::controller::FormState;

use crate::view;

/// Default maximum number of tasks a form may hold.
const DEFAULT_MAX_TASKS: usize = 50;

/// Default maximum form body size in bytes (64 KB).
const DEFAULT_MAX_BODY_SIZE: usize = 64 * 1024;

/// Shared server state: the resolved limits for the form routes.
#[derive(Debug, Clone)]
pub struct AppState {
    max_tasks: usize,
    max_body_size: usize,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Creates server state with default limits.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_tasks: DEFAULT_MAX_TASKS,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }

    /// Creates server state with custom limits from the resolved
    /// [`crate::config::ServerConfig`].
    #[must_use]
    pub const fn with_config(max_tasks: usize, max_body_size: usize) -> Self {
        Self {
            max_tasks,
            max_body_size,
        }
    }

    /// Maximum number of tasks a form may hold.
    #[must_use]
    pub const fn max_tasks(&self) -> usize {
        self.max_tasks
    }
}

/// Builds the application router.
#[must_use]
pub fn app(state: Arc<AppState>) -> axum::Router {
    let body_limit = state.max_body_size;
    axum::Router::new()
        .route("/", axum::routing::get(landing))
        .route(
            "/todos",
            axum::routing::get(todos_form).post(todos_submit),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// GET / — landing page, rendering the redirected value if present.
async fn landing(RawQuery(query): RawQuery) -> Html<String> {
    let value = query.as_deref().and_then(decode_value_param);
    Html(view::render_landing(value.as_ref()))
}

/// GET /todos — render the empty form.
async fn todos_form() -> Html<String> {
    Html(view::render_form(&FormState::new()))
}

/// POST /todos — apply a control action or validate the submission.
async fn todos_submit(
    State(state): State<Arc<AppState>>,
    RawForm(body): RawForm,
) -> Response {
    let data = FormData::parse_urlencoded(&body);

    // Control buttons post the whole form plus their encoded intent.
    if let Some(raw_intent) = data.first(INTENT_FIELD) {
        return Html(handle_intent(&state, &data, raw_intent)).into_response();
    }

    match schema::parse_submission(&data) {
        Submission::Success { value } => {
            tracing::info!(
                title = %value.title,
                tasks = value.tasks.len(),
                "submission accepted"
            );
            success_redirect(&value)
        }
        Submission::Failure { reply } => {
            tracing::debug!(fields = reply.errors.len(), "submission rejected");
            let mut form = FormState::from_form_data(&data);
            form.apply_errors(&reply.errors);
            Html(view::render_form(&form)).into_response()
        }
    }
}

/// Applies one posted control intent and re-renders the form.
///
/// A failed action leaves the reconstituted state unchanged: the user
/// sees the form exactly as posted, never a corrupted list.
fn handle_intent(state: &AppState, data: &FormData, raw_intent: &str) -> String {
    let mut form = FormState::from_form_data(data);

    match intent::decode(raw_intent) {
        Ok(Intent::Insert { .. }) if form.task_count() >= state.max_tasks => {
            tracing::warn!(max = state.max_tasks, "task limit reached, insert rejected");
            form.push_tasks_error(format!("Task limit reached (max {})", state.max_tasks));
        }
        Ok(intent) => {
            if let Err(e) = form.apply_intent(&intent) {
                tracing::warn!(error = %e, "control action failed, state unchanged");
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "undecodable intent ignored");
        }
    }

    view::render_form(&form)
}

/// Builds the post-submit redirect carrying the validated value.
fn success_redirect(value: &TodosForm) -> Response {
    match serde_json::to_string(value) {
        Ok(json) => {
            let query = form_urlencoded::Serializer::new(String::new())
                .append_pair("value", &json)
                .finish();
            Redirect::to(&format!("/?{query}")).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize validated value");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Decodes the `value` query parameter back into a typed form value.
fn decode_value_param(query: &str) -> Option<TodosForm> {
    form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == "value")
        .and_then(|(_, v)| serde_json::from_str(&v).ok())
}

/// Starts the server on the given address with default limits.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server(
    addr: &str,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    start_server_with_state(addr, Arc::new(AppState::new())).await
}

/// Starts the server with a pre-configured [`AppState`].
///
/// Returns the bound address and a join handle; binds `127.0.0.1:0` for
/// an OS-assigned port in tests.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server_with_state(
    addr: &str,
    state: Arc<AppState>,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    let app = app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "server error");
        }
    });

    Ok((bound_addr, handle))
}
