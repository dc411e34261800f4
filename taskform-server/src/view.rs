//! HTML rendering for the todos form.
//!
//! Pure functions from form state to markup. Control buttons post the
//! whole form with a JSON intent in their `__intent` value, so every
//! list mutation works as a plain form submission. Entries render in
//! list order with their identity keys in hidden inputs, which keeps
//! per-entry state attached to the right row across mutations.

use taskform_schema::intent::{self, INTENT_FIELD, Intent};
use taskform_schema::schema::{TaskRecord, TodosForm};
use taskform_state::binding::{CheckboxBinding, TextBinding};
use taskform_state::controller::{FormState, TASKS_FIELD};

const PAGE_HEAD: &str = "<!doctype html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
<title>Todos</title>\n<style>\n\
input.error { border-color: #b00020; }\n\
.field-error, .form-error { color: #b00020; }\n\
fieldset { margin: 0.5em 0; }\n\
</style>\n</head>\n<body>\n";

/// Renders the todos form page from the current form state.
#[must_use]
pub fn render_form(state: &FormState) -> String {
    let mut html = String::from(PAGE_HEAD);
    html.push_str("<form method=\"post\" action=\"/todos\">\n");

    html.push_str(&text_field("Title", &state.title_binding()));
    html.push_str("<hr>\n");

    let tasks = state.tasks_binding();
    if !tasks.errors.is_empty() {
        html.push_str(&format!(
            "<div class=\"form-error\">{}</div>\n",
            escape(&tasks.errors.join(", "))
        ));
    }

    for (index, (key, _)) in state.entries().enumerate() {
        html.push_str("<fieldset>\n");
        html.push_str(&format!(
            "<input type=\"hidden\" name=\"{}\" value=\"{key}\">\n",
            escape(&FormState::key_field_name(index)),
        ));
        if let Some(content) = state.content_binding(index) {
            html.push_str(&text_field(&format!("Task #{}", index + 1), &content));
        }
        if let Some(completed) = state.completed_binding(index) {
            html.push_str(&checkbox_field("Completed", &completed));
        }
        html.push_str(&intent_button("Delete", &Intent::remove(TASKS_FIELD, index)));
        // "Move to top" always targets position 0, also for the top entry.
        html.push_str(&intent_button(
            "Move to top",
            &Intent::reorder(TASKS_FIELD, index, 0),
        ));
        html.push_str(&intent_button(
            "Clear",
            &Intent::replace(TASKS_FIELD, index, TaskRecord::default()),
        ));
        html.push_str("</fieldset>\n");
    }

    html.push_str(&intent_button("Add task", &Intent::insert(TASKS_FIELD)));
    html.push_str("<hr>\n<button>Save</button>\n</form>\n</body>\n</html>\n");
    html
}

/// Renders the landing page, showing the submitted value if present.
#[must_use]
pub fn render_landing(value: Option<&TodosForm>) -> String {
    let mut html = String::from(PAGE_HEAD);
    match value {
        Some(form) => {
            html.push_str(&format!("<h1>{}</h1>\n<ul>\n", escape(&form.title)));
            for task in &form.tasks {
                let mark = if task.completed { "[x]" } else { "[ ]" };
                html.push_str(&format!("<li>{mark} {}</li>\n", escape(&task.content)));
            }
            html.push_str("</ul>\n");
        }
        None => html.push_str("<p>Nothing submitted yet.</p>\n"),
    }
    html.push_str("<a href=\"/todos\">Create a todo list</a>\n</body>\n</html>\n");
    html
}

fn text_field(label: &str, binding: &TextBinding<'_>) -> String {
    let name = escape(&binding.name);
    let mut html = format!(
        "<div>\n<label for=\"{name}\">{}</label>\n\
         <input type=\"text\" id=\"{name}\" name=\"{name}\" value=\"{}\"{}>\n",
        escape(label),
        escape(binding.value),
        error_class(binding.valid()),
    );
    html.push_str(&field_errors(binding.errors));
    html.push_str("</div>\n");
    html
}

fn checkbox_field(label: &str, binding: &CheckboxBinding<'_>) -> String {
    let name = escape(&binding.name);
    let checked = if binding.checked { " checked" } else { "" };
    let mut html = format!(
        "<div>\n<label><span>{}</span>\n\
         <input type=\"checkbox\" name=\"{name}\" value=\"on\"{}{checked}>\n</label>\n",
        escape(label),
        error_class(binding.valid()),
    );
    html.push_str(&field_errors(binding.errors));
    html.push_str("</div>\n");
    html
}

fn field_errors(errors: &[String]) -> String {
    if errors.is_empty() {
        return String::new();
    }
    format!(
        "<div class=\"field-error\">{}</div>\n",
        escape(&errors.join(", "))
    )
}

const fn error_class(valid: bool) -> &'static str {
    if valid { "" } else { " class=\"error\"" }
}

fn intent_button(label: &str, intent: &Intent) -> String {
    match intent::encode(intent) {
        Ok(value) => format!(
            "<button name=\"{INTENT_FIELD}\" value=\"{}\">{}</button>\n",
            escape(&value),
            escape(label)
        ),
        Err(e) => {
            tracing::error!(error = %e, "failed to encode control intent");
            String::new()
        }
    }
}

/// Escapes text for HTML element and attribute positions.
fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
