//! Integration tests for control actions posted to the form route.
//!
//! Control buttons post the whole form plus a JSON intent; the server
//! reconstitutes the state, applies the mutation, and re-renders. These
//! tests scrape the hidden key inputs out of the rendered page to prove
//! identity keys travel with their entries across mutations.
//!
//! Verification command: `cargo test --test control_actions`

use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::redirect::Policy;

use taskform_schema::intent::{self, Intent};
use taskform_schema::schema::{EntryKey, TaskRecord};
use taskform_server::routes::{AppState, start_server, start_server_with_state};

/// Starts a server on a random port and returns its base URL.
async fn start() -> String {
    let (addr, _handle) = start_server("127.0.0.1:0")
        .await
        .expect("failed to start test server");
    format!("http://{addr}")
}

/// An HTTP client that does not follow redirects.
fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(Policy::none())
        .build()
        .expect("failed to build client")
}

/// Posts form pairs plus an encoded control intent, returning the page.
async fn post_intent(base: &str, mut pairs: Vec<(String, String)>, intent: &Intent) -> String {
    pairs.push(("__intent".to_string(), intent::encode(intent).unwrap()));
    let resp = client()
        .post(format!("{base}/todos"))
        .form(&pairs)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    resp.text().await.unwrap()
}

/// Builds the posted pairs for a form with the given task rows.
fn form_pairs(tasks: &[(EntryKey, &str)]) -> Vec<(String, String)> {
    let mut pairs = vec![("title".to_string(), "Groceries".to_string())];
    for (index, (key, content)) in tasks.iter().enumerate() {
        pairs.push((format!("tasks[{index}].key"), key.to_string()));
        pairs.push((format!("tasks[{index}].content"), (*content).to_string()));
    }
    pairs
}

/// Scrapes the hidden identity keys out of a rendered page, in order.
fn extract_keys(html: &str) -> Vec<String> {
    let mut keys = Vec::new();
    for index in 0.. {
        let marker = format!("name=\"tasks[{index}].key\" value=\"");
        let Some(start) = html.find(&marker) else {
            break;
        };
        let rest = &html[start + marker.len()..];
        let Some(end) = rest.find('"') else {
            break;
        };
        keys.push(rest[..end].to_string());
    }
    keys
}

#[tokio::test]
async fn insert_appends_unvalidated_row() {
    let base = start().await;
    let html = post_intent(&base, form_pairs(&[]), &Intent::insert("tasks")).await;

    assert!(html.contains("name=\"tasks[0].content\""));
    // A pure control action runs no validation.
    assert!(!html.contains("<div class=\"field-error\">"));
    assert_eq!(extract_keys(&html).len(), 1);
}

#[tokio::test]
async fn repeated_inserts_yield_distinct_keys() {
    let base = start().await;
    let first = post_intent(&base, form_pairs(&[]), &Intent::insert("tasks")).await;
    let first_keys = extract_keys(&first);

    // Post the rendered row back with another insert.
    let existing = EntryKey::parse(&first_keys[0]).unwrap();
    let second = post_intent(
        &base,
        form_pairs(&[(existing, "")]),
        &Intent::insert("tasks"),
    )
    .await;
    let second_keys = extract_keys(&second);

    assert_eq!(second_keys.len(), 2);
    assert_eq!(second_keys[0], first_keys[0]);
    assert_ne!(second_keys[1], second_keys[0]);
}

#[tokio::test]
async fn remove_preserves_sibling_order_and_keys() {
    let base = start().await;
    let (a, b, c) = (EntryKey::new(), EntryKey::new(), EntryKey::new());
    let html = post_intent(
        &base,
        form_pairs(&[(a, "Milk"), (b, "Bread"), (c, "Eggs")]),
        &Intent::remove("tasks", 1),
    )
    .await;

    assert!(html.contains("value=\"Milk\""));
    assert!(!html.contains("value=\"Bread\""));
    assert!(html.contains("value=\"Eggs\""));
    assert_eq!(extract_keys(&html), vec![a.to_string(), c.to_string()]);
}

#[tokio::test]
async fn reorder_moves_entry_to_top_with_its_key() {
    let base = start().await;
    let (a, b, c) = (EntryKey::new(), EntryKey::new(), EntryKey::new());
    let html = post_intent(
        &base,
        form_pairs(&[(a, "Milk"), (b, "Bread"), (c, "Eggs")]),
        &Intent::reorder("tasks", 2, 0),
    )
    .await;

    assert_eq!(
        extract_keys(&html),
        vec![c.to_string(), a.to_string(), b.to_string()]
    );
    assert!(html.contains("name=\"tasks[0].content\" value=\"Eggs\""));
}

#[tokio::test]
async fn clear_resets_value_but_keeps_key() {
    let base = start().await;
    let (a, b) = (EntryKey::new(), EntryKey::new());
    let html = post_intent(
        &base,
        form_pairs(&[(a, "Milk"), (b, "Bread")]),
        &Intent::replace("tasks", 0, TaskRecord::default()),
    )
    .await;

    assert!(html.contains("name=\"tasks[0].content\" value=\"\""));
    assert!(html.contains("name=\"tasks[1].content\" value=\"Bread\""));
    assert_eq!(extract_keys(&html), vec![a.to_string(), b.to_string()]);
}

#[tokio::test]
async fn out_of_range_remove_leaves_form_unchanged() {
    let base = start().await;
    let a = EntryKey::new();
    let html = post_intent(
        &base,
        form_pairs(&[(a, "Milk")]),
        &Intent::remove("tasks", 9),
    )
    .await;

    assert!(html.contains("value=\"Milk\""));
    assert_eq!(extract_keys(&html), vec![a.to_string()]);
}

#[tokio::test]
async fn unknown_list_field_intent_is_ignored() {
    let base = start().await;
    let a = EntryKey::new();
    let html = post_intent(
        &base,
        form_pairs(&[(a, "Milk")]),
        &Intent::remove("widgets", 0),
    )
    .await;

    assert!(html.contains("value=\"Milk\""));
    assert_eq!(extract_keys(&html).len(), 1);
}

#[tokio::test]
async fn insert_past_task_limit_reports_list_error() {
    let state = Arc::new(AppState::with_config(2, 64 * 1024));
    let (addr, _handle) = start_server_with_state("127.0.0.1:0", state)
        .await
        .expect("failed to start test server");
    let base = format!("http://{addr}");

    let (a, b) = (EntryKey::new(), EntryKey::new());
    let html = post_intent(
        &base,
        form_pairs(&[(a, "Milk"), (b, "Bread")]),
        &Intent::insert("tasks"),
    )
    .await;

    assert!(html.contains("Task limit reached (max 2)"));
    // The existing rows survive untouched.
    assert_eq!(extract_keys(&html), vec![a.to_string(), b.to_string()]);
}
