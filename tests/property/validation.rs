//! Property-based tests for the todos schema and wire formats.
//!
//! Uses proptest to verify:
//! 1. Any valid form value survives the encode → parse round trip.
//! 2. The validation rules agree between typed values and flat data.
//! 3. Field paths and intents round-trip through their string forms.
//! 4. Arbitrary input never causes a panic in the parsers.

use proptest::prelude::*;

use taskform_schema::formdata::FormData;
use taskform_schema::intent::{self, Intent};
use taskform_schema::path::FieldPath;
use taskform_schema::schema::{self, TaskRecord, TodosForm};
use taskform_schema::submission::Submission;

// --- Strategies ---

/// Non-blank printable content within the length cap.
fn arb_content() -> impl Strategy<Value = String> {
    "[A-Za-z0-9][A-Za-z0-9 ]{0,39}"
}

/// Strategy for generating arbitrary valid `TaskRecord` values.
fn arb_task() -> impl Strategy<Value = TaskRecord> {
    (arb_content(), any::<bool>()).prop_map(|(content, completed)| TaskRecord {
        content,
        completed,
    })
}

/// Strategy for generating arbitrary valid `TodosForm` values.
fn arb_todos() -> impl Strategy<Value = TodosForm> {
    (arb_content(), prop::collection::vec(arb_task(), 1..6))
        .prop_map(|(title, tasks)| TodosForm { title, tasks })
}

/// Strategy for generating arbitrary field paths.
fn arb_path() -> impl Strategy<Value = FieldPath> {
    #[derive(Debug, Clone)]
    enum Piece {
        Key(String),
        Index(usize),
    }

    (
        "[a-z][a-z0-9_]{0,7}",
        prop::collection::vec(
            prop_oneof![
                "[a-z][a-z0-9_]{0,7}".prop_map(Piece::Key),
                (0usize..100).prop_map(Piece::Index),
            ],
            0..4,
        ),
    )
        .prop_map(|(root, pieces)| {
            pieces
                .into_iter()
                .fold(FieldPath::root(root), |path, piece| match piece {
                    Piece::Key(name) => path.key(name),
                    Piece::Index(index) => path.index(index),
                })
        })
}

/// Strategy for generating arbitrary control intents.
fn arb_intent() -> impl Strategy<Value = Intent> {
    prop_oneof![
        Just(Intent::insert("tasks")),
        (0usize..20).prop_map(|index| Intent::remove("tasks", index)),
        (0usize..20, 0usize..20).prop_map(|(from, to)| Intent::reorder("tasks", from, to)),
        (0usize..20, arb_task()).prop_map(|(index, value)| Intent::replace("tasks", index, value)),
    ]
}

/// Renders a typed value as the flat pairs a browser would post.
fn to_form_data(form: &TodosForm) -> FormData {
    let mut data = FormData::new();
    data.append("title", form.title.clone());
    for (index, task) in form.tasks.iter().enumerate() {
        data.append(format!("tasks[{index}].content"), task.content.clone());
        if task.completed {
            data.append(format!("tasks[{index}].completed"), "on");
        }
    }
    data
}

// --- Properties ---

proptest! {
    #[test]
    fn valid_form_round_trips_through_submission(form in arb_todos()) {
        let data = to_form_data(&form);
        let submission = schema::parse_submission(&data);
        prop_assert_eq!(submission, Submission::Success { value: form });
    }

    #[test]
    fn valid_form_validates_clean(form in arb_todos()) {
        prop_assert!(schema::validate(&form).is_empty());
    }

    #[test]
    fn urlencoding_preserves_pairs(form in arb_todos()) {
        let data = to_form_data(&form);
        let reparsed = FormData::parse_urlencoded(data.to_urlencoded().as_bytes());
        prop_assert_eq!(reparsed, data);
    }

    #[test]
    fn empty_task_list_always_fails_at_tasks(title in arb_content()) {
        let mut data = FormData::new();
        data.append("title", title);
        match schema::parse_submission(&data) {
            Submission::Failure { reply } => {
                prop_assert!(reply.errors.contains_key(&FieldPath::root("tasks")));
            }
            Submission::Success { .. } => prop_assert!(false, "expected failure"),
        }
    }

    #[test]
    fn blank_content_fails_at_its_own_path(form in arb_todos(), position in 0usize..6) {
        let blank_at = position % form.tasks.len();
        let mut data = FormData::new();
        data.append("title", form.title.clone());
        for (index, task) in form.tasks.iter().enumerate() {
            let content = if index == blank_at { "" } else { task.content.as_str() };
            data.append(format!("tasks[{index}].content"), content);
        }

        match schema::parse_submission(&data) {
            Submission::Failure { reply } => {
                let blank_path = FieldPath::root("tasks").index(blank_at).key("content");
                prop_assert!(reply.errors.contains_key(&blank_path));
                // Sibling tasks stay clean.
                for index in 0..form.tasks.len() {
                    if index != blank_at {
                        let path = FieldPath::root("tasks").index(index).key("content");
                        prop_assert!(!reply.errors.contains_key(&path));
                    }
                }
            }
            Submission::Success { .. } => prop_assert!(false, "expected failure"),
        }
    }

    #[test]
    fn field_path_display_parse_round_trip(path in arb_path()) {
        let rendered = path.to_string();
        let parsed = FieldPath::parse(&rendered);
        prop_assert_eq!(parsed, Ok(path));
    }

    #[test]
    fn intent_round_trips_through_json(original in arb_intent()) {
        let encoded = intent::encode(&original).unwrap();
        let decoded = intent::decode(&encoded).unwrap();
        prop_assert_eq!(decoded, original);
    }

    #[test]
    fn parsers_never_panic_on_arbitrary_input(input in "\\PC{0,64}") {
        let _ = FieldPath::parse(&input);
        let _ = intent::decode(&input);
        let _ = FormData::parse_urlencoded(input.as_bytes());
    }
}
