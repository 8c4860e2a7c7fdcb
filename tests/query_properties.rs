//! Property tests for the query pipeline over generated record stores

use proptest::prelude::*;
use ttk::core::loader::DataSet;
use ttk::core::record::{FieldBag, Record};
use ttk::core::store::MemoryStore;
use ttk::query::{evaluate, ListView, PredicateSet};
use ttk::schema::record::{FieldKind, RecordSchema, SortOrder};

const GROUPS: &[&str] = &["alpha", "beta", "gamma"];

fn schema() -> RecordSchema {
    RecordSchema::builder("item")
        .field("id", "ID", FieldKind::Text)
        .field("name", "Name", FieldKind::Text)
        .tag("group", "Group", GROUPS)
        .field("weight", "Weight", FieldKind::Number)
        .searchable(&["name"])
        .sort_key("source", "Source order", "id", SortOrder::Ascending)
        .sort_key("group", "Group", "group", SortOrder::Descending)
        .sort_key("weight", "Weight", "weight", SortOrder::Ascending)
        .default_sort("source")
        .build()
}

/// Rows of (name, group index, optional weight); keys are zero-padded so
/// the default sort reproduces source order.
fn rows() -> impl Strategy<Value = Vec<(String, usize, Option<u8>)>> {
    proptest::collection::vec(
        ("[a-cA-C]{1,6}", 0..GROUPS.len(), proptest::option::of(0u8..5)),
        0..30,
    )
}

fn store(rows: &[(String, usize, Option<u8>)]) -> MemoryStore<FieldBag> {
    MemoryStore::with_records(
        schema(),
        rows.iter().enumerate().map(|(i, (name, group, weight))| {
            let mut bag = FieldBag::new(format!("item-{:03}", i))
                .with("name", name.as_str())
                .with("group", ttk::core::value::Value::Tag(GROUPS[*group].to_string()));
            if let Some(w) = weight {
                bag.set("weight", f64::from(*w));
            }
            bag
        }),
    )
}

fn keys(records: &[FieldBag]) -> Vec<String> {
    records.iter().map(|r| r.key()).collect()
}

fn index_of(key: &str) -> usize {
    key.trim_start_matches("item-").parse().unwrap()
}

proptest! {
    #[test]
    fn prop_evaluation_is_deterministic(
        rows in rows(),
        search in "[a-c]{0,2}",
        sort in prop_oneof![Just("source"), Just("group"), Just("weight")],
    ) {
        let store = store(&rows);
        let mut predicates = PredicateSet::for_store(&store);
        predicates.set_search_text(search);
        predicates.set_sort_key(sort).unwrap();

        let first = evaluate(&store, &predicates).unwrap();
        let second = evaluate(&store, &predicates).unwrap();
        prop_assert_eq!(keys(first.records()), keys(second.records()));
    }

    #[test]
    fn prop_reset_shows_everything_in_default_order(
        rows in rows(),
        search in "[a-c]{0,2}",
        group in 0..GROUPS.len(),
    ) {
        let store = store(&rows);
        let mut predicates = PredicateSet::for_store(&store);
        predicates.set_search_text(search);
        predicates.set_field_filter("group", GROUPS[group]).unwrap();
        predicates.set_sort_key("weight").unwrap();
        predicates.reset();

        let view = evaluate(&store, &predicates).unwrap();
        let expected: Vec<String> = (0..rows.len()).map(|i| format!("item-{:03}", i)).collect();
        prop_assert_eq!(keys(view.records()), expected);
        prop_assert_eq!(view.matched_count(), view.total_count());
    }

    #[test]
    fn prop_adding_a_filter_never_grows_the_view(
        rows in rows(),
        search in "[a-c]{0,2}",
        group in 0..GROUPS.len(),
    ) {
        let store = store(&rows);
        let mut predicates = PredicateSet::for_store(&store);
        predicates.set_search_text(search);
        let before = evaluate(&store, &predicates).unwrap();

        predicates.set_field_filter("group", GROUPS[group]).unwrap();
        let after = evaluate(&store, &predicates).unwrap();

        prop_assert!(after.matched_count() <= before.matched_count());
        let before_keys = keys(before.records());
        for key in keys(after.records()) {
            prop_assert!(before_keys.contains(&key));
        }
    }

    #[test]
    fn prop_ties_keep_source_order(rows in rows()) {
        let store = store(&rows);
        let mut predicates = PredicateSet::for_store(&store);
        predicates.set_sort_key("group").unwrap();
        let view = evaluate(&store, &predicates).unwrap();

        for pair in view.records().windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if a.field("group") == b.field("group") {
                prop_assert!(index_of(&a.key()) < index_of(&b.key()));
            }
        }
    }

    #[test]
    fn prop_missing_values_sort_last(rows in rows()) {
        let store = store(&rows);
        let mut predicates = PredicateSet::for_store(&store);
        predicates.set_sort_key("weight").unwrap();
        let view = evaluate(&store, &predicates).unwrap();

        let first_missing = view
            .records()
            .iter()
            .position(|r| r.field("weight").is_none())
            .unwrap_or(view.matched_count());
        for record in &view.records()[first_missing..] {
            prop_assert!(record.field("weight").is_none());
        }
    }

    #[test]
    fn prop_search_ignores_case(rows in rows(), search in "[a-c]{1,2}") {
        let store = store(&rows);
        let mut lower = PredicateSet::for_store(&store);
        lower.set_search_text(search.clone());
        let mut upper = PredicateSet::for_store(&store);
        upper.set_search_text(search.to_uppercase());

        let lower = evaluate(&store, &lower).unwrap();
        let upper = evaluate(&store, &upper).unwrap();
        prop_assert_eq!(keys(lower.records()), keys(upper.records()));
    }

    #[test]
    fn prop_list_view_tracks_latest_predicates(rows in rows(), group in 0..GROUPS.len()) {
        let store = store(&rows);
        let mut view = ListView::mount(&store).unwrap();
        view.update(&store, |p| p.set_field_filter("group", GROUPS[group])).unwrap();

        let expected = rows.iter().filter(|(_, g, _)| *g == group).count();
        prop_assert_eq!(view.view().matched_count(), expected);
        prop_assert_eq!(view.view().total_count(), rows.len());
    }
}

#[test]
fn test_filter_with_unknown_field_is_rejected() {
    let store = store(&[]);
    let mut predicates = PredicateSet::for_store(&store);
    let err = predicates.set_field_filter("colour", "red").unwrap_err();
    assert!(err.to_string().contains("unknown field 'colour'"));
}

#[test]
fn test_search_and_filter_combine() {
    let rows = vec![
        ("Cab".to_string(), 0, Some(3)),
        ("cable".to_string(), 1, None),
        ("Bac".to_string(), 1, Some(1)),
        ("CABIN".to_string(), 1, Some(2)),
    ];
    let store = store(&rows);
    let mut predicates = PredicateSet::for_store(&store);
    predicates.set_search_text("cab");
    predicates.set_field_filter("group", "beta").unwrap();
    predicates.set_sort_key("weight").unwrap();

    let view = evaluate(&store, &predicates).unwrap();
    assert_eq!(keys(view.records()), vec!["item-003", "item-001"]);
    assert_eq!(view.total_count(), 4);
}

// ============================================================================
// Scenarios over the bundled data
// ============================================================================

#[test]
fn test_one_project_per_stage() {
    let data = DataSet::embedded().unwrap();
    let mut predicates = PredicateSet::for_store(&data.projects);

    predicates.set_field_filter("stage", "in_progress").unwrap();
    let view = evaluate(&data.projects, &predicates).unwrap();
    assert_eq!(view.matched_count(), 1);
    assert_eq!(view.records()[0].name, "Warehouse Automation");

    predicates.reset();
    let view = evaluate(&data.projects, &predicates).unwrap();
    assert_eq!(view.matched_count(), 5);
    assert_eq!(view.total_count(), 5);
}

#[test]
fn test_search_build_finds_only_build_ui() {
    let data = DataSet::embedded().unwrap();
    let mut predicates = PredicateSet::for_store(&data.tasks);
    predicates.set_search_text("build");

    let names: Vec<String> = evaluate(&data.tasks, &predicates)
        .unwrap()
        .into_records()
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(names, vec!["Build UI"]);
}

#[test]
fn test_empty_status_filter_is_no_filter() {
    let data = DataSet::embedded().unwrap();
    let mut predicates = PredicateSet::for_store(&data.tasks);
    predicates.set_field_filter("status", "").unwrap();

    assert_eq!(predicates.active_filter_count(), 0);
    let view = evaluate(&data.tasks, &predicates).unwrap();
    assert_eq!(view.matched_count(), data.tasks.len());
}

#[test]
fn test_unknown_sort_key_keeps_current_order() {
    let data = DataSet::embedded().unwrap();
    let mut predicates = PredicateSet::for_store(&data.tasks);
    predicates.set_sort_key("priority").unwrap();

    let err = predicates.set_sort_key("unknown_key").unwrap_err();
    assert!(err.to_string().contains("invalid sort key 'unknown_key'"));
    assert_eq!(predicates.sort_key(), "priority");
}
