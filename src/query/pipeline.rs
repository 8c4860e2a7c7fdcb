//! Query Pipeline - (Record Store, Predicate Set) -> Derived View
//!
//! Evaluation is a pure function of its two inputs: the store is only read,
//! and the result is a freshly cloned sequence that shares nothing with the
//! predicate set, so callers can keep it after the predicates change.

use std::cmp::Ordering;

use tracing::debug;

use crate::core::record::Record;
use crate::core::store::RecordStore;
use crate::core::value::Value;
use crate::query::error::{QueryError, QueryResult};
use crate::query::predicate::PredicateSet;
use crate::query::view::DerivedView;
use crate::schema::record::{FieldDef, SortOrder};

/// Evaluate a predicate set against a store
pub fn evaluate<S: RecordStore>(
    store: &S,
    predicates: &PredicateSet,
) -> QueryResult<DerivedView<S::Item>> {
    let schema = predicates.schema();
    if schema.entity() != store.schema().entity() {
        return Err(QueryError::SchemaMismatch {
            expected: schema.entity().to_string(),
            found: store.schema().entity().to_string(),
        });
    }

    let source = store.list_all();
    let needle = predicates.search_text().to_lowercase();

    // Filter stage
    let mut matched: Vec<(usize, Option<Value>, &S::Item)> = Vec::new();
    let sort = schema.sort_key(predicates.sort_key());
    for (idx, record) in source.iter().enumerate() {
        if !matches_search(record, predicates.search_fields(), &needle) {
            continue;
        }
        if !matches_filters(record, predicates) {
            continue;
        }
        let sort_value = sort.and_then(|k| record.field(&k.field));
        matched.push((idx, sort_value, record));
    }

    // Sort stage: source index breaks ties so equal records keep source order
    if let Some(key) = sort {
        let def = schema.field(&key.field);
        matched.sort_by(|a, b| {
            compare_sort_values(a.1.as_ref(), b.1.as_ref(), def, key.order)
                .then_with(|| a.0.cmp(&b.0))
        });
    }

    let records: Vec<S::Item> = matched.into_iter().map(|(_, _, r)| r.clone()).collect();
    debug!(
        entity = schema.entity(),
        total = source.len(),
        matched = records.len(),
        sort = predicates.sort_key(),
        "query evaluated"
    );

    Ok(DerivedView::new(records, source.len()))
}

/// Free-text condition: empty needle matches everything, otherwise any
/// searchable field must contain it case-insensitively.
/// `needle` must already be lowercased.
pub(crate) fn matches_search<R: Record>(record: &R, fields: &[String], needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    fields.iter().any(|field| {
        record
            .field(field)
            .map(|v| v.as_match_string().to_lowercase().contains(needle))
            .unwrap_or(false)
    })
}

/// Every active filter must equal the record's field exactly
fn matches_filters<R: Record>(record: &R, predicates: &PredicateSet) -> bool {
    predicates.field_filters().all(|(field, wanted)| {
        record
            .field(field)
            .map(|v| v.as_match_string() == wanted)
            .unwrap_or(false)
    })
}

/// Order two optional sort values. Missing values go last in either
/// direction. Tag values follow their schema option order; tags outside the
/// options come after every known option, ordered by text.
pub(crate) fn compare_sort_values(
    a: Option<&Value>,
    b: Option<&Value>,
    def: Option<&FieldDef>,
    order: SortOrder,
) -> Ordering {
    let (a, b) = match (a, b) {
        (None, None) => return Ordering::Equal,
        (Some(_), None) => return Ordering::Less,
        (None, Some(_)) => return Ordering::Greater,
        (Some(a), Some(b)) => (a, b),
    };

    let ordering = match (a, b, def) {
        (Value::Tag(x), Value::Tag(y), Some(def)) => {
            let rank = |v: &str| def.option_rank(v).unwrap_or(usize::MAX);
            rank(x).cmp(&rank(y)).then_with(|| a.sort_cmp(b))
        }
        _ => a.sort_cmp(b),
    };

    match order {
        SortOrder::Ascending => ordering,
        SortOrder::Descending => ordering.reverse(),
    }
}
