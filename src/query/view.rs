//! Derived views and the list-view session that owns them

use tracing::debug;

use crate::core::record::Record;
use crate::core::store::RecordStore;
use crate::query::error::QueryResult;
use crate::query::pipeline::evaluate;
use crate::query::predicate::PredicateSet;
use crate::schema::record::{FieldDef, FieldKind};

/// Read-only filtered and sorted result of one evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedView<T> {
    records: Vec<T>,
    total_count: usize,
}

impl<T> DerivedView<T> {
    pub(crate) fn new(records: Vec<T>, total_count: usize) -> Self {
        Self {
            records,
            total_count,
        }
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.records.iter()
    }

    /// Number of records in the source store
    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// Number of records that passed the filters
    pub fn matched_count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<T> {
        self.records
    }
}

impl<'a, T> IntoIterator for &'a DerivedView<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// One kanban column: every record sharing a value of the grouping field
#[derive(Debug, Clone, PartialEq)]
pub struct Column<T> {
    /// Field value for this column; empty for records without the field
    pub value: String,
    pub records: Vec<T>,
}

impl<T: Record> DerivedView<T> {
    /// Split the view into columns by one field.
    ///
    /// Tag fields get one column per option in schema order, including empty
    /// ones. Values outside the option list follow in first-seen order, and
    /// records missing the field land in a final column with an empty value.
    /// Each column keeps the view's ordering.
    pub fn group_by(&self, field: &FieldDef) -> Vec<Column<T>> {
        let mut columns: Vec<Column<T>> = match &field.kind {
            FieldKind::Tag(options) => options
                .iter()
                .map(|o| Column {
                    value: o.clone(),
                    records: Vec::new(),
                })
                .collect(),
            _ => Vec::new(),
        };
        let mut missing = Vec::new();

        for record in &self.records {
            let Some(value) = record.field(&field.name) else {
                missing.push(record.clone());
                continue;
            };
            let value = value.as_match_string();
            match columns.iter_mut().find(|c| c.value == value) {
                Some(column) => column.records.push(record.clone()),
                None => columns.push(Column {
                    value,
                    records: vec![record.clone()],
                }),
            }
        }

        if !missing.is_empty() {
            columns.push(Column {
                value: String::new(),
                records: missing,
            });
        }
        columns
    }
}

/// A pending evaluation issued by [`ListView::begin`]
#[derive(Debug, Clone)]
pub struct Ticket {
    generation: u64,
    predicates: PredicateSet,
}

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn predicates(&self) -> &PredicateSet {
        &self.predicates
    }

    /// Run the pipeline for this ticket's predicates
    pub fn evaluate<S: RecordStore>(&self, store: &S) -> QueryResult<DerivedView<S::Item>> {
        evaluate(store, &self.predicates)
    }
}

/// Predicate set plus the latest valid derived view of one list page
///
/// Failed mutations leave both untouched, so the page keeps showing the
/// previous view. Results are last-write-wins: only the most recently issued
/// evaluation may install its view.
#[derive(Debug, Clone)]
pub struct ListView<T> {
    predicates: PredicateSet,
    view: DerivedView<T>,
    generation: u64,
}

impl<T: Record> ListView<T> {
    /// Mount a list view with an empty predicate set
    pub fn mount<S: RecordStore<Item = T>>(store: &S) -> QueryResult<Self> {
        Self::with_predicates(store, PredicateSet::for_store(store))
    }

    /// Mount a list view with prepared predicates
    pub fn with_predicates<S: RecordStore<Item = T>>(
        store: &S,
        predicates: PredicateSet,
    ) -> QueryResult<Self> {
        let view = evaluate(store, &predicates)?;
        Ok(Self {
            predicates,
            view,
            generation: 0,
        })
    }

    pub fn predicates(&self) -> &PredicateSet {
        &self.predicates
    }

    pub fn view(&self) -> &DerivedView<T> {
        &self.view
    }

    /// Apply a predicate mutation and re-evaluate synchronously
    pub fn update<S, F>(&mut self, store: &S, mutate: F) -> QueryResult<&DerivedView<T>>
    where
        S: RecordStore<Item = T>,
        F: FnOnce(&mut PredicateSet) -> QueryResult<()>,
    {
        let mut next = self.predicates.clone();
        mutate(&mut next)?;
        let view = evaluate(store, &next)?;
        self.generation += 1;
        self.predicates = next;
        self.view = view;
        Ok(&self.view)
    }

    /// Re-run the current predicates after the store changed
    pub fn refresh<S: RecordStore<Item = T>>(&mut self, store: &S) -> QueryResult<&DerivedView<T>> {
        self.update(store, |_| Ok(()))
    }

    /// Issue a deferred evaluation for mutated predicates; any earlier
    /// outstanding ticket becomes stale
    pub fn begin<F>(&mut self, mutate: F) -> QueryResult<Ticket>
    where
        F: FnOnce(&mut PredicateSet) -> QueryResult<()>,
    {
        let mut next = self.predicates.clone();
        mutate(&mut next)?;
        self.generation += 1;
        Ok(Ticket {
            generation: self.generation,
            predicates: next,
        })
    }

    /// Install a ticket's result if it is still the latest; returns whether it was
    pub fn complete(&mut self, ticket: Ticket, view: DerivedView<T>) -> bool {
        if ticket.generation != self.generation {
            debug!(
                stale = ticket.generation,
                latest = self.generation,
                "discarding stale evaluation"
            );
            return false;
        }
        self.predicates = ticket.predicates;
        self.view = view;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::FieldBag;
    use crate::core::store::MemoryStore;
    use crate::core::value::Value;
    use crate::schema::record::{RecordSchema, SortOrder};

    fn store() -> MemoryStore<FieldBag> {
        let schema = RecordSchema::builder("project")
            .field("id", "ID", FieldKind::Text)
            .field("name", "Name", FieldKind::Text)
            .tag("stage", "Stage", &["planning", "in_progress", "review"])
            .searchable(&["name"])
            .sort_key("name", "Name", "name", SortOrder::Ascending)
            .build();
        MemoryStore::with_records(
            schema,
            vec![
                FieldBag::new("p1")
                    .with("name", "Bridge")
                    .with("stage", Value::Tag("review".into())),
                FieldBag::new("p2")
                    .with("name", "Atrium")
                    .with("stage", Value::Tag("planning".into())),
                FieldBag::new("p3")
                    .with("name", "Canal")
                    .with("stage", Value::Tag("planning".into())),
                FieldBag::new("p4")
                    .with("name", "Depot")
                    .with("stage", Value::Tag("archived".into())),
                FieldBag::new("p5").with("name", "Estate"),
            ],
        )
    }

    #[test]
    fn test_group_by_tag_columns() {
        let store = store();
        let list = ListView::mount(&store).unwrap();
        let stage = store.schema().field("stage").unwrap();
        let columns = list.view().group_by(stage);

        let summary: Vec<(String, Vec<String>)> = columns
            .iter()
            .map(|c| (c.value.clone(), c.records.iter().map(|r| r.key()).collect()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("planning".to_string(), vec!["p2".to_string(), "p3".to_string()]),
                ("in_progress".to_string(), vec![]),
                ("review".to_string(), vec!["p1".to_string()]),
                ("archived".to_string(), vec!["p4".to_string()]),
                (String::new(), vec!["p5".to_string()]),
            ]
        );
    }

    #[test]
    fn test_failed_update_keeps_previous_view() {
        let store = store();
        let mut list = ListView::mount(&store).unwrap();
        list.update(&store, |p| p.set_field_filter("stage", "planning"))
            .unwrap();
        assert_eq!(list.view().matched_count(), 2);

        let err = list.update(&store, |p| {
            p.set_search_text("zzz");
            p.set_sort_key("bogus")
        });
        assert!(err.is_err());
        assert_eq!(list.view().matched_count(), 2);
        assert_eq!(list.predicates().search_text(), "");
    }

    #[test]
    fn test_refresh_after_store_mutation() {
        let mut store = store();
        let mut list = ListView::mount(&store).unwrap();
        assert_eq!(list.view().total_count(), 5);

        store.delete("p1").unwrap();
        let view = list.refresh(&store).unwrap();
        assert_eq!(view.total_count(), 4);
        assert_eq!(view.matched_count(), 4);
    }

    #[test]
    fn test_stale_tickets_are_discarded() {
        let store = store();
        let mut list = ListView::mount(&store).unwrap();

        let first = list
            .begin(|p| {
                p.set_search_text("a");
                Ok(())
            })
            .unwrap();
        let second = list
            .begin(|p| {
                p.set_search_text("atrium");
                Ok(())
            })
            .unwrap();

        let second_view = second.evaluate(&store).unwrap();
        let first_view = first.evaluate(&store).unwrap();

        assert!(list.complete(second, second_view));
        assert!(!list.complete(first, first_view));
        assert_eq!(list.view().matched_count(), 1);
        assert_eq!(list.predicates().search_text(), "atrium");
    }
}
