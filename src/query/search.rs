//! Global search across several record stores

use serde::Serialize;
use tracing::debug;

use crate::core::record::Record;
use crate::core::store::RecordStore;
use crate::query::error::QueryResult;
use crate::query::pipeline::evaluate;
use crate::query::predicate::PredicateSet;

/// One search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    /// Entity name from the record's schema (e.g. "project")
    pub entity: String,
    pub id: String,
    pub title: String,
}

/// Anything that can answer a free-text search
pub trait SearchSource {
    /// Entity name the hits will carry
    fn entity(&self) -> &str;

    /// Hits for `text`, ordered by the source's default sort key
    fn search(&self, text: &str) -> QueryResult<Vec<SearchHit>>;
}

impl<S: RecordStore> SearchSource for S {
    fn entity(&self) -> &str {
        self.schema().entity()
    }

    fn search(&self, text: &str) -> QueryResult<Vec<SearchHit>> {
        let mut predicates = PredicateSet::for_store(self);
        predicates.set_search_text(text);
        let view = evaluate(self, &predicates)?;

        let title_field = self.schema().title_field();
        Ok(view
            .iter()
            .map(|r| SearchHit {
                entity: self.entity().to_string(),
                id: r.key(),
                title: r
                    .field(title_field)
                    .map(|v| v.as_match_string())
                    .unwrap_or_default(),
            })
            .collect())
    }
}

/// Search across every registered source, in registration order
#[derive(Default)]
pub struct GlobalSearch<'a> {
    sources: Vec<&'a dyn SearchSource>,
}

impl<'a> GlobalSearch<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source
    pub fn add(&mut self, source: &'a dyn SearchSource) -> &mut Self {
        self.sources.push(source);
        self
    }

    /// Builder-style registration
    pub fn with(mut self, source: &'a dyn SearchSource) -> Self {
        self.sources.push(source);
        self
    }

    /// Run a search.
    ///
    /// Blank text yields no hits. `entities` restricts the sources searched
    /// by entity name; `limit` caps the total number of hits.
    pub fn search(
        &self,
        text: &str,
        entities: Option<&[String]>,
        limit: Option<usize>,
    ) -> QueryResult<Vec<SearchHit>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut hits = Vec::new();
        for source in &self.sources {
            if let Some(wanted) = entities {
                if !wanted.iter().any(|e| e == source.entity()) {
                    continue;
                }
            }
            hits.extend(source.search(text)?);
            if let Some(limit) = limit {
                if hits.len() >= limit {
                    hits.truncate(limit);
                    break;
                }
            }
        }

        debug!(text, hits = hits.len(), "global search");
        Ok(hits)
    }
}
