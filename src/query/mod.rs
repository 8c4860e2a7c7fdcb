//! Entity query pipeline
//!
//! A [`PredicateSet`] captures what a list view wants to see, [`evaluate`]
//! runs it against a [`RecordStore`](crate::core::store::RecordStore) and
//! returns a [`DerivedView`]. [`GlobalSearch`] runs free-text search across
//! several stores at once.

pub mod error;
pub mod pipeline;
pub mod predicate;
pub mod search;
pub mod view;

pub use error::{QueryError, QueryResult};
pub use pipeline::evaluate;
pub use predicate::PredicateSet;
pub use search::{GlobalSearch, SearchHit, SearchSource};
pub use view::{Column, DerivedView, ListView, Ticket};
