//! # crudfilter
//!
//! Compiles the list side of a CRUD API: a recursive boolean filter expression, a
//! multi-key sort spec and an optional page request become a predicate, an ordering and
//! a query window that a backend executes, plus the pagination summary returned to the
//! caller.
//!
//! The compiler is generic over [`QueryBackend`](filtering::QueryBackend). Two backends
//! ship with the crate: [`SqlBackend`](filtering::SqlBackend) builds Sea-ORM conditions
//! and [`MemoryBackend`](filtering::MemoryBackend) evaluates closures over in-memory
//! records.
//!
//! ```rust,ignore
//! use crudfilter::{IntFilter, ListQuery, Page, PageDefaults, QueryPlan, StringFilter};
//! use crudfilter::filtering::SqlBackend;
//!
//! crudfilter::filter_expression! {
//!     pub struct CourseFilter {
//!         id: IntFilter,
//!         title: StringFilter,
//!         published: bool,
//!     }
//! }
//!
//! let query = ListQuery::<CourseFilter>::from_params(&params, PageDefaults::default())?;
//! let plan = QueryPlan::compile(&SqlBackend::new(db.get_database_backend()), &query);
//! let total = plan.filter(course::Entity::find()).count(&db).await?;
//! let rows = plan.apply(course::Entity::find()).all(&db).await?;
//! let page = Page::new(rows, plan.summarize(total));
//! ```

pub mod errors;
pub mod filtering;
pub mod pagination;
pub mod query;
pub mod sort;

pub use errors::QueryError;
pub use filtering::{
    DateTimeFilter, FilterExpression, IntFilter, LeafFilter, Predicate, QueryBackend,
    StringFilter, compile,
};
pub use pagination::{Page, PageRequest, PaginationSummary, QueryWindow};
pub use query::{ListParams, ListQuery, PageDefaults, QueryPlan, parse_filter};
pub use sort::{Direction, Ordering, SortKey, SortSpec};
