//! # Filter Compilation
//!
//! Turns a declarative, recursive filter expression into one predicate that a query
//! backend can evaluate.
//!
//! ## Main Components
//!
//! - **[`QueryBackend`]**: the seam between the compiler and whatever executes the query
//! - **[`Predicate`]** and the [`algebra`] functions: AND / OR / NOT with the
//!   `AlwaysTrue` / `AlwaysFalse` identities
//! - **[`LeafFilter`]**: string, integer, date-time and boolean field filters
//! - **[`FilterExpression`]** and [`compile`]: the recursive tree walk
//! - **[`SqlBackend`]** (Sea-ORM conditions) and **[`MemoryBackend`]** (closures over records)
//!
//! ## Filter JSON
//!
//! ```json
//! {
//!   "description": {"contains": "A"},
//!   "published": true,
//!   "or": [{"description": {"contains": "B"}}],
//!   "not": {"title": {"equals": "draft", "ignoreCase": true}}
//! }
//! ```
//!
//! A node's own field filters, its `and` children and its negated `not` child must all
//! hold, or else any one of its `or` children must hold.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use crudfilter::filtering::{SqlBackend, compile};
//! use sea_orm::{DatabaseBackend, EntityTrait};
//!
//! let backend = SqlBackend::new(DatabaseBackend::Postgres);
//! let courses = compile(&backend, Some(&filter))
//!     .apply(course::Entity::find())
//!     .all(&db)
//!     .await?;
//! ```

pub mod algebra;
pub mod backend;
pub mod expression;
pub mod leaf;
pub mod memory;
pub mod sql;

// Re-export commonly used items
pub use algebra::Predicate;
pub use backend::{Comparison, QueryBackend};
pub use expression::{FilterExpression, compile};
pub use leaf::{
    DateTimeFilter, IntFilter, LeafFilter, StringFilter, bool_predicate, date_time_predicate,
    int_predicate, leaf_predicate, string_predicate,
};
pub use memory::{FieldValue, Matcher, MemoryBackend, Record};
pub use sql::SqlBackend;
