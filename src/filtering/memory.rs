//! In-memory backend: predicates are shareable closures over a [`Record`].
//!
//! Useful for tests, caches and any executor that already holds the candidate rows.

use chrono::{DateTime, Utc};
use std::cmp::Ordering as CmpOrdering;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use super::algebra::Predicate;
use super::backend::{Comparison, QueryBackend};

/// A typed view of one field of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Str(&'a str),
    Int(i64),
    DateTime(DateTime<Utc>),
    Bool(bool),
}

impl FieldValue<'_> {
    /// Order two values of the same kind. Values of different kinds are unordered.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<CmpOrdering> {
        match (self, other) {
            (Self::Str(a), Self::Str(b)) => Some(a.cmp(b)),
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::DateTime(a), Self::DateTime(b)) => Some(a.cmp(b)),
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

/// A record that in-memory predicates can inspect by field name.
///
/// Returning `None` means the record has no such field; leaf predicates on it never match.
pub trait Record {
    fn field(&self, name: &str) -> Option<FieldValue<'_>>;
}

/// A compiled in-memory test against a record.
pub struct Matcher<R>(Arc<dyn Fn(&R) -> bool + Send + Sync>);

impl<R> Matcher<R> {
    pub fn new<F>(test: F) -> Self
    where
        F: Fn(&R) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(test))
    }

    #[must_use]
    pub fn test(&self, record: &R) -> bool {
        (self.0)(record)
    }
}

impl<R> Clone for Matcher<R> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<R> fmt::Debug for Matcher<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Matcher(..)")
    }
}

impl<R> Predicate<Matcher<R>> {
    /// Evaluate the predicate against one record.
    #[must_use]
    pub fn matches(&self, record: &R) -> bool {
        match self {
            Self::AlwaysTrue => true,
            Self::AlwaysFalse => false,
            Self::Expr(matcher) => matcher.test(record),
        }
    }

    /// Keep the records that satisfy the predicate, preserving their order.
    pub fn select<'a, I>(&self, records: I) -> Vec<&'a R>
    where
        I: IntoIterator<Item = &'a R>,
        R: 'a,
    {
        records
            .into_iter()
            .filter(|record| self.matches(record))
            .collect()
    }
}

/// Backend that evaluates filters directly against records of type `R`.
pub struct MemoryBackend<R> {
    _record: PhantomData<fn(&R)>,
}

impl<R> MemoryBackend<R> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _record: PhantomData,
        }
    }
}

impl<R> Default for MemoryBackend<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Clone for MemoryBackend<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for MemoryBackend<R> {}

impl<R> fmt::Debug for MemoryBackend<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryBackend").finish()
    }
}

fn fold_case(value: &str, ignore_case: bool) -> String {
    if ignore_case {
        value.to_uppercase()
    } else {
        value.to_owned()
    }
}

impl<R: Record + 'static> QueryBackend for MemoryBackend<R> {
    type Expr = Matcher<R>;

    fn and(&self, lhs: Matcher<R>, rhs: Matcher<R>) -> Matcher<R> {
        Matcher::new(move |record| lhs.test(record) && rhs.test(record))
    }

    fn or(&self, lhs: Matcher<R>, rhs: Matcher<R>) -> Matcher<R> {
        Matcher::new(move |record| lhs.test(record) || rhs.test(record))
    }

    fn not(&self, expr: Matcher<R>) -> Matcher<R> {
        Matcher::new(move |record| !expr.test(record))
    }

    fn string_equals(&self, field: &str, value: &str, ignore_case: bool) -> Matcher<R> {
        let field = field.to_owned();
        let expected = fold_case(value, ignore_case);
        Matcher::new(move |record: &R| match record.field(&field) {
            Some(FieldValue::Str(actual)) => fold_case(actual, ignore_case) == expected,
            _ => false,
        })
    }

    fn string_contains(&self, field: &str, value: &str, ignore_case: bool) -> Matcher<R> {
        let field = field.to_owned();
        let needle = fold_case(value, ignore_case);
        Matcher::new(move |record: &R| match record.field(&field) {
            Some(FieldValue::Str(actual)) => fold_case(actual, ignore_case).contains(&needle),
            _ => false,
        })
    }

    fn compare_int(&self, field: &str, comparison: Comparison, value: i64) -> Matcher<R> {
        let field = field.to_owned();
        Matcher::new(move |record: &R| match record.field(&field) {
            Some(FieldValue::Int(actual)) => comparison.holds(&actual, &value),
            _ => false,
        })
    }

    fn compare_date_time(
        &self,
        field: &str,
        comparison: Comparison,
        value: DateTime<Utc>,
    ) -> Matcher<R> {
        let field = field.to_owned();
        Matcher::new(move |record: &R| match record.field(&field) {
            Some(FieldValue::DateTime(actual)) => comparison.holds(&actual, &value),
            _ => false,
        })
    }

    fn bool_equals(&self, field: &str, value: bool) -> Matcher<R> {
        let field = field.to_owned();
        Matcher::new(move |record: &R| {
            matches!(record.field(&field), Some(FieldValue::Bool(actual)) if actual == value)
        })
    }
}
