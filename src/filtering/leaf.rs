//! Single-field predicates for the primitive filter kinds.
//!
//! Every builder is null-safe: an absent filter, or an absent bound inside a filter,
//! contributes `AlwaysTrue` and folds out of the conjunction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use utoipa::ToSchema;

use super::algebra::{self, Predicate};
use super::backend::{Comparison, QueryBackend};

/// Filter on a string field.
///
/// `equals` and `contains` may both be set; a record must satisfy both.
///
/// ```json
/// {"contains": "course", "ignoreCase": true}
/// ```
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StringFilter {
    pub equals: Option<String>,
    pub contains: Option<String>,
    #[serde(default)]
    pub ignore_case: bool,
}

impl StringFilter {
    #[must_use]
    pub fn equals(value: impl Into<String>) -> Self {
        Self {
            equals: Some(value.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn contains(value: impl Into<String>) -> Self {
        Self {
            contains: Some(value.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn ignore_case(mut self) -> Self {
        self.ignore_case = true;
        self
    }
}

/// Filter on an integer field. All set bounds combine conjunctively.
#[skip_serializing_none]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IntFilter {
    pub equals: Option<i64>,
    pub less_than: Option<i64>,
    pub greater_than: Option<i64>,
}

/// Filter on a date-time field. All set bounds combine conjunctively; `before` and
/// `after` are exclusive.
#[skip_serializing_none]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DateTimeFilter {
    pub equals: Option<DateTime<Utc>>,
    pub before: Option<DateTime<Utc>>,
    pub after: Option<DateTime<Utc>>,
}

/// A leaf filter kind that knows how to turn itself into a predicate on one field.
///
/// Implemented for [`StringFilter`], [`IntFilter`], [`DateTimeFilter`] and `bool`
/// (a bare boolean is an equality constraint).
pub trait LeafFilter {
    fn predicate<B: QueryBackend>(&self, backend: &B, field: &str) -> Predicate<B::Expr>;
}

impl LeafFilter for StringFilter {
    fn predicate<B: QueryBackend>(&self, backend: &B, field: &str) -> Predicate<B::Expr> {
        let equals = self
            .equals
            .as_deref()
            .map(|value| backend.string_equals(field, value, self.ignore_case));
        let contains = self
            .contains
            .as_deref()
            .map(|value| backend.string_contains(field, value, self.ignore_case));
        algebra::all(backend, [bound(equals), bound(contains)])
    }
}

impl LeafFilter for IntFilter {
    fn predicate<B: QueryBackend>(&self, backend: &B, field: &str) -> Predicate<B::Expr> {
        let compare = |comparison, value: Option<i64>| {
            bound(value.map(|value| backend.compare_int(field, comparison, value)))
        };
        algebra::all(
            backend,
            [
                compare(Comparison::Equal, self.equals),
                compare(Comparison::LessThan, self.less_than),
                compare(Comparison::GreaterThan, self.greater_than),
            ],
        )
    }
}

impl LeafFilter for DateTimeFilter {
    fn predicate<B: QueryBackend>(&self, backend: &B, field: &str) -> Predicate<B::Expr> {
        let compare = |comparison, value: Option<DateTime<Utc>>| {
            bound(value.map(|value| backend.compare_date_time(field, comparison, value)))
        };
        algebra::all(
            backend,
            [
                compare(Comparison::Equal, self.equals),
                compare(Comparison::LessThan, self.before),
                compare(Comparison::GreaterThan, self.after),
            ],
        )
    }
}

impl LeafFilter for bool {
    fn predicate<B: QueryBackend>(&self, backend: &B, field: &str) -> Predicate<B::Expr> {
        Predicate::Expr(backend.bool_equals(field, *self))
    }
}

fn bound<E>(expr: Option<E>) -> Predicate<E> {
    expr.map_or(Predicate::AlwaysTrue, Predicate::Expr)
}

/// Predicate for any leaf kind; `AlwaysTrue` when the filter is absent.
pub fn leaf_predicate<B, L>(backend: &B, field: &str, filter: Option<&L>) -> Predicate<B::Expr>
where
    B: QueryBackend,
    L: LeafFilter + ?Sized,
{
    filter.map_or(Predicate::AlwaysTrue, |filter| filter.predicate(backend, field))
}

pub fn string_predicate<B: QueryBackend>(
    backend: &B,
    field: &str,
    filter: Option<&StringFilter>,
) -> Predicate<B::Expr> {
    leaf_predicate(backend, field, filter)
}

pub fn int_predicate<B: QueryBackend>(
    backend: &B,
    field: &str,
    filter: Option<&IntFilter>,
) -> Predicate<B::Expr> {
    leaf_predicate(backend, field, filter)
}

pub fn date_time_predicate<B: QueryBackend>(
    backend: &B,
    field: &str,
    filter: Option<&DateTimeFilter>,
) -> Predicate<B::Expr> {
    leaf_predicate(backend, field, filter)
}

pub fn bool_predicate<B: QueryBackend>(
    backend: &B,
    field: &str,
    value: Option<bool>,
) -> Predicate<B::Expr> {
    leaf_predicate(backend, field, value.as_ref())
}
