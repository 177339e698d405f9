//! Sea-ORM backend: predicates are `sea_orm::Condition` trees.
//!
//! The backend only builds conditions. Running them is up to the caller, usually by
//! handing [`Predicate::into_condition`] to `Entity::find().filter(..)`.

use chrono::{DateTime, Utc};
use sea_orm::{
    Condition, DatabaseBackend, QueryFilter,
    sea_query::{Alias, Expr, Func, LikeExpr, SimpleExpr},
};

use super::algebra::Predicate;
use super::backend::{Comparison, QueryBackend};

/// Backend producing Sea-ORM conditions for one SQL dialect.
///
/// Field names are used as column identifiers verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SqlBackend {
    dialect: DatabaseBackend,
}

impl SqlBackend {
    #[must_use]
    pub const fn new(dialect: DatabaseBackend) -> Self {
        Self { dialect }
    }

    #[must_use]
    pub const fn dialect(&self) -> DatabaseBackend {
        self.dialect
    }
}

impl Default for SqlBackend {
    fn default() -> Self {
        Self::new(DatabaseBackend::Sqlite)
    }
}

fn column(field: &str) -> Expr {
    Expr::col(Alias::new(field))
}

/// The column, upper-cased when the comparison ignores case.
fn folded_column(field: &str, ignore_case: bool) -> Expr {
    if ignore_case {
        Expr::expr(Func::upper(column(field)))
    } else {
        column(field)
    }
}

fn folded_value(value: &str, ignore_case: bool) -> String {
    if ignore_case {
        value.to_uppercase()
    } else {
        value.to_owned()
    }
}

/// Escape LIKE wildcards so the value only ever matches literally.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn single(expr: SimpleExpr) -> Condition {
    Condition::all().add(expr)
}

impl QueryBackend for SqlBackend {
    type Expr = Condition;

    fn and(&self, lhs: Condition, rhs: Condition) -> Condition {
        Condition::all().add(lhs).add(rhs)
    }

    fn or(&self, lhs: Condition, rhs: Condition) -> Condition {
        Condition::any().add(lhs).add(rhs)
    }

    fn not(&self, expr: Condition) -> Condition {
        expr.not()
    }

    fn string_equals(&self, field: &str, value: &str, ignore_case: bool) -> Condition {
        single(folded_column(field, ignore_case).eq(folded_value(value, ignore_case)))
    }

    fn string_contains(&self, field: &str, value: &str, ignore_case: bool) -> Condition {
        if ignore_case || self.dialect == DatabaseBackend::Postgres {
            let pattern = format!("%{}%", escape_like(&folded_value(value, ignore_case)));
            return single(
                folded_column(field, ignore_case).like(LikeExpr::new(pattern).escape('\\')),
            );
        }

        // LIKE folds ASCII case on SQLite (and under MySQL's default collations), so a
        // case-sensitive substring test goes through the position function instead.
        let position = Func::cust(Alias::new("INSTR"))
            .arg(column(field))
            .arg(value.to_owned());
        single(Expr::expr(position).gt(0))
    }

    fn compare_int(&self, field: &str, comparison: Comparison, value: i64) -> Condition {
        single(compare(column(field), comparison, value))
    }

    fn compare_date_time(
        &self,
        field: &str,
        comparison: Comparison,
        value: DateTime<Utc>,
    ) -> Condition {
        single(compare(column(field), comparison, value))
    }

    fn bool_equals(&self, field: &str, value: bool) -> Condition {
        single(column(field).eq(value))
    }
}

fn compare<V: Into<SimpleExpr>>(column: Expr, comparison: Comparison, value: V) -> SimpleExpr {
    match comparison {
        Comparison::Equal => column.eq(value),
        Comparison::LessThan => column.lt(value),
        Comparison::GreaterThan => column.gt(value),
    }
}

impl Predicate<Condition> {
    /// Lower to a plain Sea-ORM condition.
    ///
    /// `AlwaysTrue` becomes an empty `Condition::all()` (rendered as `TRUE` when used
    /// on its own) and `AlwaysFalse` becomes `1 = 0`.
    #[must_use]
    pub fn into_condition(self) -> Condition {
        match self {
            Self::AlwaysTrue => Condition::all(),
            Self::AlwaysFalse => Condition::all().add(Expr::val(1).eq(0)),
            Self::Expr(condition) => condition,
        }
    }

    /// Attach the predicate to any filterable Sea-ORM query.
    ///
    /// `AlwaysTrue` leaves the query untouched, so no WHERE clause is emitted.
    #[must_use]
    pub fn apply<Q: QueryFilter>(self, query: Q) -> Q {
        match self {
            Self::AlwaysTrue => query,
            predicate => query.filter(predicate.into_condition()),
        }
    }
}
