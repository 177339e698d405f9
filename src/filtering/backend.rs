use chrono::{DateTime, Utc};

/// Relational operator used by the ordered leaf filters (integers and date-times).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Equal,
    LessThan,
    GreaterThan,
}

impl Comparison {
    /// Apply the comparison to two already-ordered values.
    #[must_use]
    pub fn holds<T: PartialOrd>(self, lhs: &T, rhs: &T) -> bool {
        match self {
            Self::Equal => lhs == rhs,
            Self::LessThan => lhs < rhs,
            Self::GreaterThan => lhs > rhs,
        }
    }
}

/// A queryable backend that filter expressions compile against.
///
/// Implementors supply their native predicate fragment (`Expr`) together with the
/// handful of leaf constructors and connectives the compiler needs. Identity handling
/// (`AlwaysTrue` / `AlwaysFalse`) never reaches the backend: it is resolved by
/// [`Predicate`](super::algebra::Predicate) before a connective is invoked, so every
/// `Expr` a backend sees is a real constraint.
///
/// Field identifiers are the names declared on the entity's filter shape. SQL backends
/// treat them as column names, in-memory backends look them up on the record.
pub trait QueryBackend {
    type Expr: Clone;

    fn and(&self, lhs: Self::Expr, rhs: Self::Expr) -> Self::Expr;

    fn or(&self, lhs: Self::Expr, rhs: Self::Expr) -> Self::Expr;

    fn not(&self, expr: Self::Expr) -> Self::Expr;

    /// Exact string match. With `ignore_case` both the stored value and `value`
    /// must be folded the same way before comparing.
    fn string_equals(&self, field: &str, value: &str, ignore_case: bool) -> Self::Expr;

    /// Substring match, folded like [`string_equals`](Self::string_equals).
    fn string_contains(&self, field: &str, value: &str, ignore_case: bool) -> Self::Expr;

    fn compare_int(&self, field: &str, comparison: Comparison, value: i64) -> Self::Expr;

    fn compare_date_time(
        &self,
        field: &str,
        comparison: Comparison,
        value: DateTime<Utc>,
    ) -> Self::Expr;

    fn bool_equals(&self, field: &str, value: bool) -> Self::Expr;
}
