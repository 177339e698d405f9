//! Boolean algebra over backend predicates.
//!
//! `AlwaysTrue` is the neutral element of AND and absorbs OR; `AlwaysFalse` is the
//! neutral element of OR and absorbs AND. The folds mirror that: an empty conjunction
//! matches everything, an empty disjunction matches nothing.

use super::backend::QueryBackend;

/// A compiled predicate for a backend whose native fragment type is `E`.
#[derive(Debug, Clone)]
pub enum Predicate<E> {
    /// Matches every record.
    AlwaysTrue,
    /// Matches no record.
    AlwaysFalse,
    /// A real constraint in the backend's own representation.
    Expr(E),
}

impl<E> Predicate<E> {
    #[must_use]
    pub const fn is_always_true(&self) -> bool {
        matches!(self, Self::AlwaysTrue)
    }

    #[must_use]
    pub const fn is_always_false(&self) -> bool {
        matches!(self, Self::AlwaysFalse)
    }

    /// The backend fragment, if this predicate constrains anything.
    #[must_use]
    pub fn into_expr(self) -> Option<E> {
        match self {
            Self::Expr(expr) => Some(expr),
            Self::AlwaysTrue | Self::AlwaysFalse => None,
        }
    }

    /// Replace the fragment type, keeping the identity variants as they are.
    pub fn map<F, T>(self, f: F) -> Predicate<T>
    where
        F: FnOnce(E) -> T,
    {
        match self {
            Self::AlwaysTrue => Predicate::AlwaysTrue,
            Self::AlwaysFalse => Predicate::AlwaysFalse,
            Self::Expr(expr) => Predicate::Expr(f(expr)),
        }
    }
}

impl<E> From<bool> for Predicate<E> {
    fn from(value: bool) -> Self {
        if value {
            Self::AlwaysTrue
        } else {
            Self::AlwaysFalse
        }
    }
}

/// Logical AND of two predicates.
pub fn and<B: QueryBackend>(
    backend: &B,
    lhs: Predicate<B::Expr>,
    rhs: Predicate<B::Expr>,
) -> Predicate<B::Expr> {
    match (lhs, rhs) {
        (Predicate::AlwaysFalse, _) | (_, Predicate::AlwaysFalse) => Predicate::AlwaysFalse,
        (Predicate::AlwaysTrue, other) | (other, Predicate::AlwaysTrue) => other,
        (Predicate::Expr(lhs), Predicate::Expr(rhs)) => Predicate::Expr(backend.and(lhs, rhs)),
    }
}

/// Logical OR of two predicates.
pub fn or<B: QueryBackend>(
    backend: &B,
    lhs: Predicate<B::Expr>,
    rhs: Predicate<B::Expr>,
) -> Predicate<B::Expr> {
    match (lhs, rhs) {
        (Predicate::AlwaysTrue, _) | (_, Predicate::AlwaysTrue) => Predicate::AlwaysTrue,
        (Predicate::AlwaysFalse, other) | (other, Predicate::AlwaysFalse) => other,
        (Predicate::Expr(lhs), Predicate::Expr(rhs)) => Predicate::Expr(backend.or(lhs, rhs)),
    }
}

/// Logical NOT. Negating an absent predicate is still "no filter", not "match nothing".
pub fn negate<B: QueryBackend>(
    backend: &B,
    predicate: Option<Predicate<B::Expr>>,
) -> Predicate<B::Expr> {
    match predicate {
        None | Some(Predicate::AlwaysFalse) => Predicate::AlwaysTrue,
        Some(Predicate::AlwaysTrue) => Predicate::AlwaysFalse,
        Some(Predicate::Expr(expr)) => Predicate::Expr(backend.not(expr)),
    }
}

/// Conjunction of every predicate; `AlwaysTrue` for an empty input.
pub fn all<B, I>(backend: &B, predicates: I) -> Predicate<B::Expr>
where
    B: QueryBackend,
    I: IntoIterator<Item = Predicate<B::Expr>>,
{
    predicates
        .into_iter()
        .fold(Predicate::AlwaysTrue, |acc, next| and(backend, acc, next))
}

/// Disjunction of every predicate; `AlwaysFalse` for an empty input.
///
/// Seeding this fold with `AlwaysTrue` would make an empty `or` list match every
/// record, which is wrong: an empty disjunction has no alternative that can hold.
pub fn any<B, I>(backend: &B, predicates: I) -> Predicate<B::Expr>
where
    B: QueryBackend,
    I: IntoIterator<Item = Predicate<B::Expr>>,
{
    predicates
        .into_iter()
        .fold(Predicate::AlwaysFalse, |acc, next| or(backend, acc, next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filtering::backend::Comparison;
    use chrono::{DateTime, Utc};

    /// Renders predicates as strings so the shape of the result is visible.
    struct Render;

    impl QueryBackend for Render {
        type Expr = String;

        fn and(&self, lhs: String, rhs: String) -> String {
            format!("({lhs} AND {rhs})")
        }

        fn or(&self, lhs: String, rhs: String) -> String {
            format!("({lhs} OR {rhs})")
        }

        fn not(&self, expr: String) -> String {
            format!("NOT {expr}")
        }

        fn string_equals(&self, field: &str, value: &str, _ignore_case: bool) -> String {
            format!("{field} = {value}")
        }

        fn string_contains(&self, field: &str, value: &str, _ignore_case: bool) -> String {
            format!("{field} ~ {value}")
        }

        fn compare_int(&self, field: &str, comparison: Comparison, value: i64) -> String {
            format!("{field} {comparison:?} {value}")
        }

        fn compare_date_time(
            &self,
            field: &str,
            comparison: Comparison,
            value: DateTime<Utc>,
        ) -> String {
            format!("{field} {comparison:?} {value}")
        }

        fn bool_equals(&self, field: &str, value: bool) -> String {
            format!("{field} = {value}")
        }
    }

    fn leaf(name: &str) -> Predicate<String> {
        Predicate::Expr(name.to_string())
    }

    #[test]
    fn test_empty_all_is_always_true() {
        assert!(all(&Render, Vec::new()).is_always_true());
    }

    #[test]
    fn test_empty_any_is_always_false() {
        // The asymmetry matters: an empty OR must not match everything
        assert!(any(&Render, Vec::new()).is_always_false());
    }

    #[test]
    fn test_identities_fold_out() {
        let p = and(&Render, leaf("a"), Predicate::AlwaysTrue);
        assert_eq!(p.into_expr().as_deref(), Some("a"));

        let p = or(&Render, Predicate::AlwaysFalse, leaf("a"));
        assert_eq!(p.into_expr().as_deref(), Some("a"));
    }

    #[test]
    fn test_absorbing_elements() {
        assert!(and(&Render, leaf("a"), Predicate::AlwaysFalse).is_always_false());
        assert!(or(&Render, Predicate::AlwaysTrue, leaf("a")).is_always_true());
    }

    #[test]
    fn test_negation() {
        assert!(negate(&Render, Some(Predicate::AlwaysTrue)).is_always_false());
        assert!(negate(&Render, Some(Predicate::AlwaysFalse)).is_always_true());
        assert!(negate::<Render>(&Render, None).is_always_true());
        assert_eq!(
            negate(&Render, Some(leaf("a"))).into_expr().as_deref(),
            Some("NOT a")
        );
    }

    #[test]
    fn test_folds_keep_order() {
        let p = all(&Render, vec![leaf("a"), Predicate::AlwaysTrue, leaf("b")]);
        assert_eq!(p.into_expr().as_deref(), Some("(a AND b)"));

        let p = any(&Render, vec![leaf("a"), leaf("b"), leaf("c")]);
        assert_eq!(p.into_expr().as_deref(), Some("((a OR b) OR c)"));
    }

    #[test]
    fn test_from_bool() {
        assert!(Predicate::<String>::from(true).is_always_true());
        assert!(Predicate::<String>::from(false).is_always_false());
    }
}
