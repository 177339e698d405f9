//! Recursive filter expressions and their compilation into a single predicate.

use super::algebra::{self, Predicate};
use super::backend::QueryBackend;

/// A per-entity filter shape: a set of optional leaf filters plus nested
/// `and` / `or` / `not` sub-expressions of the same shape.
///
/// Shapes are normally declared with [`filter_expression!`](crate::filter_expression).
pub trait FilterExpression: Sized {
    /// Field names declared on the shape. These are also the only names a list
    /// request may sort by.
    const FIELDS: &'static [&'static str];

    /// Conjunction of this node's own leaf filters (`AlwaysTrue` when none are set).
    fn leaf_predicate<B: QueryBackend>(&self, backend: &B) -> Predicate<B::Expr>;

    fn and_clauses(&self) -> &[Self];

    fn or_clauses(&self) -> &[Self];

    fn not_clause(&self) -> Option<&Self>;

    /// Number of nodes in the tree rooted here.
    fn node_count(&self) -> usize {
        1 + self
            .and_clauses()
            .iter()
            .chain(self.or_clauses())
            .chain(self.not_clause())
            .map(Self::node_count)
            .sum::<usize>()
    }

    /// Nesting depth of the tree rooted here; a lone node has depth 1.
    fn depth(&self) -> usize {
        1 + self
            .and_clauses()
            .iter()
            .chain(self.or_clauses())
            .chain(self.not_clause())
            .map(Self::depth)
            .max()
            .unwrap_or(0)
    }
}

/// Compile an optional filter tree into one predicate.
///
/// The node's own leaf filters, its `and` children and its negated `not` child form one
/// conjunctive clause; its `or` children are alternatives to that clause. With no `or`
/// children the disjunction is `AlwaysFalse` and the result is just the clause.
///
/// Compilation never fails. Contradictory bounds simply compile to a predicate that
/// matches nothing.
pub fn compile<B, F>(backend: &B, expression: Option<&F>) -> Predicate<B::Expr>
where
    B: QueryBackend,
    F: FilterExpression,
{
    let Some(expression) = expression else {
        return Predicate::AlwaysTrue;
    };

    tracing::debug!(
        nodes = expression.node_count(),
        depth = expression.depth(),
        "Compiling filter expression"
    );
    compile_node(backend, expression)
}

fn compile_node<B, F>(backend: &B, expression: &F) -> Predicate<B::Expr>
where
    B: QueryBackend,
    F: FilterExpression,
{
    let own = expression.leaf_predicate(backend);
    let and = algebra::all(
        backend,
        expression
            .and_clauses()
            .iter()
            .map(|clause| compile_node(backend, clause)),
    );
    let not = algebra::negate(
        backend,
        expression
            .not_clause()
            .map(|clause| compile_node(backend, clause)),
    );
    let or = algebra::any(
        backend,
        expression
            .or_clauses()
            .iter()
            .map(|clause| compile_node(backend, clause)),
    );

    algebra::or(backend, algebra::all(backend, [own, and, not]), or)
}

/// Declare an entity's filter shape.
///
/// Each listed field becomes an optional leaf filter; the generated struct also carries
/// `and`, `or` and `not` sub-expressions and implements
/// [`FilterExpression`](crate::filtering::FilterExpression). The field identifier is the
/// name handed to the backend (the column name for SQL) and one of the names a list
/// request may sort by. JSON keys are camelCase.
///
/// The calling crate needs `serde` as a dependency.
///
/// ```rust,ignore
/// crudfilter::filter_expression! {
///     /// Filter over courses.
///     pub struct CourseFilter {
///         id: IntFilter,
///         title: StringFilter,
///         published: bool,
///     }
/// }
/// ```
#[macro_export]
macro_rules! filter_expression {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field:ident : $leaf:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(rename_all = "camelCase")]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                #[serde(default, skip_serializing_if = "Option::is_none")]
                pub $field: ::core::option::Option<$leaf>,
            )*
            #[serde(default, skip_serializing_if = "Vec::is_empty")]
            pub and: ::std::vec::Vec<$name>,
            #[serde(default, skip_serializing_if = "Vec::is_empty")]
            pub or: ::std::vec::Vec<$name>,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub not: ::core::option::Option<::std::boxed::Box<$name>>,
        }

        impl $crate::filtering::FilterExpression for $name {
            const FIELDS: &'static [&'static str] = &[$(stringify!($field)),*];

            fn leaf_predicate<B: $crate::filtering::QueryBackend>(
                &self,
                backend: &B,
            ) -> $crate::filtering::Predicate<B::Expr> {
                $crate::filtering::algebra::all(
                    backend,
                    [
                        $(
                            $crate::filtering::leaf_predicate(
                                backend,
                                stringify!($field),
                                self.$field.as_ref(),
                            ),
                        )*
                    ],
                )
            }

            fn and_clauses(&self) -> &[Self] {
                &self.and
            }

            fn or_clauses(&self) -> &[Self] {
                &self.or
            }

            fn not_clause(&self) -> ::core::option::Option<&Self> {
                self.not.as_deref()
            }
        }
    };
}
