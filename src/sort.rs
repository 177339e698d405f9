use sea_orm::{
    Order, QueryOrder,
    sea_query::{Alias, Expr, SimpleExpr},
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering as CmpOrdering;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::errors::QueryError;
use crate::filtering::memory::Record;

/// Sort direction for one key.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl FromStr for Direction {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("ASC") {
            Ok(Self::Asc)
        } else if s.eq_ignore_ascii_case("DESC") {
            Ok(Self::Desc)
        } else {
            Err(QueryError::invalid_direction(s))
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        })
    }
}

impl From<Direction> for Order {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Asc => Self::Asc,
            Direction::Desc => Self::Desc,
        }
    }
}

/// Parallel lists of sort fields and directions, as received from the caller.
///
/// `directions[i]` applies to `fields[i]`; missing directions default to ascending and
/// surplus directions are ignored.
///
/// ```json
/// {"fields": ["title", "id"], "directions": ["DESC"]}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SortSpec {
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default)]
    pub directions: Vec<Direction>,
}

impl SortSpec {
    #[must_use]
    pub fn compile(&self) -> Ordering {
        Ordering::compile(&self.fields, &self.directions)
    }

    /// Check every field against the names the entity allows sorting by.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::UnknownSortField`] for the first field that is empty or not
    /// in `allowed`.
    pub fn validate(&self, allowed: &[&str]) -> Result<(), QueryError> {
        match self
            .fields
            .iter()
            .find(|field| field.is_empty() || !allowed.contains(&field.as_str()))
        {
            Some(field) => Err(QueryError::unknown_sort_field(field.as_str())),
            None => Ok(()),
        }
    }

    /// [`validate`](Self::validate), then [`compile`](Self::compile).
    ///
    /// # Errors
    ///
    /// Same as [`validate`](Self::validate).
    pub fn compile_allowed(&self, allowed: &[&str]) -> Result<Ordering, QueryError> {
        self.validate(allowed)?;
        Ok(self.compile())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub direction: Direction,
}

/// A multi-key ordering, primary key first. Empty means unsorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ordering {
    keys: Vec<SortKey>,
}

impl Ordering {
    /// Pair `fields` with `directions` positionally.
    #[must_use]
    pub fn compile<S: AsRef<str>>(fields: &[S], directions: &[Direction]) -> Self {
        let keys = fields
            .iter()
            .enumerate()
            .map(|(i, field)| SortKey {
                field: field.as_ref().to_owned(),
                direction: directions.get(i).copied().unwrap_or_default(),
            })
            .collect();
        Self { keys }
    }

    #[must_use]
    pub const fn unsorted() -> Self {
        Self { keys: Vec::new() }
    }

    #[must_use]
    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    #[must_use]
    pub fn is_unsorted(&self) -> bool {
        self.keys.is_empty()
    }

    /// Add one `ORDER BY` term per key to a Sea-ORM query. Field names are used as
    /// column identifiers.
    #[must_use]
    pub fn apply<Q: QueryOrder>(&self, query: Q) -> Q {
        self.keys.iter().fold(query, |query, key| {
            let column: SimpleExpr = Expr::col(Alias::new(key.field.as_str())).into();
            query.order_by(column, Order::from(key.direction))
        })
    }

    /// Compare two records key by key. A record missing a field sorts before one that
    /// has it (in ascending order); values of mismatched kinds compare equal.
    pub fn compare<R: Record>(&self, a: &R, b: &R) -> CmpOrdering {
        for key in &self.keys {
            let ordering = match (a.field(&key.field), b.field(&key.field)) {
                (None, None) => CmpOrdering::Equal,
                (None, Some(_)) => CmpOrdering::Less,
                (Some(_), None) => CmpOrdering::Greater,
                (Some(lhs), Some(rhs)) => lhs.compare(&rhs).unwrap_or(CmpOrdering::Equal),
            };
            let ordering = match key.direction {
                Direction::Asc => ordering,
                Direction::Desc => ordering.reverse(),
            };
            if ordering != CmpOrdering::Equal {
                return ordering;
            }
        }
        CmpOrdering::Equal
    }

    /// Stable in-place sort of records.
    pub fn sort_records<R: Record>(&self, records: &mut [R]) {
        if self.is_unsorted() {
            return;
        }
        records.sort_by(|a, b| self.compare(a, b));
    }
}
