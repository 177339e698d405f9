//! # Query plans
//!
//! Glue between the request boundary and the compilers: a [`ListQuery`] (filter tree,
//! sort spec, optional page) compiles into a [`QueryPlan`] holding the predicate and
//! the query window, and the plan turns the executor's total count into a
//! [`PaginationSummary`].
//!
//! [`ListParams`] is the query-string form (`?filter={..}&sort=[..]&order=[..]&page=0&size=10`)
//! and decodes into a typed [`ListQuery`].

use sea_orm::{Condition, QueryFilter, QueryOrder, QuerySelect};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::errors::QueryError;
use crate::filtering::{FilterExpression, Matcher, Predicate, QueryBackend, Record, compile};
use crate::pagination::{Page, PageRequest, PaginationSummary, QueryWindow};
use crate::sort::{Direction, SortSpec};

/// Page size defaults applied when decoding [`ListParams`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageDefaults {
    /// Size used when only `page` is given.
    pub size: u64,
    /// Larger requested sizes are clamped to this.
    pub max_size: u64,
}

impl Default for PageDefaults {
    fn default() -> Self {
        Self {
            size: 10,
            max_size: 1000,
        }
    }
}

/// Query-string parameters of a list endpoint.
///
/// # Filtering
/// `filter` is a JSON-encoded filter expression for the entity, for example:
/// ```json
/// {"title": {"contains": "rust", "ignoreCase": true}, "or": [{"published": true}]}
/// ```
///
/// # Sorting
/// `sort` is a JSON array of field names and `order` a JSON array of directions,
/// paired by position: `sort=["title","id"]&order=["DESC"]`. A plain comma-separated
/// list (`sort=title,id&order=DESC`) is accepted too. Only fields declared on the
/// entity's filter shape can be sorted by.
///
/// # Pagination
/// `page` (zero-based) and `size`. Omitting both returns every match as one page.
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// JSON-encoded filter expression.
    #[param(example = json!({"title": {"contains": "rust", "ignoreCase": true}}))]
    pub filter: Option<String>,
    /// Sort fields, e.g. `["title","id"]`.
    #[param(example = r#"["title","id"]"#)]
    pub sort: Option<String>,
    /// Sort directions, e.g. `["DESC"]`.
    #[param(example = r#"["DESC"]"#)]
    pub order: Option<String>,
    /// Zero-based page index.
    #[param(example = 0)]
    pub page: Option<u64>,
    /// Page size.
    #[param(example = 10)]
    pub size: Option<u64>,
}

/// A typed list request for an entity whose filter shape is `F`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListQuery<F> {
    #[serde(default = "Option::default")]
    pub filter: Option<F>,
    #[serde(default)]
    pub sort: SortSpec,
    #[serde(default)]
    pub page: Option<PageRequest>,
}

impl<F> Default for ListQuery<F> {
    fn default() -> Self {
        Self {
            filter: None,
            sort: SortSpec::default(),
            page: None,
        }
    }
}

impl<F: DeserializeOwned + FilterExpression> ListQuery<F> {
    /// Decode query-string parameters.
    ///
    /// # Errors
    ///
    /// Returns a [`QueryError`] when `filter`, `sort` or `order` is not valid JSON of the
    /// expected shape, a sort field is empty or not declared on `F`, a direction is
    /// neither ASC nor DESC, or `size` is zero.
    pub fn from_params(params: &ListParams, defaults: PageDefaults) -> Result<Self, QueryError> {
        let filter = parse_filter(params.filter.as_deref())?;

        let sort = SortSpec {
            fields: parse_list("sort", params.sort.as_deref())?,
            directions: Vec::new(),
        };
        sort.validate(F::FIELDS)?;
        let directions = parse_list("order", params.order.as_deref())?
            .iter()
            .map(|direction| direction.parse::<Direction>())
            .collect::<Result<Vec<_>, _>>()?;

        let page = match (params.page, params.size) {
            (None, None) => None,
            (_, Some(0)) => return Err(QueryError::invalid_page("size must be at least 1")),
            (page, size) => {
                let requested = size.unwrap_or(defaults.size);
                let size = requested.min(defaults.max_size);
                if size < requested {
                    tracing::debug!(requested, size, "Clamped page size");
                }
                Some(PageRequest::new(page.unwrap_or(0), size))
            }
        };

        Ok(Self {
            filter,
            sort: SortSpec { directions, ..sort },
            page,
        })
    }
}

/// Decode a JSON-encoded filter expression. A missing or blank value means no filter.
///
/// # Errors
///
/// Returns [`QueryError::InvalidFilter`] when the value does not deserialize into `F`.
pub fn parse_filter<F: DeserializeOwned>(raw: Option<&str>) -> Result<Option<F>, QueryError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => serde_json::from_str(raw)
            .map(Some)
            .map_err(QueryError::invalid_filter),
    }
}

/// A JSON string array, or a plain comma-separated list.
fn parse_list(parameter: &'static str, raw: Option<&str>) -> Result<Vec<String>, QueryError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(Vec::new()),
        Some(raw) if raw.starts_with('[') => {
            serde_json::from_str(raw).map_err(|e| QueryError::invalid_sort(parameter, e))
        }
        Some(raw) => Ok(raw.split(',').map(|s| s.trim().to_owned()).collect()),
    }
}

/// A compiled list request: what to match and which ordered slice to return.
#[derive(Debug, Clone)]
pub struct QueryPlan<E> {
    pub predicate: Predicate<E>,
    pub window: QueryWindow,
    page: Option<PageRequest>,
}

impl<E> QueryPlan<E> {
    /// Compile the filter tree, the sort spec and the page request.
    pub fn compile<B, F>(backend: &B, query: &ListQuery<F>) -> Self
    where
        B: QueryBackend<Expr = E>,
        F: FilterExpression,
    {
        let predicate = compile(backend, query.filter.as_ref());
        let window = QueryWindow::new(query.page, query.sort.compile());
        Self {
            predicate,
            window,
            page: query.page,
        }
    }

    #[must_use]
    pub const fn page_request(&self) -> Option<PageRequest> {
        self.page
    }

    /// Pagination summary for a result set of `total_elements` matches.
    #[must_use]
    pub const fn summarize(&self, total_elements: u64) -> PaginationSummary {
        PaginationSummary::for_request(self.page, total_elements)
    }
}

impl QueryPlan<Condition> {
    /// Attach only the predicate, e.g. to a count query.
    #[must_use]
    pub fn filter<Q: QueryFilter>(&self, query: Q) -> Q {
        self.predicate.clone().apply(query)
    }

    /// Attach predicate, ordering and window to a Sea-ORM select.
    #[must_use]
    pub fn apply<Q>(&self, query: Q) -> Q
    where
        Q: QueryFilter + QueryOrder + QuerySelect,
    {
        self.window.apply(self.filter(query))
    }
}

impl<R: Record> QueryPlan<Matcher<R>> {
    /// Run the plan over records already held in memory.
    pub fn execute<'a>(&self, records: &'a [R]) -> Page<&'a R> {
        let mut matching = self.predicate.select(records);
        let ordering = self.window.ordering();
        if !ordering.is_unsorted() {
            matching.sort_by(|a, b| ordering.compare(*a, *b));
        }
        let total = u64::try_from(matching.len()).unwrap_or(u64::MAX);
        Page::new(self.window.slice(matching), self.summarize(total))
    }
}
