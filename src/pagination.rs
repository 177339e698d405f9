use sea_orm::{QueryOrder, QuerySelect};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::sort::Ordering;

/// A zero-based page index and a page size.
///
/// A size of 0 is treated as 1 everywhere in this module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
}

impl PageRequest {
    #[must_use]
    pub const fn new(page: u64, size: u64) -> Self {
        Self { page, size }
    }

    /// Page size with the zero case clamped to 1.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        if self.size == 0 { 1 } else { self.size }
    }

    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.page.saturating_mul(self.limit())
    }
}

/// The slice of the ordered result set a query should return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryWindow {
    Paged {
        offset: u64,
        limit: u64,
        ordering: Ordering,
    },
    /// Every matching record, still in order.
    Unpaged { ordering: Ordering },
}

impl QueryWindow {
    /// Window for an optional page request; no request means unpaged.
    #[must_use]
    pub fn new(page: Option<PageRequest>, ordering: Ordering) -> Self {
        let window = match page {
            Some(page) => Self::Paged {
                offset: page.offset(),
                limit: page.limit(),
                ordering,
            },
            None => Self::Unpaged { ordering },
        };
        tracing::trace!(?window, "Built query window");
        window
    }

    #[must_use]
    pub const fn ordering(&self) -> &Ordering {
        match self {
            Self::Paged { ordering, .. } | Self::Unpaged { ordering } => ordering,
        }
    }

    #[must_use]
    pub const fn is_paged(&self) -> bool {
        matches!(self, Self::Paged { .. })
    }

    /// Attach ordering and, when paged, `OFFSET` / `LIMIT` to a Sea-ORM select.
    #[must_use]
    pub fn apply<Q: QueryOrder + QuerySelect>(&self, query: Q) -> Q {
        let query = self.ordering().apply(query);
        match self {
            Self::Paged { offset, limit, .. } => query.offset(*offset).limit(*limit),
            Self::Unpaged { .. } => query,
        }
    }

    /// Apply the window to records that are already filtered and sorted in memory.
    #[must_use]
    pub fn slice<T>(&self, records: Vec<T>) -> Vec<T> {
        match self {
            Self::Paged { offset, limit, .. } => records
                .into_iter()
                .skip(usize::try_from(*offset).unwrap_or(usize::MAX))
                .take(usize::try_from(*limit).unwrap_or(usize::MAX))
                .collect(),
            Self::Unpaged { .. } => records,
        }
    }
}

/// Pagination metadata returned to API clients.
///
/// ```json
/// {"page": 0, "size": 10, "totalElements": 20, "totalPages": 2, "hasNext": true}
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationSummary {
    pub page: u64,
    pub size: u64,
    pub total_elements: u64,
    pub total_pages: u64,
    pub has_next: bool,
}

impl PaginationSummary {
    /// Summary for one page of a result set with `total_elements` matches.
    #[must_use]
    pub const fn from_page(request: PageRequest, total_elements: u64) -> Self {
        let size = request.limit();
        let total_pages = total_elements.div_ceil(size);
        Self {
            page: request.page,
            size,
            total_elements,
            total_pages,
            has_next: request.page.saturating_add(1) < total_pages,
        }
    }

    /// Summary when the caller did not paginate: one page holding everything.
    #[must_use]
    pub const fn unpaged(total_elements: u64) -> Self {
        Self {
            page: 0,
            size: total_elements,
            total_elements,
            total_pages: 1,
            has_next: false,
        }
    }

    /// Summary for an optional page request.
    #[must_use]
    pub const fn for_request(request: Option<PageRequest>, total_elements: u64) -> Self {
        match request {
            Some(request) => Self::from_page(request, total_elements),
            None => Self::unpaged(total_elements),
        }
    }

    /// React-Admin style `Content-Range` value, e.g. `courses 0-9/20`.
    ///
    /// A page holding no elements (an empty result, or a page past the end) has no
    /// range and renders as `courses */20`.
    ///
    /// Control and non-ASCII characters are stripped from `resource_name` so the value
    /// is always a valid header.
    #[must_use]
    pub fn content_range(&self, resource_name: &str) -> String {
        let safe_name: String = resource_name
            .chars()
            .filter(|c| c.is_ascii() && !c.is_ascii_control())
            .collect();
        let start = self.page.saturating_mul(self.size);
        if self.size == 0 || start >= self.total_elements {
            return format!("{safe_name} */{}", self.total_elements);
        }
        let end = start.saturating_add(self.size).min(self.total_elements) - 1;
        format!("{safe_name} {start}-{end}/{}", self.total_elements)
    }
}

/// A page of results together with its pagination summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub pagination: PaginationSummary,
}

impl<T> Page<T> {
    #[must_use]
    pub const fn new(content: Vec<T>, pagination: PaginationSummary) -> Self {
        Self {
            content,
            pagination,
        }
    }

    /// Convert every item, e.g. from a database model to an API struct.
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}
