//! # Errors at the request boundary
//!
//! Compiling filters, orderings and page windows is total and never fails. The only
//! fallible step is decoding the raw request (JSON-encoded query parameters, sort
//! direction names) into the typed values the compilers consume; that step reports a
//! [`QueryError`].
//!
//! Decoding failures are logged with `tracing` at `warn` level, including the
//! underlying parser error where there is one, while [`QueryError::user_message`] stays safe to show to
//! API clients.

use thiserror::Error;

/// Error decoding a list request.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The `filter` parameter is not a valid filter expression for this entity.
    #[error("Invalid filter: {source}")]
    InvalidFilter {
        #[source]
        source: serde_json::Error,
    },

    /// The `sort` / `order` parameters are not JSON string arrays.
    #[error("Invalid sort parameter '{parameter}': {source}")]
    InvalidSort {
        parameter: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A sort field that is empty or not declared on the entity's filter shape.
    #[error("Unknown sort field '{field}'")]
    UnknownSortField { field: String },

    /// A sort direction other than ASC or DESC.
    #[error("Invalid sort direction '{value}', expected ASC or DESC")]
    InvalidDirection { value: String },

    /// `page` / `size` that cannot describe a window.
    #[error("Invalid page request: {message}")]
    InvalidPage { message: String },
}

impl QueryError {
    pub(crate) fn invalid_filter(source: serde_json::Error) -> Self {
        Self::InvalidFilter { source }.logged()
    }

    pub(crate) fn invalid_sort(parameter: &'static str, source: serde_json::Error) -> Self {
        Self::InvalidSort { parameter, source }.logged()
    }

    pub(crate) fn unknown_sort_field(field: impl Into<String>) -> Self {
        Self::UnknownSortField {
            field: field.into(),
        }
        .logged()
    }

    pub(crate) fn invalid_direction(value: impl Into<String>) -> Self {
        Self::InvalidDirection {
            value: value.into(),
        }
        .logged()
    }

    pub(crate) fn invalid_page(message: impl Into<String>) -> Self {
        Self::InvalidPage {
            message: message.into(),
        }
        .logged()
    }

    /// Message suitable for API clients; parser internals are left out.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidFilter { .. } => "Filter must be a valid JSON filter expression".to_string(),
            Self::InvalidSort { parameter, .. } => {
                format!("'{parameter}' must be a JSON array of strings")
            }
            Self::UnknownSortField { field } => format!("Cannot sort by '{field}'"),
            Self::InvalidDirection { value } => {
                format!("Unknown sort direction '{value}', expected ASC or DESC")
            }
            Self::InvalidPage { message } => message.clone(),
        }
    }

    fn logged(self) -> Self {
        match &self {
            Self::InvalidFilter { source } | Self::InvalidSort { source, .. } => {
                tracing::warn!(
                    error = %source,
                    message = %self.user_message(),
                    "Rejected list request"
                );
            }
            Self::UnknownSortField { .. }
            | Self::InvalidDirection { .. }
            | Self::InvalidPage { .. } => {
                tracing::warn!(message = %self.user_message(), "Rejected list request");
            }
        }
        self
    }
}
