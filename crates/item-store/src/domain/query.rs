//! Listing Query
//!
//! The subset of the hosted backend's query surface the store relies on:
//! equality and case-insensitive substring filters plus one order clause.

use serde_json::Value;

/// Sort direction and column for a listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub ascending: bool,
}

impl OrderBy {
    pub fn asc(column: &str) -> Self {
        Self { column: column.to_string(), ascending: true }
    }

    pub fn desc(column: &str) -> Self {
        Self { column: column.to_string(), ascending: false }
    }
}

/// A filter predicate on one column
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Equals { column: String, value: Value },
    /// Case-insensitive "contains"
    ILike { column: String, needle: String },
}

/// Filters are ANDed together
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub order: Option<OrderBy>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn equals(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Equals {
            column: column.to_string(),
            value: value.into(),
        });
        self
    }

    pub fn ilike(mut self, column: &str, needle: &str) -> Self {
        self.filters.push(Filter::ILike {
            column: column.to_string(),
            needle: needle.to_string(),
        });
        self
    }

    pub fn order(mut self, order: OrderBy) -> Self {
        self.order = Some(order);
        self
    }
}

/// Search text and completion selector as entered in the filter bar
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListFilter {
    pub search: String,
    pub completion: CompletionFilter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompletionFilter {
    #[default]
    All,
    Pending,
    Done,
}

impl CompletionFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompletionFilter::All => "all",
            CompletionFilter::Pending => "pending",
            CompletionFilter::Done => "done",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "pending" => CompletionFilter::Pending,
            "done" => CompletionFilter::Done,
            _ => CompletionFilter::All,
        }
    }
}
