//! Table Schemas
//!
//! The front ends differ only in which table they talk to and which columns
//! that table carries. A [`Schema`] captures those differences: naming,
//! listing order, where optimistic inserts land and the validation rules.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::ValidationError;
use super::item::ItemFields;
use super::query::{CompletionFilter, ListFilter, OrderBy, Query};

/// Built-in table layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// `text` + `completed`, newest first
    #[default]
    Todos,
    /// title, amount, description, due date, status; ascending by id
    Entities,
    /// title, description, priority, due date, completed; newest first
    Tasks,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Todos => "todos",
            Variant::Entities => "entities",
            Variant::Tasks => "tasks",
        }
    }

    pub fn schema(&self) -> Schema {
        match self {
            Variant::Todos => Schema::todos(),
            Variant::Entities => Schema::entities(),
            Variant::Tasks => Schema::tasks(),
        }
    }
}

/// A column the UI can show and the store sends to the remote table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Label,
    Description,
    Amount,
    DueDate,
    Status,
    Completed,
    Priority,
}

impl Column {
    /// Header text for tables and forms
    pub fn heading(&self) -> &'static str {
        match self {
            Column::Label => "Title",
            Column::Description => "Description",
            Column::Amount => "Amount",
            Column::DueDate => "Due date",
            Column::Status => "Status",
            Column::Completed => "Done",
            Column::Priority => "Priority",
        }
    }
}

/// Where an optimistic insert is placed in the list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertAt {
    Front,
    Back,
}

/// Validation switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rules {
    /// Amount must be present and finite
    pub amount_required: bool,
    /// Priority falls back to this value when the form leaves it blank
    pub default_priority: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub table: String,
    /// Remote column holding the label (`title` or `text`)
    pub label_column: String,
    pub columns: Vec<Column>,
    pub order: OrderBy,
    pub insert_at: InsertAt,
    pub rules: Rules,
}

impl Schema {
    pub fn todos() -> Self {
        Self {
            table: "todos".into(),
            label_column: "text".into(),
            columns: vec![Column::Label, Column::Completed],
            order: OrderBy::desc("id"),
            insert_at: InsertAt::Front,
            rules: Rules::default(),
        }
    }

    pub fn entities() -> Self {
        Self {
            table: "entities".into(),
            label_column: "title".into(),
            columns: vec![
                Column::Label,
                Column::Amount,
                Column::Description,
                Column::DueDate,
                Column::Status,
            ],
            order: OrderBy::asc("id"),
            insert_at: InsertAt::Back,
            rules: Rules {
                amount_required: true,
                default_priority: None,
            },
        }
    }

    pub fn tasks() -> Self {
        Self {
            table: "tasks".into(),
            label_column: "title".into(),
            columns: vec![
                Column::Label,
                Column::Description,
                Column::Priority,
                Column::DueDate,
                Column::Completed,
            ],
            order: OrderBy::desc("created_at"),
            insert_at: InsertAt::Front,
            rules: Rules {
                amount_required: false,
                default_priority: Some(3),
            },
        }
    }

    pub fn has(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    /// Human name of the label field, used in validation messages
    pub fn label_heading(&self) -> &'static str {
        if self.label_column == "text" { "Text" } else { "Title" }
    }

    /// Header text for a column, naming the label after this table's label column
    pub fn heading(&self, column: Column) -> &'static str {
        match column {
            Column::Label => self.label_heading(),
            other => other.heading(),
        }
    }

    /// Check field values against this schema's rules
    pub fn validate(&self, fields: &ItemFields) -> Result<(), ValidationError> {
        if fields.title.trim().is_empty() {
            return Err(ValidationError::EmptyLabel(self.label_heading().to_string()));
        }
        if self.rules.amount_required {
            match fields.amount {
                None => return Err(ValidationError::MissingAmount),
                Some(amount) if !amount.is_finite() => return Err(ValidationError::AmountNotFinite),
                Some(_) => {}
            }
        }
        if let Some(priority) = fields.priority {
            if priority < 0 {
                return Err(ValidationError::NegativePriority(priority));
            }
        }
        Ok(())
    }

    /// Project field values onto this table's columns, keyed by remote column name
    pub fn payload(&self, fields: &ItemFields) -> Map<String, Value> {
        let mut row = Map::new();
        for column in &self.columns {
            let (name, value) = match column {
                Column::Label => (self.label_column.as_str(), Value::from(fields.title.clone())),
                Column::Description => ("description", option_value(fields.description.clone())),
                Column::Amount => ("amount", option_value(fields.amount)),
                Column::DueDate => (
                    "due_date",
                    option_value(fields.due_date.map(|d| d.format("%Y-%m-%d").to_string())),
                ),
                Column::Status => ("status", option_value(fields.status.clone())),
                Column::Completed => ("completed", Value::from(fields.completed.unwrap_or(false))),
                Column::Priority => ("priority", option_value(fields.priority)),
            };
            row.insert(name.to_string(), value);
        }
        row
    }

    /// Listing query for the current filter bar state
    pub fn query(&self, filter: &ListFilter) -> Query {
        let mut query = Query::new().order(self.order.clone());
        let search = filter.search.trim();
        if !search.is_empty() {
            query = query.ilike(&self.label_column, search);
        }
        if self.has(Column::Completed) {
            query = match filter.completion {
                CompletionFilter::All => query,
                CompletionFilter::Pending => query.equals("completed", false),
                CompletionFilter::Done => query.equals("completed", true),
            };
        }
        query
    }
}

fn option_value<T: Into<Value>>(value: Option<T>) -> Value {
    value.map(Into::into).unwrap_or(Value::Null)
}
