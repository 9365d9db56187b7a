//! Drafts
//!
//! What the user submits for a create or an update. Raw form strings are
//! parsed into a [`Draft`] against the active schema; the store validates
//! the draft again before mutating anything.

use chrono::NaiveDate;

use super::error::ValidationError;
use super::item::ItemFields;
use super::schema::{Column, Schema};

/// Field values awaiting validation
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Draft {
    pub fields: ItemFields,
}

impl Draft {
    pub fn new(fields: ItemFields) -> Self {
        Self { fields }
    }

    pub fn titled(title: impl Into<String>) -> Self {
        Self::new(ItemFields::titled(title))
    }

    /// Trimmed, schema-checked field values
    pub fn into_fields(self, schema: &Schema) -> Result<ItemFields, ValidationError> {
        let mut fields = self.fields;
        fields.title = fields.title.trim().to_string();
        fields.description = non_blank(fields.description);
        fields.status = non_blank(fields.status);
        schema.validate(&fields)?;
        Ok(fields)
    }
}

/// Raw form values, as typed
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormInput {
    pub title: String,
    pub description: String,
    pub amount: String,
    pub due_date: String,
    pub status: String,
    pub priority: String,
    pub completed: bool,
}

impl FormInput {
    /// Prefill the form from an existing item's fields
    pub fn from_fields(fields: &ItemFields) -> Self {
        Self {
            title: fields.title.clone(),
            description: fields.description.clone().unwrap_or_default(),
            amount: fields.amount.map(|a| a.to_string()).unwrap_or_default(),
            due_date: fields
                .due_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            status: fields.status.clone().unwrap_or_default(),
            priority: fields.priority.map(|p| p.to_string()).unwrap_or_default(),
            completed: fields.completed.unwrap_or(false),
        }
    }

    /// Parse the columns the schema uses; other inputs are ignored
    pub fn to_draft(&self, schema: &Schema) -> Result<Draft, ValidationError> {
        let mut fields = ItemFields::titled(self.title.trim());

        if schema.has(Column::Description) {
            fields.description = non_blank(Some(self.description.clone()));
        }
        if schema.has(Column::Amount) {
            fields.amount = parse_amount(&self.amount)?;
        }
        if schema.has(Column::DueDate) {
            fields.due_date = parse_date(&self.due_date)?;
        }
        if schema.has(Column::Status) {
            fields.status = non_blank(Some(self.status.clone()));
        }
        if schema.has(Column::Priority) {
            fields.priority = parse_priority(&self.priority)?.or(schema.rules.default_priority);
        }
        if schema.has(Column::Completed) {
            fields.completed = Some(self.completed);
        }
        Ok(Draft::new(fields))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_amount(raw: &str) -> Result<Option<f64>, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let amount: f64 = raw
        .parse()
        .map_err(|_| ValidationError::AmountNotNumber(raw.to_string()))?;
    if !amount.is_finite() {
        return Err(ValidationError::AmountNotFinite);
    }
    Ok(Some(amount))
}

fn parse_priority(raw: &str) -> Result<Option<i64>, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let priority: i64 = raw
        .parse()
        .map_err(|_| ValidationError::PriorityNotInteger(raw.to_string()))?;
    if priority < 0 {
        return Err(ValidationError::NegativePriority(priority));
    }
    Ok(Some(priority))
}

fn parse_date(raw: &str) -> Result<Option<NaiveDate>, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| ValidationError::BadDate(raw.to_string()))
}
