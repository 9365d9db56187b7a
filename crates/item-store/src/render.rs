//! Display Helpers
//!
//! Text shown to the user is escaped before it is placed into markup.

use chrono::{DateTime, Utc};

use crate::domain::{Column, Item, Schema};

/// Entity-escape `& < > " '`
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Plain-text cell value for a column
pub fn cell_text(item: &Item, column: Column) -> String {
    let fields = &item.fields;
    match column {
        Column::Label => fields.title.clone(),
        Column::Description => fields.description.clone().unwrap_or_default(),
        Column::Amount => fields.amount.map(|a| a.to_string()).unwrap_or_default(),
        Column::DueDate => fields
            .due_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        Column::Status => fields.status.clone().unwrap_or_default(),
        Column::Completed => match fields.completed {
            Some(true) => "Yes".to_string(),
            Some(false) => "No".to_string(),
            None => String::new(),
        },
        Column::Priority => fields.priority.map(|p| p.to_string()).unwrap_or_default(),
    }
}

pub fn format_created_at(created_at: Option<&DateTime<Utc>>) -> String {
    created_at
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

/// Definition list of every field the schema carries, values escaped
pub fn details_html(item: &Item, schema: &Schema) -> String {
    let mut html = String::from("<dl class=\"details\">");
    let id = item
        .remote_id()
        .map(|id| id.to_string())
        .unwrap_or_else(|| "local only".to_string());
    push_entry(&mut html, "Id", &id);
    for column in &schema.columns {
        push_entry(&mut html, schema.heading(*column), &cell_text(item, *column));
    }
    push_entry(&mut html, "Created at", &format_created_at(item.created_at.as_ref()));
    html.push_str("</dl>");
    html
}

fn push_entry(html: &mut String, term: &str, value: &str) {
    html.push_str("<dt>");
    html.push_str(&escape_html(term));
    html.push_str("</dt><dd>");
    html.push_str(&escape_html(value));
    html.push_str("</dd>");
}
