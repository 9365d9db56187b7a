//! UI Components
//!
//! Reusable Leptos components.

mod item_form;
mod filter_bar;
mod item_table;
mod item_row;
mod pager;
mod notice_stack;
mod details_panel;
mod delete_confirm_button;
mod activity_log;

pub use item_form::ItemForm;
pub use filter_bar::FilterBar;
pub use item_table::ItemTable;
pub use item_row::ItemRow;
pub use pager::Pager;
pub use notice_stack::NoticeStack;
pub use details_panel::DetailsPanel;
pub use delete_confirm_button::DeleteConfirmButton;
pub use activity_log::ActivityLog;
