//! Store Layer
//!
//! The optimistic item list, its pagination, outcomes, the shared async
//! actions and a driver that owns everything they need.

mod pagination;
mod notice;
mod outcome;
mod item_list;
mod follow_up;
pub mod actions;
mod driver;

#[cfg(test)]
mod tests;

pub use pagination::{clamp_page, page_bounds, page_count};
pub use notice::{Notice, NoticeKind};
pub use outcome::{CreateOutcome, FollowUp, LoadOutcome, SyncOutcome};
pub use item_list::{CreateTicket, ItemList, RemoveTicket, UpdateTicket};
pub use follow_up::settle;
pub use actions::ListAccess;
pub use driver::ItemStore;
