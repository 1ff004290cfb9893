//! Spoiler Sync
//!
//! Keeps a Trello board in step with a paginated card spoiler feed and
//! annotates the board's cards with set review ratings.

pub mod application;
pub mod domain;
pub mod infrastructure;
