//! Domain module - Core sync logic and entities
//!
//! This module contains the board/feed entities, the loose text matching
//! rules and the list classifier. Nothing in here performs I/O; the
//! collaborator traits live in [`services`] and are implemented by the
//! infrastructure layer.

pub mod board;
pub mod classifier;
pub mod feed_item;
pub mod matcher;
pub mod normalize;
pub mod review;
pub mod services;

// Re-export commonly used items for convenience
pub use board::{BoardCard, BoardList, BoardSnapshot};
pub use classifier::{CardColor, target_list_name};
pub use feed_item::FeedItem;
pub use matcher::{ReviewMatch, filter_new_items, match_reviews, reject_basic_lands};
pub use normalize::{NormalizedKey, contains_loose, eq_loose, normalize, primary_face};
pub use review::{RatingScale, Review};
pub use services::{BoardRepository, CardPosition, PageSource};
