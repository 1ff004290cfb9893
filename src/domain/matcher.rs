//! Matching scraped data against the board
//!
//! Two uses of the same loose comparison: dropping spoilers that are
//! already on the board, and pairing reviews with the board card they
//! describe.

use std::collections::HashSet;

use super::board::BoardCard;
use super::feed_item::FeedItem;
use super::normalize::{NormalizedKey, normalize, primary_face};
use super::review::Review;

/// Basic lands are never filed on the board
pub const BASIC_LANDS: [&str; 5] = ["plains", "island", "swamp", "mountain", "forest"];

pub fn is_basic_land(name: &str) -> bool {
    let key = normalize(name);
    BASIC_LANDS.iter().any(|basic| key.as_str() == *basic)
}

/// Remove basic lands, keeping order
pub fn reject_basic_lands(items: Vec<FeedItem>) -> Vec<FeedItem> {
    items.into_iter().filter(|item| !is_basic_land(&item.name)).collect()
}

/// Scraped items whose name is not loosely contained in `known` names.
///
/// Input order is preserved; applying the filter twice gives the same result.
pub fn filter_new_items<S: AsRef<str>>(scraped: Vec<FeedItem>, known: &[S]) -> Vec<FeedItem> {
    let known_keys: HashSet<NormalizedKey> = known.iter().map(|name| normalize(name.as_ref())).collect();
    scraped
        .into_iter()
        .filter(|item| !known_keys.contains(&normalize(&item.name)))
        .collect()
}

/// A review paired with the board card it annotates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewMatch {
    pub review: Review,
    pub card: BoardCard,
}

fn face_key(name: &str) -> NormalizedKey {
    normalize(primary_face(name))
}

/// Pair every review with the first board card sharing its primary face.
///
/// Returns the unmatched review names (unique, first-seen order) as the
/// error when any review has no card; in that case nothing is paired. A
/// review whose name normalizes to nothing never matches.
pub fn match_reviews(reviews: Vec<Review>, cards: &[BoardCard]) -> Result<Vec<ReviewMatch>, Vec<String>> {
    let card_keys: Vec<(NormalizedKey, &BoardCard)> =
        cards.iter().map(|card| (face_key(&card.name), card)).collect();

    let mut unmatched: Vec<String> = Vec::new();
    let mut matches = Vec::with_capacity(reviews.len());

    for review in reviews {
        let key = face_key(&review.name);
        let card = if key.is_empty() {
            None
        } else {
            card_keys.iter().find(|(card_key, _)| *card_key == key)
        };
        match card {
            Some((_, card)) => matches.push(ReviewMatch { review, card: (*card).clone() }),
            None => {
                if !unmatched.contains(&review.name) {
                    unmatched.push(review.name);
                }
            }
        }
    }

    if unmatched.is_empty() { Ok(matches) } else { Err(unmatched) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str) -> FeedItem {
        FeedItem::new(name, format!("https://feed/{name}"), format!("https://feed/{name}.jpg"))
    }

    fn names(items: &[FeedItem]) -> Vec<&str> {
        items.iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn double_spaced_name_is_already_known() {
        let scraped = vec![item("Kindly  Stranger"), item("Sigarda, Heron's Grace")];
        let known = ["Kindly Stranger"];
        assert_eq!(names(&filter_new_items(scraped, &known)), vec!["Sigarda, Heron's Grace"]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let scraped = vec![item("Angel of Deliverance"), item("Bygone Bishop"), item("Eerie Interlude")];
        let known = ["bygone bishop"];
        let once = filter_new_items(scraped, &known);
        let twice = filter_new_items(once.clone(), &known);
        assert_eq!(once, twice);
        assert_eq!(names(&once), vec!["Angel of Deliverance", "Eerie Interlude"]);
    }

    #[test]
    fn basic_lands_are_rejected_in_any_case() {
        let items = vec![item("Plains"), item("ISLAND"), item("Forest."), item("Forsaken Sanctuary")];
        assert_eq!(names(&reject_basic_lands(items)), vec!["Forsaken Sanctuary"]);
        assert!(!is_basic_land("Snow-Covered Forest"));
    }

    #[test]
    fn reviews_match_primary_face() {
        let cards = vec![
            BoardCard::new("c1", "Delver of Secrets // Insectile Aberration"),
            BoardCard::new("c2", "Thraben Inspector"),
        ];
        let reviews = vec![
            Review::new("Delver of Secrets", "2.0 // 2.0", "a"),
            Review::new("Thraben Inspector.", "3.0", "b"),
        ];
        let matched = match_reviews(reviews, &cards).unwrap();
        assert_eq!(matched[0].card.id, "c1");
        assert_eq!(matched[1].card.id, "c2");
    }

    #[test]
    fn first_matching_card_wins() {
        let cards = vec![BoardCard::new("first", "Avacynian Priest"), BoardCard::new("second", "avacynian priest")];
        let matched = match_reviews(vec![Review::new("Avacynian Priest", "2.5", "")], &cards).unwrap();
        assert_eq!(matched[0].card.id, "first");
    }

    #[test]
    fn unmatched_reviews_are_reported_once() {
        let cards = vec![BoardCard::new("a", "Alpha")];
        let reviews = vec![
            Review::new("Alpha", "1.0", ""),
            Review::new("Beta", "1.0", ""),
            Review::new("Beta", "1.5", ""),
        ];
        assert_eq!(match_reviews(reviews, &cards), Err(vec!["Beta".to_string()]));
    }

    #[test]
    fn nameless_review_never_matches() {
        let cards = vec![BoardCard::new("a", "Alpha"), BoardCard::new("blank", "??")];
        let reviews = vec![Review::new("Alpha", "1.0", ""), Review::new("", "1.0", "")];
        assert_eq!(match_reviews(reviews, &cards), Err(vec![String::new()]));
    }
}
