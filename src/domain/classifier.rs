//! Target list classification
//!
//! Decides which board list a card belongs in from its `color` and `type`
//! attributes. Dual-faced cards carry compound attributes ("White, Black",
//! "Creature, Creature"); those are reduced to a single face and classified
//! again.

use super::feed_item::FeedItem;

/// List for cards whose color could not be determined
pub const UNKNOWN_LIST: &str = "Unknown";
/// List for colorless artifacts
pub const ARTIFACT_LIST: &str = "Artifact";
/// Color value the feed uses for colorless cards
pub const COLORLESS: &str = "Colorless";

const LEGENDARY_PREFIX: &str = "Legendary ";

/// Color attribute of a card, as the classifier sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardColor<'a> {
    Absent,
    Colorless,
    Single(&'a str),
    /// Color of a dual-faced card. `transformed` is the text after the last
    /// comma, skipping the comma and one separator character.
    /// The offset counts bytes, so a multibyte character right after the
    /// comma yields an empty color; the feed always puts a space there.
    Compound { transformed: &'a str },
}

impl<'a> CardColor<'a> {
    pub fn parse(color: Option<&'a str>) -> Self {
        match color {
            None | Some("") => Self::Absent,
            Some(COLORLESS) => Self::Colorless,
            Some(c) => match c.rfind(',') {
                // Fixed offset: comma plus one separator character
                Some(idx) => Self::Compound {
                    transformed: c.get(idx + 2..).unwrap_or(""),
                },
                None => Self::Single(c),
            },
        }
    }
}

/// Name of the list `item` should be filed into
pub fn target_list_name(item: &FeedItem) -> String {
    classify(item.color(), item.card_type())
}

/// Pure classification over raw attribute values.
///
/// Recursion depth is at most one: the transformed color of a compound
/// color never contains a comma.
pub fn classify(color: Option<&str>, card_type: Option<&str>) -> String {
    match CardColor::parse(color) {
        CardColor::Absent => UNKNOWN_LIST.to_string(),
        CardColor::Colorless => colorless_list(card_type.unwrap_or("")),
        CardColor::Compound { transformed } => {
            classify(Some(transformed), card_type.map(front_type_segment))
        }
        CardColor::Single(c) => c.to_string(),
    }
}

fn colorless_list(card_type: &str) -> String {
    if card_type.contains(ARTIFACT_LIST) {
        return ARTIFACT_LIST.to_string();
    }
    let stripped = card_type.replacen(LEGENDARY_PREFIX, "", 1);
    if stripped.trim().is_empty() {
        UNKNOWN_LIST.to_string()
    } else {
        stripped
    }
}

/// Type of the front face: everything before the first comma
fn front_type_segment(card_type: &str) -> &str {
    card_type.find(',').map_or(card_type, |idx| &card_type[..idx])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn card(color: Option<&str>, card_type: Option<&str>) -> FeedItem {
        let mut item = FeedItem::new("Test Card", "https://feed/test", "https://feed/test.jpg");
        if let Some(c) = color {
            item = item.with_attribute("color", c);
        }
        if let Some(t) = card_type {
            item = item.with_attribute("type", t);
        }
        item
    }

    #[rstest]
    #[case(None, Some("Creature"), "Unknown")]
    #[case(Some(""), Some("Creature"), "Unknown")]
    #[case(Some("Colorless"), Some("Legendary Artifact Creature"), "Artifact")]
    #[case(Some("Colorless"), Some("Artifact"), "Artifact")]
    #[case(Some("Colorless"), Some("Legendary Land"), "Land")]
    #[case(Some("Colorless"), Some("Land"), "Land")]
    #[case(Some("Colorless"), None, "Unknown")]
    #[case(Some("White, Black"), Some("Creature, Creature"), "Black")]
    #[case(Some("Blue, Colorless"), Some("Creature, Artifact Creature"), "Creature")]
    #[case(Some("Blue, Colorless"), Some("Legendary Land, Creature"), "Land")]
    #[case(Some("Green"), Some("Sorcery"), "Green")]
    #[case(Some("Multicolored"), Some("Legendary Creature"), "Multicolored")]
    fn classifies_cards(
        #[case] color: Option<&str>,
        #[case] card_type: Option<&str>,
        #[case] expected: &str,
    ) {
        assert_eq!(target_list_name(&card(color, card_type)), expected);
    }

    #[test]
    fn compound_color_keeps_text_after_last_comma() {
        assert_eq!(
            CardColor::parse(Some("Red, Green, Blue")),
            CardColor::Compound { transformed: "Blue" }
        );
    }

    #[test]
    fn multibyte_after_comma_reduces_to_unknown() {
        assert_eq!(CardColor::parse(Some("White,é")), CardColor::Compound { transformed: "" });
        assert_eq!(classify(Some("White,é"), Some("Creature")), "Unknown");
    }

    #[test]
    fn trailing_comma_reduces_to_unknown() {
        assert_eq!(classify(Some("White,"), Some("Creature")), "Unknown");
    }

    #[test]
    fn classification_is_pure() {
        let item = card(Some("White, Black"), Some("Creature, Creature"));
        assert_eq!(target_list_name(&item), target_list_name(&item));
        assert_eq!(item.color(), Some("White, Black"));
    }
}
