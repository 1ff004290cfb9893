//! Set review entries and their board annotation text

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::normalize::FACE_DELIMITER;

/// One card review scraped from a set review article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub name: String,
    /// One rating per face, e.g. "3.5" or "3.0 // 2.5"
    pub rating: String,
    pub text: String,
}

impl Review {
    pub fn new(name: impl Into<String>, rating: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rating: rating.into(),
            text: text.into(),
        }
    }

    /// Individual face ratings of the rating expression
    pub fn face_ratings(&self) -> impl Iterator<Item = &str> {
        self.rating.split(FACE_DELIMITER).map(str::trim)
    }
}

/// Limited rating scale: rating value to its description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingScale {
    descriptions: BTreeMap<String, String>,
}

impl Default for RatingScale {
    fn default() -> Self {
        let entries = [
            ("5.0", "The best of the best. (Gideon, Ally of Zendikar. Quarantine Field. Linvala, the Preserver.)"),
            ("4.5", "Incredible bomb, but not unbeatable. (Ruinous Path. Drana, Liberator of Malakir. Guardian of Tazeem.)"),
            ("4.0", "Good rare or top-tier uncommon. (Tyrant of Valakut. Roil Spout. Nissa’s Judgment.)"),
            ("3.5", "Top-tier common or solid uncommon. (Oblivion Strike. Isolation Zone. Eldrazi Skyspawner.)"),
            ("3.0", "Good playable that basically always makes the cut. (Benthic Infiltrator. Touch of the Void. Stalking Drone.)"),
            ("2.5", "Solid playable that rarely gets cut. (Expedition Raptor. Makindi Aeronaut. Jwar Isle Avenger.)"),
            ("2.0", "Good filler, but sometimes gets cut. (Kozilek’s Translator. Murk Strider. Kor Scythemaster.)"),
            ("1.5", "Filler. Gets cut about half the time. (Affa Protector. Call of the Scions. Culling Drone.)"),
            ("1.0", "Bad filler. Gets cut most of the time. (Salvage Drone. Blisterpod. Dazzling Reflection.)"),
            ("0.5", "Very low-end playables and sideboard material. (Geyserfield Stalker. Natural State. Consuming Sinkhole.)"),
            ("0.0", "Completely unplayable. (Hedron Alignment. Call of the Gatewatch.) "),
        ];
        Self {
            descriptions: entries
                .into_iter()
                .map(|(rating, text)| (rating.to_string(), text.to_string()))
                .collect(),
        }
    }
}

impl RatingScale {
    pub fn describe(&self, rating: &str) -> Option<&str> {
        self.descriptions.get(rating).map(String::as_str)
    }

    /// Markdown comment posted to the card:
    ///
    /// ```text
    /// LSV: **3.5**
    /// *Top-tier common or solid uncommon. (...)*
    ///
    /// "review text"
    /// ```
    ///
    /// Unknown ratings contribute an empty description line.
    pub fn annotation(&self, label: &str, review: &Review) -> String {
        let scale_text = review
            .face_ratings()
            .map(|rating| self.describe(rating).unwrap_or(""))
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "{label}: **{rating}**\n*{scale_text}*\n\n\"{text}\"",
            rating = review.rating,
            text = review.text
        )
    }
}
