//! Loose text comparison
//!
//! Card names scraped from the feed drift from the names on the board in
//! casing, punctuation and whitespace ("Kindly  Stranger", "Brisela, Voice
//! of Nightmares"). Every comparison between the two goes through
//! [`normalize`] so that those variants compare equal.

use std::fmt;

/// Delimiter between the faces of a dual-faced card name or rating.
pub const FACE_DELIMITER: &str = " // ";

/// Canonical comparison key. Only ever used transiently, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedKey(String);

impl NormalizedKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for NormalizedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Trim, collapse repeated spaces, strip non-word characters and lowercase.
///
/// Word characters are `[A-Za-z0-9_]`, the same class the spoiler feed's
/// own tooling uses, so accented letters and curly apostrophes are dropped.
pub fn normalize(s: &str) -> NormalizedKey {
    let collapsed = collapse_spaces(s.trim());
    let key = collapsed
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .map(|c| c.to_ascii_lowercase())
        .collect();
    NormalizedKey(key)
}

fn collapse_spaces(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut previous_space = false;
    for c in s.chars() {
        if c == ' ' {
            if !previous_space {
                out.push(c);
            }
            previous_space = true;
        } else {
            out.push(c);
            previous_space = false;
        }
    }
    out
}

/// Two strings are loosely equal iff their normalized keys are identical.
pub fn eq_loose(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

/// True if any element of `haystack` is loosely equal to `needle`.
pub fn contains_loose<S: AsRef<str>>(haystack: &[S], needle: &str) -> bool {
    let target = normalize(needle);
    haystack.iter().any(|s| normalize(s.as_ref()) == target)
}

/// Name of the front face of a dual-faced card ("Bloodline Keeper // Lord of
/// Lineage" -> "Bloodline Keeper"). Single-faced names are returned as is.
pub fn primary_face(name: &str) -> &str {
    name.find(FACE_DELIMITER.trim_end())
        .map_or(name, |idx| &name[..idx])
}
