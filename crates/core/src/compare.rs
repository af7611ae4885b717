//! Comparison of automatically computed notations against external ones.

use serde::Serialize;

use crate::view::NOT_AVAILABLE;

/// Outcome of comparing one notation pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Match,
    Mismatch,
    Unknown,
}

impl Verdict {
    pub fn icon(self) -> &'static str {
        match self {
            Verdict::Match => "✓",
            Verdict::Mismatch => "✗",
            Verdict::Unknown => "—",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Verdict::Match => "match-true",
            Verdict::Mismatch => "match-false",
            Verdict::Unknown => "",
        }
    }
}

/// Lower-case and keep only ASCII letters and digits.
///
/// ```
/// use bigo_core::compare::normalize_notation;
///
/// assert_eq!(normalize_notation("O(n log n)"), "onlogn");
/// assert_eq!(normalize_notation("Θ(N²)"), "n");
/// ```
pub fn normalize_notation(notation: &str) -> String {
    notation
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// Compare two notations.
///
/// `Unknown` when either side is absent or empty, or when the external
/// side carries the `N/A` placeholder.
pub fn compare(automatic: Option<&str>, external: Option<&str>) -> Verdict {
    let (Some(automatic), Some(external)) = (
        automatic.filter(|s| !s.is_empty()),
        external.filter(|s| !s.is_empty()),
    ) else {
        return Verdict::Unknown;
    };

    if external == NOT_AVAILABLE {
        return Verdict::Unknown;
    }

    if normalize_notation(automatic) == normalize_notation(external) {
        Verdict::Match
    } else {
        Verdict::Mismatch
    }
}
