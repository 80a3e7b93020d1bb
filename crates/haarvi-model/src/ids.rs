//! Participant identifier normalization.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Leading digit run followed by a letter run. Anything after the letters
/// is ignored, matching how study staff append suffixes to sample labels.
static PTID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+)([A-Za-z]+)").expect("Invalid PTID regex")
});

/// Width of the zero-padded numeric part of a PTID.
const PTID_NUMBER_WIDTH: usize = 5;

/// A normalized participant identifier (`00123AB`).
///
/// The only constructor normalizes, so every `Ptid` in the pipeline has the
/// same representation on both sides of the appointment-log join.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ptid(String);

impl Ptid {
    /// Normalizes a raw identifier.
    ///
    /// `123ab` becomes `00123AB`: the numeric run is zero-padded to five
    /// digits (leading zeros are re-derived, longer numbers are kept whole)
    /// and the letters are uppercased. Values that do not start with digits
    /// followed by letters are uppercased unchanged. Normalizing a normalized
    /// value returns it unchanged.
    pub fn normalize(raw: &str) -> Self {
        let trimmed = raw.trim();
        let Some(captures) = PTID_PATTERN.captures(trimmed) else {
            return Self(trimmed.to_uppercase());
        };
        let number = captures[1].trim_start_matches('0');
        let letters = captures[2].to_ascii_uppercase();
        Self(format!(
            "{number:0>width$}{letters}",
            width = PTID_NUMBER_WIDTH
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ptid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
