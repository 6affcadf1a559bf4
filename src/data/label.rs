use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AnalyticsError;

/// Disposition of a Kepler object of interest.
///
/// The dataset spells the third class `FALSE POSITIVE` while the prediction
/// backend uses `FALSE_POSITIVE`; both (and any casing) parse to the same
/// variant so nothing downstream compares raw strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Label {
    Confirmed,
    Candidate,
    FalsePositive,
}

impl Label {
    /// Canonical ordering used for every matrix axis and per-class listing.
    pub const ALL: [Label; 3] = [Label::Confirmed, Label::Candidate, Label::FalsePositive];

    /// Position of the label in [`Label::ALL`].
    pub fn index(self) -> usize {
        match self {
            Label::Confirmed => 0,
            Label::Candidate => 1,
            Label::FalsePositive => 2,
        }
    }

    /// Backend spelling (`FALSE_POSITIVE`).
    pub fn as_key(self) -> &'static str {
        match self {
            Label::Confirmed => "CONFIRMED",
            Label::Candidate => "CANDIDATE",
            Label::FalsePositive => "FALSE_POSITIVE",
        }
    }

    /// Dataset spelling (`FALSE POSITIVE`), also used for display.
    pub fn as_display(self) -> &'static str {
        match self {
            Label::Confirmed => "CONFIRMED",
            Label::Candidate => "CANDIDATE",
            Label::FalsePositive => "FALSE POSITIVE",
        }
    }

    /// Lenient parse returning `None` for anything unrecognized.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized: String = raw
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '-' => '_',
                c => c.to_ascii_uppercase(),
            })
            .collect();
        match normalized.as_str() {
            "CONFIRMED" => Some(Label::Confirmed),
            "CANDIDATE" => Some(Label::Candidate),
            "FALSE_POSITIVE" => Some(Label::FalsePositive),
            _ => None,
        }
    }
}

impl FromStr for Label {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Label::parse(s).ok_or_else(|| AnalyticsError::UnknownLabel(s.to_string()))
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_display())
    }
}

impl Serialize for Label {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_key())
    }
}

impl<'de> Deserialize<'de> for Label {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
