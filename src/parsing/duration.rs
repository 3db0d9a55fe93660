use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::parsing::parse_result::ParseResult;

/// Session length in whole minutes. Never negative.
#[derive(
    Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, serde::Deserialize, serde::Serialize,
)]
#[serde(transparent)]
pub struct DurationMin(u32);

impl DurationMin {
    pub const fn new(minutes: u32) -> Self {
        DurationMin(minutes)
    }

    /// Grid input accepts whole minutes only.
    pub fn parse(input: &str) -> ParseResult<DurationMin, ()> {
        let input = input.trim();
        if input.is_empty() {
            return ParseResult::None;
        }
        match u32::from_str(input) {
            Ok(minutes) => ParseResult::Valid(DurationMin(minutes)),
            Err(_) => ParseResult::Invalid(()),
        }
    }

    pub fn minutes(self) -> u32 {
        self.0
    }

    pub fn hours(self) -> f64 {
        self.0 as f64 / 60.0
    }

    /// Hours rounded half-up to one decimal, as shown in the export.
    pub fn hours_rounded(self) -> f64 {
        (self.hours() * 10.0).round() / 10.0
    }
}

impl Display for DurationMin {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let h = self.0 / 60;
        let m = self.0 % 60;
        match (h, m) {
            (0, m) => write!(f, "{}m", m),
            (h, 0) => write!(f, "{}h", h),
            (h, m) => write!(f, "{}h {}m", h, m),
        }
    }
}
