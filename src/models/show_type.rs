//! Show type derivation from the publication day
//!
//! The show calendar is weekday-driven: short episodes land on Monday,
//! the main format on Wednesday, the long-form episode on Friday. Anything
//! published off-schedule is a special.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Categorical show format, derived from the show date's day of week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShowType {
    Hasty,
    Tasty,
    Supper,
    Special,
}

impl ShowType {
    /// Fixed day-of-week mapping; unmapped days fall back to `Special`.
    pub fn from_weekday(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => ShowType::Hasty,
            Weekday::Wed => ShowType::Tasty,
            Weekday::Fri => ShowType::Supper,
            _ => ShowType::Special,
        }
    }

    /// Stored database representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ShowType::Hasty => "HASTY",
            ShowType::Tasty => "TASTY",
            ShowType::Supper => "SUPPER",
            ShowType::Special => "SPECIAL",
        }
    }

    /// Parse the stored representation; unknown values fall back to `Special`.
    pub fn from_str_lossy(value: &str) -> Self {
        match value {
            "HASTY" => ShowType::Hasty,
            "TASTY" => ShowType::Tasty,
            "SUPPER" => ShowType::Supper,
            _ => ShowType::Special,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_mapping_covers_all_seven_days() {
        assert_eq!(ShowType::from_weekday(Weekday::Mon), ShowType::Hasty);
        assert_eq!(ShowType::from_weekday(Weekday::Tue), ShowType::Special);
        assert_eq!(ShowType::from_weekday(Weekday::Wed), ShowType::Tasty);
        assert_eq!(ShowType::from_weekday(Weekday::Thu), ShowType::Special);
        assert_eq!(ShowType::from_weekday(Weekday::Fri), ShowType::Supper);
        assert_eq!(ShowType::from_weekday(Weekday::Sat), ShowType::Special);
        assert_eq!(ShowType::from_weekday(Weekday::Sun), ShowType::Special);
    }

    #[test]
    fn storage_round_trip() {
        for st in [
            ShowType::Hasty,
            ShowType::Tasty,
            ShowType::Supper,
            ShowType::Special,
        ] {
            assert_eq!(ShowType::from_str_lossy(st.as_str()), st);
        }
        assert_eq!(ShowType::from_str_lossy("garbage"), ShowType::Special);
    }
}
