use chrono::{DateTime, FixedOffset, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const IMAGE_WIDTH: u32 = 1080;
pub const IMAGE_HEIGHT: u32 = 1080;

const DAY_START_HOUR: u32 = 6;
const NIGHT_START_HOUR: u32 = 19;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Day,
    Night,
}

impl Theme {
    /// Day runs from 06:00 up to 19:00 local time.
    pub fn for_time(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        let hour = now.with_timezone(&offset).hour();
        if (DAY_START_HOUR..NIGHT_START_HOUR).contains(&hour) {
            Self::Day
        } else {
            Self::Night
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Day => "day",
            Self::Night => "night",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub theme: Theme,
    pub background: String,
    pub font: String,
    pub primary_color: [u8; 3],
    pub secondary_color: [u8; 3],
    pub font_size: u32,
    pub sub_font_size: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_theme_uses_local_hour() {
        let dhaka = FixedOffset::east_opt(6 * 3600).unwrap();
        // 01:00 UTC is 07:00 in Dhaka
        let morning = Utc.with_ymd_and_hms(2024, 5, 1, 1, 0, 0).unwrap();
        assert_eq!(Theme::for_time(morning, dhaka), Theme::Day);
        // 13:00 UTC is 19:00 in Dhaka
        let evening = Utc.with_ymd_and_hms(2024, 5, 1, 13, 0, 0).unwrap();
        assert_eq!(Theme::for_time(evening, dhaka), Theme::Night);
        // 23:30 UTC is 05:30 the next day
        let dawn = Utc.with_ymd_and_hms(2024, 5, 1, 23, 30, 0).unwrap();
        assert_eq!(Theme::for_time(dawn, dhaka), Theme::Night);
    }
}
