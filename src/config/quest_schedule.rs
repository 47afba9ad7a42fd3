//! Quest schedule configuration.
//!
//! Daily and weekly quests open and close on period boundaries. The exact
//! rollover rule (household timezone, rollover hour, first day of the
//! week) is deployment policy, not domain logic, so it lives here and is
//! loaded from the environment.

use serde::Deserialize;

use crate::domain::foundation::Timestamp;

use super::error::ValidationError;

const SECS_PER_DAY: i64 = 86_400;

/// First day of the schedule week.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl WeekStart {
    /// Day index with Monday = 0.
    fn index(&self) -> i64 {
        match self {
            WeekStart::Monday => 0,
            WeekStart::Tuesday => 1,
            WeekStart::Wednesday => 2,
            WeekStart::Thursday => 3,
            WeekStart::Friday => 4,
            WeekStart::Saturday => 5,
            WeekStart::Sunday => 6,
        }
    }
}

/// Quest period boundaries.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestScheduleConfig {
    /// Offset from UTC applied before bucketing, in minutes.
    #[serde(default)]
    pub utc_offset_minutes: i32,

    /// Local hour at which a schedule day rolls over.
    ///
    /// A rollover hour of 4 means activity between midnight and 04:00
    /// still counts toward the previous day.
    #[serde(default = "default_day_rollover_hour")]
    pub day_rollover_hour: u32,

    /// First day of the schedule week.
    #[serde(default)]
    pub week_start: WeekStart,
}

impl QuestScheduleConfig {
    /// The schedule day a timestamp falls in, as days since the epoch.
    ///
    /// Consecutive buckets differ by exactly one, which is what the
    /// streak logic compares.
    pub fn day_bucket(&self, at: &Timestamp) -> i64 {
        let shifted = at.as_unix_secs() + i64::from(self.utc_offset_minutes) * 60
            - i64::from(self.day_rollover_hour) * 3600;
        shifted.div_euclid(SECS_PER_DAY)
    }

    /// The schedule week a timestamp falls in.
    ///
    /// Weeks increment on `week_start` at the day rollover hour. Day 0 of
    /// the epoch (1970-01-01) was a Thursday, hence the +3 alignment to a
    /// Monday-based index.
    pub fn week_bucket(&self, at: &Timestamp) -> i64 {
        (self.day_bucket(at) + 3 - self.week_start.index()).div_euclid(7)
    }

    /// Whether two timestamps fall in the same schedule day.
    pub fn same_day(&self, a: &Timestamp, b: &Timestamp) -> bool {
        self.day_bucket(a) == self.day_bucket(b)
    }

    /// Whether two timestamps fall in the same schedule week.
    pub fn same_week(&self, a: &Timestamp, b: &Timestamp) -> bool {
        self.week_bucket(a) == self.week_bucket(b)
    }

    /// Validate schedule configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        // UTC offsets in the wild span -12:00 to +14:00
        if self.utc_offset_minutes < -840 || self.utc_offset_minutes > 840 {
            return Err(ValidationError::InvalidUtcOffset);
        }
        if self.day_rollover_hour > 23 {
            return Err(ValidationError::InvalidRolloverHour);
        }
        Ok(())
    }
}

impl Default for QuestScheduleConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 0,
            day_rollover_hour: default_day_rollover_hour(),
            week_start: WeekStart::default(),
        }
    }
}

fn default_day_rollover_hour() -> u32 {
    4
}
