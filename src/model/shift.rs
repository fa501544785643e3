use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A named work shift. `end_time < start_time` means the shift runs past
/// midnight into the next calendar day.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Shift {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "General")]
    pub name: String,
    #[schema(example = "09:00:00", value_type = String)]
    pub start_time: NaiveTime,
    #[schema(example = "17:00:00", value_type = String)]
    pub end_time: NaiveTime,
    pub monday: bool,
    pub tuesday: bool,
    pub wednesday: bool,
    pub thursday: bool,
    pub friday: bool,
    pub saturday: bool,
    pub sunday: bool,
}

impl Shift {
    pub fn works_on(&self, weekday: Weekday) -> bool {
        match weekday {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
            Weekday::Sun => self.sunday,
        }
    }

    pub fn times(&self) -> ShiftTimes {
        ShiftTimes {
            start: self.start_time,
            end: self.end_time,
        }
    }
}

/// Start/end window of a shift with midnight-spanning normalized away: all
/// duration math goes through minutes rather than naive time comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftTimes {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl ShiftTimes {
    pub fn spans_midnight(&self) -> bool {
        self.end < self.start
    }

    /// Scheduled duration in minutes, adding a day when the window wraps.
    pub fn scheduled_minutes(&self) -> i64 {
        let raw = (self.end - self.start).num_minutes();
        if raw < 0 { raw + 24 * 60 } else { raw }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn day_shift_duration() {
        let w = ShiftTimes { start: t(9, 0), end: t(17, 0) };
        assert!(!w.spans_midnight());
        assert_eq!(w.scheduled_minutes(), 480);
    }

    #[test]
    fn night_shift_wraps_past_midnight() {
        let w = ShiftTimes { start: t(22, 0), end: t(6, 0) };
        assert!(w.spans_midnight());
        assert_eq!(w.scheduled_minutes(), 480);
    }
}
