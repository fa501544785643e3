use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Primary state of one attendance day.
///
/// Late arrival and early departure are carried as numeric hour fields on the
/// record, not as statuses, so a half day can also be late, and an on-time
/// day can still leave early.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    sqlx::Type,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Late,
    HalfDay,
    Absent,
    Weekend,
    Holiday,
}

impl AttendanceStatus {
    /// Statuses that count toward "present" headcounts in rollups.
    pub fn counts_as_present(&self) -> bool {
        matches!(
            self,
            AttendanceStatus::Present | AttendanceStatus::Late | AttendanceStatus::HalfDay
        )
    }
}

/// One row per (employee, date); uniqueness enforced by the table's
/// `(employee_id, date)` key. Hour fields hold full precision internally and
/// are rounded to 2 decimals only at the response edge.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceRecord {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(example = "2026-01-05", value_type = String, format = "date")]
    pub date: NaiveDate,
    /// Shift in effect when the record was classified (snapshot, may dangle).
    #[schema(example = 2, nullable = true)]
    pub shift_id: Option<u64>,
    #[schema(example = "09:05:00", value_type = String, nullable = true)]
    pub check_in: Option<NaiveTime>,
    #[schema(example = "17:30:00", value_type = String, nullable = true)]
    pub check_out: Option<NaiveTime>,
    #[schema(example = "present")]
    pub status: AttendanceStatus,
    #[schema(example = 8.25)]
    pub working_hours: f64,
    #[schema(example = 0.0)]
    pub late_hours: f64,
    #[schema(example = 0.0)]
    pub early_hours: f64,
    #[schema(example = 0.25)]
    pub overtime_hours: f64,
    /// Check-in with no check-out on a settled day; surfaced for review.
    #[schema(example = false)]
    pub incomplete: bool,
    #[schema(example = "traffic", nullable = true)]
    pub notes: Option<String>,
}

/// Round fractional hours for display/serialization. Aggregation always
/// works on the unrounded values to avoid compounding error.
pub fn round_hours(hours: f64) -> f64 {
    (hours * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_strings() {
        use std::str::FromStr;
        for status in [
            AttendanceStatus::Present,
            AttendanceStatus::Late,
            AttendanceStatus::HalfDay,
            AttendanceStatus::Absent,
            AttendanceStatus::Weekend,
            AttendanceStatus::Holiday,
        ] {
            let s = status.to_string();
            assert_eq!(AttendanceStatus::from_str(&s).unwrap(), status);
        }
    }

    #[test]
    fn half_day_serializes_snake_case() {
        assert_eq!(AttendanceStatus::HalfDay.to_string(), "half_day");
    }

    #[test]
    fn present_counting() {
        assert!(AttendanceStatus::Late.counts_as_present());
        assert!(AttendanceStatus::HalfDay.counts_as_present());
        assert!(!AttendanceStatus::Absent.counts_as_present());
        assert!(!AttendanceStatus::Weekend.counts_as_present());
    }

    #[test]
    fn rounding_is_display_only() {
        assert_eq!(round_hours(0.333333), 0.33);
        assert_eq!(round_hours(8.255), 8.26);
    }
}
