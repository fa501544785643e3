use crate::engine::error::EngineError;
use crate::engine::realtime::FinalizationClock;
use crate::model::attendance::AttendanceStatus;
use crate::report::scope::EmployeeScope;
use crate::report::{fetch_slices, AttendanceSlice};
use chrono::{Datelike, Local, NaiveDate};
use serde::Serialize;
use sqlx::MySqlPool;
use std::collections::HashMap;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct DayTrend {
    #[schema(example = "2026-01-05", value_type = String, format = "date")]
    pub date: NaiveDate,
    #[schema(example = 40)]
    pub present: u64,
    #[schema(example = 2)]
    pub absent: u64,
    #[schema(example = 4)]
    pub late: u64,
    /// Today's figures before the cutoff are live, not settled.
    #[schema(example = false)]
    pub provisional: bool,
}

pub fn last_day_of_month(first_day: NaiveDate) -> NaiveDate {
    let (year, month) = (first_day.year(), first_day.month());
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    next_month.expect("valid month").pred_opt().expect("valid date")
}

/// Per-day series across one month, used for calendars and trend charts.
/// Every calendar day appears, including days with no records at all.
pub fn compute_trend(
    first_day: NaiveDate,
    rows: &[AttendanceSlice],
    realtime_today: Option<NaiveDate>,
) -> Vec<DayTrend> {
    let mut by_date: HashMap<NaiveDate, (u64, u64, u64)> = HashMap::new();
    for row in rows {
        let entry = by_date.entry(row.date).or_default();
        if row.status.counts_as_present() {
            entry.0 += 1;
        }
        if row.status == AttendanceStatus::Absent {
            entry.1 += 1;
        }
        if row.late_hours > 0.0 {
            entry.2 += 1;
        }
    }

    let last_day = last_day_of_month(first_day);
    let mut series = Vec::with_capacity(last_day.day() as usize);
    let mut date = first_day;
    while date <= last_day {
        let (present, absent, late) = by_date.get(&date).copied().unwrap_or_default();
        series.push(DayTrend {
            date,
            present,
            absent,
            late,
            provisional: realtime_today == Some(date),
        });
        date = date.succ_opt().expect("date overflow");
    }
    series
}

pub async fn monthly_trend(
    pool: &MySqlPool,
    first_day: NaiveDate,
    scope: &EmployeeScope,
    clock: &FinalizationClock,
) -> Result<Vec<DayTrend>, EngineError> {
    let last_day = last_day_of_month(first_day);
    let rows = fetch_slices(pool, first_day, last_day, scope).await?;

    let now = Local::now().naive_local();
    let realtime_today = clock.is_realtime(now.date(), now).then(|| now.date());

    Ok(compute_trend(first_day, &rows, realtime_today))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn slice(date: &str, status: AttendanceStatus, late: f64) -> AttendanceSlice {
        AttendanceSlice {
            employee_id: 1,
            date: d(date),
            status,
            late_hours: late,
            early_hours: 0.0,
            overtime_hours: 0.0,
        }
    }

    #[test]
    fn covers_every_day_of_the_month() {
        let series = compute_trend(d("2026-02-01"), &[], None);
        assert_eq!(series.len(), 28);
        assert_eq!(series[0].date, d("2026-02-01"));
        assert_eq!(series[27].date, d("2026-02-28"));
    }

    #[test]
    fn groups_counts_per_day() {
        let rows = vec![
            slice("2026-01-05", AttendanceStatus::Present, 0.0),
            slice("2026-01-05", AttendanceStatus::Late, 0.5),
            slice("2026-01-05", AttendanceStatus::Absent, 0.0),
            slice("2026-01-06", AttendanceStatus::Present, 0.0),
        ];
        let series = compute_trend(d("2026-01-01"), &rows, None);

        let day5 = &series[4];
        assert_eq!(day5.present, 2);
        assert_eq!(day5.absent, 1);
        assert_eq!(day5.late, 1);

        let day6 = &series[5];
        assert_eq!(day6.present, 1);
        assert_eq!(day6.absent, 0);
    }

    #[test]
    fn marks_only_live_today_as_provisional() {
        let series = compute_trend(d("2026-01-01"), &[], Some(d("2026-01-15")));
        assert!(series[14].provisional);
        assert!(series.iter().filter(|d| d.provisional).count() == 1);
    }

    #[test]
    fn december_rolls_into_next_year() {
        assert_eq!(last_day_of_month(d("2025-12-01")), d("2025-12-31"));
    }
}
