use crate::engine::error::EngineError;
use crate::engine::realtime::FinalizationClock;
use crate::report::scope::EmployeeScope;
use crate::report::{fetch_slices, AttendanceSlice};
use crate::model::attendance::AttendanceStatus;
use chrono::{Local, NaiveDate};
use serde::Serialize;
use sqlx::MySqlPool;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct DailyStats {
    #[schema(example = "2026-01-05", value_type = String, format = "date")]
    pub date: NaiveDate,
    #[schema(example = 42)]
    pub present: u64,
    #[schema(example = 3)]
    pub absent: u64,
    #[schema(example = 5)]
    pub late: u64,
    #[schema(example = 2)]
    pub early_departures: u64,
    #[schema(example = 4)]
    pub overtime: u64,
    /// True while the date is today and the daily cutoff has not passed.
    #[schema(example = false)]
    pub provisional: bool,
}

/// Count rollup for one date. Late/early/overtime count by the numeric hour
/// fields, not by status, so a late half-day shows up in both columns.
pub fn compute_daily(date: NaiveDate, rows: &[AttendanceSlice], provisional: bool) -> DailyStats {
    let mut stats = DailyStats {
        date,
        present: 0,
        absent: 0,
        late: 0,
        early_departures: 0,
        overtime: 0,
        provisional,
    };

    for row in rows {
        if row.status.counts_as_present() {
            stats.present += 1;
        }
        if row.status == AttendanceStatus::Absent {
            stats.absent += 1;
        }
        if row.late_hours > 0.0 {
            stats.late += 1;
        }
        if row.early_hours > 0.0 {
            stats.early_departures += 1;
        }
        if row.overtime_hours > 0.0 {
            stats.overtime += 1;
        }
    }

    stats
}

pub async fn daily_stats(
    pool: &MySqlPool,
    date: NaiveDate,
    scope: &EmployeeScope,
    clock: &FinalizationClock,
) -> Result<DailyStats, EngineError> {
    let rows = fetch_slices(pool, date, date, scope).await?;
    let provisional = clock.is_realtime(date, Local::now().naive_local());
    Ok(compute_daily(date, &rows, provisional))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slice(status: AttendanceStatus, late: f64, early: f64, overtime: f64) -> AttendanceSlice {
        AttendanceSlice {
            employee_id: 1,
            date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            status,
            late_hours: late,
            early_hours: early,
            overtime_hours: overtime,
        }
    }

    #[test]
    fn counts_by_hours_not_status() {
        let rows = vec![
            slice(AttendanceStatus::Present, 0.0, 0.0, 0.5),
            slice(AttendanceStatus::Late, 0.33, 0.0, 0.0),
            slice(AttendanceStatus::HalfDay, 1.5, 2.0, 0.0),
            slice(AttendanceStatus::Absent, 0.0, 0.0, 0.0),
            slice(AttendanceStatus::Weekend, 0.0, 0.0, 0.0),
        ];
        let stats = compute_daily(rows[0].date, &rows, false);

        assert_eq!(stats.present, 3); // present + late + half_day
        assert_eq!(stats.absent, 1);
        assert_eq!(stats.late, 2); // late status and the late half-day
        assert_eq!(stats.early_departures, 1);
        assert_eq!(stats.overtime, 1);
    }

    #[test]
    fn empty_scope_produces_zeroes() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let stats = compute_daily(date, &[], true);
        assert_eq!(stats.present, 0);
        assert_eq!(stats.absent, 0);
        assert!(stats.provisional);
    }
}
