use crate::engine::error::EngineError;
use crate::model::shift::{Shift, ShiftTimes};
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use sqlx::MySqlPool;
use tracing::warn;

/// What kind of day a date is for a given employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayKind {
    Working,
    Weekend,
    Holiday,
}

/// Result of resolving an employee's schedule for one date.
///
/// `times` is `None` for employees with no assigned shift; they carry no
/// schedule constraint, so every non-holiday date counts as a working day and
/// no late/early/overtime can be derived.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedWindow {
    pub day_kind: DayKind,
    pub times: Option<ShiftTimes>,
}

impl ResolvedWindow {
    pub fn is_working_day(&self) -> bool {
        self.day_kind == DayKind::Working
    }
}

/// Holiday calendar entry, supplied by the (external) calendar table.
#[derive(Debug, Clone, Deserialize, sqlx::FromRow)]
pub struct Holiday {
    pub date: NaiveDate,
    pub name: String,
}

/// Pure resolution: shift weekday flags + holiday override → day kind.
/// Holidays win over the shift schedule; the shift window is still carried
/// so worked hours on a holiday remain computable as informational data.
pub fn resolve_window(
    shift: Option<&Shift>,
    date: NaiveDate,
    holiday: Option<&Holiday>,
) -> ResolvedWindow {
    let times = shift.map(Shift::times);

    if holiday.is_some() {
        return ResolvedWindow {
            day_kind: DayKind::Holiday,
            times,
        };
    }

    let day_kind = match shift {
        Some(s) if !s.works_on(date.weekday()) => DayKind::Weekend,
        _ => DayKind::Working,
    };

    ResolvedWindow { day_kind, times }
}

/// Look up the shift assigned to an employee. A dangling `shift_id` is
/// logged and degraded to "no schedule" rather than failing the caller.
pub async fn fetch_shift_for_employee(
    pool: &MySqlPool,
    employee_id: u64,
) -> Result<Option<Shift>, EngineError> {
    let shift_id: Option<Option<u64>> =
        sqlx::query_scalar("SELECT shift_id FROM employees WHERE id = ?")
            .bind(employee_id)
            .fetch_optional(pool)
            .await?;

    let Some(Some(shift_id)) = shift_id else {
        return Ok(None);
    };

    let shift = fetch_shift(pool, shift_id).await?;
    if shift.is_none() {
        warn!(
            employee_id,
            shift_id,
            "{}",
            EngineError::ShiftNotFound(shift_id)
        );
    }
    Ok(shift)
}

pub async fn fetch_shift(pool: &MySqlPool, shift_id: u64) -> Result<Option<Shift>, EngineError> {
    let shift = sqlx::query_as::<_, Shift>(
        r#"
        SELECT id, name, start_time, end_time,
               monday, tuesday, wednesday, thursday, friday, saturday, sunday
        FROM shifts
        WHERE id = ?
        "#,
    )
    .bind(shift_id)
    .fetch_optional(pool)
    .await?;

    Ok(shift)
}

pub async fn fetch_holiday(
    pool: &MySqlPool,
    date: NaiveDate,
) -> Result<Option<Holiday>, EngineError> {
    let holiday = sqlx::query_as::<_, Holiday>("SELECT date, name FROM holidays WHERE date = ?")
        .bind(date)
        .fetch_optional(pool)
        .await?;

    Ok(holiday)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn weekday_shift() -> Shift {
        Shift {
            id: 1,
            name: "General".into(),
            start_time: t(9, 0),
            end_time: t(17, 0),
            monday: true,
            tuesday: true,
            wednesday: true,
            thursday: true,
            friday: true,
            saturday: false,
            sunday: false,
        }
    }

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn monday_is_working_for_weekday_shift() {
        let shift = weekday_shift();
        // 2026-01-05 is a Monday
        let w = resolve_window(Some(&shift), d("2026-01-05"), None);
        assert_eq!(w.day_kind, DayKind::Working);
        assert_eq!(w.times.unwrap().scheduled_minutes(), 480);
    }

    #[test]
    fn saturday_is_weekend_for_weekday_shift() {
        let shift = weekday_shift();
        // 2026-01-10 is a Saturday
        let w = resolve_window(Some(&shift), d("2026-01-10"), None);
        assert_eq!(w.day_kind, DayKind::Weekend);
    }

    #[test]
    fn no_shift_defaults_to_working() {
        let w = resolve_window(None, d("2026-01-10"), None);
        assert_eq!(w.day_kind, DayKind::Working);
        assert!(w.times.is_none());
    }

    #[test]
    fn holiday_overrides_schedule() {
        let shift = weekday_shift();
        let holiday = Holiday {
            date: d("2026-01-05"),
            name: "Foundation Day".into(),
        };
        let w = resolve_window(Some(&shift), d("2026-01-05"), Some(&holiday));
        assert_eq!(w.day_kind, DayKind::Holiday);
    }
}
