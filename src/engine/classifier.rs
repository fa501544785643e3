use crate::config::EngineConfig;
use crate::engine::error::EngineError;
use crate::engine::shift_resolver::{DayKind, ResolvedWindow};
use crate::model::attendance::AttendanceStatus;
use chrono::NaiveTime;

/// Raw punch instants for one (employee, date). How a punch was captured
/// (web, QR, geofence, ...) is outside the classifier's concern.
#[derive(Debug, Clone, Copy, Default)]
pub struct Punches {
    pub check_in: Option<NaiveTime>,
    pub check_out: Option<NaiveTime>,
}

/// Derived attendance fields for one day. Hour values keep full precision;
/// rounding happens at the serialization edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Derived {
    pub status: AttendanceStatus,
    pub working_hours: f64,
    pub late_hours: f64,
    pub early_hours: f64,
    pub overtime_hours: f64,
    pub incomplete: bool,
}

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Derive status and hour metrics from raw punches and the resolved window.
///
/// Returns `Ok(None)` when there is nothing to record: no punches on a day
/// that is not yet finalized (a missing check-in today means "not yet
/// arrived") or no punches on a non-working day.
///
/// Invariants:
/// - non-working days never carry late/early/overtime, but worked hours are
///   still computed from the punches as informational data;
/// - `late_hours`/`early_hours` are independent of the primary status and
///   may both be nonzero;
/// - a check-out earlier than the check-in is only meaningful under a
///   midnight-spanning shift; otherwise it is rejected as `InvalidPunchOrder`.
pub fn classify(
    punches: &Punches,
    window: &ResolvedWindow,
    config: &EngineConfig,
    finalized: bool,
) -> Result<Option<Derived>, EngineError> {
    let spans_midnight = window.times.map(|t| t.spans_midnight()).unwrap_or(false);

    // Worked minutes from the punch pair, if complete.
    let completed = match (punches.check_in, punches.check_out) {
        (Some(check_in), Some(check_out)) => {
            let mut raw = (check_out - check_in).num_minutes();
            if raw < 0 {
                if spans_midnight {
                    raw += MINUTES_PER_DAY;
                } else {
                    return Err(EngineError::InvalidPunchOrder {
                        check_in,
                        check_out,
                    });
                }
            }
            Some((raw, check_out))
        }
        _ => None,
    };

    if window.day_kind != DayKind::Working {
        if punches.check_in.is_none() && punches.check_out.is_none() {
            return Ok(None);
        }
        let status = match window.day_kind {
            DayKind::Holiday => AttendanceStatus::Holiday,
            _ => AttendanceStatus::Weekend,
        };
        return Ok(Some(Derived {
            status,
            working_hours: completed.map(|(m, _)| m).unwrap_or(0) as f64 / 60.0,
            late_hours: 0.0,
            early_hours: 0.0,
            overtime_hours: 0.0,
            incomplete: false,
        }));
    }

    let Some(check_in) = punches.check_in else {
        // Working day without a check-in: absent once the day has settled,
        // nothing to record while it is still live.
        if finalized {
            return Ok(Some(Derived {
                status: AttendanceStatus::Absent,
                working_hours: 0.0,
                late_hours: 0.0,
                early_hours: 0.0,
                overtime_hours: 0.0,
                incomplete: false,
            }));
        }
        return Ok(None);
    };

    let late_minutes = window
        .times
        .map(|t| (check_in - t.start).num_minutes().max(0))
        .unwrap_or(0);

    let Some((worked_minutes, check_out)) = completed else {
        // Check-in only. On a settled day this is an anomaly kept visible to
        // reporting; while live it is just an open session.
        return Ok(Some(Derived {
            status: if late_minutes > 0 {
                AttendanceStatus::Late
            } else {
                AttendanceStatus::Present
            },
            working_hours: 0.0,
            late_hours: late_minutes as f64 / 60.0,
            early_hours: 0.0,
            overtime_hours: 0.0,
            incomplete: finalized,
        }));
    };

    let (early_minutes, overtime_minutes, half_day) = match window.times {
        Some(times) => {
            // Normalize onto a single timeline anchored at the record date.
            let end_anchor =
                minutes_of(times.end) + if times.spans_midnight() { MINUTES_PER_DAY } else { 0 };
            let out_anchor =
                minutes_of(check_out) + if check_out < check_in { MINUTES_PER_DAY } else { 0 };
            let early = (end_anchor - out_anchor).max(0);

            let scheduled = times.scheduled_minutes();
            let overtime = (worked_minutes - scheduled).max(0);
            let half_day = (worked_minutes as f64) < config.half_day_ratio * scheduled as f64;
            (early, overtime, half_day)
        }
        // No schedule constraint: nothing to be late/early against.
        None => (0, 0, false),
    };

    let status = if half_day {
        AttendanceStatus::HalfDay
    } else if late_minutes > 0 {
        AttendanceStatus::Late
    } else {
        AttendanceStatus::Present
    };

    Ok(Some(Derived {
        status,
        working_hours: worked_minutes as f64 / 60.0,
        late_hours: late_minutes as f64 / 60.0,
        early_hours: early_minutes as f64 / 60.0,
        overtime_hours: overtime_minutes as f64 / 60.0,
        incomplete: false,
    }))
}

fn minutes_of(t: NaiveTime) -> i64 {
    use chrono::Timelike;
    t.num_seconds_from_midnight() as i64 / 60
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::shift::ShiftTimes;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn working(start: (u32, u32), end: (u32, u32)) -> ResolvedWindow {
        ResolvedWindow {
            day_kind: DayKind::Working,
            times: Some(ShiftTimes {
                start: t(start.0, start.1),
                end: t(end.0, end.1),
            }),
        }
    }

    fn cfg() -> EngineConfig {
        EngineConfig::default()
    }

    fn punches(check_in: Option<NaiveTime>, check_out: Option<NaiveTime>) -> Punches {
        Punches { check_in, check_out }
    }

    #[test]
    fn on_time_full_day_with_overtime() {
        let window = working((9, 0), (17, 0));
        let d = classify(
            &punches(Some(t(8, 55)), Some(t(17, 10))),
            &window,
            &cfg(),
            true,
        )
        .unwrap()
        .unwrap();

        assert_eq!(d.status, AttendanceStatus::Present);
        assert_eq!(d.late_hours, 0.0);
        assert_eq!(d.early_hours, 0.0);
        assert!((d.working_hours - 8.25).abs() < 1e-9);
        assert!((d.overtime_hours - 0.25).abs() < 1e-9);
        assert!(!d.incomplete);
    }

    #[test]
    fn late_arrival() {
        let window = working((9, 0), (17, 0));
        let d = classify(
            &punches(Some(t(9, 20)), Some(t(17, 0))),
            &window,
            &cfg(),
            true,
        )
        .unwrap()
        .unwrap();

        assert_eq!(d.status, AttendanceStatus::Late);
        assert!((d.late_hours - 20.0 / 60.0).abs() < 1e-9);
        assert!((d.working_hours - (7.0 + 40.0 / 60.0)).abs() < 1e-9);
        assert_eq!(d.overtime_hours, 0.0);
    }

    #[test]
    fn late_in_and_early_out_coexist() {
        let window = working((9, 0), (17, 0));
        let d = classify(
            &punches(Some(t(9, 30)), Some(t(16, 0))),
            &window,
            &cfg(),
            true,
        )
        .unwrap()
        .unwrap();

        assert!(d.late_hours > 0.0);
        assert!(d.early_hours > 0.0);
        assert!((d.late_hours - 0.5).abs() < 1e-9);
        assert!((d.early_hours - 1.0).abs() < 1e-9);
    }

    #[test]
    fn half_day_below_threshold() {
        let window = working((9, 0), (17, 0));
        // 3h worked out of 8h scheduled, under the default 50% threshold.
        let d = classify(
            &punches(Some(t(9, 0)), Some(t(12, 0))),
            &window,
            &cfg(),
            true,
        )
        .unwrap()
        .unwrap();

        assert_eq!(d.status, AttendanceStatus::HalfDay);
        assert!((d.working_hours - 3.0).abs() < 1e-9);
        assert!((d.early_hours - 5.0).abs() < 1e-9);
    }

    #[test]
    fn very_late_half_day_keeps_late_hours() {
        let window = working((9, 0), (17, 0));
        let d = classify(
            &punches(Some(t(13, 0)), Some(t(16, 0))),
            &window,
            &cfg(),
            true,
        )
        .unwrap()
        .unwrap();

        // Status names the primary state; lateness stays numeric.
        assert_eq!(d.status, AttendanceStatus::HalfDay);
        assert!((d.late_hours - 4.0).abs() < 1e-9);
    }

    #[test]
    fn absent_when_finalized_without_punches() {
        let window = working((9, 0), (17, 0));
        let d = classify(&punches(None, None), &window, &cfg(), true)
            .unwrap()
            .unwrap();

        assert_eq!(d.status, AttendanceStatus::Absent);
        assert_eq!(d.working_hours, 0.0);
        assert_eq!(d.late_hours, 0.0);
    }

    #[test]
    fn nothing_recorded_while_day_is_live() {
        let window = working((9, 0), (17, 0));
        let d = classify(&punches(None, None), &window, &cfg(), false).unwrap();
        assert!(d.is_none());
    }

    #[test]
    fn weekend_with_stray_punches_is_informational() {
        let window = ResolvedWindow {
            day_kind: DayKind::Weekend,
            times: Some(ShiftTimes {
                start: t(9, 0),
                end: t(17, 0),
            }),
        };
        let d = classify(
            &punches(Some(t(10, 0)), Some(t(14, 0))),
            &window,
            &cfg(),
            true,
        )
        .unwrap()
        .unwrap();

        assert_eq!(d.status, AttendanceStatus::Weekend);
        assert_eq!(d.late_hours, 0.0);
        assert_eq!(d.early_hours, 0.0);
        assert_eq!(d.overtime_hours, 0.0);
        assert!((d.working_hours - 4.0).abs() < 1e-9);
    }

    #[test]
    fn holiday_without_punches_records_nothing() {
        let window = ResolvedWindow {
            day_kind: DayKind::Holiday,
            times: None,
        };
        assert!(classify(&punches(None, None), &window, &cfg(), true)
            .unwrap()
            .is_none());
    }

    #[test]
    fn night_shift_hours_never_go_negative() {
        let window = working((22, 0), (6, 0));
        let d = classify(
            &punches(Some(t(22, 0)), Some(t(6, 0))),
            &window,
            &cfg(),
            true,
        )
        .unwrap()
        .unwrap();

        assert!((d.working_hours - 8.0).abs() < 1e-9);
        assert_eq!(d.status, AttendanceStatus::Present);
        assert_eq!(d.early_hours, 0.0);
    }

    #[test]
    fn night_shift_early_departure_before_midnight() {
        let window = working((22, 0), (6, 0));
        let d = classify(
            &punches(Some(t(22, 0)), Some(t(23, 30))),
            &window,
            &cfg(),
            true,
        )
        .unwrap()
        .unwrap();

        // Left 6.5h before the 06:00 end of the wrapped window.
        assert!((d.early_hours - 6.5).abs() < 1e-9);
        assert_eq!(d.status, AttendanceStatus::HalfDay);
    }

    #[test]
    fn invalid_punch_order_is_rejected() {
        let window = working((9, 0), (17, 0));
        let err = classify(
            &punches(Some(t(17, 0)), Some(t(9, 0))),
            &window,
            &cfg(),
            true,
        )
        .unwrap_err();

        assert!(matches!(err, EngineError::InvalidPunchOrder { .. }));
    }

    #[test]
    fn check_in_only_on_settled_day_is_flagged_incomplete() {
        let window = working((9, 0), (17, 0));
        let d = classify(&punches(Some(t(9, 0)), None), &window, &cfg(), true)
            .unwrap()
            .unwrap();

        assert_eq!(d.status, AttendanceStatus::Present);
        assert_eq!(d.working_hours, 0.0);
        assert!(d.incomplete);
    }

    #[test]
    fn open_session_today_is_not_incomplete() {
        let window = working((9, 0), (17, 0));
        let d = classify(&punches(Some(t(9, 10)), None), &window, &cfg(), false)
            .unwrap()
            .unwrap();

        assert_eq!(d.status, AttendanceStatus::Late);
        assert!(!d.incomplete);
    }

    #[test]
    fn no_schedule_constraint_has_no_late_or_overtime() {
        let window = ResolvedWindow {
            day_kind: DayKind::Working,
            times: None,
        };
        let d = classify(
            &punches(Some(t(11, 0)), Some(t(21, 0))),
            &window,
            &cfg(),
            true,
        )
        .unwrap()
        .unwrap();

        assert_eq!(d.status, AttendanceStatus::Present);
        assert_eq!(d.late_hours, 0.0);
        assert_eq!(d.overtime_hours, 0.0);
        assert!((d.working_hours - 10.0).abs() < 1e-9);
    }

    #[test]
    fn late_hours_are_monotonic_in_check_in_delay() {
        let window = working((9, 0), (17, 0));
        let mut previous = -1.0;
        for minute in [0u32, 5, 20, 45, 59] {
            let d = classify(
                &punches(Some(t(9, minute)), Some(t(17, 0))),
                &window,
                &cfg(),
                true,
            )
            .unwrap()
            .unwrap();
            assert!(d.late_hours >= previous);
            previous = d.late_hours;
        }
    }

    #[test]
    fn early_hours_are_monotonic_in_checkout_advance() {
        let window = working((9, 0), (17, 0));
        let mut previous = -1.0;
        for hour in [17u32, 16, 15, 14] {
            let d = classify(
                &punches(Some(t(9, 0)), Some(t(hour, 0))),
                &window,
                &cfg(),
                true,
            )
            .unwrap()
            .unwrap();
            assert!(d.early_hours >= previous);
            previous = d.early_hours;
        }
    }
}
