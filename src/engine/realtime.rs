use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Decides whether a date's attendance is settled or still live.
///
/// Past dates are always finalized. Today is provisional until the daily
/// cutoff; before that, a missing check-in means "not yet arrived", never
/// "absent". Future dates are neither: no attendance exists for them yet.
#[derive(Debug, Clone, Copy)]
pub struct FinalizationClock {
    cutoff: NaiveTime,
}

impl FinalizationClock {
    pub fn new(cutoff: NaiveTime) -> Self {
        Self { cutoff }
    }

    pub fn is_finalized(&self, date: NaiveDate, now: NaiveDateTime) -> bool {
        date < now.date() || (date == now.date() && now.time() >= self.cutoff)
    }

    pub fn is_realtime(&self, date: NaiveDate, now: NaiveDateTime) -> bool {
        date == now.date() && now.time() < self.cutoff
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock() -> FinalizationClock {
        FinalizationClock::new(NaiveTime::from_hms_opt(23, 30, 0).unwrap())
    }

    fn at(date: &str, time: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{date} {time}"), "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn yesterday_is_finalized() {
        let now = at("2026-01-06", "08:00:00");
        assert!(clock().is_finalized(d("2026-01-05"), now));
        assert!(!clock().is_realtime(d("2026-01-05"), now));
    }

    #[test]
    fn today_is_live_before_cutoff() {
        let now = at("2026-01-06", "23:29:59");
        assert!(clock().is_realtime(d("2026-01-06"), now));
        assert!(!clock().is_finalized(d("2026-01-06"), now));
    }

    #[test]
    fn today_settles_at_cutoff() {
        let now = at("2026-01-06", "23:30:00");
        assert!(clock().is_finalized(d("2026-01-06"), now));
        assert!(!clock().is_realtime(d("2026-01-06"), now));
    }

    #[test]
    fn future_dates_are_neither() {
        let now = at("2026-01-06", "12:00:00");
        assert!(!clock().is_finalized(d("2026-01-07"), now));
        assert!(!clock().is_realtime(d("2026-01-07"), now));
    }
}
