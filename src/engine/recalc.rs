use crate::config::EngineConfig;
use crate::engine::classifier::{classify, Punches};
use crate::engine::error::EngineError;
use crate::engine::realtime::FinalizationClock;
use crate::engine::shift_resolver::{fetch_holiday, resolve_window, Holiday};
use crate::engine::store::{self, AttendanceWrite};
use crate::model::shift::Shift;
use chrono::{Local, NaiveDate};
use serde::Serialize;
use sqlx::MySqlPool;
use std::collections::HashMap;
use tracing::{debug, error, info, warn};
use utoipa::ToSchema;

/// Outcome of a whole recalculation run. Unit failures are counted, never
/// fatal; a re-run over the same closed range is idempotent.
#[derive(Debug, Default, Clone, Copy, Serialize, ToSchema)]
pub struct RecalcSummary {
    /// Units whose derived fields were (re)written.
    #[schema(example = 120)]
    pub processed: u64,
    /// Absent rows created for settled working days without punches.
    #[schema(example = 7)]
    pub absents_created: u64,
    /// Units that failed and were skipped.
    #[schema(example = 0)]
    pub failed: u64,
}

enum UnitOutcome {
    Reclassified,
    AbsentCreated,
    Skipped,
}

/// Batch (re)materialization of attendance records over a date range.
///
/// Each (employee, date) unit is one atomic write; a failure on one unit is
/// logged and counted while the batch continues. Dates that are still live
/// (today before the cutoff) and future dates are skipped entirely, so no
/// premature absent rows can appear.
pub struct RecalcEngine {
    pool: MySqlPool,
    clock: FinalizationClock,
    config: EngineConfig,
}

impl RecalcEngine {
    pub fn new(pool: MySqlPool, config: EngineConfig) -> Self {
        Self {
            pool,
            clock: FinalizationClock::new(config.daily_cutoff),
            config,
        }
    }

    pub async fn recalculate_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        employee_ids: Option<&[u64]>,
    ) -> Result<RecalcSummary, EngineError> {
        if start > end {
            return Err(EngineError::InvalidDateRange { start, end });
        }

        let now = Local::now().naive_local();
        let employees = self.fetch_active_employees(employee_ids).await?;
        let shifts = self.fetch_shift_map().await?;

        let mut summary = RecalcSummary::default();
        let mut date = start;

        while date <= end {
            if !self.clock.is_finalized(date, now) {
                debug!(date = %date, "skipping live/future date");
                date = next_day(date);
                continue;
            }

            // Holiday lookup degrades to "no holiday" instead of aborting the batch.
            let holiday = match fetch_holiday(&self.pool, date).await {
                Ok(h) => h,
                Err(e) => {
                    warn!(date = %date, error = %e, "holiday lookup failed, assuming none");
                    None
                }
            };

            for employee in &employees {
                let shift = employee.shift_id.and_then(|id| shifts.get(&id));
                match self
                    .recalc_unit(employee.id, date, shift, holiday.as_ref())
                    .await
                {
                    Ok(UnitOutcome::Reclassified) => summary.processed += 1,
                    Ok(UnitOutcome::AbsentCreated) => {
                        summary.processed += 1;
                        summary.absents_created += 1;
                    }
                    Ok(UnitOutcome::Skipped) => {}
                    Err(e) => {
                        error!(
                            error = %e,
                            employee_id = employee.id,
                            date = %date,
                            "recalculation unit failed, continuing"
                        );
                        summary.failed += 1;
                    }
                }
            }

            date = next_day(date);
        }

        info!(
            start = %start,
            end = %end,
            processed = summary.processed,
            absents_created = summary.absents_created,
            failed = summary.failed,
            "recalculation run finished"
        );

        Ok(summary)
    }

    /// One (employee, date) unit: resolve the window against the *current*
    /// shift configuration, re-classify, and overwrite derived fields.
    async fn recalc_unit(
        &self,
        employee_id: u64,
        date: NaiveDate,
        shift: Option<&Shift>,
        holiday: Option<&Holiday>,
    ) -> Result<UnitOutcome, EngineError> {
        let window = resolve_window(shift, date, holiday);
        let existing = store::fetch_attendance(&self.pool, employee_id, date).await?;

        match existing {
            Some(record) => {
                // Punch-less rows on non-working days (manual holiday marks)
                // are left untouched.
                if !window.is_working_day()
                    && record.check_in.is_none()
                    && record.check_out.is_none()
                {
                    return Ok(UnitOutcome::Skipped);
                }

                let punches = Punches {
                    check_in: record.check_in,
                    check_out: record.check_out,
                };
                match classify(&punches, &window, &self.config, true)? {
                    Some(derived) => {
                        store::upsert_attendance(
                            &self.pool,
                            &AttendanceWrite {
                                employee_id,
                                date,
                                shift_id: shift.map(|s| s.id),
                                check_in: record.check_in,
                                check_out: record.check_out,
                                derived,
                            },
                        )
                        .await?;
                        Ok(UnitOutcome::Reclassified)
                    }
                    None => Ok(UnitOutcome::Skipped),
                }
            }
            None => {
                if !window.is_working_day() {
                    return Ok(UnitOutcome::Skipped);
                }
                match classify(&Punches::default(), &window, &self.config, true)? {
                    Some(derived) => {
                        store::upsert_attendance(
                            &self.pool,
                            &AttendanceWrite {
                                employee_id,
                                date,
                                shift_id: shift.map(|s| s.id),
                                check_in: None,
                                check_out: None,
                                derived,
                            },
                        )
                        .await?;
                        Ok(UnitOutcome::AbsentCreated)
                    }
                    None => Ok(UnitOutcome::Skipped),
                }
            }
        }
    }

    async fn fetch_active_employees(
        &self,
        employee_ids: Option<&[u64]>,
    ) -> Result<Vec<ActiveEmployee>, EngineError> {
        let mut sql =
            String::from("SELECT id, shift_id FROM employees WHERE status = 'active'");

        if let Some(ids) = employee_ids {
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            let placeholders = vec!["?"; ids.len()].join(", ");
            sql.push_str(&format!(" AND id IN ({})", placeholders));
        }

        let mut query = sqlx::query_as::<_, ActiveEmployee>(&sql);
        if let Some(ids) = employee_ids {
            for id in ids {
                query = query.bind(id);
            }
        }

        Ok(query.fetch_all(&self.pool).await?)
    }

    async fn fetch_shift_map(&self) -> Result<HashMap<u64, Shift>, EngineError> {
        let shifts = sqlx::query_as::<_, Shift>(
            r#"
            SELECT id, name, start_time, end_time,
                   monday, tuesday, wednesday, thursday, friday, saturday, sunday
            FROM shifts
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(shifts.into_iter().map(|s| (s.id, s)).collect())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ActiveEmployee {
    id: u64,
    shift_id: Option<u64>,
}

fn next_day(date: NaiveDate) -> NaiveDate {
    date.succ_opt().expect("date overflow")
}
