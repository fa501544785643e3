use crate::engine::classifier::Derived;
use crate::engine::error::EngineError;
use crate::model::attendance::AttendanceRecord;
use chrono::{NaiveDate, NaiveTime};
use sqlx::MySqlPool;
use tracing::warn;

/// Full write image of one attendance row. Derived fields are overwritten in
/// place; the `(employee_id, date)` unique key guarantees one row per day.
#[derive(Debug, Clone)]
pub struct AttendanceWrite {
    pub employee_id: u64,
    pub date: NaiveDate,
    pub shift_id: Option<u64>,
    pub check_in: Option<NaiveTime>,
    pub check_out: Option<NaiveTime>,
    pub derived: Derived,
}

const UPSERT_SQL: &str = r#"
    INSERT INTO attendance
        (employee_id, date, shift_id, check_in, check_out,
         status, working_hours, late_hours, early_hours, overtime_hours, incomplete)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
    ON DUPLICATE KEY UPDATE
        shift_id = VALUES(shift_id),
        check_in = VALUES(check_in),
        check_out = VALUES(check_out),
        status = VALUES(status),
        working_hours = VALUES(working_hours),
        late_hours = VALUES(late_hours),
        early_hours = VALUES(early_hours),
        overtime_hours = VALUES(overtime_hours),
        incomplete = VALUES(incomplete)
"#;

/// Atomic upsert of one (employee, date) row. A concurrent-write collision
/// (duplicate key or deadlock) is retried once with the same image; a second
/// failure surfaces as `DuplicateRecordConflict`.
pub async fn upsert_attendance(pool: &MySqlPool, row: &AttendanceWrite) -> Result<(), EngineError> {
    match execute_upsert(pool, row).await {
        Ok(()) => Ok(()),
        Err(e) if is_write_conflict(&e) => {
            warn!(
                employee_id = row.employee_id,
                date = %row.date,
                error = %e,
                "attendance upsert collided, retrying once"
            );
            execute_upsert(pool, row).await.map_err(|_| {
                EngineError::DuplicateRecordConflict {
                    employee_id: row.employee_id,
                    date: row.date,
                }
            })
        }
        Err(e) => Err(e.into()),
    }
}

async fn execute_upsert(pool: &MySqlPool, row: &AttendanceWrite) -> Result<(), sqlx::Error> {
    sqlx::query(UPSERT_SQL)
        .bind(row.employee_id)
        .bind(row.date)
        .bind(row.shift_id)
        .bind(row.check_in)
        .bind(row.check_out)
        .bind(row.derived.status)
        .bind(row.derived.working_hours)
        .bind(row.derived.late_hours)
        .bind(row.derived.early_hours)
        .bind(row.derived.overtime_hours)
        .bind(row.derived.incomplete)
        .execute(pool)
        .await?;
    Ok(())
}

fn is_write_conflict(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db_err) => {
            // 23000: duplicate key, 40001: serialization failure / deadlock
            matches!(db_err.code().as_deref(), Some("23000") | Some("40001"))
        }
        _ => false,
    }
}

pub async fn fetch_attendance(
    pool: &MySqlPool,
    employee_id: u64,
    date: NaiveDate,
) -> Result<Option<AttendanceRecord>, EngineError> {
    let record = sqlx::query_as::<_, AttendanceRecord>(
        r#"
        SELECT id, employee_id, date, shift_id, check_in, check_out,
               status, working_hours, late_hours, early_hours, overtime_hours,
               incomplete, notes
        FROM attendance
        WHERE employee_id = ? AND date = ?
        "#,
    )
    .bind(employee_id)
    .bind(date)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}
