pub mod breakdown;
pub mod daily;
pub mod leave;
pub mod monthly;
pub mod scope;
pub mod tenure;

use crate::engine::error::EngineError;
use crate::model::attendance::AttendanceStatus;
use chrono::NaiveDate;
use scope::EmployeeScope;
use sqlx::MySqlPool;

/// Flat attendance projection shared by the read-side rollups. Fetched once
/// per aggregation call; all grouping happens in Rust on these rows.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AttendanceSlice {
    pub employee_id: u64,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub late_hours: f64,
    pub early_hours: f64,
    pub overtime_hours: f64,
}

pub(crate) async fn fetch_slices(
    pool: &MySqlPool,
    start: NaiveDate,
    end: NaiveDate,
    scope: &EmployeeScope,
) -> Result<Vec<AttendanceSlice>, EngineError> {
    let ids = match scope {
        EmployeeScope::All => None,
        EmployeeScope::Ids(ids) if ids.is_empty() => return Ok(Vec::new()),
        EmployeeScope::Ids(ids) => Some(ids),
    };

    let mut sql = String::from(
        "SELECT employee_id, date, status, late_hours, early_hours, overtime_hours \
         FROM attendance WHERE date BETWEEN ? AND ?",
    );
    if let Some(ids) = ids {
        let placeholders = vec!["?"; ids.len()].join(", ");
        sql.push_str(&format!(" AND employee_id IN ({})", placeholders));
    }

    let mut query = sqlx::query_as::<_, AttendanceSlice>(&sql).bind(start).bind(end);
    if let Some(ids) = ids {
        for id in ids {
            query = query.bind(id);
        }
    }

    Ok(query.fetch_all(pool).await?)
}
