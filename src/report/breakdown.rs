use crate::engine::error::EngineError;
use crate::report::scope::EmployeeScope;
use crate::report::{fetch_slices, AttendanceSlice};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;
use sqlx::MySqlPool;
use std::collections::HashMap;
use utoipa::ToSchema;

#[derive(Debug, Serialize, PartialEq, Eq, ToSchema)]
pub struct BreakdownEntry {
    #[schema(example = "Monday")]
    pub label: String,
    #[schema(example = 12)]
    pub count: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LateArrivalBreakdown {
    pub by_weekday: Vec<BreakdownEntry>,
    pub by_department: Vec<BreakdownEntry>,
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

fn sorted_entries(counts: HashMap<String, u64>) -> Vec<BreakdownEntry> {
    let mut entries: Vec<BreakdownEntry> = counts
        .into_iter()
        .map(|(label, count)| BreakdownEntry { label, count })
        .collect();
    // Descending by count; label as tiebreaker keeps output stable.
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    entries
}

/// Late-arrival counts grouped by weekday name, "top offenders" first.
pub fn group_late_by_weekday(rows: &[AttendanceSlice]) -> Vec<BreakdownEntry> {
    let mut counts: HashMap<String, u64> = HashMap::new();
    for row in rows.iter().filter(|r| r.late_hours > 0.0) {
        *counts
            .entry(weekday_name(row.date.weekday()).to_string())
            .or_default() += 1;
    }
    sorted_entries(counts)
}

/// Late-arrival counts per department, using a flat employee → department
/// projection fetched once (no per-row relationship walking).
pub fn group_late_by_department(
    rows: &[AttendanceSlice],
    departments: &HashMap<u64, String>,
) -> Vec<BreakdownEntry> {
    let mut counts: HashMap<String, u64> = HashMap::new();
    for row in rows.iter().filter(|r| r.late_hours > 0.0) {
        let label = departments
            .get(&row.employee_id)
            .cloned()
            .unwrap_or_else(|| "Unknown".to_string());
        *counts.entry(label).or_default() += 1;
    }
    sorted_entries(counts)
}

pub async fn late_arrival_breakdown(
    pool: &MySqlPool,
    start: NaiveDate,
    end: NaiveDate,
    scope: &EmployeeScope,
) -> Result<LateArrivalBreakdown, EngineError> {
    if start > end {
        return Err(EngineError::InvalidDateRange { start, end });
    }

    let rows = fetch_slices(pool, start, end, scope).await?;
    let departments = fetch_department_names(pool, scope).await?;

    Ok(LateArrivalBreakdown {
        by_weekday: group_late_by_weekday(&rows),
        by_department: group_late_by_department(&rows, &departments),
    })
}

async fn fetch_department_names(
    pool: &MySqlPool,
    scope: &EmployeeScope,
) -> Result<HashMap<u64, String>, EngineError> {
    let ids = match scope {
        EmployeeScope::All => None,
        EmployeeScope::Ids(ids) if ids.is_empty() => return Ok(HashMap::new()),
        EmployeeScope::Ids(ids) => Some(ids),
    };

    let mut sql = String::from(
        "SELECT e.id, d.name FROM employees e JOIN departments d ON d.id = e.department_id",
    );
    if let Some(ids) = ids {
        let placeholders = vec!["?"; ids.len()].join(", ");
        sql.push_str(&format!(" WHERE e.id IN ({})", placeholders));
    }

    let mut query = sqlx::query_as::<_, (u64, String)>(&sql);
    if let Some(ids) = ids {
        for id in ids {
            query = query.bind(id);
        }
    }

    Ok(query.fetch_all(pool).await?.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attendance::AttendanceStatus;

    fn late_on(date: &str, employee_id: u64) -> AttendanceSlice {
        AttendanceSlice {
            employee_id,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            status: AttendanceStatus::Late,
            late_hours: 0.5,
            early_hours: 0.0,
            overtime_hours: 0.0,
        }
    }

    fn on_time(date: &str, employee_id: u64) -> AttendanceSlice {
        AttendanceSlice {
            late_hours: 0.0,
            status: AttendanceStatus::Present,
            ..late_on(date, employee_id)
        }
    }

    #[test]
    fn weekday_grouping_sorts_descending() {
        // Two Mondays, one Tuesday.
        let rows = vec![
            late_on("2026-01-05", 1),
            late_on("2026-01-12", 2),
            late_on("2026-01-06", 3),
            on_time("2026-01-07", 4),
        ];
        let entries = group_late_by_weekday(&rows);
        assert_eq!(entries[0].label, "Monday");
        assert_eq!(entries[0].count, 2);
        assert_eq!(entries[1].label, "Tuesday");
        assert_eq!(entries[1].count, 1);
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn department_grouping_uses_flat_lookup() {
        let rows = vec![late_on("2026-01-05", 1), late_on("2026-01-05", 2)];
        let mut departments = HashMap::new();
        departments.insert(1, "Engineering".to_string());
        // Employee 2 has no department row.
        let entries = group_late_by_department(&rows, &departments);
        assert!(entries.contains(&BreakdownEntry {
            label: "Engineering".into(),
            count: 1
        }));
        assert!(entries.contains(&BreakdownEntry {
            label: "Unknown".into(),
            count: 1
        }));
    }
}
