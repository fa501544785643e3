use crate::config::EngineConfig;
use crate::engine::error::EngineError;
use crate::model::attendance::round_hours;
use crate::model::leave_balance::LeaveBalance;
use crate::report::scope::EmployeeScope;
use chrono::{Duration, Local, NaiveDate};
use serde::Serialize;
use sqlx::MySqlPool;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Default)]
pub struct LeaveReportFilters {
    pub year: Option<i32>,
    pub leave_type_id: Option<u64>,
    /// Restrict to balances whose carry-forward expires within the window.
    pub expiring_only: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LeaveBalanceReportRow {
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(example = 3)]
    pub leave_type_id: u64,
    #[schema(example = 2026)]
    pub year: i32,
    #[schema(example = 20.0)]
    pub entitled: f64,
    #[schema(example = 4.5)]
    pub used: f64,
    #[schema(example = 2.0)]
    pub carried_forward: f64,
    #[schema(example = 17.5)]
    pub available: f64,
    #[schema(example = "2026-03-31", value_type = String, format = "date", nullable = true)]
    pub expiry_date: Option<NaiveDate>,
    /// Carry-forward already expired or expiring within the warning window.
    #[schema(example = false)]
    pub expiring_soon: bool,
    #[schema(example = true)]
    pub encashment_eligible: bool,
    /// Utilization of the entitlement is below the alert threshold.
    #[schema(example = false)]
    pub high_unused: bool,
}

/// Project one ledger row into its report form. `available` is recomputed
/// here, never read from storage.
pub fn project_balance(
    balance: &LeaveBalance,
    today: NaiveDate,
    config: &EngineConfig,
) -> LeaveBalanceReportRow {
    let available = balance.available();

    let expiring_soon = balance
        .carry_forward_expiry_date
        .map(|expiry| expiry <= today + Duration::days(config.expiry_warning_days))
        .unwrap_or(false);

    let utilization = if balance.entitled > 0.0 {
        balance.used / balance.entitled
    } else {
        1.0
    };

    LeaveBalanceReportRow {
        employee_id: balance.employee_id,
        leave_type_id: balance.leave_type_id,
        year: balance.year,
        entitled: round_hours(balance.entitled),
        used: round_hours(balance.used),
        carried_forward: round_hours(balance.carried_forward),
        available: round_hours(available),
        expiry_date: balance.carry_forward_expiry_date,
        expiring_soon,
        encashment_eligible: available >= config.encashment_min_days,
        high_unused: utilization < config.low_utilization_ratio,
    }
}

pub async fn leave_balance_report(
    pool: &MySqlPool,
    filters: &LeaveReportFilters,
    scope: &EmployeeScope,
    config: &EngineConfig,
) -> Result<Vec<LeaveBalanceReportRow>, EngineError> {
    let ids = match scope {
        EmployeeScope::All => None,
        EmployeeScope::Ids(ids) if ids.is_empty() => return Ok(Vec::new()),
        EmployeeScope::Ids(ids) => Some(ids),
    };

    let mut sql = String::from(
        "SELECT id, employee_id, leave_type_id, year, entitled, used, carried_forward, \
         carry_forward_expiry_date FROM leave_balances WHERE 1=1",
    );
    if filters.year.is_some() {
        sql.push_str(" AND year = ?");
    }
    if filters.leave_type_id.is_some() {
        sql.push_str(" AND leave_type_id = ?");
    }
    if let Some(ids) = ids {
        let placeholders = vec!["?"; ids.len()].join(", ");
        sql.push_str(&format!(" AND employee_id IN ({})", placeholders));
    }
    sql.push_str(" ORDER BY employee_id, leave_type_id");

    let mut query = sqlx::query_as::<_, LeaveBalance>(&sql);
    if let Some(year) = filters.year {
        query = query.bind(year);
    }
    if let Some(leave_type_id) = filters.leave_type_id {
        query = query.bind(leave_type_id);
    }
    if let Some(ids) = ids {
        for id in ids {
            query = query.bind(id);
        }
    }

    let today = Local::now().date_naive();
    let rows = query
        .fetch_all(pool)
        .await?
        .iter()
        .map(|b| project_balance(b, today, config))
        .filter(|r| !filters.expiring_only || r.expiring_soon)
        .collect();

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balance(entitled: f64, used: f64, carried: f64, expiry: Option<&str>) -> LeaveBalance {
        LeaveBalance {
            id: 1,
            employee_id: 1000,
            leave_type_id: 3,
            year: 2026,
            entitled,
            used,
            carried_forward: carried,
            carry_forward_expiry_date: expiry
                .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()),
        }
    }

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn available_invariant_holds() {
        let row = project_balance(
            &balance(20.0, 4.5, 2.0, None),
            d("2026-01-05"),
            &EngineConfig::default(),
        );
        assert!((row.available - (row.entitled + row.carried_forward - row.used)).abs() < 1e-9);
        assert_eq!(row.available, 17.5);
    }

    #[test]
    fn flags_expiring_within_window_and_past() {
        let config = EngineConfig::default();
        let today = d("2026-01-05");

        let soon = project_balance(&balance(10.0, 0.0, 3.0, Some("2026-01-20")), today, &config);
        assert!(soon.expiring_soon);

        let past = project_balance(&balance(10.0, 0.0, 3.0, Some("2025-12-01")), today, &config);
        assert!(past.expiring_soon);

        let far = project_balance(&balance(10.0, 0.0, 3.0, Some("2026-06-01")), today, &config);
        assert!(!far.expiring_soon);
    }

    #[test]
    fn encashment_requires_policy_minimum() {
        let config = EngineConfig::default();
        let today = d("2026-01-05");

        let eligible = project_balance(&balance(10.0, 2.0, 0.0, None), today, &config);
        assert!(eligible.encashment_eligible);

        let short = project_balance(&balance(5.0, 2.0, 0.0, None), today, &config);
        assert!(!short.encashment_eligible);
    }

    #[test]
    fn high_unused_alert_on_low_utilization() {
        let config = EngineConfig::default();
        let today = d("2026-01-05");

        let idle = project_balance(&balance(20.0, 1.0, 0.0, None), today, &config);
        assert!(idle.high_unused);

        let active = project_balance(&balance(20.0, 10.0, 0.0, None), today, &config);
        assert!(!active.high_unused);

        // Zero entitlement can't be under-utilized.
        let zero = project_balance(&balance(0.0, 0.0, 0.0, None), today, &config);
        assert!(!zero.high_unused);
    }
}
