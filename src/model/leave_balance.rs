use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Per (employee, leave type, year) ledger row, maintained by the leave
/// module. `available` is never stored; it is always recomputed as
/// `entitled + carried_forward - used`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveBalance {
    #[schema(example = 1)]
    pub id: u64,
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
    #[schema(example = "2026-03-31", value_type = String, format = "date", nullable = true)]
    pub carry_forward_expiry_date: Option<NaiveDate>,
}

impl LeaveBalance {
    pub fn available(&self) -> f64 {
        self.entitled + self.carried_forward - self.used
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn available_is_derived() {
        let b = LeaveBalance {
            id: 1,
            employee_id: 1,
            leave_type_id: 1,
            year: 2026,
            entitled: 20.0,
            used: 4.5,
            carried_forward: 2.0,
            carry_forward_expiry_date: None,
        };
        assert!((b.available() - 17.5).abs() < f64::EPSILON);
    }
}
