use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Lifecycle of a punch-correction request. `Pending` transitions exactly
/// once; `Approved`/`Rejected` are terminal.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    sqlx::Type,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum RegularizationStatus {
    Pending,
    Approved,
    Rejected,
}

/// Employee-submitted correction to punch times for one attendance date.
/// Approval re-classifies the linked record using the requested times.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct RegularizationRequest {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(example = "2026-01-05", value_type = String, format = "date")]
    pub date: NaiveDate,
    #[schema(example = "09:00:00", value_type = String)]
    pub requested_check_in: NaiveTime,
    #[schema(example = "17:00:00", value_type = String, nullable = true)]
    pub requested_check_out: Option<NaiveTime>,
    #[schema(example = "forgot to punch out")]
    pub reason: String,
    #[schema(example = "pending")]
    pub status: RegularizationStatus,
    #[schema(example = 7, nullable = true)]
    pub reviewed_by: Option<u64>,
    #[schema(example = "2026-01-06T10:00:00Z", value_type = String, nullable = true)]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[schema(example = "2026-01-05T18:00:00Z", value_type = String, nullable = true)]
    pub created_at: Option<DateTime<Utc>>,
}
