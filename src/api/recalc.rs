use crate::api::engine_error_response;
use crate::config::Config;
use crate::engine::recalc::{RecalcEngine, RecalcSummary};
use actix_web::{web, HttpResponse, Responder};
use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct RecalculateRequest {
    #[schema(example = "2026-01-01", value_type = String, format = "date")]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-31", value_type = String, format = "date")]
    pub end_date: NaiveDate,
    /// Restrict the run to these employees; omit for all active employees.
    #[schema(example = json!([1000, 1001]), nullable = true)]
    pub employee_ids: Option<Vec<u64>>,
}

/// Recalculate attendance over a date range
///
/// Re-runs classification against current shift configuration and backfills
/// absent rows for settled working days. Safe to re-run; unit failures are
/// counted, not fatal. Meant for an admin trigger or a nightly job, not for
/// per-request use.
#[utoipa::path(
    post,
    path = "/api/v1/attendance/recalculate",
    request_body = RecalculateRequest,
    responses(
        (status = 200, description = "Recalculation summary", body = RecalcSummary, example = json!({
            "processed": 120,
            "absents_created": 7,
            "failed": 0
        })),
        (status = 400, description = "Invalid date range"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn recalculate(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<RecalculateRequest>,
) -> actix_web::Result<impl Responder> {
    let engine = RecalcEngine::new(pool.get_ref().clone(), config.engine);

    match engine
        .recalculate_range(
            payload.start_date,
            payload.end_date,
            payload.employee_ids.as_deref(),
        )
        .await
    {
        Ok(summary) => Ok(HttpResponse::Ok().json(summary)),
        Err(e) => Ok(engine_error_response("recalculation", e)),
    }
}
