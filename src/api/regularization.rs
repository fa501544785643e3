use crate::api::engine_error_response;
use crate::config::Config;
use crate::engine::classifier::{classify, Punches};
use crate::engine::shift_resolver::{fetch_holiday, fetch_shift_for_employee, resolve_window};
use crate::engine::store::{self, AttendanceWrite};
use crate::model::regularization::{RegularizationRequest, RegularizationStatus};
use actix_web::{web, HttpResponse, Responder};
use chrono::{Local, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CreateRegularization {
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
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct RegularizationFilter {
    #[schema(example = 1000)]
    /// Filter by employee ID
    pub employee_id: Option<u64>,
    #[schema(example = "pending")]
    /// Filter by request status
    pub status: Option<RegularizationStatus>,
    #[schema(example = 1)]
    /// Pagination page number (start with 1)
    pub page: Option<u64>,
    #[schema(example = 10)]
    /// Pagination per page number
    pub per_page: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct RegularizationListResponse {
    pub data: Vec<RegularizationRequest>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 3)]
    pub total: i64,
}

/* =========================
Create regularization request
========================= */
/// Swagger doc for create_regularization endpoint
#[utoipa::path(
    post,
    path = "/api/v1/regularizations",
    request_body(
        content = CreateRegularization,
        description = "Punch correction payload",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Regularization request submitted",
         body = Object,
         example = json!({
            "message": "Regularization request submitted",
            "status": "pending"
         })
        ),
        (status = 400, description = "Bad request"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Regularization"
)]
pub async fn create_regularization(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<CreateRegularization>,
) -> actix_web::Result<impl Responder> {
    let employee_id = payload.employee_id;
    let today = Local::now().date_naive();

    if payload.date > today {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Cannot regularize a future date"
        })));
    }

    // Validate the requested punches with a dry-run classification so an
    // invalid punch order is rejected up front, not at approval time.
    let shift = match fetch_shift_for_employee(pool.get_ref(), employee_id).await {
        Ok(s) => s,
        Err(e) => return Ok(engine_error_response("regularization shift lookup", e)),
    };
    let holiday = match fetch_holiday(pool.get_ref(), payload.date).await {
        Ok(h) => h,
        Err(e) => return Ok(engine_error_response("regularization holiday lookup", e)),
    };
    let window = resolve_window(shift.as_ref(), payload.date, holiday.as_ref());
    let punches = Punches {
        check_in: Some(payload.requested_check_in),
        check_out: payload.requested_check_out,
    };
    if let Err(e) = classify(&punches, &window, &config.engine, true) {
        return Ok(engine_error_response("regularization validation", e));
    }

    // One pending request per (employee, date) is a business rule, not a
    // storage constraint.
    let pending: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM regularization_requests \
         WHERE employee_id = ? AND date = ? AND status = 'pending'",
    )
    .bind(employee_id)
    .bind(payload.date)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id, "Failed to check pending regularizations");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if pending > 0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "A pending request already exists for this date"
        })));
    }

    sqlx::query(
        r#"
        INSERT INTO regularization_requests
            (employee_id, date, requested_check_in, requested_check_out, reason, status)
        VALUES (?, ?, ?, ?, ?, 'pending')
        "#,
    )
    .bind(employee_id)
    .bind(payload.date)
    .bind(payload.requested_check_in)
    .bind(payload.requested_check_out)
    .bind(&payload.reason)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id, "Failed to create regularization request");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Regularization request submitted",
        "status": "pending"
    })))
}

/* =========================
Approve regularization (HR/Admin)
========================= */
/// Swagger doc for approve_regularization endpoint
#[utoipa::path(
    put,
    path = "/api/v1/regularizations/{request_id}/approve",
    params(
        ("request_id" = u64, Path, description = "ID of the request to approve")
    ),
    responses(
        (status = 200, description = "Request approved and record re-classified", body = Object, example = json!({
            "message": "Regularization approved"
        })),
        (status = 400, description = "Request not found or already processed", body = Object, example = json!({
            "message": "Request not found or already processed"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Regularization"
)]
pub async fn approve_regularization(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let request_id = path.into_inner();

    // Pending is the only state that can transition; terminal states stay put.
    let result = sqlx::query(
        r#"
        UPDATE regularization_requests
        SET status = 'approved', reviewed_at = NOW()
        WHERE id = ?
        AND status = 'pending'
        "#,
    )
    .bind(request_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, request_id, "Approve regularization failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Request not found or already processed"
        })));
    }

    let request = sqlx::query_as::<_, RegularizationRequest>(
        r#"
        SELECT id, employee_id, date, requested_check_in, requested_check_out,
               reason, status, reviewed_by, reviewed_at, created_at
        FROM regularization_requests
        WHERE id = ?
        "#,
    )
    .bind(request_id)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, request_id, "Failed to fetch approved request");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    // Re-classify the linked record using the requested times in place of
    // the raw punches.
    let shift = match fetch_shift_for_employee(pool.get_ref(), request.employee_id).await {
        Ok(s) => s,
        Err(e) => return Ok(engine_error_response("approval shift lookup", e)),
    };
    let holiday = match fetch_holiday(pool.get_ref(), request.date).await {
        Ok(h) => h,
        Err(e) => return Ok(engine_error_response("approval holiday lookup", e)),
    };
    let window = resolve_window(shift.as_ref(), request.date, holiday.as_ref());
    let punches = Punches {
        check_in: Some(request.requested_check_in),
        check_out: request.requested_check_out,
    };

    let derived = match classify(&punches, &window, &config.engine, true) {
        Ok(Some(d)) => d,
        Ok(None) => {
            tracing::error!(request_id, "approved request produced no classification");
            return Ok(HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Internal Server Error"
            })));
        }
        Err(e) => return Ok(engine_error_response("approval classification", e)),
    };

    let write = AttendanceWrite {
        employee_id: request.employee_id,
        date: request.date,
        shift_id: shift.as_ref().map(|s| s.id),
        check_in: Some(request.requested_check_in),
        check_out: request.requested_check_out,
        derived,
    };
    if let Err(e) = store::upsert_attendance(pool.get_ref(), &write).await {
        return Ok(engine_error_response("approval upsert", e));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Regularization approved"
    })))
}

/* =========================
Reject regularization (HR/Admin)
========================= */
/// Swagger doc for reject_regularization endpoint
#[utoipa::path(
    put,
    path = "/api/v1/regularizations/{request_id}/reject",
    params(
        ("request_id" = u64, Path, description = "ID of the request to reject")
    ),
    responses(
        (status = 200, description = "Request rejected", body = Object, example = json!({
            "message": "Regularization rejected"
        })),
        (status = 400, description = "Request not found or already processed", body = Object, example = json!({
            "message": "Request not found or already processed"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Regularization"
)]
pub async fn reject_regularization(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let request_id = path.into_inner();

    let result = sqlx::query(
        r#"
        UPDATE regularization_requests
        SET status = 'rejected', reviewed_at = NOW()
        WHERE id = ?
        AND status = 'pending'
        "#,
    )
    .bind(request_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, request_id, "Reject regularization failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Request not found or already processed"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Regularization rejected"
    })))
}

/// Regularization request listing
#[utoipa::path(
    get,
    path = "/api/v1/regularizations",
    params(RegularizationFilter),
    responses(
        (status = 200, description = "Paginated request list", body = RegularizationListResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Regularization"
)]
pub async fn list_regularizations(
    pool: web::Data<MySqlPool>,
    query: web::Query<RegularizationFilter>,
) -> actix_web::Result<impl Responder> {
    let per_page = query.per_page.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    let mut where_sql = String::from(" WHERE 1=1");
    if query.employee_id.is_some() {
        where_sql.push_str(" AND employee_id = ?");
    }
    let status_str = query.status.map(|s| s.to_string());
    if status_str.is_some() {
        where_sql.push_str(" AND status = ?");
    }

    let count_sql = format!("SELECT COUNT(*) FROM regularization_requests{}", where_sql);
    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    if let Some(employee_id) = query.employee_id {
        count_q = count_q.bind(employee_id);
    }
    if let Some(status) = status_str.as_deref() {
        count_q = count_q.bind(status);
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to count regularization requests");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let data_sql = format!(
        r#"
        SELECT id, employee_id, date, requested_check_in, requested_check_out,
               reason, status, reviewed_by, reviewed_at, created_at
        FROM regularization_requests
        {}
        ORDER BY created_at DESC
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, RegularizationRequest>(&data_sql);
    if let Some(employee_id) = query.employee_id {
        data_q = data_q.bind(employee_id);
    }
    if let Some(status) = status_str.as_deref() {
        data_q = data_q.bind(status);
    }

    let requests = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch regularization list");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(RegularizationListResponse {
        data: requests,
        page: page as u32,
        per_page: per_page as u32,
        total,
    }))
}
