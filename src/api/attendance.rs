use crate::api::engine_error_response;
use crate::config::Config;
use crate::engine::classifier::{classify, Punches};
use crate::engine::realtime::FinalizationClock;
use crate::engine::shift_resolver::{fetch_holiday, fetch_shift_for_employee, resolve_window};
use crate::engine::store::{self, AttendanceWrite};
use crate::model::attendance::{round_hours, AttendanceRecord, AttendanceStatus};
use actix_web::{web, HttpResponse, Responder};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct PunchRequest {
    #[schema(example = 1000)]
    pub employee_id: u64,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct AttendanceFilter {
    #[schema(example = 1000)]
    /// Filter by employee ID
    pub employee_id: Option<u64>,
    #[schema(example = "2026-01-01", value_type = String, format = "date")]
    /// Start of the date range
    pub from: Option<NaiveDate>,
    #[schema(example = "2026-01-31", value_type = String, format = "date")]
    /// End of the date range
    pub to: Option<NaiveDate>,
    #[schema(example = "late")]
    /// Filter by attendance status
    pub status: Option<AttendanceStatus>,
    #[schema(example = 1)]
    /// Pagination page number (start with 1)
    pub page: Option<u64>,
    #[schema(example = 20)]
    /// Pagination per page number
    pub per_page: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct AttendanceListResponse {
    pub data: Vec<AttendanceRecord>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 20)]
    pub per_page: u32,
    #[schema(example = 42)]
    pub total: i64,
}

// Helper enum for typed SQLx binding
enum FilterValue<'a> {
    U64(u64),
    Date(NaiveDate),
    Str(&'a str),
}

/// Check-in endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance/check-in",
    request_body = PunchRequest,
    responses(
        (status = 200, description = "Checked in successfully", body = Object, example = json!({
            "message": "Checked in successfully",
            "status": "late",
            "late_hours": 0.33
        })),
        (status = 400, description = "Already checked in today", body = Object, example = json!({
            "message": "Already checked in today"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn check_in(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<PunchRequest>,
) -> actix_web::Result<impl Responder> {
    let employee_id = payload.employee_id;
    let now = Local::now().naive_local();
    let clock = FinalizationClock::new(config.engine.daily_cutoff);

    let shift = match fetch_shift_for_employee(pool.get_ref(), employee_id).await {
        Ok(s) => s,
        Err(e) => return Ok(engine_error_response("check-in shift lookup", e)),
    };
    let holiday = match fetch_holiday(pool.get_ref(), now.date()).await {
        Ok(h) => h,
        Err(e) => return Ok(engine_error_response("check-in holiday lookup", e)),
    };

    let window = resolve_window(shift.as_ref(), now.date(), holiday.as_ref());
    let punches = Punches {
        check_in: Some(now.time()),
        check_out: None,
    };
    let derived = match classify(
        &punches,
        &window,
        &config.engine,
        clock.is_finalized(now.date(), now),
    ) {
        Ok(Some(d)) => d,
        // A present check-in always classifies; treat anything else as a bug.
        Ok(None) => {
            tracing::error!(employee_id, "check-in produced no classification");
            return Ok(HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Internal Server Error"
            })));
        }
        Err(e) => return Ok(engine_error_response("check-in classification", e)),
    };

    // Plain INSERT so a second punch of the day trips the unique key.
    let result = sqlx::query(
        r#"
        INSERT INTO attendance
            (employee_id, date, shift_id, check_in, status,
             working_hours, late_hours, early_hours, overtime_hours, incomplete)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(employee_id)
    .bind(now.date())
    .bind(shift.as_ref().map(|s| s.id))
    .bind(now.time())
    .bind(derived.status)
    .bind(derived.working_hours)
    .bind(derived.late_hours)
    .bind(derived.early_hours)
    .bind(derived.overtime_hours)
    .bind(derived.incomplete)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "message": "Checked in successfully",
            "status": derived.status,
            "late_hours": round_hours(derived.late_hours)
        }))),

        Err(e) => {
            // Duplicate check-in for same day
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                        "message": "Already checked in today"
                    })));
                }
            }

            tracing::error!(error = %e, employee_id, "Check-in failed");
            Err(actix_web::error::ErrorInternalServerError(
                "Internal Server Error",
            ))
        }
    }
}

/// Check-out endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance/check-out",
    request_body = PunchRequest,
    responses(
        (status = 200, description = "Checked out successfully", body = Object, example = json!({
            "message": "Checked out successfully",
            "status": "present",
            "working_hours": 8.25,
            "overtime_hours": 0.25
        })),
        (status = 400, description = "No active check-in found for today", body = Object, example = json!({
            "message": "No active check-in found for today"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn check_out(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<PunchRequest>,
) -> actix_web::Result<impl Responder> {
    let employee_id = payload.employee_id;
    let now = Local::now().naive_local();
    let clock = FinalizationClock::new(config.engine.daily_cutoff);

    let record = match store::fetch_attendance(pool.get_ref(), employee_id, now.date()).await {
        Ok(r) => r,
        Err(e) => return Ok(engine_error_response("check-out lookup", e)),
    };

    let Some(record) = record.filter(|r| r.check_in.is_some() && r.check_out.is_none()) else {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "No active check-in found for today"
        })));
    };

    let shift = match fetch_shift_for_employee(pool.get_ref(), employee_id).await {
        Ok(s) => s,
        Err(e) => return Ok(engine_error_response("check-out shift lookup", e)),
    };
    let holiday = match fetch_holiday(pool.get_ref(), now.date()).await {
        Ok(h) => h,
        Err(e) => return Ok(engine_error_response("check-out holiday lookup", e)),
    };

    let window = resolve_window(shift.as_ref(), now.date(), holiday.as_ref());
    let punches = Punches {
        check_in: record.check_in,
        check_out: Some(now.time()),
    };
    let derived = match classify(
        &punches,
        &window,
        &config.engine,
        clock.is_finalized(now.date(), now),
    ) {
        Ok(Some(d)) => d,
        Ok(None) => {
            tracing::error!(employee_id, "check-out produced no classification");
            return Ok(HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Internal Server Error"
            })));
        }
        Err(e) => return Ok(engine_error_response("check-out classification", e)),
    };

    let write = AttendanceWrite {
        employee_id,
        date: now.date(),
        shift_id: shift.as_ref().map(|s| s.id),
        check_in: record.check_in,
        check_out: Some(now.time()),
        derived,
    };
    if let Err(e) = store::upsert_attendance(pool.get_ref(), &write).await {
        return Ok(engine_error_response("check-out upsert", e));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Checked out successfully",
        "status": derived.status,
        "working_hours": round_hours(derived.working_hours),
        "overtime_hours": round_hours(derived.overtime_hours)
    })))
}

/// Attendance history listing
#[utoipa::path(
    get,
    path = "/api/v1/attendance",
    params(AttendanceFilter),
    responses(
        (status = 200, description = "Paginated attendance list", body = AttendanceListResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(
    pool: web::Data<MySqlPool>,
    query: web::Query<AttendanceFilter>,
) -> actix_web::Result<impl Responder> {
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    // -------------------------
    // WHERE clause
    // -------------------------
    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(employee_id) = query.employee_id {
        where_sql.push_str(" AND employee_id = ?");
        args.push(FilterValue::U64(employee_id));
    }

    if let Some(from) = query.from {
        where_sql.push_str(" AND date >= ?");
        args.push(FilterValue::Date(from));
    }

    if let Some(to) = query.to {
        where_sql.push_str(" AND date <= ?");
        args.push(FilterValue::Date(to));
    }

    let status_str = query.status.map(|s| s.to_string());
    if let Some(status) = status_str.as_deref() {
        where_sql.push_str(" AND status = ?");
        args.push(FilterValue::Str(status));
    }

    // -------------------------
    // COUNT query
    // -------------------------
    let count_sql = format!("SELECT COUNT(*) FROM attendance{}", where_sql);

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Date(d) => count_q.bind(*d),
            FilterValue::Str(s) => count_q.bind(*s),
        };
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to count attendance records");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    // -------------------------
    // DATA query
    // -------------------------
    let data_sql = format!(
        r#"
        SELECT id, employee_id, date, shift_id, check_in, check_out,
               status, working_hours, late_hours, early_hours, overtime_hours,
               incomplete, notes
        FROM attendance
        {}
        ORDER BY date DESC, employee_id
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, AttendanceRecord>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(v),
            FilterValue::Date(d) => data_q.bind(d),
            FilterValue::Str(s) => data_q.bind(s),
        };
    }

    let mut records = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch attendance list");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    for record in &mut records {
        record.working_hours = round_hours(record.working_hours);
        record.late_hours = round_hours(record.late_hours);
        record.early_hours = round_hours(record.early_hours);
        record.overtime_hours = round_hours(record.overtime_hours);
    }

    Ok(HttpResponse::Ok().json(AttendanceListResponse {
        data: records,
        page: page as u32,
        per_page: per_page as u32,
        total,
    }))
}
