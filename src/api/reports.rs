use crate::api::engine_error_response;
use crate::config::Config;
use crate::engine::realtime::FinalizationClock;
use crate::report::breakdown::{late_arrival_breakdown, LateArrivalBreakdown};
use crate::report::daily::{daily_stats, DailyStats};
use crate::report::leave::{leave_balance_report, LeaveBalanceReportRow, LeaveReportFilters};
use crate::report::monthly::{monthly_trend, DayTrend};
use crate::report::scope::{self, ScopeFilter};
use crate::report::tenure::{tenure_statistics, TenureStatistics};
use actix_web::{web, HttpResponse, Responder};
use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::IntoParams;

#[derive(Deserialize, IntoParams)]
pub struct DailyQuery {
    /// Report date
    pub date: NaiveDate,
    /// Narrow to one employee (overrides department)
    pub employee_id: Option<u64>,
    /// Narrow to one department
    pub department_id: Option<u64>,
}

#[derive(Deserialize, IntoParams)]
pub struct MonthlyQuery {
    /// Calendar year
    pub year: i32,
    /// Calendar month (1-12)
    pub month: u32,
    pub employee_id: Option<u64>,
    pub department_id: Option<u64>,
}

#[derive(Deserialize, IntoParams)]
pub struct RangeQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub employee_id: Option<u64>,
    pub department_id: Option<u64>,
}

#[derive(Deserialize, IntoParams)]
pub struct LeaveBalanceQuery {
    pub year: Option<i32>,
    pub leave_type_id: Option<u64>,
    /// Only balances with expiring carry-forward
    pub expiring_soon: Option<bool>,
    pub employee_id: Option<u64>,
    pub department_id: Option<u64>,
}

#[derive(Deserialize, IntoParams)]
pub struct TenureQuery {
    pub employee_id: Option<u64>,
    pub department_id: Option<u64>,
}

fn scope_filter(employee_id: Option<u64>, department_id: Option<u64>) -> ScopeFilter {
    ScopeFilter {
        employee_id,
        department_id,
    }
}

/// Daily attendance counts
#[utoipa::path(
    get,
    path = "/api/v1/reports/daily",
    params(DailyQuery),
    responses(
        (status = 200, description = "Counts for the date", body = DailyStats),
        (status = 500, description = "Internal server error")
    ),
    tag = "Reports"
)]
pub async fn daily(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    query: web::Query<DailyQuery>,
) -> actix_web::Result<impl Responder> {
    let filter = scope_filter(query.employee_id, query.department_id);
    let scope = match scope::resolve(pool.get_ref(), &filter, None).await {
        Ok(s) => s,
        Err(e) => return Ok(engine_error_response("daily report scope", e)),
    };

    let clock = FinalizationClock::new(config.engine.daily_cutoff);
    match daily_stats(pool.get_ref(), query.date, &scope, &clock).await {
        Ok(stats) => Ok(HttpResponse::Ok().json(stats)),
        Err(e) => Ok(engine_error_response("daily report", e)),
    }
}

/// Monthly attendance trend
#[utoipa::path(
    get,
    path = "/api/v1/reports/monthly",
    params(MonthlyQuery),
    responses(
        (status = 200, description = "Per-day series for the month", body = [DayTrend]),
        (status = 400, description = "Invalid year/month"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Reports"
)]
pub async fn monthly(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    query: web::Query<MonthlyQuery>,
) -> actix_web::Result<impl Responder> {
    let Some(first_day) = NaiveDate::from_ymd_opt(query.year, query.month, 1) else {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Invalid year/month"
        })));
    };

    let filter = scope_filter(query.employee_id, query.department_id);
    let scope = match scope::resolve(pool.get_ref(), &filter, None).await {
        Ok(s) => s,
        Err(e) => return Ok(engine_error_response("monthly report scope", e)),
    };

    let clock = FinalizationClock::new(config.engine.daily_cutoff);
    match monthly_trend(pool.get_ref(), first_day, &scope, &clock).await {
        Ok(series) => Ok(HttpResponse::Ok().json(series)),
        Err(e) => Ok(engine_error_response("monthly report", e)),
    }
}

/// Late-arrival breakdowns by weekday and department
#[utoipa::path(
    get,
    path = "/api/v1/reports/late-arrivals",
    params(RangeQuery),
    responses(
        (status = 200, description = "Late arrival breakdowns", body = LateArrivalBreakdown),
        (status = 400, description = "Invalid date range"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Reports"
)]
pub async fn late_arrivals(
    pool: web::Data<MySqlPool>,
    query: web::Query<RangeQuery>,
) -> actix_web::Result<impl Responder> {
    let filter = scope_filter(query.employee_id, query.department_id);
    let scope = match scope::resolve(pool.get_ref(), &filter, None).await {
        Ok(s) => s,
        Err(e) => return Ok(engine_error_response("late-arrival report scope", e)),
    };

    match late_arrival_breakdown(pool.get_ref(), query.start_date, query.end_date, &scope).await {
        Ok(breakdown) => Ok(HttpResponse::Ok().json(breakdown)),
        Err(e) => Ok(engine_error_response("late-arrival report", e)),
    }
}

/// Leave balance and compliance report
#[utoipa::path(
    get,
    path = "/api/v1/reports/leave-balance",
    params(LeaveBalanceQuery),
    responses(
        (status = 200, description = "Balance rows with compliance flags", body = [LeaveBalanceReportRow]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Reports"
)]
pub async fn leave_balance(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    query: web::Query<LeaveBalanceQuery>,
) -> actix_web::Result<impl Responder> {
    let filter = scope_filter(query.employee_id, query.department_id);
    let scope = match scope::resolve(pool.get_ref(), &filter, None).await {
        Ok(s) => s,
        Err(e) => return Ok(engine_error_response("leave balance scope", e)),
    };

    let filters = LeaveReportFilters {
        year: query.year,
        leave_type_id: query.leave_type_id,
        expiring_only: query.expiring_soon.unwrap_or(false),
    };

    match leave_balance_report(pool.get_ref(), &filters, &scope, &config.engine).await {
        Ok(rows) => Ok(HttpResponse::Ok().json(rows)),
        Err(e) => Ok(engine_error_response("leave balance report", e)),
    }
}

/// Tenure statistics
#[utoipa::path(
    get,
    path = "/api/v1/reports/tenure",
    params(TenureQuery),
    responses(
        (status = 200, description = "Tenure rollup", body = TenureStatistics),
        (status = 500, description = "Internal server error")
    ),
    tag = "Reports"
)]
pub async fn tenure(
    pool: web::Data<MySqlPool>,
    query: web::Query<TenureQuery>,
) -> actix_web::Result<impl Responder> {
    let filter = scope_filter(query.employee_id, query.department_id);
    let scope = match scope::resolve(pool.get_ref(), &filter, None).await {
        Ok(s) => s,
        Err(e) => return Ok(engine_error_response("tenure report scope", e)),
    };

    match tenure_statistics(pool.get_ref(), &scope).await {
        Ok(stats) => Ok(HttpResponse::Ok().json(stats)),
        Err(e) => Ok(engine_error_response("tenure report", e)),
    }
}
