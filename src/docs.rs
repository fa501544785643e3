use crate::api::attendance::{AttendanceListResponse, PunchRequest};
use crate::api::employee::{AssignShift, CreateEmployee, EmployeeListResponse};
use crate::api::recalc::RecalculateRequest;
use crate::api::regularization::{CreateRegularization, RegularizationListResponse};
use crate::engine::recalc::RecalcSummary;
use crate::model::attendance::{AttendanceRecord, AttendanceStatus};
use crate::model::employee::Employee;
use crate::model::regularization::{RegularizationRequest, RegularizationStatus};
use crate::report::breakdown::{BreakdownEntry, LateArrivalBreakdown};
use crate::report::daily::DailyStats;
use crate::report::leave::LeaveBalanceReportRow;
use crate::report::monthly::DayTrend;
use crate::report::tenure::{TenureBucket, TenureEntry, TenureStatistics};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRM Attendance Engine API",
        version = "1.0.0",
        description = r#"
## Attendance Derivation & Reporting Engine

This API derives attendance facts from raw punch events and serves reporting
rollups on top of them.

### 🔹 Key Features
- **Attendance Tracking**
  - Daily check-in / check-out with shift-aware late, early-departure and
    overtime derivation
- **Regularization**
  - Request corrections for missed or wrong punches, with an approval flow
    that rewrites the derived record
- **Recalculation**
  - Re-run derivation over a date range after shift or holiday changes,
    backfilling absents for settled days
- **Reports**
  - Daily counts, monthly trends, late-arrival breakdowns, leave balance
    compliance and tenure statistics

### 📦 Response Format
- JSON-based RESTful responses
- Pagination supported for list endpoints

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::list_attendance,

        crate::api::regularization::create_regularization,
        crate::api::regularization::list_regularizations,
        crate::api::regularization::approve_regularization,
        crate::api::regularization::reject_regularization,

        crate::api::recalc::recalculate,

        crate::api::reports::daily,
        crate::api::reports::monthly,
        crate::api::reports::late_arrivals,
        crate::api::reports::leave_balance,
        crate::api::reports::tenure,

        crate::api::employee::create_employee,
        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::assign_shift
    ),
    components(
        schemas(
            PunchRequest,
            AttendanceRecord,
            AttendanceStatus,
            AttendanceListResponse,
            CreateRegularization,
            RegularizationRequest,
            RegularizationStatus,
            RegularizationListResponse,
            RecalculateRequest,
            RecalcSummary,
            DailyStats,
            DayTrend,
            BreakdownEntry,
            LateArrivalBreakdown,
            LeaveBalanceReportRow,
            TenureEntry,
            TenureBucket,
            TenureStatistics,
            Employee,
            CreateEmployee,
            AssignShift,
            EmployeeListResponse
        )
    ),
    tags(
        (name = "Attendance", description = "Punch capture, derivation and recalculation APIs"),
        (name = "Regularization", description = "Attendance correction request APIs"),
        (name = "Reports", description = "Attendance, leave and tenure reporting APIs"),
        (name = "Employee", description = "Employee management APIs"),
    )
)]
pub struct ApiDoc;
