pub mod attendance;
pub mod employee;
pub mod recalc;
pub mod regularization;
pub mod reports;

use crate::engine::error::EngineError;
use actix_web::HttpResponse;
use tracing::error;

/// Map an engine error to a response: bad input comes back as a 400 with the
/// message, everything else is logged and hidden behind a 500.
pub(crate) fn engine_error_response(context: &str, e: EngineError) -> HttpResponse {
    if e.is_rejection() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "message": e.to_string()
        }));
    }

    error!(error = %e, context, "engine call failed");
    HttpResponse::InternalServerError().json(serde_json::json!({
        "message": "Internal Server Error"
    }))
}
