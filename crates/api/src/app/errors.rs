use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use pricing_infra::pricing_service::ServiceError;

/// Problem-style error body: `{type, title, status, detail}`.
pub fn json_error(
    status: StatusCode,
    kind: &'static str,
    title: &'static str,
    detail: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "type": kind,
            "title": title,
            "status": status.as_u16(),
            "detail": detail.into(),
        })),
    )
        .into_response()
}

pub fn prices_not_found() -> axum::response::Response {
    json_error(
        StatusCode::NOT_FOUND,
        "Not_Found",
        "Unavailable prices",
        "No prices were found",
    )
}

pub fn bad_request(detail: impl Into<String>) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "Bad_Request", "Invalid request", detail)
}

/// Internal failures are logged in full; the body stays generic.
pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    let reason = match &err {
        ServiceError::Store(_) => "store_error",
        ServiceError::Domain(_) => "resolution_rejected",
    };
    tracing::error!(reason, error = %err, "price lookup failed");

    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal_Error",
        "Prices could not be resolved",
        "An internal error occurred while resolving prices",
    )
}
