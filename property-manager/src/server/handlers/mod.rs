// HTTP request handlers, one module per record family
pub mod contracts;
pub mod documents;
pub mod incidents;
pub mod owners;
pub mod payment_types;
pub mod payments;
pub mod tenants;
pub mod units;

use axum::http::header::LOCATION;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use property_manager_shared::ListParams;
use serde_json::json;

/// An HTTP 302 redirect to `location`.
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(LOCATION, location.to_string())]).into_response()
}

/// Parses the raw query string of a list request.
pub fn list_params(query: Option<String>) -> ListParams {
    ListParams::parse(query.as_deref().unwrap_or_default())
}

/// `next` when it is a local path that can be sent as a `Location` header,
/// `default` otherwise.
pub fn safe_next(next: Option<&str>, default: &str) -> String {
    match next.map(str::trim) {
        Some(next) if is_local_path(next) => next.to_string(),
        _ => default.to_string(),
    }
}

fn is_local_path(next: &str) -> bool {
    next.starts_with('/')
        && !next.starts_with("//")
        && !next.contains('\\')
        && next.chars().all(|c| c == ' ' || c.is_ascii_graphic())
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_next() {
        assert_eq!(safe_next(Some("/payments/?page=2"), "/payments/"), "/payments/?page=2");
        assert_eq!(safe_next(Some("https://evil.example"), "/payments/"), "/payments/");
        assert_eq!(safe_next(Some("//evil.example"), "/payments/"), "/payments/");
        assert_eq!(safe_next(Some("/\\evil.example"), "/payments/"), "/payments/");
        assert_eq!(safe_next(None, "/payments/"), "/payments/");
        assert_eq!(safe_next(Some("/a\nb"), "/payments/"), "/payments/");
        assert_eq!(safe_next(Some("/a\rLocation: x"), "/payments/"), "/payments/");
        assert_eq!(safe_next(Some("/pagos/año"), "/payments/"), "/payments/");
    }
}
