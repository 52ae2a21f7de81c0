//! Session authentication for every route but the health check.

use axum::extract::{Request, State};
use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::{debug, error};
use url::form_urlencoded;

use super::handlers::found;
use super::state::AppState;
use crate::errors::HttpError;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "sessionid";

/// The authenticated caller, available to handlers as a request extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub username: String,
}

/// Lets the request through when its session cookie resolves to a live
/// session; otherwise redirects to the login page.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let session = match session_token(request.headers()) {
        Some(token) => match state.service.authenticate(&token).await {
            Ok(session) => session,
            Err(e) => {
                error!(error = %e, "Session lookup failed");
                return HttpError::from(e).into_response();
            }
        },
        None => None,
    };

    match session {
        Some(session) => {
            request.extensions_mut().insert(CurrentUser {
                username: session.username,
            });
            next.run(request).await
        }
        None => {
            let target = request
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str())
                .unwrap_or("/");
            debug!(target = %target, "Unauthenticated request");
            found(&login_redirect(&state.login_url, target))
        }
    }
}

/// The `sessionid` value from the request cookies.
fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// `login_url?next=<target>`, with `target` form-urlencoded.
pub fn login_redirect(login_url: &str, target: &str) -> String {
    let next: String = form_urlencoded::byte_serialize(target.as_bytes()).collect();
    format!("{login_url}?next={next}")
}
