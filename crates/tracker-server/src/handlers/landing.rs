//! Login and logout handlers

use crate::extractors::auth::current_user;
use crate::forms::LoginForm;
use crate::services::auth::{clear_session_cookie, session_cookie};
use crate::views;
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::{header::SET_COOKIE, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use tracing::{info, warn};

const DEFAULT_NEXT: &str = "/home";

#[derive(Debug, Deserialize)]
pub struct LandingQuery {
    next: Option<String>,
}

pub async fn landing(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<LandingQuery>,
) -> Response {
    if current_user(&state, &headers).is_some() {
        return Redirect::to(DEFAULT_NEXT).into_response();
    }

    let messages = match query.next {
        Some(_) => vec!["You need to be logged in to access this page.".to_string()],
        None => Vec::new(),
    };

    views::landing(safe_next(query.next.as_deref()), &messages, &[]).into_response()
}

pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    let username = form.username.trim();
    let next = safe_next(Some(&form.next));

    if username.is_empty() || form.password.is_empty() {
        let errors = ["Username and password are required".to_string()];
        return (StatusCode::BAD_REQUEST, views::landing(next, &[], &errors)).into_response();
    }

    match state.auth_service.login(username, &form.password).await {
        Ok(token) => {
            info!("Login successful for: {}", username);
            let cookie = session_cookie(&token, state.settings.secure_cookies());
            ([(SET_COOKIE, cookie)], Redirect::to(next)).into_response()
        }
        Err(e) => {
            warn!("Login failed for {}: {}", username, e);
            let errors = ["Invalid username or password".to_string()];
            (StatusCode::UNAUTHORIZED, views::landing(next, &[], &errors)).into_response()
        }
    }
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(username) = current_user(&state, &headers) {
        info!("Logout: {}", username);
    }

    let cookie = clear_session_cookie(state.settings.secure_cookies());
    ([(SET_COOKIE, cookie)], Redirect::to("/")).into_response()
}

/// Only same-site paths that fit in a `Location` header are followed after
/// login.
fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.contains('\\')
                && HeaderValue::from_str(path).is_ok() =>
        {
            path
        }
        _ => DEFAULT_NEXT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_next() {
        assert_eq!(safe_next(Some("/weight")), "/weight");
        assert_eq!(safe_next(Some("")), "/home");
        assert_eq!(safe_next(None), "/home");
        assert_eq!(safe_next(Some("https://evil.example")), "/home");
        assert_eq!(safe_next(Some("//evil.example")), "/home");
        assert_eq!(safe_next(Some("/\\evil.example")), "/home");
        assert_eq!(
            safe_next(Some("/weight?year=2025&month=July")),
            "/weight?year=2025&month=July"
        );
        assert_eq!(safe_next(Some("/weight\n")), "/home");
        assert_eq!(safe_next(Some("/weight\r\nSet-Cookie: x=1")), "/home");
    }
}
