//! Auth extractors for protected routes

use crate::services::auth::SESSION_COOKIE;
use crate::settings::LOCAL_ADMIN;
use crate::AppState;
use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::COOKIE, request::Parts, HeaderMap},
    response::Redirect,
};
use tracing::{debug, info};

/// Query value telling the home page why the user was sent there
pub const NOTICE_ADMIN_REQUIRED: &str = "admin_required";

/// A logged-in user
#[derive(Clone, Debug)]
pub struct SessionUser {
    pub username: String,
}

/// A logged-in user who is also an admin
#[derive(Clone, Debug)]
pub struct AdminUser(pub SessionUser);

/// Value of one cookie from the request headers.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

/// Username of the current session, if any.
pub fn current_user(state: &AppState, headers: &HeaderMap) -> Option<String> {
    if state.settings.bypass_login {
        return Some(LOCAL_ADMIN.to_string());
    }

    let token = cookie_value(headers, SESSION_COOKIE).filter(|t| !t.is_empty())?;
    match state.auth_service.validate_token(token) {
        Ok(username) => Some(username),
        Err(e) => {
            debug!("Rejected session token: {}", e);
            None
        }
    }
}

/// Login page URL that returns to `target` afterwards.
pub fn login_redirect(target: &str) -> String {
    match serde_urlencoded::to_string([("next", target)]) {
        Ok(query) => format!("/?{}", query),
        Err(e) => {
            debug!("Cannot encode next={:?}: {}", target, e);
            "/".to_string()
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for SessionUser {
    type Rejection = Redirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match current_user(state, &parts.headers) {
            Some(username) => Ok(SessionUser { username }),
            None => {
                info!("Unauthenticated request to {}", parts.uri.path());
                let target = parts
                    .uri
                    .path_and_query()
                    .map_or_else(|| parts.uri.path(), |pq| pq.as_str());
                Err(Redirect::to(&login_redirect(target)))
            }
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = Redirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = SessionUser::from_request_parts(parts, state).await?;

        if state.settings.bypass_login || state.settings.is_admin(&user.username) {
            Ok(AdminUser(user))
        } else {
            info!("Non-admin {} denied access to {}", user.username, parts.uri.path());
            Err(Redirect::to(&format!("/home?notice={}", NOTICE_ADMIN_REQUIRED)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_cookie_value() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; tracker_session=abc.def.ghi; other=1"),
        );

        assert_eq!(cookie_value(&headers, "tracker_session"), Some("abc.def.ghi"));
        assert_eq!(cookie_value(&headers, "theme"), Some("dark"));
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn test_login_redirect_keeps_query() {
        assert_eq!(login_redirect("/home"), "/?next=%2Fhome");
        assert_eq!(
            login_redirect("/weight?year=2025&month=July"),
            "/?next=%2Fweight%3Fyear%3D2025%26month%3DJuly"
        );
    }

    #[test]
    fn test_cookie_value_across_headers() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("a=1"));
        headers.append(COOKIE, HeaderValue::from_static("tracker_session=xyz"));

        assert_eq!(cookie_value(&headers, "tracker_session"), Some("xyz"));
    }
}
