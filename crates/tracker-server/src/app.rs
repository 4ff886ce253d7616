//! HTTP router

use crate::handlers::{self, admin, home, landing};
use crate::security::{headers_for, security_headers};
use crate::AppState;
use axum::{middleware, routing::get, Router};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub fn router(state: AppState) -> Router {
    let static_dir = state.settings.static_dir.clone();
    let headers = headers_for(state.settings.local_mode);

    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Login
        .route("/", get(landing::landing).post(landing::login))
        .route("/logout", get(landing::logout))
        // Charts
        .route("/home", get(home::home))
        .route("/weight", get(home::weight).post(home::submit_guess))
        .route("/calories", get(home::calories))
        .route("/both", get(home::both))
        .route("/insta", get(home::insta))
        // Admin
        .route(
            "/admin/add-user",
            get(admin::add_user_page).post(admin::add_user),
        )
        .route(
            "/admin/add-weight",
            get(admin::add_weight_page).post(admin::add_weight),
        )
        // Static files
        .nest_service("/static", ServeDir::new(static_dir))
        // Layers
        .layer(middleware::from_fn_with_state(headers, security_headers))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
