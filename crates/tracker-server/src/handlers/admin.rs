//! Admin handlers: add users and record weights

use super::nav;
use crate::extractors::AdminUser;
use crate::forms::{AddUserForm, AddWeightForm};
use crate::views;
use crate::AppState;
use axum::{extract::State, response::Html, Form};
use tracing::{info, warn};
use tracker_core::codec::format_date;

pub async fn add_user_page(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
) -> Html<String> {
    views::add_user(&nav(&state, &user.username), &[], &[], "")
}

pub async fn add_user(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Form(form): Form<AddUserForm>,
) -> Html<String> {
    let nav = nav(&state, &user.username);

    if let Err(errors) = form.validate() {
        return views::add_user(&nav, &[], &errors, &form.username);
    }

    let username = form.username.trim();
    let message = if state.storage.get_user(username).await.is_some() {
        info!("User already exists: {}", username);
        format!("User already exists: {}", username)
    } else if state.storage.add_user(username, &form.password).await {
        info!("Added user: {}", username);
        format!("Added user: {}", username)
    } else {
        warn!("User {} kept in memory only", username);
        format!(
            "Added user: {} (kept in memory only, remote store unavailable)",
            username
        )
    };

    views::add_user(&nav, &[message], &[], "")
}

pub async fn add_weight_page(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
) -> Html<String> {
    views::add_weight(&nav(&state, &user.username), &[], &[], "", "")
}

pub async fn add_weight(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Form(form): Form<AddWeightForm>,
) -> Html<String> {
    let nav = nav(&state, &user.username);

    let (date, weight) = match form.validate() {
        Ok(valid) => valid,
        Err(errors) => return views::add_weight(&nav, &[], &errors, &form.date, &form.weight),
    };

    let day = format_date(date);
    let message = if let Some(existing) = state.storage.get_weight(date).await {
        info!("Weight already exists: {}: {}", day, existing);
        format!("Weight already exists: {}: {}", day, existing)
    } else if state.storage.add_weight(weight, date).await {
        info!("Added weight: date={} weight={}", day, weight);
        format!("Added weight: {}: {}", day, weight)
    } else {
        warn!("Weight for {} kept in memory only", day);
        format!(
            "Added weight: {}: {} (kept in memory only, remote store unavailable)",
            day, weight
        )
    };

    views::add_weight(&nav, &[message], &[], "", "")
}
