//! Home and chart page handlers

use super::nav;
use crate::extractors::auth::NOTICE_ADMIN_REQUIRED;
use crate::extractors::SessionUser;
use crate::forms::WeightGuessForm;
use crate::services::charts::chart_title;
use crate::views::{self, GraphPage, GuessPanel, InstaPage};
use crate::AppState;
use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::Deserialize;
use tracing::{info, warn};
use tracker_core::codec::format_date;
use tracker_core::{ChartKind, MonthSelection};

#[derive(Debug, Default, Deserialize)]
pub struct HomeQuery {
    notice: Option<String>,
}

/// Query value set after a guess reached the remote store
pub const NOTICE_GUESS_SAVED: &str = "guess_saved";
/// Query value set after a guess was only kept in memory
pub const NOTICE_GUESS_MEMORY_ONLY: &str = "guess_memory_only";

#[derive(Debug, Default, Deserialize)]
pub struct ChartQuery {
    year: Option<String>,
    month: Option<String>,
    notice: Option<String>,
}

pub async fn home(
    State(state): State<AppState>,
    user: SessionUser,
    Query(query): Query<HomeQuery>,
) -> Html<String> {
    let messages = match query.notice.as_deref() {
        Some(NOTICE_ADMIN_REQUIRED) => {
            vec!["You need to be an admin to access this page.".to_string()]
        }
        _ => Vec::new(),
    };

    views::home(&nav(&state, &user.username), &messages)
}

pub async fn weight(
    State(state): State<AppState>,
    user: SessionUser,
    Query(query): Query<ChartQuery>,
) -> Html<String> {
    render_weight(&state, &user, &query, Vec::new()).await
}

/// Record a guess of tomorrow's weight. A user keeps only their latest guess.
/// A saved guess redirects back to the weight page; validation errors are
/// rendered in place.
pub async fn submit_guess(
    State(state): State<AppState>,
    user: SessionUser,
    Query(query): Query<ChartQuery>,
    Form(form): Form<WeightGuessForm>,
) -> Response {
    let weight = match form.validate() {
        Ok(weight) => weight,
        Err(errors) => {
            return render_weight(&state, &user, &query, errors)
                .await
                .into_response()
        }
    };

    let date = tomorrow();
    let persisted = state
        .storage
        .add_weight_guess(&user.username, date, weight)
        .await;
    info!(
        "Weight guess: username={} weight={} date={}",
        user.username,
        weight,
        format_date(date)
    );

    let notice = if persisted {
        NOTICE_GUESS_SAVED
    } else {
        warn!("Weight guess for {} kept in memory only", user.username);
        NOTICE_GUESS_MEMORY_ONLY
    };

    Redirect::to(&format!("/weight?notice={}", notice)).into_response()
}

pub async fn calories(
    State(state): State<AppState>,
    user: SessionUser,
    Query(query): Query<ChartQuery>,
) -> Html<String> {
    let page = chart_page(&state, ChartKind::Calories, &query);
    views::graph(&nav(&state, &user.username), &[], &page)
}

pub async fn both(
    State(state): State<AppState>,
    user: SessionUser,
    Query(query): Query<ChartQuery>,
) -> Html<String> {
    let page = chart_page(&state, ChartKind::Both, &query);
    views::graph(&nav(&state, &user.username), &[], &page)
}

/// Photo montage for one month, the latest available one by default.
pub async fn insta(
    State(state): State<AppState>,
    user: SessionUser,
    Query(query): Query<ChartQuery>,
) -> Html<String> {
    let kind = ChartKind::Insta;
    let months = state.charts.available_months(kind);

    let (year, month) = match MonthSelection::parse(query.month.as_deref()) {
        MonthSelection::Month(month) => (
            resolve_year(&state, kind, query.year.as_deref(), MonthSelection::Month(month)),
            Some(month),
        ),
        _ => match months.last() {
            Some(&(year, month)) => (Some(year), Some(month)),
            None => (None, None),
        },
    };

    let photos = match (year, month) {
        (Some(year), Some(month)) => state.charts.insta_urls(year, month),
        _ => Vec::new(),
    };

    let found = photos.iter().any(|(_, url)| url.is_some());
    let title = match (year, month) {
        (Some(year), Some(month)) if found => format!("{} {}", month.name(), year),
        _ => "Not found".to_string(),
    };

    let page = InstaPage {
        title,
        months,
        selected_year: year,
        selected_month: month,
        photos,
    };

    views::insta(&nav(&state, &user.username), &[], &page)
}

async fn render_weight(
    state: &AppState,
    user: &SessionUser,
    query: &ChartQuery,
    errors: Vec<String>,
) -> Html<String> {
    let last_guess = state.storage.get_weight_guess(&user.username).await;
    let actual = match &last_guess {
        Some(guess) => state.storage.get_weight(guess.date).await,
        None => None,
    };

    let suffix = match query.notice.as_deref() {
        Some(NOTICE_GUESS_SAVED) => Some(""),
        Some(NOTICE_GUESS_MEMORY_ONLY) => Some(" (kept in memory only)"),
        _ => None,
    };
    let messages: Vec<String> = match (suffix, &last_guess) {
        (Some(suffix), Some(guess)) => vec![format!(
            "Guessed {} kg for {}{}",
            guess.weight,
            format_date(guess.date),
            suffix
        )],
        _ => Vec::new(),
    };

    let mut page = chart_page(state, ChartKind::Weight, query);
    page.guess = Some(GuessPanel {
        last_guess,
        actual,
        errors,
    });

    views::graph(&nav(state, &user.username), &messages, &page)
}

fn chart_page(state: &AppState, kind: ChartKind, query: &ChartQuery) -> GraphPage {
    let selection = MonthSelection::parse(query.month.as_deref());
    let year = resolve_year(state, kind, query.year.as_deref(), selection);
    let img_url = state.charts.chart_url(kind, year, selection);
    let title = chart_title(year, selection, img_url.is_some());

    GraphPage {
        kind,
        title,
        img_url,
        months: state.charts.available_months(kind),
        selected_year: year,
        selection,
        guess: None,
    }
}

/// Year from the query string. A month picked without a year means the
/// latest year that has images for it, or the current year.
fn resolve_year(
    state: &AppState,
    kind: ChartKind,
    year: Option<&str>,
    selection: MonthSelection,
) -> Option<i32> {
    match year.map(str::trim).filter(|y| !y.is_empty()) {
        Some(year) => year.parse().ok(),
        None => match selection {
            MonthSelection::Month(month) => Some(
                state
                    .charts
                    .latest_year_for(kind, month)
                    .unwrap_or_else(|| Local::now().year()),
            ),
            _ => None,
        },
    }
}

fn tomorrow() -> NaiveDate {
    Local::now().date_naive() + Duration::days(1)
}
