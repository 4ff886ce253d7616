//! HTTP handlers

pub mod admin;
pub mod health;
pub mod home;
pub mod landing;

pub use health::health;

use crate::views::Nav;
use crate::AppState;

/// Navigation bar for a logged-in user
fn nav<'a>(state: &AppState, username: &'a str) -> Nav<'a> {
    Nav {
        username,
        is_admin: state.settings.bypass_login || state.settings.is_admin(username),
    }
}
