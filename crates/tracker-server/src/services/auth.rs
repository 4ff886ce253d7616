//! Authentication service
//!
//! Logins are checked against the stored plaintext password. A successful
//! login yields a signed session token that carries the username; the token
//! lives in the `tracker_session` cookie.

use crate::storage::Storage;
use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

pub const SESSION_COOKIE: &str = "tracker_session";
/// 30 days
pub const SESSION_LIFETIME_SECS: i64 = 2_592_000;

pub struct AuthService {
    storage: Arc<Storage>,
    secret: String,
}

impl AuthService {
    pub fn new(storage: Arc<Storage>, secret: Option<String>) -> Self {
        let secret = secret.unwrap_or_else(|| {
            warn!("SECRET_KEY not set, generated a per-process key; sessions end on restart");
            generate_secret()
        });

        Self { storage, secret }
    }

    /// Check credentials and issue a session token.
    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        match self.storage.get_user(username).await {
            Some(stored) if stored == password => self.issue_token(username),
            Some(_) => anyhow::bail!("Wrong password"),
            None => anyhow::bail!("Unknown user"),
        }
    }

    pub fn issue_token(&self, username: &str) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: username.to_string(),
            exp: (now + Duration::seconds(SESSION_LIFETIME_SECS)).timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;

        Ok(token)
    }

    /// Returns the username the token was issued for.
    pub fn validate_token(&self, token: &str) -> Result<String> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims.sub)
    }
}

fn generate_secret() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String, // username
    exp: i64,
    iat: i64,
}

/// `Set-Cookie` value carrying a session token
pub fn session_cookie(token: &str, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
        SESSION_COOKIE, token, SESSION_LIFETIME_SECS
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that removes the session
pub fn clear_session_cookie(secure: bool) -> String {
    let mut cookie = format!("{}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax", SESSION_COOKIE);
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}
