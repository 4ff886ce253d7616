//! Server settings
//!
//! Settings come from the process environment (read through the `config`
//! crate) and are overridden by command line flags.

use crate::storage::{RemoteConfig, StorageConfig};
use anyhow::{Context, Result};
use clap::Parser;
use config::Environment;
use serde::Deserialize;
use std::path::PathBuf;
use tracing::warn;
use tracker_core::Credentials;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:5000";
pub const DEFAULT_STATIC_DIR: &str = "static";
pub const DEFAULT_ADMIN_USERS: &str = "admin";
/// Username every request runs as when login is bypassed.
pub const LOCAL_ADMIN: &str = "admin";

#[derive(Debug, Default, Parser)]
#[command(name = "tracker-server", version, about = "Personal weight and calorie tracker")]
pub struct Args {
    /// Run in local mode (no security headers, cookies without `Secure`)
    #[arg(long)]
    pub local: bool,

    /// Address to listen on
    #[arg(long)]
    pub bind: Option<String>,

    /// Directory holding css and chart images
    #[arg(long)]
    pub static_dir: Option<PathBuf>,
}

/// Raw environment, one field per variable (names lower-cased by `config`)
#[derive(Debug, Default, Deserialize)]
struct EnvVars {
    bind_address: Option<String>,
    static_dir: Option<String>,
    secret_key: Option<String>,
    debug: Option<String>,
    is_local: Option<String>,
    admin_users: Option<String>,
    upstash_redis_rest_url: Option<String>,
    upstash_redis_rest_token: Option<String>,
    local_username: Option<String>,
    local_password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_address: String,
    pub static_dir: PathBuf,
    pub secret_key: Option<String>,
    /// Local development: no security headers, no `Secure` cookies
    pub local_mode: bool,
    /// Every request is treated as a logged-in admin
    pub bypass_login: bool,
    pub admin_users: Vec<String>,
    pub storage: StorageConfig,
}

impl Settings {
    pub fn load(args: &Args) -> Result<Self> {
        Self::from_environment(Environment::default(), args)
    }

    fn from_environment(env: Environment, args: &Args) -> Result<Self> {
        let vars: EnvVars = config::Config::builder()
            .add_source(env)
            .build()
            .context("Failed to read environment")?
            .try_deserialize()
            .context("Failed to parse environment")?;

        Ok(Self::resolve(vars, args))
    }

    fn resolve(vars: EnvVars, args: &Args) -> Self {
        let vars = EnvVars {
            bind_address: non_empty(vars.bind_address),
            static_dir: non_empty(vars.static_dir),
            secret_key: non_empty(vars.secret_key),
            debug: non_empty(vars.debug),
            is_local: non_empty(vars.is_local),
            admin_users: non_empty(vars.admin_users),
            upstash_redis_rest_url: non_empty(vars.upstash_redis_rest_url),
            upstash_redis_rest_token: non_empty(vars.upstash_redis_rest_token),
            local_username: non_empty(vars.local_username),
            local_password: non_empty(vars.local_password),
        };

        let remote = match (vars.upstash_redis_rest_url, vars.upstash_redis_rest_token) {
            (Some(url), Some(token)) => Some(RemoteConfig { url, token }),
            (None, None) => None,
            _ => {
                warn!("Only one of UPSTASH_REDIS_REST_URL and UPSTASH_REDIS_REST_TOKEN is set, ignoring both");
                None
            }
        };

        let bootstrap = match (vars.local_username, vars.local_password) {
            (Some(username), Some(password)) => Some(Credentials::new(username, password)),
            _ => None,
        };

        let admin_users = vars
            .admin_users
            .as_deref()
            .unwrap_or(DEFAULT_ADMIN_USERS)
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();

        Settings {
            bind_address: args
                .bind
                .clone()
                .or(vars.bind_address)
                .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            static_dir: args
                .static_dir
                .clone()
                .or_else(|| vars.static_dir.map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR)),
            secret_key: vars.secret_key,
            local_mode: args.local || vars.debug.as_deref() == Some("True"),
            bypass_login: vars.is_local.as_deref() == Some("Y"),
            admin_users,
            storage: StorageConfig { remote, bootstrap },
        }
    }

    pub fn is_admin(&self, username: &str) -> bool {
        self.admin_users.iter().any(|admin| admin == username)
    }

    /// Session cookies carry `Secure` outside local mode.
    pub fn secure_cookies(&self) -> bool {
        !self.local_mode
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)], args: &Args) -> Settings {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_environment(Environment::default().source(Some(source)), args).unwrap()
    }

    #[test]
    fn test_defaults() {
        let settings = load(&[], &Args::default());

        assert_eq!(settings.bind_address, DEFAULT_BIND_ADDRESS);
        assert_eq!(settings.static_dir, PathBuf::from(DEFAULT_STATIC_DIR));
        assert!(!settings.local_mode);
        assert!(!settings.bypass_login);
        assert!(settings.secure_cookies());
        assert_eq!(settings.admin_users, vec!["admin".to_string()]);
        assert!(settings.storage.remote.is_none());
        assert!(settings.storage.bootstrap.is_none());
    }

    #[test]
    fn test_environment_values() {
        let settings = load(
            &[
                ("BIND_ADDRESS", "127.0.0.1:8080"),
                ("DEBUG", "True"),
                ("IS_LOCAL", "Y"),
                ("ADMIN_USERS", "admin, test ,"),
                ("UPSTASH_REDIS_REST_URL", "https://example.upstash.io"),
                ("UPSTASH_REDIS_REST_TOKEN", "token"),
                ("LOCAL_USERNAME", "test"),
                ("LOCAL_PASSWORD", "test-pw"),
            ],
            &Args::default(),
        );

        assert_eq!(settings.bind_address, "127.0.0.1:8080");
        assert!(settings.local_mode);
        assert!(settings.bypass_login);
        assert!(settings.is_admin("test"));
        assert!(!settings.is_admin("guest"));

        let remote = settings.storage.remote.unwrap();
        assert_eq!(remote.url, "https://example.upstash.io");
        assert_eq!(remote.token, "token");
        assert_eq!(
            settings.storage.bootstrap,
            Some(Credentials::new("test", "test-pw"))
        );
    }

    #[test]
    fn test_remote_requires_url_and_token() {
        let settings = load(
            &[("UPSTASH_REDIS_REST_URL", "https://example.upstash.io")],
            &Args::default(),
        );
        assert!(settings.storage.remote.is_none());

        let settings = load(
            &[
                ("UPSTASH_REDIS_REST_URL", "https://example.upstash.io"),
                ("UPSTASH_REDIS_REST_TOKEN", ""),
            ],
            &Args::default(),
        );
        assert!(settings.storage.remote.is_none());
    }

    #[test]
    fn test_flags_override_environment() {
        let args = Args {
            local: true,
            bind: Some("0.0.0.0:9999".to_string()),
            static_dir: Some(PathBuf::from("/srv/tracker")),
        };
        let settings = load(
            &[("BIND_ADDRESS", "127.0.0.1:8080"), ("DEBUG", "False")],
            &args,
        );

        assert_eq!(settings.bind_address, "0.0.0.0:9999");
        assert_eq!(settings.static_dir, PathBuf::from("/srv/tracker"));
        assert!(settings.local_mode);
        assert!(!settings.secure_cookies());
    }
}
