//! Upstash Redis REST client
//!
//! Commands are sent as a JSON array (`["SET", key, value]`) in the body of a
//! `POST` to the database URL, authenticated with a bearer token. Replies are
//! `{"result": ...}` on success and `{"error": "..."}` on failure.

use async_trait::async_trait;
use reqwest::{Client as ReqwestClient, StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use tracker_core::{KeyValueStore, Result, TrackerError};

pub struct UpstashStore {
    http: ReqwestClient,
    url: Url,
    token: String,
}

#[derive(Debug, Deserialize)]
struct UpstashReply {
    #[serde(default)]
    result: Value,
    error: Option<String>,
}

impl UpstashStore {
    /// Build a client. Nothing is sent over the network here; this only fails
    /// on an unusable URL or token, or if the HTTP client cannot be built.
    pub fn new(url: &str, token: &str) -> Result<Self> {
        let url = Url::parse(url.trim())
            .map_err(|e| TrackerError::Config(format!("Invalid Upstash URL {:?}: {}", url, e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(TrackerError::Config(format!(
                "Unsupported Upstash URL scheme: {}",
                url.scheme()
            )));
        }

        let token = token.trim();
        if token.is_empty() {
            return Err(TrackerError::Config("Upstash token is empty".to_string()));
        }

        let http = ReqwestClient::builder()
            .user_agent(concat!("tracker-server/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TrackerError::Http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            url,
            token: token.to_string(),
        })
    }

    /// Host part of the endpoint, for log lines.
    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or("unknown")
    }

    async fn command(&self, args: &[&str]) -> Result<Value> {
        debug!("Upstash {} {}", args.first().unwrap_or(&""), args.get(1).unwrap_or(&""));

        let response = self
            .http
            .post(self.url.clone())
            .bearer_auth(&self.token)
            .json(args)
            .send()
            .await
            .map_err(|e| TrackerError::Http(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TrackerError::Http(e.to_string()))?;

        parse_reply(status, &body)
    }
}

fn parse_reply(status: StatusCode, body: &str) -> Result<Value> {
    let reply: UpstashReply = match serde_json::from_str(body) {
        Ok(reply) => reply,
        Err(e) if status.is_success() => return Err(e.into()),
        Err(_) => {
            return Err(TrackerError::Remote(format!(
                "HTTP {}: {}",
                status,
                body.trim()
            )))
        }
    };

    if let Some(error) = reply.error {
        return Err(TrackerError::Remote(error));
    }

    if !status.is_success() {
        return Err(TrackerError::Remote(format!("HTTP {}", status)));
    }

    Ok(reply.result)
}

#[async_trait]
impl KeyValueStore for UpstashStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        match self.command(&["GET", key]).await? {
            Value::Null => Ok(None),
            Value::String(value) => Ok(Some(value)),
            other => Ok(Some(other.to_string())),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        match self.command(&["SET", key, value]).await? {
            Value::String(reply) if reply == "OK" => Ok(()),
            other => Err(TrackerError::Remote(format!(
                "Unexpected SET reply: {}",
                other
            ))),
        }
    }

    fn name(&self) -> &'static str {
        "upstash"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_url_and_token() {
        assert!(UpstashStore::new("https://eu1-fancy-cat-1234.upstash.io", "tok").is_ok());
        assert!(UpstashStore::new("not a url", "tok").is_err());
        assert!(UpstashStore::new("ftp://example.com", "tok").is_err());
        assert!(UpstashStore::new("https://example.com", "  ").is_err());
    }

    #[test]
    fn test_host() {
        let store = UpstashStore::new("https://eu1-fancy-cat-1234.upstash.io", "tok").unwrap();
        assert_eq!(store.host(), "eu1-fancy-cat-1234.upstash.io");
        assert_eq!(store.name(), "upstash");
    }

    #[test]
    fn test_parse_reply_result() {
        let value = parse_reply(StatusCode::OK, r#"{"result":"71.2"}"#).unwrap();
        assert_eq!(value, Value::String("71.2".to_string()));

        let value = parse_reply(StatusCode::OK, r#"{"result":null}"#).unwrap();
        assert_eq!(value, Value::Null);
    }

    #[test]
    fn test_parse_reply_error() {
        let err = parse_reply(
            StatusCode::BAD_REQUEST,
            r#"{"error":"ERR wrong number of arguments for 'get' command"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, TrackerError::Remote(ref m) if m.contains("wrong number")));
    }

    #[test]
    fn test_parse_reply_unauthorized_plain_text() {
        let err = parse_reply(StatusCode::UNAUTHORIZED, "Unauthorized").unwrap_err();
        assert!(matches!(err, TrackerError::Remote(ref m) if m.contains("401")));
    }

    #[test]
    fn test_parse_reply_garbage_on_success() {
        let err = parse_reply(StatusCode::OK, "<html>").unwrap_err();
        assert!(matches!(err, TrackerError::Serialization(_)));
    }
}
