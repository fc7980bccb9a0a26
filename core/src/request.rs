//! Outbound request assembly.
//!
//! # Design
//! `RequestBuilder` owns the normalized base URL and the user-agent
//! string; the client hands it a relative path, a freshly minted token,
//! and (for POSTs) an already-serialized JSON body. Headers are declared
//! in a fixed order so request-shape tests are reproducible.

use crate::http::{HttpMethod, HttpRequest};

/// Fixed client identifier reported in the User-Agent header.
pub const CLIENT_NAME: &str = "NOTIFY-API-RUST-CLIENT";

/// Builds `HttpRequest` values with the headers every call must carry.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    base_url: String,
    user_agent: String,
}

impl RequestBuilder {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            user_agent: format!("{CLIENT_NAME}/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Append an identifier for the embedding client library, separated
    /// by a space, e.g. `NOTIFY-API-RUST-CLIENT/0.1.0 my-wrapper/2.0`.
    pub fn append_user_agent_suffix(&mut self, suffix: &str) {
        self.user_agent = format!("{} {suffix}", self.user_agent);
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// A GET of `base_url + path`. `path` includes any query string,
    /// already in its declared parameter order.
    pub fn get(&self, path: &str, token: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}{path}", self.base_url),
            headers: self.common_headers(token),
            body: None,
        }
    }

    /// A POST of `base_url + path` carrying a JSON body.
    pub fn post(&self, path: &str, body: String, token: &str) -> HttpRequest {
        let mut headers = self.common_headers(token);
        headers.push(("Content-Type".to_string(), "application/json".to_string()));
        HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}{path}", self.base_url),
            headers,
            body: Some(body),
        }
    }

    fn common_headers(&self, token: &str) -> Vec<(String, String)> {
        vec![
            ("Authorization".to_string(), format!("Bearer {token}")),
            ("User-Agent".to_string(), self.user_agent.clone()),
            ("Accept".to_string(), "application/json".to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_carries_required_headers_in_order() {
        let builder = RequestBuilder::new("https://api.example.com");
        let req = builder.get("/v2/templates", "tok");
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "https://api.example.com/v2/templates");
        assert_eq!(
            req.headers,
            vec![
                ("Authorization".to_string(), "Bearer tok".to_string()),
                (
                    "User-Agent".to_string(),
                    format!("{CLIENT_NAME}/{}", env!("CARGO_PKG_VERSION")),
                ),
                ("Accept".to_string(), "application/json".to_string()),
            ]
        );
        assert!(req.body.is_none());
    }

    #[test]
    fn post_adds_content_type_last() {
        let builder = RequestBuilder::new("https://api.example.com");
        let req = builder.post("/v2/notifications/sms", "{}".to_string(), "tok");
        assert_eq!(req.method, HttpMethod::Post);
        let last = req.headers.last().unwrap();
        assert_eq!(last.0, "Content-Type");
        assert_eq!(last.1, "application/json");
        assert_eq!(req.body.as_deref(), Some("{}"));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let builder = RequestBuilder::new("https://api.example.com/");
        let req = builder.get("/v2/templates", "tok");
        assert_eq!(req.url, "https://api.example.com/v2/templates");
    }

    #[test]
    fn user_agent_suffix_is_appended() {
        let mut builder = RequestBuilder::new("https://api.example.com");
        builder.append_user_agent_suffix("my-wrapper/2.0");
        let req = builder.get("/v2/templates", "tok");
        let ua = &req.headers[1].1;
        assert!(ua.starts_with(CLIENT_NAME));
        assert!(ua.ends_with(" my-wrapper/2.0"));
    }
}
