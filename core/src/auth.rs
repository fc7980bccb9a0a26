//! API key parsing and bearer-token signing.
//!
//! # Design
//! A v2 API key is a composite string: an optional human-readable name,
//! then a service-id UUID, then a secret UUID, dash-joined. Only the last
//! 73 characters are significant; the segments are read at fixed offsets
//! from the tail rather than by splitting on dashes, since the name part
//! may itself contain dashes. The key is parsed once at client
//! construction and never re-validated.
//!
//! Tokens are minted fresh for every request so the issued-at claim
//! always reflects the actual send time — the service rejects tokens
//! whose `iat` drifts more than a few tens of seconds from its clock.

use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

/// Length of the significant tail of a key: two UUIDs and a separator.
const SIGNIFICANT_KEY_LENGTH: usize = 73;
const UUID_LENGTH: usize = 36;

/// Claims carried by the bearer token. The service identifies the caller
/// by issuer and checks `iat` freshness; there is no expiry claim.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub iat: i64,
}

/// Credentials extracted from a composite v2 API key.
///
/// Immutable for the lifetime of the client that parsed it.
#[derive(Debug, Clone)]
pub struct ApiKey {
    service_id: String,
    secret: String,
}

impl ApiKey {
    /// Parse a raw key string, validating both UUID segments.
    ///
    /// Fails with the fixed invalid-key auth error when the input is
    /// empty, shorter than the significant tail, or either segment is not
    /// a syntactically valid UUID.
    pub fn parse(raw: &str) -> Result<Self, ApiError> {
        // Byte offsets below assume single-byte characters; a multibyte
        // key cannot be valid anyway.
        if !raw.is_ascii() || raw.len() < SIGNIFICANT_KEY_LENGTH {
            return Err(ApiError::invalid_api_key());
        }

        let significant = &raw[raw.len() - SIGNIFICANT_KEY_LENGTH..];
        let service_id = &significant[..UUID_LENGTH];
        let secret = &significant[SIGNIFICANT_KEY_LENGTH - UUID_LENGTH..];

        if Uuid::parse_str(service_id).is_err() || Uuid::parse_str(secret).is_err() {
            return Err(ApiError::invalid_api_key());
        }

        Ok(Self {
            service_id: service_id.to_string(),
            secret: secret.to_string(),
        })
    }

    /// The service id used as the token issuer.
    pub fn service_id(&self) -> &str {
        &self.service_id
    }

    /// Mint a compact HS256 JWT with `{iss, iat}` claims, signed with the
    /// key's secret. Called once per outgoing request; never cached.
    pub fn issue_token(&self) -> Result<String, ApiError> {
        let claims = Claims {
            iss: self.service_id.clone(),
            iat: Utc::now().timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| ApiError::Serialization(e.to_string()))
    }
}
