//! Client library for the notification API.
//!
//! # Overview
//! Sends SMS and email notifications, fetches delivery records, and
//! retrieves message templates over the service's v2 REST endpoints.
//! Every request carries a short-lived HS256-signed JWT derived from the
//! service's composite API key.
//!
//! # Design
//! - The network is behind the [`Transport`] trait: one `send` per
//!   operation, injected at construction. Tests substitute a recording
//!   fake; production code supplies any HTTP stack it likes.
//! - The API key is parsed once, at construction — an invalid key fails
//!   fast, before any I/O.
//! - Bearer tokens are minted per request, never cached, so the
//!   issued-at claim always reflects the send time.
//! - Non-2xx responses are classified through the service's error
//!   envelope into a typed error taxonomy; transport failures pass
//!   through unmodified.

pub mod auth;
pub mod client;
pub mod error;
pub mod http;
pub mod request;
pub mod response;
pub mod types;

pub use auth::ApiKey;
pub use client::{NotificationClient, DEFAULT_BASE_URL};
pub use error::{ApiError, INVALID_API_KEY_MESSAGE};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
pub use types::{
    EmailNotificationResponse, Notification, Personalisation, SmsNotificationResponse,
    TemplateList, TemplatePreviewResponse, TemplateResponse, TemplateType,
};
