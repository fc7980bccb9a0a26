//! The notification API client.
//!
//! # Design
//! `NotificationClient` holds the parsed API key, a request builder, and
//! the injected transport — nothing else, and nothing mutable. Every
//! operation follows the same shape: mint a fresh token, build the
//! request, send it through the transport, interpret the response. Tokens
//! are never cached, so the issued-at claim always reflects the actual
//! send time and no shared state is written during a call.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::auth::ApiKey;
use crate::error::ApiError;
use crate::http::{HttpRequest, Transport};
use crate::request::RequestBuilder;
use crate::response;
use crate::types::{
    EmailNotificationResponse, Notification, Personalisation, SendEmailRequest, SendSmsRequest,
    SmsNotificationResponse, TemplateList, TemplatePreviewRequest, TemplatePreviewResponse,
    TemplateResponse, TemplateType,
};

/// Production notification API host.
pub const DEFAULT_BASE_URL: &str = "https://api.notifications.service.gov.uk";

const GET_NOTIFICATION_PATH: &str = "/v2/notifications/";
const SEND_SMS_PATH: &str = "/v2/notifications/sms";
const SEND_EMAIL_PATH: &str = "/v2/notifications/email";
const GET_TEMPLATE_PATH: &str = "/v2/template/";
const GET_TEMPLATE_LIST_PATH: &str = "/v2/templates";
const VERSION_PARAM: &str = "?version=";
const TYPE_PARAM: &str = "?type=";

/// Client for the notification API, generic over the injected transport.
///
/// Safe for concurrent use whenever the transport is: requests and tokens
/// are built fresh per call.
#[derive(Debug)]
pub struct NotificationClient<T> {
    api_key: ApiKey,
    builder: RequestBuilder,
    transport: T,
}

impl<T: Transport> NotificationClient<T> {
    /// Construct a client against the production host.
    ///
    /// Fails immediately, before any network activity, when the API key
    /// does not parse.
    pub fn new(transport: T, api_key: &str) -> Result<Self, ApiError> {
        Self::with_base_url(transport, DEFAULT_BASE_URL, api_key)
    }

    /// Construct a client against an alternative host (testing/staging).
    pub fn with_base_url(transport: T, base_url: &str, api_key: &str) -> Result<Self, ApiError> {
        let api_key = ApiKey::parse(api_key)?;
        Ok(Self {
            api_key,
            builder: RequestBuilder::new(base_url),
            transport,
        })
    }

    /// Identify an embedding client library in the User-Agent header.
    pub fn user_agent_suffix(mut self, suffix: &str) -> Self {
        self.builder.append_user_agent_suffix(suffix);
        self
    }

    /// Fetch the delivery record of a single notification.
    pub fn get_notification_by_id(&self, notification_id: &str) -> Result<Notification, ApiError> {
        self.get(&format!("{GET_NOTIFICATION_PATH}{notification_id}"))
    }

    /// Fetch the latest version of a template.
    pub fn get_template_by_id(&self, template_id: &str) -> Result<TemplateResponse, ApiError> {
        self.get(&format!("{GET_TEMPLATE_PATH}{template_id}"))
    }

    /// Fetch a specific version of a template, or the latest when
    /// `version` is `None`.
    pub fn get_template_by_id_and_version(
        &self,
        template_id: &str,
        version: Option<u32>,
    ) -> Result<TemplateResponse, ApiError> {
        let path = match version {
            Some(version) => format!("{GET_TEMPLATE_PATH}{template_id}{VERSION_PARAM}{version}"),
            None => format!("{GET_TEMPLATE_PATH}{template_id}"),
        };
        self.get(&path)
    }

    /// List the service's templates, optionally filtered by kind.
    pub fn get_template_list(
        &self,
        template_type: Option<TemplateType>,
    ) -> Result<TemplateList, ApiError> {
        let path = match template_type {
            Some(template_type) => {
                format!("{GET_TEMPLATE_LIST_PATH}{TYPE_PARAM}{}", template_type.as_str())
            }
            None => GET_TEMPLATE_LIST_PATH.to_string(),
        };
        self.get(&path)
    }

    /// Render a template with the given personalisation without sending.
    pub fn generate_template_preview(
        &self,
        template_id: &str,
        personalisation: Option<Personalisation>,
    ) -> Result<TemplatePreviewResponse, ApiError> {
        let body = TemplatePreviewRequest { personalisation };
        self.post(&format!("{GET_TEMPLATE_PATH}{template_id}/preview"), &body)
    }

    /// Submit an SMS notification.
    pub fn send_sms(
        &self,
        phone_number: &str,
        template_id: &str,
        personalisation: Option<Personalisation>,
        reference: Option<&str>,
    ) -> Result<SmsNotificationResponse, ApiError> {
        let body = SendSmsRequest {
            phone_number: phone_number.to_string(),
            template_id: template_id.to_string(),
            personalisation,
            reference: reference.map(str::to_string),
        };
        self.post(SEND_SMS_PATH, &body)
    }

    /// Submit an email notification.
    pub fn send_email(
        &self,
        email_address: &str,
        template_id: &str,
        personalisation: Option<Personalisation>,
        reference: Option<&str>,
    ) -> Result<EmailNotificationResponse, ApiError> {
        let body = SendEmailRequest {
            email_address: email_address.to_string(),
            template_id: template_id.to_string(),
            personalisation,
            reference: reference.map(str::to_string),
        };
        self.post(SEND_EMAIL_PATH, &body)
    }

    fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        let token = self.api_key.issue_token()?;
        self.dispatch(self.builder.get(path, &token))
    }

    fn post<B: Serialize, R: DeserializeOwned>(&self, path: &str, body: &B) -> Result<R, ApiError> {
        let token = self.api_key.issue_token()?;
        let body =
            serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        self.dispatch(self.builder.post(path, body, &token))
    }

    fn dispatch<R: DeserializeOwned>(&self, request: HttpRequest) -> Result<R, ApiError> {
        debug!(method = ?request.method, url = %request.url, "sending request");
        let response = self.transport.send(&request)?;
        debug!(status = response.status, "received response");
        response::interpret(response)
    }
}
