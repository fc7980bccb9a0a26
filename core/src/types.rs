//! Wire DTOs for the notification API.
//!
//! # Design
//! These types mirror the service's JSON schema but are defined
//! independently from the mock-server crate; integration tests catch
//! schema drift. Response types serialize optional fields as explicit
//! `null` so a fixture round-trips through the type without losing
//! members. Request types skip unset optional fields entirely, and their
//! field declaration order is the wire order, so serialized bodies are
//! byte-reproducible.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Caller-supplied substitution data merged into a template at send time.
///
/// An ordered mapping (serde_json is built with `preserve_order`) from
/// placeholder name to any JSON value, so serialization is deterministic.
pub type Personalisation = Map<String, Value>;

/// Template kind accepted by the template-list filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateType {
    Email,
    Sms,
    Letter,
}

impl TemplateType {
    pub fn as_str(self) -> &'static str {
        match self {
            TemplateType::Email => "email",
            TemplateType::Sms => "sms",
            TemplateType::Letter => "letter",
        }
    }
}

/// Reference to the template a notification was sent with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TemplateRef {
    pub id: String,
    pub uri: String,
    pub version: u32,
}

/// A notification's full delivery record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    pub id: String,
    pub reference: Option<String>,
    pub email_address: Option<String>,
    pub phone_number: Option<String>,
    pub line_1: Option<String>,
    pub line_2: Option<String>,
    pub line_3: Option<String>,
    pub line_4: Option<String>,
    pub line_5: Option<String>,
    pub line_6: Option<String>,
    pub postcode: Option<String>,
    #[serde(rename = "type")]
    pub notification_type: String,
    pub status: String,
    pub template: TemplateRef,
    pub body: String,
    pub subject: Option<String>,
    pub created_at: String,
    pub sent_at: Option<String>,
    pub completed_at: Option<String>,
}

/// A template as returned by the template endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TemplateResponse {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub template_type: String,
    pub created_at: String,
    pub updated_at: Option<String>,
    pub created_by: String,
    pub version: u32,
    pub body: String,
    pub subject: Option<String>,
}

/// Result of listing templates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TemplateList {
    pub templates: Vec<TemplateResponse>,
}

/// A template rendered with personalisation, without sending anything.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TemplatePreviewResponse {
    pub id: String,
    #[serde(rename = "type")]
    pub template_type: String,
    pub version: u32,
    pub body: String,
    pub subject: Option<String>,
}

/// Rendered content echoed back when an SMS is accepted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SmsContent {
    pub body: String,
    pub from_number: Option<String>,
}

/// Result of submitting an SMS notification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SmsNotificationResponse {
    pub id: String,
    pub reference: Option<String>,
    pub uri: String,
    pub template: TemplateRef,
    pub content: SmsContent,
}

/// Rendered content echoed back when an email is accepted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmailContent {
    pub body: String,
    pub subject: String,
    pub from_email: Option<String>,
}

/// Result of submitting an email notification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmailNotificationResponse {
    pub id: String,
    pub reference: Option<String>,
    pub uri: String,
    pub template: TemplateRef,
    pub content: EmailContent,
}

/// Body of POST `/v2/notifications/sms`. Unset optional fields are
/// omitted, never sent as null.
#[derive(Debug, Clone, Serialize)]
pub struct SendSmsRequest {
    pub phone_number: String,
    pub template_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personalisation: Option<Personalisation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// Body of POST `/v2/notifications/email`.
#[derive(Debug, Clone, Serialize)]
pub struct SendEmailRequest {
    pub email_address: String,
    pub template_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personalisation: Option<Personalisation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// Body of POST `/v2/template/{id}/preview`.
#[derive(Debug, Clone, Serialize)]
pub struct TemplatePreviewRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personalisation: Option<Personalisation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_sms_request_omits_unset_fields() {
        let req = SendSmsRequest {
            phone_number: "+447900900123".to_string(),
            template_id: "f6895ff7-86e0-4d38-80ab-c9525856c3ff".to_string(),
            personalisation: None,
            reference: None,
        };
        let json = serde_json::to_string(&req).unwrap();
        assert_eq!(
            json,
            r#"{"phone_number":"+447900900123","template_id":"f6895ff7-86e0-4d38-80ab-c9525856c3ff"}"#
        );
    }

    #[test]
    fn send_email_request_serializes_in_wire_order() {
        let mut personalisation = Personalisation::new();
        personalisation.insert("name".to_string(), Value::String("someone".to_string()));
        let req = SendEmailRequest {
            email_address: "someone@example.com".to_string(),
            template_id: "f6895ff7-86e0-4d38-80ab-c9525856c3ff".to_string(),
            personalisation: Some(personalisation),
            reference: Some("my-ref".to_string()),
        };
        let json = serde_json::to_string(&req).unwrap();
        assert_eq!(
            json,
            r#"{"email_address":"someone@example.com","template_id":"f6895ff7-86e0-4d38-80ab-c9525856c3ff","personalisation":{"name":"someone"},"reference":"my-ref"}"#
        );
    }

    #[test]
    fn preview_request_with_no_personalisation_is_empty_object() {
        let req = TemplatePreviewRequest {
            personalisation: None,
        };
        assert_eq!(serde_json::to_string(&req).unwrap(), "{}");
    }

    #[test]
    fn personalisation_preserves_insertion_order() {
        let mut personalisation = Personalisation::new();
        personalisation.insert("zebra".to_string(), Value::String("z".to_string()));
        personalisation.insert("apple".to_string(), Value::from(1));
        let json = serde_json::to_string(&personalisation).unwrap();
        assert_eq!(json, r#"{"zebra":"z","apple":1}"#);
    }

    #[test]
    fn notification_roundtrips_preserving_null_fields() {
        let raw = r#"{
            "id": "b9fd21d2-73a4-42f1-b5dc-b20073a1af8f",
            "reference": null,
            "email_address": null,
            "phone_number": "+447900900123",
            "line_1": null,
            "line_2": null,
            "line_3": null,
            "line_4": null,
            "line_5": null,
            "line_6": null,
            "postcode": null,
            "type": "sms",
            "status": "delivered",
            "template": {
                "id": "f6895ff7-86e0-4d38-80ab-c9525856c3ff",
                "uri": "/v2/template/f6895ff7-86e0-4d38-80ab-c9525856c3ff",
                "version": 2
            },
            "body": "Your reminder is ready",
            "subject": null,
            "created_at": "2026-01-10T09:30:00.000000Z",
            "sent_at": "2026-01-10T09:30:02.000000Z",
            "completed_at": "2026-01-10T09:30:05.000000Z"
        }"#;
        let parsed: Notification = serde_json::from_str(raw).unwrap();
        let reserialized = serde_json::to_value(&parsed).unwrap();
        let original: Value = serde_json::from_str(raw).unwrap();
        assert_eq!(reserialized, original);
    }
}
