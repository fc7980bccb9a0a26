//! In-memory fake of the notification API's v2 surface.
//!
//! Verifies the bearer JWT the same way the real service does (HS256
//! signature, issuer, issued-at freshness), validates recipients, renders
//! `((placeholder))` substitutions, and stores accepted notifications so
//! they can be fetched back. DTOs here are deliberately independent from
//! the client crate; integration tests catch schema drift.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// Issuer the service expects in bearer tokens.
pub const SERVICE_ID: &str = "26785a09-ab16-4eb0-8407-a37497a57506";
/// Signing secret paired with [`SERVICE_ID`].
pub const API_SECRET: &str = "3d844edf-8d35-48ac-975b-e847b4f122b0";
/// Seeded SMS template (version 2).
pub const SMS_TEMPLATE_ID: &str = "f6895ff7-86e0-4d38-80ab-c9525856c3ff";
/// Seeded email template (version 1).
pub const EMAIL_TEMPLATE_ID: &str = "8e222534-7f05-4972-86e3-17c5d9f894e2";

/// Tokens whose `iat` drifts further than this are rejected as stale.
const CLOCK_SKEW_SECONDS: i64 = 30;

/// The composite API key that authenticates against this server.
pub fn api_key() -> String {
    format!("test_key-{SERVICE_ID}-{API_SECRET}")
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Template {
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

#[derive(Clone, Debug, Serialize)]
pub struct TemplateRef {
    pub id: String,
    pub uri: String,
    pub version: u32,
}

#[derive(Clone, Debug, Serialize)]
pub struct Notification {
    pub id: Uuid,
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

#[derive(Deserialize)]
pub struct SendSms {
    pub phone_number: String,
    pub template_id: String,
    pub personalisation: Option<Map<String, Value>>,
    pub reference: Option<String>,
}

#[derive(Deserialize)]
pub struct SendEmail {
    pub email_address: String,
    pub template_id: String,
    pub personalisation: Option<Map<String, Value>>,
    pub reference: Option<String>,
}

#[derive(Deserialize)]
pub struct PreviewRequest {
    pub personalisation: Option<Map<String, Value>>,
}

#[derive(Serialize)]
pub struct SmsContent {
    pub body: String,
    pub from_number: Option<String>,
}

#[derive(Serialize)]
pub struct SmsAccepted {
    pub id: Uuid,
    pub reference: Option<String>,
    pub uri: String,
    pub template: TemplateRef,
    pub content: SmsContent,
}

#[derive(Serialize)]
pub struct EmailContent {
    pub body: String,
    pub subject: String,
    pub from_email: Option<String>,
}

#[derive(Serialize)]
pub struct EmailAccepted {
    pub id: Uuid,
    pub reference: Option<String>,
    pub uri: String,
    pub template: TemplateRef,
    pub content: EmailContent,
}

#[derive(Serialize)]
pub struct TemplatePreview {
    pub id: String,
    #[serde(rename = "type")]
    pub template_type: String,
    pub version: u32,
    pub body: String,
    pub subject: Option<String>,
}

#[derive(Serialize)]
pub struct TemplateListBody {
    pub templates: Vec<Template>,
}

#[derive(Serialize)]
pub struct ErrorEnvelope {
    pub status_code: u16,
    pub errors: Vec<ErrorDetail>,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub error: String,
    pub message: String,
}

pub struct ServiceState {
    notifications: RwLock<HashMap<Uuid, Notification>>,
    templates: Vec<Template>,
}

type SharedState = Arc<ServiceState>;
type Rejection = (StatusCode, Json<ErrorEnvelope>);

pub fn app() -> Router {
    let state: SharedState = Arc::new(ServiceState {
        notifications: RwLock::new(HashMap::new()),
        templates: seed_templates(),
    });
    Router::new()
        .route("/v2/notifications/sms", post(send_sms))
        .route("/v2/notifications/email", post(send_email))
        .route("/v2/notifications/{id}", get(get_notification))
        .route("/v2/templates", get(template_list))
        .route("/v2/template/{id}", get(get_template))
        .route("/v2/template/{id}/preview", post(preview_template))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn seed_templates() -> Vec<Template> {
    vec![
        Template {
            id: SMS_TEMPLATE_ID.to_string(),
            name: "Appointment reminder".to_string(),
            template_type: "sms".to_string(),
            created_at: "2025-11-02T14:00:00.000000Z".to_string(),
            updated_at: Some("2025-12-01T08:15:00.000000Z".to_string()),
            created_by: "service@example.com".to_string(),
            version: 2,
            body: "Hello ((name)), your appointment is on ((day))".to_string(),
            subject: None,
        },
        Template {
            id: EMAIL_TEMPLATE_ID.to_string(),
            name: "Welcome email".to_string(),
            template_type: "email".to_string(),
            created_at: "2025-10-20T09:00:00.000000Z".to_string(),
            updated_at: None,
            created_by: "service@example.com".to_string(),
            version: 1,
            body: "Dear ((name)), welcome aboard".to_string(),
            subject: Some("Welcome".to_string()),
        },
    ]
}

/// A valid bearer token for [`SERVICE_ID`], for tests that drive the
/// router directly rather than through a signing client.
pub fn bearer_token() -> String {
    #[derive(Serialize)]
    struct Claims {
        iss: String,
        iat: i64,
    }
    let claims = Claims {
        iss: SERVICE_ID.to_string(),
        iat: Utc::now().timestamp(),
    };
    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(API_SECRET.as_bytes()),
    )
    .expect("claims serialize");
    format!("Bearer {token}")
}

fn rejection(status: StatusCode, error: &str, message: &str) -> Rejection {
    (
        status,
        Json(ErrorEnvelope {
            status_code: status.as_u16(),
            errors: vec![ErrorDetail {
                error: error.to_string(),
                message: message.to_string(),
            }],
        }),
    )
}

/// Verify the bearer JWT: present, signed with the service secret,
/// issued by the known service, and fresh to within the skew window.
fn authenticate(headers: &HeaderMap) -> Result<(), Rejection> {
    #[derive(Deserialize)]
    struct Claims {
        #[allow(dead_code)]
        iss: String,
        iat: i64,
    }

    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| {
            rejection(
                StatusCode::UNAUTHORIZED,
                "AuthError",
                "Unauthorized, authentication token must be provided",
            )
        })?;

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.required_spec_claims.clear();
    validation.set_issuer(&[SERVICE_ID]);

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(API_SECRET.as_bytes()),
        &validation,
    )
    .map_err(|_| {
        rejection(
            StatusCode::FORBIDDEN,
            "AuthError",
            "Invalid token: API key not found",
        )
    })?;

    if (Utc::now().timestamp() - data.claims.iat).abs() > CLOCK_SKEW_SECONDS {
        return Err(rejection(
            StatusCode::FORBIDDEN,
            "AuthError",
            "Error: Your system clock must be accurate to within 30 seconds",
        ));
    }
    Ok(())
}

/// Substitute `((key))` placeholders with personalisation values.
fn render(body: &str, personalisation: Option<&Map<String, Value>>) -> String {
    let mut rendered = body.to_string();
    if let Some(personalisation) = personalisation {
        for (key, value) in personalisation {
            let placeholder = format!("(({key}))");
            let replacement = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            rendered = rendered.replace(&placeholder, &replacement);
        }
    }
    rendered
}

fn template_ref(template: &Template) -> TemplateRef {
    TemplateRef {
        id: template.id.clone(),
        uri: format!("/v2/template/{}", template.id),
        version: template.version,
    }
}

fn now_micros() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn find_template<'a>(templates: &'a [Template], id: &str) -> Result<&'a Template, Rejection> {
    templates.iter().find(|t| t.id == id).ok_or_else(|| {
        rejection(
            StatusCode::BAD_REQUEST,
            "BadRequestError",
            "Template not found",
        )
    })
}

fn validate_phone_number(phone_number: &str) -> Result<(), Rejection> {
    let invalid = |message: &str| {
        Err(rejection(
            StatusCode::BAD_REQUEST,
            "ValidationError",
            message,
        ))
    };
    let Some(digits) = phone_number.strip_prefix('+') else {
        return invalid("phone_number Must be a UK or international number");
    };
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return invalid("phone_number Must not contain letters or symbols");
    }
    if digits.len() < 8 {
        return invalid("phone_number Not enough digits");
    }
    if digits.len() > 15 {
        return invalid("phone_number Too many digits");
    }
    Ok(())
}

fn validate_email_address(email_address: &str) -> Result<(), Rejection> {
    let valid = match email_address.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.'),
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(rejection(
            StatusCode::BAD_REQUEST,
            "ValidationError",
            "email_address Not a valid email address",
        ))
    }
}

async fn send_sms(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(input): Json<SendSms>,
) -> Result<(StatusCode, Json<SmsAccepted>), Rejection> {
    authenticate(&headers)?;
    validate_phone_number(&input.phone_number)?;
    let template = find_template(&state.templates, &input.template_id)?.clone();

    let body = render(&template.body, input.personalisation.as_ref());
    let id = Uuid::new_v4();
    let notification = Notification {
        id,
        reference: input.reference.clone(),
        email_address: None,
        phone_number: Some(input.phone_number),
        line_1: None,
        line_2: None,
        line_3: None,
        line_4: None,
        line_5: None,
        line_6: None,
        postcode: None,
        notification_type: "sms".to_string(),
        status: "created".to_string(),
        template: template_ref(&template),
        body: body.clone(),
        subject: None,
        created_at: now_micros(),
        sent_at: None,
        completed_at: None,
    };
    state.notifications.write().await.insert(id, notification);

    Ok((
        StatusCode::CREATED,
        Json(SmsAccepted {
            id,
            reference: input.reference,
            uri: format!("/v2/notifications/{id}"),
            template: template_ref(&template),
            content: SmsContent {
                body,
                from_number: Some("TestService".to_string()),
            },
        }),
    ))
}

async fn send_email(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(input): Json<SendEmail>,
) -> Result<(StatusCode, Json<EmailAccepted>), Rejection> {
    authenticate(&headers)?;
    validate_email_address(&input.email_address)?;
    let template = find_template(&state.templates, &input.template_id)?.clone();

    let body = render(&template.body, input.personalisation.as_ref());
    let subject = template.subject.clone().unwrap_or_default();
    let id = Uuid::new_v4();
    let notification = Notification {
        id,
        reference: input.reference.clone(),
        email_address: Some(input.email_address),
        phone_number: None,
        line_1: None,
        line_2: None,
        line_3: None,
        line_4: None,
        line_5: None,
        line_6: None,
        postcode: None,
        notification_type: "email".to_string(),
        status: "created".to_string(),
        template: template_ref(&template),
        body: body.clone(),
        subject: Some(subject.clone()),
        created_at: now_micros(),
        sent_at: None,
        completed_at: None,
    };
    state.notifications.write().await.insert(id, notification);

    Ok((
        StatusCode::CREATED,
        Json(EmailAccepted {
            id,
            reference: input.reference,
            uri: format!("/v2/notifications/{id}"),
            template: template_ref(&template),
            content: EmailContent {
                body,
                subject,
                from_email: Some("service@notifications.example.com".to_string()),
            },
        }),
    ))
}

async fn get_notification(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<Notification>, Rejection> {
    authenticate(&headers)?;
    let notifications = state.notifications.read().await;
    notifications.get(&id).cloned().map(Json).ok_or_else(|| {
        rejection(StatusCode::NOT_FOUND, "NoResultFound", "No result found")
    })
}

#[derive(Deserialize)]
struct TemplateQuery {
    version: Option<u32>,
}

async fn get_template(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Query(query): Query<TemplateQuery>,
) -> Result<Json<Template>, Rejection> {
    authenticate(&headers)?;
    let not_found = || rejection(StatusCode::NOT_FOUND, "NoResultFound", "No result found");
    let template = state
        .templates
        .iter()
        .find(|t| t.id == id.to_string())
        .ok_or_else(not_found)?;
    if let Some(version) = query.version {
        if version != template.version {
            return Err(not_found());
        }
    }
    Ok(Json(template.clone()))
}

#[derive(Deserialize)]
struct ListQuery {
    #[serde(rename = "type")]
    template_type: Option<String>,
}

async fn template_list(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Json<TemplateListBody>, Rejection> {
    authenticate(&headers)?;
    let templates = state
        .templates
        .iter()
        .filter(|t| match &query.template_type {
            Some(kind) => t.template_type == *kind,
            None => true,
        })
        .cloned()
        .collect();
    Ok(Json(TemplateListBody { templates }))
}

async fn preview_template(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(input): Json<PreviewRequest>,
) -> Result<Json<TemplatePreview>, Rejection> {
    authenticate(&headers)?;
    let template = state
        .templates
        .iter()
        .find(|t| t.id == id.to_string())
        .ok_or_else(|| rejection(StatusCode::NOT_FOUND, "NoResultFound", "No result found"))?;
    Ok(Json(TemplatePreview {
        id: template.id.clone(),
        template_type: template.template_type.clone(),
        version: template.version,
        body: render(&template.body, input.personalisation.as_ref()),
        subject: template.subject.clone(),
    }))
}
