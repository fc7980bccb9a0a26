use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, bearer_token, EMAIL_TEMPLATE_ID, SMS_TEMPLATE_ID};
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn authed_get(uri: &str) -> Request<String> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(http::header::AUTHORIZATION, bearer_token())
        .body(String::new())
        .unwrap()
}

fn authed_post(uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(http::header::AUTHORIZATION, bearer_token())
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

// --- auth ---

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let app = app();
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/v2/templates")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await;
    assert_eq!(body["errors"][0]["error"], "AuthError");
    assert_eq!(
        body["errors"][0]["message"],
        "Unauthorized, authentication token must be provided"
    );
}

#[tokio::test]
async fn garbage_token_is_forbidden() {
    let app = app();
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/v2/templates")
                .header(http::header::AUTHORIZATION, "Bearer not.a.jwt")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body = body_json(resp).await;
    assert_eq!(body["errors"][0]["message"], "Invalid token: API key not found");
}

// --- templates ---

#[tokio::test]
async fn template_list_returns_both_seeded_templates() {
    let app = app();
    let resp = app.oneshot(authed_get("/v2/templates")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["templates"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn template_list_filters_by_type() {
    let app = app();
    let resp = app
        .oneshot(authed_get("/v2/templates?type=email"))
        .await
        .unwrap();

    let body = body_json(resp).await;
    let templates = body["templates"].as_array().unwrap();
    assert_eq!(templates.len(), 1);
    assert_eq!(templates[0]["id"], EMAIL_TEMPLATE_ID);
}

#[tokio::test]
async fn get_template_wrong_version_is_not_found() {
    let app = app();
    let resp = app
        .oneshot(authed_get(&format!("/v2/template/{SMS_TEMPLATE_ID}?version=9")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    assert_eq!(body["errors"][0]["error"], "NoResultFound");
}

#[tokio::test]
async fn preview_renders_personalisation() {
    let app = app();
    let resp = app
        .oneshot(authed_post(
            &format!("/v2/template/{SMS_TEMPLATE_ID}/preview"),
            r#"{"personalisation":{"name":"someone","day":"Friday"}}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["body"], "Hello someone, your appointment is on Friday");
}

// --- sends ---

#[tokio::test]
async fn send_sms_stores_a_fetchable_notification() {
    let app = app();
    let resp = app
        .clone()
        .oneshot(authed_post(
            "/v2/notifications/sms",
            &format!(
                r#"{{"phone_number":"+447900900123","template_id":"{SMS_TEMPLATE_ID}","personalisation":{{"name":"someone","day":"Friday"}}}}"#
            ),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let accepted = body_json(resp).await;
    let id = accepted["id"].as_str().unwrap().to_string();
    assert_eq!(
        accepted["content"]["body"],
        "Hello someone, your appointment is on Friday"
    );

    let resp = app
        .oneshot(authed_get(&format!("/v2/notifications/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let notification = body_json(resp).await;
    assert_eq!(notification["id"], id.as_str());
    assert_eq!(notification["type"], "sms");
    assert_eq!(notification["status"], "created");
}

#[tokio::test]
async fn send_sms_rejects_bad_phone_number() {
    let app = app();
    let resp = app
        .oneshot(authed_post(
            "/v2/notifications/sms",
            &format!(r#"{{"phone_number":"not-a-number","template_id":"{SMS_TEMPLATE_ID}"}}"#),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["errors"][0]["error"], "ValidationError");
}

#[tokio::test]
async fn send_email_rejects_unknown_template() {
    let app = app();
    let resp = app
        .oneshot(authed_post(
            "/v2/notifications/email",
            r#"{"email_address":"someone@example.com","template_id":"11111111-2222-3333-4444-555555555555"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["errors"][0]["error"], "BadRequestError");
    assert_eq!(body["errors"][0]["message"], "Template not found");
}

#[tokio::test]
async fn get_unknown_notification_is_not_found() {
    let app = app();
    let resp = app
        .oneshot(authed_get(
            "/v2/notifications/11111111-2222-3333-4444-555555555555",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    assert_eq!(body["errors"][0]["message"], "No result found");
}
