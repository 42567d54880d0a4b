//! HTTP API tests over in-memory services

use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, HeaderValue, StatusCode};
use axum_test::{TestResponse, TestServer};
use serde_json::{json, Value};

use domain_events::EventAction;
use interface_api::{create_router, AppState};
use infra_messaging::{DetachedPublisher, KafkaConfig};
use test_utils::{
    HangingSink, InMemoryEventStore, SlowEventStore, TestServices, TestServicesBuilder,
    UnavailableEventStore,
};

fn server(services: &TestServices) -> TestServer {
    let state = AppState::new(services.auth.clone(), services.events.clone());
    TestServer::new(create_router(state, Duration::from_secs(5))).unwrap()
}

fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
}

fn launch_body() -> Value {
    json!({
        "name": "Launch",
        "description": "Product launch party",
        "location": "Berlin",
        "date_time": "2030-01-15T18:00:00Z"
    })
}

fn assert_error(response: &TestResponse, status: StatusCode, kind: &str) {
    response.assert_status(status);
    let body: Value = response.json();
    assert_eq!(body["error"], kind);
    assert!(body["message"].is_string());
}

/// Registers and logs in, returning (user id, token)
async fn sign_up(server: &TestServer, email: &str, password: &str) -> (i64, String) {
    let registered = server
        .post("/auth/register")
        .json(&json!({ "email": email, "password": password }))
        .await;
    registered.assert_status(StatusCode::CREATED);
    let user: Value = registered.json();
    assert_eq!(user["email"], email);
    assert!(user.get("password_hash").is_none());

    let login = server
        .post("/auth/login")
        .json(&json!({ "email": email, "password": password }))
        .await;
    login.assert_status_ok();
    let body: Value = login.json();
    assert_eq!(body["message"], "login successful");

    (
        user["id"].as_i64().unwrap(),
        body["token"].as_str().unwrap().to_string(),
    )
}

async fn create_launch(server: &TestServer, token: &str) -> Value {
    let response = server
        .post("/events")
        .add_header(header::AUTHORIZATION, bearer(token))
        .json(&launch_body())
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

#[tokio::test]
async fn test_launch_scenario() {
    let services = TestServicesBuilder::new().build();
    let server = server(&services);
    let (user_id, token) = sign_up(&server, "a@x.com", "secret1").await;

    let created = create_launch(&server, &token).await;
    assert_eq!(created["user_id"], user_id);
    assert_eq!(created["date_time"], "2030-01-15T18:00:00Z");

    let listed: Value = server.get("/events").await.json();
    assert_eq!(listed, json!([created.clone()]));

    let fetched: Value = server
        .get(&format!("/events/{}", created["id"]))
        .await
        .json();
    assert_eq!(fetched, created);

    assert_eq!(services.recorder.actions(), vec![EventAction::Created]);
}

#[tokio::test]
async fn test_create_without_token_is_unauthorized() {
    let services = TestServicesBuilder::new().build();
    let server = server(&services);

    let response = server.post("/events").json(&launch_body()).await;

    assert_error(&response, StatusCode::UNAUTHORIZED, "unauthenticated");
    assert!(services.recorder.messages().is_empty());
}

#[tokio::test]
async fn test_tampered_token_is_unauthorized() {
    let services = TestServicesBuilder::new().build();
    let server = server(&services);
    let (_, token) = sign_up(&server, "a@x.com", "secret1").await;

    let response = server
        .post("/events")
        .add_header(header::AUTHORIZATION, bearer(&format!("{}x", token)))
        .json(&launch_body())
        .await;

    assert_error(&response, StatusCode::UNAUTHORIZED, "unauthenticated");
}

#[tokio::test]
async fn test_token_without_bearer_prefix_is_accepted() {
    let services = TestServicesBuilder::new().build();
    let server = server(&services);
    let (_, token) = sign_up(&server, "a@x.com", "secret1").await;

    let response = server
        .post("/events")
        .add_header(header::AUTHORIZATION, HeaderValue::from_str(&token).unwrap())
        .json(&launch_body())
        .await;

    response.assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn test_wrong_password_and_unknown_email_look_the_same() {
    let services = TestServicesBuilder::new().build();
    let server = server(&services);
    sign_up(&server, "a@x.com", "secret1").await;

    let wrong_password = server
        .post("/auth/login")
        .json(&json!({ "email": "a@x.com", "password": "not-it" }))
        .await;
    let unknown_email = server
        .post("/auth/login")
        .json(&json!({ "email": "nobody@x.com", "password": "secret1" }))
        .await;

    assert_error(&wrong_password, StatusCode::UNAUTHORIZED, "unauthenticated");
    assert_error(&unknown_email, StatusCode::UNAUTHORIZED, "unauthenticated");
    assert_eq!(
        wrong_password.json::<Value>()["message"],
        unknown_email.json::<Value>()["message"]
    );
}

#[tokio::test]
async fn test_duplicate_email_is_conflict() {
    let services = TestServicesBuilder::new().build();
    let server = server(&services);
    sign_up(&server, "a@x.com", "secret1").await;

    let response = server
        .post("/auth/register")
        .json(&json!({ "email": "a@x.com", "password": "secret9" }))
        .await;

    assert_error(&response, StatusCode::CONFLICT, "conflict");
}

#[tokio::test]
async fn test_other_user_cannot_modify_event() {
    let services = TestServicesBuilder::new().build();
    let server = server(&services);
    let (_, owner) = sign_up(&server, "a@x.com", "secret1").await;
    let (_, other) = sign_up(&server, "b@x.com", "secret2").await;
    let event = create_launch(&server, &owner).await;
    let path = format!("/events/{}", event["id"]);

    let update = server
        .put(&path)
        .add_header(header::AUTHORIZATION, bearer(&other))
        .json(&launch_body())
        .await;
    assert_error(&update, StatusCode::FORBIDDEN, "forbidden");

    let delete = server
        .delete(&path)
        .add_header(header::AUTHORIZATION, bearer(&other))
        .await;
    assert_error(&delete, StatusCode::FORBIDDEN, "forbidden");

    let unchanged: Value = server.get(&path).await.json();
    assert_eq!(unchanged, event);
}

#[tokio::test]
async fn test_owner_updates_and_deletes_event() {
    let services = TestServicesBuilder::new().build();
    let server = server(&services);
    let (user_id, token) = sign_up(&server, "a@x.com", "secret1").await;
    let event = create_launch(&server, &token).await;
    let path = format!("/events/{}", event["id"]);

    let mut body = launch_body();
    body["location"] = json!("Munich");
    body["user_id"] = json!(999);
    let updated = server
        .put(&path)
        .add_header(header::AUTHORIZATION, bearer(&token))
        .json(&body)
        .await;
    updated.assert_status_ok();
    let updated: Value = updated.json();
    assert_eq!(updated["location"], "Munich");
    assert_eq!(updated["user_id"], user_id);

    server
        .delete(&path)
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    assert_error(&server.get(&path).await, StatusCode::NOT_FOUND, "not_found");
    assert_eq!(
        services.recorder.actions(),
        vec![EventAction::Created, EventAction::Updated, EventAction::Deleted]
    );
}

#[tokio::test]
async fn test_blank_name_is_bad_request() {
    let services = TestServicesBuilder::new().build();
    let server = server(&services);
    let (_, token) = sign_up(&server, "a@x.com", "secret1").await;

    let mut body = launch_body();
    body["name"] = json!("   ");
    let response = server
        .post("/events")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .json(&body)
        .await;

    assert_error(&response, StatusCode::BAD_REQUEST, "invalid");
}

#[tokio::test]
async fn test_malformed_body_and_path_are_bad_request() {
    let services = TestServicesBuilder::new().build();
    let server = server(&services);
    let (_, token) = sign_up(&server, "a@x.com", "secret1").await;

    let missing_field = server
        .post("/events")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .json(&json!({ "name": "Launch" }))
        .await;
    assert_error(&missing_field, StatusCode::BAD_REQUEST, "invalid");

    let bad_id = server.get("/events/not-a-number").await;
    assert_error(&bad_id, StatusCode::BAD_REQUEST, "invalid");
}

#[tokio::test]
async fn test_registration_flow() {
    let services = TestServicesBuilder::new().build();
    let server = server(&services);
    let (_, owner) = sign_up(&server, "a@x.com", "secret1").await;
    let (guest_id, guest) = sign_up(&server, "b@x.com", "secret2").await;
    let event = create_launch(&server, &owner).await;
    let register_path = format!("/events/{}/register", event["id"]);
    let registrations_path = format!("/users/{}/registrations", guest_id);

    let registered = server
        .post(&register_path)
        .add_header(header::AUTHORIZATION, bearer(&guest))
        .await;
    registered.assert_status(StatusCode::CREATED);
    let body: Value = registered.json();
    assert_eq!(body["registration"]["user_id"], guest_id);
    assert_eq!(body["registration"]["event_id"], event["id"]);

    let again = server
        .post(&register_path)
        .add_header(header::AUTHORIZATION, bearer(&guest))
        .await;
    assert_error(&again, StatusCode::CONFLICT, "conflict");

    let listed: Value = server
        .get(&registrations_path)
        .add_header(header::AUTHORIZATION, bearer(&guest))
        .await
        .json();
    assert_eq!(listed, json!([event.clone()]));

    server
        .delete(&register_path)
        .add_header(header::AUTHORIZATION, bearer(&guest))
        .await
        .assert_status_ok();

    let listed: Value = server
        .get(&registrations_path)
        .add_header(header::AUTHORIZATION, bearer(&guest))
        .await
        .json();
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn test_other_users_registrations_are_forbidden() {
    let services = TestServicesBuilder::new().build();
    let server = server(&services);
    let (owner_id, _) = sign_up(&server, "a@x.com", "secret1").await;
    let (_, other) = sign_up(&server, "b@x.com", "secret2").await;

    let response = server
        .get(&format!("/users/{}/registrations", owner_id))
        .add_header(header::AUTHORIZATION, bearer(&other))
        .await;

    assert_error(&response, StatusCode::FORBIDDEN, "forbidden");
}

#[tokio::test]
async fn test_register_for_missing_event_is_not_found() {
    let services = TestServicesBuilder::new().build();
    let server = server(&services);
    let (_, token) = sign_up(&server, "a@x.com", "secret1").await;

    let response = server
        .post("/events/404/register")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await;

    assert_error(&response, StatusCode::NOT_FOUND, "not_found");
}

#[tokio::test]
async fn test_create_responds_while_broker_hangs() {
    let sink = Arc::new(HangingSink::new());
    let drain_timeout = Duration::from_millis(100);
    let publisher = Arc::new(DetachedPublisher::spawn(
        sink.clone(),
        &KafkaConfig::default().drain_timeout(drain_timeout),
    ));
    let services = TestServicesBuilder::new()
        .with_publisher(publisher.clone())
        .build();
    let server = server(&services);
    let (_, token) = sign_up(&server, "a@x.com", "secret1").await;

    let created = tokio::time::timeout(Duration::from_secs(2), create_launch(&server, &token)).await;
    assert!(created.is_ok(), "create must not wait for the broker");
    let second = tokio::time::timeout(Duration::from_secs(2), create_launch(&server, &token)).await;
    assert!(second.is_ok());

    let closed = tokio::time::timeout(drain_timeout + Duration::from_secs(1), publisher.close()).await;
    assert!(closed.is_ok(), "close must give up after the drain timeout");
    assert_eq!(sink.started(), 1);
}

#[tokio::test]
async fn test_request_deadline_renders_error_body() {
    let services = TestServicesBuilder::new()
        .with_event_store(Arc::new(SlowEventStore::new(
            Arc::new(InMemoryEventStore::new()),
            Duration::from_secs(5),
        )))
        .build();
    let state = AppState::new(services.auth.clone(), services.events.clone());
    let server = TestServer::new(create_router(state, Duration::from_millis(50))).unwrap();

    let response = server.get("/events").await;

    assert_error(&response, StatusCode::SERVICE_UNAVAILABLE, "unavailable");
    assert_eq!(
        response.json::<Value>()["message"],
        core_kernel::UNAVAILABLE_MESSAGE
    );
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_store_outage_is_service_unavailable() {
    let services = TestServicesBuilder::new()
        .with_event_store(Arc::new(UnavailableEventStore))
        .build();
    let server = server(&services);

    let response = server.get("/events").await;
    assert_error(&response, StatusCode::SERVICE_UNAVAILABLE, "unavailable");
    assert_eq!(
        response.json::<Value>()["message"],
        core_kernel::UNAVAILABLE_MESSAGE
    );

    server
        .get("/health/ready")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_health_endpoints() {
    let services = TestServicesBuilder::new().build();
    let server = server(&services);

    let health: Value = server.get("/health").await.json();
    assert_eq!(health["status"], "healthy");

    let ready = server.get("/health/ready").await;
    ready.assert_status_ok();
    assert_eq!(ready.json::<Value>()["status"], "ready");
}

#[tokio::test]
async fn test_request_id_is_returned() {
    let services = TestServicesBuilder::new().build();
    let server = server(&services);

    let response = server.get("/health").await;

    assert!(response.headers().contains_key("x-request-id"));
}
