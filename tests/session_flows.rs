//! End-to-end session flows.
//!
//! These tests wire the real session context, request pipeline, handlers and
//! shell against a scripted transport:
//! 1. Sign-in persists the session and the guard keeps users on their role
//! 2. A rejected credential clears the session exactly once
//! 3. Registration never signs the user in
//! 4. Sign-out always ends the local session

use futures::future::join;
use http::Method;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

use medbook_client::adapters::{FileSessionStorage, InMemorySessionStorage, MockReply, MockTransport};
use medbook_client::application::{
    AppShell, ApiErrorKind, ListPatientAppointmentsHandler, LoginCommand, LoginHandler,
    LogoutHandler, RegisterCommand, RegisterHandler, RequestPipeline, SessionContext,
};
use medbook_client::domain::foundation::{Role, UserId};
use medbook_client::domain::routing::GuardDecision;
use medbook_client::domain::session::{AccessToken, SessionEvent, UserSummary};
use medbook_client::ports::SessionStorage;

// =============================================================================
// Test Infrastructure
// =============================================================================

struct Harness {
    storage: Arc<InMemorySessionStorage>,
    transport: Arc<MockTransport>,
    session: Arc<SessionContext>,
    pipeline: RequestPipeline,
    shell: AppShell,
}

async fn harness(transport: MockTransport) -> Harness {
    let storage = Arc::new(InMemorySessionStorage::new());
    let transport = Arc::new(transport);
    let session = SessionContext::restore(storage.clone()).await;
    let pipeline = RequestPipeline::new(transport.clone(), session.clone());
    let shell = AppShell::new(session.clone());
    Harness {
        storage,
        transport,
        session,
        pipeline,
        shell,
    }
}

fn login_reply(role: &str, token: &str) -> MockReply {
    MockReply::json(
        200,
        json!({
            "user": {"id": "u1", "name": "Pat", "email": "pat@example.com", "role": role},
            "tokens": {"accessToken": token, "refreshToken": "r"}
        }),
    )
}

async fn sign_in(h: &mut Harness) {
    LoginHandler::new(h.pipeline.clone())
        .handle(LoginCommand {
            email: "pat@example.com".to_string(),
            password: "secret1".to_string(),
        })
        .await
        .unwrap();
    h.shell.process_signals().await;
}

// =============================================================================
// Sign-in and role guard
// =============================================================================

#[tokio::test]
async fn patient_sign_in_persists_and_guard_redirects_to_own_dashboard() {
    let mut h = harness(MockTransport::new().on(Method::POST, "/auth/login", login_reply("patient", "tok123"))).await;
    h.shell.navigate("/login").await;

    sign_in(&mut h).await;

    assert_eq!(h.storage.raw("token").await.as_deref(), Some("tok123"));
    let user: Value = serde_json::from_str(&h.storage.raw("user").await.unwrap()).unwrap();
    assert_eq!(user["role"], "patient");
    assert_eq!(h.shell.location(), "/dashboard/patient");

    let nav = h.shell.navigate("/dashboard/doctor").await;
    assert_eq!(nav.decision, GuardDecision::RedirectToRoleHome(Role::Patient));
    assert_eq!(nav.location, "/dashboard/patient");
}

#[tokio::test]
async fn wrong_password_keeps_previous_session() {
    let mut h = harness(
        MockTransport::new()
            .on(Method::POST, "/auth/login", login_reply("doctor", "first"))
            .on(
                Method::POST,
                "/auth/login",
                MockReply::json(401, json!({"message": "Invalid email or password"})),
            ),
    )
    .await;
    sign_in(&mut h).await;

    let err = LoginHandler::new(h.pipeline.clone())
        .handle(LoginCommand {
            email: "pat@example.com".to_string(),
            password: "wrong-one".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Invalid email or password");
    let state = h.session.snapshot().await;
    assert!(state.is_authenticated());
    assert_eq!(state.error.as_deref(), Some("Invalid email or password"));
    assert_eq!(h.storage.raw("token").await.as_deref(), Some("first"));
}

// =============================================================================
// Rejected credential
// =============================================================================

#[tokio::test]
async fn unauthorized_background_fetch_clears_session_and_redirects() {
    let mut h = harness(
        MockTransport::new()
            .on(Method::POST, "/auth/login", login_reply("patient", "tok123"))
            .on(
                Method::GET,
                "/appointments/patient",
                MockReply::json(401, json!({"message": "Token expired"})),
            ),
    )
    .await;
    sign_in(&mut h).await;
    h.shell.navigate("/dashboard/patient/appointments").await;

    let err = ListPatientAppointmentsHandler::new(h.pipeline.clone())
        .handle()
        .await
        .unwrap_err();

    assert_eq!(err.as_api().map(|e| e.kind), Some(ApiErrorKind::AuthenticationInvalid));
    assert!(h.storage.is_empty().await);
    assert!(!h.session.is_authenticated().await);
    assert_eq!(h.shell.process_signals().await, 1);
    assert_eq!(h.shell.location(), "/login");
}

#[tokio::test]
async fn concurrent_unauthorized_responses_redirect_once() {
    let mut h = harness(
        MockTransport::new()
            .on(Method::POST, "/auth/login", login_reply("patient", "tok123"))
            .on(
                Method::GET,
                "/appointments/patient",
                MockReply::json(401, json!({"message": "Token expired"})),
            )
            .with_delay(Duration::from_millis(20)),
    )
    .await;
    sign_in(&mut h).await;
    h.shell.navigate("/dashboard/patient").await;

    let first = ListPatientAppointmentsHandler::new(h.pipeline.clone());
    let second = ListPatientAppointmentsHandler::new(h.pipeline.clone());
    let (a, b) = join(first.handle(), second.handle()).await;

    assert!(a.is_err());
    assert!(b.is_err());
    assert_eq!(h.transport.requests_to(&Method::GET, "/appointments/patient").len(), 2);
    assert_eq!(h.shell.process_signals().await, 1);
    assert_eq!(h.shell.history().iter().filter(|l| *l == "/login").count(), 1);
}

#[tokio::test]
async fn unauthorized_without_session_redirects_to_login() {
    let mut h = harness(MockTransport::new().on(
        Method::GET,
        "/appointments/patient",
        MockReply::json(401, json!({"message": "Not authenticated"})),
    ))
    .await;
    h.shell.navigate("/").await;

    let err = ListPatientAppointmentsHandler::new(h.pipeline.clone())
        .handle()
        .await
        .unwrap_err();

    assert_eq!(err.as_api().map(|e| e.kind), Some(ApiErrorKind::AuthenticationInvalid));
    assert_eq!(h.shell.process_signals().await, 1);
    assert_eq!(h.shell.location(), "/login");
}

// =============================================================================
// Switching users mid-request
// =============================================================================

fn signed_in_as(id: &str, token: &str) -> SessionEvent {
    SessionEvent::LoginSuccess {
        user: UserSummary::new(UserId::new(id).unwrap(), None, None, Some(Role::Patient)),
        token: AccessToken::new(token).unwrap(),
    }
}

#[tokio::test]
async fn previous_users_appointments_never_reach_next_user() {
    let h = harness(
        MockTransport::new()
            .on(
                Method::GET,
                "/appointments/patient",
                MockReply::enveloped(json!([{"_id": "a-of-user-A", "date": "2025-11-03", "start": "09:00", "end": "09:30", "status": "pending"}])),
            )
            .with_delay(Duration::from_millis(50)),
    )
    .await;
    h.session.dispatch(signed_in_as("userA", "tokA")).await.unwrap();

    let fetch = ListPatientAppointmentsHandler::new(h.pipeline.clone());
    let switch_user = async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        h.session.dispatch(SessionEvent::Logout).await.unwrap();
        h.session.dispatch(signed_in_as("userB", "tokB")).await.unwrap();
    };
    let (result, ()) = join(fetch.handle(), switch_user).await;

    let err = result.unwrap_err();
    assert_eq!(err.as_api().map(|e| e.kind), Some(ApiErrorKind::Superseded));
    let state = h.session.snapshot().await;
    assert_eq!(state.user().map(|u| u.id.as_str()), Some("userB"));
    assert_eq!(h.storage.raw("token").await.as_deref(), Some("tokB"));
}

// =============================================================================
// Registration
// =============================================================================

#[tokio::test]
async fn doctor_registration_does_not_sign_in() {
    let mut h = harness(MockTransport::new().on(
        Method::POST,
        "/auth/register",
        MockReply::json(201, json!({"user": {"id": "d1", "name": "Dr Who", "role": "doctor"}})),
    ))
    .await;
    h.shell.navigate("/register").await;

    let result = RegisterHandler::new(h.pipeline.clone())
        .handle(RegisterCommand {
            name: "Dr Who".to_string(),
            email: "who@example.com".to_string(),
            password: "Tardis1".to_string(),
            confirm_password: "Tardis1".to_string(),
            role: Role::Doctor,
        })
        .await
        .unwrap();

    assert_eq!(result.user.and_then(|u| u.role), Some(Role::Doctor));
    assert!(!h.session.is_authenticated().await);
    assert!(h.storage.is_empty().await);
    assert_eq!(h.shell.process_signals().await, 1);
    assert_eq!(h.shell.location(), "/login");
}

#[tokio::test]
async fn invalid_registration_never_reaches_backend() {
    let h = harness(MockTransport::new()).await;

    let result = RegisterHandler::new(h.pipeline.clone())
        .handle(RegisterCommand {
            name: "Ann".to_string(),
            email: "ann@example.com".to_string(),
            password: "Abc123".to_string(),
            confirm_password: "Abc124".to_string(),
            role: Role::Patient,
        })
        .await;

    assert!(result.is_err());
    assert!(h.transport.requests().is_empty());
}

// =============================================================================
// Sign-out
// =============================================================================

#[tokio::test]
async fn logout_clears_locally_when_server_fails() {
    let mut h = harness(
        MockTransport::new()
            .on(Method::POST, "/auth/login", login_reply("patient", "tok123"))
            .on(Method::POST, "/auth/logout", MockReply::connect_error("connection refused")),
    )
    .await;
    sign_in(&mut h).await;

    let result = LogoutHandler::new(h.pipeline.clone()).handle().await.unwrap();

    assert!(!result.remote_acknowledged());
    assert!(h.storage.is_empty().await);
    assert!(!h.session.is_authenticated().await);
    assert_eq!(h.shell.process_signals().await, 1);
    assert_eq!(h.shell.location(), "/login");

    let logout = &h.transport.requests_to(&Method::POST, "/auth/logout")[0];
    assert_eq!(logout.header("Authorization"), Some("Bearer tok123"));
}

// =============================================================================
// Persistence across restarts
// =============================================================================

#[tokio::test]
async fn file_session_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let transport = Arc::new(MockTransport::new().on(Method::POST, "/auth/login", login_reply("doctor", "persisted")));

    {
        let session = SessionContext::restore(Arc::new(FileSessionStorage::new(dir.path()))).await;
        let pipeline = RequestPipeline::new(transport.clone(), session);
        LoginHandler::new(pipeline)
            .handle(LoginCommand {
                email: "doc@example.com".to_string(),
                password: "secret1".to_string(),
            })
            .await
            .unwrap();
    }

    let storage = Arc::new(FileSessionStorage::new(dir.path()));
    let session = SessionContext::restore(storage.clone()).await;
    let state = session.snapshot().await;
    assert!(state.is_authenticated());
    assert_eq!(state.role(), Some(Role::Doctor));
    assert_eq!(state.token().map(|t| t.expose().to_string()).as_deref(), Some("persisted"));

    let mut shell = AppShell::new(session.clone());
    assert_eq!(shell.navigate("/doctor-dashboard").await.location, "/dashboard/doctor");

    session.dispatch(SessionEvent::Logout).await.unwrap();
    assert!(!storage.read().await.unwrap().is_present());
}
