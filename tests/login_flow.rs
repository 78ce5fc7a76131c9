#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
//! End-to-end login scenarios against stub transports: authentication,
//! rejection, transport failure, endpoint resolution, and the session state
//! each outcome leaves behind.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use game_protocol::config::LoginConfig;
use game_protocol::error::{ProtocolError, Result};
use game_protocol::protocol::builder::MessageBuilder;
use game_protocol::session::handshake::{LoginClient, LoginOutcome, LoginState};
use game_protocol::session::state::SessionHandle;
use game_protocol::session::transport::{LoginResponse, LoginTransport};

/// Records every post and replies with a canned result.
struct StubTransport {
    reply: Box<dyn Fn() -> Result<LoginResponse> + Send + Sync>,
    calls: Arc<Mutex<Vec<(String, Vec<(String, String)>)>>>,
}

impl StubTransport {
    fn responding(response: LoginResponse) -> (Self, Arc<Mutex<Vec<(String, Vec<(String, String)>)>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                reply: Box::new(move || Ok(response.clone())),
                calls: calls.clone(),
            },
            calls,
        )
    }

    fn failing(reason: &str) -> Self {
        let reason = reason.to_owned();
        Self {
            reply: Box::new(move || Err(ProtocolError::TransportError(reason.clone()))),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl LoginTransport for StubTransport {
    async fn post_form(&self, url: &str, fields: &[(&str, &str)]) -> Result<LoginResponse> {
        self.calls.lock().unwrap().push((
            url.to_owned(),
            fields
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect(),
        ));
        (self.reply)()
    }
}

fn cookie_response(cookie: &str) -> LoginResponse {
    LoginResponse {
        status: 200,
        headers: vec![("SET-COOKIE".into(), cookie.into())],
        body: String::new(),
    }
}

fn plain_response() -> LoginResponse {
    LoginResponse {
        status: 200,
        headers: vec![("Content-Type".into(), "text/html".into())],
        body: "bad credentials".into(),
    }
}

// ============================================================================
// TERMINAL OUTCOMES
// ============================================================================

#[tokio::test]
async fn scenario_a_valid_cookie_authenticates() {
    let (transport, _) = StubTransport::responding(cookie_response("session_id=abc123; Path=/"));
    let session = SessionHandle::new();
    let mut client = LoginClient::new(transport, LoginConfig::default(), session.clone());

    let outcome = client.submit_login("alice", "secret").await.unwrap();
    assert_eq!(
        outcome,
        LoginOutcome::Authenticated {
            account_name: "alice".into(),
            session_id: "abc123".into(),
            next_scene: "Sandbox".into(),
        }
    );
    assert_eq!(client.state(), LoginState::Authenticated);

    let current = session.current().unwrap().unwrap();
    assert_eq!(current.account_name, "alice");
    assert_eq!(current.session_id, "abc123");
}

#[tokio::test]
async fn scenario_b_no_cookie_rejects_without_session() {
    let (transport, _) = StubTransport::responding(plain_response());
    let session = SessionHandle::new();
    let mut client = LoginClient::new(transport, LoginConfig::default(), session.clone());

    let outcome = client.submit_login("alice", "secret").await.unwrap();
    assert_eq!(outcome, LoginOutcome::Rejected);
    assert_eq!(client.state(), LoginState::Rejected);
    assert!(session.current().unwrap().is_none());
}

#[tokio::test]
async fn scenario_c_transport_error_fails_without_session() {
    let session = SessionHandle::new();
    let mut client = LoginClient::new(
        StubTransport::failing("connection refused"),
        LoginConfig::default(),
        session.clone(),
    );

    match client.submit_login("alice", "secret").await.unwrap() {
        LoginOutcome::TransportFailed { reason } => {
            assert!(reason.contains("connection refused"));
        }
        other => panic!("expected TransportFailed, got {other:?}"),
    }
    assert_eq!(client.state(), LoginState::TransportFailed);
    assert!(session.current().unwrap().is_none());
}

#[tokio::test]
async fn cookie_without_session_key_rejects() {
    let (transport, _) = StubTransport::responding(cookie_response("tracking=1; Path=/"));
    let mut client = LoginClient::new(transport, LoginConfig::default(), SessionHandle::new());
    assert_eq!(
        client.submit_login("alice", "secret").await.unwrap(),
        LoginOutcome::Rejected
    );
}

// ============================================================================
// RETRY & EXACTLY-ONCE SEMANTICS
// ============================================================================

#[tokio::test]
async fn failures_are_recoverable_across_attempts() {
    let (transport, calls) = StubTransport::responding(plain_response());
    let mut client = LoginClient::new(transport, LoginConfig::default(), SessionHandle::new());

    assert_eq!(
        client.submit_login("alice", "first").await.unwrap(),
        LoginOutcome::Rejected
    );
    assert_eq!(
        client.submit_login("alice", "second").await.unwrap(),
        LoginOutcome::Rejected
    );
    // One request per submission, none swallowed or duplicated.
    assert_eq!(calls.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn second_login_on_a_live_session_is_refused() {
    let (transport, calls) = StubTransport::responding(cookie_response("session_id=42"));
    let session = SessionHandle::new();
    let mut client = LoginClient::new(transport, LoginConfig::default(), session.clone());

    client.submit_login("alice", "secret").await.unwrap();
    let err = client.submit_login("mallory", "guess").await.unwrap_err();
    assert!(matches!(err, ProtocolError::HandshakeError(_)));

    // No second request went out, session untouched.
    assert_eq!(calls.lock().unwrap().len(), 1);
    assert_eq!(session.current().unwrap().unwrap().account_name, "alice");
}

#[tokio::test]
async fn logout_clears_session_and_allows_relogin() {
    let (transport, _) = StubTransport::responding(cookie_response("session_id=42"));
    let session = SessionHandle::new();
    let mut client = LoginClient::new(transport, LoginConfig::default(), session.clone());

    client.submit_login("alice", "secret").await.unwrap();
    client.logout().unwrap();
    assert_eq!(client.state(), LoginState::Idle);
    assert!(session.current().unwrap().is_none());

    let outcome = client.submit_login("alice", "secret").await.unwrap();
    assert!(matches!(outcome, LoginOutcome::Authenticated { .. }));
}

// ============================================================================
// ENDPOINT RESOLUTION & REQUEST SHAPE
// ============================================================================

#[tokio::test]
async fn empty_address_falls_back_to_default() {
    let (transport, calls) = StubTransport::responding(plain_response());
    let config = LoginConfig {
        address: String::new(),
        default_address: "127.0.0.1:9999".into(),
        ..LoginConfig::default()
    };
    let mut client = LoginClient::new(transport, config, SessionHandle::new());

    client.submit_login("alice", "secret").await.unwrap();
    assert_eq!(calls.lock().unwrap()[0].0, "http://127.0.0.1:9999/login");
}

#[tokio::test]
async fn explicit_address_overrides_default() {
    let (transport, calls) = StubTransport::responding(plain_response());
    let config = LoginConfig {
        address: "play.example.net:8080".into(),
        default_address: "127.0.0.1:9999".into(),
        ..LoginConfig::default()
    };
    let mut client = LoginClient::new(transport, config, SessionHandle::new());

    client.submit_login("alice", "secret").await.unwrap();
    assert_eq!(
        calls.lock().unwrap()[0].0,
        "http://play.example.net:8080/login"
    );
}

#[tokio::test]
async fn encryption_flag_selects_https_scheme() {
    let (transport, calls) = StubTransport::responding(plain_response());
    let config = LoginConfig {
        address: "play.example.net:8443".into(),
        use_encryption: true,
        ..LoginConfig::default()
    };
    let mut client = LoginClient::new(transport, config, SessionHandle::new());

    client.submit_login("alice", "secret").await.unwrap();
    assert_eq!(
        calls.lock().unwrap()[0].0,
        "https://play.example.net:8443/login"
    );
}

#[tokio::test]
async fn no_address_anywhere_is_a_handshake_error() {
    let (transport, calls) = StubTransport::responding(plain_response());
    let config = LoginConfig {
        address: String::new(),
        default_address: String::new(),
        ..LoginConfig::default()
    };
    let mut client = LoginClient::new(transport, config, SessionHandle::new());

    assert!(client.submit_login("alice", "secret").await.is_err());
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn credentials_are_posted_verbatim_under_the_form_field_names() {
    let (transport, calls) = StubTransport::responding(plain_response());
    let mut client = LoginClient::new(transport, LoginConfig::default(), SessionHandle::new());

    client.submit_login("alice", "p@ss word").await.unwrap();
    let fields = calls.lock().unwrap()[0].1.clone();
    assert_eq!(
        fields,
        vec![
            ("login_username".to_owned(), "alice".to_owned()),
            ("login_password".to_owned(), "p@ss word".to_owned()),
        ]
    );
}

// ============================================================================
// SESSION FLOWS INTO OUTGOING HEADERS
// ============================================================================

#[tokio::test]
async fn builder_stamps_the_authenticated_session_id() {
    let (transport, _) = StubTransport::responding(cookie_response("session_id=31337; Path=/"));
    let session = SessionHandle::new();
    let mut client = LoginClient::new(transport, LoginConfig::default(), session.clone());
    let builder = MessageBuilder::new(session);

    assert_eq!(builder.connect().header.session_id, 0);

    client.submit_login("alice", "secret").await.unwrap();
    let message = builder.client_event([1, 2, 3, 4, 5]);
    assert_eq!(message.header.session_id, 31337);

    // And the stamped header survives the wire.
    let decoded = game_protocol::Message::decode(&message.encode().unwrap()).unwrap();
    assert_eq!(decoded.message.header.session_id, 31337);
}
