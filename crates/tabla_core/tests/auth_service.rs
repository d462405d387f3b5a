use std::cell::RefCell;
use tabla_core::db::open_db_in_memory;
use tabla_core::{
    AuthBackend, AuthError, AuthMode, AuthService, BackendError, BackendResult, Credentials,
    Session, SessionRepository, SqliteSessionRepository,
};

#[derive(Default)]
struct FakeAuth {
    calls: RefCell<Vec<String>>,
    failure: RefCell<Option<BackendError>>,
}

impl FakeAuth {
    fn grant(&self, endpoint: &str, credentials: &Credentials) -> BackendResult<Session> {
        self.calls
            .borrow_mut()
            .push(format!("{endpoint}:{}", credentials.username));
        match self.failure.borrow_mut().take() {
            Some(err) => Err(err),
            None => Ok(Session::new(
                credentials.username.clone(),
                format!("token-{}", credentials.username),
            )),
        }
    }
}

impl AuthBackend for FakeAuth {
    fn login(&self, credentials: &Credentials) -> BackendResult<Session> {
        self.grant("login", credentials)
    }

    fn register(&self, credentials: &Credentials) -> BackendResult<Session> {
        self.grant("register", credentials)
    }
}

#[test]
fn login_persists_the_granted_session() {
    let conn = open_db_in_memory().unwrap();
    let backend = FakeAuth::default();
    let auth = AuthService::new(&backend, SqliteSessionRepository::new(&conn));

    let session = auth.login("ravi", "secret").unwrap();
    assert_eq!(session, Session::new("ravi", "token-ravi"));
    assert_eq!(auth.restore().unwrap(), Some(session));
    assert_eq!(backend.calls.borrow().as_slice(), ["login:ravi"]);
}

#[test]
fn register_uses_the_register_endpoint() {
    let conn = open_db_in_memory().unwrap();
    let backend = FakeAuth::default();
    let auth = AuthService::new(&backend, SqliteSessionRepository::new(&conn));

    auth.authenticate(AuthMode::Register, Credentials::new("meera", "pw"))
        .unwrap();
    assert_eq!(backend.calls.borrow().as_slice(), ["register:meera"]);
}

#[test]
fn blank_credentials_never_reach_the_backend() {
    let conn = open_db_in_memory().unwrap();
    let backend = FakeAuth::default();
    let auth = AuthService::new(&backend, SqliteSessionRepository::new(&conn));

    let err = auth.login("  ", "secret").unwrap_err();
    assert!(matches!(err, AuthError::MissingCredentials));
    assert_eq!(err.user_message(), "Username and password required");
    auth.register("ravi", "").unwrap_err();

    assert!(backend.calls.borrow().is_empty());
    assert_eq!(auth.restore().unwrap(), None);
}

#[test]
fn rejected_login_surfaces_service_message_and_keeps_old_session() {
    let conn = open_db_in_memory().unwrap();
    let backend = FakeAuth::default();
    let auth = AuthService::new(&backend, SqliteSessionRepository::new(&conn));
    auth.login("ravi", "secret").unwrap();

    *backend.failure.borrow_mut() = Some(BackendError::Rejected {
        status: 401,
        message: Some("Invalid credentials".to_string()),
    });
    let err = auth.login("meera", "wrong").unwrap_err();

    assert_eq!(err.user_message(), "Invalid credentials");
    assert_eq!(
        auth.restore().unwrap(),
        Some(Session::new("ravi", "token-ravi"))
    );
}

#[test]
fn timeouts_and_unlabelled_failures_have_fixed_messages() {
    assert_eq!(
        AuthError::Backend(BackendError::Timeout).user_message(),
        "Request timed out. Please try again later."
    );
    assert_eq!(
        AuthError::Backend(BackendError::Rejected {
            status: 500,
            message: None
        })
        .user_message(),
        "Authentication failed"
    );
}

#[test]
fn logout_forgets_the_session() {
    let conn = open_db_in_memory().unwrap();
    let backend = FakeAuth::default();
    let auth = AuthService::new(&backend, SqliteSessionRepository::new(&conn));
    auth.login("ravi", "secret").unwrap();

    auth.logout().unwrap();
    assert_eq!(auth.restore().unwrap(), None);
    assert_eq!(SqliteSessionRepository::new(&conn).load().unwrap(), None);
}
