use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Once;
use std::thread;

use chirpy_auth::bearer;
use chirpy_auth::AuthConfig;
use chirpy_auth::AuthenticationError;
use chirpy_auth::Authenticator;
use chirpy_auth::Identity;
use chirpy_auth::SigningSecret;
use chirpy_auth::TokenError;
use http::header::AUTHORIZATION;
use http::HeaderMap;
use http::HeaderValue;
use uuid::Uuid;

static TRACING: Once = Once::new();

fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "chirpy_auth=debug".into()),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Minimal stand-in for the service's user table.
struct StoredUser {
    id: Identity,
    hashed_password: String,
}

struct TestApp {
    authenticator: Authenticator,
    secret: SigningSecret,
    users: HashMap<String, StoredUser>,
    refresh_tokens: HashMap<String, Identity>,
}

impl TestApp {
    fn new() -> Self {
        init_tracing();

        Self {
            authenticator: Authenticator::new(AuthConfig::default()).expect("Invalid auth config"),
            secret: SigningSecret::new("integration-secret-0123456789abcdef").unwrap(),
            users: HashMap::new(),
            refresh_tokens: HashMap::new(),
        }
    }

    fn sign_up(&mut self, email: &str, password: &str) -> Identity {
        let id = Identity::new(Uuid::new_v4());
        let hashed_password = self
            .authenticator
            .hash_password(password)
            .expect("Failed to hash password");

        self.users
            .insert(email.to_string(), StoredUser { id, hashed_password });
        id
    }

    fn login(&mut self, email: &str, password: &str) -> Result<(String, String), AuthenticationError> {
        let user = self
            .users
            .get(email)
            .ok_or(AuthenticationError::InvalidCredentials)?;

        let tokens = self.authenticator.login(
            password,
            &user.hashed_password,
            &user.id,
            &self.secret,
            None,
        )?;

        self.refresh_tokens
            .insert(tokens.refresh_token.clone(), user.id);
        Ok((tokens.access_token, tokens.refresh_token))
    }

    fn authenticate(&self, headers: &HeaderMap) -> Result<Identity, AuthenticationError> {
        let token = bearer::from_headers(headers)?;
        Ok(self.authenticator.validate_token(token, &self.secret)?)
    }
}

fn bearer_headers(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );
    headers
}

#[test]
fn test_signup_login_and_authenticated_request() {
    let mut app = TestApp::new();
    let user_id = app.sign_up("walt@example.com", "pass_word!");

    let (access_token, refresh_token) = app
        .login("walt@example.com", "pass_word!")
        .expect("Login failed");

    assert_eq!(refresh_token.len(), 64);
    assert_eq!(app.authenticate(&bearer_headers(&access_token)).unwrap(), user_id);
}

#[test]
fn test_login_wrong_password() {
    let mut app = TestApp::new();
    app.sign_up("walt@example.com", "pass_word!");

    let result = app.login("walt@example.com", "wrong");
    assert!(matches!(result, Err(AuthenticationError::InvalidCredentials)));
    assert!(app.refresh_tokens.is_empty());
}

#[test]
fn test_refresh_issues_new_session_for_same_user() {
    let mut app = TestApp::new();
    let user_id = app.sign_up("walt@example.com", "pass_word!");
    let (_, refresh_token) = app.login("walt@example.com", "pass_word!").unwrap();

    let subject = *app
        .refresh_tokens
        .get(&refresh_token)
        .expect("refresh token not recorded");
    let renewed = app
        .authenticator
        .refresh_session(&subject, &app.secret)
        .expect("Failed to refresh session");

    assert_eq!(app.authenticate(&bearer_headers(&renewed)).unwrap(), user_id);
}

#[test]
fn test_request_without_authorization_header() {
    let app = TestApp::new();

    let result = app.authenticate(&HeaderMap::new());
    assert!(matches!(
        result,
        Err(AuthenticationError::Bearer(bearer::BearerError::Missing))
    ));
    assert!(!result.unwrap_err().is_environment_fault());
}

#[test]
fn test_token_from_other_deployment_is_rejected() {
    let mut app = TestApp::new();
    app.sign_up("walt@example.com", "pass_word!");
    let (access_token, _) = app.login("walt@example.com", "pass_word!").unwrap();

    let other = Authenticator::default();
    let other_secret = SigningSecret::new("some-other-deployment-secret").unwrap();

    let result = other.authenticate_request(Some(&format!("Bearer {}", access_token)), &other_secret);
    assert!(matches!(
        result,
        Err(AuthenticationError::Token(TokenError::Signature(_)))
    ));
}

#[test]
fn test_concurrent_validation_shares_one_authenticator() {
    let mut app = TestApp::new();
    let user_id = app.sign_up("walt@example.com", "pass_word!");
    let (access_token, _) = app.login("walt@example.com", "pass_word!").unwrap();

    let authenticator = Arc::new(app.authenticator.clone());
    let secret = Arc::new(app.secret.clone());
    let header = Arc::new(format!("Bearer {}", access_token));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let authenticator = Arc::clone(&authenticator);
            let secret = Arc::clone(&secret);
            let header = Arc::clone(&header);
            thread::spawn(move || {
                (0..50)
                    .map(|_| {
                        authenticator
                            .authenticate_request(Some(header.as_str()), &secret)
                            .unwrap()
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        let subjects = handle.join().expect("validation thread panicked");
        assert!(subjects.iter().all(|subject| *subject == user_id));
    }
}
