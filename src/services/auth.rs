//! Registration, email confirmation and login

use std::{fmt, sync::Arc};

use chrono::Duration;
use validator::Validate;

use crate::{
    config::{AuthConfig, LinksConfig},
    error::{AppError, AppResult},
    models::{
        user::{LoginRequest, LoginResponse, NewUser, RegisterRequest, RegisterResponse},
        Role, User,
    },
    repository::CredentialStore,
};

use super::{
    email::{Notifier, OutgoingEmail},
    password::PasswordHasherService,
    tokens::{Expiry, PendingRegistration, SessionClaims, TokenClaims, TokenCodec, TokenError},
};

pub const REGISTRATION_MESSAGE: &str =
    "Registration successful! Please check your email to confirm your account.";
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Why a confirmation link was refused. `reason()` is the value passed to the
/// frontend failure page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationFailure {
    MissingToken,
    InvalidToken,
    TokenExpired,
    TokenTooOld,
    InvalidClaims,
    Exists,
    ServerError,
}

impl ConfirmationFailure {
    pub fn reason(&self) -> &'static str {
        match self {
            ConfirmationFailure::MissingToken => "missing_token",
            ConfirmationFailure::InvalidToken => "invalid_token",
            ConfirmationFailure::TokenExpired => "token_expired",
            ConfirmationFailure::TokenTooOld => "token_too_old",
            ConfirmationFailure::InvalidClaims => "invalid_claims",
            ConfirmationFailure::Exists => "exists",
            ConfirmationFailure::ServerError => "server_error",
        }
    }
}

impl fmt::Display for ConfirmationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

impl From<TokenError> for ConfirmationFailure {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Malformed => ConfirmationFailure::InvalidToken,
            TokenError::Expired(Expiry::PastExpiry) => ConfirmationFailure::TokenExpired,
            TokenError::Expired(Expiry::IssuedTooLongAgo) => ConfirmationFailure::TokenTooOld,
            TokenError::WrongKind | TokenError::Incomplete => ConfirmationFailure::InvalidClaims,
        }
    }
}

#[derive(Clone)]
pub struct AuthService {
    credentials: Arc<dyn CredentialStore>,
    tokens: TokenCodec,
    passwords: PasswordHasherService,
    notifier: Notifier,
    links: LinksConfig,
    confirmation_ttl: Duration,
    session_ttl: Duration,
}

impl AuthService {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        tokens: TokenCodec,
        passwords: PasswordHasherService,
        notifier: Notifier,
        auth_config: &AuthConfig,
        links: LinksConfig,
    ) -> Self {
        Self {
            credentials,
            tokens,
            passwords,
            notifier,
            links,
            confirmation_ttl: Duration::minutes(auth_config.confirmation_ttl_minutes),
            session_ttl: Duration::hours(auth_config.session_ttl_hours),
        }
    }

    pub fn tokens(&self) -> &TokenCodec {
        &self.tokens
    }

    /// Start a registration: nothing is stored until the emailed link is followed.
    ///
    /// The requested role is ignored, and the response does not depend on
    /// whether the email goes out.
    pub async fn register(&self, request: RegisterRequest) -> AppResult<RegisterResponse> {
        request.validate()?;

        if request.role.as_deref().is_some_and(|r| !r.eq_ignore_ascii_case("viewer")) {
            tracing::warn!(username = %request.username, requested = ?request.role, "Requested role ignored at registration");
        }

        let pending = PendingRegistration {
            username: request.username.clone(),
            email: request.email.clone(),
            password_hash: self.passwords.hash(&request.password)?,
            role: Role::Viewer,
            phone: Some(request.phone.clone()),
        };

        let token = self
            .tokens
            .issue(TokenClaims::Confirmation(pending), self.confirmation_ttl)?;
        let link = format!(
            "{}/api/confirm?token={}",
            self.links.backend_url.trim_end_matches('/'),
            urlencoding::encode(&token)
        );

        self.notifier.dispatch(OutgoingEmail::confirmation(
            &request.email,
            &request.username,
            &link,
        ));
        tracing::info!(username = %request.username, email = %request.email, "Registration queued");

        Ok(RegisterResponse {
            message: REGISTRATION_MESSAGE.to_string(),
        })
    }

    /// Turn a confirmation token into a stored user.
    ///
    /// The existence check and the insert are separate statements; two racing
    /// confirmations both pass the check, and the unique constraints make the
    /// second insert fail with `Exists`.
    pub async fn confirm(&self, token: Option<&str>) -> Result<User, ConfirmationFailure> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or(ConfirmationFailure::MissingToken)?;

        let pending = self.tokens.validate_confirmation(token)?;

        let exists = self
            .credentials
            .identity_exists(&pending.username, &pending.email)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Confirmation lookup failed");
                ConfirmationFailure::ServerError
            })?;
        if exists {
            return Err(ConfirmationFailure::Exists);
        }

        let user = self
            .credentials
            .insert(&NewUser {
                username: pending.username,
                email: pending.email,
                password_hash: pending.password_hash,
                role: pending.role,
                phone: pending.phone,
            })
            .await
            .map_err(|e| match e {
                AppError::Conflict(_) => ConfirmationFailure::Exists,
                e => {
                    tracing::error!(error = %e, "Confirmation insert failed");
                    ConfirmationFailure::ServerError
                }
            })?;

        tracing::info!(user_id = user.id, username = %user.username, "Registration confirmed");
        Ok(user)
    }

    /// Frontend page the browser lands on after following a confirmation link
    pub fn confirmation_redirect(&self, outcome: &Result<User, ConfirmationFailure>) -> String {
        let base = self.links.frontend_url.trim_end_matches('/');
        match outcome {
            Ok(_) => format!("{}/register/complete", base),
            Err(failure) => format!("{}/register/failpage?reason={}", base, failure.reason()),
        }
    }

    /// Check credentials and issue a session token
    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginResponse> {
        let user = match self.credentials.find_by_email(&request.email).await? {
            Some(user) => user,
            None => {
                self.passwords.verify_absent(&request.password);
                tracing::info!(email = %request.email, "Login failed: unknown email");
                return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
            }
        };

        if !self.passwords.verify(&request.password, &user.password_hash)? {
            tracing::info!(user_id = user.id, "Login failed: wrong password");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let token = self.tokens.issue(
            TokenClaims::Session(SessionClaims {
                user_id: user.id,
                role: user.role,
            }),
            self.session_ttl,
        )?;

        tracing::info!(user_id = user.id, role = %user.role, "Login succeeded");
        Ok(LoginResponse { token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        repository::memory::MemoryStore,
        services::email::{EmailBody, MockMailer},
    };
    use chrono::Utc;
    use std::time::Duration as StdDuration;
    use tokio::sync::mpsc;

    use crate::services::tokens::SignedClaims;

    const SECRET: &str = "test-secret";

    fn auth_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: SECRET.into(),
            argon2_memory_kib: 8 * 1024,
            argon2_iterations: 1,
            argon2_parallelism: 1,
            ..AuthConfig::default()
        }
    }

    fn links() -> LinksConfig {
        LinksConfig {
            backend_url: "http://api.test".into(),
            frontend_url: "http://app.test/".into(),
        }
    }

    fn service_with(mailer: MockMailer, store: Arc<MemoryStore>) -> AuthService {
        let config = auth_config();
        AuthService::new(
            store,
            TokenCodec::new(SECRET),
            PasswordHasherService::new(&config).unwrap(),
            Notifier::new(Arc::new(mailer), 4),
            &config,
            links(),
        )
    }

    /// Mailer that forwards every email to the returned receiver
    fn capturing_mailer() -> (MockMailer, mpsc::UnboundedReceiver<OutgoingEmail>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut mailer = MockMailer::new();
        mailer.expect_send().returning(move |email| {
            let _ = tx.send(email);
            Ok(())
        });
        (mailer, rx)
    }

    fn failing_mailer() -> MockMailer {
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .returning(|_| Err(AppError::Internal("smtp unreachable".into())));
        mailer
    }

    fn register_request(role: Option<&str>) -> RegisterRequest {
        RegisterRequest {
            username: "alice".into(),
            password: "pw1".into(),
            email: "a@x.com".into(),
            phone: "555".into(),
            role: role.map(String::from),
        }
    }

    /// Pull the token out of a captured confirmation email
    async fn confirmation_token(rx: &mut mpsc::UnboundedReceiver<OutgoingEmail>) -> String {
        let email = tokio::time::timeout(StdDuration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        let html = match email.body {
            EmailBody::Html(html) => html,
            EmailBody::Text(_) => panic!("confirmation should be html"),
        };
        let start = html.find("token=").unwrap() + "token=".len();
        let end = start + html[start..].find('"').unwrap();
        urlencoding::decode(&html[start..end]).unwrap().into_owned()
    }

    #[tokio::test]
    async fn register_rejects_empty_fields() {
        let (mailer, _rx) = capturing_mailer();
        let service = service_with(mailer, Arc::new(MemoryStore::new()));

        for field in ["username", "password", "email", "phone"] {
            let mut request = register_request(None);
            match field {
                "username" => request.username.clear(),
                "password" => request.password.clear(),
                "email" => request.email.clear(),
                _ => request.phone.clear(),
            }
            let err = service.register(request).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "{} accepted", field);
        }
    }

    #[tokio::test]
    async fn register_response_ignores_delivery_outcome() {
        let (ok_mailer, mut rx) = capturing_mailer();
        let delivered = service_with(ok_mailer, Arc::new(MemoryStore::new()))
            .register(register_request(None))
            .await
            .unwrap();
        let failed = service_with(failing_mailer(), Arc::new(MemoryStore::new()))
            .register(register_request(None))
            .await
            .unwrap();

        assert_eq!(delivered.message, REGISTRATION_MESSAGE);
        assert_eq!(delivered.message, failed.message);
        assert!(!confirmation_token(&mut rx).await.is_empty());
    }

    #[tokio::test]
    async fn register_stores_nothing_before_confirmation() {
        let (mailer, _rx) = capturing_mailer();
        let store = Arc::new(MemoryStore::new());
        service_with(mailer, store.clone())
            .register(register_request(None))
            .await
            .unwrap();
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn confirmation_link_points_at_backend() {
        let (mailer, mut rx) = capturing_mailer();
        service_with(mailer, Arc::new(MemoryStore::new()))
            .register(register_request(None))
            .await
            .unwrap();
        let email = rx.recv().await.unwrap();
        assert_eq!(email.to, "a@x.com");
        assert!(matches!(email.body, EmailBody::Html(ref h) if h.contains("http://api.test/api/confirm?token=")));
    }

    #[tokio::test]
    async fn alice_registers_confirms_and_logs_in_as_viewer() {
        let (mailer, mut rx) = capturing_mailer();
        let store = Arc::new(MemoryStore::new());
        let service = service_with(mailer, store.clone());

        service.register(register_request(Some("admin"))).await.unwrap();
        let token = confirmation_token(&mut rx).await;

        let outcome = service.confirm(Some(&token)).await;
        assert_eq!(
            service.confirmation_redirect(&outcome),
            "http://app.test/register/complete"
        );
        let user = outcome.unwrap();
        assert_eq!(user.role, Role::Viewer);
        assert_eq!(user.phone.as_deref(), Some("555"));
        assert_ne!(user.password_hash, "pw1");

        let login = service
            .login(LoginRequest {
                email: "a@x.com".into(),
                password: "pw1".into(),
            })
            .await
            .unwrap();
        let claims = service.tokens().validate_session(&login.token).unwrap();
        assert_eq!(claims.user_id, user.id);
        assert_eq!(claims.role, Role::Viewer);
    }

    #[tokio::test]
    async fn confirm_without_token() {
        let (mailer, _rx) = capturing_mailer();
        let service = service_with(mailer, Arc::new(MemoryStore::new()));
        let outcome = service.confirm(None).await;
        assert_eq!(outcome.as_ref().unwrap_err(), &ConfirmationFailure::MissingToken);
        assert_eq!(
            service.confirmation_redirect(&outcome),
            "http://app.test/register/failpage?reason=missing_token"
        );
        assert_eq!(
            service.confirm(Some("")).await.unwrap_err(),
            ConfirmationFailure::MissingToken
        );
    }

    #[tokio::test]
    async fn confirm_rejects_garbage() {
        let (mailer, _rx) = capturing_mailer();
        let service = service_with(mailer, Arc::new(MemoryStore::new()));
        assert_eq!(
            service.confirm(Some("abc.def.ghi")).await.unwrap_err(),
            ConfirmationFailure::InvalidToken
        );
    }

    #[tokio::test]
    async fn confirm_rejects_expired_tokens() {
        let (mailer, _rx) = capturing_mailer();
        let store = Arc::new(MemoryStore::new());
        let service = service_with(mailer, store.clone());
        let codec = TokenCodec::new(SECRET);
        let now = Utc::now().timestamp();
        let pending = PendingRegistration {
            username: "bob".into(),
            email: "b@x.com".into(),
            password_hash: "hash".into(),
            role: Role::Viewer,
            phone: None,
        };

        let expired = codec
            .sign(SignedClaims {
                iat: now - 7200,
                exp: Some(now - 3600),
                claims: TokenClaims::Confirmation(pending.clone()),
            })
            .unwrap();
        assert_eq!(
            service.confirm(Some(&expired)).await.unwrap_err(),
            ConfirmationFailure::TokenExpired
        );

        let too_old = codec
            .sign(SignedClaims {
                iat: now - 7200,
                exp: None,
                claims: TokenClaims::Confirmation(pending),
            })
            .unwrap();
        assert_eq!(
            service.confirm(Some(&too_old)).await.unwrap_err(),
            ConfirmationFailure::TokenTooOld
        );
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn session_token_cannot_confirm() {
        let (mailer, _rx) = capturing_mailer();
        let service = service_with(mailer, Arc::new(MemoryStore::new()));
        let session = TokenCodec::new(SECRET)
            .issue(
                TokenClaims::Session(SessionClaims {
                    user_id: 1,
                    role: Role::Admin,
                }),
                Duration::hours(1),
            )
            .unwrap();
        assert_eq!(
            service.confirm(Some(&session)).await.unwrap_err(),
            ConfirmationFailure::InvalidClaims
        );
    }

    #[tokio::test]
    async fn second_confirmation_reports_exists() {
        let (mailer, mut rx) = capturing_mailer();
        let service = service_with(mailer, Arc::new(MemoryStore::new()));
        service.register(register_request(None)).await.unwrap();
        let token = confirmation_token(&mut rx).await;

        assert!(service.confirm(Some(&token)).await.is_ok());
        let outcome = service.confirm(Some(&token)).await;
        assert_eq!(outcome.as_ref().unwrap_err(), &ConfirmationFailure::Exists);
        assert_eq!(
            service.confirmation_redirect(&outcome),
            "http://app.test/register/failpage?reason=exists"
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn racing_confirmations_insert_once() {
        let (mailer, mut rx) = capturing_mailer();
        let store = Arc::new(MemoryStore::new());
        let service = service_with(mailer, store.clone());
        service.register(register_request(None)).await.unwrap();
        let token = confirmation_token(&mut rx).await;

        let attempts: Vec<_> = (0..8)
            .map(|_| {
                let service = service.clone();
                let token = token.clone();
                tokio::spawn(async move { service.confirm(Some(&token)).await })
            })
            .collect();

        let mut confirmed = 0;
        for attempt in attempts {
            match attempt.await.unwrap() {
                Ok(_) => confirmed += 1,
                Err(failure) => assert_eq!(failure, ConfirmationFailure::Exists),
            }
        }
        assert_eq!(confirmed, 1);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn login_failures_share_one_message() {
        let (mailer, mut rx) = capturing_mailer();
        let service = service_with(mailer, Arc::new(MemoryStore::new()));
        service.register(register_request(None)).await.unwrap();
        let token = confirmation_token(&mut rx).await;
        service.confirm(Some(&token)).await.unwrap();

        let wrong_password = service
            .login(LoginRequest {
                email: "a@x.com".into(),
                password: "nope".into(),
            })
            .await
            .unwrap_err();
        let unknown_email = service
            .login(LoginRequest {
                email: "nobody@x.com".into(),
                password: "pw1".into(),
            })
            .await
            .unwrap_err();

        match (wrong_password, unknown_email) {
            (AppError::Unauthorized(a), AppError::Unauthorized(b)) => {
                assert_eq!(a, INVALID_CREDENTIALS);
                assert_eq!(a, b);
            }
            other => panic!("unexpected errors: {:?}", other),
        }
    }

    #[tokio::test]
    async fn unknown_email_pays_for_a_verification() {
        let (mailer, _rx) = capturing_mailer();
        let service = service_with(mailer, Arc::new(MemoryStore::new()));
        let before = service.passwords.verifications();

        let err = service
            .login(LoginRequest {
                email: "nobody@x.com".into(),
                password: "pw1".into(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Unauthorized(_)));
        assert_eq!(service.passwords.verifications(), before + 1);
    }
}
