//! Treasurer authentication.
//!
//! `POST /api/admin/login` exchanges the configured credential pair for an
//! HS256 token valid for 24 hours. Every other `/api/admin/*` route sits
//! behind [`require_admin`], which expects `Authorization: Bearer <token>`.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use treasury_platform::{AdminCredentials, AdminLoginResponse, AdminProfile};

use crate::error::{ApiError, ApiResult};

pub const TOKEN_TTL_HOURS: i64 = 24;

pub const CREDENTIALS_REQUIRED: &str = "Email and password are required";
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";
pub const NO_TOKEN: &str = "No token provided";
pub const INVALID_TOKEN: &str = "Invalid token";
pub const LOGIN_FAILED: &str = "Login failed";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminClaims {
    pub id: String,
    pub email: String,
    pub name: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies treasurer tokens. Cheap to clone.
#[derive(Clone)]
pub struct AdminAuth {
    admin: Arc<AdminCredentials>,
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl AdminAuth {
    pub fn new(secret: &str, admin: AdminCredentials) -> Self {
        Self {
            admin: Arc::new(admin),
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn profile(&self) -> AdminProfile {
        AdminProfile::from(self.admin.as_ref())
    }

    pub fn login(&self, email: Option<&str>, password: Option<&str>) -> ApiResult<AdminLoginResponse> {
        let (Some(email), Some(password)) = (
            email.filter(|value| !value.trim().is_empty()),
            password.filter(|value| !value.is_empty()),
        ) else {
            return Err(ApiError::Validation(CREDENTIALS_REQUIRED.to_string()));
        };

        if !self.admin.matches(email, password) {
            warn!(email = %email, "rejected treasurer login");
            return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let token = self.issue_at(Utc::now())?;
        info!(admin_id = %self.admin.id, "treasurer logged in");

        Ok(AdminLoginResponse {
            token,
            admin: self.profile(),
        })
    }

    pub fn issue_at(&self, issued_at: DateTime<Utc>) -> ApiResult<String> {
        let claims = AdminClaims {
            id: self.admin.id.clone(),
            email: self.admin.email.clone(),
            name: self.admin.name.clone(),
            iat: issued_at.timestamp(),
            exp: (issued_at + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(|err| {
            error!(error = %err, "failed to sign treasurer token");
            ApiError::Internal(LOGIN_FAILED.to_string())
        })
    }

    pub fn verify(&self, token: &str) -> ApiResult<AdminClaims> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<AdminClaims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|_| ApiError::Unauthorized(INVALID_TOKEN.to_string()))
    }
}

/// The token part of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Rejects requests without a valid treasurer token and stores the verified
/// [`AdminClaims`] in the request extensions.
pub async fn require_admin(
    State(auth): State<AdminAuth>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers())
        .ok_or_else(|| ApiError::Unauthorized(NO_TOKEN.to_string()))?;
    let claims = auth.verify(token)?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;
    use treasury_platform::config::{DEFAULT_ADMIN_ID, DEFAULT_ADMIN_NAME};

    use super::*;

    const SECRET: &str = "unit-test-secret-unit-test-secret";

    fn auth() -> AdminAuth {
        AdminAuth::new(
            SECRET,
            AdminCredentials {
                id: DEFAULT_ADMIN_ID.to_string(),
                email: "treasurer@example.org".to_string(),
                password: "hunter2".to_string(),
                name: DEFAULT_ADMIN_NAME.to_string(),
            },
        )
    }

    #[test]
    fn login_issues_a_day_long_token() {
        let auth = auth();

        let response = auth
            .login(Some("treasurer@example.org"), Some("hunter2"))
            .unwrap();
        let claims = auth.verify(&response.token).unwrap();

        assert_eq!(response.admin.id, "admin-1");
        assert_eq!(response.admin.name, "Apartment Treasurer");
        assert_eq!(claims.email, "treasurer@example.org");
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn login_requires_both_fields() {
        let auth = auth();
        for (email, password) in [
            (None, Some("hunter2")),
            (Some("treasurer@example.org"), None),
            (Some("  "), Some("hunter2")),
        ] {
            let err = auth.login(email, password).unwrap_err();
            assert!(matches!(err, ApiError::Validation(_)));
            assert_eq!(err.to_string(), CREDENTIALS_REQUIRED);
        }
    }

    #[test]
    fn login_rejects_wrong_password() {
        let err = auth()
            .login(Some("treasurer@example.org"), Some("hunter3"))
            .unwrap_err();

        assert!(matches!(err, ApiError::Unauthorized(_)));
        assert_eq!(err.to_string(), INVALID_CREDENTIALS);
    }

    #[test]
    fn expired_tokens_are_invalid() {
        let auth = auth();
        let token = auth.issue_at(Utc::now() - Duration::hours(25)).unwrap();

        let err = auth.verify(&token).unwrap_err();
        assert_eq!(err.to_string(), INVALID_TOKEN);
    }

    #[test]
    fn tokens_from_another_secret_are_invalid() {
        let other = AdminAuth::new(
            "some-other-secret-some-other-secret",
            AdminCredentials {
                id: "admin-1".to_string(),
                email: "treasurer@example.org".to_string(),
                password: "hunter2".to_string(),
                name: "Someone".to_string(),
            },
        );
        let token = other.issue_at(Utc::now()).unwrap();

        assert!(auth().verify(&token).is_err());
        assert!(auth().verify("not-a-jwt").is_err());
    }

    #[test]
    fn signing_failures_do_not_leak_details() {
        let broken = AdminAuth {
            encoding: EncodingKey::from_ec_der(&[]),
            ..auth()
        };

        let err = broken
            .login(Some("treasurer@example.org"), Some("hunter2"))
            .unwrap_err();

        assert!(matches!(err, ApiError::Internal(_)));
        assert_eq!(err.to_string(), LOGIN_FAILED);
    }

    #[test]
    fn bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        assert_eq!(bearer_token(&headers), None);
    }
}
