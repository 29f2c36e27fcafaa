use super::transport::{ApiRequest, Transport};
use crate::error::{MondoError, Result};
use chrono::{DateTime, Duration, Utc};
use oauth2::{
    AccessToken, ClientId, ClientSecret, RefreshToken, ResourceOwnerPassword,
    ResourceOwnerUsername,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

const TOKEN_PATH: &str = "/oauth2/token";

/// OAuth2 client and resource-owner credentials, fixed for the life of a session.
#[derive(Debug, Clone)]
pub struct Credentials {
    client_id: ClientId,
    client_secret: ClientSecret,
    username: ResourceOwnerUsername,
    password: ResourceOwnerPassword,
}

impl Credentials {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            client_id: ClientId::new(client_id.into()),
            client_secret: ClientSecret::new(client_secret.into()),
            username: ResourceOwnerUsername::new(username.into()),
            password: ResourceOwnerPassword::new(password.into()),
        }
    }

    pub fn client_id(&self) -> &str {
        self.client_id.as_str()
    }

    pub fn username(&self) -> &str {
        self.username.as_str()
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    access_token: AccessToken,
    refresh_token: RefreshToken,
    expires_at: DateTime<Utc>,
}

impl Token {
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            access_token: AccessToken::new(access_token.into()),
            refresh_token: RefreshToken::new(refresh_token.into()),
            expires_at,
        }
    }

    pub fn access_token(&self) -> &AccessToken {
        &self.access_token
    }

    pub fn refresh_token(&self) -> &RefreshToken {
        &self.refresh_token
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: AccessToken,
    #[serde(default)]
    refresh_token: Option<RefreshToken>,
    expires_in: i64,
}

/// Acquires and refreshes tokens against `/oauth2/token`.
///
/// The manager holds no token itself: callers pass the current one in and
/// store whatever comes back.
pub struct TokenManager<T> {
    transport: Arc<T>,
}

impl<T: Transport> TokenManager<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    /// Password grant.
    #[instrument(name = "Authenticating to Mondo", skip_all, fields(username = credentials.username()))]
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<Token> {
        let request = ApiRequest::post(TOKEN_PATH)
            .form("grant_type", "password")
            .form("client_id", credentials.client_id.as_str())
            .form("client_secret", credentials.client_secret.secret())
            .form("username", credentials.username.as_str())
            .form("password", credentials.password.secret());

        self.request_token(request, None).await
    }

    /// Refresh-token grant. The API may omit a new refresh token, in which
    /// case the previous one is carried over.
    #[instrument(name = "Refreshing Mondo token", skip_all)]
    pub async fn refresh(&self, token: &Token, credentials: &Credentials) -> Result<Token> {
        let request = ApiRequest::post(TOKEN_PATH)
            .form("grant_type", "refresh_token")
            .form("client_id", credentials.client_id.as_str())
            .form("client_secret", credentials.client_secret.secret())
            .form("refresh_token", token.refresh_token.secret());

        self.request_token(request, Some(&token.refresh_token)).await
    }

    /// Return `token` if it has not expired, otherwise a refreshed one.
    pub async fn ensure_valid(&self, token: &Token, credentials: &Credentials) -> Result<Token> {
        if token.is_valid() {
            debug!("Using cached access token");
            return Ok(token.clone());
        }

        debug!(expired_at = %token.expires_at, "Access token expired, refreshing...");

        match self.refresh(token, credentials).await {
            Ok(refreshed) => {
                debug!("Token refresh successful");
                Ok(refreshed)
            }
            Err(e) => {
                warn!("Token refresh failed: {}", e);
                Err(e)
            }
        }
    }

    async fn request_token(
        &self,
        request: ApiRequest,
        fallback_refresh_token: Option<&RefreshToken>,
    ) -> Result<Token> {
        let acquired_at = Utc::now();
        let response = self.transport.send(request).await?;

        if !response.is_ok() {
            return Err(MondoError::Auth {
                status_code: response.status,
            });
        }

        let token_response: TokenResponse = response.json()?;

        let refresh_token = match token_response.refresh_token {
            Some(token) => token,
            None => match fallback_refresh_token {
                Some(fallback) => fallback.clone(),
                None => return Err(MondoError::MissingField("refresh_token")),
            },
        };

        let expires_in = token_response.expires_in;
        let expires_at = Some(expires_in)
            .filter(|seconds| *seconds > 0)
            .and_then(Duration::try_seconds)
            .and_then(|lifetime| acquired_at.checked_add_signed(lifetime))
            .ok_or(MondoError::InvalidExpiry(expires_in))?;

        Ok(Token {
            access_token: token_response.access_token,
            refresh_token,
            expires_at,
        })
    }
}

#[cfg(test)]
pub(crate) mod test_helpers {
    use super::*;

    pub(crate) fn mock_credentials() -> Credentials {
        Credentials::new("oauthclient_123", "s3cr3t", "johnny@example.com", "passw0rd")
    }

    pub(crate) fn valid_token(access_token: &str) -> Token {
        Token::new(access_token, "refresh_valid", Utc::now() + Duration::hours(6))
    }

    pub(crate) fn expired_token(access_token: &str) -> Token {
        Token::new(access_token, "refresh_expired", Utc::now() - Duration::seconds(1))
    }
}
