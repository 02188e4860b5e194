use chrono::Utc;
use rand::distr::Alphanumeric;
use rand::Rng;
use reqwest::StatusCode;
use shared::{IdTokenClaims, TokenResponse};
use thiserror::Error;

use crate::AppConfig;

pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const GOOGLE_TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

/// Issuer values Google puts in `iss`, with and without scheme.
const VALID_ISSUERS: [&str; 2] = ["https://accounts.google.com", "accounts.google.com"];

const STATE_LEN: usize = 16;
const NONCE_BYTES: usize = 16;

#[derive(Debug, Error)]
pub enum GoogleAuthError {
    #[error("token endpoint request failed: {0}")]
    TokenRequest(String),
    #[error("token endpoint returned status {0}")]
    TokenStatus(StatusCode),
    #[error("tokeninfo request failed: {0}")]
    TokenInfoRequest(String),
    #[error("tokeninfo returned status {0}")]
    TokenInfoStatus(StatusCode),
    #[error("failed to decode response body: {0}")]
    Decode(String),
    #[error("invalid iss: {0}")]
    InvalidIssuer(String),
    #[error("invalid aud: {0}")]
    AudienceMismatch(String),
    #[error("malformed exp claim: {0}")]
    MalformedExpiry(String),
    #[error("id token expired")]
    Expired,
}

/// Client side of Google's OAuth2 authorization-code flow for one registered
/// web app: fixed client id/secret, fixed callback URL.
#[derive(Debug, Clone)]
pub struct GoogleAuth {
    client_id: String,
    client_secret: String,
    callback_url: String,
    auth_url: String,
    token_url: String,
    tokeninfo_url: String,
    http: reqwest::Client,
}

impl GoogleAuth {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        callback_url: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            callback_url: callback_url.into(),
            auth_url: GOOGLE_AUTH_URL.to_string(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
            tokeninfo_url: GOOGLE_TOKENINFO_URL.to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Point the flow at non-Google endpoints. The stub-backed tests use this,
    /// and `from_config` routes the `GOOGLE_*_URL` overrides through it.
    pub fn with_endpoints(
        mut self,
        auth_url: impl Into<String>,
        token_url: impl Into<String>,
        tokeninfo_url: impl Into<String>,
    ) -> Self {
        self.auth_url = auth_url.into();
        self.token_url = token_url.into();
        self.tokeninfo_url = tokeninfo_url.into();
        self
    }

    /// Build from the app configuration. Returns `None` until both Google
    /// credentials are present; the server still boots and answers its
    /// non-auth routes in that case.
    pub fn from_config(config: &AppConfig) -> Option<Self> {
        let client_id = config.google_client_id.clone()?;
        let client_secret = config.google_client_secret.clone()?;
        let auth = Self::new(client_id, client_secret, config.callback_url.clone())
            .with_endpoints(
                config.auth_url.clone(),
                config.token_url.clone(),
                config.tokeninfo_url.clone(),
            );
        Some(auth)
    }

    /// Authorization URL for the browser, with a fresh `state` and `nonce`
    /// per call. Parameters are emitted in alphabetical order.
    pub fn authorize_url(&self) -> String {
        let state = random_state(STATE_LEN);
        let nonce = random_nonce(NONCE_BYTES);
        format!(
            "{}?client_id={}&nonce={}&redirect_uri={}&response_type=code&scope=openid&state={}",
            self.auth_url,
            self.client_id,
            nonce,
            urlencoding::encode(&self.callback_url),
            state,
        )
    }

    /// Exchange an authorization code for Google's token set.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse, GoogleAuthError> {
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", self.callback_url.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| GoogleAuthError::TokenRequest(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(GoogleAuthError::TokenStatus(status));
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| GoogleAuthError::Decode(e.to_string()))
    }

    /// Ask the tokeninfo endpoint about an ID token, then check the claims
    /// this app cares about.
    pub async fn verify_token(&self, id_token: &str) -> Result<IdTokenClaims, GoogleAuthError> {
        let response = self
            .http
            .get(&self.tokeninfo_url)
            .query(&[("id_token", id_token)])
            .send()
            .await
            .map_err(|e| GoogleAuthError::TokenInfoRequest(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(GoogleAuthError::TokenInfoStatus(status));
        }

        let claims = response
            .json::<IdTokenClaims>()
            .await
            .map_err(|e| GoogleAuthError::Decode(e.to_string()))?;

        validate_claims(&claims, &self.client_id)?;
        Ok(claims)
    }

    /// The whole callback leg in one call: code -> token set -> verified
    /// claims of the ID token.
    pub async fn verify_id_token_for_code(
        &self,
        code: &str,
    ) -> Result<IdTokenClaims, GoogleAuthError> {
        let tokens = self.exchange_code(code).await?;
        self.verify_token(&tokens.id_token).await
    }
}

/// Checks applied on top of tokeninfo's own signature validation: issuer
/// allowlist, audience match, expiry.
fn validate_claims(claims: &IdTokenClaims, client_id: &str) -> Result<(), GoogleAuthError> {
    if !VALID_ISSUERS.contains(&claims.iss.as_str()) {
        return Err(GoogleAuthError::InvalidIssuer(claims.iss.clone()));
    }
    if claims.aud != client_id {
        return Err(GoogleAuthError::AudienceMismatch(claims.aud.clone()));
    }
    // tokeninfo reports exp as a decimal string.
    let exp: i64 = claims
        .exp
        .parse()
        .map_err(|_| GoogleAuthError::MalformedExpiry(claims.exp.clone()))?;
    if exp < Utc::now().timestamp() {
        return Err(GoogleAuthError::Expired);
    }
    Ok(())
}

fn random_state(len: usize) -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

fn random_nonce(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    rand::rng().fill(bytes.as_mut_slice());
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
