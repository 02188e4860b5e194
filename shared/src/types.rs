use serde::{Deserialize, Serialize};

// ============================================================================
// Auth flow responses
// ============================================================================

/// Body of `GET /auth`: the Google authorization URL the browser should visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUrlResponse {
    pub url: String,
}

/// Google token endpoint response, relayed verbatim by `GET /token`.
///
/// `refresh_token` only appears when offline access was requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: i64,
    pub id_token: String,
    pub scope: String,
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

/// Claims reported by Google's tokeninfo endpoint for an ID token.
///
/// tokeninfo renders every claim as a JSON string, `email_verified`, `iat`
/// and `exp` included. Claims absent from a given token (`hd` outside
/// Workspace accounts, `nonce`/`at_hash` depending on the request) decode as
/// empty strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdTokenClaims {
    pub iss: String,
    pub azp: String,
    pub aud: String,
    pub sub: String,
    pub at_hash: String,
    pub hd: String,
    pub email: String,
    pub email_verified: String,
    pub iat: String,
    pub exp: String,
    pub nonce: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HelloResponse {
    pub message: String,
}

// ============================================================================
// API error envelope
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ApiErrorBody {
                code: code.into(),
                message: message.into(),
            },
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new("UNAUTHORIZED", message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }
}
