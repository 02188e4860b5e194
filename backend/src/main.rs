mod google;
mod routes;

use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use google::GoogleAuth;
use routes::{auth, hello};

#[derive(Clone)]
pub struct AppConfig {
    pub app_name: Option<String>,
    pub google_client_id: Option<String>,
    pub google_client_secret: Option<String>,
    pub callback_url: String,
    pub auth_url: String,
    pub token_url: String,
    pub tokeninfo_url: String,
}

impl AppConfig {
    /// Read configuration from the environment. Credentials are optional so
    /// the server can come up before the Google console setup is done; the
    /// endpoint URLs have overrides so tests can point them at a stub.
    pub fn from_env() -> Self {
        Self {
            app_name: std::env::var("GOOGLE_APP_NAME").ok(),
            google_client_id: std::env::var("GOOGLE_CLIENT_ID").ok(),
            google_client_secret: std::env::var("GOOGLE_CLIENT_SECRET").ok(),
            callback_url: std::env::var("CALLBACK_URL")
                .unwrap_or_else(|_| "http://localhost:3000/callback".to_string()),
            auth_url: std::env::var("GOOGLE_AUTH_URL")
                .unwrap_or_else(|_| google::GOOGLE_AUTH_URL.to_string()),
            token_url: std::env::var("GOOGLE_TOKEN_URL")
                .unwrap_or_else(|_| google::GOOGLE_TOKEN_URL.to_string()),
            tokeninfo_url: std::env::var("GOOGLE_TOKENINFO_URL")
                .unwrap_or_else(|_| google::GOOGLE_TOKENINFO_URL.to_string()),
        }
    }
}

pub struct AppState {
    pub google: Option<GoogleAuth>,
}

fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/hello", get(hello::hello))
        .route("/auth", get(auth::auth))
        .route("/token", get(auth::token))
        .route("/verify", get(auth::verify))
        .route("/verify/id_token", get(auth::verify_id_token))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();
    let google = GoogleAuth::from_config(&config);
    if google.is_none() {
        tracing::warn!(
            "GOOGLE_CLIENT_ID / GOOGLE_CLIENT_SECRET not set, auth routes will answer 500"
        );
    }

    let state = Arc::new(AppState { google });

    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let addr = format!("0.0.0.0:{}", port);
    tracing::info!(
        "Starting {} on {}",
        config.app_name.as_deref().unwrap_or("google-login"),
        addr
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::google::testing::{spawn_google_stub, valid_stub_claims};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use shared::{ApiError, AuthUrlResponse, HelloResponse, IdTokenClaims};
    use tower::ServiceExt;

    fn test_app(google: Option<GoogleAuth>) -> Router {
        app(Arc::new(AppState { google }))
    }

    fn configured_google() -> GoogleAuth {
        GoogleAuth::new("client-123", "secret-xyz", "http://localhost:3000/callback")
    }

    async fn get_response(app: Router, uri: &str) -> axum::response::Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn hello_returns_greeting() {
        let response = get_response(test_app(None), "/hello").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: HelloResponse = body_json(response).await;
        assert_eq!(body.message, "Hello Google");
    }

    #[tokio::test]
    async fn auth_returns_the_authorization_url() {
        let response = get_response(test_app(Some(configured_google())), "/auth").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: AuthUrlResponse = body_json(response).await;
        assert!(body
            .url
            .starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        assert!(body.url.contains("client_id=client-123"));
        assert!(body
            .url
            .contains("redirect_uri=http%3A%2F%2Flocalhost%3A3000%2Fcallback"));
        assert!(body.url.contains("scope=openid"));
    }

    #[tokio::test]
    async fn auth_without_credentials_is_a_server_error() {
        let response = get_response(test_app(None), "/auth").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: ApiError = body_json(response).await;
        assert_eq!(body.error.code, "INTERNAL_ERROR");
        assert_eq!(body.error.message, "OAuth not configured");
    }

    #[tokio::test]
    async fn verify_id_token_without_code_is_rejected() {
        let response = get_response(test_app(Some(configured_google())), "/verify/id_token").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn verify_id_token_relays_verified_claims() {
        let claims = valid_stub_claims();
        let (base, seen) = spawn_google_stub(claims.clone()).await;
        let google = configured_google().with_endpoints(
            format!("{base}/auth"),
            format!("{base}/token"),
            format!("{base}/tokeninfo"),
        );

        let response =
            get_response(test_app(Some(google)), "/verify/id_token?code=abc123").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: IdTokenClaims = body_json(response).await;
        assert_eq!(body, claims);

        let form = seen
            .token_form
            .lock()
            .unwrap()
            .clone()
            .expect("token endpoint was not called");
        assert_eq!(form.get("code").map(String::as_str), Some("abc123"));
    }

    #[tokio::test]
    async fn verify_id_token_claim_failure_maps_to_unauthorized() {
        let mut claims = valid_stub_claims();
        claims.aud = "someone-else".to_string();
        let (base, _seen) = spawn_google_stub(claims).await;
        let google = configured_google().with_endpoints(
            format!("{base}/auth"),
            format!("{base}/token"),
            format!("{base}/tokeninfo"),
        );

        let response =
            get_response(test_app(Some(google)), "/verify/id_token?code=abc123").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: ApiError = body_json(response).await;
        assert_eq!(body.error.code, "UNAUTHORIZED");
        assert_eq!(body.error.message, "invalid aud: someone-else");
    }

    #[tokio::test]
    async fn token_without_code_is_rejected() {
        let response = get_response(test_app(Some(configured_google())), "/token").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let response = get_response(test_app(None), "/nope").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
