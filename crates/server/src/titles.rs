//! AI title generation endpoint, bearer-token protected.
//!
//! `POST /api/ai/generate-title` - `{ name, market? }` in, `{ market,
//! titles }` out. The caller-supplied `market` is accepted for wire
//! compatibility but the configured market label always wins.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use sellery_core::auth::tokens::TokenSigner;
use sellery_titlegen::{GeneratedTitles, ProductAttributes, TitleGenError, TitleGenerator};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::auth::{authenticate, ApiError};

#[derive(Clone)]
pub struct TitlesState {
    generator: Arc<TitleGenerator>,
    signer: TokenSigner,
}

impl TitlesState {
    pub fn new(generator: Arc<TitleGenerator>, signer: TokenSigner) -> Self {
        Self { generator, signer }
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateTitleRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub market: Option<String>,
}

pub fn router(state: TitlesState) -> Router {
    Router::new().route("/api/ai/generate-title", post(generate_title)).with_state(state)
}

async fn generate_title(
    State(state): State<TitlesState>,
    headers: HeaderMap,
    Json(payload): Json<GenerateTitleRequest>,
) -> Result<Json<GeneratedTitles>, (StatusCode, Json<ApiError>)> {
    authenticate(&headers, &state.signer)?;

    if let Some(requested) = payload.market.as_deref() {
        if requested != state.generator.market() {
            debug!(
                requested_market = requested,
                effective_market = state.generator.market(),
                "caller-supplied market ignored in favor of configured label"
            );
        }
    }

    let attrs = ProductAttributes::named(payload.name);
    let generated = state.generator.generate(&attrs).await.map_err(|error| {
        let (status, message) = match &error {
            TitleGenError::EmptyProductName => {
                (StatusCode::BAD_REQUEST, "Product name is required")
            }
            TitleGenError::Upstream(_) => (StatusCode::BAD_GATEWAY, "Error generating titles"),
            TitleGenError::NoContent => (StatusCode::BAD_GATEWAY, "No title generated"),
            TitleGenError::NoValidTitles => {
                (StatusCode::UNPROCESSABLE_ENTITY, "No valid titles generated")
            }
        };
        warn!(
            event_name = "titles.generate.failed",
            error = %error,
            "title generation request failed"
        );
        (status, Json(ApiError::new(message)))
    })?;

    Ok(Json(generated))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::extract::State;
    use axum::http::{header::AUTHORIZATION, HeaderMap, HeaderValue, StatusCode};
    use axum::Json;
    use sellery_core::auth::tokens::TokenSigner;
    use sellery_core::domain::user::UserId;
    use sellery_titlegen::{CompletionClient, CompletionError, TitleGenerator};

    use super::{generate_title, GenerateTitleRequest, TitlesState};

    const LONG_TITLE: &str = "LEDSONE 18W Ceiling LED Light Round Warm White Energy Saving \
         Indoor Lighting Fixture for Living Room Bedroom";

    struct CannedClient {
        response: Result<String, CompletionError>,
    }

    #[async_trait]
    impl CompletionClient for CannedClient {
        async fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
            match &self.response {
                Ok(text) => Ok(text.clone()),
                Err(CompletionError::Upstream(message)) => {
                    Err(CompletionError::Upstream(message.clone()))
                }
                Err(CompletionError::NoContent) => Err(CompletionError::NoContent),
            }
        }
    }

    fn signer() -> TokenSigner {
        TokenSigner::new("unit-test-signing-secret".to_string().into())
    }

    fn state_with(response: Result<String, CompletionError>) -> TitlesState {
        let generator =
            Arc::new(TitleGenerator::new(Arc::new(CannedClient { response }), "Sri Lanka"));
        TitlesState::new(generator, signer())
    }

    fn authed_headers() -> HeaderMap {
        let token = signer().issue(&UserId("U-test".to_string()), 24);
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token.0)).expect("header value"),
        );
        headers
    }

    fn request(name: &str, market: Option<&str>) -> GenerateTitleRequest {
        GenerateTitleRequest { name: name.to_string(), market: market.map(str::to_string) }
    }

    #[tokio::test]
    async fn returns_titles_with_configured_market_label() {
        let state = state_with(Ok(format!("1. {LONG_TITLE}")));

        let Json(generated) = generate_title(
            State(state),
            authed_headers(),
            Json(request("LED Ceiling Light", Some("lk"))),
        )
        .await
        .expect("generation should succeed");

        assert_eq!(generated.market, "Sri Lanka");
        assert_eq!(generated.titles, vec![LONG_TITLE.to_string()]);
    }

    #[tokio::test]
    async fn empty_name_is_a_bad_request() {
        let state = state_with(Ok(format!("1. {LONG_TITLE}")));

        let (status, Json(body)) =
            generate_title(State(state), authed_headers(), Json(request("   ", None)))
                .await
                .err()
                .expect("empty name should fail");

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "Product name is required");
    }

    #[tokio::test]
    async fn upstream_failures_map_to_bad_gateway() {
        let state =
            state_with(Err(CompletionError::Upstream("connection refused".to_string())));

        let (status, Json(body)) =
            generate_title(State(state), authed_headers(), Json(request("LED Light", None)))
                .await
                .err()
                .expect("upstream failure should surface");

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body.error, "Error generating titles");
    }

    #[tokio::test]
    async fn no_valid_titles_is_unprocessable() {
        let state = state_with(Ok("Here are your titles:\n1. ok".to_string()));

        let (status, Json(body)) =
            generate_title(State(state), authed_headers(), Json(request("LED Light", None)))
                .await
                .err()
                .expect("empty sanitizer output should surface");

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.error, "No valid titles generated");
    }

    #[tokio::test]
    async fn endpoint_requires_a_token() {
        let state = state_with(Ok(format!("1. {LONG_TITLE}")));

        let (status, _) =
            generate_title(State(state), HeaderMap::new(), Json(request("LED Light", None)))
                .await
                .err()
                .expect("unauthenticated call should fail");

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
