use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::completion::{CompletionClient, CompletionError};
use crate::prompt::{build_prompt, ProductAttributes};
use crate::sanitizer::sanitize_titles;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GeneratedTitles {
    pub market: String,
    pub titles: Vec<String>,
}

#[derive(Debug, Error)]
pub enum TitleGenError {
    #[error("product name is required")]
    EmptyProductName,
    #[error("completion service call failed: {0}")]
    Upstream(String),
    #[error("completion service returned no usable text")]
    NoContent,
    #[error("no valid titles were generated")]
    NoValidTitles,
}

impl From<CompletionError> for TitleGenError {
    fn from(value: CompletionError) -> Self {
        match value {
            CompletionError::Upstream(message) => Self::Upstream(message),
            CompletionError::NoContent => Self::NoContent,
        }
    }
}

/// End-to-end title generation: prompt → completion → sanitization →
/// assembled response. Stateless across calls; every invocation works on
/// request-local data and the only await point is the completion call.
pub struct TitleGenerator {
    client: Arc<dyn CompletionClient>,
    market: String,
}

impl TitleGenerator {
    pub fn new(client: Arc<dyn CompletionClient>, market: impl Into<String>) -> Self {
        Self { client, market: market.into() }
    }

    pub fn market(&self) -> &str {
        &self.market
    }

    /// The caller-facing `market` request field is accepted upstream but
    /// the generator always answers for its configured market label; the
    /// original service behaved the same way.
    pub async fn generate(
        &self,
        attrs: &ProductAttributes,
    ) -> Result<GeneratedTitles, TitleGenError> {
        let prompt = build_prompt(attrs, &self.market)?;
        let raw = self.client.complete(&prompt).await?;

        let titles = sanitize_titles(&raw);
        if titles.is_empty() {
            return Err(TitleGenError::NoValidTitles);
        }

        info!(
            event_name = "titlegen.pipeline.accepted",
            market = %self.market,
            title_count = titles.len(),
            "title generation produced accepted titles"
        );
        Ok(GeneratedTitles { market: self.market.clone(), titles })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::{TitleGenError, TitleGenerator};
    use crate::completion::{CompletionClient, CompletionError};
    use crate::prompt::ProductAttributes;

    const LONG_TITLE: &str = "LEDSONE 18W Ceiling LED Light Round Warm White Energy Saving \
         Indoor Lighting Fixture for Living Room Bedroom";

    struct CannedClient {
        response: Result<String, CompletionError>,
        called: AtomicBool,
    }

    impl CannedClient {
        fn ok(text: &str) -> Self {
            Self { response: Ok(text.to_string()), called: AtomicBool::new(false) }
        }

        fn failing(error: CompletionError) -> Self {
            Self { response: Err(error), called: AtomicBool::new(false) }
        }
    }

    #[async_trait]
    impl CompletionClient for CannedClient {
        async fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
            self.called.store(true, Ordering::SeqCst);
            match &self.response {
                Ok(text) => Ok(text.clone()),
                Err(CompletionError::Upstream(message)) => {
                    Err(CompletionError::Upstream(message.clone()))
                }
                Err(CompletionError::NoContent) => Err(CompletionError::NoContent),
            }
        }
    }

    #[tokio::test]
    async fn generate_returns_sanitized_titles_with_market_label() {
        let client = Arc::new(CannedClient::ok(&format!("1. {LONG_TITLE}")));
        let generator = TitleGenerator::new(client, "Sri Lanka");

        let generated = generator
            .generate(&ProductAttributes::named("LED Ceiling Light"))
            .await
            .expect("generation should succeed");

        assert_eq!(generated.market, "Sri Lanka");
        assert_eq!(generated.titles, vec![LONG_TITLE.to_string()]);
    }

    #[tokio::test]
    async fn empty_product_name_short_circuits_before_remote_call() {
        let client = Arc::new(CannedClient::ok(&format!("1. {LONG_TITLE}")));
        let generator = TitleGenerator::new(client.clone(), "Sri Lanka");

        let result = generator.generate(&ProductAttributes::named("  ")).await;

        assert!(matches!(result, Err(TitleGenError::EmptyProductName)));
        assert!(!client.called.load(Ordering::SeqCst), "client must not be invoked");
    }

    #[tokio::test]
    async fn completion_without_valid_titles_is_a_distinct_terminal_error() {
        let client = Arc::new(CannedClient::ok("Here are your titles:\n1. ok\n2. :-)"));
        let generator = TitleGenerator::new(client, "Sri Lanka");

        let result = generator.generate(&ProductAttributes::named("LED Ceiling Light")).await;
        assert!(matches!(result, Err(TitleGenError::NoValidTitles)));
    }

    #[tokio::test]
    async fn upstream_failure_is_surfaced_without_retry() {
        let client = Arc::new(CannedClient::failing(CompletionError::Upstream(
            "connection refused".to_string(),
        )));
        let generator = TitleGenerator::new(client, "Sri Lanka");

        let result = generator.generate(&ProductAttributes::named("LED Ceiling Light")).await;
        assert!(matches!(result, Err(TitleGenError::Upstream(message)) if message.contains("connection refused")));
    }

    #[tokio::test]
    async fn no_content_maps_to_no_content_error() {
        let client = Arc::new(CannedClient::failing(CompletionError::NoContent));
        let generator = TitleGenerator::new(client, "Sri Lanka");

        let result = generator.generate(&ProductAttributes::named("LED Ceiling Light")).await;
        assert!(matches!(result, Err(TitleGenError::NoContent)));
    }
}
