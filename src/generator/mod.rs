pub mod buckets;
pub mod gemini;
pub mod prompt;
pub mod repetition;

pub use buckets::KeywordBucket;
pub use gemini::GeminiProvider;
pub use prompt::{enhance_prompt, PracticeDirective};

use crate::config::Config;
use crate::error::GenerationError;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tracing::info;

/// Shown when a repetition prompt carries no usable words
pub const EMPTY_WORD_LIST_TEXT: &str = "Please provide words to practice.";

/// Online text completion backend
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Produces practice text from a free-form prompt.
///
/// With a provider configured every call goes online and a provider failure
/// is returned as is, never replaced by offline text.
pub struct TextGenerator {
    provider: Option<Box<dyn CompletionProvider>>,
}

impl TextGenerator {
    pub fn offline() -> Self {
        Self { provider: None }
    }

    pub fn with_provider(provider: impl CompletionProvider + 'static) -> Self {
        Self {
            provider: Some(Box::new(provider)),
        }
    }

    /// Online when `api_key` is present and non-empty, offline otherwise
    pub fn from_config(config: &Config, api_key: Option<&str>) -> Result<Self, GenerationError> {
        match api_key.map(str::trim).filter(|key| !key.is_empty()) {
            Some(key) => {
                let provider = GeminiProvider::new(
                    key,
                    config.model.as_str(),
                    config.api_base_url.as_str(),
                    Duration::from_secs(config.request_timeout_secs),
                )?;
                info!("using {} for text generation", provider.model());
                Ok(Self::with_provider(provider))
            }
            None => {
                info!("no API key configured, using offline text generation");
                Ok(Self::offline())
            }
        }
    }

    pub fn is_online(&self) -> bool {
        self.provider.is_some()
    }

    pub async fn generate_text(&self, prompt: &str) -> Result<String, GenerationError> {
        match &self.provider {
            Some(provider) => {
                let enhanced = enhance_prompt(prompt);
                provider.complete(&enhanced).await
            }
            None => Ok(Self::generate_offline(prompt, &mut StdRng::from_entropy())),
        }
    }

    /// Deterministic synthesis for a given random source; never fails
    pub fn generate_offline<R: Rng + ?Sized>(prompt: &str, rng: &mut R) -> String {
        match PracticeDirective::parse(prompt) {
            PracticeDirective::Repetition(words) => {
                info!("synthesizing repetition practice for {} words", words.len());
                repetition::synthesize(&words, rng)
            }
            PracticeDirective::EmptyWordList => EMPTY_WORD_LIST_TEXT.to_string(),
            PracticeDirective::Freeform => {
                let bucket = KeywordBucket::for_prompt(prompt);
                info!("using {} reference text", bucket);
                bucket.reference_text().to_string()
            }
        }
    }
}
