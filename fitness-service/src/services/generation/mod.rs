//! Text generation providers and the bounded, retrying client around them.
//!
//! [`TextGenerator`] is the provider seam (Anthropic or mock). [`ContentGenerator`]
//! wraps a provider with a concurrency limit, a per-attempt timeout and
//! retry-with-backoff for transient failures.

pub mod anthropic;
pub mod mock;
pub mod prompts;

use crate::config::GenerationConfig;
use crate::models::ContentType;
use async_trait::async_trait;
use service_core::retry::{retry_with_backoff, RetryConfig, Retryable};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Semaphore;

/// Error type for generation calls.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Generation provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Rate limited")]
    RateLimited,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Generation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Empty response from model")]
    EmptyResponse,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl Retryable for GenerationError {
    fn is_transient(&self) -> bool {
        match self {
            GenerationError::RateLimited
            | GenerationError::Network(_)
            | GenerationError::Timeout(_) => true,
            GenerationError::ApiError { status, .. } => *status >= 500,
            GenerationError::NotConfigured(_)
            | GenerationError::EmptyResponse
            | GenerationError::InvalidResponse(_) => false,
        }
    }
}

/// Text returned by a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub text: String,
    pub input_tokens: i64,
    pub output_tokens: i64,
}

impl Generation {
    pub fn tokens_used(&self) -> i64 {
        self.input_tokens + self.output_tokens
    }
}

/// A text generation backend.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for a single user prompt.
    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<Generation, GenerationError>;

    /// Model identifier, for logs.
    fn model(&self) -> &str;
}

/// Final result of a generation call including retries.
#[derive(Debug)]
pub struct GenerationOutcome {
    pub result: Result<Generation, GenerationError>,
    pub retries: u32,
    pub elapsed: Duration,
}

impl GenerationOutcome {
    /// Elapsed wall time in seconds, rounded to two decimals.
    pub fn elapsed_seconds(&self) -> f64 {
        (self.elapsed.as_secs_f64() * 100.0).round() / 100.0
    }
}

/// Provider wrapper with bounded concurrency, timeout and retry.
#[derive(Clone)]
pub struct ContentGenerator {
    provider: Arc<dyn TextGenerator>,
    permits: Arc<Semaphore>,
    timeout: Duration,
    retry: RetryConfig,
}

impl ContentGenerator {
    pub fn new(provider: Arc<dyn TextGenerator>, config: &GenerationConfig) -> Self {
        Self {
            provider,
            permits: Arc::new(Semaphore::new(config.max_concurrency.max(1))),
            timeout: config.timeout,
            retry: RetryConfig::with_max_retries(config.max_retries),
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    /// Generate content of the given kind, retrying transient failures.
    #[tracing::instrument(skip(self, prompt), fields(model = %self.provider.model(), content_type = content_type.as_str()))]
    pub async fn generate(&self, content_type: ContentType, prompt: &str) -> GenerationOutcome {
        let started = Instant::now();
        let max_tokens = content_type.max_tokens();

        let outcome = retry_with_backoff(&self.retry, content_type.as_str(), || {
            self.attempt(prompt, max_tokens)
        })
        .await;

        GenerationOutcome {
            result: outcome.result,
            retries: outcome.retries,
            elapsed: started.elapsed(),
        }
    }

    /// One attempt. The timeout starts once a permit is held.
    async fn attempt(&self, prompt: &str, max_tokens: u32) -> Result<Generation, GenerationError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| GenerationError::NotConfigured("generator is shut down".to_string()))?;

        match tokio::time::timeout(self.timeout, self.provider.generate(prompt, max_tokens)).await {
            Ok(result) => result,
            Err(_) => Err(GenerationError::Timeout(self.timeout)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn fast_retry(max_retries: u32) -> RetryConfig {
        RetryConfig {
            max_retries,
            initial_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(5),
            backoff_multiplier: 2.0,
            add_jitter: false,
        }
    }

    fn config(max_concurrency: usize, timeout: Duration) -> GenerationConfig {
        GenerationConfig {
            max_concurrency,
            timeout,
            max_retries: 2,
        }
    }

    fn ok(text: &str) -> Result<Generation, GenerationError> {
        Ok(Generation {
            text: text.to_string(),
            input_tokens: 10,
            output_tokens: 20,
        })
    }

    /// Replays a fixed sequence of results, then succeeds.
    struct ScriptedGenerator {
        script: Mutex<VecDeque<Result<Generation, GenerationError>>>,
        calls: AtomicU32,
    }

    impl ScriptedGenerator {
        fn new(script: Vec<Result<Generation, GenerationError>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, _prompt: &str, _max_tokens: u32) -> Result<Generation, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| ok("default"))
        }

        fn model(&self) -> &str {
            "scripted"
        }
    }

    /// Sleeps on every call and records peak concurrency.
    struct SlowGenerator {
        delay: Duration,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl SlowGenerator {
        fn new(delay: Duration) -> Self {
            Self {
                delay,
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for SlowGenerator {
        async fn generate(&self, _prompt: &str, _max_tokens: u32) -> Result<Generation, GenerationError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            ok("slow")
        }

        fn model(&self) -> &str {
            "slow"
        }
    }

    #[test]
    fn test_transient_classification() {
        assert!(GenerationError::RateLimited.is_transient());
        assert!(GenerationError::Network("reset".into()).is_transient());
        assert!(GenerationError::Timeout(Duration::from_secs(1)).is_transient());
        assert!(GenerationError::ApiError {
            status: 529,
            message: "overloaded".into()
        }
        .is_transient());

        assert!(!GenerationError::ApiError {
            status: 400,
            message: "bad request".into()
        }
        .is_transient());
        assert!(!GenerationError::EmptyResponse.is_transient());
        assert!(!GenerationError::NotConfigured("off".into()).is_transient());
    }

    #[test]
    fn test_tokens_used_sums_input_and_output() {
        let generation = Generation {
            text: "x".into(),
            input_tokens: 120,
            output_tokens: 480,
        };
        assert_eq!(generation.tokens_used(), 600);
    }

    #[tokio::test]
    async fn test_transient_error_is_retried() {
        let provider = Arc::new(ScriptedGenerator::new(vec![
            Err(GenerationError::RateLimited),
            Err(GenerationError::Network("connection reset".into())),
            ok("third time lucky"),
        ]));
        let generator = ContentGenerator::new(provider.clone(), &config(4, Duration::from_secs(5)))
            .with_retry(fast_retry(2));

        let outcome = generator.generate(ContentType::Workout, "prompt").await;

        assert_eq!(outcome.result.unwrap().text, "third time lucky");
        assert_eq!(outcome.retries, 2);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retries_stop_at_maximum() {
        let provider = Arc::new(ScriptedGenerator::new(vec![
            Err(GenerationError::RateLimited),
            Err(GenerationError::RateLimited),
            Err(GenerationError::RateLimited),
            Err(GenerationError::RateLimited),
        ]));
        let generator = ContentGenerator::new(provider.clone(), &config(4, Duration::from_secs(5)))
            .with_retry(fast_retry(2));

        let outcome = generator.generate(ContentType::Nutrition, "prompt").await;

        assert!(matches!(outcome.result, Err(GenerationError::RateLimited)));
        assert_eq!(outcome.retries, 2);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_permanent_error_is_not_retried() {
        let provider = Arc::new(ScriptedGenerator::new(vec![Err(GenerationError::ApiError {
            status: 400,
            message: "prompt too long".into(),
        })]));
        let generator = ContentGenerator::new(provider.clone(), &config(4, Duration::from_secs(5)))
            .with_retry(fast_retry(3));

        let outcome = generator.generate(ContentType::HealthAnalysis, "prompt").await;

        assert!(matches!(
            outcome.result,
            Err(GenerationError::ApiError { status: 400, .. })
        ));
        assert_eq!(outcome.retries, 0);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_attempt_times_out() {
        let provider = Arc::new(SlowGenerator::new(Duration::from_millis(500)));
        let generator = ContentGenerator::new(provider, &config(1, Duration::from_millis(20)))
            .with_retry(fast_retry(1));

        let outcome = generator.generate(ContentType::Workout, "prompt").await;

        assert!(matches!(outcome.result, Err(GenerationError::Timeout(_))));
        assert_eq!(outcome.retries, 1);
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let provider = Arc::new(SlowGenerator::new(Duration::from_millis(30)));
        let generator = ContentGenerator::new(provider.clone(), &config(2, Duration::from_secs(5)))
            .with_retry(fast_retry(0));

        let calls = (0..6).map(|_| {
            let generator = generator.clone();
            tokio::spawn(async move { generator.generate(ContentType::Motivation, "prompt").await })
        });
        for outcome in futures::future::join_all(calls).await {
            assert!(outcome.unwrap().result.is_ok());
        }

        assert!(provider.peak.load(Ordering::SeqCst) <= 2);
    }

    #[test]
    fn test_elapsed_seconds_rounds_to_hundredths() {
        let outcome = GenerationOutcome {
            result: Err(GenerationError::EmptyResponse),
            retries: 0,
            elapsed: Duration::from_millis(1234),
        };
        assert_eq!(outcome.elapsed_seconds(), 1.23);
    }
}
