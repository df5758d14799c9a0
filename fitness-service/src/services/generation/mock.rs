//! Mock generator for tests and for running without an API key.

use super::{Generation, GenerationError, TextGenerator};
use async_trait::async_trait;

pub struct MockGenerator {
    enabled: bool,
}

impl MockGenerator {
    /// A disabled mock fails every call with a permanent error.
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<Generation, GenerationError> {
        if !self.enabled {
            return Err(GenerationError::NotConfigured(
                "Mock generator not enabled".to_string(),
            ));
        }

        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;

        let headline = prompt.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
        let text = format!("Mock response for: {}", headline.trim());
        let output_tokens = (text.len() as i64 / 4).min(max_tokens as i64);

        Ok(Generation {
            text,
            input_tokens: prompt.len() as i64 / 4,
            output_tokens,
        })
    }

    fn model(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_echoes_first_line() {
        let result = MockGenerator::new(true)
            .generate("\nCreate a strength workout\nmore detail", 2000)
            .await
            .unwrap();

        assert_eq!(result.text, "Mock response for: Create a strength workout");
        assert!(result.tokens_used() > 0);
    }

    #[tokio::test]
    async fn test_disabled_mock_fails() {
        let err = MockGenerator::new(false).generate("hi", 10).await.unwrap_err();
        assert!(matches!(err, GenerationError::NotConfigured(_)));
    }
}
