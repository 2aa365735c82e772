//! Collision-free short code selection.

use std::sync::Arc;

use serde_json::json;
use tracing::debug;

use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::utils::code_generator::{CodeGenerator, CodeSettings};

/// Picks short codes that no stored mapping uses.
///
/// Candidates come from a [`CodeGenerator`] and are checked against the
/// store. After `attempts_per_length` collisions at one length the length is
/// widened by one, up to `max_length`; beyond that the resolver gives up with
/// [`AppError::Exhausted`].
///
/// The check is advisory: a concurrent writer can still claim the code before
/// it is inserted, which the store reports through `try_create`/`try_update`.
pub struct CodeResolver {
    repository: Arc<dyn UrlRepository>,
    generator: Arc<dyn CodeGenerator>,
    settings: CodeSettings,
}

impl CodeResolver {
    pub fn new(
        repository: Arc<dyn UrlRepository>,
        generator: Arc<dyn CodeGenerator>,
        settings: CodeSettings,
    ) -> Self {
        Self {
            repository,
            generator,
            settings,
        }
    }

    pub fn settings(&self) -> CodeSettings {
        self.settings
    }

    /// Returns a code that is absent from the store at call time.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Exhausted`] if every attempt at every permitted
    /// length collided.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn resolve_unique_code(&self) -> Result<String, AppError> {
        let CodeSettings {
            length,
            max_length,
            attempts_per_length,
        } = self.settings;

        for current_length in length..=max_length {
            for _ in 0..attempts_per_length {
                let code = self.generator.generate(current_length);

                if !self.repository.exists_by_code(&code).await? {
                    return Ok(code);
                }

                debug!(code, length = current_length, "Short code collision");
                metrics::counter!("short_code_collisions_total").increment(1);
            }
        }

        Err(AppError::exhausted(
            "Failed to generate unique short URL code",
            json!({
                "reason": "Too many collisions",
                "maxLength": max_length,
                "attemptsPerLength": attempts_per_length,
            }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockUrlRepository;
    use crate::utils::code_generator::MockCodeGenerator;

    fn settings(length: usize, max_length: usize, attempts_per_length: usize) -> CodeSettings {
        CodeSettings {
            length,
            max_length,
            attempts_per_length,
        }
    }

    #[tokio::test]
    async fn test_returns_first_free_code() {
        let mut repo = MockUrlRepository::new();
        let mut generator = MockCodeGenerator::new();

        generator
            .expect_generate()
            .withf(|len| *len == 8)
            .times(1)
            .returning(|_| "freecode".to_string());
        repo.expect_exists_by_code()
            .withf(|code| code == "freecode")
            .times(1)
            .returning(|_| Ok(false));

        let resolver = CodeResolver::new(Arc::new(repo), Arc::new(generator), settings(8, 12, 5));

        assert_eq!(resolver.resolve_unique_code().await.unwrap(), "freecode");
    }

    #[tokio::test]
    async fn test_retries_on_collision() {
        let mut repo = MockUrlRepository::new();
        let mut generator = MockCodeGenerator::new();
        let mut candidates = vec!["freecode", "taken002", "taken001"];

        generator
            .expect_generate()
            .times(3)
            .returning(move |_| candidates.pop().unwrap().to_string());

        repo.expect_exists_by_code()
            .returning(|code| Ok(code.starts_with("taken")));

        let resolver = CodeResolver::new(Arc::new(repo), Arc::new(generator), settings(8, 12, 5));

        assert_eq!(resolver.resolve_unique_code().await.unwrap(), "freecode");
    }

    #[tokio::test]
    async fn test_widens_length_after_repeated_collisions() {
        let mut repo = MockUrlRepository::new();
        let mut generator = MockCodeGenerator::new();

        generator
            .expect_generate()
            .withf(|len| *len == 4)
            .times(3)
            .returning(|_| "aaaa".to_string());
        generator
            .expect_generate()
            .withf(|len| *len == 5)
            .times(1)
            .returning(|_| "bbbbb".to_string());

        repo.expect_exists_by_code()
            .returning(|code| Ok(code == "aaaa"));

        let resolver = CodeResolver::new(Arc::new(repo), Arc::new(generator), settings(4, 6, 3));

        assert_eq!(resolver.resolve_unique_code().await.unwrap(), "bbbbb");
    }

    #[tokio::test]
    async fn test_exhausted_when_every_attempt_collides() {
        let mut repo = MockUrlRepository::new();
        let mut generator = MockCodeGenerator::new();

        // lengths 4, 5, 6 with two attempts each
        generator
            .expect_generate()
            .times(6)
            .returning(|len| "x".repeat(len));
        repo.expect_exists_by_code().times(6).returning(|_| Ok(true));

        let resolver = CodeResolver::new(Arc::new(repo), Arc::new(generator), settings(4, 6, 2));

        let err = resolver.resolve_unique_code().await.unwrap_err();
        assert!(matches!(err, AppError::Exhausted { .. }));
    }

    #[tokio::test]
    async fn test_propagates_store_errors() {
        let mut repo = MockUrlRepository::new();
        let mut generator = MockCodeGenerator::new();

        generator
            .expect_generate()
            .returning(|_| "whatever".to_string());
        repo.expect_exists_by_code()
            .times(1)
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let resolver = CodeResolver::new(Arc::new(repo), Arc::new(generator), settings(8, 12, 5));

        let err = resolver.resolve_unique_code().await.unwrap_err();
        assert!(matches!(err, AppError::Internal { .. }));
    }
}
