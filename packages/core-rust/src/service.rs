//! The string service contract and its stateless core implementation.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ServiceError;

// ---------------------------------------------------------------------------
// StringService trait
// ---------------------------------------------------------------------------

/// Operations on strings.
///
/// Implemented by the core service, by every middleware that decorates it and
/// by the transport client stub, so all of them are interchangeable wherever a
/// `StringService` is expected.
#[async_trait]
pub trait StringService: Send + Sync {
    /// Upper-cases the first character of every whitespace-separated word.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::EmptyInput` when `s` is empty.
    async fn title_case(&self, s: &str) -> Result<String, ServiceError>;

    /// Removes every whitespace code point from `s`.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::EmptyInput` when `s` is empty.
    async fn remove_whitespace(&self, s: &str) -> Result<String, ServiceError>;

    /// Returns the length of `s` in bytes.
    async fn count(&self, s: &str) -> usize;
}

#[async_trait]
impl<S: StringService + ?Sized> StringService for Arc<S> {
    async fn title_case(&self, s: &str) -> Result<String, ServiceError> {
        (**self).title_case(s).await
    }

    async fn remove_whitespace(&self, s: &str) -> Result<String, ServiceError> {
        (**self).remove_whitespace(s).await
    }

    async fn count(&self, s: &str) -> usize {
        (**self).count(s).await
    }
}

// ---------------------------------------------------------------------------
// BasicService
// ---------------------------------------------------------------------------

/// Stateless core implementation of `StringService`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicService;

impl BasicService {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl StringService for BasicService {
    async fn title_case(&self, s: &str) -> Result<String, ServiceError> {
        if s.is_empty() {
            return Err(ServiceError::EmptyInput);
        }
        Ok(title_case(s))
    }

    async fn remove_whitespace(&self, s: &str) -> Result<String, ServiceError> {
        if s.is_empty() {
            return Err(ServiceError::EmptyInput);
        }
        Ok(remove_whitespace(s))
    }

    async fn count(&self, s: &str) -> usize {
        s.len()
    }
}

/// Upper-cases each character that starts a word. Word boundaries are
/// whitespace; all other characters are left as they are.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if at_word_start && !c.is_whitespace() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = c.is_whitespace();
    }
    out
}

fn remove_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
