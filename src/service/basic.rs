// src/service/basic.rs
use super::StringService;
use crate::error::ServiceError;
use async_trait::async_trait;

/// The business logic. Stateless; every call is a pure function of its input.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicStringService;

#[async_trait]
impl StringService for BasicStringService {
    async fn uppercase(&self, s: &str) -> Result<String, ServiceError> {
        if s.is_empty() {
            return Err(ServiceError::EmptyInput);
        }
        // Unicode default case mapping, independent of locale ("ß" -> "SS").
        Ok(s.to_uppercase())
    }

    async fn count(&self, s: &str) -> usize {
        s.chars().count()
    }
}
