// file: src/utils/validation.rs
// description: configuration validation utilities and helpers
// reference: input validation patterns

use crate::error::{PipelineError, Result};

pub struct Validator;

impl Validator {
    /// Hub dataset names are `namespace/name`.
    pub fn validate_dataset_name(name: &str) -> Result<()> {
        let trimmed = name.trim();

        if trimmed.is_empty() {
            return Err(PipelineError::Validation(
                "Dataset name must not be empty".to_string(),
            ));
        }

        let mut parts = trimmed.splitn(2, '/');
        let namespace = parts.next().unwrap_or_default();
        let repo = parts.next().unwrap_or_default();

        if namespace.is_empty() || repo.is_empty() {
            return Err(PipelineError::Validation(format!(
                "Dataset name must look like namespace/name: {trimmed}"
            )));
        }

        Ok(())
    }

    pub fn validate_url(url: &str) -> Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(PipelineError::Validation(format!(
                "Invalid URL format: {url}"
            )));
        }
        Ok(())
    }

    pub fn validate_chunk_size(size: usize) -> Result<()> {
        if size == 0 {
            return Err(PipelineError::Validation(
                "Chunk size must be greater than 0".to_string(),
            ));
        }

        if size > 100_000 {
            return Err(PipelineError::Validation(
                "Chunk size too large (max 100000)".to_string(),
            ));
        }

        Ok(())
    }
}
