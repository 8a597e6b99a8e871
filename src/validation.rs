use anyhow::{anyhow, Result};
use std::path::Path;

/// Validation utilities for command-line input and prompt answers
#[derive(Debug, Copy, Clone)]
pub struct InputValidator;

impl InputValidator {
    /// Validate the transcript root directory
    pub fn validate_input_dir(path: &Path) -> Result<()> {
        if path.as_os_str().is_empty() {
            return Err(anyhow!("Input directory cannot be empty"));
        }

        if !path.exists() {
            return Err(anyhow!("Input directory does not exist: {path:?}"));
        }

        if !path.is_dir() {
            return Err(anyhow!("Input path is not a directory: {path:?}"));
        }

        Ok(())
    }

    /// Validate the destination database path
    pub fn validate_output_file(path: &Path) -> Result<()> {
        if path.as_os_str().is_empty() {
            return Err(anyhow!("Output file path cannot be empty"));
        }

        if path.is_dir() {
            return Err(anyhow!("Output path is a directory: {path:?}"));
        }

        // A bare file name lives in the current directory
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.is_dir() {
                return Err(anyhow!("Output directory does not exist: {parent:?}"));
            }
        }

        Ok(())
    }

    /// Validate a nickname entered at the prompt
    pub fn validate_nickname(nick: &str) -> Result<()> {
        if nick.trim().is_empty() {
            return Err(anyhow!("Nickname cannot be empty"));
        }

        if nick.chars().any(char::is_control) {
            return Err(anyhow!("Nickname contains control characters: {nick:?}"));
        }

        Ok(())
    }
}
