//! API key resolution
//!
//! The key is read from the environment first (a `.env` file is honoured by
//! the binary), then from the system keyring.

use keyring::Entry;

use super::error::CoachError;

/// Service name for keyring storage
const SERVICE_NAME: &str = "dsa-coach";
/// Entry name for the API key
const API_KEY_ENTRY: &str = "groq-api-key";

/// Manages the coaching service API key
pub struct ApiKeyManager;

impl ApiKeyManager {
    /// Resolve the API key from `env_var`, falling back to the keyring
    pub fn resolve(env_var: &str, use_keyring: bool) -> Result<String, CoachError> {
        Self::resolve_with(std::env::var(env_var).ok(), env_var, use_keyring, Self::get_api_key)
    }

    fn resolve_with(
        env_value: Option<String>,
        env_var: &str,
        use_keyring: bool,
        keyring: impl FnOnce() -> Result<String, CoachError>,
    ) -> Result<String, CoachError> {
        if let Some(key) = env_value.map(|k| k.trim().to_string()).filter(|k| !k.is_empty()) {
            tracing::debug!("Using API key from {}", env_var);
            return Ok(key);
        }

        if use_keyring {
            match keyring() {
                Ok(key) => {
                    tracing::debug!("Using API key from system keyring");
                    return Ok(key);
                }
                Err(CoachError::ApiKeyNotFound { .. }) => {}
                Err(e) => tracing::warn!("Keyring lookup failed: {}", e),
            }
        }

        Err(CoachError::ApiKeyNotFound { env_var: env_var.to_string() })
    }

    /// Get the API key from system keyring
    pub fn get_api_key() -> Result<String, CoachError> {
        let entry = Entry::new(SERVICE_NAME, API_KEY_ENTRY)
            .map_err(|e| CoachError::KeyringError(e.to_string()))?;

        entry.get_password().map_err(|e| match e {
            keyring::Error::NoEntry => CoachError::ApiKeyNotFound { env_var: String::new() },
            _ => CoachError::KeyringError(e.to_string()),
        })
    }

    /// Store the API key in system keyring
    pub fn set_api_key(key: &str) -> Result<(), CoachError> {
        if !Self::validate_key_format(key) {
            return Err(CoachError::InvalidApiKey);
        }

        let entry = Entry::new(SERVICE_NAME, API_KEY_ENTRY)
            .map_err(|e| CoachError::KeyringError(e.to_string()))?;

        entry.set_password(key).map_err(|e| CoachError::KeyringError(e.to_string()))
    }

    /// Delete the stored API key
    pub fn delete_api_key() -> Result<(), CoachError> {
        let entry = Entry::new(SERVICE_NAME, API_KEY_ENTRY)
            .map_err(|e| CoachError::KeyringError(e.to_string()))?;

        entry.delete_credential().map_err(|e| CoachError::KeyringError(e.to_string()))
    }

    /// Validate API key format
    fn validate_key_format(key: &str) -> bool {
        // Groq API keys start with "gsk_"
        key.starts_with("gsk_") && key.len() > 20
    }

    /// Mask an API key for display (show first 8 and last 4 chars)
    pub fn mask_key(key: &str) -> String {
        let count = key.chars().count();
        if count <= 12 {
            return "*".repeat(count);
        }
        let prefix: String = key.chars().take(8).collect();
        let suffix: String = key.chars().skip(count - 4).collect();
        format!("{}...{}", prefix, suffix)
    }
}
