//! Coaching service integration
//!
//! Provides API key management, prompt construction, and the HTTP client
//! for the remote text-generation service that writes hints and reviews.

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod prompts;

// Re-export commonly used types
pub use auth::ApiKeyManager;
pub use client::{Coach, CoachClient};
pub use error::CoachError;
pub use models::{DEFAULT_MODEL, Language};
