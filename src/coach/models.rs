//! Data models for chat completion requests and responses

use std::fmt;

use serde::{Deserialize, Serialize};

/// Model used when the configuration does not name one
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Programming language the learner is practicing in
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Python,
    #[value(name = "cpp", alias = "c++")]
    Cpp,
    Java,
    #[value(name = "javascript", alias = "js")]
    JavaScript,
}

impl Language {
    /// Human-readable name, as used in prompts
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Python => "Python",
            Self::Cpp => "C++",
            Self::Java => "Java",
            Self::JavaScript => "JavaScript",
        }
    }

    /// Parse a language from user input
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "python" | "py" => Some(Self::Python),
            "c++" | "cpp" => Some(Self::Cpp),
            "java" => Some(Self::Java),
            "javascript" | "js" => Some(Self::JavaScript),
            _ => None,
        }
    }

    /// List all supported languages
    pub fn all() -> &'static [Language] {
        &[Self::Python, Self::Cpp, Self::Java, Self::JavaScript]
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            format!("Unknown language: {}. Options: python, cpp, java, javascript", s)
        })
    }
}

/// Message role in a chat completion
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Persona and output instructions
    System,
    /// Task prompt
    User,
}

/// A single chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender
    pub role: Role,
    /// Message content
    pub content: String,
}

impl Message {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }
}

/// Request body for the chat completions endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    /// Model identifier
    pub model: String,
    /// System and user messages
    pub messages: Vec<Message>,
    /// Optional token cap
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ChatCompletionRequest {
    /// Create a request with one system instruction and one user prompt
    pub fn new(
        model: impl Into<String>,
        system: impl Into<String>,
        user: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            messages: vec![Message::system(system), Message::user(user)],
            max_tokens: None,
        }
    }

    /// Set max tokens
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Response from the chat completions endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    /// Generated choices
    #[serde(default)]
    pub choices: Vec<Choice>,
    /// Token usage statistics
    pub usage: Option<Usage>,
}

impl ChatCompletionResponse {
    /// Text of the first generated choice, if any
    pub fn first_text(&self) -> Option<&str> {
        self.choices.first().and_then(|c| c.message.content.as_deref())
    }
}

/// One generated completion
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    /// Generated message
    pub message: ChoiceMessage,
}

/// Message inside a choice
#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    /// Text content
    pub content: Option<String>,
}

/// Token usage statistics
#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
    pub total_tokens: Option<u32>,
}

/// Error envelope returned by the API on failure
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: String,
}

/// Extract the provider's error message from a failed response body
pub(crate) fn extract_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorEnvelope>(body).ok().map(|e| e.error.message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_parse() {
        assert_eq!(Language::parse("python"), Some(Language::Python));
        assert_eq!(Language::parse("C++"), Some(Language::Cpp));
        assert_eq!(Language::parse("cpp"), Some(Language::Cpp));
        assert_eq!(Language::parse("Java"), Some(Language::Java));
        assert_eq!(Language::parse("JS"), Some(Language::JavaScript));
        assert_eq!(Language::parse("rust"), None);
    }

    #[test]
    fn language_display_names() {
        let names: Vec<_> = Language::all().iter().map(|l| l.to_string()).collect();
        assert_eq!(names, vec!["Python", "C++", "Java", "JavaScript"]);
    }

    #[test]
    fn request_serializes_system_then_user() {
        let request = ChatCompletionRequest::new(DEFAULT_MODEL, "persona", "task");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "llama-3.3-70b-versatile");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "persona");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "task");
        assert!(json.get("max_tokens").is_none());
    }

    #[test]
    fn response_first_text() {
        let body = r#"{
            "id": "chatcmpl-1",
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": "  First\n" } },
                { "index": 1, "message": { "role": "assistant", "content": "Second" } }
            ],
            "usage": { "prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15 }
        }"#;
        let response: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.first_text(), Some("  First\n"));
        assert_eq!(response.usage.unwrap().total_tokens, Some(15));
    }

    #[test]
    fn response_without_choices_has_no_text() {
        let response: ChatCompletionResponse = serde_json::from_str("{}").unwrap();
        assert!(response.first_text().is_none());
    }

    #[test]
    fn extracts_provider_error_message() {
        let body = r#"{"error":{"message":"Invalid API Key","type":"invalid_request_error"}}"#;
        assert_eq!(extract_error_message(body), Some("Invalid API Key".to_string()));
        assert_eq!(extract_error_message("gateway timeout"), None);
    }
}
