//! Request/response contracts of the C Agent server and the backend seam
//!
//! Every response carries a `success` flag. A response that decodes but says
//! `success: false` is a normal value, not an `ApiError`; callers decide how to
//! surface it.

pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::i18n::Language;
use crate::state::ChatMessage;

pub use http::HttpBackend;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("could not decode response: {0}")]
    Decode(String),
    #[error("could not read {path}: {message}")]
    Io { path: String, message: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub history: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub success: bool,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HelpRequest {
    pub query: String,
    pub language: Language,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HelpResponse {
    pub success: bool,
    /// keyword -> description, in server order
    #[serde(default)]
    pub results: serde_json::Map<String, serde_json::Value>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl HelpResponse {
    pub fn entries(&self) -> Vec<(String, String)> {
        self.results
            .iter()
            .map(|(keyword, description)| {
                let text = match description {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (keyword.clone(), text)
            })
            .collect()
    }
}

/// A file attached to the similarity request
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimilarityResponse {
    pub success: bool,
    #[serde(default)]
    pub similarity: Option<f64>,
    #[serde(default)]
    pub file1: Option<String>,
    #[serde(default)]
    pub file2: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryResponse {
    pub success: bool,
    #[serde(default)]
    pub history: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LanguageRequest {
    pub language: Language,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LanguageResponse {
    pub success: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub language: Option<String>,
}

impl ServerConfig {
    /// The configured language, falling back to Chinese when absent or unknown
    pub fn language(&self) -> Language {
        self.language
            .as_deref()
            .and_then(Language::from_code)
            .unwrap_or_default()
    }
}

/// The remote collaborator the controller talks to
#[async_trait]
pub trait Backend: Send + Sync {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError>;
    async fn help(&self, request: &HelpRequest) -> Result<HelpResponse, ApiError>;
    async fn similarity(&self, file1: Upload, file2: Upload) -> Result<SimilarityResponse, ApiError>;
    async fn history(&self) -> Result<HistoryResponse, ApiError>;
    async fn set_language(&self, language: Language) -> Result<LanguageResponse, ApiError>;
    async fn config(&self) -> Result<ServerConfig, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_response_keeps_server_order() {
        let json = r#"{"success": true, "type": "statement",
            "results": {"while": "loop", "int": "integer", "for": "loop"}}"#;
        let response: HelpResponse = serde_json::from_str(json).unwrap();
        let keywords: Vec<String> = response.entries().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keywords, vec!["while", "int", "for"]);
        assert_eq!(response.kind.as_deref(), Some("statement"));
    }

    #[test]
    fn test_failure_payloads_decode() {
        let chat: ChatResponse = serde_json::from_str(r#"{"success": false, "error": "boom"}"#).unwrap();
        assert!(!chat.success);
        assert!(chat.response.is_none());

        let help: HelpResponse = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert!(help.entries().is_empty());
        assert!(help.message.is_none());
    }

    #[test]
    fn test_server_config_language_fallback() {
        let config: ServerConfig = serde_json::from_str(r#"{"language": "en"}"#).unwrap();
        assert_eq!(config.language(), Language::En);
        let config: ServerConfig = serde_json::from_str(r#"{"language": "de"}"#).unwrap();
        assert_eq!(config.language(), Language::ZhCn);
        let config: ServerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.language(), Language::ZhCn);
    }

    #[test]
    fn test_help_request_serializes_language_code() {
        let request = HelpRequest {
            query: "int".to_string(),
            language: Language::En,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({"query": "int", "language": "en"}));
    }
}
