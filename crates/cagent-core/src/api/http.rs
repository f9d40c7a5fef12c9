use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::{
    ApiError, Backend, ChatRequest, ChatResponse, HelpRequest, HelpResponse, HistoryResponse,
    LanguageRequest, LanguageResponse, ServerConfig, SimilarityResponse, Upload,
};
use crate::i18n::Language;

/// Talks to the C Agent server over HTTP
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send and decode the JSON body whatever the HTTP status; the server
    /// reports failures in the body
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(_) if !status.is_success() => {
                Err(ApiError::Transport(format!("server returned {}", status)))
            }
            Err(e) => Err(ApiError::Decode(e.to_string())),
        }
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError> {
        log::debug!("POST /api/chat ({} history entries)", request.history.len());
        self.send(self.client.post(self.url("/api/chat")).json(request))
            .await
    }

    async fn help(&self, request: &HelpRequest) -> Result<HelpResponse, ApiError> {
        log::debug!("POST /api/help query={:?}", request.query);
        self.send(self.client.post(self.url("/api/help")).json(request))
            .await
    }

    async fn similarity(&self, file1: Upload, file2: Upload) -> Result<SimilarityResponse, ApiError> {
        log::debug!("POST /api/similarity {} vs {}", file1.file_name, file2.file_name);
        let form = Form::new()
            .part("file1", Part::bytes(file1.bytes).file_name(file1.file_name))
            .part("file2", Part::bytes(file2.bytes).file_name(file2.file_name));
        self.send(self.client.post(self.url("/api/similarity")).multipart(form))
            .await
    }

    async fn history(&self) -> Result<HistoryResponse, ApiError> {
        self.send(self.client.get(self.url("/api/history"))).await
    }

    async fn set_language(&self, language: Language) -> Result<LanguageResponse, ApiError> {
        log::debug!("POST /api/language {}", language);
        self.send(
            self.client
                .post(self.url("/api/language"))
                .json(&LanguageRequest { language }),
        )
        .await
    }

    async fn config(&self) -> Result<ServerConfig, ApiError> {
        self.send(self.client.get(self.url("/api/config"))).await
    }
}
