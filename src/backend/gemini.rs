use super::get_api_key;
use crate::core::traits::TextGenerator;
use crate::utils::error::{AppError, AppResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    system_instruction: Content,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

impl GenerateRequest {
    fn new(prompt: &str, system_instruction: &str, max_output_tokens: u32) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: system_instruction.to_string(),
                }],
            },
            generation_config: GenerationConfig { max_output_tokens },
        }
    }
}

impl GenerateResponse {
    /// Text of the first candidate, parts concatenated
    fn into_text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

/// Gemini `generateContent` client
pub struct GeminiClient {
    client: Client,
    model: String,
    api_key: Option<String>,
}

impl GeminiClient {
    /// The API key is read now but only required when a request is made
    pub fn new(model: &str) -> AppResult<Self> {
        Ok(Self {
            client: Client::builder()
                .user_agent(concat!("mnctl/", env!("CARGO_PKG_VERSION")))
                .build()
                .map_err(|e| AppError::Backend(format!("Failed to create HTTP client: {}", e)))?,
            model: model.to_string(),
            api_key: get_api_key(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", GEMINI_API_BASE, self.model)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(
        &self,
        prompt: &str,
        system_instruction: &str,
        max_output_tokens: u32,
    ) -> AppResult<String> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AppError::Backend(format!(
                "API key not found. Set the {} environment variable",
                super::API_KEY_ENV
            ))
        })?;

        let request = GenerateRequest::new(prompt, system_instruction, max_output_tokens);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Backend(format!("Failed to reach {}: {}", self.model, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Backend(format!(
                "Generation failed: {} - {}",
                status, error_text
            )));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AppError::Backend(format!("Failed to parse response: {}", e)))?;

        Ok(body.into_text())
    }
}
