use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use futures::stream::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::{LlmClient, LlmClientError, LlmTokenStream, ResponseFormat};
use crate::presentation::config::{LlmProvider, LlmSettings};

/// Chat-completions client for OpenAI, Azure OpenAI and LM Studio.
pub struct OpenAiCompatibleClient {
    client: Client,
    provider: LlmProvider,
    endpoint: String,
    api_key: String,
    model: String,
    vision_model: String,
    max_tokens: usize,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: usize,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<serde_json::Value>,
}

#[derive(Serialize, Deserialize, Clone)]
struct ChatMessage {
    role: String,
    content: serde_json::Value,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatCompletionChunk {
    choices: Vec<ChunkChoice>,
}

#[derive(Deserialize)]
struct ChunkChoice {
    delta: ChunkDelta,
}

#[derive(Deserialize)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

/// One line of a server-sent-events completion stream.
#[derive(Debug, PartialEq, Eq)]
pub enum SseLine {
    Token(String),
    Done,
    Skip,
}

pub fn parse_sse_line(line: &str) -> SseLine {
    let Some(data) = line.strip_prefix("data:") else {
        return SseLine::Skip;
    };
    let data = data.trim();
    if data == "[DONE]" {
        return SseLine::Done;
    }
    serde_json::from_str::<ChatCompletionChunk>(data)
        .ok()
        .and_then(|chunk| chunk.choices.into_iter().next())
        .and_then(|choice| choice.delta.content)
        .filter(|content| !content.is_empty())
        .map_or(SseLine::Skip, SseLine::Token)
}

impl OpenAiCompatibleClient {
    fn messages(instructions: &str, prompt: &str) -> Vec<ChatMessage> {
        vec![
            ChatMessage {
                role: "system".to_string(),
                content: serde_json::Value::String(instructions.to_string()),
            },
            ChatMessage {
                role: "user".to_string(),
                content: serde_json::Value::String(prompt.to_string()),
            },
        ]
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.provider == LlmProvider::Azure {
            request.header("api-key", &self.api_key)
        } else {
            request.header("Authorization", format!("Bearer {}", self.api_key))
        }
    }

    async fn send(
        &self,
        body: &ChatCompletionRequest<'_>,
    ) -> Result<reqwest::Response, LlmClientError> {
        let request = self.client.post(&self.endpoint).json(body);
        let response = self
            .apply_auth(request)
            .send()
            .await
            .map_err(|e| LlmClientError::ApiRequestFailed(e.to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmClientError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmClientError::ApiRequestFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        Ok(response)
    }

    async fn first_choice(response: reqwest::Response) -> Result<String, LlmClientError> {
        let completion_response: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmClientError::InvalidResponse(e.to_string()))?;

        completion_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmClientError::InvalidResponse("empty choices".to_string()))
    }
}

#[async_trait]
impl LlmClient for OpenAiCompatibleClient {
    #[tracing::instrument(skip(self, instructions, prompt), fields(model = %self.model))]
    async fn complete(
        &self,
        instructions: &str,
        prompt: &str,
        format: ResponseFormat,
    ) -> Result<String, LlmClientError> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: Self::messages(instructions, prompt),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            stream: None,
            response_format: match format {
                ResponseFormat::Text => None,
                ResponseFormat::JsonObject => Some(serde_json::json!({ "type": "json_object" })),
            },
        };

        let response = self.send(&body).await?;
        let content = Self::first_choice(response).await?;
        tracing::debug!(chars = content.len(), "Completion received");
        Ok(content)
    }

    #[tracing::instrument(skip(self, instructions, prompt), fields(model = %self.model))]
    async fn complete_stream(
        &self,
        instructions: &str,
        prompt: &str,
    ) -> Result<LlmTokenStream, LlmClientError> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: Self::messages(instructions, prompt),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            stream: Some(true),
            response_format: None,
        };

        let mut bytes = self.send(&body).await?.bytes_stream();

        let token_stream = async_stream::stream! {
            let mut buffer: Vec<u8> = Vec::new();
            while let Some(chunk) = bytes.next().await {
                match chunk {
                    Ok(chunk) => {
                        buffer.extend_from_slice(&chunk);
                        while let Some(pos) = buffer.iter().position(|b| *b == b'\n') {
                            let line: Vec<u8> = buffer.drain(..=pos).collect();
                            let line = String::from_utf8_lossy(&line);
                            match parse_sse_line(line.trim_end()) {
                                SseLine::Token(token) => yield Ok(token),
                                SseLine::Done => return,
                                SseLine::Skip => {}
                            }
                        }
                    }
                    Err(e) => {
                        yield Err(LlmClientError::ApiRequestFailed(e.to_string()));
                        return;
                    }
                }
            }

            // Upstream closed without a trailing newline.
            if !buffer.is_empty() {
                let line = String::from_utf8_lossy(&buffer);
                if let SseLine::Token(token) = parse_sse_line(line.trim_end()) {
                    yield Ok(token);
                }
            }
        };

        Ok(Box::pin(token_stream))
    }

    #[tracing::instrument(skip(self, prompt, image), fields(model = %self.vision_model, bytes = image.len()))]
    async fn complete_with_image(
        &self,
        prompt: &str,
        image: &[u8],
        mime_type: &str,
    ) -> Result<String, LlmClientError> {
        let b64 = general_purpose::STANDARD.encode(image);
        let data_uri = format!("data:{mime_type};base64,{b64}");

        let body = ChatCompletionRequest {
            model: &self.vision_model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: serde_json::json!([
                    { "type": "text", "text": prompt },
                    { "type": "image_url", "image_url": { "url": data_uri } }
                ]),
            }],
            max_tokens: self.max_tokens,
            temperature: 0.0,
            stream: None,
            response_format: None,
        };

        let response = self.send(&body).await?;
        Self::first_choice(response).await
    }
}

pub fn create_llm_client(settings: &LlmSettings) -> Result<OpenAiCompatibleClient, LlmClientError> {
    let endpoint = match settings.provider {
        LlmProvider::OpenAi => format!(
            "{}/chat/completions",
            settings
                .base_url
                .as_deref()
                .unwrap_or("https://api.openai.com/v1")
                .trim_end_matches('/')
        ),
        LlmProvider::LmStudio => {
            let base_url = settings.base_url.as_deref().ok_or_else(|| {
                LlmClientError::Configuration("base_url required for lmstudio provider".to_string())
            })?;
            format!("{}/chat/completions", base_url.trim_end_matches('/'))
        }
        LlmProvider::Azure => {
            let azure_endpoint = settings.azure_endpoint.as_deref().ok_or_else(|| {
                LlmClientError::Configuration(
                    "azure_endpoint required for azure provider".to_string(),
                )
            })?;
            format!(
                "{}/openai/deployments/{}/chat/completions?api-version={}",
                azure_endpoint.trim_end_matches('/'),
                settings.chat_model,
                settings.azure_api_version
            )
        }
    };

    Ok(OpenAiCompatibleClient {
        client: Client::new(),
        provider: settings.provider,
        endpoint,
        api_key: settings.api_key.clone(),
        model: settings.chat_model.clone(),
        vision_model: settings
            .vision_model
            .clone()
            .unwrap_or_else(|| settings.chat_model.clone()),
        max_tokens: settings.max_tokens,
        temperature: settings.temperature,
    })
}
