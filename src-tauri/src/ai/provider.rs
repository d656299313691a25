//! HTTP calls to the supported generative-model providers.
//!
//! Every provider takes the same [`ModelRequest`] and returns the model's
//! raw text. Structured output is requested natively where the provider
//! supports a schema, and through a system instruction otherwise.

use std::time::Duration;

use serde_json::{json, Value};
use tracing::{error, info};

use crate::error::TutorError;

/// Timeout applied to every model call.
pub const API_TIMEOUT_SECS: u64 = 60;

const JSON_SYSTEM_PROMPT: &str = "You are a precise learning assistant. \
Always respond with valid JSON only, no markdown formatting or code blocks.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Gemini,
    Claude,
    OpenAi,
    OpenRouter,
}

impl Provider {
    pub const ALL: [Provider; 4] = [
        Provider::Gemini,
        Provider::Claude,
        Provider::OpenAi,
        Provider::OpenRouter,
    ];

    pub fn parse(name: &str) -> Result<Self, TutorError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(Provider::Gemini),
            "claude" => Ok(Provider::Claude),
            "openai" => Ok(Provider::OpenAi),
            "openrouter" => Ok(Provider::OpenRouter),
            other => Err(TutorError::UnsupportedProvider(other.to_string())),
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Provider::Gemini => "gemini",
            Provider::Claude => "claude",
            Provider::OpenAi => "openai",
            Provider::OpenRouter => "openrouter",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::Gemini => "gemini-2.5-flash",
            Provider::Claude => "claude-sonnet-4-20250514",
            Provider::OpenAi => "gpt-4o",
            Provider::OpenRouter => "google/gemini-2.5-flash",
        }
    }

    /// Keychain service name holding this provider's API key.
    pub fn keyring_service(&self) -> String {
        format!("learntutor-{}-api", self.id())
    }

    /// Environment variable consulted when the keychain has no entry.
    pub fn env_var(&self) -> String {
        format!("LEARNTUTOR_{}_API_KEY", self.id().to_ascii_uppercase())
    }
}

/// Resolved provider, model and credential for one command.
#[derive(Debug, Clone)]
pub struct AiSettings {
    pub provider: Provider,
    pub model: String,
    pub api_key: String,
}

/// An inline image attached to a prompt.
#[derive(Debug, Clone)]
pub struct ImagePart {
    pub media_type: &'static str,
    pub data_base64: String,
}

/// Provider-independent description of one model call.
#[derive(Debug, Clone, Copy)]
pub struct ModelRequest<'a> {
    pub prompt: &'a str,
    /// JSON schema for structured output; `None` asks for free text.
    pub schema: Option<&'a Value>,
    pub schema_name: &'a str,
    pub image: Option<&'a ImagePart>,
}

impl<'a> ModelRequest<'a> {
    pub fn text(prompt: &'a str) -> Self {
        Self {
            prompt,
            schema: None,
            schema_name: "response",
            image: None,
        }
    }

    pub fn structured(prompt: &'a str, schema: &'a Value, schema_name: &'a str) -> Self {
        Self {
            prompt,
            schema: Some(schema),
            schema_name,
            image: None,
        }
    }

    pub fn with_image(mut self, image: &'a ImagePart) -> Self {
        self.image = Some(image);
        self
    }
}

/// Send a request to the configured provider and return the model's text.
pub async fn generate(settings: &AiSettings, request: &ModelRequest<'_>) -> Result<String, TutorError> {
    info!(
        "Calling provider '{}' model '{}' (structured: {}, image: {})",
        settings.provider.id(),
        settings.model,
        request.schema.is_some(),
        request.image.is_some()
    );

    let client = build_api_client()?;
    let provider = settings.provider.id();

    let builder = match settings.provider {
        Provider::Gemini => client
            .post(format!(
                "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent",
                settings.model
            ))
            .header("x-goog-api-key", &settings.api_key)
            .json(&gemini_body(request)),
        Provider::Claude => client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", &settings.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&claude_body(&settings.model, request)),
        Provider::OpenAi => client
            .post("https://api.openai.com/v1/chat/completions")
            .header("Authorization", format!("Bearer {}", settings.api_key))
            .json(&openai_body(&settings.model, request)),
        Provider::OpenRouter => client
            .post("https://openrouter.ai/api/v1/chat/completions")
            .header("Authorization", format!("Bearer {}", settings.api_key))
            .json(&openrouter_body(&settings.model, request)),
    };

    let response = builder.send().await.map_err(|e| {
        let msg = if e.is_timeout() {
            format!("timeout after {}s for provider '{}'", API_TIMEOUT_SECS, provider)
        } else {
            format!("request failed for {}: {}", provider, e)
        };
        error!("{}", msg);
        TutorError::Api(msg)
    })?;

    let body_text = handle_api_response(response, provider).await?;
    let resp_json: Value = serde_json::from_str(&body_text).map_err(|e| {
        let msg = format!("Failed to parse {} API response wrapper: {}", provider, e);
        error!("{}", msg);
        TutorError::Api(msg)
    })?;

    let text = match settings.provider {
        Provider::Gemini => gemini_text(&resp_json),
        Provider::Claude => claude_text(&resp_json),
        Provider::OpenAi | Provider::OpenRouter => chat_completion_text(&resp_json),
    };

    text.ok_or_else(|| {
        let msg = format!("No text content in {} API response", provider);
        error!("{}", msg);
        TutorError::Api(msg)
    })
}

/// Build a reqwest client with the model-call timeout.
pub(crate) fn build_api_client() -> Result<reqwest::Client, TutorError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(API_TIMEOUT_SECS))
        .build()
        .map_err(|e| TutorError::Api(format!("Failed to build HTTP client: {}", e)))
}

/// Check status and read the body, keeping error bodies short for the UI.
async fn handle_api_response(response: reqwest::Response, provider: &str) -> Result<String, TutorError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<failed to read body>".to_string());
        let msg = format!("{} from {} - {}", status, provider, truncate_for_log(&body, 1024));
        error!("LLM API error: {}", msg);
        return Err(TutorError::Api(msg));
    }
    response
        .text()
        .await
        .map_err(|e| TutorError::Api(format!("Failed to read response body from {}: {}", provider, e)))
}

pub(crate) fn truncate_for_log(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

/// Convert a JSON schema into the OpenAPI subset Gemini accepts:
/// upper-case type names and no `additionalProperties`.
pub fn to_gemini_schema(schema: &Value) -> Value {
    match schema {
        Value::Object(map) => {
            let mut out = serde_json::Map::new();
            for (key, value) in map {
                match key.as_str() {
                    "additionalProperties" => {}
                    "type" => {
                        let converted = value
                            .as_str()
                            .map(|t| Value::String(t.to_ascii_uppercase()))
                            .unwrap_or_else(|| value.clone());
                        out.insert(key.clone(), converted);
                    }
                    "properties" => {
                        let props = value
                            .as_object()
                            .map(|props| {
                                props
                                    .iter()
                                    .map(|(name, prop)| (name.clone(), to_gemini_schema(prop)))
                                    .collect::<serde_json::Map<_, _>>()
                            })
                            .unwrap_or_default();
                        out.insert(key.clone(), Value::Object(props));
                    }
                    "items" => {
                        out.insert(key.clone(), to_gemini_schema(value));
                    }
                    _ => {
                        out.insert(key.clone(), value.clone());
                    }
                }
            }
            Value::Object(out)
        }
        other => other.clone(),
    }
}

fn gemini_body(request: &ModelRequest<'_>) -> Value {
    let mut parts = vec![json!({ "text": request.prompt })];
    if let Some(image) = request.image {
        parts.push(json!({
            "inline_data": {
                "mime_type": image.media_type,
                "data": image.data_base64,
            }
        }));
    }

    let mut body = json!({
        "contents": [{ "role": "user", "parts": parts }],
    });
    if let Some(schema) = request.schema {
        body["generationConfig"] = json!({
            "responseMimeType": "application/json",
            "responseSchema": to_gemini_schema(schema),
        });
    }
    body
}

fn claude_body(model: &str, request: &ModelRequest<'_>) -> Value {
    let content = match request.image {
        Some(image) => json!([
            {
                "type": "image",
                "source": {
                    "type": "base64",
                    "media_type": image.media_type,
                    "data": image.data_base64,
                }
            },
            { "type": "text", "text": request.prompt }
        ]),
        None => json!(request.prompt),
    };

    let mut body = json!({
        "model": model,
        "max_tokens": 2048,
        "messages": [{ "role": "user", "content": content }],
    });
    // Anthropic has no response schema mode; steer with the system prompt.
    if request.schema.is_some() {
        body["system"] = json!(JSON_SYSTEM_PROMPT);
    }
    body
}

fn chat_user_content(request: &ModelRequest<'_>) -> Value {
    match request.image {
        Some(image) => json!([
            { "type": "text", "text": request.prompt },
            {
                "type": "image_url",
                "image_url": {
                    "url": format!("data:{};base64,{}", image.media_type, image.data_base64)
                }
            }
        ]),
        None => json!(request.prompt),
    }
}

fn openai_body(model: &str, request: &ModelRequest<'_>) -> Value {
    let mut body = json!({
        "model": model,
        "max_tokens": 2048,
        "messages": [{ "role": "user", "content": chat_user_content(request) }],
    });
    if let Some(schema) = request.schema {
        body["response_format"] = json!({
            "type": "json_schema",
            "json_schema": {
                "name": request.schema_name,
                "strict": true,
                "schema": schema,
            }
        });
    }
    body
}

/// OpenRouter routes to many backends; json_object mode is the common denominator.
fn openrouter_body(model: &str, request: &ModelRequest<'_>) -> Value {
    let mut messages = Vec::new();
    if request.schema.is_some() {
        messages.push(json!({ "role": "system", "content": JSON_SYSTEM_PROMPT }));
    }
    messages.push(json!({ "role": "user", "content": chat_user_content(request) }));

    let mut body = json!({
        "model": model,
        "max_tokens": 2048,
        "messages": messages,
    });
    if request.schema.is_some() {
        body["response_format"] = json!({ "type": "json_object" });
    }
    body
}

/// Gemini: `{ "candidates": [{ "content": { "parts": [{ "text": "..." }] } }] }`
fn gemini_text(resp: &Value) -> Option<String> {
    let parts = resp["candidates"][0]["content"]["parts"].as_array()?;
    let text: String = parts.iter().filter_map(|p| p["text"].as_str()).collect();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Anthropic: `{ "content": [{ "type": "text", "text": "..." }] }`
fn claude_text(resp: &Value) -> Option<String> {
    resp["content"]
        .as_array()?
        .iter()
        .find(|block| block["type"] == "text")
        .and_then(|block| block["text"].as_str())
        .map(str::to_string)
}

/// OpenAI-compatible: `{ "choices": [{ "message": { "content": "..." } }] }`
fn chat_completion_text(resp: &Value) -> Option<String> {
    resp["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
}
