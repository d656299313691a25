use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::config::api_key_for;
use crate::ai::Provider;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub name: String,
}

/// OpenAI-style listing: `{ "data": [{ "id": ... }] }`.
#[derive(Debug, Deserialize)]
struct ModelsResponse {
    data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
}

/// Gemini listing: `{ "models": [{ "name": "models/...", "displayName": ... }] }`.
#[derive(Debug, Deserialize)]
struct GeminiModelsResponse {
    #[serde(default)]
    models: Vec<GeminiModelEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiModelEntry {
    name: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

fn gemini_models(resp: GeminiModelsResponse) -> Vec<ModelInfo> {
    resp.models
        .into_iter()
        .filter(|m| {
            m.supported_generation_methods
                .iter()
                .any(|method| method == "generateContent")
        })
        .map(|m| {
            let id = m.name.trim_start_matches("models/").to_string();
            let name = m.display_name.unwrap_or_else(|| id.clone());
            ModelInfo { id, name }
        })
        .collect()
}

#[tauri::command]
pub async fn list_models(provider: String) -> Result<Vec<ModelInfo>, String> {
    info!("Fetching models for provider: {}", provider);
    let provider = Provider::parse(&provider)?;
    let api_key = api_key_for(provider)?;
    let client = reqwest::Client::new();

    let request = match provider {
        Provider::Gemini => client
            .get("https://generativelanguage.googleapis.com/v1beta/models")
            .header("x-goog-api-key", &api_key),
        Provider::Claude => client
            .get("https://api.anthropic.com/v1/models")
            .header("x-api-key", &api_key)
            .header("anthropic-version", "2023-06-01"),
        Provider::OpenAi => client
            .get("https://api.openai.com/v1/models")
            .header("Authorization", format!("Bearer {}", api_key)),
        Provider::OpenRouter => client
            .get("https://openrouter.ai/api/v1/models")
            .header("Authorization", format!("Bearer {}", api_key)),
    };

    let resp = request
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        warn!("Models API error for {} ({}): {}", provider.id(), status, body);
        return Err(format!("API error ({})", status));
    }

    let mut result: Vec<ModelInfo> = match provider {
        Provider::Gemini => {
            let models: GeminiModelsResponse = resp
                .json()
                .await
                .map_err(|e| format!("Failed to parse response: {}", e))?;
            gemini_models(models)
        }
        _ => {
            let models: ModelsResponse = resp
                .json()
                .await
                .map_err(|e| format!("Failed to parse response: {}", e))?;
            models
                .data
                .into_iter()
                .map(|m| {
                    let name = m.display_name.or(m.name).unwrap_or_else(|| m.id.clone());
                    ModelInfo { id: m.id, name }
                })
                .collect()
        }
    };

    result.sort_by(|a, b| a.id.cmp(&b.id));
    info!("Found {} models for {}", result.len(), provider.id());
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_models_keeps_generators_only() {
        let json = r#"{
            "models": [
                {"name": "models/gemini-2.5-flash", "displayName": "Gemini 2.5 Flash",
                 "supportedGenerationMethods": ["generateContent", "countTokens"]},
                {"name": "models/text-embedding-004",
                 "supportedGenerationMethods": ["embedContent"]}
            ]
        }"#;
        let resp: GeminiModelsResponse = serde_json::from_str(json).unwrap();
        let models = gemini_models(resp);
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].id, "gemini-2.5-flash");
        assert_eq!(models[0].name, "Gemini 2.5 Flash");
    }
}
