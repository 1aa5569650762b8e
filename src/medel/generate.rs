use crate::medel::content;
use crate::medel::registry::{Backend, ProviderConfig};
use crate::medel::rng::Picker;
use anyhow::{Context, Result, anyhow};
use reqwest::blocking::Client;
use serde_json::Value;
use std::env;
use std::time::Duration;

/// Bounded timeout on every generation call; the upstream defaults to none.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// A provider backend: given a fully assembled prompt, return generated
/// text. Credential and model are fixed at construction.
pub trait Completion {
    fn complete(&self, prompt: &str) -> Result<String>;
}

pub struct OpenAiCompletion {
    pub api_key: String,
    pub model: String,
}

pub struct AnthropicCompletion {
    pub api_key: String,
    pub model: String,
}

pub struct GeminiCompletion {
    pub api_key: String,
    pub model: String,
}

pub struct OpenAiCompatCompletion {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

fn http_client() -> Result<Client> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()?)
}

fn extract_openai_text(json: &Value) -> Option<String> {
    if let Some(text) = json.get("output_text").and_then(Value::as_str) {
        return Some(text.to_string());
    }

    let mut chunks = Vec::new();
    let output = json.get("output").and_then(Value::as_array)?;
    for item in output {
        let Some(content) = item.get("content").and_then(Value::as_array) else {
            continue;
        };
        for part in content {
            if let Some(text) = part.get("text").and_then(Value::as_str) {
                chunks.push(text.to_string());
            }
        }
    }

    if chunks.is_empty() {
        None
    } else {
        Some(chunks.join("\n"))
    }
}

fn extract_anthropic_text(json: &Value) -> Option<String> {
    let mut chunks = Vec::new();
    let content = json.get("content").and_then(Value::as_array)?;
    for part in content {
        if let Some(text) = part.get("text").and_then(Value::as_str) {
            chunks.push(text.to_string());
        }
    }
    if chunks.is_empty() {
        None
    } else {
        Some(chunks.join("\n"))
    }
}

fn extract_gemini_text(json: &Value) -> Option<String> {
    json.get("candidates")
        .and_then(Value::as_array)
        .and_then(|arr| arr.first())
        .and_then(|v| v.get("content"))
        .and_then(|v| v.get("parts"))
        .and_then(Value::as_array)
        .and_then(|parts| parts.first())
        .and_then(|v| v.get("text"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn extract_openai_compatible_text(json: &Value) -> Option<String> {
    let choices = json.get("choices").and_then(Value::as_array)?;
    let first = choices.first()?;
    let content = first.get("message")?.get("content")?;
    match content {
        Value::String(s) => Some(s.to_string()),
        Value::Array(parts) => {
            let mut chunks = Vec::new();
            for part in parts {
                if let Some(text) = part.get("text").and_then(Value::as_str) {
                    chunks.push(text.to_string());
                }
            }
            if chunks.is_empty() {
                None
            } else {
                Some(chunks.join("\n"))
            }
        }
        _ => None,
    }
}

impl Completion for OpenAiCompletion {
    fn complete(&self, prompt: &str) -> Result<String> {
        let payload = serde_json::json!({
            "model": self.model,
            "input": prompt,
        });

        let response = http_client()?
            .post("https://api.openai.com/v1/responses")
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()?;
        if !response.status().is_success() {
            anyhow::bail!("openai call failed with status {}", response.status());
        }

        let json: Value = response.json()?;
        extract_openai_text(&json).context("openai response missing text content")
    }
}

impl Completion for AnthropicCompletion {
    fn complete(&self, prompt: &str) -> Result<String> {
        let payload = serde_json::json!({
            "model": self.model,
            "max_tokens": 300,
            "messages": [
                {"role": "user", "content": prompt}
            ]
        });

        let response = http_client()?
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&payload)
            .send()?;
        if !response.status().is_success() {
            anyhow::bail!("anthropic call failed with status {}", response.status());
        }

        let json: Value = response.json()?;
        extract_anthropic_text(&json).context("anthropic response missing text content")
    }
}

impl Completion for GeminiCompletion {
    fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            self.model, self.api_key
        );
        let payload = serde_json::json!({
            "contents": [
                {"parts": [{"text": prompt}]}
            ]
        });

        let response = http_client()?.post(&url).json(&payload).send()?;
        if !response.status().is_success() {
            anyhow::bail!("gemini call failed with status {}", response.status());
        }

        let json: Value = response.json()?;
        extract_gemini_text(&json).context("gemini response missing text content")
    }
}

impl Completion for OpenAiCompatCompletion {
    fn complete(&self, prompt: &str) -> Result<String> {
        let base = self.base_url.trim_end_matches('/');
        let url = format!("{base}/v1/chat/completions");
        let payload = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "user", "content": prompt}
            ]
        });

        let response = http_client()?
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()?;
        if !response.status().is_success() {
            anyhow::bail!(
                "openai-compatible call failed with status {}",
                response.status()
            );
        }

        let json: Value = response.json()?;
        extract_openai_compatible_text(&json)
            .context("openai-compatible response missing text content")
    }
}

/// Resolve the provider's credential from the environment (once, by value)
/// and construct the matching backend.
pub fn backend_for(provider: &ProviderConfig) -> Result<Box<dyn Completion>> {
    let api_key = match env::var(provider.api_key_env) {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => {
            return Err(anyhow!(
                "credential env var {} is unset for provider `{}`",
                provider.api_key_env,
                provider.key
            ));
        }
    };
    let model = provider.model_id.to_string();

    let backend: Box<dyn Completion> = match provider.backend {
        Backend::OpenAi => Box::new(OpenAiCompletion { api_key, model }),
        Backend::Anthropic => Box::new(AnthropicCompletion { api_key, model }),
        Backend::Gemini => Box::new(GeminiCompletion { api_key, model }),
        Backend::OpenAiCompatible => {
            let base_url = provider
                .base_url
                .context("openai-compatible provider missing base url")?
                .to_string();
            Box::new(OpenAiCompatCompletion {
                api_key,
                model,
                base_url,
            })
        }
    };
    Ok(backend)
}

fn build_prompt(picker: &mut dyn Picker, with_master: bool) -> String {
    let chosen = content::PROMPTS[picker.pick(content::PROMPTS.len())];
    if with_master {
        format!("{}\n{}", content::MASTER_PROMPT, chosen)
    } else {
        chosen.to_string()
    }
}

fn or_fallback(text: String) -> String {
    if text.trim().is_empty() {
        content::EMPTY_MESSAGE_FALLBACK.to_string()
    } else {
        text
    }
}

/// Pick a prompt, run it through the backend, and substitute the literal
/// fallback when the provider returns nothing. Errors are returned to the
/// caller; this function never exits the process.
pub fn generate(
    completion: &dyn Completion,
    picker: &mut dyn Picker,
    with_master: bool,
) -> Result<String> {
    let prompt = build_prompt(picker, with_master);
    let text = completion.complete(&prompt)?;
    Ok(or_fallback(text))
}
