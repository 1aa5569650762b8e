use crate::error::MedelError;

/// Wire protocol a provider speaks. Everything that is not one of the three
/// first-party APIs goes through the OpenAI-compatible chat endpoint with a
/// per-provider base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    OpenAi,
    Anthropic,
    Gemini,
    OpenAiCompatible,
}

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub key: &'static str,
    pub display_name: &'static str,
    pub model_id: &'static str,
    pub api_key_env: &'static str,
    pub backend: Backend,
    pub base_url: Option<&'static str>,
}

/// Immutable provider table, built once at startup and passed explicitly to
/// the pipeline. The set of keys is fixed per deployment.
#[derive(Debug)]
pub struct ProviderRegistry {
    providers: Vec<ProviderConfig>,
}

impl ProviderRegistry {
    pub fn builtin() -> Self {
        let providers = vec![
            ProviderConfig {
                key: "gpt",
                display_name: "GPT-5-Nano",
                model_id: "gpt-5",
                api_key_env: "OPENAI_API_KEY",
                backend: Backend::OpenAi,
                base_url: None,
            },
            ProviderConfig {
                key: "claude",
                display_name: "Claude",
                model_id: "claude-3.7-sonnet-latest",
                api_key_env: "ANTHROPIC_API_KEY",
                backend: Backend::Anthropic,
                base_url: None,
            },
            ProviderConfig {
                key: "gemini",
                display_name: "Gemini",
                model_id: "gemini-2.5-flash-lite-preview-09-2025",
                api_key_env: "GOOGLE_API_KEY",
                backend: Backend::Gemini,
                base_url: None,
            },
            ProviderConfig {
                key: "llama",
                display_name: "Llama-4",
                model_id: "llama-4",
                api_key_env: "GROQ",
                backend: Backend::OpenAiCompatible,
                base_url: Some("https://api.groq.com/openai"),
            },
            ProviderConfig {
                key: "qwen",
                display_name: "Qwen",
                model_id: "qwen",
                api_key_env: "GROQ",
                backend: Backend::OpenAiCompatible,
                base_url: Some("https://api.groq.com/openai"),
            },
            ProviderConfig {
                key: "grok",
                display_name: "Grok",
                model_id: "grok-4-fast",
                api_key_env: "XAI_API_KEY",
                backend: Backend::OpenAiCompatible,
                base_url: Some("https://api.x.ai"),
            },
            ProviderConfig {
                key: "deepseek",
                display_name: "Deepseek",
                model_id: "deepseek-reasoner",
                api_key_env: "DEEPSEEK_API_KEY",
                backend: Backend::OpenAiCompatible,
                base_url: Some("https://api.deepseek.com"),
            },
            ProviderConfig {
                key: "mistral",
                display_name: "Mistral",
                model_id: "mistral-large",
                api_key_env: "MISTRAL_API_KEY",
                backend: Backend::OpenAiCompatible,
                base_url: Some("https://api.mistral.ai"),
            },
        ];
        Self { providers }
    }

    pub fn resolve(&self, key: &str) -> Result<&ProviderConfig, MedelError> {
        self.providers
            .iter()
            .find(|p| p.key == key)
            .ok_or_else(|| MedelError::UnknownProvider {
                key: key.to_string(),
                available: self.available_keys(),
            })
    }

    pub fn available_keys(&self) -> String {
        self.providers
            .iter()
            .map(|p| p.key)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
