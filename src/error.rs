use thiserror::Error;

/// One variant per pipeline stage that can fail. Every variant is terminal
/// for the run; nothing is retried in-process.
#[derive(Debug, Error)]
pub enum MedelError {
    #[error("unknown provider `{key}`; available providers: {available}")]
    UnknownProvider { key: String, available: String },
    #[error("message generation failed: {0:#}")]
    Generation(anyhow::Error),
    #[error("counter increment failed: {0:#}")]
    Counter(anyhow::Error),
    #[error("log append failed: {0:#}")]
    Log(anyhow::Error),
    #[error("push delivery failed: {0:#}")]
    Delivery(anyhow::Error),
}

impl MedelError {
    pub fn stage(&self) -> &'static str {
        match self {
            Self::UnknownProvider { .. } => "resolve-provider",
            Self::Generation(_) => "generate",
            Self::Counter(_) => "allocate-id",
            Self::Log(_) => "append-log",
            Self::Delivery(_) => "send-notification",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MedelError;

    #[test]
    fn unknown_provider_message_lists_available_keys() {
        let err = MedelError::UnknownProvider {
            key: "not-a-real-model".to_string(),
            available: "gpt, claude, gemini".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("not-a-real-model"));
        assert!(text.contains("gpt, claude, gemini"));
    }

    #[test]
    fn stage_names_follow_pipeline_order() {
        assert_eq!(
            MedelError::Counter(anyhow::anyhow!("boom")).stage(),
            "allocate-id"
        );
        assert_eq!(
            MedelError::Delivery(anyhow::anyhow!("boom")).stage(),
            "send-notification"
        );
    }
}
