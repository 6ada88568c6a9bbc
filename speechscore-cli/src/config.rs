use crate::cli::ServiceArgs;

pub const ENV_ASR_URL: &str = "SPEECHSCORE_ASR_URL";
pub const ENV_ASR_FALLBACK_URL: &str = "SPEECHSCORE_ASR_FALLBACK_URL";
pub const ENV_ASR_MODEL: &str = "SPEECHSCORE_ASR_MODEL";
pub const ENV_GRAMMAR_URL: &str = "SPEECHSCORE_GRAMMAR_URL";
pub const ENV_LANGUAGE: &str = "SPEECHSCORE_LANGUAGE";

pub const DEFAULT_ASR_URL: &str = "http://localhost:8000";
pub const DEFAULT_GRAMMAR_URL: &str = "http://localhost:8081";

#[derive(Clone, Debug, PartialEq)]
pub struct ServiceConfig {
    pub asr_url: String,
    pub asr_fallback_url: Option<String>,
    pub asr_model: String,
    pub grammar_url: String,
    pub language: String,
}

impl ServiceConfig {
    /// Load `.env` (if any) and read the process environment.
    pub fn from_env() -> Self {
        if let Ok(path) = dotenvy::dotenv() {
            log::debug!("loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            asr_url: get(ENV_ASR_URL).unwrap_or_else(|| DEFAULT_ASR_URL.to_string()),
            asr_fallback_url: get(ENV_ASR_FALLBACK_URL),
            asr_model: get(ENV_ASR_MODEL)
                .unwrap_or_else(|| speechscore_client::transcription::DEFAULT_MODEL.to_string()),
            grammar_url: get(ENV_GRAMMAR_URL).unwrap_or_else(|| DEFAULT_GRAMMAR_URL.to_string()),
            language: get(ENV_LANGUAGE)
                .unwrap_or_else(|| speechscore_client::grammar::DEFAULT_LANGUAGE.to_string()),
        }
    }

    /// Command-line flags win over the environment.
    pub fn apply(&mut self, args: &ServiceArgs) {
        if let Some(url) = &args.asr_url {
            self.asr_url = url.clone();
        }
        if let Some(url) = &args.asr_fallback_url {
            self.asr_fallback_url = Some(url.clone());
        }
        if let Some(model) = &args.asr_model {
            self.asr_model = model.clone();
        }
        if let Some(url) = &args.grammar_url {
            self.grammar_url = url.clone();
        }
        if let Some(lang) = &args.language {
            self.language = lang.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_unset() {
        let c = ServiceConfig::from_lookup(|_| None);
        assert_eq!(c.asr_url, DEFAULT_ASR_URL);
        assert_eq!(c.asr_fallback_url, None);
        assert_eq!(c.asr_model, "whisper-1");
        assert_eq!(c.language, "en-US");
    }

    #[test]
    fn test_env_values_and_blank_ignored() {
        let env: HashMap<&str, &str> = [
            (ENV_ASR_URL, "http://asr:9000"),
            (ENV_ASR_FALLBACK_URL, "  "),
            (ENV_LANGUAGE, "en-GB"),
        ]
        .into_iter()
        .collect();
        let c = ServiceConfig::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(c.asr_url, "http://asr:9000");
        assert_eq!(c.asr_fallback_url, None);
        assert_eq!(c.language, "en-GB");
    }

    #[test]
    fn test_flags_override_env() {
        let mut c = ServiceConfig::from_lookup(|_| None);
        c.apply(&ServiceArgs {
            asr_fallback_url: Some("http://backup:8000".into()),
            grammar_url: Some("http://lt:8010".into()),
            ..ServiceArgs::default()
        });
        assert_eq!(c.asr_fallback_url.as_deref(), Some("http://backup:8000"));
        assert_eq!(c.grammar_url, "http://lt:8010");
        assert_eq!(c.asr_url, DEFAULT_ASR_URL);
    }
}
