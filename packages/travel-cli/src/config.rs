use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use travel_graph::GraphConfig;

/// CLI configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub openai_base_url: Option<String>,
    pub model: String,
    pub llm_timeout_secs: u64,
    pub graph_timeout_secs: u64,
    pub corpus_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let config = Self {
            openai_api_key: non_empty(env::var("OPENAI_API_KEY").ok()),
            openai_base_url: non_empty(env::var("OPENAI_BASE_URL").ok()),
            model: non_empty(env::var("TRAVEL_LLM_MODEL").ok())
                .unwrap_or_else(|| "gpt-4o-mini".to_string()),
            llm_timeout_secs: parse_secs("LLM_TIMEOUT_SEC", env::var("LLM_TIMEOUT_SEC").ok(), 25)?,
            graph_timeout_secs: parse_secs(
                "GRAPH_TIMEOUT_SEC",
                env::var("GRAPH_TIMEOUT_SEC").ok(),
                60,
            )?,
            corpus_path: non_empty(env::var("TRAVEL_CORPUS_PATH").ok()).map(PathBuf::from),
        };

        if !config.graph_config().covers_two_external_calls() {
            tracing::warn!(
                llm_timeout_secs = config.llm_timeout_secs,
                graph_timeout_secs = config.graph_timeout_secs,
                "GRAPH_TIMEOUT_SEC should exceed twice LLM_TIMEOUT_SEC; slow clarify turns will time out instead of falling back"
            );
        }

        Ok(config)
    }

    pub fn graph_config(&self) -> GraphConfig {
        GraphConfig::new()
            .with_llm_timeout_secs(self.llm_timeout_secs)
            .with_graph_timeout_secs(self.graph_timeout_secs)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_secs(name: &str, value: Option<String>, default: u64) -> Result<u64> {
    match non_empty(value) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("{} must be a whole number of seconds", name)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_secs() {
        assert_eq!(parse_secs("X", None, 25).unwrap(), 25);
        assert_eq!(parse_secs("X", Some("  ".into()), 25).unwrap(), 25);
        assert_eq!(parse_secs("X", Some("40".into()), 25).unwrap(), 40);

        let err = parse_secs("LLM_TIMEOUT_SEC", Some("soon".into()), 25).unwrap_err();
        assert!(err.to_string().contains("LLM_TIMEOUT_SEC"));
    }

    #[test]
    fn test_graph_config_keeps_floors() {
        let config = Config {
            openai_api_key: None,
            openai_base_url: None,
            model: "gpt-4o-mini".into(),
            llm_timeout_secs: 1,
            graph_timeout_secs: 1,
            corpus_path: None,
        };
        let graph = config.graph_config();
        assert_eq!(graph.llm_timeout().as_secs(), 10);
        assert_eq!(graph.graph_timeout().as_secs(), 15);
    }

    #[test]
    fn test_long_llm_timeout_lacks_headroom() {
        let config = Config {
            openai_api_key: None,
            openai_base_url: None,
            model: "gpt-4o-mini".into(),
            llm_timeout_secs: 40,
            graph_timeout_secs: 60,
            corpus_path: None,
        };
        assert!(!config.graph_config().covers_two_external_calls());
    }
}
