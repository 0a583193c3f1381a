use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub search: SearchConfig,
    pub llm: LLMConfig,
    pub enrichment: EnrichmentConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    pub parallel_api_key: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_results: usize,
    pub max_attempts: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LLMConfig {
    pub openai_api_key: String,
    pub base_url: String,
    pub default_model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnrichmentConfig {
    /// Number of results enriched at the same time
    pub concurrency: usize,
    /// Cap applied by the JSON search endpoint
    pub api_result_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Self {
            server: ServerConfig {
                port: var("PORT", "5000")
                    .parse()
                    .context("PORT must be a valid port number")?,
                host: var("HOST", "0.0.0.0"),
                cors_allowed_origins: var("ALLOWED_ORIGINS", "*")
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            },
            search: SearchConfig {
                parallel_api_key: var("PARALLEL_API_KEY", ""),
                base_url: var("PARALLEL_API_URL", crate::search::parallel::DEFAULT_BASE_URL),
                timeout_secs: var("SEARCH_TIMEOUT_SECS", "30")
                    .parse()
                    .context("SEARCH_TIMEOUT_SECS must be an integer")?,
                max_results: var("SEARCH_MAX_RESULTS", "10")
                    .parse()
                    .context("SEARCH_MAX_RESULTS must be an integer")?,
                max_attempts: var("SEARCH_MAX_ATTEMPTS", "1")
                    .parse()
                    .context("SEARCH_MAX_ATTEMPTS must be an integer")?,
            },
            llm: LLMConfig {
                openai_api_key: var("OPENAI_API_KEY", ""),
                base_url: var("OPENAI_BASE_URL", crate::llm::openai::DEFAULT_BASE_URL),
                default_model: var("OPENAI_MODEL", "gpt-4o"),
            },
            enrichment: EnrichmentConfig {
                concurrency: var("ENRICH_CONCURRENCY", "4")
                    .parse()
                    .context("ENRICH_CONCURRENCY must be an integer")?,
                api_result_limit: var("API_RESULT_LIMIT", "5")
                    .parse()
                    .context("API_RESULT_LIMIT must be an integer")?,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.cors_allowed_origins, vec!["*".to_string()]);
        assert!(config.search.parallel_api_key.is_empty());
        assert_eq!(config.search.timeout_secs, 30);
        assert_eq!(config.search.max_results, 10);
        assert_eq!(config.search.max_attempts, 1);
        assert_eq!(config.llm.base_url, "https://api.openai.com/v1");
        assert_eq!(config.enrichment.concurrency, 4);
        assert_eq!(config.enrichment.api_result_limit, 5);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "8080"),
            ("ALLOWED_ORIGINS", "http://a.test, http://b.test"),
            ("PARALLEL_API_KEY", "search-key"),
            ("OPENAI_MODEL", "gpt-4o-mini"),
            ("ENRICH_CONCURRENCY", "2"),
        ]))
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(
            config.server.cors_allowed_origins,
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
        assert_eq!(config.search.parallel_api_key, "search-key");
        assert_eq!(config.llm.default_model, "gpt-4o-mini");
        assert_eq!(config.enrichment.concurrency, 2);
    }

    #[test]
    fn test_invalid_number_is_error() {
        let result = Config::from_lookup(lookup_from(&[("SEARCH_TIMEOUT_SECS", "soon")]));
        assert!(result.is_err());
    }
}
