use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use dotenvy::dotenv;

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub listen_addr: SocketAddr,
    /// host:port the browser uses to reach this server.
    pub reachable_addr: String,
    /// Where the widget posts `msg`.
    pub chat_endpoint: String,
    pub llm: LlmConfig,
    pub retrieval: RetrievalConfig,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LlmConfig {
    pub api_base: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RetrievalConfig {
    /// Directory scanned for `*.pdf` at startup.
    pub data_dir: PathBuf,
    pub embedding_model: String,
    pub top_k: usize,
}

impl Config {
    /// Reads the process environment after loading `.env`, if present.
    pub fn from_env() -> Result<Config> {
        dotenv().ok();
        Config::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Config> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let listen_addr = var("LISTEN_ADDR", "0.0.0.0:8080");
        let listen_addr = listen_addr
            .parse()
            .with_context(|| format!("LISTEN_ADDR is not a socket address: {listen_addr}"))?;

        let reachable_addr = var("REACHABLE_ADDR", "127.0.0.1:8080");
        let chat_endpoint = lookup("CHAT_ENDPOINT")
            .unwrap_or_else(|| format!("http://{reachable_addr}/get"));

        let temperature = var("LLM_TEMPERATURE", "0.4");
        let temperature = temperature
            .parse()
            .with_context(|| format!("LLM_TEMPERATURE is not a number: {temperature}"))?;

        let api_key = lookup("LLM_API_KEY")
            .or_else(|| lookup("OPENAI_API_KEY"))
            .unwrap_or_else(|| "ollama".to_string());

        let top_k = var("RETRIEVAL_TOP_K", "5");
        let top_k = top_k
            .parse()
            .with_context(|| format!("RETRIEVAL_TOP_K is not a count: {top_k}"))?;

        Ok(Config {
            listen_addr,
            reachable_addr,
            chat_endpoint,
            llm: LlmConfig {
                api_base: var("LLM_API_BASE", "http://localhost:11434/v1"),
                api_key,
                model: var("LLM_MODEL", "mistral"),
                temperature,
            },
            retrieval: RetrievalConfig {
                data_dir: PathBuf::from(var("DATA_DIR", "Data")),
                embedding_model: var("EMBEDDING_MODEL", "all-minilm"),
                top_k,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_target_local_ollama() {
        let config = load(&[]).unwrap();
        assert_eq!(config.listen_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.reachable_addr, "127.0.0.1:8080");
        assert_eq!(config.chat_endpoint, "http://127.0.0.1:8080/get");
        assert_eq!(config.llm.api_base, "http://localhost:11434/v1");
        assert_eq!(config.llm.model, "mistral");
        assert_eq!(config.llm.api_key, "ollama");
        assert_eq!(config.llm.temperature, 0.4);
        assert_eq!(config.retrieval.data_dir, PathBuf::from("Data"));
        assert_eq!(config.retrieval.embedding_model, "all-minilm");
        assert_eq!(config.retrieval.top_k, 5);
    }

    #[test]
    fn endpoint_follows_reachable_addr_unless_overridden() {
        let config = load(&[("REACHABLE_ADDR", "chat.local:3030")]).unwrap();
        assert_eq!(config.chat_endpoint, "http://chat.local:3030/get");

        let config = load(&[
            ("REACHABLE_ADDR", "chat.local:3030"),
            ("CHAT_ENDPOINT", "http://backend:9000/get"),
        ])
        .unwrap();
        assert_eq!(config.chat_endpoint, "http://backend:9000/get");
    }

    #[test]
    fn llm_key_prefers_its_own_variable() {
        let config = load(&[("OPENAI_API_KEY", "sk-openai")]).unwrap();
        assert_eq!(config.llm.api_key, "sk-openai");

        let config = load(&[("OPENAI_API_KEY", "sk-openai"), ("LLM_API_KEY", "sk-llm")]).unwrap();
        assert_eq!(config.llm.api_key, "sk-llm");
    }

    #[test]
    fn malformed_values_name_the_variable() {
        let err = load(&[("LISTEN_ADDR", "localhost")]).unwrap_err();
        assert!(err.to_string().contains("LISTEN_ADDR"));

        let err = load(&[("LLM_TEMPERATURE", "warm")]).unwrap_err();
        assert!(err.to_string().contains("LLM_TEMPERATURE"));

        let err = load(&[("RETRIEVAL_TOP_K", "-1")]).unwrap_err();
        assert!(err.to_string().contains("RETRIEVAL_TOP_K"));
    }
}
