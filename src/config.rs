use anyhow::Result;
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LLMConfig,
    pub wallet: WalletConfig,
    pub payment: PaymentConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LLMConfig {
    /// Base URL of an OpenAI-compatible endpoint (Ollama, vLLM, OpenAI...)
    pub api_base: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WalletConfig {
    /// Where the agent reaches the wallet service in production mode
    pub service_url: String,
    pub mint_url: String,
    pub storage_path: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    pub dev_mode: bool,
    pub allow_debug_tokens: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    /// Missing keys fall back to the development defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let dev_mode = parse_flag(&var("DEV_MODE", "true"));
        let allow_debug_tokens = match lookup("ALLOW_DEBUG_TOKENS") {
            Some(value) => parse_flag(&value),
            None => dev_mode,
        };

        Ok(Self {
            server: ServerConfig {
                port: var("PORT", "8000").parse()?,
                host: var("HOST", "0.0.0.0"),
            },
            llm: LLMConfig {
                api_base: var("OPENAI_API_BASE", "http://localhost:11434/v1"),
                api_key: var("OPENAI_API_KEY", "not-needed"),
                model: var("MODEL_NAME", "llama3.2"),
                temperature: var("MODEL_TEMPERATURE", "0.7").parse()?,
            },
            wallet: WalletConfig {
                service_url: var("WALLET_URL", "http://localhost:8000"),
                mint_url: var("MINT_URL", "https://mint.minibits.cash/Bitcoin"),
                storage_path: var("WALLET_DB_PATH", "data/wallet"),
                timeout_secs: var("WALLET_TIMEOUT_SECS", "30").parse()?,
            },
            payment: PaymentConfig {
                dev_mode,
                allow_debug_tokens,
            },
        })
    }
}

fn parse_flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}
