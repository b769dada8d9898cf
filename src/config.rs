use std::env;
use std::path::PathBuf;

/// Credentials for the hosted voice assistant.
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    pub api_url: String,
    pub api_key: String,
    pub assistant_id: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub ledger_path: PathBuf,
    pub category_ledger_path: PathBuf,
    pub static_path: PathBuf,
    pub voice: Option<VoiceConfig>,
}

pub const DEFAULT_VOICE_API_URL: &str = "https://api.vapi.ai";

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let voice = match (
            non_empty_var("SPENDWISE_VOICE_API_KEY"),
            non_empty_var("SPENDWISE_VOICE_ASSISTANT_ID"),
        ) {
            (Some(api_key), Some(assistant_id)) => Some(VoiceConfig {
                api_url: non_empty_var("SPENDWISE_VOICE_API_URL")
                    .unwrap_or_else(|| DEFAULT_VOICE_API_URL.into()),
                api_key,
                assistant_id,
            }),
            _ => None,
        };

        Self {
            host: env::var("SPENDWISE_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("SPENDWISE_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8060),
            ledger_path: env::var("SPENDWISE_LEDGER_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/transactions.csv")),
            category_ledger_path: env::var("SPENDWISE_CATEGORY_LEDGER_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/categorized_transactions.csv")),
            static_path: env::var("SPENDWISE_STATIC_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("static")),
            voice,
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
