use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use std::fmt;

#[derive(Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub enable_file_logs: bool,
    pub log_dir: String,
    pub cors_origin: String,
    pub static_dir: String,
    pub generator: GeneratorConfig,
    pub field: FieldConfig,
    pub limits: LimitsConfig,
}

#[derive(Clone)]
pub struct GeneratorConfig {
    pub enabled: bool,
    pub mock: bool,
    pub api_url: String,
    pub api_key: String,
    pub text_model: String,
    pub image_model: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct FieldConfig {
    pub width: f32,
    pub height: f32,
    pub fps: u32,
    /// Fixed RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct LimitsConfig {
    pub max_sse_connections: usize,
    pub max_input_chars: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_sse_connections: 64,
            max_input_chars: 200_000,
        }
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            fps: 60,
            seed: None,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("log_level", &self.log_level)
            .field("enable_file_logs", &self.enable_file_logs)
            .field("log_dir", &self.log_dir)
            .field("cors_origin", &self.cors_origin)
            .field("static_dir", &self.static_dir)
            .field("generator", &self.generator)
            .field("field", &self.field)
            .field("limits", &self.limits)
            .finish()
    }
}

impl fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("enabled", &self.enabled)
            .field("mock", &self.mock)
            .field("api_url", &self.api_url)
            .field("api_key", &"***REDACTED***")
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl GeneratorConfig {
    /// Offline configuration: generation answers from the built-in mock.
    pub fn mock() -> Self {
        Self {
            enabled: true,
            mock: true,
            api_url: String::new(),
            api_key: String::new(),
            text_model: "gemini-3-pro-preview".to_string(),
            image_model: "gemini-2.5-flash-image".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let seed_raw = env_or("FIELD_SEED", "");
        Self {
            host: env_or_parse("HOST", IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))),
            port: env_or_parse("PORT", 3000_u16),
            log_level: env_or("RUST_LOG", "info"),
            enable_file_logs: env_or_bool("ENABLE_FILE_LOGS", false),
            log_dir: env_or("LOG_DIR", "./logs"),
            cors_origin: env_or("CORS_ORIGIN", "http://localhost:5173"),
            static_dir: env_or("STATIC_DIR", "static"),
            generator: GeneratorConfig {
                enabled: env_or_bool("GENERATOR_ENABLED", true),
                mock: env_or_bool("GENERATOR_MOCK", true),
                api_url: env_or(
                    "GENERATOR_API_URL",
                    "https://generativelanguage.googleapis.com/v1beta",
                ),
                api_key: env_or("GENERATOR_API_KEY", ""),
                text_model: env_or("GENERATOR_TEXT_MODEL", "gemini-3-pro-preview"),
                image_model: env_or("GENERATOR_IMAGE_MODEL", "gemini-2.5-flash-image"),
                timeout_secs: env_or_parse("GENERATOR_TIMEOUT_SECS", 60_u64),
            },
            field: FieldConfig {
                width: env_or_parse("FIELD_WIDTH", 1280.0_f32),
                height: env_or_parse("FIELD_HEIGHT", 720.0_f32),
                fps: env_or_parse("FIELD_FPS", 60_u32).clamp(1, 240),
                seed: seed_raw.trim().parse::<u64>().ok(),
            },
            limits: LimitsConfig {
                max_sse_connections: env_or_parse("MAX_SSE_CONNECTIONS", 64_usize),
                max_input_chars: env_or_parse("MAX_INPUT_CHARS", 200_000_usize),
            },
        }
    }
}

pub fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn env_or_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match env::var(key) {
        Ok(raw) => match raw.parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(
                    key,
                    value = %raw,
                    "Failed to parse env var, using default"
                );
                default
            }
        },
        Err(_) => default,
    }
}

pub fn env_or_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}
