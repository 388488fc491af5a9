use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::error;

const DEFAULT_PORT: u16 = 5001;
const DEFAULT_API_BASE_URL: &str = "https://api.groq.com/openai/v1";
const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

// ─── LlmConfig ────────────────────────────────────────────────────────────────

/// Generation parameters for the outbound chat-completions call
/// (`[llm]` in config.toml). Defaults mirror what the planner was tuned with.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Model identifier sent to the completion endpoint.
    pub model: String,
    /// Maximum output tokens per plan generation. Default: 1000.
    pub max_tokens: u32,
    /// Sampling temperature. Default: 0.7.
    pub temperature: f32,
    /// Nucleus sampling threshold. Default: 0.9.
    pub top_p: f32,
    /// Request timeout in seconds. A timeout surfaces as an upstream error
    /// rather than hanging the request. Default: 60.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 1000,
            temperature: 0.7,
            top_p: 0.9,
            timeout_secs: 60,
        }
    }
}

// ─── TOML config file ─────────────────────────────────────────────────────────

/// `{data_dir}/config.toml` — all fields are optional overrides.
/// Priority: CLI / env var  >  TOML  >  built-in default.
#[derive(Deserialize, Default)]
struct TomlConfig {
    /// HTTP server port (default: 5001).
    port: Option<u16>,
    /// Log level filter string, e.g. "debug", "info,pland=trace" (default: "info").
    log: Option<String>,
    /// Log output format: "pretty" (default) | "json".
    log_format: Option<String>,
    /// Bind address for the HTTP server (default: "127.0.0.1").
    bind_address: Option<String>,
    /// API key for the completion endpoint. Prefer the PLAND_API_KEY env var.
    api_key: Option<String>,
    /// Override the completion API base URL.
    api_base_url: Option<String>,
    /// Generation parameters (`[llm]`).
    llm: Option<LlmConfig>,
}

fn load_toml(data_dir: &Path) -> Option<TomlConfig> {
    let path = data_dir.join("config.toml");
    let contents = std::fs::read_to_string(&path).ok()?;
    match toml::from_str::<TomlConfig>(&contents) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            error!(path = %path.display(), err = %e, "failed to parse config.toml — using defaults");
            None
        }
    }
}

// ─── DaemonConfig ─────────────────────────────────────────────────────────────

/// Process-wide immutable configuration, built once at startup and shared
/// behind an `Arc`. The API key lives here, not in a mutable global.
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub port: u16,
    pub data_dir: PathBuf,
    pub log: String,
    /// Log output format: "pretty" (default) | "json".
    pub log_format: String,
    /// Bind address for the HTTP server (PLAND_BIND env var, default: "127.0.0.1").
    pub bind_address: String,
    /// Bearer key for the completion endpoint (PLAND_API_KEY env var).
    /// Empty means unauthenticated — plan generation will fail upstream.
    pub api_key: String,
    /// Completion API base URL (PLAND_API_URL env var).
    pub api_base_url: String,
    /// Generation parameters for plan requests.
    pub llm: LlmConfig,
}

impl DaemonConfig {
    /// Build config from CLI/env args + optional TOML file.
    ///
    /// Priority (highest to lowest):
    ///   1. CLI / env — passed as `Some(value)` from clap
    ///   2. TOML file at `{data_dir}/config.toml`
    ///   3. Built-in defaults
    pub fn new(
        port: Option<u16>,
        data_dir: Option<PathBuf>,
        log: Option<String>,
        bind_address: Option<String>,
        api_key: Option<String>,
    ) -> Self {
        let data_dir = data_dir.unwrap_or_else(default_data_dir);

        // Load TOML as the lowest-priority override layer
        let toml = load_toml(&data_dir).unwrap_or_default();

        let port = port.or(toml.port).unwrap_or(DEFAULT_PORT);
        let log = log.or(toml.log).unwrap_or_else(|| "info".to_string());

        let log_format = std::env::var("PLAND_LOG_FORMAT")
            .ok()
            .filter(|s| !s.is_empty())
            .or(toml.log_format)
            .unwrap_or_else(|| "pretty".to_string());

        let bind_address = bind_address
            .or(std::env::var("PLAND_BIND").ok().filter(|s| !s.is_empty()))
            .or(toml.bind_address)
            .unwrap_or_else(default_bind_address);

        let api_key = api_key
            .or(std::env::var("PLAND_API_KEY").ok().filter(|s| !s.is_empty()))
            .or(toml.api_key)
            .unwrap_or_default();

        let api_base_url = std::env::var("PLAND_API_URL")
            .ok()
            .filter(|s| !s.is_empty())
            .or(toml.api_base_url)
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let llm = toml.llm.unwrap_or_default();

        Self {
            port,
            data_dir,
            log,
            log_format,
            bind_address,
            api_key,
            api_base_url,
            llm,
        }
    }
}

fn default_data_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        // ~/Library/Application Support/pland
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("pland");
        }
    }
    #[cfg(target_os = "linux")]
    {
        // $XDG_DATA_HOME/pland or ~/.local/share/pland
        if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
            return PathBuf::from(xdg).join("pland");
        }
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home)
                .join(".local")
                .join("share")
                .join("pland");
        }
    }
    #[cfg(target_os = "windows")]
    {
        // %APPDATA%\pland
        if let Ok(appdata) = std::env::var("APPDATA") {
            return PathBuf::from(appdata).join("pland");
        }
    }
    // Fallback
    PathBuf::from(".pland")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_toml() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = DaemonConfig::new(None, Some(dir.path().to_path_buf()), None, None, None);
        assert_eq!(cfg.port, DEFAULT_PORT);
        assert_eq!(cfg.llm.model, DEFAULT_MODEL);
        assert_eq!(cfg.llm.max_tokens, 1000);
        assert_eq!(cfg.bind_address, "127.0.0.1");
    }

    #[test]
    fn toml_overrides_defaults_and_cli_wins() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.toml"),
            "port = 6001\nlog = \"debug\"\n\n[llm]\nmax_tokens = 512\n",
        )
        .unwrap();
        let cfg = DaemonConfig::new(
            Some(7001),
            Some(dir.path().to_path_buf()),
            None,
            None,
            None,
        );
        assert_eq!(cfg.port, 7001, "CLI beats TOML");
        assert_eq!(cfg.log, "debug");
        assert_eq!(cfg.llm.max_tokens, 512);
        assert_eq!(cfg.llm.temperature, 0.7, "unset [llm] fields keep defaults");
    }
}
