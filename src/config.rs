use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub notes: NotesConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotesConfig {
    /// Root of the note vault. Must exist when the scanner runs.
    pub root: PathBuf,
    /// Note file extension, without the leading dot.
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Extra exclude globs, added to the built-in defaults
    /// (`.git`, `.obsidian`, `node_modules`).
    #[serde(default)]
    pub exclude_globs: Vec<String>,
}

fn default_extension() -> String {
    "md".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Generative backend: `gemini` or `ollama`.
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Base URL override. Defaults to the provider's public endpoint
    /// (Gemini) or `http://localhost:11434` (Ollama).
    #[serde(default)]
    pub url: Option<String>,
    /// Timeout for non-streaming requests, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_provider() -> String {
    "gemini".to_string()
}
fn default_model() -> String {
    "gemini-2.5-flash-lite".to_string()
}
fn default_timeout_secs() -> u64 {
    120
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    /// Keyword-match rounds before giving up with the sentinel result.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Maximum number of notes assembled into the chat context.
    #[serde(default = "default_max_notes")]
    pub max_notes: usize,
    /// Character budget for the assembled chat context.
    #[serde(default = "default_max_context_chars")]
    pub max_context_chars: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            max_notes: default_max_notes(),
            max_context_chars: default_max_context_chars(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}
fn default_max_notes() -> usize {
    8
}
fn default_max_context_chars() -> usize {
    24_000
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.notes.root.as_os_str().is_empty() {
        anyhow::bail!("notes.root must be set");
    }

    if config.retrieval.max_attempts < 1 {
        anyhow::bail!("retrieval.max_attempts must be >= 1");
    }
    if config.retrieval.max_notes < 1 {
        anyhow::bail!("retrieval.max_notes must be >= 1");
    }
    if config.retrieval.max_context_chars < 1 {
        anyhow::bail!("retrieval.max_context_chars must be >= 1");
    }

    match config.provider.provider.as_str() {
        "gemini" | "ollama" => {}
        other => anyhow::bail!("Unknown provider: '{}'. Must be gemini or ollama.", other),
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_minimal_config_applies_defaults() {
        let file = write_config("[notes]\nroot = \"/tmp/vault\"\n");
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.notes.extension, "md");
        assert_eq!(config.provider.provider, "gemini");
        assert_eq!(config.retrieval.max_attempts, 3);
        assert_eq!(config.retrieval.max_notes, 8);
        assert_eq!(config.retrieval.max_context_chars, 24_000);
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let file = write_config("[notes]\nroot = \"/tmp/vault\"\n\n[provider]\nprovider = \"openai\"\n");
        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("Unknown provider"));
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let file =
            write_config("[notes]\nroot = \"/tmp/vault\"\n\n[retrieval]\nmax_attempts = 0\n");
        assert!(load_config(file.path()).is_err());
    }
}
