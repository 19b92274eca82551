use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Greeting(s) shown before the conversation starts.
///
/// Accepts either a single string or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InitialMessages {
    One(String),
    Many(Vec<String>),
}

impl InitialMessages {
    /// Greetings in display order. An empty single string means no greeting.
    pub fn as_slice(&self) -> &[String] {
        match self {
            InitialMessages::One(text) if text.is_empty() => &[][..],
            InitialMessages::One(text) => std::slice::from_ref(text),
            InitialMessages::Many(texts) => texts,
        }
    }
}

impl Default for InitialMessages {
    fn default() -> Self {
        InitialMessages::Many(Vec::new())
    }
}

impl From<&str> for InitialMessages {
    fn from(text: &str) -> Self {
        InitialMessages::One(text.to_string())
    }
}

impl From<Vec<String>> for InitialMessages {
    fn from(texts: Vec<String>) -> Self {
        InitialMessages::Many(texts)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    pub initial: InitialMessages,
    /// Shown once an action has finished and nothing more specific is available.
    pub done: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            initial: InitialMessages::default(),
            done: "✓ Done".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Icons {
    pub spinner_icon: String,
}

impl Default for Icons {
    fn default() -> Self {
        Self {
            spinner_icon: "⠋".to_string(),
        }
    }
}

/// Labels and icons used when rendering a transcript.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub labels: Labels,
    pub icons: Icons,
}

impl ChatConfig {
    /// `<config dir>/chat-transcript/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("chat-transcript").join("config.json"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        debug!("Loaded chat config from {}", path.display());
        Ok(config)
    }

    /// Load `path` (or the default location); fall back to defaults when the
    /// file does not exist.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let path = match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(path) => path,
            None => return Ok(Self::default()),
        };
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn initial_accepts_string_or_list() {
        let one: Labels = serde_json::from_str(r#"{"initial": "Hi!"}"#).unwrap();
        assert_eq!(one.initial.as_slice(), ["Hi!".to_string()]);
        assert_eq!(one.done, "✓ Done");

        let many: Labels =
            serde_json::from_str(r#"{"initial": ["Hi!", "How can I help?"], "done": "ok"}"#)
                .unwrap();
        assert_eq!(many.initial.as_slice().len(), 2);
        assert_eq!(many.done, "ok");
    }

    #[test]
    fn empty_single_greeting_is_no_greeting() {
        assert!(InitialMessages::from("").as_slice().is_empty());
        assert!(InitialMessages::default().as_slice().is_empty());
    }

    #[test]
    fn load_reads_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"labels": {{"initial": "Hello"}}, "icons": {{"spinnerIcon": "*"}}}}"#
        )
        .unwrap();

        let config = ChatConfig::load(file.path()).unwrap();
        assert_eq!(config.labels.initial, InitialMessages::from("Hello"));
        assert_eq!(config.icons.spinner_icon, "*");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ChatConfig::load_or_default(Some(&dir.path().join("none.json"))).unwrap();
        assert_eq!(config, ChatConfig::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();
        let err = ChatConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }
}
