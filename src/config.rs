//! Configuration types for the voice interaction engine.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration for the voice front end.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// Interface language settings.
    pub language: LanguageConfig,
    /// Role-selection voice agent settings.
    pub role_agent: RoleAgentConfig,
    /// Chat surface settings.
    pub chat: ChatConfig,
}

/// Interface language configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageConfig {
    /// Interface language code: `en` or `hi`.
    pub code: String,
    /// Speech rate hint for host synthesizers (1.0 = normal).
    pub speech_rate: f32,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            code: "en".to_owned(),
            speech_rate: 0.9,
        }
    }
}

impl LanguageConfig {
    /// BCP-47 tag for capture and synthesis. Unknown codes fall back to
    /// the English-India tag.
    pub fn bcp47(&self) -> &'static str {
        match self.code.as_str() {
            "hi" => "hi-IN",
            _ => "en-IN",
        }
    }
}

/// Role-selection voice agent configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleAgentConfig {
    /// Prompt spoken when the agent starts listening.
    pub welcome_prompt: String,
    /// BCP-47 tag used for role detection capture and prompts.
    ///
    /// Role keywords are English, so this stays `en-IN` regardless of the
    /// interface language.
    pub language: String,
    /// Delay in ms between speaking the confirmation and invoking the
    /// role-change sink, so the confirmation can be heard.
    pub confirm_delay_ms: u64,
}

impl Default for RoleAgentConfig {
    fn default() -> Self {
        Self {
            welcome_prompt: "Welcome to Agri AI. Are you a Farmer, Seller, or Buyer? \
                             Please say your role."
                .to_owned(),
            language: "en-IN".to_owned(),
            confirm_delay_ms: 800,
        }
    }
}

/// Chat surface configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Delay in ms before the surface appends the bot reply, to keep the
    /// exchange readable.
    pub reply_delay_ms: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self { reply_delay_ms: 300 }
    }
}

impl VoiceConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| crate::error::VoiceError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &std::path::Path) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::VoiceError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `~/.config/agrivoice/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config).join("agrivoice").join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("agrivoice")
                .join("config.toml")
        } else {
            PathBuf::from("/tmp/agrivoice-config/config.toml")
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = VoiceConfig::default();
        assert!(!config.role_agent.welcome_prompt.is_empty());
        assert!(config.role_agent.confirm_delay_ms > 0);
        assert_eq!(config.language.bcp47(), "en-IN");
        assert!(config.language.speech_rate > 0.0);
    }

    #[test]
    fn language_tag_mapping() {
        let mut language = LanguageConfig::default();
        language.code = "hi".to_owned();
        assert_eq!(language.bcp47(), "hi-IN");
        language.code = "xx".to_owned();
        assert_eq!(language.bcp47(), "en-IN");
    }

    #[test]
    fn toml_round_trip() {
        let config = VoiceConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let loaded: VoiceConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(loaded.role_agent.confirm_delay_ms, config.role_agent.confirm_delay_ms);
        assert_eq!(loaded.language.code, config.language.code);
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let config: VoiceConfig = toml::from_str(
            r#"
            [role_agent]
            confirm_delay_ms = 100
            "#,
        )
        .unwrap();
        assert_eq!(config.role_agent.confirm_delay_ms, 100);
        assert_eq!(config.language.code, "en");
        assert_eq!(config.chat.reply_delay_ms, 300);
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = VoiceConfig::default();
        config.language.code = "hi".to_owned();
        config.save_to_file(&path).unwrap();
        let loaded = VoiceConfig::from_file(&path).unwrap();
        assert_eq!(loaded.language.code, "hi");
    }
}
