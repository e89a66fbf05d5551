//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Selected breathing pattern and session length
//! - Guidance mode, voice and background ambience
//! - Frame rate and haptics for the terminal front-end
//! - Subscription unlock state
//!
//! Configuration is stored at `~/.config/breathe/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::catalog::{
    pattern, BackgroundSound, BreathingPattern, GuidanceMode, SessionLength, VoiceOption,
};
use crate::entitlement::{Entitlements, StaticEntitlements};
use crate::error::{ConfigError, CoreError, Result, ValidationError};
use crate::guidance::GuidanceConfig;
use crate::session::Settings;

/// Pattern id that selects `breathing.custom_pattern`.
pub const CUSTOM_PATTERN_ID: &str = "custom";

/// Breathing-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreathingConfig {
    #[serde(default = "default_pattern_id")]
    pub pattern: String,
    #[serde(default)]
    pub session_length: SessionLength,
    /// User-defined timing, selected with `pattern = "custom"`.
    #[serde(default)]
    pub custom_pattern: Option<BreathingPattern>,
}

/// Audio guidance configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    #[serde(default)]
    pub guide: GuidanceMode,
    #[serde(default)]
    pub voice: VoiceOption,
    #[serde(default = "default_true")]
    pub count_seconds: bool,
    #[serde(default)]
    pub background_sound: BackgroundSound,
    #[serde(default = "default_true")]
    pub music_enabled: bool,
    /// Directory holding `.mp3`/`.wav` cue assets.
    #[serde(default)]
    pub sounds_dir: Option<String>,
}

/// Terminal display configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_fps")]
    pub fps: u32,
    #[serde(default = "default_true")]
    pub haptics: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubscriptionConfig {
    #[serde(default)]
    pub premium_unlocked: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/breathe/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub breathing: BreathingConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub subscription: SubscriptionConfig,
}

fn default_pattern_id() -> String {
    pattern::default_pattern().id
}
fn default_true() -> bool {
    true
}
fn default_fps() -> u32 {
    30
}

impl Default for BreathingConfig {
    fn default() -> Self {
        Self {
            pattern: default_pattern_id(),
            session_length: SessionLength::default(),
            custom_pattern: None,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            guide: GuidanceMode::default(),
            voice: VoiceOption::default(),
            count_seconds: true,
            background_sound: BackgroundSound::default(),
            music_enabled: true,
            sounds_dir: None,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            haptics: true,
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(ConfigError::UnknownKey(key.to_string()));
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                        serde_json::Value::Number(n.into())
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    serde_json::Value::Null if value.trim_start().starts_with('{') => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current
                .get_mut(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        }

        Err(ConfigError::UnknownKey(key.to_string()))
    }

    /// Location of the config file.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be created.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing defaults when no file exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or
    /// parsed, or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key in memory, typed by the value it replaces.
    ///
    /// Premium selections are refused unless the subscription is unlocked.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the new selection is not allowed.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let candidate: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        candidate.check_selection(key)?;
        *self = candidate;
        Ok(())
    }

    /// Set a config value by key and persist it.
    ///
    /// # Errors
    ///
    /// See [`Config::apply`]; additionally fails if the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.apply(key, value)?;
        self.save()?;
        Ok(())
    }

    pub fn entitlements(&self) -> StaticEntitlements {
        StaticEntitlements::new(self.subscription.premium_unlocked)
    }

    /// Resolve the configured pattern id.
    pub fn pattern(&self) -> Result<BreathingPattern, ValidationError> {
        let id = self.breathing.pattern.as_str();
        if id == CUSTOM_PATTERN_ID {
            let custom = self
                .breathing
                .custom_pattern
                .clone()
                .ok_or_else(|| ValidationError::InvalidValue {
                    field: "breathing.custom_pattern".into(),
                    message: "pattern is 'custom' but no custom_pattern is defined".into(),
                })?;
            let custom = BreathingPattern {
                id: CUSTOM_PATTERN_ID.into(),
                premium: false,
                ..custom
            };
            custom.validate()?;
            return Ok(custom);
        }
        pattern::find(id).ok_or_else(|| ValidationError::UnknownId {
            kind: "pattern",
            id: id.to_string(),
        })
    }

    /// Engine settings for the current configuration.
    pub fn settings(&self) -> Result<Settings, ValidationError> {
        Ok(Settings {
            pattern: self.pattern()?,
            session_length: self.breathing.session_length,
            guidance: GuidanceConfig {
                mode: self.audio.guide,
                voice: self.audio.voice,
                count_seconds: self.audio.count_seconds,
            },
            background: self.audio.background_sound,
            music_enabled: self.audio.music_enabled,
        })
    }

    fn check_selection(&self, key: &str) -> Result<(), CoreError> {
        let entitlements = self.entitlements();
        match key {
            "breathing.pattern" | "breathing.custom_pattern" => {
                entitlements.ensure(&self.pattern()?)?;
            }
            "breathing.session_length" => entitlements.ensure(&self.breathing.session_length)?,
            "audio.voice" => entitlements.ensure(&self.audio.voice)?,
            "audio.background_sound" => entitlements.ensure(&self.audio.background_sound)?,
            "display.fps" if self.display.fps == 0 => {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: "fps must be positive".into(),
                }
                .into());
            }
            _ => {}
        }
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.breathing.pattern, "classic_box");
        assert_eq!(parsed.display.fps, 30);
        assert!(parsed.audio.music_enabled);
    }

    #[test]
    fn empty_file_fills_defaults() {
        let parsed: Config = toml::from_str("").unwrap();
        assert_eq!(parsed.audio.guide, GuidanceMode::Voice);
        assert_eq!(parsed.breathing.session_length, SessionLength::Infinite);
        assert!(!parsed.subscription.premium_unlocked);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("audio.voice").as_deref(), Some("default"));
        assert_eq!(cfg.get("display.fps").as_deref(), Some("30"));
        assert_eq!(cfg.get("breathing.session_length").as_deref(), Some("infinite"));
        assert!(cfg.get("audio.missing_key").is_none());
    }

    #[test]
    fn apply_updates_nested_bool() {
        let mut cfg = Config::default();
        cfg.apply("audio.music_enabled", "false").unwrap();
        assert!(!cfg.audio.music_enabled);
    }

    #[test]
    fn apply_updates_enum_by_id() {
        let mut cfg = Config::default();
        cfg.apply("audio.guide", "ping").unwrap();
        assert_eq!(cfg.audio.guide, GuidanceMode::Ping);
    }

    #[test]
    fn apply_rejects_unknown_key() {
        let mut cfg = Config::default();
        let err = cfg.apply("audio.nonexistent_key", "value").unwrap_err();
        assert!(matches!(err, CoreError::Config(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn apply_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.apply("audio.music_enabled", "not_a_bool").is_err());
        assert!(cfg.apply("audio.voice", "robot").is_err());
        assert_eq!(cfg.audio.voice, VoiceOption::Default);
    }

    #[test]
    fn premium_selection_requires_unlock() {
        let mut cfg = Config::default();
        let err = cfg.apply("breathing.pattern", "deep_box").unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::PremiumRequired { .. })
        ));
        assert_eq!(cfg.breathing.pattern, "classic_box");

        cfg.apply("subscription.premium_unlocked", "true").unwrap();
        cfg.apply("breathing.pattern", "deep_box").unwrap();
        cfg.apply("audio.background_sound", "rain_sounds").unwrap();
        assert_eq!(cfg.settings().unwrap().pattern.id, "deep_box");
    }

    #[test]
    fn unknown_pattern_is_rejected() {
        let mut cfg = Config::default();
        assert!(cfg.apply("breathing.pattern", "triangle").is_err());
    }

    #[test]
    fn custom_pattern_is_free_and_validated() {
        let mut cfg = Config::default();
        cfg.apply(
            "breathing.custom_pattern",
            r#"{"id":"mine","name":"Mine","inhale_secs":3,"hold_after_inhale_secs":0,"exhale_secs":6,"hold_after_exhale_secs":0,"premium":true}"#,
        )
        .unwrap();
        cfg.apply("breathing.pattern", "custom").unwrap();
        let settings = cfg.settings().unwrap();
        assert_eq!(settings.pattern.id, CUSTOM_PATTERN_ID);
        assert!(!settings.pattern.premium);
        assert_eq!(settings.pattern.cycle_duration(), 9.0);
    }

    #[test]
    fn zero_fps_is_rejected() {
        let mut cfg = Config::default();
        assert!(cfg.apply("display.fps", "0").is_err());
        assert_eq!(cfg.display.fps, 30);
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(cfg.breathing.pattern, "classic_box");
    }

    #[test]
    fn unreadable_file_is_an_error_and_left_intact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let bytes = b"[breathing]\npattern = \"\xff\"\n";
        std::fs::write(&path, bytes).unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Config(ConfigError::LoadFailed { .. })
        ));
        assert_eq!(std::fs::read(&path).unwrap(), bytes.to_vec());
    }

    #[test]
    fn load_from_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "breathing = 3").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
