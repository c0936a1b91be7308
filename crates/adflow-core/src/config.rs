use crate::error::Result;
use crate::paths;
use crate::types::Channel;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// EngineConfig
// ---------------------------------------------------------------------------

/// Policy knobs for the classifier. Every field has a default, so a missing or
/// partial `.adflow/config.yaml` is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    /// Look-ahead for "starts soon" / "ends soon", inclusive, in whole days.
    #[serde(default = "default_window_days")]
    pub window_days: i64,
    /// Channels whose delivery is tracked automatically.
    #[serde(default = "default_digital_channels")]
    pub digital_channels: Vec<Channel>,
    /// Channels that need proof of performance once results are in.
    #[serde(default = "default_proof_required_channels")]
    pub proof_required_channels: Vec<Channel>,
    /// Channels considered complete on results alone.
    #[serde(default = "default_proof_exempt_channels")]
    pub proof_exempt_channels: Vec<Channel>,
}

fn default_version() -> u32 {
    1
}

fn default_window_days() -> i64 {
    7
}

fn default_digital_channels() -> Vec<Channel> {
    vec![
        Channel::Website,
        Channel::Newsletter,
        Channel::Social,
        Channel::Streaming,
    ]
}

fn default_proof_required_channels() -> Vec<Channel> {
    vec![Channel::Print, Channel::Radio]
}

fn default_proof_exempt_channels() -> Vec<Channel> {
    vec![Channel::Podcast]
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            window_days: default_window_days(),
            digital_channels: default_digital_channels(),
            proof_required_channels: default_proof_required_channels(),
            proof_exempt_channels: default_proof_exempt_channels(),
        }
    }
}

impl EngineConfig {
    pub fn is_digital(&self, channel: Channel) -> bool {
        self.digital_channels.contains(&channel)
    }

    pub fn requires_proof(&self, channel: Channel) -> bool {
        self.proof_required_channels.contains(&channel)
    }

    pub fn proof_exempt(&self, channel: Channel) -> bool {
        self.proof_exempt_channels.contains(&channel)
    }

    /// Load `.adflow/config.yaml` under `root`, or defaults when it is absent.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: EngineConfig = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = serde_yaml::to_string(self)?;
        std::fs::write(&path, data)?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        // 1. Window bounds
        if self.window_days < 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!("window_days is negative ({})", self.window_days),
            });
        } else if self.window_days == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "window_days is 0: only same-day starts and ends count as soon"
                    .to_string(),
            });
        } else if self.window_days > 60 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "window_days={} (>60 is unusual; most items will read as soon)",
                    self.window_days
                ),
            });
        }

        // 2. Digital channels never reach the reporting rules
        for channel in &self.proof_required_channels {
            if self.is_digital(*channel) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!(
                        "channel '{channel}' is digital and proof-required; \
                         digital placements never reach the proof rule"
                    ),
                });
            }
        }

        // 3. Contradictory proof settings
        for channel in &self.proof_exempt_channels {
            if self.requires_proof(*channel) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("channel '{channel}' is both proof-required and proof-exempt"),
                });
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let cfg = EngineConfig::load(dir.path()).unwrap();
        assert_eq!(cfg, EngineConfig::default());
        assert_eq!(cfg.window_days, 7);
        assert!(cfg.is_digital(Channel::Website));
        assert!(!cfg.is_digital(Channel::Podcast));
        assert!(cfg.requires_proof(Channel::Radio));
        assert!(cfg.proof_exempt(Channel::Podcast));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".adflow")).unwrap();
        std::fs::write(
            dir.path().join(".adflow/config.yaml"),
            "window_days: 14\n",
        )
        .unwrap();
        let cfg = EngineConfig::load(dir.path()).unwrap();
        assert_eq!(cfg.window_days, 14);
        assert_eq!(cfg.digital_channels, default_digital_channels());
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let mut cfg = EngineConfig::default();
        cfg.proof_exempt_channels.push(Channel::Events);
        cfg.save(dir.path()).unwrap();
        assert_eq!(EngineConfig::load(dir.path()).unwrap(), cfg);
    }

    #[test]
    fn default_config_has_no_warnings() {
        assert!(EngineConfig::default().validate().is_empty());
    }

    #[test]
    fn negative_window_is_an_error() {
        let cfg = EngineConfig {
            window_days: -1,
            ..Default::default()
        };
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].level, WarnLevel::Error);
    }

    #[test]
    fn contradictory_channels_are_flagged() {
        let cfg = EngineConfig {
            proof_required_channels: vec![Channel::Print, Channel::Website],
            proof_exempt_channels: vec![Channel::Print],
            ..Default::default()
        };
        let warnings = cfg.validate();
        assert!(warnings.iter().any(|w| w.message.contains("'website' is digital")));
        assert!(warnings
            .iter()
            .any(|w| w.level == WarnLevel::Error && w.message.contains("'print'")));
    }
}
