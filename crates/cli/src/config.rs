//! `lucky.toml` configuration.
//!
//! Every field is optional; a missing file means defaults.
//!
//! # Example
//!
//! ```toml
//! [storage]
//! data_dir = ".lucky-select"
//!
//! [reels]
//! count = 3
//! stagger_ms = 300
//! settle_ms = 4500
//! reveal_pause_ms = 300
//! flash_ms = 400
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use lucky_core::{SequencerConfig, MAX_REEL_COUNT, MAX_TIMING};
use serde::{Deserialize, Serialize};

/// File picked up from the working directory when `--config` is not given.
pub(crate) const DEFAULT_CONFIG_FILE: &str = "lucky.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct LuckyConfig {
    pub(crate) storage: StorageSettings,
    pub(crate) reels: ReelSettings,
}

/// `[storage]`: where durable records live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct StorageSettings {
    pub(crate) data_dir: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            data_dir: PathBuf::from(".lucky-select"),
        }
    }
}

/// `[reels]`: reel count and animation timings in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ReelSettings {
    pub(crate) count: usize,
    pub(crate) stagger_ms: u64,
    pub(crate) settle_ms: u64,
    pub(crate) reveal_pause_ms: u64,
    pub(crate) flash_ms: u64,
}

impl Default for ReelSettings {
    fn default() -> Self {
        let d = SequencerConfig::default();
        ReelSettings {
            count: d.reels,
            stagger_ms: d.stagger.as_millis() as u64,
            settle_ms: d.settle.as_millis() as u64,
            reveal_pause_ms: d.reveal_pause.as_millis() as u64,
            flash_ms: d.flash.as_millis() as u64,
        }
    }
}

impl LuckyConfig {
    /// Load `explicit` if given, else `./lucky.toml` if present, else defaults.
    ///
    /// Returns a human-readable error string on failure.
    pub(crate) fn load(explicit: Option<&Path>) -> Result<Self, String> {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.is_file() {
                    return Ok(LuckyConfig::default());
                }
                default
            }
        };
        let content = std::fs::read_to_string(&path)
            .map_err(|e| format!("could not read '{}': {}", path.display(), e))?;
        let config = Self::parse(&content)
            .map_err(|e| format!("could not parse '{}': {}", path.display(), e))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub(crate) fn parse(content: &str) -> Result<Self, String> {
        let config: LuckyConfig = toml::from_str(content).map_err(|e| e.to_string())?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), String> {
        let r = &self.reels;
        if r.count == 0 {
            return Err("reels.count must be at least 1".to_string());
        }
        if r.count > MAX_REEL_COUNT {
            return Err(format!("reels.count must be at most {}", MAX_REEL_COUNT));
        }
        let max_ms = MAX_TIMING.as_millis() as u64;
        for (key, value) in [
            ("stagger_ms", r.stagger_ms),
            ("settle_ms", r.settle_ms),
            ("reveal_pause_ms", r.reveal_pause_ms),
            ("flash_ms", r.flash_ms),
        ] {
            if value > max_ms {
                return Err(format!("reels.{} must be at most {}", key, max_ms));
            }
        }
        if self.storage.data_dir.as_os_str().is_empty() {
            return Err("storage.data_dir must not be empty".to_string());
        }
        Ok(())
    }

    /// Sequencer settings; `instant` zeroes every timing.
    pub(crate) fn sequencer(&self, instant: bool) -> SequencerConfig {
        let r = &self.reels;
        let config = SequencerConfig {
            reels: r.count,
            stagger: Duration::from_millis(r.stagger_ms),
            settle: Duration::from_millis(r.settle_ms),
            reveal_pause: Duration::from_millis(r.reveal_pause_ms),
            flash: Duration::from_millis(r.flash_ms),
        };
        if instant {
            config.instant()
        } else {
            config
        }
    }
}
