use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::controller::DEFAULT_NICKNAME;
use crate::error::Result;
use crate::range::{Difficulty, RangeConfig};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub difficulty: Difficulty,
    /// Overrides the difficulty preset when set
    pub custom_range: Option<RangeConfig>,
    pub nickname: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            custom_range: None,
            nickname: DEFAULT_NICKNAME.to_string(),
        }
    }
}

impl Config {
    pub fn range(&self) -> RangeConfig {
        self.custom_range.unwrap_or_else(|| self.difficulty.range())
    }

    /// Remember `range`, as a preset when it matches one
    pub fn remember_range(&mut self, range: RangeConfig) {
        match Difficulty::ALL.iter().find(|d| d.range() == range) {
            Some(difficulty) => {
                self.difficulty = *difficulty;
                self.custom_range = None;
            }
            None => self.custom_range = Some(range),
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "guessr") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("guessr_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(path = %self.path.display(), "ignoring unreadable config: {}", e);
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}
