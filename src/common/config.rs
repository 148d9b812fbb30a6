use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::model::LayoutFormat;

const MAX_RESTART_DELAY_MS: u64 = 60_000;

pub fn config_file() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".launchpad-sync.toml"))
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    settings: Settings,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct Config {
    pub settings: Settings,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Launchpad database to use instead of the one under `DARWIN_USER_DIR`.
    #[serde(default)]
    pub db_path: Option<PathBuf>,
    /// Restart the Dock after a build so it picks up the new layout.
    #[serde(default = "yes")]
    pub restart_dock: bool,
    /// Delete the database and let the Dock recreate it before building.
    #[serde(default)]
    pub rebuild_db: bool,
    /// How long to wait for the Dock to recreate its database.
    #[serde(default = "default_restart_delay_ms")]
    pub restart_delay_ms: u64,
    #[serde(default)]
    pub extract_format: LayoutFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_path: None,
            restart_dock: true,
            rebuild_db: false,
            restart_delay_ms: default_restart_delay_ms(),
            extract_format: LayoutFormat::default(),
        }
    }
}

impl Settings {
    pub fn restart_delay(&self) -> Duration { Duration::from_millis(self.restart_delay_ms) }

    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.restart_delay_ms > MAX_RESTART_DELAY_MS {
            issues.push(format!(
                "restart_delay_ms should not exceed {}, got {}",
                MAX_RESTART_DELAY_MS, self.restart_delay_ms
            ));
        }

        if let Some(path) = &self.db_path {
            if path.as_os_str().is_empty() {
                issues.push("db_path must not be empty".to_string());
            }
        }

        issues
    }

    pub fn auto_fix_values(&mut self) -> usize {
        let mut fixes = 0;

        if self.restart_delay_ms > MAX_RESTART_DELAY_MS {
            self.restart_delay_ms = default_restart_delay_ms();
            fixes += 1;
        }

        if self.db_path.as_ref().is_some_and(|p| p.as_os_str().is_empty()) {
            self.db_path = None;
            fixes += 1;
        }

        fixes
    }
}

fn yes() -> bool { true }

fn default_restart_delay_ms() -> u64 { 3000 }

impl Config {
    pub fn read(path: &Path) -> anyhow::Result<Config> {
        let buf = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        Self::parse(&buf).with_context(|| format!("Could not parse {}", path.display()))
    }

    /// Reads `~/.launchpad-sync.toml` if it exists, otherwise the defaults.
    pub fn load() -> anyhow::Result<Config> {
        match config_file() {
            Some(path) if path.exists() => Self::read(&path),
            _ => Self::default(),
        }
    }

    pub fn default() -> anyhow::Result<Config> {
        Self::parse(include_str!("../../launchpad-sync.default.toml"))
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let config_file = ConfigFile { settings: self.settings.clone() };
        let toml_string = toml::to_string_pretty(&config_file)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, toml_string.as_bytes())?;
        Ok(())
    }

    pub fn validate(&self) -> Vec<String> { self.settings.validate() }

    pub fn auto_fix_values(&mut self) -> usize { self.settings.auto_fix_values() }

    fn parse(buf: &str) -> anyhow::Result<Config> {
        let c: ConfigFile = toml::from_str(buf)?;
        Ok(Config { settings: c.settings })
    }
}
