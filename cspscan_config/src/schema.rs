use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::ini::IniOptions;

const CONFIG_DIR: &str = "cspscan";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Settings {
    #[serde(default = "Settings::default_presets")]
    pub presets: BTreeMap<String, Preset>,
    #[serde(default)]
    pub ini: IniOptions,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            presets: Self::default_presets(),
            ini: IniOptions::default(),
            output: OutputConfig::default(),
        }
    }
}

/// A named pair of inputs, e.g. the car or track layout.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Preset {
    pub ini: PathBuf,
    pub template: PathBuf,
}

impl Preset {
    fn new(ini: &str, template: &str) -> Self {
        Self {
            ini: PathBuf::from(ini),
            template: PathBuf::from(template),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    #[serde(default = "OutputConfig::default_indent")]
    pub indent: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            indent: Self::default_indent(),
        }
    }
}

impl OutputConfig {
    const fn default_indent() -> usize {
        4
    }
}

impl Settings {
    fn default_presets() -> BTreeMap<String, Preset> {
        BTreeMap::from([
            (
                "car".to_string(),
                Preset::new("./cars/ext_config.ini", "./cars/car_csp.json"),
            ),
            (
                "track".to_string(),
                Preset::new("./tracks/ext_config.ini", "./tracks/track_csp.json"),
            ),
        ])
    }

    pub fn config_dir() -> anyhow::Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join(CONFIG_DIR))
    }

    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            anyhow::bail!(
                "Config file not found at: {}. Please run 'cspscan init' to create config.",
                config_path.display()
            );
        }

        Self::load_from(&config_path)
    }

    /// Load the settings file, or fall back to defaults when none exists.
    pub fn load_or_default() -> anyhow::Result<Self> {
        let config_path = Self::config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&content)?;

        Ok(settings)
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = Self::config_dir()?;

        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    pub fn create_config() -> anyhow::Result<()> {
        let config_dir = Self::ensure_config_dir()?;
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                config_path.display()
            );
        }

        Self::default().write_to(&config_path)?;

        println!("✅ Created config file at: {}", config_path.display());
        println!();
        println!("📝 Next steps:");
        println!("   1. Point the `car` and `track` presets at your ext_config.ini and template files");
        println!("   2. Run 'cspscan scan --preset car' to produce a feature report");
        println!();
        println!("🔧 Configuration options:");
        println!("   - presets: named ini/template pairs usable with --preset");
        println!("   - ini.strip_inline_comments: drop ' ; comment' tails from values");
        println!("   - output.indent: spaces per indentation level of the JSON report");
        println!();
        Ok(())
    }

    pub fn write_to(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn preset(&self, name: &str) -> anyhow::Result<&Preset> {
        self.presets.get(name).ok_or_else(|| {
            let known: Vec<&str> = self.presets.keys().map(String::as_str).collect();
            anyhow::anyhow!(
                "Unknown preset '{name}'. Available presets: {}",
                known.join(", ")
            )
        })
    }
}
