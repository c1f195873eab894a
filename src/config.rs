use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::advisor::DEFAULT_TARGET_MONTHS;
use crate::types::SaleWindow;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Csv,
    #[default]
    Sqlite,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DataConfig {
    #[serde(default)]
    pub source: SourceKind,
    #[serde(default)]
    pub csv_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_window_months")]
    pub window_months: u32,
    #[serde(default = "default_target_months")]
    pub target_months: u32,
    #[serde(default)]
    pub target_sales: Option<u64>,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub csv_path: Option<String>,
    pub db_path: Option<String>,
    pub window_months: Option<u32>,
}

impl Config {
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config/sales-advisor/config.toml")
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed reading config: {}", path.display()))?;
        let parsed: Self = toml::from_str(&data)
            .with_context(|| format!("failed parsing TOML config: {}", path.display()))?;
        Ok(parsed)
    }

    /// A CSV path given on the command line also switches the source to CSV.
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(csv_path) = overrides.csv_path {
            self.data.csv_path = csv_path;
            self.data.source = SourceKind::Csv;
        }
        if let Some(db_path) = overrides.db_path {
            self.storage.db_path = db_path;
        }
        if let Some(months) = overrides.window_months {
            self.analysis.window_months = months;
        }
    }

    pub fn write_template(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed creating config directory: {}", parent.display())
            })?;
        }
        fs::write(path, Self::default_template())
            .with_context(|| format!("failed writing config template: {}", path.display()))
    }

    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }

    pub fn resolved_csv_path(&self) -> PathBuf {
        expand_tilde(&self.data.csv_path)
    }

    pub fn default_template() -> String {
        let template = r#"[data]
# "sqlite" reads the imported store, "csv" reads csv_path directly
source = "sqlite"
csv_path = "sales.csv"

[storage]
db_path = "~/.local/share/sales-advisor/sales.db"

[analysis]
window_months = 6
target_months = 6
# target_sales = 1200
"#;
        template.to_string()
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window_months: default_window_months(),
            target_months: default_target_months(),
            target_sales: None,
        }
    }
}

fn default_db_path() -> String {
    "~/.local/share/sales-advisor/sales.db".to_string()
}

fn default_window_months() -> u32 {
    SaleWindow::DEFAULT_MONTHS
}

fn default_target_months() -> u32 {
    DEFAULT_TARGET_MONTHS
}
