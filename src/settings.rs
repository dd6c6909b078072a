use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::categorizer::PrefixClassifier;
use crate::error::{PurseError, Result};
use crate::fmt::MoneyStyle;

pub const CONFIG_ENV: &str = "PURSE_CONFIG";
pub const PROFILE_ENV: &str = "PURSE_PROFILE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub default_profile: String,
    pub format_amounts: bool,
    pub format_negatives_with_parentheses: bool,
    pub income_categories: Vec<String>,
    pub expense_categories: Vec<String>,
    /// Named shortcuts expanding to a full argument list. `$1`..`$9` take
    /// the arguments given after the alias name.
    pub aliases: BTreeMap<String, Vec<String>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_profile: default_profile().to_string_lossy().to_string(),
            format_amounts: true,
            format_negatives_with_parentheses: false,
            income_categories: vec!["Income".to_string(), "Tax:Refunds".to_string()],
            expense_categories: Vec::new(),
            aliases: BTreeMap::new(),
        }
    }
}

impl Settings {
    pub fn money_style(&self) -> MoneyStyle {
        MoneyStyle {
            symbols: self.format_amounts,
            parentheses: self.format_negatives_with_parentheses,
        }
    }

    pub fn classifier(&self) -> PrefixClassifier {
        PrefixClassifier::new(self.income_categories.clone(), self.expense_categories.clone())
    }

    /// Ledger path: explicit override, then `$PURSE_PROFILE`, then the
    /// configured default.
    pub fn profile_path(&self, explicit: Option<&str>) -> PathBuf {
        let env = std::env::var(PROFILE_ENV).ok().filter(|p| !p.is_empty());
        let chosen = explicit
            .map(str::to_string)
            .or(env)
            .unwrap_or_else(|| self.default_profile.clone());
        PathBuf::from(shellexpand_path(&chosen))
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("purse")
}

pub fn settings_path() -> PathBuf {
    std::env::var(CONFIG_ENV)
        .ok()
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| config_dir().join("settings.json"))
}

fn default_profile() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Documents")
        .join("purse")
        .join("ledger.csv")
}

pub fn load_settings_from(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }
    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Settings::default());
    }
    serde_json::from_str(&content)
        .map_err(|e| PurseError::Settings(format!("{}: {e}", path.display())))
}

pub fn load_settings() -> Result<Settings> {
    load_settings_from(&settings_path())
}

pub fn save_settings_to(settings: &Settings, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, format!("{json}\n"))?;
    Ok(())
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    path.to_string()
}
