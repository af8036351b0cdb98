use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::classify::{Matcher, Outcome, Rule};
use crate::error::ReconError;
use crate::model::{Provider, TransactionType};

/// Top-level configuration: where collated output goes and which accounts exist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    pub accounts: Vec<AccountConfig>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("data")
}

/// One bank account and the folder its statements live in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    pub name: String,
    pub provider: Provider,
    /// Holds `raw/` (the statement PDFs) and the per-statement CSVs.
    pub folder: PathBuf,
    /// User password for encrypted statements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default)]
    pub rules: Vec<RuleDef>,
}

impl AccountConfig {
    pub fn raw_dir(&self) -> PathBuf {
        self.folder.join("raw")
    }
}

/// An account-specific classification rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleDef {
    pub keyword: String,
    #[serde(default)]
    pub ignore_case: bool,
    /// Type to assign. Omitted means a transfer, in or out by sign.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransactionType>,
}

impl From<&RuleDef> for Rule {
    fn from(def: &RuleDef) -> Self {
        let matcher = if def.ignore_case {
            Matcher::ContainsIgnoreCase(def.keyword.clone())
        } else {
            Matcher::Contains(def.keyword.clone())
        };
        let outcome = def.kind.map_or(Outcome::TRANSFER, Outcome::Always);
        Rule::new(matcher, outcome)
    }
}

impl Config {
    pub fn account(&self, name: &str) -> Result<&AccountConfig, ReconError> {
        self.accounts
            .iter()
            .find(|a| a.name == name)
            .ok_or_else(|| ReconError::UnknownAccount(name.to_string()))
    }
}

/// Load a configuration from a JSON file.
pub fn load_config(path: &Path) -> Result<Config, ReconError> {
    let content = std::fs::read_to_string(path).map_err(|e| ReconError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_config(&content, path)
}

/// Parse a configuration from a JSON string read from `source`.
pub fn parse_config(json: &str, source: &Path) -> Result<Config, ReconError> {
    let config: Config = serde_json::from_str(json).map_err(|e| ReconError::ConfigLoad {
        path: source.to_path_buf(),
        reason: e.to_string(),
    })?;
    validate_config(&config)?;
    Ok(config)
}

/// Parse a configuration from a JSON string (no file path context).
pub fn parse_config_str(json: &str) -> Result<Config, ReconError> {
    let config: Config = serde_json::from_str(json)?;
    validate_config(&config)?;
    Ok(config)
}

/// Validate that a configuration is well-formed.
pub fn validate_config(config: &Config) -> Result<(), ReconError> {
    if config.accounts.is_empty() {
        return Err(ReconError::ConfigInvalid("accounts must not be empty".into()));
    }

    let mut names = HashSet::new();
    for account in &config.accounts {
        if account.name.trim().is_empty() {
            return Err(ReconError::ConfigInvalid("account name must not be empty".into()));
        }
        if !names.insert(account.name.as_str()) {
            return Err(ReconError::ConfigInvalid(format!(
                "duplicate account name '{}'",
                account.name
            )));
        }
        for rule in &account.rules {
            if rule.keyword.trim().is_empty() {
                return Err(ReconError::ConfigInvalid(format!(
                    "account '{}' has a rule with an empty keyword",
                    account.name
                )));
            }
        }
    }

    Ok(())
}
