use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::{currency::MoneyFormat, errors::InsightsError};

/// Overrides the data directory; used by tests and portable installs.
pub const HOME_ENV: &str = "BUDGET_INSIGHTS_HOME";

const DATA_DIR_NAME: &str = ".budget_insights";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub currency_symbol: String,
    pub locale: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_snapshot: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency_symbol: "$".into(),
            locale: "en-US".into(),
            last_snapshot: None,
        }
    }
}

impl Config {
    pub fn money_format(&self) -> MoneyFormat {
        MoneyFormat::for_locale(self.currency_symbol.clone(), &self.locale)
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, InsightsError> {
        Self::with_base_dir(data_dir()?)
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, InsightsError> {
        fs::create_dir_all(&base)?;
        Ok(Self {
            path: base.join(CONFIG_FILE),
        })
    }

    /// Reads the config file, or returns defaults when none has been saved.
    pub fn load(&self) -> Result<Config, InsightsError> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        serde_json::from_str(&data).map_err(|err| {
            InsightsError::Config(format!("cannot parse {}: {err}", self.path.display()))
        })
    }

    pub fn save(&self, config: &Config) -> Result<(), InsightsError> {
        let json = serde_json::to_string_pretty(config)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn data_dir() -> Result<PathBuf, InsightsError> {
    if let Some(custom) = env::var_os(HOME_ENV).filter(|value| !value.is_empty()) {
        return Ok(PathBuf::from(custom));
    }
    dirs::home_dir()
        .map(|home| home.join(DATA_DIR_NAME))
        .ok_or_else(|| InsightsError::Config("cannot locate a home directory".into()))
}
