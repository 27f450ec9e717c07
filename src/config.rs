//! Authorization configuration: the rule table and its loaders.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

const DEFAULT_CLAIM_URL_BASE: &str = "https://ipcoop.com/claims/";

/// Static configuration for the authorization engine, loaded once at
/// startup by the caller and handed to [`crate::MediaAuthorizer::new`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuthzConfig {
    /// Kill switch for the whole feature; exposed to the caller's pipeline
    /// glue through [`crate::MediaAuthorizer::is_enabled`].
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Base URL prefixed to short claim names to build their full-URL form.
    #[serde(default = "default_claim_url_base")]
    pub claim_url_base: String,
    /// Rule-name → required-claim table. Keys are matched case-insensitively.
    #[serde(default)]
    pub rules: HashMap<String, String>,
}

fn default_enabled() -> bool {
    true
}

fn default_claim_url_base() -> String {
    DEFAULT_CLAIM_URL_BASE.to_string()
}

impl Default for AuthzConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            claim_url_base: default_claim_url_base(),
            rules: default_rules(),
        }
    }
}

impl AuthzConfig {
    /// Rejects rule tables that could never authorize anything sensibly:
    /// blank rule names or blank required claims.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, claim) in &self.rules {
            if name.trim().is_empty() {
                return Err(ConfigError::Invalid("empty rule name in rule table".into()));
            }
            if claim.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "rule '{name}' has an empty required claim"
                )));
            }
        }
        Ok(())
    }
}

/// Rule table used when no configuration file is supplied.
pub fn default_rules() -> HashMap<String, String> {
    let mut rules = HashMap::new();
    rules.insert("IsHawaiiUser".to_string(), "hasHawaiiState".to_string());
    rules.insert("IsAlaskaUser".to_string(), "hasAlaskaState".to_string());
    rules.insert("IsRestUSUser".to_string(), "hasRestUSState".to_string());
    rules.insert("IsCanadaUser".to_string(), "hasCanadaState".to_string());
    rules
}

pub fn load_config_from_reader<R: Read>(mut reader: R) -> Result<AuthzConfig, ConfigError> {
    let mut buf = String::new();
    reader.read_to_string(&mut buf)?;
    parse_config_str(&buf)
}

pub fn load_config_from_path(path: impl AsRef<Path>) -> Result<AuthzConfig, ConfigError> {
    let file = File::open(path.as_ref())?;
    load_config_from_reader(file)
}

/// Accepts JSON first, then YAML, matching how operators actually ship
/// these files.
pub fn parse_config_str(raw: &str) -> Result<AuthzConfig, ConfigError> {
    match serde_json::from_str(raw) {
        Ok(config) => Ok(config),
        Err(json_err) => serde_yaml::from_str(raw).map_err(|yaml_err| {
            ConfigError::Deserialize(format!(
                "json error: {}; yaml error: {}",
                json_err, yaml_err
            ))
        }),
    }
}
