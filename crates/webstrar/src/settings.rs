use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use webstrar_site::DeployConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub log_level: String,
    pub deploy: DeployConfig,
    /// User identifier to site number. Stands in for the external
    /// assignment store.
    pub assignments: BTreeMap<String, u32>,
    /// Sites hidden from the overview (staff sites).
    pub staff_sites: BTreeSet<u32>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            deploy: DeployConfig::default(),
            assignments: BTreeMap::new(),
            staff_sites: BTreeSet::from([1, 99, 100]),
        }
    }
}

impl Settings {
    /// Defaults, then the TOML file at `path` if present, then `WEBSTRAR_*`
    /// environment variables (`__` separates nested keys).
    pub fn load(path: &Path) -> Result<Self, figment::Error> {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("WEBSTRAR_").split("__"))
            .extract()
    }
}
