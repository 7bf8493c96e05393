use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Controller configuration file (YAML).
///
/// Example `config.yaml`:
/// ```yaml
/// data-dir: /var/lib/project-controller
/// interval-secs: 30
/// quota-defaults:
///   requests.cpu: "6"
///   pods: "40"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ControllerConfigFile {
    #[serde(default, alias = "data-dir")]
    pub data_dir: Option<String>,
    #[serde(default, alias = "interval-secs")]
    pub interval_secs: Option<u64>,
    /// Overrides of the platform quota floor, keyed by resource name.
    #[serde(default, alias = "quota-defaults")]
    pub quota_defaults: BTreeMap<String, String>,
}

/// Load a YAML config file, returning the default if the file doesn't exist.
pub fn load_config_file<T: serde::de::DeserializeOwned + Default>(path: &str) -> anyhow::Result<T> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(T::default());
        }
        Err(e) => return Err(anyhow::anyhow!("Failed to read config {}: {}", path, e)),
    };
    let config: T = serde_yaml::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path, e))?;
    Ok(config)
}
