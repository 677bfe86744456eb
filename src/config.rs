use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::sink::SinkPaths;

pub const DEFAULT_DIRECTORY: &str = "logs";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory checked (and created) by `Logger::init`.
    pub directory: String,
    /// Place the three log files inside `directory` instead of the fixed `logs/` paths.
    pub colocate_sinks: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            directory: DEFAULT_DIRECTORY.to_string(),
            colocate_sinks: false,
        }
    }
}

impl Config {
    pub fn load_from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let config: Config = if path.ends_with(".yaml") || path.ends_with(".yml") {
            serde_yaml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.directory.trim().is_empty() {
            return Err("directory must not be empty".into());
        }
        Ok(())
    }

    pub fn sink_paths(&self) -> SinkPaths {
        if self.colocate_sinks {
            SinkPaths::within(PathBuf::from(&self.directory))
        } else {
            SinkPaths::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn write_config(dir: &Path, name: &str, content: &str) -> String {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn defaults_to_logs_directory() {
        let config = Config::default();
        assert_eq!(config.directory, "logs");
        assert!(!config.colocate_sinks);
    }

    #[test]
    fn loads_yaml_with_missing_fields_defaulted() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_config(tmp.path(), "config.yaml", "directory: var/log/app\n");

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.directory, "var/log/app");
        assert!(!config.colocate_sinks);
    }

    #[test]
    fn loads_json() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_config(
            tmp.path(),
            "config.json",
            r#"{"directory": "out", "colocate_sinks": true}"#,
        );

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.directory, "out");
        assert!(config.colocate_sinks);
    }

    #[test]
    fn rejects_empty_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_config(tmp.path(), "config.yml", "directory: \"\"\n");

        let err = Config::load_from_file(&path).unwrap_err();
        assert_eq!(err.to_string(), "directory must not be empty");
    }

    #[test]
    fn sink_paths_stay_fixed_unless_colocated() {
        let mut config = Config {
            directory: "elsewhere".to_string(),
            colocate_sinks: false,
        };
        assert_eq!(config.sink_paths().error, PathBuf::from("logs/error.log"));

        config.colocate_sinks = true;
        let paths = config.sink_paths();
        assert_eq!(paths.error, PathBuf::from("elsewhere/error.log"));
        assert_eq!(paths.access, PathBuf::from("elsewhere/access.log"));
        assert_eq!(paths.console, PathBuf::from("elsewhere/console.log"));
    }
}
