use super::errors::AppError;
use directories::ProjectDirs;
use log::info;
use serde::Deserialize;
use std::fs::File;
use std::io::prelude::*;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, PartialEq, Deserialize)]
pub struct AppConfig {
    #[serde(default = "get_default_general_config")]
    pub general: GeneralConfig,

    #[serde(default = "get_default_service_config")]
    pub service: ServiceConfig,
}

#[derive(Debug, PartialEq, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "get_default_initial_seed")]
    pub initial_seed: u32,
    #[serde(default = "get_default_tick_rate_ms")]
    pub tick_rate_ms: u64,
}

impl GeneralConfig {
    /// Redraw interval, never shorter than one millisecond.
    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms.max(1))
    }
}

/// External program answering `generate <seed>` and `level` requests.
#[derive(Debug, PartialEq, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "get_default_service_bin")]
    pub bin: String,
    #[serde(default = "get_default_service_args")]
    pub args: Vec<String>,
}

pub fn get_app_config(config_path: Option<&str>) -> Result<AppConfig, AppError> {
    let config_file_path: PathBuf = if let Some(str_value) = config_path {
        PathBuf::from(&str_value)
    } else {
        get_default_app_config_path()?
    };

    info!(
        "loading config from '{}'",
        config_file_path.to_string_lossy()
    );

    let config_file_content: String = if config_file_path.exists() {
        let mut file = File::open(&config_file_path).map_err(|e| AppError {
            message: format!(
                "Error opening the file '{}': {}",
                &config_file_path.to_string_lossy(),
                &e.to_string()
            ),
        })?;
        let mut contents = String::new();

        file.read_to_string(&mut contents).map_err(|e| AppError {
            message: format!(
                "Error reading the file '{}': {}",
                &config_file_path.to_string_lossy(),
                &e.to_string()
            ),
        })?;

        contents
    } else {
        info!("no config file found, using defaults");
        "empty: true".to_string()
    };

    parse_app_config(&config_file_content).map_err(|e| AppError {
        message: format!(
            "Error parsing content of the file '{}': {}",
            &config_file_path.to_string_lossy(),
            &e.message
        ),
    })
}

pub fn parse_app_config(content: &str) -> Result<AppConfig, AppError> {
    serde_yaml::from_str(content).map_err(|e| AppError {
        message: e.to_string(),
    })
}

fn get_default_app_config_path() -> Result<PathBuf, AppError> {
    match ProjectDirs::from("Com", "Seiti", env!("CARGO_PKG_NAME")) {
        Some(proj_dirs) => {
            let config_file_path = proj_dirs.config_dir().join("config.yml");

            Ok(config_file_path)
        }
        None => Err(AppError {
            message: "Can't get app project dir".to_string(),
        }),
    }
}

fn get_default_general_config() -> GeneralConfig {
    GeneralConfig {
        initial_seed: get_default_initial_seed(),
        tick_rate_ms: get_default_tick_rate_ms(),
    }
}

fn get_default_service_config() -> ServiceConfig {
    ServiceConfig {
        bin: get_default_service_bin(),
        args: get_default_service_args(),
    }
}

fn get_default_initial_seed() -> u32 {
    1
}

fn get_default_tick_rate_ms() -> u64 {
    40
}

fn get_default_service_bin() -> String {
    "seiti-cli".to_string()
}

fn get_default_service_args() -> Vec<String> {
    vec![]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = parse_app_config("empty: true").unwrap();

        assert_eq!(
            config,
            AppConfig {
                general: GeneralConfig {
                    initial_seed: 1,
                    tick_rate_ms: 40,
                },
                service: ServiceConfig {
                    bin: "seiti-cli".to_string(),
                    args: vec![],
                },
            }
        );
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = parse_app_config(
            "general:\n  initial_seed: 42\nservice:\n  args: [\"--fast\"]\n",
        )
        .unwrap();

        assert_eq!(config.general.initial_seed, 42);
        assert_eq!(config.general.tick_rate_ms, 40);
        assert_eq!(config.service.bin, "seiti-cli");
        assert_eq!(config.service.args, vec!["--fast".to_string()]);
    }

    #[test]
    fn tick_rate_never_drops_to_zero() {
        let config = parse_app_config("general:\n  tick_rate_ms: 0\n").unwrap();

        assert_eq!(config.general.tick_rate(), Duration::from_millis(1));

        let config = parse_app_config("general:\n  tick_rate_ms: 25\n").unwrap();

        assert_eq!(config.general.tick_rate(), Duration::from_millis(25));
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        assert!(parse_app_config("general: [1, 2").is_err());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = get_app_config(Some("/nonexistent/seiti-term/config.yml")).unwrap();

        assert_eq!(config.general.initial_seed, 1);
    }
}
