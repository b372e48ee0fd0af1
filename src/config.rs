use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_log_lines")]
    pub log_lines: u32,
    #[serde(default = "default_services")]
    pub services: Vec<String>,
    #[serde(default)]
    pub mail: MailConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MailConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default = "default_username_env")]
    pub username_env: String,
    #[serde(default = "default_password_env")]
    pub password_env: String,
    #[serde(default = "default_recipient_env")]
    pub recipient_env: String,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            username_env: default_username_env(),
            password_env: default_password_env(),
            recipient_env: default_recipient_env(),
            from: None,
            to: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("could not parse YAML in {path}: {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },
    #[error("config validation error: {0}")]
    Validation(String),
}

impl Config {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();
        let path_display = path_ref.display().to_string();
        let text = fs::read_to_string(path_ref).map_err(|source| ConfigError::Read {
            path: path_display.clone(),
            source,
        })?;

        let cfg: Config = serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path_display,
            source,
        })?;

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.log_lines < 1 {
            return Err(ConfigError::Validation(
                "log_lines must be >= 1".to_string(),
            ));
        }

        let mut names = HashSet::new();
        for service in &self.services {
            if service.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "services[*] must not be empty".to_string(),
                ));
            }
            if !names.insert(service.clone()) {
                return Err(ConfigError::Validation(format!(
                    "service '{service}' is listed more than once"
                )));
            }
        }

        if self.mail.smtp_host.trim().is_empty() {
            return Err(ConfigError::Validation(
                "mail.smtp_host must not be empty".to_string(),
            ));
        }
        if self.mail.smtp_port == 0 {
            return Err(ConfigError::Validation(
                "mail.smtp_port must be in the range 1..65535".to_string(),
            ));
        }

        Ok(())
    }

    pub fn example_yaml() -> &'static str {
        include_str!("../config.yaml.example")
    }
}

const fn default_log_lines() -> u32 {
    30
}

fn default_services() -> Vec<String> {
    vec![
        "Chart-images.service".to_string(),
        "Setups-emails.service".to_string(),
    ]
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

const fn default_smtp_port() -> u16 {
    587
}

fn default_username_env() -> String {
    "MAIL_USER".to_string()
}

fn default_password_env() -> String {
    "MAIL_PASSWORD".to_string()
}

fn default_recipient_env() -> String {
    "MAIL_TO".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config {
            log_lines: 30,
            services: default_services(),
            mail: MailConfig::default(),
        }
    }

    #[test]
    fn defaults_parse_from_an_empty_document() {
        let cfg: Config = serde_yaml::from_str("{}").expect("defaults should deserialize");
        assert_eq!(cfg.log_lines, 30);
        assert_eq!(cfg.services.len(), 2);
        assert!(!cfg.mail.enabled);
        assert_eq!(cfg.mail.smtp_port, 587);
        cfg.validate().expect("defaults should validate");
    }

    #[test]
    fn zero_log_lines_is_rejected() {
        let mut cfg = valid_config();
        cfg.log_lines = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn duplicate_services_are_rejected() {
        let mut cfg = valid_config();
        cfg.services = vec!["a.service".to_string(), "a.service".to_string()];
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn empty_service_name_is_rejected() {
        let mut cfg = valid_config();
        cfg.services = vec!["  ".to_string()];
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn empty_smtp_host_is_rejected() {
        let mut cfg = valid_config();
        cfg.mail.smtp_host = String::new();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn example_yaml_is_valid() {
        let cfg: Config =
            serde_yaml::from_str(Config::example_yaml()).expect("example should deserialize");
        cfg.validate().expect("example should validate");
    }
}
