#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::env;
use std::path;
use std::time::Duration;

use anyhow::bail;
use anyhow::Context;
use anyhow::Result;
use clap::ArgMatches;
use clap::Command;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;
use tokio::fs;

use crate::domain::models::WidgetSettings;

static CONFIG: Lazy<DashMap<String, String>> = Lazy::new(DashMap::new);

#[derive(Clone, Copy, Debug, Eq, PartialEq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ConfigKey {
    BackendUrl,
    AgentName,
    UserLabel,
    AssistantLabel,
    CountdownSeconds,
    CompletionDelayMs,
    RequestTimeoutMs,
    StorageFile,
    LogFile,
    Resume,
    ConfigFile,
}

impl ConfigKey {
    /// An empty storage file keeps state in memory and an empty log file
    /// disables logging, so empty values are meaningful for these keys.
    pub fn accepts_empty(self) -> bool {
        return matches!(self, ConfigKey::StorageFile | ConfigKey::LogFile);
    }
}

fn quartz_dir(base: Option<path::PathBuf>) -> path::PathBuf {
    return base.unwrap_or_else(env::temp_dir).join("quartz");
}

fn parse_number<T: std::str::FromStr>(key: ConfigKey) -> Result<T> {
    let value = Config::get(key);
    return value
        .trim()
        .parse::<T>()
        .ok()
        .with_context(|| format!("Invalid value for '{key}': {value}"));
}

pub struct Config {}

impl Config {
    pub fn get(key: ConfigKey) -> String {
        if let Some(val) = CONFIG.get(&key.to_string()) {
            return val.to_string();
        }

        return "".to_string();
    }

    pub fn set(key: ConfigKey, value: &str) {
        CONFIG.insert(key.to_string(), value.to_string());
    }

    pub fn get_bool(key: ConfigKey) -> bool {
        return matches!(Config::get(key).as_str(), "true" | "1" | "yes");
    }

    pub fn default(key: ConfigKey) -> String {
        let cache_dir = quartz_dir(dirs::cache_dir());

        #[allow(unused_mut, unused_assignments)]
        let mut config_path = quartz_dir(dirs::config_dir()).join("config.toml");

        #[cfg(target_os = "macos")]
        {
            if let Ok(home) = env::var("HOME") {
                config_path = path::PathBuf::from(home).join(".config/quartz/config.toml");
            }
        }

        let res = match key {
            ConfigKey::BackendUrl => "http://127.0.0.1:5000".to_string(),
            ConfigKey::AgentName => "Nabeel Ahmad".to_string(),
            ConfigKey::UserLabel => "AGENT".to_string(),
            ConfigKey::AssistantLabel => "QUARTZ AI".to_string(),
            ConfigKey::CountdownSeconds => "20".to_string(),
            ConfigKey::CompletionDelayMs => "1000".to_string(),
            ConfigKey::RequestTimeoutMs => "30000".to_string(),
            ConfigKey::StorageFile => cache_dir.join("widget-storage.json").display().to_string(),
            ConfigKey::LogFile => cache_dir.join("quartz-widget.log").display().to_string(),
            ConfigKey::Resume => "false".to_string(),

            // Special
            ConfigKey::ConfigFile => config_path.display().to_string(),
        };

        return res;
    }

    pub async fn load(cmd: Command, clap_arg_matches: Vec<&ArgMatches>) -> Result<()> {
        for key in ConfigKey::iter() {
            Config::set(key, &Config::default(key))
        }

        let mut config_file = Config::default(ConfigKey::ConfigFile);
        for matches in clap_arg_matches.as_slice() {
            if let Ok(Some(arg_config_file)) =
                matches.try_get_one::<String>(&ConfigKey::ConfigFile.to_string())
            {
                config_file = arg_config_file.to_string();
            }
        }

        let config_path = path::PathBuf::from(config_file);
        if config_path.exists() {
            let toml_str = fs::read_to_string(&config_path).await?;
            let doc = toml_str
                .parse::<toml_edit::Document>()
                .with_context(|| format!("Failed to parse {}", config_path.display()))?;

            for key in ConfigKey::iter() {
                if key == ConfigKey::ConfigFile {
                    continue;
                }
                if let Some(val) = doc.get(&key.to_string()) {
                    // Use clap value parsers to do validation.
                    let mut possible_values = vec![];
                    if let Some(arg) = cmd
                        .get_arguments()
                        .find(|e| return e.get_long() == Some(key.to_string().as_str()))
                    {
                        possible_values = arg
                            .get_possible_values()
                            .iter()
                            .map(|e| return e.get_name().to_string())
                            .collect::<Vec<String>>();
                    }

                    if let Some(val_int) = val.as_integer() {
                        if val_int < 0 {
                            bail!(format!("config.toml has a negative value for key '{key}': {val_int}"));
                        }
                        Config::set(key, &val_int.to_string());
                    } else if let Some(val_bool) = val.as_bool() {
                        Config::set(key, &val_bool.to_string());
                    } else if let Some(val_str) = val.as_str() {
                        if val_str.is_empty() && !key.accepts_empty() {
                            continue;
                        }
                        if !possible_values.is_empty()
                            && !possible_values.contains(&val_str.to_string())
                        {
                            bail!(format!("config.toml has an invalid value for key '{key}': {val_str}\nPossible values are: {}", possible_values.join(", ")));
                        }
                        Config::set(key, val_str);
                    }
                }
            }
        }

        for key in ConfigKey::iter() {
            for matches in clap_arg_matches.as_slice() {
                if key == ConfigKey::Resume {
                    if let Ok(Some(true)) = matches.try_get_one::<bool>(&key.to_string()) {
                        Config::set(key, "true");
                    }
                    continue;
                }
                if let Ok(Some(val)) = matches.try_get_one::<String>(&key.to_string()) {
                    if val.is_empty() && !key.accepts_empty() {
                        continue;
                    }
                    Config::set(key, val)
                }
            }
        }

        tracing::debug!(
            backend_url = Config::get(ConfigKey::BackendUrl),
            agent_name = Config::get(ConfigKey::AgentName),
            storage_file = Config::get(ConfigKey::StorageFile),
            resume = Config::get(ConfigKey::Resume),
            "config"
        );

        return Ok(());
    }

    /// The settings handed to the widget controller.
    pub fn settings() -> Result<WidgetSettings> {
        return Ok(WidgetSettings {
            agent_name: Config::get(ConfigKey::AgentName),
            user_label: Config::get(ConfigKey::UserLabel),
            assistant_label: Config::get(ConfigKey::AssistantLabel),
            countdown_seconds: parse_number::<u32>(ConfigKey::CountdownSeconds)?,
            completion_delay: Duration::from_millis(parse_number::<u64>(
                ConfigKey::CompletionDelayMs,
            )?),
        });
    }

    pub fn request_timeout() -> Result<Duration> {
        return Ok(Duration::from_millis(parse_number::<u64>(
            ConfigKey::RequestTimeoutMs,
        )?));
    }

    pub fn serialize_default(cmd: Command) -> String {
        let toml_str = ConfigKey::iter()
            .filter_map(|key| {
                if key == ConfigKey::ConfigFile {
                    return None;
                }

                let key_str = key.to_string();
                let arg = cmd
                    .get_arguments()
                    .find(|e| return e.get_long() == Some(key_str.as_str()))?;

                let mut description = arg.get_help()?.to_string();

                description = description
                    .split("[default:")
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_string();

                if !arg.get_possible_values().is_empty() {
                    let possible_values = arg
                        .get_possible_values()
                        .iter()
                        .map(|e| return e.get_name())
                        .collect::<Vec<_>>()
                        .join(", ");
                    description = format!("{description} [possible values: {}]", possible_values);
                }

                let mut val = Config::default(key);
                if val.is_empty() {
                    val = format!("# {key} = \"\"");
                } else if val.parse::<i64>().is_ok() || val.parse::<bool>().is_ok() {
                    val = format!("{key} = {val}");
                } else {
                    val = format!("{key} = \"{val}\"");
                }

                return Some(format!("# {description}\n{val}"));
            })
            .collect::<Vec<String>>()
            .join("\n\n");

        return toml_str;
    }
}
