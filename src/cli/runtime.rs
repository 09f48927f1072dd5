use std::env;
use std::fs as stdfs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use jobpilot::AppConfig;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub const LOCAL_ENV_PATH: &str = "config/local.env";
pub const LOCAL_CONFIG_PATH: &str = "config/jobpilot.yaml";

/// Result of applying `config/local.env`, logged once tracing is up
#[derive(Debug)]
pub enum LocalEnv {
    Missing,
    Loaded {
        path: PathBuf,
        applied: usize,
        invalid_lines: Vec<usize>,
    },
    Unreadable {
        path: PathBuf,
        error: std::io::Error,
    },
}

impl LocalEnv {
    pub fn log(&self) {
        match self {
            LocalEnv::Missing => {}
            LocalEnv::Loaded {
                path,
                applied,
                invalid_lines,
            } => {
                for line in invalid_lines {
                    warn!(line, "invalid local.env entry; skipping");
                }
                info!(
                    path = %path.display(),
                    applied,
                    "Loaded environment overrides from local.env"
                );
            }
            LocalEnv::Unreadable { path, error } => {
                warn!(path = %path.display(), ?error, "failed to read local.env overrides");
            }
        }
    }
}

/// Load `config/local.env` into the process environment without
/// overriding variables that are already set
pub fn load_local_env_overrides() -> LocalEnv {
    let path = Path::new(LOCAL_ENV_PATH);
    if !path.exists() {
        return LocalEnv::Missing;
    }

    match stdfs::read_to_string(path) {
        Ok(contents) => {
            let (entries, invalid_lines) = parse_local_env(&contents);
            let mut applied = 0;
            for (key, value) in entries {
                if env::var(&key).is_ok() {
                    continue;
                }
                env::set_var(key, value);
                applied += 1;
            }
            LocalEnv::Loaded {
                path: path.to_path_buf(),
                applied,
                invalid_lines,
            }
        }
        Err(error) => LocalEnv::Unreadable {
            path: path.to_path_buf(),
            error,
        },
    }
}

/// KEY=VALUE entries and the 1-based numbers of malformed lines
fn parse_local_env(contents: &str) -> (Vec<(String, String)>, Vec<usize>) {
    let mut entries = Vec::new();
    let mut invalid = Vec::new();
    for (idx, raw_line) in contents.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match line.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                entries.push((key.trim().to_string(), unquote(value.trim())));
            }
            _ => invalid.push(idx + 1),
        }
    }
    (entries, invalid)
}

pub fn init_logging(level: &str, debug: bool, json: bool) -> Result<()> {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        level.parse().context("Invalid log level")?
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_string()));

    // stdout carries command output
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}

pub struct LoadedConfig {
    pub config: AppConfig,
    pub path: PathBuf,
    pub found: bool,
}

/// Resolve the configuration file: explicit path, then ./config/jobpilot.yaml,
/// then the per-user config directory
pub fn resolve_config_path(explicit: Option<&PathBuf>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.clone());
    }
    let local_config = PathBuf::from(LOCAL_CONFIG_PATH);
    if local_config.exists() {
        return Ok(local_config);
    }
    let mut path = dirs::config_dir().context("Failed to get config directory")?;
    path.push("jobpilot");
    path.push("config.yaml");
    Ok(path)
}

pub async fn load_config(config_path: Option<&PathBuf>) -> Result<LoadedConfig> {
    let path = resolve_config_path(config_path)?;

    let (mut config, found) = if path.exists() {
        let content = tokio::fs::read_to_string(&path)
            .await
            .context("Failed to read config file")?;
        let config = AppConfig::from_yaml_str(&content, &path)
            .context("Failed to parse config file")?;
        info!("Loaded configuration from: {}", path.display());
        (config, true)
    } else {
        if config_path.is_some() {
            warn!("Config file not found, using defaults: {}", path.display());
        } else {
            info!("No config file at {}, using defaults", path.display());
        }
        (AppConfig::default(), false)
    };

    config.apply_process_env();
    Ok(LoadedConfig {
        config,
        path,
        found,
    })
}

fn unquote(value: &str) -> String {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        let inner = &value[1..value.len() - 1];
        inner
            .replace("\\\"", "\"")
            .replace("\\n", "\n")
            .replace("\\t", "\t")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("\"a \\\"b\\\"\""), "a \"b\"");
        assert_eq!(unquote("plain"), "plain");
        assert_eq!(unquote("\""), "\"");
    }

    #[test]
    fn test_parse_local_env() {
        let contents = "# comment\nJOBPILOT_STORE_PATH=\"/tmp/jobs.csv\"\n\nnot an entry\n=x\n";
        let (entries, invalid) = parse_local_env(contents);
        assert_eq!(
            entries,
            vec![("JOBPILOT_STORE_PATH".to_string(), "/tmp/jobs.csv".to_string())]
        );
        assert_eq!(invalid, vec![4, 5]);
    }

    #[test]
    fn test_explicit_path_wins() {
        let explicit = PathBuf::from("/etc/jobpilot/custom.yaml");
        assert_eq!(resolve_config_path(Some(&explicit)).unwrap(), explicit);
    }
}
