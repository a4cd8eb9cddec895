//! 应用配置管理
use anyhow::{Context, Result, anyhow, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::app::View;
use crate::models::{Category, Priority};

const APP_DIR: &str = "smart-timetable";

pub const KEYS: [&str; 5] = [
    "data_dir",
    "log_level",
    "default_view",
    "default_category",
    "default_priority",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 数据目录；未设置时使用系统默认位置
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    pub log_level: String,
    /// 启动时打开的视图
    pub default_view: View,
    pub default_category: Category,
    pub default_priority: Priority,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            log_level: "info".to_string(),
            default_view: View::Today,
            default_category: Category::Other,
            default_priority: Priority::Medium,
        }
    }
}

impl Config {
    /// Effective data directory: CLI override, then config, then platform default.
    pub fn resolve_data_dir(&self, cli_override: Option<&Path>) -> Result<PathBuf> {
        if let Some(dir) = cli_override {
            return Ok(dir.to_path_buf());
        }
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_data_dir(),
        }
    }

    /// Validate and assign one field by its TOML key.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "data_dir" => {
                self.data_dir = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
            "log_level" => {
                self.log_level = crate::logging::normalize_level(value)?.to_string();
            }
            "default_view" => {
                self.default_view = value.parse().map_err(|e: String| anyhow!(e))?;
            }
            "default_category" => {
                self.default_category = value.parse().map_err(|e: String| anyhow!(e))?;
            }
            "default_priority" => {
                self.default_priority = value.parse().map_err(|e: String| anyhow!(e))?;
            }
            other => bail!(
                "unknown config key '{}', expected one of: {}",
                other,
                KEYS.join(", ")
            ),
        }
        Ok(())
    }

    /// `(key, value)` pairs in display order
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        let data_dir = match &self.data_dir {
            Some(dir) => dir.display().to_string(),
            None => default_data_dir()
                .map(|d| format!("{} (default)", d.display()))
                .unwrap_or_else(|_| "(unavailable)".to_string()),
        };

        vec![
            ("data_dir", data_dir),
            ("log_level", self.log_level.clone()),
            ("default_view", self.default_view.as_str().to_string()),
            ("default_category", self.default_category.to_string()),
            ("default_priority", self.default_priority.to_string()),
        ]
    }
}

fn base_dirs() -> Result<directories::BaseDirs> {
    directories::BaseDirs::new().context("failed to determine the user's home directory")
}

/// 获取配置文件路径
/// Windows: %APPDATA%\smart-timetable\config.toml
/// macOS: ~/Library/Application Support/smart-timetable/config.toml
/// Linux: ~/.config/smart-timetable/config.toml
pub fn get_config_path() -> Result<PathBuf> {
    Ok(base_dirs()?.config_dir().join(APP_DIR).join("config.toml"))
}

/// 默认数据目录
pub fn default_data_dir() -> Result<PathBuf> {
    Ok(base_dirs()?.data_local_dir().join(APP_DIR))
}

/// 加载配置
pub fn load_config() -> Result<Config> {
    load_config_from(&get_config_path()?)
}

pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        // 配置文件不存在，返回默认配置
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("invalid config file {}", path.display()))?;

    Ok(config)
}

/// 保存配置
pub fn save_config(config: &Config) -> Result<()> {
    save_config_to(config, &get_config_path()?)
}

pub fn save_config_to(config: &Config, path: &Path) -> Result<()> {
    // 确保目录存在
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;

    Ok(())
}

/// 更新单个配置项
pub fn set_value(key: &str, value: &str) -> Result<()> {
    let mut config = load_config()?;
    config.set_value(key, value)?;
    save_config(&config)?;
    println!("✓ {} set to: {}", key, value.trim());
    Ok(())
}

/// 显示当前配置
pub fn show_config() -> Result<()> {
    let config = load_config()?;
    println!("Current configuration:");
    for (key, value) in config.entries() {
        println!("  {:<18} {}", key, value);
    }
    println!();
    println!("Config file: {}", get_config_path()?.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.log_level, "info");
        assert_eq!(config.default_view, View::Today);
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.set_value("default_view", "weekly").unwrap();
        config.set_value("default_category", "health").unwrap();
        config.set_value("data_dir", "/tmp/stt-data").unwrap();
        save_config_to(&config, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.default_category, Category::Health);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "log_level = \"debug\"\n").unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.default_priority, Priority::Medium);
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "log_level = [").unwrap();
        assert!(load_config_from(&path).is_err());
    }

    #[test]
    fn test_set_value_validates() {
        let mut config = Config::default();
        assert!(config.set_value("log_level", "shouting").is_err());
        assert!(config.set_value("default_view", "calendar").is_err());
        assert!(config.set_value("default_priority", "urgent").is_err());
        assert!(config.set_value("editor", "vim").is_err());
        assert_eq!(config, Config::default());

        config.set_value("log_level", "WARNING").unwrap();
        assert_eq!(config.log_level, "warn");
        config.set_value("default_priority", "high").unwrap();
        assert_eq!(config.default_priority, Priority::High);
    }

    #[test]
    fn test_blank_data_dir_resets_to_default() {
        let mut config = Config::default();
        config.set_value("data_dir", "/somewhere").unwrap();
        config.set_value("data_dir", "  ").unwrap();
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn test_resolve_data_dir_prefers_override() {
        let config = Config {
            data_dir: Some(PathBuf::from("/from/config")),
            ..Config::default()
        };
        assert_eq!(
            config.resolve_data_dir(Some(Path::new("/from/cli"))).unwrap(),
            PathBuf::from("/from/cli")
        );
        assert_eq!(
            config.resolve_data_dir(None).unwrap(),
            PathBuf::from("/from/config")
        );
    }
}
