//! 配置文件管理模块

use crate::core::models::Config;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// 配置管理器
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// 创建配置管理器
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// 获取默认配置路径
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("vn", "calsdt", "calsdt")
            .map(|d| d.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("config.json"))
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// 加载配置，文件不存在时使用默认配置
    pub fn load(&self) -> Result<Config> {
        if !self.config_path.exists() {
            tracing::warn!(
                "配置文件 {} 不存在，使用默认配置",
                self.config_path.display()
            );
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&self.config_path)
            .with_context(|| format!("读取配置文件失败: {}", self.config_path.display()))?;
        let config = Config::from_json_str(&content)
            .with_context(|| format!("配置文件格式错误: {}", self.config_path.display()))?;

        // 提前校验，避免到分析时才报错
        config
            .validate()
            .with_context(|| format!("配置文件内容无效: {}", self.config_path.display()))?;

        tracing::info!("已加载配置: {}", self.config_path.display());
        Ok(config)
    }

    /// 保存配置
    pub fn save(&self, config: &Config) -> Result<()> {
        // 确保目录存在
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = config.to_json_pretty()?;
        std::fs::write(&self.config_path, content)
            .with_context(|| format!("写入配置文件失败: {}", self.config_path.display()))?;
        Ok(())
    }

    /// 重置为默认配置
    pub fn reset(&self) -> Result<()> {
        self.save(&Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_save_load() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nested").join("config.json");

        let manager = ConfigManager::new(config_path);

        let config = Config {
            user_menh: "Thủy".to_string(),
            score_sinh: 4.5,
            toggle_suffix_filter: true,
            suffix_value: "68".to_string(),
            ..Config::default()
        };

        manager.save(&config).unwrap();

        let loaded = manager.load().unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_yields_default() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::new(dir.path().join("missing.json"));
        assert_eq!(manager.load().unwrap(), Config::default());
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.json");

        std::fs::write(&config_path, "{ \"mode\": 1 }").unwrap();
        assert!(ConfigManager::new(config_path.clone()).load().is_err());

        let bad = Config {
            mode: "Balanced".to_string(),
            ..Config::default()
        };
        std::fs::write(&config_path, serde_json::to_string(&bad).unwrap()).unwrap();
        assert!(ConfigManager::new(config_path).load().is_err());
    }

    #[test]
    fn test_reset_writes_default() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::new(dir.path().join("config.json"));
        manager.reset().unwrap();
        assert_eq!(manager.load().unwrap(), Config::default());
    }
}
