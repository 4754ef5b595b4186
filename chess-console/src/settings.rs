//! 控制台设置
//!
//! 保存在 `<配置目录>/chess-console/settings.json`，文件缺失或损坏时使用默认值。
//! `set` 命令修改后立即写回。

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chess_rules::RulesConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// `set` 命令可修改的设置项
pub const SETTING_KEYS: &[&str] = &["unicode", "coordinates", "bell", "turn-order"];

/// 控制台设置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleSettings {
    /// 用 Unicode 符号显示棋子（否则用 FEN 字母）
    pub unicode_pieces: bool,
    /// 显示行列坐标
    pub show_coordinates: bool,
    /// 走子后响铃
    pub bell_on_move: bool,
    /// 默认日志过滤（`RUST_LOG` 优先），下次启动生效
    pub log_filter: String,
    /// 要求双方轮流走棋
    pub enforce_turn_order: bool,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            unicode_pieces: false,
            show_coordinates: true,
            bell_on_move: false,
            log_filter: "chess_console=info,chess_rules=info".to_string(),
            enforce_turn_order: false,
        }
    }
}

impl ConsoleSettings {
    /// 默认设置文件位置
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("chess-console").join("settings.json"))
    }

    /// 读取设置，失败时退回默认值
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            warn!("找不到配置目录，使用默认设置");
            return Self::default();
        };
        if !path.exists() {
            debug!(path = %path.display(), "没有设置文件");
            return Self::default();
        }

        match Self::read(path) {
            Ok(settings) => {
                info!(path = %path.display(), "读取设置");
                settings
            }
            Err(e) => {
                warn!("{:#}，使用默认设置", e);
                Self::default()
            }
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("读取设置文件失败: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("设置文件格式错误: {}", path.display()))
    }

    /// 写入设置文件，目录不存在时创建
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("创建配置目录失败: {}", dir.display()))?;
        }
        let content = serde_json::to_string_pretty(self).context("序列化设置失败")?;
        fs::write(path, content)
            .with_context(|| format!("写入设置文件失败: {}", path.display()))?;
        debug!(path = %path.display(), "设置已写入");
        Ok(())
    }

    /// 修改一项设置，值为 `on` / `off`
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let enabled = match value.to_ascii_lowercase().as_str() {
            "on" | "true" | "yes" => true,
            "off" | "false" | "no" => false,
            _ => bail!("设置值只能是 on 或 off: {}", value),
        };
        let field = match key {
            "unicode" => &mut self.unicode_pieces,
            "coordinates" => &mut self.show_coordinates,
            "bell" => &mut self.bell_on_move,
            "turn-order" => &mut self.enforce_turn_order,
            _ => bail!("未知的设置项 {}，可用: {}", key, SETTING_KEYS.join(" ")),
        };
        *field = enabled;
        Ok(())
    }

    /// 对应的规则配置
    pub fn rules(&self) -> RulesConfig {
        RulesConfig {
            enforce_turn_order: self.enforce_turn_order,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_default() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        assert_eq!(ConsoleSettings::load_or_default(Some(&path)), ConsoleSettings::default());
        assert_eq!(ConsoleSettings::load_or_default(None), ConsoleSettings::default());
    }

    #[test]
    fn test_write_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("settings.json");

        let settings = ConsoleSettings {
            unicode_pieces: true,
            bell_on_move: true,
            enforce_turn_order: true,
            ..ConsoleSettings::default()
        };
        settings.write(&path).unwrap();

        let loaded = ConsoleSettings::load_or_default(Some(&path));
        assert_eq!(loaded, settings);
        assert!(loaded.rules().enforce_turn_order);
    }

    #[test]
    fn test_invalid_file_uses_default() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        fs::write(&path, "not json").unwrap();

        assert_eq!(ConsoleSettings::load_or_default(Some(&path)), ConsoleSettings::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        fs::write(&path, r#"{ "unicode_pieces": true }"#).unwrap();

        let loaded = ConsoleSettings::load_or_default(Some(&path));
        assert!(loaded.unicode_pieces);
        assert!(loaded.show_coordinates);
        assert_eq!(loaded.log_filter, ConsoleSettings::default().log_filter);
    }

    #[test]
    fn test_set_values() {
        let mut settings = ConsoleSettings::default();
        settings.set("unicode", "on").unwrap();
        settings.set("coordinates", "OFF").unwrap();
        settings.set("turn-order", "true").unwrap();

        assert!(settings.unicode_pieces);
        assert!(!settings.show_coordinates);
        assert!(settings.rules().enforce_turn_order);

        assert!(settings.set("bell", "maybe").is_err());
        assert!(settings.set("volume", "on").is_err());
        assert!(!settings.bell_on_move);
    }

    #[test]
    fn test_write_into_file_path_fails() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let result = ConsoleSettings::default().write(&blocker.join("settings.json"));
        assert!(result.is_err());
    }
}
