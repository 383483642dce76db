//! 持久化设置
//!
//! # 设计思路
//!
//! 背景色、透明开关、自定义尺寸串、iOS 仅白底开关在下次启动时恢复。
//! 设置文件是一个 JSON 键值表，本工具的记录固定存放在 [`SETTINGS_KEY`] 下，
//! 同一文件中的其他键原样保留。
//!
//! # 实现思路
//!
//! - 文件缺失、JSON 损坏、键缺失、字段类型不对：一律静默回退默认值（仅打 warn 日志）。
//! - 读取永不失败；写入失败返回 `AppError::Settings`。

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AppError;
use crate::icon::{BackgroundConfig, resolve_size_list};

/// 设置记录在键值表中的固定键。
pub const SETTINGS_KEY: &str = "pwa-icongen.settings.v1";

const SETTINGS_FILE_NAME: &str = "settings.json";

/// 持久化的用户设置。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedSettings {
    /// 十六进制背景色。
    pub background: String,
    pub transparent: bool,
    /// 自定义尺寸串，如 `"16, 32, 64"`；为空表示默认尺寸。
    pub custom_sizes: String,
    pub ios_white_only: bool,
}

impl Default for PersistedSettings {
    fn default() -> Self {
        Self {
            background: "#ffffff".to_string(),
            transparent: true,
            custom_sizes: String::new(),
            ios_white_only: false,
        }
    }
}

impl PersistedSettings {
    /// 生效的背景配置。颜色无法解析时回退白色。
    pub fn background_config(&self) -> BackgroundConfig {
        if self.transparent {
            return BackgroundConfig::Transparent;
        }
        BackgroundConfig::parse(&self.background).unwrap_or_else(|err| {
            log::warn!("⚠️ 已保存的背景色无效，回退白色：{}", err);
            BackgroundConfig::WHITE
        })
    }

    /// 生效的尺寸列表。
    pub fn sizes(&self) -> Vec<u32> {
        resolve_size_list(&self.custom_sizes)
    }
}

/// 基于 JSON 文件的设置存储。
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 平台默认配置目录下的 `settings.json`。
    pub fn default_path() -> Result<PathBuf, AppError> {
        let dirs = ProjectDirs::from("dev", "pwa-icongen", "pwa-icongen")
            .ok_or_else(|| AppError::Settings("无法确定用户配置目录".to_string()))?;
        Ok(dirs.config_dir().join(SETTINGS_FILE_NAME))
    }

    pub fn open_default() -> Result<Self, AppError> {
        Ok(Self::new(Self::default_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Map<String, Value> {
        let Ok(content) = fs::read_to_string(&self.path) else {
            return Map::new();
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                log::warn!("⚠️ 设置文件损坏，按默认设置处理：{}", self.path.display());
                Map::new()
            }
        }
    }

    fn write_map(&self, map: Map<String, Value>) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| AppError::Settings(format!("创建设置目录失败: {}", e)))?;
        }

        let content = serde_json::to_string_pretty(&Value::Object(map))
            .map_err(|e| AppError::Settings(format!("序列化设置失败: {}", e)))?;

        fs::write(&self.path, content)
            .map_err(|e| AppError::Settings(format!("写入设置文件失败: {}", e)))
    }

    /// 读取设置；任何异常都回退默认值。
    pub fn load(&self) -> PersistedSettings {
        let mut map = self.read_map();
        let Some(record) = map.remove(SETTINGS_KEY) else {
            return PersistedSettings::default();
        };

        serde_json::from_value(record).unwrap_or_else(|err| {
            log::warn!("⚠️ 设置记录无效，按默认设置处理：{}", err);
            PersistedSettings::default()
        })
    }

    pub fn save(&self, settings: &PersistedSettings) -> Result<(), AppError> {
        let mut map = self.read_map();
        let record = serde_json::to_value(settings)
            .map_err(|e| AppError::Settings(format!("序列化设置失败: {}", e)))?;
        map.insert(SETTINGS_KEY.to_string(), record);
        self.write_map(map)
    }

    /// 删除本工具的记录，保留文件中的其他键。
    pub fn reset(&self) -> Result<(), AppError> {
        let mut map = self.read_map();
        if map.remove(SETTINGS_KEY).is_some() {
            self.write_map(map)?;
        }
        Ok(())
    }
}
