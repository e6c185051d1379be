//! 蒙皮配置系统
//!
//! 提供 TOML 配置文件的加载与保存，用于选择蒙皮方式等启动期选项。

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::animation::SkinMethod;

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 文件读取错误
    #[error("Config file error: {0}")]
    FileError(#[from] std::io::Error),
    /// 解析错误
    #[error("Config parse error: {0}")]
    ParseError(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// 蒙皮配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkinningConfig {
    /// 首选蒙皮方式（超过硬件骨骼上限时运行期仍会降级）
    pub method: SkinMethod,

    /// 是否在绑定时捕获法线数据（软件路径会同时变换法线）
    #[serde(default = "default_bind_normals")]
    pub bind_normals: bool,
}

fn default_bind_normals() -> bool {
    true
}

impl Default for SkinningConfig {
    fn default() -> Self {
        Self {
            method: SkinMethod::HardwareMultiBone,
            bind_normals: true,
        }
    }
}

impl SkinningConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从 TOML 字符串解析配置
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 从文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// 序列化为 TOML 字符串
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 保存到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content = self.to_toml_string()?;
        fs::write(path, content)?;
        Ok(())
    }
}
