//! 依赖清单
//!
//! 以 JSON 或 TOML 声明一组值依赖，由构建器批量注册。
//!
//! ```toml
//! [[dependencies]]
//! name = "settings"
//! value = { title = "demo" }
//!
//! [[dependencies]]
//! name = "banner"
//! dependencies = ["settings"]
//! value = "hello world!"
//! ```

use di_abstractions::{Dependency, DependencyOptions};
use infrastructure_common::{Lifetime, ManifestError, ManifestResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// 依赖清单
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DependencyManifest {
    /// 按声明顺序注册的依赖
    #[serde(default)]
    pub dependencies: Vec<ManifestEntry>,
}

/// 清单中的一项依赖
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// 唯一名称
    pub name: String,
    /// 依赖名称，默认为空
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// 是否单例。清单中的值总会被当作单例注册，此字段仅为保持对称
    #[serde(default = "default_single")]
    pub single: bool,
    /// 依赖的值，默认为 `null`
    #[serde(default)]
    pub value: serde_json::Value,
}

fn default_single() -> bool {
    true
}

impl ManifestEntry {
    /// 转换为待注册的依赖，选项嵌入依赖本身
    pub fn into_dependency(self) -> Dependency {
        let options = DependencyOptions::new()
            .named(self.name)
            .depends_on(self.dependencies)
            .with_lifetime(Lifetime::from_single(self.single));
        Dependency::value(self.value).with_options(options)
    }
}

impl DependencyManifest {
    /// 解析 JSON 清单
    pub fn from_json_str(content: &str) -> ManifestResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// 解析 TOML 清单
    pub fn from_toml_str(content: &str) -> ManifestResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// 读取 JSON 清单文件
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ManifestResult<Self> {
        let content = read_manifest(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// 读取 TOML 清单文件
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> ManifestResult<Self> {
        let content = read_manifest(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// 清单中的依赖个数
    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    /// 清单是否为空
    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }

    /// 转换为待注册的依赖
    pub fn into_dependencies(self) -> Vec<Dependency> {
        self.dependencies
            .into_iter()
            .map(ManifestEntry::into_dependency)
            .collect()
    }
}

fn read_manifest(path: &Path) -> ManifestResult<String> {
    if !path.exists() {
        return Err(ManifestError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    info!("读取依赖清单: {}", path.display());
    let content = std::fs::read_to_string(path)?;
    debug!("依赖清单大小: {} 字节", content.len());
    Ok(content)
}
