//! 错误类型定义

use std::fmt;
use thiserror::Error;

/// 装箱的错误类型，钩子和构造函数可以返回任意错误
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 生命周期钩子种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    /// 注册钩子，`add` 结束时调用
    Register,
    /// 完成钩子，`finish` 时调用
    Finish,
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Register => f.write_str("register"),
            Self::Finish => f.write_str("finish"),
        }
    }
}

/// 依赖注入错误类型
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("依赖未注册: {name}")]
    ComponentNotRegistered { name: String },

    #[error("依赖创建失败: {name}, 原因: {source}")]
    ComponentCreationFailed { name: String, source: BoxError },

    #[error("{hook} 钩子执行失败: {name}, 原因: {source}")]
    HookFailed {
        name: String,
        hook: HookKind,
        source: BoxError,
    },

    #[error("依赖类型不匹配: {name}, 期望类型 {expected}")]
    TypeMismatch { name: String, expected: &'static str },

    #[error("参数索引越界: {index}, 参数个数 {len}")]
    ArgumentOutOfRange { index: usize, len: usize },

    #[error("依赖实例已被释放: {name}")]
    Released { name: String },
}

impl DependencyError {
    /// 创建未注册错误
    pub fn not_registered(name: impl Into<String>) -> Self {
        Self::ComponentNotRegistered { name: name.into() }
    }

    /// 创建类型不匹配错误
    pub fn type_mismatch<T: ?Sized>(name: impl Into<String>) -> Self {
        Self::TypeMismatch {
            name: name.into(),
            expected: std::any::type_name::<T>(),
        }
    }

    /// 是否为未注册错误
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ComponentNotRegistered { .. })
    }
}

/// 依赖清单错误类型
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("清单文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("清单文件读取失败: {source}")]
    FileReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("JSON 清单解析失败: {source}")]
    JsonParseError {
        #[from]
        source: serde_json::Error,
    },

    #[error("TOML 清单解析失败: {source}")]
    TomlParseError {
        #[from]
        source: toml::de::Error,
    },
}

/// 基础设施错误类型
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("依赖注入错误: {source}")]
    DependencyError {
        #[from]
        source: DependencyError,
    },

    #[error("依赖清单错误: {source}")]
    ManifestError {
        #[from]
        source: ManifestError,
    },

    #[error("基础设施启动失败: {message}")]
    BootstrapFailed { message: String },
}

/// 依赖注入结果类型别名
pub type DependencyResult<T> = Result<T, DependencyError>;
/// 依赖清单结果类型别名
pub type ManifestResult<T> = Result<T, ManifestError>;
/// 基础设施结果类型别名
pub type InfrastructureResult<T> = Result<T, InfrastructureError>;
