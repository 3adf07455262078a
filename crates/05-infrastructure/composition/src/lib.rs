//! # 基础设施组合层
//!
//! 将依赖解析器与日志、依赖清单组合在一起。
//!
//! ## 主要功能
//!
//! - **解析器构建器**: 使用构建者模式收集依赖并创建容器
//! - **依赖清单**: 从 JSON / TOML 声明值依赖
//! - **日志初始化**: 按 [`LoggingConfig`] 初始化 `tracing` 订阅者
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use di_abstractions::{DependencyContainer, DependencyContainerExt};
//! use infrastructure_composition::{LoggingConfig, ResolverBuilder};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let resolver = ResolverBuilder::new()
//!         .with_logging(LoggingConfig::development())
//!         .add_manifest_toml("./dependencies.toml")?
//!         .build()?;
//!
//!     let settings = resolver.resolve_as::<serde_json::Value>("settings")?;
//!     println!("配置: {}", settings);
//!
//!     resolver.finish()?;
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod manifest;


// 重新导出主要类型
pub use builder::{LoggingConfig, ResolverBuilder};
pub use manifest::{DependencyManifest, ManifestEntry};

// 重新导出错误类型
pub use infrastructure_common::InfrastructureError;
