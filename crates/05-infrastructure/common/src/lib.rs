//! # Infrastructure Common
//!
//! 依赖解析器各层共用的类型。
//!
//! ## 核心类型
//!
//! - [`DependencyError`] - 依赖注册、解析与钩子执行的错误
//! - [`InfrastructureError`] - 组合层错误
//! - [`Lifetime`] - 单例 / 瞬时生命周期
//! - [`TypeInfo`] - 类型元数据

pub mod errors;
pub mod lifecycle;
pub mod metadata;

pub use errors::*;
pub use lifecycle::*;
pub use metadata::*;
