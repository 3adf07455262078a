//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义按名称注册和解析依赖所需的类型与接口。
//!
//! ## 核心类型
//!
//! - [`DependencyContainer`] - 容器接口（`add` / `resolve` / `finish`）
//! - [`Dependency`] / [`DependencyOptions`] - 待注册的依赖及其选项
//! - [`Factory`] / [`Constructor`] - 值或构造函数
//! - [`Arguments`] - 按声明顺序解析好的依赖

pub mod container;
pub mod factory;
pub mod registry;
pub mod resolver;

pub use container::*;
pub use factory::*;
pub use registry::*;
pub use resolver::*;
