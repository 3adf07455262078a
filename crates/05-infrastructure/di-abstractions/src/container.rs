//! 依赖容器抽象接口

use crate::factory::Instance;
use crate::registry::{Dependency, DependencyOptions};
use infrastructure_common::{DependencyError, DependencyResult};
use std::any::Any;
use std::sync::Arc;

/// 依赖容器 trait
///
/// 按名称注册依赖并递归解析。注册钩子拿到的就是实现此 trait 的容器本身。
pub trait DependencyContainer: Send + Sync {
    /// 注册依赖
    ///
    /// `options` 为 `None` 时使用依赖中嵌入的选项。名称缺失或已被注册时什么也不做。
    fn add(&self, dependency: Dependency, options: Option<DependencyOptions>) -> DependencyResult<()>;

    /// 按名称解析依赖
    ///
    /// 单例返回存储值本身，瞬时依赖每次构造新实例
    fn resolve(&self, name: &str) -> DependencyResult<Instance>;

    /// 执行所有尚未执行的完成钩子，返回本次执行的个数
    fn finish(&self) -> DependencyResult<usize>;

    /// 检查名称是否已注册
    fn contains(&self, name: &str) -> bool;

    /// 按注册顺序返回所有名称
    fn names(&self) -> Vec<String>;
}

/// 类型化解析扩展
pub trait DependencyContainerExt: DependencyContainer {
    /// 解析并向下转型为 `T`
    fn resolve_as<T: Any + Send + Sync>(&self, name: &str) -> DependencyResult<Arc<T>> {
        self.resolve(name)?
            .downcast::<T>()
            .map_err(|_| DependencyError::type_mismatch::<T>(name))
    }
}

impl<C: DependencyContainer + ?Sized> DependencyContainerExt for C {}
