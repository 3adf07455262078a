//! 解析结果
//!
//! 依赖按声明顺序解析后以位置参数的形式交给构造函数和完成钩子

use crate::factory::Instance;
use infrastructure_common::{DependencyError, DependencyResult};
use std::any::Any;
use std::sync::Arc;

/// 按声明顺序解析好的依赖
#[derive(Clone, Default)]
pub struct Arguments {
    names: Vec<String>,
    values: Vec<Instance>,
}

impl Arguments {
    /// 创建预留容量的空参数列表
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            names: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
        }
    }

    /// 追加一个解析好的依赖
    pub fn push(&mut self, name: impl Into<String>, value: Instance) {
        self.names.push(name.into());
        self.values.push(value);
    }

    /// 参数个数
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// 是否没有参数
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// 第 `index` 个依赖的名称
    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// 第 `index` 个依赖的原始实例
    pub fn get_raw(&self, index: usize) -> DependencyResult<&Instance> {
        self.values
            .get(index)
            .ok_or(DependencyError::ArgumentOutOfRange {
                index,
                len: self.values.len(),
            })
    }

    /// 第 `index` 个依赖，向下转型为 `T`
    pub fn get<T: Any + Send + Sync>(&self, index: usize) -> DependencyResult<Arc<T>> {
        let value = self.get_raw(index)?;
        Arc::clone(value)
            .downcast::<T>()
            .map_err(|_| DependencyError::type_mismatch::<T>(self.name(index).unwrap_or_default()))
    }

    /// 按声明顺序遍历名称与实例
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Instance)> {
        self.names.iter().map(String::as_str).zip(self.values.iter())
    }

}

impl std::fmt::Debug for Arguments {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arguments").field("names", &self.names).finish()
    }
}
