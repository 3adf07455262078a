//! 类型元数据

use std::any::TypeId;

/// 类型信息
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    /// 类型名称
    pub name: String,
    /// 类型ID
    pub id: TypeId,
    /// 模块路径
    pub module_path: String,
}

impl TypeInfo {
    /// 从类型获取类型信息
    pub fn of<T: ?Sized + 'static>() -> Self {
        let full_name = std::any::type_name::<T>();
        Self {
            name: full_name
                .split("::")
                .last()
                .unwrap_or(full_name)
                .to_string(),
            id: TypeId::of::<T>(),
            module_path: full_name.to_string(),
        }
    }

    /// 获取简短的类型名称（不包含模块路径）
    pub fn short_name(&self) -> &str {
        &self.name
    }
}
