//! 依赖工厂抽象
//!
//! 工厂要么是直接使用的值，要么是每次解析都会被调用的构造函数

use crate::resolver::Arguments;
use infrastructure_common::{BoxError, TypeInfo};
use std::any::Any;
use std::fmt;
use std::sync::{Arc, Weak};

/// 解析得到的实例
pub type Instance = Arc<dyn Any + Send + Sync>;

/// 构造函数签名
pub type ConstructorFn = dyn Fn(Arguments) -> Result<Instance, BoxError> + Send + Sync;

/// 构造函数
///
/// 以解析好的依赖作为位置参数创建新实例
#[derive(Clone)]
pub struct Constructor {
    construct: Arc<ConstructorFn>,
    type_info: TypeInfo,
}

impl Constructor {
    /// 由闭包创建构造函数
    pub fn new<T, F>(construct: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(Arguments) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        Self {
            construct: Arc::new(move |args: Arguments| construct(args).map(|value| Arc::new(value) as Instance)),
            type_info: TypeInfo::of::<T>(),
        }
    }

    /// 调用构造函数
    pub fn construct(&self, args: Arguments) -> Result<Instance, BoxError> {
        (self.construct)(args)
    }

    /// 产出实例的类型信息
    pub fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("type", &self.type_info.module_path)
            .field("construct", &"<function>")
            .finish()
    }
}

/// 依赖工厂
#[derive(Clone)]
pub enum Factory {
    /// 原样使用的值
    Value(Instance),
    /// 弱引用持有的值，值被释放后无法再解析
    Weak(Weak<dyn Any + Send + Sync>),
    /// 构造函数
    Constructor(Arc<Constructor>),
}

impl Factory {
    /// 是否为构造函数
    ///
    /// 非构造函数的工厂总是按单例处理
    pub fn is_constructor(&self) -> bool {
        matches!(self, Self::Constructor(_))
    }

    /// 存储的值本身
    ///
    /// 构造函数返回其自身（可向下转型为 [`Constructor`]），弱引用值已释放时返回 `None`
    pub fn stored(&self) -> Option<Instance> {
        match self {
            Self::Value(value) => Some(Arc::clone(value)),
            Self::Weak(value) => value.upgrade(),
            Self::Constructor(constructor) => Some(Arc::clone(constructor) as Instance),
        }
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(_) => f.write_str("Factory::Value"),
            Self::Weak(value) => f
                .debug_struct("Factory::Weak")
                .field("alive", &(value.strong_count() > 0))
                .finish(),
            Self::Constructor(constructor) => {
                f.debug_tuple("Factory::Constructor").field(constructor).finish()
            }
        }
    }
}
