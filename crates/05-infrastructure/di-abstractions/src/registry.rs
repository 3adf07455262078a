//! 依赖定义
//!
//! [`Dependency`] 是交给容器注册的原始依赖，[`DependencyOptions`] 描述它的名称、
//! 依赖、生命周期、导出和钩子。选项既可以随 `add` 单独传入，也可以嵌入依赖本身。

use crate::container::DependencyContainer;
use crate::factory::{Constructor, Factory, Instance};
use crate::resolver::Arguments;
use infrastructure_common::{BoxError, Lifetime, TypeInfo};
use std::any::Any;
use std::fmt;
use std::sync::{Arc, Weak};

/// 注册钩子，`add` 结束时以容器为唯一参数调用一次
pub type RegisterHook = Arc<dyn Fn(&dyn DependencyContainer) -> Result<(), BoxError> + Send + Sync>;

/// 完成钩子，`finish` 时以解析好的依赖调用，最多成功执行一次
pub type FinishHook = Arc<dyn Fn(Arguments) -> Result<(), BoxError> + Send + Sync>;

/// 依赖选项
#[derive(Clone, Default)]
pub struct DependencyOptions {
    /// 唯一名称，缺失时 `add` 不做任何事
    pub name: Option<String>,
    /// 依赖名称，按声明顺序解析，默认为空
    pub dependency_names: Vec<String>,
    /// 生命周期，默认瞬时；非构造函数总是单例
    pub lifetime: Lifetime,
    /// 随本依赖一起注册的其他依赖，默认为空
    pub exports: Vec<Export>,
    /// 注册钩子
    pub on_register: Option<RegisterHook>,
    /// 完成钩子
    pub on_finish: Option<FinishHook>,
}

impl DependencyOptions {
    /// 创建默认选项
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置名称
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// 设置依赖名称
    pub fn depends_on<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependency_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// 设置为单例
    pub fn single(self) -> Self {
        self.with_lifetime(Lifetime::Singleton)
    }

    /// 设置生命周期
    pub fn with_lifetime(mut self, lifetime: Lifetime) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// 添加导出
    pub fn export(mut self, export: impl Into<Export>) -> Self {
        self.exports.push(export.into());
        self
    }

    /// 添加带独立选项的导出
    pub fn export_with(self, dependency: Dependency, options: DependencyOptions) -> Self {
        self.export(Export::with_options(dependency, options))
    }

    /// 设置注册钩子
    pub fn on_register<F>(mut self, hook: F) -> Self
    where
        F: Fn(&dyn DependencyContainer) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.on_register = Some(Arc::new(hook));
        self
    }

    /// 设置完成钩子
    pub fn on_finish<F>(mut self, hook: F) -> Self
    where
        F: Fn(Arguments) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.on_finish = Some(Arc::new(hook));
        self
    }
}

impl fmt::Debug for DependencyOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependencyOptions")
            .field("name", &self.name)
            .field("dependency_names", &self.dependency_names)
            .field("lifetime", &self.lifetime)
            .field("exports", &self.exports)
            .field("on_register", &self.on_register.is_some())
            .field("on_finish", &self.on_finish.is_some())
            .finish()
    }
}

/// 原始依赖
#[derive(Debug, Clone)]
pub struct Dependency {
    /// 工厂
    pub factory: Factory,
    /// 嵌入的选项，`add` 未单独传入选项时使用
    pub options: DependencyOptions,
    /// 值或构造产物的类型信息
    pub type_info: Option<TypeInfo>,
}

impl Dependency {
    /// 以值创建依赖
    pub fn value<T: Any + Send + Sync>(value: T) -> Self {
        Self::from_factory(Factory::Value(Arc::new(value)), Some(TypeInfo::of::<T>()))
    }

    /// 以已共享的实例创建依赖
    pub fn instance(instance: Instance) -> Self {
        Self::from_factory(Factory::Value(instance), None)
    }

    /// 以弱引用持有的值创建依赖
    pub fn weak<T: Any + Send + Sync>(value: &Arc<T>) -> Self {
        let weak: Weak<dyn Any + Send + Sync> = Arc::downgrade(value) as Weak<dyn Any + Send + Sync>;
        Self::from_factory(Factory::Weak(weak), Some(TypeInfo::of::<T>()))
    }

    /// 以构造函数创建依赖
    pub fn constructor<T, F>(construct: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(Arguments) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        let constructor = Constructor::new(construct);
        let type_info = constructor.type_info().clone();
        Self::from_factory(Factory::Constructor(Arc::new(constructor)), Some(type_info))
    }

    /// 以工厂创建依赖
    pub fn from_factory(factory: Factory, type_info: Option<TypeInfo>) -> Self {
        Self {
            factory,
            options: DependencyOptions::default(),
            type_info,
        }
    }

    /// 嵌入选项
    pub fn with_options(mut self, options: DependencyOptions) -> Self {
        self.options = options;
        self
    }

    /// 嵌入选项中的名称
    pub fn name(&self) -> Option<&str> {
        self.options.name.as_deref()
    }
}

/// 导出项
///
/// 可以是自带选项的依赖，也可以是依赖与单独选项的组合
#[derive(Debug, Clone)]
pub struct Export {
    /// 导出的依赖
    pub dependency: Dependency,
    /// 单独的选项，为 `None` 时使用依赖中嵌入的选项
    pub options: Option<DependencyOptions>,
}

impl Export {
    /// 创建带独立选项的导出
    pub fn with_options(dependency: Dependency, options: DependencyOptions) -> Self {
        Self {
            dependency,
            options: Some(options),
        }
    }
}

impl From<Dependency> for Export {
    fn from(dependency: Dependency) -> Self {
        Self {
            dependency,
            options: None,
        }
    }
}

/// 已注册依赖的只读信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionInfo {
    /// 唯一名称
    pub name: String,
    /// 依赖名称
    pub dependency_names: Vec<String>,
    /// 生命周期
    pub lifetime: Lifetime,
    /// 工厂是否为构造函数
    pub is_constructor: bool,
    /// 直接声明的导出个数
    pub export_count: usize,
    /// 是否有注册钩子
    pub has_register_hook: bool,
    /// 完成钩子是否尚未执行
    pub finish_pending: bool,
    /// 值或构造产物的完整类型名
    pub type_name: Option<String>,
}
