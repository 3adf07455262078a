//! # 依赖解析器实现
//!
//! 按名称保存依赖定义，解析时先递归解析声明的依赖，再返回单例值或构造新实例。
//!
//! 解析过程不检测循环依赖，循环的依赖图会无限递归直至栈溢出。

use di_abstractions::{
    Arguments, DefinitionInfo, Dependency, DependencyContainer, DependencyOptions, Export, Factory,
    FinishHook, Instance, RegisterHook,
};
use indexmap::IndexMap;
use infrastructure_common::{DependencyError, DependencyResult, HookKind, Lifetime, TypeInfo};
use parking_lot::RwLock;
use std::any::Any;
use std::sync::{Arc, Weak};
use tracing::{debug, info, warn};

/// 注册表中的依赖定义
struct Definition {
    name: String,
    factory: Factory,
    dependency_names: Vec<String>,
    lifetime: Lifetime,
    exports: Vec<Export>,
    on_register: Option<RegisterHook>,
    on_finish: Option<FinishHook>,
    /// 完成钩子已成功执行
    finished: bool,
    /// 完成钩子已被某次 `finish` 认领，正在执行
    finishing: bool,
    type_info: Option<TypeInfo>,
}

impl Definition {
    fn finish_pending(&self) -> bool {
        self.on_finish.is_some() && !self.finished
    }

    fn info(&self) -> DefinitionInfo {
        DefinitionInfo {
            name: self.name.clone(),
            dependency_names: self.dependency_names.clone(),
            lifetime: self.lifetime,
            is_constructor: self.factory.is_constructor(),
            export_count: self.exports.len(),
            has_register_hook: self.on_register.is_some(),
            finish_pending: self.finish_pending(),
            type_name: self.type_info.as_ref().map(|t| t.module_path.clone()),
        }
    }
}

/// 依赖解析器
///
/// 容器在创建时以 [`DependencyResolver::NAME`] 注册自身，因此可以像普通依赖一样被解析。
/// 注册表只以弱引用持有容器本身。
pub struct DependencyResolver {
    registrations: RwLock<IndexMap<String, Definition>>,
}

impl DependencyResolver {
    /// 容器自身的保留名称
    pub const NAME: &'static str = "DependencyResolver";

    /// 创建新的容器
    pub fn new() -> Arc<Self> {
        let container = Arc::new_cyclic(|this: &Weak<Self>| {
            let this: Weak<dyn Any + Send + Sync> = this.clone();
            let mut registrations = IndexMap::new();
            registrations.insert(
                Self::NAME.to_string(),
                Definition {
                    name: Self::NAME.to_string(),
                    factory: Factory::Weak(this),
                    dependency_names: Vec::new(),
                    lifetime: Lifetime::Singleton,
                    exports: Vec::new(),
                    on_register: None,
                    on_finish: None,
                    finished: false,
                    finishing: false,
                    type_info: Some(TypeInfo::of::<Self>()),
                },
            );
            Self {
                registrations: RwLock::new(registrations),
            }
        });
        info!("创建依赖解析器");
        container
    }

    /// 已注册的依赖数量（包含容器自身）
    pub fn len(&self) -> usize {
        self.registrations.read().len()
    }

    /// 注册表是否为空
    pub fn is_empty(&self) -> bool {
        self.registrations.read().is_empty()
    }

    /// 获取已注册依赖的信息
    pub fn definition(&self, name: &str) -> Option<DefinitionInfo> {
        self.registrations.read().get(name).map(Definition::info)
    }

    /// 尚未执行的完成钩子数量
    pub fn pending_finish_hooks(&self) -> usize {
        self.registrations
            .read()
            .values()
            .filter(|definition| definition.finish_pending())
            .count()
    }

    /// 按声明顺序解析一组依赖
    fn resolve_all(&self, names: &[String]) -> DependencyResult<Arguments> {
        let mut args = Arguments::with_capacity(names.len());
        for name in names {
            args.push(name.as_str(), self.resolve(name)?);
        }
        Ok(args)
    }
}

impl DependencyContainer for DependencyResolver {
    fn add(&self, dependency: Dependency, options: Option<DependencyOptions>) -> DependencyResult<()> {
        let Dependency {
            factory,
            options: embedded,
            type_info,
        } = dependency;
        let options = options.unwrap_or(embedded);

        let Some(name) = options.name.clone() else {
            warn!("依赖缺少名称，跳过注册");
            return Ok(());
        };

        let lifetime = if factory.is_constructor() {
            options.lifetime
        } else {
            Lifetime::Singleton
        };

        {
            let mut registrations = self.registrations.write();
            if registrations.contains_key(&name) {
                debug!("依赖已注册，跳过: {}", name);
                return Ok(());
            }
            registrations.insert(
                name.clone(),
                Definition {
                    name: name.clone(),
                    factory,
                    dependency_names: options.dependency_names.clone(),
                    lifetime,
                    exports: options.exports.clone(),
                    on_register: options.on_register.clone(),
                    on_finish: options.on_finish.clone(),
                    finished: false,
                    finishing: false,
                    type_info,
                },
            );
        }
        debug!(
            "注册依赖: {} ({:?}), 依赖: {:?}, 导出: {}",
            name,
            lifetime,
            options.dependency_names,
            options.exports.len()
        );

        for export in options.exports {
            self.add(export.dependency, export.options)?;
        }

        if let Some(hook) = options.on_register {
            debug!("执行注册钩子: {}", name);
            hook(self).map_err(|source| DependencyError::HookFailed {
                name: name.clone(),
                hook: HookKind::Register,
                source,
            })?;
        }

        Ok(())
    }

    fn resolve(&self, name: &str) -> DependencyResult<Instance> {
        let (factory, dependency_names, lifetime) = {
            let registrations = self.registrations.read();
            let definition = registrations
                .get(name)
                .ok_or_else(|| DependencyError::not_registered(name))?;
            (
                definition.factory.clone(),
                definition.dependency_names.clone(),
                definition.lifetime,
            )
        };

        let args = self.resolve_all(&dependency_names)?;

        match &factory {
            Factory::Constructor(constructor) if !lifetime.is_singleton() => {
                debug!("构造新实例: {}", name);
                constructor
                    .construct(args)
                    .map_err(|source| DependencyError::ComponentCreationFailed {
                        name: name.to_string(),
                        source,
                    })
            }
            _ => factory.stored().ok_or_else(|| DependencyError::Released {
                name: name.to_string(),
            }),
        }
    }

    fn finish(&self) -> DependencyResult<usize> {
        let pending: Vec<String> = self
            .registrations
            .read()
            .values()
            .filter(|definition| definition.finish_pending())
            .map(|definition| definition.name.clone())
            .collect();

        let mut executed = 0;
        for name in pending {
            // 在写锁内认领钩子，并发的 finish 不会重复执行同一个钩子
            let claimed = {
                let mut registrations = self.registrations.write();
                registrations.get_mut(&name).and_then(|definition| {
                    if definition.finished || definition.finishing {
                        return None;
                    }
                    let hook = definition.on_finish.clone()?;
                    definition.finishing = true;
                    Some((hook, definition.dependency_names.clone()))
                })
            };
            let Some((hook, dependency_names)) = claimed else {
                continue;
            };

            let result = self.resolve_all(&dependency_names).and_then(|args| {
                debug!("执行完成钩子: {}", name);
                hook(args).map_err(|source| DependencyError::HookFailed {
                    name: name.clone(),
                    hook: HookKind::Finish,
                    source,
                })
            });

            // 失败的钩子释放认领，保持待执行
            if let Some(definition) = self.registrations.write().get_mut(&name) {
                definition.finishing = false;
                if result.is_ok() {
                    definition.finished = true;
                }
            }
            result?;
            executed += 1;
        }

        info!("完成钩子执行完毕，本次执行 {} 个", executed);
        Ok(executed)
    }

    fn contains(&self, name: &str) -> bool {
        self.registrations.read().contains_key(name)
    }

    fn names(&self) -> Vec<String> {
        self.registrations.read().keys().cloned().collect()
    }
}

impl std::fmt::Debug for DependencyResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependencyResolver")
            .field("names", &self.names())
            .finish()
    }
}
