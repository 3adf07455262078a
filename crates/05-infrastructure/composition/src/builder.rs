//! 解析器构建器

use crate::manifest::DependencyManifest;
use di_abstractions::{Dependency, DependencyContainer, DependencyOptions};
use di_impl::DependencyResolver;
use infrastructure_common::InfrastructureError;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// 解析器构建器
///
/// 使用建造者模式按顺序收集依赖，构建时一次性注册到新容器
pub struct ResolverBuilder {
    /// 待注册的依赖及其选项
    dependencies: Vec<(Dependency, Option<DependencyOptions>)>,
    /// 是否启用日志初始化
    logging_enabled: bool,
    /// 日志配置
    logging_config: LoggingConfig,
}

impl ResolverBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self {
            dependencies: Vec::new(),
            logging_enabled: false, // 默认不启用日志初始化
            logging_config: LoggingConfig::default(),
        }
    }

    /// 添加依赖
    pub fn add_dependency(mut self, dependency: Dependency, options: Option<DependencyOptions>) -> Self {
        self.dependencies.push((dependency, options));
        self
    }

    /// 添加依赖清单
    pub fn add_manifest(mut self, manifest: DependencyManifest) -> Self {
        debug!("添加依赖清单，共 {} 项", manifest.len());
        self.dependencies.extend(
            manifest
                .into_dependencies()
                .into_iter()
                .map(|dependency| (dependency, None)),
        );
        self
    }

    /// 添加 JSON 依赖清单文件
    pub fn add_manifest_json<P: AsRef<Path>>(self, path: P) -> Result<Self, InfrastructureError> {
        info!("添加 JSON 依赖清单: {}", path.as_ref().display());
        let manifest = DependencyManifest::from_json_file(path)?;
        Ok(self.add_manifest(manifest))
    }

    /// 添加 TOML 依赖清单文件
    pub fn add_manifest_toml<P: AsRef<Path>>(self, path: P) -> Result<Self, InfrastructureError> {
        info!("添加 TOML 依赖清单: {}", path.as_ref().display());
        let manifest = DependencyManifest::from_toml_file(path)?;
        Ok(self.add_manifest(manifest))
    }

    /// 配置日志
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging_config = config;
        self.logging_enabled = true;
        self
    }

    /// 构建解析器
    pub fn build(self) -> Result<Arc<DependencyResolver>, InfrastructureError> {
        // 只有在明确配置了日志时才初始化日志
        if self.logging_enabled {
            self.initialize_logging()?;
        }

        let resolver = DependencyResolver::new();
        let count = self.dependencies.len();
        for (dependency, options) in self.dependencies {
            resolver.add(dependency, options)?;
        }

        info!("解析器构建完成，提交了 {} 个依赖", count);
        Ok(resolver)
    }

    /// 初始化日志系统
    fn initialize_logging(&self) -> Result<(), InfrastructureError> {
        let directive = self.logging_config.filter_directive();
        let filter = EnvFilter::try_new(&directive).map_err(|e| InfrastructureError::BootstrapFailed {
            message: format!("日志过滤规则无效: {}, 原因: {}", directive, e),
        })?;
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(self.logging_config.show_target)
            .with_file(self.logging_config.show_location)
            .with_line_number(self.logging_config.show_location);

        if self.logging_config.json_format {
            subscriber.json().try_init()
        } else {
            subscriber.try_init()
        }
        .map_err(|e| InfrastructureError::BootstrapFailed {
            message: format!("日志初始化失败: {}", e),
        })?;

        info!("日志系统初始化完成: {}", directive);
        Ok(())
    }
}

impl Default for ResolverBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// 默认日志级别
    pub level: tracing::Level,
    /// 额外的过滤规则，例如 `di_impl=trace`
    pub directives: Vec<String>,
    /// 是否显示目标
    pub show_target: bool,
    /// 是否显示文件名和行号
    pub show_location: bool,
    /// 是否使用 JSON 格式
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: tracing::Level::INFO,
            directives: Vec::new(),
            show_target: true,
            show_location: false,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// 开发环境：解析器各层输出调试日志
    pub fn development() -> Self {
        Self {
            level: tracing::Level::INFO,
            directives: vec![
                "di_impl=debug".to_string(),
                "infrastructure_composition=debug".to_string(),
            ],
            show_target: true,
            show_location: true,
            json_format: false,
        }
    }

    /// 生产环境：JSON 输出，解析器只保留警告
    pub fn production() -> Self {
        Self {
            level: tracing::Level::INFO,
            directives: vec!["di_impl=warn".to_string()],
            show_target: false,
            show_location: false,
            json_format: true,
        }
    }

    /// 追加过滤规则
    pub fn with_directive(mut self, directive: impl Into<String>) -> Self {
        self.directives.push(directive.into());
        self
    }

    /// 传给 `EnvFilter` 的完整过滤规则
    pub fn filter_directive(&self) -> String {
        std::iter::once(self.level.as_str().to_lowercase())
            .chain(self.directives.iter().cloned())
            .collect::<Vec<_>>()
            .join(",")
    }
}
