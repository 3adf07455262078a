//! # 依赖解析器演示
//!
//! 演示：
//! - 从清单注册值依赖
//! - 构造函数依赖与导出
//! - 注册钩子与完成钩子

use di_abstractions::{Dependency, DependencyContainer, DependencyContainerExt, DependencyOptions};
use di_impl::DependencyResolver;
use infrastructure_composition::{DependencyManifest, LoggingConfig, ResolverBuilder};
use std::sync::{Arc, Mutex};
use tracing::info;

const MANIFEST: &str = r#"
[[dependencies]]
name = "greeting"
value = { prefix = "Hello" }
"#;

/// 依赖问候配置的瞬时服务
struct Foo {
    greeting: Arc<serde_json::Value>,
}

impl Foo {
    fn bar(&self, text: &str) -> String {
        let prefix = self.greeting["prefix"].as_str().unwrap_or_default();
        format!("{}, {}", prefix, text.to_uppercase())
    }
}

/// 注册时被规范化的文本模型
struct BarModel {
    text: Mutex<String>,
}

fn start_case(text: &str) -> String {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn bar_model_dependency() -> Dependency {
    let model = Arc::new(BarModel {
        text: Mutex::new("hello world!".to_string()),
    });
    let register_model = Arc::clone(&model);
    let finish_model = Arc::clone(&model);

    Dependency::instance(model).with_options(
        DependencyOptions::new()
            .named("BarModel")
            .single()
            .depends_on(["greeting"])
            .on_register(move |_| {
                let mut text = register_model.text.lock().map_err(|e| e.to_string())?;
                *text = start_case(&text);
                Ok(())
            })
            .on_finish(move |args| {
                let greeting = args.get::<serde_json::Value>(0)?;
                let text = finish_model.text.lock().map_err(|e| e.to_string())?;
                info!("BarModel 完成: {} / {}", text, greeting);
                Ok(())
            }),
    )
}

fn main() -> anyhow::Result<()> {
    let resolver = ResolverBuilder::new()
        .with_logging(LoggingConfig::development())
        .add_manifest(DependencyManifest::from_toml_str(MANIFEST)?)
        .build()?;

    let foo = Dependency::constructor(|args| {
        Ok(Foo {
            greeting: args.get::<serde_json::Value>(0)?,
        })
    })
    .with_options(
        DependencyOptions::new()
            .named("Foo")
            .depends_on(["greeting"])
            .export(bar_model_dependency()),
    );
    resolver.add(foo, None)?;

    let executed = resolver.finish()?;
    info!("执行了 {} 个完成钩子", executed);

    let foo = resolver.resolve_as::<Foo>("Foo")?;
    info!("Foo.bar: {}", foo.bar("hi"));

    let model = resolver.resolve_as::<BarModel>("BarModel")?;
    let text = model.text.lock().map_err(|e| anyhow::anyhow!(e.to_string()))?.clone();
    info!("BarModel.text: {}", text);

    let this = resolver.resolve_as::<DependencyResolver>(DependencyResolver::NAME)?;
    info!("已注册依赖: {:?}", this.names());

    Ok(())
}
