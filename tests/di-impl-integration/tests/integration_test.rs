//! Centralized integration tests for di-impl crate
use di_abstractions::{
    Constructor, Dependency, DependencyContainer, DependencyContainerExt, DependencyOptions, Export,
};
use di_impl::DependencyResolver;
use infrastructure_common::{DependencyError, HookKind};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

static INIT_LOGGER: Once = Once::new();

fn init_test_logger() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// 测试对象
#[derive(Debug)]
struct Flag {
    test: bool,
}

/// 模拟 lodash 的工具对象
#[derive(Debug, Default)]
struct Lodash {
    camel_case_calls: AtomicUsize,
}

impl Lodash {
    fn camel_case(&self, text: &str) -> String {
        self.camel_case_calls.fetch_add(1, Ordering::SeqCst);
        let mut out = String::new();
        let mut upper = false;
        for (i, ch) in text.chars().enumerate() {
            if !ch.is_alphanumeric() {
                upper = true;
            } else if upper && i > 0 {
                out.extend(ch.to_uppercase());
                upper = false;
            } else {
                out.extend(ch.to_lowercase());
            }
        }
        out
    }

    fn start_case(&self, text: &str) -> String {
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
}

/// 模拟 Promise 库
#[derive(Debug, Default)]
struct Promise;

impl Promise {
    fn resolve<T>(&self, value: T) -> Result<T, anyhow::Error> {
        Ok(value)
    }
}

/// 带文本的可变模型
#[derive(Debug)]
struct TextModel {
    text: Mutex<String>,
    text2: Mutex<Option<String>>,
}

impl TextModel {
    fn new(text: &str) -> Self {
        Self {
            text: Mutex::new(text.to_string()),
            text2: Mutex::new(None),
        }
    }
}

/// 记录构造参数的瞬时对象
#[derive(Debug)]
struct Recorder {
    lodash: Arc<Lodash>,
}

fn add_libraries(container: &DependencyResolver) -> (Arc<Lodash>, Arc<Promise>) {
    let lodash = Arc::new(Lodash::default());
    let promise = Arc::new(Promise);
    container
        .add(
            Dependency::instance(lodash.clone()),
            Some(DependencyOptions::new().named("_").single()),
        )
        .unwrap();
    container
        .add(
            Dependency::instance(promise.clone()),
            Some(DependencyOptions::new().named("Promise").single()),
        )
        .unwrap();
    (lodash, promise)
}

#[test]
fn test_container_exposes_add_resolve_finish() {
    init_test_logger();
    let container = DependencyResolver::new();

    let resolved = container
        .resolve_as::<DependencyResolver>(DependencyResolver::NAME)
        .unwrap();
    assert!(Arc::ptr_eq(&resolved, &container));

    resolved
        .add(Dependency::value(Flag { test: true }), Some(DependencyOptions::new().named("X")))
        .unwrap();
    assert!(container.resolve_as::<Flag>("X").unwrap().test);
    assert_eq!(resolved.finish().unwrap(), 0);
}

#[test]
fn test_add_object_dependency_and_resolve_it() {
    init_test_logger();
    let container = DependencyResolver::new();
    let dependency =
        Dependency::value(Flag { test: true }).with_options(DependencyOptions::new().named("testTrue"));

    container.add(dependency, None).unwrap();

    assert!(container.resolve_as::<Flag>("testTrue").unwrap().test);
}

#[test]
fn test_singleton_law() {
    init_test_logger();
    let container = DependencyResolver::new();
    container
        .add(Dependency::value(Flag { test: true }), Some(DependencyOptions::new().named("X")))
        .unwrap();

    let first = container.resolve("X").unwrap();
    let second = container.resolve("X").unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_singleton_constructor_resolves_to_itself() {
    init_test_logger();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let dependency = Dependency::constructor(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(Flag { test: true })
    });
    let container = DependencyResolver::new();

    container
        .add(dependency, Some(DependencyOptions::new().named("testTrue").single()))
        .unwrap();

    let resolved = container.resolve("testTrue").unwrap();
    assert!(resolved.downcast::<Constructor>().is_ok());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_transient_law_with_dependencies() {
    init_test_logger();
    let container = DependencyResolver::new();
    let (lodash, _) = add_libraries(&container);
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();

    container
        .add(
            Dependency::constructor(move |args| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Recorder {
                    lodash: args.get::<Lodash>(0)?,
                })
            }),
            Some(DependencyOptions::new().named("testTrue").depends_on(["_"])),
        )
        .unwrap();

    let first = container.resolve_as::<Recorder>("testTrue").unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(Arc::ptr_eq(&first.lodash, &lodash));

    let second = container.resolve_as::<Recorder>("testTrue").unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(!Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&second.lodash, &lodash));
}

/// 依赖另一个瞬时对象的瞬时对象
#[derive(Debug)]
struct Outer {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    id: usize,
}

#[test]
fn test_transient_dependencies_are_re_resolved() {
    init_test_logger();
    let container = DependencyResolver::new();
    let inner_calls = Arc::new(AtomicUsize::new(0));
    let counter = inner_calls.clone();

    container
        .add(
            Dependency::constructor(move |_| {
                let id = counter.fetch_add(1, Ordering::SeqCst);
                Ok(Inner { id })
            }),
            Some(DependencyOptions::new().named("Z")),
        )
        .unwrap();
    container
        .add(
            Dependency::constructor(|args| {
                Ok(Outer {
                    inner: args.get::<Inner>(0)?,
                })
            }),
            Some(DependencyOptions::new().named("Y").depends_on(["Z"])),
        )
        .unwrap();

    let first = container.resolve_as::<Outer>("Y").unwrap();
    let second = container.resolve_as::<Outer>("Y").unwrap();

    assert_eq!(inner_calls.load(Ordering::SeqCst), 2);
    assert!(!Arc::ptr_eq(&first, &second));
    assert!(!Arc::ptr_eq(&first.inner, &second.inner));
    assert_eq!((first.inner.id, second.inner.id), (0, 1));
}

#[test]
fn test_dependencies_passed_in_declared_order() {
    init_test_logger();
    let container = DependencyResolver::new();
    add_libraries(&container);
    let order = Arc::new(Mutex::new(Vec::new()));
    let sink = order.clone();

    container
        .add(
            Dependency::constructor(move |args| {
                let names: Vec<String> = args.iter().map(|(name, _)| name.to_string()).collect();
                *sink.lock().unwrap() = names;
                args.get::<Promise>(0)?;
                args.get::<Lodash>(1)?;
                Ok(())
            }),
            Some(DependencyOptions::new().named("ordered").depends_on(["Promise", "_"])),
        )
        .unwrap();

    container.resolve("ordered").unwrap();
    assert_eq!(*order.lock().unwrap(), vec!["Promise", "_"]);
}

#[test]
fn test_add_exports() {
    init_test_logger();
    let container = DependencyResolver::new();
    add_libraries(&container);
    let bluebird = Arc::new(Promise);

    let options = DependencyOptions::new()
        .named("testTrue")
        .depends_on(["_"])
        .export(Export::with_options(
            Dependency::instance(bluebird.clone()),
            DependencyOptions::new().named("Bluebird").single(),
        ))
        .export(
            Dependency::value(Flag { test: true })
                .with_options(DependencyOptions::new().named("withoutOptions")),
        )
        .export(
            Dependency::value(Flag { test: false })
                .with_options(DependencyOptions::new().named("withoutDependency").single()),
        );

    container
        .add(Dependency::constructor(|_| Ok(())), Some(options))
        .unwrap();

    let resolved = container.resolve_as::<Promise>("Bluebird").unwrap();
    assert!(Arc::ptr_eq(&resolved, &bluebird));
    assert!(container.resolve_as::<Flag>("withoutOptions").unwrap().test);
    assert!(!container.resolve_as::<Flag>("withoutDependency").unwrap().test);
}

#[test]
fn test_nested_exports_register_depth_first() {
    init_test_logger();
    let container = DependencyResolver::new();

    let inner = Dependency::value(3_u8).with_options(DependencyOptions::new().named("grandchild"));
    let child = Dependency::value(2_u8)
        .with_options(DependencyOptions::new().named("child").export(inner));
    let sibling = Dependency::value(4_u8).with_options(DependencyOptions::new().named("sibling"));

    container
        .add(
            Dependency::value(1_u8),
            Some(DependencyOptions::new().named("parent").export(child).export(sibling)),
        )
        .unwrap();

    assert_eq!(
        container.names(),
        vec![DependencyResolver::NAME, "parent", "child", "grandchild", "sibling"]
    );
}

#[test]
fn test_register_hook_receives_container() {
    init_test_logger();
    let container = DependencyResolver::new();
    let (lodash, _) = add_libraries(&container);
    let model = Arc::new(TextModel::new("it-worked"));
    let hook_model = model.clone();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();

    container
        .add(
            Dependency::instance(model.clone()),
            Some(
                DependencyOptions::new()
                    .named("testTrue")
                    .depends_on(["Promise", "_"])
                    .on_register(move |container| {
                        counter.fetch_add(1, Ordering::SeqCst);
                        let lodash = container.resolve_as::<Lodash>("_")?;
                        let text = hook_model.text.lock().unwrap().clone();
                        *hook_model.text2.lock().unwrap() = Some(lodash.camel_case(&text));
                        Ok(())
                    }),
            ),
        )
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(lodash.camel_case_calls.load(Ordering::SeqCst), 1);
    let resolved = container.resolve_as::<TextModel>("testTrue").unwrap();
    assert_eq!(resolved.text2.lock().unwrap().as_deref(), Some("itWorked"));
}

#[test]
fn test_finish_hook_receives_dependencies_once() {
    init_test_logger();
    let container = DependencyResolver::new();
    let (lodash, _) = add_libraries(&container);
    let model = Arc::new(TextModel::new("it-worked"));
    let hook_model = model.clone();

    container
        .add(
            Dependency::instance(model.clone()),
            Some(
                DependencyOptions::new()
                    .named("testTrue")
                    .depends_on(["Promise", "_"])
                    .on_finish(move |args| {
                        let _promise = args.get::<Promise>(0)?;
                        let lodash = args.get::<Lodash>(1)?;
                        let text = hook_model.text.lock().unwrap().clone();
                        *hook_model.text2.lock().unwrap() = Some(lodash.camel_case(&text));
                        Ok(())
                    }),
            ),
        )
        .unwrap();

    assert_eq!(container.finish().unwrap(), 1);
    assert_eq!(container.finish().unwrap(), 0);

    assert_eq!(lodash.camel_case_calls.load(Ordering::SeqCst), 1);
    let resolved = container.resolve_as::<TextModel>("testTrue").unwrap();
    assert_eq!(resolved.text2.lock().unwrap().as_deref(), Some("itWorked"));
}

#[test]
fn test_finish_runs_hooks_added_after_previous_finish() {
    init_test_logger();
    let container = DependencyResolver::new();
    let calls = Arc::new(AtomicUsize::new(0));

    let first = calls.clone();
    container
        .add(
            Dependency::value(()),
            Some(DependencyOptions::new().named("first").on_finish(move |_| {
                first.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })),
        )
        .unwrap();
    container.finish().unwrap();

    let second = calls.clone();
    container
        .add(
            Dependency::value(()),
            Some(DependencyOptions::new().named("second").on_finish(move |_| {
                second.fetch_add(10, Ordering::SeqCst);
                Ok(())
            })),
        )
        .unwrap();
    assert_eq!(container.finish().unwrap(), 1);

    assert_eq!(calls.load(Ordering::SeqCst), 11);
}

#[test]
fn test_duplicate_add_keeps_original() {
    init_test_logger();
    let container = DependencyResolver::new();
    let finish_calls = Arc::new(AtomicUsize::new(0));
    let counter = finish_calls.clone();

    container
        .add(Dependency::value(Flag { test: true }), Some(DependencyOptions::new().named("X")))
        .unwrap();
    container
        .add(
            Dependency::value(Flag { test: false }),
            Some(DependencyOptions::new().named("X").on_finish(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })),
        )
        .unwrap();

    assert!(container.resolve_as::<Flag>("X").unwrap().test);
    container.finish().unwrap();
    assert_eq!(finish_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_reserved_name_cannot_be_replaced() {
    init_test_logger();
    let container = DependencyResolver::new();
    container
        .add(
            Dependency::value(Flag { test: true }),
            Some(DependencyOptions::new().named(DependencyResolver::NAME)),
        )
        .unwrap();

    assert!(container
        .resolve_as::<DependencyResolver>(DependencyResolver::NAME)
        .is_ok());
}

#[test]
fn test_throws_when_not_able_to_be_resolved() {
    init_test_logger();
    let container = DependencyResolver::new();

    let err = container.resolve("testTrue2").unwrap_err();
    assert!(matches!(err, DependencyError::ComponentNotRegistered { ref name } if name == "testTrue2"));
}

#[test]
fn test_type_mismatch_on_typed_resolve() {
    init_test_logger();
    let container = DependencyResolver::new();
    container
        .add(Dependency::value(1_u32), Some(DependencyOptions::new().named("n")))
        .unwrap();

    assert!(matches!(
        container.resolve_as::<String>("n"),
        Err(DependencyError::TypeMismatch { .. })
    ));
}

#[test]
fn test_register_hook_failure_keeps_partial_state() {
    init_test_logger();
    let container = DependencyResolver::new();

    let result = container.add(
        Dependency::value(()),
        Some(
            DependencyOptions::new()
                .named("parent")
                .export(Dependency::value(1_u8).with_options(DependencyOptions::new().named("child")))
                .on_register(|container| {
                    container.resolve("missing")?;
                    Ok(())
                }),
        ),
    );

    match result {
        Err(DependencyError::HookFailed { name, hook, source }) => {
            assert_eq!(name, "parent");
            assert_eq!(hook, HookKind::Register);
            assert!(source.to_string().contains("missing"));
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(container.contains("parent"));
    assert!(container.contains("child"));
}

#[test]
fn test_finish_failure_stops_pass_without_rollback() {
    init_test_logger();
    let container = DependencyResolver::new();
    let calls = Arc::new(AtomicUsize::new(0));

    let ok = calls.clone();
    container
        .add(
            Dependency::value(()),
            Some(DependencyOptions::new().named("ok").on_finish(move |_| {
                ok.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })),
        )
        .unwrap();
    container
        .add(
            Dependency::value(()),
            Some(
                DependencyOptions::new()
                    .named("needs-missing")
                    .depends_on(["missing"])
                    .on_finish(|_| Ok(())),
            ),
        )
        .unwrap();

    assert!(container.finish().unwrap_err().is_not_found());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(container.pending_finish_hooks(), 1);

    container
        .add(Dependency::value(()), Some(DependencyOptions::new().named("missing")))
        .unwrap();
    assert_eq!(container.finish().unwrap(), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_readme_example() {
    init_test_logger();
    let container = DependencyResolver::new();
    let (lodash, _) = add_libraries(&container);
    let log = Arc::new(Mutex::new(Vec::<String>::new()));

    /// 依赖 Promise 的瞬时服务
    struct Foo {
        promise: Arc<Promise>,
    }

    impl Foo {
        fn bar(&self, text: &str) -> Result<String, anyhow::Error> {
            self.promise.resolve(text.to_uppercase())
        }
    }

    let bar_model = Arc::new(TextModel::new("hello world!"));
    let register_model = bar_model.clone();
    let after_model = bar_model.clone();
    let sink = log.clone();
    let bar = Dependency::instance(bar_model.clone()).with_options(
        DependencyOptions::new()
            .named("BarModel")
            .single()
            .depends_on(["_"])
            .on_register(move |container| {
                let lodash = container.resolve_as::<Lodash>("_")?;
                let mut text = register_model.text.lock().unwrap();
                *text = lodash.start_case(&text);
                Ok(())
            })
            .on_finish(move |args| {
                let lodash = args.get::<Lodash>(0)?;
                let text = after_model.text.lock().unwrap().clone();
                sink.lock()
                    .unwrap()
                    .push(format!("before: {} after: {}", text, lodash.camel_case(&text)));
                Ok(())
            }),
    );

    let foo = Dependency::constructor(|args| {
        Ok(Foo {
            promise: args.get::<Promise>(0)?,
        })
    })
    .with_options(DependencyOptions::new().named("Foo").depends_on(["Promise"]).export(bar));

    container.add(foo, None).unwrap();
    container.finish().unwrap();

    let foo = container.resolve_as::<Foo>("Foo").unwrap();
    assert_eq!(foo.bar("hi").unwrap(), "HI");

    let log = log.lock().unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0], "before: Hello World after: helloWorld");
    assert_eq!(lodash.camel_case_calls.load(Ordering::SeqCst), 1);
}
