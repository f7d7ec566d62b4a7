use std::sync::Arc;

use parking_lot::Mutex;
use wirebox::{Container, Definition, Factory, Inject, InjectError, Lookup, TypeInfo};

trait Greeter: Send + Sync {
    fn greet(&self, who: &str) -> String;
}

struct English;

impl Greeter for English {
    fn greet(&self, who: &str) -> String {
        format!("Hello, {who}")
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Config {
    port: u16,
}

#[derive(Default, Inject)]
struct Frontend {
    #[inject("config")]
    config: Option<Arc<Config>>,
    #[inject("auto")]
    greeter: Option<Arc<dyn Greeter>>,
    #[inject("limit")]
    limit: i64,
    requests: u64,
}

#[derive(Debug, Default, Inject)]
struct Mocked {
    #[inject("mocked-int")]
    field: i32,
}

#[derive(Debug, thiserror::Error)]
#[error("config file missing")]
struct Missing;

fn greeter_definition() -> Definition {
    Definition::value(Arc::new(English)).expose(|g: &Arc<English>| g.clone() as Arc<dyn Greeter>)
}

#[test]
fn derived_bindings_follow_declaration_order() {
    let bindings = Frontend::default().bindings();

    let fields: Vec<_> = bindings.iter().map(|b| b.field()).collect();
    assert_eq!(fields, vec!["config", "greeter", "limit"]);

    assert_eq!(bindings[0].lookup(), Lookup::Named("config"));
    assert_eq!(bindings[1].lookup(), Lookup::Auto);
    assert!(bindings[0].type_info().is::<Arc<Config>>());
    assert!(bindings[1].type_info().is::<Arc<dyn Greeter>>());
    assert!(bindings[2].type_info().is::<i64>());
}

#[test]
fn derived_component_is_wired() {
    let config = Arc::new(Config { port: 8080 });

    let mut container = Container::new();
    container.register("config", Definition::value(config.clone())).unwrap();
    container.register("greeter", greeter_definition()).unwrap();
    container.register("limit", Definition::value(10i64)).unwrap();
    container.register("frontend", Definition::component(Frontend::default())).unwrap();

    let frontend: Arc<Frontend> = container.get_as("frontend").unwrap();
    assert!(Arc::ptr_eq(frontend.config.as_ref().unwrap(), &config));
    assert_eq!(frontend.greeter.as_ref().unwrap().greet("you"), "Hello, you");
    assert_eq!(frontend.limit, 10);
    assert_eq!(frontend.requests, 0);
}

#[test]
fn string_where_integer_expected_is_not_assignable() {
    let mut container = Container::new();
    container.register("config", Definition::value(Arc::new(Config { port: 1 }))).unwrap();
    container.register("greeter", greeter_definition()).unwrap();
    container.register("limit", Definition::value(String::from("1000"))).unwrap();

    let mut frontend = Frontend::default();
    match container.inject(&mut frontend).unwrap_err() {
        InjectError::NotAssignable(err) => {
            assert_eq!(err.dependency, "limit");
            assert_eq!(err.target, "field `limit`");
            assert!(err.expected.is::<i64>());
            assert!(err.actual.is::<String>());
        }
        other => panic!("Expected NotAssignable, got: {other:?}"),
    }

    // Fields before the failing one stay assigned.
    assert!(frontend.config.is_some());
    assert!(frontend.greeter.is_some());
}

#[test]
fn missing_named_dependency_suggests_close_names() {
    let mut container = Container::new();
    container.register("configs", Definition::value(Arc::new(Config { port: 1 }))).unwrap();

    match container.inject(&mut Frontend::default()).unwrap_err() {
        InjectError::NotRegistered(err) => {
            assert_eq!(err.dependency, "config");
            assert_eq!(err.field, "config");
            assert_eq!(err.suggestions, vec!["configs"]);
            assert!(InjectError::NotRegistered(err).to_string().contains("Did you mean"));
        }
        other => panic!("Expected NotRegistered, got: {other:?}"),
    }
}

#[test]
fn factory_parameters_are_resolved_by_type() {
    let mut container = Container::new();
    container.register("config", Definition::value(Arc::new(Config { port: 9000 }))).unwrap();
    container
        .register("port", Factory::new(|config: Arc<Config>| config.port))
        .unwrap();

    assert_eq!(container.get_as::<u16>("port").unwrap(), 9000);
}

#[test]
fn failing_factory_error_passes_through() {
    let mut container = Container::new();
    let err = container
        .register(
            "config",
            Factory::fallible(|| -> Result<Arc<Config>, Missing> { Err(Missing) }),
        )
        .unwrap_err();

    assert_eq!(err.to_string(), "config file missing");
    assert!(!container.contains("config"));
}

#[test]
fn factory_components_are_populated_after_construction() {
    let mut container = Container::new();
    container.register("config", Definition::value(Arc::new(Config { port: 1 }))).unwrap();
    container.register("greeter", greeter_definition()).unwrap();
    container.register("limit", Definition::value(3i64)).unwrap();
    container
        .register(
            "frontend",
            Factory::component(|| Frontend {
                requests: 5,
                ..Frontend::default()
            }),
        )
        .unwrap();

    let frontend: Arc<Frontend> = container.get_as("frontend").unwrap();
    assert_eq!(frontend.limit, 3);
    assert_eq!(frontend.requests, 5);
}

#[test]
fn locked_component_is_visible_through_every_handle() {
    let mut container = Container::new();
    container.register("config", Definition::value(Arc::new(Config { port: 1 }))).unwrap();
    container.register("greeter", greeter_definition()).unwrap();
    container.register("limit", Definition::value(7i64)).unwrap();

    let frontend = Arc::new(Mutex::new(Frontend::default()));
    container.register("frontend", Definition::locked(frontend.clone())).unwrap();

    assert_eq!(frontend.lock().limit, 7);
    let stored: Arc<Mutex<Frontend>> = container.get_as("frontend").unwrap();
    assert!(Arc::ptr_eq(&stored, &frontend));
}

#[test]
fn auto_wiring_reports_ambiguity() {
    let mut container = Container::new();
    container.register("config", Definition::value(Arc::new(Config { port: 1 }))).unwrap();
    container.register("en", greeter_definition()).unwrap();
    container.register("en-gb", greeter_definition()).unwrap();

    match container.inject(&mut Frontend::default()).unwrap_err() {
        InjectError::AmbiguousType(err) => {
            assert_eq!(err.requested, TypeInfo::of::<Arc<dyn Greeter>>());
            assert_eq!(err.candidates, vec!["en", "en-gb"]);
        }
        other => panic!("Expected AmbiguousType, got: {other:?}"),
    }
}

#[test]
fn plain_value_of_annotated_struct_is_not_injectable() {
    let mut container = Container::new();
    let err = container
        .register("type-a", Definition::value(Mocked::default()))
        .unwrap_err();

    assert!(matches!(
        err,
        InjectError::NotInjectable { type_name } if type_name.ends_with("Mocked")
    ));
    assert!(!container.contains("type-a"));
}

#[test]
fn plain_arc_of_annotated_struct_is_populated() {
    let mut container = Container::new();
    let err = container
        .register("type-a", Definition::value(Arc::new(Mocked::default())))
        .unwrap_err();
    assert!(matches!(err, InjectError::NotRegistered(ref e) if e.dependency == "mocked-int"));
    assert!(!container.contains("type-a"));

    container.register("mocked-int", Definition::value(42i32)).unwrap();
    container
        .register("type-a", Definition::value(Arc::new(Mocked::default())))
        .unwrap();

    let mocked: Arc<Mocked> = container.get_as("type-a").unwrap();
    assert_eq!(mocked.field, 42);
}
