// Adapter lifecycle tests: init propagation, snapshot isolation, pass-through precedence.
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use graphacean::api::{
    Adapter, AdapterConfig, Error, ErrorKind, Export, ExportKind, ExportSource, PrefixRule,
    WrappedModule,
};
use serde_json::{Value, json};

/// Test double whose live surface can change after initialization.
struct Scripted {
    init_error: Option<&'static str>,
    enumerable: bool,
    inits: AtomicUsize,
    seen_config: Mutex<Option<Value>>,
    live: Mutex<BTreeMap<String, Export>>,
}

impl Scripted {
    fn new(entries: Vec<(&str, Export)>) -> Self {
        Self {
            init_error: None,
            enumerable: true,
            inits: AtomicUsize::new(0),
            seen_config: Mutex::new(None),
            live: Mutex::new(
                entries
                    .into_iter()
                    .map(|(name, export)| (name.to_string(), export))
                    .collect(),
            ),
        }
    }

    fn failing(mut self, reason: &'static str) -> Self {
        self.init_error = Some(reason);
        self
    }

    fn sealed(mut self) -> Self {
        self.enumerable = false;
        self
    }

    fn live_export(&self, name: &str) -> Export {
        self.live.lock().unwrap()[name].clone()
    }
}

impl ExportSource for Scripted {
    fn export_names(&self) -> Option<Vec<String>> {
        if !self.enumerable {
            return None;
        }
        Some(self.live.lock().unwrap().keys().cloned().collect())
    }

    fn export(&self, name: &str) -> Option<Export> {
        self.live.lock().unwrap().get(name).cloned()
    }
}

impl WrappedModule for Scripted {
    async fn instantiate(&self, config: Option<Value>) -> Result<(), Error> {
        self.inits.fetch_add(1, Ordering::SeqCst);
        *self.seen_config.lock().unwrap() = config;
        match self.init_error {
            Some(reason) => Err(Error::new(ErrorKind::Initialization)
                .with_message(reason)
                .with_source(std::io::Error::other("artifact checksum mismatch"))),
            None => Ok(()),
        }
    }

    fn surface(&self) -> &dyn ExportSource {
        self
    }
}

fn example_entries() -> Vec<(&'static str, Export)> {
    vec![
        ("Complex", Export::constructor(|args| Ok(json!({ "re": args[0], "im": args[1] })))),
        ("ComplexFunctions_add", Export::function(|_| Ok(json!("add")))),
        ("ComplexFunctions_sub", Export::function(|_| Ok(json!("sub")))),
        ("helper", Export::value(json!(3))),
    ]
}

fn example_config() -> AdapterConfig {
    AdapterConfig::new()
        .with_rule(PrefixRule::new("ComplexFunctions_", "ComplexFunctions"))
        .with_pass_through(["Complex"])
}

#[tokio::test]
async fn grouped_and_pass_through_exports_match_the_module() {
    let adapter = Adapter::new(Scripted::new(example_entries()), example_config());
    assert!(adapter.exports().is_none());

    let exports = adapter.initialize(None).await.expect("init");
    let module = adapter.module();

    assert_eq!(exports.names().collect::<Vec<_>>(), vec!["Complex", "helper"]);
    assert!(exports.get("Complex").unwrap().same(&module.live_export("Complex")));
    assert!(exports.get("helper").unwrap().same(&module.live_export("helper")));
    assert_eq!(exports.get("Complex").unwrap().kind(), ExportKind::Constructor);

    let ns = exports.namespace("ComplexFunctions").expect("namespace");
    assert_eq!(ns.member_names().collect::<Vec<_>>(), vec!["add", "sub"]);
    assert!(ns.get("add").unwrap().same(&module.live_export("ComplexFunctions_add")));
    assert!(ns.get("sub").unwrap().same(&module.live_export("ComplexFunctions_sub")));
    assert_eq!(exports.call("ComplexFunctions.sub", &[]).unwrap(), json!("sub"));
    assert!(adapter.exports().is_some());
}

#[tokio::test]
async fn no_prefixed_names_means_no_namespaces() {
    let entries = vec![
        ("alpha", Export::value(json!(1))),
        ("beta", Export::value(json!(2))),
    ];
    let config =
        AdapterConfig::new().with_rule(PrefixRule::new("ComplexFunctions_", "ComplexFunctions"));
    let adapter = Adapter::new(Scripted::new(entries), config);

    let exports = adapter.initialize(None).await.expect("init");
    assert!(exports.namespaces().is_empty());
    assert!(exports.namespace("ComplexFunctions").is_none());
    assert_eq!(exports.names().collect::<Vec<_>>(), vec!["alpha", "beta"]);
}

#[tokio::test]
async fn init_failure_propagates_and_exposes_nothing() {
    let module = Scripted::new(example_entries()).failing("malformed binary artifact");
    let adapter = Adapter::new(module, example_config());

    let err = adapter.initialize(None).await.expect_err("init fails");
    assert_eq!(err.kind(), ErrorKind::Initialization);
    assert_eq!(err.message(), Some("malformed binary artifact"));
    assert_eq!(
        std::error::Error::source(&err).map(|source| source.to_string()),
        Some("artifact checksum mismatch".to_string())
    );
    assert!(adapter.exports().is_none());
    assert_eq!(adapter.module().inits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn init_config_is_forwarded_verbatim() {
    let adapter = Adapter::new(Scripted::new(example_entries()), example_config());
    let config = json!({ "module_or_path": "pkg/graphacean_bg.wasm", "memory": 16 });
    adapter.initialize(Some(config.clone())).await.expect("init");

    assert_eq!(*adapter.module().seen_config.lock().unwrap(), Some(config));
}

#[tokio::test]
async fn repeated_and_concurrent_initialize_share_one_surface() {
    let adapter = Adapter::new(Scripted::new(example_entries()), example_config());

    let (a, b) = tokio::join!(adapter.initialize(None), adapter.initialize(None));
    let (a, b) = (a.expect("a"), b.expect("b"));
    assert!(std::ptr::eq(a, b));

    let again = adapter.initialize(Some(json!({ "ignored": true }))).await.unwrap();
    assert!(std::ptr::eq(a, again));
    assert_eq!(adapter.module().inits.load(Ordering::SeqCst), 1);
    assert_eq!(*adapter.module().seen_config.lock().unwrap(), None);
}

#[tokio::test]
async fn later_live_changes_do_not_reach_exports() {
    let adapter = Adapter::new(Scripted::new(example_entries()), example_config());
    let exports = adapter.initialize(None).await.expect("init");

    {
        let mut live = adapter.module().live.lock().unwrap();
        live.insert("ComplexFunctions_mul".to_string(), Export::value(json!(0)));
        live.remove("helper");
    }

    let ns = exports.namespace("ComplexFunctions").unwrap();
    assert!(!ns.contains("mul"));
    assert!(exports.get("helper").is_some());
}

#[tokio::test]
async fn whitelist_wins_over_prefix_match() {
    let entries = vec![
        ("Vec_Type", Export::constructor(|_| Ok(Value::Null))),
        ("Vec_len", Export::function(|_| Ok(json!(0)))),
    ];
    let config = AdapterConfig::new()
        .with_rule(PrefixRule::new("Vec_", "Vec"))
        .with_pass_through(["Vec_Type"]);
    let adapter = Adapter::new(Scripted::new(entries), config);
    let exports = adapter.initialize(None).await.expect("init");

    assert!(exports.get("Vec_Type").is_some());
    let ns = exports.namespace("Vec").unwrap();
    assert!(!ns.contains("Type"));
    assert!(ns.contains("len"));
}

#[tokio::test]
async fn non_enumerable_surface_fails_fast() {
    let adapter = Adapter::new(Scripted::new(example_entries()).sealed(), example_config());
    let err = adapter.initialize(None).await.expect_err("sealed");
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert!(adapter.exports().is_none());
}

#[tokio::test]
async fn missing_whitelisted_export_fails_fast() {
    let config = example_config().with_pass_through(["Vec2"]);
    let adapter = Adapter::new(Scripted::new(example_entries()), config);
    let err = adapter.initialize(None).await.expect_err("missing Vec2");
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert_eq!(err.export(), Some("Vec2"));
    assert!(adapter.exports().is_none());
}

#[tokio::test]
async fn invalid_rules_fail_before_module_init() {
    let config = AdapterConfig::new().with_rule(PrefixRule::new("", "Everything"));
    let adapter = Adapter::new(Scripted::new(example_entries()), config);
    let err = adapter.initialize(None).await.expect_err("empty prefix");
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert_eq!(adapter.module().inits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn empty_member_name_is_accepted() {
    let entries = vec![("Foo_", Export::value(json!("v")))];
    let config = AdapterConfig::new().with_rule(PrefixRule::new("Foo_", "Foo"));
    let adapter = Adapter::new(Scripted::new(entries), config);
    let exports = adapter.initialize(None).await.expect("init");

    let foo = exports.namespace("Foo").unwrap();
    assert_eq!(foo.get("").and_then(Export::as_value), Some(&json!("v")));
    assert!(exports.resolve("Foo.").is_ok());
    assert_eq!(exports.names().count(), 0);
}
