#[cfg(feature = "serde")]
mod serde_tests {
    use serde_json;
    use tagloom::{Context, Engine, EngineConfig, InMemoryLoader, MissingIncludePolicy, Source, Value};

    #[test]
    #[ntest::timeout(100)]
    fn test_value_deserialization_keeps_key_order() {
        let json = r#"{"name":"Ada","tags":["math","engines"],"age":36,"active":true,"manager":null}"#;
        let value: Value = serde_json::from_str(json).unwrap();

        let Value::Object(map) = &value else {
            panic!("Expected an object, got {:?}", value);
        };
        let keys: Vec<_> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["name", "tags", "age", "active", "manager"]);
        assert_eq!(value.get("age"), Some(&Value::from(36)));
        assert_eq!(value.get("manager"), Some(&Value::Null));
        assert_eq!(value.get("tags"), Some(&Value::from(vec!["math", "engines"])));
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_value_serialization() {
        let value = Value::object([("n", Value::from(2.5)), ("s", Value::from("x"))]);
        let serialized = serde_json::to_string(&value).unwrap();
        assert_eq!(serialized, r#"{"n":2.5,"s":"x"}"#);

        let deserialized: Value = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, value);
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_engine_config_serialization() {
        let config = EngineConfig::default()
            .with_max_depth(8)
            .with_missing_include(MissingIncludePolicy::Error);
        let serialized = serde_json::to_string(&config).unwrap();
        assert_eq!(serialized, r#"{"max_depth":8,"missing_include":"Error"}"#);

        let deserialized: EngineConfig = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, config);

        // Missing fields fall back to their defaults.
        let partial: EngineConfig = serde_json::from_str(r#"{"max_depth":3}"#).unwrap();
        assert_eq!(partial.max_depth, 3);
        assert_eq!(partial.missing_include, MissingIncludePolicy::Silent);
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_source_serialization() {
        let source = Source::new().text("Hi ").var("name").open("include", "'x.html'");
        let serialized = serde_json::to_string(&source).unwrap();
        assert_eq!(
            serialized,
            r#"[{"Text":"Hi "},{"Variable":"name"},{"Open":{"name":"include","params":"'x.html'"}}]"#
        );

        let deserialized: Source = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, source);
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_loader_serialization() {
        let loader: InMemoryLoader = [
            ("greeting", Source::new().text("Hello, ").var("name").text("!")),
            (
                "list",
                Source::new()
                    .text("Items: ")
                    .open("for", "item in items")
                    .var("item")
                    .text(", ")
                    .close("for"),
            ),
        ]
        .into_iter()
        .collect();

        let serialized = serde_json::to_string(&loader).unwrap();
        let deserialized: InMemoryLoader = serde_json::from_str(&serialized).unwrap();

        let engine = Engine::new(loader);
        let restored = Engine::new(deserialized);

        let mut context = Context::new();
        context.insert("name", "World").insert("items", vec!["a", "b", "c"]);

        for name in ["greeting", "list"] {
            assert_eq!(
                engine.render(name, &context).unwrap(),
                restored.render(name, &context).unwrap()
            );
        }
        assert_eq!(restored.render("list", &context).unwrap(), "Items: a, b, c, ");
    }
}
