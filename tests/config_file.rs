//! Integration tests for the configuration-file loader.

mod common;

use common::{temp_config, TestCommand};
use confstack::{
    default_config_path, ConfigFileLoader, LoadError, Loader, OptionRegistry, Precedence, Value,
    VariableStore, CONFIG_KEY,
};

fn registry() -> OptionRegistry {
    OptionRegistry::from_command(&TestCommand::default())
}

fn store_with_path(path: &str) -> VariableStore {
    let mut store = VariableStore::new();
    store.set_if_absent(CONFIG_KEY, Value::from(path), Precedence::CommandLine);
    store
}

#[test]
fn unbound_path_is_a_skip() {
    let mut store = VariableStore::new();
    let touched = ConfigFileLoader::new().load(&mut store, &registry()).unwrap();
    assert!(touched.is_empty());
}

#[test]
fn nonexistent_file_is_a_skip_not_an_error() {
    let mut store = store_with_path("/nonexistent/confstack/config.toml");
    let touched = ConfigFileLoader::new().load(&mut store, &registry()).unwrap();
    assert!(touched.is_empty());
}

#[test]
fn recognized_keys_bind_at_config_file_level() {
    let (_dir, path) = temp_config(
        r#"
format = "json"
verbose = true
timeout = 60
include = ["a", "b"]
"#,
    );
    let mut store = store_with_path(path.to_str().unwrap());
    let touched = ConfigFileLoader::new().load(&mut store, &registry()).unwrap();

    assert_eq!(touched.len(), 4);
    assert_eq!(store.get_text("format"), Some("json"));
    assert_eq!(store.get_bool("verbose"), Some(true));
    assert_eq!(store.get_text("timeout"), Some("60"));
    assert_eq!(
        store.get_list("include"),
        Some(&["a".to_string(), "b".to_string()][..])
    );
    assert_eq!(store.precedence_of("format"), Some(Precedence::ConfigFile));
}

#[test]
fn sections_flatten_to_dotted_keys() {
    let (_dir, path) = temp_config("[server]\nport = 9090\n");
    let mut store = store_with_path(path.to_str().unwrap());
    ConfigFileLoader::new().load(&mut store, &registry()).unwrap();
    assert_eq!(store.get_text("server.port"), Some("9090"));
}

#[test]
fn unparsable_content_fails_with_the_path() {
    let (_dir, path) = temp_config("this is not valid toml [[[");
    let mut store = store_with_path(path.to_str().unwrap());
    let err = ConfigFileLoader::new().load(&mut store, &registry()).unwrap_err();
    match err {
        LoadError::ConfigParse { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("expected ConfigParse, got: {other:?}"),
    }
}

#[test]
fn unrecognized_key_fails_with_the_path() {
    let (_dir, path) = temp_config("mystery = 1\n");
    let mut store = store_with_path(path.to_str().unwrap());
    let err = ConfigFileLoader::new().load(&mut store, &registry()).unwrap_err();
    match err {
        LoadError::ConfigParse { path: reported, detail } => {
            assert_eq!(reported, path);
            assert!(detail.contains("mystery"), "got: {detail}");
        }
        other => panic!("expected ConfigParse, got: {other:?}"),
    }
}

/// The path-selection option and the file's own namespace are
/// independent: a file cannot re-point the path that located it.
#[test]
fn config_key_inside_the_file_is_not_a_setting() {
    let (_dir, path) = temp_config("config = \"/elsewhere.toml\"\n");
    let mut store = store_with_path(path.to_str().unwrap());
    let err = ConfigFileLoader::new().load(&mut store, &registry()).unwrap_err();
    assert!(matches!(err, LoadError::ConfigParse { .. }));
}

#[test]
fn ill_shaped_value_is_rejected() {
    let (_dir, path) = temp_config("verbose = \"loud\"\n");
    let mut store = store_with_path(path.to_str().unwrap());
    let err = ConfigFileLoader::new().load(&mut store, &registry()).unwrap_err();
    match err {
        LoadError::ConfigParse { detail, .. } => {
            assert!(detail.contains("verbose"), "got: {detail}");
        }
        other => panic!("expected ConfigParse, got: {other:?}"),
    }
}

#[test]
fn default_path_ends_with_the_conventional_location() {
    let path = default_config_path("mytool");
    assert!(path.ends_with("mytool/config.toml"));
}

#[test]
fn file_values_never_override_higher_precedence_sources() {
    let (_dir, path) = temp_config("format = \"toml\"\n");
    let mut store = store_with_path(path.to_str().unwrap());
    store.set_if_absent("format", Value::from("json"), Precedence::Environment);

    let touched = ConfigFileLoader::new().load(&mut store, &registry()).unwrap();
    assert!(!touched.contains(&"format".to_string()));
    assert_eq!(store.get_text("format"), Some("json"));
    assert_eq!(store.precedence_of("format"), Some(Precedence::Environment));
}
