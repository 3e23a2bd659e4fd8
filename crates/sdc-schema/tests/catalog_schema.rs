//! Integration tests: loading schema descriptions from disk and agreement
//! between the [`Validator`] and the exported JSON Schema.
//!
//! The exported JSON Schema covers structure only, so the agreement fixtures
//! stay clear of ordering and uniqueness rules, which only the `Validator`
//! enforces.

use std::io::Write;

use proptest::prelude::*;
use sdc_schema::{SchemaError, SchemaRegistry, SchemaSource, Validator, SCHEMA_PATH_ENV};
use serial_test::serial;
use serde_json::{json, Value};

fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    file.write_all(content.as_bytes()).expect("write temp file");
    file
}

#[test]
fn test_load_yaml_file() {
    let file = write_temp(".yaml", SchemaRegistry::catalog_source());
    let reg = SchemaRegistry::from_path(file.path()).unwrap();
    assert_eq!(reg.len(), 11);
    assert_eq!(reg.tree_root(), Some("Container"));
}

#[test]
fn test_load_json_file() {
    let description = json!({
        "name": "mini",
        "entities": [
            {"name": "Tag", "fields": [{"name": "label", "required": true}]},
            {"name": "Box", "tree_root": true, "fields": [
                {"name": "tags", "range": "Tag", "multivalued": true}
            ]}
        ]
    });
    let file = write_temp(".json", &description.to_string());
    let reg = SchemaRegistry::load(&SchemaSource::File(file.path().to_path_buf())).unwrap();
    assert_eq!(reg.name(), "mini");
    assert_eq!(reg.entity_names(), ["Tag", "Box"]);
}

#[test]
fn test_extension_selects_format() {
    // YAML content behind a .json extension is parsed as JSON and rejected.
    let file = write_temp(".json", "name: mini\nentities: []\n");
    assert!(matches!(
        SchemaRegistry::from_path(file.path()).unwrap_err(),
        SchemaError::Parse(_)
    ));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.yaml");
    match SchemaRegistry::from_path(&path).unwrap_err() {
        SchemaError::Io { path: reported, .. } => assert!(reported.ends_with("absent.yaml")),
        other => panic!("Expected Io error, got: {other}"),
    }
}

#[test]
fn test_env_source_round_trip() {
    let file = write_temp(".yml", SchemaRegistry::catalog_source());
    let source = SchemaSource::from_env_value(Some(file.path().as_os_str().to_owned()));
    assert_eq!(source, SchemaSource::File(file.path().to_path_buf()));
    assert!(SchemaRegistry::load(&source).is_ok());
}

#[test]
#[serial]
fn test_from_env_reads_schema_path() {
    let file = write_temp(".json", r#"{"name": "env", "entities": [{"name": "A", "fields": [{"name": "x"}]}]}"#);

    std::env::set_var(SCHEMA_PATH_ENV, file.path());
    let source = SchemaSource::from_env();
    std::env::remove_var(SCHEMA_PATH_ENV);
    assert_eq!(source, SchemaSource::File(file.path().to_path_buf()));
    assert_eq!(SchemaRegistry::load(&source).unwrap().name(), "env");

    std::env::set_var(SCHEMA_PATH_ENV, "");
    assert_eq!(SchemaSource::from_env(), SchemaSource::Builtin);
    std::env::remove_var(SCHEMA_PATH_ENV);
    assert_eq!(SchemaSource::from_env(), SchemaSource::Builtin);
}

fn agreement_fixtures() -> Vec<(&'static str, Value)> {
    vec![
        ("minimal", json!({"datacatalog": {"identifier": "cat-1"}})),
        (
            "full",
            json!({
                "datasets": [{
                    "identifier": "ds-1",
                    "title": "Rainfall",
                    "publisher": {"name": "Met Office"},
                    "contactPoint": "ops@example.org",
                    "theme": {"identifier": "c1", "prefLabel": "Climate"},
                    "distribution": "dist-1",
                    "temporal": "2020/2024"
                }],
                "concepts": [{"identifier": "c1", "prefLabel": "Climate", "altLabel": "Weather"}],
                "series": [{"identifier": "s1", "contactPoint": {"hasEmail": "s@example.org"}}],
                "datacatalog": {"identifier": "cat-1", "dataset": ["ds-1", "s1"]},
                "distributions": [{
                    "identifier": "dist-1",
                    "accessURL": "https://example.org/rain.csv",
                    "modified": "2024-03-01"
                }]
            }),
        ),
        ("nulls as absent", json!({"datasets": null, "datacatalog": {"identifier": "cat-1", "title": null}})),
        ("missing datacatalog", json!({"datasets": []})),
        ("unknown root field", json!({"datacatalog": {"identifier": "cat-1"}, "owner": "x"})),
        ("unknown nested field", json!({"datacatalog": {"identifier": "cat-1", "colour": "red"}})),
        ("blank identifier", json!({"datacatalog": {"identifier": "   "}})),
        ("number as contact", json!({"datacatalog": {"identifier": "cat-1", "contactPoint": 42}})),
        ("list expected", json!({"datacatalog": {"identifier": "cat-1", "dataset": "ds-1"}})),
        (
            "bad date form",
            json!({"datacatalog": {"identifier": "cat-1"}, "distributions": [{"identifier": "d", "modified": "01/03/2024"}]}),
        ),
        (
            "non-ascii digits in date",
            json!({"datacatalog": {"identifier": "cat-1"}, "distributions": [{"identifier": "d", "modified": "\u{0662}\u{0660}\u{0662}\u{0664}-\u{0660}\u{0663}-\u{0660}\u{0661}"}]}),
        ),
        (
            "concept without label",
            json!({"datacatalog": {"identifier": "cat-1"}, "concepts": [{"identifier": "c1"}]}),
        ),
        ("not an object", json!(["cat-1"])),
    ]
}

#[test]
fn test_exported_schema_agrees_with_validator() {
    let reg = SchemaRegistry::catalog().unwrap();
    let exported = reg.to_json_schema();
    let external = jsonschema::validator_for(&exported).expect("exported schema compiles");
    let validator = Validator::new(&reg);

    for (name, doc) in agreement_fixtures() {
        let ours = validator.validate("Container", &doc).is_ok();
        let theirs = external.is_valid(&doc);
        assert_eq!(ours, theirs, "fixture '{name}': validator={ours}, json schema={theirs}");
    }
}

#[test]
fn test_uniqueness_is_validator_only() {
    let reg = SchemaRegistry::catalog().unwrap();
    let external = jsonschema::validator_for(&reg.to_json_schema()).unwrap();
    let doc = json!({
        "datacatalog": {"identifier": "cat-1"},
        "concepts": [
            {"identifier": "c1", "prefLabel": "A"},
            {"identifier": "c1", "prefLabel": "B"}
        ]
    });
    assert!(external.is_valid(&doc));
    assert!(Validator::new(&reg).validate("Container", &doc).is_err());
}

proptest! {
    /// Declaration order survives registry construction, and every entity's
    /// effective field set lists its parent's fields first.
    #[test]
    fn prop_declaration_order_and_inherited_prefix(depth in 1usize..6, extra in 0usize..4) {
        let mut entities = Vec::new();
        for level in 0..depth {
            let mut entity = json!({
                "name": format!("E{level}"),
                "fields": (0..extra).map(|i| json!({"name": format!("f{level}_{i}")})).collect::<Vec<_>>()
            });
            if level > 0 {
                entity["parent"] = json!(format!("E{}", level - 1));
            }
            entities.push(entity);
        }
        // Declare children before parents: resolution must not depend on order.
        entities.reverse();

        let reg = SchemaRegistry::from_json_value(json!({"name": "p", "entities": entities})).unwrap();
        let expected: Vec<String> = (0..depth).rev().map(|l| format!("E{l}")).collect();
        prop_assert_eq!(reg.entity_names(), expected.iter().map(String::as_str).collect::<Vec<_>>());

        for level in 1..depth {
            let child = reg.get_definition(&format!("E{level}")).unwrap().field_names();
            let parent = reg.get_definition(&format!("E{}", level - 1)).unwrap().field_names();
            prop_assert_eq!(&child[..parent.len()], &parent[..]);
            prop_assert_eq!(child.len(), parent.len() + extra);
        }
    }
}
