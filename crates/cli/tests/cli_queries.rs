use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::{tempdir, TempDir};

const RECORDS: &str = r#"[
  {"name": "java.lang.Object", "kind": "standard"},
  {"name": "zoo.Animal", "kind": "standard", "superclass": "java.lang.Object"},
  {
    "name": "zoo.Dog",
    "kind": "standard",
    "modifiers": ["public"],
    "superclass": "zoo.Animal",
    "interfaces": ["zoo.Pet"],
    "tags": [{"name": "zoo.Friendly"}],
    "attributes": [{"name": "owner", "type": "zoo.Person", "modifiers": ["public"]}],
    "routines": [{"name": "bark", "result_type": "void", "modifiers": ["public"]}],
    "origins": ["file:/zoo.jar"]
  },
  {"name": "zoo.Person", "kind": "standard"},
  {"name": "zoo.Named", "kind": "interface"},
  {"name": "zoo.Pet", "kind": "interface", "superinterfaces": ["zoo.Named"]},
  {"name": "zoo.Friendly", "kind": "tag", "tags": [{"name": "zoo.Trait"}]},
  {"name": "zoo.Trait", "kind": "tag"},
  {"name": "ext.Vet", "kind": "standard", "is_external": true, "superclass": "zoo.Animal"}
]"#;

fn write_records() -> (TempDir, PathBuf) {
    let temp = tempdir().unwrap();
    let path = temp.path().join("records.json");
    fs::write(&path, RECORDS).unwrap();
    (temp, path)
}

#[allow(deprecated)]
fn typescan() -> Command {
    let mut cmd = Command::cargo_bin("typescan").expect("binary");
    cmd.env_remove("TYPESCAN_CONFIG").env_remove("RUST_LOG");
    cmd.arg("--quiet");
    cmd
}

fn json_names(output: &[u8]) -> Vec<String> {
    let body: Value = serde_json::from_slice(output).expect("valid json");
    body.as_array()
        .expect("array")
        .iter()
        .map(|v| v.as_str().expect("string").to_string())
        .collect()
}

#[test]
fn query_prints_one_name_per_line() {
    let (_temp, records) = write_records();

    typescan()
        .arg("query")
        .arg(&records)
        .arg("subclasses")
        .arg("java.lang.Object")
        .assert()
        .success()
        .stdout("zoo.Animal\nzoo.Dog\n");

    typescan()
        .arg("query")
        .arg(&records)
        .arg("implementing")
        .arg("zoo.Named")
        .assert()
        .success()
        .stdout("zoo.Dog\n");

    typescan()
        .arg("query")
        .arg(&records)
        .arg("with-meta-tag")
        .arg("zoo.Trait")
        .assert()
        .success()
        .stdout("zoo.Friendly\n");
}

#[test]
fn unknown_type_yields_empty_output() {
    let (_temp, records) = write_records();

    typescan()
        .arg("query")
        .arg(&records)
        .arg("superclasses")
        .arg("zoo.Missing")
        .assert()
        .success()
        .stdout("");
}

#[test]
fn list_json_by_kind() {
    let (_temp, records) = write_records();

    let output = typescan()
        .arg("list")
        .arg(&records)
        .arg("--kind")
        .arg("interface")
        .arg("--json")
        .output()
        .expect("command run");
    assert!(output.status.success());
    assert_eq!(json_names(&output.stdout), vec!["zoo.Named", "zoo.Pet"]);
}

#[test]
fn external_types_need_opt_in() {
    let (_temp, records) = write_records();

    let output = typescan()
        .arg("list")
        .arg(&records)
        .arg("--json")
        .output()
        .expect("command run");
    let names = json_names(&output.stdout);
    assert!(!names.contains(&"ext.Vet".to_string()));
    assert!(!names.contains(&"java.lang.Object".to_string()));

    let output = typescan()
        .arg("--include-external")
        .arg("query")
        .arg(&records)
        .arg("subclasses")
        .arg("zoo.Animal")
        .arg("--json")
        .output()
        .expect("command run");
    assert_eq!(json_names(&output.stdout), vec!["ext.Vet", "zoo.Dog"]);
}

#[test]
fn origins_lists_recorded_sources() {
    let (_temp, records) = write_records();

    typescan()
        .arg("origins")
        .arg(&records)
        .arg("zoo.Dog")
        .assert()
        .success()
        .stdout("file:/zoo.jar\n");
}

#[test]
fn dot_writes_document_to_file() {
    let (temp, records) = write_records();
    let out = temp.path().join("zoo.dot");

    typescan()
        .arg("dot")
        .arg(&records)
        .arg("--width")
        .arg("20")
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout("");

    let dot = fs::read_to_string(&out).unwrap();
    assert!(dot.starts_with("digraph {\nsize=\"20,10\";\n"));
    assert!(dot.contains("  \"zoo.Dog\" -> \"zoo.Animal\" [arrowhead=empty, arrowsize=2.5]\n"));
    assert!(dot.contains("PUBLIC ROUTINES"));
    assert!(!dot.contains("ext.Vet"));
    assert!(!dot.contains("java.lang.Object"));
}

#[test]
fn config_file_sets_scan_and_diagram_options() {
    let (temp, records) = write_records();
    let config = temp.path().join("typescan.toml");
    fs::write(
        &config,
        "[scan]\nenable_external_types = true\n\n[diagram]\nshow_routines = false\n",
    )
    .unwrap();

    typescan()
        .arg("--config")
        .arg(&config)
        .arg("dot")
        .arg(&records)
        .arg("--no-attributes")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"ext.Vet\""))
        .stdout(predicate::str::contains("ROUTINES").not())
        .stdout(predicate::str::contains("ATTRIBUTES").not());
}

#[test]
fn missing_records_file_fails() {
    let temp = tempdir().unwrap();
    let records = temp.path().join("absent.json");

    typescan()
        .arg("list")
        .arg(&records)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read records"));
}

#[test]
fn invalid_diagram_size_is_rejected() {
    let (_temp, records) = write_records();

    typescan()
        .arg("dot")
        .arg(&records)
        .arg("--height")
        .arg("0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid diagram options"));
}
