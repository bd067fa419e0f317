//! Integration tests: build catalogs from schema files on disk and decode
//! data files laid out under the derived data root.

use std::io::{BufRead, BufReader};
use std::path::Path;

use tabschema_core::{DecodeError, SchemaError, TypedValue};
use tabschema_schema::{CatalogConfig, CatalogError, PatternPolicy, SchemaCatalog};

const SCHEMA: &str = "\
file pattern,content,format,mandatory,field number
events/part-0,id,INTEGER,YES,1
events/part-0,name,STRING_HASH,NO,2
machine_attributes/part-00000-of-00001.csv.gz,time,INTEGER,YES,1
machine_attributes/part-00000-of-00001.csv.gz,machine ID,INTEGER,YES,2
machine_attributes/part-00000-of-00001.csv.gz,attribute name,STRING_HASH,YES,3
machine_attributes/part-00000-of-00001.csv.gz,attribute value,STRING_HASH_OR_INTEGER,NO,4
machine_attributes/part-00000-of-00001.csv.gz,attribute deleted,BOOLEAN,YES,5
";

fn write(dir: &Path, name: &str, contents: &str) {
    if let Some(parent) = dir.join(name).parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(dir.join(name), contents).unwrap();
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[test]
fn end_to_end_events() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "schema.csv", SCHEMA);

    let catalog = SchemaCatalog::open(dir.path().join("schema.csv"), &CatalogConfig::default()).unwrap();
    assert_eq!(catalog.list_sources(), ["events", "machine_attributes"]);

    let record = catalog.decode("events", "7,alice").unwrap();
    assert_eq!(
        record,
        vec![Some(TypedValue::Integer(7)), Some(TypedValue::from("alice"))]
    );
}

#[test]
fn data_root_defaults_to_schema_directory() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "schema.csv", SCHEMA);

    let catalog = SchemaCatalog::open(dir.path().join("schema.csv"), &CatalogConfig::default()).unwrap();
    assert_eq!(catalog.data_root(), dir.path());
    assert!(catalog.data_root().to_string_lossy().ends_with('/'));
    assert_eq!(
        catalog.source_dir("events").unwrap(),
        dir.path().join("events").join("")
    );
}

#[test]
fn configured_data_root_wins() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "meta/schema.csv", SCHEMA);

    let config = CatalogConfig {
        data_root: Some(dir.path().join("tables")),
        ..CatalogConfig::default()
    };
    let catalog = SchemaCatalog::open(dir.path().join("meta/schema.csv"), &config).unwrap();
    assert_eq!(
        catalog.data_root().to_string_lossy(),
        format!("{}/", dir.path().join("tables").display())
    );
}

#[test]
fn unreadable_schema_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = SchemaCatalog::open(dir.path().join("missing.csv"), &CatalogConfig::default()).unwrap_err();
    match err {
        CatalogError::Io { path, .. } => assert!(path.ends_with("missing.csv")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn malformed_schema_aborts_construction() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "schema.csv",
        "field number,content,format,mandatory,file pattern\n1,a,INTEGER,YES,s/x\n1,b,INTEGER,NO,s/x\n",
    );
    let err = SchemaCatalog::open(dir.path().join("schema.csv"), &CatalogConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        CatalogError::Schema(SchemaError::DuplicatePosition { field_number: 1, .. })
    ));
}

#[test]
fn missing_column_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "schema.csv", "content,format,file pattern\na,INTEGER,s/x\n");
    let err = SchemaCatalog::open(dir.path().join("schema.csv"), &CatalogConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        CatalogError::Schema(SchemaError::MissingColumn { ref column }) if column == "field number"
    ));
}

#[test]
fn conflicting_patterns_follow_policy() {
    let text = "field number,content,format,mandatory,file pattern\n\
                1,a,INTEGER,YES,s/part-a\n\
                2,b,INTEGER,NO,s/part-b\n";
    let lenient = SchemaCatalog::from_reader(text.as_bytes(), "/d", &CatalogConfig::default()).unwrap();
    assert_eq!(lenient.schema_for("s").unwrap().file_pattern(), "s/part-a");

    let strict = CatalogConfig {
        pattern_policy: PatternPolicy::Reject,
        ..CatalogConfig::default()
    };
    let err = SchemaCatalog::from_reader(text.as_bytes(), "/d", &strict).unwrap_err();
    assert!(matches!(
        err,
        CatalogError::Schema(SchemaError::ConflictingFilePattern { .. })
    ));
}

// ---------------------------------------------------------------------------
// Streaming a data file
// ---------------------------------------------------------------------------

#[test]
fn streams_a_data_file_lazily() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "schema.csv", SCHEMA);
    write(
        dir.path(),
        "machine_attributes/part-00000.csv",
        "0,5,GtRJ,3,0\n0,5,Abc9,,1\n10,6,GtRJ,x86,0\n11,6,GtRJ\n12,7,k,1,yes\n",
    );

    let catalog = SchemaCatalog::open(dir.path().join("schema.csv"), &CatalogConfig::default()).unwrap();
    let file = std::fs::File::open(
        catalog
            .source_dir("machine_attributes")
            .unwrap()
            .join("part-00000.csv"),
    )
    .unwrap();
    let lines = BufReader::new(file).lines().map(Result::unwrap);

    let results: Vec<_> = catalog
        .stream_source("machine_attributes", lines)
        .unwrap()
        .collect();
    assert_eq!(results.len(), 5);

    let first = results[0].as_ref().unwrap();
    assert_eq!(
        first,
        &vec![
            Some(TypedValue::Integer(0)),
            Some(TypedValue::Integer(5)),
            Some(TypedValue::from("GtRJ")),
            Some(TypedValue::Integer(3)),
            Some(TypedValue::Boolean(false)),
        ]
    );
    assert_eq!(results[1].as_ref().unwrap()[3], None);
    assert_eq!(results[2].as_ref().unwrap()[3], Some(TypedValue::from("x86")));

    let short = results[3].as_ref().unwrap_err();
    assert_eq!(short.line, 4);
    assert_eq!(
        short.source,
        DecodeError::FieldCount {
            expected: 5,
            actual: 3
        }
    );

    let bad_flag = results[4].as_ref().unwrap_err();
    assert_eq!(bad_flag.line, 5);
    assert!(matches!(
        &bad_flag.source,
        DecodeError::Format { label, position: 4, .. } if label == "attribute deleted"
    ));
}

#[test]
fn accessors_read_columns_of_streamed_records() {
    let text = "field number,content,format,mandatory,file pattern\n\
                1,time,INTEGER,YES,task_usage/p\n\
                2,cpu rate,FLOAT,NO,task_usage/p\n";
    let catalog = SchemaCatalog::from_reader(text.as_bytes(), "/d", &CatalogConfig::default()).unwrap();
    let get = catalog.field_accessors("task_usage").unwrap();
    let cpu = get["cpu rate"];

    let total: f64 = catalog
        .stream_source("task_usage", ["1,0.25", "2,0.5", "3,", "4,0.25"])
        .unwrap()
        .skip_errors()
        .filter_map(|r| cpu.get(&r).and_then(TypedValue::as_f64))
        .sum();
    assert_eq!(total, 1.0);
    assert_eq!(catalog.index_of_field("task_usage", "cpu rate").unwrap(), 1);
}
