use std::collections::HashMap;
use std::path::{Path, PathBuf};

use apache_avro::types::Value as AvroValue;
use apache_avro::{Schema, Writer};
use avro_text::{Error, OutputMode, OutputPolicy, RunStats, convert_file, read_schema};
use tempfile::TempDir;

const PERSON: &str = r#"{
    "type": "record", "name": "Person", "namespace": "test",
    "fields": [
        {"name": "id", "type": "long"},
        {"name": "name", "type": "string"},
        {"name": "nick", "type": ["null", "string"]},
        {"name": "tags", "type": {"type": "array", "items": "string"}}
    ]
}"#;

fn write_container(dir: &TempDir, schema: &Schema, records: Vec<AvroValue>) -> PathBuf {
    let mut writer = Writer::new(schema, Vec::new());
    for record in records {
        writer.append(record).unwrap();
    }
    let path = dir.path().join("data.avro");
    std::fs::write(&path, writer.into_inner().unwrap()).unwrap();
    path
}

fn convert(path: &Path, mode: OutputMode, policy: &OutputPolicy) -> (RunStats, String) {
    let mut out = Vec::new();
    let stats = convert_file(path, mode, policy, &mut out).unwrap();
    (stats, String::from_utf8(out).unwrap())
}

fn person(id: i64, name: &str, nick: Option<&str>, tags: &[&str]) -> AvroValue {
    let nick = match nick {
        Some(n) => AvroValue::Union(1, Box::new(AvroValue::String(n.into()))),
        None => AvroValue::Union(0, Box::new(AvroValue::Null)),
    };
    AvroValue::Record(vec![
        ("id".into(), AvroValue::Long(id)),
        ("name".into(), AvroValue::String(name.into())),
        ("nick".into(), nick),
        (
            "tags".into(),
            AvroValue::Array(tags.iter().map(|t| AvroValue::String(t.to_string())).collect()),
        ),
    ])
}

fn people(dir: &TempDir) -> PathBuf {
    let schema = Schema::parse_str(PERSON).unwrap();
    write_container(
        dir,
        &schema,
        vec![
            person(1, "Ann", None, &[]),
            person(2, "Bob, Jr.", Some("b\u{f6}b"), &["x", "y"]),
        ],
    )
}

#[test]
fn json_lines() {
    let dir = tempfile::tempdir().unwrap();
    let (stats, text) = convert(&people(&dir), OutputMode::Json, &OutputPolicy::default());
    assert_eq!(
        stats,
        RunStats {
            records: 2,
            skipped: 0
        }
    );
    assert_eq!(
        text,
        concat!(
            r#"{"id":1,"name":"Ann","nick":null,"tags":[]}"#,
            "\n",
            r#"{"id":2,"name":"Bob, Jr.","nick":"b\u00f6b","tags":["x","y"]}"#,
            "\n",
        )
    );
}

#[test]
fn json_lines_pruned() {
    let dir = tempfile::tempdir().unwrap();
    let policy = OutputPolicy::default().with_prune();
    let (_, text) = convert(&people(&dir), OutputMode::Json, &policy);
    let first = text.lines().next().unwrap();
    assert_eq!(first, r#"{"id":1,"name":"Ann"}"#);
}

#[test]
fn csv_rows() {
    let dir = tempfile::tempdir().unwrap();
    let (_, text) = convert(&people(&dir), OutputMode::Csv, &OutputPolicy::default());
    assert_eq!(
        text,
        "1,Ann,,\"[]\"\n2,\"Bob, Jr.\",b\u{f6}b,\"[\"\"x\"\",\"\"y\"\"]\"\n"
    );
}

#[test]
fn csv_projection_reorders_and_repeats() {
    let dir = tempfile::tempdir().unwrap();
    let policy = OutputPolicy::default().with_columns(vec![2, 1, 1]);
    let (_, text) = convert(&people(&dir), OutputMode::Csv, &policy);
    assert_eq!(text, "Ann,1,1\n\"Bob, Jr.\",2,2\n");
}

#[test]
fn out_of_range_projection_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = people(&dir);
    let policy = OutputPolicy::default().with_columns(vec![5]);
    let mut out = Vec::new();
    let err = convert_file(&path, OutputMode::Json, &policy, &mut out).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
    assert!(out.is_empty());
}

const EVENT: &str = r#"{
    "type": "record", "name": "Event",
    "fields": [
        {"name": "day", "type": {"type": "int", "logicalType": "date"}},
        {"name": "at", "type": {"type": "long", "logicalType": "timestamp-millis"}},
        {"name": "elapsed", "type": {"type": "long", "logicalType": "time-micros"}},
        {"name": "amount", "type": {"type": "bytes", "logicalType": "decimal",
                                    "precision": 10, "scale": 2}},
        {"name": "id", "type": {"type": "fixed", "name": "Guid",
                                "namespace": "System", "size": 16}},
        {"name": "attrs", "type": {"type": "map", "values": "double"}}
    ]
}"#;

const GUID_BYTES: [u8; 16] = [
    0x33, 0x22, 0x11, 0x00, 0x55, 0x44, 0x77, 0x66, 0x88, 0x99, 0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF,
];

fn events(dir: &TempDir) -> PathBuf {
    let schema = Schema::parse_str(EVENT).unwrap();
    let attrs: HashMap<String, AvroValue> = [("z", 1.5), ("a", f64::INFINITY)]
        .into_iter()
        .map(|(k, v)| (k.to_string(), AvroValue::Double(v)))
        .collect();
    let event = AvroValue::Record(vec![
        ("day".into(), AvroValue::Date(19_000)),
        ("at".into(), AvroValue::TimestampMillis(1_641_645_296_789)),
        ("elapsed".into(), AvroValue::TimeMicros(45_296_789_012)),
        (
            "amount".into(),
            AvroValue::Decimal(apache_avro::Decimal::from(vec![0xFF, 0x85])),
        ),
        ("id".into(), AvroValue::Fixed(16, GUID_BYTES.to_vec())),
        ("attrs".into(), AvroValue::Map(attrs)),
    ]);
    write_container(dir, &schema, vec![event])
}

#[test]
fn logical_types_and_guid_decoded() {
    let dir = tempfile::tempdir().unwrap();
    let policy = OutputPolicy::default().with_logical_types().with_guid();
    let (_, text) = convert(&events(&dir), OutputMode::Json, &policy);
    assert_eq!(
        text,
        concat!(
            r#"{"day":"2022-01-08","at":"2022-01-08 12:34:56.789","elapsed":"12:34:56.789012","#,
            r#""amount":"-1.23","id":"00112233-4455-6677-8899-aabbccddeeff","#,
            r#""attrs":{"a":"Infinity","z":1.5}}"#,
            "\n",
        )
    );
}

#[test]
fn logical_types_raw_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let (_, text) = convert(&events(&dir), OutputMode::Csv, &OutputPolicy::default());
    let row = text.strip_suffix('\n').unwrap();
    assert!(row.starts_with("19000,1641645296789,45296789012,"), "{row}");
    assert!(row.ends_with(r#","{""a"":""Infinity"",""z"":1.5}""#), "{row}");
}

#[test]
fn logical_types_in_csv() {
    let dir = tempfile::tempdir().unwrap();
    let policy = OutputPolicy::default()
        .with_logical_types()
        .with_guid()
        .with_columns(vec![4, 1, 5]);
    let (_, text) = convert(&events(&dir), OutputMode::Csv, &policy);
    assert_eq!(text, "-1.23,2022-01-08,00112233-4455-6677-8899-aabbccddeeff\n");
}

#[test]
fn schema_is_read_from_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = people(&dir);
    let schema = read_schema(&path).unwrap();
    assert_eq!(schema, Schema::parse_str(PERSON).unwrap());
}

#[test]
fn non_container_input_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plain.txt");
    std::fs::write(&path, b"not avro at all").unwrap();
    let mut out = Vec::new();
    let err =
        convert_file(&path, OutputMode::Json, &OutputPolicy::default(), &mut out).unwrap_err();
    assert!(matches!(err, Error::Decode(_)));
}

#[test]
fn empty_container_produces_no_lines() {
    let dir = tempfile::tempdir().unwrap();
    let schema = Schema::parse_str(PERSON).unwrap();
    let path = write_container(&dir, &schema, Vec::new());
    let (stats, text) = convert(&path, OutputMode::Json, &OutputPolicy::default());
    assert_eq!(stats, RunStats::default());
    assert!(text.is_empty());
}
