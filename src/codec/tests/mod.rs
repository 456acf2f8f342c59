#![allow(clippy::panic)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::{collections::BTreeMap, fs};

use tempfile::TempDir;

use crate::{
    PrefError,
    codec::{
        DOCUMENT_VERSION, HEADER, load, parse, quote_string, render, render_key, render_literal,
    },
    value::{DynamicMap, Key, ModuleList, Preferences, Value},
};

fn sample() -> (Preferences, DynamicMap) {
    let mut nested = BTreeMap::new();
    nested.insert(Key::from(1), Value::from("one"));
    nested.insert(Key::from("list"), Value::List(vec![Value::None, Value::from(2.5)]));

    let preferences = Preferences::from([
        (Key::from(12345), Value::from("integer key")),
        (Key::from("multi"), Value::from("line one\nline two\n\ttabbed")),
        (Key::from("quotes"), Value::from(r#"it's "quoted" \ here"#)),
        (Key::from("nested"), Value::Map(nested)),
        (Key::from("flag"), Value::from(false)),
        (Key::from("big"), Value::from(1e20)),
        (Key::from("negative"), Value::from(-7)),
        (Key::from("id"), Value::from("str(uuid.uuid1())")),
        (Key::from("plain expression"), Value::from("1 + 1")),
        (Key::from(2.5), Value::from("float key")),
        (Key::from(-0.0), Value::from("negative zero key")),
        (Key::from(f64::NEG_INFINITY), Value::from("infinite key")),
        (
            Key::from("float keyed"),
            Value::Map(BTreeMap::from([(Key::from(1.5), Value::from("x"))])),
        ),
    ]);
    let dynamic = DynamicMap::from([
        (Key::from("id"), ModuleList::new(vec!["uuid".to_string()]).unwrap()),
        (Key::from("plain expression"), ModuleList::default()),
    ]);

    (preferences, dynamic)
}

#[test]
fn rendered_document_loads_back_unchanged() {
    let (preferences, dynamic) = sample();

    let text = render(&preferences, &dynamic);
    let loaded = parse(&text, None).unwrap();

    assert_eq!(loaded.preferences, preferences);
    assert_eq!(loaded.dynamic, dynamic);
    assert_eq!(loaded.version.as_deref(), Some(DOCUMENT_VERSION));
}

#[test]
fn rendering_is_deterministic() {
    let (preferences, dynamic) = sample();

    assert_eq!(render(&preferences, &dynamic), render(&preferences, &dynamic));
}

#[test]
fn one_line_per_entry() {
    let (preferences, dynamic) = sample();

    let text = render(&preferences, &dynamic);

    assert!(text.starts_with(HEADER));
    let entry_lines = text
        .lines()
        .filter(|line| line.starts_with("preferences[") || line.starts_with("dynamic["))
        .count();
    assert_eq!(entry_lines, preferences.len() + dynamic.len());
    assert!(text.contains("dynamic['id'] = ('uuid',)\n"));
    assert!(text.contains("dynamic['plain expression'] = ()\n"));
}

#[test]
fn float_subscripts_load_as_float_keys() {
    let text = "preferences = {}\npreferences[1.5] = 'a'\npreferences[1] = 'b'\n\
                preferences[nan] = {0.25: 'c'}\ndynamic = {}\n";

    let loaded = parse(text, None).unwrap();

    assert_eq!(loaded.preferences.len(), 3);
    assert_eq!(loaded.preferences[&Key::from(1.5)], Value::from("a"));
    assert_eq!(loaded.preferences[&Key::from(1)], Value::from("b"));
    assert_eq!(
        loaded.preferences[&Key::from(f64::NAN)],
        Value::Map(BTreeMap::from([(Key::from(0.25), Value::from("c"))]))
    );
}

#[test]
fn empty_document_round_trip() {
    let text = render(&Preferences::new(), &DynamicMap::new());

    let loaded = parse(&text, None).unwrap();

    assert!(loaded.preferences.is_empty());
    assert!(loaded.dynamic.is_empty());
}

#[test]
fn float_literals() {
    assert_eq!(render_literal(&Value::from(1.0)), "1.0");
    assert_eq!(render_literal(&Value::from(f64::INFINITY)), "inf");
    assert_eq!(render_literal(&Value::from(f64::NEG_INFINITY)), "-inf");
    assert_eq!(render_literal(&Value::from(f64::NAN)), "nan");
    assert_eq!(render_literal(&Value::from(0.1)), "0.1");
}

#[test]
fn quoting_picks_the_free_delimiter() {
    assert_eq!(quote_string("plain"), "'plain'");
    assert_eq!(quote_string("it's"), "\"it's\"");
    assert_eq!(quote_string("both ' and \""), r#"'both \' and "'"#);
    assert_eq!(quote_string("a\\b"), r"'a\\b'");
    assert_eq!(quote_string("bell\u{7}"), r"'bell\x07'");
    assert_eq!(render_key(&Key::from(-3)), "-3");
    assert_eq!(render_key(&Key::from(1.5)), "1.5");
    assert_eq!(render_key(&Key::from(f64::NAN)), "nan");
}

#[test]
fn legacy_document_without_version() {
    let text = "preferences = {}\npreferences['a'] = 1\ndynamic = {}\n";

    let loaded = parse(text, None).unwrap();

    assert_eq!(loaded.version, None);
    assert_eq!(loaded.preferences[&Key::from("a")], Value::from(1));
}

#[test]
fn missing_dynamic_collection_is_a_format_error() {
    let err = parse("__prefstore_version__ = '0.1.0'\npreferences = {}\n", None).unwrap_err();

    let PrefError::Format { location, details } = err else {
        panic!("expected a format error");
    };
    assert_eq!(location, "string");
    assert!(details.contains("dynamic"));
}

#[test]
fn non_mapping_collection_is_a_format_error() {
    let err = parse("preferences = [1]\ndynamic = {}\n", None).unwrap_err();

    assert!(matches!(err, PrefError::Format { .. }));
}

#[test]
fn non_string_version_is_a_format_error() {
    let text = "__prefstore_version__ = 3\npreferences = {}\ndynamic = {}\n";

    assert!(matches!(parse(text, None), Err(PrefError::Format { .. })));
}

#[test]
fn subscript_of_undefined_name_is_a_format_error() {
    let err = parse("preferences['a'] = 1\n", None).unwrap_err();

    let PrefError::Format { details, .. } = err else {
        panic!("expected a format error");
    };
    assert!(details.contains("line 1"));
}

#[test]
fn loading_never_runs_code() {
    let text = "preferences = {}\npreferences['x'] = open('/etc/passwd')\ndynamic = {}\n";

    let err = parse(text, None).unwrap_err();

    assert!(matches!(err, PrefError::Format { .. }));
}

#[test]
fn orphaned_dynamic_entries_are_discarded_on_load() {
    let text = "preferences = {}\ndynamic = {}\ndynamic['ghost'] = ('uuid',)\n";

    let loaded = parse(text, None).unwrap();

    assert!(loaded.dynamic.is_empty());
}

#[test]
fn dynamic_none_means_no_modules() {
    let text = "preferences = {}\npreferences['k'] = '2 * 3'\ndynamic = {}\ndynamic['k'] = None\n";

    let loaded = parse(text, None).unwrap();

    assert!(loaded.dynamic[&Key::from("k")].is_empty());
}

#[test]
fn malformed_module_list_is_a_format_error() {
    let text = "preferences = {}\npreferences['k'] = 1\ndynamic = {}\ndynamic['k'] = 'uuid'\n";

    assert!(matches!(parse(text, None), Err(PrefError::Format { .. })));
}

#[test]
fn unknown_names_are_ignored() {
    let text = "extra = 5\npreferences = {}\ndynamic = {}\n";

    assert!(parse(text, None).is_ok());
}

#[test]
fn load_reports_io_and_encoding_failures() {
    let dir = TempDir::new().unwrap();

    let missing = load(&dir.path().join("missing.pref")).unwrap_err();
    assert!(matches!(missing, PrefError::Io(_)));

    let binary = dir.path().join("binary.pref");
    fs::write(&binary, [0xff, 0xfe, 0x00, 0x80]).unwrap();
    let err = load(&binary).unwrap_err();
    let PrefError::Format { location, .. } = err else {
        panic!("expected a format error");
    };
    assert!(location.ends_with("binary.pref"));
}

#[test]
fn load_reads_written_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("prefs.pref");
    let (preferences, dynamic) = sample();
    fs::write(&path, render(&preferences, &dynamic)).unwrap();

    let loaded = load(&path).unwrap();

    assert_eq!(loaded.preferences, preferences);
}
