#![allow(clippy::panic)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::collections::BTreeMap;

use crate::{
    PrefError,
    value::{
        DynamicSpec, Key, ModuleList, Preferences, Value, dynamic_to_spec, normalize_dynamic,
        preferences_from_value, same_entries,
    },
};

fn prefs(entries: &[(&str, Value)]) -> Preferences {
    entries
        .iter()
        .map(|(k, v)| (Key::from(*k), v.clone()))
        .collect()
}

#[test]
fn integer_keys_sort_before_float_and_string_keys() {
    let mut keys = vec![
        Key::from("b"),
        Key::from(2.5),
        Key::from(3),
        Key::from("a"),
        Key::from(-1),
        Key::from(f64::NAN),
        Key::from(-0.5),
    ];
    keys.sort();

    assert_eq!(
        keys,
        vec![
            Key::from(-1),
            Key::from(3),
            Key::from(-0.5),
            Key::from(2.5),
            Key::from(f64::NAN),
            Key::from("a"),
            Key::from("b"),
        ]
    );
}

#[test]
fn float_keys_use_total_order() {
    assert_eq!(Key::from(f64::NAN), Key::from(f64::NAN));
    assert_ne!(Key::from(0.0), Key::from(-0.0));
    assert_ne!(Key::from(1.0), Key::from(1));

    let map = BTreeMap::from([(Key::from(f64::NAN), 1), (Key::from(0.0), 2)]);
    assert_eq!(map[&Key::from(f64::NAN)], 1);
}

#[test]
fn key_from_value_accepts_str_and_numbers_only() {
    assert_eq!(Key::from_value(Value::from(7)).unwrap(), Key::Int(7));
    assert_eq!(Key::from_value(Value::from(1.5)).unwrap(), Key::Float(1.5));
    assert_eq!(
        Key::from_value(Value::from("x")).unwrap(),
        Key::Str("x".to_string())
    );

    let err = Key::from_value(Value::List(vec![])).unwrap_err();
    assert!(err.contains("list"));
    assert!(Key::from_value(Value::None).is_err());
    assert!(Key::from_value(Value::from(true)).is_err());
}

#[test]
fn identical_treats_nan_as_unchanged() {
    let nan = Value::from(f64::NAN);
    assert_ne!(nan, nan.clone());
    assert!(nan.identical(&nan.clone()));
    assert!(!Value::from(0.0).identical(&Value::from(-0.0)));
    assert!(!Value::from(1).identical(&Value::from(1.0)));

    let a = prefs(&[("n", Value::List(vec![nan.clone()]))]);
    assert!(same_entries(&a, &a.clone()));
    assert!(!same_entries(&a, &prefs(&[("n", Value::List(vec![]))])));
}

#[test]
fn module_list_rejects_duplicates() {
    let err = ModuleList::new(vec!["uuid".to_string(), "uuid".to_string()]).unwrap_err();
    assert!(err.contains("more than once"));
}

#[test]
fn module_list_rejects_malformed_names() {
    for name in ["", "1abc", "os.", ".os", "os path", "os-path"] {
        assert!(
            ModuleList::new(vec![name.to_string()]).is_err(),
            "'{name}' should be rejected"
        );
    }
}

#[test]
fn module_list_keeps_declaration_order() {
    let list = ModuleList::new(vec!["time".to_string(), "os.path".to_string()]).unwrap();

    assert_eq!(list.names(), ["time".to_string(), "os.path".to_string()]);
    assert_eq!(list.len(), 2);
    assert!(!list.is_empty());
    assert!(ModuleList::default().is_empty());
}

#[test]
fn preferences_from_value_requires_mapping() {
    let map = prefs(&[("a", Value::from(1))]);
    assert_eq!(preferences_from_value(Value::Map(map.clone())).unwrap(), map);

    let err = preferences_from_value(Value::from("nope")).unwrap_err();
    assert!(matches!(err, PrefError::Validation { .. }));
}

#[test]
fn normalize_dynamic_splits_off_orphans() {
    let preferences = prefs(&[("backed", Value::from("uuid.uuid4()"))]);
    let dynamic = DynamicSpec::from([
        (Key::from("backed"), Some(vec!["uuid".to_string()])),
        (Key::from("orphan"), None),
    ]);

    let (normalized, discarded) = normalize_dynamic(dynamic, &preferences).unwrap();

    assert_eq!(normalized.len(), 1);
    assert_eq!(normalized[&Key::from("backed")].names(), ["uuid".to_string()]);
    assert_eq!(discarded, vec![Key::from("orphan")]);
}

#[test]
fn normalize_dynamic_turns_none_into_empty_list() {
    let preferences = prefs(&[("k", Value::from("1 + 1"))]);
    let dynamic = DynamicSpec::from([(Key::from("k"), None)]);

    let (normalized, discarded) = normalize_dynamic(dynamic, &preferences).unwrap();

    assert!(normalized[&Key::from("k")].is_empty());
    assert!(discarded.is_empty());
}

#[test]
fn normalize_dynamic_names_the_bad_key() {
    let preferences = prefs(&[("k", Value::None)]);
    let dynamic = DynamicSpec::from([(Key::from("k"), Some(vec!["a".into(), "a".into()]))]);

    let err = normalize_dynamic(dynamic, &preferences).unwrap_err();
    assert!(err.contains("'k'"));
}

#[test]
fn dynamic_to_spec_restores_caller_form() {
    let preferences = prefs(&[("k", Value::from("time.time()"))]);
    let spec = DynamicSpec::from([(Key::from("k"), Some(vec!["time".to_string()]))]);

    let (normalized, _) = normalize_dynamic(spec.clone(), &preferences).unwrap();

    assert_eq!(dynamic_to_spec(&normalized), spec);
}

#[test]
fn truthiness_follows_emptiness_and_zero() {
    assert!(!Value::None.is_truthy());
    assert!(!Value::from(0).is_truthy());
    assert!(!Value::from(0.0).is_truthy());
    assert!(!Value::from("").is_truthy());
    assert!(!Value::List(vec![]).is_truthy());
    assert!(!Value::Map(BTreeMap::new()).is_truthy());

    assert!(Value::from(true).is_truthy());
    assert!(Value::from(-2).is_truthy());
    assert!(Value::from("x").is_truthy());
}

#[test]
fn display_renders_literals() {
    assert_eq!(Key::from("a b").to_string(), "'a b'");
    assert_eq!(Key::from(12).to_string(), "12");
    assert_eq!(Key::from(12.0).to_string(), "12.0");
    assert_eq!(Value::from(Some(3)).to_string(), "3");
    assert_eq!(Value::from(None::<i64>).to_string(), "None");
    assert_eq!(
        Value::List(vec![Value::from(true), Value::from(1.5)]).to_string(),
        "[True, 1.5]"
    );
}

#[test]
fn values_serialize_as_plain_json() {
    let map = prefs(&[("n", Value::from(1)), ("s", Value::from("x"))]);

    let json = serde_json::to_string(&Value::Map(map)).unwrap();

    assert_eq!(json, r#"{"n":1,"s":"x"}"#);
}
