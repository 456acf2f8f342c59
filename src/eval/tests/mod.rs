#![allow(clippy::panic)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::sync::Arc;

use crate::{
    PrefError,
    eval::{EvalError, Evaluator, Module, ModuleRegistry},
    value::{Key, ModuleList, Value},
};

fn modules(names: &[&str]) -> ModuleList {
    ModuleList::new(names.iter().map(ToString::to_string).collect()).unwrap()
}

fn run(expression: &str, names: &[&str]) -> Result<Value, EvalError> {
    let registry = ModuleRegistry::builtin();
    Evaluator::new(&registry).run(expression, &modules(names))
}

fn is_uuid(text: &str) -> bool {
    text.len() == 36 && text.chars().filter(|c| *c == '-').count() == 4
}

struct Greeter;

impl Module for Greeter {
    fn name(&self) -> &str {
        "greeter"
    }

    fn attribute(&self, path: &str) -> Option<Value> {
        (path == "greeting").then(|| Value::from("hello"))
    }

    fn call(&self, path: &str, args: &[Value]) -> Result<Value, String> {
        match (path, args) {
            ("greet", [Value::Str(name)]) => Ok(Value::Str(format!("hello {name}"))),
            ("greet", _) => Err("expects one name".to_string()),
            _ => Err(format!("no function '{path}'")),
        }
    }
}

#[test]
fn arithmetic_and_precedence() {
    assert_eq!(run("1 + 2 * 3", &[]).unwrap(), Value::Int(7));
    assert_eq!(run("(1 + 2) * 3", &[]).unwrap(), Value::Int(9));
    assert_eq!(run("7 / 2", &[]).unwrap(), Value::Float(3.5));
    assert_eq!(run("-7 // 2", &[]).unwrap(), Value::Int(-4));
    assert_eq!(run("-7 % 3", &[]).unwrap(), Value::Int(2));
    assert_eq!(run("1 + 0.5", &[]).unwrap(), Value::Float(1.5));
    assert_eq!(run("True + 1", &[]).unwrap(), Value::Int(2));
}

#[test]
fn arithmetic_errors() {
    assert!(matches!(run("1 / 0", &[]), Err(EvalError::Arithmetic { .. })));
    assert!(matches!(run("1 % 0", &[]), Err(EvalError::Arithmetic { .. })));
    assert!(matches!(
        run("9223372036854775807 + 1", &[]),
        Err(EvalError::Arithmetic { .. })
    ));
    assert!(matches!(run("'a' - 1", &[]), Err(EvalError::Type { .. })));
}

#[test]
fn strings_and_lists() {
    assert_eq!(run("'ab' + 'cd'", &[]).unwrap(), Value::from("abcd"));
    assert_eq!(run("'ab' * 2", &[]).unwrap(), Value::from("abab"));
    assert_eq!(
        run("[1] + [2]", &[]).unwrap(),
        Value::List(vec![Value::Int(1), Value::Int(2)])
    );
    assert_eq!(run("'hello'[-1]", &[]).unwrap(), Value::from("o"));
    assert_eq!(run("{'a': 1}['a']", &[]).unwrap(), Value::Int(1));
    assert!(matches!(run("[1][5]", &[]), Err(EvalError::Index { .. })));
}

#[test]
fn huge_repetition_is_an_arithmetic_error() {
    for expression in [
        "'ab' * 9223372036854775807",
        "9223372036854775807 * 'ab'",
        "[1, 2] * 9223372036854775807",
        "'x' * 100000000",
    ] {
        assert!(
            matches!(run(expression, &[]), Err(EvalError::Arithmetic { .. })),
            "{expression} should fail"
        );
    }

    assert_eq!(run("'' * 9223372036854775807", &[]).unwrap(), Value::from(""));
    assert_eq!(run("[] * 9223372036854775807", &[]).unwrap(), Value::List(vec![]));
    assert_eq!(run("'ab' * -3", &[]).unwrap(), Value::from(""));
    assert_eq!(
        run("[0] * 3", &[]).unwrap(),
        Value::List(vec![Value::Int(0); 3])
    );
}

#[test]
fn float_keys_in_expressions() {
    let value = run("{1.5: 'x', 1: 'y'}[1.5]", &[]).unwrap();

    assert_eq!(value, Value::from("x"));
}

#[test]
fn comparisons_and_logic() {
    assert_eq!(run("1 < 2", &[]).unwrap(), Value::Bool(true));
    assert_eq!(run("1 == 1.0", &[]).unwrap(), Value::Bool(true));
    assert_eq!(run("'a' != 'b'", &[]).unwrap(), Value::Bool(true));
    assert_eq!(run("0 or 'fallback'", &[]).unwrap(), Value::from("fallback"));
    assert_eq!(run("1 and 2", &[]).unwrap(), Value::Int(2));
    assert_eq!(run("not []", &[]).unwrap(), Value::Bool(true));
    assert_eq!(run("'yes' if 3 > 2 else 'no'", &[]).unwrap(), Value::from("yes"));
    assert!(matches!(run("1 < 'a'", &[]), Err(EvalError::Type { .. })));
}

#[test]
fn short_circuit_skips_failing_branch() {
    assert_eq!(run("False and 1 / 0", &[]).unwrap(), Value::Bool(false));
    assert_eq!(run("True or undefined_name", &[]).unwrap(), Value::Bool(true));
    assert_eq!(run("1 if True else 1 / 0", &[]).unwrap(), Value::Int(1));
}

#[test]
fn builtins() {
    assert_eq!(run("str(12)", &[]).unwrap(), Value::from("12"));
    assert_eq!(run("str([1, 'a'])", &[]).unwrap(), Value::from("[1, 'a']"));
    assert_eq!(run("int('42')", &[]).unwrap(), Value::Int(42));
    assert_eq!(run("int(3.9)", &[]).unwrap(), Value::Int(3));
    assert_eq!(run("float('2.5')", &[]).unwrap(), Value::Float(2.5));
    assert_eq!(run("len('héllo')", &[]).unwrap(), Value::Int(5));
    assert_eq!(run("abs(-3)", &[]).unwrap(), Value::Int(3));
    assert_eq!(run("max(1, 5, 3)", &[]).unwrap(), Value::Int(5));
    assert_eq!(run("min([4, 2, 8])", &[]).unwrap(), Value::Int(2));
    assert_eq!(run("round(2.5)", &[]).unwrap(), Value::Int(2));
    assert_eq!(run("round(1.25, 1)", &[]).unwrap(), Value::Float(1.2));
    assert_eq!(run("bool('')", &[]).unwrap(), Value::Bool(false));
}

#[test]
fn builtin_call_errors_name_the_function() {
    let err = run("int('abc')", &[]).unwrap_err();

    let EvalError::Call { function, .. } = err else {
        panic!("expected a call error");
    };
    assert_eq!(function, "int");
    assert!(matches!(run("len(1, 2)", &[]), Err(EvalError::Call { .. })));
}

#[test]
fn string_methods() {
    assert_eq!(run("'Ab'.upper()", &[]).unwrap(), Value::from("AB"));
    assert_eq!(run("'  x '.strip()", &[]).unwrap(), Value::from("x"));
    assert_eq!(run("'--x--'.strip('-')", &[]).unwrap(), Value::from("x"));
    assert_eq!(run("'a.b'.replace('.', '/')", &[]).unwrap(), Value::from("a/b"));
    assert_eq!(run("'prefix'.startswith('pre')", &[]).unwrap(), Value::Bool(true));
    assert!(matches!(run("'x'.split()", &[]), Err(EvalError::Type { .. })));
    assert!(matches!(run("'x'.upper", &[]), Err(EvalError::Type { .. })));
}

#[test]
fn names_require_declared_modules() {
    let err = run("uuid.uuid4()", &[]).unwrap_err();

    assert_eq!(
        err,
        EvalError::UnboundName {
            name: "uuid".to_string()
        }
    );
}

#[test]
fn unknown_module_fails_import() {
    let err = run("1", &["subprocess"]).unwrap_err();

    assert_eq!(
        err,
        EvalError::ModuleImport {
            module: "subprocess".to_string()
        }
    );
}

#[test]
fn uuid_module_is_not_deterministic() {
    let first = run("uuid.uuid4()", &["uuid"]).unwrap();
    let second = run("uuid.uuid4()", &["uuid"]).unwrap();

    let (Value::Str(a), Value::Str(b)) = (&first, &second) else {
        panic!("uuid4 should return strings");
    };
    assert!(is_uuid(a));
    assert_ne!(a, b);

    let Value::Str(v1) = run("str(uuid.uuid1())", &["uuid"]).unwrap() else {
        panic!("uuid1 should return a string");
    };
    assert!(is_uuid(&v1));
}

#[test]
fn dotted_import_binds_top_level_module() {
    let joined = run("os.path.join('a', 'b')", &["os.path"]).unwrap();

    let expected = std::path::Path::new("a").join("b");
    assert_eq!(joined, Value::from(expected.to_string_lossy().into_owned()));
    assert_eq!(run("os.path.basename('/x/y.txt')", &["os"]).unwrap(), Value::from("y.txt"));
}

#[test]
fn math_and_time_modules() {
    assert_eq!(run("math.sqrt(16)", &["math"]).unwrap(), Value::Float(4.0));
    assert_eq!(run("math.floor(2.7)", &["math"]).unwrap(), Value::Int(2));
    assert!(matches!(run("math.pi", &["math"]).unwrap(), Value::Float(f) if f > 3.0));

    let Value::Float(now) = run("time.time()", &["time"]).unwrap() else {
        panic!("time.time() should return a float");
    };
    assert!(now > 1_600_000_000.0);

    let year = run("time.strftime('%Y')", &["time"]).unwrap();
    assert!(matches!(year, Value::Str(ref y) if y.len() == 4));
}

#[test]
fn module_values_are_not_results() {
    assert!(matches!(run("math", &["math"]), Err(EvalError::Type { .. })));
    assert!(matches!(run("math.missing", &["math"]), Err(EvalError::Type { .. })));
    assert!(matches!(run("math.nope()", &["math"]), Err(EvalError::Call { .. })));
}

#[test]
fn custom_modules_can_be_registered() {
    let mut registry = ModuleRegistry::new();
    registry.register(Arc::new(Greeter));
    let evaluator = Evaluator::new(&registry);

    assert_eq!(
        evaluator.run("greeter.greet('bob')", &modules(&["greeter"])).unwrap(),
        Value::from("hello bob")
    );
    assert_eq!(
        evaluator.run("greeter.greeting.upper()", &modules(&["greeter"])).unwrap(),
        Value::from("HELLO")
    );

    let err = evaluator
        .run("greeter.greet()", &modules(&["greeter"]))
        .unwrap_err();
    assert_eq!(
        err,
        EvalError::Call {
            function: "greeter.greet".to_string(),
            message: "expects one name".to_string()
        }
    );
}

#[test]
fn empty_registry_imports_nothing() {
    let registry = ModuleRegistry::new();

    let result = Evaluator::new(&registry).run("1", &modules(&["uuid"]));

    assert!(matches!(result, Err(EvalError::ModuleImport { .. })));
}

#[test]
fn evaluate_wraps_errors_with_the_key() {
    let registry = ModuleRegistry::builtin();

    let err = Evaluator::new(&registry)
        .evaluate(&Key::from("broken"), "1 +", &ModuleList::default())
        .unwrap_err();

    let PrefError::Evaluation { key, source } = err else {
        panic!("expected an evaluation error");
    };
    assert_eq!(key, Key::from("broken"));
    assert!(matches!(source, EvalError::Syntax(_)));
}

#[test]
fn registry_lists_stock_modules() {
    let registry = ModuleRegistry::builtin();

    assert_eq!(registry.names(), vec!["math", "os", "platform", "time", "uuid"]);
    assert!(registry.contains("uuid"));
    assert!(!registry.contains("subprocess"));
}
