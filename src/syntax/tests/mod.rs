#![allow(clippy::panic)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use crate::{
    syntax::{BinaryOp, Expr, Target, UnaryOp, parse_document, parse_expression, parse_literal},
    value::{Key, Value},
};

#[test]
fn literal_scalars() {
    assert_eq!(parse_literal("None").unwrap(), Value::None);
    assert_eq!(parse_literal("True").unwrap(), Value::Bool(true));
    assert_eq!(parse_literal("42").unwrap(), Value::Int(42));
    assert_eq!(parse_literal("-42").unwrap(), Value::Int(-42));
    assert_eq!(parse_literal("1_000").unwrap(), Value::Int(1000));
    assert_eq!(parse_literal("2.5").unwrap(), Value::Float(2.5));
    assert_eq!(parse_literal("1e3").unwrap(), Value::Float(1000.0));
    assert_eq!(parse_literal("-inf").unwrap(), Value::Float(f64::NEG_INFINITY));
}

#[test]
fn literal_nan() {
    match parse_literal("nan").unwrap() {
        Value::Float(f) => assert!(f.is_nan()),
        other => panic!("expected nan, got {other:?}"),
    }
}

#[test]
fn literal_extreme_integers() {
    assert_eq!(
        parse_literal("-9223372036854775808").unwrap(),
        Value::Int(i64::MIN)
    );
    assert!(parse_literal("9223372036854775808").is_err());
}

#[test]
fn literal_strings_and_escapes() {
    assert_eq!(parse_literal(r"'a\nb'").unwrap(), Value::from("a\nb"));
    assert_eq!(parse_literal(r#""it's""#).unwrap(), Value::from("it's"));
    assert_eq!(parse_literal(r"'\x41\u00e9'").unwrap(), Value::from("Aé"));
    assert_eq!(parse_literal(r"r'C:\temp'").unwrap(), Value::from(r"C:\temp"));
    assert_eq!(parse_literal("'ab' 'cd'").unwrap(), Value::from("abcd"));
    assert_eq!(
        parse_literal("'''one\ntwo'''").unwrap(),
        Value::from("one\ntwo")
    );
}

#[test]
fn literal_containers() {
    let value = parse_literal("{'a': [1, (2, 3)], 5: {}}").unwrap();

    let Value::Map(map) = value else {
        panic!("expected a mapping");
    };
    assert_eq!(
        map[&Key::from("a")],
        Value::List(vec![
            Value::Int(1),
            Value::List(vec![Value::Int(2), Value::Int(3)])
        ])
    );
    assert!(matches!(&map[&Key::from(5)], Value::Map(m) if m.is_empty()));
}

#[test]
fn literal_float_keys() {
    let value = parse_literal("{1.5: 'x', -2.0: 'y', 1: 'z'}").unwrap();

    let Value::Map(map) = value else {
        panic!("expected a mapping");
    };
    assert_eq!(map.len(), 3);
    assert_eq!(map[&Key::from(1.5)], Value::from("x"));
    assert_eq!(map[&Key::from(-2.0)], Value::from("y"));
    assert_eq!(map[&Key::from(1)], Value::from("z"));
}

#[test]
fn literal_rejects_expressions() {
    assert!(parse_literal("1 + 1").is_err());
    assert!(parse_literal("open('x')").is_err());
    assert!(parse_literal("some_name").is_err());
    assert!(parse_literal("{[1]: 2}").is_err());
}

#[test]
fn unterminated_string_reports_position() {
    let err = parse_literal("\n  'abc").unwrap_err();

    assert_eq!(err.line, 2);
    assert_eq!(err.column, 3);
    assert!(err.message.contains("unterminated"));
}

#[test]
fn unbalanced_brackets() {
    assert!(parse_expression("[1, 2").is_err());
    assert!(parse_expression("1)").is_err());
}

#[test]
fn precedence_of_arithmetic() {
    let expr = parse_expression("1 + 2 * 3").unwrap();

    let Expr::Binary { op, right, .. } = expr else {
        panic!("expected a binary expression");
    };
    assert_eq!(op, BinaryOp::Add);
    assert!(matches!(*right, Expr::Binary { op: BinaryOp::Mul, .. }));
}

#[test]
fn attribute_call_chain() {
    let expr = parse_expression("os.path.join('a', 'b')").unwrap();

    let Expr::Call { callee, args } = expr else {
        panic!("expected a call");
    };
    assert_eq!(args.len(), 2);
    let Expr::Attribute { object, name } = *callee else {
        panic!("expected an attribute");
    };
    assert_eq!(name, "join");
    assert!(matches!(*object, Expr::Attribute { ref name, .. } if name == "path"));
}

#[test]
fn conditional_and_not() {
    let expr = parse_expression("'a' if not x else 'b'").unwrap();

    let Expr::Conditional { condition, .. } = expr else {
        panic!("expected a conditional");
    };
    assert!(matches!(
        *condition,
        Expr::Unary {
            op: UnaryOp::Not,
            ..
        }
    ));
}

#[test]
fn parenthesized_expression_is_not_a_tuple() {
    assert!(matches!(
        parse_expression("(1)").unwrap(),
        Expr::Literal(Value::Int(1))
    ));
    assert!(matches!(parse_expression("(1,)").unwrap(), Expr::Tuple(items) if items.len() == 1));
}

#[test]
fn document_statements() {
    let source = "# comment\nname = 'x'\n\nprefs = {}\nprefs['k'] = [1,\n  2]\n";

    let statements = parse_document(source).unwrap();

    assert_eq!(statements.len(), 3);
    assert_eq!(statements[0].target, Target::Name("name".to_string()));
    assert_eq!(statements[0].line, 2);
    assert!(matches!(
        &statements[2].target,
        Target::Subscript { name, key: Expr::Literal(Value::Str(k)) } if name == "prefs" && k == "k"
    ));
    assert_eq!(statements[2].line, 5);
}

#[test]
fn document_rejects_bare_expressions() {
    let err = parse_document("x = 1\n42\n").unwrap_err();
    assert_eq!(err.line, 2);

    assert!(parse_document("x = 1 y = 2").is_err());
}

#[test]
fn empty_document() {
    assert!(parse_document("").unwrap().is_empty());
    assert!(parse_document("\n# only a comment\n").unwrap().is_empty());
}
