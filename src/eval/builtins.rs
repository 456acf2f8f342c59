use std::cmp::Ordering;

use crate::{codec, value::Value};

use super::{
    EvalError,
    modules::{arity, float_arg, float_to_int, str_arg},
    ops,
};

/// Functions available in every expression without an import.
pub const BUILTINS: &[&str] = &[
    "str", "int", "float", "bool", "len", "abs", "min", "max", "round",
];

/// Methods callable on string values.
pub const STRING_METHODS: &[&str] = &[
    "upper",
    "lower",
    "strip",
    "replace",
    "startswith",
    "endswith",
];

/// Text form of a value: strings as-is, everything else as a literal.
pub fn display(value: &Value) -> String {
    match value {
        Value::Str(s) => s.clone(),
        other => codec::render_literal(other),
    }
}

pub fn call_builtin(name: &str, args: &[Value]) -> Result<Value, EvalError> {
    let result = match name {
        "str" => arity(args, 0, 1).map(|()| Value::Str(args.first().map(display).unwrap_or_default())),
        "int" => arity(args, 0, 1).and_then(|()| to_int(args.first())),
        "float" => arity(args, 0, 1).and_then(|()| to_float(args.first())),
        "bool" => arity(args, 0, 1)
            .map(|()| Value::Bool(args.first().is_some_and(Value::is_truthy))),
        "len" => arity(args, 1, 1).and_then(|()| length(&args[0])),
        "abs" => arity(args, 1, 1).and_then(|()| absolute(&args[0])),
        "min" => extreme(args, Ordering::Less),
        "max" => extreme(args, Ordering::Greater),
        "round" => arity(args, 1, 2).and_then(|()| round(args)),
        _ => return Err(EvalError::UnboundName { name: name.to_string() }),
    };

    result.map_err(|message| EvalError::Call {
        function: name.to_string(),
        message,
    })
}

pub fn call_string_method(receiver: &str, name: &str, args: &[Value]) -> Result<Value, EvalError> {
    let result = match name {
        "upper" => arity(args, 0, 0).map(|()| Value::Str(receiver.to_uppercase())),
        "lower" => arity(args, 0, 0).map(|()| Value::Str(receiver.to_lowercase())),
        "strip" => arity(args, 0, 1).and_then(|()| match args.first() {
            None | Some(Value::None) => Ok(Value::from(receiver.trim())),
            Some(_) => {
                let chars = str_arg(args, 0)?;
                Ok(Value::from(receiver.trim_matches(|c: char| chars.contains(c))))
            }
        }),
        "replace" => arity(args, 2, 2).and_then(|()| {
            Ok(Value::Str(receiver.replace(str_arg(args, 0)?, str_arg(args, 1)?)))
        }),
        "startswith" => {
            arity(args, 1, 1).and_then(|()| Ok(Value::Bool(receiver.starts_with(str_arg(args, 0)?))))
        }
        "endswith" => {
            arity(args, 1, 1).and_then(|()| Ok(Value::Bool(receiver.ends_with(str_arg(args, 0)?))))
        }
        _ => {
            return Err(EvalError::Type {
                message: format!("'str' object has no attribute '{name}'"),
            });
        }
    };

    result.map_err(|message| EvalError::Call {
        function: format!("str.{name}"),
        message,
    })
}

fn to_int(arg: Option<&Value>) -> Result<Value, String> {
    match arg {
        None => Ok(Value::Int(0)),
        Some(Value::Int(i)) => Ok(Value::Int(*i)),
        Some(Value::Bool(b)) => Ok(Value::Int(i64::from(*b))),
        Some(Value::Float(f)) => float_to_int(*f).map(Value::Int),
        Some(Value::Str(s)) => s
            .trim()
            .replace('_', "")
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| format!("invalid literal for int(): '{s}'")),
        Some(other) => Err(format!("cannot convert {} to int", other.type_name())),
    }
}

fn to_float(arg: Option<&Value>) -> Result<Value, String> {
    match arg {
        None => Ok(Value::Float(0.0)),
        Some(Value::Str(s)) => s
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| format!("could not convert string to float: '{s}'")),
        Some(value) => float_arg(std::slice::from_ref(value), 0).map(Value::Float),
    }
}

fn length(value: &Value) -> Result<Value, String> {
    let len = match value {
        Value::Str(s) => s.chars().count(),
        Value::List(items) => items.len(),
        Value::Map(map) => map.len(),
        other => return Err(format!("object of type '{}' has no len()", other.type_name())),
    };
    i64::try_from(len)
        .map(Value::Int)
        .map_err(|e| e.to_string())
}

fn absolute(value: &Value) -> Result<Value, String> {
    match value {
        Value::Int(i) => i
            .checked_abs()
            .map(Value::Int)
            .ok_or_else(|| "integer overflow".to_string()),
        Value::Bool(b) => Ok(Value::Int(i64::from(*b))),
        Value::Float(f) => Ok(Value::Float(f.abs())),
        other => Err(format!("bad operand type for abs(): '{}'", other.type_name())),
    }
}

/// `min`/`max` over either several arguments or a single list.
fn extreme(args: &[Value], wanted: Ordering) -> Result<Value, String> {
    let items = match args {
        [Value::List(items)] => items.as_slice(),
        [_] => return Err("expected a list or at least two arguments".to_string()),
        _ => args,
    };

    let mut best: Option<&Value> = None;
    for item in items {
        best = match best {
            Some(current) => {
                let ordering = ops::compare(item, current).map_err(|e| e.to_string())?;
                Some(if ordering == wanted { item } else { current })
            }
            None => Some(item),
        };
    }

    best.cloned().ok_or_else(|| "arg is an empty sequence".to_string())
}

fn round(args: &[Value]) -> Result<Value, String> {
    let x = float_arg(args, 0)?;
    match args.get(1) {
        None | Some(Value::None) => {
            if let Value::Int(i) = args[0] {
                return Ok(Value::Int(i));
            }
            float_to_int(x.round_ties_even()).map(Value::Int)
        }
        Some(Value::Int(digits)) => {
            if let Value::Int(i) = args[0] {
                return Ok(Value::Int(i));
            }
            let digits = i32::try_from(*digits).map_err(|e| e.to_string())?;
            let scale = 10f64.powi(digits);
            Ok(Value::Float((x * scale).round_ties_even() / scale))
        }
        Some(other) => Err(format!(
            "ndigits must be an integer, not {}",
            other.type_name()
        )),
    }
}
