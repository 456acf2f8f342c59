use std::collections::BTreeMap;

use crate::value::{Key, Value};

/// Expression tree produced by the parser.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal scalar: number, string, boolean or `None`
    Literal(Value),
    /// `[a, b]`
    List(Vec<Expr>),
    /// `(a, b)` or `(a,)`
    Tuple(Vec<Expr>),
    /// `{k: v}`
    Dict(Vec<(Expr, Expr)>),
    /// A bare name, resolved at evaluation time
    Name(String),
    /// `object.name`
    Attribute {
        /// Expression the attribute is read from
        object: Box<Expr>,
        /// Attribute name
        name: String,
    },
    /// `callee(args..)`
    Call {
        /// Expression producing the callable
        callee: Box<Expr>,
        /// Positional arguments
        args: Vec<Expr>,
    },
    /// `object[index]`
    Index {
        /// Indexed container
        object: Box<Expr>,
        /// Index or key expression
        index: Box<Expr>,
    },
    /// `-x`, `+x`, `not x`
    Unary {
        /// Operator
        op: UnaryOp,
        /// Operand
        operand: Box<Expr>,
    },
    /// Arithmetic, comparison and boolean operators
    Binary {
        /// Operator
        op: BinaryOp,
        /// Left operand
        left: Box<Expr>,
        /// Right operand
        right: Box<Expr>,
    },
    /// `then if condition else otherwise`
    Conditional {
        /// Test expression
        condition: Box<Expr>,
        /// Value when the test is truthy
        then: Box<Expr>,
        /// Value otherwise
        otherwise: Box<Expr>,
    },
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `-`
    Neg,
    /// `+`
    Pos,
    /// `not`
    Not,
}

/// Infix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `//`
    FloorDiv,
    /// `%`
    Mod,
    /// `==`
    Eq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `and`
    And,
    /// `or`
    Or,
}

/// Left-hand side of an assignment statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    /// `name = ...`
    Name(String),
    /// `name[key] = ...`
    Subscript {
        /// Mapping being populated
        name: String,
        /// Key expression
        key: Expr,
    },
}

/// One assignment in a document.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// Where the value goes
    pub target: Target,
    /// Right-hand side
    pub value: Expr,
    /// 1-based source line of the statement
    pub line: usize,
}

impl Expr {
    /// Converts a literal-only expression into a value.
    ///
    /// Accepts scalars, containers of literals, a unary sign on a number and
    /// the names `inf` and `nan`. Tuples become lists.
    ///
    /// # Errors
    /// Returns a description of the first non-literal sub-expression.
    pub fn to_literal(&self) -> Result<Value, String> {
        match self {
            Expr::Literal(value) => Ok(value.clone()),
            Expr::List(items) | Expr::Tuple(items) => items
                .iter()
                .map(Expr::to_literal)
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            Expr::Dict(entries) => {
                let mut map = BTreeMap::new();
                for (key, value) in entries {
                    let key = Key::from_value(key.to_literal()?)?;
                    map.insert(key, value.to_literal()?);
                }
                Ok(Value::Map(map))
            }
            Expr::Name(name) if name == "inf" => Ok(Value::Float(f64::INFINITY)),
            Expr::Name(name) if name == "nan" => Ok(Value::Float(f64::NAN)),
            Expr::Unary { op, operand } if *op != UnaryOp::Not => {
                let negate = *op == UnaryOp::Neg;
                match operand.to_literal()? {
                    Value::Int(i) if negate => i
                        .checked_neg()
                        .map(Value::Int)
                        .ok_or_else(|| "integer literal out of range".to_string()),
                    Value::Float(f) if negate => Ok(Value::Float(-f)),
                    number @ (Value::Int(_) | Value::Float(_)) => Ok(number),
                    other => Err(format!("cannot apply a sign to {}", other.type_name())),
                }
            }
            Expr::Name(name) => Err(format!("name '{name}' is not a literal")),
            Expr::Call { .. } => Err("function calls are not allowed in literals".to_string()),
            _ => Err("expressions are not allowed in literals".to_string()),
        }
    }
}
