//! Evaluation of dynamic preference expressions.
//!
//! This is the one place where stored text turns into computation. An
//! expression can only reach what it was granted: the builtins, the methods of
//! its own values, and the modules its entry declares, each looked up in a
//! [`ModuleRegistry`]. Documents are never evaluated while loading; a dynamic
//! entry runs only when it is read.

mod builtins;
mod modules;
mod ops;

#[cfg(test)]
mod tests;

use std::{collections::BTreeMap, sync::Arc};

use thiserror::Error;
use tracing::debug;

pub use builtins::{BUILTINS, STRING_METHODS};
pub use modules::{Module, ModuleRegistry};

use crate::{
    PrefError, Result,
    syntax::{BinaryOp, Expr, SyntaxError, parse_expression},
    value::{Key, ModuleList, Value},
};

/// Failure while importing modules for, parsing or running an expression.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// A declared module is not registered
    #[error("no module named '{module}'")]
    ModuleImport {
        /// Declared module name
        module: String,
    },

    /// The stored expression does not parse
    #[error("invalid expression: {0}")]
    Syntax(#[from] SyntaxError),

    /// A name is neither a builtin nor a declared module
    #[error("name '{name}' is not defined")]
    UnboundName {
        /// The unresolved name
        name: String,
    },

    /// An operation was applied to a value of the wrong type
    #[error("{message}")]
    Type {
        /// What was wrong
        message: String,
    },

    /// A builtin, method or module function rejected its call
    #[error("{function}(): {message}")]
    Call {
        /// Dotted function name
        function: String,
        /// Reason given by the function
        message: String,
    },

    /// An index or key lookup failed
    #[error("{message}")]
    Index {
        /// What was looked up
        message: String,
    },

    /// Overflow or division by zero
    #[error("{message}")]
    Arithmetic {
        /// What went wrong
        message: String,
    },
}

/// Evaluates dynamic entries against a module registry.
///
/// Nothing is cached: every call imports the declared modules and evaluates
/// the expression from scratch.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'a> {
    registry: &'a ModuleRegistry,
}

impl<'a> Evaluator<'a> {
    /// Creates an evaluator that imports from `registry`.
    pub fn new(registry: &'a ModuleRegistry) -> Self {
        Self { registry }
    }

    /// Computes the live value of the dynamic entry `key`.
    ///
    /// # Errors
    /// Returns `PrefError::Evaluation` naming `key` if a declared module is not
    /// registered, the expression does not parse, or evaluating it fails.
    pub fn evaluate(&self, key: &Key, expression: &str, modules: &ModuleList) -> Result<Value> {
        debug!(%key, %expression, modules = ?modules.names(), "Evaluating dynamic preference");
        self.run(expression, modules)
            .map_err(|source| PrefError::evaluation(key, source))
    }

    /// Evaluates `expression` with `modules` imported, without key context.
    ///
    /// # Errors
    /// Returns `EvalError` for import, syntax and runtime failures.
    pub fn run(&self, expression: &str, modules: &ModuleList) -> std::result::Result<Value, EvalError> {
        let scope = Scope::import(self.registry, modules)?;
        let expr = parse_expression(expression)?;
        scope.eval(&expr)?.into_value()
    }
}

/// Intermediate result of evaluating a sub-expression.
enum Object {
    Value(Value),
    Module(Arc<dyn Module>),
    Member { module: Arc<dyn Module>, path: String },
    Method { receiver: String, name: String },
    Builtin(String),
}

impl Object {
    fn into_value(self) -> std::result::Result<Value, EvalError> {
        match self {
            Object::Value(value) => Ok(value),
            Object::Module(module) => Err(EvalError::Type {
                message: format!("module '{}' is not a value", module.name()),
            }),
            Object::Member { module, path } => {
                module.attribute(&path).ok_or_else(|| EvalError::Type {
                    message: format!("'{}.{path}' is not a value", module.name()),
                })
            }
            Object::Method { name, .. } => Err(EvalError::Type {
                message: format!("method 'str.{name}' must be called"),
            }),
            Object::Builtin(name) => Err(EvalError::Type {
                message: format!("builtin '{name}' must be called"),
            }),
        }
    }
}

/// Names visible to one evaluation.
struct Scope {
    modules: BTreeMap<String, Arc<dyn Module>>,
}

impl Scope {
    /// Binds each declared module. A dotted name binds its top-level module.
    fn import(registry: &ModuleRegistry, declared: &ModuleList) -> std::result::Result<Self, EvalError> {
        let mut modules = BTreeMap::new();
        for name in declared.names() {
            let top = name.split('.').next().unwrap_or(name);
            let module = registry.get(top).ok_or_else(|| EvalError::ModuleImport {
                module: name.clone(),
            })?;
            modules.insert(top.to_string(), module);
        }
        Ok(Self { modules })
    }

    fn eval(&self, expr: &Expr) -> std::result::Result<Object, EvalError> {
        let value = match expr {
            Expr::Literal(value) => value.clone(),
            Expr::List(items) | Expr::Tuple(items) => Value::List(self.values(items)?),
            Expr::Dict(entries) => {
                let mut map = BTreeMap::new();
                for (key, value) in entries {
                    let key = Key::from_value(self.value(key)?)
                        .map_err(|message| EvalError::Type { message })?;
                    map.insert(key, self.value(value)?);
                }
                Value::Map(map)
            }
            Expr::Name(name) => return self.lookup(name),
            Expr::Attribute { object, name } => return self.attribute(self.eval(object)?, name),
            Expr::Call { callee, args } => {
                let callee = self.eval(callee)?;
                let args = self.values(args)?;
                return self.call(callee, &args).map(Object::Value);
            }
            Expr::Index { object, index } => ops::index(&self.value(object)?, &self.value(index)?)?,
            Expr::Unary { op, operand } => ops::unary(*op, &self.value(operand)?)?,
            Expr::Binary {
                op: BinaryOp::And,
                left,
                right,
            } => {
                let left = self.value(left)?;
                if left.is_truthy() { self.value(right)? } else { left }
            }
            Expr::Binary {
                op: BinaryOp::Or,
                left,
                right,
            } => {
                let left = self.value(left)?;
                if left.is_truthy() { left } else { self.value(right)? }
            }
            Expr::Binary { op, left, right } => {
                ops::binary(*op, &self.value(left)?, &self.value(right)?)?
            }
            Expr::Conditional {
                condition,
                then,
                otherwise,
            } => {
                if self.value(condition)?.is_truthy() {
                    return self.eval(then);
                }
                return self.eval(otherwise);
            }
        };
        Ok(Object::Value(value))
    }

    fn value(&self, expr: &Expr) -> std::result::Result<Value, EvalError> {
        self.eval(expr)?.into_value()
    }

    fn values(&self, exprs: &[Expr]) -> std::result::Result<Vec<Value>, EvalError> {
        exprs.iter().map(|e| self.value(e)).collect()
    }

    fn lookup(&self, name: &str) -> std::result::Result<Object, EvalError> {
        if let Some(module) = self.modules.get(name) {
            return Ok(Object::Module(Arc::clone(module)));
        }
        if BUILTINS.contains(&name) {
            return Ok(Object::Builtin(name.to_string()));
        }
        match name {
            "inf" => Ok(Object::Value(Value::Float(f64::INFINITY))),
            "nan" => Ok(Object::Value(Value::Float(f64::NAN))),
            _ => Err(EvalError::UnboundName {
                name: name.to_string(),
            }),
        }
    }

    fn attribute(&self, object: Object, name: &str) -> std::result::Result<Object, EvalError> {
        match object {
            Object::Module(module) => Ok(Object::Member {
                module,
                path: name.to_string(),
            }),
            // A member that is a value behaves like that value; otherwise the
            // path keeps growing, as in `os.path.join`.
            Object::Member { module, path } => match module.attribute(&path) {
                Some(value) => self.attribute(Object::Value(value), name),
                None => Ok(Object::Member {
                    module,
                    path: format!("{path}.{name}"),
                }),
            },
            Object::Value(Value::Str(receiver)) if STRING_METHODS.contains(&name) => {
                Ok(Object::Method {
                    receiver,
                    name: name.to_string(),
                })
            }
            other => {
                let value = other.into_value()?;
                Err(EvalError::Type {
                    message: format!("'{}' object has no attribute '{name}'", value.type_name()),
                })
            }
        }
    }

    fn call(&self, callee: Object, args: &[Value]) -> std::result::Result<Value, EvalError> {
        match callee {
            Object::Builtin(name) => builtins::call_builtin(&name, args),
            Object::Method { receiver, name } => {
                builtins::call_string_method(&receiver, &name, args)
            }
            Object::Member { module, path } => {
                module.call(&path, args).map_err(|message| EvalError::Call {
                    function: format!("{}.{path}", module.name()),
                    message,
                })
            }
            Object::Module(module) => Err(EvalError::Type {
                message: format!("module '{}' is not callable", module.name()),
            }),
            Object::Value(value) => Err(EvalError::Type {
                message: format!("'{}' object is not callable", value.type_name()),
            }),
        }
    }
}
