use super::value::{Literal, repr_bytes, repr_float, repr_str};
use super::{DomainObject, ObjectId, Objects};
use crate::error::RenderError;

/// Turns a wrapped domain object into a native expression.
///
/// Converters must be pure: they may run any number of times before, and
/// during, final serialization.
pub type Converter = fn(&DomainObject) -> Result<Expression, RenderError>;

/// Anything that produces a value in the target language.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(Literal),
    /// An f-string template, e.g. `a{x}b` for `f'a{x}b'`.
    FString(String),
    /// A name forwarded verbatim (variable, function, class...).
    Symbol(String),
    FunctionCall(FunctionCall),
    BinaryOp(BinaryOp),
    Placeholder(Placeholder),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub positional_args: Vec<Expression>,
    pub named_args: Vec<(String, Expression)>,
}

impl FunctionCall {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            positional_args: Vec::new(),
            named_args: Vec::new(),
        }
    }

    pub fn arg(mut self, value: Expression) -> Self {
        self.positional_args.push(value);
        self
    }

    /// Sets a keyword argument, replacing any previous value in place.
    pub fn named(mut self, key: impl Into<String>, value: Expression) -> Self {
        let key = key.into();
        match self.named_args.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.named_args.push((key, value)),
        }
        self
    }

    pub fn named_arg(&self, key: &str) -> Option<&Expression> {
        self.named_args
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}

/// A binary operator application. Operands that are themselves binary
/// operations are always parenthesised.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOp {
    pub lhs: Box<Expression>,
    pub op: String,
    pub rhs: Box<Expression>,
}

/// An expression standing for a domain object that is rendered late.
///
/// The object lives in the [`super::Program`]'s object arena; the placeholder
/// only keeps its handle, so replacing the object there is reflected in the
/// output.
#[derive(Debug, Clone)]
pub struct Placeholder {
    pub target: ObjectId,
    pub converter: Converter,
    /// Purely descriptive, shown in diagnostics.
    pub name: String,
}

// Converters are compared by what they point to, not by function address.
impl PartialEq for Placeholder {
    fn eq(&self, other: &Self) -> bool {
        self.target == other.target && self.name == other.name
    }
}

impl Placeholder {
    pub fn new(target: ObjectId, converter: Converter, name: impl Into<String>) -> Self {
        Self {
            target,
            converter,
            name: name.into(),
        }
    }

    /// Runs the converter on the current value of the wrapped object.
    pub fn resolve(&self, objects: &Objects) -> Result<Expression, RenderError> {
        let object = objects
            .get(self.target)
            .ok_or_else(|| RenderError::DanglingObject {
                name: self.name.clone(),
                id: self.target.index(),
            })?;
        (self.converter)(object)
    }
}

impl Expression {
    pub fn symbol(name: impl Into<String>) -> Self {
        Expression::Symbol(name.into())
    }

    pub fn str(s: impl Into<String>) -> Self {
        Expression::Literal(Literal::Str(s.into()))
    }

    pub fn int(i: i64) -> Self {
        Expression::Literal(Literal::Int(i.into()))
    }

    pub fn bool(b: bool) -> Self {
        Expression::Literal(Literal::Bool(b))
    }

    pub fn binary(lhs: Expression, op: impl Into<String>, rhs: Expression) -> Self {
        Expression::BinaryOp(BinaryOp {
            lhs: Box::new(lhs),
            op: op.into(),
            rhs: Box::new(rhs),
        })
    }

    /// Renders this expression as a single line of code. Placeholders are
    /// resolved against `objects` at this point.
    pub fn render(&self, objects: &Objects) -> Result<String, RenderError> {
        match self {
            Expression::Literal(lit) => render_literal(lit, objects),
            Expression::FString(template) => Ok(format!("f{}", repr_str(template))),
            Expression::Symbol(name) => Ok(name.clone()),
            Expression::FunctionCall(call) => {
                let positional = call.positional_args.iter().map(|a| a.render(objects));
                let named = call
                    .named_args
                    .iter()
                    .map(|(k, v)| v.render(objects).map(|v| format!("{}={}", k, v)));
                let args = positional.chain(named).collect::<Result<Vec<_>, _>>()?;
                Ok(format!("{}({})", call.name, args.join(", ")))
            }
            Expression::BinaryOp(op) => {
                let operand = |e: &Expression| -> Result<String, RenderError> {
                    let s = e.render(objects)?;
                    Ok(match e {
                        Expression::BinaryOp(_) => format!("({})", s),
                        _ => s,
                    })
                };
                Ok(format!("{} {} {}", operand(&op.lhs)?, op.op, operand(&op.rhs)?))
            }
            Expression::Placeholder(p) => p.resolve(objects)?.render(objects),
        }
    }

    /// Visits every expression of this subtree, including this one.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Expression)) {
        visit(self);
        match self {
            Expression::Literal(Literal::List(items) | Literal::Tuple(items)) => {
                for e in items {
                    e.walk(visit);
                }
            }
            Expression::Literal(Literal::Dict(pairs)) => {
                for (k, v) in pairs {
                    k.walk(visit);
                    v.walk(visit);
                }
            }
            Expression::FunctionCall(call) => {
                for e in &call.positional_args {
                    e.walk(visit);
                }
                for (_, e) in &call.named_args {
                    e.walk(visit);
                }
            }
            Expression::BinaryOp(op) => {
                op.lhs.walk(visit);
                op.rhs.walk(visit);
            }
            Expression::Literal(_)
            | Expression::FString(_)
            | Expression::Symbol(_)
            | Expression::Placeholder(_) => {}
        }
    }
}

impl From<Literal> for Expression {
    fn from(lit: Literal) -> Self {
        Expression::Literal(lit)
    }
}

impl From<FunctionCall> for Expression {
    fn from(call: FunctionCall) -> Self {
        Expression::FunctionCall(call)
    }
}

fn render_literal(lit: &Literal, objects: &Objects) -> Result<String, RenderError> {
    let join = |items: &[Expression]| -> Result<String, RenderError> {
        Ok(items
            .iter()
            .map(|e| e.render(objects))
            .collect::<Result<Vec<_>, _>>()?
            .join(", "))
    };
    Ok(match lit {
        Literal::None => "None".to_string(),
        Literal::Bool(true) => "True".to_string(),
        Literal::Bool(false) => "False".to_string(),
        Literal::Int(i) => i.to_string(),
        Literal::Float(f) => repr_float(*f),
        Literal::Str(s) => repr_str(s),
        Literal::Bytes(b) => repr_bytes(b),
        Literal::List(items) => format!("[{}]", join(items)?),
        Literal::Tuple(items) if items.len() == 1 => format!("({},)", join(items)?),
        Literal::Tuple(items) => format!("({})", join(items)?),
        Literal::Dict(pairs) => {
            let entries: Vec<String> = pairs
                .iter()
                .map(|(k, v)| -> Result<String, RenderError> {
                    Ok(format!("{}: {}", k.render(objects)?, v.render(objects)?))
                })
                .collect::<Result<_, _>>()?;
            format!("{{{}}}", entries.join(", "))
        }
    })
}
