//! Straight-line evaluator for the naga IR of a fragment entry point.
//!
//! Covers the subset the cube's fragment stage compiles to (component access,
//! `abs`/`min`, comparisons, logical operators, `if`, `discard`, `return`),
//! which is enough to run the shader's banding against the CPU classifier.

use naga::{BinaryOperator, Expression, Handle, Literal, MathFunction, Statement};

use super::ShaderStage;

#[derive(Debug, Clone, PartialEq)]
enum Value {
    Float(f32),
    Bool(bool),
    Vector(Vec<f32>),
    Struct(Vec<Value>),
    Pointer(Handle<naga::LocalVariable>),
}

impl Value {
    fn float(&self) -> f32 {
        match self {
            Value::Float(v) => *v,
            other => panic!("expected a float, got {other:?}"),
        }
    }

    fn bool(&self) -> bool {
        match self {
            Value::Bool(v) => *v,
            other => panic!("expected a bool, got {other:?}"),
        }
    }

    fn map(&self, f: impl Fn(f32) -> f32) -> Value {
        match self {
            Value::Float(v) => Value::Float(f(*v)),
            Value::Vector(v) => Value::Vector(v.iter().copied().map(f).collect()),
            other => panic!("expected a float or vector, got {other:?}"),
        }
    }

    fn zip(&self, other: &Value, f: impl Fn(f32, f32) -> f32) -> Value {
        match (self, other) {
            (Value::Float(a), Value::Float(b)) => Value::Float(f(*a, *b)),
            (Value::Vector(a), Value::Vector(b)) => {
                Value::Vector(a.iter().zip(b).map(|(a, b)| f(*a, *b)).collect())
            }
            (a, b) => panic!("mismatched operands {a:?} and {b:?}"),
        }
    }
}

enum Flow {
    Next,
    Discard,
    Return(Value),
}

struct Frame<'a> {
    module: &'a naga::Module,
    function: &'a naga::Function,
    arguments: Vec<Value>,
    locals: Vec<(Handle<naga::LocalVariable>, Value)>,
}

impl Frame<'_> {
    fn expr(&self, handle: Handle<Expression>) -> Value {
        eval(self.module, &self.function.expressions, handle, Some(self))
    }

    fn run(&mut self, block: &naga::Block) -> Flow {
        for statement in block.iter() {
            let flow = match statement {
                Statement::Emit(_) => Flow::Next,
                Statement::Block(inner) => self.run(inner),
                Statement::If {
                    condition,
                    accept,
                    reject,
                } => {
                    if self.expr(*condition).bool() {
                        self.run(accept)
                    } else {
                        self.run(reject)
                    }
                }
                Statement::Kill => Flow::Discard,
                Statement::Return { value } => {
                    Flow::Return(value.map_or(Value::Struct(Vec::new()), |v| self.expr(v)))
                }
                Statement::Store { pointer, value } => {
                    let Value::Pointer(local) = self.expr(*pointer) else {
                        panic!("store through a non-local pointer");
                    };
                    let value = self.expr(*value);
                    self.locals.retain(|(h, _)| *h != local);
                    self.locals.push((local, value));
                    Flow::Next
                }
                other => panic!("unsupported statement {other:?}"),
            };
            if !matches!(flow, Flow::Next) {
                return flow;
            }
        }
        Flow::Next
    }
}

fn eval(
    module: &naga::Module,
    arena: &naga::Arena<Expression>,
    handle: Handle<Expression>,
    frame: Option<&Frame<'_>>,
) -> Value {
    let sub = |h: Handle<Expression>| eval(module, arena, h, frame);

    match &arena[handle] {
        Expression::Literal(Literal::F32(v)) => Value::Float(*v),
        Expression::Literal(Literal::AbstractFloat(v)) => Value::Float(*v as f32),
        Expression::Literal(Literal::Bool(v)) => Value::Bool(*v),
        Expression::Constant(c) => {
            let init = module.constants[*c].init;
            eval(module, &module.global_expressions, init, None)
        }
        Expression::Compose { components, .. } => {
            let values: Vec<Value> = components.iter().map(|&c| sub(c)).collect();
            if values.iter().all(|v| matches!(v, Value::Float(_))) {
                Value::Vector(values.iter().map(Value::float).collect())
            } else {
                Value::Struct(values)
            }
        }
        Expression::Splat { size, value } => {
            Value::Vector(vec![sub(*value).float(); *size as usize])
        }
        Expression::FunctionArgument(index) => match frame {
            Some(frame) => frame.arguments[*index as usize].clone(),
            None => panic!("argument outside a function"),
        },
        Expression::AccessIndex { base, index } => match sub(*base) {
            Value::Vector(v) => Value::Float(v[*index as usize]),
            Value::Struct(members) => members[*index as usize].clone(),
            other => panic!("cannot index {other:?}"),
        },
        Expression::LocalVariable(local) => Value::Pointer(*local),
        Expression::Load { pointer } => {
            let Value::Pointer(local) = sub(*pointer) else {
                panic!("load through a non-local pointer");
            };
            let frame = frame.expect("load outside a function");
            match frame.locals.iter().find(|(h, _)| *h == local) {
                Some((_, value)) => value.clone(),
                None => {
                    let init = frame.function.local_variables[local]
                        .init
                        .expect("load of an uninitialized local");
                    sub(init)
                }
            }
        }
        Expression::Math {
            fun: MathFunction::Abs,
            arg,
            ..
        } => sub(*arg).map(f32::abs),
        Expression::Math {
            fun: MathFunction::Min,
            arg,
            arg1: Some(arg1),
            ..
        } => sub(*arg).zip(&sub(*arg1), f32::min),
        Expression::Math {
            fun: MathFunction::Max,
            arg,
            arg1: Some(arg1),
            ..
        } => sub(*arg).zip(&sub(*arg1), f32::max),
        Expression::Unary {
            op: naga::UnaryOperator::LogicalNot,
            expr,
        } => Value::Bool(!sub(*expr).bool()),
        Expression::Select {
            condition,
            accept,
            reject,
        } => {
            if sub(*condition).bool() {
                sub(*accept)
            } else {
                sub(*reject)
            }
        }
        Expression::Binary { op, left, right } => {
            let (l, r) = (sub(*left), sub(*right));
            match op {
                BinaryOperator::Less => Value::Bool(l.float() < r.float()),
                BinaryOperator::LessEqual => Value::Bool(l.float() <= r.float()),
                BinaryOperator::Greater => Value::Bool(l.float() > r.float()),
                BinaryOperator::GreaterEqual => Value::Bool(l.float() >= r.float()),
                BinaryOperator::LogicalAnd | BinaryOperator::And => Value::Bool(l.bool() && r.bool()),
                BinaryOperator::LogicalOr | BinaryOperator::InclusiveOr => {
                    Value::Bool(l.bool() || r.bool())
                }
                other => panic!("unsupported operator {other:?}"),
            }
        }
        other => panic!("unsupported expression {other:?}"),
    }
}

/// Runs the stage's entry point for one fragment whose inputs are
/// `(v_position, v_color)`. `None` means the fragment was discarded.
pub(crate) fn run_fragment(
    stage: &ShaderStage,
    position: [f32; 3],
    color: [f32; 4],
) -> Option<[f32; 4]> {
    let entry = stage.entry();
    let input = Value::Struct(vec![
        Value::Vector(position.to_vec()),
        Value::Vector(color.to_vec()),
    ]);

    let mut frame = Frame {
        module: stage.module(),
        function: &entry.function,
        arguments: vec![input],
        locals: Vec::new(),
    };

    match frame.run(&entry.function.body) {
        Flow::Discard => None,
        Flow::Return(Value::Vector(v)) => Some([v[0], v[1], v[2], v[3]]),
        Flow::Return(other) => panic!("fragment returned {other:?}"),
        Flow::Next => panic!("fragment fell off the end without returning"),
    }
}
