//! Tree‑walking evaluator.
//!
//! An [`Interpreter`] is a session: it owns the global environment and the
//! resolver's hop‑count table, both of which survive across `interpret`
//! calls, so a REPL can feed it one fragment at a time.

use std::collections::HashMap;
use std::mem;
use std::rc::Rc;

use log::{debug, info};

use crate::ast::{Expr, ExprId, LiteralValue, Stmt};
use crate::callable::{self, Callable, Function};
use crate::environment::{EnvRef, Environment};
use crate::error::{LoxError, Result, RuntimeError};
use crate::printer::{Printer, StdoutPrinter};
use crate::stack::ensure_sufficient_stack;
use crate::token::{Token, TokenType};
use crate::value::Value;

/// How a statement finished.  `Return` travels up through blocks and loops
/// until the function call that owns it turns it into the call's value.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    Normal,
    Return(Value),
}

/// Deepest chain of active Lox calls before a call fails with
/// `Stack overflow.`.
pub const MAX_CALL_DEPTH: usize = 1024;

type Exec = std::result::Result<Flow, RuntimeError>;
type Eval = std::result::Result<Value, RuntimeError>;

pub struct Interpreter {
    globals: EnvRef,
    environment: EnvRef,
    // Entries are never dropped: closures from earlier runs keep their
    // nodes alive, and ids are unique for the whole process.
    locals: HashMap<ExprId, usize>,
    call_depth: usize,
    printer: Box<dyn Printer>,
    result: String,
    error: Option<RuntimeError>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// Creates an interpreter printing to stdout, with `clock` defined.
    pub fn new() -> Self {
        Self::with_printer(Box::new(StdoutPrinter))
    }

    pub fn with_printer(printer: Box<dyn Printer>) -> Self {
        info!("Initializing Interpreter");

        let globals: EnvRef = Environment::new().into_ref();

        let clock = callable::clock();
        debug!("Defining native function '{}'", clock.name);
        globals
            .borrow_mut()
            .define(clock.name, Value::Callable(Callable::Native(clock)));

        Self {
            environment: Rc::clone(&globals),
            globals,
            locals: HashMap::new(),
            call_depth: 0,
            printer,
            result: String::new(),
            error: None,
        }
    }

    /// Formatted value of the last expression statement, `print`,
    /// initialised `var`, evaluated condition or valued `return`.
    pub fn result(&self) -> &str {
        &self.result
    }

    /// The runtime error that ended the most recent `interpret` call, if any.
    pub fn error(&self) -> Option<&RuntimeError> {
        self.error.as_ref()
    }

    /// Current value of a global binding.
    pub fn global(&self, name: &str) -> Option<Value> {
        self.globals.borrow().get(name, 0).ok()
    }

    /// Called by the resolver: `id` refers to a binding `depth` scopes out.
    pub fn note_local(&mut self, id: ExprId, depth: usize) {
        debug!("Noting {} at depth {}", id, depth);

        self.locals.insert(id, depth);
    }

    /// Runs a resolved program.  The previous run's error is forgotten first;
    /// global bindings are kept.
    pub fn interpret(&mut self, statements: &[Stmt]) -> Result<()> {
        info!("Interpreting {} statement(s)", statements.len());

        self.error = None;
        self.environment = Rc::clone(&self.globals);
        self.call_depth = 0;

        for stmt in statements {
            if let Err(e) = self.execute(stmt) {
                debug!("Runtime error: {}", e);

                self.error = Some(e.clone());
                return Err(LoxError::Runtime(e));
            }
        }

        info!("Interpretation completed successfully");

        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Statements
    // ─────────────────────────────────────────────────────────────────────────

    fn execute(&mut self, stmt: &Stmt) -> Exec {
        ensure_sufficient_stack(|| self.execute_stmt(stmt))
    }

    fn execute_stmt(&mut self, stmt: &Stmt) -> Exec {
        match stmt {
            Stmt::Expression(expr) => {
                let value: Value = self.evaluate(expr)?;
                self.result = value.to_string();
            }

            Stmt::Print(expr) => {
                let value: Value = self.evaluate(expr)?;
                self.result = value.to_string();
                self.printer.print(&[self.result.as_str()]);
            }

            Stmt::Var { name, initializer } => {
                let value: Value = match initializer {
                    Some(expr) => {
                        let value = self.evaluate(expr)?;
                        self.result = value.to_string();
                        value
                    }
                    None => Value::Nil,
                };

                debug!("Defining variable '{}' = {}", name.lexeme, value);

                self.environment.borrow_mut().define(&name.lexeme, value);
            }

            Stmt::Block(statements) => {
                let scope = Environment::with_enclosing(Rc::clone(&self.environment));
                return self.execute_block(statements, scope);
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let condition: Value = self.evaluate(condition)?;
                self.result = condition.to_string();

                if condition.is_truthy() {
                    return self.execute(then_branch);
                } else if let Some(else_branch) = else_branch {
                    return self.execute(else_branch);
                }
            }

            Stmt::While { condition, body } => {
                loop {
                    let value: Value = self.evaluate(condition)?;
                    self.result = value.to_string();

                    if !value.is_truthy() {
                        break;
                    }

                    if let Flow::Return(value) = self.execute(body)? {
                        return Ok(Flow::Return(value));
                    }
                }
            }

            Stmt::Function(declaration) => {
                debug!("Defining function '{}'", declaration.name.lexeme);

                let function = Function::new(Rc::clone(declaration), Rc::clone(&self.environment));
                self.environment.borrow_mut().define(
                    &declaration.name.lexeme,
                    Value::Callable(Callable::Function(Rc::new(function))),
                );
            }

            Stmt::Return { value, .. } => {
                let value: Value = match value {
                    Some(expr) => {
                        let value = self.evaluate(expr)?;
                        self.result = value.to_string();
                        value
                    }
                    None => Value::Nil,
                };

                debug!("Returning value: {}", value);

                return Ok(Flow::Return(value));
            }

            Stmt::Class(class) => {
                return Err(RuntimeError::new(
                    class.name.line,
                    format!("Classes are not supported (class '{}').", class.name.lexeme),
                ));
            }
        }

        Ok(Flow::Normal)
    }

    /// Runs `statements` with `scope` as the current environment, restoring
    /// the previous one on every exit path.
    pub(crate) fn execute_block(&mut self, statements: &[Stmt], scope: Environment) -> Exec {
        let previous: EnvRef = mem::replace(&mut self.environment, scope.into_ref());
        let outcome: Exec = self.run_statements(statements);
        self.environment = previous;

        outcome
    }

    fn run_statements(&mut self, statements: &[Stmt]) -> Exec {
        for stmt in statements {
            if let Flow::Return(value) = self.execute(stmt)? {
                return Ok(Flow::Return(value));
            }
        }

        Ok(Flow::Normal)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Expressions
    // ─────────────────────────────────────────────────────────────────────────

    /// Evaluates an expression in the current environment.
    pub fn evaluate(&mut self, expr: &Expr) -> Eval {
        ensure_sufficient_stack(|| self.evaluate_expr(expr))
    }

    fn evaluate_expr(&mut self, expr: &Expr) -> Eval {
        match expr {
            Expr::Literal(literal) => Ok(match literal {
                LiteralValue::Number(n) => Value::Number(*n),
                LiteralValue::Str(s) => Value::String(s.clone()),
                LiteralValue::Bool(b) => Value::Bool(*b),
                LiteralValue::Nil => Value::Nil,
            }),

            Expr::Grouping(inner) => self.evaluate(inner),

            Expr::Unary { operator, right } => self.evaluate_unary(operator, right),

            Expr::Binary {
                left,
                operator,
                right,
            } => self.evaluate_binary(left, operator, right),

            Expr::Logical {
                left,
                operator,
                right,
            } => {
                let left: Value = self.evaluate(left)?;

                let short_circuits = match operator.token_type {
                    TokenType::OR => left.is_truthy(),
                    _ => !left.is_truthy(),
                };

                if short_circuits {
                    Ok(left)
                } else {
                    self.evaluate(right)
                }
            }

            Expr::Variable { id, name } => self.look_up_variable(*id, name),

            Expr::Assign { id, name, value } => {
                let value: Value = self.evaluate(value)?;

                match self.locals.get(id) {
                    Some(&distance) => Environment::assign_at(
                        &self.environment,
                        distance,
                        &name.lexeme,
                        value.clone(),
                        name.line,
                    )?,
                    None => self
                        .globals
                        .borrow_mut()
                        .assign(&name.lexeme, value.clone(), name.line)?,
                }

                Ok(value)
            }

            Expr::Call {
                callee,
                paren,
                arguments,
            } => {
                let callee: Value = self.evaluate(callee)?;

                let mut values: Vec<Value> = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    values.push(self.evaluate(argument)?);
                }

                let callable: Callable = match callee {
                    Value::Callable(callable) => callable,
                    other => {
                        return Err(RuntimeError::new(
                            paren.line,
                            format!("Can only call functions, not {}.", other.type_name()),
                        ));
                    }
                };

                if values.len() != callable.arity() {
                    return Err(RuntimeError::new(
                        paren.line,
                        format!(
                            "Expected {} arguments but got {}.",
                            callable.arity(),
                            values.len()
                        ),
                    ));
                }

                if self.call_depth >= MAX_CALL_DEPTH {
                    return Err(RuntimeError::new(paren.line, "Stack overflow."));
                }

                self.call_depth += 1;
                let outcome: Eval = callable.call(self, values, paren.line);
                self.call_depth -= 1;

                outcome
            }
        }
    }

    fn look_up_variable(&self, id: ExprId, name: &Token) -> Eval {
        match self.locals.get(&id) {
            Some(&distance) => {
                Environment::get_at(&self.environment, distance, &name.lexeme, name.line)
            }
            None => self.globals.borrow().get(&name.lexeme, name.line),
        }
    }

    fn evaluate_unary(&mut self, operator: &Token, right: &Expr) -> Eval {
        let right: Value = self.evaluate(right)?;

        match operator.token_type {
            TokenType::MINUS => match right {
                Value::Number(n) => Ok(Value::Number(-n)),
                other => Err(RuntimeError::new(
                    operator.line,
                    format!("Operand of '-' must be a number, got {}.", other.type_name()),
                )),
            },
            TokenType::BANG => Ok(Value::Bool(!right.is_truthy())),
            _ => Err(RuntimeError::new(
                operator.line,
                format!("Invalid unary operator '{}'.", operator.lexeme),
            )),
        }
    }

    fn evaluate_binary(&mut self, left: &Expr, operator: &Token, right: &Expr) -> Eval {
        let left: Value = self.evaluate(left)?;
        let right: Value = self.evaluate(right)?;

        debug!("Binary '{}' on {} and {}", operator.lexeme, left, right);

        match operator.token_type {
            TokenType::PLUS => match (left, right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                (Value::String(a), Value::String(b)) => Ok(Value::String(a + &b)),
                (Value::String(a), other) => Ok(Value::String(format!("{a}{other}"))),
                (other, Value::String(b)) => Ok(Value::String(format!("{other}{b}"))),
                (a, b) => Err(RuntimeError::new(
                    operator.line,
                    format!(
                        "Operands of '+' must be two numbers or include a string, got {} and {}.",
                        a.type_name(),
                        b.type_name()
                    ),
                )),
            },

            TokenType::MINUS => {
                let (a, b) = numbers(operator, &left, &right)?;
                Ok(Value::Number(a - b))
            }

            TokenType::STAR => {
                let (a, b) = numbers(operator, &left, &right)?;
                Ok(Value::Number(a * b))
            }

            TokenType::SLASH => {
                let (a, b) = numbers(operator, &left, &right)?;
                if b == 0.0 {
                    return Err(RuntimeError::new(operator.line, "Division by zero."));
                }
                Ok(Value::Number(a / b))
            }

            TokenType::GREATER => {
                let (a, b) = numbers(operator, &left, &right)?;
                Ok(Value::Bool(a > b))
            }

            TokenType::GREATER_EQUAL => {
                let (a, b) = numbers(operator, &left, &right)?;
                Ok(Value::Bool(a >= b))
            }

            TokenType::LESS => {
                let (a, b) = numbers(operator, &left, &right)?;
                Ok(Value::Bool(a < b))
            }

            TokenType::LESS_EQUAL => {
                let (a, b) = numbers(operator, &left, &right)?;
                Ok(Value::Bool(a <= b))
            }

            TokenType::EQUAL_EQUAL => Ok(Value::Bool(left == right)),

            TokenType::BANG_EQUAL => Ok(Value::Bool(left != right)),

            _ => Err(RuntimeError::new(
                operator.line,
                format!("Invalid binary operator '{}'.", operator.lexeme),
            )),
        }
    }
}

fn numbers(
    operator: &Token,
    left: &Value,
    right: &Value,
) -> std::result::Result<(f64, f64), RuntimeError> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok((*a, *b)),
        _ => Err(RuntimeError::new(
            operator.line,
            format!(
                "Operands of '{}' must be numbers, got {} and {}.",
                operator.lexeme,
                left.type_name(),
                right.type_name()
            ),
        )),
    }
}
