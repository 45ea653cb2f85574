//! Lex → parse → resolve → interpret, stopping at the first stage that
//! reports errors.

use std::fmt;

use log::info;

use crate::error::LoxError;
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::resolver::Resolver;
use crate::scanner;

/// Pipeline stage, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Lex,
    Parse,
    Resolve,
    Runtime,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let heading = match self {
            Stage::Lex => "Lexing errors",
            Stage::Parse => "Parsing errors",
            Stage::Resolve => "Semantic analysis errors",
            Stage::Runtime => "Runtime error",
        };

        f.write_str(heading)
    }
}

/// The errors of the first stage that failed.  Later stages did not run.
#[derive(Debug)]
pub struct Failure {
    pub stage: Stage,
    pub errors: Vec<LoxError>,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.stage)?;
        for error in &self.errors {
            write!(f, "\n{}", error)?;
        }

        Ok(())
    }
}

impl std::error::Error for Failure {}

/// Runs `source` against `interpreter`.  On success returns the formatted
/// value of the last evaluated statement.
pub fn run(interpreter: &mut Interpreter, source: &str) -> Result<String, Failure> {
    let (tokens, errors) = scanner::tokenize(source);
    if !errors.is_empty() {
        return Err(Failure {
            stage: Stage::Lex,
            errors,
        });
    }

    let (statements, errors) = Parser::new(tokens).parse();
    if !errors.is_empty() {
        return Err(Failure {
            stage: Stage::Parse,
            errors,
        });
    }

    let errors = Resolver::new(interpreter).resolve(&statements);
    if !errors.is_empty() {
        return Err(Failure {
            stage: Stage::Resolve,
            errors,
        });
    }

    interpreter.interpret(&statements).map_err(|e| Failure {
        stage: Stage::Runtime,
        errors: vec![e],
    })?;

    info!("Run finished, result: {}", interpreter.result());

    Ok(interpreter.result().to_string())
}
