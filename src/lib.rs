pub mod ast;
pub mod ast_printer;
pub mod callable;
pub mod environment;
pub mod error;
pub mod interpreter;
pub mod parser;
pub mod pipeline;
pub mod printer;
pub mod resolver;
pub mod scanner;
pub mod stack;
pub mod token;
pub mod value;
