use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};

use rlox::ast_printer::AstPrinter;
use rlox::interpreter::Interpreter;
use rlox::parser::Parser;
use rlox::pipeline::{self, Stage};
use rlox::scanner;

/// sysexits: usage error, bad input data, internal software error.
const EX_USAGE: i32 = 64;
const EX_DATAERR: i32 = 65;
const EX_SOFTWARE: i32 = 70;

#[derive(ClapParser, Debug)]
#[command(version, about = "Lox language interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Option<Commands>,

    /// Enable logging to rlox.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize {
        filename: Option<PathBuf>,

        /// Print the token stream as JSON
        #[arg(long)]
        json: bool,
    },

    /// Parses input from a file and prints its syntax tree
    Parse { filename: Option<PathBuf> },

    /// Runs input from a file as a Lox program; starts a REPL without one
    Run { filename: Option<PathBuf> },

    /// Starts an interactive session
    Repl,
}

/// Reads the contents of a file into a String
fn read_file(filename: &PathBuf) -> Result<String> {
    info!("Reading file: {:?}", filename);

    let file = File::open(filename).context(format!("Failed to open file {:?}", filename))?;
    let mut reader = BufReader::new(file);
    let mut buf = String::new();

    let bytes = reader
        .read_to_string(&mut buf)
        .context(format!("Failed to read file {:?}", filename))?;

    info!("Read {} bytes from {:?}", bytes, filename);

    Ok(buf)
}

fn init_logger() -> Result<()> {
    let log_file = File::create("rlox.log").context("Failed to create rlox.log")?;

    Builder::new()
        .format(|buf, record| {
            let module = record.module_path().unwrap_or("<unnamed>");
            let module = module.strip_prefix("rlox::").unwrap_or(module);
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized, writing to rlox.log");
    Ok(())
}

fn require(filename: Option<PathBuf>) -> PathBuf {
    match filename {
        Some(filename) => filename,
        None => {
            eprintln!("No input filepath was provided.");
            process::exit(EX_USAGE);
        }
    }
}

fn tokenize(filename: PathBuf, json: bool) -> Result<()> {
    let source = read_file(&filename)?;
    let (tokens, errors) = scanner::tokenize(&source);

    for e in &errors {
        eprintln!("{}", e);
    }

    if json {
        let out = serde_json::to_string_pretty(&tokens).context("Failed to encode tokens")?;
        println!("{}", out);
    } else {
        for token in &tokens {
            println!("{}", token);
        }
    }

    if !errors.is_empty() {
        debug!("Tokenization failed, exiting with code {}", EX_DATAERR);
        process::exit(EX_DATAERR);
    }

    Ok(())
}

fn parse(filename: PathBuf) -> Result<()> {
    let source = read_file(&filename)?;
    let (tokens, lex_errors) = scanner::tokenize(&source);
    let (statements, parse_errors) = Parser::new(tokens).parse();

    if !lex_errors.is_empty() || !parse_errors.is_empty() {
        for e in lex_errors.iter().chain(parse_errors.iter()) {
            eprintln!("{}", e);
        }
        process::exit(EX_DATAERR);
    }

    for stmt in &statements {
        println!("{}", AstPrinter::print_stmt(stmt));
    }

    Ok(())
}

fn run_file(filename: PathBuf) -> Result<()> {
    let source = read_file(&filename)?;
    let mut interpreter = Interpreter::new();

    if let Err(failure) = pipeline::run(&mut interpreter, &source) {
        eprintln!("{}", failure);

        let code = match failure.stage {
            Stage::Runtime => EX_SOFTWARE,
            _ => EX_DATAERR,
        };
        process::exit(code);
    }

    info!("Program executed successfully");
    Ok(())
}

fn repl() -> Result<()> {
    info!("Starting REPL");

    let mut interpreter = Interpreter::new();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        io::stdout().flush().context("Failed to flush stdout")?;

        let Some(line) = lines.next() else {
            println!();
            break;
        };
        let line = line.context("Failed to read from stdin")?;

        match pipeline::run(&mut interpreter, &line) {
            Ok(result) => println!("{}", result),
            Err(failure) => println!("{}", failure),
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    if args.log {
        init_logger()?;
    } else {
        Builder::new().filter_level(log::LevelFilter::Off).init();
    }

    info!("CLI arguments: {:?}", args);

    match args.commands {
        Some(Commands::Tokenize { filename, json }) => tokenize(require(filename), json),
        Some(Commands::Parse { filename }) => parse(require(filename)),
        Some(Commands::Run {
            filename: Some(filename),
        }) => run_file(filename),
        Some(Commands::Run { filename: None }) | Some(Commands::Repl) | None => repl(),
    }
}
