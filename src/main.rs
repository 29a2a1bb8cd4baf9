use trait_lox::runner::{Lox, LoxError};

use clap::Parser;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::{fs, process};
use tracing_subscriber::EnvFilter;

/// Tree-walking interpreter for Lox with traits, arrays and static members.
#[derive(Parser, Debug)]
#[clap(name = "rlox", version)]
struct Args {
    /// Script to run. Starts a REPL when omitted.
    script: Option<PathBuf>,

    /// Don't report unused local variables.
    #[clap(long)]
    no_warnings: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_env("RLOX_LOG"))
        .with_writer(io::stderr)
        .init();

    // Usage errors exit with 64. Help and version output exit normally.
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            process::exit(64);
        }
    };

    match &args.script {
        Some(path) => run_file(path, &args),
        None => run_prompt(&args),
    }
}

fn run_prompt(args: &Args) {
    let mut lox = Lox::new();
    let stdin = io::stdin();

    loop {
        let mut input = String::new();

        print!("> ");
        if io::stdout().flush().is_err() {
            break;
        }

        match stdin.read_line(&mut input) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                eprintln!("Failed to read line: {}", e);
                break;
            }
        }

        // Errors are reported and the session keeps its state.
        let _ = run(&mut lox, &input, args);
    }
}

fn run_file(path: &Path, args: &Args) {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Failed to read '{}': {}", path.display(), e);
            process::exit(74);
        }
    };

    let mut lox = Lox::new();
    if let Err(code) = run(&mut lox, &source, args) {
        process::exit(code);
    }
}

fn run(lox: &mut Lox<io::Stdout>, source: &str, args: &Args) -> Result<(), i32> {
    let program = match lox.prepare(source) {
        Ok(program) => program,
        Err(error) => return Err(report_error(&error, source)),
    };

    if !args.no_warnings {
        for warning in program.warnings.iter() {
            eprintln!("{}", warning);
        }
    }

    lox.execute(&program)
        .map_err(|error| report_error(&error, source))
}

fn report_error(error: &LoxError, source: &str) -> i32 {
    for line in error.render(source) {
        eprintln!("{}", line);
    }
    error.exit_code()
}
