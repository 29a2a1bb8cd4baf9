use crate::lox_frontend::grammar::{ExprId, Stmt};
use crate::lox_frontend::{Parser, ParserError};
use crate::treewalk_interpreter::{
    Interpreter, Resolver, ResolverError, ResolverWarning, RuntimeError,
};

use std::io::{self, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoxError {
    #[error("{} parse error(s)", .0.len())]
    Parse(Vec<ParserError>),
    #[error(transparent)]
    Resolve(#[from] ResolverError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl LoxError {
    /// Process exit code for a script that failed with this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoxError::Parse(_) => 65,
            LoxError::Resolve(_) => 67,
            LoxError::Runtime(_) => 70,
        }
    }

    /// One line per error, with static errors pointing at their lexeme.
    pub fn render(&self, source: &str) -> Vec<String> {
        match self {
            LoxError::Parse(errors) => errors.iter().map(|e| e.render(source)).collect(),
            LoxError::Resolve(error) => vec![error.render(source)],
            LoxError::Runtime(error) => vec![error.to_string()],
        }
    }
}

/// A parsed and resolved program, ready to run.
pub struct Program {
    stmts: Vec<Stmt>,
    pub warnings: Vec<ResolverWarning>,
}

/// An interpreter session. Globals and scope distances survive from one
/// `run` to the next.
pub struct Lox<W: Write> {
    interpreter: Interpreter<W>,
    next_expr_id: ExprId,
}

impl Lox<io::Stdout> {
    pub fn new() -> Self {
        Self::new_with_output(io::stdout())
    }
}

impl Default for Lox<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Lox<W> {
    pub fn new_with_output(output: W) -> Self {
        Lox {
            interpreter: Interpreter::new_with_output(output),
            next_expr_id: ExprId(0),
        }
    }

    /// Parses and resolves `source`. Nothing runs yet.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn prepare(&mut self, source: &str) -> Result<Program, LoxError> {
        let tree = Parser::with_first_expr_id(source, self.next_expr_id)
            .parse()
            .map_err(LoxError::Parse)?;
        self.next_expr_id = tree.next_expr_id;

        let resolution = Resolver::new().resolve(&tree.stmts)?;
        self.interpreter.extend_locals(resolution.locals);

        Ok(Program {
            stmts: tree.stmts,
            warnings: resolution.warnings,
        })
    }

    pub fn execute(&mut self, program: &Program) -> Result<(), LoxError> {
        self.interpreter.interpret(&program.stmts)?;
        Ok(())
    }

    pub fn run(&mut self, source: &str) -> Result<Vec<ResolverWarning>, LoxError> {
        let program = self.prepare(source)?;
        self.execute(&program)?;
        Ok(program.warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_session(sources: &[&str]) -> (String, Vec<Result<(), LoxError>>) {
        let mut output = Vec::new();
        let results = {
            let mut lox = Lox::new_with_output(&mut output);
            sources
                .iter()
                .map(|source| lox.run(source).map(|_| ()))
                .collect::<Vec<_>>()
        };
        (String::from_utf8(output).unwrap(), results)
    }

    #[test]
    fn test_globals_persist_across_runs() {
        let (output, results) = run_session(&[
            "var a = 1;",
            "fun inc() { a = a + 1; return a; }",
            "print inc(); print inc();",
        ]);
        assert!(results.iter().all(|r| r.is_ok()));
        assert_eq!(output, "2\n3\n");
    }

    #[test]
    fn test_locals_from_earlier_runs_still_resolve() {
        let (output, results) = run_session(&[
            "fun counter() { var n = 0; fun next() { n = n + 1; return n; } return next; }",
            "var c = counter();",
            "c(); print c();",
            "{ var x = 10; print x; }",
            "print c();",
        ]);
        assert!(results.iter().all(|r| r.is_ok()));
        assert_eq!(output, "2\n10\n3\n");
    }

    #[test]
    fn test_session_recovers_after_errors() {
        let (output, results) = run_session(&["print 1 +;", "return 1;", "print nope;", "print 4;"]);
        assert!(matches!(results[0], Err(LoxError::Parse(_))));
        assert!(matches!(results[1], Err(LoxError::Resolve(_))));
        assert!(matches!(results[2], Err(LoxError::Runtime(_))));
        assert!(results[3].is_ok());
        assert_eq!(output, "4\n");
    }

    #[test]
    fn test_exit_codes_and_rendering() {
        let source = "return 1;";
        let mut lox = Lox::new_with_output(Vec::new());
        let error = lox.run(source).unwrap_err();
        assert_eq!(error.exit_code(), 67);
        assert_eq!(
            error.render(source),
            vec!["[line 1] Error at 'return': Can't return from top-level code.".to_owned()]
        );

        let source = "print -nil;";
        let error = lox.run(source).unwrap_err();
        assert_eq!(error.exit_code(), 70);
        assert_eq!(
            error.render(source),
            vec!["[line 1] Operand must be a number.".to_owned()]
        );
    }

    #[test]
    fn test_warnings_are_returned() {
        let mut lox = Lox::new_with_output(Vec::new());
        let warnings = lox.run("{ var unused = 1; }").unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(
            warnings[0].to_string(),
            "[line 1] Warning: Local variable 'unused' is declared but never used."
        );
    }
}
