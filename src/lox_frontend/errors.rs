use super::constants::MAX_FUNC_ARGS;
use super::span::Span;
use super::token::Token;

use std::fmt;
use thiserror::Error;

/// Syntactic construct named in "expected X after/before Y" errors.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Item {
    Expression,
    VariableDecl,
    PrintValue,
    ReturnValue,
    LoopControl,
    If,
    While,
    For,
    ForClause,
    Condition,
    FunctionName,
    FunctionBody,
    ClassBody,
    TraitBody,
    ArrayElements,
    Index,
    TernaryBranch,
}

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ParserErrorType {
    #[error("{0}")]
    IllegalToken(String),
    #[error("Expected an expression.")]
    ExpectedExpr(Token),
    #[error("Expected identifier.")]
    ExpectedIdentifier,
    #[error("Expected superclass name.")]
    ExpectedSuperclassName,
    #[error("Expected trait name.")]
    ExpectedTraitName,
    #[error("Expected property name after '.'.")]
    ExpectedPropertyName,
    #[error("Expected '.' after 'super'.")]
    ExpectedSuperDot,
    #[error("Expected superclass method name.")]
    ExpectedSuperMethod,
    #[error("Expected ',' between arguments.")]
    ExpectedCommaBetween,
    #[error("Expected '{0}' after {1}.")]
    ExpectedAfter(&'static str, Item),
    #[error("Expected '{0}' before {1}.")]
    ExpectedBefore(&'static str, Item),
    #[error("Invalid assignment target.")]
    ExpectedLValue,
    #[error("Expected '}}' to close the block.")]
    UnclosedBrace,
    #[error("Can't have more than {} arguments.", MAX_FUNC_ARGS)]
    TooManyArgs,
    #[error("Can't have more than {} parameters.", MAX_FUNC_ARGS)]
    TooManyParams,
}

#[derive(Debug, Error, PartialEq, Clone)]
#[error("[line {}] Error: {error}", .span.line())]
pub struct ParserError {
    pub span: Span,
    pub error: ParserErrorType,
}

pub type ParserResult<T> = Result<T, ParserError>;

impl ParserError {
    /// Renders the error pointing at the offending lexeme in `source`.
    pub fn render(&self, source: &str) -> String {
        let line = self.span.line();
        if let ParserErrorType::IllegalToken(_) = self.error {
            return format!("[line {}] Error: {}", line, self.error);
        }

        match self.span.extract_string(source) {
            Some(lexeme) if !self.span.is_empty() => {
                format!("[line {}] Error at '{}': {}", line, lexeme, self.error)
            }
            _ => format!("[line {}] Error at end: {}", line, self.error),
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let description = match self {
            Item::Expression => "expression",
            Item::VariableDecl => "variable declaration",
            Item::PrintValue => "value",
            Item::ReturnValue => "return value",
            Item::LoopControl => "loop control statement",
            Item::If => "'if'",
            Item::While => "'while'",
            Item::For => "'for'",
            Item::ForClause => "for clauses",
            Item::Condition => "condition",
            Item::FunctionName => "function name",
            Item::FunctionBody => "function body",
            Item::ClassBody => "class body",
            Item::TraitBody => "trait body",
            Item::ArrayElements => "array elements",
            Item::Index => "index",
            Item::TernaryBranch => "then branch of ternary expression",
        };
        f.write_str(description)
    }
}
