pub mod constants;
pub mod cursor;
pub mod errors;
pub mod grammar;
pub mod lexer;
pub mod parser;
pub mod parser_utils;
pub mod span;
pub mod token;

pub use errors::ParserError;
pub use lexer::Lexer;
pub use parser::Parser;
