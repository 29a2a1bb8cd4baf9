use super::span::Span;

#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    // Single-character tokens.
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Plus,
    Minus,
    Asterisk,
    Slash,
    Percent,
    Dot,
    Comma,
    Semicolon,
    Question,
    Colon,

    // One or two character tokens.
    Bang,
    BangEq,
    Equals,
    DoubleEq,
    LeftAngle,
    LeftAngleEq,
    RightAngle,
    RightAngleEq,
    Diamond,

    // Literals.
    Identifier(String),
    String(String),
    Number(f64),

    // Keywords.
    And,
    Break,
    Class,
    Continue,
    Else,
    False,
    Fun,
    For,
    If,
    Nil,
    Or,
    Print,
    Return,
    Super,
    This,
    Trait,
    True,
    Var,
    While,

    LexerError(String),
    EndOfFile,
}

#[derive(Debug, PartialEq, Clone)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

impl Token {
    /// Maps an identifier-shaped lexeme onto its keyword, if it is one.
    pub fn keyword(lexeme: &str) -> Option<Token> {
        let token = match lexeme {
            "and" => Token::And,
            "break" => Token::Break,
            "class" => Token::Class,
            "continue" => Token::Continue,
            "else" => Token::Else,
            "false" => Token::False,
            "fun" => Token::Fun,
            "for" => Token::For,
            "if" => Token::If,
            "nil" => Token::Nil,
            "or" => Token::Or,
            "print" => Token::Print,
            "return" => Token::Return,
            "super" => Token::Super,
            "this" => Token::This,
            "trait" => Token::Trait,
            "true" => Token::True,
            "var" => Token::Var,
            "while" => Token::While,
            _ => return None,
        };
        Some(token)
    }
}
