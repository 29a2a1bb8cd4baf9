use super::cursor::Cursor;
use super::span::Span;
use super::token::{SpannedToken, Token};

pub struct Lexer<'src> {
    source: &'src str,
    cursor: Cursor<'src>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Lexer {
            source,
            cursor: Cursor::new(source),
        }
    }

    /// Returns the next token. Lexical errors come back as `Token::LexerError`
    /// and lexing resumes right after the offending input.
    pub fn next_token(&mut self) -> SpannedToken {
        loop {
            self.cursor.take_while(|ch| ch.is_whitespace());

            let start_pos = self.cursor.get_position();
            let token = self.lex_token();
            let end_pos = self.cursor.get_position();

            if let Some(token) = token {
                return SpannedToken {
                    token,
                    span: Span::new(start_pos, end_pos),
                };
            }
        }
    }

    fn lex_token(&mut self) -> Option<Token> {
        let (byte_idx, ch) = match self.cursor.take() {
            Some(t) => t,
            None => return Some(Token::EndOfFile),
        };

        let token = match ch {
            // Single-character tokens.
            '(' => Token::LeftParen,
            ')' => Token::RightParen,
            '{' => Token::LeftBrace,
            '}' => Token::RightBrace,
            '[' => Token::LeftBracket,
            ']' => Token::RightBracket,
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Asterisk,
            '%' => Token::Percent,
            '.' => Token::Dot,
            ',' => Token::Comma,
            ';' => Token::Semicolon,
            '?' => Token::Question,
            ':' => Token::Colon,

            // Slash can start a comment or be a division.
            '/' => {
                if self.cursor.take_if('/') {
                    self.cursor.take_until(|ch| ch == '\n');
                    return None;
                } else if self.cursor.take_if('*') {
                    return self.lex_block_comment();
                } else {
                    Token::Slash
                }
            }

            // Potentially two character tokens.
            '=' => self.look_for_eq_sign(Token::Equals, Token::DoubleEq),
            '>' => self.look_for_eq_sign(Token::RightAngle, Token::RightAngleEq),
            '!' => self.look_for_eq_sign(Token::Bang, Token::BangEq),
            '<' => {
                if self.cursor.take_if('>') {
                    Token::Diamond
                } else {
                    self.look_for_eq_sign(Token::LeftAngle, Token::LeftAngleEq)
                }
            }

            '"' => self.lex_string(byte_idx),

            _ if is_digit_char(ch) => self.lex_number(byte_idx),

            _ if is_identifier_start(ch) => self.lex_identifier_or_kw(byte_idx),

            _ => Token::LexerError(format!("Unexpected character '{}'.", ch)),
        };

        Some(token)
    }

    /// Skips a `/* ... */` comment. Comments nest.
    fn lex_block_comment(&mut self) -> Option<Token> {
        let mut depth = 1;

        while depth > 0 {
            if self.cursor.take_if_pair('/', '*') {
                depth += 1;
            } else if self.cursor.take_if_pair('*', '/') {
                depth -= 1;
            } else if self.cursor.take().is_none() {
                return Some(Token::LexerError(
                    "Unterminated block comment.".to_owned(),
                ));
            }
        }

        None
    }

    fn look_for_eq_sign(&mut self, t1: Token, t2: Token) -> Token {
        if self.cursor.take_if('=') {
            t2
        } else {
            t1
        }
    }

    /// `start_idx` points at the opening quote.
    fn lex_string(&mut self, start_idx: usize) -> Token {
        let start_idx = start_idx + 1;

        self.cursor.take_until(|ch| ch == '"');

        match self.cursor.peek() {
            Some((end_idx, '"')) => {
                self.cursor.take();
                Token::String(self.source[start_idx..end_idx].to_owned())
            }
            _ => Token::LexerError("Unterminated string.".to_owned()),
        }
    }

    fn lex_number(&mut self, start_idx: usize) -> Token {
        self.cursor.take_while(is_digit_char);

        // A trailing dot without digits belongs to a property access.
        if let Some((_, '.')) = self.cursor.peek() {
            if self
                .cursor
                .peek_next()
                .map_or(false, |(_, ch)| is_digit_char(ch))
            {
                self.cursor.take();
                self.cursor.take_while(is_digit_char);
            }
        }

        let end_idx = self.cursor.offset();
        let scanned_number = &self.source[start_idx..end_idx];
        match scanned_number.parse() {
            Ok(value) => Token::Number(value),
            Err(_) => Token::LexerError(format!("Unparsable number '{}'.", scanned_number)),
        }
    }

    fn lex_identifier_or_kw(&mut self, start_idx: usize) -> Token {
        self.cursor.take_while(is_identifier_char);

        let end_idx = self.cursor.offset();
        let lexeme = &self.source[start_idx..end_idx];
        Token::keyword(lexeme).unwrap_or_else(|| Token::Identifier(lexeme.to_owned()))
    }

    pub fn iter(self) -> LexerIterator<'src> {
        LexerIterator { lexer: self }
    }
}

pub struct LexerIterator<'src> {
    lexer: Lexer<'src>,
}

impl<'src> Iterator for LexerIterator<'src> {
    type Item = SpannedToken;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.lexer.next_token();

        if token.token == Token::EndOfFile {
            return None;
        }

        Some(token)
    }
}

fn is_digit_char(ch: char) -> bool {
    ch.is_ascii_digit()
}

fn is_identifier_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_identifier_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Vec<Token> {
        Lexer::new(source).iter().map(|t| t.token).collect()
    }

    #[test]
    fn test_lex_class_header() {
        assert_eq!(
            lex("class A < B <> T, U {}"),
            vec![
                Token::Class,
                Token::Identifier("A".to_owned()),
                Token::LeftAngle,
                Token::Identifier("B".to_owned()),
                Token::Diamond,
                Token::Identifier("T".to_owned()),
                Token::Comma,
                Token::Identifier("U".to_owned()),
                Token::LeftBrace,
                Token::RightBrace,
            ]
        );
    }

    #[test]
    fn test_lex_operators_and_literals() {
        assert_eq!(
            lex("a[1] = 10 % 3.5 <= \"s\" ? nil : !x;"),
            vec![
                Token::Identifier("a".to_owned()),
                Token::LeftBracket,
                Token::Number(1.0),
                Token::RightBracket,
                Token::Equals,
                Token::Number(10.0),
                Token::Percent,
                Token::Number(3.5),
                Token::LeftAngleEq,
                Token::String("s".to_owned()),
                Token::Question,
                Token::Nil,
                Token::Colon,
                Token::Bang,
                Token::Identifier("x".to_owned()),
                Token::Semicolon,
            ]
        );
    }

    #[test]
    fn test_lex_skips_comments() {
        let source = "1 // line\n/* outer /* inner */ still */ 2";
        assert_eq!(lex(source), vec![Token::Number(1.0), Token::Number(2.0)]);
    }

    #[test]
    fn test_lex_errors_do_not_stop_lexing() {
        let tokens = lex("1 @ 2 \"open");
        assert_eq!(tokens.len(), 4);
        assert!(matches!(tokens[1], Token::LexerError(_)));
        assert_eq!(tokens[2], Token::Number(2.0));
        assert_eq!(
            tokens[3],
            Token::LexerError("Unterminated string.".to_owned())
        );
    }

    #[test]
    fn test_lex_spans() {
        let mut lexer = Lexer::new("var\n  answer");
        lexer.next_token();
        let ident = lexer.next_token();

        assert_eq!(ident.span.start_pos.line_no, 2);
        assert_eq!(ident.span.start_pos.column_no, 3);
        assert_eq!(ident.span.extract_string("var\n  answer"), Some("answer"));
    }
}
