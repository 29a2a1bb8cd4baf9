use super::grammar::{InfixOperator, LogicalOperator};
use super::token::Token;

/// Operators that continue an expression once its left operand is parsed.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ParserOperator {
    Infix(InfixOperator),
    Logical(LogicalOperator),
    Assignment,
    Ternary,
    Call,
    Index,
    Property,
}

/// Binding power, weakest first.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub enum Precedence {
    Lowest,
    Assignment,
    Ternary,
    LogicalOr,
    LogicalAnd,
    Equality,
    Comparison,
    Addition,
    Multiplication,
    Unary,
    Property,
    Call,
}

impl Precedence {
    fn is_right_associative(self) -> bool {
        matches!(self, Precedence::Assignment | Precedence::Ternary)
    }
}

impl ParserOperator {
    pub fn from_token(token: &Token) -> Option<ParserOperator> {
        let op = match token {
            Token::Plus => ParserOperator::Infix(InfixOperator::Add),
            Token::Minus => ParserOperator::Infix(InfixOperator::Subtract),
            Token::Asterisk => ParserOperator::Infix(InfixOperator::Multiply),
            Token::Slash => ParserOperator::Infix(InfixOperator::Divide),
            Token::Percent => ParserOperator::Infix(InfixOperator::Modulo),
            Token::DoubleEq => ParserOperator::Infix(InfixOperator::EqualTo),
            Token::BangEq => ParserOperator::Infix(InfixOperator::NotEqualTo),
            Token::RightAngle => ParserOperator::Infix(InfixOperator::GreaterThan),
            Token::RightAngleEq => ParserOperator::Infix(InfixOperator::GreaterEq),
            Token::LeftAngle => ParserOperator::Infix(InfixOperator::LessThan),
            Token::LeftAngleEq => ParserOperator::Infix(InfixOperator::LessEq),
            Token::And => ParserOperator::Logical(LogicalOperator::And),
            Token::Or => ParserOperator::Logical(LogicalOperator::Or),
            Token::Equals => ParserOperator::Assignment,
            Token::Question => ParserOperator::Ternary,
            Token::LeftParen => ParserOperator::Call,
            Token::LeftBracket => ParserOperator::Index,
            Token::Dot => ParserOperator::Property,
            _ => return None,
        };
        Some(op)
    }

    pub fn precedence(&self) -> Precedence {
        match self {
            ParserOperator::Infix(op) => match op {
                InfixOperator::Add | InfixOperator::Subtract => Precedence::Addition,
                InfixOperator::Multiply | InfixOperator::Divide | InfixOperator::Modulo => {
                    Precedence::Multiplication
                }
                InfixOperator::EqualTo | InfixOperator::NotEqualTo => Precedence::Equality,
                InfixOperator::GreaterEq
                | InfixOperator::LessEq
                | InfixOperator::GreaterThan
                | InfixOperator::LessThan => Precedence::Comparison,
            },
            ParserOperator::Logical(LogicalOperator::And) => Precedence::LogicalAnd,
            ParserOperator::Logical(LogicalOperator::Or) => Precedence::LogicalOr,
            ParserOperator::Assignment => Precedence::Assignment,
            ParserOperator::Ternary => Precedence::Ternary,
            ParserOperator::Call | ParserOperator::Index => Precedence::Call,
            ParserOperator::Property => Precedence::Property,
        }
    }

    /// Whether this operator may extend an operand being parsed at
    /// `min_precedence`.
    pub fn binds_tighter_than(&self, min_precedence: Precedence) -> bool {
        let precedence = self.precedence();
        precedence > min_precedence
            || (precedence == min_precedence && precedence.is_right_associative())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::more_asserts::*;

    #[test]
    fn test_precedence_order() {
        assert_lt!(Precedence::Lowest, Precedence::Assignment);
        assert_lt!(Precedence::Assignment, Precedence::Ternary);
        assert_lt!(Precedence::Ternary, Precedence::LogicalOr);
        assert_gt!(Precedence::Multiplication, Precedence::Addition);
        assert_gt!(Precedence::Comparison, Precedence::Equality);
        assert_gt!(Precedence::Call, Precedence::Property);
    }

    #[test]
    fn test_operators_from_tokens() {
        assert_eq!(
            ParserOperator::from_token(&Token::Percent),
            Some(ParserOperator::Infix(InfixOperator::Modulo))
        );
        assert_eq!(
            ParserOperator::from_token(&Token::Or),
            Some(ParserOperator::Logical(LogicalOperator::Or))
        );
        assert_eq!(
            ParserOperator::from_token(&Token::LeftBracket),
            Some(ParserOperator::Index)
        );
        assert_eq!(ParserOperator::from_token(&Token::Bang), None);
        assert_eq!(ParserOperator::from_token(&Token::Semicolon), None);
    }

    #[test]
    fn test_associativity() {
        assert!(ParserOperator::Ternary.binds_tighter_than(Precedence::Ternary));
        assert!(ParserOperator::Assignment.binds_tighter_than(Precedence::Assignment));
        assert!(!ParserOperator::Infix(InfixOperator::Add).binds_tighter_than(Precedence::Addition));
        assert!(!ParserOperator::Assignment.binds_tighter_than(Precedence::Ternary));
    }
}
