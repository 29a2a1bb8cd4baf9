use super::constants::{LAMBDA_STR, MAX_FUNC_ARGS};
use super::errors::{Item, ParserError, ParserErrorType, ParserResult};
use super::grammar::{ClassInfo, Expr, ExprId, ExprType, FuncInfo, Literal, Stmt, StmtType};
use super::grammar::{Identifier, PrefixOperator, TraitInfo, Tree};
use super::lexer::Lexer;
use super::parser_utils::{ParserOperator, Precedence};
use super::span::Span;
use super::token::{SpannedToken, Token};

use std::rc::Rc;

/// Methods and static methods of a class or trait body.
type Members = (Vec<Rc<FuncInfo>>, Vec<Rc<FuncInfo>>);

pub struct Parser<'s> {
    lexer: Lexer<'s>,
    current: SpannedToken,
    previous: SpannedToken,
    errors: Vec<ParserError>,
    next_expr_id: usize,
}

impl<'s> Parser<'s> {
    pub fn new(source: &'s str) -> Self {
        Self::with_first_expr_id(source, ExprId(0))
    }

    /// Creates a parser numbering expressions from `first_id`, so trees parsed
    /// one after another against the same interpreter never share ids.
    pub fn with_first_expr_id(source: &'s str, first_id: ExprId) -> Self {
        let dummy_token = SpannedToken {
            token: Token::LexerError("<parser token>".to_owned()),
            span: Span::default(),
        };

        Parser {
            lexer: Lexer::new(source),
            current: dummy_token.clone(),
            previous: dummy_token,
            errors: vec![],
            next_expr_id: first_id.0,
        }
    }

    /// Advances the stream. Lexer errors are recorded and skipped.
    fn bump(&mut self) {
        let next = loop {
            let token = self.lexer.next_token();
            match &token.token {
                Token::LexerError(e) => self.emit_error(ParserError {
                    span: token.span,
                    error: ParserErrorType::IllegalToken(e.clone()),
                }),
                _ => break token,
            }
        };

        self.previous = std::mem::replace(&mut self.current, next);
    }

    /// Checks whether or not the current token matches the given token.
    fn check(&self, t: Token) -> bool {
        self.current.token == t
    }

    /// Consumes the current token if it matches the given token.
    fn check_consume(&mut self, t: Token) -> bool {
        if self.check(t) {
            self.bump();
            return true;
        }
        false
    }

    /// Consumes a token the caller has already checked for.
    fn expect(&mut self, expected: Token) {
        debug_assert_eq!(self.current.token, expected);
        self.bump();
    }

    fn consume(&mut self, t: Token, error: ParserErrorType) -> ParserResult<()> {
        self.bump();

        if self.previous.token == t {
            Ok(())
        } else {
            Err(ParserError {
                span: self.previous.span,
                error,
            })
        }
    }

    /// Parses the whole program as a list of declarations.
    pub fn parse(mut self) -> Result<Tree, Vec<ParserError>> {
        self.bump();

        let mut stmts = vec![];

        while !self.check(Token::EndOfFile) {
            if let Some(stmt) = self.parse_declaration_with_recovery() {
                stmts.push(stmt);
            }
        }

        if self.errors.is_empty() {
            Ok(Tree {
                stmts,
                next_expr_id: ExprId(self.next_expr_id),
            })
        } else {
            Err(self.errors)
        }
    }

    fn synchronize(&mut self) {
        let mut sync_pt = self.previous.token == Token::Semicolon;

        while !sync_pt {
            if self.check(Token::EndOfFile) {
                return;
            }
            sync_pt = self.check(Token::Semicolon);
            self.bump();
        }
    }

    fn emit_error(&mut self, error: ParserError) {
        self.errors.push(error);
    }

    fn make_expr(&mut self, expr: ExprType, span: Span) -> Expr {
        let id = ExprId(self.next_expr_id);
        self.next_expr_id += 1;
        Expr::new(id, expr, span)
    }

    fn parse_declaration_with_recovery(&mut self) -> Option<Stmt> {
        match self.parse_declaration() {
            Ok(stmt) => Some(stmt),
            Err(err) => {
                self.emit_error(err);
                self.synchronize();
                None
            }
        }
    }

    fn parse_declaration(&mut self) -> ParserResult<Stmt> {
        let curr_span = self.current.span;

        let stmt_type = match self.current.token {
            Token::Var => self.parse_variable_decl()?,
            Token::Fun => {
                self.bump();
                let func_info = self.parse_func_info(false)?;

                StmtType::FuncDecl(Rc::new(func_info))
            }
            Token::Class => self.parse_class_decl()?,
            Token::Trait => self.parse_trait_decl()?,
            _ => return self.parse_statement(),
        };

        Ok(to_stmt(stmt_type, curr_span.extend(self.previous.span)))
    }

    /// Parses `name(params) { body }`, or `name { body }` when getters are allowed.
    fn parse_func_info(&mut self, allow_getter: bool) -> ParserResult<FuncInfo> {
        let curr_span = self.current.span;

        let name = self.parse_identifier(ParserErrorType::ExpectedIdentifier)?;
        let is_getter = allow_getter && self.check(Token::LeftBrace);
        let params = if is_getter {
            vec![]
        } else {
            self.parse_func_params()?
        };

        self.consume(
            Token::LeftBrace,
            ParserErrorType::ExpectedBefore("{", Item::FunctionBody),
        )?;
        let stmts = self.parse_block_stmts()?;
        let span = curr_span.extend(self.previous.span);

        Ok(FuncInfo::new(name, params, stmts, is_getter, span))
    }

    fn parse_class_decl(&mut self) -> ParserResult<StmtType> {
        self.expect(Token::Class);
        let name = self.parse_identifier(ParserErrorType::ExpectedIdentifier)?;

        let superclass = if self.check_consume(Token::LeftAngle) {
            let superclass_name = self.parse_identifier(ParserErrorType::ExpectedSuperclassName)?;
            let span = superclass_name.span;
            Some(self.make_expr(ExprType::Variable(superclass_name), span))
        } else {
            None
        };

        let mut traits = vec![];
        if self.check_consume(Token::Diamond) {
            loop {
                let trait_name = self.parse_identifier(ParserErrorType::ExpectedTraitName)?;
                let span = trait_name.span;
                traits.push(self.make_expr(ExprType::Variable(trait_name), span));

                if !self.check_consume(Token::Comma) {
                    break;
                }
            }
        }

        self.consume(
            Token::LeftBrace,
            ParserErrorType::ExpectedBefore("{", Item::ClassBody),
        )?;
        let (methods, static_methods) = self.parse_members()?;

        Ok(StmtType::ClassDecl(ClassInfo {
            ident: name,
            superclass,
            traits,
            methods,
            static_methods,
        }))
    }

    fn parse_trait_decl(&mut self) -> ParserResult<StmtType> {
        self.expect(Token::Trait);
        let name = self.parse_identifier(ParserErrorType::ExpectedIdentifier)?;

        self.consume(
            Token::LeftBrace,
            ParserErrorType::ExpectedBefore("{", Item::TraitBody),
        )?;
        let (methods, static_methods) = self.parse_members()?;

        Ok(StmtType::TraitDecl(TraitInfo {
            ident: name,
            methods,
            static_methods,
        }))
    }

    /// Parses class or trait members up to and including the closing brace.
    /// Members prefixed with `class` are static.
    fn parse_members(&mut self) -> ParserResult<Members> {
        let mut methods = vec![];
        let mut static_methods = vec![];

        while !self.check_consume(Token::RightBrace) {
            if self.check(Token::EndOfFile) {
                return Err(ParserError {
                    span: self.current.span,
                    error: ParserErrorType::UnclosedBrace,
                });
            }

            if self.check_consume(Token::Class) {
                static_methods.push(Rc::new(self.parse_func_info(true)?));
            } else {
                methods.push(Rc::new(self.parse_func_info(true)?));
            }
        }

        Ok((methods, static_methods))
    }

    fn parse_variable_decl(&mut self) -> ParserResult<StmtType> {
        self.expect(Token::Var);
        let name = self.parse_identifier(ParserErrorType::ExpectedIdentifier)?;
        let initializer = if self.check_consume(Token::Equals) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.consume(
            Token::Semicolon,
            ParserErrorType::ExpectedAfter(";", Item::VariableDecl),
        )?;

        Ok(StmtType::VariableDecl(name, initializer))
    }

    fn parse_statement(&mut self) -> ParserResult<Stmt> {
        let curr_span = self.current.span;
        let stmt_type = match self.current.token {
            Token::Print => {
                self.bump();
                let expr = self.parse_expression()?;
                self.consume(
                    Token::Semicolon,
                    ParserErrorType::ExpectedAfter(";", Item::PrintValue),
                )?;
                StmtType::Print(expr)
            }
            Token::If => self.parse_if_else()?,
            Token::While => self.parse_while()?,
            Token::For => self.parse_for()?,
            Token::Return => self.parse_return()?,
            Token::Break => {
                self.bump();
                self.consume(
                    Token::Semicolon,
                    ParserErrorType::ExpectedAfter(";", Item::LoopControl),
                )?;
                StmtType::Break
            }
            Token::Continue => {
                self.bump();
                self.consume(
                    Token::Semicolon,
                    ParserErrorType::ExpectedAfter(";", Item::LoopControl),
                )?;
                StmtType::Continue
            }
            Token::LeftBrace => {
                self.bump();
                let stmts = self.parse_block_stmts()?;
                StmtType::Block(stmts)
            }
            _ => self.parse_expression_statement()?,
        };

        Ok(to_stmt(stmt_type, curr_span.extend(self.previous.span)))
    }

    fn parse_expression_statement(&mut self) -> ParserResult<StmtType> {
        let expr = self.parse_expression()?;
        self.consume(
            Token::Semicolon,
            ParserErrorType::ExpectedAfter(";", Item::Expression),
        )?;
        Ok(StmtType::Expression(expr))
    }

    fn parse_if_else(&mut self) -> ParserResult<StmtType> {
        self.expect(Token::If);
        self.consume(
            Token::LeftParen,
            ParserErrorType::ExpectedAfter("(", Item::If),
        )?;
        let condition = self.parse_expression()?;
        self.consume(
            Token::RightParen,
            ParserErrorType::ExpectedAfter(")", Item::Condition),
        )?;

        let if_body = Box::new(self.parse_statement()?);
        let else_body = if self.check_consume(Token::Else) {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };

        Ok(StmtType::IfElse(condition, if_body, else_body))
    }

    fn parse_while(&mut self) -> ParserResult<StmtType> {
        self.expect(Token::While);
        self.consume(
            Token::LeftParen,
            ParserErrorType::ExpectedAfter("(", Item::While),
        )?;
        let condition = self.parse_expression()?;
        self.consume(
            Token::RightParen,
            ParserErrorType::ExpectedAfter(")", Item::Condition),
        )?;
        let body = self.parse_statement()?;

        Ok(StmtType::While(condition, Box::new(body)))
    }

    fn parse_for(&mut self) -> ParserResult<StmtType> {
        self.expect(Token::For);

        self.consume(
            Token::LeftParen,
            ParserErrorType::ExpectedAfter("(", Item::For),
        )?;

        // Initializer, condition and increment may each be empty.
        let init_stmt = if self.check_consume(Token::Semicolon) {
            None
        } else if self.check(Token::Var) {
            let curr_span = self.current.span;
            let stmt = to_stmt(
                self.parse_variable_decl()?,
                curr_span.extend(self.previous.span),
            );
            Some(Box::new(stmt))
        } else {
            let curr_span = self.current.span;
            let stmt = to_stmt(
                self.parse_expression_statement()?,
                curr_span.extend(self.previous.span),
            );
            Some(Box::new(stmt))
        };

        let condition = if self.check(Token::Semicolon) {
            None
        } else {
            Some(Box::new(self.parse_expression()?))
        };

        self.consume(
            Token::Semicolon,
            ParserErrorType::ExpectedAfter(";", Item::Condition),
        )?;

        let increment = if self.check(Token::RightParen) {
            None
        } else {
            Some(Box::new(self.parse_expression()?))
        };

        self.consume(
            Token::RightParen,
            ParserErrorType::ExpectedAfter(")", Item::ForClause),
        )?;

        let body = Box::new(self.parse_statement()?);
        Ok(StmtType::For(init_stmt, condition, increment, body))
    }

    fn parse_return(&mut self) -> ParserResult<StmtType> {
        self.expect(Token::Return);
        let expr = if !self.check(Token::Semicolon) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.consume(
            Token::Semicolon,
            ParserErrorType::ExpectedAfter(";", Item::ReturnValue),
        )?;
        Ok(StmtType::Return(expr))
    }

    fn parse_block_stmts(&mut self) -> ParserResult<Vec<Stmt>> {
        let mut stmts = vec![];

        while !self.check(Token::RightBrace) && !self.check(Token::EndOfFile) {
            if let Some(stmt) = self.parse_declaration_with_recovery() {
                stmts.push(stmt);
            }
        }

        if self.check(Token::EndOfFile) {
            return Err(ParserError {
                span: self.current.span,
                error: ParserErrorType::UnclosedBrace,
            });
        }

        self.expect(Token::RightBrace);
        Ok(stmts)
    }

    pub fn parse_expression(&mut self) -> ParserResult<Expr> {
        self.run_pratt_parse_algo(Precedence::Lowest)
    }

    /// Pratt parsing algo.
    pub fn run_pratt_parse_algo(&mut self, min_precedence: Precedence) -> ParserResult<Expr> {
        let prefix_op = match &self.current.token {
            Token::Bang => Some(PrefixOperator::LogicalNot),
            Token::Minus => Some(PrefixOperator::Negate),
            _ => None,
        };

        let mut lhs = match prefix_op {
            Some(op) => {
                let curr_span = self.current.span;
                self.bump();
                let expr = self.run_pratt_parse_algo(Precedence::Unary)?;
                self.make_expr(
                    ExprType::Prefix(op, Box::new(expr)),
                    curr_span.extend(self.previous.span),
                )
            }
            None => self.parse_primary()?,
        };

        while let Some(op) = ParserOperator::from_token(&self.current.token) {
            if !op.binds_tighter_than(min_precedence) {
                break;
            }

            let op_span = self.current.span;

            if op != ParserOperator::Call {
                self.bump();
            }

            let precedence = op.precedence();
            let lhs_span = lhs.span;

            let new_lhs = match op {
                ParserOperator::Infix(op) => {
                    let rhs = self.run_pratt_parse_algo(precedence)?;
                    ExprType::Infix(op, Box::new(lhs), Box::new(rhs))
                }
                ParserOperator::Logical(op) => {
                    let rhs = self.run_pratt_parse_algo(precedence)?;
                    ExprType::Logical(op, Box::new(lhs), Box::new(rhs))
                }
                ParserOperator::Ternary => {
                    let then_branch = self.parse_expression()?;
                    self.consume(
                        Token::Colon,
                        ParserErrorType::ExpectedAfter(":", Item::TernaryBranch),
                    )?;
                    let else_branch = self.run_pratt_parse_algo(precedence)?;
                    ExprType::Ternary(Box::new(lhs), Box::new(then_branch), Box::new(else_branch))
                }
                ParserOperator::Assignment => {
                    let rhs_box = Box::new(self.run_pratt_parse_algo(precedence)?);
                    match lhs.expr {
                        ExprType::Variable(var) => ExprType::Assignment(var, rhs_box),
                        ExprType::Get(expr, property) => ExprType::Set(expr, property, rhs_box),
                        ExprType::Index(array, index) => ExprType::IndexSet(array, index, rhs_box),
                        _ => {
                            return Err(ParserError {
                                span: op_span,
                                error: ParserErrorType::ExpectedLValue,
                            });
                        }
                    }
                }
                ParserOperator::Call => {
                    let arguments = self.parse_func_args()?;
                    ExprType::Call(Box::new(lhs), arguments)
                }
                ParserOperator::Index => {
                    let index = self.parse_expression()?;
                    self.consume(
                        Token::RightBracket,
                        ParserErrorType::ExpectedAfter("]", Item::Index),
                    )?;
                    ExprType::Index(Box::new(lhs), Box::new(index))
                }
                ParserOperator::Property => {
                    let rhs = self.parse_identifier(ParserErrorType::ExpectedPropertyName)?;
                    ExprType::Get(Box::new(lhs), rhs)
                }
            };

            lhs = self.make_expr(new_lhs, lhs_span.extend(self.previous.span));
        }

        Ok(lhs)
    }

    fn parse_primary(&mut self) -> ParserResult<Expr> {
        self.bump();
        let curr_span = self.previous.span;

        let expr = match &self.previous.token {
            Token::Number(n) => from_literal(Literal::Number(*n)),
            Token::True => from_literal(Literal::Boolean(true)),
            Token::False => from_literal(Literal::Boolean(false)),
            Token::String(s) => from_literal(Literal::Str(s.to_owned())),
            Token::Nil => from_literal(Literal::Nil),
            Token::Identifier(name) => {
                ExprType::Variable(Identifier::new(name.to_owned(), curr_span))
            }
            Token::This => ExprType::This,
            Token::Super => {
                self.consume(Token::Dot, ParserErrorType::ExpectedSuperDot)?;
                let method_name = self.parse_identifier(ParserErrorType::ExpectedSuperMethod)?;
                ExprType::Super(method_name)
            }
            Token::LeftParen => {
                let sub_expr = self.parse_expression()?;
                self.consume(
                    Token::RightParen,
                    ParserErrorType::ExpectedAfter(")", Item::Expression),
                )?;
                ExprType::Grouping(Box::new(sub_expr))
            }
            Token::LeftBracket => {
                let elements = self.parse_comma_sep(Token::RightBracket, Self::parse_expression)?;
                ExprType::Array(elements)
            }
            Token::Fun => {
                let params = self.parse_func_params()?;
                self.consume(
                    Token::LeftBrace,
                    ParserErrorType::ExpectedBefore("{", Item::FunctionBody),
                )?;
                let body = self.parse_block_stmts()?;
                let span = curr_span.extend(self.previous.span);
                let ident = Identifier::new(LAMBDA_STR.to_owned(), curr_span);
                ExprType::Lambda(Rc::new(FuncInfo::new(ident, params, body, false, span)))
            }
            t => {
                return Err(ParserError {
                    span: curr_span,
                    error: ParserErrorType::ExpectedExpr(t.clone()),
                })
            }
        };

        let span = curr_span.extend(self.previous.span);
        Ok(self.make_expr(expr, span))
    }

    fn parse_identifier(&mut self, error: ParserErrorType) -> ParserResult<Identifier> {
        self.bump();
        match &self.previous.token {
            Token::Identifier(name) => Ok(Identifier::new(name.to_owned(), self.previous.span)),
            _ => Err(ParserError {
                span: self.previous.span,
                error,
            }),
        }
    }

    /// Parses comma separated items up to and including `close`.
    fn parse_comma_sep<T, F>(&mut self, close: Token, parser: F) -> ParserResult<Vec<T>>
    where
        F: Fn(&mut Parser<'s>) -> ParserResult<T>,
    {
        let mut args = vec![];
        if self.check_consume(close.clone()) {
            return Ok(args);
        }

        args.push(parser(self)?);

        while !self.check_consume(close.clone()) {
            self.consume(Token::Comma, ParserErrorType::ExpectedCommaBetween)?;
            args.push(parser(self)?);
        }

        Ok(args)
    }

    fn parse_func_args(&mut self) -> ParserResult<Vec<Expr>> {
        self.expect(Token::LeftParen);
        let args = self.parse_comma_sep(Token::RightParen, Self::parse_expression)?;

        if let Some(extra_args) = args.get(MAX_FUNC_ARGS..) {
            for arg in extra_args.iter() {
                self.emit_error(ParserError {
                    span: arg.span,
                    error: ParserErrorType::TooManyArgs,
                });
            }
        }

        Ok(args)
    }

    fn parse_func_params(&mut self) -> ParserResult<Vec<Identifier>> {
        self.consume(
            Token::LeftParen,
            ParserErrorType::ExpectedAfter("(", Item::FunctionName),
        )?;

        let params = self.parse_comma_sep(Token::RightParen, |this| {
            this.parse_identifier(ParserErrorType::ExpectedIdentifier)
        })?;
        if let Some(extra_params) = params.get(MAX_FUNC_ARGS..) {
            for ident in extra_params.iter() {
                self.emit_error(ParserError {
                    span: ident.span,
                    error: ParserErrorType::TooManyParams,
                });
            }
        }

        Ok(params)
    }
}

fn from_literal(l: Literal) -> ExprType {
    ExprType::Literal(l)
}

fn to_stmt(stmt: StmtType, span: Span) -> Stmt {
    Stmt::new(stmt, span)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_expr_string(source: &str) -> String {
        let mut parser = Parser::new(source);
        parser.bump();
        parser.parse_expression().unwrap().ast_string()
    }

    fn parse_ok(source: &str) -> Tree {
        Parser::new(source).parse().unwrap()
    }

    #[test]
    fn test_parse_precedence() {
        assert_eq!(parse_expr_string("1 + 2 * 3"), "(+ 1 (* 2 3))");
        assert_eq!(parse_expr_string("(1 + 2) * 3"), "(* (group (+ 1 2)) 3)");
        assert_eq!(parse_expr_string("10 % 4 - 1"), "(- (% 10 4) 1)");
        assert_eq!(parse_expr_string("-a.b"), "(- (get a b))");
        assert_eq!(
            parse_expr_string("a or b and c"),
            "(or a (and b c))"
        );
    }

    #[test]
    fn test_parse_ternary_nests_right() {
        assert_eq!(
            parse_expr_string("a ? 1 : b ? 2 : 3"),
            "(? a 1 (? b 2 3))"
        );
        assert_eq!(parse_expr_string("x = a ? 1 : 2"), "(set x (? a 1 2))");
    }

    #[test]
    fn test_parse_arrays_and_assignment_targets() {
        assert_eq!(parse_expr_string("[1, 2, [3]]"), "[1 2 [3]]");
        assert_eq!(parse_expr_string("a[1][2]"), "(index (index a 1) 2)");
        assert_eq!(
            parse_expr_string("a[i] = b.c = 3"),
            "(index-set a i (set b c 3))"
        );
        assert_eq!(parse_expr_string("f(1)(2)"), "(call (call f 1) 2)");
    }

    #[test]
    fn test_parse_lambda() {
        assert_eq!(parse_expr_string("fun (a, b) { return a; }"), "(fun (a b))");
    }

    #[test]
    fn test_parse_class_members() {
        let tree = parse_ok(
            "class Circle < Shape <> Round, Named {
                init(r) { this.r = r; }
                area { return this.r; }
                class unit() { return Circle(1); }
                class pi { return 3; }
            }",
        );

        let class = match &tree.stmts[0].stmt {
            StmtType::ClassDecl(class) => class,
            other => panic!("expected class, got {:?}", other),
        };

        assert_eq!(class.ident.name, "Circle");
        assert!(class.superclass.is_some());
        assert_eq!(class.traits.len(), 2);
        assert_eq!(class.methods.len(), 2);
        assert!(!class.methods[0].is_getter);
        assert!(class.methods[1].is_getter);
        assert_eq!(class.static_methods.len(), 2);
        assert!(!class.static_methods[0].is_getter);
        assert!(class.static_methods[1].is_getter);
    }

    #[test]
    fn test_parse_loop_control() {
        let tree = parse_ok("while (true) { break; continue; }");
        match &tree.stmts[0].stmt {
            StmtType::While(_, body) => match &body.stmt {
                StmtType::Block(stmts) => {
                    assert_eq!(stmts[0].stmt, StmtType::Break);
                    assert_eq!(stmts[1].stmt, StmtType::Continue);
                }
                other => panic!("expected block, got {:?}", other),
            },
            other => panic!("expected while, got {:?}", other),
        }
    }

    #[test]
    fn test_expr_ids_are_unique_and_offset() {
        let tree = Parser::with_first_expr_id("a + b;", ExprId(10))
            .parse()
            .unwrap();
        assert_eq!(tree.next_expr_id, ExprId(13));

        match &tree.stmts[0].stmt {
            StmtType::Expression(expr) => {
                assert_eq!(expr.id, ExprId(12));
                match &expr.expr {
                    ExprType::Infix(_, lhs, rhs) => {
                        assert_eq!(lhs.id, ExprId(10));
                        assert_eq!(rhs.id, ExprId(11));
                    }
                    other => panic!("expected infix, got {:?}", other),
                }
            }
            other => panic!("expected expression, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_collects_multiple_errors() {
        let source = "var = 1;\nprint (1;\n1 = 2;";
        let errors = Parser::new(source).parse().unwrap_err();

        assert_eq!(errors.len(), 3);
        assert_eq!(
            errors[0].render(source),
            "[line 1] Error at '=': Expected identifier."
        );
        assert_eq!(
            errors[1].render(source),
            "[line 2] Error at ';': Expected ')' after expression."
        );
        assert_eq!(
            errors[2].render(source),
            "[line 3] Error at '=': Invalid assignment target."
        );
    }

    #[test]
    fn test_lexer_errors_are_reported() {
        let source = "print 1 @ 2;";
        let errors = Parser::new(source).parse().unwrap_err();

        assert_eq!(
            errors[0].render(source),
            "[line 1] Error: Unexpected character '@'."
        );
    }

    #[test]
    fn test_unclosed_block() {
        let source = "{ print 1;";
        let errors = Parser::new(source).parse().unwrap_err();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].error, ParserErrorType::UnclosedBrace);
    }
}
