use super::span::Span;

use std::fmt;
use std::rc::Rc;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum LogicalOperator {
    And,
    Or,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PrefixOperator {
    Negate,
    LogicalNot,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum InfixOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    EqualTo,
    NotEqualTo,
    GreaterThan,
    GreaterEq,
    LessThan,
    LessEq,
}

/// Identity of an expression node, handed out by the parser. The resolver
/// keys its scope distances on it.
#[derive(Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Copy)]
pub struct ExprId(pub usize);

#[derive(Debug)]
pub struct Tree {
    pub stmts: Vec<Stmt>,
    /// First id not used by any node of this tree.
    pub next_expr_id: ExprId,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Stmt {
    pub stmt: StmtType,
    pub span: Span,
}

#[derive(Debug, PartialEq, Clone)]
pub enum StmtType {
    Expression(Expr),
    Print(Expr),
    VariableDecl(Identifier, Option<Expr>),
    Block(Vec<Stmt>),
    IfElse(Expr, Box<Stmt>, Option<Box<Stmt>>),
    While(Expr, Box<Stmt>),
    For(
        Option<Box<Stmt>>,
        Option<Box<Expr>>,
        Option<Box<Expr>>,
        Box<Stmt>,
    ),
    Break,
    Continue,
    FuncDecl(Rc<FuncInfo>),
    Return(Option<Expr>),
    ClassDecl(ClassInfo),
    TraitDecl(TraitInfo),
}

#[derive(Debug, PartialEq, Clone)]
pub struct Expr {
    pub id: ExprId,
    pub expr: ExprType,
    pub span: Span,
}

#[derive(Debug, PartialEq, Clone)]
pub enum ExprType {
    Literal(Literal),
    Grouping(Box<Expr>),
    Infix(InfixOperator, Box<Expr>, Box<Expr>),
    Prefix(PrefixOperator, Box<Expr>),
    Logical(LogicalOperator, Box<Expr>, Box<Expr>),
    Ternary(Box<Expr>, Box<Expr>, Box<Expr>),
    Variable(Identifier),
    Assignment(Identifier, Box<Expr>),
    Call(Box<Expr>, Vec<Expr>),
    Get(Box<Expr>, Identifier),
    Set(Box<Expr>, Identifier, Box<Expr>),
    Array(Vec<Expr>),
    Index(Box<Expr>, Box<Expr>),
    IndexSet(Box<Expr>, Box<Expr>, Box<Expr>),
    Lambda(Rc<FuncInfo>),
    This,
    Super(Identifier),
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

#[derive(Debug, PartialEq, Clone)]
pub struct FuncInfo {
    pub ident: Identifier,
    pub params: Vec<Identifier>,
    pub body: Vec<Stmt>,
    /// Declared without a parameter list, e.g. `area { ... }` in a class.
    pub is_getter: bool,
    pub span: Span,
}

#[derive(Debug, PartialEq, Clone)]
pub struct ClassInfo {
    pub ident: Identifier,
    pub superclass: Option<Expr>,
    pub traits: Vec<Expr>,
    pub methods: Vec<Rc<FuncInfo>>,
    pub static_methods: Vec<Rc<FuncInfo>>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct TraitInfo {
    pub ident: Identifier,
    pub methods: Vec<Rc<FuncInfo>>,
    pub static_methods: Vec<Rc<FuncInfo>>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Literal {
    Number(f64),
    Boolean(bool),
    Str(String),
    Nil,
}

impl LogicalOperator {
    pub fn symbol(&self) -> &str {
        match self {
            LogicalOperator::And => "and",
            LogicalOperator::Or => "or",
        }
    }
}

impl PrefixOperator {
    pub fn symbol(&self) -> &str {
        match self {
            PrefixOperator::LogicalNot => "!",
            PrefixOperator::Negate => "-",
        }
    }
}

impl InfixOperator {
    pub fn symbol(&self) -> &str {
        match self {
            InfixOperator::Add => "+",
            InfixOperator::Subtract => "-",
            InfixOperator::Multiply => "*",
            InfixOperator::Divide => "/",
            InfixOperator::Modulo => "%",
            InfixOperator::EqualTo => "==",
            InfixOperator::NotEqualTo => "!=",
            InfixOperator::GreaterThan => ">",
            InfixOperator::GreaterEq => ">=",
            InfixOperator::LessThan => "<",
            InfixOperator::LessEq => "<=",
        }
    }
}

impl fmt::Display for InfixOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for PrefixOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl Identifier {
    pub fn new(name: String, span: Span) -> Self {
        Self { name, span }
    }
}

impl Stmt {
    pub fn new(stmt: StmtType, span: Span) -> Self {
        Stmt { stmt, span }
    }
}

impl FuncInfo {
    pub fn new(
        ident: Identifier,
        params: Vec<Identifier>,
        body: Vec<Stmt>,
        is_getter: bool,
        span: Span,
    ) -> Self {
        FuncInfo {
            ident,
            params,
            body,
            is_getter,
            span,
        }
    }

    pub fn name(&self) -> &str {
        &self.ident.name
    }

    /// True when the body has a `return` among its top-level statements.
    pub fn has_top_level_return(&self) -> bool {
        self.body
            .iter()
            .any(|stmt| matches!(stmt.stmt, StmtType::Return(_)))
    }
}

impl Expr {
    pub fn new(id: ExprId, expr: ExprType, span: Span) -> Self {
        Expr { id, expr, span }
    }

    /// Lisp-like rendering of the expression, used to check parse structure.
    pub fn ast_string(&self) -> String {
        match &self.expr {
            ExprType::Literal(l) => match l {
                Literal::Number(n) => n.to_string(),
                Literal::Boolean(b) => b.to_string(),
                Literal::Str(s) => format!("\"{}\"", s),
                Literal::Nil => "nil".to_owned(),
            },
            ExprType::Grouping(expr) => format!("(group {})", expr.ast_string()),
            ExprType::Infix(op, lhs, rhs) => format!(
                "({} {} {})",
                op.symbol(),
                lhs.ast_string(),
                rhs.ast_string()
            ),
            ExprType::Prefix(op, expr) => format!("({} {})", op.symbol(), expr.ast_string()),
            ExprType::Logical(op, lhs, rhs) => format!(
                "({} {} {})",
                op.symbol(),
                lhs.ast_string(),
                rhs.ast_string()
            ),
            ExprType::Ternary(cond, then_expr, else_expr) => format!(
                "(? {} {} {})",
                cond.ast_string(),
                then_expr.ast_string(),
                else_expr.ast_string()
            ),
            ExprType::Variable(var) => var.name.clone(),
            ExprType::Assignment(var, expr) => format!("(set {} {})", var.name, expr.ast_string()),
            ExprType::Call(callee, args) => {
                let exprs: Vec<_> = args.iter().map(|a| a.ast_string()).collect();
                format!("(call {} {})", callee.ast_string(), exprs.join(" "))
            }
            ExprType::Get(expr, property) => {
                format!("(get {} {})", expr.ast_string(), property.name)
            }
            ExprType::Set(expr_lhs, property, expr_rhs) => format!(
                "(set {} {} {})",
                expr_lhs.ast_string(),
                property.name,
                expr_rhs.ast_string()
            ),
            ExprType::Array(elements) => {
                let exprs: Vec<_> = elements.iter().map(|e| e.ast_string()).collect();
                format!("[{}]", exprs.join(" "))
            }
            ExprType::Index(array, index) => {
                format!("(index {} {})", array.ast_string(), index.ast_string())
            }
            ExprType::IndexSet(array, index, value) => format!(
                "(index-set {} {} {})",
                array.ast_string(),
                index.ast_string(),
                value.ast_string()
            ),
            ExprType::Lambda(func_info) => {
                let params: Vec<_> = func_info.params.iter().map(|p| p.name.as_str()).collect();
                format!("(fun ({}))", params.join(" "))
            }
            ExprType::This => String::from("this"),
            ExprType::Super(method) => format!("(super {})", method.name),
        }
    }
}
