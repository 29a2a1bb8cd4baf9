use crate::lox_frontend::constants::{INIT_STR, SUPER_STR, THIS_STR};
use crate::lox_frontend::grammar::{
    ClassInfo, Expr, ExprId, ExprType, FuncInfo, Identifier, Stmt, StmtType, TraitInfo,
};
use crate::lox_frontend::span::Span;

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

type Scope = HashMap<String, VariableInfo>;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum VariableState {
    Declared,
    Defined,
    Read,
}

#[derive(Debug, Clone, Copy)]
struct VariableInfo {
    state: VariableState,
    span: Span,
    /// Parameters and the implicit `this`/`super` never warn.
    warn_if_unused: bool,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum FuncContext {
    None,
    Function,
    Method,
    StaticMethod,
    Initializer,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum ClassContext {
    None,
    Class,
    Subclass,
    Trait,
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ResolverErrorType {
    #[error("Redeclared '{0}' variable in this scope.")]
    Redeclared(String),
    #[error("Can't read local variable '{0}' in its own initializer.")]
    ReadInOwnInitializer(String),
    #[error("Can't return from top-level code.")]
    TopLevelReturn,
    #[error("Can't return a value from an initializer.")]
    ReturnValueFromInitializer,
    #[error("Unexpected '{0}' outside of loop.")]
    LoopControlOutsideLoop(&'static str),
    #[error("Can't use 'this' outside of a class.")]
    ThisOutsideClass,
    #[error("Can't use 'this' in a static method.")]
    ThisInStaticMethod,
    #[error("A class can't inherit from itself.")]
    InheritFromSelf,
    #[error("Can't use 'super' outside of a class.")]
    SuperOutsideClass,
    #[error("Can't use 'super' in a class with no superclass.")]
    SuperWithoutSuperclass,
    #[error("Can't use 'super' in a trait.")]
    SuperInTrait,
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[error("[line {}] Error: {error}", .span.line())]
pub struct ResolverError {
    pub span: Span,
    pub error: ResolverErrorType,
}

pub type ResolverResult<T> = Result<T, ResolverError>;

impl ResolverError {
    /// Renders the error pointing at the offending lexeme in `source`.
    pub fn render(&self, source: &str) -> String {
        match self.span.extract_string(source) {
            Some(lexeme) if !self.span.is_empty() => format!(
                "[line {}] Error at '{}': {}",
                self.span.line(),
                lexeme,
                self.error
            ),
            _ => self.to_string(),
        }
    }
}

/// A local that was declared but never read before its scope closed.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ResolverWarning {
    pub span: Span,
    pub name: String,
}

impl ResolverWarning {
    pub fn message(&self) -> String {
        format!("Local variable '{}' is declared but never used.", self.name)
    }
}

impl fmt::Display for ResolverWarning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[line {}] Warning: {}", self.span.line(), self.message())
    }
}

/// Scope distances for every local variable access plus the warnings
/// raised along the way.
#[derive(Debug, Default)]
pub struct Resolution {
    pub locals: HashMap<ExprId, usize>,
    pub warnings: Vec<ResolverWarning>,
}

pub struct Resolver {
    scopes: Vec<Scope>,
    resolution: Resolution,
    func_context: FuncContext,
    class_context: ClassContext,
    /// Whether the nearest enclosing method is static. Plain functions and
    /// lambdas inherit it.
    in_static_method: bool,
    loop_depth: usize,
}

impl Resolver {
    pub fn new() -> Self {
        Resolver {
            scopes: vec![],
            resolution: Resolution::default(),
            func_context: FuncContext::None,
            class_context: ClassContext::None,
            in_static_method: false,
            loop_depth: 0,
        }
    }

    /// Stops at the first error. Warnings are only returned on success.
    #[tracing::instrument(level = "debug", skip_all, fields(stmts = stmts.len()))]
    pub fn resolve(mut self, stmts: &[Stmt]) -> ResolverResult<Resolution> {
        for stmt in stmts.iter() {
            self.resolve_statement(stmt)?;
        }

        tracing::debug!(
            locals = self.resolution.locals.len(),
            warnings = self.resolution.warnings.len(),
            "resolved program"
        );
        Ok(self.resolution)
    }

    fn resolve_statement(&mut self, stmt: &Stmt) -> ResolverResult<()> {
        match &stmt.stmt {
            StmtType::Expression(expr) | StmtType::Print(expr) => self.resolve_expression(expr)?,
            StmtType::VariableDecl(ident, initializer) => {
                self.declare_variable(ident, true)?;
                if let Some(initializer) = initializer {
                    self.resolve_expression(initializer)?;
                }
                self.define_variable(&ident.name);
            }
            StmtType::Block(stmts) => {
                self.push_scope();
                let result = self.resolve_statements(stmts);
                self.pop_scope();
                result?;
            }
            StmtType::IfElse(cond, if_body, else_body) => {
                self.resolve_expression(cond)?;
                self.resolve_statement(if_body)?;
                if let Some(else_body) = else_body {
                    self.resolve_statement(else_body)?;
                }
            }
            StmtType::While(cond, body) => {
                self.resolve_expression(cond)?;
                self.resolve_loop_body(body)?;
            }
            StmtType::For(init, cond, incr, body) => {
                self.push_scope();
                let result = self.resolve_for(init.as_deref(), cond.as_deref(), incr.as_deref(), body);
                self.pop_scope();
                result?;
            }
            StmtType::Break | StmtType::Continue => {
                if self.loop_depth == 0 {
                    let keyword = if stmt.stmt == StmtType::Break {
                        "break"
                    } else {
                        "continue"
                    };
                    return Err(ResolverError {
                        span: stmt.span.head(keyword.len()),
                        error: ResolverErrorType::LoopControlOutsideLoop(keyword),
                    });
                }
            }
            StmtType::FuncDecl(func_info) => {
                self.declare_variable(&func_info.ident, true)?;
                self.define_variable(func_info.name());
                self.resolve_function(func_info, FuncContext::Function)?;
            }
            StmtType::Return(expr) => {
                let keyword_span = stmt.span.head("return".len());
                if self.func_context == FuncContext::None {
                    return Err(ResolverError {
                        span: keyword_span,
                        error: ResolverErrorType::TopLevelReturn,
                    });
                }

                if let Some(expr) = expr {
                    if self.func_context == FuncContext::Initializer {
                        return Err(ResolverError {
                            span: keyword_span,
                            error: ResolverErrorType::ReturnValueFromInitializer,
                        });
                    }
                    self.resolve_expression(expr)?;
                }
            }
            StmtType::ClassDecl(class_info) => self.resolve_class(class_info)?,
            StmtType::TraitDecl(trait_info) => self.resolve_trait(trait_info)?,
        }

        Ok(())
    }

    fn resolve_statements(&mut self, stmts: &[Stmt]) -> ResolverResult<()> {
        for stmt in stmts.iter() {
            self.resolve_statement(stmt)?;
        }
        Ok(())
    }

    fn resolve_loop_body(&mut self, body: &Stmt) -> ResolverResult<()> {
        self.loop_depth += 1;
        let result = self.resolve_statement(body);
        self.loop_depth -= 1;
        result
    }

    fn resolve_for(
        &mut self,
        init: Option<&Stmt>,
        cond: Option<&Expr>,
        incr: Option<&Expr>,
        body: &Stmt,
    ) -> ResolverResult<()> {
        if let Some(init) = init {
            self.resolve_statement(init)?;
        }
        if let Some(cond) = cond {
            self.resolve_expression(cond)?;
        }
        if let Some(incr) = incr {
            self.resolve_expression(incr)?;
        }
        self.resolve_loop_body(body)
    }

    fn resolve_class(&mut self, class_info: &ClassInfo) -> ResolverResult<()> {
        self.declare_variable(&class_info.ident, true)?;
        self.define_variable(&class_info.ident.name);

        if let Some(superclass) = &class_info.superclass {
            if let ExprType::Variable(superclass_name) = &superclass.expr {
                if superclass_name.name == class_info.ident.name {
                    return Err(ResolverError {
                        span: superclass.span,
                        error: ResolverErrorType::InheritFromSelf,
                    });
                }
            }
            self.resolve_expression(superclass)?;
        }

        for lox_trait in class_info.traits.iter() {
            self.resolve_expression(lox_trait)?;
        }

        let prev_class_context = self.class_context;
        self.class_context = if class_info.superclass.is_some() {
            ClassContext::Subclass
        } else {
            ClassContext::Class
        };

        if class_info.superclass.is_some() {
            self.push_scope();
            self.define_implicit(SUPER_STR);
        }

        let result = self.resolve_members(&class_info.methods, &class_info.static_methods);

        if class_info.superclass.is_some() {
            self.pop_scope();
        }
        self.class_context = prev_class_context;
        result
    }

    fn resolve_trait(&mut self, trait_info: &TraitInfo) -> ResolverResult<()> {
        self.declare_variable(&trait_info.ident, true)?;
        self.define_variable(&trait_info.ident.name);

        let prev_class_context = self.class_context;
        self.class_context = ClassContext::Trait;
        let result = self.resolve_members(&trait_info.methods, &trait_info.static_methods);
        self.class_context = prev_class_context;
        result
    }

    /// Instance methods see `this` one scope above their parameters; static
    /// methods do not.
    fn resolve_members(
        &mut self,
        methods: &[Rc<FuncInfo>],
        static_methods: &[Rc<FuncInfo>],
    ) -> ResolverResult<()> {
        for method in methods.iter() {
            let context = if method.name() == INIT_STR {
                FuncContext::Initializer
            } else {
                FuncContext::Method
            };

            self.push_scope();
            self.define_implicit(THIS_STR);
            let result = self.resolve_function(method, context);
            self.pop_scope();
            result?;
        }

        for method in static_methods.iter() {
            self.resolve_function(method, FuncContext::StaticMethod)?;
        }

        Ok(())
    }

    fn resolve_function(&mut self, func_info: &FuncInfo, context: FuncContext) -> ResolverResult<()> {
        let prev_func_context = self.func_context;
        let prev_in_static_method = self.in_static_method;
        let prev_loop_depth = self.loop_depth;
        self.func_context = context;
        self.loop_depth = 0;
        match context {
            FuncContext::StaticMethod => self.in_static_method = true,
            FuncContext::Method | FuncContext::Initializer => self.in_static_method = false,
            FuncContext::Function | FuncContext::None => {}
        }

        self.push_scope();
        let result = self.resolve_function_body(func_info);
        self.pop_scope();

        self.func_context = prev_func_context;
        self.in_static_method = prev_in_static_method;
        self.loop_depth = prev_loop_depth;
        result
    }

    fn resolve_function_body(&mut self, func_info: &FuncInfo) -> ResolverResult<()> {
        for param in func_info.params.iter() {
            self.declare_variable(param, false)?;
            self.define_variable(&param.name);
        }

        self.resolve_statements(&func_info.body)
    }

    fn resolve_expression(&mut self, expr: &Expr) -> ResolverResult<()> {
        match &expr.expr {
            ExprType::Literal(_) => {}
            ExprType::Grouping(expr) | ExprType::Prefix(_, expr) => self.resolve_expression(expr)?,
            ExprType::Infix(_, lhs, rhs) | ExprType::Logical(_, lhs, rhs) => {
                self.resolve_expression(lhs)?;
                self.resolve_expression(rhs)?;
            }
            ExprType::Ternary(cond, then_expr, else_expr) => {
                self.resolve_expression(cond)?;
                self.resolve_expression(then_expr)?;
                self.resolve_expression(else_expr)?;
            }
            ExprType::Variable(var) => {
                if self.is_during_var_initialization(&var.name) {
                    return Err(ResolverError {
                        span: var.span,
                        error: ResolverErrorType::ReadInOwnInitializer(var.name.clone()),
                    });
                }
                self.resolve_local(expr.id, &var.name, true);
            }
            ExprType::Assignment(var, value) => {
                self.resolve_expression(value)?;
                self.resolve_local(expr.id, &var.name, false);
            }
            ExprType::Call(callee, args) => {
                self.resolve_expression(callee)?;
                for arg in args.iter() {
                    self.resolve_expression(arg)?;
                }
            }
            ExprType::Get(object, _) => self.resolve_expression(object)?,
            ExprType::Set(object, _, value) => {
                self.resolve_expression(value)?;
                self.resolve_expression(object)?;
            }
            ExprType::Array(elements) => {
                for element in elements.iter() {
                    self.resolve_expression(element)?;
                }
            }
            ExprType::Index(array, index) => {
                self.resolve_expression(array)?;
                self.resolve_expression(index)?;
            }
            ExprType::IndexSet(array, index, value) => {
                self.resolve_expression(array)?;
                self.resolve_expression(index)?;
                self.resolve_expression(value)?;
            }
            ExprType::Lambda(func_info) => {
                self.resolve_function(func_info, FuncContext::Function)?;
            }
            ExprType::This => {
                if self.class_context == ClassContext::None {
                    return Err(ResolverError {
                        span: expr.span,
                        error: ResolverErrorType::ThisOutsideClass,
                    });
                }
                // A class nested in an instance method would otherwise find
                // the outer `this`.
                if self.in_static_method || !self.resolve_local(expr.id, THIS_STR, true) {
                    return Err(ResolverError {
                        span: expr.span,
                        error: ResolverErrorType::ThisInStaticMethod,
                    });
                }
            }
            ExprType::Super(_) => {
                let error = match self.class_context {
                    ClassContext::None => Some(ResolverErrorType::SuperOutsideClass),
                    ClassContext::Class => Some(ResolverErrorType::SuperWithoutSuperclass),
                    ClassContext::Trait => Some(ResolverErrorType::SuperInTrait),
                    ClassContext::Subclass => None,
                };

                if let Some(error) = error {
                    return Err(ResolverError {
                        span: expr.span.head(SUPER_STR.len()),
                        error,
                    });
                }
                self.resolve_local(expr.id, SUPER_STR, true);
            }
        }

        Ok(())
    }

    /// Returns true if we are trying to resolve the same variable
    /// we are initializing.
    fn is_during_var_initialization(&self, name: &str) -> bool {
        if let Some(scope) = self.scopes.last() {
            if let Some(info) = scope.get(name) {
                return info.state == VariableState::Declared;
            }
        }
        false
    }

    /// Records how many scopes out `name` lives. Names not found in any
    /// scope are globals and are looked up dynamically.
    fn resolve_local(&mut self, id: ExprId, name: &str, is_read: bool) -> bool {
        for (env_hops, scope) in self.scopes.iter_mut().rev().enumerate() {
            if let Some(info) = scope.get_mut(name) {
                if is_read {
                    info.state = VariableState::Read;
                }
                self.resolution.locals.insert(id, env_hops);
                return true;
            }
        }

        false
    }

    fn push_scope(&mut self) {
        self.scopes.push(Scope::new());
    }

    fn pop_scope(&mut self) {
        let scope = match self.scopes.pop() {
            Some(scope) => scope,
            None => return,
        };

        let mut unused: Vec<_> = scope
            .into_iter()
            .filter(|(_, info)| info.warn_if_unused && info.state != VariableState::Read)
            .map(|(name, info)| ResolverWarning {
                span: info.span,
                name,
            })
            .collect();
        unused.sort_by_key(|warning| warning.span.start_pos);

        for warning in unused.iter() {
            tracing::debug!(%warning, "unused local");
        }
        self.resolution.warnings.extend(unused);
    }

    fn declare_variable(&mut self, ident: &Identifier, warn_if_unused: bool) -> ResolverResult<()> {
        let scope = match self.scopes.last_mut() {
            Some(scope) => scope,
            None => return Ok(()),
        };

        if scope.contains_key(&ident.name) {
            return Err(ResolverError {
                span: ident.span,
                error: ResolverErrorType::Redeclared(ident.name.clone()),
            });
        }

        scope.insert(
            ident.name.clone(),
            VariableInfo {
                state: VariableState::Declared,
                span: ident.span,
                warn_if_unused,
            },
        );
        Ok(())
    }

    fn define_variable(&mut self, name: &str) {
        if let Some(info) = self.scopes.last_mut().and_then(|scope| scope.get_mut(name)) {
            if info.state == VariableState::Declared {
                info.state = VariableState::Defined;
            }
        }
    }

    fn define_implicit(&mut self, name: &str) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(
                name.to_owned(),
                VariableInfo {
                    state: VariableState::Read,
                    span: Span::default(),
                    warn_if_unused: false,
                },
            );
        }
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}
