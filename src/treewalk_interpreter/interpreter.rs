use super::array::LoxArray;
use super::class::LoxClassDataPtr;
use super::environment::Environment;
use super::errors::{ExecResult, InterpreterError, OpResult, RuntimeResult, Signal, WithSpan};
use super::function::{FnKind, LoxFn};
use super::lox_trait::LoxTraitDataPtr;
use super::native_function::get_native_funcs;
use super::object::Object;
use crate::lox_frontend::constants::{INIT_STR, SUPER_STR, THIS_STR};
use crate::lox_frontend::grammar::{
    ClassInfo, Expr, ExprId, ExprType, FuncInfo, Identifier, InfixOperator, Literal,
    LogicalOperator, PrefixOperator, Stmt, StmtType, TraitInfo,
};
use crate::lox_frontend::span::Span;

use std::collections::HashMap;
use std::io::{self, Write};
use std::rc::Rc;

pub struct Interpreter<W: Write> {
    env: Environment,
    globals: Environment,
    locals: HashMap<ExprId, usize>,
    output: W,
}

impl Interpreter<io::Stdout> {
    pub fn new() -> Self {
        Self::new_with_output(io::stdout())
    }
}

impl Default for Interpreter<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Interpreter<W> {
    /// Interpreter whose `print` statements write to `output`.
    pub fn new_with_output(output: W) -> Self {
        let env = Environment::new();
        for native_func in get_native_funcs().into_iter() {
            let name = native_func.name().to_owned();
            env.define(&name, Object::NativeFunc(native_func));
        }
        let globals = env.clone();
        tracing::debug!("created interpreter");

        Interpreter {
            env,
            globals,
            locals: HashMap::new(),
            output,
        }
    }

    /// Adds scope distances computed by the resolver. Expression ids are
    /// unique across parses, so earlier entries stay valid.
    pub fn extend_locals(&mut self, locals: HashMap<ExprId, usize>) {
        self.locals.extend(locals);
    }

    pub fn swap_env(&mut self, mut env: Environment) -> Environment {
        std::mem::swap(&mut self.env, &mut env);
        // Return old original interpreter env
        env
    }

    #[tracing::instrument(level = "debug", skip_all, fields(stmts = stmts.len()))]
    pub fn interpret(&mut self, stmts: &[Stmt]) -> RuntimeResult<()> {
        for stmt in stmts.iter() {
            // The resolver rejects loop control and `return` outside their
            // constructs, so top level only ever sees `Next`.
            let signal = self.eval_statement(stmt)?;
            debug_assert!(matches!(signal, Signal::Next), "{:?} escaped to top level", signal);
        }
        Ok(())
    }

    /// Runs `stmts` inside `env`, restoring the current environment
    /// afterwards even when execution fails.
    pub fn execute_block(&mut self, stmts: &[Stmt], env: Environment) -> ExecResult {
        self.with_env(env, |this| {
            for stmt in stmts.iter() {
                match this.eval_statement(stmt)? {
                    Signal::Next => {}
                    signal => return Ok(signal),
                }
            }
            Ok(Signal::Next)
        })
    }

    fn with_env<T, F>(&mut self, env: Environment, func: F) -> RuntimeResult<T>
    where
        F: FnOnce(&mut Self) -> RuntimeResult<T>,
    {
        let prev_env = self.swap_env(env);
        let result = func(self);
        self.swap_env(prev_env);
        result
    }

    fn eval_statement(&mut self, stmt: &Stmt) -> ExecResult {
        #[cfg(feature = "trace-execution")]
        tracing::trace!(line = stmt.span.line(), stmt = ?stmt.stmt, "executing");

        match &stmt.stmt {
            StmtType::Expression(expr) => {
                self.eval_expression(expr)?;
            }
            StmtType::Print(expr) => {
                let value = self.eval_expression(expr)?;
                writeln!(self.output, "{}", value)
                    .map_err(|e| InterpreterError::Output(e.to_string()))
                    .at(stmt.span)?;
            }
            StmtType::VariableDecl(ident, initializer) => {
                let value = match initializer {
                    Some(expr) => self.eval_expression(expr)?,
                    None => Object::Nil,
                };
                self.env.define(&ident.name, value);
            }
            StmtType::Block(stmts) => {
                let env = Environment::with_enclosing(&self.env);
                return self.execute_block(stmts, env);
            }
            StmtType::IfElse(if_condition, if_body, else_body) => {
                return self.eval_if_else(if_condition, if_body, else_body.as_deref());
            }
            StmtType::While(condition, body) => return self.eval_while(condition, body),
            StmtType::For(init, condition, increment, body) => {
                let env = Environment::with_enclosing(&self.env);
                return self.with_env(env, |this| {
                    this.eval_for(
                        init.as_deref(),
                        condition.as_deref(),
                        increment.as_deref(),
                        body,
                    )
                });
            }
            StmtType::Break => return Ok(Signal::Break),
            StmtType::Continue => return Ok(Signal::Continue),
            StmtType::FuncDecl(func_info) => {
                let func = self.make_fn(func_info, FnKind::Function);
                self.env.define(func_info.name(), Object::LoxFunc(func));
            }
            StmtType::Return(expr) => {
                let value = match expr {
                    Some(expr) => self.eval_expression(expr)?,
                    None => Object::Nil,
                };
                return Ok(Signal::Return(value));
            }
            StmtType::ClassDecl(class_info) => self.eval_class_decl(class_info)?,
            StmtType::TraitDecl(trait_info) => self.eval_trait_decl(trait_info),
        }

        Ok(Signal::Next)
    }

    fn make_fn(&self, func_info: &Rc<FuncInfo>, kind: FnKind) -> LoxFn {
        LoxFn::new(func_info.clone(), self.env.clone(), kind)
    }

    fn make_methods(&self, methods: &[Rc<FuncInfo>]) -> HashMap<String, LoxFn> {
        methods
            .iter()
            .map(|method| {
                let kind = if method.name() == INIT_STR {
                    FnKind::Initializer
                } else {
                    FnKind::Method
                };
                (method.name().to_owned(), self.make_fn(method, kind))
            })
            .collect()
    }

    fn make_static_methods(&self, methods: &[Rc<FuncInfo>]) -> HashMap<String, LoxFn> {
        methods
            .iter()
            .map(|method| {
                let func = self.make_fn(method, FnKind::StaticMethod);
                (method.name().to_owned(), func)
            })
            .collect()
    }

    fn eval_class_decl(&mut self, class_info: &ClassInfo) -> RuntimeResult<()> {
        let name = &class_info.ident.name;
        tracing::debug!(class = name.as_str(), "declaring class");

        // Bound first so methods can refer to the class by name.
        self.env.define(name, Object::Nil);

        let superclass = match &class_info.superclass {
            Some(expr) => match self.eval_expression(expr)? {
                Object::LoxClass(class) => Some(class),
                _ => return Err(InterpreterError::NotAClass).at(expr.span),
            },
            None => None,
        };

        let mut traits = Vec::with_capacity(class_info.traits.len());
        for expr in class_info.traits.iter() {
            match self.eval_expression(expr)? {
                Object::LoxTrait(lox_trait) => traits.push(lox_trait),
                other => {
                    let trait_name = match &expr.expr {
                        ExprType::Variable(ident) => ident.name.clone(),
                        _ => other.to_string(),
                    };
                    return Err(InterpreterError::NotATrait(trait_name)).at(expr.span);
                }
            }
        }

        let class_env = self.env.clone();
        if let Some(superclass) = &superclass {
            self.env = Environment::with_enclosing(&class_env);
            self.env
                .define(SUPER_STR, Object::LoxClass(superclass.clone()));
        }

        // Trait methods go in first so the class's own methods override them.
        let mut methods = HashMap::new();
        let mut static_methods = HashMap::new();
        for lox_trait in traits.iter() {
            for (method_name, method) in lox_trait.methods() {
                methods.insert(method_name.clone(), method.clone());
            }
            for (method_name, method) in lox_trait.static_methods() {
                static_methods.insert(method_name.clone(), method.clone());
            }
        }
        methods.extend(self.make_methods(&class_info.methods));
        static_methods.extend(self.make_static_methods(&class_info.static_methods));

        self.env = class_env;

        let class = LoxClassDataPtr::new(name.clone(), superclass, methods, static_methods);
        self.env
            .assign(name, Object::LoxClass(class))
            .at(class_info.ident.span)
    }

    fn eval_trait_decl(&mut self, trait_info: &TraitInfo) {
        let name = &trait_info.ident.name;
        tracing::debug!(trait_name = name.as_str(), "declaring trait");

        let lox_trait = LoxTraitDataPtr::new(
            name.clone(),
            self.make_methods(&trait_info.methods),
            self.make_static_methods(&trait_info.static_methods),
        );
        self.env.define(name, Object::LoxTrait(lox_trait));
    }

    fn eval_if_else(
        &mut self,
        if_condition: &Expr,
        if_body: &Stmt,
        else_body: Option<&Stmt>,
    ) -> ExecResult {
        if self.eval_expression(if_condition)?.is_truthy() {
            return self.eval_statement(if_body);
        }
        if let Some(else_body) = else_body {
            return self.eval_statement(else_body);
        }

        Ok(Signal::Next)
    }

    fn eval_while(&mut self, condition: &Expr, body: &Stmt) -> ExecResult {
        while self.eval_expression(condition)?.is_truthy() {
            match self.eval_statement(body)? {
                Signal::Break => break,
                Signal::Return(value) => return Ok(Signal::Return(value)),
                Signal::Next | Signal::Continue => {}
            }
        }

        Ok(Signal::Next)
    }

    /// Expects to run inside the scope that holds the loop variable.
    fn eval_for(
        &mut self,
        init: Option<&Stmt>,
        condition: Option<&Expr>,
        increment: Option<&Expr>,
        body: &Stmt,
    ) -> ExecResult {
        if let Some(init) = init {
            self.eval_statement(init)?;
        }

        loop {
            if let Some(condition) = condition {
                if !self.eval_expression(condition)?.is_truthy() {
                    break;
                }
            }

            match self.eval_statement(body)? {
                Signal::Break => break,
                Signal::Return(value) => return Ok(Signal::Return(value)),
                Signal::Next | Signal::Continue => {}
            }

            if let Some(increment) = increment {
                self.eval_expression(increment)?;
            }
        }

        Ok(Signal::Next)
    }

    pub fn eval_expression(&mut self, expr: &Expr) -> RuntimeResult<Object> {
        match &expr.expr {
            ExprType::Literal(l) => Ok(self.eval_literal(l)),
            ExprType::Grouping(expr) => self.eval_expression(expr),
            ExprType::Infix(op, lhs, rhs) => self.eval_infix_operator(*op, lhs, rhs, expr.span),
            ExprType::Prefix(op, operand) => self.eval_prefix_operator(*op, operand, expr.span),
            ExprType::Logical(op, lhs, rhs) => self.eval_logical_operator(*op, lhs, rhs),
            ExprType::Ternary(condition, then_expr, else_expr) => {
                if self.eval_expression(condition)?.is_truthy() {
                    self.eval_expression(then_expr)
                } else {
                    self.eval_expression(else_expr)
                }
            }
            ExprType::Variable(var) => self.lookup_variable(expr.id, &var.name).at(var.span),
            ExprType::Assignment(var, value_expr) => {
                let value = self.eval_expression(value_expr)?;
                let assigned = match self.locals.get(&expr.id) {
                    Some(env_hops) => self.env.assign_at(*env_hops, &var.name, value.clone()),
                    None => self.globals.assign(&var.name, value.clone()),
                };
                assigned.at(var.span)?;
                Ok(value)
            }
            ExprType::Call(callee, args) => self.eval_func_call(callee, args, expr.span),
            ExprType::Get(obj_expr, property) => self.eval_property_get(obj_expr, property),
            ExprType::Set(expr_lhs, property, expr_rhs) => {
                self.eval_property_set(expr_lhs, property, expr_rhs)
            }
            ExprType::Array(elements) => {
                let mut values = Vec::with_capacity(elements.len());
                for element in elements.iter() {
                    values.push(self.eval_expression(element)?);
                }
                Ok(Object::Array(LoxArray::new(values)))
            }
            ExprType::Index(array_expr, index_expr) => {
                let array = self.eval_expression(array_expr)?;
                let index = self.eval_expression(index_expr)?;
                as_array(array)
                    .and_then(|array| array.get(&index))
                    .at(expr.span)
            }
            ExprType::IndexSet(array_expr, index_expr, value_expr) => {
                let array = self.eval_expression(array_expr)?;
                let index = self.eval_expression(index_expr)?;
                let value = self.eval_expression(value_expr)?;
                as_array(array)
                    .and_then(|array| array.set(&index, value))
                    .at(expr.span)
            }
            ExprType::Lambda(func_info) => {
                Ok(Object::LoxFunc(self.make_fn(func_info, FnKind::Function)))
            }
            ExprType::This => self.lookup_variable(expr.id, THIS_STR).at(expr.span),
            ExprType::Super(method) => self.eval_super(expr, method),
        }
    }

    fn eval_literal(&self, l: &Literal) -> Object {
        match l {
            Literal::Number(n) => Object::Number(*n),
            Literal::Boolean(b) => Object::Boolean(*b),
            Literal::Str(s) => Object::String(s.clone()),
            Literal::Nil => Object::Nil,
        }
    }

    /// Resolved locals are read at their recorded distance, everything else
    /// is a global.
    fn lookup_variable(&self, id: ExprId, name: &str) -> OpResult<Object> {
        match self.locals.get(&id) {
            Some(env_hops) => self.env.get_at(*env_hops, name),
            None => self.globals.get(name),
        }
    }

    /// Getters run on access instead of evaluating to a bound function.
    fn call_if_getter(&mut self, value: Object) -> RuntimeResult<Object> {
        match value {
            Object::LoxFunc(func) if func.is_getter() => func.execute_getter(self),
            value => Ok(value),
        }
    }

    fn eval_property_get(&mut self, expr: &Expr, property: &Identifier) -> RuntimeResult<Object> {
        let value = match self.eval_expression(expr)? {
            Object::LoxInstance(instance) => instance.get(&property.name),
            Object::LoxClass(class) => class.get(&property.name),
            _ => Err(InterpreterError::NotAnInstance),
        }
        .at(property.span)?;

        self.call_if_getter(value)
    }

    fn eval_property_set(
        &mut self,
        expr_lhs: &Expr,
        property: &Identifier,
        expr_rhs: &Expr,
    ) -> RuntimeResult<Object> {
        let target = self.eval_expression(expr_lhs)?;
        let value = self.eval_expression(expr_rhs)?;

        match target {
            Object::LoxInstance(instance) => instance.set(&property.name, value.clone()),
            Object::LoxClass(class) => class.set(&property.name, value.clone()),
            _ => return Err(InterpreterError::NotAnInstance).at(property.span),
        }

        Ok(value)
    }

    /// `super.name` inside an instance method searches the superclass's
    /// instance methods first. Static methods have no `this` and only see
    /// the superclass's static members.
    fn eval_super(&mut self, expr: &Expr, method: &Identifier) -> RuntimeResult<Object> {
        let env_hops = self
            .locals
            .get(&expr.id)
            .copied()
            .ok_or_else(|| InterpreterError::UndefinedVariable(SUPER_STR.to_owned()))
            .at(expr.span)?;

        let superclass = match self.env.get_at(env_hops, SUPER_STR).at(expr.span)? {
            Object::LoxClass(class) => class,
            _ => return Err(InterpreterError::NotAClass).at(expr.span),
        };

        let this = env_hops
            .checked_sub(1)
            .and_then(|this_hops| self.env.get_at(this_hops, THIS_STR).ok());

        if let Some(instance @ Object::LoxInstance(_)) = this {
            if let Some(found) = superclass.find_method(&method.name) {
                return self.call_if_getter(Object::LoxFunc(found.bind(instance)));
            }
        }

        let value = superclass.get(&method.name).at(method.span)?;
        self.call_if_getter(value)
    }

    fn eval_logical_operator(
        &mut self,
        op: LogicalOperator,
        lhs: &Expr,
        rhs: &Expr,
    ) -> RuntimeResult<Object> {
        let lhs = self.eval_expression(lhs)?;

        // Handle short circuiting.
        match op {
            LogicalOperator::And if !lhs.is_truthy() => Ok(lhs),
            LogicalOperator::Or if lhs.is_truthy() => Ok(lhs),
            _ => self.eval_expression(rhs),
        }
    }

    fn eval_infix_operator(
        &mut self,
        op: InfixOperator,
        lhs: &Expr,
        rhs: &Expr,
        span: Span,
    ) -> RuntimeResult<Object> {
        let lhs = self.eval_expression(lhs)?;
        let rhs = self.eval_expression(rhs)?;
        Object::apply_infix_op(op, lhs, rhs).at(span)
    }

    fn eval_prefix_operator(
        &mut self,
        op: PrefixOperator,
        expr: &Expr,
        span: Span,
    ) -> RuntimeResult<Object> {
        let value = self.eval_expression(expr)?;
        Object::apply_prefix_op(op, value).at(span)
    }

    fn eval_func_call(
        &mut self,
        callee: &Expr,
        raw_args: &[Expr],
        span: Span,
    ) -> RuntimeResult<Object> {
        let callee = self.eval_expression(callee)?;
        let mut args = Vec::with_capacity(raw_args.len());
        for raw_arg in raw_args.iter() {
            args.push(self.eval_expression(raw_arg)?);
        }

        callee.execute(args, self, span)
    }
}

fn as_array(value: Object) -> OpResult<LoxArray> {
    match value {
        Object::Array(array) => Ok(array),
        _ => Err(InterpreterError::NotAnArray),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lox_frontend::Parser;
    use crate::treewalk_interpreter::resolver::Resolver;

    fn run(source: &str) -> (String, RuntimeResult<()>) {
        let tree = Parser::new(source).parse().unwrap();
        let resolution = Resolver::new().resolve(&tree.stmts).unwrap();

        let mut output = Vec::new();
        let result = {
            let mut interpreter = Interpreter::new_with_output(&mut output);
            interpreter.extend_locals(resolution.locals);
            interpreter.interpret(&tree.stmts)
        };

        (String::from_utf8(output).unwrap(), result)
    }

    fn run_ok(source: &str) -> String {
        let (output, result) = run(source);
        result.unwrap();
        output
    }

    fn run_err(source: &str) -> InterpreterError {
        run(source).1.unwrap_err().error
    }

    #[test]
    fn test_block_scoping() {
        assert_eq!(
            run_ok("var a = 1; { var a = 2; a = 3; print a; } print a;"),
            "3\n1\n"
        );
    }

    #[test]
    fn test_closures_share_environment() {
        let source = "
            fun makeAdder() {
                var total = 0;
                fun add(n) { total = total + n; return total; }
                return add;
            }
            var a = makeAdder();
            var b = makeAdder();
            print a(1);
            print a(2);
            print b(10);
        ";
        assert_eq!(run_ok(source), "1\n3\n10\n");
    }

    #[test]
    fn test_closure_binds_lexically() {
        let source = "
            var a = \"global\";
            {
                fun show() { print a; }
                show();
                var a = \"block\";
                show();
            }
        ";
        assert_eq!(run_ok(source), "global\nglobal\n");
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "escaped to top level")]
    fn test_unresolved_break_at_top_level_panics() {
        let tree = Parser::new("break;").parse().unwrap();
        let mut output = Vec::new();
        let _ = Interpreter::new_with_output(&mut output).interpret(&tree.stmts);
    }

    #[test]
    fn test_loop_control() {
        let source = "
            for (var i = 0; i < 6; i = i + 1) {
                if (i == 1) continue;
                if (i == 4) break;
                print i;
            }
            var j = 0;
            while (true) {
                j = j + 1;
                if (j < 3) continue;
                break;
            }
            print j;
        ";
        assert_eq!(run_ok(source), "0\n2\n3\n3\n");
    }

    #[test]
    fn test_return_unwinds_loops() {
        let source = "
            fun find(limit) {
                for (var i = 0; ; i = i + 1) {
                    while (true) {
                        if (i == limit) return i;
                        break;
                    }
                }
            }
            print find(3);
        ";
        assert_eq!(run_ok(source), "3\n");
    }

    #[test]
    fn test_for_closures_share_loop_variable() {
        let source = "
            var fns = [];
            for (var i = 0; i < 2; i = i + 1) {
                append(fns, fun () { return i; });
            }
            print fns[0]();
        ";
        assert_eq!(run_ok(source), "2\n");
    }

    #[test]
    fn test_logical_and_ternary() {
        assert_eq!(
            run_ok("print nil or \"x\"; print 1 and 2; print false and 1; print 1 > 2 ? \"a\" : \"b\";"),
            "x\n2\nfalse\nb\n"
        );
    }

    #[test]
    fn test_initializer_returns_instance() {
        let source = "
            class Foo { init() { this.a = 1; return; this.a = 2; } }
            var f = Foo();
            print f;
            print f.a;
            print f.init() == f;
        ";
        assert_eq!(run_ok(source), "<Foo instance>\n1\ntrue\n");
    }

    #[test]
    fn test_inheritance_and_super() {
        let source = "
            class A {
                init(n) { this.n = n; }
                name() { return \"A\"; }
                describe { return this.name() + str(this.n); }
            }
            class B < A {
                name() { return \"B/\" + super.name(); }
                describe { return \"[\" + super.describe + \"]\"; }
            }
            var b = B(7);
            print b.describe;
            print b.name;
        ";
        assert_eq!(run_ok(source), "[B/A7]\n<fn name>\n");
    }

    #[test]
    fn test_static_members() {
        let source = "
            class Shape {
                class unit() { return 1; }
                class sides { return 0; }
            }
            class Square < Shape {
                class sides { return 4 + super.sides; }
                class describe() { return super.unit() + Square.sides; }
            }
            Square.count = 2;
            print Square.sides;
            print Square.describe();
            print Square.count;
            print Shape.unit;
        ";
        assert_eq!(run_ok(source), "4\n5\n2\n<fn unit>\n");
    }

    #[test]
    fn test_traits_compose_and_override() {
        let source = "
            trait Greets { hello() { return \"hello \" + this.name; } wave() { return \"wave\"; } }
            trait Counts { class zero() { return 0; } }
            class Person <> Greets, Counts {
                init(name) { this.name = name; }
                wave() { return \"bow\"; }
            }
            var p = Person(\"ann\");
            print p.hello();
            print p.wave();
            print Person.zero();
            print Greets;
        ";
        assert_eq!(run_ok(source), "hello ann\nbow\n0\n<trait Greets>\n");
    }

    #[test]
    fn test_arrays() {
        let source = "
            var a = [1, \"two\", nil];
            a[2] = [3];
            print a;
            print len(append(a, 4));
            print a[3];
            var b = a;
            b[0] = 10;
            print a[0];
        ";
        assert_eq!(run_ok(source), "[1, two, [3]]\n4\n4\n10\n");
    }

    #[test]
    fn test_runtime_errors() {
        assert_eq!(run_err("print 1 / 0;"), InterpreterError::DivideByZero);
        assert_eq!(run_err("print -\"a\";"), InterpreterError::IllegalPrefixOperation(PrefixOperator::Negate));
        assert_eq!(run_err("print 1 + nil;"), InterpreterError::IllegalAddition);
        assert_eq!(
            run_err("print missing;"),
            InterpreterError::UndefinedVariable("missing".to_owned())
        );
        assert_eq!(
            run_err("missing = 1;"),
            InterpreterError::UndefinedVariable("missing".to_owned())
        );
        assert_eq!(run_err("\"str\"();"), InterpreterError::NotCallable);
        assert_eq!(
            run_err("fun f(a) {} f();"),
            InterpreterError::WrongArity(1, 0)
        );
        assert_eq!(run_err("var x = 1; print x.y;"), InterpreterError::NotAnInstance);
        assert_eq!(
            run_err("class A {} print A().y;"),
            InterpreterError::UndefinedProperty("y".to_owned())
        );
        assert_eq!(run_err("var a = 1; class B < a {}"), InterpreterError::NotAClass);
        assert_eq!(
            run_err("var T = 1; class B <> T {}"),
            InterpreterError::NotATrait("T".to_owned())
        );
        assert_eq!(run_err("print [1][1.5];"), InterpreterError::NonIntegerIndex);
        assert_eq!(run_err("print [1][1];"), InterpreterError::IndexOutOfBounds);
        assert_eq!(run_err("[1][-1] = 2;"), InterpreterError::NegativeIndex);
        assert_eq!(run_err("var s = \"abc\"; print s[0];"), InterpreterError::NotAnArray);
        assert_eq!(run_err("print len(1);"), InterpreterError::ExpectedArray);
    }

    #[test]
    fn test_getter_rules() {
        assert_eq!(
            run_err("class A { g {} } print A().g;"),
            InterpreterError::EmptyGetter
        );
        assert_eq!(
            run_err("class A { g { if (true) return 1; } } print A().g;"),
            InterpreterError::GetterWithoutReturn
        );
    }

    #[test]
    fn test_runtime_error_location() {
        let (output, result) = run("print 1;\nprint 2 * \"x\";\nprint 3;");
        let error = result.unwrap_err();

        assert_eq!(output, "1\n");
        assert_eq!(error.to_string(), "[line 2] Both operands should be numbers.");
    }

    #[test]
    fn test_error_restores_global_env() {
        let tree = Parser::new("var a = 1; { var a = 2; print a / 0; }")
            .parse()
            .unwrap();
        let resolution = Resolver::new().resolve(&tree.stmts).unwrap();

        let mut output = Vec::new();
        let mut interpreter = Interpreter::new_with_output(&mut output);
        interpreter.extend_locals(resolution.locals);
        assert!(interpreter.interpret(&tree.stmts).is_err());

        let tree = Parser::with_first_expr_id("print a;", tree.next_expr_id)
            .parse()
            .unwrap();
        interpreter.interpret(&tree.stmts).unwrap();
        drop(interpreter);

        assert_eq!(String::from_utf8(output).unwrap(), "1\n");
    }
}
