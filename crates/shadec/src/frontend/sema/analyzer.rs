//! Semantic analyzer - declaration and statement checking

use super::context::AnalysisContext;
use super::diagnostic::{Diagnostic, DiagnosticKind, DiagnosticSink};
use super::scope::{ScopePolicy, Symbol};
use crate::common::{CompileResult, Span};
use crate::frontend::ast::*;

/// Error-tolerant checker for a whole program.
///
/// Every violation goes to the sink and checking carries on. The only
/// errors returned are broken internal invariants.
pub struct SemanticAnalyzer<'a, 's> {
    pub(super) ctx: AnalysisContext<'a>,
    sink: &'s mut dyn DiagnosticSink,
    reported: usize,
}

impl<'a, 's> SemanticAnalyzer<'a, 's> {
    pub fn new(sink: &'s mut dyn DiagnosticSink) -> Self {
        Self {
            ctx: AnalysisContext::new(),
            sink,
            reported: 0,
        }
    }

    /// Check a program, returning the number of diagnostics reported.
    ///
    /// Each call starts from an empty symbol table.
    pub fn analyze(&mut self, program: &'a Program) -> CompileResult<usize> {
        self.ctx = AnalysisContext::new();
        self.reported = 0;

        for decl in &program.declarations {
            self.check_declaration(decl)?;
        }

        Ok(self.reported)
    }

    pub(super) fn report(&mut self, kind: DiagnosticKind, span: Span) {
        self.reported += 1;
        self.sink.report(Diagnostic::new(kind, span));
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn check_declaration(&mut self, decl: &'a Declaration) -> CompileResult<()> {
        match &decl.kind {
            DeclKind::Variable(var) => {
                self.check_var_decl(var);
                Ok(())
            }
            DeclKind::Function(func) => self.check_fn_decl(func),
        }
    }

    /// Insert into the innermost scope, replacing a same-scope declaration
    fn declare(&mut self, symbol: Symbol<'a>, at: &Identifier) {
        if let Some(prior) = self.ctx.symbols.find(symbol.name, ScopePolicy::CurrentOnly) {
            self.report(
                DiagnosticKind::DeclConflict {
                    name: at.name.clone(),
                    prior: prior.span(),
                },
                at.span,
            );
            self.ctx.symbols.remove(symbol.name);
        }
        self.ctx.symbols.insert(symbol);
    }

    fn check_var_decl(&mut self, var: &'a VarDecl) {
        self.declare(Symbol::variable(var), &var.name);

        // The new symbol is already visible to its own initializer
        if let Some(init) = &var.init {
            let mut valid = true;
            let ty = self.check_expr(init, &mut valid);
            if valid && ty != var.ty {
                self.report(
                    DiagnosticKind::InvalidInitialization {
                        name: var.name.name.clone(),
                        expected: var.ty.clone(),
                        given: ty,
                    },
                    init.span,
                );
            }
        }
    }

    fn check_fn_decl(&mut self, func: &'a FnDecl) -> CompileResult<()> {
        self.declare(Symbol::function(func), &func.name);

        self.ctx.symbols.push();
        for param in &func.params {
            self.check_var_decl(param);
        }

        self.ctx.push_return(func.return_type.clone());
        // The body shares the formals' scope
        for stmt in &func.body.stmts {
            self.check_stmt(stmt)?;
        }

        let frame = self.ctx.pop_return()?;
        if !frame.has_returned {
            self.report(
                DiagnosticKind::ReturnMissing {
                    name: func.name.name.clone(),
                },
                func.name.span,
            );
        }

        self.ctx.symbols.pop()
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn check_stmt(&mut self, stmt: &'a Stmt) -> CompileResult<()> {
        match &stmt.kind {
            StmtKind::Block(block) => {
                self.ctx.symbols.push();
                for stmt in &block.stmts {
                    self.check_stmt(stmt)?;
                }
                self.ctx.symbols.pop()?;
            }

            StmtKind::Declaration(decl) => self.check_declaration(decl)?,

            StmtKind::Expr(expr) => {
                let mut valid = true;
                self.check_expr(expr, &mut valid);
            }

            StmtKind::Empty => {}

            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.check_test(condition);
                self.check_stmt(then_branch)?;
                if let Some(else_branch) = else_branch {
                    self.check_stmt(else_branch)?;
                }
            }

            StmtKind::While { condition, body } => {
                self.within_loop(|this| {
                    this.check_test(condition);
                    this.check_stmt(body)
                })?;
            }

            StmtKind::For {
                init,
                condition,
                step,
                body,
            } => {
                // A declaration in the init clause lives only as long as the loop
                let scoped = init.is_some();
                if scoped {
                    self.ctx.symbols.push();
                }
                let result = self.within_loop(|this| {
                    if let Some(init) = init {
                        this.check_stmt(init)?;
                    }
                    if let Some(condition) = condition {
                        this.check_test(condition);
                    }
                    if let Some(step) = step {
                        let mut valid = true;
                        this.check_expr(step, &mut valid);
                    }
                    this.check_stmt(body)
                });
                if scoped {
                    self.ctx.symbols.pop()?;
                }
                result?;
            }

            StmtKind::Switch {
                expr,
                cases,
                default,
            } => {
                self.within_loop(|this| {
                    let mut valid = true;
                    this.check_expr(expr, &mut valid);

                    for case in cases.iter().chain(default) {
                        if let Some(label) = &case.label {
                            let mut valid = true;
                            this.check_expr(label, &mut valid);
                        }
                        for stmt in &case.body {
                            this.check_stmt(stmt)?;
                        }
                    }
                    Ok(())
                })?;
            }

            StmtKind::Break => {
                if !self.ctx.in_loop() {
                    self.report(DiagnosticKind::BreakOutsideLoop, stmt.span);
                }
            }

            StmtKind::Continue => {
                if !self.ctx.in_loop() {
                    self.report(DiagnosticKind::ContinueOutsideLoop, stmt.span);
                }
            }

            StmtKind::Return(value) => self.check_return(value.as_ref(), stmt.span),
        }
        Ok(())
    }

    /// Run `f` one loop level deeper, restoring the depth on every path
    fn within_loop<F>(&mut self, f: F) -> CompileResult<()>
    where
        F: FnOnce(&mut Self) -> CompileResult<()>,
    {
        self.ctx.enter_loop();
        let result = f(self);
        self.ctx.exit_loop();
        result
    }

    /// Check a loop or branch condition. A condition that already failed
    /// still reports, since its type is the error type.
    fn check_test(&mut self, test: &'a Expr) {
        let mut valid = true;
        let ty = self.check_expr(test, &mut valid);
        if !ty.is_bool() {
            self.report(DiagnosticKind::TestNotBoolean, test.span);
        }
    }

    fn check_return(&mut self, value: Option<&'a Expr>, span: Span) {
        let Some(expected) = self.ctx.current_return().map(|frame| frame.expected.clone()) else {
            return;
        };

        let (given, valid, at) = match value {
            Some(expr) => {
                let mut valid = true;
                let ty = self.check_expr(expr, &mut valid);
                (ty, valid, expr.span)
            }
            None => (Type::Void, true, span),
        };

        if valid && given != expected {
            self.report(DiagnosticKind::ReturnMismatch { given, expected }, at);
        }

        if let Some(frame) = self.ctx.current_return() {
            frame.has_returned = true;
        }
    }
}

/// Check `program` and collect every diagnostic in report order
pub fn check(program: &Program) -> CompileResult<Vec<Diagnostic>> {
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    SemanticAnalyzer::new(&mut diagnostics).analyze(program)?;
    Ok(diagnostics)
}
