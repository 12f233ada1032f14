//! Expression type checking
//!
//! Every check returns a type, `Type::Error` on failure. The `valid` flag is
//! shared across one expression tree: once a check fails it is cleared and
//! later failures in the same tree stay silent.

use super::analyzer::SemanticAnalyzer;
use super::diagnostic::{DiagnosticKind, LookupReason};
use super::scope::ScopePolicy;
use crate::common::Span;
use crate::frontend::ast::*;

impl<'a> SemanticAnalyzer<'a, '_> {
    pub(super) fn check_expr(&mut self, expr: &'a Expr, valid: &mut bool) -> Type {
        match &expr.kind {
            ExprKind::IntConst(_) => Type::Int,
            ExprKind::FloatConst(_) => Type::Float,
            ExprKind::BoolConst(_) => Type::Bool,

            ExprKind::Var(id) => self.check_var(id, valid),

            ExprKind::Assign { op, target, value } => {
                self.check_matching(op.as_str(), target, value, expr.span, valid)
            }

            ExprKind::Unary { op, operand } => {
                let ty = self.check_expr(operand, valid);
                match op {
                    UnaryOp::Not if !ty.is_bool() => self.fail(
                        DiagnosticKind::IncompatibleOperand { op: op.as_str(), operand: ty },
                        expr.span,
                        valid,
                    ),
                    UnaryOp::Not => Type::Bool,
                    _ if ty.is_bool() => self.fail(
                        DiagnosticKind::IncompatibleOperand { op: op.as_str(), operand: ty },
                        expr.span,
                        valid,
                    ),
                    _ => ty,
                }
            }

            ExprKind::Binary { op, left, right } => {
                self.check_binary(*op, left, right, expr.span, valid)
            }

            ExprKind::Postfix { op, operand } => {
                let ty = self.check_expr(operand, valid);
                if ty.is_numeric() {
                    ty
                } else {
                    self.fail(
                        DiagnosticKind::IncompatibleOperand { op: op.as_str(), operand: ty },
                        expr.span,
                        valid,
                    )
                }
            }

            ExprKind::Conditional {
                condition,
                then_expr,
                else_expr,
            } => {
                let condition_ty = self.check_expr(condition, valid);
                let then_ty = self.check_expr(then_expr, valid);
                let else_ty = self.check_expr(else_expr, valid);

                if !condition_ty.is_bool() {
                    self.fail(DiagnosticKind::TestNotBoolean, condition.span, valid)
                } else if then_ty != else_ty {
                    self.fail(
                        DiagnosticKind::IncompatibleOperands {
                            op: "?:",
                            left: then_ty,
                            right: else_ty,
                        },
                        expr.span,
                        valid,
                    )
                } else {
                    then_ty
                }
            }

            ExprKind::Index { base, index } => self.check_index(base, index, valid),

            ExprKind::Call { callee, args } => self.check_call(callee, args, valid),

            ExprKind::Field { base, field } => self.check_swizzle(base, field, valid),
        }
    }

    /// Report `kind` unless the tree already failed, then fail this node
    pub(super) fn fail(&mut self, kind: DiagnosticKind, span: Span, valid: &mut bool) -> Type {
        if *valid {
            self.report(kind, span);
        }
        *valid = false;
        Type::Error
    }

    fn check_var(&mut self, id: &Identifier, valid: &mut bool) -> Type {
        match self.ctx.symbols.find(id.as_str(), ScopePolicy::Enclosing) {
            None => self.fail(
                DiagnosticKind::IdentifierNotDeclared {
                    name: id.name.clone(),
                    reason: LookupReason::Variable,
                },
                id.span,
                valid,
            ),
            // A function name in value position has no type
            Some(symbol) => symbol.variable_type().cloned().unwrap_or(Type::Error),
        }
    }

    /// Both sides must have the same type, which is the result
    fn check_matching(
        &mut self,
        op: &'static str,
        left: &'a Expr,
        right: &'a Expr,
        span: Span,
        valid: &mut bool,
    ) -> Type {
        let left_ty = self.check_expr(left, valid);
        let right_ty = self.check_expr(right, valid);

        if left_ty == right_ty {
            left_ty
        } else {
            self.fail(
                DiagnosticKind::IncompatibleOperands {
                    op,
                    left: left_ty,
                    right: right_ty,
                },
                span,
                valid,
            )
        }
    }

    fn check_binary(
        &mut self,
        op: BinaryOp,
        left: &'a Expr,
        right: &'a Expr,
        span: Span,
        valid: &mut bool,
    ) -> Type {
        if !(op.is_logical() || op.is_equality() || op.is_relational()) {
            return self.check_matching(op.as_str(), left, right, span, valid);
        }

        let left_ty = self.check_expr(left, valid);
        let right_ty = self.check_expr(right, valid);

        let accepted = if op.is_logical() {
            left_ty.is_bool() && right_ty.is_bool()
        } else {
            left_ty == right_ty
        };

        if accepted {
            Type::Bool
        } else {
            self.fail(
                DiagnosticKind::IncompatibleOperands {
                    op: op.as_str(),
                    left: left_ty,
                    right: right_ty,
                },
                span,
                valid,
            )
        }
    }

    fn check_index(&mut self, base: &'a Expr, index: &'a Expr, valid: &mut bool) -> Type {
        let base_ty = self.check_expr(base, valid);
        let mut index_valid = true;
        self.check_expr(index, &mut index_valid);

        match base_ty.element() {
            Some(element) => element.clone(),
            // Subscripting a non-array variable fails without a report
            None if base.as_var().is_some() => Type::Error,
            None => self.fail(DiagnosticKind::NotAnArray, base.span, valid),
        }
    }

    fn check_call(&mut self, callee: &Identifier, args: &'a [Expr], valid: &mut bool) -> Type {
        let Some(symbol) = self.ctx.symbols.find(callee.as_str(), ScopePolicy::Enclosing) else {
            return Type::Error;
        };

        let Some(func) = symbol.as_function() else {
            self.report(
                DiagnosticKind::NotAFunction {
                    name: callee.name.clone(),
                },
                callee.span,
            );
            *valid = false;
            return Type::Error;
        };

        let expected = func.params.len();
        let given = args.len();
        if given < expected {
            return self.fail(
                DiagnosticKind::LessFormals {
                    name: callee.name.clone(),
                    expected,
                    given,
                },
                callee.span,
                valid,
            );
        }
        if given > expected {
            return self.fail(
                DiagnosticKind::ExtraFormals {
                    name: callee.name.clone(),
                    expected,
                    given,
                },
                callee.span,
                valid,
            );
        }

        // Each argument gets its own flag, so a failed argument still
        // mismatches its formal here.
        for (index, (arg, param)) in args.iter().zip(&func.params).enumerate() {
            let mut arg_valid = true;
            let arg_ty = self.check_expr(arg, &mut arg_valid);
            if arg_ty != param.ty {
                return self.fail(
                    DiagnosticKind::FormalsTypeMismatch {
                        name: callee.name.clone(),
                        index,
                        expected: param.ty.clone(),
                        given: arg_ty,
                    },
                    arg.span,
                    valid,
                );
            }
        }

        func.return_type.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::sema::check;
    use crate::frontend::parser::Parser;

    fn diagnose(source: &str) -> Vec<DiagnosticKind> {
        let program = Parser::new(source).unwrap().parse().unwrap();
        check(&program).unwrap().into_iter().map(|d| d.kind).collect()
    }

    #[test]
    fn test_undeclared_variable() {
        let kinds = diagnose("void f() { speed = 1; }");
        assert!(matches!(
            &kinds[..],
            [DiagnosticKind::IdentifierNotDeclared { name, reason: LookupReason::Variable }]
                if name == "speed"
        ));
    }

    #[test]
    fn test_failure_suppresses_cascade() {
        // The undeclared name clears the flag, so the mismatch on `+` stays quiet
        let kinds = diagnose("void f() { int x; x = missing + true; }");
        assert_eq!(kinds.len(), 1);
        assert!(matches!(kinds[0], DiagnosticKind::IdentifierNotDeclared { .. }));
    }

    #[test]
    fn test_arithmetic_operands() {
        let kinds = diagnose("void f(int a, bool b) { a + b; a * a; }");
        assert!(matches!(
            &kinds[..],
            [DiagnosticKind::IncompatibleOperands { op: "+", left: Type::Int, right: Type::Bool }]
        ));
    }

    #[test]
    fn test_logical_operands() {
        let kinds = diagnose("void f(int a, bool b) { b && b; a || b; }");
        assert!(matches!(
            &kinds[..],
            [DiagnosticKind::IncompatibleOperands { op: "||", .. }]
        ));
    }

    #[test]
    fn test_comparisons_yield_bool() {
        let kinds = diagnose("void f(float a) { bool b = a < 1.0; bool c = a == 2.0; bool d = a != 1; }");
        assert!(matches!(
            &kinds[..],
            [DiagnosticKind::IncompatibleOperands { op: "!=", left: Type::Float, right: Type::Int }]
        ));
    }

    #[test]
    fn test_unary_operands() {
        let kinds = diagnose("void f(bool b, int n) { -b; !n; !b; -n; }");
        assert_eq!(
            kinds,
            vec![
                DiagnosticKind::IncompatibleOperand { op: "-", operand: Type::Bool },
                DiagnosticKind::IncompatibleOperand { op: "!", operand: Type::Int },
            ]
        );
    }

    #[test]
    fn test_postfix_requires_numeric() {
        let kinds = diagnose("void f(vec2 v, int n) { n++; v--; }");
        assert_eq!(
            kinds,
            vec![DiagnosticKind::IncompatibleOperand { op: "--", operand: Type::Vec2 }]
        );
    }

    #[test]
    fn test_assignment_mismatch() {
        let kinds = diagnose("void f(int n) { n = 1.0; n += 2; }");
        assert!(matches!(
            &kinds[..],
            [DiagnosticKind::IncompatibleOperands { op: "=", left: Type::Int, right: Type::Float }]
        ));
    }

    #[test]
    fn test_conditional() {
        let kinds = diagnose("void f(bool b, int n) { int a = b ? n : 1; n ? 1 : 2; b ? 1 : 2.0; }");
        assert_eq!(
            kinds,
            vec![
                DiagnosticKind::TestNotBoolean,
                DiagnosticKind::IncompatibleOperands {
                    op: "?:",
                    left: Type::Int,
                    right: Type::Float,
                },
            ]
        );
    }

    #[test]
    fn test_array_access() {
        assert!(diagnose("float f(float w[4], int i) { return w[i]; }").is_empty());
    }

    #[test]
    fn test_subscript_of_plain_variable_is_silent() {
        assert!(diagnose("void f(int n) { n[0]; }").is_empty());
    }

    #[test]
    fn test_subscript_of_non_variable() {
        let kinds = diagnose("int g() { return 1; } void f() { g()[0]; }");
        assert_eq!(kinds, vec![DiagnosticKind::NotAnArray]);
    }

    #[test]
    fn test_call_arity() {
        let kinds = diagnose(
            "float mix(float a, float b) { return a; } void f() { mix(1.0); mix(1.0, 2.0, 3.0); }",
        );
        assert!(matches!(
            &kinds[..],
            [
                DiagnosticKind::LessFormals { expected: 2, given: 1, .. },
                DiagnosticKind::ExtraFormals { expected: 2, given: 3, .. },
            ]
        ));
    }

    #[test]
    fn test_call_argument_type() {
        let kinds = diagnose(
            "float mix(float a, float b) { return a; } void f() { mix(1.0, true); mix(1, false); }",
        );
        assert!(matches!(
            &kinds[..],
            [
                DiagnosticKind::FormalsTypeMismatch { index: 1, expected: Type::Float, given: Type::Bool, .. },
                DiagnosticKind::FormalsTypeMismatch { index: 0, given: Type::Int, .. },
            ]
        ));
    }

    #[test]
    fn test_failed_argument_still_mismatches_formal() {
        let kinds = diagnose("void g(int a) { } void f() { g(missing); }");
        assert!(matches!(
            &kinds[..],
            [
                DiagnosticKind::IdentifierNotDeclared { name, .. },
                DiagnosticKind::FormalsTypeMismatch { index: 0, expected: Type::Int, given: Type::Error, .. },
            ] if name == "missing"
        ));
    }

    #[test]
    fn test_call_returns_function_type() {
        let kinds = diagnose("vec3 up() { return up(); } void f() { float x = up(); }");
        assert!(matches!(
            &kinds[..],
            [DiagnosticKind::InvalidInitialization { expected: Type::Float, given: Type::Vec3, .. }]
        ));
    }

    #[test]
    fn test_call_of_unknown_name_is_silent() {
        assert!(diagnose("void f() { nowhere(1, 2); }").is_empty());
    }

    #[test]
    fn test_call_of_variable() {
        let kinds = diagnose("void f(int n) { n(); }");
        assert!(matches!(&kinds[..], [DiagnosticKind::NotAFunction { name }] if name == "n"));
    }
}
