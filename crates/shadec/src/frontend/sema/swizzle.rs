//! Vector component access (`v.xyz`)

use super::analyzer::SemanticAnalyzer;
use super::diagnostic::DiagnosticKind;
use crate::frontend::ast::{Expr, Identifier, Type};

/// A well-formed component selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swizzle {
    /// Number of selected components
    pub len: usize,
    /// Smallest vector arity that has every selected component
    pub min_arity: usize,
}

impl Swizzle {
    /// Parse a field name. `None` if any character is not one of `xyzw`.
    pub fn parse(field: &str) -> Option<Self> {
        let mut min_arity = 0;
        let mut len = 0;
        for c in field.chars() {
            let needed = match c {
                'x' | 'y' => 2,
                'z' => 3,
                'w' => 4,
                _ => return None,
            };
            min_arity = min_arity.max(needed);
            len += 1;
        }
        Some(Self { len, min_arity })
    }
}

impl<'a> SemanticAnalyzer<'a, '_> {
    pub(super) fn check_swizzle(
        &mut self,
        base: &'a Expr,
        field: &Identifier,
        valid: &mut bool,
    ) -> Type {
        let base_ty = self.check_expr(base, valid);

        let Some(swizzle) = Swizzle::parse(field.as_str()) else {
            return self.fail(
                DiagnosticKind::InvalidSwizzle {
                    field: field.name.clone(),
                },
                field.span,
                valid,
            );
        };

        let Some(arity) = base_ty.components() else {
            return self.fail(
                DiagnosticKind::InaccessibleSwizzle {
                    field: field.name.clone(),
                    base: base_ty,
                },
                field.span,
                valid,
            );
        };

        if swizzle.min_arity > arity {
            return self.fail(
                DiagnosticKind::SwizzleOutOfBound {
                    field: field.name.clone(),
                    base: base_ty,
                },
                field.span,
                valid,
            );
        }

        match Type::swizzle_result(swizzle.len) {
            Some(ty) => ty,
            None => self.fail(
                DiagnosticKind::OversizedVector {
                    field: field.name.clone(),
                },
                field.span,
                valid,
            ),
        }
    }
}
