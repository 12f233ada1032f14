//! Recursive descent parser for the shading language

use crate::frontend::ast::*;
use crate::common::{CompileError, CompileResult, Span};
use crate::frontend::lexer::{Lexer, Token, TokenKind};

/// Recursive descent parser
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    /// Span of the most recently consumed token
    previous: Span,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given source
    pub fn new(source: &'a str) -> CompileResult<Self> {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            previous: Span::default(),
        })
    }

    /// Parse a complete program
    pub fn parse(&mut self) -> CompileResult<Program> {
        let mut declarations = Vec::new();

        while !self.at_end() {
            declarations.push(self.parse_external_declaration()?);
        }

        Ok(Program::new(declarations))
    }

    // =========================================================================
    // Helper methods
    // =========================================================================

    fn at_end(&self) -> bool {
        matches!(self.current.kind, TokenKind::Eof)
    }

    fn advance(&mut self) -> CompileResult<Token> {
        let prev = std::mem::replace(&mut self.current, self.lexer.next_token()?);
        self.previous = prev.span;
        Ok(prev)
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current.kind) == std::mem::discriminant(kind)
    }

    fn match_token(&mut self, kind: &TokenKind) -> CompileResult<bool> {
        if self.check(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, kind: TokenKind) -> CompileResult<Token> {
        if self.check(&kind) {
            self.advance()
        } else {
            Err(CompileError::parser(
                format!("expected {}, found {}", kind, self.current.kind),
                self.current.span,
            ))
        }
    }

    fn expect_identifier(&mut self, what: &str) -> CompileResult<Identifier> {
        if let TokenKind::Identifier(name) = &self.current.kind {
            let name = name.clone();
            let token = self.advance()?;
            Ok(Identifier::new(name, token.span))
        } else {
            Err(CompileError::parser(
                format!("expected {}, found {}", what, self.current.kind),
                self.current.span,
            ))
        }
    }

    /// Span from `start` through the last consumed token
    fn span_from(&self, start: Span) -> Span {
        start.merge(self.previous)
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn parse_external_declaration(&mut self) -> CompileResult<Declaration> {
        let start_span = self.current.span;
        let qualifier = self.parse_qualifier()?;
        let ty = self.parse_type_specifier()?;
        let name = self.expect_identifier("declaration name")?;

        if self.check(&TokenKind::LParen) {
            if let Some(qualifier) = qualifier {
                return Err(CompileError::parser(
                    format!("qualifier '{}' is not allowed on a function", qualifier.as_str()),
                    start_span,
                ));
            }
            let func = self.parse_function_rest(name, ty, start_span)?;
            let span = func.span;
            return Ok(Declaration::new(DeclKind::Function(func), span));
        }

        let var = self.parse_variable_rest(name, ty, qualifier, start_span)?;
        let span = var.span;
        Ok(Declaration::new(DeclKind::Variable(var), span))
    }

    fn parse_qualifier(&mut self) -> CompileResult<Option<TypeQualifier>> {
        let qualifier = match self.current.kind {
            TokenKind::In => TypeQualifier::In,
            TokenKind::Out => TypeQualifier::Out,
            TokenKind::Const => TypeQualifier::Const,
            TokenKind::Uniform => TypeQualifier::Uniform,
            _ => return Ok(None),
        };
        self.advance()?;
        Ok(Some(qualifier))
    }

    fn parse_type_specifier(&mut self) -> CompileResult<Type> {
        let ty = match self.current.kind {
            TokenKind::Void => Type::Void,
            TokenKind::Bool => Type::Bool,
            TokenKind::Int => Type::Int,
            TokenKind::Float => Type::Float,
            TokenKind::Vec2 => Type::Vec2,
            TokenKind::Vec3 => Type::Vec3,
            TokenKind::Vec4 => Type::Vec4,
            _ => {
                return Err(CompileError::parser(
                    format!("expected type, found {}", self.current.kind),
                    self.current.span,
                ))
            }
        };
        self.advance()?;
        Ok(ty)
    }

    /// Array suffixes after a declarator name: `[4]`, `[]`
    fn parse_array_suffix(&mut self, mut ty: Type) -> CompileResult<Type> {
        while self.match_token(&TokenKind::LBracket)? {
            if let TokenKind::IntLiteral(_) = &self.current.kind {
                self.advance()?;
            }
            self.expect(TokenKind::RBracket)?;
            ty = Type::array_of(ty);
        }
        Ok(ty)
    }

    /// Everything after `qualifier? type name` of a variable declaration
    fn parse_variable_rest(
        &mut self,
        name: Identifier,
        ty: Type,
        qualifier: Option<TypeQualifier>,
        start_span: Span,
    ) -> CompileResult<VarDecl> {
        let ty = self.parse_array_suffix(ty)?;

        let init = if self.match_token(&TokenKind::Eq)? {
            Some(self.parse_assignment_expression()?)
        } else {
            None
        };

        self.expect(TokenKind::Semi)?;

        let mut var = VarDecl::new(name, ty, self.span_from(start_span));
        if let Some(q) = qualifier {
            var = var.with_qualifier(q);
        }
        if let Some(init) = init {
            var = var.with_init(init);
        }
        Ok(var)
    }

    fn parse_function_rest(
        &mut self,
        name: Identifier,
        return_type: Type,
        start_span: Span,
    ) -> CompileResult<FnDecl> {
        self.expect(TokenKind::LParen)?;
        let params = self.parse_parameter_list()?;
        self.expect(TokenKind::RParen)?;

        let body = self.parse_block()?;
        Ok(FnDecl::new(name, return_type, params, body, self.span_from(start_span)))
    }

    fn parse_parameter_list(&mut self) -> CompileResult<Vec<VarDecl>> {
        let mut params = Vec::new();

        if self.check(&TokenKind::RParen) {
            return Ok(params);
        }

        // `f(void)` declares no parameters
        if self.check(&TokenKind::Void) {
            let void_span = self.current.span;
            self.advance()?;
            if self.check(&TokenKind::RParen) {
                return Ok(params);
            }
            return Err(CompileError::parser("parameter cannot have type 'void'", void_span));
        }

        loop {
            let start_span = self.current.span;
            let qualifier = self.parse_qualifier()?;
            let ty = self.parse_type_specifier()?;
            let name = self.expect_identifier("parameter name")?;
            let ty = self.parse_array_suffix(ty)?;

            let mut param = VarDecl::new(name, ty, self.span_from(start_span));
            if let Some(q) = qualifier {
                param = param.with_qualifier(q);
            }
            params.push(param);

            if !self.match_token(&TokenKind::Comma)? {
                break;
            }
        }

        Ok(params)
    }

    fn parse_local_declaration(&mut self) -> CompileResult<Declaration> {
        let start_span = self.current.span;
        let qualifier = self.parse_qualifier()?;
        let ty = self.parse_type_specifier()?;
        let name = self.expect_identifier("variable name")?;

        if self.check(&TokenKind::LParen) {
            return Err(CompileError::parser(
                "function definitions are only allowed at file scope",
                self.current.span,
            ));
        }

        let var = self.parse_variable_rest(name, ty, qualifier, start_span)?;
        let span = var.span;
        Ok(Declaration::new(DeclKind::Variable(var), span))
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn parse_statement(&mut self) -> CompileResult<Stmt> {
        let start_span = self.current.span;

        match &self.current.kind {
            TokenKind::LBrace => {
                let block = self.parse_block()?;
                let span = block.span;
                Ok(Stmt::new(StmtKind::Block(block), span))
            }

            TokenKind::If => self.parse_if_statement(),
            TokenKind::While => self.parse_while_statement(),
            TokenKind::For => self.parse_for_statement(),
            TokenKind::Switch => self.parse_switch_statement(),
            TokenKind::Break => self.parse_break_statement(),
            TokenKind::Continue => self.parse_continue_statement(),
            TokenKind::Return => self.parse_return_statement(),

            TokenKind::Case | TokenKind::Default => Err(CompileError::parser(
                format!("{} label outside switch", self.current.kind),
                start_span,
            )),

            TokenKind::Semi => {
                self.advance()?;
                Ok(Stmt::new(StmtKind::Empty, start_span))
            }

            // Declaration in block
            _ if self.current.kind.can_start_declaration() => {
                let decl = self.parse_local_declaration()?;
                let span = decl.span;
                Ok(Stmt::new(StmtKind::Declaration(decl), span))
            }

            // Expression statement
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_block(&mut self) -> CompileResult<Block> {
        let start_span = self.current.span;
        self.expect(TokenKind::LBrace)?;

        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            stmts.push(self.parse_statement()?);
        }

        self.expect(TokenKind::RBrace)?;
        Ok(Block::new(stmts, self.span_from(start_span)))
    }

    fn parse_if_statement(&mut self) -> CompileResult<Stmt> {
        let start_span = self.current.span;
        self.expect(TokenKind::If)?;
        self.expect(TokenKind::LParen)?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;

        let then_branch = Box::new(self.parse_statement()?);

        let else_branch = if self.match_token(&TokenKind::Else)? {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };

        Ok(Stmt::new(
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            },
            self.span_from(start_span),
        ))
    }

    fn parse_while_statement(&mut self) -> CompileResult<Stmt> {
        let start_span = self.current.span;
        self.expect(TokenKind::While)?;
        self.expect(TokenKind::LParen)?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;

        let body = Box::new(self.parse_statement()?);

        Ok(Stmt::new(StmtKind::While { condition, body }, self.span_from(start_span)))
    }

    fn parse_for_statement(&mut self) -> CompileResult<Stmt> {
        let start_span = self.current.span;
        self.expect(TokenKind::For)?;
        self.expect(TokenKind::LParen)?;

        // Init
        let init = if self.check(&TokenKind::Semi) {
            self.advance()?;
            None
        } else if self.current.kind.can_start_declaration() {
            let decl = self.parse_local_declaration()?;
            let span = decl.span;
            Some(Box::new(Stmt::new(StmtKind::Declaration(decl), span)))
        } else {
            Some(Box::new(self.parse_expression_statement()?))
        };

        // Condition
        let condition = if self.check(&TokenKind::Semi) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(TokenKind::Semi)?;

        // Step
        let step = if self.check(&TokenKind::RParen) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(TokenKind::RParen)?;

        let body = Box::new(self.parse_statement()?);

        Ok(Stmt::new(
            StmtKind::For {
                init,
                condition,
                step,
                body,
            },
            self.span_from(start_span),
        ))
    }

    fn parse_switch_statement(&mut self) -> CompileResult<Stmt> {
        let start_span = self.current.span;
        self.expect(TokenKind::Switch)?;
        self.expect(TokenKind::LParen)?;
        let expr = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::LBrace)?;

        let mut cases = Vec::new();
        let mut default = None;

        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            let case_span = self.current.span;
            let label = match &self.current.kind {
                TokenKind::Case => {
                    self.advance()?;
                    let label = self.parse_conditional_expression()?;
                    self.expect(TokenKind::Colon)?;
                    Some(label)
                }
                TokenKind::Default => {
                    self.advance()?;
                    self.expect(TokenKind::Colon)?;
                    None
                }
                _ => {
                    return Err(CompileError::parser(
                        format!("expected 'case' or 'default', found {}", self.current.kind),
                        case_span,
                    ))
                }
            };

            let mut body = Vec::new();
            while !self.check(&TokenKind::Case)
                && !self.check(&TokenKind::Default)
                && !self.check(&TokenKind::RBrace)
                && !self.at_end()
            {
                body.push(self.parse_statement()?);
            }

            let arm = SwitchCase::new(label, body, self.span_from(case_span));
            if arm.label.is_some() {
                cases.push(arm);
            } else if default.is_some() {
                return Err(CompileError::parser("multiple default labels in one switch", case_span));
            } else {
                default = Some(arm);
            }
        }

        self.expect(TokenKind::RBrace)?;

        Ok(Stmt::new(
            StmtKind::Switch { expr, cases, default },
            self.span_from(start_span),
        ))
    }

    fn parse_break_statement(&mut self) -> CompileResult<Stmt> {
        let start_span = self.current.span;
        self.expect(TokenKind::Break)?;
        self.expect(TokenKind::Semi)?;
        Ok(Stmt::new(StmtKind::Break, self.span_from(start_span)))
    }

    fn parse_continue_statement(&mut self) -> CompileResult<Stmt> {
        let start_span = self.current.span;
        self.expect(TokenKind::Continue)?;
        self.expect(TokenKind::Semi)?;
        Ok(Stmt::new(StmtKind::Continue, self.span_from(start_span)))
    }

    fn parse_return_statement(&mut self) -> CompileResult<Stmt> {
        let start_span = self.current.span;
        self.expect(TokenKind::Return)?;

        let value = if self.check(&TokenKind::Semi) {
            None
        } else {
            Some(self.parse_expression()?)
        };

        self.expect(TokenKind::Semi)?;
        Ok(Stmt::new(StmtKind::Return(value), self.span_from(start_span)))
    }

    fn parse_expression_statement(&mut self) -> CompileResult<Stmt> {
        let start_span = self.current.span;
        let expr = self.parse_expression()?;
        self.expect(TokenKind::Semi)?;
        Ok(Stmt::new(StmtKind::Expr(expr), self.span_from(start_span)))
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn parse_expression(&mut self) -> CompileResult<Expr> {
        self.parse_assignment_expression()
    }

    fn parse_assignment_expression(&mut self) -> CompileResult<Expr> {
        let start_span = self.current.span;
        let left = self.parse_conditional_expression()?;

        if let Some(op) = self.get_assignment_op() {
            self.advance()?;
            let right = self.parse_assignment_expression()?;
            let span = start_span.merge(right.span);

            return Ok(Expr::new(
                ExprKind::Assign {
                    op,
                    target: Box::new(left),
                    value: Box::new(right),
                },
                span,
            ));
        }

        Ok(left)
    }

    fn get_assignment_op(&self) -> Option<AssignOp> {
        match &self.current.kind {
            TokenKind::Eq => Some(AssignOp::Assign),
            TokenKind::PlusEq => Some(AssignOp::AddAssign),
            TokenKind::MinusEq => Some(AssignOp::SubAssign),
            TokenKind::StarEq => Some(AssignOp::MulAssign),
            TokenKind::SlashEq => Some(AssignOp::DivAssign),
            _ => None,
        }
    }

    fn parse_conditional_expression(&mut self) -> CompileResult<Expr> {
        let start_span = self.current.span;
        let condition = self.parse_logical_or_expression()?;

        if self.match_token(&TokenKind::Question)? {
            let then_expr = self.parse_expression()?;
            self.expect(TokenKind::Colon)?;
            let else_expr = self.parse_conditional_expression()?;
            let span = start_span.merge(else_expr.span);

            return Ok(Expr::new(
                ExprKind::Conditional {
                    condition: Box::new(condition),
                    then_expr: Box::new(then_expr),
                    else_expr: Box::new(else_expr),
                },
                span,
            ));
        }

        Ok(condition)
    }

    /// One left-associative precedence level over `next`
    fn parse_binary_level(
        &mut self,
        operator: fn(&TokenKind) -> Option<BinaryOp>,
        next: fn(&mut Self) -> CompileResult<Expr>,
    ) -> CompileResult<Expr> {
        let mut left = next(self)?;

        while let Some(op) = operator(&self.current.kind) {
            self.advance()?;
            let right = next(self)?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }

        Ok(left)
    }

    fn parse_logical_or_expression(&mut self) -> CompileResult<Expr> {
        self.parse_binary_level(
            |kind| matches!(kind, TokenKind::PipePipe).then_some(BinaryOp::Or),
            Self::parse_logical_and_expression,
        )
    }

    fn parse_logical_and_expression(&mut self) -> CompileResult<Expr> {
        self.parse_binary_level(
            |kind| matches!(kind, TokenKind::AmpAmp).then_some(BinaryOp::And),
            Self::parse_equality_expression,
        )
    }

    fn parse_equality_expression(&mut self) -> CompileResult<Expr> {
        self.parse_binary_level(
            |kind| match kind {
                TokenKind::EqEq => Some(BinaryOp::Eq),
                TokenKind::NotEq => Some(BinaryOp::Ne),
                _ => None,
            },
            Self::parse_relational_expression,
        )
    }

    fn parse_relational_expression(&mut self) -> CompileResult<Expr> {
        self.parse_binary_level(
            |kind| match kind {
                TokenKind::Lt => Some(BinaryOp::Lt),
                TokenKind::Gt => Some(BinaryOp::Gt),
                TokenKind::LtEq => Some(BinaryOp::Le),
                TokenKind::GtEq => Some(BinaryOp::Ge),
                _ => None,
            },
            Self::parse_additive_expression,
        )
    }

    fn parse_additive_expression(&mut self) -> CompileResult<Expr> {
        self.parse_binary_level(
            |kind| match kind {
                TokenKind::Plus => Some(BinaryOp::Add),
                TokenKind::Minus => Some(BinaryOp::Sub),
                _ => None,
            },
            Self::parse_multiplicative_expression,
        )
    }

    fn parse_multiplicative_expression(&mut self) -> CompileResult<Expr> {
        self.parse_binary_level(
            |kind| match kind {
                TokenKind::Star => Some(BinaryOp::Mul),
                TokenKind::Slash => Some(BinaryOp::Div),
                TokenKind::Percent => Some(BinaryOp::Mod),
                _ => None,
            },
            Self::parse_unary_expression,
        )
    }

    fn parse_unary_expression(&mut self) -> CompileResult<Expr> {
        let start_span = self.current.span;

        let op = match &self.current.kind {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Plus => UnaryOp::Plus,
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::PlusPlus => UnaryOp::PreInc,
            TokenKind::MinusMinus => UnaryOp::PreDec,
            _ => return self.parse_postfix_expression(),
        };

        self.advance()?;
        let operand = self.parse_unary_expression()?;
        let span = start_span.merge(operand.span);
        Ok(Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        ))
    }

    fn parse_postfix_expression(&mut self) -> CompileResult<Expr> {
        let mut expr = self.parse_primary_expression()?;

        loop {
            let start_span = expr.span;
            match &self.current.kind {
                TokenKind::LBracket => {
                    self.advance()?;
                    let index = self.parse_expression()?;
                    self.expect(TokenKind::RBracket)?;
                    expr = Expr::new(
                        ExprKind::Index {
                            base: Box::new(expr),
                            index: Box::new(index),
                        },
                        self.span_from(start_span),
                    );
                }
                TokenKind::LParen => {
                    let callee = match expr.kind {
                        ExprKind::Var(id) => id,
                        _ => {
                            return Err(CompileError::parser(
                                "only named functions can be called",
                                self.current.span,
                            ))
                        }
                    };
                    self.advance()?;
                    let args = self.parse_argument_list()?;
                    self.expect(TokenKind::RParen)?;
                    expr = Expr::new(ExprKind::Call { callee, args }, self.span_from(start_span));
                }
                TokenKind::Dot => {
                    self.advance()?;
                    let field = self.expect_identifier("field name")?;
                    expr = Expr::new(
                        ExprKind::Field {
                            base: Box::new(expr),
                            field,
                        },
                        self.span_from(start_span),
                    );
                }
                TokenKind::PlusPlus | TokenKind::MinusMinus => {
                    let op = if self.check(&TokenKind::PlusPlus) {
                        PostfixOp::Inc
                    } else {
                        PostfixOp::Dec
                    };
                    self.advance()?;
                    expr = Expr::new(
                        ExprKind::Postfix {
                            op,
                            operand: Box::new(expr),
                        },
                        self.span_from(start_span),
                    );
                }
                _ => break,
            }
        }

        Ok(expr)
    }

    fn parse_argument_list(&mut self) -> CompileResult<Vec<Expr>> {
        let mut args = Vec::new();

        if self.check(&TokenKind::RParen) {
            return Ok(args);
        }

        loop {
            args.push(self.parse_assignment_expression()?);
            if !self.match_token(&TokenKind::Comma)? {
                break;
            }
        }

        Ok(args)
    }

    fn parse_primary_expression(&mut self) -> CompileResult<Expr> {
        let span = self.current.span;

        match &self.current.kind {
            TokenKind::IntLiteral(s) => {
                let value = s.parse().map_err(|_| {
                    CompileError::parser(format!("invalid integer literal: {}", s), span)
                })?;
                self.advance()?;
                Ok(Expr::new(ExprKind::IntConst(value), span))
            }
            TokenKind::FloatLiteral(s) => {
                let value = s.parse().map_err(|_| {
                    CompileError::parser(format!("invalid float literal: {}", s), span)
                })?;
                self.advance()?;
                Ok(Expr::new(ExprKind::FloatConst(value), span))
            }
            TokenKind::True => {
                self.advance()?;
                Ok(Expr::new(ExprKind::BoolConst(true), span))
            }
            TokenKind::False => {
                self.advance()?;
                Ok(Expr::new(ExprKind::BoolConst(false), span))
            }
            TokenKind::Identifier(name) => {
                let name = name.clone();
                self.advance()?;
                Ok(Expr::new(ExprKind::Var(Identifier::new(name, span)), span))
            }
            TokenKind::LParen => {
                self.advance()?;
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }
            _ => Err(CompileError::parser(
                format!("unexpected token in expression: {}", self.current.kind),
                span,
            )),
        }
    }
}
