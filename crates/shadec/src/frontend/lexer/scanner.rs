//! Token stream over shader source, backed by the logos-generated matcher

use super::token::{Token, TokenKind};
use crate::common::{CompileError, CompileResult, Span};
use logos::{Logos, SpannedIter};

/// Pull-based lexer. Yields `Eof` once the input runs out.
pub struct Lexer<'a> {
    source: &'a str,
    matches: SpannedIter<'a, TokenKind>,
    exhausted: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            matches: TokenKind::lexer(source).spanned(),
            exhausted: false,
        }
    }

    /// Next token, or `Eof` on every call after the last one
    pub fn next_token(&mut self) -> CompileResult<Token> {
        let next = if self.exhausted { None } else { self.matches.next() };

        match next {
            Some((Ok(kind), range)) => Ok(Token::new(kind, range.into())),
            Some((Err(()), range)) => Err(self.rejected(range.into())),
            None => {
                self.exhausted = true;
                Ok(self.eof())
            }
        }
    }

    /// Every token up to and including `Eof`
    pub fn tokenize_all(self) -> CompileResult<Vec<Token>> {
        self.collect()
    }

    fn eof(&self) -> Token {
        let end = self.source.len();
        Token::new(TokenKind::Eof, Span::new(end, end))
    }

    /// Describe text no token rule accepts
    fn rejected(&self, span: Span) -> CompileError {
        let text = self.source.get(span.start..span.end).unwrap_or_default();
        let first = self.source.get(span.start..).and_then(|rest| rest.chars().next());
        let message = match first {
            Some(c) if c.is_ascii_digit() => {
                format!("malformed numeric literal '{}'", text)
            }
            Some('"') | Some('\'') => {
                "the shading language has no string or character literals".to_string()
            }
            Some(c) if !c.is_ascii() => format!("non-ASCII character '{}' in shader source", c),
            _ => format!("'{}' is not valid in shader source", text),
        };
        CompileError::lexer(message, span)
    }
}

impl Iterator for Lexer<'_> {
    type Item = CompileResult<Token>;

    /// Yields `Eof` once, then ends
    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        Some(self.next_token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords() {
        let source = "void bool int float vec2 vec3 vec4 return if else while for switch";
        let mut lexer = Lexer::new(source);

        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Void));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Bool));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Int));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Float));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Vec2));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Vec3));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Vec4));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Return));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::If));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Else));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::While));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::For));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Switch));
    }

    #[test]
    fn test_identifiers_are_not_keywords() {
        let source = "vec5 inner output trueish _tmp";
        let tokens = Lexer::new(source).tokenize_all().unwrap();

        let names: Vec<_> = tokens
            .iter()
            .filter_map(|t| match &t.kind {
                TokenKind::Identifier(s) => Some(s.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(names, ["vec5", "inner", "output", "trueish", "_tmp"]);
    }

    #[test]
    fn test_literals() {
        let source = "42 1.5 .25 2e3 true false";
        let mut lexer = Lexer::new(source);

        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::IntLiteral(s) if s == "42"
        ));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::FloatLiteral(s) if s == "1.5"
        ));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::FloatLiteral(s) if s == ".25"
        ));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::FloatLiteral(s) if s == "2e3"
        ));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::True));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::False));
    }

    #[test]
    fn test_operators() {
        let source = "+ - * / == != < > <= >= && || ! ++ -- += ?";
        let mut lexer = Lexer::new(source);

        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Plus));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Minus));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Star));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Slash));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::EqEq));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::NotEq));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Lt));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Gt));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::LtEq));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::GtEq));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::AmpAmp));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::PipePipe));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Bang));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::PlusPlus));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::MinusMinus));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::PlusEq));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Question));
    }

    #[test]
    fn test_comments() {
        let source = "int // line comment\nx /* block */ y";
        let mut lexer = Lexer::new(source);

        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Int));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::Identifier(s) if s == "x"
        ));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::Identifier(s) if s == "y"
        ));
    }

    #[test]
    fn test_swizzle_tokens() {
        let tokens = Lexer::new("pos.xyz").tokenize_all().unwrap();

        assert!(matches!(&tokens[0].kind, TokenKind::Identifier(s) if s == "pos"));
        assert!(matches!(tokens[1].kind, TokenKind::Dot));
        assert!(matches!(&tokens[2].kind, TokenKind::Identifier(s) if s == "xyz"));
        assert!(matches!(tokens[3].kind, TokenKind::Eof));
        assert_eq!(tokens[2].span, Span::new(4, 7));
    }

    #[test]
    fn test_invalid_character() {
        let mut lexer = Lexer::new("int @");
        assert!(lexer.next_token().is_ok());
        let err = lexer.next_token().unwrap_err();
        assert!(matches!(
            err,
            CompileError::Lexer { message, span }
                if span == Span::new(4, 5) && message == "'@' is not valid in shader source"
        ));
    }

    #[test]
    fn test_string_literal_rejected() {
        let err = Lexer::new("x = \"red\";").tokenize_all().unwrap_err();
        assert!(matches!(
            err,
            CompileError::Lexer { message, span }
                if span.start == 4 && message.contains("no string or character literals")
        ));
    }

    #[test]
    fn test_non_ascii_character() {
        let err = Lexer::new("float \u{3b1};").tokenize_all().unwrap_err();
        assert!(matches!(
            err,
            CompileError::Lexer { message, .. } if message.starts_with("non-ASCII character")
        ));
    }

    #[test]
    fn test_eof_repeats_but_iterator_ends() {
        let mut lexer = Lexer::new("x");
        lexer.next_token().unwrap();
        assert_eq!(lexer.next_token().unwrap().span, Span::new(1, 1));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Eof));
        assert!(lexer.next().is_none());

        let kinds: Vec<_> = Lexer::new("a b").map(|t| t.unwrap().kind).collect();
        assert_eq!(kinds.len(), 3);
        assert!(matches!(kinds[2], TokenKind::Eof));
    }
}
