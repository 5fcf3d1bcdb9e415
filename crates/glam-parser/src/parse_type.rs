//! Type annotation parsing.

use glam_lexer::token::TokenKind;
use glam_types::ast::*;
use glam_types::ErrorCode;

use crate::parser::Parser;

impl<'src> Parser<'src> {
    /// Parse a type annotation.
    ///
    /// ```ebnf
    /// Type = Identifier [ "?" ]
    ///      | "(" [ Type { "," Type } ] ")" "->" Type ;
    /// ```
    pub(crate) fn parse_type_annotation(&mut self) -> Option<TypeAnnotation> {
        let start = self.current_span();
        let kind = match self.peek_kind().clone() {
            TokenKind::Identifier(name) => {
                self.advance();
                let optional = self.eat(&TokenKind::Question);
                TypeKind::Named { name, optional }
            }
            // `null` is a keyword in expressions but names a type here.
            TokenKind::Null => {
                self.advance();
                let optional = self.eat(&TokenKind::Question);
                TypeKind::Named {
                    name: "null".to_string(),
                    optional,
                }
            }
            TokenKind::LParen => {
                // Function type: (int, string) -> bool
                self.advance();
                let mut params = Vec::new();
                while !self.check(&TokenKind::RParen) && !self.at_end() {
                    params.push(self.parse_type_annotation()?);
                    if !self.eat_comma() {
                        break;
                    }
                }
                self.expect(&TokenKind::RParen)?;
                self.expect(&TokenKind::Arrow)?;
                let ret = self.parse_type_annotation()?;
                TypeKind::Function {
                    params,
                    ret: Box::new(ret),
                }
            }
            _ => {
                self.error_at_current(
                    ErrorCode::UNEXPECTED_TOKEN,
                    format!("expected type, got '{}'", self.peek_kind()),
                );
                return None;
            }
        };
        let span = start.merge(self.previous_span());
        Some(TypeAnnotation::new(kind, span))
    }
}
