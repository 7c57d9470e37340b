//! Recursive-descent parser for Goose statements.
//!
//! Grammar (precedence low to high, both binary levels left-associative):
//!
//! ```text
//! statement := Identifier '=' expr | expr      (optionally followed by ';')
//! expr      := term (('+' | '-') term)*
//! term      := factor (('*' | '/') factor)*
//! factor    := Number | StringLiteral | Identifier | '(' expr ')'
//! ```

use std::iter::Peekable;

use tracing::debug;

use crate::{
    ast::{BinOp, Expr, Stmt},
    error::SyntaxError,
    lexer::{Token, TokenKind},
};

/// Parse one complete statement from a token stream.
pub fn parse<T>(tokens: T) -> Result<Stmt, SyntaxError>
where
    T: IntoIterator<Item = Token>,
{
    let stmt = Parser::new(tokens).parse()?;
    debug!(?stmt, "parsed statement");
    Ok(stmt)
}

/// Token cursor with one token of lookahead.
///
/// A stream that runs dry without an explicit end marker is treated as if it
/// ended with [`TokenKind::EndOfInput`].
pub struct Parser<I: Iterator<Item = Token>> {
    tokens: Peekable<I>,
    eof: Token,
}

impl<I: Iterator<Item = Token>> Parser<I> {
    pub fn new<T>(tokens: T) -> Self
    where
        T: IntoIterator<Item = Token, IntoIter = I>,
    {
        Self {
            tokens: tokens.into_iter().peekable(),
            eof: Token::new(TokenKind::EndOfInput, 0),
        }
    }

    /// Parse a statement and require that nothing but an optional `;`
    /// follows it.
    pub fn parse(&mut self) -> Result<Stmt, SyntaxError> {
        let stmt = self.parse_statement()?;
        self.eat(&TokenKind::Semicolon);
        self.expect(&TokenKind::EndOfInput, "end of input")?;
        Ok(stmt)
    }

    pub fn parse_statement(&mut self) -> Result<Stmt, SyntaxError> {
        if !matches!(self.peek().kind, TokenKind::Identifier(_)) {
            return Ok(Stmt::Expr(self.parse_expression()?));
        }
        let name = match self.advance().kind {
            TokenKind::Identifier(name) => name,
            _ => unreachable!("peeked an identifier"),
        };
        if self.eat(&TokenKind::Assign) {
            let value = self.parse_expression()?;
            return Ok(Stmt::Assign { name, value });
        }
        // not an assignment: the identifier is the first factor
        let expr = self.parse_expression_from(Expr::Var(name))?;
        Ok(Stmt::Expr(expr))
    }

    pub fn parse_expression(&mut self) -> Result<Expr, SyntaxError> {
        let first = self.parse_factor()?;
        self.parse_expression_from(first)
    }

    fn parse_expression_from(&mut self, first: Expr) -> Result<Expr, SyntaxError> {
        let mut node = self.parse_term_from(first)?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_term()?;
            node = Expr::binary(node, op, rhs);
        }
        Ok(node)
    }

    fn parse_term(&mut self) -> Result<Expr, SyntaxError> {
        let first = self.parse_factor()?;
        self.parse_term_from(first)
    }

    fn parse_term_from(&mut self, first: Expr) -> Result<Expr, SyntaxError> {
        let mut node = first;
        loop {
            let op = match self.peek().kind {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_factor()?;
            node = Expr::binary(node, op, rhs);
        }
        Ok(node)
    }

    fn parse_factor(&mut self) -> Result<Expr, SyntaxError> {
        let token = self.advance();
        match token.kind {
            TokenKind::Number(n) => Ok(Expr::Number(n)),
            TokenKind::StringLiteral(s) => Ok(Expr::Str(s)),
            TokenKind::Identifier(name) => Ok(Expr::Var(name)),
            TokenKind::LParen => {
                let inner = self.parse_expression()?;
                self.expect(&TokenKind::RParen, "`)`")?;
                Ok(inner)
            }
            found => Err(SyntaxError::Unexpected {
                found,
                expected: "a number, string, identifier or `(`",
                pos: token.pos,
            }),
        }
    }

    fn peek(&mut self) -> &Token {
        self.tokens.peek().unwrap_or(&self.eof)
    }

    fn advance(&mut self) -> Token {
        match self.tokens.next() {
            Some(token) => {
                self.eof.pos = token.pos;
                token
            }
            None => self.eof.clone(),
        }
    }

    /// Consume the next token if it has the given kind.
    fn eat(&mut self, kind: &TokenKind) -> bool {
        if &self.peek().kind == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind, expected: &'static str) -> Result<(), SyntaxError> {
        if self.eat(kind) {
            return Ok(());
        }
        let token = self.peek().clone();
        Err(SyntaxError::Unexpected {
            found: token.kind,
            expected,
            pos: token.pos,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(kind: TokenKind) -> Token {
        Token::new(kind, 0)
    }

    #[test]
    fn missing_end_marker_is_synthesised() {
        let stmt = parse(vec![tok(TokenKind::Number(4))]).unwrap();
        assert_eq!(stmt, Stmt::Expr(Expr::Number(4)));
    }

    #[test]
    fn empty_stream_reports_end_of_input() {
        let err = parse(Vec::<Token>::new()).unwrap_err();
        assert_eq!(err.found(), &TokenKind::EndOfInput);
    }

    #[test]
    fn eof_position_follows_last_token() {
        let err = parse(vec![
            Token::new(TokenKind::LParen, 0),
            Token::new(TokenKind::Number(1), 1),
        ])
        .unwrap_err();
        assert!(matches!(err, SyntaxError::Unexpected { pos: 1, .. }));
    }
}
