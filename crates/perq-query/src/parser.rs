//! Query parser.
//!
//! Parses a token stream into a query AST using recursive descent.
//!
//! # Grammar
//!
//! ```text
//! query      → or_expr
//! or_expr    → and_expr ("OR" and_expr)*
//! and_expr   → primary ("AND"? primary)*
//! primary    → field_expr | "(" or_expr ")"
//! field_expr → FIELD_PREFIX (TERM | QUOTED | range | geo)
//! range      → "[" number "TO" number "]"
//! geo        → "geo" "(" number "," number "," number ")"
//! ```
//!
//! Every leaf is field-scoped: a percolated clause is always a predicate on a
//! named document field. AND binds tighter than OR and is implicit between
//! adjacent clauses.

use crate::{
    ast::{Number, QueryExpr},
    error::{ParseError, QueryError},
    lexer::{Token, tokenize},
};

/// Recursive descent parser for query expressions.
struct Parser {
    /// Token stream to parse.
    tokens: Vec<Token>,
    /// Current position in token stream.
    position: usize,
}

impl Parser {
    /// Creates a new parser from a token stream.
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// Parses the token stream into a query expression.
    fn parse(mut self) -> Result<QueryExpr, ParseError> {
        if self.tokens.is_empty() {
            return Err(ParseError::new("empty query", None));
        }

        let expr = self.parse_or_expr()?;

        if self.position < self.tokens.len() {
            return Err(ParseError::new(
                format!("unexpected token: {:?}", self.tokens[self.position]),
                Some(self.position),
            ));
        }

        Ok(expr)
    }

    /// Parses: or_expr → and_expr ("OR" and_expr)*
    fn parse_or_expr(&mut self) -> Result<QueryExpr, ParseError> {
        let mut left = self.parse_and_expr()?;

        while self.check(&Token::Or) {
            self.advance(); // consume OR
            let right = self.parse_and_expr()?;
            left = QueryExpr::or(vec![left, right]);
        }

        Ok(left)
    }

    /// Parses: and_expr → primary ("AND"? primary)*
    fn parse_and_expr(&mut self) -> Result<QueryExpr, ParseError> {
        let mut exprs = Vec::new();

        exprs.push(self.parse_primary()?);

        loop {
            if self.check(&Token::And) {
                self.advance(); // consume explicit AND
                exprs.push(self.parse_primary()?);
            } else if self.can_start_primary() {
                exprs.push(self.parse_primary()?);
            } else {
                break;
            }
        }

        Ok(QueryExpr::and(exprs))
    }

    /// Checks if the current token can start a primary expression.
    fn can_start_primary(&self) -> bool {
        matches!(
            self.peek(),
            Some(Token::FieldPrefix(_)) | Some(Token::LParen)
        )
    }

    /// Parses: primary → field_expr | "(" or_expr ")"
    fn parse_primary(&mut self) -> Result<QueryExpr, ParseError> {
        match self.peek().cloned() {
            Some(Token::FieldPrefix(name)) => {
                self.advance();
                self.parse_field_expr(name)
            }

            Some(Token::LParen) => {
                self.advance(); // consume (
                let expr = self.parse_or_expr()?;
                self.expect(&Token::RParen, "expected closing parenthesis")?;
                Ok(expr)
            }

            Some(Token::RParen) => Err(ParseError::new(
                "unexpected closing parenthesis",
                Some(self.position),
            )),

            Some(Token::Or) => Err(ParseError::new(
                "unexpected OR (needs expression before it)",
                Some(self.position),
            )),

            Some(other) => Err(ParseError::new(
                format!("expected field:value clause, found {other:?}"),
                Some(self.position),
            )),

            None => Err(ParseError::new("unexpected end of query", None)),
        }
    }

    /// Parses the value following a field prefix: term, quoted, range, or geo.
    fn parse_field_expr(&mut self, field: String) -> Result<QueryExpr, ParseError> {
        match self.peek().cloned() {
            Some(Token::Quoted(value)) => {
                self.advance();
                Ok(QueryExpr::Term { field, value })
            }

            Some(Token::LBracket) => {
                self.advance();
                self.parse_range(field)
            }

            // `geo` is only special when followed by an argument list.
            Some(Token::Term(word)) if word == "geo" && self.peek_at(1) == Some(&Token::LParen) => {
                self.advance(); // consume geo
                self.advance(); // consume (
                self.parse_geo(field)
            }

            Some(Token::Term(value)) => {
                self.advance();
                Ok(QueryExpr::Term { field, value })
            }

            Some(other) => Err(ParseError::new(
                format!("expected value after '{field}:', found {other:?}"),
                Some(self.position),
            )),

            None => Err(ParseError::new(
                format!("expected value after '{field}:'"),
                None,
            )),
        }
    }

    /// Parses a range body after the opening bracket: number "TO" number "]".
    fn parse_range(&mut self, field: String) -> Result<QueryExpr, ParseError> {
        let lo = self.parse_number("range lower endpoint")?;
        self.expect(&Token::To, "expected TO between range endpoints")?;
        let hi = self.parse_number("range upper endpoint")?;
        self.expect(&Token::RBracket, "expected closing bracket after range")?;
        Ok(QueryExpr::Range { field, lo, hi })
    }

    /// Parses a geo body after the opening paren: lat "," lon "," meters ")".
    fn parse_geo(&mut self, field: String) -> Result<QueryExpr, ParseError> {
        let lat = self.parse_number("geo latitude")?.as_f64();
        self.expect(&Token::Comma, "expected ',' between geo arguments")?;
        let lon = self.parse_number("geo longitude")?.as_f64();
        self.expect(&Token::Comma, "expected ',' between geo arguments")?;
        let meters = self.parse_number("geo radius in meters")?.as_f64();
        self.expect(&Token::RParen, "expected closing parenthesis after geo")?;
        Ok(QueryExpr::GeoDistance {
            field,
            lat,
            lon,
            meters,
        })
    }

    /// Parses a numeric literal from the current term token.
    fn parse_number(&mut self, what: &str) -> Result<Number, ParseError> {
        let Some(Token::Term(word)) = self.peek().cloned() else {
            return Err(ParseError::new(
                format!("expected number for {what}"),
                Some(self.position),
            ));
        };
        self.advance();

        if let Ok(int) = word.parse::<i64>() {
            return Ok(Number::Int(int));
        }
        match word.parse::<f64>() {
            Ok(float) if float.is_finite() => return Ok(Number::Float(float)),
            _ => {}
        }
        Err(ParseError::new(
            format!("invalid number for {what}: {word:?}"),
            Some(self.position - 1),
        ))
    }

    /// Consumes the expected token or fails with the given message.
    fn expect(&mut self, token: &Token, message: &str) -> Result<(), ParseError> {
        if self.check(token) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::new(message, Some(self.position)))
        }
    }

    /// Checks if the current token matches without consuming it.
    fn check(&self, token: &Token) -> bool {
        self.peek() == Some(token)
    }

    /// Returns the current token without consuming it.
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    /// Returns the token `offset` positions ahead without consuming anything.
    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.position + offset)
    }

    /// Advances to the next token.
    fn advance(&mut self) {
        self.position += 1;
    }
}

/// Parses a query string into an AST.
///
/// Empty or whitespace-only input is an error: a stored query must contain
/// at least one clause.
pub fn parse(input: &str) -> Result<QueryExpr, QueryError> {
    let tokens = tokenize(input)?;
    Parser::new(tokens).parse().map_err(QueryError::from)
}
