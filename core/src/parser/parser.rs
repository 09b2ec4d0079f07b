//! Recursive-descent parser.
//!
//! One method per precedence level, loosest first:
//!
//! ```text
//! expression  := ternary
//! ternary     := or ( '?' expression ':' expression )?
//! or          := and ( '||' and )*
//! and         := nullish ( '&&' nullish )*
//! nullish     := equality ( '??' equality )*
//! equality    := in ( ( '===' | '!==' | '==' | '!=' ) in )*
//! in          := relational ( 'in' relational )*
//! relational  := additive ( ( '<=' | '>=' | '<' | '>' ) additive )*
//! additive    := multiplicative ( ( '+' | '-' ) multiplicative )*
//! multiplicative := unary ( ( '*' | '/' | '%' ) unary )*
//! unary       := ( '!' | '-' | '+' | 'typeof' ) unary | postfix
//! postfix     := primary ( '.' name | '[' expression ']' | '(' args ')' )*
//! ```
//!
//! Binary levels loop, so long operator chains do not grow the stack.
//! Nesting (parentheses, brackets, branches, unary prefixes) does, and is
//! bounded by the depth ceiling.

use crate::api::EngineOptions;
use crate::parser::error::{CompileError, ParseError, ParseErrorKind};
use crate::parser::{BinaryOp, Expr, Literal, ObjectEntry, Property, PropertyKey, Span, UnaryOp};
use crate::security::SecurityError;
use crate::syntax::{StringScanError, is_ident_continue, is_ident_start, scan_string_literal};
use crate::values::convert::number_to_string;

type ParseResult<T> = Result<T, CompileError>;

/// Default nesting ceiling.
pub const DEFAULT_MAX_DEPTH: usize = 50;

/// Parse with default limits.
pub fn parse(source: &str) -> Result<Expr, CompileError> {
    parse_with_options(source, &EngineOptions::default())
}

/// Parse with the depth ceiling and length cap from `options`.
pub fn parse_with_options(source: &str, options: &EngineOptions) -> Result<Expr, CompileError> {
    if source.len() > options.max_source_len {
        return Err(ParseError::new(
            ParseErrorKind::SourceTooLong {
                len: source.len(),
                max_len: options.max_source_len,
            },
            Span::new(0, source.len()),
        )
        .into());
    }
    Parser::new(source, options.max_parse_depth).parse()
}

pub struct Parser<'s> {
    source: &'s str,
    pos: usize,
    depth: usize,
    max_depth: usize,
}

impl<'s> Parser<'s> {
    pub fn new(source: &'s str, max_depth: usize) -> Self {
        Self {
            source,
            pos: 0,
            depth: 0,
            max_depth,
        }
    }

    /// Parse the whole source as a single expression.
    pub fn parse(&mut self) -> Result<Expr, CompileError> {
        self.pos = 0;
        self.depth = 0;

        if self.source.trim().is_empty() {
            return Err(self.error(
                ParseErrorKind::EmptyExpression,
                Span::new(0, self.source.len()),
            ));
        }

        let expr = self.parse_expression()?;
        if self.peek().is_some() {
            return Err(self.unexpected("end of input"));
        }
        tracing::trace!(source = self.source, "parsed expression");
        Ok(expr)
    }

    // ========================================================================
    // Depth accounting
    // ========================================================================

    fn enter(&mut self) -> ParseResult<()> {
        if self.depth >= self.max_depth {
            tracing::debug!(max_depth = self.max_depth, "parse depth ceiling reached");
            return Err(SecurityError::DepthExceeded {
                depth: self.depth + 1,
                max_depth: self.max_depth,
            }
            .into());
        }
        self.depth += 1;
        Ok(())
    }

    fn exit(&mut self) {
        self.depth -= 1;
    }

    // ========================================================================
    // Precedence levels
    // ========================================================================

    fn parse_expression(&mut self) -> ParseResult<Expr> {
        self.enter()?;
        let result = self.parse_ternary();
        self.exit();
        result
    }

    fn parse_ternary(&mut self) -> ParseResult<Expr> {
        let cond = self.parse_or()?;
        self.skip_whitespace();
        if !self.rest().starts_with('?') || self.rest().starts_with("??") {
            return Ok(cond);
        }
        self.pos += 1;

        let then_branch = self.parse_expression()?;
        if !self.eat(":") {
            return Err(self.unexpected("':'"));
        }
        let else_branch = self.parse_expression()?;

        Ok(Expr::Ternary {
            cond: Box::new(cond),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        })
    }

    fn parse_or(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_and()?;
        while self.eat("||") {
            let right = self.parse_and()?;
            left = Expr::binary(BinaryOp::Or, left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_nullish()?;
        while self.eat("&&") {
            let right = self.parse_nullish()?;
            left = Expr::binary(BinaryOp::And, left, right);
        }
        Ok(left)
    }

    fn parse_nullish(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_equality()?;
        while self.eat("??") {
            let right = self.parse_equality()?;
            left = Expr::binary(BinaryOp::Nullish, left, right);
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_in()?;
        loop {
            // Longest spelling first; a lone `=` is never an operator.
            let op = if self.eat("===") {
                BinaryOp::StrictEq
            } else if self.eat("!==") {
                BinaryOp::StrictNe
            } else if self.eat("==") {
                BinaryOp::Eq
            } else if self.eat("!=") {
                BinaryOp::Ne
            } else {
                return Ok(left);
            };
            let right = self.parse_in()?;
            left = Expr::binary(op, left, right);
        }
    }

    fn parse_in(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_relational()?;
        while self.eat_keyword("in") {
            let right = self.parse_relational()?;
            left = Expr::binary(BinaryOp::In, left, right);
        }
        Ok(left)
    }

    fn parse_relational(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_additive()?;
        loop {
            let op = if self.eat("<=") {
                BinaryOp::Le
            } else if self.eat(">=") {
                BinaryOp::Ge
            } else if self.eat("<") {
                BinaryOp::Lt
            } else if self.eat(">") {
                BinaryOp::Gt
            } else {
                return Ok(left);
            };
            let right = self.parse_additive()?;
            left = Expr::binary(op, left, right);
        }
    }

    fn parse_additive(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = if self.eat("+") {
                BinaryOp::Add
            } else if self.eat("-") {
                BinaryOp::Sub
            } else {
                return Ok(left);
            };
            let right = self.parse_multiplicative()?;
            left = Expr::binary(op, left, right);
        }
    }

    fn parse_multiplicative(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let op = if self.eat("*") {
                BinaryOp::Mul
            } else if self.eat("/") {
                BinaryOp::Div
            } else if self.eat("%") {
                BinaryOp::Rem
            } else {
                return Ok(left);
            };
            let right = self.parse_unary()?;
            left = Expr::binary(op, left, right);
        }
    }

    fn parse_unary(&mut self) -> ParseResult<Expr> {
        let op = if self.eat("!") {
            UnaryOp::Not
        } else if self.eat("-") {
            UnaryOp::Neg
        } else if self.eat("+") {
            UnaryOp::Plus
        } else if self.eat_keyword("typeof") {
            UnaryOp::TypeOf
        } else {
            return self.parse_postfix();
        };

        self.enter()?;
        let operand = self.parse_unary();
        self.exit();
        Ok(Expr::unary(op, operand?))
    }

    fn parse_postfix(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            if self.eat(".") {
                self.skip_whitespace();
                let Some(name) = self.scan_identifier() else {
                    return Err(self.unexpected("property name"));
                };
                expr = Expr::Member {
                    object: Box::new(expr),
                    property: Property::Named(name.to_string()),
                };
            } else if self.peek() == Some('[') {
                let open = self.pos;
                self.pos += 1;
                let index = self.parse_expression()?;
                self.expect_closing(']', '[', open)?;
                expr = Expr::Member {
                    object: Box::new(expr),
                    property: Property::Computed(Box::new(index)),
                };
            } else if self.peek() == Some('(') {
                let open = self.pos;
                self.pos += 1;
                let args = self.parse_list(')', '(', open)?;
                expr = Expr::Call {
                    callee: Box::new(expr),
                    args,
                };
            } else {
                return Ok(expr);
            }
        }
    }

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let Some(c) = self.peek() else {
            return Err(self.unexpected("expression"));
        };
        let start = self.pos;

        match c {
            '(' => {
                self.pos += 1;
                let inner = self.parse_expression()?;
                self.expect_closing(')', '(', start)?;
                Ok(inner)
            }
            '[' => {
                self.pos += 1;
                Ok(Expr::Array(self.parse_list(']', '[', start)?))
            }
            '{' => {
                self.pos += 1;
                self.parse_object(start)
            }
            '"' | '\'' | '`' => Ok(Expr::string(self.scan_string()?)),
            c if c.is_ascii_digit() || (c == '.' && self.next_is_digit(1)) => {
                Ok(Expr::number(self.scan_number()?))
            }
            c if is_ident_start(c) => {
                let name = self.scan_identifier().unwrap_or_default();
                Ok(match reserved_literal(name) {
                    Some(literal) => Expr::Literal(literal),
                    None => Expr::ident(name),
                })
            }
            _ => Err(self.unexpected("expression")),
        }
    }

    /// Comma-separated expressions up to `close`; a trailing comma is fine.
    fn parse_list(&mut self, close: char, open: char, open_pos: usize) -> ParseResult<Vec<Expr>> {
        let mut items = Vec::new();
        loop {
            if self.peek() == Some(close) {
                self.pos += 1;
                return Ok(items);
            }
            items.push(self.parse_expression()?);
            if !self.eat(",") {
                self.expect_closing(close, open, open_pos)?;
                return Ok(items);
            }
        }
    }

    fn parse_object(&mut self, open_pos: usize) -> ParseResult<Expr> {
        let mut entries = Vec::new();
        loop {
            let Some(c) = self.peek() else {
                return Err(self.unclosed('{', open_pos));
            };
            if c == '}' {
                self.pos += 1;
                return Ok(Expr::Object(entries));
            }

            let key_start = self.pos;
            let entry = match c {
                '[' => {
                    self.pos += 1;
                    let key = self.parse_expression()?;
                    self.expect_closing(']', '[', key_start)?;
                    self.expect_colon()?;
                    ObjectEntry {
                        key: PropertyKey::Computed(key),
                        value: self.parse_expression()?,
                    }
                }
                '"' | '\'' | '`' => {
                    let key = self.scan_string()?;
                    self.expect_colon()?;
                    ObjectEntry {
                        key: PropertyKey::Static(key),
                        value: self.parse_expression()?,
                    }
                }
                c if c.is_ascii_digit() || (c == '.' && self.next_is_digit(1)) => {
                    let key = number_to_string(self.scan_number()?);
                    self.expect_colon()?;
                    ObjectEntry {
                        key: PropertyKey::Static(key),
                        value: self.parse_expression()?,
                    }
                }
                c if is_ident_start(c) => {
                    let name = self.scan_identifier().unwrap_or_default().to_string();
                    let shorthand =
                        reserved_literal(&name).is_none() && matches!(self.peek(), Some(',' | '}'));
                    if shorthand {
                        ObjectEntry {
                            value: Expr::ident(name.clone()),
                            key: PropertyKey::Static(name),
                        }
                    } else {
                        self.expect_colon()?;
                        ObjectEntry {
                            key: PropertyKey::Static(name),
                            value: self.parse_expression()?,
                        }
                    }
                }
                _ => return Err(self.unexpected("property key")),
            };
            entries.push(entry);

            if !self.eat(",") {
                self.expect_closing('}', '{', open_pos)?;
                return Ok(Expr::Object(entries));
            }
        }
    }

    // ========================================================================
    // Scanning
    // ========================================================================

    fn rest(&self) -> &'s str {
        &self.source[self.pos..]
    }

    fn skip_whitespace(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.source.len() - trimmed.len();
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_whitespace();
        self.rest().chars().next()
    }

    fn next_is_digit(&self, offset: usize) -> bool {
        self.rest()
            .as_bytes()
            .get(offset)
            .is_some_and(|b| b.is_ascii_digit())
    }

    fn eat(&mut self, token: &str) -> bool {
        self.skip_whitespace();
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    /// Consume `word` only if no identifier character follows it, so that
    /// `index` never splits into `in` + `dex`.
    fn eat_keyword(&mut self, word: &str) -> bool {
        self.skip_whitespace();
        let rest = self.rest();
        let boundary = rest
            .strip_prefix(word)
            .is_some_and(|after| !after.chars().next().is_some_and(is_ident_continue));
        if boundary {
            self.pos += word.len();
        }
        boundary
    }

    fn scan_identifier(&mut self) -> Option<&'s str> {
        let rest = self.rest();
        let mut chars = rest.char_indices();
        match chars.next() {
            Some((_, c)) if is_ident_start(c) => {}
            _ => return None,
        }
        let end = chars
            .find(|&(_, c)| !is_ident_continue(c))
            .map_or(rest.len(), |(i, _)| i);
        self.pos += end;
        Some(&rest[..end])
    }

    fn scan_string(&mut self) -> ParseResult<String> {
        let start = self.pos;
        match scan_string_literal(self.rest()) {
            Ok((value, consumed)) => {
                self.pos += consumed;
                Ok(value)
            }
            Err(StringScanError::Unterminated | StringScanError::NotAString) => Err(self.error(
                ParseErrorKind::UnterminatedString,
                Span::new(start, self.source.len()),
            )),
        }
    }

    fn scan_number(&mut self) -> ParseResult<f64> {
        let start = self.pos;
        let bytes = self.source.as_bytes();
        let mut end = start;

        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        if end < bytes.len() && bytes[end] == b'.' {
            let after = self.source[end + 1..].chars().next();
            match after {
                Some(c) if c.is_ascii_digit() => {
                    end += 1;
                    while end < bytes.len() && bytes[end].is_ascii_digit() {
                        end += 1;
                    }
                }
                // `1.toFixed(2)` is a member access on `1`.
                Some(c) if is_ident_start(c) => {}
                _ => end += 1,
            }
        }
        if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
            let mut exp = end + 1;
            if exp < bytes.len() && matches!(bytes[exp], b'+' | b'-') {
                exp += 1;
            }
            if exp < bytes.len() && bytes[exp].is_ascii_digit() {
                while exp < bytes.len() && bytes[exp].is_ascii_digit() {
                    exp += 1;
                }
                end = exp;
            }
        }

        let trailing = self.source[end..]
            .char_indices()
            .find(|&(_, c)| !is_ident_continue(c))
            .map_or(self.source.len() - end, |(i, _)| i);
        if trailing > 0 {
            let bad_end = end + trailing;
            return Err(self.error(
                ParseErrorKind::InvalidNumber {
                    text: self.source[start..bad_end].to_string(),
                },
                Span::new(start, bad_end),
            ));
        }

        let text = &self.source[start..end];
        match text.parse::<f64>() {
            Ok(value) => {
                self.pos = end;
                Ok(value)
            }
            Err(_) => Err(self.error(
                ParseErrorKind::InvalidNumber {
                    text: text.to_string(),
                },
                Span::new(start, end),
            )),
        }
    }

    // ========================================================================
    // Errors
    // ========================================================================

    fn error(&self, kind: ParseErrorKind, span: Span) -> CompileError {
        ParseError::new(kind, span).into()
    }

    fn unexpected(&mut self, expected: &str) -> CompileError {
        self.skip_whitespace();
        let start = self.pos;
        let rest = self.rest();
        let Some(first) = rest.chars().next() else {
            return self.error(
                ParseErrorKind::UnexpectedEnd {
                    expected: expected.to_string(),
                },
                Span::at(start),
            );
        };

        let len = if is_ident_continue(first) {
            rest.char_indices()
                .find(|&(_, c)| !is_ident_continue(c))
                .map_or(rest.len(), |(i, _)| i)
        } else {
            first.len_utf8()
        };
        self.error(
            ParseErrorKind::UnexpectedToken {
                expected: expected.to_string(),
                found: format!("'{}'", &rest[..len]),
            },
            Span::new(start, start + len),
        )
    }

    fn unclosed(&self, delimiter: char, open_pos: usize) -> CompileError {
        self.error(
            ParseErrorKind::UnclosedDelimiter { delimiter },
            Span::new(open_pos, open_pos + delimiter.len_utf8()),
        )
    }

    fn expect_closing(&mut self, close: char, open: char, open_pos: usize) -> ParseResult<()> {
        match self.peek() {
            Some(c) if c == close => {
                self.pos += c.len_utf8();
                Ok(())
            }
            None => Err(self.unclosed(open, open_pos)),
            Some(_) => Err(self.unexpected(&format!("'{close}'"))),
        }
    }

    fn expect_colon(&mut self) -> ParseResult<()> {
        if self.eat(":") {
            Ok(())
        } else {
            Err(self.unexpected("':'"))
        }
    }
}

fn reserved_literal(name: &str) -> Option<Literal> {
    Some(match name {
        "true" => Literal::Bool(true),
        "false" => Literal::Bool(false),
        "null" => Literal::Null,
        "undefined" => Literal::Undefined,
        "NaN" => Literal::Number(f64::NAN),
        "Infinity" => Literal::Number(f64::INFINITY),
        _ => return None,
    })
}
