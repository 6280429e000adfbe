//! Text → [`Predicate`] parser.
//!
//! ```text
//! predicate := disjunct ( OR disjunct )*
//! disjunct  := term ( AND term )*
//! term      := "(" predicate ")"
//!            | ident BETWEEN int AND int
//!            | operand cmp operand ( cmp operand )?
//! cmp       := < | <= | > | >= | = | ==
//! ```
//!
//! Keywords are case-insensitive. A comparison needs exactly one attribute
//! and one literal; a chained comparison such as `20 <= B < 30` needs the
//! attribute in the middle.

use crate::expr::{CmpOp, Predicate};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    #[error("integer literal '{text}' at offset {offset} does not fit in i64")]
    IntegerOutOfRange { text: String, offset: usize },

    #[error("expected {expected} at offset {offset}, found {found}")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
        offset: usize,
    },

    #[error("expected {expected}, found end of input")]
    UnexpectedEnd { expected: &'static str },

    #[error("comparison at offset {offset} must relate one attribute to one literal")]
    InvalidComparison { offset: usize },

    #[error("empty predicate")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    Int(i64),
    Cmp(CmpOp),
    LParen,
    RParen,
    And,
    Or,
    Between,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Ident(name) => write!(f, "attribute '{name}'"),
            Token::Int(v) => write!(f, "literal {v}"),
            Token::Cmp(op) => write!(f, "'{}'", op.symbol()),
            Token::LParen => f.write_str("'('"),
            Token::RParen => f.write_str("')'"),
            Token::And => f.write_str("AND"),
            Token::Or => f.write_str("OR"),
            Token::Between => f.write_str("BETWEEN"),
        }
    }
}

/// Parse predicate text into a tree.
pub fn parse_predicate(text: &str) -> Result<Predicate, ParseError> {
    let tokens = tokenize(text)?;
    if tokens.is_empty() {
        return Err(ParseError::Empty);
    }
    let mut parser = Parser { tokens, pos: 0 };
    let predicate = parser.predicate()?;
    if let Some((token, offset)) = parser.peek_with_offset() {
        return Err(ParseError::UnexpectedToken {
            expected: "OR, AND or end of input",
            found: token.to_string(),
            offset,
        });
    }
    Ok(predicate)
}

fn tokenize(text: &str) -> Result<Vec<(Token, usize)>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some(&(offset, ch)) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
            continue;
        }

        if ch.is_ascii_alphabetic() || ch == '_' {
            let mut word = String::new();
            while let Some(&(_, c)) = chars.peek() {
                if c.is_ascii_alphanumeric() || c == '_' {
                    word.push(c);
                    chars.next();
                } else {
                    break;
                }
            }
            let token = match word.to_ascii_uppercase().as_str() {
                "AND" => Token::And,
                "OR" => Token::Or,
                "BETWEEN" => Token::Between,
                _ => Token::Ident(word),
            };
            tokens.push((token, offset));
            continue;
        }

        if ch.is_ascii_digit() || ch == '-' {
            let mut literal = String::new();
            literal.push(ch);
            chars.next();
            while let Some(&(_, c)) = chars.peek() {
                if c.is_ascii_digit() {
                    literal.push(c);
                    chars.next();
                } else {
                    break;
                }
            }
            if literal == "-" {
                return Err(ParseError::UnexpectedChar { ch: '-', offset });
            }
            let value = literal
                .parse::<i64>()
                .map_err(|_| ParseError::IntegerOutOfRange {
                    text: literal.clone(),
                    offset,
                })?;
            tokens.push((Token::Int(value), offset));
            continue;
        }

        chars.next();
        let token = match ch {
            '(' => Token::LParen,
            ')' => Token::RParen,
            '<' | '>' => {
                let or_equal = matches!(chars.peek(), Some(&(_, '=')));
                if or_equal {
                    chars.next();
                }
                Token::Cmp(match (ch, or_equal) {
                    ('<', false) => CmpOp::Lt,
                    ('<', true) => CmpOp::Lte,
                    ('>', false) => CmpOp::Gt,
                    _ => CmpOp::Gte,
                })
            }
            '=' => {
                if matches!(chars.peek(), Some(&(_, '='))) {
                    chars.next();
                }
                Token::Cmp(CmpOp::Eq)
            }
            other => return Err(ParseError::UnexpectedChar { ch: other, offset }),
        };
        tokens.push((token, offset));
    }

    Ok(tokens)
}

enum Operand {
    Attribute(String),
    Literal(i64),
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn peek_with_offset(&self) -> Option<(&Token, usize)> {
        self.tokens.get(self.pos).map(|(t, o)| (t, *o))
    }

    fn offset(&self) -> usize {
        self.tokens.get(self.pos).map(|(_, o)| *o).unwrap_or(0)
    }

    fn next(&mut self, expected: &'static str) -> Result<(Token, usize), ParseError> {
        let item = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or(ParseError::UnexpectedEnd { expected })?;
        self.pos += 1;
        Ok(item)
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn predicate(&mut self) -> Result<Predicate, ParseError> {
        let mut terms = vec![self.disjunct()?];
        while self.eat(&Token::Or) {
            terms.push(self.disjunct()?);
        }
        Ok(Predicate::or(terms))
    }

    fn disjunct(&mut self) -> Result<Predicate, ParseError> {
        let mut terms = vec![self.term()?];
        while self.eat(&Token::And) {
            terms.push(self.term()?);
        }
        Ok(Predicate::and(terms))
    }

    fn term(&mut self) -> Result<Predicate, ParseError> {
        if self.eat(&Token::LParen) {
            let inner = self.predicate()?;
            let (token, offset) = self.next("')'")?;
            if token != Token::RParen {
                return Err(ParseError::UnexpectedToken {
                    expected: "')'",
                    found: token.to_string(),
                    offset,
                });
            }
            return Ok(inner);
        }

        let start = self.offset();
        let first = self.operand()?;

        if let Operand::Attribute(attribute) = &first {
            if self.eat(&Token::Between) {
                let low = self.literal()?;
                let (token, offset) = self.next("AND")?;
                if token != Token::And {
                    return Err(ParseError::UnexpectedToken {
                        expected: "AND",
                        found: token.to_string(),
                        offset,
                    });
                }
                let high = self.literal()?;
                return Ok(Predicate::range(attribute.clone(), low, high));
            }
        }

        let op = self.cmp_op()?;
        let second = self.operand()?;

        let chained = match self.peek() {
            Some(Token::Cmp(_)) => {
                let op2 = self.cmp_op()?;
                Some((op2, self.operand()?))
            }
            _ => None,
        };

        match (first, second, chained) {
            (Operand::Attribute(attribute), Operand::Literal(value), None) => {
                Ok(Predicate::cmp(attribute, op, value))
            }
            (Operand::Literal(value), Operand::Attribute(attribute), None) => {
                Ok(Predicate::cmp(attribute, op.flipped(), value))
            }
            (
                Operand::Literal(low),
                Operand::Attribute(attribute),
                Some((op2, Operand::Literal(high))),
            ) => Ok(Predicate::and(vec![
                Predicate::cmp(attribute.clone(), op.flipped(), low),
                Predicate::cmp(attribute, op2, high),
            ])),
            _ => Err(ParseError::InvalidComparison { offset: start }),
        }
    }

    fn operand(&mut self) -> Result<Operand, ParseError> {
        let (token, offset) = self.next("attribute or integer literal")?;
        match token {
            Token::Ident(name) => Ok(Operand::Attribute(name)),
            Token::Int(value) => Ok(Operand::Literal(value)),
            other => Err(ParseError::UnexpectedToken {
                expected: "attribute or integer literal",
                found: other.to_string(),
                offset,
            }),
        }
    }

    fn literal(&mut self) -> Result<i64, ParseError> {
        let (token, offset) = self.next("integer literal")?;
        match token {
            Token::Int(value) => Ok(value),
            other => Err(ParseError::UnexpectedToken {
                expected: "integer literal",
                found: other.to_string(),
                offset,
            }),
        }
    }

    fn cmp_op(&mut self) -> Result<CmpOp, ParseError> {
        let (token, offset) = self.next("comparison operator")?;
        match token {
            Token::Cmp(op) => Ok(op),
            other => Err(ParseError::UnexpectedToken {
                expected: "comparison operator",
                found: other.to_string(),
                offset,
            }),
        }
    }
}
