//! Lexical analysis for expression substrings
//!
//! The statement parser is line-oriented and hands this lexer one trimmed
//! expression substring at a time. The first malformed character aborts the
//! parse; there is no recovery.

use crate::diagnostic::ParseError;
use crate::token::{BinaryOp, Token};

/// Decorative dash characters that show up when programs are pasted from
/// word processors. All of them normalize to ASCII minus before scanning.
const DASHES: [char; 6] = [
    '\u{2212}', // minus sign
    '\u{2013}', // en dash
    '\u{2014}', // em dash
    '\u{2012}', // figure dash
    '\u{FE63}', // small hyphen-minus
    '\u{FF0D}', // fullwidth hyphen-minus
];

/// Lexer state for tokenizing a single expression
pub struct Lexer {
    chars: Vec<char>,
    current: usize,
}

impl Lexer {
    /// Create a new lexer for the given expression text
    pub fn new(source: &str) -> Self {
        let chars = source
            .chars()
            .map(|c| if DASHES.contains(&c) { '-' } else { c })
            .collect();
        Self { chars, current: 0 }
    }

    /// Tokenize the expression, stopping at the first error
    pub fn tokenize(&mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();

        while !self.is_at_end() {
            let c = self.peek();

            if c.is_whitespace() {
                self.advance();
                continue;
            }

            match c {
                '(' => {
                    self.advance();
                    tokens.push(Token::LeftParen);
                }
                ')' => {
                    self.advance();
                    tokens.push(Token::RightParen);
                }
                '"' => tokens.push(self.string()?),
                '0'..='9' => tokens.push(self.number()?),
                '.' if self.peek_next().is_some_and(|n| n.is_ascii_digit()) => {
                    tokens.push(self.number()?)
                }
                c if c.is_alphabetic() || c == '_' => tokens.push(self.identifier()),
                _ => tokens.push(self.operator()?),
            }
        }

        Ok(tokens)
    }

    /// Scan a double-quoted string. The span is taken raw up to the next
    /// quote; no escape sequences exist in the language.
    fn string(&mut self) -> Result<Token, ParseError> {
        self.advance(); // opening quote
        let start = self.current;
        while !self.is_at_end() && self.peek() != '"' {
            self.advance();
        }
        if self.is_at_end() {
            return Err(ParseError::UnterminatedString);
        }
        let text: String = self.chars[start..self.current].iter().collect();
        self.advance(); // closing quote
        Ok(Token::Str(text))
    }

    /// Scan a number. A `.` anywhere in the digits makes it real.
    fn number(&mut self) -> Result<Token, ParseError> {
        let start = self.current;
        let mut has_dot = false;
        while !self.is_at_end() && (self.peek().is_ascii_digit() || self.peek() == '.') {
            if self.peek() == '.' {
                has_dot = true;
            }
            self.advance();
        }
        let text: String = self.chars[start..self.current].iter().collect();
        if has_dot {
            text.parse::<f64>()
                .map(Token::Real)
                .map_err(|_| ParseError::InvalidNumber { text })
        } else {
            text.parse::<i64>()
                .map(Token::Int)
                .map_err(|_| ParseError::InvalidNumber { text })
        }
    }

    fn identifier(&mut self) -> Token {
        let start = self.current;
        while !self.is_at_end() && (self.peek().is_alphanumeric() || self.peek() == '_') {
            self.advance();
        }
        Token::Ident(self.chars[start..self.current].iter().collect())
    }

    /// Scan an operator, two-character forms first. A bare `=` means
    /// equality here: assignment is a statement-level construct and never
    /// reaches the expression lexer.
    fn operator(&mut self) -> Result<Token, ParseError> {
        let c = self.advance();
        let token = match c {
            '<' if self.match_char('=') => Token::Op(BinaryOp::LessEqual),
            '>' if self.match_char('=') => Token::Op(BinaryOp::GreaterEqual),
            '=' if self.match_char('=') => Token::Op(BinaryOp::Equal),
            '!' if self.match_char('=') => Token::Op(BinaryOp::NotEqual),
            '&' if self.match_char('&') => Token::Op(BinaryOp::And),
            '|' if self.match_char('|') => Token::Op(BinaryOp::Or),
            '=' => Token::Op(BinaryOp::Equal),
            '<' => Token::Op(BinaryOp::Less),
            '>' => Token::Op(BinaryOp::Greater),
            '+' => Token::Op(BinaryOp::Add),
            '-' => Token::Op(BinaryOp::Sub),
            '*' => Token::Op(BinaryOp::Mul),
            '/' => Token::Op(BinaryOp::Div),
            '!' => Token::Bang,
            other => return Err(ParseError::UnexpectedCharacter { ch: other }),
        };
        Ok(token)
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.chars.len()
    }

    fn peek(&self) -> char {
        self.chars[self.current]
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.current + 1).copied()
    }

    fn advance(&mut self) -> char {
        let c = self.chars[self.current];
        self.current += 1;
        c
    }

    fn match_char(&mut self, expected: char) -> bool {
        if !self.is_at_end() && self.peek() == expected {
            self.current += 1;
            true
        } else {
            false
        }
    }
}
