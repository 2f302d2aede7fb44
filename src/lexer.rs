//! Lexer for tokenizing prefs.js files
//!
//! This module provides a tokenizer that converts character streams into tokens
//! for parsing prefs.js files. It handles JavaScript escape sequences and
//! tracks line/column numbers for accurate error reporting.

use crate::error::{Error, Result};
use std::iter::Peekable;
use std::str::Chars;

/// Token types produced by the lexer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Identifier (e.g., user_pref, pref, lock_pref, sticky_pref)
    Identifier(String),
    /// String value with escape sequences already processed
    String(String),
    /// Integer value
    Integer(i32),
    /// Boolean value
    Boolean(bool),
    LeftParen,
    RightParen,
    Comma,
    Semicolon,
    /// End of input
    Eof,
}

/// Lexer for tokenizing prefs.js files
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    /// Current line number (1-indexed)
    line: usize,
    /// Current column number (1-indexed)
    column: usize,
    /// Position where the most recent token started
    token_line: usize,
    token_column: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input
    pub fn new(input: &'a str) -> Self {
        Lexer {
            chars: input.chars().peekable(),
            line: 1,
            column: 1,
            token_line: 1,
            token_column: 1,
        }
    }

    /// Line and column where the last returned token started
    pub fn token_position(&self) -> (usize, usize) {
        (self.token_line, self.token_column)
    }

    /// Get the next token from the input
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace_and_comments()?;

        self.token_line = self.line;
        self.token_column = self.column;

        let c = match self.chars.peek() {
            Some(&c) => c,
            None => return Ok(Token::Eof),
        };

        match c {
            '(' => {
                self.bump();
                Ok(Token::LeftParen)
            }
            ')' => {
                self.bump();
                Ok(Token::RightParen)
            }
            ',' => {
                self.bump();
                Ok(Token::Comma)
            }
            ';' => {
                self.bump();
                Ok(Token::Semicolon)
            }
            '"' => self.lex_string(),
            '-' | '0'..='9' => self.lex_integer(),
            'a'..='z' | 'A'..='Z' | '_' => Ok(self.lex_identifier()),
            _ => Err(self.error(format!("Unexpected character: '{}'", c))),
        }
    }

    /// Consume one character, keeping line/column in sync
    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Character after the next one, without consuming anything
    fn peek_second(&self) -> Option<char> {
        let mut ahead = self.chars.clone();
        ahead.next();
        ahead.next()
    }

    fn error(&self, message: String) -> Error {
        Error::Lexer {
            line: self.line,
            column: self.column,
            message,
        }
    }

    /// Skip whitespace and comments
    fn skip_whitespace_and_comments(&mut self) -> Result<()> {
        loop {
            while matches!(self.chars.peek(), Some(c) if c.is_whitespace()) {
                self.bump();
            }

            if self.chars.peek() != Some(&'/') {
                return Ok(());
            }

            match self.peek_second() {
                Some('/') => {
                    while matches!(self.chars.peek(), Some(&c) if c != '\n') {
                        self.bump();
                    }
                }
                Some('*') => {
                    let (start_line, start_col) = (self.line, self.column);
                    self.bump();
                    self.bump();
                    loop {
                        match self.bump() {
                            Some('*') if self.chars.peek() == Some(&'/') => {
                                self.bump();
                                break;
                            }
                            Some(_) => {}
                            None => {
                                return Err(Error::Lexer {
                                    line: start_line,
                                    column: start_col,
                                    message: "Unterminated block comment".to_string(),
                                });
                            }
                        }
                    }
                }
                _ => return Err(self.error("Unexpected character: '/'".to_string())),
            }
        }
    }

    /// Lex an identifier (e.g., user_pref, pref, true, false)
    fn lex_identifier(&mut self) -> Token {
        let mut ident = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                ident.push(c);
                self.bump();
            } else {
                break;
            }
        }

        match ident.as_str() {
            "true" => Token::Boolean(true),
            "false" => Token::Boolean(false),
            _ => Token::Identifier(ident),
        }
    }

    /// Lex a string literal (only double-quoted strings in prefs.js)
    fn lex_string(&mut self) -> Result<Token> {
        let (start_line, start_col) = (self.line, self.column);

        // Opening quote
        self.bump();

        let mut result = String::new();

        loop {
            match self.bump() {
                Some('"') => return Ok(Token::String(result)),
                Some('\\') => self.lex_escape(&mut result)?,
                Some(c) => result.push(c),
                None => {
                    return Err(Error::Lexer {
                        line: start_line,
                        column: start_col,
                        message: "Unterminated string literal".to_string(),
                    });
                }
            }
        }
    }

    /// Decode one escape sequence; the backslash is already consumed
    fn lex_escape(&mut self, out: &mut String) -> Result<()> {
        match self.bump() {
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('b') => out.push('\x08'),
            Some('f') => out.push('\x0c'),
            Some('0') => {
                // \0 followed by 1-9 is a NUL then that digit; \00 would be octal
                if self.chars.peek() == Some(&'0') {
                    return Err(self.error("Octal escape sequences are not supported".to_string()));
                }
                out.push('\0');
            }
            Some('x') => {
                let byte = self.lex_hex_digits(2, "hex")?;
                out.push(char::from(byte as u8));
            }
            Some('u') => {
                let unit = self.lex_hex_digits(4, "unicode")?;
                out.push(self.decode_utf16_escape(unit)?);
            }
            Some(c) => return Err(self.error(format!("Invalid escape sequence: \\{}", c))),
            None => {
                return Err(self.error("Unexpected end of input in escape sequence".to_string()))
            }
        }
        Ok(())
    }

    /// Read exactly `count` hex digits
    fn lex_hex_digits(&mut self, count: usize, what: &str) -> Result<u32> {
        let mut hex = String::with_capacity(count);
        for _ in 0..count {
            match self.chars.peek() {
                Some(&c) if c.is_ascii_hexdigit() => {
                    hex.push(c);
                    self.bump();
                }
                _ => break,
            }
        }
        if hex.len() != count {
            return Err(self.error(format!("Incomplete {} escape: {}", what, hex)));
        }
        u32::from_str_radix(&hex, 16)
            .map_err(|_| self.error(format!("Invalid {} escape: {}", what, hex)))
    }

    /// Turn a `\uXXXX` code unit into a char, pairing surrogates when the
    /// next escape completes them
    fn decode_utf16_escape(&mut self, unit: u32) -> Result<char> {
        if !(0xD800..0xDC00).contains(&unit) {
            return Ok(char::from_u32(unit).unwrap_or(char::REPLACEMENT_CHARACTER));
        }

        let mut ahead = self.chars.clone();
        if ahead.next() == Some('\\') && ahead.next() == Some('u') {
            let low: String = ahead.take(4).collect();
            if let Ok(low) = u32::from_str_radix(&low, 16) {
                if (0xDC00..0xE000).contains(&low) {
                    for _ in 0..6 {
                        self.bump();
                    }
                    let combined = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
                    return Ok(char::from_u32(combined).unwrap_or(char::REPLACEMENT_CHARACTER));
                }
            }
        }
        Ok(char::REPLACEMENT_CHARACTER)
    }

    /// Lex a decimal integer literal
    fn lex_integer(&mut self) -> Result<Token> {
        let (start_line, start_col) = (self.line, self.column);

        let mut num_str = String::new();
        if self.chars.peek() == Some(&'-') {
            num_str.push('-');
            self.bump();
        }

        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_digit() {
                num_str.push(c);
                self.bump();
            } else {
                break;
            }
        }

        if matches!(self.chars.peek(), Some(&('.' | 'e' | 'E'))) {
            return Err(self.error("Fractional numbers are not supported".to_string()));
        }

        num_str.parse::<i32>().map(Token::Integer).map_err(|_| {
            let message = if num_str == "-" {
                "Expected digits after '-'".to_string()
            } else {
                format!("Integer out of range: {}", num_str)
            };
            Error::Lexer {
                line: start_line,
                column: start_col,
                message,
            }
        })
    }
}
